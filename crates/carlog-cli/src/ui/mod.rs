//! Terminal output for the carlog CLI.
//!
//! `context` and `mode` decide how to write, `render` and `format` produce
//! the strings, and `theme` holds badges and styles.

mod context;
pub mod format;
mod mode;
pub mod render;
pub mod theme;

pub use context::UiContext;
pub use theme::Badge;

pub use render::{
    badge, blank_line, divider, header, header_with_context, hint, kv, print, print_error,
    receipt, simple_table, table, Column,
};
