//! Input and parsing helper functions for the CLI.
//!
//! This module provides utilities for:
//! - Confirmation prompts and reading files or stdin (`input`)
//! - Date, part and timezone parsing (`parsing`)

mod input;
mod parsing;

pub use input::{confirm, read_input};
pub use parsing::{parse_date, parse_part_spec, parse_timezone};
