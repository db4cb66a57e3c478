//! Application-level utilities for the Carlog CLI.
//!
//! This module provides:
//! - Application context for unified CLI + config handling
//! - Path resolution for config and store files
//! - Vehicle lookup by identifier or plate

mod context;
mod resolver;

pub use context::AppContext;
pub use resolver::{find_vehicle_id, resolve_config_path};
