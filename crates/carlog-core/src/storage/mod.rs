//! Key-value storage port and its backends.
//!
//! The rest of the crate only ever talks to [`KeyValueStore`]; the backends
//! differ in where the strings live.

mod file;
pub mod keys;
mod memory;
mod traits;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use traits::{KeyValueStore, DEFAULT_CAPACITY_BYTES};
