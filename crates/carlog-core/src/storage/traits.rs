//! Storage port definition.
//!
//! The `KeyValueStore` trait models a browser-style local storage: string keys,
//! string values, synchronous access, and no transactions. A sequence of
//! writes can be left partially applied if interrupted.

use crate::error::Result;

/// Default capacity, matching the usual local storage quota.
pub const DEFAULT_CAPACITY_BYTES: usize = 5 * 1024 * 1024;

/// Minimal key-value port injected into the repository.
///
/// All implementations must ensure:
/// - `get` on a missing key returns `Ok(None)`
/// - `remove` on a missing key is a no-op
/// - a failed `set` leaves the previous value in place
pub trait KeyValueStore {
    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `CarlogError::QuotaExceeded` if the write would push the store
    /// past its capacity, or `CarlogError::Storage` if the backend fails.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Delete the value stored under `key`.
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Size of a store's contents as counted against its quota.
pub(crate) fn usage<'a, I>(entries: I) -> usize
where
    I: IntoIterator<Item = (&'a String, &'a String)>,
{
    entries
        .into_iter()
        .map(|(key, value)| key.len() + value.len())
        .sum()
}
