//! The key-value store seam.
//!
//! Stores hold string values under string keys, answer synchronously, and may
//! be capped by a byte quota. A write that would push the total size of all
//! entries over the quota fails with [`Error::QuotaExceeded`] and leaves the
//! previous value in place.

use shoptrack_common::{Error, Result};

/// Synchronous string key-value store.
pub trait KvStore: Send + Sync {
    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;

    /// Total bytes currently held (keys plus values).
    fn usage(&self) -> Result<u64>;

    /// Byte quota, if the store has one.
    fn quota(&self) -> Option<u64>;
}

/// Bytes an entry counts against the quota.
pub fn entry_size(key: &str, value: &str) -> u64 {
    (key.len() + value.len()) as u64
}

/// Check that replacing `key` with `value` fits in `quota`.
///
/// `others` is the size of every entry except the one under `key`.
pub fn check_quota(quota: Option<u64>, others: u64, key: &str, value: &str) -> Result<()> {
    let Some(limit) = quota else {
        return Ok(());
    };
    let needed = others + entry_size(key, value);
    if needed > limit {
        tracing::warn!(key, needed, limit, "Write rejected by storage quota");
        return Err(Error::QuotaExceeded { needed, limit });
    }
    Ok(())
}
