//! In-memory key-value store.
//!
//! Used for tests and for throwaway sessions (`backend = "memory"`).

use std::collections::HashMap;

use parking_lot::RwLock;
use shoptrack_common::Result;

use crate::kv::{check_quota, entry_size, KvStore};

/// `HashMap`-backed store with an optional byte quota.
#[derive(Debug, Default)]
pub struct MemoryKv {
    entries: RwLock<HashMap<String, String>>,
    quota: Option<u64>,
}

impl MemoryKv {
    /// Create an unbounded store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that rejects writes past `quota` bytes.
    pub fn with_quota(quota: u64) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            quota: Some(quota),
        }
    }

    fn size_excluding(entries: &HashMap<String, String>, key: &str) -> u64 {
        entries
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| entry_size(k, v))
            .sum()
    }
}

impl KvStore for MemoryKv {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.write();
        let others = Self::size_excluding(&entries, key);
        check_quota(self.quota, others, key, value)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.write().remove(key);
        Ok(())
    }

    fn usage(&self) -> Result<u64> {
        Ok(self
            .entries
            .read()
            .iter()
            .map(|(k, v)| entry_size(k, v))
            .sum())
    }

    fn quota(&self) -> Option<u64> {
        self.quota
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let kv = MemoryKv::new();
        assert_eq!(kv.get("a").unwrap(), None);

        kv.set("a", "1").unwrap();
        assert_eq!(kv.get("a").unwrap().as_deref(), Some("1"));

        kv.set("a", "2").unwrap();
        assert_eq!(kv.get("a").unwrap().as_deref(), Some("2"));

        kv.remove("a").unwrap();
        assert_eq!(kv.get("a").unwrap(), None);

        // Removing again is fine
        kv.remove("a").unwrap();
    }

    #[test]
    fn test_usage() {
        let kv = MemoryKv::new();
        kv.set("ab", "cde").unwrap();
        kv.set("f", "g").unwrap();
        assert_eq!(kv.usage().unwrap(), 7);
    }

    #[test]
    fn test_quota_rejects_and_keeps_old_value() {
        let kv = MemoryKv::with_quota(10);
        kv.set("key", "12345").unwrap();

        let err = kv.set("key", "1234567890").unwrap_err();
        assert!(err.is_quota_exceeded());
        assert_eq!(kv.get("key").unwrap().as_deref(), Some("12345"));
    }

    #[test]
    fn test_quota_replacement_does_not_double_count() {
        let kv = MemoryKv::with_quota(8);
        kv.set("key", "12345").unwrap();
        // Same key, same size: still 8 bytes in total
        kv.set("key", "54321").unwrap();
        assert_eq!(kv.usage().unwrap(), 8);
    }
}
