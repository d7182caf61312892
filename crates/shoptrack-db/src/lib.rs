//! Shoptrack-DB: quota-bounded key-value stores
//!
//! The tracker keeps its two collections as JSON text under fixed keys. This
//! crate provides the stores underneath:
//!
//! - `kv` - the [`KvStore`] trait and quota accounting
//! - `sqlite` - [`SqliteKv`], a file-backed store using rusqlite with r2d2 pooling
//! - `memory` - [`MemoryKv`], a `HashMap`-backed store
//! - `pool` - SQLite pool setup and schema versioning
//!
//! # Example
//!
//! ```
//! use shoptrack_db::{KvStore, MemoryKv};
//!
//! let kv = MemoryKv::with_quota(1024);
//! kv.set("mechanic_list", "[\"Ana\"]").unwrap();
//! assert_eq!(kv.get("mechanic_list").unwrap().as_deref(), Some("[\"Ana\"]"));
//! ```

pub mod kv;
pub mod memory;
pub mod pool;
pub mod sqlite;

pub use kv::KvStore;
pub use memory::MemoryKv;
pub use sqlite::SqliteKv;
