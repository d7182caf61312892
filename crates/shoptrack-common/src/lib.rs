//! Shoptrack-Common: Shared types, constants, and errors.
//!
//! This crate provides the pieces every shoptrack crate agrees on:
//!
//! - **Task records**: [`Task`], [`TaskStatus`], [`TaskDraft`] and the typed [`TaskId`]
//! - **Backups**: the [`Snapshot`] export document and [`SnapshotImport`] parser
//! - **Path Utilities**: media type inference for photo files
//! - **Error Handling**: common error types and result aliases
//!
//! # Examples
//!
//! ```
//! use shoptrack_common::{Error, Result, TaskId, TaskStatus};
//!
//! let id = TaskId::new();
//! let status: TaskStatus = "in-progress".parse().unwrap();
//! assert_eq!(status.to_string(), "in-progress");
//!
//! fn example() -> Result<()> {
//!     Err(Error::not_found("task"))
//! }
//! assert!(example().is_err());
//! # let _ = id;
//! ```

pub mod error;
pub mod ids;
pub mod paths;
pub mod snapshot;
pub mod types;

pub use error::{Error, Result};
pub use ids::*;
pub use snapshot::*;
pub use types::*;

/// Roster used until the user saves one of their own.
pub const DEFAULT_MECHANICS: [&str; 3] = ["Juan Pérez", "Carlos Gómez", "María López"];
