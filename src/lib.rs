//! Shoptrack - Work-order tracker for small vehicle repair shops
//!
//! This library crate exposes the core functionality for integration testing.

pub mod config;
pub mod images;
pub mod prompt;
pub mod store;
pub mod tracker;
