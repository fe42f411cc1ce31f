//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Storage (LocalStorage on web, no-op natively)

pub mod storage;

pub use storage::{load_json, save_json};
