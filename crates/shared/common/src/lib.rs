//! Common utilities shared across the workspace.
//!
//! This crate provides:
//! - Unified error handling for the HTTP layer and both stores
//! - Configuration structures for the record store, search index and server

pub mod config;
pub mod error;

pub use config::*;
pub use error::{AppError, AppResult, OptionExt};
