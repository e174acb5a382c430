//! Common utilities shared across the workspace crates.
//!
//! This crate provides:
//! - Unified error handling with an HTTP status mapping
//! - Configuration structures loaded from the environment

pub mod config;
pub mod error;

pub use config::*;
pub use error::{AppError, AppResult, OptionExt};
