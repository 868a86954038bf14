//! Grounded Core Library
//!
//! This crate provides the foundational utilities shared by every Grounded crate:
//! - Error handling (`AppError`, `AppResult`)
//! - Logging infrastructure
//! - Configuration management, including the retrieval thresholds

pub mod config;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use config::{AppConfig, RagConfig};
pub use error::{AppError, AppResult};
