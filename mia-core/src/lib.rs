//! Mia Core - user management runtime
//!
//! Profile persistence for a user directory, plus the post-confirmation
//! trigger that writes a profile row when a signup is confirmed.

pub mod config;
pub mod domain;
pub mod error;
pub mod repository;
pub mod service;
pub mod telemetry;
pub mod trigger;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, Result};
