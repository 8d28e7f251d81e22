//! Shared utilities for ringd
//!
//! This crate provides:
//! - ID types (SessionId)
//! - Error types
//! - Default paths for config and log directories

mod error;
mod ids;
mod paths;

pub use error::*;
pub use ids::*;
pub use paths::*;
