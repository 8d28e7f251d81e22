//! Error types for ringd

use thiserror::Error;

/// Core error type for ringd operations
#[derive(Debug, Error)]
pub enum RingError {
    #[error("Resource acquisition failed: {0}")]
    ResourceAcquisition(String),

    #[error("Conflicting transition: a stop is in flight")]
    ConflictingTransition,

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Host error: {0}")]
    HostError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl RingError {
    pub fn acquisition(msg: impl Into<String>) -> Self {
        Self::ResourceAcquisition(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn host(msg: impl Into<String>) -> Self {
        Self::HostError(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, RingError>;
