//! Error types for prefstore
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using PrefsError
pub type Result<T> = std::result::Result<T, PrefsError>;

/// Unified error type for prefstore operations
#[derive(Debug, Error)]
pub enum PrefsError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Session Errors
    // -------------------------------------------------------------------------
    #[error("Namespace not started")]
    NotStarted,

    #[error("Namespace already started")]
    AlreadyStarted,

    #[error("Namespace is read-only")]
    ReadOnly,

    // -------------------------------------------------------------------------
    // Entry Errors
    // -------------------------------------------------------------------------
    #[error("Key not found")]
    NotFound,

    #[error("Buffer too small: stored value is {stored} bytes, buffer holds {capacity}")]
    Capacity { stored: usize, capacity: usize },

    #[error("Value too large: {len} bytes exceeds limit of {max}")]
    ValueTooLarge { len: usize, max: usize },

    // -------------------------------------------------------------------------
    // Argument Errors
    // -------------------------------------------------------------------------
    #[error("Invalid namespace name: {0:?}")]
    InvalidName(String),

    #[error("Invalid key: {0:?}")]
    InvalidKey(String),

    // -------------------------------------------------------------------------
    // Backend Errors
    // -------------------------------------------------------------------------
    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Storage initialization failed: {0}")]
    Init(String),
}
