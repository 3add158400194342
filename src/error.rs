//! Error types for sinprobe operations

use thiserror::Error;

use crate::Backend;

/// Result type for sinprobe operations
pub type Result<T> = std::result::Result<T, ProbeError>;

/// Errors that can occur while probing or classifying
#[derive(Debug, Error)]
pub enum ProbeError {
    /// No GPU adapter could be found
    #[error("No GPU adapter available")]
    NoAdapter,

    /// Device creation or pipeline setup failed
    #[error("GPU device error: {0}")]
    Device(String),

    /// Texture readback failed
    #[error("GPU readback failed: {0}")]
    Readback(String),

    /// Backend requested but not compiled in or not present
    #[error("Backend not available: {0:?}")]
    BackendUnavailable(Backend),

    /// Bitplane does not have the expected dimensions
    #[error("Bitplane shape mismatch: expected {expected_width}x{expected_height}, got {width}x{height}")]
    PlaneShape {
        /// Expected width in columns
        expected_width: usize,
        /// Expected height in rows
        expected_height: usize,
        /// Actual width
        width: usize,
        /// Actual height
        height: usize,
    },

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Malformed hex bit pattern
    #[error("Invalid hex bit pattern: {0:?}")]
    InvalidHex(String),

    /// Two reference entries share the same input bit pattern
    #[error("Duplicate reference entry for input 0x{0:08X}")]
    DuplicateReference(u32),

    /// Writing the report failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization failed
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
