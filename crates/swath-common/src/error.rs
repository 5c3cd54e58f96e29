//! Error types for swath processing.

use thiserror::Error;

/// Result type alias using SwathError.
pub type SwathResult<T> = Result<T, SwathError>;

/// Primary error type for footprint construction and geometry operations.
///
/// Only construction-time failures are reported through this type. A pair of
/// observations that does not intersect is a regular result, not an error.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SwathError {
    // === Construction Errors ===
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Degenerate time axis: {0}")]
    DegenerateTimeAxis(String),

    #[error("Invalid pixel grid: {0}")]
    InvalidGrid(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // === Codec Errors ===
    #[error("Failed to parse WKT: {0}")]
    WktParse(String),

    // === Backend Errors ===
    #[error("Projection error: {0}")]
    Projection(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl SwathError {
    /// Create an InvalidGeometry error.
    pub fn invalid_geometry(msg: impl Into<String>) -> Self {
        Self::InvalidGeometry(msg.into())
    }

    /// Create a DegenerateTimeAxis error.
    pub fn degenerate_time_axis(msg: impl Into<String>) -> Self {
        Self::DegenerateTimeAxis(msg.into())
    }

    /// Create an InvalidGrid error.
    pub fn invalid_grid(msg: impl Into<String>) -> Self {
        Self::InvalidGrid(msg.into())
    }

    /// Create an InvalidArgument error.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create a WktParse error.
    pub fn wkt_parse(msg: impl Into<String>) -> Self {
        Self::WktParse(msg.into())
    }

    /// Create a Projection error.
    pub fn projection(msg: impl Into<String>) -> Self {
        Self::Projection(msg.into())
    }
}
