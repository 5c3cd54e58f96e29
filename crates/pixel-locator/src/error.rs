//! Error types for pixel locator construction.

use swath_common::SwathError;
use thiserror::Error;

/// Errors that can occur while building a pixel locator.
///
/// Queries never fail: positions outside a raster yield `None` or an
/// empty result.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PixelLocatorError {
    /// Array sizes do not match the raster dimensions.
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// No usable geolocation sample in the input.
    #[error("no valid geolocation samples: {0}")]
    NoValidSamples(String),

    /// A rational function model could not be fitted.
    #[error("model fit failed: {0}")]
    ModelFit(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Error from the shared grid types.
    #[error(transparent)]
    Swath(#[from] SwathError),
}

impl PixelLocatorError {
    /// Create an InvalidDimensions error.
    pub fn invalid_dimensions(msg: impl Into<String>) -> Self {
        Self::InvalidDimensions(msg.into())
    }

    /// Create a NoValidSamples error.
    pub fn no_valid_samples(msg: impl Into<String>) -> Self {
        Self::NoValidSamples(msg.into())
    }

    /// Create a ModelFit error.
    pub fn model_fit(msg: impl Into<String>) -> Self {
        Self::ModelFit(msg.into())
    }
}

/// Result type for pixel locator operations.
pub type Result<T> = std::result::Result<T, PixelLocatorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_swath_error() {
        let err: PixelLocatorError = SwathError::invalid_grid("3 samples for 2x2").into();
        assert!(matches!(err, PixelLocatorError::Swath(_)));
        assert_eq!(err.to_string(), "Invalid pixel grid: 3 samples for 2x2");
    }

    #[test]
    fn test_display() {
        assert_eq!(
            PixelLocatorError::model_fit("tile 3").to_string(),
            "model fit failed: tile 3"
        );
    }
}
