//! Configuration for footprint construction.

use serde::{Deserialize, Serialize};

use crate::factory::GeometryBackend;

/// Configuration for bounding polygons and time axes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryConfig {
    /// Surface model for intersection, simplicity and length.
    pub backend: GeometryBackend,

    /// Column step when walking the grid perimeter.
    pub interval_x: usize,

    /// Row step when walking the grid perimeter and sampling the time axis.
    pub interval_y: usize,

    /// How many times an invalid footprint may be split further (1-4).
    pub max_split_attempts: usize,

    /// Number of along-track blocks on the first split attempt.
    pub initial_splits: usize,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            backend: GeometryBackend::Spherical,
            interval_x: 1,
            interval_y: 1,
            max_split_attempts: 2,
            initial_splits: 2,
        }
    }
}

impl GeometryConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("SWATH_GEOMETRY_BACKEND") {
            if let Some(backend) = GeometryBackend::parse(&val) {
                config.backend = backend;
            }
        }

        if let Ok(val) = std::env::var("SWATH_POLYGON_INTERVAL_X") {
            if let Ok(step) = val.parse() {
                config.interval_x = step;
            }
        }

        if let Ok(val) = std::env::var("SWATH_POLYGON_INTERVAL_Y") {
            if let Ok(step) = val.parse() {
                config.interval_y = step;
            }
        }

        if let Ok(val) = std::env::var("SWATH_MAX_SPLIT_ATTEMPTS") {
            if let Ok(attempts) = val.parse() {
                config.max_split_attempts = attempts;
            }
        }

        if let Ok(val) = std::env::var("SWATH_INITIAL_SPLITS") {
            if let Ok(splits) = val.parse() {
                config.initial_splits = splits;
            }
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.interval_x == 0 || self.interval_y == 0 {
            return Err("interval_x and interval_y must be > 0".to_string());
        }

        if self.max_split_attempts == 0 || self.max_split_attempts > 4 {
            return Err("max_split_attempts must be 1-4".to_string());
        }

        if self.initial_splits < 2 {
            return Err("initial_splits must be >= 2".to_string());
        }

        Ok(())
    }

    /// Largest number of blocks the split loop will try.
    pub fn max_splits(&self) -> usize {
        self.initial_splits << (self.max_split_attempts.saturating_sub(1))
    }
}
