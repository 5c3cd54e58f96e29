//! Configuration for the swath pixel locator.

use serde::{Deserialize, Serialize};

/// Configuration for building geo-approximations of a swath grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocatorConfig {
    /// Target RMSE in pixels for the geo-to-pixel model fit.
    pub accuracy: f64,

    /// Rows per approximation tile.
    pub tile_height: usize,

    /// Maximum number of warp points sampled per tile.
    pub max_points_per_tile: usize,

    /// Latitude in degrees beyond which rows belong to a polar section.
    pub polar_threshold: f64,

    /// Fit the approximations of all tiles in parallel.
    pub parallel: bool,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            accuracy: 0.1,
            tile_height: 256,
            max_points_per_tile: 1000,
            polar_threshold: 75.0,
            parallel: true,
        }
    }
}

impl LocatorConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("SWATH_LOCATOR_ACCURACY") {
            if let Ok(accuracy) = val.parse() {
                config.accuracy = accuracy;
            }
        }

        if let Ok(val) = std::env::var("SWATH_LOCATOR_TILE_HEIGHT") {
            if let Ok(rows) = val.parse() {
                config.tile_height = rows;
            }
        }

        if let Ok(val) = std::env::var("SWATH_LOCATOR_MAX_POINTS") {
            if let Ok(points) = val.parse() {
                config.max_points_per_tile = points;
            }
        }

        if let Ok(val) = std::env::var("SWATH_POLAR_THRESHOLD") {
            if let Ok(threshold) = val.parse() {
                config.polar_threshold = threshold;
            }
        }

        if let Ok(val) = std::env::var("SWATH_LOCATOR_PARALLEL") {
            config.parallel = val.to_lowercase() == "true" || val == "1";
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.accuracy > 0.0) {
            return Err("accuracy must be > 0".to_string());
        }

        if self.tile_height < 2 {
            return Err("tile_height must be at least 2".to_string());
        }

        if self.max_points_per_tile < 4 {
            return Err("max_points_per_tile must be at least 4".to_string());
        }

        if !(0.0..=90.0).contains(&self.polar_threshold) {
            return Err("polar_threshold must be 0-90".to_string());
        }

        Ok(())
    }

    /// Rows per tile inside a polar section.
    pub fn polar_tile_height(&self) -> usize {
        (self.tile_height / 2).max(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = LocatorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.polar_tile_height(), 128);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = LocatorConfig {
            accuracy: 0.0,
            ..LocatorConfig::default()
        };
        assert!(config.validate().is_err());

        let config = LocatorConfig {
            tile_height: 1,
            ..LocatorConfig::default()
        };
        assert!(config.validate().is_err());

        let config = LocatorConfig {
            polar_threshold: 95.0,
            ..LocatorConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_json_roundtrip() {
        let config = LocatorConfig {
            tile_height: 64,
            parallel: false,
            ..LocatorConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let parsed: LocatorConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
