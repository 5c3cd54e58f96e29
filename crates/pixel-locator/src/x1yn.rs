//! Pixel locator for a single column of samples, such as a nadir track.

use swath_common::{GeoPos, PixelPos};

use crate::distance::haversine_m;
use crate::error::{PixelLocatorError, Result};
use crate::locator::PixelLocator;

/// Locator for a `1 x n` raster.
///
/// Inverse queries return the nearest sample if it lies within
/// `max_distance_km` of the query point.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelLocatorX1Yn {
    max_distance_m: f64,
    lons: Vec<f64>,
    lats: Vec<f64>,
}

impl PixelLocatorX1Yn {
    pub fn new(max_distance_km: f64, lons: Vec<f64>, lats: Vec<f64>) -> Result<Self> {
        if lons.len() != lats.len() {
            return Err(PixelLocatorError::invalid_dimensions(format!(
                "{} longitudes but {} latitudes",
                lons.len(),
                lats.len()
            )));
        }
        if lons.is_empty() {
            return Err(PixelLocatorError::no_valid_samples("empty track"));
        }
        Ok(Self {
            max_distance_m: max_distance_km * 1000.0,
            lons,
            lats,
        })
    }

    pub fn len(&self) -> usize {
        self.lons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lons.is_empty()
    }
}

impl PixelLocator for PixelLocatorX1Yn {
    fn get_geo_location(&self, x: f64, y: f64) -> Option<GeoPos> {
        let n = self.lons.len();
        if !(0.0..=1.0).contains(&x) || !(0.0..=n as f64).contains(&y) {
            return None;
        }
        let i = (y.floor() as usize).min(n - 1);
        Some(GeoPos::new(self.lons[i], self.lats[i]))
    }

    fn get_pixel_location(&self, lon: f64, lat: f64) -> Vec<PixelPos> {
        let nearest = self
            .lons
            .iter()
            .zip(&self.lats)
            .map(|(&slon, &slat)| haversine_m(lon, lat, slon, slat))
            .enumerate()
            .filter(|(_, d)| !d.is_nan())
            .min_by(|a, b| a.1.total_cmp(&b.1));

        match nearest {
            Some((i, d)) if d <= self.max_distance_m => vec![PixelPos::new(0.5, i as f64 + 0.5)],
            _ => Vec::new(),
        }
    }
}
