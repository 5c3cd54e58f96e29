//! Restricting inverse results to a row range.

use swath_common::{GeoPos, PixelPos};

use crate::locator::PixelLocator;

/// Wraps a locator and drops inverse matches outside `min_y..=max_y`.
///
/// Forward queries are passed through unchanged.
#[derive(Debug, Clone)]
pub struct ClippingPixelLocator<L> {
    locator: L,
    min_y: f64,
    max_y: f64,
}

impl<L: PixelLocator> ClippingPixelLocator<L> {
    pub fn new(locator: L, min_y: usize, max_y: usize) -> Self {
        Self {
            locator,
            min_y: min_y as f64,
            max_y: max_y as f64,
        }
    }

    pub fn min_y(&self) -> f64 {
        self.min_y
    }

    pub fn max_y(&self) -> f64 {
        self.max_y
    }

    pub fn inner(&self) -> &L {
        &self.locator
    }
}

impl<L: PixelLocator> PixelLocator for ClippingPixelLocator<L> {
    fn get_geo_location(&self, x: f64, y: f64) -> Option<GeoPos> {
        self.locator.get_geo_location(x, y)
    }

    fn get_pixel_location(&self, lon: f64, lat: f64) -> Vec<PixelPos> {
        let mut pixels = self.locator.get_pixel_location(lon, lat);
        pixels.retain(|p| p.y >= self.min_y && p.y <= self.max_y);
        pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Rows(Vec<f64>);

    impl PixelLocator for Rows {
        fn get_geo_location(&self, x: f64, y: f64) -> Option<GeoPos> {
            Some(GeoPos::new(x, y))
        }

        fn get_pixel_location(&self, _lon: f64, _lat: f64) -> Vec<PixelPos> {
            self.0.iter().map(|&y| PixelPos::new(1.5, y)).collect()
        }
    }

    #[test]
    fn test_clips_rows() {
        let locator = ClippingPixelLocator::new(Rows(vec![0.5, 9.5, 10.0, 19.5, 20.0, 20.5]), 10, 20);
        let ys: Vec<f64> = locator.get_pixel_location(0.0, 0.0).iter().map(|p| p.y).collect();
        assert_eq!(ys, vec![10.0, 19.5, 20.0]);
    }

    #[test]
    fn test_forward_query_is_unclipped() {
        let locator = ClippingPixelLocator::new(Rows(vec![]), 10, 20);
        assert_eq!(locator.get_geo_location(2.0, 3.0), Some(GeoPos::new(2.0, 3.0)));
    }
}
