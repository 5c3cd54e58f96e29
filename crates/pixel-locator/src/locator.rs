//! The pixel locator capability shared by all raster geometries.

use swath_common::{GeoPos, PixelPos};

/// Maps between fractional pixel positions and geographic positions.
///
/// Pixel `(i, j)` covers `[i, i + 1) x [j, j + 1)`; its centre is at
/// `(i + 0.5, j + 0.5)`. Implementations are immutable after construction
/// and can be queried from many threads at once.
pub trait PixelLocator: Send + Sync {
    /// Geographic position of the pixel containing `(x, y)`.
    ///
    /// Returns `None` outside the raster.
    fn get_geo_location(&self, x: f64, y: f64) -> Option<GeoPos>;

    /// All pixel positions observing `(lon, lat)`.
    ///
    /// A ground point may be seen more than once, e.g. where consecutive
    /// scans overlap, so the result can hold several positions. Points
    /// outside the raster give an empty result.
    fn get_pixel_location(&self, lon: f64, lat: f64) -> Vec<PixelPos>;
}

impl<T: PixelLocator + ?Sized> PixelLocator for Box<T> {
    fn get_geo_location(&self, x: f64, y: f64) -> Option<GeoPos> {
        (**self).get_geo_location(x, y)
    }

    fn get_pixel_location(&self, lon: f64, lat: f64) -> Vec<PixelPos> {
        (**self).get_pixel_location(lon, lat)
    }
}

impl<T: PixelLocator + ?Sized> PixelLocator for std::sync::Arc<T> {
    fn get_geo_location(&self, x: f64, y: f64) -> Option<GeoPos> {
        (**self).get_geo_location(x, y)
    }

    fn get_pixel_location(&self, lon: f64, lat: f64) -> Vec<PixelPos> {
        (**self).get_pixel_location(lon, lat)
    }
}
