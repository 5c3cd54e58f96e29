//! Pixel locator for rasters with separate longitude and latitude axes.

use swath_common::{BoundingBox, GeoPos, PixelPos};

use crate::error::{PixelLocatorError, Result};
use crate::locator::PixelLocator;

/// Direction of a raster's longitude axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LonOrder {
    WestToEast,
    EastToWest,
}

/// Locator for a regular lon/lat raster.
///
/// Column `i` holds `lons[i]`, row `j` holds `lats[j]`. Both axes may run
/// in either direction. Inverse queries snap to the nearest sample and are
/// limited to `boundary`.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterPixelLocator {
    lons: Vec<f64>,
    lats: Vec<f64>,
    boundary: BoundingBox,
    lon_order: LonOrder,
    lats_ascending: bool,
}

impl RasterPixelLocator {
    pub fn new(lons: Vec<f64>, lats: Vec<f64>, boundary: BoundingBox) -> Result<Self> {
        if lons.is_empty() || lats.is_empty() {
            return Err(PixelLocatorError::invalid_dimensions(format!(
                "raster axes must not be empty, got {} longitudes and {} latitudes",
                lons.len(),
                lats.len()
            )));
        }
        let lon_order = if is_ascending(&lons) {
            LonOrder::WestToEast
        } else {
            LonOrder::EastToWest
        };
        let lats_ascending = is_ascending(&lats);
        Ok(Self {
            lons,
            lats,
            boundary,
            lon_order,
            lats_ascending,
        })
    }

    pub fn lon_order(&self) -> LonOrder {
        self.lon_order
    }

    pub fn boundary(&self) -> &BoundingBox {
        &self.boundary
    }

    pub fn width(&self) -> usize {
        self.lons.len()
    }

    pub fn height(&self) -> usize {
        self.lats.len()
    }
}

impl PixelLocator for RasterPixelLocator {
    fn get_geo_location(&self, x: f64, y: f64) -> Option<GeoPos> {
        let i = cell_index(x, self.lons.len())?;
        let j = cell_index(y, self.lats.len())?;
        Some(GeoPos::new(self.lons[i], self.lats[j]))
    }

    fn get_pixel_location(&self, lon: f64, lat: f64) -> Vec<PixelPos> {
        if !self.boundary.contains_point(lon, lat) {
            return Vec::new();
        }
        let i = nearest_index(lon, &self.lons, self.lon_order == LonOrder::WestToEast);
        let j = nearest_index(lat, &self.lats, self.lats_ascending);
        vec![PixelPos::new(i as f64 + 0.5, j as f64 + 0.5)]
    }
}

/// Index of the first value strictly greater than `value`.
pub fn index_larger_than(value: f64, axis: &[f64]) -> Option<usize> {
    axis.iter().position(|&a| a > value)
}

/// Index of the first value strictly smaller than `value`.
pub fn index_smaller_than(value: f64, axis: &[f64]) -> Option<usize> {
    axis.iter().position(|&a| a < value)
}

fn is_ascending(axis: &[f64]) -> bool {
    axis.len() < 2 || axis[0] <= axis[axis.len() - 1]
}

fn cell_index(v: f64, len: usize) -> Option<usize> {
    if !(v >= 0.0) {
        return None;
    }
    let i = v.floor() as usize;
    (i < len).then_some(i)
}

/// Nearest axis index, clamped to the ends. Ties go to the lower index.
fn nearest_index(value: f64, axis: &[f64], ascending: bool) -> usize {
    let next = if ascending {
        index_larger_than(value, axis)
    } else {
        index_smaller_than(value, axis)
    };
    match next {
        None => axis.len() - 1,
        Some(0) => 0,
        Some(i) => {
            if (value - axis[i - 1]).abs() <= (axis[i] - value).abs() {
                i - 1
            } else {
                i
            }
        }
    }
}
