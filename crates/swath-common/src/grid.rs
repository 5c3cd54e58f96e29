//! Per-pixel geolocation grids and pixel/geo positions.

use serde::{Deserialize, Serialize};

use crate::error::{SwathError, SwathResult};

/// A geographic position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPos {
    pub lon: f64,
    pub lat: f64,
}

impl GeoPos {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Both coordinates are finite and the latitude is within [-90, 90].
    pub fn is_valid(&self) -> bool {
        self.lon.is_finite() && self.lat.is_finite() && (-90.0..=90.0).contains(&self.lat)
    }
}

/// A fractional pixel position. Pixel centres sit at `i + 0.5`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelPos {
    pub x: f64,
    pub y: f64,
}

impl PixelPos {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Integer cell containing this position.
    pub fn cell(&self) -> (i64, i64) {
        (self.x.floor() as i64, self.y.floor() as i64)
    }
}

/// Direction of the satellite over the equator while acquiring a granule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeType {
    Ascending,
    Descending,
}

/// Row-major longitude/latitude samples of a sensor raster.
///
/// Rows follow the along-track (scan line) direction, columns the
/// across-track direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PixelGrid {
    width: usize,
    height: usize,
    lons: Vec<f64>,
    lats: Vec<f64>,
}

impl PixelGrid {
    /// Create a grid, checking that both arrays hold `width * height` samples.
    pub fn new(width: usize, height: usize, lons: Vec<f64>, lats: Vec<f64>) -> SwathResult<Self> {
        if width == 0 || height == 0 {
            return Err(SwathError::invalid_grid(format!(
                "grid dimensions must be positive, got {}x{}",
                width, height
            )));
        }
        let expected = width * height;
        if lons.len() != expected || lats.len() != expected {
            return Err(SwathError::invalid_grid(format!(
                "expected {} samples, got {} longitudes and {} latitudes",
                expected,
                lons.len(),
                lats.len()
            )));
        }
        Ok(Self {
            width,
            height,
            lons,
            lats,
        })
    }

    /// Build a grid by evaluating `f(x, y) -> (lon, lat)` for every cell.
    pub fn from_fn(width: usize, height: usize, f: impl Fn(usize, usize) -> (f64, f64)) -> SwathResult<Self> {
        let mut lons = Vec::with_capacity(width * height);
        let mut lats = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                let (lon, lat) = f(x, y);
                lons.push(lon);
                lats.push(lat);
            }
        }
        Self::new(width, height, lons, lats)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn lons(&self) -> &[f64] {
        &self.lons
    }

    pub fn lats(&self) -> &[f64] {
        &self.lats
    }

    /// Longitude at `(x, y)`. Panics on out-of-range indices like slice indexing.
    pub fn lon(&self, x: usize, y: usize) -> f64 {
        self.lons[y * self.width + x]
    }

    /// Latitude at `(x, y)`. Panics on out-of-range indices like slice indexing.
    pub fn lat(&self, x: usize, y: usize) -> f64 {
        self.lats[y * self.width + x]
    }

    /// Sample at `(x, y)`, or `None` outside the raster.
    pub fn get(&self, x: usize, y: usize) -> Option<GeoPos> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(GeoPos::new(self.lon(x, y), self.lat(x, y)))
    }

    /// Copy of the rows `[start, stop)` as a new grid.
    pub fn rows(&self, start: usize, stop: usize) -> SwathResult<PixelGrid> {
        if start >= stop || stop > self.height {
            return Err(SwathError::invalid_argument(format!(
                "row range {}..{} is invalid for height {}",
                start, stop, self.height
            )));
        }
        let from = start * self.width;
        let to = stop * self.width;
        PixelGrid::new(
            self.width,
            stop - start,
            self.lons[from..to].to_vec(),
            self.lats[from..to].to_vec(),
        )
    }
}
