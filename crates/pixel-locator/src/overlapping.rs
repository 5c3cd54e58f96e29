//! Raster locator for longitude axes that cross the antimeridian.

use swath_common::{BoundingBox, GeoPos, PixelPos};
use tracing::debug;

use crate::approximation::normalize_lon;
use crate::error::{PixelLocatorError, Result};
use crate::locator::PixelLocator;
use crate::raster::RasterPixelLocator;

/// A longitude jump larger than this between neighbours marks a crossing.
pub const DISCONTINUITY_THRESHOLD: f64 = 300.0;

/// One contiguous run of longitudes and its first column in the full raster.
#[derive(Debug, Clone, PartialEq)]
struct Segment {
    offset: usize,
    locator: RasterPixelLocator,
}

/// Raster locator whose longitude axis is split at antimeridian crossings.
///
/// Every contiguous run of longitudes gets its own [`RasterPixelLocator`].
/// A ground point near a segment edge can resolve in several segments, so
/// inverse queries return the matches of all segments.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlappingRasterPixelLocator {
    segments: Vec<Segment>,
    width: usize,
}

impl OverlappingRasterPixelLocator {
    pub fn new(lons: &[f64], lats: &[f64]) -> Result<Self> {
        if lons.is_empty() || lats.is_empty() {
            return Err(PixelLocatorError::invalid_dimensions(format!(
                "raster axes must not be empty, got {} longitudes and {} latitudes",
                lons.len(),
                lats.len()
            )));
        }

        let lons: Vec<f64> = lons.iter().map(|&lon| normalize_lon(lon)).collect();
        let cuts: Vec<usize> = (1..lons.len())
            .filter(|&i| (lons[i] - lons[i - 1]).abs() > DISCONTINUITY_THRESHOLD)
            .collect();

        let half_lon = minimal_step(&lons, &cuts) / 2.0;
        let half_lat = minimal_step(lats, &[]) / 2.0;
        let (min_lat, max_lat) = min_max(lats);

        let mut bounds = Vec::with_capacity(cuts.len() + 2);
        bounds.push(0);
        bounds.extend_from_slice(&cuts);
        bounds.push(lons.len());

        let mut segments = Vec::with_capacity(bounds.len() - 1);
        for window in bounds.windows(2) {
            let part = &lons[window[0]..window[1]];
            let (min_lon, max_lon) = min_max(part);
            let boundary = BoundingBox::new(min_lon, min_lat, max_lon, max_lat).expand(half_lon, half_lat);
            segments.push(Segment {
                offset: window[0],
                locator: RasterPixelLocator::new(part.to_vec(), lats.to_vec(), boundary)?,
            });
        }

        debug!(
            width = lons.len(),
            segments = segments.len(),
            "Created overlapping raster pixel locator"
        );
        Ok(Self {
            segments,
            width: lons.len(),
        })
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// First column of every segment.
    pub fn segment_offsets(&self) -> Vec<usize> {
        self.segments.iter().map(|s| s.offset).collect()
    }

    /// Geographic bounds of every segment, including the half-cell margin.
    pub fn segment_boundaries(&self) -> Vec<BoundingBox> {
        self.segments.iter().map(|s| *s.locator.boundary()).collect()
    }
}

impl PixelLocator for OverlappingRasterPixelLocator {
    fn get_geo_location(&self, x: f64, y: f64) -> Option<GeoPos> {
        if !(x >= 0.0) || x >= self.width as f64 {
            return None;
        }
        let segment = self.segments.iter().rev().find(|s| s.offset as f64 <= x)?;
        segment.locator.get_geo_location(x - segment.offset as f64, y)
    }

    fn get_pixel_location(&self, lon: f64, lat: f64) -> Vec<PixelPos> {
        self.segments
            .iter()
            .flat_map(|segment| {
                let offset = segment.offset as f64;
                segment
                    .locator
                    .get_pixel_location(lon, lat)
                    .into_iter()
                    .map(move |p| PixelPos::new(p.x + offset, p.y))
            })
            .collect()
    }
}

/// Smallest non-zero distance between neighbours, ignoring the steps that
/// end at a cut index.
fn minimal_step(axis: &[f64], cuts: &[usize]) -> f64 {
    let step = (1..axis.len())
        .filter(|i| !cuts.contains(i))
        .map(|i| (axis[i] - axis[i - 1]).abs())
        .filter(|d| *d > 0.0)
        .fold(f64::INFINITY, f64::min);
    if step.is_finite() {
        step
    } else {
        0.0
    }
}

fn min_max(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)))
}
