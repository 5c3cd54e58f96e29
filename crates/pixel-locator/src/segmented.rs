//! A raster assembled from row segments, each with its own locator.

use swath_common::{GeoPos, PixelPos};
use tracing::trace;

use crate::locator::PixelLocator;

/// One segment covering rows `min_y..=max_y` of the full raster.
struct Segment {
    locator: Box<dyn PixelLocator>,
    min_y: f64,
    max_y: f64,
}

impl Segment {
    /// Position in segment-local pixel coordinates lies inside the segment.
    fn contains(&self, width: f64, p: &PixelPos) -> bool {
        p.x >= 0.0 && p.x < width && p.y >= 0.0 && p.y <= self.max_y - self.min_y
    }
}

/// Locator for a raster stacked from independently geolocated segments.
///
/// Forward queries are delegated to the segment holding the row, shifted
/// into that segment's coordinates. Inverse queries collect the matches of
/// every segment that fall inside it and shift them back.
pub struct PixelLocatorSegmented {
    width: usize,
    segments: Vec<Segment>,
}

impl PixelLocatorSegmented {
    pub fn new(width: usize) -> Self {
        Self {
            width,
            segments: Vec::new(),
        }
    }

    /// Append a segment covering rows `min_y..=max_y`.
    pub fn add_segment(&mut self, locator: Box<dyn PixelLocator>, min_y: usize, max_y: usize) {
        self.segments.push(Segment {
            locator,
            min_y: min_y as f64,
            max_y: max_y as f64,
        });
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Whether `p`, given in coordinates local to segment `index`, lies
    /// inside that segment.
    pub fn is_in_segment(&self, index: usize, p: &PixelPos) -> bool {
        self.segments
            .get(index)
            .is_some_and(|s| s.contains(self.width as f64, p))
    }
}

impl PixelLocator for PixelLocatorSegmented {
    fn get_geo_location(&self, x: f64, y: f64) -> Option<GeoPos> {
        if !(x >= 0.0 && x < self.width as f64) {
            return None;
        }
        let segment = self.segments.iter().find(|s| s.min_y <= y && y <= s.max_y)?;
        segment.locator.get_geo_location(x, y - segment.min_y)
    }

    fn get_pixel_location(&self, lon: f64, lat: f64) -> Vec<PixelPos> {
        let width = self.width as f64;
        let mut result = Vec::new();
        for segment in &self.segments {
            for p in segment.locator.get_pixel_location(lon, lat) {
                if segment.contains(width, &p) {
                    result.push(PixelPos::new(p.x, p.y + segment.min_y));
                }
            }
        }
        trace!(lon, lat, matches = result.len(), "Segmented inverse query");
        result
    }
}
