//! Row sections and approximation tiles of a swath grid.
//!
//! Near the poles geolocation changes quickly along a scan line, so rows
//! whose centre latitude exceeds the polar threshold are grouped into polar
//! sections and tiled more finely.

use serde::{Deserialize, Serialize};
use swath_common::PixelGrid;

use crate::config::LocatorConfig;

/// A contiguous row range `[start_line, stop_line)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub start_line: usize,
    pub stop_line: usize,
    pub polar: bool,
}

impl Section {
    pub fn new(start_line: usize, stop_line: usize, polar: bool) -> Self {
        Self {
            start_line,
            stop_line,
            polar,
        }
    }

    pub fn height(&self) -> usize {
        self.stop_line - self.start_line
    }
}

/// Split the grid rows into alternating polar and non-polar sections.
///
/// Rows are classified by the latitude of their centre pixel. A row whose
/// centre is missing keeps the class of the previous row.
pub fn create_sections(grid: &PixelGrid, polar_threshold: f64) -> Vec<Section> {
    let centre = grid.width() / 2;
    let mut sections: Vec<Section> = Vec::new();
    let mut previous = false;

    for y in 0..grid.height() {
        let lat = grid.lat(centre, y);
        let polar = if lat.is_finite() { lat.abs() > polar_threshold } else { previous };
        previous = polar;

        match sections.last_mut() {
            Some(last) if last.polar == polar => last.stop_line = y + 1,
            _ => sections.push(Section::new(y, y + 1, polar)),
        }
    }
    sections
}

/// Cut every section into tiles of at most `tile_height` rows.
///
/// Polar sections use [`LocatorConfig::polar_tile_height`]. A single
/// trailing row is merged into the preceding tile of its section.
pub fn create_tiles(sections: &[Section], config: &LocatorConfig) -> Vec<Section> {
    let mut tiles = Vec::new();
    for section in sections {
        let rows = if section.polar {
            config.polar_tile_height()
        } else {
            config.tile_height
        };
        let first = tiles.len();
        let mut start = section.start_line;
        while start < section.stop_line {
            let stop = (start + rows).min(section.stop_line);
            tiles.push(Section::new(start, stop, section.polar));
            start = stop;
        }
        if tiles.len() - first > 1 {
            if let Some(last) = tiles.last().copied() {
                if last.height() < 2 {
                    tiles.pop();
                    if let Some(previous) = tiles.last_mut() {
                        previous.stop_line = last.stop_line;
                    }
                }
            }
        }
    }
    tiles
}
