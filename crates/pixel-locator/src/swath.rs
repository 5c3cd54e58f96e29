//! Pixel locator for swath grids built from local approximations.

use swath_common::{GeoPos, PixelGrid, PixelPos};
use tracing::{debug, trace};

use crate::approximation::{create_approximations, GeoApproximation};
use crate::config::LocatorConfig;
use crate::error::Result;
use crate::locator::PixelLocator;

/// An approximation that may answer a query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub index: usize,
    pub distance: f64,
}

/// Locates pixels of an arbitrary swath grid.
///
/// Forward queries read the grid directly. Inverse queries evaluate the
/// approximations whose validity radius contains the query point; a ground
/// point observed twice yields two pixel positions.
#[derive(Debug, Clone)]
pub struct SwathPixelLocator {
    grid: PixelGrid,
    approximations: Vec<GeoApproximation>,
}

impl SwathPixelLocator {
    /// Fit approximations for `grid`.
    pub fn new(grid: PixelGrid, config: &LocatorConfig) -> Result<Self> {
        let approximations = create_approximations(&grid, config)?;
        debug!(
            width = grid.width(),
            height = grid.height(),
            approximations = approximations.len(),
            "Created swath pixel locator"
        );
        Ok(Self { grid, approximations })
    }

    pub fn grid(&self) -> &PixelGrid {
        &self.grid
    }

    pub fn approximations(&self) -> &[GeoApproximation] {
        &self.approximations
    }

    fn is_inside(&self, p: &PixelPos) -> bool {
        let (x, y) = p.cell();
        x >= 0 && y >= 0 && (x as usize) < self.grid.width() && (y as usize) < self.grid.height()
    }
}

impl PixelLocator for SwathPixelLocator {
    fn get_geo_location(&self, x: f64, y: f64) -> Option<GeoPos> {
        if !(x >= 0.0 && y >= 0.0) {
            return None;
        }
        self.grid.get(x.floor() as usize, y.floor() as usize)
    }

    fn get_pixel_location(&self, lon: f64, lat: f64) -> Vec<PixelPos> {
        let mut candidates: Vec<Candidate> = self
            .approximations
            .iter()
            .enumerate()
            .filter_map(|(index, approximation)| {
                let distance = approximation.get_distance(lon, lat);
                (distance <= approximation.max_distance()).then_some(Candidate { index, distance })
            })
            .collect();

        remove_adjacent_candidates(&mut candidates);
        trace!(lon, lat, candidates = candidates.len(), "Inverse query");

        candidates
            .iter()
            .map(|c| self.approximations[c.index].g2p(lon, lat))
            .filter(|p| self.is_inside(p))
            .collect()
    }
}

/// Of two candidates with consecutive indices, drop the one farther away.
///
/// Only direct neighbours are merged. The scan restarts at the survivor so
/// runs of adjacent candidates collapse to their nearest member.
pub fn remove_adjacent_candidates(candidates: &mut Vec<Candidate>) {
    let mut i = 1;
    while i < candidates.len() {
        if candidates[i].index - candidates[i - 1].index == 1 {
            if candidates[i - 1].distance < candidates[i].distance {
                candidates.remove(i);
            } else {
                candidates.remove(i - 1);
            }
        } else {
            i += 1;
        }
    }
}
