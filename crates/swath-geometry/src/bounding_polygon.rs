//! Footprint polygons and time-axis curves from pixel grids.
//!
//! The footprint of a granule is the ring through its perimeter pixels:
//! first row left to right, last column top to bottom, last row right to
//! left, first column bottom to top. Rings that are not simple (typical
//! over the poles or for very wide swaths) are repaired by splitting the
//! grid along track into blocks that share their boundary row.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use swath_common::{NodeType, PixelGrid, SwathError, SwathResult};
use tracing::{debug, warn};

use crate::antimeridian::normalize_ring;
use crate::config::GeometryConfig;
use crate::factory::{create_factory, GeometryBackend, GeometryFactory};
use crate::time_axis::TimeAxis;
use crate::types::{close_polygon, Geometry, LineString, MultiPolygon, Point, Polygon};
use crate::wkt;

/// Rows per block when `total_height` rows are split into `num_splits` blocks.
pub fn get_subset_height(total_height: usize, num_splits: usize) -> usize {
    if num_splits <= 1 {
        return total_height;
    }
    total_height.div_ceil(num_splits)
}

/// Row ranges `[start, stop)` of the along-track blocks.
///
/// Consecutive blocks share one row so that their polygons touch.
pub fn block_rows(total_height: usize, subset_height: usize) -> Vec<(usize, usize)> {
    let step = subset_height.max(1);
    let mut blocks = Vec::new();
    let mut start = 0;
    while start + 1 < total_height {
        blocks.push((start, (start + step + 1).min(total_height)));
        start += step;
    }
    blocks
}

/// Validated footprint of a granule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BoundingGeometry {
    /// The whole perimeter ring is simple.
    Single(Polygon),
    /// One polygon per along-track block of `subset_height` rows.
    Split { parts: Vec<Polygon>, subset_height: usize },
}

impl BoundingGeometry {
    pub fn parts(&self) -> &[Polygon] {
        match self {
            Self::Single(polygon) => std::slice::from_ref(polygon),
            Self::Split { parts, .. } => parts,
        }
    }

    pub fn is_split(&self) -> bool {
        matches!(self, Self::Split { .. })
    }

    /// Rows per block, the full height for an unsplit footprint.
    pub fn subset_height(&self, total_height: usize) -> usize {
        match self {
            Self::Single(_) => total_height,
            Self::Split { subset_height, .. } => *subset_height,
        }
    }

    /// Index of the block holding pixel row `row`.
    pub fn block_index(&self, row: usize) -> usize {
        match self {
            Self::Single(_) => 0,
            Self::Split { parts, subset_height } => (row / (*subset_height).max(1)).min(parts.len().saturating_sub(1)),
        }
    }

    pub fn to_geometry(&self) -> Geometry {
        match self {
            Self::Single(polygon) => Geometry::Polygon(polygon.clone()),
            Self::Split { parts, .. } => Geometry::MultiPolygon(MultiPolygon(parts.clone())),
        }
    }
}

/// Boundary ring that remembers which vertices form the time-axis edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PixelCodedRing {
    /// Closed ring, first point repeated at the end.
    pub points: Vec<Point>,
    /// Grid cell `(x, y)` of every ring point.
    pub pixels: Vec<(usize, usize)>,
    /// Index of the first time-axis vertex.
    pub time_axis_start: usize,
    /// Index of the last time-axis vertex (inclusive).
    pub time_axis_end: usize,
}

/// Builds footprint polygons and time-axis curves from pixel grids.
#[derive(Debug, Clone)]
pub struct BoundingPolygonCreator {
    interval_x: usize,
    interval_y: usize,
    initial_splits: usize,
    max_split_attempts: usize,
    factory: Arc<dyn GeometryFactory>,
}

impl BoundingPolygonCreator {
    /// Create a creator walking the perimeter with the given steps.
    pub fn new(interval_x: usize, interval_y: usize, factory: Arc<dyn GeometryFactory>) -> SwathResult<Self> {
        if interval_x == 0 || interval_y == 0 {
            return Err(SwathError::invalid_argument(format!(
                "perimeter intervals must be > 0, got x={} y={}",
                interval_x, interval_y
            )));
        }
        let defaults = GeometryConfig::default();
        Ok(Self {
            interval_x,
            interval_y,
            initial_splits: defaults.initial_splits,
            max_split_attempts: defaults.max_split_attempts,
            factory,
        })
    }

    pub fn from_config(config: &GeometryConfig) -> SwathResult<Self> {
        config.validate().map_err(SwathError::Config)?;
        let creator = Self::new(config.interval_x, config.interval_y, create_factory(config.backend))?;
        Ok(creator.with_split_policy(config.initial_splits, config.max_split_attempts))
    }

    /// Blocks on the first split attempt and the number of attempts.
    pub fn with_split_policy(mut self, initial_splits: usize, max_split_attempts: usize) -> Self {
        self.initial_splits = initial_splits.max(2);
        self.max_split_attempts = max_split_attempts.max(1);
        self
    }

    pub fn factory(&self) -> &Arc<dyn GeometryFactory> {
        &self.factory
    }

    /// Validated footprint for the whole grid.
    ///
    /// Tries the full perimeter first, then `initial_splits` blocks,
    /// doubling the block count on each further attempt. Fails with
    /// `InvalidGeometry` when every attempt leaves a non-simple block.
    pub fn create_bounding_geometry(&self, grid: &PixelGrid) -> SwathResult<BoundingGeometry> {
        check_grid(grid)?;

        let polygon = self.create_polygon(grid, 0, grid.height())?;
        if self.factory.is_simple(&polygon) {
            debug!(
                vertices = polygon.exterior().len(),
                width = grid.width(),
                height = grid.height(),
                "Created bounding polygon"
            );
            return Ok(BoundingGeometry::Single(polygon));
        }

        let mut splits = self.initial_splits;
        for attempt in 1..=self.max_split_attempts {
            warn!(attempt, splits, "Bounding polygon is not simple, splitting along track");
            if let Some(parts) = self.try_split(grid, splits)? {
                let subset_height = get_subset_height(grid.height(), splits);
                debug!(parts = parts.len(), subset_height, "Created split bounding geometry");
                return Ok(BoundingGeometry::Split { parts, subset_height });
            }
            splits *= 2;
        }

        Err(SwathError::invalid_geometry(format!(
            "no simple footprint after {} split attempts ({} blocks) for {}x{} grid",
            self.max_split_attempts,
            splits / 2,
            grid.width(),
            grid.height()
        )))
    }

    /// One polygon per along-track block. Fails if any block is not simple.
    pub fn create_bounding_geometry_split(&self, grid: &PixelGrid, num_splits: usize) -> SwathResult<Vec<Polygon>> {
        check_grid(grid)?;
        self.try_split(grid, num_splits)?.ok_or_else(|| {
            SwathError::invalid_geometry(format!("a block of the {}-way split footprint is not simple", num_splits))
        })
    }

    fn try_split(&self, grid: &PixelGrid, num_splits: usize) -> SwathResult<Option<Vec<Polygon>>> {
        let subset_height = get_subset_height(grid.height(), num_splits);
        let mut parts = Vec::with_capacity(num_splits);
        for (start, stop) in block_rows(grid.height(), subset_height) {
            let polygon = self.create_polygon(grid, start, stop)?;
            if !self.factory.is_simple(&polygon) {
                warn!(
                    start,
                    stop,
                    wkt = %wkt::format(&Geometry::Polygon(polygon.clone())),
                    "Footprint block is not simple"
                );
                return Ok(None);
            }
            parts.push(polygon);
        }
        Ok(Some(parts))
    }

    /// Polygon through the perimeter of rows `[start_row, stop_row)`.
    pub fn create_polygon(&self, grid: &PixelGrid, start_row: usize, stop_row: usize) -> SwathResult<Polygon> {
        Polygon::new(self.create_ring(grid, start_row, stop_row)?)
    }

    /// Closed perimeter ring of rows `[start_row, stop_row)`.
    pub fn create_ring(&self, grid: &PixelGrid, start_row: usize, stop_row: usize) -> SwathResult<Vec<Point>> {
        if stop_row > grid.height() || stop_row < start_row + 2 {
            return Err(SwathError::invalid_argument(format!(
                "row range {}..{} does not span two rows of a grid with height {}",
                start_row,
                stop_row,
                grid.height()
            )));
        }

        let pixels = perimeter_pixels(grid.width(), start_row, stop_row, self.interval_x, self.interval_y);
        let mut ring = pixels
            .iter()
            .map(|&(x, y)| grid_point(grid, x, y))
            .collect::<SwathResult<Vec<_>>>()?;
        close_polygon(&mut ring);
        self.normalize(&mut ring);
        Ok(ring)
    }

    /// Centre-column curve over the whole grid.
    pub fn create_time_axis_geometry(&self, grid: &PixelGrid) -> SwathResult<LineString> {
        check_grid(grid)?;
        self.axis_geometry(grid, 0, grid.height())
    }

    /// Centre-column curve per along-track block.
    pub fn create_time_axis_geometry_split(&self, grid: &PixelGrid, num_splits: usize) -> SwathResult<Vec<LineString>> {
        check_grid(grid)?;
        let subset_height = get_subset_height(grid.height(), num_splits);
        block_rows(grid.height(), subset_height)
            .into_iter()
            .map(|(start, stop)| self.axis_geometry(grid, start, stop))
            .collect()
    }

    fn axis_geometry(&self, grid: &PixelGrid, start_row: usize, stop_row: usize) -> SwathResult<LineString> {
        let x = grid.width() / 2;
        let last = stop_row - 1;
        let mut points = Vec::new();
        let mut y = start_row;
        while y < last {
            points.push(grid_point(grid, x, y)?);
            y += self.interval_y;
        }
        points.push(grid_point(grid, x, last)?);
        self.normalize(&mut points);
        LineString::new(points)
    }

    /// One time axis per footprint part.
    ///
    /// Block times are interpolated linearly over the rows of the grid.
    pub fn create_time_axes(
        &self,
        geometry: &BoundingGeometry,
        grid: &PixelGrid,
        start: DateTime<Utc>,
        stop: DateTime<Utc>,
    ) -> SwathResult<Vec<TimeAxis>> {
        check_grid(grid)?;
        match geometry {
            BoundingGeometry::Single(_) => {
                let line = self.axis_geometry(grid, 0, grid.height())?;
                Ok(vec![TimeAxis::new(line, start, stop, self.factory.clone())?])
            }
            BoundingGeometry::Split { subset_height, .. } => {
                let duration_ms = (stop - start).num_milliseconds();
                let last_row = (grid.height() - 1) as i64;
                let row_time = |row: usize| start + Duration::milliseconds(duration_ms * row as i64 / last_row);

                block_rows(grid.height(), *subset_height)
                    .into_iter()
                    .map(|(first, end)| {
                        let line = self.axis_geometry(grid, first, end)?;
                        TimeAxis::new(line, row_time(first), row_time(end - 1), self.factory.clone())
                    })
                    .collect()
            }
        }
    }

    /// Boundary ring ordered for the given node, with the time-axis edge
    /// marked. Ascending rings start on the first row and run down the last
    /// column; descending rings start on the last column.
    pub fn create_pixel_coded_ring(&self, grid: &PixelGrid, node: NodeType) -> SwathResult<PixelCodedRing> {
        check_grid(grid)?;
        let last_x = grid.width() - 1;
        let last_y = grid.height() - 1;

        let mut first_row = Vec::new();
        let mut x = 0;
        while x < last_x {
            first_row.push((x, 0));
            x += self.interval_x;
        }
        let mut last_column = Vec::new();
        let mut y = 0;
        while y < last_y {
            last_column.push((last_x, y));
            y += self.interval_y;
        }
        let mut last_row = Vec::new();
        let mut x = last_x;
        while x > 0 {
            last_row.push((x, last_y));
            x = x.saturating_sub(self.interval_x);
        }
        let mut first_column = Vec::new();
        let mut y = last_y;
        while y > 0 {
            first_column.push((0, y));
            y = y.saturating_sub(self.interval_y);
        }

        let axis_edges = last_column.len();
        let (mut pixels, time_axis_start) = match node {
            NodeType::Ascending => {
                let start = first_row.len();
                ([first_row, last_column, last_row, first_column].concat(), start)
            }
            NodeType::Descending => ([last_column, last_row, first_column, first_row].concat(), 0),
        };
        let time_axis_end = time_axis_start + axis_edges;

        if let Some(&first) = pixels.first() {
            pixels.push(first);
        }
        let mut points = pixels
            .iter()
            .map(|&(x, y)| grid_point(grid, x, y))
            .collect::<SwathResult<Vec<_>>>()?;
        self.normalize(&mut points);

        Ok(PixelCodedRing { points, pixels, time_axis_start, time_axis_end })
    }

    fn normalize(&self, points: &mut [Point]) {
        if self.factory.backend() == GeometryBackend::Planar {
            normalize_ring(points);
        }
    }
}

/// Time-axis curve of a pixel-coded ring.
pub fn time_axis_from_ring(ring: &PixelCodedRing) -> SwathResult<LineString> {
    if ring.time_axis_end >= ring.points.len() || ring.time_axis_end <= ring.time_axis_start {
        return Err(SwathError::invalid_geometry(format!(
            "time axis indices {}..={} are invalid for a ring of {} points",
            ring.time_axis_start,
            ring.time_axis_end,
            ring.points.len()
        )));
    }
    LineString::new(ring.points[ring.time_axis_start..=ring.time_axis_end].to_vec())
}

/// Perimeter cells of rows `[start_row, stop_row)`, not closed.
fn perimeter_pixels(
    width: usize,
    start_row: usize,
    stop_row: usize,
    interval_x: usize,
    interval_y: usize,
) -> Vec<(usize, usize)> {
    let last_x = width - 1;
    let last_y = stop_row - 1;
    let mut pixels = Vec::with_capacity(2 * (width + stop_row - start_row));

    let mut x = 0;
    while x < last_x {
        pixels.push((x, start_row));
        x += interval_x;
    }
    let mut y = start_row;
    while y < last_y {
        pixels.push((last_x, y));
        y += interval_y;
    }
    let mut x = last_x;
    while x > 0 {
        pixels.push((x, last_y));
        x = x.saturating_sub(interval_x);
    }
    let mut y = last_y;
    while y > start_row {
        pixels.push((0, y));
        y = y.saturating_sub(interval_y).max(start_row);
    }
    pixels
}

fn grid_point(grid: &PixelGrid, x: usize, y: usize) -> SwathResult<Point> {
    Point::try_new(grid.lon(x, y), grid.lat(x, y))
        .map_err(|_| SwathError::invalid_geometry(format!("invalid geolocation at pixel ({}, {})", x, y)))
}

fn check_grid(grid: &PixelGrid) -> SwathResult<()> {
    if grid.width() < 2 || grid.height() < 2 {
        return Err(SwathError::invalid_grid(format!(
            "a footprint needs at least 2x2 pixels, got {}x{}",
            grid.width(),
            grid.height()
        )));
    }
    Ok(())
}
