//! Spatial and temporal intersection of two observations.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use swath_common::{PixelGrid, SwathError, SwathResult, TimeInfo, TimeInterval};
use tracing::{debug, trace};

use crate::bounding_polygon::BoundingPolygonCreator;
use crate::factory::GeometryFactory;
use crate::time_axis::TimeAxis;
use crate::types::{Geometry, Polygon};
use crate::wkt;

/// A footprint with one time axis per footprint part.
#[derive(Debug, Clone)]
pub struct Observation {
    geometry: Geometry,
    time_axes: Vec<TimeAxis>,
}

impl Observation {
    /// Pair a footprint with its time axes. Split footprints need one axis
    /// per part, in the same order.
    pub fn new(geometry: Geometry, time_axes: Vec<TimeAxis>) -> SwathResult<Self> {
        let parts = geometry.polygons().len();
        if parts == 0 {
            return Err(SwathError::invalid_geometry("observation footprint has no polygon"));
        }
        if parts != time_axes.len() {
            return Err(SwathError::invalid_argument(format!(
                "footprint has {} parts but {} time axes were given",
                parts,
                time_axes.len()
            )));
        }
        Ok(Self { geometry, time_axes })
    }

    /// Single-part observation.
    pub fn single(polygon: Polygon, time_axis: TimeAxis) -> Self {
        Self {
            geometry: Geometry::Polygon(polygon),
            time_axes: vec![time_axis],
        }
    }

    /// Footprint and time axes of a pixel grid acquired between `start`
    /// and `stop`.
    pub fn from_grid(
        creator: &BoundingPolygonCreator,
        grid: &PixelGrid,
        start: DateTime<Utc>,
        stop: DateTime<Utc>,
    ) -> SwathResult<Self> {
        let bounding = creator.create_bounding_geometry(grid)?;
        let time_axes = creator.create_time_axes(&bounding, grid, start, stop)?;
        Self::new(bounding.to_geometry(), time_axes)
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn time_axes(&self) -> &[TimeAxis] {
        &self.time_axes
    }

    /// Footprint parts paired with their time axes.
    pub fn parts(&self) -> impl Iterator<Item = (&Polygon, &TimeAxis)> + '_ {
        self.geometry.polygons().into_iter().zip(self.time_axes.iter())
    }
}

/// Intersection of one footprint part of each observation.
#[derive(Debug, Clone)]
pub struct Intersection {
    pub geometry: Geometry,
    pub time_info: TimeInfo,
    pub primary_index: usize,
    pub secondary_index: usize,
}

/// Intersects observations and derives their common acquisition time.
#[derive(Debug, Clone)]
pub struct GeometryIntersector {
    factory: Arc<dyn GeometryFactory>,
}

impl GeometryIntersector {
    pub fn new(factory: Arc<dyn GeometryFactory>) -> Self {
        Self { factory }
    }

    /// Best time information over all intersecting part pairs.
    ///
    /// Overlapping pairs win over separated ones; among separated pairs the
    /// smallest time delta wins. Disjoint observations yield
    /// [`TimeInfo::no_match`].
    pub fn get_intersecting_interval(&self, primary: &Observation, secondary: &Observation) -> SwathResult<TimeInfo> {
        let intersections = self.get_intersecting_intervals(primary, secondary)?;
        let best = intersections
            .into_iter()
            .map(|i| i.time_info)
            .min_by_key(|info| (!info.has_overlap(), info.minimal_time_delta_ms))
            .unwrap_or_else(TimeInfo::no_match);
        Ok(best)
    }

    /// All part pairs whose footprints intersect.
    pub fn get_intersecting_intervals(
        &self,
        primary: &Observation,
        secondary: &Observation,
    ) -> SwathResult<Vec<Intersection>> {
        let mut intersections = Vec::new();
        for (primary_index, (polygon_a, axis_a)) in primary.parts().enumerate() {
            for (secondary_index, (polygon_b, axis_b)) in secondary.parts().enumerate() {
                let (geometry, time_info) = self.intersect_parts(
                    &Geometry::Polygon(polygon_a.clone()),
                    axis_a,
                    &Geometry::Polygon(polygon_b.clone()),
                    axis_b,
                )?;
                if geometry.is_empty() {
                    continue;
                }
                intersections.push(Intersection {
                    geometry,
                    time_info,
                    primary_index,
                    secondary_index,
                });
            }
        }
        debug!(count = intersections.len(), "Intersected observations");
        Ok(intersections)
    }

    /// Intersect two footprints and map the intersection through both
    /// time axes.
    pub fn intersect_parts(
        &self,
        geometry_a: &Geometry,
        axis_a: &TimeAxis,
        geometry_b: &Geometry,
        axis_b: &TimeAxis,
    ) -> SwathResult<(Geometry, TimeInfo)> {
        let intersection = self.factory.intersect(geometry_a, geometry_b)?;
        if intersection.is_empty() {
            trace!("Footprints do not intersect");
            return Ok((intersection, TimeInfo::no_match()));
        }
        trace!(wkt = %wkt::format(&intersection), "Footprints intersect");

        let coordinates = intersection.coordinates();
        let inner = &coordinates[..coordinates.len().saturating_sub(1)];
        let times_a: Vec<DateTime<Utc>> = inner.iter().filter_map(|c| axis_a.get_time(c)).collect();
        let times_b: Vec<DateTime<Utc>> = inner.iter().filter_map(|c| axis_b.get_time(c)).collect();

        let (Some(interval_a), Some(interval_b)) = (TimeInterval::create(&times_a), TimeInterval::create(&times_b)) else {
            trace!(
                mapped_a = times_a.len(),
                mapped_b = times_b.len(),
                "Intersection does not map onto both time axes"
            );
            return Ok((intersection, TimeInfo::no_match()));
        };

        let time_info = match interval_a.intersect(&interval_b) {
            Some(overlap) => TimeInfo::overlapping(overlap),
            None => TimeInfo::separated(calculate_time_delta(&interval_a, &interval_b)),
        };
        Ok((intersection, time_info))
    }
}

/// Gap in milliseconds between two intervals, 0 if they overlap.
pub fn calculate_time_delta(a: &TimeInterval, b: &TimeInterval) -> i64 {
    let (earlier, later) = if a.start() <= b.start() { (a, b) } else { (b, a) };
    (later.start_millis() - earlier.stop_millis()).max(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate_time_delta() {
        let a = TimeInterval::from_millis(2500, 2800).unwrap();
        let b = TimeInterval::from_millis(3000, 3500).unwrap();
        assert_eq!(calculate_time_delta(&a, &b), 200);
        assert_eq!(calculate_time_delta(&b, &a), 200);
    }

    #[test]
    fn test_calculate_time_delta_overlap() {
        let a = TimeInterval::from_millis(1000, 3000).unwrap();
        let b = TimeInterval::from_millis(2000, 2500).unwrap();
        assert_eq!(calculate_time_delta(&a, &b), 0);
    }
}
