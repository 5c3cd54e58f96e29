//! Time interpolation along the along-track axis of a footprint.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use swath_common::{SwathError, SwathResult, TimeInterval};
use tracing::trace;

use crate::factory::GeometryFactory;
use crate::types::{LineString, Point, Polygon};

/// A curve with acquisition start and stop times at its ends.
///
/// The time of any point near the curve is interpolated linearly from the
/// arc-length position of its projection. Axes are immutable once built and
/// can be shared between threads.
#[derive(Debug, Clone)]
pub struct TimeAxis {
    geometry: LineString,
    start: DateTime<Utc>,
    duration_ms: i64,
    length: f64,
    factory: Arc<dyn GeometryFactory>,
}

impl TimeAxis {
    /// Create an axis. Fails if `stop` precedes `start` or if the curve has
    /// zero length under the factory's metric.
    pub fn new(
        geometry: LineString,
        start: DateTime<Utc>,
        stop: DateTime<Utc>,
        factory: Arc<dyn GeometryFactory>,
    ) -> SwathResult<Self> {
        if stop < start {
            return Err(SwathError::degenerate_time_axis(format!(
                "stop time {} precedes start time {}",
                stop, start
            )));
        }

        let length = factory.length(&geometry);
        if !(length > 0.0) || !length.is_finite() {
            return Err(SwathError::degenerate_time_axis(format!(
                "axis geometry has length {} ({} points)",
                length,
                geometry.len()
            )));
        }

        Ok(Self {
            geometry,
            start,
            duration_ms: (stop - start).num_milliseconds(),
            length,
            factory,
        })
    }

    /// Acquisition time of the point, or `None` if it has no projection onto
    /// the axis.
    pub fn get_time(&self, point: &Point) -> Option<DateTime<Utc>> {
        let position = self.factory.project(&self.geometry, point)?;
        Some(self.time_at(position / self.length))
    }

    /// Time span during which the axis runs through the polygon.
    ///
    /// Returns `None` unless the axis enters the polygon exactly once.
    pub fn intersect(&self, polygon: &Polygon) -> SwathResult<Option<TimeInterval>> {
        let ranges = self.factory.clip_line(&self.geometry, polygon)?;
        if ranges.len() != 1 {
            trace!(pieces = ranges.len(), "Axis does not cross polygon exactly once");
            return Ok(None);
        }

        let range = ranges[0];
        let offset = range.start / self.length;
        let fraction = range.len() / self.length;

        let offset_ms = (self.duration_ms as f64 * offset) as i64;
        let length_ms = (self.duration_ms as f64 * fraction) as i64;
        let begin = self.start + Duration::milliseconds(offset_ms);
        let end = begin + Duration::milliseconds(length_ms);
        Ok(Some(TimeInterval::new(begin, end)?))
    }

    /// Times of both ends of a polygon side, ordered.
    pub fn projection_time(&self, side: &LineString) -> Option<TimeInterval> {
        let first = self.get_time(&side.first())?;
        let last = self.get_time(&side.last())?;
        TimeInterval::new(first.min(last), first.max(last)).ok()
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end_time(&self) -> DateTime<Utc> {
        self.start + Duration::milliseconds(self.duration_ms)
    }

    pub fn duration_ms(&self) -> i64 {
        self.duration_ms
    }

    pub fn geometry(&self) -> &LineString {
        &self.geometry
    }

    fn time_at(&self, relative: f64) -> DateTime<Utc> {
        self.start + Duration::milliseconds((self.duration_ms as f64 * relative) as i64)
    }
}
