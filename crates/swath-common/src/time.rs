//! Acquisition time intervals and intersection results.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{SwathError, SwathResult};

/// Sentinel time delta reported when two observations do not intersect.
pub const MAX_TIME_DELTA_MS: i64 = i32::MAX as i64;

/// Convert epoch milliseconds to a UTC timestamp.
pub fn datetime_from_millis(millis: i64) -> SwathResult<DateTime<Utc>> {
    Utc.timestamp_millis_opt(millis)
        .single()
        .ok_or_else(|| SwathError::invalid_argument(format!("timestamp out of range: {} ms", millis)))
}

/// A closed time interval `[start, stop]` with `start <= stop`.
///
/// "No interval" is expressed as `Option<TimeInterval>::None` rather than an
/// inverted sentinel value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeInterval {
    start: DateTime<Utc>,
    stop: DateTime<Utc>,
}

impl TimeInterval {
    /// Create an interval, failing if `stop` precedes `start`.
    pub fn new(start: DateTime<Utc>, stop: DateTime<Utc>) -> SwathResult<Self> {
        if stop < start {
            return Err(SwathError::invalid_argument(format!(
                "interval stop {} precedes start {}",
                stop, start
            )));
        }
        Ok(Self { start, stop })
    }

    /// Create an interval from epoch milliseconds.
    pub fn from_millis(start_ms: i64, stop_ms: i64) -> SwathResult<Self> {
        Self::new(datetime_from_millis(start_ms)?, datetime_from_millis(stop_ms)?)
    }

    /// Smallest interval covering all given times, or `None` for an empty slice.
    pub fn create(times: &[DateTime<Utc>]) -> Option<Self> {
        let start = times.iter().min()?;
        let stop = times.iter().max()?;
        Some(Self {
            start: *start,
            stop: *stop,
        })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn stop(&self) -> DateTime<Utc> {
        self.stop
    }

    pub fn start_millis(&self) -> i64 {
        self.start.timestamp_millis()
    }

    pub fn stop_millis(&self) -> i64 {
        self.stop.timestamp_millis()
    }

    /// Length of the interval in milliseconds.
    pub fn duration_ms(&self) -> i64 {
        (self.stop - self.start).num_milliseconds()
    }

    /// Check whether a timestamp lies within the interval (inclusive).
    pub fn contains(&self, time: DateTime<Utc>) -> bool {
        time >= self.start && time <= self.stop
    }

    /// Common part of two intervals, or `None` if they do not overlap.
    pub fn intersect(&self, other: &TimeInterval) -> Option<TimeInterval> {
        let start = self.start.max(other.start);
        let stop = self.stop.min(other.stop);
        if start > stop {
            return None;
        }
        Some(TimeInterval { start, stop })
    }
}

/// Temporal part of an intersection between two observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeInfo {
    /// Time span covered by both observations, if any.
    pub overlap_interval: Option<TimeInterval>,
    /// Smallest time difference between the observations in milliseconds.
    pub minimal_time_delta_ms: i64,
}

impl TimeInfo {
    /// Result for observations that do not intersect at all.
    pub fn no_match() -> Self {
        Self {
            overlap_interval: None,
            minimal_time_delta_ms: MAX_TIME_DELTA_MS,
        }
    }

    /// Result for observations acquired at a common time.
    pub fn overlapping(interval: TimeInterval) -> Self {
        Self {
            overlap_interval: Some(interval),
            minimal_time_delta_ms: 0,
        }
    }

    /// Result for spatially intersecting observations separated in time.
    pub fn separated(time_delta_ms: i64) -> Self {
        Self {
            overlap_interval: None,
            minimal_time_delta_ms: time_delta_ms,
        }
    }

    pub fn has_overlap(&self) -> bool {
        self.overlap_interval.is_some()
    }

    /// Whether this is the "no spatial intersection" result.
    pub fn is_no_match(&self) -> bool {
        self.overlap_interval.is_none() && self.minimal_time_delta_ms == MAX_TIME_DELTA_MS
    }
}

impl Default for TimeInfo {
    fn default() -> Self {
        Self::no_match()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interval(start: i64, stop: i64) -> TimeInterval {
        TimeInterval::from_millis(start, stop).unwrap()
    }

    #[test]
    fn test_new_rejects_inverted() {
        let start = datetime_from_millis(2000).unwrap();
        let stop = datetime_from_millis(1000).unwrap();
        assert!(TimeInterval::new(start, stop).is_err());
        assert!(TimeInterval::new(stop, start).is_ok());
    }

    #[test]
    fn test_create_from_times() {
        let times: Vec<_> = [1500, 1200, 1900, 1300]
            .iter()
            .map(|ms| datetime_from_millis(*ms).unwrap())
            .collect();
        let created = TimeInterval::create(&times).unwrap();
        assert_eq!(created.start_millis(), 1200);
        assert_eq!(created.stop_millis(), 1900);

        assert!(TimeInterval::create(&[]).is_none());
    }

    #[test]
    fn test_intersect_overlapping() {
        let a = interval(1000, 2000);
        let b = interval(1666, 2500);
        let overlap = a.intersect(&b).unwrap();
        assert_eq!(overlap.start_millis(), 1666);
        assert_eq!(overlap.stop_millis(), 2000);
        assert_eq!(b.intersect(&a), Some(overlap));
    }

    #[test]
    fn test_intersect_disjoint() {
        let a = interval(2500, 2800);
        let b = interval(3000, 3500);
        assert!(a.intersect(&b).is_none());
        assert!(b.intersect(&a).is_none());
    }

    #[test]
    fn test_intersect_touching() {
        let a = interval(1000, 2000);
        let b = interval(2000, 3000);
        let overlap = a.intersect(&b).unwrap();
        assert_eq!(overlap.duration_ms(), 0);
    }

    #[test]
    fn test_time_info_constructors() {
        let none = TimeInfo::no_match();
        assert!(none.is_no_match());
        assert!(!none.has_overlap());
        assert_eq!(none.minimal_time_delta_ms, MAX_TIME_DELTA_MS);

        let overlap = TimeInfo::overlapping(interval(1666, 2000));
        assert!(overlap.has_overlap());
        assert_eq!(overlap.minimal_time_delta_ms, 0);

        let separated = TimeInfo::separated(333);
        assert!(!separated.has_overlap());
        assert!(!separated.is_no_match());
    }

    #[test]
    fn test_time_info_serde() {
        let info = TimeInfo::overlapping(interval(1000, 2000));
        let json = serde_json::to_string(&info).unwrap();
        let back: TimeInfo = serde_json::from_str(&json).unwrap();
        assert_eq!(info, back);
    }
}
