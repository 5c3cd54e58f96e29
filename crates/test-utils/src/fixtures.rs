//! Common test fixtures for footprint and pixel-locator tests.
//!
//! This module provides pre-defined footprints, time axes and raster axes
//! that represent common matchup scenarios.

use chrono::{DateTime, TimeZone, Utc};

/// Timestamp from epoch milliseconds.
///
/// Panics for values outside chrono's range, which never occur in fixtures.
pub fn millis(ms: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(ms)
        .single()
        .unwrap_or_else(|| panic!("timestamp out of range: {} ms", ms))
}

/// Footprints and time axes of small synthetic observations.
///
/// Each scenario pairs a polygon with the axis it is sampled along; unless
/// noted, both observations run from 1000 ms to 2000 ms.
pub mod footprints {
    /// Column from (2, 1) to (3, 4), flown northwards.
    pub const NORTHWARD: &str = "POLYGON((2 1,3 1,3 2,3 3,3 4,2 4,2 3,2 2,2 1))";
    pub const NORTHWARD_AXIS: &str = "LINESTRING(2 1,2 2,2 3,2 4)";

    /// Same column flown southwards.
    pub const SOUTHWARD: &str = "POLYGON((2 4,2 3,2 2,2 1,3 1,3 2,3 3,3 4,2 4))";
    pub const SOUTHWARD_AXIS: &str = "LINESTRING(2 4,2 3,2 2,2 1)";

    /// Column west of the others, no overlap with any of them.
    pub const WESTERN: &str = "POLYGON((0 5,0 4,0 3,0 2,1 2,1 3,1 4,1 5,0 5))";
    pub const WESTERN_AXIS: &str = "LINESTRING(0 5,0 4,0 3,0 2)";

    /// Column from (2, 3) to (3, 6), flown southwards.
    pub const UPPER: &str = "POLYGON((2 6,2 5,2 4,2 3,3 3,3 4,3 5,3 6,2 6))";
    pub const UPPER_AXIS: &str = "LINESTRING(2 6,2 5,2 4,2 3)";

    /// Column from (2, 2) to (3, 5), flown southwards.
    pub const MIDDLE: &str = "POLYGON((2 5,2 4,2 3,2 2,3 2,3 3,3 4,3 5,2 5))";
    pub const MIDDLE_AXIS: &str = "LINESTRING(2 5,2 4,2 3,2 2)";

    /// Column with a slanted northern end.
    pub const SLANTED: &str = "POLYGON((3 1,3 2,3 3,4 4,2 4,2 3,2 2,2 1,3 1))";
    pub const SLANTED_AXIS: &str = "LINESTRING(3 1,3 2,3 3,3 4)";

    /// Band running diagonally to the north-east.
    pub const DIAGONAL: &str = "POLYGON((2 1,3 2,4 3,5 4,4 5,3 4,2 3,1 2,2 1))";
    pub const DIAGONAL_AXIS: &str = "LINESTRING(2 1,3 2,4 3,5 4)";

    /// Column at negative longitudes, flown southwards.
    pub const SHIFTED_WEST: &str = "POLYGON((-4 2,-4 1,-4 0,-4 -1,-4 -2,-3 -2,-3 -1,-3 0,-3 1,-3 2,-4 2))";
    pub const SHIFTED_WEST_AXIS: &str = "LINESTRING(-4 2,-4 1,-4 0,-4 -1,-4 -2)";

    /// Column overlapping the eastern half of [`SHIFTED_WEST`].
    pub const SHIFTED_EAST: &str = "POLYGON((-2.5 0,-2.5 1,-2.5 2,-2.5 3,-3.5 3,-3.5 2,-3.5 1,-3.5 0,-2.5 0))";
    pub const SHIFTED_EAST_AXIS: &str = "LINESTRING(-2.5 0,-2.5 1,-2.5 2,-2.5 3)";

    pub const START_MS: i64 = 1000;
    pub const STOP_MS: i64 = 2000;
}

/// Regular raster axes.
pub mod raster {
    /// Ten longitudes from -170 to 170, west to east.
    pub const LONS: [f64; 10] = [-170.0, -130.0, -90.0, -50.0, -10.0, 10.0, 50.0, 90.0, 130.0, 170.0];

    /// Seven latitudes from -80 to 80, south to north.
    pub const LATS: [f64; 7] = [-80.0, -50.0, -20.0, 0.0, 20.0, 50.0, 80.0];

    /// Boundary of the [`LONS`] x [`LATS`] raster.
    pub const BOUNDARY: (f64, f64, f64, f64) = (-180.0, -88.0, 180.0, 88.0);

    /// Longitudes of a sensor scanning westwards across the antimeridian,
    /// in the 0..360 convention.
    pub const WRAPPING_LONS: [f64; 15] = [
        15.0, 0.0, 345.0, 315.0, 285.0, 255.0, 225.0, 195.0, 165.0, 135.0, 105.0, 75.0, 45.0, 15.0, 0.0,
    ];

    /// Latitudes paired with [`WRAPPING_LONS`].
    pub const WRAPPING_LATS: [f64; 6] = [-75.0, -45.0, -15.0, 15.0, 45.0, 75.0];

    /// Descending longitudes, east to west.
    pub fn east_to_west_lons() -> Vec<f64> {
        LONS.iter().rev().copied().collect()
    }
}
