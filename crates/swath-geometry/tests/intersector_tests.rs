//! Tests for intersecting observations in space and time.

use std::sync::Arc;

use swath_common::SwathError;
use swath_geometry::{
    create_factory, wkt, Geometry, GeometryBackend, GeometryFactory, GeometryIntersector, MultiPolygon, Observation,
    TimeAxis,
};
use test_utils::footprints::*;
use test_utils::{assert_approx_eq, millis};

fn planar() -> Arc<dyn GeometryFactory> {
    create_factory(GeometryBackend::Planar)
}

fn spherical() -> Arc<dyn GeometryFactory> {
    create_factory(GeometryBackend::Spherical)
}

fn time_axis(line: &str, start: i64, stop: i64) -> TimeAxis {
    time_axis_on(planar(), line, start, stop)
}

fn time_axis_on(factory: Arc<dyn GeometryFactory>, line: &str, start: i64, stop: i64) -> TimeAxis {
    TimeAxis::new(wkt::parse_line_string(line).unwrap(), millis(start), millis(stop), factory).unwrap()
}

fn observation(polygon: &str, axis: &str) -> Observation {
    observation_at(polygon, axis, START_MS, STOP_MS)
}

fn observation_at(polygon: &str, axis: &str, start: i64, stop: i64) -> Observation {
    Observation::single(wkt::parse_polygon(polygon).unwrap(), time_axis(axis, start, stop))
}

fn intersector() -> GeometryIntersector {
    GeometryIntersector::new(planar())
}

fn overlap_ms(a: &Observation, b: &Observation) -> Option<(i64, i64)> {
    let info = intersector().get_intersecting_interval(a, b).unwrap();
    info.overlap_interval.map(|i| (i.start_millis(), i.stop_millis()))
}

// ============================================================================
// get_intersecting_interval tests
// ============================================================================

#[test]
fn test_no_intersection() {
    let a = observation(NORTHWARD, NORTHWARD_AXIS);
    let b = observation(WESTERN, WESTERN_AXIS);
    let info = intersector().get_intersecting_interval(&a, &b).unwrap();
    assert!(info.is_no_match());
    assert!(!info.has_overlap());
}

#[test]
fn test_ascending_and_descending_overlap() {
    let a = observation(NORTHWARD, NORTHWARD_AXIS);
    let b = observation(UPPER, UPPER_AXIS);
    let info = intersector().get_intersecting_interval(&a, &b).unwrap();
    let interval = info.overlap_interval.unwrap();
    assert_eq!((interval.start_millis(), interval.stop_millis()), (1666, 2000));
    assert_eq!(info.minimal_time_delta_ms, 0);
}

#[test]
fn test_same_direction_without_common_time() {
    let a = observation(SOUTHWARD, SOUTHWARD_AXIS);
    let b = observation(UPPER, UPPER_AXIS);
    let info = intersector().get_intersecting_interval(&a, &b).unwrap();
    assert!(info.overlap_interval.is_none());
    assert_eq!(info.minimal_time_delta_ms, 333);
    assert!(!info.is_no_match());
}

#[test]
fn test_same_direction_partial_overlap() {
    let a = observation(SOUTHWARD, SOUTHWARD_AXIS);
    let b = observation(MIDDLE, MIDDLE_AXIS);
    assert_eq!(overlap_ms(&a, &b), Some((1333, 1666)));
}

#[test]
fn test_identical_observations() {
    let a = observation(SOUTHWARD, SOUTHWARD_AXIS);
    let b = observation(SOUTHWARD, SOUTHWARD_AXIS);
    assert_eq!(overlap_ms(&a, &b), Some((1000, 2000)));
}

#[test]
fn test_slanted_and_diagonal() {
    let a = observation(SLANTED, SLANTED_AXIS);
    let b = observation(DIAGONAL, DIAGONAL_AXIS);
    assert_eq!(overlap_ms(&a, &b), Some((1000, 1833)));
}

#[test]
fn test_slanted_and_diagonal_acquired_later() {
    let a = observation_at(SLANTED, SLANTED_AXIS, 1900, 2900);
    let b = observation(DIAGONAL, DIAGONAL_AXIS);
    let info = intersector().get_intersecting_interval(&a, &b).unwrap();
    assert!(info.overlap_interval.is_none());
    assert_eq!(info.minimal_time_delta_ms, 67);
}

#[test]
fn test_negative_longitudes() {
    let a = observation(SHIFTED_WEST, SHIFTED_WEST_AXIS);
    let b = observation(SHIFTED_EAST, SHIFTED_EAST_AXIS);
    assert_eq!(overlap_ms(&a, &b), Some((1000, 1500)));
}

#[test]
fn test_argument_order_does_not_change_delta() {
    let a = observation(SOUTHWARD, SOUTHWARD_AXIS);
    let b = observation(UPPER, UPPER_AXIS);
    let forward = intersector().get_intersecting_interval(&a, &b).unwrap();
    let backward = intersector().get_intersecting_interval(&b, &a).unwrap();
    assert_eq!(forward, backward);
}

// ============================================================================
// Multi-part observation tests
// ============================================================================

fn split_observation() -> Observation {
    let geometry = Geometry::MultiPolygon(MultiPolygon(vec![
        wkt::parse_polygon(WESTERN).unwrap(),
        wkt::parse_polygon(MIDDLE).unwrap(),
    ]));
    Observation::new(
        geometry,
        vec![
            time_axis(WESTERN_AXIS, START_MS, STOP_MS),
            time_axis(MIDDLE_AXIS, START_MS, STOP_MS),
        ],
    )
    .unwrap()
}

#[test]
fn test_observation_requires_one_axis_per_part() {
    let geometry = Geometry::MultiPolygon(MultiPolygon(vec![
        wkt::parse_polygon(WESTERN).unwrap(),
        wkt::parse_polygon(MIDDLE).unwrap(),
    ]));
    let result = Observation::new(geometry, vec![time_axis(WESTERN_AXIS, START_MS, STOP_MS)]);
    assert!(matches!(result, Err(SwathError::InvalidArgument(_))));
}

#[test]
fn test_observation_requires_polygon() {
    let result = Observation::new(Geometry::empty(), Vec::new());
    assert!(matches!(result, Err(SwathError::InvalidGeometry(_))));
}

#[test]
fn test_intersecting_intervals_report_part_indices() {
    let split = split_observation();
    let single = observation(SOUTHWARD, SOUTHWARD_AXIS);

    let intersections = intersector().get_intersecting_intervals(&single, &split).unwrap();
    assert_eq!(intersections.len(), 1);
    assert_eq!(intersections[0].primary_index, 0);
    assert_eq!(intersections[0].secondary_index, 1);
    assert!(intersections[0].time_info.has_overlap());
}

#[test]
fn test_best_interval_over_parts() {
    let split = split_observation();
    let single = observation(SOUTHWARD, SOUTHWARD_AXIS);
    assert_eq!(overlap_ms(&single, &split), Some((1333, 1666)));
}

// ============================================================================
// intersect_parts tests
// ============================================================================

#[test]
fn test_intersect_parts_returns_geometry() {
    let a = wkt::parse_polygon(SOUTHWARD).unwrap();
    let b = wkt::parse_polygon(MIDDLE).unwrap();
    let (geometry, info) = intersector()
        .intersect_parts(
            &Geometry::Polygon(a),
            &time_axis(SOUTHWARD_AXIS, START_MS, STOP_MS),
            &Geometry::Polygon(b),
            &time_axis(MIDDLE_AXIS, START_MS, STOP_MS),
        )
        .unwrap();

    let parts = geometry.polygons();
    assert_eq!(parts.len(), 1);
    let bbox = parts[0].bbox();
    assert_eq!((bbox.min_x, bbox.min_y, bbox.max_x, bbox.max_y), (2.0, 2.0, 3.0, 4.0));
    assert!(info.has_overlap());
}

#[test]
fn test_intersect_parts_disjoint_is_empty() {
    let (geometry, info) = intersector()
        .intersect_parts(
            &Geometry::Polygon(wkt::parse_polygon(NORTHWARD).unwrap()),
            &time_axis(NORTHWARD_AXIS, START_MS, STOP_MS),
            &Geometry::Polygon(wkt::parse_polygon(WESTERN).unwrap()),
            &time_axis(WESTERN_AXIS, START_MS, STOP_MS),
        )
        .unwrap();
    assert!(geometry.is_empty());
    assert!(info.is_no_match());
}

// ============================================================================
// Spherical backend tests
// ============================================================================

fn spherical_observation(polygon: &str, axis: &str, start: i64, stop: i64) -> Observation {
    Observation::single(
        wkt::parse_polygon(polygon).unwrap(),
        time_axis_on(spherical(), axis, start, stop),
    )
}

fn spherical_info(a: &Observation, b: &Observation) -> swath_common::TimeInfo {
    GeometryIntersector::new(spherical())
        .get_intersecting_interval(a, b)
        .unwrap()
}

#[test]
fn test_spherical_ascending_and_descending_overlap() {
    let a = spherical_observation(NORTHWARD, NORTHWARD_AXIS, START_MS, STOP_MS);
    let b = spherical_observation(UPPER, UPPER_AXIS, START_MS, STOP_MS);
    let info = spherical_info(&a, &b);
    let interval = info.overlap_interval.unwrap();
    assert_eq!((interval.start_millis(), interval.stop_millis()), (1666, 2000));
    assert_eq!(info.minimal_time_delta_ms, 0);
}

#[test]
fn test_spherical_same_direction_without_common_time() {
    let a = spherical_observation(SOUTHWARD, SOUTHWARD_AXIS, START_MS, STOP_MS);
    let b = spherical_observation(UPPER, UPPER_AXIS, START_MS, STOP_MS);
    let info = spherical_info(&a, &b);
    assert!(info.overlap_interval.is_none());
    assert_eq!(info.minimal_time_delta_ms, 333);
}

#[test]
fn test_spherical_slanted_and_diagonal() {
    let a = spherical_observation(SLANTED, SLANTED_AXIS, START_MS, STOP_MS);
    let b = spherical_observation(DIAGONAL, DIAGONAL_AXIS, START_MS, STOP_MS);
    let interval = spherical_info(&a, &b).overlap_interval.unwrap();
    // great-circle edges move the corners by a fraction of a millisecond
    assert_approx_eq!(interval.start_millis() as f64, 1000.0, 2.0);
    assert_approx_eq!(interval.stop_millis() as f64, 1833.0, 2.0);
}

#[test]
fn test_spherical_no_intersection() {
    let a = spherical_observation(NORTHWARD, NORTHWARD_AXIS, START_MS, STOP_MS);
    let b = spherical_observation(WESTERN, WESTERN_AXIS, START_MS, STOP_MS);
    assert!(spherical_info(&a, &b).is_no_match());
}

#[test]
fn test_spherical_wide_footprints() {
    // Two blocks of a long equatorial pass, 90 and 93 degrees wide
    let a = spherical_observation(
        "POLYGON((0 -10, 90 -10, 90 10, 0 10, 0 -10))",
        "LINESTRING(0 0, 90 0)",
        START_MS,
        STOP_MS,
    );
    let b = spherical_observation(
        "POLYGON((85 -10, 178 -10, 178 10, 85 10, 85 -10))",
        "LINESTRING(85 0, 178 0)",
        START_MS,
        STOP_MS,
    );

    let intersections = GeometryIntersector::new(spherical())
        .get_intersecting_intervals(&a, &b)
        .unwrap();
    assert_eq!(intersections.len(), 1);
    let bbox = intersections[0].geometry.polygons()[0].bbox();
    assert_approx_eq!(bbox.min_x, 85.0, 1e-6);
    assert_approx_eq!(bbox.max_x, 90.0, 1e-6);

    // a sees the overlap from 1944 ms, b leaves it at 1053 ms
    let info = spherical_info(&a, &b);
    assert!(!info.is_no_match());
    assert!(info.overlap_interval.is_none());
    assert_eq!(info.minimal_time_delta_ms, 891);
}

#[test]
fn test_spherical_wide_footprints_acquired_together() {
    let a = spherical_observation(
        "POLYGON((0 -10, 90 -10, 90 10, 0 10, 0 -10))",
        "LINESTRING(0 0, 90 0)",
        START_MS,
        STOP_MS,
    );
    let b = spherical_observation(
        "POLYGON((85 -10, 178 -10, 178 10, 85 10, 85 -10))",
        "LINESTRING(85 0, 178 0)",
        1900,
        2900,
    );
    let interval = spherical_info(&a, &b).overlap_interval.unwrap();
    assert_eq!(interval.start_millis(), 1944);
    assert_eq!(interval.stop_millis(), 1953);
}
