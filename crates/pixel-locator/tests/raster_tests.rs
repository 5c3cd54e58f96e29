//! Tests for regular lon/lat raster locators.

use pixel_locator::{
    index_larger_than, index_smaller_than, LonOrder, OverlappingRasterPixelLocator, PixelLocator, RasterPixelLocator,
};
use swath_common::{BoundingBox, GeoPos, PixelPos};
use test_utils::raster::{east_to_west_lons, BOUNDARY, LATS, LONS, WRAPPING_LATS, WRAPPING_LONS};

fn boundary() -> BoundingBox {
    let (min_x, min_y, max_x, max_y) = BOUNDARY;
    BoundingBox::new(min_x, min_y, max_x, max_y)
}

fn west_to_east() -> RasterPixelLocator {
    RasterPixelLocator::new(LONS.to_vec(), LATS.to_vec(), boundary()).unwrap()
}

fn east_to_west() -> RasterPixelLocator {
    RasterPixelLocator::new(east_to_west_lons(), LATS.to_vec(), boundary()).unwrap()
}

fn wrapping() -> OverlappingRasterPixelLocator {
    OverlappingRasterPixelLocator::new(&WRAPPING_LONS, &WRAPPING_LATS).unwrap()
}

fn pixels(positions: &[(f64, f64)]) -> Vec<PixelPos> {
    positions.iter().map(|&(x, y)| PixelPos::new(x, y)).collect()
}

// ============================================================================
// Axis lookup tests
// ============================================================================

#[test]
fn test_index_larger_than() {
    assert_eq!(index_larger_than(-197.0, &LONS), Some(0));
    assert_eq!(index_larger_than(-176.2, &LONS), Some(0));
    assert_eq!(index_larger_than(-168.3, &LONS), Some(1));
    assert_eq!(index_larger_than(92.4, &LONS), Some(8));
    assert_eq!(index_larger_than(169.1, &LONS), Some(9));
    assert_eq!(index_larger_than(173.5, &LONS), None);
}

#[test]
fn test_index_smaller_than() {
    let lons = east_to_west_lons();
    assert_eq!(index_smaller_than(172.0, &lons), Some(0));
    assert_eq!(index_smaller_than(163.0, &lons), Some(1));
    assert_eq!(index_smaller_than(52.0, &lons), Some(3));
    assert_eq!(index_smaller_than(-112.0, &lons), Some(8));
    assert_eq!(index_smaller_than(-169.4, &lons), Some(9));
    assert_eq!(index_smaller_than(-176.3, &lons), None);
}

// ============================================================================
// RasterPixelLocator tests
// ============================================================================

#[test]
fn test_lon_order_is_detected() {
    assert_eq!(west_to_east().lon_order(), LonOrder::WestToEast);
    assert_eq!(east_to_west().lon_order(), LonOrder::EastToWest);
}

#[test]
fn test_geo_location() {
    let locator = west_to_east();
    assert_eq!(locator.get_geo_location(0.5, 0.5), Some(GeoPos::new(-170.0, -80.0)));
    assert_eq!(locator.get_geo_location(4.5, 2.5), Some(GeoPos::new(-10.0, -20.0)));
    assert_eq!(locator.get_geo_location(9.99, 6.99), Some(GeoPos::new(170.0, 80.0)));
}

#[test]
fn test_geo_location_outside() {
    let locator = west_to_east();
    assert_eq!(locator.get_geo_location(-0.5, 0.5), None);
    assert_eq!(locator.get_geo_location(10.0, 0.5), None);
    assert_eq!(locator.get_geo_location(0.5, 7.0), None);
    assert_eq!(locator.get_geo_location(0.5, -0.01), None);
}

#[test]
fn test_pixel_location() {
    let locator = west_to_east();
    assert_eq!(locator.get_pixel_location(100.0, 20.0), pixels(&[(7.5, 4.5)]));
    assert_eq!(locator.get_pixel_location(-144.0, 0.0), pixels(&[(1.5, 3.5)]));
    assert_eq!(locator.get_pixel_location(-46.0, -20.0), pixels(&[(3.5, 2.5)]));
    assert_eq!(locator.get_pixel_location(10.0, 18.0), pixels(&[(5.5, 4.5)]));
    assert_eq!(locator.get_pixel_location(50.0, 22.0), pixels(&[(6.5, 4.5)]));
}

#[test]
fn test_pixel_location_at_raster_edges() {
    let locator = west_to_east();
    assert_eq!(locator.get_pixel_location(-174.0, 50.0), pixels(&[(0.5, 5.5)]));
    assert_eq!(locator.get_pixel_location(177.0, 80.0), pixels(&[(9.5, 6.5)]));
    assert_eq!(locator.get_pixel_location(-170.0, -84.0), pixels(&[(0.5, 0.5)]));
    assert_eq!(locator.get_pixel_location(-130.0, 84.0), pixels(&[(1.5, 6.5)]));
}

#[test]
fn test_pixel_location_outside_boundary() {
    let locator = west_to_east();
    assert!(locator.get_pixel_location(90.0, -89.0).is_empty());
    assert!(locator.get_pixel_location(130.0, 88.5).is_empty());
    assert!(locator.get_pixel_location(f64::NAN, 0.0).is_empty());
}

#[test]
fn test_east_to_west_raster() {
    let locator = east_to_west();
    assert_eq!(locator.get_geo_location(0.5, 0.5), Some(GeoPos::new(170.0, -80.0)));
    assert_eq!(locator.get_pixel_location(100.0, 20.0), pixels(&[(2.5, 4.5)]));
    assert_eq!(locator.get_pixel_location(-144.0, 0.0), pixels(&[(8.5, 3.5)]));
    assert_eq!(locator.get_pixel_location(-86.0, -20.0), pixels(&[(7.5, 2.5)]));
    assert_eq!(locator.get_pixel_location(10.0, 18.0), pixels(&[(4.5, 4.5)]));
    assert_eq!(locator.get_pixel_location(50.0, 22.0), pixels(&[(3.5, 4.5)]));
    assert_eq!(locator.get_pixel_location(-174.0, 50.0), pixels(&[(9.5, 5.5)]));
    assert_eq!(locator.get_pixel_location(177.0, 80.0), pixels(&[(0.5, 6.5)]));
}

#[test]
fn test_raster_round_trip() {
    let locator = west_to_east();
    for x in 0..LONS.len() {
        for y in 0..LATS.len() {
            let centre = (x as f64 + 0.5, y as f64 + 0.5);
            let geo = locator.get_geo_location(centre.0, centre.1).unwrap();
            assert_eq!(locator.get_pixel_location(geo.lon, geo.lat), pixels(&[centre]));
        }
    }
}

// ============================================================================
// OverlappingRasterPixelLocator tests
// ============================================================================

#[test]
fn test_wrapping_axis_has_two_segments() {
    let locator = wrapping();
    assert_eq!(locator.segment_count(), 2);
    assert_eq!(locator.segment_offsets(), vec![0, 8]);
    assert_eq!(
        locator.segment_boundaries(),
        vec![
            BoundingBox::new(-172.5, -90.0, 22.5, 90.0),
            BoundingBox::new(-7.5, -90.0, 172.5, 90.0),
        ]
    );
}

#[test]
fn test_jump_after_first_sample() {
    let lons = [-165.0, 165.0, 135.0];
    let locator = OverlappingRasterPixelLocator::new(&lons, &[0.0, 1.0]).unwrap();
    assert_eq!(locator.segment_offsets(), vec![0, 1]);
}

#[test]
fn test_wrapping_geo_location() {
    let locator = wrapping();
    assert_eq!(locator.get_geo_location(0.5, 0.5), Some(GeoPos::new(15.0, -75.0)));
    assert_eq!(locator.get_geo_location(13.5, 1.5), Some(GeoPos::new(15.0, -45.0)));
    assert_eq!(locator.get_geo_location(7.5, 2.5), Some(GeoPos::new(-165.0, -15.0)));
    assert_eq!(locator.get_geo_location(8.5, 2.5), Some(GeoPos::new(165.0, -15.0)));
}

#[test]
fn test_wrapping_geo_location_outside() {
    let locator = wrapping();
    assert_eq!(locator.get_geo_location(-0.5, 1.5), None);
    assert_eq!(locator.get_geo_location(15.5, 1.5), None);
    assert_eq!(locator.get_geo_location(3.5, -0.5), None);
    assert_eq!(locator.get_geo_location(3.5, 6.5), None);
}

#[test]
fn test_wrapping_pixel_location_single_segment() {
    let locator = wrapping();
    assert_eq!(locator.get_pixel_location(105.0, -45.0), pixels(&[(10.5, 1.5)]));
    assert_eq!(locator.get_pixel_location(134.0, -15.0), pixels(&[(9.5, 2.5)]));
    assert_eq!(locator.get_pixel_location(167.0, 15.0), pixels(&[(8.5, 3.5)]));
    assert_eq!(locator.get_pixel_location(-15.0, 43.0), pixels(&[(2.5, 4.5)]));
    assert_eq!(locator.get_pixel_location(-15.0, 47.0), pixels(&[(2.5, 4.5)]));
    assert_eq!(locator.get_pixel_location(-15.0, 80.0), pixels(&[(2.5, 5.5)]));
    assert_eq!(locator.get_pixel_location(-15.0, -80.0), pixels(&[(2.5, 0.5)]));
}

#[test]
fn test_wrapping_pixel_location_across_antimeridian() {
    let locator = wrapping();
    assert_eq!(locator.get_pixel_location(-171.0, -45.0), pixels(&[(7.5, 1.5)]));
    assert_eq!(locator.get_pixel_location(171.0, -45.0), pixels(&[(8.5, 1.5)]));
}

#[test]
fn test_wrapping_pixel_location_in_both_segments() {
    let locator = wrapping();
    assert_eq!(locator.get_pixel_location(15.0, -45.0), pixels(&[(0.5, 1.5), (13.5, 1.5)]));
    assert_eq!(locator.get_pixel_location(-6.0, -15.0), pixels(&[(1.5, 2.5), (14.5, 2.5)]));
    assert_eq!(locator.get_pixel_location(22.0, -15.0), pixels(&[(0.5, 2.5), (13.5, 2.5)]));
}

#[test]
fn test_wrapping_pixel_location_outside() {
    let locator = wrapping();
    assert!(locator.get_pixel_location(90.0, -91.0).is_empty());
    assert!(locator.get_pixel_location(130.0, 92.0).is_empty());
}
