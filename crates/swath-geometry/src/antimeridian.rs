//! Antimeridian handling for lon/lat rings in the planar backend.
//!
//! Pixel grids that cross ±180° produce rings with longitude jumps of
//! almost 360°. [`normalize_ring`] unwraps those jumps so the ring is
//! continuous (longitudes may leave [-180, 180]), and [`map_to_globe`]
//! cuts such a ring back into pieces that live on the regular globe.

use geo::Coord;
use tracing::trace;

use crate::segment::{intersect_polygons, polygon_to_geo, polygons_from_geo, to_geo_polygon};
use crate::types::{Point, Polygon};

/// Unwrap longitude jumps larger than 180° in place.
///
/// Every point after a jump is shifted by ±360 so that consecutive
/// longitudes differ by less than 180°. If the result extends below -180
/// but not above 180, the whole sequence is moved east by 360.
pub fn normalize_ring(points: &mut [Point]) {
    if points.len() < 2 {
        return;
    }

    let mut offset = 0.0;
    let mut previous = points[0].lon;
    let mut min_lon = f64::INFINITY;
    let mut max_lon = f64::NEG_INFINITY;

    for point in points.iter_mut().skip(1) {
        let original = point.lon;
        let diff = original - previous;
        if diff > 180.0 {
            offset -= 360.0;
        } else if diff < -180.0 {
            offset += 360.0;
        }
        previous = original;
        point.lon = original + offset;
        min_lon = min_lon.min(point.lon);
        max_lon = max_lon.max(point.lon);
    }

    if min_lon < -180.0 && max_lon <= 180.0 {
        for point in points.iter_mut() {
            point.lon += 360.0;
        }
    }
}

/// Whether any vertex of the polygon lies outside [-180, 180].
pub fn leaves_globe(polygon: &Polygon) -> bool {
    polygon.exterior().iter().any(|p| p.lon < -180.0 || p.lon > 180.0)
}

/// Cut a polygon with longitudes in [-540, 540] into pieces inside
/// [-180, 180].
///
/// Pieces are returned in west, central, east order.
pub fn map_to_globe(polygon: &Polygon) -> Vec<Polygon> {
    let shape = polygon_to_geo(polygon, |p| Coord { x: p.lon, y: p.lat });

    let globes = [(-540.0, -180.0, 360.0), (-180.0, 180.0, 0.0), (180.0, 540.0, -360.0)];
    let mut pieces = Vec::new();
    for (west, east, shift) in globes {
        let globe = globe_rect(west, east);
        let clipped = intersect_polygons(&shape, &globe);
        pieces.extend(polygons_from_geo(&clipped, |c| Point::new(c.x + shift, c.y)));
    }

    trace!(pieces = pieces.len(), "Mapped polygon onto globe");
    pieces
}

fn globe_rect(west: f64, east: f64) -> geo::Polygon<f64> {
    to_geo_polygon(
        vec![
            Coord { x: west, y: -90.0 },
            Coord { x: east, y: -90.0 },
            Coord { x: east, y: 90.0 },
            Coord { x: west, y: 90.0 },
            Coord { x: west, y: -90.0 },
        ],
        Vec::new(),
    )
}
