//! Cartesian lon/lat backend.

use geo::Coord;
use swath_common::{SwathError, SwathResult};
use tracing::trace;

use crate::antimeridian::{leaves_globe, map_to_globe};
use crate::factory::{GeometryBackend, GeometryFactory, LineRange};
use crate::segment::{intersect_polygons, merge_ranges, polygon_to_geo, polygons_from_geo, ring_is_simple, segment_inside_ranges};
use crate::types::{Geometry, LineString, MultiPolygon, Point, Polygon};

const RANGE_TOLERANCE: f64 = 1e-9;

fn coord(p: &Point) -> Coord<f64> {
    Coord { x: p.lon, y: p.lat }
}

/// Treats longitude and latitude as plane coordinates.
///
/// Polygons whose longitudes leave [-180, 180] (after antimeridian
/// normalisation) are mapped onto the globe before intersecting.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlanarGeometryFactory;

impl PlanarGeometryFactory {
    fn operand_polygons(geometry: &Geometry) -> SwathResult<Vec<Polygon>> {
        if let Geometry::MultiPolygon(mp) = geometry {
            if mp.is_empty() {
                return Ok(Vec::new());
            }
        }
        let polygons = geometry.polygons();
        if polygons.is_empty() {
            return Err(SwathError::invalid_argument("intersection operands must be polygonal"));
        }
        let mut out = Vec::with_capacity(polygons.len());
        for polygon in polygons {
            if leaves_globe(polygon) {
                out.extend(map_to_globe(polygon));
            } else {
                out.push(polygon.clone());
            }
        }
        Ok(out)
    }

    fn cumulative_lengths(line: &LineString) -> Vec<f64> {
        let mut cumulative = Vec::with_capacity(line.len());
        let mut total = 0.0;
        cumulative.push(total);
        for (a, b) in line.segments() {
            total += (b.lon - a.lon).hypot(b.lat - a.lat);
            cumulative.push(total);
        }
        cumulative
    }

    fn project_once(line: &LineString, cumulative: &[f64], point: &Point) -> Option<f64> {
        for (i, (a, b)) in line.segments().enumerate() {
            let dx = b.lon - a.lon;
            let dy = b.lat - a.lat;
            let len2 = dx * dx + dy * dy;
            if len2 == 0.0 {
                continue;
            }
            let r = ((point.lon - a.lon) * dx + (point.lat - a.lat) * dy) / len2;
            if (0.0..=1.0).contains(&r) {
                return Some((1.0 - r) * cumulative[i] + r * cumulative[i + 1]);
            }
        }
        None
    }
}

impl GeometryFactory for PlanarGeometryFactory {
    fn backend(&self) -> GeometryBackend {
        GeometryBackend::Planar
    }

    fn intersect(&self, a: &Geometry, b: &Geometry) -> SwathResult<Geometry> {
        let left = Self::operand_polygons(a)?;
        let right = Self::operand_polygons(b)?;

        let mut pieces = Vec::new();
        for pa in &left {
            let ga = polygon_to_geo(pa, coord);
            let bbox_a = pa.bbox();
            for pb in &right {
                if !bbox_a.intersects(&pb.bbox()) {
                    continue;
                }
                let gb = polygon_to_geo(pb, coord);
                let result = intersect_polygons(&ga, &gb);
                pieces.extend(polygons_from_geo(&result, |c| Point::new(c.x, c.y)));
            }
        }

        trace!(pieces = pieces.len(), "Planar intersection");
        Ok(match pieces.len() {
            0 => Geometry::empty(),
            1 => Geometry::Polygon(pieces.remove(0)),
            _ => Geometry::MultiPolygon(MultiPolygon(pieces)),
        })
    }

    fn is_simple(&self, polygon: &Polygon) -> bool {
        let exterior: Vec<Coord<f64>> = polygon.exterior().iter().map(coord).collect();
        ring_is_simple(&exterior)
            && polygon.interiors().iter().all(|ring| {
                let ring: Vec<Coord<f64>> = ring.iter().map(coord).collect();
                ring_is_simple(&ring)
            })
    }

    fn length(&self, line: &LineString) -> f64 {
        Self::cumulative_lengths(line).last().copied().unwrap_or(0.0)
    }

    /// Uses the first segment whose projection factor lies in [0, 1], so a
    /// point beyond a convex corner of the line has no projection.
    fn project(&self, line: &LineString, point: &Point) -> Option<f64> {
        let cumulative = Self::cumulative_lengths(line);
        if let Some(position) = Self::project_once(line, &cumulative, point) {
            return Some(position);
        }

        // A line normalised across the antimeridian may sit a globe away.
        let bbox = line.bbox();
        if bbox.max_x > 180.0 {
            if let Some(position) = Self::project_once(line, &cumulative, &point.shifted(360.0)) {
                return Some(position);
            }
        }
        if bbox.min_x < -180.0 {
            return Self::project_once(line, &cumulative, &point.shifted(-360.0));
        }
        None
    }

    fn clip_line(&self, line: &LineString, polygon: &Polygon) -> SwathResult<Vec<LineRange>> {
        let shape = polygon_to_geo(polygon, coord);
        let cumulative = Self::cumulative_lengths(line);

        let mut ranges = Vec::new();
        for (i, (a, b)) in line.segments().enumerate() {
            let seg_len = cumulative[i + 1] - cumulative[i];
            for (t0, t1) in segment_inside_ranges(coord(&a), coord(&b), &shape) {
                ranges.push((cumulative[i] + t0 * seg_len, cumulative[i] + t1 * seg_len));
            }
        }

        Ok(merge_ranges(ranges, RANGE_TOLERANCE)
            .into_iter()
            .filter(|(start, end)| end - start > RANGE_TOLERANCE)
            .map(|(start, end)| LineRange::new(start, end))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wkt;

    fn polygon(text: &str) -> Polygon {
        wkt::parse_polygon(text).unwrap()
    }

    fn line(text: &str) -> LineString {
        wkt::parse_line_string(text).unwrap()
    }

    #[test]
    fn test_length() {
        let factory = PlanarGeometryFactory;
        assert!((factory.length(&line("LINESTRING(0 0, 3 4, 3 5)")) - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_project_first_matching_segment() {
        let factory = PlanarGeometryFactory;
        let axis = line("LINESTRING(0 0, 4 0)");
        assert_eq!(factory.project(&axis, &Point::new(2.0, 1.0)), Some(2.0));
        assert_eq!(factory.project(&axis, &Point::new(5.0, 0.0)), None);
    }

    #[test]
    fn test_project_across_antimeridian() {
        let factory = PlanarGeometryFactory;
        let axis = line("LINESTRING(170 0, 190 0)");
        let position = factory.project(&axis, &Point::new(-175.0, 0.0)).unwrap();
        assert!((position - 15.0).abs() < 1e-12);
    }

    #[test]
    fn test_intersect_overlapping_squares() {
        let factory = PlanarGeometryFactory;
        let a = Geometry::Polygon(polygon("POLYGON((0 0,0 2,2 2,2 0,0 0))"));
        let b = Geometry::Polygon(polygon("POLYGON((1 1,1 3,3 3,3 1,1 1))"));
        let result = factory.intersect(&a, &b).unwrap();
        let parts = result.polygons();
        assert_eq!(parts.len(), 1);
        let bbox = parts[0].bbox();
        assert_eq!((bbox.min_x, bbox.min_y, bbox.max_x, bbox.max_y), (1.0, 1.0, 2.0, 2.0));
    }

    #[test]
    fn test_intersect_disjoint_is_empty() {
        let factory = PlanarGeometryFactory;
        let a = Geometry::Polygon(polygon("POLYGON((0 0,0 1,1 1,1 0,0 0))"));
        let b = Geometry::Polygon(polygon("POLYGON((5 5,5 6,6 6,6 5,5 5))"));
        assert!(factory.intersect(&a, &b).unwrap().is_empty());
        assert!(factory.intersect(&a, &Geometry::empty()).unwrap().is_empty());
    }

    #[test]
    fn test_intersect_rejects_lines() {
        let factory = PlanarGeometryFactory;
        let a = Geometry::LineString(line("LINESTRING(0 0, 1 1)"));
        let b = Geometry::Polygon(polygon("POLYGON((0 0,0 1,1 1,1 0,0 0))"));
        assert!(factory.intersect(&a, &b).is_err());
    }

    #[test]
    fn test_intersect_across_antimeridian() {
        let factory = PlanarGeometryFactory;
        let wrapped = Geometry::Polygon(polygon("POLYGON((170 0,170 10,190 10,190 0,170 0))"));
        let east = Geometry::Polygon(polygon("POLYGON((-178 2,-178 4,-176 4,-176 2,-178 2))"));
        let result = factory.intersect(&wrapped, &east).unwrap();
        let parts = result.polygons();
        assert_eq!(parts.len(), 1);
        let bbox = parts[0].bbox();
        assert!((bbox.min_x + 178.0).abs() < 1e-9 && (bbox.max_x + 176.0).abs() < 1e-9);
    }

    #[test]
    fn test_is_simple() {
        let factory = PlanarGeometryFactory;
        assert!(factory.is_simple(&polygon("POLYGON((0 0,0 4,4 4,4 0,0 0))")));
        assert!(!factory.is_simple(&polygon("POLYGON((0 0,4 4,4 0,0 4,0 0))")));
    }

    #[test]
    fn test_clip_line_two_pieces() {
        let factory = PlanarGeometryFactory;
        let u_shape = polygon("POLYGON((0 0,0 3,1 3,1 1,2 1,2 3,3 3,3 0,0 0))");
        let ranges = factory.clip_line(&line("LINESTRING(-1 2, 4 2)"), &u_shape).unwrap();
        assert_eq!(ranges.len(), 2);
        assert!((ranges[0].start - 1.0).abs() < 1e-12 && (ranges[0].end - 2.0).abs() < 1e-12);
        assert!((ranges[1].start - 3.0).abs() < 1e-12 && (ranges[1].end - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_clip_line_across_vertices_merges() {
        let factory = PlanarGeometryFactory;
        let square = polygon("POLYGON((0 0,0 4,4 4,4 0,0 0))");
        let ranges = factory.clip_line(&line("LINESTRING(1 1, 2 1, 3 1)"), &square).unwrap();
        assert_eq!(ranges.len(), 1);
        assert!((ranges[0].len() - 2.0).abs() < 1e-12);
    }
}
