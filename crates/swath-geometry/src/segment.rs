//! Plane kernels shared by both backends.
//!
//! The planar backend runs these directly on lon/lat; the spherical backend
//! runs them on gnomonic coordinates, where great-circle arcs are straight.

use geo::algorithm::coordinate_position::{CoordPos, CoordinatePosition};
use geo::algorithm::line_intersection::{line_intersection, LineIntersection};
use geo::{BooleanOps, Coord, Line};

use crate::types::{Point, Polygon};

const PARAM_EPS: f64 = 1e-12;

/// Build a `geo` polygon from closed coordinate rings.
pub(crate) fn to_geo_polygon(exterior: Vec<Coord<f64>>, interiors: Vec<Vec<Coord<f64>>>) -> geo::Polygon<f64> {
    geo::Polygon::new(
        geo::LineString::new(exterior),
        interiors.into_iter().map(geo::LineString::new).collect(),
    )
}

/// Build a `geo` polygon from a lon/lat polygon, mapping every vertex.
pub(crate) fn polygon_to_geo(polygon: &Polygon, map: impl Fn(&Point) -> Coord<f64>) -> geo::Polygon<f64> {
    let exterior = polygon.exterior().iter().map(&map).collect();
    let interiors = polygon
        .interiors()
        .iter()
        .map(|ring| ring.iter().map(&map).collect())
        .collect();
    to_geo_polygon(exterior, interiors)
}

/// Convert a `geo` result back, dropping rings that collapsed.
pub(crate) fn polygons_from_geo(mp: &geo::MultiPolygon<f64>, map: impl Fn(Coord<f64>) -> Point) -> Vec<Polygon> {
    mp.0.iter()
        .filter_map(|p| {
            let exterior = p.exterior().coords().map(|c| map(*c)).collect();
            let interiors = p
                .interiors()
                .iter()
                .map(|ring| ring.coords().map(|c| map(*c)).collect())
                .collect();
            Polygon::with_interiors(exterior, interiors).ok()
        })
        .collect()
}

/// Boolean intersection of two plane polygons.
pub(crate) fn intersect_polygons(a: &geo::Polygon<f64>, b: &geo::Polygon<f64>) -> geo::MultiPolygon<f64> {
    a.intersection(b)
}

fn dedup_closed(ring: &[Coord<f64>]) -> Vec<Coord<f64>> {
    let mut pts: Vec<Coord<f64>> = Vec::with_capacity(ring.len() + 1);
    for c in ring {
        if pts.last() != Some(c) {
            pts.push(*c);
        }
    }
    if pts.len() > 1 && pts.first() != pts.last() {
        pts.push(pts[0]);
    }
    pts
}

fn min_x(line: &Line<f64>) -> f64 {
    line.start.x.min(line.end.x)
}

fn max_x(line: &Line<f64>) -> f64 {
    line.start.x.max(line.end.x)
}

/// Whether a closed ring has no self-intersections.
///
/// Consecutive duplicate vertices are ignored. Segments are swept in order
/// of their minimum x; neighbours may only share their common vertex.
pub(crate) fn ring_is_simple(ring: &[Coord<f64>]) -> bool {
    let pts = dedup_closed(ring);
    if pts.len() < 4 {
        return false;
    }
    let n = pts.len() - 1;
    let segments: Vec<Line<f64>> = (0..n).map(|i| Line::new(pts[i], pts[i + 1])).collect();

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| min_x(&segments[a]).total_cmp(&min_x(&segments[b])));

    for (k, &i) in order.iter().enumerate() {
        let reach = max_x(&segments[i]);
        for &j in &order[k + 1..] {
            if min_x(&segments[j]) > reach {
                break;
            }
            let gap = i.abs_diff(j);
            let adjacent = gap == 1 || gap == n - 1;
            match line_intersection(segments[i], segments[j]) {
                None => {}
                Some(LineIntersection::SinglePoint { .. }) => {
                    if !adjacent {
                        return false;
                    }
                }
                Some(LineIntersection::Collinear { intersection }) => {
                    if !adjacent || intersection.start != intersection.end {
                        return false;
                    }
                }
            }
        }
    }
    true
}

/// Parameter of `c` along the segment `a -> b`.
fn param_of(a: Coord<f64>, b: Coord<f64>, c: Coord<f64>) -> f64 {
    let d = b - a;
    let len2 = d.x * d.x + d.y * d.y;
    let v = c - a;
    ((v.x * d.x + v.y * d.y) / len2).clamp(0.0, 1.0)
}

/// Parameter ranges in [0, 1] of the segment `a -> b` lying inside or on
/// the boundary of `polygon`.
pub(crate) fn segment_inside_ranges(a: Coord<f64>, b: Coord<f64>, polygon: &geo::Polygon<f64>) -> Vec<(f64, f64)> {
    if a == b {
        return Vec::new();
    }
    let segment = Line::new(a, b);
    let mut params = vec![0.0, 1.0];

    let rings = std::iter::once(polygon.exterior()).chain(polygon.interiors().iter());
    for ring in rings {
        for edge in ring.lines() {
            match line_intersection(segment, edge) {
                None => {}
                Some(LineIntersection::SinglePoint { intersection, .. }) => {
                    params.push(param_of(a, b, intersection));
                }
                Some(LineIntersection::Collinear { intersection }) => {
                    params.push(param_of(a, b, intersection.start));
                    params.push(param_of(a, b, intersection.end));
                }
            }
        }
    }

    params.sort_by(f64::total_cmp);
    params.dedup_by(|x, y| (*x - *y).abs() <= PARAM_EPS);

    let d = b - a;
    let inside = params
        .windows(2)
        .filter(|w| w[1] - w[0] > PARAM_EPS)
        .filter(|w| {
            let t = 0.5 * (w[0] + w[1]);
            let mid = Coord { x: a.x + d.x * t, y: a.y + d.y * t };
            polygon.coordinate_position(&mid) != CoordPos::Outside
        })
        .map(|w| (w[0], w[1]))
        .collect();
    merge_ranges(inside, PARAM_EPS)
}

/// Merge overlapping or touching ranges. Input need not be sorted.
pub(crate) fn merge_ranges(mut ranges: Vec<(f64, f64)>, tolerance: f64) -> Vec<(f64, f64)> {
    ranges.sort_by(|a, b| a.0.total_cmp(&b.0));
    let mut merged: Vec<(f64, f64)> = Vec::with_capacity(ranges.len());
    for (start, end) in ranges {
        match merged.last_mut() {
            Some(last) if start <= last.1 + tolerance => {
                last.1 = last.1.max(end);
            }
            _ => merged.push((start, end)),
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coords(pts: &[(f64, f64)]) -> Vec<Coord<f64>> {
        pts.iter().map(|&(x, y)| Coord { x, y }).collect()
    }

    fn square() -> geo::Polygon<f64> {
        to_geo_polygon(coords(&[(0.0, 0.0), (0.0, 4.0), (4.0, 4.0), (4.0, 0.0), (0.0, 0.0)]), Vec::new())
    }

    #[test]
    fn test_simple_ring() {
        let ring = coords(&[(0.0, 0.0), (0.0, 4.0), (4.0, 4.0), (4.0, 0.0), (0.0, 0.0)]);
        assert!(ring_is_simple(&ring));
    }

    #[test]
    fn test_bow_tie_is_not_simple() {
        let ring = coords(&[(0.0, 0.0), (4.0, 4.0), (4.0, 0.0), (0.0, 4.0), (0.0, 0.0)]);
        assert!(!ring_is_simple(&ring));
    }

    #[test]
    fn test_repeated_vertices_are_ignored() {
        let ring = coords(&[(0.0, 0.0), (0.0, 0.0), (0.0, 4.0), (4.0, 4.0), (4.0, 4.0), (4.0, 0.0), (0.0, 0.0)]);
        assert!(ring_is_simple(&ring));
    }

    #[test]
    fn test_spike_is_not_simple() {
        // goes out along y = 0 and comes back over itself
        let ring = coords(&[(0.0, 0.0), (3.0, 0.0), (1.0, 0.0), (1.0, 2.0), (0.0, 0.0)]);
        assert!(!ring_is_simple(&ring));
    }

    #[test]
    fn test_collinear_vertices_are_simple() {
        let ring = coords(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0), (0.0, 0.0)]);
        assert!(ring_is_simple(&ring));
    }

    #[test]
    fn test_degenerate_ring_is_not_simple() {
        let ring = coords(&[(0.0, 0.0), (1.0, 1.0), (0.0, 0.0)]);
        assert!(!ring_is_simple(&ring));
    }

    #[test]
    fn test_segment_crossing_square() {
        let ranges = segment_inside_ranges(Coord { x: -2.0, y: 0.0 }, Coord { x: 4.0, y: 6.0 }, &square());
        assert_eq!(ranges.len(), 1);
        assert!((ranges[0].0 - 1.0 / 3.0).abs() < 1e-12);
        assert!((ranges[0].1 - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_segment_outside_square() {
        let ranges = segment_inside_ranges(Coord { x: 0.0, y: -2.0 }, Coord { x: 4.0, y: -2.0 }, &square());
        assert!(ranges.is_empty());
    }

    #[test]
    fn test_segment_along_boundary_counts_as_inside() {
        let ranges = segment_inside_ranges(Coord { x: 0.0, y: 0.0 }, Coord { x: 0.0, y: 2.0 }, &square());
        assert_eq!(ranges, vec![(0.0, 1.0)]);
    }

    #[test]
    fn test_merge_ranges() {
        let merged = merge_ranges(vec![(0.5, 0.7), (0.0, 0.2), (0.2, 0.3), (0.65, 0.9)], 1e-9);
        assert_eq!(merged, vec![(0.0, 0.3), (0.5, 0.9)]);
    }
}
