//! Unit-sphere backend with great-circle edges.
//!
//! Lengths and positions are arc lengths in radians. Polygon intersection
//! and ring simplicity are evaluated in a gnomonic projection, where every
//! great circle is a straight line, so the plane kernels give exact
//! spherical answers as long as the projected rings fit into the open
//! hemisphere around the centre. Intersections are projected about the
//! operand with the smaller cap; the other operand is first clipped to a
//! great-circle octagon around that cap, so wide pairs only need their
//! smaller operand to fit.

use geo::Coord;
use nalgebra::Vector3;
use std::f64::consts::{FRAC_PI_2, PI};
use swath_common::{SwathError, SwathResult};
use tracing::trace;

use crate::factory::{GeometryBackend, GeometryFactory, LineRange};
use crate::segment::{
    intersect_polygons, merge_ranges, polygons_from_geo, ring_is_simple, segment_inside_ranges, to_geo_polygon,
};
use crate::types::{Geometry, LineString, MultiPolygon, Point, Polygon};

/// Smallest cosine between the projection centre and a projected point.
/// Points further than ~87° from the centre are rejected.
const MIN_COS: f64 = 0.05;

/// Sides of the great-circle polygon framing a cap before clipping.
const FRAME_SIDES: usize = 8;

const RANGE_TOLERANCE: f64 = 1e-12;
const ARC_TOLERANCE: f64 = 1e-12;

/// Unit vector for a lon/lat point in degrees.
pub fn to_unit_vector(point: &Point) -> Vector3<f64> {
    let lon = point.lon.to_radians();
    let lat = point.lat.to_radians();
    Vector3::new(lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin())
}

/// Lon/lat in degrees for a (not necessarily unit) vector.
pub fn from_vector(v: &Vector3<f64>) -> Point {
    let norm = v.norm();
    let lat = (v.z / norm).clamp(-1.0, 1.0).asin().to_degrees();
    let lon = v.y.atan2(v.x).to_degrees();
    Point::new(lon, lat)
}

/// Angle between two vectors in radians, stable for small angles.
pub fn angle_between(a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
    a.cross(b).norm().atan2(a.dot(b))
}

/// Gnomonic (central) projection about a point on the sphere.
#[derive(Debug, Clone, Copy)]
struct Gnomonic {
    center: Vector3<f64>,
    east: Vector3<f64>,
    north: Vector3<f64>,
}

impl Gnomonic {
    fn new(center: Vector3<f64>) -> Self {
        let mut east = Vector3::z().cross(&center);
        if east.norm() < 1e-12 {
            // centre at a pole
            east = Vector3::y();
        }
        let east = east.normalize();
        let north = center.cross(&east).normalize();
        Self { center, east, north }
    }

    fn forward(&self, v: &Vector3<f64>) -> Option<Coord<f64>> {
        let d = v.dot(&self.center);
        if d < MIN_COS {
            return None;
        }
        Some(Coord { x: v.dot(&self.east) / d, y: v.dot(&self.north) / d })
    }

    fn inverse(&self, c: Coord<f64>) -> Vector3<f64> {
        (self.center + self.east * c.x + self.north * c.y).normalize()
    }

    fn forward_point(&self, p: &Point) -> Option<Coord<f64>> {
        self.forward(&to_unit_vector(p))
    }

    fn forward_ring(&self, ring: &[Point]) -> Option<Vec<Coord<f64>>> {
        ring.iter().map(|p| self.forward_point(p)).collect()
    }

    fn forward_vectors(&self, ring: &[Vector3<f64>]) -> Option<Vec<Coord<f64>>> {
        ring.iter().map(|v| self.forward(v)).collect()
    }

    fn forward_polygon(&self, polygon: &Polygon) -> Option<geo::Polygon<f64>> {
        let exterior = self.forward_ring(polygon.exterior())?;
        let interiors = polygon
            .interiors()
            .iter()
            .map(|ring| self.forward_ring(ring))
            .collect::<Option<Vec<_>>>()?;
        Some(to_geo_polygon(exterior, interiors))
    }
}

/// Smallest cap (approximately) enclosing a set of points.
#[derive(Debug, Clone, Copy)]
struct Cap {
    center: Vector3<f64>,
    radius: f64,
}

impl Cap {
    fn around<'a>(points: impl Iterator<Item = &'a Point> + Clone) -> Option<Self> {
        let sum = points.clone().fold(Vector3::zeros(), |acc, p| acc + to_unit_vector(p));
        if sum.norm() < 1e-12 {
            return None;
        }
        let center = sum.normalize();
        let radius = points.map(|p| angle_between(&center, &to_unit_vector(p))).fold(0.0, f64::max);
        Some(Self { center, radius })
    }

    /// Inward normals of a regular great-circle polygon circumscribing the
    /// cap, or `None` if its corners leave the range of `projection`, which
    /// must be centred on the cap.
    fn frame(&self, projection: &Gnomonic) -> Option<Vec<Vector3<f64>>> {
        if self.radius >= FRAC_PI_2 {
            return None;
        }
        let step = 2.0 * PI / FRAME_SIDES as f64;
        let reach = self.radius.tan().max(1e-9) / (step / 2.0).cos();
        if 1.0 / (1.0 + reach * reach).sqrt() < MIN_COS {
            return None;
        }

        let corners: Vec<Vector3<f64>> = (0..FRAME_SIDES)
            .map(|k| {
                let angle = step * k as f64;
                projection.inverse(Coord { x: reach * angle.cos(), y: reach * angle.sin() })
            })
            .collect();
        let normals = (0..FRAME_SIDES)
            .map(|k| {
                let normal = corners[k].cross(&corners[(k + 1) % FRAME_SIDES]).normalize();
                if normal.dot(&self.center) < 0.0 {
                    -normal
                } else {
                    normal
                }
            })
            .collect();
        Some(normals)
    }
}

/// Clip a closed ring to the region on the inner side of every great
/// circle in `normals`. Returns the open ring as unit vectors, empty if
/// nothing is left.
///
/// Edges are minor arcs, so each crossing is found exactly on the chord
/// between its end points.
fn clip_ring(ring: &[Point], normals: &[Vector3<f64>]) -> Vec<Vector3<f64>> {
    let open = &ring[..ring.len().saturating_sub(1)];
    let mut vertices: Vec<Vector3<f64>> = open.iter().map(to_unit_vector).collect();
    for normal in normals {
        if vertices.len() < 3 {
            return Vec::new();
        }
        let mut clipped = Vec::with_capacity(vertices.len() + 2);
        for (i, p) in vertices.iter().enumerate() {
            let q = &vertices[(i + 1) % vertices.len()];
            let (dp, dq) = (p.dot(normal), q.dot(normal));
            if dp >= 0.0 {
                clipped.push(*p);
            }
            if (dp >= 0.0) != (dq >= 0.0) {
                let t = dp / (dp - dq);
                clipped.push((p + (q - p) * t).normalize());
            }
        }
        vertices = clipped;
    }
    if vertices.len() < 3 {
        return Vec::new();
    }
    vertices
}

/// Closest point on the minor arc `a -> b` to `p`, as a unit vector.
fn closest_on_arc(a: &Vector3<f64>, b: &Vector3<f64>, p: &Vector3<f64>) -> Vector3<f64> {
    let normal = a.cross(b);
    if normal.norm() < 1e-15 {
        return *a;
    }
    let normal = normal.normalize();
    let on_circle = p - normal * p.dot(&normal);
    if on_circle.norm() > 1e-15 {
        let candidate = on_circle.normalize();
        let arc = angle_between(a, b);
        if (angle_between(a, &candidate) + angle_between(&candidate, b) - arc).abs() < 1e-9 {
            return candidate;
        }
    }
    if angle_between(a, p) <= angle_between(b, p) {
        *a
    } else {
        *b
    }
}

/// Great-circle geometry on the unit sphere.
#[derive(Debug, Default, Clone, Copy)]
pub struct SphericalGeometryFactory;

impl SphericalGeometryFactory {
    fn operand_polygons(geometry: &Geometry) -> SwathResult<Vec<&Polygon>> {
        let polygons = geometry.polygons();
        if polygons.is_empty() && !geometry.is_empty() {
            return Err(SwathError::invalid_argument("intersection operands must be polygonal"));
        }
        Ok(polygons)
    }

    fn intersect_pair(a: &Polygon, b: &Polygon) -> SwathResult<Vec<Polygon>> {
        let (Some(cap_a), Some(cap_b)) = (Cap::around(a.exterior().iter()), Cap::around(b.exterior().iter())) else {
            return Err(SwathError::projection("polygon vertices cancel out on the sphere"));
        };
        if angle_between(&cap_a.center, &cap_b.center) > cap_a.radius + cap_b.radius {
            return Ok(Vec::new());
        }

        // The intersection lies inside the smaller cap, so the larger
        // operand is cut down to a frame around it before projecting.
        let (inner, cap, outer) = if cap_a.radius <= cap_b.radius {
            (a, cap_a, b)
        } else {
            (b, cap_b, a)
        };
        let projection = Gnomonic::new(cap.center);
        let Some(frame) = cap.frame(&projection) else {
            return Err(SwathError::projection(format!(
                "operand spans {:.1} degrees and does not fit into one hemisphere",
                cap.radius.to_degrees() * 2.0
            )));
        };

        let exterior = clip_ring(outer.exterior(), &frame);
        if exterior.is_empty() {
            return Ok(Vec::new());
        }
        let interiors: Vec<Vec<Vector3<f64>>> = outer
            .interiors()
            .iter()
            .map(|ring| clip_ring(ring, &frame))
            .filter(|ring| !ring.is_empty())
            .collect();
        trace!(vertices = exterior.len(), holes = interiors.len(), "Clipped operand to frame");

        let clipped = projection.forward_vectors(&exterior).and_then(|exterior| {
            let interiors = interiors
                .iter()
                .map(|ring| projection.forward_vectors(ring))
                .collect::<Option<Vec<_>>>()?;
            Some(to_geo_polygon(exterior, interiors))
        });
        let (Some(g_inner), Some(g_outer)) = (projection.forward_polygon(inner), clipped) else {
            return Err(SwathError::projection("clipped operands do not fit into one hemisphere"));
        };

        let result = intersect_polygons(&g_inner, &g_outer);
        Ok(polygons_from_geo(&result, |c| from_vector(&projection.inverse(c))))
    }

    fn cumulative_lengths(vectors: &[Vector3<f64>]) -> Vec<f64> {
        let mut cumulative = Vec::with_capacity(vectors.len());
        let mut total = 0.0;
        cumulative.push(total);
        for w in vectors.windows(2) {
            total += angle_between(&w[0], &w[1]);
            cumulative.push(total);
        }
        cumulative
    }
}

impl GeometryFactory for SphericalGeometryFactory {
    fn backend(&self) -> GeometryBackend {
        GeometryBackend::Spherical
    }

    fn intersect(&self, a: &Geometry, b: &Geometry) -> SwathResult<Geometry> {
        let left = Self::operand_polygons(a)?;
        let right = Self::operand_polygons(b)?;

        let mut pieces = Vec::new();
        for pa in &left {
            for pb in &right {
                pieces.extend(Self::intersect_pair(pa, pb)?);
            }
        }

        trace!(pieces = pieces.len(), "Spherical intersection");
        Ok(match pieces.len() {
            0 => Geometry::empty(),
            1 => Geometry::Polygon(pieces.remove(0)),
            _ => Geometry::MultiPolygon(MultiPolygon(pieces)),
        })
    }

    /// Rings that do not fit into one hemisphere are reported as not simple.
    fn is_simple(&self, polygon: &Polygon) -> bool {
        let Some(cap) = Cap::around(polygon.exterior().iter()) else {
            return false;
        };
        let projection = Gnomonic::new(cap.center);
        let Some(exterior) = projection.forward_ring(polygon.exterior()) else {
            return false;
        };
        if !ring_is_simple(&exterior) {
            return false;
        }
        polygon
            .interiors()
            .iter()
            .all(|ring| projection.forward_ring(ring).is_some_and(|r| ring_is_simple(&r)))
    }

    fn length(&self, line: &LineString) -> f64 {
        line.segments()
            .map(|(a, b)| angle_between(&to_unit_vector(&a), &to_unit_vector(&b)))
            .sum()
    }

    /// Position of the closest point of the line, clamped to its arcs.
    fn project(&self, line: &LineString, point: &Point) -> Option<f64> {
        let vectors: Vec<Vector3<f64>> = line.points().iter().map(to_unit_vector).collect();
        let cumulative = Self::cumulative_lengths(&vectors);
        let p = to_unit_vector(point);

        let mut best: Option<(f64, f64)> = None;
        for (i, w) in vectors.windows(2).enumerate() {
            let closest = closest_on_arc(&w[0], &w[1], &p);
            let distance = angle_between(&closest, &p);
            if best.map_or(true, |(d, _)| distance < d) {
                best = Some((distance, cumulative[i] + angle_between(&w[0], &closest)));
            }
        }
        best.map(|(_, position)| position)
    }

    fn clip_line(&self, line: &LineString, polygon: &Polygon) -> SwathResult<Vec<LineRange>> {
        let Some(cap) = Cap::around(polygon.exterior().iter()) else {
            return Err(SwathError::projection("polygon vertices cancel out on the sphere"));
        };
        let projection = Gnomonic::new(cap.center);
        let Some(shape) = projection.forward_polygon(polygon) else {
            return Err(SwathError::projection("polygon does not fit into one hemisphere"));
        };

        let vectors: Vec<Vector3<f64>> = line.points().iter().map(to_unit_vector).collect();
        let cumulative = Self::cumulative_lengths(&vectors);

        let mut ranges = Vec::new();
        for (i, w) in vectors.windows(2).enumerate() {
            let closest = closest_on_arc(&w[0], &w[1], &cap.center);
            if angle_between(&closest, &cap.center) > cap.radius + ARC_TOLERANCE {
                continue;
            }
            let (Some(a), Some(b)) = (projection.forward(&w[0]), projection.forward(&w[1])) else {
                return Err(SwathError::projection(format!(
                    "axis segment {} is too long to clip against the polygon",
                    i
                )));
            };
            for (t0, t1) in segment_inside_ranges(a, b, &shape) {
                let at = |t: f64| {
                    let c = Coord { x: a.x + (b.x - a.x) * t, y: a.y + (b.y - a.y) * t };
                    cumulative[i] + angle_between(&w[0], &projection.inverse(c))
                };
                ranges.push((at(t0), at(t1)));
            }
        }

        Ok(merge_ranges(ranges, RANGE_TOLERANCE)
            .into_iter()
            .filter(|(start, end)| end - start > RANGE_TOLERANCE)
            .map(|(start, end)| LineRange::new(start, end))
            .collect())
    }
}
