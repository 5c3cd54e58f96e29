//! Geometry primitives in lon/lat degrees.
//!
//! The types here are plain values. Operations whose result depends on the
//! surface model (intersection, simplicity, length, projection) live behind
//! the [`GeometryFactory`](crate::GeometryFactory) trait.

use serde::{Deserialize, Serialize};
use swath_common::{BoundingBox, GeoPos, SwathError, SwathResult};

/// A (longitude, latitude) pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub lon: f64,
    pub lat: f64,
}

impl Point {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Create a point, rejecting NaN and infinite coordinates.
    pub fn try_new(lon: f64, lat: f64) -> SwathResult<Self> {
        if !lon.is_finite() || !lat.is_finite() {
            return Err(SwathError::invalid_geometry(format!(
                "point coordinates must be finite, got ({}, {})",
                lon, lat
            )));
        }
        Ok(Self { lon, lat })
    }

    /// Same point moved by `delta` degrees of longitude.
    pub fn shifted(&self, delta: f64) -> Self {
        Self::new(self.lon + delta, self.lat)
    }

    pub fn is_finite(&self) -> bool {
        self.lon.is_finite() && self.lat.is_finite()
    }
}

impl From<GeoPos> for Point {
    fn from(pos: GeoPos) -> Self {
        Point::new(pos.lon, pos.lat)
    }
}

impl From<Point> for GeoPos {
    fn from(point: Point) -> Self {
        GeoPos::new(point.lon, point.lat)
    }
}

/// An ordered polyline of at least two points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineString {
    points: Vec<Point>,
}

impl LineString {
    pub fn new(points: Vec<Point>) -> SwathResult<Self> {
        if points.len() < 2 {
            return Err(SwathError::invalid_geometry(format!(
                "a line string needs at least 2 points, got {}",
                points.len()
            )));
        }
        if let Some(bad) = points.iter().find(|p| !p.is_finite()) {
            return Err(SwathError::invalid_geometry(format!(
                "line string contains a non-finite point ({}, {})",
                bad.lon, bad.lat
            )));
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Point {
        self.points[0]
    }

    pub fn last(&self) -> Point {
        self.points[self.points.len() - 1]
    }

    /// Consecutive point pairs.
    pub fn segments(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.points.windows(2).map(|w| (w[0], w[1]))
    }

    pub fn bbox(&self) -> BoundingBox {
        bbox_of(&self.points)
    }
}

/// A polygon with a closed exterior ring and optional holes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    exterior: Vec<Point>,
    interiors: Vec<Vec<Point>>,
}

impl Polygon {
    /// Create a polygon from its exterior ring. The ring is closed if needed.
    pub fn new(points: Vec<Point>) -> SwathResult<Self> {
        Self::with_interiors(points, Vec::new())
    }

    pub fn with_interiors(exterior: Vec<Point>, interiors: Vec<Vec<Point>>) -> SwathResult<Self> {
        let exterior = close_ring(exterior)?;
        let interiors = interiors
            .into_iter()
            .map(close_ring)
            .collect::<SwathResult<Vec<_>>>()?;
        Ok(Self { exterior, interiors })
    }

    /// Closed exterior ring, first point repeated at the end.
    pub fn exterior(&self) -> &[Point] {
        &self.exterior
    }

    pub fn interiors(&self) -> &[Vec<Point>] {
        &self.interiors
    }

    /// All ring coordinates, exterior first.
    pub fn coordinates(&self) -> Vec<Point> {
        let mut coords = self.exterior.clone();
        for ring in &self.interiors {
            coords.extend_from_slice(ring);
        }
        coords
    }

    pub fn bbox(&self) -> BoundingBox {
        bbox_of(&self.exterior)
    }

    /// Planar area-weighted centroid of the exterior ring.
    ///
    /// Falls back to the vertex mean for rings with zero area.
    pub fn centroid(&self) -> Point {
        let mut area2 = 0.0;
        let mut cx = 0.0;
        let mut cy = 0.0;
        for w in self.exterior.windows(2) {
            let cross = w[0].lon * w[1].lat - w[1].lon * w[0].lat;
            area2 += cross;
            cx += (w[0].lon + w[1].lon) * cross;
            cy += (w[0].lat + w[1].lat) * cross;
        }

        if area2.abs() < 1e-12 {
            let n = (self.exterior.len() - 1).max(1) as f64;
            let (sx, sy) = self.exterior[..self.exterior.len() - 1]
                .iter()
                .fold((0.0, 0.0), |(sx, sy), p| (sx + p.lon, sy + p.lat));
            return Point::new(sx / n, sy / n);
        }

        Point::new(cx / (3.0 * area2), cy / (3.0 * area2))
    }
}

/// A collection of polygons. An empty collection is the empty geometry.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MultiPolygon(pub Vec<Polygon>);

impl MultiPolygon {
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn polygons(&self) -> &[Polygon] {
        &self.0
    }
}

/// Any geometry produced or consumed by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    Point(Point),
    LineString(LineString),
    MultiLineString(Vec<LineString>),
    Polygon(Polygon),
    MultiPolygon(MultiPolygon),
}

impl Geometry {
    /// The empty geometry.
    pub fn empty() -> Self {
        Geometry::MultiPolygon(MultiPolygon::empty())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Geometry::Point(_) | Geometry::LineString(_) | Geometry::Polygon(_) => false,
            Geometry::MultiLineString(lines) => lines.is_empty(),
            Geometry::MultiPolygon(mp) => mp.is_empty(),
        }
    }

    /// All coordinates in storage order, ring closing points included.
    pub fn coordinates(&self) -> Vec<Point> {
        match self {
            Geometry::Point(p) => vec![*p],
            Geometry::LineString(line) => line.points().to_vec(),
            Geometry::MultiLineString(lines) => lines.iter().flat_map(|l| l.points().iter().copied()).collect(),
            Geometry::Polygon(polygon) => polygon.coordinates(),
            Geometry::MultiPolygon(mp) => mp.0.iter().flat_map(|p| p.coordinates()).collect(),
        }
    }

    /// Split composite geometries into their parts.
    pub fn sub_geometries(&self) -> Vec<Geometry> {
        match self {
            Geometry::MultiLineString(lines) => lines.iter().cloned().map(Geometry::LineString).collect(),
            Geometry::MultiPolygon(mp) => mp.0.iter().cloned().map(Geometry::Polygon).collect(),
            other => vec![other.clone()],
        }
    }

    /// Polygonal parts of the geometry; empty for points and lines.
    pub fn polygons(&self) -> Vec<&Polygon> {
        match self {
            Geometry::Polygon(p) => vec![p],
            Geometry::MultiPolygon(mp) => mp.0.iter().collect(),
            _ => Vec::new(),
        }
    }
}

impl From<Polygon> for Geometry {
    fn from(polygon: Polygon) -> Self {
        Geometry::Polygon(polygon)
    }
}

impl From<LineString> for Geometry {
    fn from(line: LineString) -> Self {
        Geometry::LineString(line)
    }
}

impl From<MultiPolygon> for Geometry {
    fn from(mp: MultiPolygon) -> Self {
        Geometry::MultiPolygon(mp)
    }
}

/// Append the first point to the ring if it has more than one point.
pub fn close_polygon(points: &mut Vec<Point>) {
    if points.len() > 1 {
        let first = points[0];
        points.push(first);
    }
}

fn close_ring(mut points: Vec<Point>) -> SwathResult<Vec<Point>> {
    if let Some(bad) = points.iter().find(|p| !p.is_finite()) {
        return Err(SwathError::invalid_geometry(format!(
            "ring contains a non-finite point ({}, {})",
            bad.lon, bad.lat
        )));
    }
    if points.len() > 1 && points.first() != points.last() {
        close_polygon(&mut points);
    }
    if points.len() < 4 {
        return Err(SwathError::invalid_geometry(format!(
            "a polygon ring needs at least 3 distinct points, got {}",
            points.len().saturating_sub(1)
        )));
    }
    Ok(points)
}

fn bbox_of(points: &[Point]) -> BoundingBox {
    BoundingBox::from_points(points.iter().map(|p| (p.lon, p.lat)))
        .unwrap_or_else(|| BoundingBox::new(0.0, 0.0, 0.0, 0.0))
}
