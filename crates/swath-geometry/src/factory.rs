//! Geometry backend capability interface.
//!
//! Footprint and time-axis code never touches a concrete geometry engine.
//! It asks a [`GeometryFactory`] for the handful of operations whose
//! answer depends on the surface model: polygon intersection, ring
//! simplicity, line length, point projection and line clipping.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use swath_common::SwathResult;

use crate::planar::PlanarGeometryFactory;
use crate::spherical::SphericalGeometryFactory;
use crate::types::{Geometry, LineString, Point, Polygon};

/// Surface model used for geometric computations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeometryBackend {
    /// Cartesian lon/lat plane.
    Planar,
    /// Unit sphere, great-circle edges.
    Spherical,
}

impl Default for GeometryBackend {
    fn default() -> Self {
        Self::Spherical
    }
}

impl GeometryBackend {
    /// Parse from string (case-insensitive). Unknown values yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "planar" | "cartesian" => Some(Self::Planar),
            "spherical" | "sphere" | "s2" => Some(Self::Spherical),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Planar => "planar",
            Self::Spherical => "spherical",
        }
    }
}

impl fmt::Display for GeometryBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A contiguous part of a line, as positions along it.
///
/// Positions use the same unit as [`GeometryFactory::length`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineRange {
    pub start: f64,
    pub end: f64,
}

impl LineRange {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> f64 {
        self.end - self.start
    }
}

/// Operations a geometry backend must provide.
///
/// Implementations are stateless and shared between threads behind an
/// `Arc<dyn GeometryFactory>`.
pub trait GeometryFactory: Send + Sync + fmt::Debug {
    /// Which surface model this factory implements.
    fn backend(&self) -> GeometryBackend;

    /// Intersection of two polygonal geometries.
    ///
    /// Returns the empty geometry when the operands are disjoint.
    fn intersect(&self, a: &Geometry, b: &Geometry) -> SwathResult<Geometry>;

    /// Whether every ring of the polygon is free of self-intersections.
    fn is_simple(&self, polygon: &Polygon) -> bool;

    /// Length of the line in backend units.
    fn length(&self, line: &LineString) -> f64;

    /// Position along `line` of the projection of `point`, or `None` when
    /// the point has no projection onto the line.
    fn project(&self, line: &LineString, point: &Point) -> Option<f64>;

    /// Parts of `line` inside `polygon`, ordered along the line.
    ///
    /// Touching parts are merged; zero-length contacts are dropped.
    fn clip_line(&self, line: &LineString, polygon: &Polygon) -> SwathResult<Vec<LineRange>>;
}

/// Create the factory for a backend.
pub fn create_factory(backend: GeometryBackend) -> Arc<dyn GeometryFactory> {
    match backend {
        GeometryBackend::Planar => Arc::new(PlanarGeometryFactory),
        GeometryBackend::Spherical => Arc::new(SphericalGeometryFactory),
    }
}
