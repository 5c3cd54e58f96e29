//! Footprint geometry and time intersection for satellite swaths.
//!
//! Builds validated bounding polygons from per-pixel geolocation grids,
//! interpolates acquisition times along footprint axes, and intersects two
//! observations in space and time. All geometric work goes through a
//! [`GeometryFactory`], with planar and spherical implementations.

pub mod antimeridian;
pub mod bounding_polygon;
pub mod config;
pub mod factory;
pub mod intersector;
pub mod planar;
mod segment;
pub mod spherical;
pub mod time_axis;
pub mod types;
pub mod wkt;

pub use antimeridian::{map_to_globe, normalize_ring};
pub use bounding_polygon::{
    block_rows, get_subset_height, time_axis_from_ring, BoundingGeometry, BoundingPolygonCreator, PixelCodedRing,
};
pub use config::GeometryConfig;
pub use factory::{create_factory, GeometryBackend, GeometryFactory, LineRange};
pub use intersector::{calculate_time_delta, GeometryIntersector, Intersection, Observation};
pub use planar::PlanarGeometryFactory;
pub use spherical::SphericalGeometryFactory;
pub use time_axis::TimeAxis;
pub use types::{close_polygon, Geometry, LineString, MultiPolygon, Point, Polygon};
