//! Common types shared by the swath geometry and pixel locator crates.

pub mod bbox;
pub mod error;
pub mod grid;
pub mod time;

pub use bbox::BoundingBox;
pub use error::{SwathError, SwathResult};
pub use grid::{GeoPos, NodeType, PixelGrid, PixelPos};
pub use time::{TimeInfo, TimeInterval, MAX_TIME_DELTA_MS};
