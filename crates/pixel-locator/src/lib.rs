//! Pixel location for satellite sensor rasters.
//!
//! Maps fractional pixel positions to geographic positions and back. The
//! [`PixelLocator`] trait is implemented for:
//!
//! - **Swath grids**: [`SwathPixelLocator`] fits local rational function
//!   models per row tile and answers inverse queries from the tiles whose
//!   validity radius contains the point.
//! - **Regular rasters**: [`RasterPixelLocator`] for separate lon/lat axes,
//!   [`OverlappingRasterPixelLocator`] for axes crossing the antimeridian.
//! - **Tracks**: [`PixelLocatorX1Yn`] for single-column rasters.
//! - **Composites**: [`PixelLocatorSegmented`] stacks row segments,
//!   [`ClippingPixelLocator`] restricts results to a row range.
//!
//! # Example
//!
//! ```ignore
//! use pixel_locator::{LocatorConfig, PixelLocator, SwathPixelLocator};
//!
//! let locator = SwathPixelLocator::new(grid, &LocatorConfig::from_env())?;
//! for pixel in locator.get_pixel_location(-20.3, 39.1) {
//!     println!("seen at {}, {}", pixel.x, pixel.y);
//! }
//! ```

pub mod approximation;
pub mod clipping;
pub mod config;
pub mod distance;
pub mod error;
pub mod locator;
pub mod overlapping;
pub mod rational;
pub mod raster;
pub mod rotator;
pub mod section;
pub mod segmented;
pub mod sub_scene;
pub mod swath;
pub mod x1yn;

// Re-export commonly used types at crate root
pub use approximation::{create_approximations, normalize_lon, GeoApproximation};
pub use clipping::ClippingPixelLocator;
pub use config::LocatorConfig;
pub use distance::{haversine_m, CosineDistance, MEAN_EARTH_RADIUS_M};
pub use error::{PixelLocatorError, Result};
pub use locator::PixelLocator;
pub use overlapping::OverlappingRasterPixelLocator;
pub use rational::RationalFunctionModel;
pub use raster::{index_larger_than, index_smaller_than, LonOrder, RasterPixelLocator};
pub use rotator::Rotator;
pub use section::{create_sections, create_tiles, Section};
pub use segmented::PixelLocatorSegmented;
pub use sub_scene::sub_scene_pixel_locator;
pub use swath::{remove_adjacent_candidates, Candidate, SwathPixelLocator};
pub use x1yn::PixelLocatorX1Yn;
