//! Choosing the half of a split scene that belongs to a footprint part.
//!
//! A footprint split into two along-track blocks matches only one of them.
//! The block whose centre lies nearest to the part's centroid wins, and
//! the locator is clipped to its rows.

use swath_common::GeoPos;
use tracing::debug;

use crate::clipping::ClippingPixelLocator;
use crate::distance::haversine_m;
use crate::locator::PixelLocator;

/// Clip `locator` to the block of rows nearest to `centroid`.
///
/// The first block covers rows `0..=subset_height - 1`, the second
/// `subset_height - 1..=height - 1`. Returns `None` when the centre of
/// either block has no geolocation.
pub fn sub_scene_pixel_locator<L: PixelLocator>(
    centroid: GeoPos,
    width: usize,
    height: usize,
    subset_height: usize,
    locator: L,
) -> Option<ClippingPixelLocator<L>> {
    if height == 0 || subset_height == 0 {
        return None;
    }
    let x = (width / 2) as f64 + 0.5;
    let first_y = subset_height / 2;
    let second_y = (subset_height + subset_height / 2).min(height - 1);

    let first = locator.get_geo_location(x, first_y as f64 + 0.5)?;
    let second = locator.get_geo_location(x, second_y as f64 + 0.5)?;

    let to_first = haversine_m(centroid.lon, centroid.lat, first.lon, first.lat);
    let to_second = haversine_m(centroid.lon, centroid.lat, second.lon, second.lat);

    let (min_y, max_y) = if to_first <= to_second {
        (0, subset_height - 1)
    } else {
        (subset_height - 1, height - 1)
    };
    debug!(min_y, max_y, "Selected sub-scene");
    Some(ClippingPixelLocator::new(locator, min_y, max_y))
}
