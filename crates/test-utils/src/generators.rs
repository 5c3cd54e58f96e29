//! Synthetic geolocation generators.
//!
//! These generators create predictable pixel grids whose geometry is known
//! in closed form, so footprints, time axes and pixel lookups can be checked
//! without reading sensor files.

use swath_common::PixelGrid;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Creates an axis-aligned grid.
///
/// Cell `(x, y)` lies at `(lon0 + x * dlon, lat0 + y * dlat)`.
///
/// # Example
///
/// ```
/// use test_utils::create_regular_grid;
///
/// let grid = create_regular_grid(4, 3, 10.0, 50.0, 0.5, -0.25);
/// assert_eq!(grid.lon(2, 0), 11.0);
/// assert_eq!(grid.lat(0, 2), 49.5);
/// ```
pub fn create_regular_grid(width: usize, height: usize, lon0: f64, lat0: f64, dlon: f64, dlat: f64) -> PixelGrid {
    PixelGrid::from_fn(width, height, |x, y| (lon0 + x as f64 * dlon, lat0 + y as f64 * dlat))
        .unwrap_or_else(|e| panic!("invalid regular grid {}x{}: {}", width, height, e))
}

/// Evenly spaced values `start, start + step, ...` (`count` values).
pub fn create_axis(start: f64, step: f64, count: usize) -> Vec<f64> {
    (0..count).map(|i| start + i as f64 * step).collect()
}

/// Parameters of a synthetic push-broom swath.
#[derive(Debug, Clone, Copy)]
pub struct SwathSpec {
    /// Longitude of the first centre pixel in degrees.
    pub start_lon: f64,
    /// Latitude of the first centre pixel in degrees.
    pub start_lat: f64,
    /// Initial flight direction, degrees clockwise from north.
    pub heading: f64,
    /// Distance between scan lines in km.
    pub along_track_km: f64,
    /// Distance between pixels of a scan line in km.
    pub across_track_km: f64,
}

impl Default for SwathSpec {
    /// A descending pass over the Atlantic with 1 km pixels.
    fn default() -> Self {
        Self {
            start_lon: -20.0,
            start_lat: 40.0,
            heading: 190.0,
            along_track_km: 1.0,
            across_track_km: 1.0,
        }
    }
}

/// Creates a swath grid following a great circle.
///
/// Rows are scan lines along the flight path, columns run across track
/// from left to right as seen in flight direction. Longitudes are wrapped
/// into [-180, 180).
pub fn create_swath_grid(width: usize, height: usize, spec: &SwathSpec) -> PixelGrid {
    let centres: Vec<(f64, f64)> = (0..=height)
        .map(|y| destination(spec.start_lon, spec.start_lat, spec.heading, y as f64 * spec.along_track_km))
        .collect();
    let half = (width as f64 - 1.0) / 2.0;

    PixelGrid::from_fn(width, height, |x, y| {
        let (lon, lat) = centres[y];
        let (next_lon, next_lat) = centres[y + 1];
        let bearing = initial_bearing(lon, lat, next_lon, next_lat);
        let offset = (x as f64 - half) * spec.across_track_km;
        let (plon, plat) = destination(lon, lat, bearing - 90.0, -offset);
        (wrap_lon(plon), plat)
    })
    .unwrap_or_else(|e| panic!("invalid swath grid {}x{}: {}", width, height, e))
}

/// Creates a swath whose centre line runs around a circle.
///
/// The centre line of row `y` sits at angle `sweep_deg * y / (height - 1)`
/// on a circle of `radius_deg` around (0°, 0°); columns span
/// `radius_deg ± half_width_deg`. A sweep beyond 360° makes the perimeter
/// ring overlap itself while shorter along-track blocks stay simple.
pub fn create_looping_grid(width: usize, height: usize, radius_deg: f64, half_width_deg: f64, sweep_deg: f64) -> PixelGrid {
    let last_row = (height.max(2) - 1) as f64;
    let last_col = (width.max(2) - 1) as f64;
    PixelGrid::from_fn(width, height, |x, y| {
        let theta = (sweep_deg * y as f64 / last_row).to_radians();
        let r = radius_deg - half_width_deg + 2.0 * half_width_deg * x as f64 / last_col;
        (r * theta.cos(), r * theta.sin())
    })
    .unwrap_or_else(|e| panic!("invalid looping grid {}x{}: {}", width, height, e))
}

/// Point reached from `(lon, lat)` after `distance_km` along `bearing_deg`.
pub fn destination(lon: f64, lat: f64, bearing_deg: f64, distance_km: f64) -> (f64, f64) {
    let delta = distance_km / EARTH_RADIUS_KM;
    let theta = bearing_deg.to_radians();
    let phi1 = lat.to_radians();
    let lambda1 = lon.to_radians();

    let phi2 = (phi1.sin() * delta.cos() + phi1.cos() * delta.sin() * theta.cos()).asin();
    let lambda2 = lambda1 + (theta.sin() * delta.sin() * phi1.cos()).atan2(delta.cos() - phi1.sin() * phi2.sin());
    (lambda2.to_degrees(), phi2.to_degrees())
}

/// Initial great-circle bearing from the first point to the second.
pub fn initial_bearing(lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dl = (lon2 - lon1).to_radians();
    let y = dl.sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * dl.cos();
    y.atan2(x).to_degrees()
}

/// Wrap a longitude into [-180, 180).
pub fn wrap_lon(lon: f64) -> f64 {
    (lon + 180.0).rem_euclid(360.0) - 180.0
}
