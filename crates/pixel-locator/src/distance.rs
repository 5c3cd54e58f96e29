//! Distance measures on the sphere.

/// Mean earth radius in metres.
pub const MEAN_EARTH_RADIUS_M: f64 = 6_371_000.0;

/// `1 - cos(angle)` between a fixed centre and other positions.
///
/// Monotonic in the angular distance and cheap to evaluate, which makes it
/// a good key for nearest-centre searches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CosineDistance {
    lon: f64,
    sin_lat: f64,
    cos_lat: f64,
}

impl CosineDistance {
    pub fn new(lon: f64, lat: f64) -> Self {
        let (sin_lat, cos_lat) = lat.to_radians().sin_cos();
        Self { lon, sin_lat, cos_lat }
    }

    pub fn distance(&self, lon: f64, lat: f64) -> f64 {
        let (sin_lat, cos_lat) = lat.to_radians().sin_cos();
        let cos_angle = self.sin_lat * sin_lat + self.cos_lat * cos_lat * (lon - self.lon).to_radians().cos();
        1.0 - cos_angle
    }
}

/// Great-circle distance in metres (haversine formula).
pub fn haversine_m(lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dphi = (lat2 - lat1).to_radians();
    let dlambda = (lon2 - lon1).to_radians();

    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * MEAN_EARTH_RADIUS_M * a.sqrt().clamp(0.0, 1.0).asin()
}
