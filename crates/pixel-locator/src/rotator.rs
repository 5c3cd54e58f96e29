//! Rotation of the sphere that moves a chosen point to (0°, 0°).

use nalgebra::{Matrix3, Vector3};

/// Rotates geographic positions so that a centre point lands on the
/// intersection of equator and prime meridian.
///
/// Close to the centre, rotated longitude and latitude behave like plane
/// coordinates, which keeps low-degree models accurate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotator {
    lon: f64,
    lat: f64,
    alpha: f64,
    matrix: Matrix3<f64>,
}

impl Rotator {
    /// Rotator moving `(lon, lat)` to the origin.
    pub fn new(lon: f64, lat: f64) -> Self {
        Self::with_alpha(lon, lat, 0.0)
    }

    /// Rotator moving `(lon, lat)` to the origin and then turning by `alpha`
    /// degrees around the axis through the origin.
    pub fn with_alpha(lon: f64, lat: f64, alpha: f64) -> Self {
        let (su, cu) = lon.to_radians().sin_cos();
        let (sv, cv) = lat.to_radians().sin_cos();
        let (sw, cw) = alpha.to_radians().sin_cos();

        #[rustfmt::skip]
        let matrix = Matrix3::new(
            cu * cv,                  su * cv,                  sv,
            sw * cu * sv - su * cw,   cw * cu + sw * su * sv,   -sw * cv,
            -sw * su - cw * cu * sv,  sw * cu - cw * su * sv,   cw * cv,
        );

        Self { lon, lat, alpha, matrix }
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Rotated `(lon, lat)`.
    pub fn transform(&self, lon: f64, lat: f64) -> (f64, f64) {
        from_unit_vector(&(self.matrix * to_unit_vector(lon, lat)))
    }

    /// Original `(lon, lat)` of a rotated position.
    pub fn transform_inversely(&self, lon: f64, lat: f64) -> (f64, f64) {
        from_unit_vector(&(self.matrix.transpose() * to_unit_vector(lon, lat)))
    }

    /// Normalised mean of the unit vectors of all positions.
    ///
    /// Returns `None` for an empty input.
    pub fn calculate_center(points: impl IntoIterator<Item = (f64, f64)>) -> Option<(f64, f64)> {
        let sum = points
            .into_iter()
            .fold(Vector3::zeros(), |acc: Vector3<f64>, (lon, lat)| acc + to_unit_vector(lon, lat));
        let norm = sum.norm();
        if !(norm > 0.0) {
            return None;
        }
        Some(from_unit_vector(&(sum / norm)))
    }
}

fn to_unit_vector(lon: f64, lat: f64) -> Vector3<f64> {
    let (su, cu) = lon.to_radians().sin_cos();
    let (sv, cv) = lat.to_radians().sin_cos();
    Vector3::new(cu * cv, su * cv, sv)
}

fn from_unit_vector(v: &Vector3<f64>) -> (f64, f64) {
    let lat = v.z.clamp(-1.0, 1.0).asin().to_degrees();
    let lon = v.y.atan2(v.x).to_degrees();
    (lon, lat)
}
