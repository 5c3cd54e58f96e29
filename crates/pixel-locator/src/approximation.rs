//! Local rational-function approximations of swath geolocation.
//!
//! Each approximation covers one row tile. Positions are first rotated so
//! the tile centre sits at (0°, 0°), then rational function models map the
//! rotated coordinates to pixel coordinates and back.

use rayon::prelude::*;
use swath_common::{GeoPos, PixelGrid, PixelPos};
use tracing::{debug, trace};

use crate::config::LocatorConfig;
use crate::distance::CosineDistance;
use crate::error::{PixelLocatorError, Result};
use crate::rational::RationalFunctionModel;
use crate::rotator::Rotator;
use crate::section::{create_sections, create_tiles, Section};

/// Accuracy in degrees of the pixel-to-geo models.
const GEO_ACCURACY: f64 = 0.01;

/// Factor applied to the angular radius of a tile to obtain its validity
/// radius.
const RADIUS_INFLATION: f64 = 1.1;

/// A geo-to-pixel approximation valid within `max_distance` of its centre.
#[derive(Debug, Clone)]
pub struct GeoApproximation {
    tile: Section,
    rotator: Rotator,
    centre: CosineDistance,
    max_distance: f64,
    x_model: RationalFunctionModel,
    y_model: RationalFunctionModel,
    lon_model: RationalFunctionModel,
    lat_model: RationalFunctionModel,
}

/// Samples used for fitting: rotated geo positions and pixel centres.
struct WarpPoints {
    lons: Vec<f64>,
    lats: Vec<f64>,
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl GeoApproximation {
    /// Fit an approximation for the rows of `tile`.
    ///
    /// Returns `Ok(None)` when the tile has no valid geolocation sample.
    pub fn create(grid: &PixelGrid, tile: Section, accuracy: f64, max_points: usize) -> Result<Option<Self>> {
        let Some(mut points) = extract_warp_points(grid, tile, max_points) else {
            return Ok(None);
        };

        let Some((centre_lon, centre_lat)) =
            Rotator::calculate_center(points.lons.iter().copied().zip(points.lats.iter().copied()))
        else {
            return Ok(None);
        };
        let rotator = Rotator::new(centre_lon, centre_lat);
        let centre = CosineDistance::new(centre_lon, centre_lat);

        let largest = points
            .lons
            .iter()
            .zip(&points.lats)
            .map(|(&lon, &lat)| centre.distance(lon, lat))
            .fold(0.0_f64, f64::max);
        let max_distance = 1.0 - (RADIUS_INFLATION * (1.0 - largest).clamp(-1.0, 1.0).acos()).cos();

        for (lon, lat) in points.lons.iter_mut().zip(points.lats.iter_mut()) {
            let (rlon, rlat) = rotator.transform(*lon, *lat);
            *lon = rlon;
            *lat = rlat;
        }

        let fit = |g: &[f64], x: &[f64], y: &[f64], accuracy: f64, name: &str| {
            RationalFunctionModel::find_best(x, y, g, accuracy).ok_or_else(|| {
                PixelLocatorError::model_fit(format!(
                    "no {} model for rows {}..{}",
                    name, tile.start_line, tile.stop_line
                ))
            })
        };
        let x_model = fit(&points.xs, &points.lons, &points.lats, accuracy, "x")?;
        let y_model = fit(&points.ys, &points.lons, &points.lats, accuracy, "y")?;
        let lon_model = fit(&points.lons, &points.xs, &points.ys, GEO_ACCURACY, "lon")?;
        let lat_model = fit(&points.lats, &points.xs, &points.ys, GEO_ACCURACY, "lat")?;

        trace!(
            start = tile.start_line,
            stop = tile.stop_line,
            samples = points.xs.len(),
            x_rmse = x_model.rmse(),
            y_rmse = y_model.rmse(),
            "Fitted approximation"
        );

        Ok(Some(Self {
            tile,
            rotator,
            centre,
            max_distance,
            x_model,
            y_model,
            lon_model,
            lat_model,
        }))
    }

    /// Rows covered by this approximation.
    pub fn tile(&self) -> Section {
        self.tile
    }

    /// Centre `(lon, lat)` of the approximation.
    pub fn centre(&self) -> (f64, f64) {
        (self.rotator.lon(), self.rotator.lat())
    }

    /// Validity radius as a cosine distance.
    pub fn max_distance(&self) -> f64 {
        self.max_distance
    }

    /// Cosine distance from the centre to `(lon, lat)`.
    pub fn get_distance(&self, lon: f64, lat: f64) -> f64 {
        self.centre.distance(lon, lat)
    }

    /// Geo to pixel.
    pub fn g2p(&self, lon: f64, lat: f64) -> PixelPos {
        let (rlon, rlat) = self.rotator.transform(lon, lat);
        PixelPos::new(self.x_model.value(rlon, rlat), self.y_model.value(rlon, rlat))
    }

    /// Pixel to geo.
    pub fn p2g(&self, x: f64, y: f64) -> GeoPos {
        let (lon, lat) = self
            .rotator
            .transform_inversely(self.lon_model.value(x, y), self.lat_model.value(x, y));
        GeoPos::new(lon, lat)
    }
}

/// Build the approximations of all tiles of `grid`, ordered along track.
///
/// Tiles without valid samples are skipped; a grid without any valid
/// sample is an error.
pub fn create_approximations(grid: &PixelGrid, config: &LocatorConfig) -> Result<Vec<GeoApproximation>> {
    config.validate().map_err(PixelLocatorError::Config)?;

    let sections = create_sections(grid, config.polar_threshold);
    let tiles = create_tiles(&sections, config);

    let build = |tile: &Section| GeoApproximation::create(grid, *tile, config.accuracy, config.max_points_per_tile);
    let fitted: Vec<Option<GeoApproximation>> = if config.parallel {
        tiles.par_iter().map(build).collect::<Result<_>>()?
    } else {
        tiles.iter().map(build).collect::<Result<_>>()?
    };

    let approximations: Vec<GeoApproximation> = fitted.into_iter().flatten().collect();
    debug!(
        sections = sections.len(),
        tiles = tiles.len(),
        approximations = approximations.len(),
        "Created geo approximations"
    );

    if approximations.is_empty() {
        return Err(PixelLocatorError::no_valid_samples(format!(
            "{}x{} grid",
            grid.width(),
            grid.height()
        )));
    }
    Ok(approximations)
}

/// Map a longitude into [-180, 180].
pub fn normalize_lon(lon: f64) -> f64 {
    let lon = if lon.abs() > 360.0 { lon % 360.0 } else { lon };
    if lon > 180.0 {
        lon - 360.0
    } else if lon < -180.0 {
        lon + 360.0
    } else {
        lon
    }
}

/// Sub-sampled valid positions of a tile with their pixel centres.
fn extract_warp_points(grid: &PixelGrid, tile: Section, max_points: usize) -> Option<WarpPoints> {
    let width = grid.width();
    let total = width * tile.height();
    let step = ((total as f64 / max_points.max(1) as f64).sqrt().ceil() as usize).max(1);

    let columns = sample_positions(0, width, step);
    let rows = sample_positions(tile.start_line, tile.stop_line, step);
    let capacity = columns.len() * rows.len();
    let mut points = WarpPoints {
        lons: Vec::with_capacity(capacity),
        lats: Vec::with_capacity(capacity),
        xs: Vec::with_capacity(capacity),
        ys: Vec::with_capacity(capacity),
    };

    for &y in &rows {
        for &x in &columns {
            let lon = grid.lon(x, y);
            let lat = grid.lat(x, y);
            if lon.is_nan() || !(-90.0..=90.0).contains(&lat) {
                continue;
            }
            points.lons.push(normalize_lon(lon));
            points.lats.push(lat);
            points.xs.push(x as f64 + 0.5);
            points.ys.push(y as f64 + 0.5);
        }
    }

    (!points.xs.is_empty()).then_some(points)
}

/// `start, start + step, ...` below `stop`, always including `stop - 1`.
fn sample_positions(start: usize, stop: usize, step: usize) -> Vec<usize> {
    let mut positions: Vec<usize> = (start..stop).step_by(step).collect();
    if let Some(&last) = positions.last() {
        if last + 1 < stop {
            positions.push(stop - 1);
        }
    }
    positions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn regular_grid(width: usize, height: usize) -> PixelGrid {
        PixelGrid::from_fn(width, height, |x, y| (10.0 + x as f64 * 0.01, 45.0 - y as f64 * 0.01)).unwrap()
    }

    #[test]
    fn test_normalize_lon() {
        assert_eq!(normalize_lon(190.0), -170.0);
        assert_eq!(normalize_lon(-190.0), 170.0);
        assert_eq!(normalize_lon(725.0), 5.0);
        assert_eq!(normalize_lon(45.0), 45.0);
    }

    #[test]
    fn test_sample_positions() {
        assert_eq!(sample_positions(0, 10, 4), vec![0, 4, 8, 9]);
        assert_eq!(sample_positions(3, 7, 2), vec![3, 5, 6]);
        assert_eq!(sample_positions(0, 1, 3), vec![0]);
        assert!(sample_positions(4, 4, 1).is_empty());
    }

    #[test]
    fn test_round_trip_on_regular_grid() {
        let grid = regular_grid(40, 60);
        let approximation = GeoApproximation::create(&grid, Section::new(0, 60, false), 0.01, 500)
            .unwrap()
            .unwrap();

        let p = approximation.g2p(grid.lon(12, 30), grid.lat(12, 30));
        assert!((p.x - 12.5).abs() < 0.05, "x = {}", p.x);
        assert!((p.y - 30.5).abs() < 0.05, "y = {}", p.y);

        let g = approximation.p2g(12.5, 30.5);
        assert!((g.lon - grid.lon(12, 30)).abs() < 1e-2);
        assert!((g.lat - grid.lat(12, 30)).abs() < 1e-2);
    }

    #[test]
    fn test_centre_is_within_radius() {
        let grid = regular_grid(20, 20);
        let approximation = GeoApproximation::create(&grid, Section::new(0, 20, false), 0.1, 1000)
            .unwrap()
            .unwrap();
        let (lon, lat) = approximation.centre();
        assert!(approximation.get_distance(lon, lat) < 1e-12);
        assert!(approximation.get_distance(grid.lon(0, 0), grid.lat(0, 0)) <= approximation.max_distance());
        assert!(approximation.get_distance(lon + 5.0, lat) > approximation.max_distance());
    }

    #[test]
    fn test_tile_without_samples() {
        let grid = PixelGrid::from_fn(4, 4, |_, y| if y < 2 { (f64::NAN, 0.0) } else { (1.0, 95.0) }).unwrap();
        assert!(GeoApproximation::create(&grid, Section::new(0, 4, false), 0.1, 100)
            .unwrap()
            .is_none());

        let config = LocatorConfig {
            parallel: false,
            ..LocatorConfig::default()
        };
        assert!(matches!(
            create_approximations(&grid, &config),
            Err(PixelLocatorError::NoValidSamples(_))
        ));
    }

    #[test]
    fn test_create_approximations_per_tile() {
        let grid = regular_grid(10, 50);
        let config = LocatorConfig {
            tile_height: 20,
            ..LocatorConfig::default()
        };
        let approximations = create_approximations(&grid, &config).unwrap();
        let tiles: Vec<Section> = approximations.iter().map(|a| a.tile()).collect();
        assert_eq!(
            tiles,
            vec![
                Section::new(0, 20, false),
                Section::new(20, 40, false),
                Section::new(40, 50, false),
            ]
        );
    }

    #[test]
    fn test_invalid_config() {
        let config = LocatorConfig {
            accuracy: -1.0,
            ..LocatorConfig::default()
        };
        assert!(matches!(
            create_approximations(&regular_grid(4, 4), &config),
            Err(PixelLocatorError::Config(_))
        ));
    }
}
