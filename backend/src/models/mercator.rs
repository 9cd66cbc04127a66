//! Spherical Web Mercator on the unit sphere.

use std::f64::consts::PI;

use super::geojson::LonLat;

/// Latitude limit of the Web Mercator projection.
pub const MAX_LATITUDE: f64 = 85.051_128_779_8;

/// Projected `y` of a latitude in degrees. Latitudes past the limit are clamped.
pub fn project_lat(lat: f64) -> f64 {
    let lat = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    (PI / 4.0 + lat / 2.0).tan().ln()
}

pub fn unproject_y(y: f64) -> f64 {
    (2.0 * y.exp().atan() - PI / 2.0).to_degrees()
}

/// Projects a position to `(x, y)` radians.
pub fn project(point: LonLat) -> (f64, f64) {
    (point.lon.to_radians(), project_lat(point.lat))
}

pub fn unproject(x: f64, y: f64) -> LonLat {
    LonLat::new(x.to_degrees(), unproject_y(y))
}
