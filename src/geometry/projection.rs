//! The fixed projection into the world plane.
//!
//! Polygon rings arrive as spherical web mercator (EPSG:3857) metres. All
//! downstream work happens in the tile plane at zoom 0: the whole world spans
//! `[0, WORLD_SIZE]` on both axes, x grows eastwards and y grows southwards.
//! Host pixel coordinates at zoom `z` are world coordinates scaled by `2^z`.

use std::f64::consts::PI;

use super::Point;

/// Equatorial radius used by spherical web mercator
pub const EARTH_RADIUS: f64 = 6_378_137.0;

/// Width and height of the world plane (one 256px tile at zoom 0)
pub const WORLD_SIZE: f64 = 256.0;

/// Latitudes beyond this are clamped, web mercator is undefined at the poles
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_6;

/// Project web mercator metres into the world plane
pub fn web_mercator_to_world(x: f64, y: f64) -> Point {
    let scale = WORLD_SIZE / (2.0 * PI * EARTH_RADIUS);
    Point::new(WORLD_SIZE / 2.0 + x * scale, WORLD_SIZE / 2.0 - y * scale)
}

/// Project a ring of `[x, y]` metre pairs
pub fn project_ring(coordinates: &[[f64; 2]]) -> Vec<Point> {
    coordinates
        .iter()
        .map(|&[x, y]| web_mercator_to_world(x, y))
        .collect()
}

/// WGS84 degrees to web mercator metres
///
/// # Returns
/// * `(x, y)` in metres
pub fn lat_lng_to_web_mercator(lat: f64, lng: f64) -> (f64, f64) {
    let lat = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    let x = EARTH_RADIUS * lng.to_radians();
    let y = EARTH_RADIUS * (PI / 4.0 + lat / 2.0).tan().ln();
    (x, y)
}

/// WGS84 degrees straight into the world plane
///
/// Host adapters use this to express their visible lat/lng rectangle as
/// world bounds.
pub fn lat_lng_to_world(lat: f64, lng: f64) -> Point {
    let (x, y) = lat_lng_to_web_mercator(lat, lng);
    web_mercator_to_world(x, y)
}

/// Pixels per world unit at `zoom`
pub fn zoom_scale(zoom: f64) -> f64 {
    2f64.powf(zoom)
}

/// Absolute pixel position of a world point at `zoom`
pub fn world_to_pixel(point: Point, zoom: f64) -> Point {
    let scale = zoom_scale(zoom);
    Point::new(point.x * scale, point.y * scale)
}

/// Inverse of [`world_to_pixel`]
pub fn pixel_to_world(point: Point, zoom: f64) -> Point {
    let scale = zoom_scale(zoom);
    Point::new(point.x / scale, point.y / scale)
}
