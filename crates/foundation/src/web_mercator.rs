use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use crate::geo::LngLat;

/// Pixel size of the zoom-0 world.
pub const WORLD_TILE_SIZE: f64 = 512.0;
/// Largest latitude representable in Web-Mercator (degrees).
pub const MAX_LATITUDE: f64 = 85.051_128_78;

/// Scale factor at `zoom`; fractional zooms are allowed.
pub fn scale(zoom: f64) -> f64 {
    2f64.powf(zoom)
}

/// Pixel size of the world at `zoom`.
pub fn world_size(zoom: f64) -> f64 {
    WORLD_TILE_SIZE * scale(zoom)
}

/// Projects to zoom-0 world pixels, x growing east and y growing south.
///
/// Latitude is clamped to ±[`MAX_LATITUDE`]; longitude passes through, so
/// positions outside ±180 project outside the [0, [`WORLD_TILE_SIZE`]) range.
pub fn lng_lat_to_world(pos: LngLat) -> [f64; 2] {
    let lat = pos.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE);
    let phi = lat.to_radians();
    let x = WORLD_TILE_SIZE * (0.5 + pos.lng / 360.0);
    let y = WORLD_TILE_SIZE * (0.5 - (FRAC_PI_4 + phi / 2.0).tan().ln() / (2.0 * PI));
    [x, y]
}

/// Inverse of [`lng_lat_to_world`].
pub fn world_to_lng_lat(world: [f64; 2]) -> LngLat {
    let lng = (world[0] / WORLD_TILE_SIZE - 0.5) * 360.0;
    let n = (0.5 - world[1] / WORLD_TILE_SIZE) * 2.0 * PI;
    let lat = (2.0 * n.exp().atan() - FRAC_PI_2).to_degrees();
    LngLat::new(lng, lat)
}
