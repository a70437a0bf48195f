//! Radar beam-propagation geometry.
//!
//! Uses the standard 4/3-effective-earth-radius model to relate a gate's
//! slant range and elevation to ground distance and height.

/// Mean earth radius, meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Effective-radius multiplier for standard atmospheric refraction.
pub const EFFECTIVE_RADIUS_FACTOR: f64 = 4.0 / 3.0;

/// Slant range (m) and elevation angle (deg) of a point at ground distance
/// `ground_m` and height `z_m` above the radar.
pub fn cartesian_to_antenna(ground_m: f64, z_m: f64) -> (f64, f64) {
    let re = EARTH_RADIUS_M * EFFECTIVE_RADIUS_FACTOR;
    let arc = ground_m / re;
    let h = re + z_m;

    // Radar at (0, re) from the effective earth center, target at angle `arc`
    let dx = h * arc.sin();
    let dy = h * arc.cos() - re;

    let range = (dx * dx + dy * dy).sqrt();
    let elevation = dy.atan2(dx).to_degrees();
    (range, elevation)
}

/// Ground distance (m) and height (m) of a gate at slant range `range_m` and
/// elevation `elevation_deg`. Inverse of [`cartesian_to_antenna`].
pub fn antenna_to_cartesian(range_m: f64, elevation_deg: f64) -> (f64, f64) {
    let re = EARTH_RADIUS_M * EFFECTIVE_RADIUS_FACTOR;
    let el = elevation_deg.to_radians();

    let z = (range_m * range_m + re * re + 2.0 * range_m * re * el.sin()).sqrt() - re;
    let ground = re * (range_m * el.cos() / (re + z)).asin();
    (ground, z)
}

/// Meteorological azimuth (deg, 0 = north, clockwise) of grid offsets
/// `x_m` east and `y_m` north.
pub fn azimuth_deg(x_m: f64, y_m: f64) -> f64 {
    let az = x_m.atan2(y_m).to_degrees();
    if az < 0.0 {
        az + 360.0
    } else {
        az
    }
}

/// Smallest absolute angular separation between two azimuths, degrees.
pub fn azimuth_distance_deg(a: f64, b: f64) -> f64 {
    let diff = (a - b).rem_euclid(360.0);
    diff.min(360.0 - diff)
}
