//! Polar-to-Cartesian gridding of radar volumes.
//!
//! Maps each Cartesian cell back through the 4/3-earth beam model to the
//! nearest sampled beam and gate. Cells no beam passes near stay NaN.

pub mod transforms;

use rayon::prelude::*;
use tracing::debug;

use level2::{GateFilter, RadarVolume};
use radar_common::{RadarError, RadarResult};
use transforms::{azimuth_deg, azimuth_distance_deg, cartesian_to_antenna};

/// Composite grid shape as (levels, rows, columns).
pub const GRID_SHAPE: (usize, usize, usize) = (30, 441, 441);

/// Vertical span of the composite grid, meters above the radar.
pub const ALTITUDE_LIMITS_M: (f32, f32) = (0.0, 10_000.0);

/// Horizontal half-extent cap, meters.
pub const MAX_RANGE_CAP_M: f32 = 250_000.0;

/// Widest accepted gap between a cell's azimuth and the nearest ray, degrees.
pub const AZIMUTH_TOLERANCE_DEG: f64 = 1.5;

/// Widest accepted gap between a cell's elevation and the nearest sweep,
/// degrees. Roughly half the widest inter-sweep spacing at low elevations.
pub const ELEVATION_TOLERANCE_DEG: f64 = 1.6;

/// Horizontal half-extent for a volume: ceil of the largest gate range,
/// capped at [`MAX_RANGE_CAP_M`].
pub fn capped_half_extent_m(volume: &RadarVolume) -> f32 {
    let max_range = volume.max_range_m().ceil();
    if max_range > MAX_RANGE_CAP_M {
        MAX_RANGE_CAP_M
    } else {
        max_range
    }
}

/// Target grid geometry.
#[derive(Debug, Clone)]
pub struct GridConfig {
    /// (nz, ny, nx)
    pub shape: (usize, usize, usize),
    /// Inclusive altitude span, meters.
    pub altitude_limits_m: (f32, f32),
    /// Symmetric horizontal half-extent, meters.
    pub half_extent_m: f32,
}

impl GridConfig {
    /// The fixed composite geometry for a volume, with the capped extent.
    pub fn composite_default(volume: &RadarVolume) -> Self {
        Self {
            shape: GRID_SHAPE,
            altitude_limits_m: ALTITUDE_LIMITS_M,
            half_extent_m: capped_half_extent_m(volume),
        }
    }
}

/// A regridded volume: `data[z][y][x]`, row `y = 0` at the southern edge.
#[derive(Debug, Clone)]
pub struct CartesianGrid {
    nz: usize,
    ny: usize,
    nx: usize,
    half_extent_m: f32,
    data: Vec<f32>,
}

impl CartesianGrid {
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.nz, self.ny, self.nx)
    }

    pub fn half_extent_m(&self) -> f32 {
        self.half_extent_m
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn value(&self, z: usize, y: usize, x: usize) -> f32 {
        self.data[(z * self.ny + y) * self.nx + x]
    }

    /// Column maximum across levels, NaN where no level has data.
    pub fn column_max(&self) -> Vec<f32> {
        let plane = self.ny * self.nx;
        let mut out = vec![f32::NAN; plane];
        for level in self.data.chunks_exact(plane) {
            for (acc, &v) in out.iter_mut().zip(level) {
                if !v.is_nan() && !(*acc >= v) {
                    *acc = v;
                }
            }
        }
        out
    }
}

/// Per-sweep azimuth lookup: one-degree bins over the sweep's rays.
struct SweepIndex {
    elevation_deg: f64,
    bins: Vec<Option<usize>>,
}

impl SweepIndex {
    fn build(volume: &RadarVolume, sweep: usize) -> Self {
        let rays = volume.sweep_rays(sweep);
        let mut elevation_sum = 0.0;
        let mut bins = vec![None; 360];
        let count = rays.len();
        for ray in rays {
            elevation_sum += volume.elevation_deg(ray) as f64;
            let bin = (volume.azimuth_deg(ray) as f64).rem_euclid(360.0) as usize % 360;
            bins[bin] = Some(ray);
        }
        Self {
            elevation_deg: elevation_sum / count.max(1) as f64,
            bins,
        }
    }

    /// Ray nearest in azimuth, within [`AZIMUTH_TOLERANCE_DEG`].
    fn nearest_ray(&self, volume: &RadarVolume, az: f64) -> Option<usize> {
        let bin = az.rem_euclid(360.0) as usize % 360;
        let mut best: Option<(f64, usize)> = None;
        for offset in [-1i64, 0, 1] {
            let candidate_bin = (bin as i64 + offset).rem_euclid(360) as usize;
            if let Some(ray) = self.bins[candidate_bin] {
                let dist = azimuth_distance_deg(az, volume.azimuth_deg(ray) as f64);
                if best.map_or(true, |(d, _)| dist < d) {
                    best = Some((dist, ray));
                }
            }
        }
        best.filter(|&(dist, _)| dist <= AZIMUTH_TOLERANCE_DEG)
            .map(|(_, ray)| ray)
    }
}

/// Inclusive linspace over `[lo, hi]` with `n` points.
fn axis(lo: f32, hi: f32, n: usize) -> Vec<f32> {
    if n == 1 {
        return vec![lo];
    }
    let step = (hi - lo) as f64 / (n - 1) as f64;
    (0..n).map(|i| (lo as f64 + i as f64 * step) as f32).collect()
}

/// Interpolate the filtered volume onto a Cartesian grid.
pub fn grid_volume(
    volume: &RadarVolume,
    filter: &GateFilter,
    config: &GridConfig,
) -> RadarResult<CartesianGrid> {
    let (nz, ny, nx) = config.shape;
    if nz == 0 || ny == 0 || nx == 0 {
        return Err(RadarError::Grid("grid shape has a zero dimension".into()));
    }
    let range = volume.range_m();
    if range.len() < 2 {
        return Err(RadarError::Grid("volume has too few gates to grid".into()));
    }
    let gate_spacing = (range[1] - range[0]) as f64;
    let first_gate = range[0] as f64;
    let max_range = volume.max_range_m() as f64;

    let field = filter.apply(volume);
    let sweeps: Vec<SweepIndex> = (0..volume.nsweeps())
        .map(|s| SweepIndex::build(volume, s))
        .collect();

    let z_axis = axis(config.altitude_limits_m.0, config.altitude_limits_m.1, nz);
    let y_axis = axis(-config.half_extent_m, config.half_extent_m, ny);
    let x_axis = axis(-config.half_extent_m, config.half_extent_m, nx);

    let ngates = volume.ngates();
    let plane = ny * nx;
    let mut data = vec![f32::NAN; nz * plane];

    data.par_chunks_mut(plane)
        .zip(z_axis.par_iter())
        .for_each(|(level, &z)| {
            for (iy, &y) in y_axis.iter().enumerate() {
                for (ix, &x) in x_axis.iter().enumerate() {
                    let ground = (x as f64).hypot(y as f64);
                    let (slant, elevation) = cartesian_to_antenna(ground, z as f64);
                    if slant < first_gate || slant > max_range {
                        continue;
                    }

                    let sweep = sweeps
                        .iter()
                        .min_by(|a, b| {
                            (a.elevation_deg - elevation)
                                .abs()
                                .total_cmp(&(b.elevation_deg - elevation).abs())
                        })
                        .filter(|s| (s.elevation_deg - elevation).abs() <= ELEVATION_TOLERANCE_DEG);
                    let Some(sweep) = sweep else { continue };

                    let az = azimuth_deg(x as f64, y as f64);
                    let Some(ray) = sweep.nearest_ray(volume, az) else {
                        continue;
                    };

                    let gate = ((slant - first_gate) / gate_spacing).round() as usize;
                    if gate < ngates {
                        level[iy * nx + ix] = field[ray * ngates + gate];
                    }
                }
            }
        });

    debug!(
        nz,
        ny,
        nx,
        half_extent_m = config.half_extent_m,
        "Gridded volume"
    );

    Ok(CartesianGrid {
        nz,
        ny,
        nx,
        half_extent_m: config.half_extent_m,
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::{uniform_volume, VolumeSpec};

    #[test]
    fn test_capped_half_extent_applies_cap_exactly() {
        // 1832 gates at 250 m spacing reach ~460 km, well past the cap
        let volume = uniform_volume(&VolumeSpec {
            ngates: 1832,
            ..VolumeSpec::default()
        });
        assert_eq!(capped_half_extent_m(&volume), 250_000.0);
    }

    #[test]
    fn test_uncapped_half_extent_uses_volume_range() {
        let spec = VolumeSpec {
            ngates: 400,
            ..VolumeSpec::default()
        };
        let volume = uniform_volume(&spec);
        let expected = volume.max_range_m().ceil();
        assert!(expected < MAX_RANGE_CAP_M);
        assert_eq!(capped_half_extent_m(&volume), expected);
    }

    #[test]
    fn test_axis_is_inclusive() {
        let ax = axis(-100.0, 100.0, 5);
        assert_eq!(ax, vec![-100.0, -50.0, 0.0, 50.0, 100.0]);
    }

    #[test]
    fn test_grid_samples_uniform_volume() {
        let spec = VolumeSpec {
            ngates: 400,
            fill_dbz: 35.0,
            ..VolumeSpec::default()
        };
        let volume = uniform_volume(&spec);
        let filter = GateFilter::new(&volume);
        let config = GridConfig {
            shape: (4, 41, 41),
            altitude_limits_m: (0.0, 3_000.0),
            half_extent_m: 80_000.0,
        };

        let grid = grid_volume(&volume, &filter, &config).unwrap();
        assert_eq!(grid.shape(), (4, 41, 41));

        // A cell 40 km north of the radar sits under the 0.5 degree beam at
        // roughly 450 m altitude; the z = 1000 m level is nearest to it.
        let composite = grid.column_max();
        let center = 20;
        let north = composite[30 * 41 + center];
        assert_eq!(north, 35.0);

        // Beyond the last gate nothing is sampled.
        let far_corner = composite[0];
        assert!(far_corner.is_nan());
    }

    #[test]
    fn test_grid_respects_filter() {
        let spec = VolumeSpec {
            ngates: 400,
            fill_dbz: 5.0, // below the quality floor
            ..VolumeSpec::default()
        };
        let volume = uniform_volume(&spec);
        let mut filter = GateFilter::new(&volume);
        filter.exclude_outside(&volume, 10.0, 80.0);
        let config = GridConfig {
            shape: (3, 21, 21),
            altitude_limits_m: (0.0, 2_000.0),
            half_extent_m: 50_000.0,
        };

        let grid = grid_volume(&volume, &filter, &config).unwrap();
        assert!(grid.data().iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_column_max_ignores_nan_levels() {
        let grid = CartesianGrid {
            nz: 3,
            ny: 1,
            nx: 2,
            half_extent_m: 1000.0,
            data: vec![
                10.0,
                f32::NAN, // z0
                f32::NAN,
                f32::NAN, // z1
                25.0,
                f32::NAN, // z2
            ],
        };
        let composite = grid.column_max();
        assert_eq!(composite[0], 25.0);
        assert!(composite[1].is_nan());
    }
}
