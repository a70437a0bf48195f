//! Synthetic volume generators.

use level2::RadarVolume;

/// Geometry and fill for a synthetic volume.
#[derive(Debug, Clone)]
pub struct VolumeSpec {
    /// Number of sweeps; sweep `i` sits at `0.5 + i` degrees elevation.
    pub nsweeps: usize,
    /// Rays per sweep, evenly spaced in azimuth starting at north.
    pub rays_per_sweep: usize,
    /// Gates per ray.
    pub ngates: usize,
    /// Range to the first gate center, meters.
    pub first_gate_m: f32,
    /// Gate spacing, meters.
    pub gate_spacing_m: f32,
    /// Reflectivity written to every gate, dBZ.
    pub fill_dbz: f32,
}

impl Default for VolumeSpec {
    fn default() -> Self {
        Self {
            nsweeps: 1,
            rays_per_sweep: 360,
            ngates: 400,
            first_gate_m: 2_125.0,
            gate_spacing_m: 250.0,
            fill_dbz: 30.0,
        }
    }
}

impl VolumeSpec {
    fn geometry(&self) -> (Vec<f32>, Vec<f32>, Vec<usize>) {
        let nrays = self.nsweeps * self.rays_per_sweep;
        let az_step = 360.0 / self.rays_per_sweep as f32;
        let mut azimuth = Vec::with_capacity(nrays);
        let mut elevation = Vec::with_capacity(nrays);
        let mut sweep_starts = Vec::with_capacity(self.nsweeps);
        for sweep in 0..self.nsweeps {
            sweep_starts.push(sweep * self.rays_per_sweep);
            for ray in 0..self.rays_per_sweep {
                azimuth.push(ray as f32 * az_step);
                elevation.push(0.5 + sweep as f32);
            }
        }
        (azimuth, elevation, sweep_starts)
    }
}

/// A volume where every gate holds `spec.fill_dbz`.
///
/// ```
/// use test_utils::{uniform_volume, VolumeSpec};
///
/// let vol = uniform_volume(&VolumeSpec::default());
/// assert_eq!(vol.nrays(), 360);
/// assert_eq!(vol.refl(0, 0), 30.0);
/// ```
pub fn uniform_volume(spec: &VolumeSpec) -> RadarVolume {
    let (azimuth, elevation, sweep_starts) = spec.geometry();
    let nrays = azimuth.len();
    let rays = vec![vec![spec.fill_dbz; spec.ngates]; nrays];

    RadarVolume::from_rays(
        rays,
        azimuth,
        elevation,
        vec![false; nrays],
        sweep_starts,
        spec.first_gate_m,
        spec.gate_spacing_m,
    )
    .expect("synthetic volume is well-formed")
}

/// A volume with a reflectivity core in the north-east quadrant.
///
/// Gates in rays with azimuth 30..60 degrees and the first third of the
/// range axis hold `fill_dbz + 20`; everything else holds `fill_dbz`. Gives
/// renders visible structure without randomness.
pub fn storm_volume(spec: &VolumeSpec) -> RadarVolume {
    let (azimuth, elevation, sweep_starts) = spec.geometry();
    let nrays = azimuth.len();
    let core_gates = spec.ngates / 3;

    let rays: Vec<Vec<f32>> = (0..nrays)
        .map(|ray| {
            let in_core_az = (30.0..60.0).contains(&azimuth[ray]);
            (0..spec.ngates)
                .map(|gate| {
                    if in_core_az && gate < core_gates {
                        spec.fill_dbz + 20.0
                    } else {
                        spec.fill_dbz
                    }
                })
                .collect()
        })
        .collect();

    RadarVolume::from_rays(
        rays,
        azimuth,
        elevation,
        vec![false; nrays],
        sweep_starts,
        spec.first_gate_m,
        spec.gate_spacing_m,
    )
    .expect("synthetic volume is well-formed")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_volume_shape() {
        let spec = VolumeSpec {
            nsweeps: 3,
            rays_per_sweep: 8,
            ngates: 16,
            ..VolumeSpec::default()
        };
        let vol = uniform_volume(&spec);
        assert_eq!(vol.nrays(), 24);
        assert_eq!(vol.ngates(), 16);
        assert_eq!(vol.nsweeps(), 3);
        assert_eq!(vol.elevation_deg(0), 0.5);
        assert_eq!(vol.elevation_deg(23), 2.5);
        assert_eq!(vol.azimuth_deg(1), 45.0);
    }

    #[test]
    fn test_storm_volume_core() {
        let spec = VolumeSpec {
            rays_per_sweep: 36,
            ngates: 30,
            fill_dbz: 20.0,
            ..VolumeSpec::default()
        };
        let vol = storm_volume(&spec);
        // Ray at azimuth 40 degrees is inside the core
        assert_eq!(vol.refl(4, 0), 40.0);
        assert_eq!(vol.refl(4, 29), 20.0);
        // Ray at azimuth 90 degrees is outside
        assert_eq!(vol.refl(9, 0), 20.0);
    }
}
