//! Radar volume structure decoded from a Level-II archive.

use nexrad_data::volume;
use nexrad_model::data::MomentValue;
use tracing::debug;

use radar_common::{RadarError, RadarResult};

/// Range to the center of the first reflectivity gate, meters.
pub const FIRST_GATE_RANGE_M: f32 = 2_125.0;

/// Reflectivity gate spacing, meters (Archive II split-cut resolution).
pub const GATE_SPACING_M: f32 = 250.0;

/// Number of trailing gate columns trimmed from every ray before gridding.
pub const TRAILING_GATE_TRIM: usize = 10;

/// A volume scan flattened to a dense `[ray, gate]` reflectivity matrix.
///
/// Rays from all sweeps are stacked in scan order. Missing or censored gates
/// hold `NaN`; shorter rays are NaN-padded out to the widest ray.
#[derive(Debug, Clone)]
pub struct RadarVolume {
    nrays: usize,
    ngates: usize,
    reflectivity: Vec<f32>,
    azimuth_deg: Vec<f32>,
    elevation_deg: Vec<f32>,
    transition: Vec<bool>,
    sweep_starts: Vec<usize>,
    range_m: Vec<f32>,
}

impl RadarVolume {
    /// Assemble a volume from per-ray data.
    ///
    /// `rays` holds one gate vector per ray; `sweep_starts` marks the first
    /// ray index of each sweep in ascending order.
    pub fn from_rays(
        rays: Vec<Vec<f32>>,
        azimuth_deg: Vec<f32>,
        elevation_deg: Vec<f32>,
        transition: Vec<bool>,
        sweep_starts: Vec<usize>,
        first_gate_range_m: f32,
        gate_spacing_m: f32,
    ) -> RadarResult<Self> {
        let nrays = rays.len();
        if nrays == 0 {
            return Err(RadarError::EmptyVolume("volume has no rays".into()));
        }
        if azimuth_deg.len() != nrays || elevation_deg.len() != nrays || transition.len() != nrays {
            return Err(RadarError::Internal(format!(
                "per-ray arrays disagree: {} rays, {} azimuths, {} elevations, {} transitions",
                nrays,
                azimuth_deg.len(),
                elevation_deg.len(),
                transition.len()
            )));
        }
        if sweep_starts.is_empty()
            || sweep_starts[0] != 0
            || sweep_starts.windows(2).any(|w| w[0] >= w[1])
            || *sweep_starts.last().unwrap() >= nrays
        {
            return Err(RadarError::Internal("malformed sweep boundaries".into()));
        }

        let ngates = rays.iter().map(Vec::len).max().unwrap_or(0);
        if ngates == 0 {
            return Err(RadarError::EmptyVolume("volume has no gates".into()));
        }

        let mut reflectivity = Vec::with_capacity(nrays * ngates);
        for ray in &rays {
            reflectivity.extend_from_slice(ray);
            reflectivity.extend(std::iter::repeat(f32::NAN).take(ngates - ray.len()));
        }

        let range_m = (0..ngates)
            .map(|g| first_gate_range_m + g as f32 * gate_spacing_m)
            .collect();

        Ok(Self {
            nrays,
            ngates,
            reflectivity,
            azimuth_deg,
            elevation_deg,
            transition,
            sweep_starts,
            range_m,
        })
    }

    /// Decode an Archive II volume file into memory.
    ///
    /// Rays without a reflectivity moment (Doppler-only split cuts) are
    /// dropped. Censored gates decode to `NaN`.
    pub fn from_archive(data: &[u8]) -> RadarResult<Self> {
        let file = volume::File::new(data.to_vec());
        let scan = file
            .scan()
            .map_err(|e| RadarError::Decode(e.to_string()))?;

        let mut rays: Vec<Vec<f32>> = Vec::new();
        let mut azimuth_deg = Vec::new();
        let mut elevation_deg = Vec::new();
        let mut sweep_starts = Vec::new();

        for sweep in scan.sweeps() {
            let start = rays.len();
            for ray in sweep.radials() {
                let Some(moment) = ray.reflectivity() else {
                    continue;
                };
                let gates: Vec<f32> = moment
                    .values()
                    .iter()
                    .map(|value| match value {
                        MomentValue::Value(dbz) => *dbz,
                        MomentValue::BelowThreshold => f32::NAN,
                        MomentValue::RangeFolded => f32::NAN,
                    })
                    .collect();
                if gates.is_empty() {
                    continue;
                }
                rays.push(gates);
                azimuth_deg.push(ray.azimuth_angle_degrees());
                elevation_deg.push(ray.elevation_angle_degrees());
            }
            if rays.len() > start {
                sweep_starts.push(start);
            }
        }

        if rays.is_empty() {
            return Err(RadarError::EmptyVolume(
                "archive contains no reflectivity rays".into(),
            ));
        }

        debug!(
            sweeps = sweep_starts.len(),
            rays = rays.len(),
            "Decoded archive volume"
        );

        // Archive volumes carry no per-ray antenna-transition flag.
        let transition = vec![false; rays.len()];

        Self::from_rays(
            rays,
            azimuth_deg,
            elevation_deg,
            transition,
            sweep_starts,
            FIRST_GATE_RANGE_M,
            GATE_SPACING_M,
        )
    }

    pub fn nrays(&self) -> usize {
        self.nrays
    }

    pub fn ngates(&self) -> usize {
        self.ngates
    }

    pub fn nsweeps(&self) -> usize {
        self.sweep_starts.len()
    }

    /// Ray-index range of sweep `i`.
    pub fn sweep_rays(&self, i: usize) -> std::ops::Range<usize> {
        let start = self.sweep_starts[i];
        let end = self
            .sweep_starts
            .get(i + 1)
            .copied()
            .unwrap_or(self.nrays);
        start..end
    }

    pub fn reflectivity(&self) -> &[f32] {
        &self.reflectivity
    }

    pub fn refl(&self, ray: usize, gate: usize) -> f32 {
        self.reflectivity[ray * self.ngates + gate]
    }

    pub fn azimuth_deg(&self, ray: usize) -> f32 {
        self.azimuth_deg[ray]
    }

    pub fn elevation_deg(&self, ray: usize) -> f32 {
        self.elevation_deg[ray]
    }

    pub fn is_transition(&self, ray: usize) -> bool {
        self.transition[ray]
    }

    /// Gate-center range axis, meters.
    pub fn range_m(&self) -> &[f32] {
        &self.range_m
    }

    /// Largest gate-center range in the volume, meters.
    pub fn max_range_m(&self) -> f32 {
        *self.range_m.last().expect("volume always has gates")
    }

    /// Mask the trailing `n` gate columns of every ray.
    ///
    /// The outermost gates of archive reflectivity rays routinely carry
    /// ring artifacts; the edge trim removes them before filtering.
    pub fn mask_trailing_gates(&mut self, n: usize) {
        let n = n.min(self.ngates);
        for ray in 0..self.nrays {
            let row = ray * self.ngates;
            for gate in self.ngates - n..self.ngates {
                self.reflectivity[row + gate] = f32::NAN;
            }
        }
    }
}
