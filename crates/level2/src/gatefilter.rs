//! Per-gate quality-control exclusion mask.

use crate::volume::RadarVolume;

/// Lower reflectivity bound kept by the quality filter, dBZ (inclusive).
pub const REFLECTIVITY_MIN_DBZ: f32 = 10.0;

/// Upper reflectivity bound kept by the quality filter, dBZ (inclusive).
pub const REFLECTIVITY_MAX_DBZ: f32 = 80.0;

/// Boolean exclusion mask over the `[ray, gate]` shape of a volume.
///
/// Starts with every gate included; each `exclude_*` call ORs more gates
/// into the mask.
#[derive(Debug, Clone)]
pub struct GateFilter {
    nrays: usize,
    ngates: usize,
    excluded: Vec<bool>,
}

impl GateFilter {
    pub fn new(volume: &RadarVolume) -> Self {
        Self {
            nrays: volume.nrays(),
            ngates: volume.ngates(),
            excluded: vec![false; volume.nrays() * volume.ngates()],
        }
    }

    /// Exclude every gate of rays collected while the antenna was moving
    /// between sweeps.
    pub fn exclude_transition(&mut self, volume: &RadarVolume) {
        for ray in 0..self.nrays {
            if volume.is_transition(ray) {
                let row = ray * self.ngates;
                self.excluded[row..row + self.ngates].fill(true);
            }
        }
    }

    /// Exclude gates whose reflectivity is masked (NaN).
    pub fn exclude_masked(&mut self, volume: &RadarVolume) {
        for (flag, value) in self.excluded.iter_mut().zip(volume.reflectivity()) {
            if value.is_nan() {
                *flag = true;
            }
        }
    }

    /// Exclude gates with reflectivity outside `[min, max]` (inclusive).
    pub fn exclude_outside(&mut self, volume: &RadarVolume, min: f32, max: f32) {
        for (flag, value) in self.excluded.iter_mut().zip(volume.reflectivity()) {
            if !(*value >= min && *value <= max) {
                *flag = true;
            }
        }
    }

    pub fn is_excluded(&self, ray: usize, gate: usize) -> bool {
        self.excluded[ray * self.ngates + gate]
    }

    pub fn included_count(&self) -> usize {
        self.excluded.iter().filter(|&&e| !e).count()
    }

    /// Copy of the reflectivity field with excluded gates set to NaN.
    pub fn apply(&self, volume: &RadarVolume) -> Vec<f32> {
        volume
            .reflectivity()
            .iter()
            .zip(&self.excluded)
            .map(|(&value, &excluded)| if excluded { f32::NAN } else { value })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use radar_common::RadarResult;

    fn volume_with(rays: Vec<Vec<f32>>, transition: Vec<bool>) -> RadarResult<RadarVolume> {
        let n = rays.len();
        RadarVolume::from_rays(
            rays,
            (0..n).map(|i| i as f32 * 90.0).collect(),
            vec![0.5; n],
            transition,
            vec![0],
            1000.0,
            250.0,
        )
    }

    #[test]
    fn test_exclude_outside_keeps_exactly_in_range_gates() {
        // Below, at-lower-bound, mid, at-upper-bound, above
        let vol = volume_with(
            vec![vec![5.0, 10.0, 45.0, 80.0, 92.5]],
            vec![false],
        )
        .unwrap();
        let mut filter = GateFilter::new(&vol);
        filter.exclude_outside(&vol, REFLECTIVITY_MIN_DBZ, REFLECTIVITY_MAX_DBZ);

        assert!(filter.is_excluded(0, 0));
        assert!(!filter.is_excluded(0, 1));
        assert!(!filter.is_excluded(0, 2));
        assert!(!filter.is_excluded(0, 3));
        assert!(filter.is_excluded(0, 4));
    }

    #[test]
    fn test_exclude_masked() {
        let vol = volume_with(vec![vec![f32::NAN, 30.0]], vec![false]).unwrap();
        let mut filter = GateFilter::new(&vol);
        filter.exclude_masked(&vol);

        assert!(filter.is_excluded(0, 0));
        assert!(!filter.is_excluded(0, 1));
    }

    #[test]
    fn test_exclude_transition_masks_whole_ray() {
        let vol = volume_with(
            vec![vec![30.0, 30.0], vec![30.0, 30.0]],
            vec![true, false],
        )
        .unwrap();
        let mut filter = GateFilter::new(&vol);
        filter.exclude_transition(&vol);

        assert!(filter.is_excluded(0, 0));
        assert!(filter.is_excluded(0, 1));
        assert!(!filter.is_excluded(1, 0));
        assert_eq!(filter.included_count(), 2);
    }

    #[test]
    fn test_exclusions_combine_by_or() {
        let vol = volume_with(
            vec![vec![5.0, 30.0, f32::NAN], vec![30.0, 95.0, 50.0]],
            vec![true, false],
        )
        .unwrap();
        let mut filter = GateFilter::new(&vol);
        filter.exclude_transition(&vol);
        filter.exclude_masked(&vol);
        filter.exclude_outside(&vol, REFLECTIVITY_MIN_DBZ, REFLECTIVITY_MAX_DBZ);

        // Only ray 1 gates inside [10, 80] survive
        let field = filter.apply(&vol);
        let valid: Vec<f32> = field.iter().copied().filter(|v| !v.is_nan()).collect();
        assert_eq!(valid, vec![30.0, 50.0]);
    }

    #[test]
    fn test_apply_preserves_included_values() {
        let vol = volume_with(vec![vec![15.0, 25.0]], vec![false]).unwrap();
        let filter = GateFilter::new(&vol);
        assert_eq!(filter.apply(&vol), vec![15.0, 25.0]);
    }
}
