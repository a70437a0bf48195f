//! Reflectivity color scale.

/// One anchor of a piecewise-linear color gradient.
#[derive(Debug, Clone, Copy)]
pub struct ColorStop {
    pub dbz: f32,
    pub color: [u8; 3],
}

/// Perceptually-ordered reflectivity scale, light blue through deep
/// magenta. Interpolation between stops is linear per channel.
const REFLECTIVITY_STOPS: &[ColorStop] = &[
    ColorStop { dbz: 0.0, color: [100, 150, 205] },
    ColorStop { dbz: 10.0, color: [60, 100, 190] },
    ColorStop { dbz: 20.0, color: [70, 175, 90] },
    ColorStop { dbz: 30.0, color: [220, 215, 60] },
    ColorStop { dbz: 40.0, color: [240, 150, 45] },
    ColorStop { dbz: 50.0, color: [235, 65, 45] },
    ColorStop { dbz: 60.0, color: [180, 35, 80] },
    ColorStop { dbz: 70.0, color: [200, 90, 190] },
    ColorStop { dbz: 75.0, color: [245, 235, 245] },
];

/// A value-to-color gradient over a fixed dBZ domain.
#[derive(Debug, Clone)]
pub struct Colormap {
    stops: &'static [ColorStop],
}

impl Colormap {
    /// The composite reflectivity scale.
    pub fn reflectivity() -> Self {
        Self {
            stops: REFLECTIVITY_STOPS,
        }
    }

    /// Inclusive value domain covered by the stops.
    pub fn domain(&self) -> (f32, f32) {
        (
            self.stops.first().expect("stops are non-empty").dbz,
            self.stops.last().expect("stops are non-empty").dbz,
        )
    }

    /// Sample the gradient; values outside the domain clamp to the ends.
    pub fn sample(&self, dbz: f32) -> [u8; 3] {
        let stops = self.stops;
        if dbz <= stops[0].dbz {
            return stops[0].color;
        }
        if dbz >= stops[stops.len() - 1].dbz {
            return stops[stops.len() - 1].color;
        }

        let upper = stops
            .iter()
            .position(|s| s.dbz >= dbz)
            .expect("dbz is below the last stop");
        let lo = stops[upper - 1];
        let hi = stops[upper];
        let t = (dbz - lo.dbz) / (hi.dbz - lo.dbz);

        let mut color = [0u8; 3];
        for (i, channel) in color.iter_mut().enumerate() {
            let c = lo.color[i] as f32 * (1.0 - t) + hi.color[i] as f32 * t;
            *channel = c.round() as u8;
        }
        color
    }

    /// Tick values for a legend, every `step` dBZ across the domain.
    pub fn ticks(&self, step: f32) -> Vec<f32> {
        let (lo, hi) = self.domain();
        let mut ticks = Vec::new();
        let mut v = lo;
        while v <= hi + 1e-3 {
            ticks.push(v);
            v += step;
        }
        ticks
    }
}
