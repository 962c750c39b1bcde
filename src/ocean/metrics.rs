//! Finite-difference wave metrics: slope, curvature, vertical velocity, energy.
//!
//! A 5-point spatial stencil plus one forward time sample around (x, z, t).
//! The normalisation divisors are tuned so typical reference-field values land
//! in [0, 1]; the audio mapping downstream depends on them.

use super::field::HeightField;

/// Spatial stencil step (world units)
pub const STENCIL_EPSILON: f64 = 1.0;

/// Forward time step for the vertical velocity estimate (seconds)
pub const TIME_STEP_S: f64 = 1.0 / 120.0;

/// Gradient magnitude that maps to slope 1.0
pub const SLOPE_NORMALIZATION: f64 = 12.0;

/// Laplacian magnitude that maps to curvature ±1.0
pub const CURVATURE_NORMALIZATION: f64 = 8.0;

/// Vertical speed that maps to velocity 1.0 (world units per second)
pub const VELOCITY_NORMALIZATION: f64 = 150.0;

/// Energy blend weights: slope, vertical velocity, |curvature|
pub const ENERGY_WEIGHTS: (f64, f64, f64) = (0.6, 0.5, 0.3);

/// Local surface metrics at one point and time
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WaveSample {
    /// Normalised gradient magnitude, [0, 1]
    pub slope: f64,
    /// Normalised Laplacian, [-1, 1]
    pub curvature: f64,
    /// Normalised |dh/dt|, [0, 1]
    pub vertical_velocity: f64,
    /// Weighted blend of the above, [0, 1]
    pub energy: f64,
    /// Raw height at the sample point
    pub height_at_center: f64,
}

/// Stateless sampler over a height field snapshot
#[derive(Debug, Clone, Copy, Default)]
pub struct WaveMetricsSampler {
    field: HeightField,
}

impl WaveMetricsSampler {
    pub fn new(field: HeightField) -> Self {
        Self { field }
    }

    pub fn field(&self) -> &HeightField {
        &self.field
    }

    /// Sample surface metrics at (x, z, t)
    pub fn sample(&self, x: f64, z: f64, t: f64) -> WaveSample {
        let eps = STENCIL_EPSILON;
        let h = |x: f64, z: f64, t: f64| self.field.height(x, z, t);

        let h_c = h(x, z, t);
        let h_l = h(x - eps, z, t);
        let h_r = h(x + eps, z, t);
        let h_d = h(x, z - eps, t);
        let h_u = h(x, z + eps, t);

        // Central-difference gradient
        let d_x = (h_r - h_l) / (2.0 * eps);
        let d_z = (h_u - h_d) / (2.0 * eps);
        let slope = ((d_x * d_x + d_z * d_z).sqrt() / SLOPE_NORMALIZATION).min(1.0);

        // 5-point Laplacian
        let laplacian = (h_l + h_r + h_d + h_u - 4.0 * h_c) / (eps * eps);
        let curvature = (laplacian / CURVATURE_NORMALIZATION).clamp(-1.0, 1.0);

        // Forward difference in time
        let h_next = h(x, z, t + TIME_STEP_S);
        let velocity = (h_next - h_c) / TIME_STEP_S;
        let vertical_velocity = (velocity.abs() / VELOCITY_NORMALIZATION).clamp(0.0, 1.0);

        let (w_slope, w_velocity, w_curvature) = ENERGY_WEIGHTS;
        let energy = (slope * w_slope
            + vertical_velocity * w_velocity
            + curvature.abs() * w_curvature)
            .clamp(0.0, 1.0);

        WaveSample {
            slope,
            curvature,
            vertical_velocity,
            energy,
            height_at_center: h_c,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn in_range(sample: &WaveSample) -> bool {
        (0.0..=1.0).contains(&sample.slope)
            && (-1.0..=1.0).contains(&sample.curvature)
            && (0.0..=1.0).contains(&sample.vertical_velocity)
            && (0.0..=1.0).contains(&sample.energy)
    }

    #[test]
    fn test_sample_is_deterministic() {
        let sampler = WaveMetricsSampler::default();
        let a = sampler.sample(17.0, -4.5, 3.25);
        let b = sampler.sample(17.0, -4.5, 3.25);
        assert_eq!(a, b);
    }

    #[test]
    fn test_metrics_bounded_over_grid() {
        let sampler = WaveMetricsSampler::default();
        for ix in -10..10 {
            for iz in -10..10 {
                let t = (ix * 7 + iz) as f64 * 0.37;
                let sample = sampler.sample(ix as f64 * 53.0, iz as f64 * 41.0, t);
                assert!(in_range(&sample), "out of range: {:?}", sample);
            }
        }
    }

    #[test]
    fn test_center_height_matches_field() {
        let sampler = WaveMetricsSampler::default();
        let sample = sampler.sample(0.0, 0.0, 0.0);
        assert_eq!(sample.height_at_center, 8.0);
    }

    #[test]
    fn test_origin_metrics_by_hand() {
        // At t = 0 along the stencil only the small-argument terms contribute, so
        // recompute the reference numbers directly.
        let field = HeightField::default();
        let sampler = WaveMetricsSampler::new(field);
        let sample = sampler.sample(0.0, 0.0, 0.0);

        let d_x = (field.height(1.0, 0.0, 0.0) - field.height(-1.0, 0.0, 0.0)) / 2.0;
        let d_z = (field.height(0.0, 1.0, 0.0) - field.height(0.0, -1.0, 0.0)) / 2.0;
        let expected_slope = ((d_x * d_x + d_z * d_z).sqrt() / 12.0).min(1.0);
        assert!((sample.slope - expected_slope).abs() < 1e-12);

        // dh/dt at origin: 15*2 + 12*1.5 + 0 + 5*2.2 = 59
        let expected_velocity = 59.0 / 150.0;
        assert!((sample.vertical_velocity - expected_velocity).abs() < 1e-2);
    }

    #[test]
    fn test_flat_field_has_zero_energy() {
        use crate::params::{WaveFieldParams, WaveShape, WaveTerm};

        let flat = WaveTerm::new(WaveShape::Sin, 0.0, 0.0, 0.0, 0.0);
        let field = HeightField::new(&WaveFieldParams {
            terms: [flat; 4],
            time_wrap_s: None,
        })
        .unwrap();
        let sample = WaveMetricsSampler::new(field).sample(5.0, 5.0, 5.0);
        assert_eq!(sample.slope, 0.0);
        assert_eq!(sample.curvature, 0.0);
        assert_eq!(sample.vertical_velocity, 0.0);
        assert_eq!(sample.energy, 0.0);
    }
}
