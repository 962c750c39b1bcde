//! Ripple emission parameters.
//!
//! The frame-rate baseline and fade rate were tuned against a 60fps render loop;
//! changing them changes the look, not a bug.

use std::ops::Range;

use crate::error::ConfigError;

/// Ripple pool and emitter configuration
#[derive(Debug, Clone)]
pub struct RippleParams {
    /// Maximum live ripples (oldest is recycled beyond this)
    pub capacity: usize,

    /// Random terminal radius range, scaled by intensity (world units)
    pub max_radius_range: Range<f64>,

    /// Random growth speed range, scaled by intensity (world units per baseline frame)
    pub speed_range: Range<f64>,

    /// Opacity lost per baseline frame once active
    pub fade_per_frame: f64,

    /// Frame rate the growth and fade constants were authored at (Hz)
    pub frame_rate_baseline: f64,

    /// Rim lift per unit intensity (world units)
    pub rim_amplitude_scale: f64,

    /// Radius over which the rim lift decays by 1/e (world units)
    pub rim_falloff_radius: f64,

    /// Concentric rings per splash
    pub splash_rings: usize,

    /// Delay between successive splash rings (seconds)
    pub ring_delay_s: f64,

    /// Intensity multiplier applied per successive ring
    pub ring_intensity_falloff: f64,

    /// RNG seed for radius/speed draws (None = seeded from entropy)
    pub seed: Option<u64>,
}

impl Default for RippleParams {
    fn default() -> Self {
        Self {
            capacity: 400,
            max_radius_range: 80.0..180.0,
            speed_range: 1.5..3.5,
            fade_per_frame: 0.005,
            frame_rate_baseline: 60.0,
            rim_amplitude_scale: 12.0,
            rim_falloff_radius: 40.0,
            splash_rings: 3,
            ring_delay_s: 0.15,
            ring_intensity_falloff: 0.7,
            seed: None,
        }
    }
}

impl RippleParams {
    /// Validate configuration (non-empty ranges, positive capacity, etc.)
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::new("capacity", "must be > 0"));
        }
        check_range("max_radius_range", &self.max_radius_range)?;
        check_range("speed_range", &self.speed_range)?;
        if !(self.fade_per_frame > 0.0) {
            return Err(ConfigError::new(
                "fade_per_frame",
                format!("must be > 0, got {}", self.fade_per_frame),
            ));
        }
        if !(self.frame_rate_baseline > 0.0) {
            return Err(ConfigError::new(
                "frame_rate_baseline",
                format!("must be > 0, got {}", self.frame_rate_baseline),
            ));
        }
        if !(self.rim_falloff_radius > 0.0) {
            return Err(ConfigError::new(
                "rim_falloff_radius",
                format!("must be > 0, got {}", self.rim_falloff_radius),
            ));
        }
        if self.splash_rings == 0 {
            return Err(ConfigError::new("splash_rings", "must be >= 1"));
        }
        if !(self.ring_delay_s >= 0.0) {
            return Err(ConfigError::new(
                "ring_delay_s",
                format!("must be >= 0, got {}", self.ring_delay_s),
            ));
        }
        Ok(())
    }
}

fn check_range(field: &'static str, range: &Range<f64>) -> Result<(), ConfigError> {
    if !range.start.is_finite() || !range.end.is_finite() || range.start < 0.0 {
        return Err(ConfigError::new(
            field,
            format!("bounds must be finite and non-negative, got {:?}", range),
        ));
    }
    if range.start >= range.end {
        return Err(ConfigError::new(
            field,
            format!("range is empty: {:?}", range),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(RippleParams::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_inverted_range() {
        let params = RippleParams {
            speed_range: 3.5..1.5,
            ..Default::default()
        };
        let err = params.validate().unwrap_err();
        assert_eq!(err.field, "speed_range");
    }

    #[test]
    fn test_validate_rejects_zero_capacity() {
        let params = RippleParams {
            capacity: 0,
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }
}
