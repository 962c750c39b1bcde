//! Wave field parameters: the fixed sinusoid set behind the ocean surface.

use std::f64::consts::PI;

use crate::error::ConfigError;

/// Periodic shape of a single wave term
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaveShape {
    Sin,
    Cos,
}

/// One travelling sinusoid: `shape(kx*x + kz*z + omega*t) * amplitude`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveTerm {
    pub shape: WaveShape,

    /// Spatial frequency along X (radians per world unit)
    pub kx: f64,

    /// Spatial frequency along Z (radians per world unit)
    pub kz: f64,

    /// Temporal frequency (radians per second)
    pub omega: f64,

    /// Peak height contribution (world units)
    pub amplitude: f64,
}

impl WaveTerm {
    pub const fn new(shape: WaveShape, kx: f64, kz: f64, omega: f64, amplitude: f64) -> Self {
        Self {
            shape,
            kx,
            kz,
            omega,
            amplitude,
        }
    }

    /// Height contribution of this term at (x, z, t)
    #[inline]
    pub fn evaluate(&self, x: f64, z: f64, t: f64) -> f64 {
        let phase = x * self.kx + z * self.kz + t * self.omega;
        let wave = match self.shape {
            WaveShape::Sin => phase.sin(),
            WaveShape::Cos => phase.cos(),
        };
        wave * self.amplitude
    }
}

/// Reference term set of the blood-ocean surface.
///
/// `sin(x*0.01 + 2t)*15 + sin(z*0.008 + 1.5t)*12
///  + cos(x*0.015 + z*0.012 + 1.8t)*8 + sin(x*0.02 + z*0.015 + 2.2t)*5`
pub const REFERENCE_WAVE_TERMS: [WaveTerm; 4] = [
    WaveTerm::new(WaveShape::Sin, 0.01, 0.0, 2.0, 15.0),
    WaveTerm::new(WaveShape::Sin, 0.0, 0.008, 1.5, 12.0),
    WaveTerm::new(WaveShape::Cos, 0.015, 0.012, 1.8, 8.0),
    WaveTerm::new(WaveShape::Sin, 0.02, 0.015, 2.2, 5.0),
];

/// Common period of the reference temporal frequencies (2, 1.5, 1.8, 2.2 rad/s).
///
/// Every reference term completes a whole number of cycles in 20π seconds, so
/// wrapping time by a multiple of this leaves the field unchanged.
pub const REFERENCE_TIME_PERIOD_S: f64 = 20.0 * PI;

/// Allowed drift from a whole cycle count when checking the wrap period
const WRAP_CYCLE_TOLERANCE: f64 = 1e-6;

/// Wave field configuration
#[derive(Debug, Clone)]
pub struct WaveFieldParams {
    /// Summed wave terms
    pub terms: [WaveTerm; 4],

    /// Time wrap period in seconds (None = no wrapping)
    ///
    /// Bounds floating point error over long sessions. Must be a common
    /// period of all terms or the surface jumps at the wrap point.
    pub time_wrap_s: Option<f64>,
}

impl Default for WaveFieldParams {
    fn default() -> Self {
        Self {
            terms: REFERENCE_WAVE_TERMS,
            time_wrap_s: Some(64.0 * REFERENCE_TIME_PERIOD_S), // ~67 minutes
        }
    }
}

impl WaveFieldParams {
    /// Validate configuration (finite coefficients, positive wrap period)
    pub fn validate(&self) -> Result<(), ConfigError> {
        for term in &self.terms {
            let coefficients = [term.kx, term.kz, term.omega, term.amplitude];
            if coefficients.iter().any(|c| !c.is_finite()) {
                return Err(ConfigError::new(
                    "terms",
                    format!("wave term coefficients must be finite, got {:?}", term),
                ));
            }
        }
        if let Some(period) = self.time_wrap_s {
            if !period.is_finite() || period <= 0.0 {
                return Err(ConfigError::new(
                    "time_wrap_s",
                    format!("must be finite and > 0, got {}", period),
                ));
            }
            // Each term must complete a whole number of cycles per wrap
            for term in &self.terms {
                let cycles = term.omega * period / (2.0 * PI);
                if (cycles - cycles.round()).abs() > WRAP_CYCLE_TOLERANCE {
                    return Err(ConfigError::new(
                        "time_wrap_s",
                        format!(
                            "{} s is not a period of omega {} ({} cycles)",
                            period, term.omega, cycles
                        ),
                    ));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_period_is_common() {
        for term in &REFERENCE_WAVE_TERMS {
            let cycles = term.omega * REFERENCE_TIME_PERIOD_S / (2.0 * PI);
            assert!((cycles - cycles.round()).abs() < 1e-9);
        }
    }

    #[test]
    fn test_validate_rejects_bad_wrap() {
        let params = WaveFieldParams {
            time_wrap_s: Some(0.0),
            ..Default::default()
        };
        assert!(params.validate().is_err());
        assert!(WaveFieldParams::default().validate().is_ok());
    }

    #[test]
    fn test_validate_checks_wrap_against_terms() {
        let mut terms = REFERENCE_WAVE_TERMS;
        terms[0].omega = 1.234;

        // 1280π s is 789.76 cycles at 1.234 rad/s
        let jumpy = WaveFieldParams {
            terms,
            ..Default::default()
        };
        assert_eq!(jumpy.validate().unwrap_err().field, "time_wrap_s");

        let unwrapped = WaveFieldParams {
            terms,
            time_wrap_s: None,
        };
        assert!(unwrapped.validate().is_ok());

        // 40π s is a whole number of cycles at 1 rad/s and at every reference frequency
        terms[0].omega = 1.0;
        let common = WaveFieldParams {
            terms,
            time_wrap_s: Some(2.0 * REFERENCE_TIME_PERIOD_S),
        };
        assert!(common.validate().is_ok());
    }
}
