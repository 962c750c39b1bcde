//! Analytic ocean height field.

pub use crate::params::{WaveShape, WaveTerm};

use crate::error::ConfigError;
use crate::params::WaveFieldParams;

/// Pure height function `h(x, z, t)`, a fixed sum of travelling sinusoids
///
/// Stateless after construction and `Copy`, so render and audio code can each
/// hold their own snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeightField {
    terms: [WaveTerm; 4],
    time_wrap_s: Option<f64>,
}

impl Default for HeightField {
    fn default() -> Self {
        let params = WaveFieldParams::default();
        Self {
            terms: params.terms,
            time_wrap_s: params.time_wrap_s,
        }
    }
}

impl HeightField {
    /// Create a height field from validated parameters
    pub fn new(params: &WaveFieldParams) -> Result<Self, ConfigError> {
        params.validate()?;
        Ok(Self {
            terms: params.terms,
            time_wrap_s: params.time_wrap_s,
        })
    }

    /// Surface height at world position (x, z) and time t (seconds)
    #[inline]
    pub fn height(&self, x: f64, z: f64, t: f64) -> f64 {
        let t = self.wrap_time(t);
        self.terms
            .iter()
            .fold(0.0, |sum, term| sum + term.evaluate(x, z, t))
    }

    /// Bound on |height|: the sum of the per-term amplitudes
    pub fn amplitude_envelope(&self) -> f64 {
        self.terms.iter().map(|term| term.amplitude.abs()).sum()
    }

    pub fn terms(&self) -> &[WaveTerm; 4] {
        &self.terms
    }

    #[inline]
    fn wrap_time(&self, t: f64) -> f64 {
        match self.time_wrap_s {
            Some(period) => t.rem_euclid(period),
            None => t,
        }
    }
}
