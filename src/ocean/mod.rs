//! Ocean surface: analytic height field, wave metrics and pooled ripples.

mod field;
mod metrics;
mod pool;
mod ripple;
mod system;

// Re-export public types
pub use field::{HeightField, WaveShape, WaveTerm};
pub use metrics::{
    WaveMetricsSampler, WaveSample, CURVATURE_NORMALIZATION, ENERGY_WEIGHTS,
    SLOPE_NORMALIZATION, STENCIL_EPSILON, TIME_STEP_S, VELOCITY_NORMALIZATION,
};
pub use pool::{RippleHandle, RipplePool};
pub use ripple::{RimVertex, RippleEntity, RippleState};
pub use system::Simulation;
