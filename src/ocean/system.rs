//! Simulation root: owns the height field and the ripple pool.

use glam::DVec2;

use super::field::HeightField;
use super::metrics::{WaveMetricsSampler, WaveSample};
use super::pool::{RippleHandle, RipplePool};
use super::ripple::{RimVertex, RippleEntity};
use crate::error::ConfigError;
use crate::params::{RippleParams, WaveFieldParams};

/// Ocean simulation driven by an external frame loop
///
/// Single owner of the ripple pool; everything else gets read access or a
/// sampler snapshot.
pub struct Simulation {
    field: HeightField,
    pool: RipplePool,
    time_s: f64,
    rim_buffer: Vec<RimVertex>,
}

impl Simulation {
    /// Create a simulation with specified parameters
    pub fn new(wave: &WaveFieldParams, ripples: RippleParams) -> Result<Self, ConfigError> {
        Ok(Self {
            field: HeightField::new(wave)?,
            pool: RipplePool::new(ripples)?,
            time_s: 0.0,
            rim_buffer: Vec::new(),
        })
    }

    /// Advance one frame
    ///
    /// # Arguments
    /// * `dt` - Seconds since the previous frame
    /// * `now_s` - Absolute session time in seconds
    ///
    /// # Returns
    /// * Number of ripples retired this frame
    pub fn tick(&mut self, dt: f64, now_s: f64) -> usize {
        self.time_s = now_s;
        self.pool.update(dt)
    }

    /// Current session time (seconds)
    pub fn time(&self) -> f64 {
        self.time_s
    }

    pub fn field(&self) -> &HeightField {
        &self.field
    }

    pub fn pool(&self) -> &RipplePool {
        &self.pool
    }

    /// Sampler snapshot over this simulation's field
    pub fn sampler(&self) -> WaveMetricsSampler {
        WaveMetricsSampler::new(self.field)
    }

    /// Surface height at (x, z) at the current time
    pub fn height(&self, x: f64, z: f64) -> f64 {
        self.field.height(x, z, self.time_s)
    }

    /// Surface metrics at (x, z) at the current time
    pub fn sample(&self, x: f64, z: f64) -> WaveSample {
        self.sampler().sample(x, z, self.time_s)
    }

    /// Spawn a single ripple
    pub fn spawn(
        &mut self,
        center: DVec2,
        intensity: f64,
        delay: f64,
        max_radius: Option<f64>,
    ) -> RippleHandle {
        self.pool.spawn(center, intensity, delay, max_radius)
    }

    /// Spawn a burst of concentric rings for one interaction
    ///
    /// Ring `i` waits `i * ring_delay_s` and carries
    /// `intensity * ring_intensity_falloff^i`. Only the first ring takes the
    /// max radius override. Returns the first ring's handle.
    ///
    /// The trailing rings are spawned before the primary one, so a pool
    /// smaller than the burst evicts trailing rings and the returned handle
    /// stays live.
    pub fn splash(
        &mut self,
        center: DVec2,
        intensity: f64,
        max_radius: Option<f64>,
    ) -> RippleHandle {
        let params = self.pool.params();
        let rings = params.splash_rings;
        let ring_delay = params.ring_delay_s;
        let falloff = params.ring_intensity_falloff;

        let mut ring_intensity = intensity;
        for ring in 1..rings {
            ring_intensity *= falloff;
            self.pool.spawn(center, ring_intensity, ring as f64 * ring_delay, None);
        }
        self.pool.spawn(center, intensity, 0.0, max_radius)
    }

    /// Resolve a ripple handle
    pub fn ripple(&self, handle: RippleHandle) -> Option<&RippleEntity> {
        self.pool.get(handle)
    }

    /// Visit every active ripple (render consumption)
    pub fn for_each_active<F: FnMut(&RippleEntity)>(&self, f: F) {
        self.pool.for_each_active(f)
    }

    /// Rebuild rim geometry for all active ripples
    ///
    /// The buffer is reused across frames.
    pub fn rim_vertices(&mut self, segments: usize) -> &[RimVertex] {
        let Self {
            field,
            pool,
            time_s,
            rim_buffer,
        } = self;

        rim_buffer.clear();
        pool.for_each_active(|ripple| ripple.rim_vertices(field, *time_s, segments, rim_buffer));
        rim_buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simulation() -> Simulation {
        let ripples = RippleParams {
            seed: Some(3),
            ..Default::default()
        };
        Simulation::new(&WaveFieldParams::default(), ripples).unwrap()
    }

    #[test]
    fn test_splash_spawns_delayed_rings() {
        let mut sim = simulation();
        let primary = sim.splash(DVec2::new(1.0, 2.0), 1.0, Some(150.0));

        assert_eq!(sim.pool().len(), 3);
        // Spawn order: trailing rings first, primary last
        let ripples: Vec<_> = sim.pool().iter().map(|(_, r)| r.clone()).collect();
        assert!((ripples[0].delay() - 0.15).abs() < 1e-12);
        assert!((ripples[1].delay() - 0.30).abs() < 1e-12);
        assert_eq!(ripples[2].delay(), 0.0);
        assert!((ripples[0].intensity() - 0.7).abs() < 1e-12);
        assert!((ripples[1].intensity() - 0.49).abs() < 1e-12);
        assert_eq!(ripples[2].intensity(), 1.0);
        assert_eq!(sim.ripple(primary).unwrap().max_radius(), 150.0);
    }

    #[test]
    fn test_splash_primary_survives_small_pool() {
        for capacity in [1, 2] {
            let ripples = RippleParams {
                capacity,
                seed: Some(3),
                ..Default::default()
            };
            let mut sim = Simulation::new(&WaveFieldParams::default(), ripples).unwrap();
            let primary = sim.splash(DVec2::ZERO, 1.0, Some(250.0));

            assert_eq!(sim.pool().len(), capacity);
            let ripple = sim.ripple(primary).expect("primary ring evicted");
            assert_eq!(ripple.max_radius(), 250.0);
            assert_eq!(ripple.delay(), 0.0);
        }
    }

    #[test]
    fn test_tick_tracks_time_and_culls() {
        let mut sim = simulation();
        sim.spawn(DVec2::ZERO, 1.0, 0.0, Some(3.0));

        let mut retired = 0;
        for frame in 1..=5 {
            retired += sim.tick(1.0 / 60.0, frame as f64 / 60.0);
        }
        assert_eq!(retired, 1);
        assert!(sim.pool().is_empty());
        assert!((sim.time() - 5.0 / 60.0).abs() < 1e-12);
    }

    #[test]
    fn test_height_and_sample_use_current_time() {
        let mut sim = simulation();
        assert_eq!(sim.height(0.0, 0.0), 8.0);

        sim.tick(0.5, 0.5);
        assert_eq!(sim.height(3.0, 4.0), sim.field().height(3.0, 4.0, 0.5));
        assert_eq!(sim.sample(3.0, 4.0), sim.sampler().sample(3.0, 4.0, 0.5));
    }

    #[test]
    fn test_rim_vertices_only_for_active() {
        let mut sim = simulation();
        sim.splash(DVec2::ZERO, 1.0, None);
        sim.tick(1.0 / 60.0, 1.0 / 60.0);

        // Only the primary ring is past its delay
        assert_eq!(sim.rim_vertices(24).len(), 24);

        for frame in 2..=12 {
            sim.tick(1.0 / 60.0, frame as f64 / 60.0);
        }
        assert_eq!(sim.rim_vertices(24).len(), 48);
    }
}
