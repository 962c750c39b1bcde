//! A single expanding circular disturbance riding the height field.

use std::f64::consts::TAU;

use bytemuck::{Pod, Zeroable};
use glam::DVec2;
use rand::Rng;

use super::field::HeightField;
use crate::params::RippleParams;

/// Lifecycle state of a ripple
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RippleState {
    /// Waiting out its delay; radius stays 0
    Pending,
    /// Growing and fading
    Active,
    /// Faded out or reached its terminal radius
    Retired,
}

/// Rim vertex for ripple rendering (position + opacity)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct RimVertex {
    pub position: [f32; 3],
    pub opacity: f32,
}

/// Growth and fade tuning shared by every ripple in a pool
#[derive(Debug, Clone, Copy)]
struct RippleTuning {
    fade_per_frame: f64,
    frame_rate_baseline: f64,
    rim_amplitude_scale: f64,
    rim_falloff_radius: f64,
}

impl From<&RippleParams> for RippleTuning {
    fn from(params: &RippleParams) -> Self {
        Self {
            fade_per_frame: params.fade_per_frame,
            frame_rate_baseline: params.frame_rate_baseline,
            rim_amplitude_scale: params.rim_amplitude_scale,
            rim_falloff_radius: params.rim_falloff_radius,
        }
    }
}

/// Expanding ripple with delay, growth and linear fade
#[derive(Debug, Clone)]
pub struct RippleEntity {
    center: DVec2,
    radius: f64,
    max_radius: f64,
    speed: f64,
    intensity: f64,
    opacity: f64,
    amplitude: f64,
    delay: f64,
    age: f64,
    active: bool,
    retired: bool,
    tuning: RippleTuning,
}

impl RippleEntity {
    /// Create a ripple, drawing radius and speed from the configured ranges
    ///
    /// `max_radius` overrides the random terminal radius when given.
    pub fn new<R: Rng>(
        center: DVec2,
        intensity: f64,
        delay: f64,
        max_radius: Option<f64>,
        params: &RippleParams,
        rng: &mut R,
    ) -> Self {
        let mut ripple = Self {
            center,
            radius: 0.0,
            max_radius: 0.0,
            speed: 0.0,
            intensity: 0.0,
            opacity: 0.0,
            amplitude: 0.0,
            delay: 0.0,
            age: 0.0,
            active: false,
            retired: false,
            tuning: RippleTuning::from(params),
        };
        ripple.reset(center, intensity, delay, max_radius, params, rng);
        ripple
    }

    /// Reinitialise in place, indistinguishable from a fresh ripple
    pub fn reset<R: Rng>(
        &mut self,
        center: DVec2,
        intensity: f64,
        delay: f64,
        max_radius: Option<f64>,
        params: &RippleParams,
        rng: &mut R,
    ) {
        let max_radius = max_radius
            .unwrap_or_else(|| rng.gen_range(params.max_radius_range.clone()) * intensity);
        let speed = rng.gen_range(params.speed_range.clone()) * intensity;
        self.tuning = RippleTuning::from(params);
        self.reinit(center, intensity, delay, max_radius, speed);
    }

    fn reinit(
        &mut self,
        center: DVec2,
        intensity: f64,
        delay: f64,
        max_radius: f64,
        speed: f64,
    ) {
        self.center = center;
        self.radius = 0.0;
        self.max_radius = max_radius.max(0.0);
        self.speed = speed;
        self.intensity = intensity;
        self.opacity = intensity;
        self.amplitude = self.tuning.rim_amplitude_scale * intensity;
        self.delay = delay.max(0.0);
        self.age = 0.0;
        self.active = self.delay == 0.0;
        self.retired = false;
    }

    /// Advance by `dt` seconds; returns whether the ripple is still alive
    ///
    /// Growth and fade are expressed per baseline frame and scaled by
    /// `dt * frame_rate_baseline`. Once this returns false the ripple must be
    /// reset before it is updated again.
    pub fn update(&mut self, dt: f64) -> bool {
        debug_assert!(!self.retired, "update on a retired ripple");

        self.age += dt;
        if !self.active && self.age >= self.delay {
            self.active = true;
        }

        if self.active {
            let frames = dt * self.tuning.frame_rate_baseline;
            self.radius = (self.radius + self.speed * frames).min(self.max_radius);
            self.opacity -= self.tuning.fade_per_frame * frames;
        }

        let alive = self.opacity > 0.0 && self.radius < self.max_radius;
        self.retired = !alive;
        alive
    }

    pub fn state(&self) -> RippleState {
        if self.retired {
            RippleState::Retired
        } else if self.active {
            RippleState::Active
        } else {
            RippleState::Pending
        }
    }

    /// Whether the ripple is eligible for removal or reuse
    pub fn is_spent(&self) -> bool {
        self.opacity <= 0.0 || self.radius >= self.max_radius
    }

    pub fn center(&self) -> DVec2 {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn max_radius(&self) -> f64 {
        self.max_radius
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn intensity(&self) -> f64 {
        self.intensity
    }

    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    /// Rim lift captured at creation (`rim_amplitude_scale * intensity`)
    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }

    pub fn delay(&self) -> f64 {
        self.delay
    }

    pub fn age(&self) -> f64 {
        self.age
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Height of the raised rim at a point on the surface
    pub fn rim_height(&self, field: &HeightField, x: f64, z: f64, t: f64) -> f64 {
        field.height(x, z, t)
            + self.amplitude * (-self.radius / self.tuning.rim_falloff_radius).exp()
    }

    /// Append `segments` rim vertices around the current circle
    ///
    /// Pending and retired ripples contribute nothing.
    pub fn rim_vertices(
        &self,
        field: &HeightField,
        t: f64,
        segments: usize,
        out: &mut Vec<RimVertex>,
    ) {
        if self.state() != RippleState::Active || segments == 0 {
            return;
        }
        let lift = self.amplitude * (-self.radius / self.tuning.rim_falloff_radius).exp();
        let opacity = self.opacity.clamp(0.0, 1.0) as f32;

        out.reserve(segments);
        for i in 0..segments {
            let angle = TAU * i as f64 / segments as f64;
            let x = self.center.x + angle.cos() * self.radius;
            let z = self.center.y + angle.sin() * self.radius;
            let y = field.height(x, z, t) + lift;
            out.push(RimVertex {
                position: [x as f32, y as f32, z as f32],
                opacity,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const DT: f64 = 1.0 / 60.0;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn test_new_ripple_draws_within_ranges() {
        let params = RippleParams::default();
        let mut rng = rng();
        for _ in 0..100 {
            let ripple = RippleEntity::new(DVec2::ZERO, 0.5, 0.0, None, &params, &mut rng);
            assert!(ripple.max_radius() >= 40.0 && ripple.max_radius() < 90.0);
            assert!(ripple.speed() >= 0.75 && ripple.speed() < 1.75);
            assert_eq!(ripple.opacity(), 0.5);
            assert_eq!(ripple.amplitude(), 6.0);
        }
    }

    #[test]
    fn test_zero_delay_starts_active() {
        let params = RippleParams::default();
        let ripple = RippleEntity::new(DVec2::ZERO, 1.0, 0.0, Some(120.0), &params, &mut rng());
        assert!(ripple.is_active());
        assert_eq!(ripple.state(), RippleState::Active);
        assert_eq!(ripple.max_radius(), 120.0);
    }

    #[test]
    fn test_delay_gating() {
        let params = RippleParams::default();
        let mut ripple =
            RippleEntity::new(DVec2::ZERO, 1.0, 0.1, Some(120.0), &params, &mut rng());
        assert_eq!(ripple.state(), RippleState::Pending);

        // 0.1s at 1/60 steps: ages 0.0167 .. 0.0833 stay pending
        for _ in 0..5 {
            assert!(ripple.update(DT));
            assert!(!ripple.is_active());
            assert_eq!(ripple.radius(), 0.0);
            assert_eq!(ripple.opacity(), 1.0);
        }

        // Next updates cross the delay (allow for float accumulation)
        let mut steps = 0;
        while !ripple.is_active() {
            ripple.update(DT);
            steps += 1;
        }
        assert!(steps <= 2);
        assert!(ripple.age() >= ripple.delay());
        assert!(ripple.radius() > 0.0);
    }

    #[test]
    fn test_lifecycle_monotonic() {
        let params = RippleParams::default();
        let mut ripple = RippleEntity::new(DVec2::ZERO, 1.0, 0.0, None, &params, &mut rng());

        let mut last_radius = ripple.radius();
        let mut last_opacity = ripple.opacity();
        while ripple.update(DT) {
            assert!(ripple.radius() >= last_radius);
            assert!(ripple.opacity() < last_opacity);
            assert!(ripple.radius() <= ripple.max_radius());
            last_radius = ripple.radius();
            last_opacity = ripple.opacity();
        }
        assert!(ripple.is_spent());
        assert_eq!(ripple.state(), RippleState::Retired);
    }

    #[test]
    fn test_retires_at_max_radius() {
        let params = RippleParams::default();
        let mut ripple =
            RippleEntity::new(DVec2::ZERO, 1.0, 0.0, Some(120.0), &params, &mut rng());

        let mut updates = 0;
        while ripple.radius() < 120.0 && ripple.opacity() > 0.0 {
            ripple.update(DT);
            updates += 1;
        }
        assert!(updates < 10_000);
        // Radius is clamped to the terminal value, never past it
        assert!(ripple.radius() <= 120.0);
        assert!(ripple.is_spent());
    }

    #[test]
    fn test_zero_intensity_dies_immediately() {
        let params = RippleParams::default();
        let mut ripple = RippleEntity::new(DVec2::ZERO, 0.0, 0.0, None, &params, &mut rng());
        assert!(!ripple.update(DT));
    }

    #[test]
    fn test_reset_restores_fresh_state() {
        let params = RippleParams::default();
        let mut ripple =
            RippleEntity::new(DVec2::new(5.0, 5.0), 1.0, 0.0, Some(50.0), &params, &mut rng());
        while ripple.update(DT) {}
        assert_eq!(ripple.state(), RippleState::Retired);

        ripple.reset(DVec2::new(-3.0, 9.0), 0.8, 0.2, Some(90.0), &params, &mut rng());
        let fresh = RippleEntity::new(
            DVec2::new(-3.0, 9.0),
            0.8,
            0.2,
            Some(90.0),
            &params,
            &mut rng(),
        );

        assert_eq!(ripple.state(), RippleState::Pending);
        assert_eq!(ripple.center(), fresh.center());
        assert_eq!(ripple.radius(), 0.0);
        assert_eq!(ripple.age(), 0.0);
        assert_eq!(ripple.opacity(), fresh.opacity());
        assert_eq!(ripple.max_radius(), fresh.max_radius());
        assert_eq!(ripple.speed(), fresh.speed());
        assert_eq!(ripple.amplitude(), fresh.amplitude());
    }

    #[test]
    fn test_rim_vertices_ride_the_field() {
        let params = RippleParams::default();
        let field = HeightField::default();
        let mut ripple =
            RippleEntity::new(DVec2::new(10.0, -10.0), 1.0, 0.0, Some(150.0), &params, &mut rng());
        for _ in 0..10 {
            ripple.update(DT);
        }

        let mut rim = Vec::new();
        ripple.rim_vertices(&field, 1.0, 16, &mut rim);
        assert_eq!(rim.len(), 16);

        let lift = 12.0 * (-ripple.radius() / 40.0).exp();
        let first = rim[0];
        let x = 10.0 + ripple.radius();
        let expected = field.height(x, -10.0, 1.0) + lift;
        assert!((first.position[1] as f64 - expected).abs() < 1e-3);
        assert!((ripple.rim_height(&field, x, -10.0, 1.0) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_pending_ripple_has_no_rim() {
        let params = RippleParams::default();
        let ripple = RippleEntity::new(DVec2::ZERO, 1.0, 0.5, None, &params, &mut rng());
        let mut rim = Vec::new();
        ripple.rim_vertices(&HeightField::default(), 0.0, 32, &mut rim);
        assert!(rim.is_empty());
    }
}
