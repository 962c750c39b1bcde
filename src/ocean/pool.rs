//! Bounded ripple pool with reuse-oldest eviction.
//!
//! Ripples live in a fixed arena of at most `capacity` slots. Spawn order is
//! tracked separately; when every slot is live, the oldest ripple is reset in
//! place and moved to the back. Retired ripples free their slot for the next
//! spawn, so steady-state emission never allocates.

use std::collections::VecDeque;

use glam::DVec2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

use super::ripple::RippleEntity;
use crate::error::ConfigError;
use crate::params::RippleParams;

/// Stable reference to a ripple slot
///
/// The generation changes every time the slot is reused, so a handle to an
/// evicted or retired ripple stops resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RippleHandle {
    slot: usize,
    generation: u64,
}

impl RippleHandle {
    /// Arena slot this ripple occupies
    pub fn slot(&self) -> usize {
        self.slot
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug)]
struct Slot {
    ripple: RippleEntity,
    generation: u64,
    live: bool,
}

/// Ripple emitter and owner of every live ripple
#[derive(Debug)]
pub struct RipplePool {
    params: RippleParams,
    slots: Vec<Slot>,
    /// Live slot indices, oldest first
    order: VecDeque<usize>,
    free: Vec<usize>,
    rng: StdRng,
    evictions: u64,
}

impl RipplePool {
    /// Create an empty pool from validated parameters
    pub fn new(params: RippleParams) -> Result<Self, ConfigError> {
        params.validate()?;
        let rng = match params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            slots: Vec::with_capacity(params.capacity),
            order: VecDeque::with_capacity(params.capacity),
            free: Vec::new(),
            rng,
            evictions: 0,
            params,
        })
    }

    pub fn params(&self) -> &RippleParams {
        &self.params
    }

    pub fn capacity(&self) -> usize {
        self.params.capacity
    }

    /// Number of live ripples
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Total ripples recycled by the capacity policy
    pub fn evictions(&self) -> u64 {
        self.evictions
    }

    /// Spawn a ripple, recycling the oldest live one when at capacity
    pub fn spawn(
        &mut self,
        center: DVec2,
        intensity: f64,
        delay: f64,
        max_radius: Option<f64>,
    ) -> RippleHandle {
        let recycled = if self.order.len() >= self.params.capacity {
            self.order.pop_front()
        } else {
            None
        };

        let slot = if let Some(slot) = recycled {
            // Full: reuse the oldest in place
            self.evictions += 1;
            debug!(slot, evictions = self.evictions, "ripple pool full, recycling oldest");
            self.reinit_slot(slot, center, intensity, delay, max_radius);
            slot
        } else if let Some(slot) = self.free.pop() {
            self.reinit_slot(slot, center, intensity, delay, max_radius);
            slot
        } else {
            let ripple = RippleEntity::new(
                center,
                intensity,
                delay,
                max_radius,
                &self.params,
                &mut self.rng,
            );
            self.slots.push(Slot {
                ripple,
                generation: 0,
                live: true,
            });
            self.slots.len() - 1
        };

        self.order.push_back(slot);
        RippleHandle {
            slot,
            generation: self.slots[slot].generation,
        }
    }

    fn reinit_slot(
        &mut self,
        slot: usize,
        center: DVec2,
        intensity: f64,
        delay: f64,
        max_radius: Option<f64>,
    ) {
        let entry = &mut self.slots[slot];
        entry.ripple.reset(
            center,
            intensity,
            delay,
            max_radius,
            &self.params,
            &mut self.rng,
        );
        entry.generation += 1;
        entry.live = true;
    }

    /// Advance every live ripple by `dt` seconds and cull the retired ones
    ///
    /// Returns the number of ripples retired this step.
    pub fn update(&mut self, dt: f64) -> usize {
        let Self {
            slots, order, free, ..
        } = self;

        let before = order.len();
        order.retain(|&slot| {
            let entry = &mut slots[slot];
            let alive = entry.ripple.update(dt);
            if !alive {
                entry.live = false;
                free.push(slot);
            }
            alive
        });
        before - order.len()
    }

    /// Resolve a handle, if its ripple is still live
    pub fn get(&self, handle: RippleHandle) -> Option<&RippleEntity> {
        self.slots
            .get(handle.slot)
            .filter(|entry| entry.live && entry.generation == handle.generation)
            .map(|entry| &entry.ripple)
    }

    /// Live ripples in spawn order, oldest first
    pub fn iter(&self) -> impl Iterator<Item = (RippleHandle, &RippleEntity)> + '_ {
        self.order.iter().map(move |&slot| {
            let entry = &self.slots[slot];
            (
                RippleHandle {
                    slot,
                    generation: entry.generation,
                },
                &entry.ripple,
            )
        })
    }

    /// Visit every ripple past its delay, oldest first
    pub fn for_each_active<F: FnMut(&RippleEntity)>(&self, mut f: F) {
        for (_, ripple) in self.iter() {
            if ripple.is_active() {
                f(ripple);
            }
        }
    }

    /// Oldest live ripple (next to be recycled)
    pub fn oldest(&self) -> Option<RippleHandle> {
        self.iter().next().map(|(handle, _)| handle)
    }

    /// Retire every ripple; slots stay allocated for reuse
    pub fn clear(&mut self) {
        for slot in self.order.drain(..) {
            self.slots[slot].live = false;
            self.free.push(slot);
        }
    }

    /// Number of arena slots allocated so far (never exceeds capacity)
    pub fn allocated_slots(&self) -> usize {
        self.slots.len()
    }
}
