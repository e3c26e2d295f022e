//! Shared register bus
//!
//! Lock-free cells shared by the input, physics, render and audio loops.
//! Every register has exactly one writer. Edge flags and signals additionally
//! have exactly one consumer, which clears them with an atomic exchange:
//!
//! | register | writer | reader / consumer |
//! |---|---|---|
//! | `steer`, `accel_held`, `brake_held` | input sampler | physics |
//! | `space`, `up`, `down`, `map1..3`, `escape` | input sampler | menu controller |
//! | warning cells | physics | presentation |
//! | `crash`, `game_over`, `win`, `skid` | physics | audio dispatcher |
//! | `speed`, `engine_intensity` | physics | audio / presentation |

use std::sync::atomic::{AtomicBool, AtomicI8, AtomicU32, Ordering};

use super::track::ObstacleWarning;
use super::vehicle::Steer;

/// An `f32` register stored as raw bits
#[derive(Debug, Default)]
pub struct AtomicF32(AtomicU32);

impl AtomicF32 {
    pub fn new(value: f32) -> Self {
        Self(AtomicU32::new(value.to_bits()))
    }

    #[inline]
    pub fn load(&self, order: Ordering) -> f32 {
        f32::from_bits(self.0.load(order))
    }

    #[inline]
    pub fn store(&self, value: f32, order: Ordering) {
        self.0.store(value.to_bits(), order);
    }
}

/// A one-shot flag delivered exactly once to its single consumer
#[derive(Debug, Default)]
pub struct EdgeFlag(AtomicBool);

impl EdgeFlag {
    pub const fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    /// Mark a rising edge. Raising an already raised flag is a no-op.
    #[inline]
    pub fn raise(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Test-and-clear. Returns true only for the call that observed the edge.
    #[inline]
    pub fn take(&self) -> bool {
        self.0.swap(false, Ordering::AcqRel)
    }

    /// Peek without consuming
    #[inline]
    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

#[derive(Debug, Default)]
pub struct RegisterBus {
    // Continuous input levels
    steer: AtomicI8,
    accel_held: AtomicBool,
    brake_held: AtomicBool,

    // Menu edges
    pub space: EdgeFlag,
    pub up: EdgeFlag,
    pub down: EdgeFlag,
    pub map1: EdgeFlag,
    pub map2: EdgeFlag,
    pub map3: EdgeFlag,
    pub escape: EdgeFlag,

    // Upcoming obstacle
    warn_obstacle: AtomicBool,
    warn_distance: AtomicF32,
    warn_offset: AtomicF32,

    // Audio signals
    pub crash: EdgeFlag,
    pub game_over: EdgeFlag,
    pub win: EdgeFlag,
    pub skid: EdgeFlag,

    // Continuous outputs
    speed: AtomicF32,
    engine_intensity: AtomicF32,
}

impl RegisterBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn steer(&self) -> Steer {
        Steer::from_i8(self.steer.load(Ordering::Relaxed))
    }

    pub fn set_steer(&self, steer: Steer) {
        self.steer.store(steer.as_i8(), Ordering::Relaxed);
    }

    pub fn accel_held(&self) -> bool {
        self.accel_held.load(Ordering::Relaxed)
    }

    pub fn set_accel_held(&self, held: bool) {
        self.accel_held.store(held, Ordering::Relaxed);
    }

    pub fn brake_held(&self) -> bool {
        self.brake_held.load(Ordering::Relaxed)
    }

    pub fn set_brake_held(&self, held: bool) {
        self.brake_held.store(held, Ordering::Relaxed);
    }

    /// Publish or clear the upcoming obstacle warning
    pub fn publish_warning(&self, warning: Option<ObstacleWarning>) {
        match warning {
            Some(w) => {
                self.warn_distance.store(w.distance, Ordering::Relaxed);
                self.warn_offset.store(w.lateral_offset, Ordering::Relaxed);
                self.warn_obstacle.store(true, Ordering::Release);
            }
            None => self.warn_obstacle.store(false, Ordering::Release),
        }
    }

    /// Current warning. Distance and offset may be one tick apart.
    pub fn warning(&self) -> Option<ObstacleWarning> {
        if !self.warn_obstacle.load(Ordering::Acquire) {
            return None;
        }
        Some(ObstacleWarning {
            distance: self.warn_distance.load(Ordering::Relaxed),
            lateral_offset: self.warn_offset.load(Ordering::Relaxed),
        })
    }

    pub fn speed(&self) -> f32 {
        self.speed.load(Ordering::Relaxed)
    }

    pub fn engine_intensity(&self) -> f32 {
        self.engine_intensity.load(Ordering::Relaxed)
    }

    /// Physics-side publication of the continuous audio registers
    pub fn publish_engine(&self, speed: f32, intensity: f32) {
        self.speed.store(speed, Ordering::Relaxed);
        self.engine_intensity.store(intensity, Ordering::Relaxed);
    }

    /// Drop any pending menu edges (used when entering a new menu screen)
    pub fn clear_menu_edges(&self) {
        for flag in [
            &self.space,
            &self.up,
            &self.down,
            &self.map1,
            &self.map2,
            &self.map3,
            &self.escape,
        ] {
            flag.take();
        }
    }
}
