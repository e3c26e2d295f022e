//! Vehicle kinematic record (the PCB)
//!
//! Owned by a single mutex in the kernel. Every multi-field read goes through
//! [`Vehicle::snapshot`] taken under that lock.

use serde::{Deserialize, Serialize};

/// Steering intent / state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Steer {
    Left,
    #[default]
    Straight,
    Right,
}

impl Steer {
    /// Any negative value steers left, any positive value steers right
    pub fn from_i8(value: i8) -> Self {
        match value.signum() {
            -1 => Steer::Left,
            1 => Steer::Right,
            _ => Steer::Straight,
        }
    }

    pub fn as_i8(self) -> i8 {
        match self {
            Steer::Left => -1,
            Steer::Straight => 0,
            Steer::Right => 1,
        }
    }

    #[inline]
    pub fn as_f32(self) -> f32 {
        f32::from(self.as_i8())
    }

    pub fn is_active(self) -> bool {
        self != Steer::Straight
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Vehicle {
    /// Lateral position on the road (-1 ~ +1)
    pub x: f32,
    pub speed: f32,
    /// Distance travelled along the track
    pub distance: f32,
    /// Lag-filtered track curvature
    pub curvature: f32,
    /// Camera-lane drift accumulator
    pub player_curvature: f32,
    /// Visual yaw
    pub heading: f32,
    pub steer: Steer,
    pub crashed: bool,
    /// Simulated seconds spent running
    pub race_time: f32,
}

/// Copy of the fields the presentation and audio drivers read
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct VehicleSnapshot {
    pub x: f32,
    pub speed: f32,
    pub distance: f32,
    pub curvature: f32,
    pub player_curvature: f32,
    pub heading: f32,
    pub crashed: bool,
    pub race_time: f32,
}

impl Vehicle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore every field to its default
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn snapshot(&self) -> VehicleSnapshot {
        VehicleSnapshot {
            x: self.x,
            speed: self.speed,
            distance: self.distance,
            curvature: self.curvature,
            player_curvature: self.player_curvature,
            heading: self.heading,
            crashed: self.crashed,
            race_time: self.race_time,
        }
    }

    /// Freeze the vehicle after a crash
    pub fn crash(&mut self) {
        self.crashed = true;
        self.speed = 0.0;
    }

    /// Lateral interval `[left, right]` covered by the car body
    #[inline]
    pub fn lateral_span(&self, half_width: f32) -> (f32, f32) {
        (self.x - half_width, self.x + half_width)
    }
}
