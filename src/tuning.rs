//! Data-driven physics tuning
//!
//! Every constant the integrator and detector use, defaulting to [`crate::consts`].
//! Loaded as part of [`crate::Settings`]; missing fields keep their defaults.

use serde::{Deserialize, Serialize};

use crate::consts::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Fixed physics rate (Hz)
    pub physics_hz: f32,

    // === Longitudinal ===
    pub max_speed: f32,
    pub min_reverse_speed: f32,
    pub acceleration: f32,
    pub deceleration: f32,
    /// Per-tick speed multiplier when not accelerating
    pub friction: f32,

    // === Lateral ===
    pub lateral_factor: f32,
    pub steer_compensation: f32,
    pub lateral_gain: f32,
    pub heading_turn_speed: f32,
    pub heading_drift_factor: f32,
    pub heading_decay: f32,
    pub curvature_smoothing: f32,
    pub player_curvature_scale: f32,

    // === Road & obstacles ===
    pub road_limit: f32,
    pub half_width: f32,
    pub obstacle_window: f32,
    pub warning_range: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            physics_hz: PHYSICS_HZ,

            max_speed: MAX_SPEED,
            min_reverse_speed: MIN_REVERSE_SPEED,
            acceleration: ACCELERATION,
            deceleration: DECELERATION,
            friction: FRICTION,

            lateral_factor: LATERAL_FACTOR,
            steer_compensation: STEER_COMPENSATION,
            lateral_gain: LATERAL_GAIN,
            heading_turn_speed: HEADING_TURN_SPEED,
            heading_drift_factor: HEADING_DRIFT_FACTOR,
            heading_decay: HEADING_DECAY,
            curvature_smoothing: CURVATURE_SMOOTHING,
            player_curvature_scale: PLAYER_CURVATURE_SCALE,

            road_limit: ROAD_WIDTH_LIMIT,
            half_width: PLAYER_HALF_WIDTH,
            obstacle_window: OBSTACLE_WINDOW,
            warning_range: WARNING_RANGE,
        }
    }
}

impl Tuning {
    /// Fixed step length in seconds. A rate with no usable step falls back
    /// to [`SIM_DT`].
    pub fn dt(&self) -> f32 {
        let dt = 1.0 / self.physics_hz;
        if dt.is_finite() && dt > 0.0 { dt } else { SIM_DT }
    }

    /// Clamp a speed into `[min_reverse_speed, max_speed]`
    #[inline]
    pub fn clamp_speed(&self, speed: f32) -> f32 {
        speed.clamp(self.min_reverse_speed, self.max_speed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_defaults_match_consts() {
        let t = Tuning::default();
        assert_eq!(t.dt(), SIM_DT);
        assert_eq!(t.max_speed, 50.0);
        assert_eq!(t.half_width, 0.18);
    }

    #[test]
    fn test_unusable_rate_keeps_default_step() {
        for hz in [-240.0, 0.0, 1e-45, f32::NAN] {
            let t = Tuning {
                physics_hz: hz,
                ..Default::default()
            };
            assert_eq!(t.dt(), SIM_DT, "physics_hz = {hz}");
        }
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let t: Tuning = serde_json::from_str(r#"{ "max_speed": 30.0 }"#).unwrap();
        assert_eq!(t.max_speed, 30.0);
        assert_eq!(t.acceleration, ACCELERATION);
    }

    proptest! {
        #[test]
        fn clamp_is_idempotent(speed in -1000.0_f32..1000.0) {
            let t = Tuning::default();
            let once = t.clamp_speed(speed);
            prop_assert_eq!(t.clamp_speed(once), once);
            prop_assert!(once >= t.min_reverse_speed && once <= t.max_speed);
        }
    }
}
