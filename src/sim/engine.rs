//! Engine meter: the continuous intensity value audio drivers play back

use crate::consts::MOVING_SPEED;

/// RPM with the accelerator held at top speed
pub const MAX_RPM: f32 = 4000.0;
const IDLE_RPM: f32 = 800.0;
const SPEED_RPM_RANGE: f32 = 2700.0;
const ACCEL_BONUS_RPM: f32 = 500.0;
/// Below this the engine is considered off
const CUTOFF_RPM: f32 = 50.0;
/// Smoothing rates (1/s)
const RISE_RATE: f32 = 72.0;
const FALL_RATE: f32 = 120.0;

/// RPM the engine heads toward for the given speed
pub fn target_rpm(speed: f32, accelerating: bool, max_speed: f32) -> f32 {
    if speed <= MOVING_SPEED {
        return 0.0;
    }
    let mut rpm = IDLE_RPM + (speed / max_speed).min(1.0) * SPEED_RPM_RANGE;
    if accelerating && speed < max_speed {
        rpm += ACCEL_BONUS_RPM;
    }
    rpm
}

/// Advance the intensity (rpm / MAX_RPM) by one step of `dt` seconds
pub fn next_intensity(prev: f32, speed: f32, accelerating: bool, max_speed: f32, dt: f32) -> f32 {
    let current = prev * MAX_RPM;
    let target = target_rpm(speed, accelerating, max_speed);
    let rate = if speed > MOVING_SPEED { RISE_RATE } else { FALL_RATE };
    let mut rpm = current + (target - current) * (rate * dt).min(1.0);
    if rpm < CUTOFF_RPM {
        rpm = 0.0;
    }
    (rpm / MAX_RPM).clamp(0.0, 1.0)
}
