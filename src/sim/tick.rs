//! Fixed timestep simulation tick
//!
//! [`FixedStep`] turns variable wall-clock time into a whole number of equal
//! steps; [`step`] advances the vehicle by exactly one of them.

use super::bus::RegisterBus;
use super::collision::{self, CrashCause};
use super::engine;
use super::state::{GamePhase, SharedPhase};
use super::track::Track;
use super::vehicle::{Steer, Vehicle};
use crate::consts::{MOVING_SPEED, SIM_DT};
use crate::tuning::Tuning;

/// Accumulates wall-clock time and releases it in fixed steps
#[derive(Debug, Clone)]
pub struct FixedStep {
    dt: f64,
    accumulator: f64,
}

impl FixedStep {
    /// `dt` must be positive and finite, otherwise the default step is used
    pub fn new(dt: f64) -> Self {
        let dt = if dt.is_finite() && dt > 0.0 {
            dt
        } else {
            log::warn!("Unusable step length {}, using {}", dt, SIM_DT);
            f64::from(SIM_DT)
        };
        Self {
            dt,
            accumulator: 0.0,
        }
    }

    pub fn from_hz(hz: f32) -> Self {
        Self::new(1.0 / f64::from(hz))
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Time not yet consumed by a step
    pub fn residual(&self) -> f64 {
        self.accumulator
    }

    pub fn accumulate(&mut self, elapsed_secs: f64) {
        self.accumulator += elapsed_secs;
    }

    /// Consume one step if enough time has accumulated
    pub fn try_step(&mut self) -> bool {
        if self.accumulator >= self.dt {
            self.accumulator -= self.dt;
            true
        } else {
            false
        }
    }
}

/// What a single step did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Phase was not `Running`
    Idle,
    /// Crashed vehicle held in place
    Frozen,
    Advanced,
    Won,
    Crashed(CrashCause),
}

/// Advance the vehicle by one fixed step of `dt` seconds.
///
/// The caller holds the vehicle lock for the whole call, so the update and
/// the collision check that follows it are one atomic group.
pub fn step(
    vehicle: &mut Vehicle,
    track: &Track,
    bus: &RegisterBus,
    phase: &SharedPhase,
    tuning: &Tuning,
    dt: f32,
) -> StepOutcome {
    if !phase.is(GamePhase::Running) {
        bus.publish_warning(None);
        return StepOutcome::Idle;
    }

    let prev_steer = vehicle.steer;
    vehicle.steer = bus.steer();

    if vehicle.crashed {
        vehicle.speed = 0.0;
        refresh_outputs(vehicle, track, bus, tuning, false, dt);
        return StepOutcome::Frozen;
    }

    if !prev_steer.is_active() && vehicle.steer.is_active() && vehicle.speed > MOVING_SPEED {
        bus.skid.raise();
    }

    // Longitudinal
    let accelerating = bus.accel_held();
    if accelerating {
        vehicle.speed += tuning.acceleration * dt;
    } else {
        vehicle.speed *= tuning.friction;
    }
    if bus.brake_held() {
        vehicle.speed -= tuning.deceleration * dt;
    }
    vehicle.speed = tuning.clamp_speed(vehicle.speed);

    vehicle.distance = (vehicle.distance + vehicle.speed * dt).max(0.0);
    vehicle.race_time += dt;

    if vehicle.distance >= track.total_length {
        vehicle.distance = track.total_length;
        if phase.advance(GamePhase::Running, GamePhase::Win) {
            bus.win.raise();
            log::info!("Finish line reached in {:.2}s", vehicle.race_time);
        }
        bus.publish_warning(None);
        bus.publish_engine(vehicle.speed, 0.0);
        return StepOutcome::Won;
    }

    // Curvature
    let target = track.curvature_at(vehicle.distance);
    vehicle.curvature += (target - vehicle.curvature) * dt * tuning.curvature_smoothing;
    vehicle.player_curvature +=
        vehicle.curvature * dt * vehicle.speed * tuning.player_curvature_scale;

    // Lateral
    let inertia_slide = -vehicle.curvature * vehicle.speed * tuning.lateral_factor;
    let compensation = vehicle.steer.as_f32() * 0.5 * tuning.steer_compensation;
    let heading_drift = vehicle.heading * vehicle.speed * tuning.heading_drift_factor;
    let net_force = (inertia_slide + compensation + heading_drift) * tuning.lateral_gain;
    vehicle.x += net_force * dt;

    // Heading
    match vehicle.steer {
        Steer::Left => vehicle.heading -= tuning.heading_turn_speed * dt,
        Steer::Right => vehicle.heading += tuning.heading_turn_speed * dt,
        Steer::Straight => vehicle.heading *= tuning.heading_decay,
    }

    let crash = collision::detect(vehicle, track, phase, bus, tuning);
    refresh_outputs(vehicle, track, bus, tuning, accelerating, dt);

    match crash {
        Some(cause) => StepOutcome::Crashed(cause),
        None => StepOutcome::Advanced,
    }
}

/// Publish the warning scan and the engine registers for this step
fn refresh_outputs(
    vehicle: &Vehicle,
    track: &Track,
    bus: &RegisterBus,
    tuning: &Tuning,
    accelerating: bool,
    dt: f32,
) {
    let warning = if vehicle.crashed {
        None
    } else {
        track.upcoming_obstacle(vehicle.distance, tuning.warning_range)
    };
    bus.publish_warning(warning);

    let intensity = engine::next_intensity(
        bus.engine_intensity(),
        vehicle.speed,
        accelerating,
        tuning.max_speed,
        dt,
    );
    bus.publish_engine(vehicle.speed, intensity);
}
