//! Boundary and obstacle collision detection
//!
//! Runs once per fixed step, inside the same lock scope as the vehicle update.
//! Obstacles are solid only within a narrow longitudinal band around their
//! nominal position so that per-tick sampling cannot skip over them.

use super::bus::RegisterBus;
use super::state::{GamePhase, SharedPhase};
use super::track::Track;
use super::vehicle::Vehicle;
use crate::tuning::Tuning;

/// Why the vehicle crashed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrashCause {
    /// Car body touched the road limit
    Boundary,
    /// Car body overlapped an obstacle
    Obstacle { segment: usize, index: usize },
}

/// Open-interval overlap of `[a_min, a_max]` and `[b_min, b_max]`
#[inline]
pub fn intervals_overlap(a_min: f32, a_max: f32, b_min: f32, b_max: f32) -> bool {
    a_min.max(b_min) < a_max.min(b_max)
}

/// True when the car body touches or crosses either road limit
#[inline]
pub fn touches_boundary(x: f32, half_width: f32, road_limit: f32) -> bool {
    x - half_width <= -road_limit || x + half_width >= road_limit
}

/// First obstacle the car overlaps at `distance`, in list order
pub fn obstacle_hit(
    track: &Track,
    distance: f32,
    x: f32,
    half_width: f32,
    window: f32,
) -> Option<CrashCause> {
    let cursor = track.locate(distance)?;
    let segment = &track.segments[cursor.index];
    let (left, right) = (x - half_width, x + half_width);

    segment
        .obstacles
        .iter()
        .enumerate()
        .filter(|(_, obs)| (cursor.offset - obs.seg_offset).abs() <= window)
        .find(|(_, obs)| {
            let (obs_left, obs_right) = obs.lateral_span();
            intervals_overlap(left, right, obs_left, obs_right)
        })
        .map(|(index, _)| CrashCause::Obstacle {
            segment: cursor.index,
            index,
        })
}

/// Check the vehicle against the road limits and obstacles.
///
/// On a crash the vehicle is frozen, the phase moves `Running -> Over` and the
/// crash and game-over signals are raised. Returns the cause, if any.
pub fn detect(
    vehicle: &mut Vehicle,
    track: &Track,
    phase: &SharedPhase,
    bus: &RegisterBus,
    tuning: &Tuning,
) -> Option<CrashCause> {
    if vehicle.crashed {
        return None;
    }

    let cause = if touches_boundary(vehicle.x, tuning.half_width, tuning.road_limit) {
        Some(CrashCause::Boundary)
    } else if phase.is(GamePhase::Running) {
        obstacle_hit(
            track,
            vehicle.distance,
            vehicle.x,
            tuning.half_width,
            tuning.obstacle_window,
        )
    } else {
        None
    };
    let cause = cause?;

    vehicle.crash();
    phase.advance(GamePhase::Running, GamePhase::Over);
    bus.crash.raise();
    bus.game_over.raise();
    log::info!(
        "Crash ({:?}) at distance {:.1}, x {:.3}",
        cause,
        vehicle.distance,
        vehicle.x
    );
    Some(cause)
}
