//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Tracks built from fixed tables, never at random
//! - Stable iteration order (segment order, then obstacle list order)
//! - No rendering, audio or platform dependencies

pub mod bus;
pub mod collision;
pub mod engine;
pub mod state;
pub mod tick;
pub mod track;
pub mod vehicle;

pub use bus::{AtomicF32, EdgeFlag, RegisterBus};
pub use collision::{CrashCause, detect, intervals_overlap, obstacle_hit, touches_boundary};
pub use state::{GamePhase, SharedPhase};
pub use tick::{FixedStep, StepOutcome, step};
pub use track::{
    MapId, Obstacle, ObstacleWarning, SegmentCursor, Track, TrackSegment, build_track,
    derive_overview,
};
pub use vehicle::{Steer, Vehicle, VehicleSnapshot};
