//! Kernel Racer - a multi-threaded racing kernel for glyph-grid frontends
//!
//! Core modules:
//! - `sim`: Deterministic simulation (track, registers, vehicle, physics, collisions, phase)
//! - `kernel`: Single owner of the shared simulation state, handed to every loop
//! - `menu`: Menu-side consumer of edge flags (map select, acknowledge, halt)
//! - `audio`: Signal dispatch toward an audio driver
//! - `renderer`: Frame views and minimap projection for presentation drivers
//! - `platform`: Input sampling and edge detection
//! - `runtime`: Thread bootstrap for the four loops
//! - `settings` / `tuning`: Data-driven configuration

pub mod audio;
pub mod kernel;
pub mod menu;
pub mod platform;
pub mod renderer;
pub mod runtime;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use kernel::Kernel;
pub use settings::{Settings, SettingsError};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Physics thread frequency (Hz)
    pub const PHYSICS_HZ: f32 = 240.0;
    /// Fixed simulation timestep
    pub const SIM_DT: f32 = 1.0 / PHYSICS_HZ;

    /// Max absolute lane offset
    pub const ROAD_WIDTH_LIMIT: f32 = 1.0;
    /// Half of car width in normalized road coordinates
    pub const PLAYER_HALF_WIDTH: f32 = 0.18;

    /// Speed limits
    pub const MAX_SPEED: f32 = 50.0;
    pub const MIN_REVERSE_SPEED: f32 = -15.0;
    /// Longitudinal rates (units/s²)
    pub const ACCELERATION: f32 = 17.0;
    pub const DECELERATION: f32 = 20.0;
    /// Speed multiplier applied per physics tick when coasting
    pub const FRICTION: f32 = 0.9999;

    /// Lateral model
    pub const LATERAL_FACTOR: f32 = 0.0004;
    pub const STEER_COMPENSATION: f32 = 0.002;
    pub const LATERAL_GAIN: f32 = 40.0;
    /// Visual heading
    pub const HEADING_TURN_SPEED: f32 = 0.4;
    pub const HEADING_DRIFT_FACTOR: f32 = 0.004;
    pub const HEADING_DECAY: f32 = 0.95;

    /// Curvature low-pass rate (1/s)
    pub const CURVATURE_SMOOTHING: f32 = 3.0;
    /// Scale of the camera-lane curvature accumulator
    pub const PLAYER_CURVATURE_SCALE: f32 = 0.01;

    /// Half-length of the longitudinal band in which an obstacle is solid
    pub const OBSTACLE_WINDOW: f32 = 0.5;
    /// Lookahead for the upcoming obstacle warning
    pub const WARNING_RANGE: f32 = 50.0;

    /// Overview polyline integration
    pub const OVERVIEW_STEP: f32 = 1.0;
    pub const OVERVIEW_HEADING_SCALE: f32 = 0.01;

    /// Speeds at or below this count as stopped for audio cues
    pub const MOVING_SPEED: f32 = 0.1;
}
