//! Presentation layer
//!
//! Drivers never touch kernel internals. Each frame the render loop captures a
//! [`FrameView`] and hands it to a [`Presenter`], which owns the actual output
//! (terminal, window, log).

pub mod hud;
pub mod minimap;

use std::sync::Arc;

pub use hud::{LogPresenter, RaceStats, Rating, status_line};
pub use minimap::Minimap;

use crate::Kernel;
use crate::sim::{GamePhase, MapId, ObstacleWarning, Track, VehicleSnapshot};

/// Everything one frame needs, copied out of the kernel
#[derive(Debug, Clone)]
pub struct FrameView {
    pub phase: GamePhase,
    pub vehicle: VehicleSnapshot,
    pub track: Arc<Track>,
    pub warning: Option<ObstacleWarning>,
    /// Highlighted entry on the map select screen
    pub selected: MapId,
    pub max_speed: f32,
}

impl FrameView {
    pub fn capture(kernel: &Kernel, selected: MapId) -> Self {
        Self {
            phase: kernel.phase().load(),
            vehicle: kernel.snapshot(),
            track: kernel.track(),
            warning: kernel.bus().warning(),
            selected,
            max_speed: kernel.tuning().max_speed,
        }
    }

    /// Fraction of the track covered, 0..=1
    pub fn progress(&self) -> f32 {
        if self.track.total_length <= 0.0 {
            return 0.0;
        }
        (self.vehicle.distance / self.track.total_length).clamp(0.0, 1.0)
    }
}

/// Output driver for the render loop
pub trait Presenter: Send {
    fn present(&mut self, view: &FrameView);
}
