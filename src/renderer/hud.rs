//! Text HUD
//!
//! Plain-text readouts built from a [`FrameView`]; [`LogPresenter`] writes them
//! through `log` for headless runs.

use super::{FrameView, Presenter};
use crate::sim::GamePhase;

/// Cells in the speed bar
pub const SPEED_BAR_WIDTH: usize = 24;

/// Fraction of max speed shown as "high speed"
const HIGH_SPEED_RATIO: f32 = 0.7;

/// `[#####     ]` bar for `speed` out of `max_speed`; reverse shows empty
pub fn speed_bar(speed: f32, max_speed: f32) -> String {
    let ratio = if max_speed > 0.0 {
        (speed / max_speed).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let filled = (ratio * SPEED_BAR_WIDTH as f32) as usize;
    let mut bar = String::with_capacity(SPEED_BAR_WIDTH + 2);
    bar.push('[');
    for i in 0..SPEED_BAR_WIDTH {
        bar.push(if i >= filled {
            ' '
        } else if i < SPEED_BAR_WIDTH / 3 {
            '#'
        } else if i < SPEED_BAR_WIDTH * 2 / 3 {
            '='
        } else {
            '-'
        });
    }
    bar.push(']');
    bar
}

/// Result-screen grade, from the finishing time against the track length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rating {
    Excellent,
    Great,
    Good,
    Completed,
}

impl Rating {
    /// Faster than `length / 30` is excellent, `/ 25` great, `/ 20` good
    pub fn for_time(race_time: f32, total_length: f32) -> Self {
        if race_time < total_length / 30.0 {
            Rating::Excellent
        } else if race_time < total_length / 25.0 {
            Rating::Great
        } else if race_time < total_length / 20.0 {
            Rating::Good
        } else {
            Rating::Completed
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Rating::Excellent => "EXCELLENT",
            Rating::Great => "GREAT",
            Rating::Good => "GOOD",
            Rating::Completed => "COMPLETED",
        }
    }
}

/// Summary shown once the finish line is reached
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaceStats {
    /// Track length over finishing time; 0 when no time has passed
    pub average_speed: f32,
    pub rating: Rating,
}

impl RaceStats {
    pub fn new(race_time: f32, total_length: f32) -> Self {
        let average_speed = if race_time > 0.0 {
            total_length / race_time
        } else {
            0.0
        };
        Self {
            average_speed,
            rating: Rating::for_time(race_time, total_length),
        }
    }

    pub fn for_view(view: &FrameView) -> Self {
        Self::new(view.vehicle.race_time, view.track.total_length)
    }
}

/// One-line summary of the frame for the current phase
pub fn status_line(view: &FrameView) -> String {
    let v = &view.vehicle;
    match view.phase {
        GamePhase::BootMenu => "[boot] press SPACE to start".to_string(),
        GamePhase::MapSelect => format!(
            "[select] map {} {}: {}",
            view.selected.number(),
            view.selected.title(),
            view.selected.description()
        ),
        GamePhase::Running => {
            let mut line = format!(
                "[race] dist {:.0}/{:.0} time {:.2}s speed {:3} {}",
                v.distance,
                view.track.total_length,
                v.race_time,
                v.speed as i32,
                speed_bar(v.speed, view.max_speed)
            );
            if let Some(w) = view.warning {
                line.push_str(&format!(" obst {:.0}m", w.distance));
            }
            if v.speed > view.max_speed * HIGH_SPEED_RATIO {
                line.push_str(" HIGH SPEED");
            }
            line
        }
        GamePhase::Win => {
            let stats = RaceStats::for_view(view);
            format!(
                "[win] finished {}: {:.0} units in {:.2}s, avg {:.1}, {}",
                view.track.map.title(),
                view.track.total_length,
                v.race_time,
                stats.average_speed,
                stats.rating.as_str()
            )
        }
        GamePhase::Over => format!(
            "[over] crashed at {:.0}/{:.0} after {:.2}s, final speed {}",
            v.distance,
            view.track.total_length,
            v.race_time,
            v.speed as i32
        ),
        GamePhase::Halt => "[halt]".to_string(),
    }
}

/// Logs the status line at most once per `every` frames, and on phase change
#[derive(Debug)]
pub struct LogPresenter {
    every: u32,
    frame: u32,
    last_phase: Option<GamePhase>,
}

impl LogPresenter {
    pub fn new(every: u32) -> Self {
        Self {
            every: every.max(1),
            frame: 0,
            last_phase: None,
        }
    }
}

impl Default for LogPresenter {
    fn default() -> Self {
        Self::new(60)
    }
}

impl Presenter for LogPresenter {
    fn present(&mut self, view: &FrameView) {
        let changed = self.last_phase != Some(view.phase);
        if changed || self.frame % self.every == 0 {
            log::info!("{}", status_line(view));
        }
        if changed {
            self.last_phase = Some(view.phase);
            self.frame = 0;
        }
        self.frame = self.frame.wrapping_add(1);
    }
}
