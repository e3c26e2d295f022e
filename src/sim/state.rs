//! Game phase and its transition contract
//!
//! The phase lives in a single atomic cell read by every loop. Transitions out
//! of `Running` belong to the physics integrator; the menu transitions belong
//! to the menu controller. Readers may act on a phase for one iteration after
//! it has changed.

use std::sync::atomic::{AtomicU8, Ordering};

use serde::{Deserialize, Serialize};

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[repr(u8)]
pub enum GamePhase {
    /// Title screen
    #[default]
    BootMenu = 0,
    /// Choosing a map
    MapSelect = 1,
    /// Physics active
    Running = 2,
    /// Finish line reached
    Win = 3,
    /// Crashed
    Over = 4,
    /// Shutting down; every loop exits
    Halt = 5,
}

impl GamePhase {
    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => GamePhase::BootMenu,
            1 => GamePhase::MapSelect,
            2 => GamePhase::Running,
            3 => GamePhase::Win,
            4 => GamePhase::Over,
            _ => GamePhase::Halt,
        }
    }

    /// Legal transitions. `Halt` is reachable from anywhere and leads nowhere.
    pub fn can_transition_to(self, next: GamePhase) -> bool {
        use GamePhase::*;
        match (self, next) {
            (Halt, _) => false,
            (_, Halt) => true,
            (BootMenu, MapSelect) => true,
            (MapSelect, Running) | (MapSelect, BootMenu) => true,
            (Running, Win) | (Running, Over) => true,
            (Win, MapSelect) | (Over, MapSelect) => true,
            _ => false,
        }
    }

    /// Phases driven by the menu controller
    pub fn is_menu(self) -> bool {
        matches!(
            self,
            GamePhase::BootMenu | GamePhase::MapSelect | GamePhase::Win | GamePhase::Over
        )
    }

    /// A race has ended and waits for acknowledgement
    pub fn is_finished(self) -> bool {
        matches!(self, GamePhase::Win | GamePhase::Over)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GamePhase::BootMenu => "BOOT",
            GamePhase::MapSelect => "SELECT",
            GamePhase::Running => "RUNNING",
            GamePhase::Win => "WIN",
            GamePhase::Over => "OVER",
            GamePhase::Halt => "HALT",
        }
    }
}

/// The shared phase cell
#[derive(Debug, Default)]
pub struct SharedPhase(AtomicU8);

impl SharedPhase {
    pub fn new(phase: GamePhase) -> Self {
        Self(AtomicU8::new(phase as u8))
    }

    #[inline]
    pub fn load(&self) -> GamePhase {
        GamePhase::from_u8(self.0.load(Ordering::Acquire))
    }

    #[inline]
    pub fn is(&self, phase: GamePhase) -> bool {
        self.load() == phase
    }

    /// Move `from -> to` if the cell still holds `from` and the move is legal.
    ///
    /// Returns false when another writer got there first or the move is not
    /// in the table; the cell is left untouched in that case.
    pub fn advance(&self, from: GamePhase, to: GamePhase) -> bool {
        if !from.can_transition_to(to) {
            log::warn!("Rejected phase transition {} -> {}", from.as_str(), to.as_str());
            return false;
        }
        let moved = self
            .0
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        if moved {
            log::info!("Phase {} -> {}", from.as_str(), to.as_str());
        }
        moved
    }

    /// Enter `Halt` from whatever phase is current
    pub fn halt(&self) {
        let prev = GamePhase::from_u8(self.0.swap(GamePhase::Halt as u8, Ordering::AcqRel));
        if prev != GamePhase::Halt {
            log::info!("Phase {} -> HALT", prev.as_str());
        }
    }
}
