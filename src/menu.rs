//! Menu controller
//!
//! The single consumer of the menu edge flags (`space`, `up`, `down`,
//! `map1..3`, `escape`). Runs on the presentation loop and owns every phase
//! transition that is not a physics outcome.

use crate::Kernel;
use crate::sim::{GamePhase, MapId};

/// What a poll did, for the presentation driver to react to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    OpenMapSelect,
    Select(MapId),
    StartRace(MapId),
    BackToBoot,
    Acknowledge,
    Halt,
}

#[derive(Debug, Clone)]
pub struct MenuController {
    selected: MapId,
    last_phase: GamePhase,
}

impl Default for MenuController {
    fn default() -> Self {
        Self::new()
    }
}

impl MenuController {
    pub fn new() -> Self {
        Self::with_selection(MapId::One)
    }

    pub fn with_selection(selected: MapId) -> Self {
        Self {
            selected,
            last_phase: GamePhase::BootMenu,
        }
    }

    /// Map highlighted on the selection screen
    pub fn selected(&self) -> MapId {
        self.selected
    }

    /// Consume pending edges for the current phase and apply the transition
    pub fn poll(&mut self, kernel: &Kernel) -> Option<MenuAction> {
        let phase = kernel.phase().load();
        let bus = kernel.bus();

        // Keys pressed mid-race must not acknowledge the result screen
        if phase != self.last_phase {
            if phase.is_finished() {
                bus.clear_menu_edges();
            }
            self.last_phase = phase;
        }

        match phase {
            GamePhase::BootMenu => {
                if bus.space.take()
                    && kernel.phase().advance(GamePhase::BootMenu, GamePhase::MapSelect)
                {
                    return Some(MenuAction::OpenMapSelect);
                }
                if bus.escape.take() {
                    kernel.shutdown();
                    return Some(MenuAction::Halt);
                }
                None
            }
            GamePhase::MapSelect => {
                let before = self.selected;
                if bus.up.take() {
                    self.selected = self.selected.prev();
                }
                if bus.down.take() {
                    self.selected = self.selected.next();
                }
                for (flag, map) in [
                    (&bus.map1, MapId::One),
                    (&bus.map2, MapId::Two),
                    (&bus.map3, MapId::Three),
                ] {
                    if flag.take() {
                        self.selected = map;
                    }
                }
                if bus.space.take() && kernel.start_race(self.selected) {
                    return Some(MenuAction::StartRace(self.selected));
                }
                if bus.escape.take()
                    && kernel.phase().advance(GamePhase::MapSelect, GamePhase::BootMenu)
                {
                    return Some(MenuAction::BackToBoot);
                }
                (self.selected != before).then_some(MenuAction::Select(self.selected))
            }
            GamePhase::Win | GamePhase::Over => {
                if bus.space.take() {
                    kernel.reset_vehicle();
                    if kernel.phase().advance(phase, GamePhase::MapSelect) {
                        return Some(MenuAction::Acknowledge);
                    }
                }
                if bus.escape.take() {
                    kernel.shutdown();
                    return Some(MenuAction::Halt);
                }
                None
            }
            GamePhase::Halt => {
                kernel.shutdown();
                None
            }
            GamePhase::Running => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::VehicleSnapshot;

    #[test]
    fn test_boot_to_race() {
        let kernel = Kernel::default();
        let mut menu = MenuController::new();

        assert_eq!(menu.poll(&kernel), None);
        kernel.bus().space.raise();
        assert_eq!(menu.poll(&kernel), Some(MenuAction::OpenMapSelect));
        assert_eq!(kernel.phase().load(), GamePhase::MapSelect);

        kernel.bus().down.raise();
        assert_eq!(menu.poll(&kernel), Some(MenuAction::Select(MapId::Two)));
        kernel.bus().down.raise();
        kernel.bus().down.raise();
        assert_eq!(menu.poll(&kernel), Some(MenuAction::Select(MapId::Three)));
        kernel.bus().up.raise();
        assert_eq!(menu.poll(&kernel), Some(MenuAction::Select(MapId::Two)));

        kernel.bus().space.raise();
        assert_eq!(menu.poll(&kernel), Some(MenuAction::StartRace(MapId::Two)));
        assert_eq!(kernel.phase().load(), GamePhase::Running);
        assert_eq!(kernel.track().map, MapId::Two);
    }

    #[test]
    fn test_number_keys_select_directly() {
        let kernel = Kernel::default();
        kernel.phase().advance(GamePhase::BootMenu, GamePhase::MapSelect);
        let mut menu = MenuController::new();
        kernel.bus().map3.raise();
        assert_eq!(menu.poll(&kernel), Some(MenuAction::Select(MapId::Three)));
        assert_eq!(menu.selected(), MapId::Three);
    }

    #[test]
    fn test_escape_paths() {
        let kernel = Kernel::default();
        kernel.phase().advance(GamePhase::BootMenu, GamePhase::MapSelect);
        let mut menu = MenuController::new();

        kernel.bus().escape.raise();
        assert_eq!(menu.poll(&kernel), Some(MenuAction::BackToBoot));
        assert_eq!(kernel.phase().load(), GamePhase::BootMenu);

        kernel.bus().escape.raise();
        assert_eq!(menu.poll(&kernel), Some(MenuAction::Halt));
        assert_eq!(kernel.phase().load(), GamePhase::Halt);
        assert!(!kernel.is_running());
    }

    #[test]
    fn test_running_ignores_menu_keys() {
        let kernel = Kernel::default();
        kernel.phase().advance(GamePhase::BootMenu, GamePhase::MapSelect);
        kernel.start_race(MapId::One);
        let mut menu = MenuController::new();

        kernel.bus().escape.raise();
        kernel.bus().space.raise();
        assert_eq!(menu.poll(&kernel), None);
        assert_eq!(kernel.phase().load(), GamePhase::Running);
    }

    #[test]
    fn test_acknowledge_after_race() {
        let kernel = Kernel::default();
        kernel.phase().advance(GamePhase::BootMenu, GamePhase::MapSelect);
        kernel.start_race(MapId::One);
        let mut menu = MenuController::new();
        menu.poll(&kernel);

        // Space pressed during the race is dropped when the result screen opens
        kernel.bus().space.raise();
        kernel.phase().advance(GamePhase::Running, GamePhase::Over);
        assert_eq!(menu.poll(&kernel), None);
        assert_eq!(kernel.phase().load(), GamePhase::Over);

        kernel.bus().space.raise();
        assert_eq!(menu.poll(&kernel), Some(MenuAction::Acknowledge));
        assert_eq!(kernel.phase().load(), GamePhase::MapSelect);
        assert_eq!(kernel.snapshot(), VehicleSnapshot::default());
    }

    #[test]
    fn test_halt_stops_loops() {
        let kernel = Kernel::default();
        kernel.phase().halt();
        let mut menu = MenuController::new();
        assert_eq!(menu.poll(&kernel), None);
        assert!(!kernel.is_running());
    }
}
