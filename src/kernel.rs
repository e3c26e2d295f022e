//! The simulation kernel: single owner of all shared state
//!
//! One `Kernel` is created at startup and handed to every loop behind an
//! `Arc`. The vehicle lives behind its own mutex; everything else is either
//! immutable per map load or lock-free.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use crate::sim::{
    FixedStep, GamePhase, MapId, RegisterBus, SharedPhase, StepOutcome, Track, Vehicle,
    VehicleSnapshot, build_track, step,
};
use crate::tuning::Tuning;

pub struct Kernel {
    tuning: Tuning,
    bus: RegisterBus,
    phase: SharedPhase,
    vehicle: Mutex<Vehicle>,
    /// Active track, swapped wholesale on map load
    track: RwLock<Arc<Track>>,
    /// Every map prebuilt once for menu previews
    previews: [Arc<Track>; 3],
    running: AtomicBool,
}

impl Kernel {
    pub fn new(tuning: Tuning) -> Self {
        let previews = MapId::ALL.map(|map| Arc::new(build_track(map)));
        let track = RwLock::new(Arc::clone(&previews[MapId::default().index()]));
        Self {
            tuning,
            bus: RegisterBus::new(),
            phase: SharedPhase::new(GamePhase::BootMenu),
            vehicle: Mutex::new(Vehicle::new()),
            track,
            previews,
            running: AtomicBool::new(true),
        }
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn bus(&self) -> &RegisterBus {
        &self.bus
    }

    pub fn phase(&self) -> &SharedPhase {
        &self.phase
    }

    /// Poisoning is ignored: the vehicle is plain data re-derived every step
    fn lock_vehicle(&self) -> MutexGuard<'_, Vehicle> {
        self.vehicle.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The track currently being raced
    pub fn track(&self) -> Arc<Track> {
        let guard = self.track.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*guard)
    }

    /// Prebuilt track for a map, for menu previews
    pub fn preview(&self, map: MapId) -> &Track {
        &self.previews[map.index()]
    }

    /// Swap in the track for `map`. Must be paired with [`Kernel::reset_vehicle`].
    pub fn load_map(&self, map: MapId) {
        let track = Arc::clone(&self.previews[map.index()]);
        log::info!(
            "Loaded map {} ({}): {} segments, {:.0} units, {} obstacles",
            map.number(),
            map.title(),
            track.segments.len(),
            track.total_length,
            track.obstacle_count()
        );
        *self.track.write().unwrap_or_else(PoisonError::into_inner) = track;
    }

    pub fn reset_vehicle(&self) {
        self.lock_vehicle().reset();
        self.bus.publish_warning(None);
        self.bus.publish_engine(0.0, 0.0);
    }

    /// Load a map, reset the vehicle and enter `Running` from `MapSelect`
    pub fn start_race(&self, map: MapId) -> bool {
        if !self.phase.is(GamePhase::MapSelect) {
            return false;
        }
        self.load_map(map);
        self.reset_vehicle();
        self.phase.advance(GamePhase::MapSelect, GamePhase::Running)
    }

    /// Copy of the vehicle taken under the lock
    pub fn snapshot(&self) -> VehicleSnapshot {
        self.lock_vehicle().snapshot()
    }

    /// Run one fixed step under the vehicle lock
    pub fn step_once(&self, track: &Track) -> StepOutcome {
        let dt = self.tuning.dt();
        let mut vehicle = self.lock_vehicle();
        step(&mut vehicle, track, &self.bus, &self.phase, &self.tuning, dt)
    }

    /// Feed wall-clock time into `stepper` and run every step it releases.
    ///
    /// The lock is taken per step, never across the whole batch, so readers
    /// interleave with a physics loop that is catching up. The track is read
    /// again before every step, so a map loaded mid-batch applies at once.
    pub fn advance(&self, stepper: &mut FixedStep, elapsed_secs: f64) -> u32 {
        stepper.accumulate(elapsed_secs);
        let mut steps = 0;
        while stepper.try_step() {
            let track = self.track();
            self.step_once(&track);
            steps += 1;
        }
        steps
    }

    /// Whether loops should keep going
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Enter `Halt` and tell every loop to exit
    pub fn shutdown(&self) {
        self.phase.halt();
        if self.running.swap(false, Ordering::AcqRel) {
            log::info!("Kernel shutting down");
        }
    }
}

impl Default for Kernel {
    fn default() -> Self {
        Self::new(Tuning::default())
    }
}
