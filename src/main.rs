//! Kernel Racer entry point
//!
//! Headless native run: the autopilot drives the selected map while the HUD
//! and audio cues are written to the log. Set `RUST_LOG=info` to see them.
//!
//! Usage: `kernel-racer [settings.json]`

use std::process::ExitCode;
use std::sync::Arc;

use kernel_racer::audio::LogAudioSink;
use kernel_racer::platform::Autopilot;
use kernel_racer::renderer::LogPresenter;
use kernel_racer::runtime::Runtime;
use kernel_racer::{Kernel, Settings};

fn load_settings() -> Settings {
    let Some(path) = std::env::args().nth(1) else {
        log::info!("Using default settings");
        return Settings::default();
    };
    match Settings::load(&path) {
        Ok(settings) => settings,
        Err(e) => {
            log::warn!("Could not load {}: {}; using defaults", path, e);
            Settings::default()
        }
    }
}

fn main() -> ExitCode {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();
    log::info!("Kernel Racer (native) starting...");

    let settings = load_settings();
    let kernel = Arc::new(Kernel::new(settings.tuning.clone()));
    let pilot = Autopilot::new(settings.start_map, settings.autopilot_cruise);
    let presenter = LogPresenter::new(settings.render_hz.max(1.0) as u32);

    let runtime = match Runtime::spawn(
        Arc::clone(&kernel),
        &settings,
        pilot,
        presenter,
        LogAudioSink::default(),
    ) {
        Ok(runtime) => runtime,
        Err(e) => {
            log::error!("Could not start: {}", e);
            return ExitCode::FAILURE;
        }
    };

    runtime.wait(settings.run_limit());
    let snap = kernel.snapshot();
    log::info!(
        "Stopped in {} at distance {:.0} after {:.2}s",
        kernel.phase().load().as_str(),
        snap.distance,
        snap.race_time
    );

    if runtime.join() > 0 {
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
