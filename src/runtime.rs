//! Loop runtime
//!
//! Spawns the four cooperating loops (input, physics, render, audio) on named
//! threads. Each loop polls [`Kernel::is_running`] once per pass and sleeps
//! for its own period; [`Kernel::shutdown`] stops them all.

use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::Kernel;
use crate::audio::{AudioDispatcher, AudioSink};
use crate::menu::MenuController;
use crate::platform::{EdgeDetector, InputSource};
use crate::renderer::{FrameView, Presenter};
use crate::settings::Settings;
use crate::sim::{FixedStep, MapId};

pub struct Runtime {
    kernel: Arc<Kernel>,
    handles: Vec<JoinHandle<()>>,
}

fn spawn_loop<F>(name: &str, body: F) -> io::Result<JoinHandle<()>>
where
    F: FnOnce() + Send + 'static,
{
    thread::Builder::new().name(name.to_string()).spawn(move || {
        log::debug!("{} loop started", thread::current().name().unwrap_or("?"));
        body();
        log::debug!("{} loop stopped", thread::current().name().unwrap_or("?"));
    })
}

impl Runtime {
    /// Start every loop. If a thread cannot be spawned, the ones already
    /// running are shut down before the error is returned.
    pub fn spawn<I, P, A>(
        kernel: Arc<Kernel>,
        settings: &Settings,
        input: I,
        presenter: P,
        audio: A,
    ) -> io::Result<Self>
    where
        I: InputSource + 'static,
        P: Presenter + 'static,
        A: AudioSink + 'static,
    {
        let mut runtime = Self {
            kernel: Arc::clone(&kernel),
            handles: Vec::with_capacity(4),
        };

        let spawned = runtime
            .start_input(input, settings.input_period())
            .and_then(|rt| rt.start_physics(settings.physics_idle()))
            .and_then(|rt| rt.start_render(presenter, settings.render_period(), settings.start_map))
            .and_then(|rt| rt.start_audio(audio, settings.audio_period()))
            .map(|_| ());

        if let Err(e) = spawned {
            log::error!("Failed to spawn loop thread: {}", e);
            kernel.shutdown();
            runtime.join();
            return Err(e);
        }

        log::info!("Runtime started with {} loops", runtime.handles.len());
        Ok(runtime)
    }

    fn start_input<I: InputSource + 'static>(
        &mut self,
        mut input: I,
        period: Duration,
    ) -> io::Result<&mut Self> {
        let kernel = Arc::clone(&self.kernel);
        self.handles.push(spawn_loop("input", move || {
            let mut edges = EdgeDetector::new();
            while kernel.is_running() {
                let sample = input.sample(&kernel);
                edges.apply(sample, kernel.bus());
                thread::sleep(period);
            }
        })?);
        Ok(self)
    }

    fn start_physics(&mut self, idle: Duration) -> io::Result<&mut Self> {
        let kernel = Arc::clone(&self.kernel);
        self.handles.push(spawn_loop("physics", move || {
            let mut stepper = FixedStep::from_hz(kernel.tuning().physics_hz);
            let mut last = Instant::now();
            while kernel.is_running() {
                let now = Instant::now();
                let elapsed = now.duration_since(last).as_secs_f64();
                last = now;
                kernel.advance(&mut stepper, elapsed);
                thread::sleep(idle);
            }
        })?);
        Ok(self)
    }

    fn start_render<P: Presenter + 'static>(
        &mut self,
        mut presenter: P,
        period: Duration,
        initial: MapId,
    ) -> io::Result<&mut Self> {
        let kernel = Arc::clone(&self.kernel);
        self.handles.push(spawn_loop("render", move || {
            let mut menu = MenuController::with_selection(initial);
            while kernel.is_running() {
                if let Some(action) = menu.poll(&kernel) {
                    log::debug!("Menu: {:?}", action);
                }
                presenter.present(&FrameView::capture(&kernel, menu.selected()));
                thread::sleep(period);
            }
        })?);
        Ok(self)
    }

    fn start_audio<A: AudioSink + 'static>(
        &mut self,
        sink: A,
        period: Duration,
    ) -> io::Result<&mut Self> {
        let kernel = Arc::clone(&self.kernel);
        self.handles.push(spawn_loop("audio", move || {
            let mut audio = AudioDispatcher::new(sink);
            while kernel.is_running() {
                audio.pump(&kernel);
                thread::sleep(period);
            }
            // Stop music on the way out
            audio.pump(&kernel);
        })?);
        Ok(self)
    }

    pub fn kernel(&self) -> &Arc<Kernel> {
        &self.kernel
    }

    /// Block until the kernel halts or `limit` passes, then shut down.
    /// Returns `true` when the kernel halted by itself.
    pub fn wait(&self, limit: Option<Duration>) -> bool {
        let start = Instant::now();
        while self.kernel.is_running() {
            if limit.is_some_and(|l| start.elapsed() >= l) {
                log::info!("Run limit reached");
                self.kernel.shutdown();
                return false;
            }
            thread::sleep(Duration::from_millis(10));
        }
        true
    }

    /// Join every loop. Returns how many of them panicked.
    pub fn join(self) -> usize {
        let mut panicked = 0;
        for handle in self.handles {
            let name = handle.thread().name().unwrap_or("?").to_string();
            if handle.join().is_err() {
                log::error!("{} loop panicked", name);
                panicked += 1;
            }
        }
        panicked
    }
}
