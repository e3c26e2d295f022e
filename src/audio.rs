//! Audio feedback dispatch
//!
//! The audio loop is the single consumer of the `crash`, `game_over`, `win`
//! and `skid` signals. It test-and-clears them here and forwards cues to an
//! [`AudioSink`]; the sink owns the device and any fallback tones.

use crate::Kernel;
use crate::sim::GamePhase;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    /// Vehicle hit a wall or obstacle
    Crash,
    /// Race lost
    GameOver,
    /// Finish line reached
    Win,
    /// Steering started while moving
    Skid,
}

/// Continuous engine state for looping engine sounds
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EngineReading {
    pub speed: f32,
    /// 0 (off) ..= 1 (redline)
    pub intensity: f32,
}

/// Device-side audio driver
pub trait AudioSink: Send {
    fn play(&mut self, cue: SoundCue);
    /// Called every audio frame while a race is running
    fn engine(&mut self, reading: EngineReading);
    /// Background music on/off, called on every change
    fn music(&mut self, playing: bool);
}

/// Pumps kernel signals into an [`AudioSink`]
pub struct AudioDispatcher<S: AudioSink> {
    sink: S,
    music_on: bool,
}

impl<S: AudioSink> AudioDispatcher<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            music_on: false,
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// One audio frame. Returns the cues that fired.
    pub fn pump(&mut self, kernel: &Kernel) -> Vec<SoundCue> {
        let bus = kernel.bus();
        let phase = kernel.phase().load();

        let music = phase == GamePhase::Running;
        if music != self.music_on {
            self.music_on = music;
            self.sink.music(music);
        }

        let mut fired = Vec::new();
        for (flag, cue) in [
            (&bus.crash, SoundCue::Crash),
            (&bus.game_over, SoundCue::GameOver),
            (&bus.win, SoundCue::Win),
            (&bus.skid, SoundCue::Skid),
        ] {
            if flag.take() {
                self.sink.play(cue);
                fired.push(cue);
            }
        }

        if phase == GamePhase::Running {
            self.sink.engine(EngineReading {
                speed: bus.speed(),
                intensity: bus.engine_intensity(),
            });
        }

        fired
    }
}

/// Fallback sink: logs cues instead of playing them
#[derive(Debug, Default)]
pub struct LogAudioSink {
    last_bucket: Option<u8>,
}

impl AudioSink for LogAudioSink {
    fn play(&mut self, cue: SoundCue) {
        log::info!("[audio] {:?}", cue);
    }

    fn engine(&mut self, reading: EngineReading) {
        // Only report coarse changes
        let bucket = (reading.intensity * 10.0).round() as u8;
        if self.last_bucket != Some(bucket) {
            self.last_bucket = Some(bucket);
            log::debug!(
                "[audio] engine {:.0}% at speed {:.1}",
                reading.intensity * 100.0,
                reading.speed
            );
        }
    }

    fn music(&mut self, playing: bool) {
        log::debug!("[audio] music {}", if playing { "on" } else { "off" });
    }
}
