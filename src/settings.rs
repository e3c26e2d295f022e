//! Runtime settings
//!
//! Loop rates, the headless driver and physics tuning, persisted as JSON.
//! Every field is optional in the file; missing ones take their defaults.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::MapId;
use crate::tuning::Tuning;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("setting `{field}` = {value} is out of range: {reason}")]
    Invalid {
        field: &'static str,
        value: f32,
        reason: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Loop rates (Hz) ===
    pub input_hz: f32,
    pub render_hz: f32,
    pub audio_hz: f32,
    /// Sleep between physics passes; the step itself stays fixed
    pub physics_idle_micros: u64,

    // === Headless driver ===
    /// Map the autopilot picks from the select screen
    pub start_map: MapId,
    /// Speed the autopilot holds the throttle up to
    pub autopilot_cruise: f32,
    /// Stop the binary after this many seconds; 0 runs until halted
    pub max_run_secs: f32,

    pub tuning: Tuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input_hz: 1000.0,
            render_hz: 60.0,
            audio_hz: 50.0,
            physics_idle_micros: 500,

            start_map: MapId::One,
            autopilot_cruise: 22.0,
            max_run_secs: 0.0,

            tuning: Tuning::default(),
        }
    }
}

/// Sleep between loop passes for a rate; unusable rates fall back to 1 kHz
fn period(hz: f32) -> Duration {
    if hz > 0.0 {
        Duration::try_from_secs_f32(1.0 / hz).unwrap_or(Duration::from_millis(1))
    } else {
        Duration::from_millis(1)
    }
}

/// A loop rate must be positive with a representable period
fn check_rate(field: &'static str, hz: f32) -> Result<(), SettingsError> {
    if !(hz.is_finite() && hz > 0.0) {
        return Err(SettingsError::Invalid {
            field,
            value: hz,
            reason: "rate must be a positive number of Hz",
        });
    }
    if Duration::try_from_secs_f32(1.0 / hz).is_err() {
        return Err(SettingsError::Invalid {
            field,
            value: hz,
            reason: "rate is too small to sleep for",
        });
    }
    Ok(())
}

impl Settings {
    /// Parse and validate
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values the loops cannot run with
    pub fn validate(&self) -> Result<(), SettingsError> {
        check_rate("input_hz", self.input_hz)?;
        check_rate("render_hz", self.render_hz)?;
        check_rate("audio_hz", self.audio_hz)?;
        check_rate("tuning.physics_hz", self.tuning.physics_hz)?;
        if !(self.max_run_secs.is_finite() && self.max_run_secs >= 0.0)
            || Duration::try_from_secs_f32(self.max_run_secs).is_err()
        {
            return Err(SettingsError::Invalid {
                field: "max_run_secs",
                value: self.max_run_secs,
                reason: "run limit must be a finite number of seconds",
            });
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Write settings as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    pub fn input_period(&self) -> Duration {
        period(self.input_hz)
    }

    pub fn render_period(&self) -> Duration {
        period(self.render_hz)
    }

    pub fn audio_period(&self) -> Duration {
        period(self.audio_hz)
    }

    pub fn physics_idle(&self) -> Duration {
        Duration::from_micros(self.physics_idle_micros)
    }

    /// `None` when the run is unbounded or the limit cannot be represented
    pub fn run_limit(&self) -> Option<Duration> {
        if self.max_run_secs > 0.0 {
            Duration::try_from_secs_f32(self.max_run_secs).ok()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.input_hz, 1000.0);
        assert_eq!(s.tuning.physics_hz, 240.0);
        assert_eq!(s.render_period(), Duration::from_secs_f32(1.0 / 60.0));
        assert!(s.run_limit().is_none());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let s = Settings::from_json(
            r#"{ "start_map": "Three", "max_run_secs": 2.5, "tuning": { "max_speed": 40.0 } }"#,
        )
        .unwrap();
        assert_eq!(s.start_map, MapId::Three);
        assert_eq!(s.run_limit(), Some(Duration::from_secs_f32(2.5)));
        assert_eq!(s.tuning.max_speed, 40.0);
        assert_eq!(s.tuning.acceleration, Tuning::default().acceleration);
        assert_eq!(s.audio_hz, 50.0);
    }

    #[test]
    fn test_json_round_trip() {
        let mut s = Settings::default();
        s.render_hz = 30.0;
        s.start_map = MapId::Two;
        let back = Settings::from_json(&s.to_json().unwrap()).unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(matches!(
            Settings::from_json("{ not json"),
            Err(SettingsError::Json(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let path = std::env::temp_dir().join("kernel-racer-does-not-exist.json");
        assert!(matches!(Settings::load(&path), Err(SettingsError::Io(_))));
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join(format!("kernel-racer-{}.json", std::process::id()));
        let mut s = Settings::default();
        s.autopilot_cruise = 18.0;
        s.save(&path).unwrap();
        let loaded = Settings::load(&path).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(loaded, s);
    }

    #[test]
    fn test_bad_physics_rate_rejected() {
        for json in [
            r#"{ "tuning": { "physics_hz": -240.0 } }"#,
            r#"{ "tuning": { "physics_hz": 0.0 } }"#,
            r#"{ "tuning": { "physics_hz": 1e-45 } }"#,
        ] {
            assert!(
                matches!(
                    Settings::from_json(json),
                    Err(SettingsError::Invalid { field: "tuning.physics_hz", .. })
                ),
                "{json}"
            );
        }
    }

    #[test]
    fn test_bad_loop_rates_rejected() {
        assert!(matches!(
            Settings::from_json(r#"{ "render_hz": 1e-45 }"#),
            Err(SettingsError::Invalid { field: "render_hz", .. })
        ));
        assert!(matches!(
            Settings::from_json(r#"{ "audio_hz": -5.0 }"#),
            Err(SettingsError::Invalid { field: "audio_hz", .. })
        ));
        assert!(matches!(
            Settings::from_json(r#"{ "input_hz": 0.0 }"#),
            Err(SettingsError::Invalid { field: "input_hz", .. })
        ));
    }

    #[test]
    fn test_huge_run_limit_rejected() {
        // 1e39 overflows f32 to infinity
        assert!(matches!(
            Settings::from_json(r#"{ "max_run_secs": 1e39 }"#),
            Err(SettingsError::Invalid { field: "max_run_secs", .. })
        ));
        assert!(matches!(
            Settings::from_json(r#"{ "max_run_secs": -1.0 }"#),
            Err(SettingsError::Invalid { field: "max_run_secs", .. })
        ));
    }

    #[test]
    fn test_unchecked_values_do_not_panic() {
        let s = Settings {
            max_run_secs: f32::INFINITY,
            render_hz: 1e-45,
            ..Default::default()
        };
        assert!(s.validate().is_err());
        assert_eq!(s.run_limit(), None);
        assert_eq!(s.render_period(), Duration::from_millis(1));
    }

    #[test]
    fn test_zero_rate_does_not_panic() {
        let s = Settings {
            input_hz: 0.0,
            ..Default::default()
        };
        assert_eq!(s.input_period(), Duration::from_millis(1));
    }
}
