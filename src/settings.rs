//! Player preferences
//!
//! Persisted separately from the high score in LocalStorage.

use serde::{Deserialize, Serialize};

/// Stored as JSON; fields missing from older saves take their defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Overall output level, 0.0 - 1.0
    pub master_volume: f32,
    /// Cue level relative to the master, 0.0 - 1.0
    pub sfx_volume: f32,
    pub muted: bool,
    /// FPS readout in the HUD
    pub show_fps: bool,
    /// Draw the avatar level and still on the start screen
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.3,
            sfx_volume: 1.0,
            muted: false,
            show_fps: false,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Effective output gain for sound effects
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            return 0.0;
        }
        self.master_volume.clamp(0.0, 1.0) * self.sfx_volume.clamp(0.0, 1.0)
    }

    /// Parse stored settings. Missing fields take their defaults; unreadable
    /// JSON yields `None`.
    pub fn from_json(json: &str) -> Option<Self> {
        serde_json::from_str(json).ok()
    }

    /// Stored preferences, or defaults when absent or unreadable
    pub fn load() -> Self {
        let Some(json) = backend::read() else {
            log::info!("No stored settings, using defaults");
            return Self::default();
        };
        Self::from_json(&json).unwrap_or_else(|| {
            log::warn!("Stored settings unreadable, using defaults");
            Self::default()
        })
    }

    /// Best-effort; a failed write only logs
    pub fn save(&self) {
        match serde_json::to_string(self) {
            Ok(json) => backend::write(&json),
            Err(e) => log::warn!("Failed to serialize settings: {}", e),
        }
    }
}

/// Browser LocalStorage under `gate_flap_settings`
#[cfg(target_arch = "wasm32")]
mod backend {
    const STORAGE_KEY: &str = "gate_flap_settings";

    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }

    pub fn read() -> Option<String> {
        storage()?.get_item(STORAGE_KEY).ok()?
    }

    pub fn write(json: &str) {
        let written = storage().is_some_and(|s| s.set_item(STORAGE_KEY, json).is_ok());
        if !written {
            log::warn!("Could not write settings to LocalStorage");
        }
    }
}

/// Native builds keep preferences for the process lifetime only
#[cfg(not(target_arch = "wasm32"))]
mod backend {
    pub fn read() -> Option<String> {
        None
    }

    pub fn write(_json: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings = Settings::from_json(r#"{"muted": true, "show_fps": true}"#).unwrap();
        assert!(settings.muted);
        assert!(settings.show_fps);
        assert_eq!(settings.master_volume, Settings::default().master_volume);
        assert!(!settings.reduced_motion);
    }

    #[test]
    fn test_garbage_json_rejected() {
        assert!(Settings::from_json("volume=11").is_none());
    }

    #[test]
    fn test_round_trip() {
        let settings = Settings {
            master_volume: 0.5,
            reduced_motion: true,
            ..Default::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        assert_eq!(Settings::from_json(&json), Some(settings));
    }

    #[test]
    fn test_effective_volume() {
        let mut settings = Settings {
            master_volume: 0.5,
            sfx_volume: 0.5,
            ..Default::default()
        };
        assert!((settings.effective_volume() - 0.25).abs() < 1e-6);
        settings.master_volume = 3.0;
        assert!((settings.effective_volume() - 0.5).abs() < 1e-6);
        settings.muted = true;
        assert_eq!(settings.effective_volume(), 0.0);
    }

    #[test]
    fn test_native_load_falls_back_to_defaults() {
        Settings::default().save();
        assert_eq!(Settings::load(), Settings::default());
    }
}
