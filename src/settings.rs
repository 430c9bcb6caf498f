//! Player settings and preferences
//!
//! Persisted separately from high scores: a JSON file on native builds,
//! LocalStorage in the browser.

use serde::{Deserialize, Serialize};

use crate::highscores::DEFAULT_PLAYER_NAME;
use crate::sim::state::Level;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Explosion particle count multiplier
    pub fn particle_scale(&self) -> f32 {
        match self {
            QualityPreset::Low => 0.35,
            QualityPreset::Medium => 0.7,
            QualityPreset::High => 1.0,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Name recorded with high scores
    pub player_name: String,
    /// Level selected on the start screen
    pub default_level: Level,
    /// Graphics quality preset
    pub quality: QualityPreset,
    /// Explosion particles
    pub particles: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            player_name: DEFAULT_PLAYER_NAME.to_string(),
            default_level: Level::default(),
            quality: QualityPreset::Medium,
            particles: true,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset (applies preset defaults)
    pub fn from_preset(preset: QualityPreset) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    /// Apply a quality preset (updates quality-dependent settings)
    pub fn apply_preset(&mut self, preset: QualityPreset) {
        self.quality = preset;
        if preset != QualityPreset::Low {
            self.particles = true;
        }
    }

    /// Effective particle multiplier (0 when particles are off)
    pub fn particle_scale(&self) -> f32 {
        if self.particles {
            self.quality.particle_scale()
        } else {
            0.0
        }
    }

    /// Set the player name; blank falls back to the default
    pub fn set_player_name(&mut self, name: &str) {
        let name = name.trim();
        self.player_name = if name.is_empty() {
            DEFAULT_PLAYER_NAME.to_string()
        } else {
            name.to_string()
        };
    }

    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "space_runner_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) -> crate::Result<()> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| crate::Error::StorageUnavailable("LocalStorage".to_string()))?;
        let json = self.to_json()?;
        storage
            .set_item(Self::STORAGE_KEY, &json)
            .map_err(|_| crate::Error::StorageUnavailable("LocalStorage write".to_string()))?;
        log::info!("Settings saved");
        Ok(())
    }

    /// Load settings from a JSON file; missing or unreadable files give defaults
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Save settings to a JSON file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self, path: &std::path::Path) -> crate::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_json()?)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quality_names() {
        for preset in [QualityPreset::Low, QualityPreset::Medium, QualityPreset::High] {
            assert_eq!(QualityPreset::from_str(preset.as_str()), Some(preset));
        }
        assert_eq!(QualityPreset::from_str("med"), Some(QualityPreset::Medium));
        assert_eq!(QualityPreset::from_str("ultra"), None);
    }

    #[test]
    fn test_particle_scale() {
        let mut settings = Settings::from_preset(QualityPreset::High);
        assert_eq!(settings.particle_scale(), 1.0);
        settings.particles = false;
        assert_eq!(settings.particle_scale(), 0.0);
        settings.apply_preset(QualityPreset::Medium);
        assert!(settings.particles);
        assert_eq!(settings.particle_scale(), QualityPreset::Medium.particle_scale());
    }

    #[test]
    fn test_player_name() {
        let mut settings = Settings::default();
        settings.set_player_name("  Nova ");
        assert_eq!(settings.player_name, "Nova");
        settings.set_player_name("");
        assert_eq!(settings.player_name, DEFAULT_PLAYER_NAME);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{"player_name":"Ace","default_level":4}"#).unwrap();
        assert_eq!(settings.player_name, "Ace");
        assert_eq!(settings.default_level.get(), 4);
        assert_eq!(settings.quality, QualityPreset::Medium);
        assert!(settings.particles);
        assert!(Settings::from_json(r#"{"default_level":9}"#).is_err());
    }

    #[test]
    fn test_unknown_keys_ignored() {
        // Files written by older builds carried an FPS toggle
        let settings = Settings::from_json(r#"{"player_name":"Ace","show_fps":true}"#).unwrap();
        assert_eq!(settings.player_name, "Ace");
        assert_eq!(settings.quality, QualityPreset::Medium);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_file_round_trip() {
        let path = std::env::temp_dir().join(format!("space_runner_settings_{}.json", std::process::id()));
        let mut settings = Settings::from_preset(QualityPreset::Low);
        settings.set_player_name("Kai");
        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path), settings);
        let _ = std::fs::remove_file(&path);

        // Missing file
        assert_eq!(Settings::load(&path), Settings::default());
    }
}
