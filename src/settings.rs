//! Game settings and preferences
//!
//! Persisted separately from progress saves in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::platform;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    /// Maximum live particles for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 40,
            QualityPreset::Medium => 150,
            QualityPreset::High => 400,
        }
    }

    /// Trail length multiplier (1.0 = full)
    pub fn trail_quality(&self) -> f32 {
        match self {
            QualityPreset::Low => 0.25,
            QualityPreset::Medium => 0.6,
            QualityPreset::High => 1.0,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Visual Effects ===
    /// Marble trail
    pub trails: bool,
    /// Jump bursts and gem sparkles
    pub particles: bool,

    // === Camera ===
    /// Orbit radians per pixel of mouse drag
    pub camera_sensitivity: f32,
    /// Invert vertical drag
    pub invert_y: bool,

    // === Controls ===
    /// Device tilt (degrees) mapped to full stick deflection
    pub tilt_range_degrees: f32,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Mute when window loses focus
    pub mute_on_blur: bool,

    // === Accessibility ===
    /// Reduced motion (no trail, no gem bobbing)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,

            trails: true,
            particles: true,

            camera_sensitivity: 0.003,
            invert_y: false,

            tilt_range_degrees: 30.0,

            show_fps: true,

            master_volume: 0.8,
            sfx_volume: 1.0,
            mute_on_blur: true,

            reduced_motion: false,
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

        // Low preset drops the trail for performance
        if preset == QualityPreset::Low {
            self.trails = false;
        }
    }

    /// Effective trail (respects reduced_motion)
    pub fn effective_trails(&self) -> bool {
        self.trails && !self.reduced_motion
    }

    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    /// Trail points kept, scaled by quality
    pub fn trail_length(&self, full: usize) -> usize {
        if !self.effective_trails() {
            return 0;
        }
        (full as f32 * self.quality.trail_quality()).round() as usize
    }

    /// Effective volume for sound effects
    pub fn effective_sfx_volume(&self) -> f32 {
        (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
    }

    /// LocalStorage key
    pub const STORAGE_KEY: &'static str = "marble_run_settings";

    /// Load settings from storage, falling back to defaults
    pub fn load() -> Self {
        match platform::storage_get(Self::STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from storage");
                    return settings;
                }
                Err(e) => log::warn!("Ignoring unreadable settings: {e}"),
            },
            Ok(None) => {}
            Err(e) => log::warn!("{e}"),
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to storage
    pub fn save(&self) {
        match serde_json::to_string(self) {
            Ok(json) => match platform::storage_set(Self::STORAGE_KEY, &json) {
                Ok(()) => log::info!("Settings saved"),
                Err(e) => log::warn!("Settings not saved: {e}"),
            },
            Err(e) => log::warn!("Settings not serialized: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_low_preset_drops_trail() {
        let settings = Settings::from_preset(QualityPreset::Low);
        assert!(!settings.effective_trails());
        assert_eq!(settings.trail_length(50), 0);
        assert_eq!(Settings::default().trail_length(50), 30);
    }

    #[test]
    fn test_reduced_motion_and_particles() {
        let mut settings = Settings::default();
        settings.reduced_motion = true;
        assert!(!settings.effective_trails());
        settings.particles = false;
        assert_eq!(settings.max_particles(), 0);
    }

    #[test]
    fn test_sfx_volume_scales_with_master() {
        let mut settings = Settings::default();
        assert!((settings.effective_sfx_volume() - 0.8).abs() < 1e-6);
        settings.sfx_volume = 0.5;
        assert!((settings.effective_sfx_volume() - 0.4).abs() < 1e-6);
        settings.master_volume = 3.0;
        settings.sfx_volume = 1.0;
        assert_eq!(settings.effective_sfx_volume(), 1.0);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"invert_y":true}"#).unwrap();
        assert!(settings.invert_y);
        assert_eq!(settings.camera_sensitivity, 0.003);
    }

    #[test]
    fn test_save_then_load() {
        let mut settings = Settings::default();
        settings.quality = QualityPreset::High;
        settings.save();
        assert_eq!(Settings::load().quality, QualityPreset::High);
    }
}
