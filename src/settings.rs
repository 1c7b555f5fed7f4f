//! Game tuning and preferences
//!
//! Persisted as JSON in the same key-value store as the best score.

use serde::{Deserialize, Serialize};

use crate::persistence::KeyValueStore;

/// Tuning values for one game session
///
/// All physics values are per tick (one display refresh), matching the
/// frame-locked feel of the game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Entity ===
    /// Downward acceleration added to the velocity every tick
    pub gravity: f32,
    /// Velocity set by a jump (negative = upward)
    pub jump_force: f32,
    /// Fixed horizontal position of the entity
    pub entity_x: f32,
    /// Entity width and height (it is a square)
    pub entity_size: f32,

    // === Obstacles ===
    /// Horizontal distance between consecutive obstacle spawns
    pub obstacle_spacing: f32,
    /// Vertical opening of each obstacle
    pub gap_height: f32,
    /// Leftward scroll per tick
    pub obstacle_speed: f32,
    /// Obstacle bar width
    pub obstacle_width: f32,
    /// Minimum distance between a gap and the top/bottom of the field
    pub spawn_margin: f32,

    // === Countdown ===
    /// First number shown by the countdown
    pub countdown_from: u32,
    /// Time between countdown decrements (ms)
    pub countdown_step_ms: f64,
    /// Fade-out delay between the countdown and the first tick (ms)
    pub fade_delay_ms: f64,

    /// Fixed RNG seed; a time-based seed is used when absent
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            gravity: 0.1,
            jump_force: -4.0,
            entity_x: 50.0,
            entity_size: 20.0,

            obstacle_spacing: 300.0,
            gap_height: 250.0,
            obstacle_speed: 1.0,
            obstacle_width: 30.0,
            spawn_margin: 50.0,

            countdown_from: 3,
            countdown_step_ms: 1000.0,
            fade_delay_ms: 500.0,

            seed: None,
        }
    }
}

impl Settings {
    /// Storage key for the settings JSON
    pub const STORAGE_KEY: &'static str = "gate_flap_settings";

    /// Replace values that would break the simulation with their defaults
    ///
    /// Spacing and width must be positive or `maybe_spawn` stops being
    /// idempotent and obstacles never retire.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        fn positive(value: f32, fallback: f32) -> f32 {
            if value.is_finite() && value > 0.0 {
                value
            } else {
                fallback
            }
        }

        if !self.gravity.is_finite() {
            self.gravity = defaults.gravity;
        }
        if !self.jump_force.is_finite() {
            self.jump_force = defaults.jump_force;
        }
        if !self.entity_x.is_finite() {
            self.entity_x = defaults.entity_x;
        }
        self.entity_size = positive(self.entity_size, defaults.entity_size);
        self.obstacle_spacing = positive(self.obstacle_spacing, defaults.obstacle_spacing);
        self.gap_height = positive(self.gap_height, defaults.gap_height);
        self.obstacle_speed = positive(self.obstacle_speed, defaults.obstacle_speed);
        self.obstacle_width = positive(self.obstacle_width, defaults.obstacle_width);
        if !(self.spawn_margin.is_finite() && self.spawn_margin >= 0.0) {
            self.spawn_margin = defaults.spawn_margin;
        }
        if !(self.countdown_step_ms.is_finite() && self.countdown_step_ms > 0.0) {
            self.countdown_step_ms = defaults.countdown_step_ms;
        }
        if !(self.fade_delay_ms.is_finite() && self.fade_delay_ms >= 0.0) {
            self.fade_delay_ms = defaults.fade_delay_ms;
        }
        self
    }

    /// Parse settings JSON; missing fields take their default
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Settings>(json).map(Settings::sanitized)
    }

    /// Load settings from a store, falling back to defaults
    pub fn load(store: &impl KeyValueStore) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Ok(Some(json)) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from storage");
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring invalid settings: {}", e);
                    Self::default()
                }
            },
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Settings unavailable, using defaults: {}", e);
                Self::default()
            }
        }
    }

    /// Save settings to a store (failures are logged, not returned)
    pub fn save(&self, store: &mut impl KeyValueStore) {
        match serde_json::to_string(self) {
            Ok(json) => match store.set(Self::STORAGE_KEY, &json) {
                Ok(()) => log::info!("Settings saved"),
                Err(e) => log::warn!("Failed to save settings: {}", e),
            },
            Err(e) => log::warn!("Failed to encode settings: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{"gravity": 0.25}"#).unwrap();
        assert_eq!(settings.gravity, 0.25);
        assert_eq!(settings.gap_height, 250.0);
        assert_eq!(settings.countdown_from, 3);
    }

    #[test]
    fn test_sanitize_rejects_zero_spacing() {
        let settings = Settings {
            obstacle_spacing: 0.0,
            obstacle_width: -5.0,
            gravity: f32::NAN,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(settings.obstacle_spacing, 300.0);
        assert_eq!(settings.obstacle_width, 30.0);
        assert_eq!(settings.gravity, 0.1);
    }

    #[test]
    fn test_load_invalid_json_falls_back() {
        let mut store = MemoryStore::new();
        store.set(Settings::STORAGE_KEY, "not json").unwrap();
        assert_eq!(Settings::load(&store), Settings::default());
    }

    #[test]
    fn test_load_read_failure_falls_back() {
        let mut store = MemoryStore::unavailable();
        assert_eq!(Settings::load(&store), Settings::default());
        // Saving into a dead store is logged, not raised
        Settings::default().save(&mut store);
    }

    #[test]
    fn test_save_then_load() {
        let mut store = MemoryStore::new();
        let settings = Settings {
            seed: Some(7),
            jump_force: -5.0,
            ..Default::default()
        };
        settings.save(&mut store);
        assert_eq!(Settings::load(&store), settings);
    }
}
