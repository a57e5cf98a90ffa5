//! Game settings and tuning
//!
//! Everything a component needs is handed to it at construction. Settings are
//! loaded from JSON and validated once, before any tick runs.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// How gestures drive the bird
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ControlMode {
    /// Closed→open hand transition makes the bird flap
    #[default]
    Discrete,
    /// Hand height sets the bird height directly
    Continuous,
}

impl ControlMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlMode::Discrete => "Discrete",
            ControlMode::Continuous => "Continuous",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "discrete" | "flap" => Some(ControlMode::Discrete),
            "continuous" | "height" => Some(ControlMode::Continuous),
            _ => None,
        }
    }

    /// The other mode
    pub fn toggled(&self) -> Self {
        match self {
            ControlMode::Discrete => ControlMode::Continuous,
            ControlMode::Continuous => ControlMode::Discrete,
        }
    }
}

/// Simulation engine tuning (pixels, pixels/tick)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Field ===
    pub screen_width: f32,
    pub screen_height: f32,
    /// Height of the floor strip at the bottom of the field
    pub ground_height: f32,

    // === Physics ===
    pub gravity: f32,
    /// Velocity set on a flap (negative = up)
    pub jump_strength: f32,
    pub max_fall_speed: f32,

    // === Bird ===
    /// Fixed horizontal position of the bird center
    pub bird_x: f32,
    pub bird_size: f32,
    /// Easing factor toward the commanded height in continuous mode
    pub bird_follow_smoothing: f32,

    // === Obstacles ===
    pub pipe_width: f32,
    pub pipe_gap: u32,
    pub pipe_speed: f32,
    /// Ticks between spawns
    pub pipe_spawn_interval: u32,
    /// Minimum pipe length kept at the top and above the floor
    pub pipe_margin: u32,

    /// Nominal tick rate, used only for time-based stats
    pub target_fps: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            screen_width: 400.0,
            screen_height: 600.0,
            ground_height: 50.0,

            gravity: 0.5,
            jump_strength: -10.0,
            max_fall_speed: 8.0,

            bird_x: 80.0,
            bird_size: 30.0,
            bird_follow_smoothing: 0.15,

            pipe_width: 50.0,
            pipe_gap: 180,
            pipe_speed: 2.0,
            pipe_spawn_interval: 150,
            pipe_margin: 50,

            target_fps: 60,
        }
    }
}

impl GameConfig {
    /// Y coordinate of the floor surface
    #[inline]
    pub fn floor_y(&self) -> f32 {
        self.screen_height - self.ground_height
    }
}

/// Hand tracking tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    /// Moving-average window (observations)
    pub smoothing_window_size: usize,
    /// Required tip-above-joint margin for a finger to count as extended
    pub hand_open_threshold: f32,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            smoothing_window_size: 5,
            hand_open_threshold: 0.05,
        }
    }
}

/// Gesture mapping tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    pub control_mode: ControlMode,
    /// Consecutive open ticks needed to accept a closed→open transition
    pub debounce_threshold: u32,
    /// Exponential smoothing factor for continuous mode (0-1]
    pub continuous_smoothing: f32,
    pub dead_zone: f32,
    /// Usable band of the sensing field; detections outside are clamped
    pub usable_min_y: f32,
    pub usable_max_y: f32,
    pub invert_y: bool,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            control_mode: ControlMode::Discrete,
            debounce_threshold: 1,
            continuous_smoothing: 0.15,
            dead_zone: 0.02,
            usable_min_y: 0.2,
            usable_max_y: 0.8,
            invert_y: false,
        }
    }
}

/// All settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub game: GameConfig,
    pub tracking: TrackingConfig,
    pub gesture: GestureConfig,
}

impl Settings {
    /// Settings with a different starting control mode
    pub fn with_mode(mut self, mode: ControlMode) -> Self {
        self.gesture.control_mode = mode;
        self
    }

    /// Check every value is usable. Returns the first offending field.
    pub fn validate(&self) -> Result<()> {
        let g = &self.game;
        if g.screen_width <= 0.0 || g.screen_height <= 0.0 {
            return Err(Error::Config(format!(
                "screen must be non-empty, got {}x{}",
                g.screen_width, g.screen_height
            )));
        }
        if g.ground_height < 0.0 || g.ground_height >= g.screen_height {
            return Err(Error::Config(format!(
                "ground_height must be in [0, screen_height), got {}",
                g.ground_height
            )));
        }
        if g.bird_size <= 0.0 || g.bird_size * 2.0 >= g.floor_y() {
            return Err(Error::Config(format!(
                "bird_size must be positive and fit the field twice, got {}",
                g.bird_size
            )));
        }
        if g.max_fall_speed <= 0.0 {
            return Err(Error::Config(format!(
                "max_fall_speed must be > 0, got {}",
                g.max_fall_speed
            )));
        }
        if g.jump_strength >= 0.0 {
            return Err(Error::Config(format!(
                "jump_strength must be negative (upward), got {}",
                g.jump_strength
            )));
        }
        if !(g.bird_follow_smoothing > 0.0 && g.bird_follow_smoothing <= 1.0) {
            return Err(Error::Config(format!(
                "bird_follow_smoothing must be in (0, 1], got {}",
                g.bird_follow_smoothing
            )));
        }
        if g.pipe_width <= 0.0 || g.pipe_speed <= 0.0 {
            return Err(Error::Config(format!(
                "pipe_width and pipe_speed must be > 0, got {} and {}",
                g.pipe_width, g.pipe_speed
            )));
        }
        if g.pipe_spawn_interval == 0 {
            return Err(Error::Config("pipe_spawn_interval must be > 0".to_string()));
        }
        // The gap plus both margins has to fit above the floor
        let min_gap_y = g.pipe_gap / 2 + g.pipe_margin;
        let max_gap_y = g.floor_y() - (g.pipe_gap / 2 + g.pipe_margin) as f32;
        if g.pipe_gap == 0 || (min_gap_y as f32) > max_gap_y {
            return Err(Error::Config(format!(
                "pipe_gap {} with margin {} does not fit a {} px field",
                g.pipe_gap,
                g.pipe_margin,
                g.floor_y()
            )));
        }
        if g.target_fps == 0 {
            return Err(Error::Config("target_fps must be > 0".to_string()));
        }

        let t = &self.tracking;
        if t.smoothing_window_size == 0 {
            return Err(Error::Config("smoothing_window_size must be > 0".to_string()));
        }
        if !(0.0..1.0).contains(&t.hand_open_threshold) {
            return Err(Error::Config(format!(
                "hand_open_threshold must be in [0, 1), got {}",
                t.hand_open_threshold
            )));
        }

        let m = &self.gesture;
        if m.debounce_threshold == 0 {
            return Err(Error::Config("debounce_threshold must be > 0".to_string()));
        }
        if !(m.continuous_smoothing > 0.0 && m.continuous_smoothing <= 1.0) {
            return Err(Error::Config(format!(
                "continuous_smoothing must be in (0, 1], got {}",
                m.continuous_smoothing
            )));
        }
        if !(0.0..1.0).contains(&m.dead_zone) {
            return Err(Error::Config(format!(
                "dead_zone must be in [0, 1), got {}",
                m.dead_zone
            )));
        }
        if !(0.0 <= m.usable_min_y && m.usable_min_y < m.usable_max_y && m.usable_max_y <= 1.0) {
            return Err(Error::Config(format!(
                "usable range must satisfy 0 <= min < max <= 1, got {}..{}",
                m.usable_min_y, m.usable_max_y
            )));
        }
        Ok(())
    }

    /// Parse and validate settings from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
