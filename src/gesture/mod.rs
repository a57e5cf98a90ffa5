//! Gesture mapping: hand readings in, one control command per tick out
//!
//! The mapper runs in exactly one mode at a time. Mode state lives in a
//! tagged union so switching modes always starts from a clean slate.

pub mod continuous;
pub mod discrete;
pub mod history;

pub use continuous::ContinuousState;
pub use discrete::DiscreteState;
pub use history::GestureHistory;

use serde::{Deserialize, Serialize};

use crate::settings::{ControlMode, GestureConfig};
use crate::tracking::HandReading;

/// Neutral normalized height (field center)
pub const NEUTRAL_Y: f32 = 0.5;

/// Hand status reported alongside each command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HandState {
    #[default]
    NotDetected,
    Open,
    Closed,
    /// Continuous mode, hand visible
    Tracking,
    /// Continuous mode, hand gone; output frozen
    Lost,
}

impl HandState {
    pub fn as_str(&self) -> &'static str {
        match self {
            HandState::NotDetected => "not_detected",
            HandState::Open => "open",
            HandState::Closed => "closed",
            HandState::Tracking => "tracking",
            HandState::Lost => "lost",
        }
    }
}

/// Control command for one tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GestureCommand {
    /// Flap this tick (discrete mode)
    pub should_jump: bool,
    /// Normalized height, 0 = top, 1 = bottom (continuous mode)
    pub target_y: f32,
    /// A hand was detected this tick
    pub is_valid: bool,
    /// Smoothed hand height, for display
    pub smoothed_y: f32,
    pub hand_state: HandState,
}

impl Default for GestureCommand {
    fn default() -> Self {
        Self {
            should_jump: false,
            target_y: NEUTRAL_Y,
            is_valid: false,
            smoothed_y: NEUTRAL_Y,
            hand_state: HandState::NotDetected,
        }
    }
}

/// Per-mode persistent state
#[derive(Debug, Clone, PartialEq)]
pub enum MapperState {
    Discrete(DiscreteState),
    Continuous(ContinuousState),
}

impl MapperState {
    pub fn fresh(mode: ControlMode) -> Self {
        match mode {
            ControlMode::Discrete => MapperState::Discrete(DiscreteState::default()),
            ControlMode::Continuous => MapperState::Continuous(ContinuousState::default()),
        }
    }

    pub fn mode(&self) -> ControlMode {
        match self {
            MapperState::Discrete(_) => ControlMode::Discrete,
            MapperState::Continuous(_) => ControlMode::Continuous,
        }
    }
}

/// Lifetime counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapperStats {
    pub mode: ControlMode,
    pub total_jumps: u64,
    pub total_commands: u64,
}

/// Turns hand readings into commands
#[derive(Debug, Clone)]
pub struct GestureMapper {
    config: GestureConfig,
    state: MapperState,
    total_jumps: u64,
    total_commands: u64,
}

impl GestureMapper {
    pub fn new(config: GestureConfig) -> Self {
        let state = MapperState::fresh(config.control_mode);
        Self {
            config,
            state,
            total_jumps: 0,
            total_commands: 0,
        }
    }

    /// Map one reading to a command
    pub fn process(&mut self, reading: &HandReading) -> GestureCommand {
        let command = match &mut self.state {
            MapperState::Discrete(state) => {
                let command = state.process(reading, self.config.debounce_threshold);
                if command.should_jump {
                    self.total_jumps += 1;
                    log::debug!("Flap #{}", self.total_jumps);
                }
                command
            }
            MapperState::Continuous(state) => state.process(reading, &self.config),
        };
        self.total_commands += 1;
        log::trace!(
            "command {} target={:.3} jump={}",
            command.hand_state.as_str(),
            command.target_y,
            command.should_jump
        );
        command
    }

    /// Switch modes; all mode state is discarded
    pub fn set_control_mode(&mut self, mode: ControlMode) {
        self.config.control_mode = mode;
        self.reset();
        log::info!("Gesture mode set to {}", mode.as_str());
    }

    /// Back to initial state in the current mode. Lifetime counters survive.
    pub fn reset(&mut self) {
        self.state = MapperState::fresh(self.config.control_mode);
    }

    pub fn mode(&self) -> ControlMode {
        self.state.mode()
    }

    pub fn state(&self) -> &MapperState {
        &self.state
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn stats(&self) -> MapperStats {
        MapperStats {
            mode: self.mode(),
            total_jumps: self.total_jumps,
            total_commands: self.total_commands,
        }
    }
}
