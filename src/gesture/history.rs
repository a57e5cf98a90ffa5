//! Rolling log of recent commands for debug overlays

use std::collections::VecDeque;

use super::{GestureCommand, HandState};

/// Commands kept in the log
pub const MAX_HISTORY: usize = 100;

/// Compact record of one command
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CommandRecord {
    pub should_jump: bool,
    pub target_y: f32,
    pub hand_state: HandState,
    pub is_valid: bool,
}

impl From<&GestureCommand> for CommandRecord {
    fn from(command: &GestureCommand) -> Self {
        Self {
            should_jump: command.should_jump,
            target_y: command.target_y,
            hand_state: command.hand_state,
            is_valid: command.is_valid,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct GestureHistory {
    records: VecDeque<CommandRecord>,
}

impl GestureHistory {
    pub fn new() -> Self {
        Self {
            records: VecDeque::with_capacity(MAX_HISTORY),
        }
    }

    pub fn record(&mut self, command: &GestureCommand) {
        if self.records.len() == MAX_HISTORY {
            self.records.pop_front();
        }
        self.records.push_back(command.into());
    }

    /// Fraction of logged commands that flapped
    pub fn jump_rate(&self) -> f32 {
        if self.records.is_empty() {
            return 0.0;
        }
        let jumps = self.records.iter().filter(|r| r.should_jump).count();
        jumps as f32 / self.records.len() as f32
    }

    /// Fraction of logged commands with a visible hand
    pub fn detection_rate(&self) -> f32 {
        if self.records.is_empty() {
            return 0.0;
        }
        let valid = self.records.iter().filter(|r| r.is_valid).count();
        valid as f32 / self.records.len() as f32
    }

    pub fn latest(&self) -> Option<&CommandRecord> {
        self.records.back()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
