//! Discrete mode: a debounced closed→open transition is a flap

use crate::tracking::HandReading;

use super::{GestureCommand, HandState};

/// Debounce state for flap detection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscreteState {
    /// Last accepted open/closed state; `None` until the first detection
    pub previous_open: Option<bool>,
    /// Consecutive open ticks seen while a closed→open transition is pending
    pub transition_counter: u32,
}

impl DiscreteState {
    /// Process one tick. Returns the command for this tick.
    ///
    /// A pending transition keeps `previous_open` at `Some(false)` until the
    /// open hand has been seen for `debounce_threshold` ticks in a row. Any
    /// other tick, including a dropout, discards the progress. Dropouts leave
    /// `previous_open` alone.
    pub fn process(&mut self, reading: &HandReading, debounce_threshold: u32) -> GestureCommand {
        let mut command = GestureCommand {
            is_valid: reading.detected,
            smoothed_y: reading.filtered_y(),
            ..GestureCommand::default()
        };

        if !reading.detected {
            self.transition_counter = 0;
            command.hand_state = HandState::NotDetected;
            return command;
        }

        let open = reading.classification.is_open;
        command.hand_state = if open { HandState::Open } else { HandState::Closed };

        if open && self.previous_open == Some(false) {
            self.transition_counter += 1;
            if self.transition_counter >= debounce_threshold {
                command.should_jump = true;
                self.transition_counter = 0;
                self.previous_open = Some(true);
            }
        } else {
            self.transition_counter = 0;
            self.previous_open = Some(open);
        }

        command
    }
}
