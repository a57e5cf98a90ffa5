//! Continuous mode: hand height drives bird height

use crate::settings::GestureConfig;
use crate::tracking::HandReading;

use super::{GestureCommand, HandState, NEUTRAL_Y};

/// Smoothing state for height tracking
#[derive(Debug, Clone, PartialEq)]
pub struct ContinuousState {
    /// Smoothed normalized target (0 = top, 1 = bottom)
    pub smoothed_target_y: f32,
    /// Last accepted output, center of the dead zone
    pub last_valid_y: f32,
}

impl Default for ContinuousState {
    fn default() -> Self {
        Self {
            smoothed_target_y: NEUTRAL_Y,
            last_valid_y: NEUTRAL_Y,
        }
    }
}

/// Clamp a hand y to the usable band and rescale it to [0, 1]
pub fn normalize_y(hand_y: f32, config: &GestureConfig) -> f32 {
    let (min_y, max_y) = (config.usable_min_y, config.usable_max_y);
    let normalized = (hand_y.clamp(min_y, max_y) - min_y) / (max_y - min_y);
    if config.invert_y {
        1.0 - normalized
    } else {
        normalized
    }
}

/// Snap `value` to `center` when it is closer than `dead_zone`
#[inline]
pub fn apply_dead_zone(value: f32, center: f32, dead_zone: f32) -> f32 {
    if (value - center).abs() < dead_zone {
        center
    } else {
        value
    }
}

impl ContinuousState {
    /// Process one tick. On a lost hand the smoothed value is frozen.
    pub fn process(&mut self, reading: &HandReading, config: &GestureConfig) -> GestureCommand {
        let hand_state = if reading.detected {
            let target = normalize_y(reading.filtered_y(), config);
            let target = apply_dead_zone(target, self.last_valid_y, config.dead_zone);
            self.smoothed_target_y += config.continuous_smoothing * (target - self.smoothed_target_y);
            self.last_valid_y = self.smoothed_target_y;
            HandState::Tracking
        } else {
            HandState::Lost
        };

        GestureCommand {
            should_jump: false,
            target_y: self.smoothed_target_y,
            is_valid: reading.detected,
            smoothed_y: self.smoothed_target_y,
            hand_state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn at(y: f32) -> HandReading {
        HandReading {
            detected: true,
            confidence: 1.0,
            raw_y: y,
            position: Vec2::new(0.5, y),
            ..HandReading::default()
        }
    }

    #[test]
    fn test_normalize_clamps_and_rescales() {
        let config = GestureConfig::default();
        assert_eq!(normalize_y(0.0, &config), 0.0);
        assert_eq!(normalize_y(0.2, &config), 0.0);
        assert!((normalize_y(0.5, &config) - 0.5).abs() < 1e-6);
        assert_eq!(normalize_y(0.8, &config), 1.0);
        assert_eq!(normalize_y(1.0, &config), 1.0);
    }

    #[test]
    fn test_normalize_inverted() {
        let config = GestureConfig {
            invert_y: true,
            ..GestureConfig::default()
        };
        assert_eq!(normalize_y(0.2, &config), 1.0);
        assert_eq!(normalize_y(0.9, &config), 0.0);
    }

    #[test]
    fn test_dead_zone_leaves_output_unchanged() {
        let config = GestureConfig::default();
        let mut state = ContinuousState::default();
        // 0.5 + 0.01 in normalized units is inside the 0.02 dead zone
        let hand_y = 0.2 + 0.51 * 0.6;
        let before = state.smoothed_target_y;
        let command = state.process(&at(hand_y), &config);
        assert_eq!(command.target_y, before);
        assert_eq!(state.smoothed_target_y, before);
    }

    #[test]
    fn test_moves_by_smoothing_factor() {
        let config = GestureConfig::default();
        let mut state = ContinuousState::default();
        let command = state.process(&at(0.8), &config);
        assert!((command.target_y - (0.5 + 0.15 * 0.5)).abs() < 1e-6);
        assert_eq!(command.hand_state, HandState::Tracking);
        assert_eq!(state.last_valid_y, command.target_y);
    }

    #[test]
    fn test_converges_to_within_dead_zone() {
        let config = GestureConfig::default();
        let mut state = ContinuousState::default();
        for _ in 0..200 {
            state.process(&at(0.8), &config);
        }
        assert!((1.0 - state.smoothed_target_y) < config.dead_zone);
    }

    #[test]
    fn test_lost_hand_freezes_output() {
        let config = GestureConfig::default();
        let mut state = ContinuousState::default();
        for _ in 0..10 {
            state.process(&at(0.3), &config);
        }
        let frozen = state.smoothed_target_y;
        for _ in 0..100 {
            let command = state.process(&HandReading::default(), &config);
            assert_eq!(command.hand_state, HandState::Lost);
            assert!(!command.is_valid);
            assert_eq!(command.target_y, frozen);
        }
    }
}
