//! Open/closed hand classification from landmark geometry

use serde::{Deserialize, Serialize};

use super::landmarks::Landmarks;
use crate::consts::THUMB_AXIS_X;

/// Fingers that must be extended for the hand to count as open
pub const OPEN_FINGER_QUORUM: usize = 3;

/// Per-tick classification; never stored across ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HandClassification {
    pub is_open: bool,
    /// Thumb, index, middle, ring, pinky
    pub finger_states: [bool; 5],
}

impl HandClassification {
    pub fn open_count(&self) -> usize {
        self.finger_states.iter().filter(|&&open| open).count()
    }
}

/// Classify a hand.
///
/// The thumb is judged by horizontal splay away from the field's vertical
/// center line; the other fingers by the tip sitting above the mid joint by
/// more than `open_threshold`.
pub fn classify(landmarks: &Landmarks, open_threshold: f32) -> HandClassification {
    let mut finger_states = [false; 5];

    let (thumb_tip, thumb_mid) = landmarks.finger(0);
    finger_states[0] = (thumb_tip.x - THUMB_AXIS_X).abs() > (thumb_mid.x - THUMB_AXIS_X).abs();

    for (finger, state) in finger_states.iter_mut().enumerate().skip(1) {
        let (tip, mid) = landmarks.finger(finger);
        *state = tip.y < mid.y - open_threshold;
    }

    let mut classification = HandClassification {
        is_open: false,
        finger_states,
    };
    classification.is_open = classification.open_count() >= OPEN_FINGER_QUORUM;
    classification
}
