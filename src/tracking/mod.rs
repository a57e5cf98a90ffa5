//! Hand tracking: observation smoothing and open/closed classification
//!
//! The landmark detector is external. It hands us one `Observation` per tick;
//! this module turns it into a `HandReading` for the gesture mapper.

pub mod classifier;
pub mod filter;
pub mod landmarks;

pub use classifier::{HandClassification, classify};
pub use filter::SensorFilter;
pub use landmarks::Landmarks;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::settings::TrackingConfig;

/// One sample from the landmark detector.
///
/// The tracker needs landmarks to classify the hand, so an observation with
/// `detected = true` but no landmarks is handled exactly like a lost hand:
/// the smoothing window is cleared and the last filtered position is held.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub detected: bool,
    /// Raw hand center in normalized field coordinates
    pub position: Vec2,
    pub confidence: f32,
    /// Required for a detection to count; `None` reads as lost
    pub landmarks: Option<Landmarks>,
}

impl Observation {
    /// A detected hand, centered on its palm
    pub fn from_landmarks(landmarks: Landmarks, confidence: f32) -> Self {
        Self {
            detected: true,
            position: landmarks.center(),
            confidence,
            landmarks: Some(landmarks),
        }
    }

    /// No hand this tick; `last_position` is carried for continuity
    pub fn missing(last_position: Vec2) -> Self {
        Self {
            detected: false,
            position: last_position,
            confidence: 0.0,
            landmarks: None,
        }
    }
}

/// Filtered and classified view of one observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HandReading {
    pub detected: bool,
    pub confidence: f32,
    /// Unfiltered hand center y
    pub raw_y: f32,
    /// Smoothed hand center
    pub position: Vec2,
    pub classification: HandClassification,
}

impl HandReading {
    #[inline]
    pub fn filtered_y(&self) -> f32 {
        self.position.y
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.detected && self.classification.is_open
    }
}

impl Default for HandReading {
    fn default() -> Self {
        Self {
            detected: false,
            confidence: 0.0,
            raw_y: 0.5,
            position: Vec2::splat(0.5),
            classification: HandClassification::default(),
        }
    }
}

/// Owns the sensor filter and remembers the last good reading
#[derive(Debug, Clone)]
pub struct HandTracker {
    config: TrackingConfig,
    filter: SensorFilter,
    last: HandReading,
    observations: u64,
}

impl HandTracker {
    pub fn new(config: TrackingConfig) -> Self {
        let filter = SensorFilter::new(config.smoothing_window_size);
        Self {
            config,
            filter,
            last: HandReading::default(),
            observations: 0,
        }
    }

    /// Filter and classify one observation
    pub fn process(&mut self, observation: &Observation) -> HandReading {
        self.observations += 1;

        let reading = match (observation.detected, observation.landmarks.as_ref()) {
            (true, Some(landmarks)) => {
                let position = self.filter.update(observation.position, observation.confidence);
                HandReading {
                    detected: true,
                    confidence: observation.confidence,
                    raw_y: observation.position.y,
                    position,
                    classification: classify(landmarks, self.config.hand_open_threshold),
                }
            }
            _ => {
                if !self.filter.is_empty() {
                    log::debug!("Hand lost after {} observations", self.observations);
                }
                // Lost: restart the window, keep the last filtered position
                self.filter.reset();
                HandReading {
                    detected: false,
                    confidence: observation.confidence,
                    raw_y: self.last.raw_y,
                    position: self.last.position,
                    classification: HandClassification::default(),
                }
            }
        };

        log::trace!(
            "hand detected={} y={:.3} open={}",
            reading.detected,
            reading.filtered_y(),
            reading.classification.is_open
        );
        self.last = reading;
        reading
    }

    /// Forget all history (match restart)
    pub fn reset(&mut self) {
        self.filter.reset();
        self.last = HandReading::default();
    }

    pub fn last_reading(&self) -> &HandReading {
        &self.last
    }

    pub fn observation_count(&self) -> u64 {
        self.observations
    }
}
