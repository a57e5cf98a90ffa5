//! Confidence-weighted moving average over the last N hand positions

use std::collections::VecDeque;

use glam::Vec2;

/// Bounded history of positions and their detection confidence
#[derive(Debug, Clone)]
pub struct SensorFilter {
    capacity: usize,
    positions: VecDeque<Vec2>,
    confidences: VecDeque<f32>,
}

impl SensorFilter {
    /// `capacity` must be non-zero (checked by `Settings::validate`)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            positions: VecDeque::with_capacity(capacity),
            confidences: VecDeque::with_capacity(capacity),
        }
    }

    /// Push a sample (evicting the oldest when full) and return the smoothed position
    pub fn update(&mut self, position: Vec2, confidence: f32) -> Vec2 {
        if self.positions.len() == self.capacity {
            self.positions.pop_front();
            self.confidences.pop_front();
        }
        self.positions.push_back(position);
        self.confidences.push_back(confidence);
        self.smoothed()
    }

    /// Current smoothed position, or `None` with an empty history
    pub fn value(&self) -> Option<Vec2> {
        if self.positions.is_empty() {
            None
        } else {
            Some(self.smoothed())
        }
    }

    fn smoothed(&self) -> Vec2 {
        let total: f32 = self.confidences.iter().sum();
        if total > 0.0 {
            self.positions
                .iter()
                .zip(&self.confidences)
                .fold(Vec2::ZERO, |acc, (p, c)| acc + *p * *c)
                / total
        } else {
            // All weights zero: plain mean
            self.positions.iter().copied().sum::<Vec2>() / self.positions.len() as f32
        }
    }

    /// Drop all history
    pub fn reset(&mut self) {
        self.positions.clear();
        self.confidences.clear();
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_single_sample_passes_through() {
        let mut filter = SensorFilter::new(5);
        let out = filter.update(Vec2::new(0.3, 0.7), 0.9);
        assert!((out - Vec2::new(0.3, 0.7)).length() < 1e-6);
    }

    #[test]
    fn test_weighted_by_confidence() {
        let mut filter = SensorFilter::new(5);
        filter.update(Vec2::new(0.0, 0.0), 1.0);
        let out = filter.update(Vec2::new(1.0, 1.0), 3.0);
        assert!((out.x - 0.75).abs() < 1e-6);
        assert!((out.y - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_zero_confidence_falls_back_to_mean() {
        let mut filter = SensorFilter::new(3);
        filter.update(Vec2::new(0.2, 0.4), 0.0);
        let out = filter.update(Vec2::new(0.4, 0.8), 0.0);
        assert!((out - Vec2::new(0.3, 0.6)).length() < 1e-6);
    }

    #[test]
    fn test_oldest_sample_evicted() {
        let mut filter = SensorFilter::new(2);
        filter.update(Vec2::new(1.0, 1.0), 1.0);
        filter.update(Vec2::new(0.0, 0.0), 1.0);
        let out = filter.update(Vec2::new(0.0, 0.0), 1.0);
        assert_eq!(filter.len(), 2);
        assert!(out.length() < 1e-6);
    }

    #[test]
    fn test_reset_forgets_history() {
        let mut filter = SensorFilter::new(5);
        for _ in 0..5 {
            filter.update(Vec2::new(0.9, 0.9), 1.0);
        }
        filter.reset();
        assert!(filter.is_empty());
        assert_eq!(filter.value(), None);
        let out = filter.update(Vec2::new(0.1, 0.2), 0.5);
        assert!((out - Vec2::new(0.1, 0.2)).length() < 1e-6);
    }

    proptest! {
        #[test]
        fn equal_confidence_is_plain_mean(
            ys in proptest::collection::vec(0.0f32..1.0, 1..12),
            conf in 0.05f32..1.0,
        ) {
            let mut filter = SensorFilter::new(5);
            let mut out = Vec2::ZERO;
            for y in &ys {
                out = filter.update(Vec2::new(0.5, *y), conf);
            }
            let window = &ys[ys.len().saturating_sub(5)..];
            let mean = window.iter().sum::<f32>() / window.len() as f32;
            prop_assert!((out.y - mean).abs() < 1e-4);
        }
    }
}
