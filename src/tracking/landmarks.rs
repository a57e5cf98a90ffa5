//! 21-point hand landmark layout
//!
//! Coordinates are normalized to the sensing field: x grows to the right,
//! y grows downward (smaller y = higher).

use glam::Vec2;
use serde::{Deserialize, Serialize};

pub const WRIST: usize = 0;
pub const THUMB_CMC: usize = 1;
pub const THUMB_MCP: usize = 2;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_DIP: usize = 7;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_DIP: usize = 15;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_DIP: usize = 19;
pub const PINKY_TIP: usize = 20;

/// Number of points in a hand
pub const LANDMARK_COUNT: usize = 21;

/// Fingertips, thumb first
pub const FINGER_TIPS: [usize; 5] = [THUMB_TIP, INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP];
/// Mid joints paired with `FINGER_TIPS`
pub const FINGER_MIDS: [usize; 5] = [THUMB_MCP, INDEX_PIP, MIDDLE_PIP, RING_PIP, PINKY_PIP];

/// Points averaged to locate the palm
const PALM_POINTS: [usize; 5] = [WRIST, INDEX_MCP, MIDDLE_MCP, RING_MCP, PINKY_MCP];

/// One detected hand
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmarks {
    pub points: [Vec2; LANDMARK_COUNT],
}

impl Default for Landmarks {
    fn default() -> Self {
        Self {
            points: [Vec2::splat(0.5); LANDMARK_COUNT],
        }
    }
}

impl Landmarks {
    pub fn new(points: [Vec2; LANDMARK_COUNT]) -> Self {
        Self { points }
    }

    /// Palm center: mean of the wrist and the four finger knuckles
    pub fn center(&self) -> Vec2 {
        PALM_POINTS.iter().map(|&i| self.points[i]).sum::<Vec2>() / PALM_POINTS.len() as f32
    }

    /// (tip, mid joint) for finger 0 (thumb) through 4 (pinky)
    #[inline]
    pub fn finger(&self, finger: usize) -> (Vec2, Vec2) {
        (self.points[FINGER_TIPS[finger]], self.points[FINGER_MIDS[finger]])
    }

    /// Synthetic upright hand centered on `palm`, used by demos and tests.
    ///
    /// `extended[i]` controls whether finger `i` points up (open) or is
    /// folded down past its mid joint.
    pub fn synthetic(palm: Vec2, extended: [bool; 5]) -> Self {
        let mut points = [palm; LANDMARK_COUNT];
        points[WRIST] = palm + Vec2::new(0.0, 0.08);

        // Thumb sits to the side of the palm, away from the field center
        let side = if palm.x >= 0.5 { 1.0 } else { -1.0 };
        points[THUMB_CMC] = palm + Vec2::new(side * 0.03, 0.04);
        points[THUMB_MCP] = palm + Vec2::new(side * 0.05, 0.02);
        points[THUMB_IP] = palm + Vec2::new(side * 0.06, 0.0);
        points[THUMB_TIP] = if extended[0] {
            palm + Vec2::new(side * 0.09, -0.02)
        } else {
            palm + Vec2::new(side * 0.02, 0.0)
        };

        let columns = [-0.045, -0.015, 0.015, 0.045];
        let bases = [INDEX_MCP, MIDDLE_MCP, RING_MCP, PINKY_MCP];
        for (finger, (&dx, &base)) in columns.iter().zip(&bases).enumerate() {
            points[base] = palm + Vec2::new(dx, -0.02);
            points[base + 1] = palm + Vec2::new(dx, -0.06);
            if extended[finger + 1] {
                points[base + 2] = palm + Vec2::new(dx, -0.10);
                points[base + 3] = palm + Vec2::new(dx, -0.14);
            } else {
                points[base + 2] = palm + Vec2::new(dx, -0.03);
                points[base + 3] = palm + Vec2::new(dx, 0.0);
            }
        }

        // Keep the palm center where it was asked to be
        let shift = palm - Self { points }.center();
        for p in points.iter_mut() {
            *p += shift;
        }
        Self { points }
    }

    /// Fully open synthetic hand
    pub fn open_hand(palm: Vec2) -> Self {
        Self::synthetic(palm, [true; 5])
    }

    /// Fist
    pub fn closed_hand(palm: Vec2) -> Self {
        Self::synthetic(palm, [false; 5])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_is_palm_mean() {
        let mut points = [Vec2::ZERO; LANDMARK_COUNT];
        points[WRIST] = Vec2::new(0.5, 1.0);
        points[INDEX_MCP] = Vec2::new(0.0, 0.0);
        points[MIDDLE_MCP] = Vec2::new(0.5, 0.0);
        points[RING_MCP] = Vec2::new(1.0, 0.0);
        points[PINKY_MCP] = Vec2::new(0.5, 0.5);
        let center = Landmarks::new(points).center();
        assert!((center - Vec2::new(0.5, 0.3)).length() < 1e-6);
    }

    #[test]
    fn test_synthetic_hand_keeps_palm_position() {
        let palm = Vec2::new(0.4, 0.6);
        let hand = Landmarks::open_hand(palm);
        assert!((hand.center() - palm).length() < 1e-5);
    }
}
