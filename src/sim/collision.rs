//! Collision detection between the bird, the field bounds and the pipes
//!
//! Everything is axis-aligned. Boxes that only share an edge do not collide.

use serde::{Deserialize, Serialize};

use super::state::{Bird, Obstacle};
use crate::settings::GameConfig;

/// Axis-aligned rectangle, origin at the top-left
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Strict overlap test
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// What the bird hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionKind {
    Ceiling,
    Floor,
    /// Upper pipe of the obstacle with this id
    UpperPipe(u32),
    /// Lower pipe of the obstacle with this id
    LowerPipe(u32),
}

/// First collision in precedence order: ceiling, floor, then pipes by spawn order
pub fn check_collision(
    bird: &Bird,
    obstacles: &[Obstacle],
    config: &GameConfig,
) -> Option<CollisionKind> {
    if bird.top(config) <= 0.0 {
        return Some(CollisionKind::Ceiling);
    }
    if bird.bottom(config) >= config.floor_y() {
        return Some(CollisionKind::Floor);
    }

    let bird_rect = bird.rect(config);
    obstacles.iter().find_map(|obstacle| {
        if bird_rect.overlaps(&obstacle.upper_rect(config)) {
            Some(CollisionKind::UpperPipe(obstacle.id))
        } else if bird_rect.overlaps(&obstacle.lower_rect(config)) {
            Some(CollisionKind::LowerPipe(obstacle.id))
        } else {
            None
        }
    })
}
