//! Fixed-step simulation tick
//!
//! One call advances the match by exactly one tick.

use rand::Rng;
use serde::Serialize;

use super::collision::{CollisionKind, check_collision};
use super::state::{Bird, GamePhase, MatchState, Obstacle};
use crate::gesture::GestureCommand;
use crate::settings::{ControlMode, GameConfig};

/// Tilt limits and easing for each control mode
const DISCRETE_TILT: (f32, f32) = (-30.0, 60.0);
const DISCRETE_TILT_EASE: f32 = 0.1;
const CONTINUOUS_TILT: (f32, f32) = (-20.0, 30.0);
const CONTINUOUS_TILT_EASE: f32 = 0.2;

/// Spawned obstacles start just off the right edge
const SPAWN_OFFSET: f32 = 10.0;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickInput {
    /// Flap (discrete mode)
    pub jump: bool,
    /// Normalized target height, 0 = top (continuous mode)
    pub target_y: f32,
}

impl Default for TickInput {
    fn default() -> Self {
        Self {
            jump: false,
            target_y: 0.5,
        }
    }
}

impl From<&GestureCommand> for TickInput {
    fn from(command: &GestureCommand) -> Self {
        Self {
            jump: command.should_jump,
            target_y: command.target_y,
        }
    }
}

/// What happened during a tick, for sound/visual collaborators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GameEvent {
    Flap,
    Spawned(u32),
    Scored(u32),
    Crashed(CollisionKind),
}

/// Advance the match by one tick. Does nothing outside `Playing`.
pub fn tick(state: &mut MatchState, input: &TickInput) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if state.phase != GamePhase::Playing {
        return events;
    }
    let Some(mut bird) = state.bird else {
        return events;
    };

    state.time_ticks += 1;
    state.stats.ticks_alive += 1;
    state.stats.distance_traveled += state.config.pipe_speed;

    match state.control_mode {
        ControlMode::Discrete => {
            if input.jump {
                state.stats.total_jumps += 1;
                events.push(GameEvent::Flap);
            }
            step_discrete(&mut bird, input.jump, &state.config);
        }
        ControlMode::Continuous => step_continuous(&mut bird, input.target_y, &state.config),
    }
    state.bird = Some(bird);

    state.spawn_timer += 1;
    if state.spawn_timer >= state.config.pipe_spawn_interval {
        let id = spawn_obstacle(state);
        state.spawn_timer = 0;
        events.push(GameEvent::Spawned(id));
    }

    advance_obstacles(state, &mut events);

    if let Some(hit) = check_collision(&bird, &state.obstacles, &state.config) {
        log::debug!("Collision: {:?} at y={:.1}", hit, bird.position_y);
        state.game_over();
        events.push(GameEvent::Crashed(hit));
    }

    log::trace!(
        "tick {} y={:.1} v={:.2} score={}",
        state.time_ticks,
        bird.position_y,
        bird.velocity_y,
        state.score
    );
    events
}

/// Flap, fall, integrate, tilt
pub fn step_discrete(bird: &mut Bird, jump: bool, config: &GameConfig) {
    if jump {
        bird.velocity_y = config.jump_strength;
    }
    bird.velocity_y = (bird.velocity_y + config.gravity).min(config.max_fall_speed);
    bird.position_y += bird.velocity_y;

    let target_angle = (-bird.velocity_y * 3.0).clamp(DISCRETE_TILT.0, DISCRETE_TILT.1);
    bird.angle += (target_angle - bird.angle) * DISCRETE_TILT_EASE;
}

/// Ease toward the commanded height
pub fn step_continuous(bird: &mut Bird, target_y: f32, config: &GameConfig) {
    let target = target_pixel_y(target_y, config);
    bird.position_y += (target - bird.position_y) * config.bird_follow_smoothing;

    let apparent_velocity = (target - bird.position_y) * 0.5;
    let target_angle = (-apparent_velocity * 2.0).clamp(CONTINUOUS_TILT.0, CONTINUOUS_TILT.1);
    bird.angle += (target_angle - bird.angle) * CONTINUOUS_TILT_EASE;
}

/// Map a normalized height to the pixel band the bird can occupy
pub fn target_pixel_y(target_y: f32, config: &GameConfig) -> f32 {
    let min_y = config.bird_size;
    let max_y = config.floor_y() - config.bird_size;
    min_y + target_y.clamp(0.0, 1.0) * (max_y - min_y)
}

/// Spawn a pipe pair at the right edge with a random gap. Returns its id.
pub fn spawn_obstacle(state: &mut MatchState) -> u32 {
    let config = &state.config;
    let half_gap = config.pipe_gap / 2;
    let min_gap_y = half_gap + config.pipe_margin;
    let max_gap_y = (config.floor_y() as u32).saturating_sub(half_gap + config.pipe_margin);
    let gap_center = state.rng.random_range(min_gap_y..=max_gap_y.max(min_gap_y));

    let obstacle = Obstacle {
        id: 0,
        x: config.screen_width + SPAWN_OFFSET,
        gap_center_y: gap_center as f32,
        gap_size: config.pipe_gap,
        scored: false,
    };
    let id = state.next_entity_id();
    log::debug!("Spawned obstacle {} with gap at {}", id, gap_center);
    state.obstacles.push(Obstacle { id, ..obstacle });
    id
}

/// Scroll, score and retire obstacles
fn advance_obstacles(state: &mut MatchState, events: &mut Vec<GameEvent>) {
    let config = &state.config;
    for obstacle in state.obstacles.iter_mut() {
        obstacle.x -= config.pipe_speed;
        if !obstacle.scored && obstacle.trailing_edge(config) < config.bird_x {
            obstacle.scored = true;
            state.score += 1;
            events.push(GameEvent::Scored(obstacle.id));
            log::debug!("Passed obstacle {}, score {}", obstacle.id, state.score);
        }
    }
    state
        .obstacles
        .retain(|o| o.x + config.pipe_width >= 0.0);
}
