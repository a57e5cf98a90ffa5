//! Match state and core simulation types
//!
//! Everything the engine mutates per tick lives here.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::settings::{ControlMode, GameConfig};

/// Current phase of the match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, no bird
    Menu,
    /// Active gameplay
    Playing,
    /// Frozen mid-match
    Paused,
    /// Bird crashed
    GameOver,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Menu => "Menu",
            GamePhase::Playing => "Playing",
            GamePhase::Paused => "Paused",
            GamePhase::GameOver => "GameOver",
        }
    }
}

/// The player's bird. Its x is fixed by `GameConfig::bird_x`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bird {
    /// Center y in pixels (0 = top)
    pub position_y: f32,
    /// Pixels per tick, positive = falling
    pub velocity_y: f32,
    /// Visual tilt in degrees
    pub angle: f32,
    pub alive: bool,
}

impl Bird {
    /// Bird at rest in the vertical middle of the screen
    pub fn spawn(config: &GameConfig) -> Self {
        Self {
            position_y: (config.screen_height / 2.0).floor(),
            velocity_y: 0.0,
            angle: 0.0,
            alive: true,
        }
    }

    /// Collision box
    pub fn rect(&self, config: &GameConfig) -> Rect {
        let half = config.bird_size / 2.0;
        Rect::new(
            config.bird_x - half,
            self.position_y - half,
            config.bird_size,
            config.bird_size,
        )
    }

    #[inline]
    pub fn top(&self, config: &GameConfig) -> f32 {
        self.position_y - config.bird_size / 2.0
    }

    #[inline]
    pub fn bottom(&self, config: &GameConfig) -> f32 {
        self.position_y + config.bird_size / 2.0
    }
}

/// A pipe pair with a gap to fly through
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    /// Left edge in pixels
    pub x: f32,
    pub gap_center_y: f32,
    pub gap_size: u32,
    /// Already counted toward the score
    pub scored: bool,
}

impl Obstacle {
    /// Right edge
    #[inline]
    pub fn trailing_edge(&self, config: &GameConfig) -> f32 {
        self.x + config.pipe_width
    }

    /// Pipe hanging from the ceiling
    pub fn upper_rect(&self, config: &GameConfig) -> Rect {
        let height = self.gap_center_y - (self.gap_size / 2) as f32;
        Rect::new(self.x, 0.0, config.pipe_width, height)
    }

    /// Pipe standing on the floor
    pub fn lower_rect(&self, config: &GameConfig) -> Rect {
        let top = self.gap_center_y + (self.gap_size / 2) as f32;
        Rect::new(self.x, top, config.pipe_width, config.floor_y() - top)
    }
}

/// Per-match and lifetime counters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchStats {
    /// Matches started this session
    pub total_games: u32,
    /// Flaps applied by the engine this session
    pub total_jumps: u64,
    /// Pixels scrolled in the current match
    pub distance_traveled: f32,
    /// Ticks survived in the current match
    pub ticks_alive: u64,
}

/// Complete match state (deterministic given seed and inputs)
#[derive(Debug, Clone)]
pub struct MatchState {
    pub config: GameConfig,
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    /// How commands move the bird
    pub control_mode: ControlMode,
    pub score: u64,
    /// Best score this session; survives restarts
    pub high_score: u64,
    /// `None` only in `Menu`
    pub bird: Option<Bird>,
    /// Ordered by spawn
    pub obstacles: Vec<Obstacle>,
    /// Ticks since the last spawn
    pub spawn_timer: u32,
    /// Ticks in the current match
    pub time_ticks: u64,
    pub stats: MatchStats,
    next_id: u32,
}

impl MatchState {
    /// Fresh state on the menu screen
    pub fn new(config: GameConfig, control_mode: ControlMode, seed: u64) -> Self {
        Self {
            config,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Menu,
            control_mode,
            score: 0,
            high_score: 0,
            bird: None,
            obstacles: Vec::new(),
            spawn_timer: 0,
            time_ticks: 0,
            stats: MatchStats::default(),
            next_id: 1,
        }
    }

    /// Carry a high score over from an earlier session
    pub fn with_high_score(mut self, high_score: u64) -> Self {
        self.high_score = high_score;
        self
    }

    /// Allocate a new obstacle ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// New bird, no obstacles, score zeroed. High score is kept.
    fn reset_match(&mut self) {
        self.bird = Some(Bird::spawn(&self.config));
        self.obstacles.clear();
        self.spawn_timer = 0;
        self.time_ticks = 0;
        self.score = 0;
        self.stats.distance_traveled = 0.0;
        self.stats.ticks_alive = 0;
    }

    /// Menu → Playing
    pub fn start_match(&mut self) {
        self.reset_match();
        self.phase = GamePhase::Playing;
        self.stats.total_games += 1;
        log::info!(
            "Match {} started ({} mode)",
            self.stats.total_games,
            self.control_mode.as_str()
        );
    }

    /// GameOver (or any phase) → Playing with a fresh bird
    pub fn restart(&mut self) {
        self.start_match();
    }

    /// Playing → Paused
    pub fn pause(&mut self) {
        if self.phase == GamePhase::Playing {
            self.phase = GamePhase::Paused;
            log::info!("Paused at score {}", self.score);
        }
    }

    /// Paused → Playing
    pub fn resume(&mut self) {
        if self.phase == GamePhase::Paused {
            self.phase = GamePhase::Playing;
            log::info!("Resumed");
        }
    }

    /// Pause if playing, resume if paused
    pub fn toggle_pause(&mut self) {
        match self.phase {
            GamePhase::Playing => self.pause(),
            GamePhase::Paused => self.resume(),
            _ => {}
        }
    }

    pub fn set_control_mode(&mut self, mode: ControlMode) {
        self.control_mode = mode;
    }

    /// Playing → GameOver
    pub fn game_over(&mut self) {
        self.phase = GamePhase::GameOver;
        if let Some(bird) = self.bird.as_mut() {
            bird.alive = false;
        }
        if self.score > self.high_score {
            self.high_score = self.score;
            log::info!("New high score: {}", self.high_score);
        }
        log::info!(
            "Game over: score {} after {} ticks",
            self.score,
            self.stats.ticks_alive
        );
    }

    /// Seconds survived at the nominal tick rate
    pub fn time_alive_secs(&self) -> f32 {
        self.stats.ticks_alive as f32 / self.config.target_fps as f32
    }

    /// True when the bird exists exactly when it should
    pub fn bird_invariant_holds(&self) -> bool {
        match self.phase {
            GamePhase::Menu => self.bird.is_none(),
            _ => self.bird.is_some(),
        }
    }
}
