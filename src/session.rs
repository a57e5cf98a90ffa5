//! Per-tick control loop
//!
//! Pulls one observation, runs tracker → gesture mapper → simulation, and
//! hands a read-only `Frame` to whoever draws it. Camera, window and audio
//! code plug in through `ObservationSource`, `FrameSink` and `Control`.

use serde::Serialize;

use crate::Result;
use crate::gesture::{GestureCommand, GestureHistory, GestureMapper, MapperStats};
use crate::highscores::HighScores;
use crate::settings::{ControlMode, Settings};
use crate::sim::{Bird, GameEvent, GamePhase, MatchState, MatchStats, Obstacle, TickInput, tick};
use crate::tracking::{HandReading, HandTracker, Observation};

/// Supplies one observation per tick; `None` ends the session
pub trait ObservationSource {
    fn next_observation(&mut self) -> Option<Observation>;
}

/// Any iterator of observations is a source (recordings, scripts)
impl<I: Iterator<Item = Observation>> ObservationSource for I {
    fn next_observation(&mut self) -> Option<Observation> {
        self.next()
    }
}

/// Receives the snapshot of every tick
pub trait FrameSink {
    fn present(&mut self, frame: &Frame);
}

impl<F: FnMut(&Frame)> FrameSink for F {
    fn present(&mut self, frame: &Frame) {
        self(frame)
    }
}

/// Discrete requests from the input collaborator (keyboard, buttons)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    StartMatch,
    TogglePause,
    Restart,
    ToggleMode,
    SetMode(ControlMode),
}

/// Read-only snapshot of one tick
#[derive(Debug, Clone, Serialize)]
pub struct Frame {
    pub tick: u64,
    pub phase: GamePhase,
    pub control_mode: ControlMode,
    pub score: u64,
    pub high_score: u64,
    pub bird: Option<Bird>,
    pub obstacles: Vec<Obstacle>,
    pub command: GestureCommand,
    pub hand: HandReading,
    pub events: Vec<GameEvent>,
}

/// Owns every component and sequences one tick at a time
#[derive(Debug, Clone)]
pub struct Session {
    tracker: HandTracker,
    mapper: GestureMapper,
    game: MatchState,
    history: GestureHistory,
    high_scores: HighScores,
    ticks: u64,
}

impl Session {
    /// Build a session from validated settings
    pub fn new(settings: Settings, seed: u64) -> Result<Self> {
        settings.validate()?;
        let mode = settings.gesture.control_mode;
        Ok(Self {
            tracker: HandTracker::new(settings.tracking),
            mapper: GestureMapper::new(settings.gesture),
            game: MatchState::new(settings.game, mode, seed),
            history: GestureHistory::new(),
            high_scores: HighScores::new(),
            ticks: 0,
        })
    }

    /// Seed the session with an existing leaderboard
    pub fn with_high_scores(mut self, high_scores: HighScores) -> Self {
        self.game.high_score = self.game.high_score.max(high_scores.top_score());
        self.high_scores = high_scores;
        self
    }

    /// Run one tick for one observation
    pub fn step(&mut self, observation: &Observation) -> Frame {
        self.ticks += 1;

        let hand = self.tracker.process(observation);
        let command = self.mapper.process(&hand);
        self.history.record(&command);

        let mut events = Vec::new();
        match self.game.phase {
            GamePhase::Menu => {
                if hand.is_open() {
                    self.game.start_match();
                }
            }
            GamePhase::GameOver => {
                if command.should_jump || hand.is_open() {
                    self.restart();
                }
            }
            GamePhase::Playing => {
                events = tick(&mut self.game, &TickInput::from(&command));
                if self.game.phase == GamePhase::GameOver {
                    self.record_result();
                }
            }
            GamePhase::Paused => {}
        }

        self.frame(command, hand, events)
    }

    /// Drain `source`, presenting every frame. Returns ticks processed.
    pub fn run<S, K>(&mut self, source: &mut S, sink: &mut K) -> u64
    where
        S: ObservationSource + ?Sized,
        K: FrameSink + ?Sized,
    {
        let mut processed = 0;
        while let Some(observation) = source.next_observation() {
            let frame = self.step(&observation);
            sink.present(&frame);
            processed += 1;
        }
        log::info!(
            "Session ended after {} ticks, high score {}",
            processed,
            self.game.high_score
        );
        processed
    }

    /// Apply an input request between ticks
    pub fn apply(&mut self, control: Control) {
        match control {
            Control::StartMatch => self.start_match(),
            Control::TogglePause => self.game.toggle_pause(),
            Control::Restart => self.restart(),
            Control::ToggleMode => self.set_control_mode(self.mapper.mode().toggled()),
            Control::SetMode(mode) => self.set_control_mode(mode),
        }
    }

    pub fn start_match(&mut self) {
        if self.game.phase == GamePhase::Menu {
            self.game.start_match();
        }
    }

    pub fn pause(&mut self) {
        self.game.pause();
    }

    pub fn resume(&mut self) {
        self.game.resume();
    }

    /// Fresh match; the sensor window starts over too
    pub fn restart(&mut self) {
        self.tracker.reset();
        self.game.restart();
    }

    /// Switch both the gesture mapper (full reset) and the engine
    pub fn set_control_mode(&mut self, mode: ControlMode) {
        self.mapper.set_control_mode(mode);
        self.game.set_control_mode(mode);
    }

    fn record_result(&mut self) {
        let score = self.game.score;
        let ticks = self.game.stats.ticks_alive;
        if let Some(rank) = self.high_scores.add_score(score, ticks, self.game.control_mode) {
            log::info!(
                "Score {} placed #{} on the leaderboard ({:.1}s alive)",
                score,
                rank,
                self.game.time_alive_secs()
            );
        }
    }

    fn frame(&self, command: GestureCommand, hand: HandReading, events: Vec<GameEvent>) -> Frame {
        Frame {
            tick: self.ticks,
            phase: self.game.phase,
            control_mode: self.game.control_mode,
            score: self.game.score,
            high_score: self.game.high_score,
            bird: self.game.bird,
            obstacles: self.game.obstacles.clone(),
            command,
            hand,
            events,
        }
    }

    pub fn game(&self) -> &MatchState {
        &self.game
    }

    pub fn match_stats(&self) -> &MatchStats {
        &self.game.stats
    }

    pub fn gesture_stats(&self) -> MapperStats {
        self.mapper.stats()
    }

    pub fn history(&self) -> &GestureHistory {
        &self.history
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }

    pub fn control_mode(&self) -> ControlMode {
        self.mapper.mode()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracking::Landmarks;
    use glam::Vec2;

    fn open_at(y: f32) -> Observation {
        Observation::from_landmarks(Landmarks::open_hand(Vec2::new(0.4, y)), 0.9)
    }

    fn closed_at(y: f32) -> Observation {
        Observation::from_landmarks(Landmarks::closed_hand(Vec2::new(0.4, y)), 0.9)
    }

    fn session() -> Session {
        Session::new(Settings::default(), 42).unwrap()
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let mut settings = Settings::default();
        settings.gesture.debounce_threshold = 0;
        assert!(Session::new(settings, 1).is_err());
    }

    #[test]
    fn test_open_hand_starts_match() {
        let mut session = session();
        let frame = session.step(&closed_at(0.5));
        assert_eq!(frame.phase, GamePhase::Menu);
        assert!(frame.bird.is_none());

        let frame = session.step(&open_at(0.5));
        assert_eq!(frame.phase, GamePhase::Playing);
        assert!(frame.bird.is_some());
        // The start tick does not advance the simulation
        assert_eq!(session.game().time_ticks, 0);
    }

    #[test]
    fn test_missing_hand_does_not_start() {
        let mut session = session();
        let frame = session.step(&Observation::missing(Vec2::splat(0.5)));
        assert_eq!(frame.phase, GamePhase::Menu);
        assert_eq!(frame.command.hand_state, crate::gesture::HandState::NotDetected);
    }

    #[test]
    fn test_flap_reaches_engine() {
        let mut session = session();
        session.apply(Control::StartMatch);
        session.step(&closed_at(0.5));
        let frame = session.step(&open_at(0.5));
        assert!(frame.command.should_jump);
        assert!(frame.events.contains(&GameEvent::Flap));
        assert!(frame.bird.unwrap().velocity_y < 0.0);
    }

    #[test]
    fn test_pause_freezes_simulation() {
        let mut session = session();
        session.start_match();
        session.step(&closed_at(0.5));
        session.pause();
        let before = session.game().bird;
        for _ in 0..10 {
            session.step(&closed_at(0.5));
        }
        assert_eq!(session.game().bird, before);
        session.resume();
        session.step(&closed_at(0.5));
        assert_ne!(session.game().bird, before);
    }

    #[test]
    fn test_crash_records_and_open_hand_restarts() {
        let mut session = session();
        session.start_match();
        let mut ticks = 0;
        while session.game().phase == GamePhase::Playing && ticks < 500 {
            session.step(&closed_at(0.5));
            ticks += 1;
        }
        assert_eq!(session.game().phase, GamePhase::GameOver);

        // Fist keeps the game-over screen
        assert_eq!(session.step(&closed_at(0.5)).phase, GamePhase::GameOver);
        let frame = session.step(&open_at(0.5));
        assert_eq!(frame.phase, GamePhase::Playing);
        assert_eq!(frame.score, 0);
        assert_eq!(session.match_stats().total_games, 2);
        assert!(!session.tracker.last_reading().detected);
    }

    #[test]
    fn test_mode_toggle_resets_mapper() {
        let mut session = session();
        session.step(&closed_at(0.5));
        session.apply(Control::ToggleMode);
        assert_eq!(session.control_mode(), ControlMode::Continuous);
        assert_eq!(session.game().control_mode, ControlMode::Continuous);
        let frame = session.step(&open_at(0.5));
        assert_eq!(frame.command.hand_state, crate::gesture::HandState::Tracking);
        assert!(!frame.command.should_jump);
    }

    #[test]
    fn test_run_drains_source() {
        let mut session = session();
        let script = vec![closed_at(0.5), open_at(0.5), closed_at(0.5), open_at(0.5)];
        let mut phases = Vec::new();
        let mut sink = |frame: &Frame| phases.push(frame.phase);
        let ticks = session.run(&mut script.into_iter(), &mut sink);
        assert_eq!(ticks, 4);
        assert_eq!(
            phases,
            vec![GamePhase::Menu, GamePhase::Playing, GamePhase::Playing, GamePhase::Playing]
        );
        assert_eq!(session.history().len(), 4);
    }

    #[test]
    fn test_leaderboard_seeds_high_score() {
        let mut board = HighScores::new();
        board.add_score(12, 3000, ControlMode::Discrete);
        let session = session().with_high_scores(board);
        assert_eq!(session.game().high_score, 12);
    }
}
