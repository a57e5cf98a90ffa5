//! Gesture Flap - a side-scrolling flyer steered by an open or closed hand
//!
//! Core modules:
//! - `tracking`: Observation smoothing and open/closed hand classification
//! - `gesture`: Hand readings to per-tick control commands
//! - `sim`: Deterministic simulation (physics, obstacles, collisions)
//! - `session`: Per-tick control loop tying the above together
//! - `settings`: Tunable configuration, loaded from JSON
//! - `highscores`: Persistent leaderboard

pub mod gesture;
pub mod highscores;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tracking;

pub use gesture::{GestureCommand, GestureMapper, HandState};
pub use highscores::HighScores;
pub use session::{Control, Frame, FrameSink, ObservationSource, Session};
pub use settings::{ControlMode, Settings};
pub use tracking::{HandReading, HandTracker, Observation};

/// Fixed constants shared across modules
pub mod consts {
    /// Vertical line in normalized image space the thumb is judged against
    pub const THUMB_AXIS_X: f32 = 0.5;
    /// Seed used when none is supplied
    pub const DEFAULT_SEED: u64 = 0x5EED_F1A9;
}

/// Crate-wide error type
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
