//! Gesture Flap entry point
//!
//! Without a camera attached this runs a headless demo: a scripted hand
//! plays the game through the full tracking → gesture → simulation loop.
//!
//! Usage: gesture-flap [--settings PATH] [--scores PATH] [--ticks N] [--seed N] [--mode discrete|continuous]

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::path::PathBuf;

    use glam::Vec2;
    use gesture_flap::consts::DEFAULT_SEED;
    use gesture_flap::session::{Frame, Session};
    use gesture_flap::settings::{ControlMode, GameConfig, GestureConfig, Settings};
    use gesture_flap::sim::GamePhase;
    use gesture_flap::tracking::{Landmarks, Observation};
    use gesture_flap::{Error, HighScores, Result};

    /// Ticks between simulated tracking dropouts
    const DROPOUT_PERIOD: u64 = 240;
    /// Length of each dropout
    const DROPOUT_TICKS: u64 = 3;
    /// Palm x in the camera image
    const PALM_X: f32 = 0.35;

    struct Args {
        settings: Option<PathBuf>,
        scores: Option<PathBuf>,
        ticks: u64,
        seed: u64,
        mode: Option<ControlMode>,
    }

    fn parse_args() -> Result<Args> {
        let mut args = Args {
            settings: None,
            scores: None,
            ticks: 3600,
            seed: DEFAULT_SEED,
            mode: None,
        };
        let mut iter = std::env::args().skip(1);
        while let Some(flag) = iter.next() {
            let mut value = || {
                iter.next()
                    .ok_or_else(|| Error::Config(format!("{} needs a value", flag)))
            };
            match flag.as_str() {
                "--settings" => args.settings = Some(PathBuf::from(value()?)),
                "--scores" => args.scores = Some(PathBuf::from(value()?)),
                "--ticks" => {
                    args.ticks = value()?
                        .parse()
                        .map_err(|e| Error::Config(format!("--ticks: {}", e)))?
                }
                "--seed" => {
                    args.seed = value()?
                        .parse()
                        .map_err(|e| Error::Config(format!("--seed: {}", e)))?
                }
                "--mode" => {
                    let name = value()?;
                    args.mode = Some(
                        ControlMode::from_str(&name)
                            .ok_or_else(|| Error::Config(format!("unknown mode {}", name)))?,
                    )
                }
                other => return Err(Error::Config(format!("unknown argument {}", other))),
            }
        }
        Ok(args)
    }

    /// Scripted player: reads the last frame and poses a hand
    struct Autopilot {
        game: GameConfig,
        gesture: GestureConfig,
        open_ticks_left: u32,
        last_palm: Vec2,
    }

    impl Autopilot {
        fn new(settings: &Settings) -> Self {
            Self {
                game: settings.game.clone(),
                gesture: settings.gesture.clone(),
                open_ticks_left: 0,
                last_palm: Vec2::new(PALM_X, 0.5),
            }
        }

        /// Pixel height the bird should aim for
        fn aim(&self, frame: &Frame) -> f32 {
            frame
                .obstacles
                .iter()
                .find(|o| o.x + self.game.pipe_width >= self.game.bird_x - self.game.bird_size)
                .map(|o| o.gap_center_y)
                .unwrap_or(self.game.floor_y() / 2.0)
        }

        fn observe(&mut self, tick: u64, last: Option<&Frame>) -> Observation {
            if tick % DROPOUT_PERIOD < DROPOUT_TICKS {
                return Observation::missing(self.last_palm);
            }

            let Some(frame) = last else {
                return self.pose(self.last_palm.y, false);
            };

            match frame.phase {
                GamePhase::Menu | GamePhase::GameOver => {
                    self.open_ticks_left = 0;
                    self.pose(self.last_palm.y, tick % 2 == 0)
                }
                GamePhase::Paused => self.pose(self.last_palm.y, false),
                GamePhase::Playing => match frame.control_mode {
                    ControlMode::Discrete => self.flap_toward(frame),
                    ControlMode::Continuous => self.follow(frame),
                },
            }
        }

        /// Open the hand for one debounced flap when sinking below the aim
        fn flap_toward(&mut self, frame: &Frame) -> Observation {
            let aim = self.aim(frame);
            if self.open_ticks_left > 0 {
                self.open_ticks_left -= 1;
                return self.pose(self.last_palm.y, true);
            }
            let sinking = frame
                .bird
                .map(|b| b.position_y > aim + 15.0 && b.velocity_y > 0.0)
                .unwrap_or(false);
            if sinking && !frame.hand.is_open() {
                self.open_ticks_left = self.gesture.debounce_threshold.saturating_sub(1);
                return self.pose(self.last_palm.y, true);
            }
            self.pose(self.last_palm.y, false)
        }

        /// Hold the hand at the height that maps onto the aim
        fn follow(&mut self, frame: &Frame) -> Observation {
            let aim = self.aim(frame);
            let band = self.game.floor_y() - 2.0 * self.game.bird_size;
            let mut t = ((aim - self.game.bird_size) / band).clamp(0.0, 1.0);
            if self.gesture.invert_y {
                t = 1.0 - t;
            }
            let hand_y = self.gesture.usable_min_y
                + t * (self.gesture.usable_max_y - self.gesture.usable_min_y);
            self.pose(hand_y, true)
        }

        fn pose(&mut self, y: f32, open: bool) -> Observation {
            self.last_palm = Vec2::new(PALM_X, y);
            let landmarks = if open {
                Landmarks::open_hand(self.last_palm)
            } else {
                Landmarks::closed_hand(self.last_palm)
            };
            Observation::from_landmarks(landmarks, 0.9)
        }
    }

    pub fn run() -> Result<()> {
        let args = parse_args()?;

        let mut settings = match &args.settings {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };
        if let Some(mode) = args.mode {
            settings = settings.with_mode(mode);
        }
        let high_scores = match &args.scores {
            Some(path) => HighScores::load(path)?,
            None => HighScores::new(),
        };

        let mut pilot = Autopilot::new(&settings);
        let mut session = Session::new(settings, args.seed)?.with_high_scores(high_scores);
        log::info!(
            "Demo: {} ticks, seed {}, {} mode",
            args.ticks,
            args.seed,
            session.control_mode().as_str()
        );

        let mut last: Option<Frame> = None;
        let mut best_match = 0;
        for t in 0..args.ticks {
            let observation = pilot.observe(t, last.as_ref());
            let frame = session.step(&observation);
            best_match = best_match.max(frame.score);
            last = Some(frame);
        }

        let stats = session.match_stats();
        let gestures = session.gesture_stats();
        log::info!(
            "Played {} matches, best {} (all-time {}), {} flaps",
            stats.total_games,
            best_match,
            session.game().high_score,
            stats.total_jumps
        );
        log::info!(
            "Stopped in {} after {:.1}s in the current match",
            session.game().phase.as_str(),
            session.game().time_alive_secs()
        );
        log::info!(
            "Gestures: {} commands, {} jumps, detection rate {:.2}",
            gestures.total_commands,
            gestures.total_jumps,
            session.history().detection_rate()
        );

        if let Some(path) = &args.scores {
            session.high_scores().save(path)?;
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Gesture Flap (native) starting...");

    if let Err(e) = demo::run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser builds drive `Session` from the host page
}
