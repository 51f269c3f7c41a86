//! Data-driven game balance
//!
//! Every number the simulation uses lives here so a round can be retuned
//! without touching the code. `Tuning::default()` is the shipped balance.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::platform::Storage;
use crate::sim::DifficultyTier;

/// Why a tuning document was rejected
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("tuning JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("ramp step {index} fires at {at} but must come before {previous}")]
    RampNotDescending { index: usize, at: u32, previous: u32 },
    #[error("ramp step {index} moves to {tier:?}, which is not past the previous tier")]
    RampNotAscending { index: usize, tier: DifficultyTier },
    #[error("{0} must be greater than zero")]
    ZeroInterval(&'static str),
    #[error("{name} must be a positive size, got {value}")]
    NonPositiveSize { name: &'static str, value: f32 },
}

/// One row of the difficulty ramp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RampStep {
    /// Remaining round seconds at which this step fires
    pub at_remaining: u32,
    /// Tier entered
    pub tier: DifficultyTier,
    /// Spawner interval from this tier on
    pub spawn_interval_ms: u64,
    /// New shared enemy speed, if this step changes it
    #[serde(default)]
    pub enemy_speed: Option<f32>,
}

/// Game balance and geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Geometry ===
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub player_width: f32,
    pub player_height: f32,
    pub enemy_width: f32,
    pub enemy_height: f32,

    // === Movement ===
    /// Player horizontal speed (units per tick)
    pub player_speed: f32,
    /// Enemy fall speed at round start (units per tick)
    pub enemy_start_speed: f32,

    // === Round ===
    pub initial_score: i32,
    pub round_seconds: u32,
    pub hit_penalty: i32,

    // === Scheduling ===
    pub loop_interval_ms: u64,
    pub timer_interval_ms: u64,
    pub start_spawn_interval_ms: u64,

    /// Difficulty steps, ordered by firing time
    pub ramp: Vec<RampStep>,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,
            player_width: PLAYER_WIDTH,
            player_height: PLAYER_HEIGHT,
            enemy_width: ENEMY_WIDTH,
            enemy_height: ENEMY_HEIGHT,

            player_speed: PLAYER_SPEED,
            enemy_start_speed: ENEMY_START_SPEED,

            initial_score: INITIAL_SCORE,
            round_seconds: ROUND_SECONDS,
            hit_penalty: HIT_PENALTY,

            loop_interval_ms: LOOP_INTERVAL_MS,
            timer_interval_ms: TIMER_INTERVAL_MS,
            start_spawn_interval_ms: START_SPAWN_INTERVAL_MS,

            ramp: vec![
                RampStep {
                    at_remaining: 80,
                    tier: DifficultyTier::Easy,
                    spawn_interval_ms: 1000,
                    enemy_speed: None,
                },
                RampStep {
                    at_remaining: 57,
                    tier: DifficultyTier::Medium,
                    spawn_interval_ms: 500,
                    enemy_speed: None,
                },
                RampStep {
                    at_remaining: 34,
                    tier: DifficultyTier::Hard,
                    spawn_interval_ms: 250,
                    enemy_speed: Some(6.0),
                },
                RampStep {
                    at_remaining: 11,
                    tier: DifficultyTier::Extreme,
                    spawn_interval_ms: 125,
                    enemy_speed: None,
                },
            ],
        }
    }
}

impl Tuning {
    /// Storage key for tuning overrides
    const STORAGE_KEY: &'static str = "tuning";

    /// Height of the playable screen (canvas minus the console bezel)
    pub fn screen_height(&self) -> f32 {
        self.canvas_height - self.canvas_height / 10.0
    }

    /// The ground line enemies land on and the player stands on
    pub fn ground_y(&self) -> f32 {
        let screen = self.screen_height();
        screen - screen / 15.0
    }

    /// Parse and validate a tuning document. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Check that sizes and intervals are usable and the ramp only moves
    /// forward
    pub fn validate(&self) -> Result<(), TuningError> {
        let sizes = [
            ("canvas_width", self.canvas_width),
            ("canvas_height", self.canvas_height),
            ("player_width", self.player_width),
            ("player_height", self.player_height),
            ("enemy_width", self.enemy_width),
            ("enemy_height", self.enemy_height),
        ];
        for (name, value) in sizes {
            if value.is_nan() || value <= 0.0 {
                return Err(TuningError::NonPositiveSize { name, value });
            }
        }

        if self.loop_interval_ms == 0 {
            return Err(TuningError::ZeroInterval("loop_interval_ms"));
        }
        if self.timer_interval_ms == 0 {
            return Err(TuningError::ZeroInterval("timer_interval_ms"));
        }
        if self.start_spawn_interval_ms == 0 {
            return Err(TuningError::ZeroInterval("start_spawn_interval_ms"));
        }

        let mut previous_at = u32::MAX;
        let mut previous_tier = DifficultyTier::Start;
        for (index, step) in self.ramp.iter().enumerate() {
            if step.at_remaining >= previous_at {
                return Err(TuningError::RampNotDescending {
                    index,
                    at: step.at_remaining,
                    previous: previous_at,
                });
            }
            if step.tier <= previous_tier {
                return Err(TuningError::RampNotAscending {
                    index,
                    tier: step.tier,
                });
            }
            if step.spawn_interval_ms == 0 {
                return Err(TuningError::ZeroInterval("ramp spawn_interval_ms"));
            }
            previous_at = step.at_remaining;
            previous_tier = step.tier;
        }
        Ok(())
    }

    /// The ramp step that fires at this remaining time, if any
    pub fn step_at(&self, remaining: u32) -> Option<&RampStep> {
        self.ramp.iter().find(|s| s.at_remaining == remaining)
    }

    /// Resize the screen to a real canvas. A size the game cannot run on
    /// falls back to the defaults.
    pub fn fit_canvas(mut self, width: f32, height: f32) -> Self {
        self.canvas_width = width;
        self.canvas_height = height;
        match self.validate() {
            Ok(()) => self,
            Err(e) => {
                log::warn!("Canvas {}x{} rejected ({}), using default tuning", width, height, e);
                Self::default()
            }
        }
    }

    /// Load tuning overrides from storage, falling back to defaults
    pub fn load(storage: &dyn Storage) -> Self {
        match storage.get(Self::STORAGE_KEY) {
            Some(json) => match Self::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning overrides");
                    tuning
                }
                Err(e) => {
                    log::warn!("Ignoring stored tuning: {}", e);
                    Self::default()
                }
            },
            None => Self::default(),
        }
    }
}
