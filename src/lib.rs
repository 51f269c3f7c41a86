//! Tumbly Fumbles - a single-screen arcade dodging game
//!
//! Core modules:
//! - `sim`: Fixed-tick simulation (entities, collisions, difficulty, scheduling)
//! - `round`: Round controller tying the loop, timer and spawner together
//! - `platform`: Display/storage/render collaborators (browser and in-memory)
//! - `stats`: Persisted high score and average statistics
//! - `tuning`: Data-driven game balance
//! - `ui`: Data-described controls and overlays

pub mod platform;
pub mod round;
pub mod sim;
pub mod stats;
pub mod tuning;
pub mod ui;

pub use round::{RoundController, RoundPhase};
pub use stats::Statistics;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Game loop period (one tick)
    pub const LOOP_INTERVAL_MS: u64 = 50;
    /// Round timer period
    pub const TIMER_INTERVAL_MS: u64 = 1000;
    /// Spawn interval before the first difficulty change
    pub const START_SPAWN_INTERVAL_MS: u64 = 2000;

    /// Canvas dimensions (the bottom tenth is the console bezel)
    pub const CANVAS_WIDTH: f32 = 300.0;
    pub const CANVAS_HEIGHT: f32 = 150.0;

    /// Round defaults
    pub const INITIAL_SCORE: i32 = 100;
    pub const ROUND_SECONDS: u32 = 90;
    pub const HIT_PENALTY: i32 = 2;

    /// Player defaults
    pub const PLAYER_WIDTH: f32 = 9.0;
    pub const PLAYER_HEIGHT: f32 = 15.0;
    pub const PLAYER_SPEED: f32 = 2.0;

    /// Enemy defaults
    pub const ENEMY_WIDTH: f32 = 15.0;
    pub const ENEMY_HEIGHT: f32 = 9.0;
    pub const ENEMY_START_SPEED: f32 = 4.0;
}
