//! Fixed-tick simulation module
//!
//! All gameplay logic lives here:
//! - Fixed 50ms loop tick, one-second countdown, interval spawner
//! - Seeded RNG only
//! - Stable iteration order (registry insertion order)
//! - No rendering or platform dependencies beyond the collaborator traits

pub mod collision;
pub mod difficulty;
pub mod entity;
pub mod registry;
pub mod schedule;
pub mod state;
pub mod tick;

pub use collision::{Aabb, enemy_hits_player};
pub use difficulty::{DifficultyTier, Escalation, escalate};
pub use entity::{Enemy, Entity, EntityId, Fate, Player, TickContext};
pub use registry::EntityRegistry;
pub use schedule::{Facility, IntervalId, Scheduler, Task};
pub use state::RoundState;
pub use tick::{TimerOutcome, game_loop_tick, spawn_tick, timer_tick};
