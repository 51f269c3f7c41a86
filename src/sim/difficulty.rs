//! Difficulty ramp
//!
//! `Start -> Easy -> Medium -> Hard -> Extreme`, forward only. The round
//! timer asks for an escalation when the countdown lands on a ramp threshold;
//! the caller is responsible for restarting the spawner at the new interval.

use serde::{Deserialize, Serialize};

use super::state::RoundState;
use crate::tuning::Tuning;

/// Ordered difficulty tier
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum DifficultyTier {
    #[default]
    Start,
    Easy,
    Medium,
    Hard,
    Extreme,
}

impl DifficultyTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyTier::Start => "start",
            DifficultyTier::Easy => "easy",
            DifficultyTier::Medium => "medium",
            DifficultyTier::Hard => "hard",
            DifficultyTier::Extreme => "extreme",
        }
    }

    /// The tier after this one, `None` at the top
    pub fn next(&self) -> Option<Self> {
        match self {
            DifficultyTier::Start => Some(DifficultyTier::Easy),
            DifficultyTier::Easy => Some(DifficultyTier::Medium),
            DifficultyTier::Medium => Some(DifficultyTier::Hard),
            DifficultyTier::Hard => Some(DifficultyTier::Extreme),
            DifficultyTier::Extreme => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.next().is_none()
    }
}

/// What changed when the ramp moved up a tier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Escalation {
    pub from: DifficultyTier,
    pub to: DifficultyTier,
    pub spawn_interval_ms: u64,
    /// Set only when the shared enemy speed changed
    pub enemy_speed: Option<f32>,
}

/// Move the round to the next configured tier.
///
/// Writes the new tier, spawn interval and (if the step says so) enemy speed
/// into `state`. Returns `None` once no configured step lies above the current
/// tier, which makes repeated calls past `Extreme` no-ops.
pub fn escalate(state: &mut RoundState, tuning: &Tuning) -> Option<Escalation> {
    let from = state.tier;
    let step = tuning.ramp.iter().find(|s| s.tier > from)?;

    state.tier = step.tier;
    state.spawn_interval_ms = step.spawn_interval_ms;
    if let Some(speed) = step.enemy_speed {
        state.enemy_speed = speed;
    }

    log::info!(
        "Difficulty {} -> {} (spawn every {}ms, enemy speed {})",
        from.as_str(),
        step.tier.as_str(),
        step.spawn_interval_ms,
        state.enemy_speed
    );

    Some(Escalation {
        from,
        to: step.tier,
        spawn_interval_ms: step.spawn_interval_ms,
        enemy_speed: step.enemy_speed,
    })
}
