//! Round state
//!
//! Everything that lives for exactly one round. Reset wholesale between
//! rounds and on interruption.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::difficulty::DifficultyTier;
use crate::tuning::Tuning;

/// Star count range for the night sky
pub const MIN_STARS: usize = 400;
pub const MAX_STARS: usize = 1000;

/// Mutable state of the current round
#[derive(Debug, Clone)]
pub struct RoundState {
    /// Score (starts at the tuning's initial score, may go negative)
    pub score: i32,
    /// Seconds left on the round timer
    pub remaining: u32,
    /// Timer ticks during which the score was still at its initial value
    pub elapsed_at_max_score: u32,
    /// Set once the how-to-play overlay is dismissed and the round is live
    pub has_started: bool,
    pub tier: DifficultyTier,
    /// Fall speed shared by every enemy (units per tick)
    pub enemy_speed: f32,
    /// Interval the spawner uses the next time it is switched on
    pub spawn_interval_ms: u64,
    /// Star positions for this round's background
    pub stars: Vec<Vec2>,
    /// Enemy placement and star RNG
    rng: Pcg32,
}

impl RoundState {
    pub fn new(tuning: &Tuning, seed: u64) -> Self {
        Self {
            score: tuning.initial_score,
            remaining: tuning.round_seconds,
            elapsed_at_max_score: 0,
            has_started: false,
            tier: DifficultyTier::Start,
            enemy_speed: tuning.enemy_start_speed,
            spawn_interval_ms: tuning.start_spawn_interval_ms,
            stars: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Return every round value to its initial setting. The RNG keeps its
    /// stream so consecutive rounds differ.
    pub fn reset(&mut self, tuning: &Tuning) {
        self.score = tuning.initial_score;
        self.remaining = tuning.round_seconds;
        self.elapsed_at_max_score = 0;
        self.has_started = false;
        self.tier = DifficultyTier::Start;
        self.enemy_speed = tuning.enemy_start_speed;
        self.spawn_interval_ms = tuning.start_spawn_interval_ms;
        self.stars.clear();
    }

    /// Whether the score is still untouched
    pub fn at_max_score(&self, tuning: &Tuning) -> bool {
        self.score == tuning.initial_score
    }

    pub fn rng(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    /// Scatter a fresh star field across the sky
    pub fn generate_stars(&mut self, tuning: &Tuning) {
        let count = self.rng.random_range(MIN_STARS..=MAX_STARS);
        let width = tuning.canvas_width;
        let height = tuning.screen_height();
        self.stars = (0..count)
            .map(|_| {
                Vec2::new(
                    self.rng.random_range(0.0..width),
                    self.rng.random_range(0.0..height) - 5.0,
                )
            })
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_values() {
        let tuning = Tuning::default();
        let state = RoundState::new(&tuning, 42);
        assert_eq!(state.score, 100);
        assert_eq!(state.remaining, 90);
        assert_eq!(state.elapsed_at_max_score, 0);
        assert_eq!(state.tier, DifficultyTier::Start);
        assert_eq!(state.enemy_speed, 4.0);
        assert_eq!(state.spawn_interval_ms, 2000);
        assert!(!state.has_started);
    }

    #[test]
    fn test_reset_restores_everything() {
        let tuning = Tuning::default();
        let mut state = RoundState::new(&tuning, 42);
        state.generate_stars(&tuning);
        state.score = -12;
        state.remaining = 3;
        state.elapsed_at_max_score = 20;
        state.has_started = true;
        state.tier = DifficultyTier::Hard;
        state.enemy_speed = 6.0;
        state.spawn_interval_ms = 250;

        state.reset(&tuning);
        assert_eq!(state.score, 100);
        assert_eq!(state.remaining, 90);
        assert_eq!(state.elapsed_at_max_score, 0);
        assert!(!state.has_started);
        assert_eq!(state.tier, DifficultyTier::Start);
        assert_eq!(state.enemy_speed, 4.0);
        assert_eq!(state.spawn_interval_ms, 2000);
        assert!(state.stars.is_empty());
    }

    #[test]
    fn test_star_field_is_seeded() {
        let tuning = Tuning::default();
        let mut a = RoundState::new(&tuning, 99);
        let mut b = RoundState::new(&tuning, 99);
        a.generate_stars(&tuning);
        b.generate_stars(&tuning);
        assert_eq!(a.stars, b.stars);
        assert!((MIN_STARS..=MAX_STARS).contains(&a.stars.len()));
        assert!(a.stars.iter().all(|s| s.x >= 0.0 && s.x < tuning.canvas_width));
    }
}
