//! Interval callbacks
//!
//! One function per scheduled facility. Each runs to completion on the
//! single game thread; the round controller decides what to do with the
//! outcome (restart the spawner, end the round).

use super::difficulty::{Escalation, escalate};
use super::entity::{Enemy, Entity, EntityId, TickContext};
use super::registry::EntityRegistry;
use super::state::RoundState;
use crate::platform::{Display, Renderer};
use crate::tuning::Tuning;

/// Result of one round-timer firing
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimerOutcome {
    /// Nothing further to do
    Continue,
    /// The countdown crossed a ramp threshold
    Escalated(Escalation),
    /// The countdown reached zero
    Expired,
}

/// One game-loop tick: repaint the background, then update every entity.
/// Returns the ids removed during the pass.
pub fn game_loop_tick(
    registry: &mut EntityRegistry,
    state: &mut RoundState,
    tuning: &Tuning,
    display: &mut dyn Display,
    renderer: &mut dyn Renderer,
) -> Vec<EntityId> {
    renderer.draw_background(&state.stars);
    let mut ctx = TickContext {
        state,
        tuning,
        player: None,
        display,
        renderer,
    };
    registry.update_all(&mut ctx)
}

/// One round-timer second
pub fn timer_tick(state: &mut RoundState, tuning: &Tuning, display: &mut dyn Display) -> TimerOutcome {
    state.remaining = state.remaining.saturating_sub(1);
    display.set_time(state.remaining);

    if state.at_max_score(tuning) {
        state.elapsed_at_max_score += 1;
    }

    if state.remaining == 0 {
        return TimerOutcome::Expired;
    }

    if tuning.step_at(state.remaining).is_some() {
        if let Some(escalation) = escalate(state, tuning) {
            return TimerOutcome::Escalated(escalation);
        }
    }

    TimerOutcome::Continue
}

/// One spawner firing: drop a new enemy in from the top
pub fn spawn_tick(registry: &mut EntityRegistry, state: &mut RoundState, tuning: &Tuning) -> EntityId {
    let enemy = Enemy::spawn(state.rng(), tuning);
    log::debug!("Spawned enemy at x={:.1}", enemy.pos.x);
    registry.add(Entity::Enemy(enemy))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{RecordingDisplay, RecordingRenderer, RenderCall};
    use crate::sim::{DifficultyTier, Player};

    #[test]
    fn test_loop_tick_paints_background_first() {
        let tuning = Tuning::default();
        let mut state = RoundState::new(&tuning, 5);
        state.generate_stars(&tuning);
        let mut registry = EntityRegistry::new();
        registry.add(Entity::Player(Player::new(&tuning)));
        registry.add(Entity::Enemy(Enemy::at(40.0, &tuning)));
        let mut display = RecordingDisplay::default();
        let mut renderer = RecordingRenderer::default();

        game_loop_tick(&mut registry, &mut state, &tuning, &mut display, &mut renderer);
        assert_eq!(
            renderer.calls,
            vec![
                RenderCall::Background { stars: state.stars.len() },
                RenderCall::Player,
                RenderCall::Enemy,
            ]
        );
    }

    #[test]
    fn test_timer_counts_down_and_tracks_max_score() {
        let tuning = Tuning::default();
        let mut state = RoundState::new(&tuning, 5);
        let mut display = RecordingDisplay::default();

        assert_eq!(timer_tick(&mut state, &tuning, &mut display), TimerOutcome::Continue);
        assert_eq!(state.remaining, 89);
        assert_eq!(display.readout.time, Some(89));
        assert_eq!(state.elapsed_at_max_score, 1);

        state.score = 98;
        timer_tick(&mut state, &tuning, &mut display);
        assert_eq!(state.elapsed_at_max_score, 1);
    }

    #[test]
    fn test_timer_escalates_on_thresholds_only() {
        let tuning = Tuning::default();
        let mut state = RoundState::new(&tuning, 5);
        let mut display = RecordingDisplay::default();

        let mut escalations = Vec::new();
        for _ in 0..89 {
            if let TimerOutcome::Escalated(e) = timer_tick(&mut state, &tuning, &mut display) {
                escalations.push((state.remaining, e.to, e.spawn_interval_ms));
            }
        }
        assert_eq!(
            escalations,
            vec![
                (80, DifficultyTier::Easy, 1000),
                (57, DifficultyTier::Medium, 500),
                (34, DifficultyTier::Hard, 250),
                (11, DifficultyTier::Extreme, 125),
            ]
        );
        assert_eq!(state.remaining, 1);
        assert_eq!(timer_tick(&mut state, &tuning, &mut display), TimerOutcome::Expired);
        assert_eq!(state.remaining, 0);
        assert_eq!(state.elapsed_at_max_score, 90);
    }

    #[test]
    fn test_spawn_adds_enemy_above_screen() {
        let tuning = Tuning::default();
        let mut state = RoundState::new(&tuning, 5);
        let mut registry = EntityRegistry::new();
        let id = spawn_tick(&mut registry, &mut state, &tuning);
        let enemy = registry.get(id).and_then(Entity::as_enemy).unwrap();
        assert!(enemy.pos.y < 0.0);
        assert_eq!(registry.enemy_count(), 1);
    }
}
