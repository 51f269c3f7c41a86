//! Game entities
//!
//! Everything the game loop updates each tick: the player, falling enemies
//! and on-screen toggle controls. Each `update` moves the entity, runs its
//! boundary and collision checks, requests a repaint, and reports whether the
//! entity should leave the registry.

use glam::Vec2;
use rand::Rng;

use super::collision::{Aabb, enemy_hits_player};
use super::state::RoundState;
use crate::platform::{Display, Renderer};
use crate::tuning::Tuning;
use crate::ui::UiControl;

/// Registry-assigned entity identifier
pub type EntityId = u32;

/// Whether an entity stays registered after its update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fate {
    Keep,
    Remove,
}

/// Everything an entity may read or write during its update
pub struct TickContext<'a> {
    pub state: &'a mut RoundState,
    pub tuning: &'a Tuning,
    /// Player bounds as of this point in the pass
    pub player: Option<Aabb>,
    pub display: &'a mut dyn Display,
    pub renderer: &'a mut dyn Renderer,
}

/// The player's paddle
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    /// Horizontal center and bottom edge (feet on the ground line)
    pub pos: Vec2,
    pub size: Vec2,
    /// Horizontal velocity (units per tick), sticky until changed
    pub vel_x: f32,
    speed: f32,
}

impl Player {
    /// Player standing centered on the ground line
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: Vec2::new(tuning.canvas_width / 2.0, tuning.ground_y()),
            size: Vec2::new(tuning.player_width, tuning.player_height),
            vel_x: 0.0,
            speed: tuning.player_speed,
        }
    }

    pub fn move_right(&mut self) {
        self.vel_x = self.speed;
    }

    pub fn move_left(&mut self) {
        self.vel_x = -self.speed;
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_foot(self.pos, self.size)
    }

    /// Apply velocity, then keep the whole box on screen
    fn step(&mut self, screen_width: f32) {
        self.pos.x += self.vel_x;

        let half = self.size.x / 2.0;
        if self.pos.x + half >= screen_width {
            self.pos.x = screen_width - half;
        }
        if self.pos.x - half <= 0.0 {
            self.pos.x = half;
        }
    }
}

/// A falling enemy
#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    /// Center of the enemy
    pub pos: Vec2,
    pub size: Vec2,
}

impl Enemy {
    /// New enemy just above the top edge at a random x that keeps the whole
    /// box on screen
    pub fn spawn<R: Rng>(rng: &mut R, tuning: &Tuning) -> Self {
        let x = rng.random_range(0.0..tuning.canvas_width);
        Self::at(x, tuning)
    }

    /// New enemy above the top edge at `x` (clamped to the screen)
    pub fn at(x: f32, tuning: &Tuning) -> Self {
        let half = tuning.enemy_width / 2.0;
        let x = x.clamp(half, (tuning.canvas_width - half).max(half));
        Self {
            pos: Vec2::new(x, -half),
            size: Vec2::new(tuning.enemy_width, tuning.enemy_height),
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos, self.size)
    }

    /// Fall, then resolve a hit on the player or a landing
    fn step(&mut self, ctx: &mut TickContext) -> Fate {
        self.pos.y += ctx.state.enemy_speed;
        let bounds = self.bounds();

        if let Some(player) = ctx.player {
            if enemy_hits_player(&bounds, &player) {
                ctx.state.score -= ctx.tuning.hit_penalty;
                ctx.display.set_score(ctx.state.score);
                log::debug!("Enemy hit player at x={:.1}, score {}", self.pos.x, ctx.state.score);
                return Fate::Remove;
            }
        }

        if bounds.bottom >= ctx.tuning.ground_y() {
            return Fate::Remove;
        }

        Fate::Keep
    }
}

/// Anything the game loop updates
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Player(Player),
    Enemy(Enemy),
    /// On-screen toggle (pause button); only needs repainting
    Control(UiControl),
}

impl Entity {
    /// One tick of movement, checks and repaint
    pub fn update(&mut self, ctx: &mut TickContext) -> Fate {
        let fate = match self {
            Entity::Player(player) => {
                player.step(ctx.tuning.canvas_width);
                Fate::Keep
            }
            Entity::Enemy(enemy) => enemy.step(ctx),
            Entity::Control(_) => Fate::Keep,
        };
        ctx.renderer.draw_entity(self);
        fate
    }

    pub fn as_player(&self) -> Option<&Player> {
        match self {
            Entity::Player(player) => Some(player),
            _ => None,
        }
    }

    pub fn as_player_mut(&mut self) -> Option<&mut Player> {
        match self {
            Entity::Player(player) => Some(player),
            _ => None,
        }
    }

    pub fn as_enemy(&self) -> Option<&Enemy> {
        match self {
            Entity::Enemy(enemy) => Some(enemy),
            _ => None,
        }
    }

    pub fn is_enemy(&self) -> bool {
        matches!(self, Entity::Enemy(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{NullRenderer, RecordingDisplay};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn run_update(entity: &mut Entity, state: &mut RoundState, player: Option<Aabb>) -> (Fate, RecordingDisplay) {
        let tuning = Tuning::default();
        let mut display = RecordingDisplay::default();
        let mut renderer = NullRenderer;
        let mut ctx = TickContext {
            state,
            tuning: &tuning,
            player,
            display: &mut display,
            renderer: &mut renderer,
        };
        let fate = entity.update(&mut ctx);
        (fate, display)
    }

    #[test]
    fn test_player_velocity_is_sticky() {
        let tuning = Tuning::default();
        let mut state = RoundState::new(&tuning, 1);
        let mut entity = Entity::Player(Player::new(&tuning));
        if let Some(p) = entity.as_player_mut() {
            p.move_right();
        }
        for _ in 0..3 {
            run_update(&mut entity, &mut state, None);
        }
        assert_eq!(entity.as_player().unwrap().pos.x, 156.0);

        entity.as_player_mut().unwrap().move_left();
        run_update(&mut entity, &mut state, None);
        assert_eq!(entity.as_player().unwrap().pos.x, 154.0);
        assert_eq!(entity.as_player().unwrap().pos.y, tuning.ground_y());
    }

    #[test]
    fn test_player_clamped_to_screen() {
        let tuning = Tuning::default();
        let mut state = RoundState::new(&tuning, 1);
        let mut player = Player::new(&tuning);
        player.pos.x = 297.0;
        player.move_right();
        let mut entity = Entity::Player(player);
        run_update(&mut entity, &mut state, None);
        let p = entity.as_player().unwrap();
        assert_eq!(p.pos.x, 300.0 - 4.5);
        assert!(p.bounds().right <= tuning.canvas_width);

        let mut player = Player::new(&tuning);
        player.pos.x = 5.0;
        player.move_left();
        let mut entity = Entity::Player(player);
        run_update(&mut entity, &mut state, None);
        assert_eq!(entity.as_player().unwrap().bounds().left, 0.0);
    }

    #[test]
    fn test_enemy_spawn_stays_on_screen() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(3);
        for _ in 0..200 {
            let enemy = Enemy::spawn(&mut rng, &tuning);
            let b = enemy.bounds();
            assert!(b.left >= 0.0 && b.right <= tuning.canvas_width);
            assert_eq!(enemy.pos.y, -7.5);
        }
        assert_eq!(Enemy::at(0.0, &tuning).pos.x, 7.5);
        assert_eq!(Enemy::at(300.0, &tuning).pos.x, 292.5);
    }

    #[test]
    fn test_enemy_falls_at_shared_speed() {
        let tuning = Tuning::default();
        let mut state = RoundState::new(&tuning, 1);
        let mut entity = Entity::Enemy(Enemy::at(20.0, &tuning));
        run_update(&mut entity, &mut state, None);
        assert_eq!(entity.as_enemy().unwrap().pos.y, -3.5);

        state.enemy_speed = 6.0;
        run_update(&mut entity, &mut state, None);
        assert_eq!(entity.as_enemy().unwrap().pos.y, 2.5);
    }

    #[test]
    fn test_enemy_hit_applies_penalty_and_removes() {
        let tuning = Tuning::default();
        let mut state = RoundState::new(&tuning, 1);
        let player = Player::new(&tuning);
        let mut enemy = Enemy::at(player.pos.x, &tuning);
        enemy.pos.y = 104.0;
        let mut entity = Entity::Enemy(enemy);

        let (fate, display) = run_update(&mut entity, &mut state, Some(player.bounds()));
        assert_eq!(fate, Fate::Remove);
        assert_eq!(state.score, 98);
        assert_eq!(display.readout.score, Some(98));
    }

    #[test]
    fn test_enemy_landing_is_free() {
        let tuning = Tuning::default();
        let mut state = RoundState::new(&tuning, 1);
        let player = Player::new(&tuning);
        // Far from the player
        let mut enemy = Enemy::at(20.0, &tuning);
        enemy.pos.y = 118.0;
        let mut entity = Entity::Enemy(enemy);

        let (fate, display) = run_update(&mut entity, &mut state, Some(player.bounds()));
        assert_eq!(fate, Fate::Remove);
        assert_eq!(state.score, 100);
        assert_eq!(display.score_updates, 0);
    }
}
