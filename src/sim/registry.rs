//! Entity registry
//!
//! Owns every live entity of the round, in insertion order. The update pass
//! never edits the sequence it walks: it moves the entities out, updates
//! them, and installs the survivors as the new sequence.

use super::entity::{Entity, EntityId, Fate, Player, TickContext};

#[derive(Debug, Clone)]
struct Slot {
    id: EntityId,
    entity: Entity,
}

/// Live entities of the current round
#[derive(Debug, Clone)]
pub struct EntityRegistry {
    slots: Vec<Slot>,
    next_id: EntityId,
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            next_id: 1,
        }
    }

    /// Register an entity and return its id. Ids are never reused within a
    /// registry, so no entity can be registered twice.
    pub fn add(&mut self, entity: Entity) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        self.slots.push(Slot { id, entity });
        id
    }

    /// Unregister an entity; it is skipped by every later update pass
    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        let index = self.slots.iter().position(|s| s.id == id)?;
        Some(self.slots.remove(index).entity)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.slots.iter().find(|s| s.id == id).map(|s| &s.entity)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.slots.iter().any(|s| s.id == id)
    }

    /// Entities in update order
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.slots.iter().map(|s| (s.id, &s.entity))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn enemy_count(&self) -> usize {
        self.slots.iter().filter(|s| s.entity.is_enemy()).count()
    }

    /// Drop every entity (ids keep counting up)
    pub fn clear(&mut self) {
        self.slots.clear();
    }

    pub fn player(&self) -> Option<&Player> {
        self.slots.iter().find_map(|s| s.entity.as_player())
    }

    pub fn player_mut(&mut self) -> Option<&mut Player> {
        self.slots.iter_mut().find_map(|s| s.entity.as_player_mut())
    }

    /// Update every entity once, in order, and drop those that asked to
    /// leave. Returns the ids removed during the pass.
    ///
    /// Enemies see the player's bounds as they stand at that point of the
    /// pass, so a player registered ahead of them has already moved.
    pub fn update_all(&mut self, ctx: &mut TickContext) -> Vec<EntityId> {
        let slots = std::mem::take(&mut self.slots);
        let mut survivors = Vec::with_capacity(slots.len());
        let mut removed = Vec::new();

        ctx.player = slots
            .iter()
            .find_map(|s| s.entity.as_player())
            .map(Player::bounds);

        for mut slot in slots {
            let fate = slot.entity.update(ctx);
            if let Some(player) = slot.entity.as_player() {
                ctx.player = Some(player.bounds());
            }
            match fate {
                Fate::Keep => survivors.push(slot),
                Fate::Remove => removed.push(slot.id),
            }
        }

        self.slots = survivors;
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{NullRenderer, RecordingDisplay};
    use crate::sim::{Enemy, RoundState};
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    fn pass(registry: &mut EntityRegistry, state: &mut RoundState) -> Vec<EntityId> {
        let tuning = Tuning::default();
        let mut display = RecordingDisplay::default();
        let mut renderer = NullRenderer;
        let mut ctx = TickContext {
            state,
            tuning: &tuning,
            player: None,
            display: &mut display,
            renderer: &mut renderer,
        };
        registry.update_all(&mut ctx)
    }

    #[test]
    fn test_ids_are_unique() {
        let tuning = Tuning::default();
        let mut registry = EntityRegistry::new();
        let a = registry.add(Entity::Player(Player::new(&tuning)));
        let b = registry.add(Entity::Enemy(Enemy::at(10.0, &tuning)));
        assert_ne!(a, b);
        registry.clear();
        let c = registry.add(Entity::Enemy(Enemy::at(10.0, &tuning)));
        assert!(c > b);
    }

    #[test]
    fn test_remove_excludes_from_next_pass() {
        let tuning = Tuning::default();
        let mut state = RoundState::new(&tuning, 1);
        let mut registry = EntityRegistry::new();
        let enemy = registry.add(Entity::Enemy(Enemy::at(10.0, &tuning)));
        registry.add(Entity::Player(Player::new(&tuning)));

        assert!(registry.remove(enemy).is_some());
        assert!(registry.remove(enemy).is_none());
        pass(&mut registry, &mut state);
        assert!(!registry.contains(enemy));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_collided_enemy_removed_in_same_pass() {
        let tuning = Tuning::default();
        let mut state = RoundState::new(&tuning, 1);
        let mut registry = EntityRegistry::new();
        registry.add(Entity::Player(Player::new(&tuning)));
        let mut enemy = Enemy::at(150.0, &tuning);
        enemy.pos.y = 104.0;
        let id = registry.add(Entity::Enemy(enemy));
        let bystander = registry.add(Entity::Enemy(Enemy::at(30.0, &tuning)));

        let removed = pass(&mut registry, &mut state);
        assert_eq!(removed, vec![id]);
        assert_eq!(state.score, 98);
        assert!(registry.contains(bystander));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_enemies_see_moved_player() {
        let tuning = Tuning::default();
        let mut state = RoundState::new(&tuning, 1);
        let mut registry = EntityRegistry::new();
        let mut player = Player::new(&tuning);
        // Player box right edge starts at 154.5; after moving it is at 156.5
        player.move_right();
        registry.add(Entity::Player(player));
        let mut enemy = Enemy::at(163.0, &tuning);
        enemy.pos.y = 110.0;
        let id = registry.add(Entity::Enemy(enemy));

        pass(&mut registry, &mut state);
        assert!(!registry.contains(id));
        assert_eq!(state.score, 98);
    }

    proptest! {
        #[test]
        fn prop_no_removed_entity_survives_pass(
            xs in prop::collection::vec(0.0f32..300.0, 0..30),
            ys in prop::collection::vec(-10.0f32..130.0, 30),
        ) {
            let tuning = Tuning::default();
            let mut state = RoundState::new(&tuning, 1);
            let mut registry = EntityRegistry::new();
            registry.add(Entity::Player(Player::new(&tuning)));
            for (x, y) in xs.iter().zip(ys.iter()) {
                let mut enemy = Enemy::at(*x, &tuning);
                enemy.pos.y = *y;
                registry.add(Entity::Enemy(enemy));
            }
            let before = registry.len();

            let removed = pass(&mut registry, &mut state);
            for id in &removed {
                prop_assert!(!registry.contains(*id));
            }
            prop_assert_eq!(registry.len() + removed.len(), before);
            prop_assert!(registry.player().is_some());
        }
    }
}
