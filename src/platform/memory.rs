//! Headless collaborators
//!
//! Used by the native binary and by the simulation tests.

use std::collections::HashMap;

use glam::Vec2;

use super::{Display, Renderer, Storage, StorageError};
use crate::sim::Entity;
use crate::ui::{Overlay, OverlayKind, UiControl};

/// In-memory key-value store
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    values: HashMap<String, String>,
    /// Reject every write (for exercising failure paths)
    read_only: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose writes always fail
    pub fn read_only() -> Self {
        Self {
            values: HashMap::new(),
            read_only: true,
        }
    }

    /// Seed a value without going through `Storage::set`
    pub fn insert(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.read_only {
            return Err(StorageError::Rejected {
                key: key.to_string(),
                reason: "read-only store".to_string(),
            });
        }
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Latest values pushed to the readouts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DisplayReadout {
    pub score: Option<i32>,
    pub time: Option<u32>,
    pub high_score: Option<i32>,
    pub average: Option<u32>,
}

/// Display that remembers the last value of each readout
#[derive(Debug, Clone, Default)]
pub struct RecordingDisplay {
    pub readout: DisplayReadout,
    /// Number of score updates received
    pub score_updates: usize,
}

impl Display for RecordingDisplay {
    fn set_score(&mut self, score: i32) {
        self.readout.score = Some(score);
        self.score_updates += 1;
    }

    fn set_time(&mut self, seconds: u32) {
        self.readout.time = Some(seconds);
    }

    fn set_high_score(&mut self, score: i32) {
        self.readout.high_score = Some(score);
    }

    fn set_average(&mut self, seconds: u32) {
        self.readout.average = Some(seconds);
    }
}

/// Renderer that draws nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn draw_background(&mut self, _stars: &[Vec2]) {}
    fn draw_entity(&mut self, _entity: &Entity) {}
    fn draw_overlay(&mut self, _overlay: &Overlay) {}
}

/// A single draw request, as seen by `RecordingRenderer`
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCall {
    Background { stars: usize },
    Player,
    Enemy,
    Control,
    Overlay(OverlayKind),
    Title,
    PowerOff,
}

/// Renderer that logs every draw call in order
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    pub calls: Vec<RenderCall>,
}

impl RecordingRenderer {
    pub fn clear(&mut self) {
        self.calls.clear();
    }

    pub fn count(&self, call: &RenderCall) -> usize {
        self.calls.iter().filter(|c| *c == call).count()
    }
}

impl Renderer for RecordingRenderer {
    fn draw_background(&mut self, stars: &[Vec2]) {
        self.calls.push(RenderCall::Background { stars: stars.len() });
    }

    fn draw_entity(&mut self, entity: &Entity) {
        self.calls.push(match entity {
            Entity::Player(_) => RenderCall::Player,
            Entity::Enemy(_) => RenderCall::Enemy,
            Entity::Control(_) => RenderCall::Control,
        });
    }

    fn draw_overlay(&mut self, overlay: &Overlay) {
        self.calls.push(RenderCall::Overlay(overlay.kind));
    }

    fn draw_title(&mut self, _start: &UiControl) {
        self.calls.push(RenderCall::Title);
    }

    fn draw_power_off(&mut self) {
        self.calls.push(RenderCall::PowerOff);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_roundtrip() {
        let mut storage = MemoryStorage::new();
        assert!(storage.get("highscore").is_none());
        storage.set("highscore", "98").unwrap();
        assert_eq!(storage.get("highscore").as_deref(), Some("98"));
        assert_eq!(storage.len(), 1);
    }

    #[test]
    fn test_read_only_storage_rejects_writes() {
        let mut storage = MemoryStorage::read_only();
        assert!(storage.set("completions", "1").is_err());
        assert!(storage.is_empty());
    }
}
