//! Platform abstraction layer
//!
//! The simulation never touches the DOM, the canvas or LocalStorage directly.
//! It talks to three collaborators:
//! - `Display`: score/time/statistics readouts
//! - `Storage`: string key-value persistence
//! - `Renderer`: background, entity and overlay drawing
//!
//! `memory` has headless implementations used by tests and the native binary;
//! `web` has the browser implementations.

pub mod memory;
#[cfg(target_arch = "wasm32")]
pub mod web;

use glam::Vec2;
use thiserror::Error;

use crate::sim::Entity;
use crate::ui::{Overlay, UiControl};

pub use memory::{DisplayReadout, MemoryStorage, NullRenderer, RecordingDisplay, RenderCall, RecordingRenderer};

/// A storage backend refused a write
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage is unavailable")]
    Unavailable,
    #[error("write of `{key}` rejected: {reason}")]
    Rejected { key: String, reason: String },
}

/// String key-value persistence (LocalStorage on web)
pub trait Storage {
    /// Value stored under `key`, `None` when there is no record
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Readouts next to the screen
pub trait Display {
    fn set_score(&mut self, score: i32);
    fn set_time(&mut self, seconds: u32);
    fn set_high_score(&mut self, score: i32);
    fn set_average(&mut self, seconds: u32);
}

/// Drawing surface. Pixel work happens behind this trait.
pub trait Renderer {
    /// Sky, stars and ground
    fn draw_background(&mut self, stars: &[Vec2]);
    fn draw_entity(&mut self, entity: &Entity);
    fn draw_overlay(&mut self, overlay: &Overlay);

    /// Console chrome (power button)
    fn draw_control(&mut self, _control: &UiControl) {}

    /// Powered-on title screen with its start button
    fn draw_title(&mut self, _start: &UiControl) {}

    /// Blank screen after power off
    fn draw_power_off(&mut self) {}
}
