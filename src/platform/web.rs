//! Browser collaborators: LocalStorage, DOM readouts and a 2D canvas

use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlImageElement};

use super::{Display, Renderer, Storage, StorageError};
use crate::sim::Entity;
use crate::tuning::Tuning;
use crate::ui::{Overlay, UiControl};

const SKY: &str = "#000066";
const STAR: &str = "#ffcc00";
const GROUND: &str = "#800000";
const BEZEL: &str = "gray";
const PLAYER: &str = "#1aff1a";
const ENEMY: &str = "#ff1a1a";
const PANEL: &str = "#7979d2";
const PANEL_TEXT: &str = "#ffdb4d";
const TITLE: &str = "#00ff99";

/// `window.localStorage`
pub struct LocalStorage {
    inner: Option<web_sys::Storage>,
}

impl LocalStorage {
    pub fn open() -> Self {
        let inner = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();
        if inner.is_none() {
            log::warn!("LocalStorage unavailable - statistics will not persist");
        }
        Self { inner }
    }
}

impl Storage for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.as_ref()?.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let storage = self.inner.as_ref().ok_or(StorageError::Unavailable)?;
        storage
            .set_item(key, value)
            .map_err(|e| StorageError::Rejected {
                key: key.to_string(),
                reason: format!("{:?}", e),
            })
    }
}

/// Readouts bound to DOM elements by id
pub struct DomDisplay {
    document: Document,
}

impl DomDisplay {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    fn set_text(&self, id: &str, text: &str) {
        if let Some(el) = self.document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }
}

impl Display for DomDisplay {
    fn set_score(&mut self, score: i32) {
        self.set_text("score-numeric", &score.to_string());
    }

    fn set_time(&mut self, seconds: u32) {
        self.set_text("time-numeric", &seconds.to_string());
    }

    fn set_high_score(&mut self, score: i32) {
        self.set_text("high-score-numeric", &score.to_string());
    }

    fn set_average(&mut self, seconds: u32) {
        self.set_text("average-numeric", &seconds.to_string());
    }
}

/// Canvas 2D renderer
pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
    document: Document,
    width: f64,
    height: f64,
    screen_height: f64,
    ground_y: f64,
}

impl CanvasRenderer {
    /// Grab the 2D context of `canvas`. `None` if the browser refuses one.
    pub fn new(canvas: &HtmlCanvasElement, document: Document, tuning: &Tuning) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        let renderer = Self {
            ctx,
            document,
            width: f64::from(tuning.canvas_width),
            height: f64::from(tuning.canvas_height),
            screen_height: f64::from(tuning.screen_height()),
            ground_y: f64::from(tuning.ground_y()),
        };
        renderer.draw_bezel();
        Some(renderer)
    }

    fn draw_bezel(&self) {
        self.ctx.set_fill_style_str(BEZEL);
        self.ctx
            .fill_rect(0.0, self.height - self.height / 10.0, self.width, self.height / 10.0);
    }

    fn draw_image(&self, control: &UiControl) {
        let bounds = control.bounds();
        let image = self
            .document
            .get_element_by_id(control.asset.as_str())
            .and_then(|el| el.dyn_into::<HtmlImageElement>().ok());
        match image {
            Some(image) => {
                let _ = self.ctx.draw_image_with_html_image_element_and_dw_and_dh(
                    &image,
                    f64::from(bounds.left),
                    f64::from(bounds.top),
                    f64::from(bounds.width()),
                    f64::from(bounds.height()),
                );
            }
            None => {
                log::warn!("Missing image asset `{}`", control.asset.as_str());
                self.ctx.set_fill_style_str(PANEL_TEXT);
                self.ctx.fill_rect(
                    f64::from(bounds.left),
                    f64::from(bounds.top),
                    f64::from(bounds.width()),
                    f64::from(bounds.height()),
                );
            }
        }
    }

    fn fill_screen(&self, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(0.0, 0.0, self.width, self.screen_height);
    }
}

impl Renderer for CanvasRenderer {
    fn draw_background(&mut self, stars: &[Vec2]) {
        self.fill_screen(SKY);

        self.ctx.set_fill_style_str(STAR);
        for star in stars {
            self.ctx.begin_path();
            let _ = self.ctx.arc(
                f64::from(star.x),
                f64::from(star.y),
                1.0,
                0.0,
                std::f64::consts::TAU,
            );
            self.ctx.fill();
        }

        self.ctx.set_fill_style_str(GROUND);
        self.ctx.fill_rect(
            0.0,
            self.ground_y,
            self.width,
            self.screen_height - self.ground_y,
        );
    }

    fn draw_entity(&mut self, entity: &Entity) {
        match entity {
            Entity::Player(player) => {
                let b = player.bounds();
                self.ctx.set_fill_style_str(PLAYER);
                self.ctx.fill_rect(
                    f64::from(b.left),
                    f64::from(b.top),
                    f64::from(b.width()),
                    f64::from(b.height()),
                );
            }
            Entity::Enemy(enemy) => {
                // Point-down triangle
                let b = enemy.bounds();
                let x = f64::from(enemy.pos.x);
                self.ctx.set_fill_style_str(ENEMY);
                self.ctx.begin_path();
                self.ctx.move_to(x, f64::from(b.bottom));
                self.ctx.line_to(f64::from(b.right), f64::from(b.top));
                self.ctx.line_to(f64::from(b.left), f64::from(b.top));
                self.ctx.close_path();
                self.ctx.fill();
            }
            Entity::Control(control) => self.draw_image(control),
        }
    }

    fn draw_overlay(&mut self, overlay: &Overlay) {
        let p = overlay.panel;
        let (left, top) = (f64::from(p.left), f64::from(p.top));
        let (w, h) = (f64::from(p.width()), f64::from(p.height()));

        self.ctx.set_fill_style_str(PANEL);
        self.ctx.fill_rect(left, top, w, h);

        self.ctx.set_font("8px Arial");
        self.ctx.set_fill_style_str(PANEL_TEXT);
        for (i, line) in overlay.lines.iter().enumerate() {
            let _ = self.ctx.fill_text(line, left + 10.0, top + (i as f64 + 1.0) * h / 4.0);
        }
        if let Some(action) = &overlay.action {
            self.draw_image(action);
        }
        if let Some(footer) = overlay.footer {
            self.ctx.set_fill_style_str(PANEL_TEXT);
            let center_x = f64::from(p.center().x);
            let _ = self.ctx.fill_text(footer, center_x - w / 4.0, top + h - 2.0);
        }
    }

    fn draw_control(&mut self, control: &UiControl) {
        self.draw_bezel();
        self.draw_image(control);
    }

    fn draw_title(&mut self, start: &UiControl) {
        self.fill_screen("white");
        self.ctx.set_fill_style_str(TITLE);
        self.ctx.set_font("30px Arial");
        let _ = self
            .ctx
            .fill_text("Tumbly Fumbles", self.width / 8.0, self.screen_height / 2.0);
        self.draw_image(start);
    }

    fn draw_power_off(&mut self) {
        self.fill_screen("black");
    }
}
