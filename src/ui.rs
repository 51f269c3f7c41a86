//! Data-described controls and overlays
//!
//! Every button on the console is a `UiControl`: an asset to draw, a box to
//! hit-test, and the action a click triggers. Popups are `Overlay`s: text
//! lines plus an optional action button. The renderer draws both; the round
//! controller routes clicks through them.

use glam::Vec2;

use crate::sim::Aabb;
use crate::tuning::Tuning;

/// Image asset keys (element ids of the preloaded images on web)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKey {
    PowerIdle,
    PowerClicked,
    Start,
    Pause,
    Quit,
}

impl AssetKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetKey::PowerIdle => "power-idle",
            AssetKey::PowerClicked => "power-clicked",
            AssetKey::Start => "start",
            AssetKey::Pause => "pause",
            AssetKey::Quit => "quit",
        }
    }
}

/// What clicking a control does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlAction {
    /// Toggle the console on/off
    TogglePower,
    /// Begin a round from the title screen
    StartRound,
    /// Pause the running round and open the pause menu
    Pause,
    /// Abandon the round and go back to the title screen
    QuitToMenu,
}

/// A clickable control
#[derive(Debug, Clone, PartialEq)]
pub struct UiControl {
    pub asset: AssetKey,
    pub action: ControlAction,
    pub center: Vec2,
    pub size: Vec2,
}

impl UiControl {
    pub fn new(asset: AssetKey, action: ControlAction, center: Vec2, size: Vec2) -> Self {
        Self {
            asset,
            action,
            center,
            size,
        }
    }

    /// Power button, centered on the console bezel under the screen
    pub fn power(tuning: &Tuning) -> Self {
        let w = tuning.canvas_width;
        let h = tuning.canvas_height;
        Self::new(
            AssetKey::PowerIdle,
            ControlAction::TogglePower,
            Vec2::new(w / 2.0, (h - h / 10.0) + h / 20.0),
            Vec2::new(w / 18.0, h / 10.0),
        )
    }

    /// Start button on the title screen
    pub fn start(tuning: &Tuning) -> Self {
        let w = tuning.canvas_width;
        let screen = tuning.screen_height();
        Self::new(
            AssetKey::Start,
            ControlAction::StartRound,
            Vec2::new(w / 2.0, screen - screen / 4.0),
            Vec2::new(w / 4.0, screen / 6.0),
        )
    }

    /// Pause button in the top-right corner of the play field
    pub fn pause(tuning: &Tuning) -> Self {
        Self::new(
            AssetKey::Pause,
            ControlAction::Pause,
            Vec2::new(tuning.canvas_width - 7.5, 7.5),
            Vec2::new(15.0, 15.0),
        )
    }

    /// Quit button centered inside an overlay panel
    pub fn quit_in(panel: &Aabb) -> Self {
        let size = Vec2::new(panel.width() / 4.0, panel.height() / 4.0);
        Self::new(AssetKey::Quit, ControlAction::QuitToMenu, panel.center(), size)
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.center, self.size)
    }

    pub fn contains(&self, point: Vec2) -> bool {
        self.bounds().contains(point)
    }

    /// Power button art for the given power state
    pub fn set_powered(&mut self, on: bool) {
        self.asset = if on {
            AssetKey::PowerClicked
        } else {
            AssetKey::PowerIdle
        };
    }
}

/// Which popup is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayKind {
    HowToPlay,
    PauseMenu,
    GameOver,
}

/// Result of clicking on the screen while an overlay is up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayHit {
    /// The overlay's action button
    Action(ControlAction),
    /// The panel body of a dismissable overlay
    Dismiss,
    /// Outside the panel, or on a panel that cannot be dismissed
    Miss,
}

/// A popup panel over the play field
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    pub kind: OverlayKind,
    pub panel: Aabb,
    pub lines: Vec<&'static str>,
    /// Hint drawn at the bottom edge of the panel
    pub footer: Option<&'static str>,
    pub action: Option<UiControl>,
    /// Whether clicking the panel body closes it
    pub dismissable: bool,
}

impl Overlay {
    /// Panel two thirds of the screen wide, a third tall, centered
    fn panel(tuning: &Tuning) -> Aabb {
        let w = tuning.canvas_width;
        let screen = tuning.screen_height();
        Aabb::from_center(
            Vec2::new(w / 2.0, screen / 2.0),
            Vec2::new(w * 2.0 / 3.0, screen / 3.0),
        )
    }

    pub fn new(kind: OverlayKind, tuning: &Tuning) -> Self {
        let panel = Self::panel(tuning);
        match kind {
            OverlayKind::HowToPlay => Self {
                kind,
                panel,
                lines: vec![
                    "Fumbles...Fumbles?...There you are. Listen,",
                    "You got Tumblies headed your way!",
                    "Use the controller on the right to dodge them.",
                ],
                footer: Some("(Click here to exit.)"),
                action: None,
                dismissable: true,
            },
            OverlayKind::PauseMenu => Self {
                kind,
                panel,
                lines: vec!["Are you sure you want to quit?"],
                footer: Some("(Click here to exit pause menu.)"),
                action: Some(UiControl::quit_in(&panel)),
                dismissable: true,
            },
            OverlayKind::GameOver => Self {
                kind,
                panel,
                lines: vec!["Game Over"],
                footer: None,
                action: Some(UiControl::quit_in(&panel)),
                dismissable: false,
            },
        }
    }

    /// Resolve a click: the action button wins over the panel body
    pub fn hit(&self, point: Vec2) -> OverlayHit {
        if let Some(action) = &self.action {
            if action.contains(point) {
                return OverlayHit::Action(action.action);
            }
        }
        if self.dismissable && self.panel.contains(point) {
            return OverlayHit::Dismiss;
        }
        OverlayHit::Miss
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_hit_box() {
        let tuning = Tuning::default();
        let pause = UiControl::pause(&tuning);
        assert!(pause.contains(Vec2::new(292.5, 7.5)));
        assert!(pause.contains(Vec2::new(300.0, 0.0)));
        assert!(!pause.contains(Vec2::new(280.0, 7.5)));
    }

    #[test]
    fn test_power_asset_follows_state() {
        let tuning = Tuning::default();
        let mut power = UiControl::power(&tuning);
        assert_eq!(power.asset, AssetKey::PowerIdle);
        power.set_powered(true);
        assert_eq!(power.asset.as_str(), "power-clicked");
        // Power button sits on the bezel, below the playable screen
        assert!(power.bounds().top >= tuning.screen_height());
    }

    #[test]
    fn test_pause_menu_routing() {
        let tuning = Tuning::default();
        let menu = Overlay::new(OverlayKind::PauseMenu, &tuning);
        let quit = menu.action.as_ref().unwrap();
        assert_eq!(menu.hit(quit.center), OverlayHit::Action(ControlAction::QuitToMenu));
        let body = Vec2::new(menu.panel.left + 2.0, menu.panel.top + 2.0);
        assert_eq!(menu.hit(body), OverlayHit::Dismiss);
        assert_eq!(menu.hit(Vec2::new(1.0, 1.0)), OverlayHit::Miss);
    }

    #[test]
    fn test_game_over_cannot_be_dismissed() {
        let tuning = Tuning::default();
        let over = Overlay::new(OverlayKind::GameOver, &tuning);
        let body = Vec2::new(over.panel.left + 2.0, over.panel.top + 2.0);
        assert_eq!(over.hit(body), OverlayHit::Miss);
        assert_eq!(
            over.hit(over.panel.center()),
            OverlayHit::Action(ControlAction::QuitToMenu)
        );
    }

    #[test]
    fn test_how_to_play_is_text_only() {
        let tuning = Tuning::default();
        let help = Overlay::new(OverlayKind::HowToPlay, &tuning);
        assert!(help.action.is_none());
        assert_eq!(help.lines.len(), 3);
        assert_eq!(help.hit(help.panel.center()), OverlayHit::Dismiss);
    }
}
