//! Round controller
//!
//! Owns the round: its state, entity registry, the three scheduled
//! facilities (game loop, round timer, spawner) and the console UI. All
//! input (clicks, movement, power) and all time (`advance`) enter here.

use glam::Vec2;

use crate::platform::{Display, Renderer, Storage};
use crate::sim::{
    Entity, EntityId, EntityRegistry, Facility, Player, RoundState, Scheduler, Task, TimerOutcome,
    game_loop_tick, spawn_tick, timer_tick,
};
use crate::stats::Statistics;
use crate::tuning::Tuning;
use crate::ui::{ControlAction, Overlay, OverlayHit, OverlayKind, UiControl};

/// Where the console is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    /// Screen dark
    Off,
    /// Title screen with the start button
    Idle,
    /// Player placed, how-to-play overlay up, nothing scheduled yet
    Instructions,
    Running,
    Paused,
    /// Round ran out of time; game-over overlay up
    Ended,
}

/// Drives one console: title screen, rounds, statistics
pub struct RoundController<D: Display, S: Storage, R: Renderer> {
    tuning: Tuning,
    state: RoundState,
    registry: EntityRegistry,
    scheduler: Scheduler,
    game_loop: Facility,
    timer: Facility,
    spawner: Facility,
    phase: RoundPhase,
    overlay: Option<Overlay>,
    power_button: UiControl,
    start_button: UiControl,
    pause_control: Option<EntityId>,
    stats: Statistics,
    display: D,
    storage: S,
    renderer: R,
}

impl<D: Display, S: Storage, R: Renderer> RoundController<D, S, R> {
    /// Create a powered-off console and push the stored statistics to the
    /// display
    pub fn new(tuning: Tuning, seed: u64, display: D, storage: S, renderer: R) -> Self {
        let stats = Statistics::load(&storage);
        let mut controller = Self {
            state: RoundState::new(&tuning, seed),
            registry: EntityRegistry::new(),
            scheduler: Scheduler::new(),
            game_loop: Facility::new(Task::GameLoop),
            timer: Facility::new(Task::RoundTimer),
            spawner: Facility::new(Task::Spawner),
            phase: RoundPhase::Off,
            overlay: None,
            power_button: UiControl::power(&tuning),
            start_button: UiControl::start(&tuning),
            pause_control: None,
            stats,
            display,
            storage,
            renderer,
            tuning,
        };
        controller.display.set_score(controller.state.score);
        controller.display.set_time(controller.state.remaining);
        controller.show_stats();
        controller.renderer.draw_control(&controller.power_button);
        controller
    }

    // === Accessors ===

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn overlay(&self) -> Option<&Overlay> {
        self.overlay.as_ref()
    }

    pub fn stats(&self) -> &Statistics {
        &self.stats
    }

    pub fn power_button(&self) -> &UiControl {
        &self.power_button
    }

    pub fn start_button(&self) -> &UiControl {
        &self.start_button
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Whether loop, timer and spawner are all scheduled
    pub fn facilities_running(&self) -> bool {
        self.game_loop.is_running() && self.timer.is_running() && self.spawner.is_running()
    }

    // === Power ===

    pub fn power_on(&mut self) {
        if self.phase != RoundPhase::Off {
            return;
        }
        self.power_button.set_powered(true);
        self.renderer.draw_control(&self.power_button);
        self.show_title();
        log::info!("Console powered on");
    }

    /// Turn the screen off, interrupting any round in progress
    pub fn power_off(&mut self) {
        match self.phase {
            RoundPhase::Off => return,
            RoundPhase::Running | RoundPhase::Paused => {
                self.stop(true);
            }
            RoundPhase::Instructions | RoundPhase::Ended => {
                self.stop_facilities();
                self.reset_state();
            }
            RoundPhase::Idle => {}
        }
        self.overlay = None;
        self.phase = RoundPhase::Off;
        self.power_button.set_powered(false);
        self.renderer.draw_control(&self.power_button);
        self.renderer.draw_power_off();
        log::info!("Console powered off");
    }

    pub fn toggle_power(&mut self) {
        if self.phase == RoundPhase::Off {
            self.power_on();
        } else {
            self.power_off();
        }
    }

    // === Round lifecycle ===

    /// Place the player, paint the world once and show the instructions.
    /// Nothing is scheduled until the instructions are dismissed.
    pub fn start(&mut self) -> bool {
        if self.phase != RoundPhase::Idle {
            return false;
        }
        self.registry.add(Entity::Player(Player::new(&self.tuning)));
        self.state.generate_stars(&self.tuning);
        self.run_game_loop();
        self.show_overlay(OverlayKind::HowToPlay);
        self.phase = RoundPhase::Instructions;
        log::info!("Round ready, waiting for instructions to be dismissed");
        true
    }

    /// Close the how-to-play overlay and set the round in motion
    pub fn dismiss_instructions(&mut self) -> bool {
        if self.phase != RoundPhase::Instructions {
            return false;
        }
        self.overlay = None;
        let pause = UiControl::pause(&self.tuning);
        self.pause_control = Some(self.registry.add(Entity::Control(pause)));
        self.start_facilities();
        self.state.has_started = true;
        self.phase = RoundPhase::Running;
        log::info!("Round started ({}s)", self.state.remaining);
        true
    }

    /// Stop loop, timer and spawner together and open the pause menu
    pub fn pause(&mut self) -> bool {
        if self.phase != RoundPhase::Running {
            return false;
        }
        self.stop_facilities();
        self.show_overlay(OverlayKind::PauseMenu);
        self.phase = RoundPhase::Paused;
        log::info!("Round paused at {}s", self.state.remaining);
        true
    }

    /// Restart loop, timer and spawner together from where they stopped
    pub fn resume(&mut self) -> bool {
        if self.phase != RoundPhase::Paused {
            return false;
        }
        self.overlay = None;
        self.start_facilities();
        self.phase = RoundPhase::Running;
        log::info!("Round resumed at {}s", self.state.remaining);
        true
    }

    /// End the round.
    ///
    /// A natural end (`interrupted == false`) shows the game-over overlay and
    /// folds the round into the stored statistics. An interruption discards
    /// the round without touching statistics.
    ///
    /// A natural end needs a running or paused round; an interruption needs
    /// any phase past the title screen. Otherwise this is a no-op and returns
    /// false.
    pub fn stop(&mut self, interrupted: bool) -> bool {
        let stoppable = if interrupted {
            !matches!(self.phase, RoundPhase::Off | RoundPhase::Idle)
        } else {
            matches!(self.phase, RoundPhase::Running | RoundPhase::Paused)
        };
        if !stoppable {
            return false;
        }

        self.stop_facilities();
        self.state.has_started = false;

        if interrupted {
            self.reset_state();
            self.overlay = None;
            self.phase = RoundPhase::Idle;
            log::info!("Round interrupted");
            return true;
        }

        self.show_overlay(OverlayKind::GameOver);
        self.stats = Statistics::record_round(
            &mut self.storage,
            self.state.score,
            self.state.elapsed_at_max_score,
        );
        self.show_stats();
        self.phase = RoundPhase::Ended;
        log::info!(
            "Round over: score {}, {}s at full score, {} rounds completed",
            self.state.score,
            self.state.elapsed_at_max_score,
            self.stats.completions
        );
        true
    }

    /// Leave the pause menu or game-over screen for the title screen
    pub fn return_to_menu(&mut self) {
        self.stop_facilities();
        self.reset_state();
        self.overlay = None;
        self.show_title();
    }

    /// Put every round value back to its initial setting and empty the
    /// registry
    pub fn reset_state(&mut self) {
        self.registry.clear();
        self.pause_control = None;
        self.state.reset(&self.tuning);
        self.display.set_time(self.state.remaining);
        self.display.set_score(self.state.score);
    }

    // === Input ===

    pub fn move_left(&mut self) {
        if let Some(player) = self.registry.player_mut() {
            player.move_left();
        }
    }

    pub fn move_right(&mut self) {
        if let Some(player) = self.registry.player_mut() {
            player.move_right();
        }
    }

    /// Route a click in canvas coordinates: the overlay first, then the
    /// visible controls. Returns the action taken, if any.
    pub fn click(&mut self, point: Vec2) -> Option<ControlAction> {
        let overlay_hit = self.overlay.as_ref().map(|o| (o.hit(point), o.kind));
        if let Some(hit) = overlay_hit {
            match hit {
                (OverlayHit::Action(action), _) => {
                    self.perform(action);
                    return Some(action);
                }
                (OverlayHit::Dismiss, OverlayKind::HowToPlay) => {
                    self.dismiss_instructions();
                    return None;
                }
                (OverlayHit::Dismiss, OverlayKind::PauseMenu) => {
                    self.resume();
                    return None;
                }
                _ => {}
            }
        }

        let action = self.control_at(point)?;
        self.perform(action);
        Some(action)
    }

    fn control_at(&self, point: Vec2) -> Option<ControlAction> {
        if self.power_button.contains(point) {
            return Some(ControlAction::TogglePower);
        }
        match self.phase {
            RoundPhase::Idle if self.start_button.contains(point) => Some(ControlAction::StartRound),
            RoundPhase::Running => {
                let id = self.pause_control?;
                match self.registry.get(id) {
                    Some(Entity::Control(control)) if control.contains(point) => Some(control.action),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    fn perform(&mut self, action: ControlAction) {
        match action {
            ControlAction::TogglePower => self.toggle_power(),
            ControlAction::StartRound => {
                self.start();
            }
            ControlAction::Pause => {
                self.pause();
            }
            ControlAction::QuitToMenu => self.return_to_menu(),
        }
    }

    // === Time ===

    /// Advance the clock by `dt_ms`, firing every interval that falls due in
    /// order. Intervals started or stopped by a firing take effect at once.
    pub fn advance(&mut self, dt_ms: u64) {
        let until = self.scheduler.now_ms() + dt_ms;
        while let Some(task) = self.scheduler.next_due(until) {
            self.fire(task);
        }
        self.scheduler.settle(until);
    }

    fn fire(&mut self, task: Task) {
        match task {
            Task::GameLoop => self.run_game_loop(),
            Task::RoundTimer => self.run_timer(),
            Task::Spawner => {
                spawn_tick(&mut self.registry, &mut self.state, &self.tuning);
            }
        }
    }

    fn run_game_loop(&mut self) {
        game_loop_tick(
            &mut self.registry,
            &mut self.state,
            &self.tuning,
            &mut self.display,
            &mut self.renderer,
        );
        if let Some(overlay) = &self.overlay {
            self.renderer.draw_overlay(overlay);
        }
    }

    fn run_timer(&mut self) {
        match timer_tick(&mut self.state, &self.tuning, &mut self.display) {
            TimerOutcome::Continue => {}
            TimerOutcome::Escalated(escalation) => {
                // A rate change needs an off/on pair
                self.spawner.restart(&mut self.scheduler, escalation.spawn_interval_ms);
            }
            TimerOutcome::Expired => {
                self.stop(false);
            }
        }
    }

    // === Helpers ===

    fn start_facilities(&mut self) {
        self.game_loop.start(&mut self.scheduler, self.tuning.loop_interval_ms);
        self.timer.start(&mut self.scheduler, self.tuning.timer_interval_ms);
        self.spawner.start(&mut self.scheduler, self.state.spawn_interval_ms);
    }

    fn stop_facilities(&mut self) {
        self.game_loop.stop(&mut self.scheduler);
        self.timer.stop(&mut self.scheduler);
        self.spawner.stop(&mut self.scheduler);
    }

    fn show_overlay(&mut self, kind: OverlayKind) {
        let overlay = Overlay::new(kind, &self.tuning);
        self.renderer.draw_overlay(&overlay);
        self.overlay = Some(overlay);
    }

    fn show_title(&mut self) {
        self.phase = RoundPhase::Idle;
        self.renderer.draw_title(&self.start_button);
    }

    fn show_stats(&mut self) {
        if let Some(high) = self.stats.high_score {
            self.display.set_high_score(high);
        }
        if let Some(average) = self.stats.average_at_max_score {
            self.display.set_average(average);
        }
    }
}
