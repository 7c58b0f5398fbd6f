//! Stellar Clicker — click a cloud of cosmic dust and evolve it through the
//! stellar life cycle, all the way to a black hole.

pub mod actions;
pub mod error;
pub mod evolution;
pub mod logic;
pub mod render;
pub mod resources;
pub mod save;
pub mod state;
pub mod upgrades;

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::Frame;

use crate::input::{ClickState, InputEvent};

use evolution::EvolutionEngine;
use resources::ResourceLedger;
use state::ViewState;
use upgrades::UpgradeCatalog;

/// The whole game: simulation (ledger, engine, catalog) plus view state.
pub struct StellarGame {
    pub ledger: ResourceLedger,
    pub engine: EvolutionEngine,
    pub catalog: UpgradeCatalog,
    pub view: ViewState,
    pub total_clicks: u64,
    /// Accumulator for the periodic upgrade-availability check.
    pub upgrade_poll_ms: f64,
    /// Upgrade ids already announced, so banners fire once.
    pub announced_upgrades: Vec<&'static str>,
}

impl StellarGame {
    pub fn new() -> Self {
        Self {
            ledger: ResourceLedger::new(),
            engine: EvolutionEngine::new(),
            catalog: UpgradeCatalog::new(),
            view: ViewState::new(),
            total_clicks: 0,
            upgrade_poll_ms: 0.0,
            announced_upgrades: Vec::new(),
        }
    }

    /// Dispatch a normalized input event. Returns true if it was handled.
    pub fn handle_input(&mut self, event: &InputEvent) -> bool {
        match event {
            InputEvent::Key(key) => self.handle_key(*key),
            InputEvent::Click(action) => self.handle_action(*action),
        }
    }

    fn handle_key(&mut self, key: char) -> bool {
        match key {
            'c' => {
                logic::click(self);
                true
            }
            'u' => {
                self.view.show_upgrades = !self.view.show_upgrades;
                true
            }
            // Digits so the buy keys never collide with the letter commands.
            '1'..='6' => {
                let display_idx = (key as u8 - b'1') as usize;
                self.buy_by_display_index(display_idx);
                true
            }
            _ => false,
        }
    }

    fn handle_action(&mut self, action: u16) -> bool {
        match action {
            actions::CLICK_STAR => {
                logic::click(self);
                true
            }
            actions::TOGGLE_UPGRADES => {
                self.view.show_upgrades = !self.view.show_upgrades;
                true
            }
            a if a >= actions::BUY_UPGRADE_BASE => {
                let display_idx = (a - actions::BUY_UPGRADE_BASE) as usize;
                self.buy_by_display_index(display_idx);
                true
            }
            // SAVE_GAME and RESET_GAME touch localStorage, so main.rs
            // dispatches them itself.
            _ => false,
        }
    }

    /// Buy the nth currently visible upgrade, as shown in the panel.
    fn buy_by_display_index(&mut self, display_idx: usize) {
        let id = self
            .catalog
            .available(self.engine.stage())
            .nth(display_idx)
            .map(|def| def.id);
        if let Some(id) = id {
            let _ = logic::buy_upgrade(self, id);
        }
    }

    /// Advance the simulation by `delta_ms` of wall-clock time.
    pub fn tick(&mut self, delta_ms: f64) {
        logic::tick(self, delta_ms);
    }

    pub fn render(&self, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
        render::render(self, f, area, click_state);
    }
}

impl Default for StellarGame {
    fn default() -> Self {
        Self::new()
    }
}
