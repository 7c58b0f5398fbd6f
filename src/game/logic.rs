//! Game logic for the stellar clicker. Pure functions over [`StellarGame`],
//! fully testable without a terminal or a browser.

use super::error::GameError;
use super::evolution::Stage;
use super::resources::ResourceKind;
use super::StellarGame;

/// How often to re-check which upgrades have come up for sale.
pub const UPGRADE_POLL_INTERVAL_MS: f64 = 2_000.0;

const CLICK_FLASH_MS: f64 = 150.0;
const PURCHASE_FLASH_MS: f64 = 600.0;

/// Advance the simulation by `delta_ms` of wall-clock time.
///
/// Order matters: passive income is credited at the rates of the stage the
/// tick started in, then transitions are evaluated against the new totals.
/// A stage reached mid-tick starts paying its rates on the next tick.
pub fn tick(game: &mut StellarGame, delta_ms: f64) {
    if !(delta_ms > 0.0) {
        return;
    }
    let seconds = delta_ms / 1000.0;

    for kind in ResourceKind::all() {
        let gained = game.engine.passive_rate(*kind) * seconds;
        if gained > 0.0 {
            game.ledger.credit(*kind, gained);
        }
    }

    if let Some(transition) = game.engine.advance(delta_ms, &game.ledger) {
        let message = transition_message(transition.to);
        game.view.notify(message);
        game.view.add_log(message, true);
    }

    game.upgrade_poll_ms += delta_ms;
    if game.upgrade_poll_ms >= UPGRADE_POLL_INTERVAL_MS {
        game.upgrade_poll_ms = 0.0;
        announce_new_upgrades(game);
    }

    game.view.tick(delta_ms);
}

/// Handle a click on the star. Returns the (hydrogen, helium) credited.
pub fn click(game: &mut StellarGame) -> (f64, f64) {
    let hydrogen = game.engine.click_rate(ResourceKind::Hydrogen);
    let helium = game.engine.click_rate(ResourceKind::Helium);
    game.ledger.credit(ResourceKind::Hydrogen, hydrogen);
    if helium > 0.0 {
        game.ledger.credit(ResourceKind::Helium, helium);
    }
    game.total_clicks += 1;
    game.view.click_flash_ms = CLICK_FLASH_MS;
    game.view.spawn_particle(format!("+{}", format_number(hydrogen)));
    (hydrogen, helium)
}

/// Buy an upgrade by catalog id, logging the outcome either way.
pub fn buy_upgrade(game: &mut StellarGame, id: &str) -> Result<(), GameError> {
    match game
        .catalog
        .purchase(id, &mut game.ledger, &mut game.engine)
    {
        Ok(def) => {
            game.view.purchase_flash_ms = PURCHASE_FLASH_MS;
            game.view.add_log(&format!("Purchased {}", def.name), true);
            Ok(())
        }
        Err(err) => {
            if let GameError::InsufficientResources { .. } = &err {
                game.view.add_log(&format!("  {}", err), false);
            }
            Err(err)
        }
    }
}

/// Wipe everything back to a fresh cloud of dust.
pub fn reset(game: &mut StellarGame) {
    game.ledger.reset();
    game.engine.reset();
    game.catalog.reset();
    game.view = super::state::ViewState::new();
    game.total_clicks = 0;
    game.upgrade_poll_ms = 0.0;
    game.announced_upgrades.clear();
}

/// Banner text for entering a stage.
pub fn transition_message(to: Stage) -> &'static str {
    match to {
        Stage::CosmicDust => "A cloud of cosmic dust drifts in the void.",
        Stage::Protostar => "The dust condensed into a glowing protostar!",
        Stage::RedDwarf => "Fusion ignites. A red dwarf smolders to life!",
        Stage::YellowStar => "The star settles onto the main sequence!",
        Stage::BlueGiant => "Searing blue light floods the system!",
        Stage::Supernova => "The core collapses. SUPERNOVA!",
        Stage::BlackHole => "The supernova left behind a black hole.",
    }
}

fn announce_new_upgrades(game: &mut StellarGame) {
    let stage = game.engine.stage();
    let fresh: Vec<&'static str> = game
        .catalog
        .available(stage)
        .filter(|def| !game.announced_upgrades.contains(&def.id))
        .map(|def| def.id)
        .collect();
    for id in fresh {
        game.announced_upgrades.push(id);
        // The starter upgrade is on sale from the first frame; only later
        // arrivals are worth a banner.
        if id != "dust_efficiency" {
            if let Some(def) = game.catalog.available(stage).find(|d| d.id == id) {
                game.view.notify(&format!("New upgrade available: {}", def.name));
                game.view.add_log(&format!("  {} is for sale", def.name), false);
            }
        }
    }
}

/// Format with thousands separators and at most one decimal digit.
pub fn format_number(n: f64) -> String {
    if n < 0.0 {
        return format!("-{}", format_number(-n));
    }
    let int_part = n.floor() as u64;
    let frac = n - int_part as f64;

    let s = int_part.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    let result: String = result.chars().rev().collect();

    if frac > 0.05 {
        format!("{}.{}", result, ((frac * 10.0).round() as u8))
    } else {
        result
    }
}
