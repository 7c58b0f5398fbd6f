//! Save/load for the stellar clicker.
//!
//! ## Versioning policy
//!
//! - `SAVE_VERSION`: current save format version. Increment when adding
//!   fields.
//! - `MIN_COMPATIBLE_VERSION`: oldest version that can still be loaded.
//!   Adding fields alone does not bump it; missing fields fill in from
//!   defaults. Only bump it for breaking changes to existing fields.
//!
//! Transient view state (particles, flashes, notifications) is never saved;
//! only the simulation survives a reload.

#[cfg(any(target_arch = "wasm32", test))]
use serde::{Deserialize, Serialize};

#[cfg(any(target_arch = "wasm32", test))]
use super::evolution::{RateTarget, Stage};
#[cfg(any(target_arch = "wasm32", test))]
use super::resources::ResourceKind;
#[cfg(any(target_arch = "wasm32", test))]
use super::StellarGame;

/// Save format version. Increment when adding fields.
#[cfg(any(target_arch = "wasm32", test))]
const SAVE_VERSION: u32 = 1;

/// Oldest save version that still loads; saves below it start a new game.
#[cfg(any(target_arch = "wasm32", test))]
const MIN_COMPATIBLE_VERSION: u32 = 1;

/// localStorage key.
#[cfg(target_arch = "wasm32")]
const STORAGE_KEY: &str = "stellar_clicker_save";

/// Autosave interval in milliseconds.
pub const AUTOSAVE_INTERVAL_MS: f64 = 30_000.0;

#[cfg(any(target_arch = "wasm32", test))]
#[derive(Serialize, Deserialize)]
struct SaveData {
    version: u32,
    game: GameSave,
}

#[cfg(any(target_arch = "wasm32", test))]
fn default_multiplier() -> f64 {
    1.0
}

#[cfg(any(target_arch = "wasm32", test))]
fn default_stage_id() -> String {
    "cosmic_dust".to_string()
}

#[cfg(any(target_arch = "wasm32", test))]
#[derive(Serialize, Deserialize)]
#[serde(default)]
struct GameSave {
    hydrogen: f64,
    helium: f64,
    total_clicks: u64,

    /// Stage id string, see `Stage::id`.
    #[serde(default = "default_stage_id")]
    stage: String,

    #[serde(default = "default_multiplier")]
    click_hydrogen_mult: f64,
    #[serde(default = "default_multiplier")]
    click_helium_mult: f64,
    #[serde(default = "default_multiplier")]
    passive_hydrogen_mult: f64,
    #[serde(default = "default_multiplier")]
    passive_helium_mult: f64,

    #[serde(default = "default_multiplier")]
    supernova_boost: f64,
    supernova_elapsed_ms: f64,

    /// Ids of purchased upgrades. Unknown ids are ignored on load.
    purchased: Vec<String>,

    rng_state: u32,
}

#[cfg(any(target_arch = "wasm32", test))]
impl Default for GameSave {
    fn default() -> Self {
        Self {
            hydrogen: 0.0,
            helium: 0.0,
            total_clicks: 0,
            stage: default_stage_id(),
            click_hydrogen_mult: 1.0,
            click_helium_mult: 1.0,
            passive_hydrogen_mult: 1.0,
            passive_helium_mult: 1.0,
            supernova_boost: 1.0,
            supernova_elapsed_ms: 0.0,
            purchased: Vec::new(),
            rng_state: 42,
        }
    }
}

/// Extract the persistent slice of a running game.
#[cfg(any(target_arch = "wasm32", test))]
fn extract_save(game: &StellarGame) -> SaveData {
    SaveData {
        version: SAVE_VERSION,
        game: GameSave {
            hydrogen: game.ledger.quantity(ResourceKind::Hydrogen),
            helium: game.ledger.quantity(ResourceKind::Helium),
            total_clicks: game.total_clicks,
            stage: game.engine.stage().id().to_string(),
            click_hydrogen_mult: game.engine.multiplier(RateTarget::ClickHydrogen),
            click_helium_mult: game.engine.multiplier(RateTarget::ClickHelium),
            passive_hydrogen_mult: game.engine.multiplier(RateTarget::PassiveHydrogen),
            passive_helium_mult: game.engine.multiplier(RateTarget::PassiveHelium),
            supernova_boost: game.engine.supernova_boost(),
            supernova_elapsed_ms: game.engine.supernova_elapsed_ms(),
            purchased: game.catalog.purchased_ids(),
            rng_state: game.view.rng_state,
        },
    }
}

/// Overwrite a game with saved data. Out-of-range values fall back to sane
/// defaults rather than poisoning the run.
#[cfg(any(target_arch = "wasm32", test))]
fn apply_save(game: &mut StellarGame, save: &GameSave) {
    game.ledger.restore(ResourceKind::Hydrogen, save.hydrogen);
    game.ledger.restore(ResourceKind::Helium, save.helium);
    game.total_clicks = save.total_clicks;
    game.engine.restore(
        Stage::from_id(&save.stage),
        [
            save.click_hydrogen_mult,
            save.click_helium_mult,
            save.passive_hydrogen_mult,
            save.passive_helium_mult,
        ],
        save.supernova_boost,
        save.supernova_elapsed_ms,
    );
    game.catalog.restore_purchased(&save.purchased);
    game.view.rng_state = save.rng_state;
}

/// localStorage handle. WASM only.
#[cfg(target_arch = "wasm32")]
fn get_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

/// Persist the game to localStorage. Failures log to the console and are
/// otherwise ignored.
#[cfg(target_arch = "wasm32")]
pub fn save_game(game: &StellarGame) {
    let save_data = extract_save(game);
    let json = match serde_json::to_string(&save_data) {
        Ok(j) => j,
        Err(e) => {
            web_sys::console::warn_1(
                &format!("Stellar Clicker: failed to serialize save: {e}").into(),
            );
            return;
        }
    };

    if let Some(storage) = get_storage() {
        if let Err(e) = storage.set_item(STORAGE_KEY, &json) {
            web_sys::console::warn_1(
                &format!("Stellar Clicker: failed to write localStorage: {e:?}").into(),
            );
        }
    }
}

/// Restore the game from localStorage. Returns false (leaving the game as a
/// new run) when there is no save, the save is corrupt, or the version is
/// too old.
#[cfg(target_arch = "wasm32")]
pub fn load_game(game: &mut StellarGame) -> bool {
    let storage = match get_storage() {
        Some(s) => s,
        None => return false,
    };

    let json = match storage.get_item(STORAGE_KEY) {
        Ok(Some(j)) => j,
        _ => return false,
    };

    let save_data: SaveData = match serde_json::from_str(&json) {
        Ok(d) => d,
        Err(e) => {
            web_sys::console::warn_1(
                &format!("Stellar Clicker: failed to parse save (discarding): {e}").into(),
            );
            let _ = storage.remove_item(STORAGE_KEY);
            return false;
        }
    };

    if save_data.version < MIN_COMPATIBLE_VERSION {
        web_sys::console::log_1(
            &format!(
                "Stellar Clicker: save too old (saved={}, min_compatible={}), starting fresh.",
                save_data.version, MIN_COMPATIBLE_VERSION
            )
            .into(),
        );
        let _ = storage.remove_item(STORAGE_KEY);
        return false;
    }

    apply_save(game, &save_data.game);
    true
}

/// Delete the saved game.
#[cfg(target_arch = "wasm32")]
pub fn delete_save() {
    if let Some(storage) = get_storage() {
        let _ = storage.remove_item(STORAGE_KEY);
    }
}
