//! Semantic action IDs for click targets.
//!
//! Each constant is a distinct clickable action in the UI. IDs are registered
//! during render and dispatched via `InputEvent::Click`.

// ── Core actions ────────────────────────────────────────────────
pub const CLICK_STAR: u16 = 0;
pub const TOGGLE_UPGRADES: u16 = 1;
pub const SAVE_GAME: u16 = 2;
pub const RESET_GAME: u16 = 3;

// ── Upgrade purchase (base + display index) ─────────────────────
pub const BUY_UPGRADE_BASE: u16 = 100;
