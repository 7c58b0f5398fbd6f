//! Evolution engine: the stage state machine and production-rate model.
//!
//! Stages only ever move forward. The Supernova stage is the one timed state:
//! its clock is an explicit elapsed-ms accumulator advanced by `advance`, so
//! the Supernova → BlackHole hand-off happens inside the regular tick and a
//! reset can never be interrupted by a stale scheduled transition.

use super::error::GameError;
use super::resources::{ResourceKind, ResourceLedger};

/// How long the supernova burns before collapsing into a black hole.
pub const SUPERNOVA_DURATION_MS: f64 = 10_000.0;

/// Evolution stages of the celestial object, in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    CosmicDust,
    Protostar,
    RedDwarf,
    YellowStar,
    BlueGiant,
    Supernova,
    BlackHole,
}

impl Stage {
    /// All stages in evolution order.
    pub fn all() -> &'static [Stage] {
        &[
            Stage::CosmicDust,
            Stage::Protostar,
            Stage::RedDwarf,
            Stage::YellowStar,
            Stage::BlueGiant,
            Stage::Supernova,
            Stage::BlackHole,
        ]
    }

    /// Display name.
    pub fn name(&self) -> &'static str {
        match self {
            Stage::CosmicDust => "Cosmic Dust",
            Stage::Protostar => "Protostar",
            Stage::RedDwarf => "Red Dwarf",
            Stage::YellowStar => "Yellow Star",
            Stage::BlueGiant => "Blue Giant",
            Stage::Supernova => "Supernova",
            Stage::BlackHole => "Black Hole",
        }
    }

    /// Stable identifier used in the save format.
    pub fn id(&self) -> &'static str {
        match self {
            Stage::CosmicDust => "cosmic_dust",
            Stage::Protostar => "protostar",
            Stage::RedDwarf => "red_dwarf",
            Stage::YellowStar => "yellow_star",
            Stage::BlueGiant => "blue_giant",
            Stage::Supernova => "supernova",
            Stage::BlackHole => "black_hole",
        }
    }

    /// Parse a save-format identifier. Unknown ids fall back to the initial
    /// stage rather than failing the restore.
    pub fn from_id(id: &str) -> Stage {
        Stage::all()
            .iter()
            .copied()
            .find(|s| s.id() == id)
            .unwrap_or(Stage::CosmicDust)
    }

    /// Base hydrogen credited per click at this stage.
    fn base_click_hydrogen(&self) -> f64 {
        match self {
            Stage::CosmicDust => 1.0,
            Stage::Protostar => 2.0,
            Stage::RedDwarf => 3.0,
            Stage::YellowStar => 5.0,
            Stage::BlueGiant => 10.0,
            Stage::Supernova => 20.0,
            Stage::BlackHole => 30.0,
        }
    }

    /// Base helium credited per click at this stage.
    fn base_click_helium(&self) -> f64 {
        match self {
            Stage::CosmicDust => 0.0,
            Stage::Protostar => 0.5,
            Stage::RedDwarf => 1.0,
            Stage::YellowStar => 2.0,
            Stage::BlueGiant => 5.0,
            Stage::Supernova => 10.0,
            Stage::BlackHole => 15.0,
        }
    }

    /// Base passive hydrogen per second at this stage.
    fn base_passive_hydrogen(&self) -> f64 {
        match self {
            Stage::CosmicDust => 0.0,
            Stage::Protostar => 0.5,
            Stage::RedDwarf => 2.0,
            Stage::YellowStar => 5.0,
            Stage::BlueGiant => 12.0,
            Stage::Supernova => 25.0,
            Stage::BlackHole => 40.0,
        }
    }

    /// Base passive helium per second at this stage.
    fn base_passive_helium(&self) -> f64 {
        match self {
            Stage::CosmicDust => 0.0,
            Stage::Protostar => 0.1,
            Stage::RedDwarf => 0.5,
            Stage::YellowStar => 1.5,
            Stage::BlueGiant => 4.0,
            Stage::Supernova => 12.0,
            Stage::BlackHole => 20.0,
        }
    }
}

/// The four independently upgradeable production streams.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RateTarget {
    ClickHydrogen,
    ClickHelium,
    PassiveHydrogen,
    PassiveHelium,
}

impl RateTarget {
    pub fn all() -> &'static [RateTarget] {
        &[
            RateTarget::ClickHydrogen,
            RateTarget::ClickHelium,
            RateTarget::PassiveHydrogen,
            RateTarget::PassiveHelium,
        ]
    }

    fn index(&self) -> usize {
        match self {
            RateTarget::ClickHydrogen => 0,
            RateTarget::ClickHelium => 1,
            RateTarget::PassiveHydrogen => 2,
            RateTarget::PassiveHelium => 3,
        }
    }
}

/// Visual sub-phase of the supernova, derived from its elapsed time.
/// Affects presentation only; production rates ignore it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SupernovaPhase {
    Expanding,
    Collapsing,
    Complete,
}

/// A stage change that happened during `advance`, for notifications.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    pub from: Stage,
    pub to: Stage,
}

/// Effective click/passive rates at this instant, for the HUD.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RateSnapshot {
    pub click_hydrogen: f64,
    pub click_helium: f64,
    pub passive_hydrogen: f64,
    pub passive_helium: f64,
}

/// Owns the current stage, the per-stream rate multipliers, and the supernova
/// boost/clock. Constructed once and passed by reference wherever needed; no
/// ambient globals.
#[derive(Clone, Debug)]
pub struct EvolutionEngine {
    stage: Stage,
    /// Indexed by `RateTarget::index()`. Each starts at 1.0 and upgrades only
    /// ever multiply upward.
    multipliers: [f64; 4],
    /// Frozen at Supernova entry from the helium held at that instant;
    /// applied to all four streams while the stage is Supernova or BlackHole.
    supernova_boost: f64,
    /// Milliseconds spent in the Supernova stage so far.
    supernova_elapsed_ms: f64,
}

impl EvolutionEngine {
    pub fn new() -> Self {
        Self {
            stage: Stage::CosmicDust,
            multipliers: [1.0; 4],
            supernova_boost: 1.0,
            supernova_elapsed_ms: 0.0,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn multiplier(&self, target: RateTarget) -> f64 {
        self.multipliers[target.index()]
    }

    pub fn supernova_boost(&self) -> f64 {
        self.supernova_boost
    }

    pub fn supernova_elapsed_ms(&self) -> f64 {
        self.supernova_elapsed_ms
    }

    /// Supernova sub-phase, or None outside the Supernova stage.
    pub fn supernova_phase(&self) -> Option<SupernovaPhase> {
        if self.stage != Stage::Supernova {
            return None;
        }
        let fraction = self.supernova_elapsed_ms / SUPERNOVA_DURATION_MS;
        Some(if fraction < 0.5 {
            SupernovaPhase::Expanding
        } else if fraction < 0.9 {
            SupernovaPhase::Collapsing
        } else {
            SupernovaPhase::Complete
        })
    }

    /// Advance the timed sub-state and evaluate the transition table against
    /// the ledger. At most one transition fires per call; returns it so the
    /// presentation layer can announce it (and run entry effects exactly once).
    pub fn advance(&mut self, delta_ms: f64, ledger: &ResourceLedger) -> Option<Transition> {
        let from = self.stage;

        if self.stage == Stage::Supernova {
            self.supernova_elapsed_ms += delta_ms;
            if self.supernova_elapsed_ms >= SUPERNOVA_DURATION_MS {
                self.stage = Stage::BlackHole;
                return Some(Transition { from, to: Stage::BlackHole });
            }
            return None;
        }

        let hydrogen = ledger.quantity(ResourceKind::Hydrogen);
        let helium = ledger.quantity(ResourceKind::Helium);

        let to = match self.stage {
            Stage::CosmicDust if hydrogen >= 50.0 => Some(Stage::Protostar),
            // Highest qualifying exit first: a player who stockpiled while
            // stuck at Protostar jumps straight to the best stage they can
            // afford instead of stepping through the ones below it.
            Stage::Protostar if hydrogen >= 300.0 && helium >= 100.0 => Some(Stage::BlueGiant),
            Stage::Protostar if hydrogen >= 250.0 && helium >= 75.0 => Some(Stage::YellowStar),
            Stage::Protostar if hydrogen >= 200.0 && helium >= 50.0 => Some(Stage::RedDwarf),
            Stage::RedDwarf if hydrogen >= 350.0 && helium >= 150.0 => Some(Stage::YellowStar),
            Stage::YellowStar if hydrogen >= 500.0 && helium >= 300.0 => Some(Stage::BlueGiant),
            Stage::BlueGiant if hydrogen >= 1000.0 && helium >= 800.0 => Some(Stage::Supernova),
            _ => None,
        };

        let to = to?;
        self.stage = to;
        if to == Stage::Supernova {
            self.supernova_boost = (2.0 + helium / 200.0).min(5.0);
            self.supernova_elapsed_ms = 0.0;
        }
        Some(Transition { from, to })
    }

    /// Effective per-click rate for a resource kind.
    pub fn click_rate(&self, kind: ResourceKind) -> f64 {
        let (base, target) = match kind {
            ResourceKind::Hydrogen => (self.stage.base_click_hydrogen(), RateTarget::ClickHydrogen),
            ResourceKind::Helium => (self.stage.base_click_helium(), RateTarget::ClickHelium),
        };
        base * self.multipliers[target.index()] * self.terminal_boost()
    }

    /// Effective passive rate (per second) for a resource kind.
    pub fn passive_rate(&self, kind: ResourceKind) -> f64 {
        let (base, target) = match kind {
            ResourceKind::Hydrogen => {
                (self.stage.base_passive_hydrogen(), RateTarget::PassiveHydrogen)
            }
            ResourceKind::Helium => (self.stage.base_passive_helium(), RateTarget::PassiveHelium),
        };
        base * self.multipliers[target.index()] * self.terminal_boost()
    }

    /// All four effective rates at once, for the HUD.
    pub fn rate_snapshot(&self) -> RateSnapshot {
        RateSnapshot {
            click_hydrogen: self.click_rate(ResourceKind::Hydrogen),
            click_helium: self.click_rate(ResourceKind::Helium),
            passive_hydrogen: self.passive_rate(ResourceKind::Hydrogen),
            passive_helium: self.passive_rate(ResourceKind::Helium),
        }
    }

    /// Radius of the clickable area around the star center, in terminal rows.
    /// The dust cloud is wide and diffuse; condensed stages are tighter.
    pub fn clickable_radius(&self) -> f64 {
        match self.stage {
            Stage::CosmicDust => 5.0,
            Stage::Protostar => 4.0,
            Stage::RedDwarf => 3.0,
            Stage::YellowStar => 3.5,
            Stage::BlueGiant => 4.5,
            Stage::Supernova => 6.0,
            Stage::BlackHole => 3.0,
        }
    }

    /// Multiply a rate multiplier by `factor`. Calling twice compounds; the
    /// purchased-once rule lives in the upgrade catalog, not here.
    pub fn boost(&mut self, target: RateTarget, factor: f64) -> Result<(), GameError> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(GameError::InvalidArgument { factor });
        }
        self.apply_scale(target, factor);
        Ok(())
    }

    /// Unchecked scale, for the catalog's compile-time-constant effects.
    pub(crate) fn apply_scale(&mut self, target: RateTarget, factor: f64) {
        self.multipliers[target.index()] *= factor;
    }

    /// Back to cosmic dust: stage, multipliers, boost, and the phase clock.
    /// Deliberately does not touch the resource ledger; a full game reset
    /// zeroes that separately.
    pub fn reset(&mut self) {
        self.stage = Stage::CosmicDust;
        self.multipliers = [1.0; 4];
        self.supernova_boost = 1.0;
        self.supernova_elapsed_ms = 0.0;
    }

    /// Restore from a save. Garbage multipliers or boost become 1.0.
    pub(crate) fn restore(
        &mut self,
        stage: Stage,
        multipliers: [f64; 4],
        supernova_boost: f64,
        supernova_elapsed_ms: f64,
    ) {
        let sane = |v: f64| if v.is_finite() && v > 0.0 { v } else { 1.0 };
        self.stage = stage;
        self.multipliers = multipliers.map(sane);
        self.supernova_boost = sane(supernova_boost);
        self.supernova_elapsed_ms = if supernova_elapsed_ms.is_finite() && supernova_elapsed_ms >= 0.0
        {
            supernova_elapsed_ms
        } else {
            0.0
        };
    }

    fn terminal_boost(&self) -> f64 {
        match self.stage {
            Stage::Supernova | Stage::BlackHole => self.supernova_boost,
            _ => 1.0,
        }
    }
}

impl Default for EvolutionEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger_with(hydrogen: f64, helium: f64) -> ResourceLedger {
        let mut ledger = ResourceLedger::new();
        ledger.credit(ResourceKind::Hydrogen, hydrogen);
        ledger.credit(ResourceKind::Helium, helium);
        ledger
    }

    #[test]
    fn starts_as_cosmic_dust() {
        let engine = EvolutionEngine::new();
        assert_eq!(engine.stage(), Stage::CosmicDust);
        assert_eq!(engine.supernova_boost(), 1.0);
    }

    #[test]
    fn dust_condenses_at_fifty_hydrogen() {
        let mut engine = EvolutionEngine::new();
        assert!(engine.advance(16.0, &ledger_with(49.9, 0.0)).is_none());
        let t = engine.advance(16.0, &ledger_with(50.0, 0.0)).unwrap();
        assert_eq!(t.from, Stage::CosmicDust);
        assert_eq!(t.to, Stage::Protostar);
    }

    #[test]
    fn one_transition_per_tick() {
        // Enough resources for the whole chain, but each tick moves one step.
        let mut engine = EvolutionEngine::new();
        let rich = ledger_with(2000.0, 1000.0);
        assert_eq!(engine.advance(16.0, &rich).unwrap().to, Stage::Protostar);
        assert_eq!(engine.advance(16.0, &rich).unwrap().to, Stage::BlueGiant);
        assert_eq!(engine.advance(16.0, &rich).unwrap().to, Stage::Supernova);
        assert!(engine.advance(16.0, &rich).is_none());
    }

    #[test]
    fn protostar_skips_to_highest_qualifying_stage() {
        let mut engine = EvolutionEngine::new();
        engine.advance(16.0, &ledger_with(50.0, 0.0));
        assert_eq!(engine.stage(), Stage::Protostar);
        // Qualifies for RedDwarf, YellowStar, and BlueGiant all at once.
        let t = engine.advance(16.0, &ledger_with(1000.0, 800.0)).unwrap();
        assert_eq!(t.to, Stage::BlueGiant);
    }

    #[test]
    fn protostar_middle_tier_exit() {
        let mut engine = EvolutionEngine::new();
        engine.advance(16.0, &ledger_with(50.0, 0.0));
        // YellowStar thresholds met, BlueGiant's helium not.
        let t = engine.advance(16.0, &ledger_with(260.0, 80.0)).unwrap();
        assert_eq!(t.to, Stage::YellowStar);
    }

    #[test]
    fn red_dwarf_direct_path_to_yellow_star() {
        let mut engine = EvolutionEngine::new();
        engine.advance(16.0, &ledger_with(50.0, 0.0));
        engine.advance(16.0, &ledger_with(200.0, 50.0));
        assert_eq!(engine.stage(), Stage::RedDwarf);
        assert!(engine.advance(16.0, &ledger_with(349.0, 150.0)).is_none());
        let t = engine.advance(16.0, &ledger_with(350.0, 150.0)).unwrap();
        assert_eq!(t.to, Stage::YellowStar);
    }

    #[test]
    fn stage_never_regresses_without_reset() {
        let mut engine = EvolutionEngine::new();
        engine.advance(16.0, &ledger_with(50.0, 0.0));
        assert_eq!(engine.stage(), Stage::Protostar);
        // Ledger drained back to nothing; the stage must hold.
        for _ in 0..10 {
            engine.advance(16.0, &ledger_with(0.0, 0.0));
        }
        assert_eq!(engine.stage(), Stage::Protostar);
    }

    #[test]
    fn supernova_boost_frozen_at_entry() {
        let mut engine = EvolutionEngine::new();
        enter_supernova(&mut engine, 800.0);
        // min(5, 2 + 800/200) = 5
        assert_eq!(engine.supernova_boost(), 5.0);
        // More helium later does not move the boost.
        engine.advance(16.0, &ledger_with(5000.0, 9999.0));
        assert_eq!(engine.supernova_boost(), 5.0);
    }

    #[test]
    fn supernova_boost_restored_below_cap() {
        // A live entry always holds >= 800 helium, which caps the boost, so
        // sub-cap values only appear via restore.
        let mut engine = EvolutionEngine::new();
        engine.restore(Stage::Supernova, [1.0; 4], 3.5, 0.0);
        assert_eq!(engine.supernova_boost(), 3.5);
        assert_eq!(engine.click_rate(ResourceKind::Hydrogen), 20.0 * 3.5);
    }

    fn enter_supernova(engine: &mut EvolutionEngine, helium_at_entry: f64) {
        assert!(helium_at_entry >= 800.0);
        engine.advance(16.0, &ledger_with(50.0, 0.0));
        engine.advance(16.0, &ledger_with(300.0, 100.0));
        assert_eq!(engine.stage(), Stage::BlueGiant);
        engine.advance(16.0, &ledger_with(1000.0, helium_at_entry));
        assert_eq!(engine.stage(), Stage::Supernova);
    }

    #[test]
    fn supernova_phases_by_elapsed_time() {
        let mut engine = EvolutionEngine::new();
        enter_supernova(&mut engine, 800.0);
        let idle = ledger_with(0.0, 0.0);
        assert_eq!(engine.supernova_phase(), Some(SupernovaPhase::Expanding));
        engine.advance(4_999.0, &idle);
        assert_eq!(engine.supernova_phase(), Some(SupernovaPhase::Expanding));
        engine.advance(1.0, &idle);
        assert_eq!(engine.supernova_phase(), Some(SupernovaPhase::Collapsing));
        engine.advance(4_000.0, &idle);
        assert_eq!(engine.supernova_phase(), Some(SupernovaPhase::Complete));
    }

    #[test]
    fn supernova_collapses_into_black_hole_once() {
        let mut engine = EvolutionEngine::new();
        enter_supernova(&mut engine, 800.0);
        let idle = ledger_with(0.0, 0.0);
        // Irregular deltas summing past the duration.
        engine.advance(3_000.0, &idle);
        engine.advance(6_900.0, &idle);
        assert_eq!(engine.stage(), Stage::Supernova);
        let t = engine.advance(200.0, &idle).unwrap();
        assert_eq!(t.from, Stage::Supernova);
        assert_eq!(t.to, Stage::BlackHole);
        // No re-trigger of the entry transition.
        assert!(engine.advance(16.0, &idle).is_none());
        assert_eq!(engine.stage(), Stage::BlackHole);
    }

    #[test]
    fn rates_match_stage_table() {
        let mut engine = EvolutionEngine::new();
        assert_eq!(engine.click_rate(ResourceKind::Hydrogen), 1.0);
        assert_eq!(engine.click_rate(ResourceKind::Helium), 0.0);
        assert_eq!(engine.passive_rate(ResourceKind::Hydrogen), 0.0);

        engine.advance(16.0, &ledger_with(50.0, 0.0));
        assert_eq!(engine.click_rate(ResourceKind::Hydrogen), 2.0);
        assert_eq!(engine.click_rate(ResourceKind::Helium), 0.5);
        assert_eq!(engine.passive_rate(ResourceKind::Hydrogen), 0.5);
        assert_eq!(engine.passive_rate(ResourceKind::Helium), 0.1);
    }

    #[test]
    fn rates_scale_with_multipliers() {
        let mut engine = EvolutionEngine::new();
        engine.boost(RateTarget::ClickHydrogen, 1.5).unwrap();
        assert_eq!(engine.click_rate(ResourceKind::Hydrogen), 1.5);
        // Other streams untouched.
        assert_eq!(engine.click_rate(ResourceKind::Helium), 0.0);
        engine.boost(RateTarget::ClickHydrogen, 2.0).unwrap();
        assert_eq!(engine.click_rate(ResourceKind::Hydrogen), 3.0);
    }

    #[test]
    fn boost_applies_in_terminal_stages() {
        let mut engine = EvolutionEngine::new();
        enter_supernova(&mut engine, 800.0);
        let boost = engine.supernova_boost();
        assert!(boost > 1.0);
        assert_eq!(engine.click_rate(ResourceKind::Hydrogen), 20.0 * boost);
        assert_eq!(engine.passive_rate(ResourceKind::Helium), 12.0 * boost);
        // Still applied after the collapse.
        engine.advance(SUPERNOVA_DURATION_MS, &ledger_with(0.0, 0.0));
        assert_eq!(engine.stage(), Stage::BlackHole);
        assert_eq!(engine.click_rate(ResourceKind::Hydrogen), 30.0 * boost);
    }

    #[test]
    fn rate_queries_are_pure() {
        let mut engine = EvolutionEngine::new();
        engine.boost(RateTarget::PassiveHelium, 3.0).unwrap();
        for kind in ResourceKind::all() {
            assert_eq!(engine.click_rate(*kind), engine.click_rate(*kind));
            assert_eq!(engine.passive_rate(*kind), engine.passive_rate(*kind));
        }
        assert_eq!(engine.rate_snapshot(), engine.rate_snapshot());
    }

    #[test]
    fn boost_rejects_non_positive_factor() {
        let mut engine = EvolutionEngine::new();
        assert!(matches!(
            engine.boost(RateTarget::ClickHydrogen, 0.0),
            Err(GameError::InvalidArgument { .. })
        ));
        assert!(engine.boost(RateTarget::ClickHydrogen, -2.0).is_err());
        assert!(engine.boost(RateTarget::ClickHydrogen, f64::NAN).is_err());
        // Multiplier unchanged by the rejected calls.
        assert_eq!(engine.multiplier(RateTarget::ClickHydrogen), 1.0);
    }

    #[test]
    fn sub_one_factor_is_allowed() {
        // factor < 1 reduces the rate; consistent with "multiplier".
        let mut engine = EvolutionEngine::new();
        engine.boost(RateTarget::ClickHydrogen, 0.5).unwrap();
        assert_eq!(engine.click_rate(ResourceKind::Hydrogen), 0.5);
    }

    #[test]
    fn reset_is_idempotent() {
        let mut engine = EvolutionEngine::new();
        enter_supernova(&mut engine, 800.0);
        engine.boost(RateTarget::ClickHelium, 4.0).unwrap();
        engine.reset();
        let after_once = engine.clone();
        engine.reset();
        assert_eq!(engine.stage(), Stage::CosmicDust);
        assert_eq!(engine.stage(), after_once.stage());
        for target in RateTarget::all() {
            assert_eq!(engine.multiplier(*target), 1.0);
            assert_eq!(engine.multiplier(*target), after_once.multiplier(*target));
        }
        assert_eq!(engine.supernova_boost(), 1.0);
        assert_eq!(engine.supernova_elapsed_ms(), 0.0);
    }

    #[test]
    fn reset_clears_pending_collapse() {
        // A reset mid-supernova must not let the old clock fire a BlackHole
        // transition on the next tick.
        let mut engine = EvolutionEngine::new();
        enter_supernova(&mut engine, 800.0);
        engine.advance(9_999.0, &ledger_with(0.0, 0.0));
        engine.reset();
        assert!(engine.advance(16.0, &ledger_with(0.0, 0.0)).is_none());
        assert_eq!(engine.stage(), Stage::CosmicDust);
    }

    #[test]
    fn stage_ids_round_trip() {
        for stage in Stage::all() {
            assert_eq!(Stage::from_id(stage.id()), *stage);
        }
        assert_eq!(Stage::from_id("garbled"), Stage::CosmicDust);
    }

    #[test]
    fn clickable_radius_per_stage() {
        let mut engine = EvolutionEngine::new();
        assert_eq!(engine.clickable_radius(), 5.0);
        engine.advance(16.0, &ledger_with(50.0, 0.0));
        assert_eq!(engine.clickable_radius(), 4.0);
    }
}
