//! Upgrade catalog: the fixed table of purchasable upgrades and the
//! purchased-set bookkeeping.
//!
//! Effects are plain data rather than callbacks so they can be listed in the
//! UI, replayed on save restore, and checked for sanity in tests.

use super::error::GameError;
use super::evolution::{EvolutionEngine, RateTarget, Stage};
use super::resources::{ResourceKind, ResourceLedger};

/// What an upgrade does when purchased.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UpgradeEffect {
    /// Multiply one production stream's rate multiplier by `factor`.
    Scale { target: RateTarget, factor: f64 },
}

/// A catalog entry. All fields are static; runtime state (purchased or not)
/// lives in [`UpgradeCatalog`].
#[derive(Debug)]
pub struct UpgradeDef {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// First stage at which the upgrade shows up for sale.
    pub tier: Stage,
    pub cost: &'static [(ResourceKind, f64)],
    pub effects: &'static [UpgradeEffect],
}

const SCALE_ALL_STREAMS: f64 = 1.75;

pub const CATALOG: &[UpgradeDef] = &[
    UpgradeDef {
        id: "dust_efficiency",
        name: "Dust Efficiency",
        description: "Sift the cloud more carefully. Click hydrogen x1.5.",
        tier: Stage::CosmicDust,
        cost: &[(ResourceKind::Hydrogen, 25.0)],
        effects: &[UpgradeEffect::Scale {
            target: RateTarget::ClickHydrogen,
            factor: 1.5,
        }],
    },
    UpgradeDef {
        id: "protostar_catalyst",
        name: "Protostar Catalyst",
        description: "Seed the core with heavy nuclei. All production x1.75.",
        tier: Stage::Protostar,
        cost: &[
            (ResourceKind::Hydrogen, 100.0),
            (ResourceKind::Helium, 20.0),
        ],
        effects: &[
            UpgradeEffect::Scale {
                target: RateTarget::ClickHydrogen,
                factor: SCALE_ALL_STREAMS,
            },
            UpgradeEffect::Scale {
                target: RateTarget::ClickHelium,
                factor: SCALE_ALL_STREAMS,
            },
            UpgradeEffect::Scale {
                target: RateTarget::PassiveHydrogen,
                factor: SCALE_ALL_STREAMS,
            },
            UpgradeEffect::Scale {
                target: RateTarget::PassiveHelium,
                factor: SCALE_ALL_STREAMS,
            },
        ],
    },
    UpgradeDef {
        id: "red_dwarf_stability",
        name: "Red Dwarf Stability",
        description: "Steady the fusion shell. All production x2.",
        tier: Stage::RedDwarf,
        cost: &[
            (ResourceKind::Hydrogen, 250.0),
            (ResourceKind::Helium, 75.0),
        ],
        effects: &[
            UpgradeEffect::Scale {
                target: RateTarget::ClickHydrogen,
                factor: 2.0,
            },
            UpgradeEffect::Scale {
                target: RateTarget::ClickHelium,
                factor: 2.0,
            },
            UpgradeEffect::Scale {
                target: RateTarget::PassiveHydrogen,
                factor: 2.0,
            },
            UpgradeEffect::Scale {
                target: RateTarget::PassiveHelium,
                factor: 2.0,
            },
        ],
    },
    UpgradeDef {
        id: "yellow_star_mastery",
        name: "Yellow Star Mastery",
        description: "Balance the main sequence. All production x2.",
        tier: Stage::YellowStar,
        cost: &[
            (ResourceKind::Hydrogen, 400.0),
            (ResourceKind::Helium, 200.0),
        ],
        effects: &[
            UpgradeEffect::Scale {
                target: RateTarget::ClickHydrogen,
                factor: 2.0,
            },
            UpgradeEffect::Scale {
                target: RateTarget::ClickHelium,
                factor: 2.0,
            },
            UpgradeEffect::Scale {
                target: RateTarget::PassiveHydrogen,
                factor: 2.0,
            },
            UpgradeEffect::Scale {
                target: RateTarget::PassiveHelium,
                factor: 2.0,
            },
        ],
    },
    UpgradeDef {
        id: "blue_giant_intensity",
        name: "Blue Giant Intensity",
        description: "Burn hotter than the chart allows. All production x3.",
        tier: Stage::BlueGiant,
        cost: &[
            (ResourceKind::Hydrogen, 600.0),
            (ResourceKind::Helium, 350.0),
        ],
        effects: &[
            UpgradeEffect::Scale {
                target: RateTarget::ClickHydrogen,
                factor: 3.0,
            },
            UpgradeEffect::Scale {
                target: RateTarget::ClickHelium,
                factor: 3.0,
            },
            UpgradeEffect::Scale {
                target: RateTarget::PassiveHydrogen,
                factor: 3.0,
            },
            UpgradeEffect::Scale {
                target: RateTarget::PassiveHelium,
                factor: 3.0,
            },
        ],
    },
    UpgradeDef {
        id: "accretion_mastery",
        name: "Accretion Mastery",
        description: "Feed the disk without losing mass. Passive production x2.5.",
        tier: Stage::BlackHole,
        cost: &[
            (ResourceKind::Hydrogen, 2000.0),
            (ResourceKind::Helium, 1500.0),
        ],
        effects: &[
            UpgradeEffect::Scale {
                target: RateTarget::PassiveHydrogen,
                factor: 2.5,
            },
            UpgradeEffect::Scale {
                target: RateTarget::PassiveHelium,
                factor: 2.5,
            },
        ],
    },
];

/// Tracks which catalog entries have been bought this run.
#[derive(Clone, Debug)]
pub struct UpgradeCatalog {
    purchased: Vec<bool>,
}

impl UpgradeCatalog {
    pub fn new() -> Self {
        Self {
            purchased: vec![false; CATALOG.len()],
        }
    }

    /// Upgrades currently offered for sale: unlocked at or below `stage` and
    /// not yet purchased, in fixed catalog order.
    pub fn available(&self, stage: Stage) -> impl Iterator<Item = &'static UpgradeDef> + '_ {
        CATALOG
            .iter()
            .enumerate()
            .filter(move |(i, def)| def.tier <= stage && !self.purchased[*i])
            .map(|(_, def)| def)
    }

    pub fn is_purchased(&self, id: &str) -> bool {
        CATALOG
            .iter()
            .position(|def| def.id == id)
            .map(|i| self.purchased[i])
            .unwrap_or(false)
    }

    /// Ids of purchased upgrades, for the save format.
    pub fn purchased_ids(&self) -> Vec<String> {
        CATALOG
            .iter()
            .enumerate()
            .filter(|(i, _)| self.purchased[*i])
            .map(|(_, def)| def.id.to_string())
            .collect()
    }

    /// Buy an upgrade: all costs are checked before any resource is debited,
    /// so a failed purchase leaves the ledger and multipliers untouched.
    pub fn purchase(
        &mut self,
        id: &str,
        ledger: &mut ResourceLedger,
        engine: &mut EvolutionEngine,
    ) -> Result<&'static UpgradeDef, GameError> {
        let index = CATALOG
            .iter()
            .position(|def| def.id == id)
            .ok_or_else(|| GameError::UnknownUpgrade(id.to_string()))?;
        if self.purchased[index] {
            return Err(GameError::AlreadyPurchased(id.to_string()));
        }
        let def = &CATALOG[index];

        for (kind, required) in def.cost {
            let available = ledger.quantity(*kind);
            if available < *required {
                return Err(GameError::InsufficientResources {
                    kind: *kind,
                    required: *required,
                    available,
                });
            }
        }
        for (kind, amount) in def.cost {
            // Cannot fail: every cost was just verified against the ledger.
            ledger.debit(*kind, *amount);
        }
        for effect in def.effects {
            match effect {
                UpgradeEffect::Scale { target, factor } => engine.apply_scale(*target, *factor),
            }
        }
        self.purchased[index] = true;
        Ok(def)
    }

    /// Re-mark purchases from a save without re-running effects or costs.
    /// Unknown ids are skipped; they come from older or newer save layouts.
    pub fn restore_purchased(&mut self, ids: &[String]) {
        for id in ids {
            if let Some(index) = CATALOG.iter().position(|def| def.id == *id) {
                self.purchased[index] = true;
            }
        }
    }

    pub fn reset(&mut self) {
        self.purchased = vec![false; CATALOG.len()];
    }
}

impl Default for UpgradeCatalog {
    fn default() -> Self {
        Self::new()
    }
}
