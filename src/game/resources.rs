//! Resource ledger: the quantities of hydrogen and helium the player holds.

/// Kinds of fusable matter the celestial object accumulates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Hydrogen,
    Helium,
}

impl ResourceKind {
    /// All resource kinds in display order.
    pub fn all() -> &'static [ResourceKind] {
        &[ResourceKind::Hydrogen, ResourceKind::Helium]
    }

    /// Display name.
    pub fn name(&self) -> &'static str {
        match self {
            ResourceKind::Hydrogen => "Hydrogen",
            ResourceKind::Helium => "Helium",
        }
    }

    /// Short element symbol for compact HUD labels.
    pub fn symbol(&self) -> &'static str {
        match self {
            ResourceKind::Hydrogen => "H",
            ResourceKind::Helium => "He",
        }
    }
}

/// Current resource quantities. Quantities never go negative: purchases are
/// rejected up front rather than clamped after the fact.
#[derive(Clone, Debug, Default)]
pub struct ResourceLedger {
    hydrogen: f64,
    helium: f64,
}

impl ResourceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current quantity of a resource kind.
    pub fn quantity(&self, kind: ResourceKind) -> f64 {
        match kind {
            ResourceKind::Hydrogen => self.hydrogen,
            ResourceKind::Helium => self.helium,
        }
    }

    /// Add to a resource. `amount` must be non-negative; click and passive
    /// accrual only ever produce, never consume.
    pub fn credit(&mut self, kind: ResourceKind, amount: f64) {
        debug_assert!(amount >= 0.0, "credit with negative amount: {amount}");
        *self.slot_mut(kind) += amount;
    }

    /// Subtract from a resource. Returns false and leaves the ledger untouched
    /// when the balance is insufficient.
    pub fn debit(&mut self, kind: ResourceKind, amount: f64) -> bool {
        let slot = self.slot_mut(kind);
        if *slot < amount {
            return false;
        }
        *slot -= amount;
        true
    }

    /// Zero out both resources (full game reset).
    pub fn reset(&mut self) {
        self.hydrogen = 0.0;
        self.helium = 0.0;
    }

    /// Overwrite a quantity directly. Used by save restore; negative or
    /// non-finite values from a corrupt save are replaced with 0.
    pub fn restore(&mut self, kind: ResourceKind, amount: f64) {
        let amount = if amount.is_finite() && amount >= 0.0 {
            amount
        } else {
            0.0
        };
        *self.slot_mut(kind) = amount;
    }

    fn slot_mut(&mut self, kind: ResourceKind) -> &mut f64 {
        match kind {
            ResourceKind::Hydrogen => &mut self.hydrogen,
            ResourceKind::Helium => &mut self.helium,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_ledger_is_empty() {
        let ledger = ResourceLedger::new();
        assert_eq!(ledger.quantity(ResourceKind::Hydrogen), 0.0);
        assert_eq!(ledger.quantity(ResourceKind::Helium), 0.0);
    }

    #[test]
    fn credit_accumulates() {
        let mut ledger = ResourceLedger::new();
        ledger.credit(ResourceKind::Hydrogen, 2.5);
        ledger.credit(ResourceKind::Hydrogen, 1.5);
        assert!((ledger.quantity(ResourceKind::Hydrogen) - 4.0).abs() < 1e-9);
        assert_eq!(ledger.quantity(ResourceKind::Helium), 0.0);
    }

    #[test]
    fn debit_success_subtracts() {
        let mut ledger = ResourceLedger::new();
        ledger.credit(ResourceKind::Helium, 10.0);
        assert!(ledger.debit(ResourceKind::Helium, 4.0));
        assert!((ledger.quantity(ResourceKind::Helium) - 6.0).abs() < 1e-9);
    }

    #[test]
    fn debit_insufficient_leaves_ledger_unchanged() {
        let mut ledger = ResourceLedger::new();
        ledger.credit(ResourceKind::Hydrogen, 9.0);
        assert!(!ledger.debit(ResourceKind::Hydrogen, 10.0));
        assert!((ledger.quantity(ResourceKind::Hydrogen) - 9.0).abs() < 1e-9);
    }

    #[test]
    fn debit_exact_balance_reaches_zero() {
        let mut ledger = ResourceLedger::new();
        ledger.credit(ResourceKind::Hydrogen, 10.0);
        assert!(ledger.debit(ResourceKind::Hydrogen, 10.0));
        assert_eq!(ledger.quantity(ResourceKind::Hydrogen), 0.0);
    }

    #[test]
    fn reset_zeroes_both() {
        let mut ledger = ResourceLedger::new();
        ledger.credit(ResourceKind::Hydrogen, 100.0);
        ledger.credit(ResourceKind::Helium, 50.0);
        ledger.reset();
        assert_eq!(ledger.quantity(ResourceKind::Hydrogen), 0.0);
        assert_eq!(ledger.quantity(ResourceKind::Helium), 0.0);
    }

    #[test]
    fn restore_rejects_garbage() {
        let mut ledger = ResourceLedger::new();
        ledger.restore(ResourceKind::Hydrogen, -5.0);
        assert_eq!(ledger.quantity(ResourceKind::Hydrogen), 0.0);
        ledger.restore(ResourceKind::Hydrogen, f64::NAN);
        assert_eq!(ledger.quantity(ResourceKind::Hydrogen), 0.0);
        ledger.restore(ResourceKind::Hydrogen, 42.0);
        assert_eq!(ledger.quantity(ResourceKind::Hydrogen), 42.0);
    }
}
