//! Remaining-budget bookkeeping.

/// Budget every player starts with.
pub const MAX_FUNDS: i64 = 9000;

/// Tracks the funds left after paying for the selected skins.
///
/// There is no floor: the balance may go negative and is only rejected when
/// the player tries to leave the weapon page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FundsLedger {
    funds: i64,
}

impl Default for FundsLedger {
    fn default() -> Self {
        Self { funds: MAX_FUNDS }
    }
}

impl FundsLedger {
    /// Ledger holding the full budget.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current balance.
    pub fn funds(&self) -> i64 {
        self.funds
    }

    /// Amount already spent.
    pub fn spent(&self) -> i64 {
        MAX_FUNDS - self.funds
    }

    /// Add `delta` to the balance (negative to charge).
    pub fn apply(&mut self, delta: i64) {
        self.funds += delta;
    }

    /// Charge the price of a weapon.
    pub fn charge(&mut self, price: u32) {
        self.apply(-i64::from(price));
    }

    /// Give back the price of a weapon.
    pub fn refund(&mut self, price: u32) {
        self.apply(i64::from(price));
    }

    /// Back to [`MAX_FUNDS`].
    pub fn reset(&mut self) {
        self.funds = MAX_FUNDS;
    }

    /// Whether more was spent than the budget allows.
    pub fn is_over_budget(&self) -> bool {
        self.funds < 0
    }

    /// Whether `price` fits in the remaining balance.
    pub fn can_afford(&self, price: u32) -> bool {
        i64::from(price) <= self.funds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn charges_and_refunds() {
        let mut ledger = FundsLedger::new();
        ledger.charge(650);
        ledger.charge(3200);
        assert_eq!(ledger.funds(), 5150);
        assert_eq!(ledger.spent(), 3850);
        ledger.refund(3200);
        assert_eq!(ledger.funds(), 8350);
    }

    #[test]
    fn balance_may_go_negative() {
        let mut ledger = FundsLedger::new();
        ledger.apply(-9500);
        assert_eq!(ledger.funds(), -500);
        assert!(ledger.is_over_budget());
        assert!(!ledger.can_afford(0));
        ledger.reset();
        assert_eq!(ledger.funds(), MAX_FUNDS);
        assert!(!ledger.is_over_budget());
    }

    #[test]
    fn affordability_is_inclusive() {
        let mut ledger = FundsLedger::new();
        ledger.apply(-8000);
        assert!(ledger.can_afford(1000));
        assert!(!ledger.can_afford(1050));
    }
}
