use serde::{Deserialize, Serialize};

/// The single authoritative account balance plus the optional profit goal.
///
/// The balance is advanced by exactly the P/L of each added trade and reduced
/// by exactly the P/L of each removed trade. It is never reconstructed by
/// re-summing trade history, which would double-count across add/delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ledger {
    balance: f64,
    goal: Option<f64>,
}

impl Ledger {
    /// Creates a new ledger with the given starting balance and no goal.
    pub fn new(balance: f64) -> Self {
        Self {
            balance,
            goal: None,
        }
    }

    pub(crate) fn from_parts(balance: f64, goal: Option<f64>) -> Self {
        Self { balance, goal }
    }

    /// Returns the current balance.
    pub fn balance(&self) -> f64 {
        self.balance
    }

    /// Adds a signed delta to the balance and returns the new value.
    /// Used for both trade add (+pl) and trade remove (-pl).
    pub(crate) fn adjust(&mut self, delta: f64) -> f64 {
        self.balance += delta;
        self.balance
    }

    /// Absolute override, used by onboarding and settings.
    pub(crate) fn set_balance(&mut self, value: f64) {
        self.balance = value;
    }

    /// Returns the profit goal, if one is set.
    pub fn goal(&self) -> Option<f64> {
        self.goal
    }

    /// Sets the profit goal. Non-positive values clear it instead.
    pub(crate) fn set_goal(&mut self, value: f64) {
        if value > 0.0 && value.is_finite() {
            self.goal = Some(value);
        } else {
            self.goal = None;
        }
    }

    /// Removes the profit goal.
    pub(crate) fn clear_goal(&mut self) {
        self.goal = None;
    }

    /// Returns the percentage of the goal achieved by the given total P/L,
    /// or zero when no goal is set. Not clamped; callers clamp for display.
    pub fn goal_progress_percent(&self, total_pl: f64) -> f64 {
        match self.goal {
            Some(goal) => total_pl / goal * 100.0,
            None => 0.0,
        }
    }
}

#[cfg(test)]
#[test]
fn adjust_moves_balance_both_ways() {
    let mut ledger = Ledger::new(1000.0);
    assert_eq!(ledger.adjust(99.0), 1099.0);
    assert_eq!(ledger.adjust(-99.0), 1000.0);
    assert_eq!(ledger.balance(), 1000.0);
}

#[cfg(test)]
#[test]
fn set_balance_overrides() {
    let mut ledger = Ledger::new(1000.0);
    ledger.adjust(50.0);
    ledger.set_balance(2500.0);
    assert_eq!(ledger.balance(), 2500.0);
}

#[cfg(test)]
#[test]
fn goal_progress_without_goal_is_zero() {
    let ledger = Ledger::new(1000.0);
    assert_eq!(ledger.goal_progress_percent(500.0), 0.0);
}

#[cfg(test)]
#[test]
fn goal_progress_is_unclamped() {
    let mut ledger = Ledger::new(1000.0);
    ledger.set_goal(200.0);
    assert_eq!(ledger.goal_progress_percent(100.0), 50.0);
    assert_eq!(ledger.goal_progress_percent(400.0), 200.0);
    assert_eq!(ledger.goal_progress_percent(-100.0), -50.0);
}

#[cfg(test)]
#[test]
fn non_positive_goal_clears() {
    let mut ledger = Ledger::new(1000.0);
    ledger.set_goal(200.0);
    assert_eq!(ledger.goal(), Some(200.0));
    ledger.set_goal(0.0);
    assert_eq!(ledger.goal(), None);

    ledger.set_goal(200.0);
    ledger.clear_goal();
    assert_eq!(ledger.goal(), None);
}
