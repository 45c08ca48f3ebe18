use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Percentage;

/// Represents one bounded trading session.
///
/// A day starts with a snapshot of the account balance (minus any allocation
/// withheld from the session's capital) and closes with the balance at end
/// time. The sequential `number` is assigned lazily: on the first trade
/// logged while active, or at end of day if no trade was logged.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradingDay {
    id: u64,
    date: DateTime<Utc>,
    #[serde(default)]
    number: Option<u32>,
    start_balance: f64,
    end_balance: Option<f64>,
    #[serde(rename = "trades", default)]
    trade_ids: Vec<u64>,
    is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    absolute_change: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    percentage_change: Option<f64>,
}

impl TradingDay {
    pub(crate) fn new(id: u64, date: DateTime<Utc>, start_balance: f64) -> Self {
        Self {
            id,
            date,
            number: None,
            start_balance,
            end_balance: None,
            trade_ids: Vec::new(),
            is_active: true,
            absolute_change: None,
            percentage_change: None,
        }
    }

    /// Returns the unique identifier assigned at creation.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Returns the moment the day was started.
    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    /// Returns the 1-based sequential day label, once assigned.
    pub fn number(&self) -> Option<u32> {
        self.number
    }

    /// Returns the balance snapshot taken at day start, minus any allocation.
    pub fn start_balance(&self) -> f64 {
        self.start_balance
    }

    /// Returns the balance at day end, or `None` while the day is active.
    pub fn end_balance(&self) -> Option<f64> {
        self.end_balance
    }

    /// Returns the identifiers of the trades logged during this day.
    pub fn trade_ids(&self) -> &[u64] {
        &self.trade_ids
    }

    /// Returns true while the day is in progress.
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Returns the dollar change recorded when the day was closed.
    pub fn absolute_change(&self) -> Option<f64> {
        self.absolute_change
    }

    /// Returns the percent change recorded when the day was closed.
    pub fn percentage_change(&self) -> Option<f64> {
        self.percentage_change
    }

    /// Returns true when the trade id belongs to this day.
    pub fn contains_trade(&self, trade_id: u64) -> bool {
        self.trade_ids.contains(&trade_id)
    }

    pub(crate) fn set_number(&mut self, number: u32) {
        self.number = Some(number);
    }

    pub(crate) fn push_trade(&mut self, trade_id: u64) {
        self.trade_ids.push(trade_id);
    }

    pub(crate) fn remove_trade(&mut self, trade_id: u64) -> bool {
        let before = self.trade_ids.len();
        self.trade_ids.retain(|id| *id != trade_id);
        self.trade_ids.len() != before
    }

    /// Computes the day statistics, using `current_balance` as the end value
    /// while the day is still active.
    pub fn stats(&self, current_balance: f64) -> DayStats {
        let end = self.end_balance.unwrap_or(current_balance);
        let absolute_change = end - self.start_balance;
        let percentage_change = if self.start_balance != 0.0 {
            self.start_balance.change_to(end)
        } else {
            0.0
        };
        DayStats {
            absolute_change,
            percentage_change,
        }
    }

    /// Closes the day at the given end balance and records its statistics.
    pub(crate) fn close(&mut self, end_balance: f64) -> DayStats {
        self.end_balance = Some(end_balance);
        self.is_active = false;
        let stats = self.stats(end_balance);
        self.absolute_change = Some(stats.absolute_change);
        self.percentage_change = Some(stats.percentage_change);
        stats
    }

    /// Re-derives the end balance from the remaining trades of this day,
    /// after a trade was deleted retroactively.
    pub(crate) fn recompute(&mut self, day_pl: f64) {
        self.close(self.start_balance + day_pl);
    }
}

/// Summary of a trading day's outcome.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayStats {
    /// End balance minus start balance.
    pub absolute_change: f64,
    /// Absolute change as a percentage of the start balance, zero when the
    /// start balance is zero.
    pub percentage_change: f64,
}

impl fmt::Display for DayStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.absolute_change >= 0.0 { "+" } else { "" };
        write!(
            f,
            "{sign}${:.2} ({:.2}%)",
            self.absolute_change, self.percentage_change
        )
    }
}

#[cfg(test)]
#[test]
fn stats_of_active_day_use_current_balance() {
    let day = TradingDay::new(1, DateTime::default(), 1000.0);
    let stats = day.stats(1100.0);
    assert_eq!(stats.absolute_change, 100.0);
    assert_eq!(stats.percentage_change, 10.0);
}

#[cfg(test)]
#[test]
fn stats_of_closed_day_ignore_current_balance() {
    let mut day = TradingDay::new(1, DateTime::default(), 1000.0);
    day.close(900.0);
    let stats = day.stats(5000.0);
    assert_eq!(stats.absolute_change, -100.0);
    assert_eq!(stats.percentage_change, -10.0);
    assert!(!day.is_active());
    assert_eq!(day.end_balance(), Some(900.0));
}

#[cfg(test)]
#[test]
fn zero_start_balance_yields_zero_percent() {
    let day = TradingDay::new(1, DateTime::default(), 0.0);
    let stats = day.stats(50.0);
    assert_eq!(stats.absolute_change, 50.0);
    assert_eq!(stats.percentage_change, 0.0);
}

#[cfg(test)]
#[test]
fn recompute_rewrites_end_balance_from_trades() {
    let mut day = TradingDay::new(1, DateTime::default(), 1000.0);
    day.close(1100.0);
    day.recompute(50.0);
    assert_eq!(day.end_balance(), Some(1050.0));
    assert_eq!(day.absolute_change(), Some(50.0));
    assert_eq!(day.percentage_change(), Some(5.0));
}

#[cfg(test)]
#[test]
fn remove_trade_reports_membership_change() {
    let mut day = TradingDay::new(1, DateTime::default(), 1000.0);
    day.push_trade(7);
    day.push_trade(9);
    assert!(day.remove_trade(7));
    assert!(!day.remove_trade(7));
    assert_eq!(day.trade_ids(), &[9]);
}

#[cfg(test)]
#[test]
fn stats_summary_formatting() {
    let positive = DayStats {
        absolute_change: 50.0,
        percentage_change: 4.55,
    };
    assert_eq!(positive.to_string(), "+$50.00 (4.55%)");

    let negative = DayStats {
        absolute_change: -50.0,
        percentage_change: -4.55,
    };
    assert_eq!(negative.to_string(), "$-50.00 (-4.55%)");
}
