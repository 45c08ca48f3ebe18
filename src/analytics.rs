//! Derived metrics for the trading journal.
//!
//! This module provides tools to calculate:
//! - Win rate and money-won percent
//! - Average and largest win/loss
//! - Goal progress
//! - Trades needed to reach the goal
//!
//! A [`Report`] is a pure snapshot: building one never mutates the journal,
//! so it is safe to recompute after every render.

use std::fmt;

use crate::Percentage;
use crate::journal::{Journal, Trade, TradeSide};

/// A collection of metrics derived from a journal snapshot.
///
/// `Report` copies the per-trade P/L values, the current balance, the goal
/// and the most recent trade's return rate out of the journal, then answers
/// every analytics question from those copies alone.
#[derive(Debug, Clone)]
pub struct Report {
    entries: Vec<(TradeSide, f64)>,
    balance: f64,
    goal: Option<f64>,
    last_rate: Option<f64>,
}

impl From<&Journal> for Report {
    fn from(journal: &Journal) -> Self {
        let entries = journal.trades().map(|t| (t.side(), t.pl())).collect();
        let last_rate = journal.trades().next().map(fallback_rate);
        Self {
            entries,
            balance: journal.balance(),
            goal: journal.goal(),
            last_rate,
        }
    }
}

/// The assumed per-trade return rate: the trade's recorded percent change,
/// falling back to P/L over notional when none was recorded.
fn fallback_rate(trade: &Trade) -> f64 {
    match trade.percent_change() {
        Some(rate) => rate,
        None => {
            let notional = trade.entry() * trade.size() as f64;
            if notional != 0.0 {
                trade.pl() / notional * 100.0
            } else {
                0.0
            }
        }
    }
}

impl Report {
    /// Creates a report from raw parts; `entries` are `(side, pl)` pairs,
    /// most recent first.
    pub fn new(
        entries: Vec<(TradeSide, f64)>,
        balance: f64,
        goal: Option<f64>,
        last_rate: Option<f64>,
    ) -> Self {
        Self {
            entries,
            balance,
            goal,
            last_rate,
        }
    }

    /// Returns the balance the report was built against.
    pub fn balance(&self) -> f64 {
        self.balance
    }

    /// Returns the number of recorded trades.
    pub fn trade_count(&self) -> usize {
        self.entries.len()
    }

    /// Returns the number of long trades.
    pub fn long_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|(side, _)| *side == TradeSide::Long)
            .count()
    }

    /// Returns the number of short trades.
    pub fn short_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|(side, _)| *side == TradeSide::Short)
            .count()
    }

    /// Returns the sum of P/L over all trades.
    pub fn total_pl(&self) -> f64 {
        self.entries.iter().map(|(_, pl)| pl).sum()
    }

    /// Returns the sum of P/L over winning trades.
    pub fn total_won(&self) -> f64 {
        self.entries
            .iter()
            .map(|(_, pl)| *pl)
            .filter(|pl| *pl > 0.0)
            .sum()
    }

    /// Returns the absolute sum of P/L over losing trades.
    pub fn total_lost(&self) -> f64 {
        self.entries
            .iter()
            .map(|(_, pl)| *pl)
            .filter(|pl| *pl < 0.0)
            .sum::<f64>()
            .abs()
    }

    /// Computes the win rate as a percentage of winning trades,
    /// zero when there are no trades.
    pub fn win_rate(&self) -> f64 {
        if self.entries.is_empty() {
            return 0.0;
        }
        let winning = self.entries.iter().filter(|(_, pl)| *pl > 0.0).count();
        (winning as f64 / self.entries.len() as f64) * 100.0
    }

    /// Computes the mean P/L over winning trades, zero when there are none.
    pub fn average_win(&self) -> f64 {
        mean(self.entries.iter().map(|(_, pl)| *pl).filter(|pl| *pl > 0.0))
    }

    /// Computes the mean P/L over losing trades, zero when there are none.
    pub fn average_loss(&self) -> f64 {
        mean(self.entries.iter().map(|(_, pl)| *pl).filter(|pl| *pl < 0.0))
    }

    /// Returns the largest winning P/L, zero when there are no winners.
    pub fn largest_win(&self) -> f64 {
        self.entries
            .iter()
            .map(|(_, pl)| *pl)
            .filter(|pl| *pl > 0.0)
            .fold(0.0, f64::max)
    }

    /// Returns the largest losing P/L (the most negative value),
    /// zero when there are no losers.
    pub fn largest_loss(&self) -> f64 {
        self.entries
            .iter()
            .map(|(_, pl)| *pl)
            .filter(|pl| *pl < 0.0)
            .fold(0.0, f64::min)
    }

    /// Computes the share of money won over total money moved,
    /// zero when nothing was won or lost.
    pub fn money_win_percent(&self) -> f64 {
        let won = self.total_won();
        let lost = self.total_lost();
        if won + lost == 0.0 {
            return 0.0;
        }
        won / (won + lost) * 100.0
    }

    /// Returns the percentage of the goal achieved by total P/L,
    /// zero when no goal is set. Not clamped.
    pub fn goal_progress(&self) -> f64 {
        match self.goal {
            Some(goal) => self.total_pl() / goal * 100.0,
            None => 0.0,
        }
    }

    /// Projects how many trades are needed to reach the goal, assuming each
    /// future trade returns the most recent trade's rate.
    ///
    /// Returns `0.0` when the goal is met (or not set) and `f64::INFINITY`
    /// when no trades exist or the assumed rate is not positive.
    pub fn trades_needed_for_goal(&self) -> f64 {
        let Some(goal) = self.goal else {
            return 0.0;
        };
        if goal <= self.balance {
            return 0.0;
        }
        let Some(rate) = self.last_rate else {
            return f64::INFINITY;
        };
        if rate <= 0.0 {
            return f64::INFINITY;
        }
        let per_trade = self.balance.percent_of(rate);
        if per_trade <= 0.0 {
            return f64::INFINITY;
        }
        ((goal - self.balance) / per_trade).ceil()
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0u32), |(sum, count), v| (sum + v, count + 1));
    if count == 0 { 0.0 } else { sum / count as f64 }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Journal Report ===")?;
        writeln!(f, "Balance: {:.2}", self.balance)?;
        writeln!(f, "Total P/L: {:.2}", self.total_pl())?;
        writeln!(f, "Trades: {} ({} long / {} short)", self.trade_count(), self.long_count(), self.short_count())?;
        writeln!(f, "Win Rate: {:.1}%", self.win_rate())?;
        writeln!(f, "Average Win: {:.2} / Average Loss: {:.2}", self.average_win(), self.average_loss())?;
        writeln!(f, "Largest Win: {:.2} / Largest Loss: {:.2}", self.largest_win(), self.largest_loss())?;
        writeln!(f, "Money Won: {:.1}%", self.money_win_percent())?;
        writeln!(f, "Goal Progress: {:.1}%", self.goal_progress())?;
        let needed = self.trades_needed_for_goal();
        if needed.is_infinite() {
            writeln!(f, "Trades Needed: N/A")
        } else {
            writeln!(f, "Trades Needed: {needed:.0}")
        }
    }
}

#[cfg(test)]
use TradeSide::{Long, Short};

#[cfg(test)]
fn report(entries: Vec<(TradeSide, f64)>) -> Report {
    Report::new(entries, 1000.0, None, None)
}

#[cfg(test)]
#[test]
fn win_rate_counts_positive_trades() {
    let report = report(vec![(Long, 20.0), (Short, -10.0)]);
    assert_eq!(report.win_rate(), 50.0);
}

#[cfg(test)]
#[test]
fn win_rate_no_trades() {
    assert_eq!(report(vec![]).win_rate(), 0.0);
}

#[cfg(test)]
#[test]
fn win_rate_all_winning() {
    let report = report(vec![(Long, 20.0), (Long, 5.0)]);
    assert_eq!(report.win_rate(), 100.0);
}

#[cfg(test)]
#[test]
fn averages_over_empty_subsets_are_zero() {
    let report = report(vec![(Long, 20.0)]);
    assert_eq!(report.average_win(), 20.0);
    assert_eq!(report.average_loss(), 0.0);
    assert_eq!(report.largest_loss(), 0.0);
}

#[cfg(test)]
#[test]
fn averages_and_extremes() {
    let report = report(vec![(Long, 20.0), (Long, 10.0), (Short, -5.0), (Short, -15.0)]);
    assert_eq!(report.average_win(), 15.0);
    assert_eq!(report.average_loss(), -10.0);
    assert_eq!(report.largest_win(), 20.0);
    assert_eq!(report.largest_loss(), -15.0);
}

#[cfg(test)]
#[test]
fn money_win_percent_splits_flows() {
    let report = report(vec![(Long, 30.0), (Short, -10.0)]);
    assert_eq!(report.money_win_percent(), 75.0);
    assert_eq!(report.total_won(), 30.0);
    assert_eq!(report.total_lost(), 10.0);
}

#[cfg(test)]
#[test]
fn money_win_percent_zero_denominator() {
    assert_eq!(report(vec![]).money_win_percent(), 0.0);
}

#[cfg(test)]
#[test]
fn side_distribution() {
    let report = report(vec![(Long, 1.0), (Long, 2.0), (Short, -1.0)]);
    assert_eq!(report.long_count(), 2);
    assert_eq!(report.short_count(), 1);
}

#[cfg(test)]
#[test]
fn trades_needed_zero_when_goal_met_or_unset() {
    let report = Report::new(vec![(Long, 10.0)], 1000.0, None, Some(1.0));
    assert_eq!(report.trades_needed_for_goal(), 0.0);

    let report = Report::new(vec![(Long, 10.0)], 1000.0, Some(900.0), Some(1.0));
    assert_eq!(report.trades_needed_for_goal(), 0.0);
}

#[cfg(test)]
#[test]
fn trades_needed_unreachable_without_trades_or_rate() {
    let report = Report::new(vec![], 1000.0, Some(1100.0), None);
    assert_eq!(report.trades_needed_for_goal(), f64::INFINITY);

    let report = Report::new(vec![(Long, -10.0)], 1000.0, Some(1100.0), Some(-1.0));
    assert_eq!(report.trades_needed_for_goal(), f64::INFINITY);
}

#[cfg(test)]
#[test]
fn trades_needed_projection() {
    // 100.0 remaining at 1% of 1000.0 per trade = 10 trades
    let report = Report::new(vec![(Long, 10.0)], 1000.0, Some(1100.0), Some(1.0));
    assert_eq!(report.trades_needed_for_goal(), 10.0);

    // ceil rounds partial trades up
    let report = Report::new(vec![(Long, 10.0)], 1000.0, Some(1105.0), Some(1.0));
    assert_eq!(report.trades_needed_for_goal(), 11.0);
}

#[cfg(test)]
#[test]
fn goal_progress_from_total_pl() {
    let report = Report::new(vec![(Long, 50.0)], 1000.0, Some(200.0), None);
    assert_eq!(report.goal_progress(), 25.0);
}
