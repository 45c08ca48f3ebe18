//! Core journal components.
//!
//! This module provides the fundamental types for trade journaling:
//! - `Trade`: one closed position with its fee-adjusted P/L.
//! - `Ledger`: the authoritative account balance and profit goal.
//! - `TradingDay`: a bounded session bracketing a subset of trades.
//! - `Journal`: the owned aggregate tying all of the above together.

mod day;
mod ledger;
mod trade;

use std::collections::{VecDeque, vec_deque::Iter};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    Percentage,
    analytics::Report,
    errors::{Error, Result},
};

pub use day::*;
pub use ledger::*;
pub use trade::*;

#[cfg(test)]
mod scenarios;

/// User-tunable knobs applied when trades are logged.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Fee percentage applied to the absolute raw P/L of each new trade.
    #[serde(rename = "tradeFeePercent", default)]
    pub trade_fee_percent: f64,
}

/// Read-only snapshot handed to presentation adapters.
#[derive(Debug, Clone)]
pub struct Dashboard {
    /// Current account balance.
    pub balance: f64,
    /// Percentage of the profit goal achieved by total P/L, unclamped.
    pub goal_progress: f64,
    /// Sum of P/L over all recorded trades.
    pub total_pl: f64,
    /// Percentage of winning trades, in `[0, 100]`.
    pub win_rate: f64,
    /// The five most recent trades.
    pub recent_trades: Vec<Trade>,
    /// Full derived-metrics report.
    pub report: Report,
    /// Running statistics of the active day, if one is in progress.
    pub active_day: Option<DayStats>,
    /// Closed trading days, most recent first.
    pub day_history: Vec<TradingDay>,
}

/// The trading journal: trades, balance ledger, trading days and settings
/// held as one owned aggregate.
///
/// Every mutation runs synchronously to completion; wrap the journal in a
/// mutex (or confine it to one owner) when sharing across threads.
#[derive(Debug, Clone)]
pub struct Journal {
    ledger: Ledger,
    trades: VecDeque<Trade>,
    days: VecDeque<TradingDay>,
    active_day: Option<TradingDay>,
    settings: Settings,
    last_id: u64,
}

impl std::ops::Deref for Journal {
    type Target = Ledger;

    fn deref(&self) -> &Self::Target {
        &self.ledger
    }
}

impl Journal {
    /// Creates an empty journal with the given starting balance.
    pub fn new(initial_balance: f64) -> Self {
        Self {
            ledger: Ledger::new(initial_balance),
            trades: VecDeque::new(),
            days: VecDeque::new(),
            active_day: None,
            settings: Settings::default(),
            last_id: 0,
        }
    }

    pub(crate) fn from_parts(
        ledger: Ledger,
        trades: VecDeque<Trade>,
        days: VecDeque<TradingDay>,
        active_day: Option<TradingDay>,
        settings: Settings,
    ) -> Self {
        let last_id = trades
            .iter()
            .map(Trade::id)
            .chain(days.iter().map(TradingDay::id))
            .chain(active_day.iter().map(TradingDay::id))
            .max()
            .unwrap_or(0);
        Self {
            ledger,
            trades,
            days,
            active_day,
            settings,
            last_id,
        }
    }

    /// Returns an iterator over all trades, most recent first.
    pub fn trades(&self) -> Iter<'_, Trade> {
        self.trades.iter()
    }

    /// Looks up a trade by identifier.
    pub fn trade(&self, id: u64) -> Option<&Trade> {
        self.trades.iter().find(|t| t.id() == id)
    }

    /// Returns the trades matching the given filter, in current order.
    pub fn filtered_trades(&self, filter: &TradeFilter) -> Vec<&Trade> {
        self.trades.iter().filter(|t| filter.matches(t)).collect()
    }

    /// Returns an iterator over the closed trading days, most recent first.
    pub fn days(&self) -> Iter<'_, TradingDay> {
        self.days.iter()
    }

    /// Returns the active trading day, if one is in progress.
    pub fn active_day(&self) -> Option<&TradingDay> {
        self.active_day.as_ref()
    }

    /// Returns the current settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Returns the sum of P/L over all recorded trades.
    pub fn total_pl(&self) -> f64 {
        self.trades.iter().map(Trade::pl).sum()
    }

    /// Logs a new trade.
    ///
    /// Validates the draft, computes the fee-adjusted P/L, advances the
    /// balance, associates the trade with the active day (if any) and stores
    /// it at the front of the collection. Returns the stored trade.
    ///
    /// ### Errors
    /// Validation errors leave the journal untouched.
    pub fn log_trade(&mut self, draft: TradeDraft) -> Result<Trade> {
        if !draft.entry.is_finite() || draft.entry <= 0.0 {
            return Err(Error::NonPositiveEntryPrice(draft.entry));
        }
        if !draft.exit.is_finite() || draft.exit <= 0.0 {
            return Err(Error::NonPositiveExitPrice(draft.exit));
        }
        if draft.size == 0 {
            return Err(Error::ZeroSize);
        }

        let pl = compute_pl(
            draft.side,
            draft.entry,
            draft.exit,
            draft.size,
            self.settings.trade_fee_percent,
        );
        let id = self.next_id();
        let date = draft.date.unwrap_or_else(Utc::now);
        let mut trade = Trade::new(id, date, draft, pl);

        let next_number = self.next_day_number();
        if let Some(day) = self.active_day.as_mut() {
            if day.number().is_none() {
                day.set_number(next_number);
            }
            trade.set_day_number(day.number());
            day.push_trade(id);
        }

        self.ledger.adjust(pl);
        self.trades.push_front(trade);
        self.recompute_derived();
        debug!(id, pl, balance = self.ledger.balance(), "trade logged");

        Ok(self.trades.front().cloned().expect("just pushed to the front"))
    }

    /// Deletes a trade by identifier, reversing its balance effect and
    /// pruning it from every trading day. Closed days whose trade set shrank
    /// get their end balance re-derived from the remaining member trades.
    /// Returns the removed trade.
    pub fn delete_trade(&mut self, id: u64) -> Result<Trade> {
        let idx = self
            .trades
            .iter()
            .position(|t| t.id() == id)
            .ok_or(Error::TradeNotFound(id))?;
        let trade = self.trades.remove(idx).ok_or(Error::TradeNotFound(id))?;

        self.ledger.adjust(-trade.pl());
        if let Some(day) = self.active_day.as_mut() {
            day.remove_trade(id);
        }
        for day in self.days.iter_mut() {
            day.remove_trade(id);
        }
        self.recompute_closed_days();
        self.recompute_derived();
        debug!(id, pl = trade.pl(), balance = self.ledger.balance(), "trade deleted");
        Ok(trade)
    }

    /// Starts a new trading day, snapshotting the current balance minus the
    /// given allocation as the day's starting capital.
    ///
    /// ### Errors
    /// `DayAlreadyActive` when a day is in progress, `NegativeAllocation`
    /// for a negative allocation. Neither mutates the journal.
    pub fn start_day(&mut self, allocation: f64) -> Result<&TradingDay> {
        if self.active_day.is_some() {
            return Err(Error::DayAlreadyActive);
        }
        if !allocation.is_finite() || allocation < 0.0 {
            return Err(Error::NegativeAllocation(allocation));
        }

        let id = self.next_id();
        let start_balance = self.ledger.balance() - allocation;
        let day = TradingDay::new(id, Utc::now(), start_balance);
        info!(id, start_balance, "trading day started");
        Ok(&*self.active_day.insert(day))
    }

    /// Ends the active trading day.
    ///
    /// Snapshots the current balance as the end balance, assigns the day
    /// number if still unset, back-fills the day number onto every member
    /// trade and moves the day to the front of the history. Returns the
    /// closed day's statistics.
    pub fn end_day(&mut self) -> Result<DayStats> {
        let mut day = self.active_day.take().ok_or(Error::NoActiveDay)?;

        if day.number().is_none() {
            let number = self.next_day_number();
            day.set_number(number);
        }
        let stats = day.close(self.ledger.balance());
        for trade in self.trades.iter_mut() {
            if day.contains_trade(trade.id()) {
                trade.set_day_number(day.number());
            }
        }
        info!(
            id = day.id(),
            number = day.number(),
            summary = %stats,
            "trading day ended"
        );
        self.days.push_front(day);
        Ok(stats)
    }

    /// Deletes a closed trading day from history, cascading to every trade
    /// whose day number matches and reversing their cumulative P/L from the
    /// balance. A no-op when the id is unknown.
    pub fn delete_day(&mut self, id: u64) {
        let Some(idx) = self.days.iter().position(|d| d.id() == id) else {
            return;
        };
        let Some(day) = self.days.remove(idx) else {
            return;
        };

        if let Some(number) = day.number() {
            let removed_pl: f64 = self
                .trades
                .iter()
                .filter(|t| t.day_number() == Some(number))
                .map(Trade::pl)
                .sum();
            self.trades.retain(|t| t.day_number() != Some(number));
            if removed_pl != 0.0 {
                self.ledger.adjust(-removed_pl);
            }
            self.recompute_derived();
        }
        info!(id, number = day.number(), "trading day deleted");
    }

    /// Applies optional settings overrides in one call: an absolute balance,
    /// a new trade fee percentage and a profit goal (non-positive clears it).
    /// Already-recorded trades keep the P/L computed with the old fee.
    pub fn update_settings(
        &mut self,
        balance: Option<f64>,
        fee_percent: Option<f64>,
        goal: Option<f64>,
    ) {
        if let Some(balance) = balance {
            self.ledger.set_balance(balance);
            self.recompute_derived();
        }
        if let Some(fee_percent) = fee_percent {
            self.settings.trade_fee_percent = fee_percent;
        }
        if let Some(goal) = goal {
            self.ledger.set_goal(goal);
        }
    }

    /// Builds the read-only snapshot consumed by presentation adapters.
    pub fn dashboard(&self) -> Dashboard {
        let report = Report::from(self);
        let total_pl = report.total_pl();
        Dashboard {
            balance: self.ledger.balance(),
            goal_progress: self.ledger.goal_progress_percent(total_pl),
            total_pl,
            win_rate: report.win_rate(),
            recent_trades: self.trades.iter().take(5).cloned().collect(),
            report,
            active_day: self
                .active_day
                .as_ref()
                .map(|d| d.stats(self.ledger.balance())),
            day_history: self.days.iter().cloned().collect(),
        }
    }

    /// Assigns a unique, strictly increasing identifier. Millisecond
    /// timestamps, bumped past the previous id on collision.
    fn next_id(&mut self) -> u64 {
        let now = Utc::now().timestamp_millis().max(0) as u64;
        self.last_id = now.max(self.last_id + 1);
        self.last_id
    }

    /// The next 1-based day label: one past the highest number ever assigned
    /// in history. Numbers are never reused, even after deletions.
    fn next_day_number(&self) -> u32 {
        self.days
            .iter()
            .filter_map(TradingDay::number)
            .max()
            .unwrap_or(0)
            + 1
    }

    /// Refreshes each trade's percent change against the current balance.
    ///
    /// This is a documented approximation: the reference is today's balance,
    /// not the balance at the time of the trade. Reconstructing historical
    /// balances from the trade log would double-count across add/delete.
    fn recompute_derived(&mut self) {
        let balance = self.ledger.balance();
        let reference = if balance == 0.0 { 1.0 } else { balance };
        for trade in self.trades.iter_mut() {
            trade.set_percent_change((trade.pl() / reference * 100.0).round2());
        }
    }

    /// Re-derives every closed day's end balance from the P/L of its
    /// remaining member trades, keyed by trade id membership.
    fn recompute_closed_days(&mut self) {
        let trades = &self.trades;
        for day in self.days.iter_mut() {
            let day_pl: f64 = trades
                .iter()
                .filter(|t| day.contains_trade(t.id()))
                .map(|t| t.pl())
                .sum();
            day.recompute(day_pl);
        }
    }
}
