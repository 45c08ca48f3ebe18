//! # Tradelog: a single-user trading journal engine
//!
//! **Tradelog** is a Rust library implementing the stateful core of a trading
//! journal: logging closed trades, grouping them into trading days, tracking
//! a running account balance and a profit goal, and deriving the analytics a
//! dashboard needs.
//!
//! ## Core Components
//! | Component      | Description                                                                |
//! |----------------|----------------------------------------------------------------------------|
//! | **`Trade`**    | One closed position: side, entry/exit price, size and fee-adjusted P/L.    |
//! | **`Ledger`**   | The authoritative running balance and the optional profit goal.            |
//! | **`TradingDay`** | A bounded session bracketing trades with start/end balance snapshots.    |
//! | **`Journal`**  | The owned aggregate; every mutation goes through it.                       |
//! | **`Report`**   | Derived metrics: win rate, averages, goal progress, trades-to-goal.        |
//! | **`Storage`**  | Key-value persistence seam with file and in-memory backends.               |
//!
//! ## Design Rules
//! - The balance is a materialized running total: advanced by each logged
//!   trade's P/L and reversed on delete, never reconstructed by re-summing
//!   trade history (which would double-count across add/delete).
//! - A trade's P/L is fixed at creation; later fee changes never rewrite it.
//! - At most one trading day is active at a time; day numbers are strictly
//!   increasing and never reused, even after deletions.
//! - Reads are pure. Derived values (per-trade percent change, closed-day
//!   end balances) are refreshed by the mutation paths themselves.
//!
//! ## Getting Started
//! ```rust
//! use tradelog_rs::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let mut journal = Journal::new(1000.0);
//!     journal.update_settings(None, Some(1.0), Some(500.0));
//!
//!     // LONG 10 @ 100.0 -> 110.0: raw P/L 100.0, 1% fee, net 99.0
//!     let trade = journal.log_trade(("AAPL", TradeSide::Long, 100.0, 110.0, 10).into())?;
//!     assert_eq!(trade.pl(), 99.0);
//!     assert_eq!(journal.balance(), 1099.0);
//!
//!     journal.start_day(0.0)?;
//!     journal.log_trade(("TSLA", TradeSide::Short, 200.0, 195.0, 4).into())?;
//!     let stats = journal.end_day()?;
//!     assert!(stats.absolute_change > 0.0);
//!
//!     let dashboard = journal.dashboard();
//!     assert_eq!(dashboard.win_rate, 100.0);
//!     Ok(())
//! }
//! ```
//!
//! ## Persistence
//! State round-trips through any [`store::Storage`] backend as one JSON
//! record per key, compatible with the browser-local format the journal
//! originated from:
//! ```rust
//! use tradelog_rs::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let mut journal = Journal::new(1000.0);
//!     journal.log_trade(("AAPL", TradeSide::Long, 100.0, 110.0, 10).into())?;
//!
//!     let mut store = MemoryStore::default();
//!     save(&journal, &mut store)?;
//!     let restored = load(&store)?;
//!     assert_eq!(restored.balance(), journal.balance());
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//! All fallible operations return [`errors::Result`]. Validation happens
//! before any state change, so a rejected operation leaves the journal
//! exactly as it was.
//!
//! ## License
//! MIT
#![warn(missing_docs)]

/// Derived metrics: win rate, averages, goal projections.
pub mod analytics;

/// Error types for the library.
pub mod errors;

/// Core journal components: trades, ledger, trading days and the aggregate.
pub mod journal;

/// Key-value persistence backends and state (de)serialization.
pub mod store;

/// Re-exports of commonly used types and traits for convenience.
pub mod prelude {
    pub use super::*;
    pub use crate::analytics::*;
    pub use crate::errors::*;
    pub use crate::journal::*;
    pub use crate::store::*;
}

/// Trait for performing percentage-based calculations.
///
/// This trait provides the percent arithmetic the journal leans on for fee
/// deduction, day statistics and goal projections.
pub trait Percentage<Rhs = Self> {
    /// Returns the given percentage of the value
    /// (e.g., `200.0.percent_of(10.0)` is `20.0`).
    fn percent_of(self, percent: Rhs) -> Self;

    /// Returns the percentage change from the value to `new`
    /// (e.g., `100.0.change_to(110.0)` is `10.0`).
    fn change_to(self, new: Rhs) -> Self;

    /// Rounds to two decimal places.
    fn round2(self) -> Self;
}

impl Percentage for f64 {
    fn percent_of(self, percent: f64) -> f64 {
        self * (percent / 100.0)
    }

    fn change_to(self, new: f64) -> f64 {
        (new - self) / self * 100.0
    }

    fn round2(self) -> f64 {
        (self * 100.0).round() / 100.0
    }
}
