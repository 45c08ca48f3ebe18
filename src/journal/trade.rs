use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Percentage;
use crate::errors::Error;

/// Represents the side of a trade (long or short).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeSide {
    #[serde(rename = "LONG")]
    Long,
    #[serde(rename = "SHORT")]
    Short,
}

impl fmt::Display for TradeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Long => write!(f, "LONG"),
            Self::Short => write!(f, "SHORT"),
        }
    }
}

impl FromStr for TradeSide {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "LONG" => Ok(Self::Long),
            "SHORT" => Ok(Self::Short),
            _ => Err(Error::InvalidSide(s.to_string())),
        }
    }
}

impl Default for TradeSide {
    fn default() -> Self {
        Self::Long
    }
}

/// Input fields for logging a new trade.
///
/// `date` defaults to now when not supplied. The symbol is uppercased on
/// insertion; `risk` and `notes` are informational only.
#[derive(Debug, Clone, Default)]
pub struct TradeDraft {
    pub date: Option<DateTime<Utc>>,
    pub symbol: String,
    pub side: TradeSide,
    pub entry: f64,
    pub exit: f64,
    pub size: u32,
    pub risk: Option<f64>,
    pub notes: Option<String>,
}

type D = (&'static str, TradeSide, f64, f64, u32);
impl From<D> for TradeDraft {
    fn from((symbol, side, entry, exit, size): D) -> Self {
        Self {
            symbol: symbol.to_string(),
            side,
            entry,
            exit,
            size,
            ..Self::default()
        }
    }
}

/// Represents one closed position recorded in the journal.
///
/// The profit and loss is fixed at creation time (fee settings changed later
/// do not rewrite history); `percent_change` is refreshed against the current
/// account balance after every journal mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    id: u64,
    date: DateTime<Utc>,
    symbol: String,
    #[serde(rename = "type")]
    side: TradeSide,
    entry: f64,
    exit: f64,
    size: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    risk: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    notes: Option<String>,
    pl: f64,
    #[serde(rename = "day", default)]
    day_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    percent_change: Option<f64>,
}

impl Trade {
    pub(crate) fn new(id: u64, date: DateTime<Utc>, draft: TradeDraft, pl: f64) -> Self {
        Self {
            id,
            date,
            symbol: draft.symbol.to_uppercase(),
            side: draft.side,
            entry: draft.entry,
            exit: draft.exit,
            size: draft.size,
            risk: draft.risk,
            notes: draft.notes,
            pl,
            day_number: None,
            percent_change: None,
        }
    }

    /// Returns the unique identifier assigned at creation.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Returns the moment the trade was entered.
    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    /// Returns the uppercase ticker symbol.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Returns the trade side.
    pub fn side(&self) -> TradeSide {
        self.side
    }

    /// Returns the entry price.
    pub fn entry(&self) -> f64 {
        self.entry
    }

    /// Returns the exit price.
    pub fn exit(&self) -> f64 {
        self.exit
    }

    /// Returns the position size.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Returns the optional risk amount.
    pub fn risk(&self) -> Option<f64> {
        self.risk
    }

    /// Returns the free-text notes, if any.
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// Returns the fee-adjusted profit and loss, fixed at creation.
    pub fn pl(&self) -> f64 {
        self.pl
    }

    /// Returns the trading day number this trade belongs to, if any.
    pub fn day_number(&self) -> Option<u32> {
        self.day_number
    }

    /// Returns the percent change of the account caused by this trade,
    /// measured against the current balance (a documented approximation,
    /// not the balance at the time of the trade).
    pub fn percent_change(&self) -> Option<f64> {
        self.percent_change
    }

    pub(crate) fn set_day_number(&mut self, number: Option<u32>) {
        self.day_number = number;
    }

    pub(crate) fn set_percent_change(&mut self, percent: f64) {
        self.percent_change = Some(percent);
    }
}

impl PartialEq for Trade {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

/// Computes the fee-adjusted P/L for a closed position.
///
/// The raw P/L is `(exit - entry) * size` for longs and `(entry - exit) * size`
/// for shorts. The fee is a percentage of the absolute raw P/L, subtracted
/// from profits and added to losses.
pub(crate) fn compute_pl(side: TradeSide, entry: f64, exit: f64, size: u32, fee_percent: f64) -> f64 {
    let raw = match side {
        TradeSide::Long => (exit - entry) * size as f64,
        TradeSide::Short => (entry - exit) * size as f64,
    };
    let fee = raw.abs().percent_of(fee_percent);
    if raw >= 0.0 { raw - fee } else { raw + fee }
}

/// Filter predicate over the trade collection.
///
/// All set fields must match: `symbol` as a case-insensitive substring,
/// `side` exactly, `date` as a substring of the RFC 3339 timestamp.
#[derive(Debug, Clone, Default)]
pub struct TradeFilter {
    pub symbol: Option<String>,
    pub side: Option<TradeSide>,
    pub date: Option<String>,
}

impl TradeFilter {
    pub(crate) fn matches(&self, trade: &Trade) -> bool {
        let symbol_match = self
            .symbol
            .as_ref()
            .is_none_or(|s| trade.symbol().contains(&s.to_uppercase()));
        let side_match = self.side.is_none_or(|s| trade.side() == s);
        let date_match = self
            .date
            .as_ref()
            .is_none_or(|d| trade.date().to_rfc3339().contains(d.as_str()));
        symbol_match && side_match && date_match
    }
}

#[cfg(test)]
fn sample_trade(symbol: &str, side: TradeSide, pl: f64) -> Trade {
    let draft = TradeDraft {
        symbol: symbol.to_string(),
        side,
        entry: 100.0,
        exit: 110.0,
        size: 1,
        ..TradeDraft::default()
    };
    Trade::new(1, DateTime::default(), draft, pl)
}

#[cfg(test)]
#[test]
fn long_pl_without_fee() {
    assert_eq!(compute_pl(TradeSide::Long, 100.0, 110.0, 10, 0.0), 100.0);
    assert_eq!(compute_pl(TradeSide::Long, 110.0, 100.0, 10, 0.0), -100.0);
}

#[cfg(test)]
#[test]
fn short_pl_without_fee() {
    assert_eq!(compute_pl(TradeSide::Short, 110.0, 100.0, 10, 0.0), 100.0);
    assert_eq!(compute_pl(TradeSide::Short, 100.0, 110.0, 10, 0.0), -100.0);
}

#[cfg(test)]
#[test]
fn fee_reduces_profit_and_deepens_loss() {
    // raw 100.0, fee 1% of |raw| = 1.0
    assert_eq!(compute_pl(TradeSide::Long, 100.0, 110.0, 10, 1.0), 99.0);
    // raw -100.0, fee added to the loss
    assert_eq!(compute_pl(TradeSide::Long, 110.0, 100.0, 10, 1.0), -99.0);
}

#[cfg(test)]
#[test]
fn side_parses_case_insensitive() {
    assert_eq!("long".parse::<TradeSide>().unwrap(), TradeSide::Long);
    assert_eq!("SHORT".parse::<TradeSide>().unwrap(), TradeSide::Short);
    assert!(matches!(
        "hold".parse::<TradeSide>(),
        Err(Error::InvalidSide(_))
    ));
}

#[cfg(test)]
#[test]
fn symbol_is_uppercased() {
    let trade = sample_trade("tsla", TradeSide::Long, 10.0);
    assert_eq!(trade.symbol(), "TSLA");
}

#[cfg(test)]
#[test]
fn filter_by_symbol_substring() {
    let trade = sample_trade("TSLA", TradeSide::Long, 10.0);
    let filter = TradeFilter {
        symbol: Some("tsl".to_string()),
        ..TradeFilter::default()
    };
    assert!(filter.matches(&trade));

    let filter = TradeFilter {
        symbol: Some("AAPL".to_string()),
        ..TradeFilter::default()
    };
    assert!(!filter.matches(&trade));
}

#[cfg(test)]
#[test]
fn filter_by_side_and_date() {
    let trade = sample_trade("TSLA", TradeSide::Short, -5.0);
    let filter = TradeFilter {
        side: Some(TradeSide::Short),
        date: Some("1970-01-01".to_string()),
        ..TradeFilter::default()
    };
    assert!(filter.matches(&trade));

    let filter = TradeFilter {
        side: Some(TradeSide::Long),
        ..TradeFilter::default()
    };
    assert!(!filter.matches(&trade));
}

#[cfg(test)]
#[test]
fn empty_filter_matches_everything() {
    let trade = sample_trade("TSLA", TradeSide::Long, 10.0);
    assert!(TradeFilter::default().matches(&trade));
}

#[cfg(test)]
#[test]
fn trade_serializes_with_browser_field_names() {
    let trade = sample_trade("TSLA", TradeSide::Long, 10.0);
    let json = serde_json::to_value(&trade).unwrap();
    assert_eq!(json["type"], "LONG");
    assert_eq!(json["pl"], 10.0);
    assert_eq!(json["day"], serde_json::Value::Null);
    assert!(json.get("percentChange").is_none());
}
