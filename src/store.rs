//! Key-value persistence for journal state.
//!
//! The journal persists as one record per key, JSON-encoded, mirroring the
//! browser-local storage layout the format originated from. [`Storage`] is
//! the collaborator seam: [`MemoryStore`] backs tests and embedding,
//! [`FileStore`] keeps the map in a single JSON file on disk. Storage
//! failures surface as errors instead of being silently dropped.

use std::collections::{HashMap, VecDeque};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use crate::errors::Result;
use crate::journal::{Journal, Ledger, Settings, Trade, TradingDay};

/// Key holding the current balance as a two-decimal string.
pub const BALANCE_KEY: &str = "userBalance";
/// Key holding the profit goal; absent when no goal is set.
pub const GOAL_KEY: &str = "userGoal";
/// Key holding the JSON array of trades, most recent first.
pub const TRADES_KEY: &str = "trades";
/// Key holding the JSON array of closed trading days, most recent first.
pub const DAYS_KEY: &str = "tradingDays";
/// Key holding the active trading day; absent when none is in progress.
pub const CURRENT_DAY_KEY: &str = "currentTradingDay";
/// Key holding the settings object.
pub const SETTINGS_KEY: &str = "settings";

/// A persistent key-value store, one string record per key.
pub trait Storage {
    /// Reads the record stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Writes `value` under `key`, replacing any previous record.
    fn put(&mut self, key: &str, value: &str) -> Result<()>;

    /// Removes the record under `key`. Removing a missing key is not an error.
    fn delete(&mut self, key: &str) -> Result<()>;
}

/// An in-memory store for tests and ephemeral embedding.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: HashMap<String, String>,
}

impl Storage for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.records.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: &str) -> Result<()> {
        self.records.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        self.records.remove(key);
        Ok(())
    }
}

/// A store keeping the whole key-value map in one JSON file.
///
/// The file is read once at open and rewritten synchronously on every write,
/// so the on-disk state always matches the last completed mutation.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    records: HashMap<String, String>,
}

impl FileStore {
    /// Opens the store at `path`, loading existing records if the file exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let records = if path.exists() {
            let file = File::open(&path)?;
            serde_json::from_reader(BufReader::new(file))?
        } else {
            HashMap::new()
        };
        Ok(Self { path, records })
    }

    fn flush(&self) -> Result<()> {
        let file = File::create(&self.path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), &self.records)?;
        Ok(())
    }
}

impl Storage for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.records.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: &str) -> Result<()> {
        self.records.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        if self.records.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

/// Writes the full journal state to the store, one record per key.
pub fn save(journal: &Journal, store: &mut impl Storage) -> Result<()> {
    store.put(BALANCE_KEY, &format!("{:.2}", journal.balance()))?;
    match journal.goal() {
        Some(goal) => store.put(GOAL_KEY, &goal.to_string())?,
        None => store.delete(GOAL_KEY)?,
    }
    store.put(
        TRADES_KEY,
        &serde_json::to_string(&journal.trades().collect::<Vec<_>>())?,
    )?;
    store.put(
        DAYS_KEY,
        &serde_json::to_string(&journal.days().collect::<Vec<_>>())?,
    )?;
    match journal.active_day() {
        Some(day) => store.put(CURRENT_DAY_KEY, &serde_json::to_string(day)?)?,
        None => store.delete(CURRENT_DAY_KEY)?,
    }
    store.put(SETTINGS_KEY, &serde_json::to_string(journal.settings())?)?;
    Ok(())
}

/// Rebuilds a journal from the store. Missing keys fall back to an empty
/// journal with a zero balance, matching a fresh browser profile.
pub fn load(store: &impl Storage) -> Result<Journal> {
    let balance = store
        .get(BALANCE_KEY)?
        .and_then(|s| s.parse().ok())
        .unwrap_or(0.0);
    let goal = store
        .get(GOAL_KEY)?
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|g| *g > 0.0);
    let trades: VecDeque<Trade> = match store.get(TRADES_KEY)? {
        Some(raw) => serde_json::from_str(&raw)?,
        None => VecDeque::new(),
    };
    let days: VecDeque<TradingDay> = match store.get(DAYS_KEY)? {
        Some(raw) => serde_json::from_str(&raw)?,
        None => VecDeque::new(),
    };
    let active_day: Option<TradingDay> = match store.get(CURRENT_DAY_KEY)? {
        Some(raw) => Some(serde_json::from_str(&raw)?),
        None => None,
    };
    let settings: Settings = match store.get(SETTINGS_KEY)? {
        Some(raw) => serde_json::from_str(&raw)?,
        None => Settings::default(),
    };
    Ok(Journal::from_parts(
        Ledger::from_parts(balance, goal),
        trades,
        days,
        active_day,
        settings,
    ))
}
