pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The entry price of a trade must be strictly positive and finite.
    #[error("Entry price must be positive (got: {0})")]
    NonPositiveEntryPrice(f64),

    /// The exit price of a trade must be strictly positive and finite.
    #[error("Exit price must be positive (got: {0})")]
    NonPositiveExitPrice(f64),

    /// The trade size must be at least one unit.
    #[error("Trade size must be at least 1")]
    ZeroSize,

    /// The trade side string did not parse to LONG or SHORT.
    #[error("Unknown trade side: {0}")]
    InvalidSide(String),

    /// A trading day allocation cannot be negative.
    #[error("Allocation must not be negative (got: {0})")]
    NegativeAllocation(f64),

    /// A trading day is already in progress; end it before starting another.
    #[error("A trading day is already in progress")]
    DayAlreadyActive,

    /// No trading day is in progress.
    #[error("No trading day in progress")]
    NoActiveDay,

    /// The trade was not found in the journal.
    #[error("Trade not found: {0}")]
    TradeNotFound(u64),

    /// I/O error occurred.
    // store.rs
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error occurred.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
