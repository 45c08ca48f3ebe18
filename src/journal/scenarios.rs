use super::*;
use TradeSide::{Long, Short};
use crate::errors::Error;

fn draft(symbol: &'static str, side: TradeSide, entry: f64, exit: f64, size: u32) -> TradeDraft {
    (symbol, side, entry, exit, size).into()
}

#[test]
fn balance_tracks_present_trades() {
    let mut journal = Journal::new(1000.0);
    let t1 = journal.log_trade(draft("AAPL", Long, 100.0, 110.0, 10)).unwrap();
    let t2 = journal.log_trade(draft("TSLA", Short, 200.0, 210.0, 5)).unwrap();
    journal.log_trade(draft("MSFT", Long, 50.0, 55.0, 4)).unwrap();

    journal.delete_trade(t2.id()).unwrap();

    let present_pl: f64 = journal.trades().map(Trade::pl).sum();
    assert_eq!(journal.balance(), 1000.0 + present_pl);
    assert_eq!(journal.trades().count(), 2);
    assert!(journal.trade(t1.id()).is_some());
    assert!(journal.trade(t2.id()).is_none());
}

#[test]
fn delete_then_relog_restores_balance() {
    let mut journal = Journal::new(1000.0);
    let trade = journal.log_trade(draft("AAPL", Long, 100.0, 110.0, 10)).unwrap();
    let after_log = journal.balance();

    journal.delete_trade(trade.id()).unwrap();
    assert_eq!(journal.balance(), 1000.0);

    journal.log_trade(draft("AAPL", Long, 100.0, 110.0, 10)).unwrap();
    assert_eq!(journal.balance(), after_log);
}

#[test]
fn delete_unknown_trade_fails() {
    let mut journal = Journal::new(1000.0);
    assert!(matches!(
        journal.delete_trade(42),
        Err(Error::TradeNotFound(42))
    ));
}

#[test]
fn validation_rejects_before_any_mutation() {
    let mut journal = Journal::new(1000.0);

    let result = journal.log_trade(draft("AAPL", Long, 0.0, 110.0, 10));
    assert!(matches!(result, Err(Error::NonPositiveEntryPrice(_))));

    let result = journal.log_trade(draft("AAPL", Long, 100.0, -1.0, 10));
    assert!(matches!(result, Err(Error::NonPositiveExitPrice(_))));

    let result = journal.log_trade(draft("AAPL", Long, 100.0, 110.0, 0));
    assert!(matches!(result, Err(Error::ZeroSize)));

    assert_eq!(journal.balance(), 1000.0);
    assert_eq!(journal.trades().count(), 0);
}

#[test]
fn fee_adjusts_pl_at_creation() {
    // LONG 10 @ 100 -> 110 with a 1% fee: raw 100.0, fee 1.0, net 99.0
    let mut journal = Journal::new(1000.0);
    journal.update_settings(None, Some(1.0), None);

    let trade = journal.log_trade(draft("AAPL", Long, 100.0, 110.0, 10)).unwrap();
    assert_eq!(trade.pl(), 99.0);
    assert_eq!(journal.balance(), 1099.0);

    // Raising the fee later never rewrites a recorded P/L.
    journal.update_settings(None, Some(50.0), None);
    assert_eq!(journal.trade(trade.id()).unwrap().pl(), 99.0);
}

#[test]
fn trade_ids_are_unique_and_increasing() {
    let mut journal = Journal::new(1000.0);
    let t1 = journal.log_trade(draft("AAPL", Long, 100.0, 110.0, 1)).unwrap();
    let t2 = journal.log_trade(draft("AAPL", Long, 100.0, 110.0, 1)).unwrap();
    let t3 = journal.log_trade(draft("AAPL", Long, 100.0, 110.0, 1)).unwrap();
    assert!(t1.id() < t2.id());
    assert!(t2.id() < t3.id());
}

#[test]
fn only_one_active_day() {
    let mut journal = Journal::new(1000.0);
    let first_id = journal.start_day(0.0).unwrap().id();

    let result = journal.start_day(0.0);
    assert!(matches!(result, Err(Error::DayAlreadyActive)));

    // the failed start mutated nothing
    assert_eq!(journal.active_day().unwrap().id(), first_id);
    assert_eq!(journal.balance(), 1000.0);
    assert_eq!(journal.days().count(), 0);
}

#[test]
fn end_day_without_active_day_fails() {
    let mut journal = Journal::new(1000.0);
    assert!(matches!(journal.end_day(), Err(Error::NoActiveDay)));
}

#[test]
fn allocation_is_withheld_from_start_balance() {
    let mut journal = Journal::new(1000.0);
    let day = journal.start_day(100.0).unwrap();
    assert_eq!(day.start_balance(), 900.0);

    let mut journal = Journal::new(1000.0);
    assert!(matches!(
        journal.start_day(-1.0),
        Err(Error::NegativeAllocation(_))
    ));
    assert!(journal.active_day().is_none());
}

#[test]
fn day_number_assigned_on_first_trade() {
    let mut journal = Journal::new(1000.0);
    journal.start_day(0.0).unwrap();
    assert_eq!(journal.active_day().unwrap().number(), None);

    let trade = journal.log_trade(draft("AAPL", Long, 100.0, 110.0, 1)).unwrap();
    assert_eq!(journal.active_day().unwrap().number(), Some(1));
    assert_eq!(trade.day_number(), Some(1));
    assert_eq!(journal.active_day().unwrap().trade_ids(), &[trade.id()]);
}

#[test]
fn day_number_assigned_at_end_when_no_trades() {
    let mut journal = Journal::new(1000.0);
    journal.start_day(0.0).unwrap();
    journal.end_day().unwrap();
    assert_eq!(journal.days().next().unwrap().number(), Some(1));
}

#[test]
fn trade_without_active_day_has_no_day_number() {
    let mut journal = Journal::new(1000.0);
    let trade = journal.log_trade(draft("AAPL", Long, 100.0, 110.0, 1)).unwrap();
    assert_eq!(trade.day_number(), None);
}

#[test]
fn day_lifecycle_scenario() {
    // Start the day at 1099, lose 50 during the session, end at 1049.
    let mut journal = Journal::new(1000.0);
    journal.update_settings(None, Some(1.0), None);
    journal.log_trade(draft("AAPL", Long, 100.0, 110.0, 10)).unwrap();
    assert_eq!(journal.balance(), 1099.0);

    journal.update_settings(None, Some(0.0), None);
    let day = journal.start_day(0.0).unwrap();
    assert_eq!(day.start_balance(), 1099.0);

    let trade = journal.log_trade(draft("TSLA", Long, 100.0, 95.0, 10)).unwrap();
    assert_eq!(trade.pl(), -50.0);
    assert_eq!(journal.balance(), 1049.0);
    assert_eq!(journal.active_day().unwrap().trade_ids(), &[trade.id()]);

    let stats = journal.end_day().unwrap();
    assert_eq!(stats.absolute_change, -50.0);
    assert!((stats.percentage_change + 4.55).abs() < 0.01);
    assert_eq!(stats.to_string(), "$-50.00 (-4.55%)");

    let closed = journal.days().next().unwrap();
    assert_eq!(closed.end_balance(), Some(1049.0));
    assert!(!closed.is_active());
    assert!(journal.active_day().is_none());

    // the member trade keeps its day number after the day closed
    assert_eq!(journal.trade(trade.id()).unwrap().day_number(), Some(1));
}

#[test]
fn active_day_stats_follow_current_balance() {
    let mut journal = Journal::new(1000.0);
    journal.start_day(0.0).unwrap();
    journal.log_trade(draft("AAPL", Long, 100.0, 110.0, 10)).unwrap();

    let stats = journal.active_day().unwrap().stats(journal.balance());
    assert_eq!(stats.absolute_change, 100.0);
    assert_eq!(stats.percentage_change, 10.0);
}

#[test]
fn day_numbers_never_reused_after_deletion() {
    let mut journal = Journal::new(1000.0);

    journal.start_day(0.0).unwrap();
    journal.log_trade(draft("AAPL", Long, 100.0, 110.0, 1)).unwrap();
    journal.end_day().unwrap();

    journal.start_day(0.0).unwrap();
    journal.log_trade(draft("TSLA", Long, 100.0, 110.0, 1)).unwrap();
    journal.end_day().unwrap();

    let day_one = journal.days().find(|d| d.number() == Some(1)).unwrap().id();
    journal.delete_day(day_one);

    let numbers: Vec<_> = journal.days().filter_map(TradingDay::number).collect();
    assert_eq!(numbers, vec![2]);

    journal.start_day(0.0).unwrap();
    journal.end_day().unwrap();
    assert_eq!(journal.days().next().unwrap().number(), Some(3));
}

#[test]
fn delete_day_cascades_to_its_trades() {
    let mut journal = Journal::new(1000.0);

    journal.start_day(0.0).unwrap();
    journal.log_trade(draft("AAPL", Long, 100.0, 110.0, 1)).unwrap();
    journal.log_trade(draft("AAPL", Long, 100.0, 120.0, 1)).unwrap();
    journal.end_day().unwrap();
    assert_eq!(journal.balance(), 1030.0);

    journal.log_trade(draft("MSFT", Long, 50.0, 55.0, 1)).unwrap();
    assert_eq!(journal.balance(), 1035.0);

    let day_id = journal.days().next().unwrap().id();
    journal.delete_day(day_id);

    // only the day's trades are gone and exactly their P/L was reversed
    assert_eq!(journal.trades().count(), 1);
    assert_eq!(journal.trades().next().unwrap().symbol(), "MSFT");
    assert_eq!(journal.balance(), 1005.0);
    assert_eq!(journal.days().count(), 0);
}

#[test]
fn delete_unknown_day_is_a_noop() {
    let mut journal = Journal::new(1000.0);
    journal.log_trade(draft("AAPL", Long, 100.0, 110.0, 1)).unwrap();
    journal.delete_day(999);
    assert_eq!(journal.balance(), 1010.0);
    assert_eq!(journal.trades().count(), 1);
}

#[test]
fn trade_deletion_recomputes_closed_days() {
    let mut journal = Journal::new(1000.0);

    journal.start_day(0.0).unwrap();
    let winner = journal.log_trade(draft("AAPL", Long, 100.0, 110.0, 10)).unwrap();
    journal.log_trade(draft("TSLA", Long, 100.0, 95.0, 10)).unwrap();
    journal.end_day().unwrap();

    assert_eq!(journal.days().next().unwrap().end_balance(), Some(1050.0));

    journal.delete_trade(winner.id()).unwrap();
    assert_eq!(journal.balance(), 950.0);

    // the closed day re-derives its end from its remaining member trades
    let day = journal.days().next().unwrap();
    assert!(!day.contains_trade(winner.id()));
    assert_eq!(day.end_balance(), Some(950.0));
    assert_eq!(day.percentage_change(), Some(-5.0));
}

#[test]
fn deleting_unrelated_trade_keeps_closed_days_consistent() {
    let mut journal = Journal::new(1000.0);
    let outside = journal.log_trade(draft("MSFT", Long, 100.0, 110.0, 10)).unwrap();

    journal.start_day(0.0).unwrap();
    journal.log_trade(draft("AAPL", Long, 100.0, 105.0, 10)).unwrap();
    journal.end_day().unwrap();
    assert_eq!(journal.days().next().unwrap().end_balance(), Some(1150.0));

    journal.delete_trade(outside.id()).unwrap();

    // recompute runs over every closed day but membership did not change
    let day = journal.days().next().unwrap();
    assert_eq!(day.start_balance(), 1100.0);
    assert_eq!(day.end_balance(), Some(1150.0));
}

#[test]
fn deleting_trade_prunes_active_day() {
    let mut journal = Journal::new(1000.0);
    journal.start_day(0.0).unwrap();
    let trade = journal.log_trade(draft("AAPL", Long, 100.0, 110.0, 1)).unwrap();
    journal.delete_trade(trade.id()).unwrap();
    assert!(journal.active_day().unwrap().trade_ids().is_empty());
}

#[test]
fn percent_change_refreshed_against_current_balance() {
    let mut journal = Journal::new(1000.0);
    let first = journal.log_trade(draft("AAPL", Long, 100.0, 110.0, 10)).unwrap();
    // 100 / 1100 * 100, rounded to two decimals
    assert_eq!(first.percent_change(), Some(9.09));

    journal.log_trade(draft("TSLA", Long, 100.0, 110.0, 10)).unwrap();
    // the earlier trade was refreshed against the new balance of 1200
    assert_eq!(
        journal.trade(first.id()).unwrap().percent_change(),
        Some(8.33)
    );
}

#[test]
fn filtered_trades_applies_predicates() {
    let mut journal = Journal::new(1000.0);
    journal.log_trade(draft("AAPL", Long, 100.0, 110.0, 1)).unwrap();
    journal.log_trade(draft("TSLA", Short, 200.0, 190.0, 1)).unwrap();
    journal.log_trade(draft("TSM", Long, 50.0, 60.0, 1)).unwrap();

    let filter = TradeFilter {
        symbol: Some("TS".to_string()),
        ..TradeFilter::default()
    };
    assert_eq!(journal.filtered_trades(&filter).len(), 2);

    let filter = TradeFilter {
        symbol: Some("TS".to_string()),
        side: Some(Short),
        ..TradeFilter::default()
    };
    let matches = journal.filtered_trades(&filter);
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].symbol(), "TSLA");
}

#[test]
fn dashboard_snapshot_composition() {
    let mut journal = Journal::new(1000.0);
    journal.update_settings(None, None, Some(200.0));
    for i in 0..6 {
        let exit = if i % 2 == 0 { 110.0 } else { 95.0 };
        journal.log_trade(draft("AAPL", Long, 100.0, exit, 1)).unwrap();
    }
    journal.start_day(0.0).unwrap();

    let dashboard = journal.dashboard();
    assert_eq!(dashboard.recent_trades.len(), 5);
    assert_eq!(dashboard.balance, journal.balance());
    assert_eq!(dashboard.total_pl, journal.total_pl());
    assert_eq!(dashboard.win_rate, 50.0);
    assert_eq!(dashboard.goal_progress, journal.goal_progress_percent(journal.total_pl()));
    assert!(dashboard.active_day.is_some());
    assert!(dashboard.day_history.is_empty());
}

#[test]
fn update_settings_overrides_balance_and_goal() {
    let mut journal = Journal::new(1000.0);
    journal.update_settings(Some(5000.0), Some(2.5), Some(300.0));
    assert_eq!(journal.balance(), 5000.0);
    assert_eq!(journal.settings().trade_fee_percent, 2.5);
    assert_eq!(journal.goal(), Some(300.0));

    journal.update_settings(None, None, Some(0.0));
    assert_eq!(journal.goal(), None);
    // untouched fields keep their values
    assert_eq!(journal.balance(), 5000.0);
    assert_eq!(journal.settings().trade_fee_percent, 2.5);
}

#[test]
fn win_rate_bounds() {
    let mut journal = Journal::new(1000.0);
    assert_eq!(journal.dashboard().win_rate, 0.0);

    journal.log_trade(draft("AAPL", Long, 100.0, 110.0, 1)).unwrap();
    journal.log_trade(draft("AAPL", Long, 100.0, 95.0, 1)).unwrap();
    let win_rate = journal.dashboard().win_rate;
    assert!((0.0..=100.0).contains(&win_rate));
    assert_eq!(win_rate, 50.0);
}
