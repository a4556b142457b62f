//! Trade statistics aggregation.
//!
//! The summary is a reduction over five independent reads against a
//! [`StatsSource`]: the member count, the year-to-date trade count, all
//! non-null ROI values, all amount-range labels, and all ticker labels.
//! Any failing read fails the whole aggregation; partial results are never
//! merged.

use chrono::{Datelike, Local, NaiveDate, Utc};
use std::collections::HashSet;
use std::thread;

use crate::error::Result;
use crate::models::{AmountRange, TradeStats};

/// The five reads a summary is built from.
///
/// Implemented by the cached DuckDB query layer
/// ([`StatsQuery`](crate::queries::StatsQuery)), the live
/// [`RestClient`](crate::rest::RestClient), and the in-memory
/// [`TradeSnapshot`](crate::models::TradeSnapshot).
pub trait StatsSource {
    /// Number of member records.
    fn member_count(&self) -> Result<i64>;

    /// Number of trades dated on or after `since`.
    fn trade_count_since(&self, since: NaiveDate) -> Result<i64>;

    /// Every non-null ROI percentage.
    fn roi_values(&self) -> Result<Vec<f64>>;

    /// Every trade's amount-range label.
    fn amount_ranges(&self) -> Result<Vec<String>>;

    /// Every trade's ticker symbol (duplicates included).
    fn tickers(&self) -> Result<Vec<String>>;
}

/// Compute the summary by issuing the five reads one after another.
///
/// `today` defaults to the local calendar date, so the year-to-date
/// boundary follows the system timezone at call time.
pub fn aggregate<S: StatsSource + ?Sized>(
    source: &S,
    today: Option<NaiveDate>,
) -> Result<TradeStats> {
    let since = start_of_year(today.unwrap_or_else(local_today));

    let total_members = source.member_count()?;
    let trades_ytd = source.trade_count_since(since)?;
    let rois = source.roi_values()?;
    let ranges = source.amount_ranges()?;
    let tickers = source.tickers()?;

    Ok(assemble(total_members, trades_ytd, &rois, &ranges, &tickers))
}

/// Compute the summary with the five reads issued concurrently.
///
/// Waits for every read to finish, then reports the first failure in query
/// order. In-flight reads are not cancelled.
pub fn aggregate_concurrent<S: StatsSource + Sync + ?Sized>(
    source: &S,
    today: Option<NaiveDate>,
) -> Result<TradeStats> {
    let since = start_of_year(today.unwrap_or_else(local_today));

    thread::scope(|s| {
        let members = s.spawn(|| source.member_count());
        let ytd = s.spawn(|| source.trade_count_since(since));
        let rois = s.spawn(|| source.roi_values());
        let ranges = s.spawn(|| source.amount_ranges());
        let tickers = s.spawn(|| source.tickers());

        let members = join(members);
        let ytd = join(ytd);
        let rois = join(rois);
        let ranges = join(ranges);
        let tickers = join(tickers);

        Ok(assemble(members?, ytd?, &rois?, &ranges?, &tickers?))
    })
}

fn join<T>(handle: thread::ScopedJoinHandle<'_, T>) -> T {
    handle
        .join()
        .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
}

fn assemble(
    total_members: i64,
    trades_ytd: i64,
    rois: &[f64],
    ranges: &[String],
    tickers: &[String],
) -> TradeStats {
    TradeStats {
        total_members,
        trades_ytd,
        avg_roi: average_roi(rois),
        total_volume: total_volume(ranges),
        active_tickers: distinct_count(tickers),
        last_update: Utc::now(),
    }
}

/// Arithmetic mean of the values; 0 when there are none.
pub fn average_roi(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sum of bracket midpoints. Labels outside the bracket table add 0.
pub fn total_volume<I, L>(labels: I) -> u64
where
    I: IntoIterator<Item = L>,
    L: AsRef<str>,
{
    labels
        .into_iter()
        .map(|label| {
            let label = label.as_ref();
            match AmountRange::parse(label) {
                Some(range) => range.midpoint(),
                None => {
                    tracing::debug!(label, "unrecognized amount range contributes no volume");
                    0
                }
            }
        })
        .sum()
}

/// Number of distinct values, compared case-sensitively.
pub fn distinct_count<I, L>(values: I) -> i64
where
    I: IntoIterator<Item = L>,
    L: AsRef<str>,
{
    values
        .into_iter()
        .map(|v| v.as_ref().to_string())
        .collect::<HashSet<_>>()
        .len() as i64
}

/// January 1 of `today`'s year.
pub fn start_of_year(today: NaiveDate) -> NaiveDate {
    today.with_ordinal(1).unwrap_or(today)
}

/// Current calendar date in the system timezone.
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}
