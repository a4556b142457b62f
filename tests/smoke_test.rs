//! Smoke test against a real trade store.
//!
//! Reads `CONGRESS_TRADES_URL` and `CONGRESS_TRADES_API_KEY` from the
//! environment, syncs the snapshots into a temporary cache, and exercises
//! every public query interface.
//!
//! Run with:
//! ```sh
//! CONGRESS_TRADES_URL=https://project.supabase.co CONGRESS_TRADES_API_KEY=... \
//!     cargo test --test smoke_test -- --ignored --nocapture
//! ```

use congress_trades_sdk::{
    DateRange, SortField, TradeFilter, TradeTableView, TradesSdk, TradesSdkBuilder,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Print a section header to stderr.
fn section(name: &str) {
    eprintln!("\n{}", "=".repeat(60));
    eprintln!("  {}", name);
    eprintln!("{}", "=".repeat(60));
}

/// Counters for pass/fail reporting.
struct Counters {
    pass: usize,
    fail: usize,
}

impl Counters {
    fn new() -> Self {
        Self { pass: 0, fail: 0 }
    }

    fn check(&mut self, label: &str, condition: bool, detail: &str) {
        let status = if condition { "PASS" } else { "FAIL" };
        if condition {
            self.pass += 1;
        } else {
            self.fail += 1;
        }
        if detail.is_empty() {
            eprintln!("  [{}] {}", status, label);
        } else {
            eprintln!("  [{}] {} -- {}", status, label, detail);
        }
    }
}

fn build_sdk(cache_dir: &std::path::Path) -> TradesSdk {
    TradesSdkBuilder::from_env()
        .cache_dir(cache_dir)
        .build()
        .unwrap()
}

// ---------------------------------------------------------------------------
// Main smoke test
// ---------------------------------------------------------------------------

#[test]
#[ignore]
fn smoke_test() {
    let tmp = tempfile::tempdir().unwrap();
    let sdk = build_sdk(tmp.path());
    let mut c = Counters::new();
    eprintln!("{}", sdk);

    section("Statistics");

    let cached = sdk.stats(None).unwrap();
    c.check(
        "cached stats",
        cached.total_members >= 0 && cached.trades_ytd >= 0,
        &format!(
            "members={}, ytd={}, roi={}, volume={}, tickers={}",
            cached.total_members,
            cached.trades_ytd,
            cached.avg_roi_label(),
            cached.volume_label(),
            cached.active_tickers
        ),
    );

    let live = sdk.live_stats(None).unwrap();
    c.check(
        "live stats agree with a fresh sync",
        live.total_members == cached.total_members,
        &format!("live members={}", live.total_members),
    );

    section("Trades");

    let recent = sdk.trades().list(Some(10), None).unwrap();
    c.check("list(10)", recent.len() <= 10, &format!("n={}", recent.len()));
    let ordered = recent
        .windows(2)
        .all(|w| w[0].trade_date >= w[1].trade_date);
    c.check("list ordered by trade date desc", ordered, "");

    if let Some(first) = recent.first() {
        let again = sdk.trades().get(&first.id).unwrap();
        c.check("get(id)", again.is_some(), &first.id);

        let view = TradeTableView::default()
            .with_search(&first.ticker)
            .with_date_range(DateRange::All);
        let hits = sdk.trades().search(&view.filter, &view.sort, None).unwrap();
        c.check(
            "search by ticker",
            hits.iter().any(|t| t.id == first.id),
            &format!("ticker={}, n={}", first.ticker, hits.len()),
        );
    }

    let by_roi = TradeTableView::default().toggle_sort(SortField::Roi);
    let sorted = sdk
        .trades()
        .search(&by_roi.filter, &by_roi.sort, None)
        .unwrap();
    c.check("sort by roi", true, &format!("n={}", sorted.len()));

    let ytd = sdk
        .trades()
        .search(
            &TradeFilter {
                date_range: DateRange::Ytd,
                limit: Some(100_000),
                ..Default::default()
            },
            &Default::default(),
            None,
        )
        .unwrap();
    c.check(
        "ytd filter matches stats",
        ytd.len() as i64 == cached.trades_ytd,
        &format!("n={}", ytd.len()),
    );

    let tickers = sdk.trades().tickers().unwrap();
    c.check(
        "distinct tickers match stats",
        tickers.len() as i64 == cached.active_tickers,
        &format!("n={}", tickers.len()),
    );

    section("Members");

    let members = sdk.members().list(None).unwrap();
    c.check(
        "members list",
        members.len() as i64 == cached.total_members,
        &format!("n={}", members.len()),
    );

    section("Snapshot");

    let snapshot = sdk.snapshot().unwrap();
    c.check(
        "snapshot size",
        snapshot.members.len() == members.len(),
        &format!("trades={}", snapshot.trades.len()),
    );

    c.check("refresh() while fresh", !sdk.refresh().unwrap(), "");

    section("Summary");
    eprintln!("  pass={} fail={}", c.pass, c.fail);
    assert_eq!(c.fail, 0, "{} smoke checks failed", c.fail);
}
