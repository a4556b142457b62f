//! End-to-end SDK tests: offline use of a seeded cache, and syncing from a
//! mock store.

mod common;

use congress_trades_sdk::{TradeFilter, TradeTableView, TradesError, TradesSdk};
use mockito::{Matcher, Server};
use std::time::Duration;

fn offline_sdk(dir: &tempfile::TempDir) -> TradesSdk {
    TradesSdk::builder()
        .cache_dir(dir.path())
        .offline(true)
        .build()
        .unwrap()
}

// ---------------------------------------------------------------------------
// Offline
// ---------------------------------------------------------------------------

#[test]
fn offline_stats_from_seeded_cache() {
    let tmp = tempfile::tempdir().unwrap();
    common::seed_offline_cache(tmp.path());
    let sdk = offline_sdk(&tmp);

    let stats = sdk.stats(Some(common::today())).unwrap();
    assert_eq!(stats.total_members, 3);
    assert_eq!(stats.trades_ytd, 3);
    assert_eq!(stats.avg_roi_label(), "4.0%");
    assert_eq!(stats.total_volume, 3_250_000);
    assert_eq!(stats.active_tickers, 3);
    assert_eq!(sdk.tables(), vec!["members", "trades"]);
}

#[test]
fn offline_trade_table_view() {
    let tmp = tempfile::tempdir().unwrap();
    common::seed_offline_cache(tmp.path());
    let sdk = offline_sdk(&tmp);

    let view = TradeTableView::default().with_search("  NVDA ");
    let trades = sdk
        .trades()
        .search(&view.filter, &view.sort, Some(common::today()))
        .unwrap();
    let ids: Vec<&str> = trades.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["t1", "t2"]);
}

#[test]
fn offline_snapshot_joins_members() {
    let tmp = tempfile::tempdir().unwrap();
    common::seed_offline_cache(tmp.path());
    let sdk = offline_sdk(&tmp);

    let snapshot = sdk.snapshot().unwrap();
    assert_eq!(snapshot.trades.len(), 4);
    assert_eq!(snapshot.trades[0].id, "t1");
    let t3 = snapshot.trade("t3").unwrap();
    assert_eq!(t3.member.as_ref().unwrap().name, "Tommy Tuberville");
    assert_eq!(t3.roi_label(), "-2.0%");
}

#[test]
fn offline_without_cache_is_not_found() {
    let tmp = tempfile::tempdir().unwrap();
    let sdk = offline_sdk(&tmp);

    let err = sdk.stats(None).unwrap_err();
    assert!(matches!(err, TradesError::NotFound(_)));
}

#[test]
fn corrupt_snapshot_is_removed() {
    let tmp = tempfile::tempdir().unwrap();
    common::seed_offline_cache(tmp.path());
    let trades_path = tmp.path().join("snapshots/trades.ndjson.gz");
    std::fs::write(&trades_path, b"not gzip at all").unwrap();
    let sdk = offline_sdk(&tmp);

    let err = sdk.snapshot().unwrap_err();
    assert!(matches!(err, TradesError::NotFound(_)));
    assert!(!trades_path.exists());
}

#[test]
fn corrupt_snapshot_is_removed_on_query() {
    let tmp = tempfile::tempdir().unwrap();
    common::seed_offline_cache(tmp.path());
    let trades_path = tmp.path().join("snapshots/trades.ndjson.gz");
    std::fs::write(&trades_path, b"not gzip at all").unwrap();
    let sdk = offline_sdk(&tmp);

    let err = sdk.stats(Some(common::today())).unwrap_err();
    assert!(matches!(err, TradesError::NotFound(_)));
    assert!(!trades_path.exists());
    assert!(!sdk.tables().contains(&"trades".to_string()));
}

#[test]
fn offline_refuses_live_stats_and_refresh() {
    let tmp = tempfile::tempdir().unwrap();
    let sdk = TradesSdk::builder()
        .base_url("http://localhost:1")
        .cache_dir(tmp.path())
        .offline(true)
        .build()
        .unwrap();

    assert!(matches!(
        sdk.live_stats(None).unwrap_err(),
        TradesError::InvalidArgument(_)
    ));
    assert!(!sdk.refresh().unwrap());
}

#[test]
fn live_stats_without_store_url_fails() {
    let tmp = tempfile::tempdir().unwrap();
    let sdk = TradesSdk::builder().cache_dir(tmp.path()).build().unwrap();
    assert!(sdk.rest().is_err());
    assert!(sdk.live_stats(None).is_err());
}

#[test]
fn display_names_store_and_cache() {
    let tmp = tempfile::tempdir().unwrap();
    let sdk = offline_sdk(&tmp);
    let shown = sdk.to_string();
    assert!(shown.contains("store=none"));
    assert!(shown.contains("offline=true"));
}

// ---------------------------------------------------------------------------
// Syncing from the store
// ---------------------------------------------------------------------------

fn snapshot_mock(server: &mut Server, table: &str, rows: &[serde_json::Value]) -> mockito::Mock {
    server
        .mock("GET", format!("/rest/v1/{}", table).as_str())
        .match_query(Matcher::UrlEncoded("select".into(), "*".into()))
        .match_header("apikey", "anon-key")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(serde_json::to_string(rows).unwrap())
        .expect(1)
        .create()
}

#[test]
fn first_query_syncs_every_table_once() {
    let mut server = Server::new();
    let trades = snapshot_mock(&mut server, "trades", &common::sample_trades());
    let members = snapshot_mock(&mut server, "members", &common::sample_members());

    let tmp = tempfile::tempdir().unwrap();
    let sdk = TradesSdk::builder()
        .base_url(server.url())
        .api_key("anon-key")
        .cache_dir(tmp.path())
        .build()
        .unwrap();

    let stats = sdk.stats(Some(common::today())).unwrap();
    assert_eq!(stats.total_volume, 3_250_000);

    // Fresh snapshots: no further downloads
    let filter = TradeFilter {
        party: Some("D".to_string()),
        ..Default::default()
    };
    let hits = sdk
        .trades()
        .search(&filter, &Default::default(), Some(common::today()))
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert!(!sdk.refresh().unwrap());

    trades.assert();
    members.assert();
    assert!(sdk.connection().cache.borrow().fetched_at().is_some());
}

#[test]
fn stale_snapshots_are_resynced_on_refresh() {
    let mut server = Server::new();
    let _trades = snapshot_mock(&mut server, "trades", &common::sample_trades());
    let _members = snapshot_mock(&mut server, "members", &common::sample_members());

    let tmp = tempfile::tempdir().unwrap();
    common::seed_offline_cache(tmp.path());
    // Never stamped: stale
    let sdk = TradesSdk::builder()
        .base_url(server.url())
        .api_key("anon-key")
        .cache_dir(tmp.path())
        .max_age(Duration::from_secs(60))
        .build()
        .unwrap();

    assert!(sdk.refresh().unwrap());
    assert!(sdk.tables().is_empty());
    assert_eq!(sdk.members().count().unwrap(), 3);
}

#[test]
fn missing_snapshot_in_fresh_cache_resyncs_every_table() {
    let mut server = Server::new();
    let trades = snapshot_mock(&mut server, "trades", &common::sample_trades());
    let members = snapshot_mock(&mut server, "members", &common::sample_members());

    let tmp = tempfile::tempdir().unwrap();
    common::seed_offline_cache(tmp.path());
    let stamp = chrono::Utc::now() - chrono::Duration::minutes(5);
    std::fs::write(tmp.path().join("fetched_at.txt"), stamp.to_rfc3339()).unwrap();
    std::fs::remove_file(tmp.path().join("snapshots/members.ndjson.gz")).unwrap();

    let sdk = TradesSdk::builder()
        .base_url(server.url())
        .api_key("anon-key")
        .cache_dir(tmp.path())
        .max_age(Duration::from_secs(3600))
        .build()
        .unwrap();

    assert_eq!(sdk.members().count().unwrap(), 3);
    trades.assert();
    members.assert();
    let fetched_at = sdk.connection().cache.borrow().fetched_at().unwrap();
    assert!(fetched_at > stamp);
}
