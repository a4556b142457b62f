mod common;

use congress_trades_sdk::queries::MemberQuery;

#[test]
fn list_orders_by_name() {
    let (conn, _tmp) = common::setup_sample_db();
    let members = MemberQuery::new(&conn).list(None).unwrap();
    let names: Vec<&str> = members.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["Dan Crenshaw", "Nancy Pelosi", "Tommy Tuberville"]);
}

#[test]
fn list_filters_chamber_case_insensitively() {
    let (conn, _tmp) = common::setup_sample_db();
    let senators = MemberQuery::new(&conn).list(Some("SENATE")).unwrap();
    assert_eq!(senators.len(), 1);
    assert_eq!(senators[0].id, "m3");
    assert_eq!(senators[0].party_name(), "Republican");
}

#[test]
fn get_by_id() {
    let (conn, _tmp) = common::setup_sample_db();
    let mq = MemberQuery::new(&conn);
    assert_eq!(mq.get("m2").unwrap().unwrap().state, "TX");
    assert!(mq.get("m404").unwrap().is_none());
}

#[test]
fn count_members() {
    let (conn, _tmp) = common::setup_sample_db();
    assert_eq!(MemberQuery::new(&conn).count().unwrap(), 3);
}

#[test]
fn empty_members_table() {
    let (conn, _tmp) = common::setup_db_with(&[], &common::sample_trades());
    let mq = MemberQuery::new(&conn);
    assert_eq!(mq.count().unwrap(), 0);
    assert!(mq.list(None).unwrap().is_empty());
}
