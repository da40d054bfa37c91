// ==========================================
// 按路线对账集成测试
// ==========================================
// 测试范围: CSV 加载 → 数据库加载 → 白名单过滤 → 按路线差分
// ==========================================

mod test_helpers;

use route_reconcile::api::{ApiError, RouteChangesApi};
use route_reconcile::engine::EngineError;
use route_reconcile::importer::ImportError;
use route_reconcile::logging;
use route_reconcile::repository::RepositoryError;
use std::collections::BTreeSet;
use test_helpers::*;

fn ids(values: &[i64]) -> BTreeSet<i64> {
    values.iter().copied().collect()
}

#[test]
fn test_fixture_route_changes() {
    logging::init_test();

    let (_db_file, db_path) = create_customer_db(&fixture_db_customers()).unwrap();
    let config = config_for(
        &fixture_path("route_optimization.csv"),
        &db_path,
        &fixture_path("customer_master.csv"),
    );

    let report = RouteChangesApi::new(config).analyze().unwrap();

    assert_eq!(report.routes_in_scope, vec![5, 9, 11, 12, 33, 75]);
    assert_eq!(report.routes.len(), 6);

    // 1001 在 CSV 的 2502-9 上、数据库 9 路没有 → 9 路 NEW，不在 REMOVED
    let route_9 = report.route(9).unwrap();
    assert_eq!(route_9.diff.new_ids(), ids(&[1001]));
    assert!(route_9.diff.removed_ids().is_empty());
    assert_eq!(route_9.diff.csv_count, 2);
    assert_eq!(route_9.diff.db_count, 1);

    let route_5 = report.route(5).unwrap();
    assert_eq!(route_5.diff.new_ids(), ids(&[1004]));
    assert_eq!(route_5.diff.removed_ids(), ids(&[1007]));

    // 1006 数据库侧在白名单外的 40 路，按路线对账视为 33 路新增
    let route_33 = report.route(33).unwrap();
    assert_eq!(route_33.diff.new_ids(), ids(&[1006]));

    assert!(report.route(11).unwrap().diff.is_clean());
    assert!(report.route(75).unwrap().diff.is_clean());

    let overall = &report.overall;
    assert_eq!(overall.new_ids(), ids(&[1001, 1004, 1006]));
    assert_eq!(overall.removed_ids(), ids(&[1007]));
    assert_eq!(overall.matched_count, 2);

    // 1003 地址变更；1002 邮编只比前五位，不算变更
    assert_eq!(overall.changed_customers.len(), 1);
    let changed = &overall.changed_customers[0];
    assert_eq!(changed.customer_number, 1003);
    assert_eq!(changed.differences[0].field, "address");
    assert_eq!(changed.differences[0].database, "9 OAK AVE");
    assert_eq!(changed.differences[0].csv, "7 OAK AVE");
}

#[test]
fn test_out_of_scope_customer_never_reported() {
    let (_db_file, db_path) = create_customer_db(&fixture_db_customers()).unwrap();
    let config = config_for(
        &fixture_path("route_optimization.csv"),
        &db_path,
        &fixture_path("customer_master.csv"),
    );

    let report = RouteChangesApi::new(config).analyze().unwrap();

    // 1005 在 2502-40，1008 已停用
    for route in &report.routes {
        for id in [1005, 1008] {
            assert!(!route.diff.new_ids().contains(&id));
            assert!(!route.diff.removed_ids().contains(&id));
        }
    }
    assert!(!report.overall.new_ids().contains(&1005));
    assert!(!report.overall.removed_ids().contains(&1008));
}

#[test]
fn test_identical_snapshots_have_no_changes() {
    let dir = tempfile::tempdir().unwrap();
    let csv_path = write_route_csv(
        &dir,
        &[
            ("2502-5", 1, "ALPHA"),
            ("2502-9", 2, "BRAVO"),
            ("2502-75", 3, "CHARLIE"),
        ],
    )
    .unwrap();
    let (_db_file, db_path) = create_customer_db(&[
        db_customer(1, "ALPHA", 5),
        db_customer(2, "BRAVO", 9),
        db_customer(3, "CHARLIE", 75),
    ])
    .unwrap();

    let config = config_for(&csv_path, &db_path, &fixture_path("customer_master.csv"));
    let report = RouteChangesApi::new(config).analyze().unwrap();

    assert!(report.overall.is_clean());
    assert!(report.routes.iter().all(|r| r.diff.is_clean()));
    assert_eq!(report.overall.matched_count, 3);
}

#[test]
fn test_routes_override_restricts_scope() {
    let (_db_file, db_path) = create_customer_db(&fixture_db_customers()).unwrap();
    let mut config = config_for(
        &fixture_path("route_optimization.csv"),
        &db_path,
        &fixture_path("customer_master.csv"),
    );
    config.routes = vec![9];

    let report = RouteChangesApi::new(config).analyze().unwrap();

    assert_eq!(report.routes_in_scope, vec![9]);
    assert_eq!(report.overall.new_ids(), ids(&[1001]));
    assert!(report.overall.removed_ids().is_empty());
}

#[test]
fn test_route_pattern_mismatch_is_hard_error() {
    let (_db_file, db_path) = create_customer_db(&fixture_db_customers()).unwrap();
    let config = config_for(
        &fixture_path("route_optimization_bad_route.csv"),
        &db_path,
        &fixture_path("customer_master.csv"),
    );

    let err = RouteChangesApi::new(config).analyze().unwrap_err();

    assert!(matches!(
        err,
        ApiError::Import(ImportError::RoutePatternMismatch { row: 2, .. })
    ));
    assert!(err.to_string().contains("ROUTE 12"));
}

#[test]
fn test_duplicate_csv_customer_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let csv_path = write_route_csv(&dir, &[("2502-9", 1, "ALPHA"), ("2502-12", 1, "ALPHA")]).unwrap();
    let (_db_file, db_path) = create_customer_db(&[]).unwrap();

    let config = config_for(&csv_path, &db_path, &fixture_path("customer_master.csv"));
    let err = RouteChangesApi::new(config).analyze().unwrap_err();

    assert!(matches!(
        err,
        ApiError::Engine(EngineError::DuplicateCustomer {
            customer_number: 1,
            first_row: 1,
            duplicate_row: 2,
            ..
        })
    ));
}

#[test]
fn test_duplicates_tolerated_when_disabled() {
    let dir = tempfile::tempdir().unwrap();
    let csv_path = write_route_csv(&dir, &[("2502-9", 1, "FIRST"), ("2502-9", 1, "SECOND")]).unwrap();
    let (_db_file, db_path) = create_customer_db(&[]).unwrap();

    let mut config = config_for(&csv_path, &db_path, &fixture_path("customer_master.csv"));
    config.enforce_unique_customers = false;

    let report = RouteChangesApi::new(config).analyze().unwrap();

    assert_eq!(report.overall.new_customers.len(), 1);
    assert_eq!(report.overall.new_customers[0].account_name, "FIRST");
}

#[test]
fn test_missing_database_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(
        &fixture_path("route_optimization.csv"),
        &dir.path().join("missing.db"),
        &fixture_path("customer_master.csv"),
    );

    let err = RouteChangesApi::new(config).analyze().unwrap_err();

    assert!(matches!(
        err,
        ApiError::Repository(RepositoryError::DatabaseConnectionError { .. })
    ));
}

#[test]
fn test_missing_csv_is_error() {
    let (_db_file, db_path) = create_customer_db(&[]).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(
        &dir.path().join("absent.csv"),
        &db_path,
        &fixture_path("customer_master.csv"),
    );

    let err = RouteChangesApi::new(config).analyze().unwrap_err();
    assert!(matches!(err, ApiError::Import(ImportError::FileNotFound(_))));
}

#[test]
fn test_invalid_config_rejected_before_loading() {
    let mut config = config_for(
        &fixture_path("route_optimization.csv"),
        &fixture_path("missing.db"),
        &fixture_path("customer_master.csv"),
    );
    config.routes.clear();

    let err = RouteChangesApi::new(config).analyze().unwrap_err();
    assert!(matches!(err, ApiError::Config(_)));
}
