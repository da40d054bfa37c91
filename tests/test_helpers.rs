// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 临时客户数据库、CSV 写入、固定测试数据路径
// ==========================================

#![allow(dead_code)]

use route_reconcile::config::ReconcileConfig;
use rusqlite::{params, Connection};
use std::error::Error;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::{NamedTempFile, TempDir};

/// 数据库侧客户行
#[derive(Debug, Clone)]
pub struct DbCustomer {
    pub customer_number: i64,
    pub account_name: &'static str,
    pub address: Option<&'static str>,
    pub city: Option<&'static str>,
    pub zip_code: Option<&'static str>,
    pub route_number: Option<u32>,
    pub is_active: bool,
}

/// 在用客户（地址字段为空，不参与字段比对）
pub fn db_customer(customer_number: i64, account_name: &'static str, route: u32) -> DbCustomer {
    DbCustomer {
        customer_number,
        account_name,
        address: None,
        city: None,
        zip_code: None,
        route_number: Some(route),
        is_active: true,
    }
}

/// 与 tests/fixtures/route_optimization.csv 对应的数据库快照
///
/// - 1002 / 1003 两侧都有（1003 地址不同）
/// - 1006 数据库在 40 路（白名单外），CSV 在 33 路
/// - 1007 只在数据库（5 路）
/// - 1008 已停用
pub fn fixture_db_customers() -> Vec<DbCustomer> {
    vec![
        DbCustomer {
            address: Some("40 ELM ST"),
            city: Some("DAYTON"),
            zip_code: Some("45403"),
            ..db_customer(1002, "BOLT DINER", 9)
        },
        DbCustomer {
            address: Some("9 OAK AVE"),
            city: Some("KETTERING"),
            zip_code: Some("45429"),
            ..db_customer(1003, "CROWN HOTEL", 12)
        },
        db_customer(1006, "FOX GRILL", 40),
        db_customer(1007, "GONE CAFE", 5),
        DbCustomer {
            is_active: false,
            ..db_customer(1008, "OLD DELI", 9)
        },
    ]
}

/// 创建临时客户数据库
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - PathBuf: 数据库文件路径
pub fn create_customer_db(
    customers: &[DbCustomer],
) -> Result<(NamedTempFile, PathBuf), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file.path().to_path_buf();

    let conn = Connection::open(&db_path)?;
    init_schema(&conn)?;
    insert_customers(&conn, customers)?;

    Ok((temp_file, db_path))
}

/// 初始化 customers 表
fn init_schema(conn: &Connection) -> Result<(), Box<dyn Error>> {
    conn.execute(
        r#"
        CREATE TABLE IF NOT EXISTS customers (
            customer_number INTEGER PRIMARY KEY,
            account_name TEXT NOT NULL,
            address TEXT,
            city TEXT,
            zip_code TEXT,
            route_number INTEGER,
            is_active INTEGER NOT NULL DEFAULT 1
        )
        "#,
        [],
    )?;
    Ok(())
}

pub fn insert_customers(conn: &Connection, customers: &[DbCustomer]) -> Result<(), Box<dyn Error>> {
    for c in customers {
        conn.execute(
            r#"
            INSERT INTO customers
                (customer_number, account_name, address, city, zip_code, route_number, is_active)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                c.customer_number,
                c.account_name,
                c.address,
                c.city,
                c.zip_code,
                c.route_number,
                c.is_active as i64,
            ],
        )?;
    }
    Ok(())
}

/// 添加 customer_items 表并写入 n 行
pub fn add_customer_items(db_path: &Path, rows: usize) -> Result<(), Box<dyn Error>> {
    let conn = Connection::open(db_path)?;
    conn.execute(
        "CREATE TABLE customer_items (customer_number INTEGER, item_number TEXT)",
        [],
    )?;
    for idx in 0..rows {
        conn.execute(
            "INSERT INTO customer_items VALUES (?1, ?2)",
            params![1000 + idx as i64, format!("ITEM-{}", idx)],
        )?;
    }
    Ok(())
}

/// 在目录中写入 CSV 文件
pub fn write_csv(dir: &TempDir, name: &str, lines: &[&str]) -> Result<PathBuf, Box<dyn Error>> {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path)?;
    for line in lines {
        writeln!(file, "{}", line)?;
    }
    Ok(path)
}

/// 写入路线优化 CSV（route, customer_number, account_name）
pub fn write_route_csv(
    dir: &TempDir,
    rows: &[(&str, i64, &str)],
) -> Result<PathBuf, Box<dyn Error>> {
    let mut lines = vec!["route_number,customer_number,account_name".to_string()];
    lines.extend(
        rows.iter()
            .map(|(route, id, name)| format!("{},{},{}", route, id, name)),
    );
    let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
    write_csv(dir, "routes.csv", &refs)
}

/// 固定测试数据路径
pub fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// 指向给定数据源的默认配置
pub fn config_for(route_csv: &Path, database: &Path, inventory: &Path) -> ReconcileConfig {
    ReconcileConfig {
        route_csv_path: route_csv.to_path_buf(),
        database_path: database.to_path_buf(),
        inventory_path: inventory.to_path_buf(),
        ..Default::default()
    }
}
