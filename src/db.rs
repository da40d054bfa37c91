// ==========================================
// 路线客户对账工具 - SQLite 连接初始化
// ==========================================
// 目标:
// - 对账只读数据库，统一以只读方式打开，避免误写快照
// - 统一 busy_timeout，数据库被其他进程写入时不立即失败
// ==========================================

use rusqlite::{Connection, OpenFlags, OptionalExtension};
use std::path::Path;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 配置 SQLite 连接的统一 PRAGMA
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 以只读方式打开 SQLite 连接并应用统一配置
///
/// 文件不存在时由 SQLite 返回 CANTOPEN（只读模式不会创建新库）
pub fn open_readonly_connection<P: AsRef<Path>>(db_path: P) -> rusqlite::Result<Connection> {
    let mut conn = Connection::open_with_flags(
        db_path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    configure_sqlite_connection(&conn)?;
    crate::perf::install_sqlite_tracing(&mut conn);
    Ok(conn)
}

/// 表是否存在
pub fn has_table(conn: &Connection, table: &str) -> rusqlite::Result<bool> {
    let found = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name=?1 LIMIT 1",
            [table],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);
    Ok(found)
}

/// 列出全部用户表（按名称排序）
pub fn list_tables(conn: &Connection) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
    )?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(names)
}

/// 表的列名（PRAGMA table_info 顺序）
pub fn table_columns(conn: &Connection, table: &str) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", quote_identifier(table)))?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(columns)
}

/// 表行数
pub fn count_rows(conn: &Connection, table: &str) -> rusqlite::Result<usize> {
    let count: i64 = conn.query_row(
        &format!("SELECT COUNT(*) FROM {}", quote_identifier(table)),
        [],
        |row| row.get(0),
    )?;
    Ok(count.max(0) as usize)
}

/// SQL 标识符加引号（内部双引号转义）
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn seeded_db() -> NamedTempFile {
        let temp_file = NamedTempFile::new().unwrap();
        let conn = Connection::open(temp_file.path()).unwrap();
        conn.execute_batch(
            r#"
            CREATE TABLE customers (customer_number INTEGER, account_name TEXT);
            INSERT INTO customers VALUES (1001, 'ACME'), (1002, 'BOLT');
            CREATE TABLE "odd ""name""" (id INTEGER);
            "#,
        )
        .unwrap();
        temp_file
    }

    #[test]
    fn test_open_readonly_rejects_writes() {
        let temp_file = seeded_db();
        let conn = open_readonly_connection(temp_file.path()).unwrap();
        let result = conn.execute("DELETE FROM customers", []);
        assert!(result.is_err());
    }

    #[test]
    fn test_open_readonly_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = open_readonly_connection(dir.path().join("missing.db"));
        assert!(result.is_err());
    }

    #[test]
    fn test_table_helpers() {
        let temp_file = seeded_db();
        let conn = open_readonly_connection(temp_file.path()).unwrap();

        assert!(has_table(&conn, "customers").unwrap());
        assert!(!has_table(&conn, "customer_items").unwrap());
        assert_eq!(
            list_tables(&conn).unwrap(),
            vec!["customers".to_string(), "odd \"name\"".to_string()]
        );
        assert_eq!(
            table_columns(&conn, "customers").unwrap(),
            vec!["customer_number".to_string(), "account_name".to_string()]
        );
        assert_eq!(count_rows(&conn, "customers").unwrap(), 2);
        assert_eq!(count_rows(&conn, "odd \"name\"").unwrap(), 0);
    }
}
