// ==========================================
// 路线客户对账工具 - 客户数据仓储
// ==========================================
// 职责: 读取 customers 表快照（只读）
// 红线: Repository 不含业务逻辑，只负责数据访问
// ==========================================

use crate::db;
use crate::domain::customer::{parse_customer_number, CustomerRecord};
use crate::domain::types::{CustomerNumber, RouteNumber, SnapshotSource};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::types::Value;
use rusqlite::Connection;
use std::path::Path;

pub const CUSTOMERS_TABLE: &str = "customers";
pub const CUSTOMER_ITEMS_TABLE: &str = "customer_items";

/// 必需列
const REQUIRED_COLUMNS: [&str; 3] = ["customer_number", "account_name", "route_number"];

/// 可选列（存在时参与字段比对）
const OPTIONAL_COLUMNS: [&str; 3] = ["address", "city", "zip_code"];

const ACTIVE_COLUMN: &str = "is_active";

// ==========================================
// CustomerRepository - 客户快照仓储
// ==========================================
pub struct CustomerRepository {
    conn: Connection,
    db_path: String,
    columns: Vec<String>,
}

impl CustomerRepository {
    /// 以只读方式打开数据库并校验 customers 表结构
    pub fn open<P: AsRef<Path>>(db_path: P) -> RepositoryResult<Self> {
        let path = db_path.as_ref();
        let label = path.display().to_string();

        if !path.exists() {
            return Err(RepositoryError::DatabaseConnectionError {
                path: label,
                message: "文件不存在".to_string(),
            });
        }

        let conn = db::open_readonly_connection(path).map_err(|e| {
            RepositoryError::DatabaseConnectionError {
                path: label.clone(),
                message: e.to_string(),
            }
        })?;

        Self::from_connection(conn, label)
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Connection, db_path: String) -> RepositoryResult<Self> {
        if !db::has_table(&conn, CUSTOMERS_TABLE)? {
            return Err(RepositoryError::MissingTable(CUSTOMERS_TABLE.to_string()));
        }

        let columns = db::table_columns(&conn, CUSTOMERS_TABLE)?;
        for required in REQUIRED_COLUMNS {
            if !columns.iter().any(|c| c == required) {
                return Err(RepositoryError::MissingColumn {
                    table: CUSTOMERS_TABLE.to_string(),
                    column: required.to_string(),
                });
            }
        }

        Ok(Self {
            conn,
            db_path,
            columns,
        })
    }

    fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// 查询在用客户（is_active = 1）
    pub fn find_active(&self) -> RepositoryResult<Vec<CustomerRecord>> {
        if !self.has_column(ACTIVE_COLUMN) {
            return Err(RepositoryError::MissingColumn {
                table: CUSTOMERS_TABLE.to_string(),
                column: ACTIVE_COLUMN.to_string(),
            });
        }
        self.query_customers(Some("is_active = 1"))
    }

    /// 查询全部客户（含停用）
    pub fn find_all(&self) -> RepositoryResult<Vec<CustomerRecord>> {
        self.query_customers(None)
    }

    /// customers 表行数
    pub fn count_all(&self) -> RepositoryResult<usize> {
        Ok(db::count_rows(&self.conn, CUSTOMERS_TABLE)?)
    }

    /// customer_items 表行数（表不存在时返回 None）
    pub fn count_customer_items(&self) -> RepositoryResult<Option<usize>> {
        if !db::has_table(&self.conn, CUSTOMER_ITEMS_TABLE)? {
            return Ok(None);
        }
        Ok(Some(db::count_rows(&self.conn, CUSTOMER_ITEMS_TABLE)?))
    }

    pub fn list_tables(&self) -> RepositoryResult<Vec<String>> {
        Ok(db::list_tables(&self.conn)?)
    }

    fn query_customers(&self, filter: Option<&str>) -> RepositoryResult<Vec<CustomerRecord>> {
        let optional: Vec<&str> = OPTIONAL_COLUMNS
            .iter()
            .copied()
            .filter(|c| self.has_column(c))
            .collect();

        let select: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .chain(optional.iter().copied())
            .collect();

        let sql = format!(
            "SELECT {} FROM {}{}",
            select.join(", "),
            CUSTOMERS_TABLE,
            filter.map(|f| format!(" WHERE {}", f)).unwrap_or_default()
        );

        let width = select.len();
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map([], |row| {
                let mut values = Vec::with_capacity(width);
                for idx in 0..width {
                    values.push(row.get::<_, Value>(idx)?);
                }
                Ok(values)
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        tracing::debug!(db = %self.db_path, rows = rows.len(), "customers 查询完成");

        rows.into_iter()
            .enumerate()
            .map(|(idx, values)| map_customer_row(idx + 1, &select, values))
            .collect()
    }
}

/// 行 → CustomerRecord
///
/// 列顺序: customer_number, account_name, route_number, [可选列...]
fn map_customer_row(
    row_number: usize,
    columns: &[&str],
    values: Vec<Value>,
) -> RepositoryResult<CustomerRecord> {
    let column_value = |name: &str| -> Option<&Value> {
        columns
            .iter()
            .position(|c| *c == name)
            .and_then(|idx| values.get(idx))
    };

    let customer_number = column_value("customer_number")
        .and_then(value_to_i64)
        .ok_or_else(|| RepositoryError::FieldValueError {
            field: "customer_number".to_string(),
            row: row_number,
            message: "客户号为空或无法解析".to_string(),
        })?;

    let route_number = column_value("route_number")
        .and_then(value_to_i64)
        .and_then(|r| RouteNumber::try_from(r).ok());

    Ok(CustomerRecord {
        customer_number: customer_number as CustomerNumber,
        account_name: column_value("account_name")
            .and_then(value_to_string)
            .unwrap_or_default(),
        address: column_value("address").and_then(value_to_string),
        city: column_value("city").and_then(value_to_string),
        zip_code: column_value("zip_code").and_then(value_to_string),
        route_number,
        source: SnapshotSource::Database,
        row_number,
    })
}

/// SQLite 动态类型 → 整数（兼容 TEXT / REAL 存储的编号）
fn value_to_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Integer(i) => Some(*i),
        Value::Real(f) if f.is_finite() && f.fract() == 0.0 => Some(*f as i64),
        Value::Text(s) => parse_customer_number(s),
        _ => None,
    }
}

/// SQLite 动态类型 → 文本（空串视为缺失）
fn value_to_string(value: &Value) -> Option<String> {
    let text = match value {
        Value::Integer(i) => i.to_string(),
        Value::Real(f) => f.to_string(),
        Value::Text(s) => s.trim().to_string(),
        Value::Null | Value::Blob(_) => return None,
    };
    Some(text).filter(|t| !t.is_empty())
}
