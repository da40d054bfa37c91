// ==========================================
// 路线客户对账工具 - 仓储层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 仓储层错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    // ===== 数据库错误 =====
    #[error("数据库连接失败: {path}: {message}")]
    DatabaseConnectionError { path: String, message: String },

    #[error("数据库查询失败: {0}")]
    DatabaseQueryError(String),

    // ===== 结构错误 =====
    #[error("数据表不存在: {0}")]
    MissingTable(String),

    #[error("数据表 {table} 缺少列: {column}")]
    MissingColumn { table: String, column: String },

    // ===== 数据质量错误 =====
    #[error("字段值错误 (field={field}, row={row}): {message}")]
    FieldValueError {
        field: String,
        row: usize,
        message: String,
    },
}

// 实现 From<rusqlite::Error>
impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(_, Some(msg)) => {
                RepositoryError::DatabaseQueryError(msg)
            }
            _ => RepositoryError::DatabaseQueryError(err.to_string()),
        }
    }
}

/// Result 类型别名
pub type RepositoryResult<T> = Result<T, RepositoryError>;
