// ==========================================
// 路线客户对账工具 - API层错误类型
// ==========================================
// 职责: 汇总各层错误，供命令行入口统一处理
// 说明: 库存交叉比对的中止不是错误（见 CrossReferenceOutcome::Aborted）
// ==========================================

use crate::config::error::ConfigError;
use crate::engine::error::EngineError;
use crate::importer::error::ImportError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    #[error("导入失败: {0}")]
    Import(#[from] ImportError),

    #[error("数据库读取失败: {0}")]
    Repository(#[from] RepositoryError),

    #[error("对账失败: {0}")]
    Engine(#[from] EngineError),
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
