// ==========================================
// 路线客户对账工具 - 配置层错误类型
// ==========================================

use crate::domain::types::RouteParseError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("读取配置文件失败 {path}: {source}")]
    Io { source: io::Error, path: PathBuf },

    #[error("解析配置文件失败 {path}: {source}")]
    Parse {
        source: toml::de::Error,
        path: PathBuf,
    },

    #[error("配置无效: {0}")]
    Invalid(String),

    #[error("路线号前缀无效: {0}")]
    RoutePattern(#[from] RouteParseError),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
