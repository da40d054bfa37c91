// ==========================================
// 路线客户对账工具 - 配置层
// ==========================================
// 职责: 运行配置加载与校验,支持文件 + 命令行覆写
// 存储: TOML 文件
// ==========================================

pub mod error;
pub mod reconcile_config;

// 重导出核心配置
pub use error::{ConfigError, ConfigResult};
pub use reconcile_config::ReconcileConfig;
