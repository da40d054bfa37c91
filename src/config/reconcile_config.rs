// ==========================================
// 路线客户对账工具 - 运行配置
// ==========================================
// 职责: 配置加载、默认值、校验
// 优先级: 命令行参数 > 配置文件 > 内置默认值
// 配置文件: --config 指定，否则 <config_dir>/route-reconcile/config.toml
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::domain::inventory::{ACCEPTED_CUSTOMER_COLUMNS, DEFAULT_CUSTOMER_PREFIX};
use crate::domain::types::{
    RouteAllowList, RouteNumber, RoutePattern, DEFAULT_ROUTES, DEFAULT_ROUTE_PREFIX,
};
use crate::engine::cross_reference::DEFAULT_SAMPLE_ITEMS;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_DIR_NAME: &str = "route-reconcile";
pub const CONFIG_FILE_NAME: &str = "config.toml";

// 默认数据文件（相对当前工作目录）
pub const DEFAULT_ROUTE_CSV: &str = "RouteOptimizationCLEAN.csv";
pub const DEFAULT_DATABASE: &str = "route33-staging.db";
pub const DEFAULT_INVENTORY: &str = "CustomerMasterAnalysisReport.csv";

// ==========================================
// ReconcileConfig
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileConfig {
    // ===== 数据源 =====
    pub route_csv_path: PathBuf,
    pub database_path: PathBuf,
    pub inventory_path: PathBuf,

    // ===== 对账范围 =====
    pub routes: Vec<RouteNumber>,
    pub route_prefix: String,
    pub enforce_unique_customers: bool,

    // ===== 库存交叉比对 =====
    pub inventory_customer_columns: Vec<String>,
    pub inventory_customer_prefix: String,
    pub sample_items: usize,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            route_csv_path: PathBuf::from(DEFAULT_ROUTE_CSV),
            database_path: PathBuf::from(DEFAULT_DATABASE),
            inventory_path: PathBuf::from(DEFAULT_INVENTORY),
            routes: DEFAULT_ROUTES.to_vec(),
            route_prefix: DEFAULT_ROUTE_PREFIX.to_string(),
            enforce_unique_customers: true,
            inventory_customer_columns: ACCEPTED_CUSTOMER_COLUMNS
                .iter()
                .map(|c| c.to_string())
                .collect(),
            inventory_customer_prefix: DEFAULT_CUSTOMER_PREFIX.to_string(),
            sample_items: DEFAULT_SAMPLE_ITEMS,
        }
    }
}

impl ReconcileConfig {
    /// 从 TOML 文件加载（缺省字段取默认值）
    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            source,
            path: path.to_path_buf(),
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            source,
            path: path.to_path_buf(),
        })
    }

    /// 加载配置
    ///
    /// - 指定路径: 文件必须存在
    /// - 未指定: 默认位置存在则加载，否则使用内置默认值
    pub fn load_or_default(path: Option<&Path>) -> ConfigResult<Self> {
        if let Some(path) = path {
            tracing::info!(path = %path.display(), "加载配置文件");
            return Self::load(path);
        }

        match Self::default_config_path() {
            Some(default_path) if default_path.is_file() => {
                tracing::info!(path = %default_path.display(), "加载默认位置配置文件");
                Self::load(default_path)
            }
            _ => {
                tracing::debug!("未找到配置文件，使用内置默认值");
                Ok(Self::default())
            }
        }
    }

    /// 默认配置文件位置
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// 校验配置
    pub fn validate(&self) -> ConfigResult<()> {
        if self.routes.is_empty() {
            return Err(ConfigError::Invalid("路线白名单不能为空".to_string()));
        }
        if self.route_prefix.trim().is_empty() {
            return Err(ConfigError::Invalid("路线号前缀不能为空".to_string()));
        }
        if self
            .inventory_customer_columns
            .iter()
            .all(|c| c.trim().is_empty())
        {
            return Err(ConfigError::Invalid("库存客户标识列候选不能为空".to_string()));
        }
        if self.sample_items == 0 {
            return Err(ConfigError::Invalid("sample_items 必须大于 0".to_string()));
        }
        self.route_pattern()?;
        Ok(())
    }

    pub fn allow_list(&self) -> RouteAllowList {
        RouteAllowList::new(self.routes.iter().copied())
    }

    pub fn route_pattern(&self) -> ConfigResult<RoutePattern> {
        Ok(RoutePattern::new(&self.route_prefix)?)
    }
}
