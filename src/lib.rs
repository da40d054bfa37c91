// ==========================================
// 路线客户对账工具 - 核心库
// ==========================================
// 技术栈: Rust + SQLite（只读） + CSV/Excel
// 系统定位: 路线客户名单对账（只读分析，不回写数据库）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 对账规则
pub mod engine;

// 导入层 - 外部数据
pub mod importer;

// 配置层 - 运行配置
pub mod config;

// 数据库基础设施（只读连接/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// 性能埋点（SQL 计数 / 耗时）
pub mod perf;

// 报告输出
pub mod report;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    CustomerNumber, RouteAllowList, RouteNumber, RoutePattern, SnapshotSource,
};

// 领域实体
pub use domain::{
    CrossReferenceOutcome, CrossReferenceReport, CustomerDiff, CustomerRecord, InventoryRecord,
    InventoryTable, RouteChangeReport, RouteDiff, SnapshotComparison,
};

// 引擎
pub use engine::{CrossReferencer, Reconciler};

// API
pub use api::{ApiError, ApiResult, CrossReferenceApi, RouteChangesApi, SnapshotCompareApi};

// 配置
pub use config::ReconcileConfig;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "route-reconcile";
