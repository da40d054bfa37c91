// ==========================================
// 路线客户对账工具 - API 层
// ==========================================
// 职责: 串联加载/对账/报告,供命令行入口调用
// ==========================================

pub mod cross_reference_api;
pub mod error;
pub mod route_changes_api;
pub mod snapshot_api;
pub mod snapshot_loader;

// 重导出核心类型
pub use cross_reference_api::CrossReferenceApi;
pub use error::{ApiError, ApiResult};
pub use route_changes_api::RouteChangesApi;
pub use snapshot_api::SnapshotCompareApi;
pub use snapshot_loader::{load_active_customers, load_route_csv};
