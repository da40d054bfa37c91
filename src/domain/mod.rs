// ==========================================
// 路线客户对账工具 - 领域模型层
// ==========================================
// 职责: 定义客户、库存、路线类型与对账结果
// 红线: 不含数据访问逻辑,不含对账逻辑
// ==========================================

pub mod customer;
pub mod inventory;
pub mod report;
pub mod types;

// 重导出核心类型
pub use customer::{parse_customer_number, zip5, CustomerRecord};
pub use inventory::{InventoryRecord, InventoryTable, ACCEPTED_CUSTOMER_COLUMNS};
pub use report::{
    ChangedCustomer, CrossReferenceOutcome, CrossReferenceReport, CustomerDiff, FieldDifference,
    InventoryCensus, InventoryMatch, RouteChangeReport, RouteDiff, RunInfo, SnapshotComparison,
    SnapshotSide,
};
pub use types::{
    CustomerNumber, RouteAllowList, RouteNumber, RouteParseError, RoutePattern, SnapshotSource,
    DEFAULT_ROUTES, DEFAULT_ROUTE_PREFIX,
};
