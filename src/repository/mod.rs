// ==========================================
// 路线客户对账工具 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 提供客户快照读取接口,屏蔽数据库细节
// 约束: 数据库一律只读打开
// ==========================================

pub mod customer_repo;
pub mod error;

// 重导出核心仓储
pub use customer_repo::{CustomerRepository, CUSTOMERS_TABLE, CUSTOMER_ITEMS_TABLE};
pub use error::{RepositoryError, RepositoryResult};
