// ==========================================
// 路线客户对账工具 - 引擎层
// ==========================================
// 职责: 实现对账规则（集合差分 / 库存划分）
// 红线: Engine 不读文件、不拼 SQL
// ==========================================

pub mod cross_reference;
pub mod error;
pub mod reconciler;

// 重导出核心引擎
pub use cross_reference::{CrossReferencer, DEFAULT_SAMPLE_ITEMS};
pub use error::{EngineError, EngineResult};
pub use reconciler::{compare_fields, Reconciler};
