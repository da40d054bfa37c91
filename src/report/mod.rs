// ==========================================
// 路线客户对账工具 - 报告输出层
// ==========================================
// 职责: 对账结果 → 文本 / JSON
// ==========================================

pub mod json;
pub mod text;

pub use json::write_json;
pub use text::{write_cross_reference, write_route_changes, write_snapshot_comparison};
