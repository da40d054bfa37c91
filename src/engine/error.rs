// ==========================================
// 路线客户对账工具 - 引擎层错误类型
// ==========================================

use crate::domain::types::{CustomerNumber, SnapshotSource};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("{snapshot} 快照中客户号重复: {customer_number} (首次出现于第 {first_row} 行, 重复于第 {duplicate_row} 行)")]
    DuplicateCustomer {
        snapshot: SnapshotSource,
        customer_number: CustomerNumber,
        first_row: usize,
        duplicate_row: usize,
    },
}

pub type EngineResult<T> = Result<T, EngineError>;
