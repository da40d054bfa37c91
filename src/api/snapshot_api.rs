// ==========================================
// 路线客户对账工具 - 数据库快照比对 API
// ==========================================
// 职责: 备份库 vs 当前库（客户增删 / 文件大小 / customer_items 行数）
// 范围: 全部客户（不区分在用/停用，不做路线过滤）
// ==========================================

use crate::api::error::ApiResult;
use crate::domain::customer::CustomerRecord;
use crate::domain::report::{RunInfo, SnapshotComparison, SnapshotSide};
use crate::domain::types::RouteAllowList;
use crate::engine::Reconciler;
use crate::perf::PerfGuard;
use crate::repository::CustomerRepository;
use std::path::Path;

#[derive(Default)]
pub struct SnapshotCompareApi;

impl SnapshotCompareApi {
    pub fn new() -> Self {
        Self
    }

    /// 比对两个数据库快照
    pub fn compare(&self, backup: &Path, current: &Path) -> ApiResult<SnapshotComparison> {
        let _perf = PerfGuard::new("compare_snapshots");

        let (backup_side, backup_customers) = load_side(backup)?;
        let (current_side, current_customers) = load_side(current)?;

        // 快照比对不受路线白名单限制，只做集合差分
        let diff = Reconciler::new(RouteAllowList::default(), false)
            .diff(&current_customers, &backup_customers);

        tracing::info!(
            backup = backup_side.customer_count,
            current = current_side.customer_count,
            added = diff.new_customers.len(),
            removed = diff.removed_customers.len(),
            "快照比对完成"
        );

        Ok(SnapshotComparison {
            run: RunInfo::new(),
            backup: backup_side,
            current: current_side,
            added: diff.new_customers,
            removed: diff.removed_customers,
        })
    }
}

fn load_side(path: &Path) -> ApiResult<(SnapshotSide, Vec<CustomerRecord>)> {
    let file_size_bytes = std::fs::metadata(path).ok().map(|m| m.len());

    let repo = CustomerRepository::open(path)?;
    let customers = repo.find_all()?;
    let side = SnapshotSide {
        path: path.display().to_string(),
        file_size_bytes,
        customer_count: repo.count_all()?,
        tables: repo.list_tables()?,
        customer_item_count: repo.count_customer_items()?,
    };

    tracing::debug!(
        path = %side.path,
        customers = side.customer_count,
        tables = side.tables.len(),
        "快照已加载"
    );

    Ok((side, customers))
}
