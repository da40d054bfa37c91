// ==========================================
// 路线客户对账工具 - 对账结果模型
// ==========================================
// 职责: 对账 / 库存交叉比对 / 快照比对的输出结构
// 用途: 文本报告与 JSON 输出共用
// ==========================================

use crate::domain::customer::CustomerRecord;
use crate::domain::inventory::{InventoryRecord, InventoryTable};
use crate::domain::types::{CustomerNumber, RouteNumber};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeSet;
use uuid::Uuid;

// ==========================================
// RunInfo - 运行元信息
// ==========================================
#[derive(Debug, Clone, Serialize)]
pub struct RunInfo {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
}

impl RunInfo {
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            generated_at: Utc::now(),
        }
    }
}

impl Default for RunInfo {
    fn default() -> Self {
        Self::new()
    }
}

// ==========================================
// 字段级差异
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDifference {
    pub field: String,
    pub database: String,
    pub csv: String,
}

/// 两侧都存在但字段不一致的客户
#[derive(Debug, Clone, Serialize)]
pub struct ChangedCustomer {
    pub customer_number: CustomerNumber,
    pub account_name: String,
    pub differences: Vec<FieldDifference>,
}

// ==========================================
// CustomerDiff - 一次集合差分的结果
// ==========================================
// 不变量: new ∩ removed = ∅; new ∪ removed ∪ matched = csv ∪ db
#[derive(Debug, Clone, Default, Serialize)]
pub struct CustomerDiff {
    pub csv_count: usize,
    pub db_count: usize,
    pub matched_count: usize,
    pub new_customers: Vec<CustomerRecord>,     // 按客户号升序，明细取 CSV 侧
    pub removed_customers: Vec<CustomerRecord>, // 按客户号升序，明细取数据库侧
    pub changed_customers: Vec<ChangedCustomer>,
}

impl CustomerDiff {
    pub fn new_ids(&self) -> BTreeSet<CustomerNumber> {
        self.new_customers.iter().map(|c| c.customer_number).collect()
    }

    pub fn removed_ids(&self) -> BTreeSet<CustomerNumber> {
        self.removed_customers
            .iter()
            .map(|c| c.customer_number)
            .collect()
    }

    /// 是否存在新增或移除
    pub fn has_membership_changes(&self) -> bool {
        !self.new_customers.is_empty() || !self.removed_customers.is_empty()
    }

    pub fn is_clean(&self) -> bool {
        !self.has_membership_changes() && self.changed_customers.is_empty()
    }
}

/// 单条路线的差分
#[derive(Debug, Clone, Serialize)]
pub struct RouteDiff {
    pub route: RouteNumber,
    #[serde(flatten)]
    pub diff: CustomerDiff,
}

// ==========================================
// RouteChangeReport - 按路线对账报告
// ==========================================
#[derive(Debug, Clone, Serialize)]
pub struct RouteChangeReport {
    pub run: RunInfo,
    pub routes_in_scope: Vec<RouteNumber>,
    pub routes: Vec<RouteDiff>,
    pub overall: CustomerDiff,
}

impl RouteChangeReport {
    pub fn route(&self, route: RouteNumber) -> Option<&RouteDiff> {
        self.routes.iter().find(|r| r.route == route)
    }
}

// ==========================================
// 库存交叉比对
// ==========================================
#[derive(Debug, Clone, Serialize)]
pub struct InventoryMatch {
    pub customer: CustomerRecord,
    pub item_count: usize,
    pub sample_items: Vec<InventoryRecord>,
}

/// 库存表概况
#[derive(Debug, Clone, Serialize)]
pub struct InventoryCensus {
    pub row_count: usize,
    pub columns_preview: Vec<String>,
    pub customer_column: String,
    pub distinct_customers: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct CrossReferenceReport {
    pub run: RunInfo,
    pub new_customer_total: usize,
    pub census: InventoryCensus,
    pub with_inventory: Vec<InventoryMatch>,
    pub without_inventory: Vec<CustomerRecord>,
    #[serde(skip)]
    pub inventory: InventoryTable,
}

impl CrossReferenceReport {
    pub fn with_inventory_ids(&self) -> Vec<CustomerNumber> {
        self.with_inventory
            .iter()
            .map(|m| m.customer.customer_number)
            .collect()
    }

    pub fn without_inventory_ids(&self) -> Vec<CustomerNumber> {
        self.without_inventory
            .iter()
            .map(|c| c.customer_number)
            .collect()
    }
}

/// 交叉比对结果
///
/// Aborted: 库存表加载失败或找不到客户标识列，只输出诊断信息，不给部分结果
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CrossReferenceOutcome {
    Completed(CrossReferenceReport),
    Aborted {
        new_customer_total: usize,
        reason: String,
        diagnostics: Vec<String>,
    },
}

impl CrossReferenceOutcome {
    pub fn report(&self) -> Option<&CrossReferenceReport> {
        match self {
            CrossReferenceOutcome::Completed(report) => Some(report),
            CrossReferenceOutcome::Aborted { .. } => None,
        }
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self, CrossReferenceOutcome::Aborted { .. })
    }
}

// ==========================================
// 数据库快照比对
// ==========================================
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotSide {
    pub path: String,
    pub file_size_bytes: Option<u64>,
    pub customer_count: usize,
    pub tables: Vec<String>,
    pub customer_item_count: Option<usize>, // None = customer_items 表不存在
}

#[derive(Debug, Clone, Serialize)]
pub struct SnapshotComparison {
    pub run: RunInfo,
    pub backup: SnapshotSide,
    pub current: SnapshotSide,
    pub added: Vec<CustomerRecord>,
    pub removed: Vec<CustomerRecord>,
}

impl SnapshotComparison {
    pub fn customer_count_delta(&self) -> i64 {
        self.current.customer_count as i64 - self.backup.customer_count as i64
    }

    pub fn size_delta(&self) -> Option<i64> {
        match (self.backup.file_size_bytes, self.current.file_size_bytes) {
            (Some(b), Some(c)) => Some(c as i64 - b as i64),
            _ => None,
        }
    }

    pub fn item_count_delta(&self) -> Option<i64> {
        match (
            self.backup.customer_item_count,
            self.current.customer_item_count,
        ) {
            (Some(b), Some(c)) => Some(c as i64 - b as i64),
            _ => None,
        }
    }
}
