// ==========================================
// 路线客户对账工具 - 库存交叉比对 API
// ==========================================
// 流程: 识别新客户 → 加载库存表 → 划分有/无库存
// 红线: 库存表加载失败或找不到标识列时中止，只输出诊断信息
// ==========================================

use crate::api::error::ApiResult;
use crate::api::snapshot_loader::{load_active_customers, load_route_csv};
use crate::config::ReconcileConfig;
use crate::domain::inventory::InventoryTable;
use crate::domain::report::{
    CrossReferenceOutcome, CrossReferenceReport, InventoryCensus, RunInfo,
};
use crate::engine::{CrossReferencer, Reconciler};
use crate::importer::{ImportError, InventoryLoader};
use crate::perf::PerfGuard;

/// 库存表概况中展示的列数
pub const COLUMN_PREVIEW_LEN: usize = 10;

pub struct CrossReferenceApi {
    config: ReconcileConfig,
}

impl CrossReferenceApi {
    pub fn new(config: ReconcileConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReconcileConfig {
        &self.config
    }

    /// 执行交叉比对
    ///
    /// # 返回
    /// - Ok(Completed): 划分结果
    /// - Ok(Aborted): 库存表不可用（诊断信息）
    /// - Err: CSV / 数据库 / 配置错误
    pub fn run(&self) -> ApiResult<CrossReferenceOutcome> {
        let _perf = PerfGuard::new("cross_reference");

        self.config.validate()?;
        let pattern = self.config.route_pattern()?;

        let csv = load_route_csv(&self.config.route_csv_path, &pattern)?;
        let db = load_active_customers(&self.config.database_path)?;

        let reconciler = Reconciler::new(
            self.config.allow_list(),
            self.config.enforce_unique_customers,
        );
        let new_customers = reconciler.new_customers(&csv, &db)?;
        let new_customer_total = new_customers.len();

        let loader = InventoryLoader::new(self.config.inventory_customer_columns.clone());
        let inventory = match loader.load(&self.config.inventory_path) {
            Ok(table) => table,
            Err(err) => {
                let (reason, diagnostics) = abort_diagnostics(&err);
                tracing::warn!(
                    path = %self.config.inventory_path.display(),
                    error = %err,
                    "库存交叉比对中止"
                );
                return Ok(CrossReferenceOutcome::Aborted {
                    new_customer_total,
                    reason,
                    diagnostics,
                });
            }
        };

        let census = self.census(&inventory);
        let referencer = CrossReferencer::new(
            self.config.sample_items,
            self.config.inventory_customer_prefix.as_str(),
        );
        let (with_inventory, without_inventory) = referencer.partition(&new_customers, &inventory);

        tracing::info!(
            new = new_customer_total,
            with_inventory = with_inventory.len(),
            without_inventory = without_inventory.len(),
            "库存交叉比对完成"
        );

        Ok(CrossReferenceOutcome::Completed(CrossReferenceReport {
            run: RunInfo::new(),
            new_customer_total,
            census,
            with_inventory,
            without_inventory,
            inventory,
        }))
    }

    fn census(&self, inventory: &InventoryTable) -> InventoryCensus {
        InventoryCensus {
            row_count: inventory.len(),
            columns_preview: inventory.column_preview(COLUMN_PREVIEW_LEN),
            customer_column: inventory.customer_column.clone(),
            distinct_customers: inventory
                .distinct_customers(&self.config.inventory_customer_prefix)
                .len(),
        }
    }
}

/// 中止原因 + 诊断行
fn abort_diagnostics(err: &ImportError) -> (String, Vec<String>) {
    match err {
        ImportError::CustomerColumnNotFound {
            candidates,
            columns,
        } => (
            format!("库存表中找不到客户标识列（候选: {}）", candidates),
            columns.clone(),
        ),
        other => ("库存表加载失败".to_string(), vec![other.to_string()]),
    }
}
