// ==========================================
// 路线客户对账工具 - 按路线对账 API
// ==========================================
// 流程: 加载 CSV → 加载数据库 → 白名单过滤 → 按路线差分
// ==========================================

use crate::api::error::ApiResult;
use crate::api::snapshot_loader::{load_active_customers, load_route_csv};
use crate::config::ReconcileConfig;
use crate::domain::report::{RouteChangeReport, RunInfo};
use crate::engine::Reconciler;
use crate::perf::PerfGuard;

pub struct RouteChangesApi {
    config: ReconcileConfig,
}

impl RouteChangesApi {
    pub fn new(config: ReconcileConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReconcileConfig {
        &self.config
    }

    /// 执行按路线对账
    ///
    /// # 错误
    /// - 配置无效 / CSV 读取失败 / 路线号格式不匹配
    /// - 数据库打开失败或结构不符
    /// - 快照内客户号重复（enforce_unique_customers 开启时）
    pub fn analyze(&self) -> ApiResult<RouteChangeReport> {
        let _perf = PerfGuard::new("route_changes");

        self.config.validate()?;
        let pattern = self.config.route_pattern()?;
        let allow_list = self.config.allow_list();

        tracing::info!(routes = ?allow_list.to_vec(), "开始按路线对账");

        let csv = load_route_csv(&self.config.route_csv_path, &pattern)?;
        let db = load_active_customers(&self.config.database_path)?;

        let reconciler = Reconciler::new(allow_list, self.config.enforce_unique_customers);
        let (routes, overall) = reconciler.analyze(&csv, &db)?;

        Ok(RouteChangeReport {
            run: RunInfo::new(),
            routes_in_scope: reconciler.allow_list().to_vec(),
            routes,
            overall,
        })
    }
}
