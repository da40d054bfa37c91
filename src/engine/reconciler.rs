// ==========================================
// 路线客户对账工具 - 对账引擎
// ==========================================
// 职责: 白名单过滤 + 客户号集合差分 + 字段级比对
// 输入: CSV 侧与数据库侧 CustomerRecord（已完成加载与路线号提取）
// 输出: 全局差分 + 按路线差分
// ==========================================
// 红线: 引擎不读文件、不拼 SQL
// 红线: 白名单外的客户不出现在任何结果集合中
// ==========================================

use crate::domain::customer::CustomerRecord;
use crate::domain::report::{ChangedCustomer, CustomerDiff, FieldDifference, RouteDiff};
use crate::domain::types::{CustomerNumber, RouteAllowList, RouteNumber};
use crate::engine::error::{EngineError, EngineResult};
use std::collections::{BTreeMap, HashMap};
use tracing::instrument;

// ==========================================
// Reconciler - 对账引擎
// ==========================================
pub struct Reconciler {
    allow_list: RouteAllowList,
    enforce_unique: bool,
}

impl Reconciler {
    /// 创建对账引擎
    ///
    /// # 参数
    /// - allow_list: 参与对账的路线白名单
    /// - enforce_unique: 是否校验快照内客户号唯一
    pub fn new(allow_list: RouteAllowList, enforce_unique: bool) -> Self {
        Self {
            allow_list,
            enforce_unique,
        }
    }

    pub fn allow_list(&self) -> &RouteAllowList {
        &self.allow_list
    }

    /// 按白名单过滤（保持原始顺序）
    pub fn restrict(&self, records: &[CustomerRecord]) -> Vec<CustomerRecord> {
        records
            .iter()
            .filter(|r| self.allow_list.admits(r.route_number))
            .cloned()
            .collect()
    }

    /// 校验快照内客户号唯一
    ///
    /// 关闭校验时直接通过，差分明细取第一条记录
    pub fn check_unique(&self, records: &[CustomerRecord]) -> EngineResult<()> {
        if !self.enforce_unique {
            return Ok(());
        }

        let mut seen: HashMap<CustomerNumber, usize> = HashMap::with_capacity(records.len());
        for record in records {
            if let Some(&first_row) = seen.get(&record.customer_number) {
                return Err(EngineError::DuplicateCustomer {
                    snapshot: record.source,
                    customer_number: record.customer_number,
                    first_row,
                    duplicate_row: record.row_number,
                });
            }
            seen.insert(record.customer_number, record.row_number);
        }
        Ok(())
    }

    /// 集合差分
    ///
    /// 两侧输入应已按同一范围过滤；new = csv − db，removed = db − csv
    pub fn diff(&self, csv: &[CustomerRecord], db: &[CustomerRecord]) -> CustomerDiff {
        let csv_index = first_by_id(csv);
        let db_index = first_by_id(db);

        let new_customers: Vec<CustomerRecord> = csv_index
            .iter()
            .filter(|(id, _)| !db_index.contains_key(*id))
            .map(|(_, record)| (*record).clone())
            .collect();

        let removed_customers: Vec<CustomerRecord> = db_index
            .iter()
            .filter(|(id, _)| !csv_index.contains_key(*id))
            .map(|(_, record)| (*record).clone())
            .collect();

        let mut matched_count = 0;
        let mut changed_customers = Vec::new();
        for (id, csv_record) in &csv_index {
            let Some(db_record) = db_index.get(id) else {
                continue;
            };
            matched_count += 1;

            let differences = compare_fields(db_record, csv_record);
            if !differences.is_empty() {
                changed_customers.push(ChangedCustomer {
                    customer_number: *id,
                    account_name: csv_record.account_name.clone(),
                    differences,
                });
            }
        }

        CustomerDiff {
            csv_count: csv_index.len(),
            db_count: db_index.len(),
            matched_count,
            new_customers,
            removed_customers,
            changed_customers,
        }
    }

    /// 单条路线的差分
    pub fn diff_route(
        &self,
        route: RouteNumber,
        csv: &[CustomerRecord],
        db: &[CustomerRecord],
    ) -> RouteDiff {
        let on_route = |records: &[CustomerRecord]| -> Vec<CustomerRecord> {
            records
                .iter()
                .filter(|r| r.route_number == Some(route))
                .cloned()
                .collect()
        };

        RouteDiff {
            route,
            diff: self.diff(&on_route(csv), &on_route(db)),
        }
    }

    /// 完整对账: 唯一性校验 → 白名单过滤 → 按路线差分 + 全局差分
    ///
    /// 路线按白名单升序输出，无客户的路线也会出现（两侧计数为 0）
    #[instrument(skip_all, fields(csv = csv.len(), db = db.len()))]
    pub fn analyze(
        &self,
        csv: &[CustomerRecord],
        db: &[CustomerRecord],
    ) -> EngineResult<(Vec<RouteDiff>, CustomerDiff)> {
        self.check_unique(csv)?;
        self.check_unique(db)?;

        let csv_scoped = self.restrict(csv);
        let db_scoped = self.restrict(db);

        tracing::info!(
            csv_in_scope = csv_scoped.len(),
            db_in_scope = db_scoped.len(),
            routes = self.allow_list.len(),
            "白名单过滤完成"
        );

        let routes: Vec<RouteDiff> = self
            .allow_list
            .iter()
            .map(|route| self.diff_route(route, &csv_scoped, &db_scoped))
            .collect();

        for route_diff in &routes {
            tracing::debug!(
                route = route_diff.route,
                new = route_diff.diff.new_customers.len(),
                removed = route_diff.diff.removed_customers.len(),
                "路线差分"
            );
        }

        let overall = self.diff(&csv_scoped, &db_scoped);

        tracing::info!(
            new = overall.new_customers.len(),
            removed = overall.removed_customers.len(),
            changed = overall.changed_customers.len(),
            "对账完成"
        );

        Ok((routes, overall))
    }

    /// 新客户: 白名单内的 CSV 客户中，数据库（不限路线）不存在的客户
    ///
    /// 数据库侧不做路线过滤，已在其他路线上的客户不算新客户
    #[instrument(skip_all, fields(csv = csv.len(), db = db.len()))]
    pub fn new_customers(
        &self,
        csv: &[CustomerRecord],
        db: &[CustomerRecord],
    ) -> EngineResult<Vec<CustomerRecord>> {
        self.check_unique(csv)?;
        self.check_unique(db)?;

        let csv_scoped = self.restrict(csv);
        let diff = self.diff(&csv_scoped, db);

        tracing::info!(
            csv_in_scope = csv_scoped.len(),
            new = diff.new_customers.len(),
            "新客户识别完成"
        );

        Ok(diff.new_customers)
    }
}

/// 客户号 → 第一条记录（按客户号升序遍历）
fn first_by_id(records: &[CustomerRecord]) -> BTreeMap<CustomerNumber, &CustomerRecord> {
    let mut index = BTreeMap::new();
    for record in records {
        index.entry(record.customer_number).or_insert(record);
    }
    index
}

// ==========================================
// 字段级比对
// ==========================================
// 规则: 去除首尾空白后比较；数据库侧缺失的字段不参与比较
// 邮编只比较前五位
pub fn compare_fields(db: &CustomerRecord, csv: &CustomerRecord) -> Vec<FieldDifference> {
    let mut differences = Vec::new();

    let mut check = |field: &str, database: Option<String>, csv_value: Option<String>| {
        let Some(database) = database else {
            return;
        };
        let csv_value = csv_value.unwrap_or_default();
        if database != csv_value {
            differences.push(FieldDifference {
                field: field.to_string(),
                database,
                csv: csv_value,
            });
        }
    };

    check(
        "account_name",
        trimmed(Some(&db.account_name)),
        trimmed(Some(&csv.account_name)),
    );
    check(
        "address",
        trimmed(db.address.as_ref()),
        trimmed(csv.address.as_ref()),
    );
    check("city", trimmed(db.city.as_ref()), trimmed(csv.city.as_ref()));
    check("zip_code", db.zip5(), csv.zip5());
    check(
        "route_number",
        db.route_number.map(|r| r.to_string()),
        csv.route_number.map(|r| r.to_string()),
    );

    differences
}

fn trimmed(value: Option<&String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
