// ==========================================
// 路线客户对账工具 - 快照加载
// ==========================================
// 职责: 加载 CSV 侧与数据库侧客户快照
// 约束: 数据库连接只读打开，读取完成即释放
// ==========================================

use crate::api::error::ApiResult;
use crate::domain::customer::CustomerRecord;
use crate::domain::types::RoutePattern;
use crate::importer::{CustomerFieldMapper, UniversalFileParser};
use crate::repository::CustomerRepository;
use std::path::Path;

/// 加载路线优化 CSV（路线号提取失败即报错）
pub fn load_route_csv(path: &Path, pattern: &RoutePattern) -> ApiResult<Vec<CustomerRecord>> {
    let table = UniversalFileParser.parse(path)?;
    let records = CustomerFieldMapper::new(pattern.clone()).map_table(&table)?;

    tracing::info!(
        path = %path.display(),
        rows = records.len(),
        "路线 CSV 已加载"
    );
    Ok(records)
}

/// 加载数据库在用客户
pub fn load_active_customers(db_path: &Path) -> ApiResult<Vec<CustomerRecord>> {
    let records = {
        let repo = CustomerRepository::open(db_path)?;
        repo.find_active()?
    };

    tracing::info!(
        path = %db_path.display(),
        rows = records.len(),
        "数据库在用客户已加载"
    );
    Ok(records)
}
