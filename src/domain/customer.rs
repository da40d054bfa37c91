// ==========================================
// 路线客户对账工具 - 客户领域模型
// ==========================================
// 来源: 路线优化 CSV 导出 / 客户数据库快照
// 生命周期: 单次运行内只读
// ==========================================

use crate::domain::types::{CustomerNumber, RouteNumber, SnapshotSource};
use serde::{Deserialize, Serialize};

/// 邮编比较长度（只比较前五位）
pub const ZIP_PREFIX_LEN: usize = 5;

// ==========================================
// CustomerRecord - 客户记录
// ==========================================
// 红线: customer_number 在同一快照内唯一（由 Reconciler 校验）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerRecord {
    // ===== 主键 =====
    pub customer_number: CustomerNumber,

    // ===== 基础信息 =====
    pub account_name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub zip_code: Option<String>,

    // ===== 路线 =====
    pub route_number: Option<RouteNumber>, // CSV 侧必有；数据库侧可能为 NULL

    // ===== 元信息 =====
    pub source: SnapshotSource,
    pub row_number: usize, // 源数据行号（1 起）
}

impl CustomerRecord {
    /// 规范化邮编（前五位）
    pub fn zip5(&self) -> Option<String> {
        self.zip_code.as_deref().map(zip5).filter(|z| !z.is_empty())
    }

    /// 地址展示: "address, city"
    pub fn location_label(&self) -> String {
        let address = self.address.as_deref().unwrap_or("N/A");
        let city = self.city.as_deref().unwrap_or("N/A");
        format!("{}, {}", address, city)
    }

    pub fn route_label(&self) -> String {
        self.route_number
            .map(|r| r.to_string())
            .unwrap_or_else(|| "N/A".to_string())
    }
}

/// 邮编取前五位
///
/// 源数据常见 "45202-1234" 或 "45202.0"，统一截断比较
pub fn zip5(raw: &str) -> String {
    raw.trim().chars().take(ZIP_PREFIX_LEN).collect()
}

/// 客户号解析
///
/// 只接受纯数字，或表格软件导出的 "<数字>.0" 写法
/// 负数、科学计数法、非零小数一律拒绝
pub fn parse_customer_number(value: &str) -> Option<CustomerNumber> {
    let trimmed = value.trim();
    let digits = match trimmed.split_once('.') {
        Some((whole, fraction)) if !fraction.is_empty() && fraction.bytes().all(|b| b == b'0') => {
            whole
        }
        Some(_) => return None,
        None => trimmed,
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
