// ==========================================
// 路线客户对账工具 - 库存领域模型
// ==========================================
// 来源: CustomerMaster 库存导出（CSV / Excel）
// 关联: 去掉工厂前缀后，客户号在标识列中做子串匹配（松散关联，非外键）
// ==========================================

use crate::domain::customer::parse_customer_number;
use crate::domain::types::CustomerNumber;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeSet;

/// 可识别的客户标识列名（按优先级）
pub const ACCEPTED_CUSTOMER_COLUMNS: [&str; 4] =
    ["CustomerNum", "customer_number", "CustomerNumber", "textbox1"];

/// 标识列中客户号前的工厂前缀
pub const DEFAULT_CUSTOMER_PREFIX: &str = "Plant 2502,";

/// 缺失值占位
pub const NOT_AVAILABLE: &str = "N/A";

// ==========================================
// InventoryRecord - 库存行
// ==========================================
// 一个客户可对应多行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryRecord {
    pub customer_ref: String, // 标识列原文，如 "Plant 2502,1001"
    pub item_desc: Option<String>,
    pub reg_invty_qty: Option<String>,
    pub row_number: usize,
}

impl InventoryRecord {
    /// 去掉工厂前缀后的标识文本
    pub fn customer_id_text(&self, prefix: &str) -> Cow<'_, str> {
        if prefix.is_empty() || !self.customer_ref.contains(prefix) {
            Cow::Borrowed(self.customer_ref.trim())
        } else {
            Cow::Owned(self.customer_ref.replace(prefix, "").trim().to_string())
        }
    }

    /// 标识列是否包含该客户号（子串匹配）
    ///
    /// 工厂前缀不参与匹配，"Plant 2502," 中的数字不会命中客户号
    pub fn matches_customer(&self, customer_number: CustomerNumber, prefix: &str) -> bool {
        let id_text = self.customer_id_text(prefix);
        !id_text.is_empty() && id_text.contains(&customer_number.to_string())
    }

    pub fn item_desc_or_na(&self) -> &str {
        self.item_desc.as_deref().unwrap_or(NOT_AVAILABLE)
    }

    pub fn qty_or_na(&self) -> &str {
        self.reg_invty_qty.as_deref().unwrap_or(NOT_AVAILABLE)
    }
}

// ==========================================
// InventoryTable - 库存表（加载结果）
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InventoryTable {
    pub source_path: String,
    pub columns: Vec<String>,
    pub customer_column: String,
    pub records: Vec<InventoryRecord>,
}

impl InventoryTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 该客户的库存行（保持原始顺序）
    pub fn items_for<'a>(
        &'a self,
        customer_number: CustomerNumber,
        prefix: &'a str,
    ) -> impl Iterator<Item = &'a InventoryRecord> + 'a {
        self.records
            .iter()
            .filter(move |r| r.matches_customer(customer_number, prefix))
    }

    /// 库存表中出现的客户号集合
    ///
    /// 去掉工厂前缀后按整数解析，无法解析的值跳过
    pub fn distinct_customers(&self, prefix: &str) -> BTreeSet<CustomerNumber> {
        self.records
            .iter()
            .filter_map(|r| parse_customer_number(&r.customer_id_text(prefix)))
            .collect()
    }

    /// 列名预览（前 n 列）
    pub fn column_preview(&self, n: usize) -> Vec<String> {
        self.columns.iter().take(n).cloned().collect()
    }
}
