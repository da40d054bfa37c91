// ==========================================
// 路线客户对账工具 - 库存表加载器
// ==========================================
// 职责: 加载 CustomerMaster 导出，识别客户标识列
// 规则: 按候选列名顺序取第一个存在的列；都不存在则报错（不给部分结果）
// ==========================================

use crate::domain::inventory::{InventoryRecord, InventoryTable};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::UniversalFileParser;
use std::path::Path;

pub const FIELD_ITEM_DESC: &str = "item_desc";
pub const FIELD_REG_INVTY_QTY: &str = "reg_invty_qty";

/// 在表头中识别客户标识列
pub fn detect_customer_column(headers: &[String], candidates: &[String]) -> Option<String> {
    candidates
        .iter()
        .find(|candidate| headers.iter().any(|h| h == *candidate))
        .cloned()
}

// ==========================================
// InventoryLoader
// ==========================================
pub struct InventoryLoader {
    candidates: Vec<String>,
}

impl InventoryLoader {
    pub fn new(candidates: Vec<String>) -> Self {
        Self { candidates }
    }

    /// 加载库存表
    ///
    /// # 返回
    /// - Ok(InventoryTable): 加载成功且识别出客户标识列
    /// - Err(CustomerColumnNotFound): 找不到标识列（携带全部列名用于诊断）
    /// - Err(...): 文件读取/解析失败
    pub fn load<P: AsRef<Path>>(&self, path: P) -> ImportResult<InventoryTable> {
        let path = path.as_ref();
        let table = UniversalFileParser.parse(path)?;

        tracing::info!(
            path = %path.display(),
            rows = table.len(),
            "库存表已加载"
        );

        let customer_column = detect_customer_column(&table.headers, &self.candidates)
            .ok_or_else(|| ImportError::CustomerColumnNotFound {
                candidates: self.candidates.join(", "),
                columns: table.headers.clone(),
            })?;

        tracing::debug!(column = %customer_column, "识别客户标识列");

        let records = table
            .rows
            .iter()
            .map(|row| InventoryRecord {
                customer_ref: row.get(&customer_column).unwrap_or_default().to_string(),
                item_desc: row.get(FIELD_ITEM_DESC).map(str::to_string),
                reg_invty_qty: row.get(FIELD_REG_INVTY_QTY).map(str::to_string),
                row_number: row.row_number,
            })
            .collect();

        Ok(InventoryTable {
            source_path: path.display().to_string(),
            columns: table.headers,
            customer_column,
            records,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::inventory::{ACCEPTED_CUSTOMER_COLUMNS, DEFAULT_CUSTOMER_PREFIX};
    use std::io::Write;
    use tempfile::Builder;

    fn candidates() -> Vec<String> {
        ACCEPTED_CUSTOMER_COLUMNS
            .iter()
            .map(|c| c.to_string())
            .collect()
    }

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_detect_customer_column_priority() {
        let found = detect_customer_column(
            &headers(&["textbox1", "CustomerNumber", "item_desc"]),
            &candidates(),
        );
        assert_eq!(found.as_deref(), Some("CustomerNumber"));
    }

    #[test]
    fn test_detect_customer_column_missing() {
        let found = detect_customer_column(&headers(&["Cust", "item_desc"]), &candidates());
        assert_eq!(found, None);
    }

    #[test]
    fn test_load_inventory_csv() {
        let mut temp_file = Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(temp_file, "textbox1,item_desc,reg_invty_qty").unwrap();
        writeln!(temp_file, "\"Plant 2502,1001\",SHOP TOWEL,50").unwrap();
        writeln!(temp_file, "\"Plant 2502,1001\",FENDER COVER,").unwrap();

        let table = InventoryLoader::new(candidates())
            .load(temp_file.path())
            .unwrap();

        assert_eq!(table.customer_column, "textbox1");
        assert_eq!(table.len(), 2);
        assert_eq!(table.records[0].item_desc.as_deref(), Some("SHOP TOWEL"));
        assert_eq!(table.records[1].reg_invty_qty, None);
        assert_eq!(table.items_for(1001, DEFAULT_CUSTOMER_PREFIX).count(), 2);
    }

    #[test]
    fn test_load_inventory_without_customer_column() {
        let mut temp_file = Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(temp_file, "Cust,item_desc").unwrap();
        writeln!(temp_file, "1001,SHOP TOWEL").unwrap();

        let result = InventoryLoader::new(candidates()).load(temp_file.path());

        match result {
            Err(ImportError::CustomerColumnNotFound { columns, .. }) => {
                assert_eq!(columns, headers(&["Cust", "item_desc"]));
            }
            other => panic!("期望 CustomerColumnNotFound, 实际 {:?}", other),
        }
    }

    #[test]
    fn test_load_inventory_missing_file() {
        let result = InventoryLoader::new(candidates()).load("missing_inventory.csv");
        assert!(matches!(result, Err(ImportError::FileNotFound(_))));
    }
}
