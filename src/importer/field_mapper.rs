// ==========================================
// 路线客户对账工具 - 字段映射器实现
// ==========================================
// 职责: 路线优化 CSV 行 → CustomerRecord + 类型转换
// 红线: 路线号提取失败即整批失败（不跳过、不回落）
// ==========================================

use crate::domain::customer::{parse_customer_number, CustomerRecord};
use crate::domain::types::{RoutePattern, SnapshotSource};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::{RawRow, RawTable};

// 标准字段名
pub const FIELD_CUSTOMER_NUMBER: &str = "customer_number";
pub const FIELD_ACCOUNT_NAME: &str = "account_name";
pub const FIELD_ADDRESS: &str = "address";
pub const FIELD_CITY: &str = "city";
pub const FIELD_ZIP_CODE: &str = "zip_code";
pub const FIELD_ROUTE_NUMBER: &str = "route_number";

/// 标准字段 → 可接受的源列名（第一个为标准名）
fn aliases(key: &str) -> &'static [&'static str] {
    match key {
        FIELD_CUSTOMER_NUMBER => &[
            "customer_number",
            "Customer Number",
            "CustomerNumber",
            "location_id",
        ],
        FIELD_ACCOUNT_NAME => &["account_name", "Account Name", "dlvr_Name"],
        FIELD_ADDRESS => &["address", "Address", "dlvr_Address"],
        FIELD_CITY => &["city", "City", "dlvr_City"],
        FIELD_ZIP_CODE => &["zip_code", "zip", "dlvr_Zip"],
        FIELD_ROUTE_NUMBER => &["route_number", "territory", "Route"],
        _ => &[],
    }
}

// ==========================================
// CustomerFieldMapper - 路线优化 CSV 映射
// ==========================================
pub struct CustomerFieldMapper {
    pattern: RoutePattern,
}

impl CustomerFieldMapper {
    pub fn new(pattern: RoutePattern) -> Self {
        Self { pattern }
    }

    /// 校验必需列（客户号 / 路线号）至少有一个别名存在
    pub fn check_headers(&self, table: &RawTable) -> ImportResult<()> {
        for key in [FIELD_CUSTOMER_NUMBER, FIELD_ROUTE_NUMBER] {
            if !aliases(key).iter().any(|alias| table.has_column(alias)) {
                return Err(ImportError::MissingColumn {
                    column: key.to_string(),
                    available: table.headers.join(", "),
                });
            }
        }
        Ok(())
    }

    /// 映射单行
    pub fn map_row(&self, row: &RawRow) -> ImportResult<CustomerRecord> {
        let row_number = row.row_number;

        // 主键
        let raw_number = self
            .get_string(row, FIELD_CUSTOMER_NUMBER)
            .ok_or(ImportError::PrimaryKeyMissing(row_number))?;
        let customer_number =
            parse_customer_number(&raw_number).ok_or_else(|| ImportError::TypeConversionError {
                row: row_number,
                field: FIELD_CUSTOMER_NUMBER.to_string(),
                message: format!("无法解析为整数: {}", raw_number),
            })?;

        // 路线号: 缺失与格式不匹配同样处理
        let raw_route = self.get_string(row, FIELD_ROUTE_NUMBER).unwrap_or_default();
        let route_number = self
            .pattern
            .extract(&raw_route)
            .map_err(|source| ImportError::RoutePatternMismatch {
                row: row_number,
                source,
            })?;

        Ok(CustomerRecord {
            customer_number,
            account_name: self
                .get_string(row, FIELD_ACCOUNT_NAME)
                .unwrap_or_default(),
            address: self.get_string(row, FIELD_ADDRESS),
            city: self.get_string(row, FIELD_CITY),
            zip_code: self.get_string(row, FIELD_ZIP_CODE),
            route_number: Some(route_number),
            source: SnapshotSource::RouteCsv,
            row_number,
        })
    }

    /// 映射整表（遇错即停）
    pub fn map_table(&self, table: &RawTable) -> ImportResult<Vec<CustomerRecord>> {
        self.check_headers(table)?;
        table.rows.iter().map(|row| self.map_row(row)).collect()
    }

    /// 提取字符串字段，支持多个可能的列名（别名）
    fn get_string(&self, row: &RawRow, key: &str) -> Option<String> {
        aliases(key)
            .iter()
            .find_map(|alias| row.get(alias))
            .map(str::to_string)
    }
}
