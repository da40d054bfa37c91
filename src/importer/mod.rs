// ==========================================
// 路线客户对账工具 - 导入层
// ==========================================
// 职责: 外部数据读取与字段映射
// 支持: CSV, Excel
// ==========================================

// 模块声明
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod inventory_loader;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use field_mapper::CustomerFieldMapper;
pub use file_parser::{CsvParser, ExcelParser, FileParser, RawRow, RawTable, UniversalFileParser};
pub use inventory_loader::{detect_customer_column, InventoryLoader};
