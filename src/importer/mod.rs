// ==========================================
// 销售数据 ETL 系统 - 抽取层
// ==========================================
// 职责: 外部平面文件 → 在途记录集
// 支持: CSV (UTF-8)
// ==========================================

// 模块声明
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod importer_trait;
pub mod sales_extractor;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use field_mapper::{SalesFieldMapper, NA_TOKENS};
pub use file_parser::CsvParser;
pub use sales_extractor::SalesExtractor;

// 重导出 Trait 接口
pub use importer_trait::{FieldMapper, FileParser, RawTable};
