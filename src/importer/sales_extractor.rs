// ==========================================
// 销售数据 ETL 系统 - 抽取阶段
// ==========================================
// 流程: 解析 → 固定列检查 → 映射为 SalesRecord
// ==========================================

use crate::domain::sales::{RecordSet, SalesRecord};
use crate::importer::error::ImportResult;
use crate::importer::field_mapper::SalesFieldMapper;
use crate::importer::file_parser::CsvParser;
use crate::importer::importer_trait::{FieldMapper, FileParser};
use std::path::Path;
use tracing::{debug, info, instrument};

// ==========================================
// SalesExtractor - 抽取器
// ==========================================
pub struct SalesExtractor {
    file_parser: Box<dyn FileParser>,
    field_mapper: Box<dyn FieldMapper>,
}

impl Default for SalesExtractor {
    fn default() -> Self {
        Self::new(Box::new(CsvParser), Box::new(SalesFieldMapper))
    }
}

impl SalesExtractor {
    pub fn new(file_parser: Box<dyn FileParser>, field_mapper: Box<dyn FieldMapper>) -> Self {
        Self {
            file_parser,
            field_mapper,
        }
    }

    /// 读取源文件并返回在途记录集
    ///
    /// # 返回
    /// - Err(FileNotFound): 路径不存在
    /// - Err(SchemaMismatch): 缺少固定列
    #[instrument(skip(self, file_path), fields(file = %file_path.display()))]
    pub fn extract(&self, file_path: &Path) -> ImportResult<RecordSet<SalesRecord>> {
        info!("读取源文件");

        let table = self.file_parser.parse_to_raw_table(file_path)?;
        let column_count = table.headers.len();
        debug!(columns = ?table.headers, "源文件表头");

        let records = self.field_mapper.map_table(table)?;

        let file_size_mb = std::fs::metadata(file_path)
            .map(|m| m.len() as f64 / (1024.0 * 1024.0))
            .unwrap_or(0.0);

        info!(
            records = records.len(),
            columns = column_count,
            file_size_mb = %format!("{:.2}", file_size_mb),
            "源文件读取完成"
        );

        Ok(records)
    }
}
