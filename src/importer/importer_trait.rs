// ==========================================
// 销售数据 ETL 系统 - 抽取接口 Trait
// ==========================================
// 职责: 定义文件解析 / 字段映射接口（不包含实现）
// ==========================================

use crate::domain::sales::{RecordSet, SalesRecord};
use crate::importer::error::ImportResult;
use std::collections::HashMap;
use std::path::Path;

// ==========================================
// RawTable - 解析结果
// ==========================================
// headers: 表头（已去除首列 BOM 与两端空白）
// rows: 行记录（列名 → 原始文本，未做任何清洗）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<HashMap<String, String>>,
}

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件解析接口（抽取阶段第一步）
// 实现者: CsvParser
pub trait FileParser: Send + Sync {
    /// 解析文件为原始行记录
    ///
    /// # 返回
    /// - Ok(RawTable): 表头 + 行记录
    /// - Err(FileNotFound): 路径不存在
    /// - Err: 格式错误 / 读取错误
    fn parse_to_raw_table(&self, file_path: &Path) -> ImportResult<RawTable>;
}

// ==========================================
// FieldMapper Trait
// ==========================================
// 用途: 将原始行映射为在途销售记录
// 实现者: SalesFieldMapper
pub trait FieldMapper: Send + Sync {
    /// 映射整张表
    ///
    /// # 返回
    /// - Ok(RecordSet): 行号从 1 开始，保持源文件顺序
    /// - Err(SchemaMismatch): 缺少固定列
    fn map_table(&self, table: RawTable) -> ImportResult<RecordSet<SalesRecord>>;
}
