// ==========================================
// 销售数据 ETL 系统 - 字段映射器实现
// ==========================================
// 职责: 固定列检查 + 原始行 → SalesRecord（单元格保持原始文本）
// ==========================================

use crate::domain::sales::{Cell, RecordSet, SalesRecord};
use crate::domain::types::SalesColumn;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::importer_trait::{FieldMapper, RawTable};
use std::collections::HashMap;

/// 视为缺失值的源文本（精确匹配，不做 trim）
pub const NA_TOKENS: [&str; 12] = [
    "", "NA", "N/A", "n/a", "#N/A", "NULL", "null", "NaN", "nan", "None", "<NA>", "-nan",
];

pub struct SalesFieldMapper;

impl FieldMapper for SalesFieldMapper {
    fn map_table(&self, table: RawTable) -> ImportResult<RecordSet<SalesRecord>> {
        let missing: Vec<String> = SalesColumn::ALL
            .iter()
            .filter(|c| !table.headers.iter().any(|h| h == c.as_str()))
            .map(|c| c.as_str().to_string())
            .collect();

        if !missing.is_empty() {
            return Err(ImportError::SchemaMismatch { missing });
        }

        Ok(table
            .rows
            .into_iter()
            .enumerate()
            .map(|(idx, row)| self.map_row(&row, idx + 1))
            .collect())
    }
}

impl SalesFieldMapper {
    /// 映射单行
    pub fn map_row(&self, row: &HashMap<String, String>, row_number: usize) -> SalesRecord {
        SalesRecord {
            row_number,
            date: Cell::from_source(self.get_string(row, SalesColumn::Fecha)),
            product: self.get_string(row, SalesColumn::Producto),
            category: self.get_string(row, SalesColumn::Categoria),
            quantity: Cell::from_source(self.get_string(row, SalesColumn::Cantidad)),
            unit_price: Cell::from_source(self.get_string(row, SalesColumn::PrecioUnitario)),
            total: Cell::from_source(self.get_string(row, SalesColumn::Total)),
            customer_id: self.get_string(row, SalesColumn::ClienteId),
            region: self.get_string(row, SalesColumn::Region),
            seller: self.get_string(row, SalesColumn::Vendedor),
        }
    }

    /// 提取字段；缺列或缺失标记 → None
    fn get_string(&self, row: &HashMap<String, String>, column: SalesColumn) -> Option<String> {
        row.get(column.as_str())
            .filter(|v| !NA_TOKENS.contains(&v.as_str()))
            .cloned()
    }
}
