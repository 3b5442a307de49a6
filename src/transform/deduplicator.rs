// ==========================================
// 销售数据 ETL 系统 - 去重器实现
// ==========================================
// 职责: 按业务键去除重复销售记录（保留首次出现）
// 默认键: fecha + producto + cantidad + precio_unitario + cliente_id
// ==========================================

use crate::domain::sales::{KeyPart, RecordSet, SalesRecord};
use crate::domain::types::SalesColumn;
use crate::transform::transform_trait::RecordDeduplicator;
use std::collections::HashSet;
use tracing::{debug, info};

/// 默认去重键
pub const DEFAULT_DEDUP_KEY: [SalesColumn; 5] = [
    SalesColumn::Fecha,
    SalesColumn::Producto,
    SalesColumn::Cantidad,
    SalesColumn::PrecioUnitario,
    SalesColumn::ClienteId,
];

pub struct Deduplicator {
    key_columns: Vec<SalesColumn>,
}

impl Default for Deduplicator {
    fn default() -> Self {
        Self::new(DEFAULT_DEDUP_KEY.to_vec())
    }
}

impl Deduplicator {
    pub fn new(key_columns: Vec<SalesColumn>) -> Self {
        Self { key_columns }
    }

    pub fn key_columns(&self) -> &[SalesColumn] {
        &self.key_columns
    }

    fn key_of(&self, record: &SalesRecord) -> Vec<KeyPart> {
        self.key_columns
            .iter()
            .map(|c| record.key_part(*c))
            .collect()
    }
}

impl RecordDeduplicator for Deduplicator {
    fn deduplicate(&self, records: RecordSet<SalesRecord>) -> (RecordSet<SalesRecord>, usize) {
        let before = records.len();
        let mut seen: HashSet<Vec<KeyPart>> = HashSet::with_capacity(before);

        let kept: RecordSet<SalesRecord> = records
            .into_iter()
            .filter(|record| {
                let first = seen.insert(self.key_of(record));
                if !first {
                    debug!(row = record.row_number, "重复记录");
                }
                first
            })
            .collect();

        let removed = before - kept.len();
        info!(removed, "去重完成");
        (kept, removed)
    }
}
