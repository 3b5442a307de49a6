// ==========================================
// 销售数据 ETL 系统 - 销售明细领域模型
// ==========================================
// 职责: 记录集 / 在途记录 / 入库记录 / 拒绝记录
// 红线: 记录集由当前阶段独占，阶段之间按值移交
// ==========================================

use crate::domain::types::{RejectionReason, SalesColumn};
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use thiserror::Error;

/// 缺失销售员时的默认值
pub const DEFAULT_SELLER: &str = "Sin asignar";

/// 缺失客户编号时的默认值
pub const DEFAULT_CUSTOMER_ID: &str = "CLI-00000";

// ==========================================
// Cell - 带类型的单元格
// ==========================================
// Raw: 尚未转换的源文本
// Value: 转换成功
// Missing: 源为空或转换失败
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum Cell<T> {
    Missing,
    Raw(String),
    Value(T),
}

impl<T> Cell<T> {
    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Cell::Value(v) => Some(v),
            _ => None,
        }
    }

    /// 源文本为空时视为缺失
    pub fn from_source(raw: Option<String>) -> Self {
        match raw {
            Some(text) => Cell::Raw(text),
            None => Cell::Missing,
        }
    }
}

// ==========================================
// SalesRecord - 在途销售记录
// ==========================================
// 用途: 抽取 → 清洗 → 去重 → 校验 全程使用
// 序列化: 列名与源文件一致，作为拒绝记录快照
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesRecord {
    #[serde(skip)]
    pub row_number: usize, // 源文件数据行号（从 1 开始）

    #[serde(rename = "fecha")]
    pub date: Cell<NaiveDateTime>,
    #[serde(rename = "producto")]
    pub product: Option<String>,
    #[serde(rename = "categoria")]
    pub category: Option<String>,
    #[serde(rename = "cantidad")]
    pub quantity: Cell<i64>,
    #[serde(rename = "precio_unitario")]
    pub unit_price: Cell<Decimal>,
    #[serde(rename = "total")]
    pub total: Cell<Decimal>,
    #[serde(rename = "cliente_id")]
    pub customer_id: Option<String>,
    #[serde(rename = "region")]
    pub region: Option<String>,
    #[serde(rename = "vendedor")]
    pub seller: Option<String>,
}

impl SalesRecord {
    /// 构造全部字段缺失的记录
    pub fn empty(row_number: usize) -> Self {
        Self {
            row_number,
            date: Cell::Missing,
            product: None,
            category: None,
            quantity: Cell::Missing,
            unit_price: Cell::Missing,
            total: Cell::Missing,
            customer_id: None,
            region: None,
            seller: None,
        }
    }

    /// 指定列是否缺失
    pub fn is_missing(&self, column: SalesColumn) -> bool {
        match column {
            SalesColumn::Fecha => self.date.is_missing(),
            SalesColumn::Producto => self.product.is_none(),
            SalesColumn::Categoria => self.category.is_none(),
            SalesColumn::Cantidad => self.quantity.is_missing(),
            SalesColumn::PrecioUnitario => self.unit_price.is_missing(),
            SalesColumn::Total => self.total.is_missing(),
            SalesColumn::ClienteId => self.customer_id.is_none(),
            SalesColumn::Region => self.region.is_none(),
            SalesColumn::Vendedor => self.seller.is_none(),
        }
    }

    /// 去重键分量（缺失值之间相等）
    pub fn key_part(&self, column: SalesColumn) -> KeyPart {
        fn text(v: &Option<String>) -> KeyPart {
            v.as_ref()
                .map(|s| KeyPart::Text(s.clone()))
                .unwrap_or(KeyPart::Missing)
        }

        match column {
            SalesColumn::Fecha => match &self.date {
                Cell::Missing => KeyPart::Missing,
                Cell::Raw(s) => KeyPart::Text(s.clone()),
                Cell::Value(d) => KeyPart::DateTime(*d),
            },
            SalesColumn::Cantidad => match &self.quantity {
                Cell::Missing => KeyPart::Missing,
                Cell::Raw(s) => KeyPart::Text(s.clone()),
                Cell::Value(q) => KeyPart::Integer(*q),
            },
            SalesColumn::PrecioUnitario => decimal_part(&self.unit_price),
            SalesColumn::Total => decimal_part(&self.total),
            SalesColumn::Producto => text(&self.product),
            SalesColumn::Categoria => text(&self.category),
            SalesColumn::ClienteId => text(&self.customer_id),
            SalesColumn::Region => text(&self.region),
            SalesColumn::Vendedor => text(&self.seller),
        }
    }
}

fn decimal_part(cell: &Cell<Decimal>) -> KeyPart {
    match cell {
        Cell::Missing => KeyPart::Missing,
        Cell::Raw(s) => KeyPart::Text(s.clone()),
        Cell::Value(d) => KeyPart::Decimal(*d),
    }
}

// ==========================================
// KeyPart - 去重键分量
// ==========================================
// Decimal 的 Hash 与数值相等一致（1.0 与 1.00 视为同一键）
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyPart {
    Missing,
    Text(String),
    DateTime(NaiveDateTime),
    Integer(i64),
    Decimal(Decimal),
}

// ==========================================
// CleanSalesRecord - 入库销售记录
// ==========================================
// 用途: 元数据定稿后的完整类型记录，直接对应目标表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanSalesRecord {
    pub row_number: usize,
    pub date: NaiveDate,
    pub product: String,
    pub category: Option<String>,
    pub quantity: i64,
    pub unit_price: Decimal,
    pub total: Decimal,
    pub customer_id: String,
    pub region: Option<String>,
    pub seller: String,
}

/// 在途记录缺少入库必需字段
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("记录不完整 (行 {row_number}, 字段 {column})")]
pub struct IncompleteRecord {
    pub row_number: usize,
    pub column: SalesColumn,
}

impl TryFrom<SalesRecord> for CleanSalesRecord {
    type Error = IncompleteRecord;

    fn try_from(record: SalesRecord) -> Result<Self, Self::Error> {
        let row_number = record.row_number;
        let missing = |column| IncompleteRecord { row_number, column };

        let date = match record.date {
            Cell::Value(dt) => dt.date(),
            _ => return Err(missing(SalesColumn::Fecha)),
        };
        let quantity = match record.quantity {
            Cell::Value(q) => q,
            _ => return Err(missing(SalesColumn::Cantidad)),
        };
        let unit_price = match record.unit_price {
            Cell::Value(p) => p,
            _ => return Err(missing(SalesColumn::PrecioUnitario)),
        };
        let total = match record.total {
            Cell::Value(t) => t,
            _ => return Err(missing(SalesColumn::Total)),
        };

        Ok(Self {
            row_number,
            date,
            product: record.product.ok_or_else(|| missing(SalesColumn::Producto))?,
            category: record.category,
            quantity,
            unit_price,
            total,
            customer_id: record
                .customer_id
                .ok_or_else(|| missing(SalesColumn::ClienteId))?,
            region: record.region,
            seller: record.seller.ok_or_else(|| missing(SalesColumn::Vendedor))?,
        })
    }
}

// ==========================================
// RecordSet - 有序记录集
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSet<R> {
    records: Vec<R>,
}

impl<R> RecordSet<R> {
    pub fn new(records: Vec<R>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.records.iter()
    }

    pub fn as_slice(&self) -> &[R] {
        &self.records
    }

    pub fn into_vec(self) -> Vec<R> {
        self.records
    }

    /// 逐条转换，返回新的记录集
    pub fn map<U, F>(self, f: F) -> RecordSet<U>
    where
        F: FnMut(R) -> U,
    {
        RecordSet::new(self.records.into_iter().map(f).collect())
    }
}

impl<R> Default for RecordSet<R> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<R> From<Vec<R>> for RecordSet<R> {
    fn from(records: Vec<R>) -> Self {
        Self::new(records)
    }
}

impl<R> FromIterator<R> for RecordSet<R> {
    fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<R> IntoIterator for RecordSet<R> {
    type Item = R;
    type IntoIter = std::vec::IntoIter<R>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a, R> IntoIterator for &'a RecordSet<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

// ==========================================
// RejectedRecord - 拒绝记录
// ==========================================
// 红线: 仅由校验器创建，创建后不可变，只入审计表不再处理
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedRecord {
    row_number: usize,
    raw_data: String,
    reasons: Vec<RejectionReason>,
    rejection_reason: String,
}

impl RejectedRecord {
    /// 以校验时刻的记录状态生成快照
    pub fn from_record(record: &SalesRecord, reasons: Vec<RejectionReason>) -> Self {
        let raw_data = serde_json::to_string(record).unwrap_or_else(|_| "{}".to_string());
        let rejection_reason = RejectionReason::join(&reasons);
        Self {
            row_number: record.row_number,
            raw_data,
            reasons,
            rejection_reason,
        }
    }

    pub fn row_number(&self) -> usize {
        self.row_number
    }

    /// 原始字段快照（JSON）
    pub fn raw_data(&self) -> &str {
        &self.raw_data
    }

    pub fn reasons(&self) -> &[RejectionReason] {
        &self.reasons
    }

    /// 逗号拼接的违规规则标识
    pub fn rejection_reason(&self) -> &str {
        &self.rejection_reason
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn complete_record() -> SalesRecord {
        SalesRecord {
            row_number: 3,
            date: Cell::Value(
                NaiveDate::from_ymd_opt(2024, 3, 15)
                    .unwrap()
                    .and_hms_opt(10, 30, 0)
                    .unwrap(),
            ),
            product: Some("Laptop HP".to_string()),
            category: Some("Laptops".to_string()),
            quantity: Cell::Value(2),
            unit_price: Cell::Value(dec("1500.50")),
            total: Cell::Value(dec("3001.00")),
            customer_id: Some("CLI-00042".to_string()),
            region: Some("Lima Norte".to_string()),
            seller: Some("Ana Torres".to_string()),
        }
    }

    #[test]
    fn test_snapshot_uses_source_column_names() {
        let mut record = complete_record();
        record.quantity = Cell::Missing;
        record.region = None;

        let json: serde_json::Value = serde_json::to_value(&record).unwrap();

        assert_eq!(json["producto"], "Laptop HP");
        assert_eq!(json["fecha"], "2024-03-15T10:30:00");
        assert!(json["cantidad"].is_null());
        assert!(json["region"].is_null());
        assert!(json.get("row_number").is_none());
    }

    #[test]
    fn test_clean_record_drops_time_of_day() {
        let clean = CleanSalesRecord::try_from(complete_record()).unwrap();
        assert_eq!(clean.date, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        assert_eq!(clean.quantity, 2);
        assert_eq!(clean.row_number, 3);
    }

    #[test]
    fn test_clean_record_requires_price() {
        let mut record = complete_record();
        record.unit_price = Cell::Raw("abc".to_string());

        let err = CleanSalesRecord::try_from(record).unwrap_err();
        assert_eq!(err.column, SalesColumn::PrecioUnitario);
        assert_eq!(err.row_number, 3);
    }

    #[test]
    fn test_key_part_decimal_scale_insensitive() {
        let mut a = complete_record();
        let mut b = complete_record();
        a.unit_price = Cell::Value(dec("10.5"));
        b.unit_price = Cell::Value(dec("10.50"));
        assert_eq!(
            a.key_part(SalesColumn::PrecioUnitario),
            b.key_part(SalesColumn::PrecioUnitario)
        );
    }

    #[test]
    fn test_rejected_record_is_snapshot() {
        let mut record = complete_record();
        record.product = Some(String::new());
        let rejected = RejectedRecord::from_record(&record, vec![RejectionReason::EmptyProduct]);

        record.product = Some("changed".to_string());

        assert_eq!(rejected.rejection_reason(), "empty_product");
        assert!(rejected.raw_data().contains("\"producto\":\"\""));
        assert_eq!(rejected.row_number(), 3);
    }
}
