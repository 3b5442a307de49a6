// ==========================================
// 销售数据 ETL 系统 - 领域类型定义
// ==========================================
// 职责: 固定列定义 / 拒绝原因 / 运行状态 / 阶段枚举
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 销售明细列 (Sales Column)
// ==========================================
// 红线: 顺序即目标表 INSERT 列顺序，不得调整
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SalesColumn {
    Fecha,
    Producto,
    Categoria,
    Cantidad,
    PrecioUnitario,
    Total,
    ClienteId,
    Region,
    Vendedor,
}

impl SalesColumn {
    /// 全部列（按 INSERT 顺序）
    pub const ALL: [SalesColumn; 9] = [
        SalesColumn::Fecha,
        SalesColumn::Producto,
        SalesColumn::Categoria,
        SalesColumn::Cantidad,
        SalesColumn::PrecioUnitario,
        SalesColumn::Total,
        SalesColumn::ClienteId,
        SalesColumn::Region,
        SalesColumn::Vendedor,
    ];

    /// 源文件 / 目标表中的列名
    pub fn as_str(&self) -> &'static str {
        match self {
            SalesColumn::Fecha => "fecha",
            SalesColumn::Producto => "producto",
            SalesColumn::Categoria => "categoria",
            SalesColumn::Cantidad => "cantidad",
            SalesColumn::PrecioUnitario => "precio_unitario",
            SalesColumn::Total => "total",
            SalesColumn::ClienteId => "cliente_id",
            SalesColumn::Region => "region",
            SalesColumn::Vendedor => "vendedor",
        }
    }
}

impl fmt::Display for SalesColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 拒绝原因 (Rejection Reason)
// ==========================================
// 顺序即校验顺序，拼接时保持该顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    MissingDate,     // 日期缺失
    InvalidQuantity, // 数量缺失或 <= 0
    InvalidPrice,    // 单价缺失或 <= 0
    EmptyProduct,    // 产品缺失或为空串
}

impl RejectionReason {
    pub const ALL: [RejectionReason; 4] = [
        RejectionReason::MissingDate,
        RejectionReason::InvalidQuantity,
        RejectionReason::InvalidPrice,
        RejectionReason::EmptyProduct,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RejectionReason::MissingDate => "missing_date",
            RejectionReason::InvalidQuantity => "invalid_quantity",
            RejectionReason::InvalidPrice => "invalid_price",
            RejectionReason::EmptyProduct => "empty_product",
        }
    }

    /// 拼接为审计表 rejection_reason 字段（", " 分隔）
    pub fn join(reasons: &[RejectionReason]) -> String {
        reasons
            .iter()
            .map(|r| r.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 运行状态 (Run Status)
// ==========================================
// 序列化格式: SCREAMING_SNAKE_CASE
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStatus {
    Started,
    Completed,
    Failed,
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunStatus::Started => write!(f, "STARTED"),
            RunStatus::Completed => write!(f, "COMPLETED"),
            RunStatus::Failed => write!(f, "FAILED"),
        }
    }
}

// ==========================================
// 管道阶段 (Stage)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Stage {
    Extract,
    Transform,
    Load,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Extract => write!(f, "EXTRACT"),
            Stage::Transform => write!(f, "TRANSFORM"),
            Stage::Load => write!(f, "LOAD"),
        }
    }
}
