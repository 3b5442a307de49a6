// ==========================================
// 销售数据 ETL 系统 - 领域模型层
// ==========================================
// 职责: 定义记录、记录集、运行指标与枚举类型
// 红线: 不含数据访问逻辑,不含清洗规则
// ==========================================

pub mod metrics;
pub mod sales;
pub mod types;

// 重导出核心类型
pub use metrics::{RunMetrics, StageMetrics, StatDelta, TransformStats};
pub use sales::{
    Cell, CleanSalesRecord, IncompleteRecord, KeyPart, RecordSet, RejectedRecord, SalesRecord,
    DEFAULT_CUSTOMER_ID, DEFAULT_SELLER,
};
pub use types::{RejectionReason, RunStatus, SalesColumn, Stage};
