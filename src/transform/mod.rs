// ==========================================
// 销售数据 ETL 系统 - 转换层
// ==========================================
// 职责: 在途记录集 → 合格记录集 + 拒绝记录 + 转换统计
// ==========================================

pub mod cleaning_rules;
pub mod deduplicator;
pub mod error;
pub mod transform_trait;
pub mod transformer;
pub mod validator;

pub use cleaning_rules::{
    compute_total, parse_date, parse_decimal, parse_quantity, title_case, CoerceDates,
    CoerceNumerics, FillNulls, NormalizeStrings,
};
pub use deduplicator::{Deduplicator, DEFAULT_DEDUP_KEY};
pub use error::{TransformError, TransformResult};
pub use transform_trait::{CleaningRule, RecordDeduplicator, RecordValidator, RuleKind, RuleOutcome};
pub use transformer::{TransformOutput, Transformer};
pub use validator::Validator;
