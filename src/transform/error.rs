// ==========================================
// 销售数据 ETL 系统 - 转换模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use crate::domain::sales::IncompleteRecord;
use crate::transform::transform_trait::RuleKind;
use thiserror::Error;

/// 转换模块错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransformError {
    #[error("清洗规则顺序错误: {rule} 必须在 {requires} 之后执行")]
    RuleOrder { rule: RuleKind, requires: RuleKind },

    #[error("合格记录无法定稿: {0}")]
    Incomplete(#[from] IncompleteRecord),
}

/// Result 类型别名
pub type TransformResult<T> = Result<T, TransformError>;
