// ==========================================
// 销售数据 ETL 系统 - 转换阶段 Trait
// ==========================================
// 职责: 定义清洗规则 / 去重 / 校验接口（不包含实现）
// ==========================================

use crate::domain::metrics::StatDelta;
use crate::domain::sales::{RecordSet, RejectedRecord, SalesRecord};
use std::fmt;

// ==========================================
// RuleKind - 清洗规则标识
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    NormalizeStrings,
    CoerceDates,
    CoerceNumerics,
    FillNulls,
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RuleKind::NormalizeStrings => "normalize_strings",
            RuleKind::CoerceDates => "coerce_dates",
            RuleKind::CoerceNumerics => "coerce_numerics",
            RuleKind::FillNulls => "fill_nulls",
        };
        write!(f, "{}", name)
    }
}

/// 清洗规则输出：新记录集 + 统计增量
#[derive(Debug, Clone)]
pub struct RuleOutcome {
    pub records: RecordSet<SalesRecord>,
    pub delta: StatDelta,
}

impl RuleOutcome {
    pub fn new(records: RecordSet<SalesRecord>, delta: StatDelta) -> Self {
        Self { records, delta }
    }
}

// ==========================================
// CleaningRule Trait
// ==========================================
// 用途: 单个清洗步骤
// 实现者: NormalizeStrings, CoerceDates, CoerceNumerics, FillNulls
pub trait CleaningRule: Send + Sync {
    fn kind(&self) -> RuleKind;

    /// 必须在本规则之前执行的规则
    fn prerequisites(&self) -> &'static [RuleKind] {
        &[]
    }

    /// 应用规则
    ///
    /// # 返回
    /// - RuleOutcome: 记录数与输入一致，行序不变
    fn apply(&self, records: RecordSet<SalesRecord>) -> RuleOutcome;
}

// ==========================================
// RecordDeduplicator Trait
// ==========================================
// 实现者: Deduplicator
pub trait RecordDeduplicator: Send + Sync {
    /// 去除重复记录（保留首次出现）
    ///
    /// # 返回
    /// - (去重后记录集, 删除条数)
    fn deduplicate(&self, records: RecordSet<SalesRecord>) -> (RecordSet<SalesRecord>, usize);
}

// ==========================================
// RecordValidator Trait
// ==========================================
// 实现者: Validator
pub trait RecordValidator: Send + Sync {
    /// 划分合格 / 拒绝记录
    ///
    /// # 返回
    /// - (合格记录集, 拒绝记录列表)，两者条数之和等于输入条数
    fn validate(&self, records: RecordSet<SalesRecord>)
        -> (RecordSet<SalesRecord>, Vec<RejectedRecord>);
}
