// ==========================================
// 销售数据 ETL 系统 - 转换管道
// ==========================================
// 流程（固定顺序）:
// 1. 文本规范化  2. 日期转换  3. 数值转换  4. 缺失值处理
// 5. 去重        6. 业务规则校验  7. 定稿为入库记录
// 红线: 合格数 + 拒绝数 == 去重后记录数
// ==========================================

use crate::domain::metrics::TransformStats;
use crate::domain::sales::{CleanSalesRecord, RecordSet, RejectedRecord, SalesRecord};
use crate::transform::cleaning_rules::{CoerceDates, CoerceNumerics, FillNulls, NormalizeStrings};
use crate::transform::deduplicator::Deduplicator;
use crate::transform::error::{TransformError, TransformResult};
use crate::transform::transform_trait::{CleaningRule, RecordDeduplicator, RecordValidator};
use crate::transform::validator::Validator;
use std::convert::TryFrom;
use tracing::{debug, info, instrument};

/// 转换阶段输出
#[derive(Debug, Clone)]
pub struct TransformOutput {
    pub clean: RecordSet<CleanSalesRecord>,
    pub rejected: Vec<RejectedRecord>,
    pub stats: TransformStats,
}

// ==========================================
// Transformer - 转换管道
// ==========================================
pub struct Transformer {
    rules: Vec<Box<dyn CleaningRule>>,
    deduplicator: Box<dyn RecordDeduplicator>,
    validator: Box<dyn RecordValidator>,
}

impl Default for Transformer {
    fn default() -> Self {
        Self {
            rules: Self::standard_rules(),
            deduplicator: Box::new(Deduplicator::default()),
            validator: Box::new(Validator),
        }
    }
}

impl Transformer {
    /// 自定义管道；规则顺序不满足前置依赖时返回 RuleOrder
    pub fn new(
        rules: Vec<Box<dyn CleaningRule>>,
        deduplicator: Box<dyn RecordDeduplicator>,
        validator: Box<dyn RecordValidator>,
    ) -> TransformResult<Self> {
        Self::check_rule_order(&rules)?;
        Ok(Self {
            rules,
            deduplicator,
            validator,
        })
    }

    /// 标准清洗规则序列
    pub fn standard_rules() -> Vec<Box<dyn CleaningRule>> {
        vec![
            Box::new(NormalizeStrings),
            Box::new(CoerceDates),
            Box::new(CoerceNumerics),
            Box::new(FillNulls),
        ]
    }

    fn check_rule_order(rules: &[Box<dyn CleaningRule>]) -> TransformResult<()> {
        for (idx, rule) in rules.iter().enumerate() {
            for required in rule.prerequisites() {
                let satisfied = rules[..idx].iter().any(|r| r.kind() == *required);
                if !satisfied {
                    return Err(TransformError::RuleOrder {
                        rule: rule.kind(),
                        requires: *required,
                    });
                }
            }
        }
        Ok(())
    }

    /// 执行完整转换
    #[instrument(skip_all, fields(records = records.len()))]
    pub fn transform(&self, records: RecordSet<SalesRecord>) -> TransformResult<TransformOutput> {
        let mut stats = TransformStats::new(records.len());

        // === 清洗规则 ===
        let mut current = records;
        for rule in &self.rules {
            let outcome = rule.apply(current);
            debug!(rule = %rule.kind(), delta = ?outcome.delta, "清洗规则完成");
            stats.absorb(outcome.delta);
            current = outcome.records;
        }

        // === 去重 ===
        let (deduped, removed) = self.deduplicator.deduplicate(current);
        stats.duplicates_removed = removed;
        let deduped_count = deduped.len();

        // === 校验 ===
        let (accepted, rejected) = self.validator.validate(deduped);
        stats.accepted_count = accepted.len();
        stats.rejected_count = rejected.len();
        debug_assert_eq!(stats.accepted_count + stats.rejected_count, deduped_count);

        // === 定稿 ===
        let clean = accepted
            .into_iter()
            .map(CleanSalesRecord::try_from)
            .collect::<Result<RecordSet<_>, _>>()?;

        info!(
            original = stats.original_count,
            strings_normalized = stats.strings_normalized,
            dates_invalidated = stats.dates_invalidated,
            negatives_corrected = stats.negatives_corrected,
            nulls = stats.nulls_filled,
            duplicates_removed = stats.duplicates_removed,
            accepted = stats.accepted_count,
            rejected = stats.rejected_count,
            rejection_rate = %format!("{:.1}%", stats.rejection_rate()),
            "转换完成"
        );

        Ok(TransformOutput {
            clean,
            rejected,
            stats,
        })
    }
}
