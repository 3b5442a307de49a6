// ==========================================
// 销售数据 ETL 系统 - 业务规则校验器实现
// ==========================================
// 规则（按顺序，全部检查，不短路）:
// 1. missing_date      - 日期缺失
// 2. invalid_quantity  - 数量缺失或 <= 0，或 数量 × 单价 超出金额表示范围
// 3. invalid_price     - 单价缺失或 <= 0
// 4. empty_product     - 产品缺失或为空串
// ==========================================

use crate::domain::sales::{Cell, RecordSet, RejectedRecord, SalesRecord};
use crate::domain::types::RejectionReason;
use crate::transform::transform_trait::RecordValidator;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::{info, warn};

pub struct Validator;

impl Validator {
    /// 检查单条记录，返回违规规则（按规则顺序）
    pub fn check(&self, record: &SalesRecord) -> Vec<RejectionReason> {
        let mut reasons = Vec::new();

        if !matches!(record.date, Cell::Value(_)) {
            reasons.push(RejectionReason::MissingDate);
        }

        let quantity_ok = matches!(record.quantity, Cell::Value(q) if q > 0);
        let price_ok = matches!(record.unit_price, Cell::Value(p) if p > Decimal::ZERO);
        // 数量与单价均合法时 total 必须已算出（乘积溢出时为缺失）
        let total_ok = !(quantity_ok && price_ok) || matches!(record.total, Cell::Value(_));

        if !quantity_ok || !total_ok {
            reasons.push(RejectionReason::InvalidQuantity);
        }
        if !price_ok {
            reasons.push(RejectionReason::InvalidPrice);
        }

        match record.product.as_deref() {
            Some(p) if !p.is_empty() => {}
            _ => reasons.push(RejectionReason::EmptyProduct),
        }

        reasons
    }
}

impl RecordValidator for Validator {
    fn validate(
        &self,
        records: RecordSet<SalesRecord>,
    ) -> (RecordSet<SalesRecord>, Vec<RejectedRecord>) {
        let mut accepted = Vec::with_capacity(records.len());
        let mut rejected = Vec::new();
        let mut per_rule: BTreeMap<RejectionReason, usize> = BTreeMap::new();

        for record in records {
            let reasons = self.check(&record);
            if reasons.is_empty() {
                accepted.push(record);
                continue;
            }
            for reason in &reasons {
                *per_rule.entry(*reason).or_insert(0) += 1;
            }
            rejected.push(RejectedRecord::from_record(&record, reasons));
        }

        for (reason, count) in &per_rule {
            warn!(rule = %reason, count, "校验规则违规");
        }
        info!(
            accepted = accepted.len(),
            rejected = rejected.len(),
            "业务规则校验完成"
        );

        (RecordSet::new(accepted), rejected)
    }
}
