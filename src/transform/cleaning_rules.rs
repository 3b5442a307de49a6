// ==========================================
// 销售数据 ETL 系统 - 清洗规则库
// ==========================================
// 职责: TRIM / 标题大小写 / 日期转换 / 数值转换 / 缺失值填充
// 红线: 规则为纯函数，只返回新记录集与统计增量
// ==========================================

use crate::domain::metrics::StatDelta;
use crate::domain::sales::{
    Cell, RecordSet, SalesRecord, DEFAULT_CUSTOMER_ID, DEFAULT_SELLER,
};
use crate::domain::types::SalesColumn;
use crate::transform::transform_trait::{CleaningRule, RuleKind, RuleOutcome};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::{debug, info};

/// ISO 风格日期格式（优先尝试）
const ISO_DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y%m%d", "%Y/%m/%d"];

/// ISO 风格日期时间格式
const ISO_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
];

/// 日/月/年 格式（ISO 失败后的兜底）
const DAY_FIRST_FORMAT: &str = "%d/%m/%Y";

// ==========================================
// 纯函数工具
// ==========================================

/// 标题大小写：非字母字符之后的首个字母大写，其余字母小写
pub fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut prev_alpha = false;
    for ch in value.chars() {
        if ch.is_alphabetic() {
            if prev_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(ch);
            prev_alpha = false;
        }
    }
    out
}

/// 解析日期：先 ISO-8601，再 日/月/年；均失败返回 None
pub fn parse_date(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    parse_iso_date(value).or_else(|| {
        NaiveDate::parse_from_str(value, DAY_FIRST_FORMAT)
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
    })
}

fn parse_iso_date(value: &str) -> Option<NaiveDateTime> {
    for format in ISO_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }
    for format in ISO_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt);
        }
    }
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.naive_local())
}

/// 解析小数（普通或科学计数法）
pub fn parse_decimal(value: &str) -> Option<Decimal> {
    let value = value.trim();
    Decimal::from_str(value)
        .ok()
        .or_else(|| Decimal::from_scientific(value).ok())
}

/// 解析数量：整数，或小数部分为 0 的小数（"3.0"）
pub fn parse_quantity(value: &str) -> Option<i64> {
    let value = value.trim();
    if let Ok(q) = value.parse::<i64>() {
        return Some(q);
    }
    let d = parse_decimal(value)?;
    if d.fract().is_zero() {
        d.to_i64()
    } else {
        None
    }
}

/// 金额 = 数量 × 单价，保留 2 位小数（银行家舍入）；溢出返回 None
pub fn compute_total(quantity: i64, unit_price: Decimal) -> Option<Decimal> {
    Decimal::from(quantity)
        .checked_mul(unit_price)
        .map(|t| t.round_dp(2))
}

// ==========================================
// NormalizeStrings - 文本规范化
// ==========================================
// 范围: producto / categoria / region / vendedor / cliente_id
// region 额外做标题大小写
pub struct NormalizeStrings;

impl NormalizeStrings {
    fn normalize(value: &mut Option<String>, title: bool) -> bool {
        let Some(raw) = value.as_mut() else {
            return false;
        };
        let trimmed = raw.trim();
        let cleaned = if title {
            title_case(trimmed)
        } else {
            trimmed.to_string()
        };
        if cleaned != *raw {
            *raw = cleaned;
            true
        } else {
            false
        }
    }
}

impl CleaningRule for NormalizeStrings {
    fn kind(&self) -> RuleKind {
        RuleKind::NormalizeStrings
    }

    fn apply(&self, records: RecordSet<SalesRecord>) -> RuleOutcome {
        let mut changed = 0usize;
        let records = records.map(|mut r| {
            changed += [
                Self::normalize(&mut r.product, false),
                Self::normalize(&mut r.category, false),
                Self::normalize(&mut r.region, true),
                Self::normalize(&mut r.seller, false),
                Self::normalize(&mut r.customer_id, false),
            ]
            .iter()
            .filter(|c| **c)
            .count();
            r
        });

        info!(changed, "文本字段规范化完成");
        RuleOutcome::new(records, StatDelta::StringsNormalized(changed))
    }
}

// ==========================================
// CoerceDates - 日期转换
// ==========================================
// 解析失败 → 缺失标记（不报错）
// 增量 = 转换后缺失数 - 转换前缺失数
pub struct CoerceDates;

impl CleaningRule for CoerceDates {
    fn kind(&self) -> RuleKind {
        RuleKind::CoerceDates
    }

    fn apply(&self, records: RecordSet<SalesRecord>) -> RuleOutcome {
        let missing_before = records.iter().filter(|r| r.date.is_missing()).count() as i64;

        let records = records.map(|mut r| {
            r.date = match r.date {
                Cell::Raw(text) => parse_date(&text).map(Cell::Value).unwrap_or(Cell::Missing),
                other => other,
            };
            r
        });

        let missing_after = records.iter().filter(|r| r.date.is_missing()).count() as i64;
        let delta = missing_after - missing_before;

        info!(invalid_dates = delta, "日期转换完成");
        RuleOutcome::new(records, StatDelta::DatesInvalidated(delta))
    }
}

// ==========================================
// CoerceNumerics - 数值转换
// ==========================================
// 非数值 → 缺失；数量取绝对值（计数不丢弃）；金额无条件重算
pub struct CoerceNumerics;

impl CleaningRule for CoerceNumerics {
    fn kind(&self) -> RuleKind {
        RuleKind::CoerceNumerics
    }

    fn apply(&self, records: RecordSet<SalesRecord>) -> RuleOutcome {
        let mut negatives = 0usize;

        let records = records.map(|mut r| {
            let quantity = match r.quantity {
                Cell::Raw(text) => parse_quantity(&text),
                Cell::Value(q) => Some(q),
                Cell::Missing => None,
            };
            if quantity.is_some_and(|q| q < 0) {
                negatives += 1;
            }
            let quantity = quantity.and_then(|q| q.checked_abs());

            let unit_price = match r.unit_price {
                Cell::Raw(text) => parse_decimal(&text),
                Cell::Value(p) => Some(p),
                Cell::Missing => None,
            };

            r.total = match (quantity, unit_price) {
                (Some(q), Some(p)) => compute_total(q, p)
                    .map(Cell::Value)
                    .unwrap_or(Cell::Missing),
                _ => Cell::Missing,
            };
            r.quantity = quantity.map(Cell::Value).unwrap_or(Cell::Missing);
            r.unit_price = unit_price.map(Cell::Value).unwrap_or(Cell::Missing);
            r
        });

        info!(negatives_corrected = negatives, "数值转换完成");
        RuleOutcome::new(records, StatDelta::NegativesCorrected(negatives))
    }
}

// ==========================================
// FillNulls - 缺失值处理
// ==========================================
// 计数: 填充前全部列的缺失单元格
// 填充: 仅 vendedor / cliente_id，其余缺失留给校验器
pub struct FillNulls;

impl CleaningRule for FillNulls {
    fn kind(&self) -> RuleKind {
        RuleKind::FillNulls
    }

    fn prerequisites(&self) -> &'static [RuleKind] {
        &[RuleKind::CoerceDates, RuleKind::CoerceNumerics]
    }

    fn apply(&self, records: RecordSet<SalesRecord>) -> RuleOutcome {
        let mut total_nulls = 0usize;
        for column in SalesColumn::ALL {
            let count = records.iter().filter(|r| r.is_missing(column)).count();
            if count > 0 {
                debug!(column = %column, count, "缺失值");
            }
            total_nulls += count;
        }

        let records = records.map(|mut r| {
            r.seller.get_or_insert_with(|| DEFAULT_SELLER.to_string());
            r.customer_id
                .get_or_insert_with(|| DEFAULT_CUSTOMER_ID.to_string());
            r
        });

        info!(nulls = total_nulls, "缺失值处理完成");
        RuleOutcome::new(records, StatDelta::NullsFilled(total_nulls))
    }
}
