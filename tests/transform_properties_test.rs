// ==========================================
// 转换阶段性质测试
// ==========================================
// 测试目标: 在随机生成的记录集上验证转换阶段的不变量
// 工具: proptest（失败用例自动收缩）
// ==========================================

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::collections::HashSet;
use ventas_etl::domain::{Cell, RecordSet, RejectionReason, SalesRecord};
use ventas_etl::transform::{
    CleaningRule, CoerceDates, CoerceNumerics, Deduplicator, NormalizeStrings, RecordDeduplicator,
    Transformer,
};

fn opt(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

// ==========================================
// 策略
// ==========================================

fn arb_date() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::sample::select(vec!["2024-01-05", "15/01/2024", "2024-02-29", ""]).prop_map(String::from),
        (2000i32..2030, 1u32..13, 1u32..32).prop_map(|(y, m, d)| format!("{y:04}-{m:02}-{d:02}")),
        (2000i32..2030, 1u32..13, 1u32..32).prop_map(|(y, m, d)| format!("{d:02}/{m:02}/{y:04}")),
        "[a-z ]{0,8}",
    ]
}

fn arb_product() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::sample::select(vec!["Mouse", " Teclado ", "", "Monitor", "   "]).prop_map(String::from),
        "[A-Za-z ]{0,12}",
    ]
}

fn arb_quantity() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::sample::select(vec!["1", "-2", "0", "3.0", "2.5", "abc", ""]).prop_map(String::from),
        (-50i64..50).prop_map(|q| q.to_string()),
        any::<i64>().prop_map(|q| q.to_string()),
    ]
}

fn arb_price() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::sample::select(vec!["10.00", "0.335", "-5", "0", "1e2", "gratis", ""]).prop_map(String::from),
        (-100_000i64..100_000, 0u32..4).prop_map(|(m, s)| Decimal::new(m, s).to_string()),
        (any::<i64>(), 0u32..6).prop_map(|(m, s)| Decimal::new(m, s).to_string()),
    ]
}

fn arb_record() -> impl Strategy<Value = SalesRecord> {
    (
        arb_date(),
        arb_product(),
        arb_quantity(),
        arb_price(),
        prop::sample::select(vec!["999", "", "1"]),
        prop::sample::select(vec!["CLI-00001", "CLI-00002", ""]),
        prop::sample::select(vec!["lima norte", "CUSCO", "", "  ica "]),
        prop::sample::select(vec!["Ana", "Luis", ""]),
    )
        .prop_map(|(date, product, quantity, price, total, customer, region, seller)| SalesRecord {
            row_number: 0,
            date: Cell::from_source(opt(date)),
            product: opt(product),
            category: Some("Varios".to_string()),
            quantity: Cell::from_source(opt(quantity)),
            unit_price: Cell::from_source(opt(price)),
            total: Cell::from_source(opt(total.to_string())),
            customer_id: opt(customer.to_string()),
            region: opt(region.to_string()),
            seller: opt(seller.to_string()),
        })
}

fn arb_records() -> impl Strategy<Value = RecordSet<SalesRecord>> {
    prop::collection::vec(arb_record(), 0..80).prop_map(|records| {
        records
            .into_iter()
            .enumerate()
            .map(|(i, mut record)| {
                record.row_number = i + 1;
                record
            })
            .collect()
    })
}

fn coerced(records: RecordSet<SalesRecord>) -> RecordSet<SalesRecord> {
    let records = NormalizeStrings.apply(records).records;
    let records = CoerceDates.apply(records).records;
    CoerceNumerics.apply(records).records
}

// ==========================================
// 性质
// ==========================================

proptest! {
    #[test]
    fn total_always_recomputed(records in arb_records()) {
        for record in coerced(records).iter() {
            match (&record.quantity, &record.unit_price) {
                (Cell::Value(q), Cell::Value(p)) => match Decimal::from(*q).checked_mul(*p) {
                    Some(product) => prop_assert_eq!(&record.total, &Cell::Value(product.round_dp(2))),
                    None => prop_assert!(record.total.is_missing()),
                },
                _ => prop_assert!(record.total.is_missing()),
            }
            if let Cell::Value(q) = record.quantity {
                prop_assert!(q >= 0);
            }
        }
    }

    #[test]
    fn deduplication_idempotent(records in arb_records()) {
        let dedup = Deduplicator::default();
        let (once, _) = dedup.deduplicate(coerced(records));
        let (twice, removed_again) = dedup.deduplicate(once.clone());

        prop_assert_eq!(removed_again, 0);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn partition_and_reasons(records in arb_records()) {
        let all: HashSet<RejectionReason> = RejectionReason::ALL.into_iter().collect();

        let output = Transformer::default().transform(records);
        prop_assert!(output.is_ok(), "transform failed: {:?}", output.as_ref().err());
        let output = output.unwrap();
        let stats = &output.stats;

        prop_assert_eq!(
            stats.accepted_count + stats.rejected_count,
            stats.original_count - stats.duplicates_removed
        );
        prop_assert_eq!(output.clean.len(), stats.accepted_count);
        prop_assert_eq!(output.rejected.len(), stats.rejected_count);

        for rejected in &output.rejected {
            let reasons: HashSet<RejectionReason> = rejected.reasons().iter().copied().collect();
            prop_assert!(!reasons.is_empty());
            prop_assert!(reasons.is_subset(&all));
            prop_assert_eq!(reasons.len(), rejected.reasons().len());
        }

        for clean in output.clean.iter() {
            prop_assert!(clean.quantity > 0);
            prop_assert!(clean.unit_price > Decimal::ZERO);
            prop_assert!(!clean.product.is_empty());
            prop_assert_eq!(
                clean.total,
                (Decimal::from(clean.quantity) * clean.unit_price).round_dp(2)
            );
        }
    }

    #[test]
    fn row_order_preserved(records in arb_records()) {
        let output = Transformer::default().transform(records).unwrap();

        let rows: Vec<usize> = output.clean.iter().map(|r| r.row_number).collect();
        let mut sorted = rows.clone();
        sorted.sort_unstable();

        prop_assert_eq!(rows, sorted);
    }
}
