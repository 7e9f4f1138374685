//! # Rollup and Reporting Flows
//!
//! Payments through the monthly rollup, gap filling, report templates, and
//! CSV export.

use chrono::NaiveDate;
use comtrack_core::{MonthKey, Payment, RawPayment};
use comtrack_engine::{
    date_range_at, fill_month_gaps, months_back_from, months_in_range, rollup_monthly, Period,
    RollupOptions, TimeSeriesData,
};
use comtrack_report::{
    export_csv_as, to_csv, InMemoryTemplates, ReportError, ReportTemplate, TemplateRepository,
};
use proptest::prelude::*;
use serde_json::json;

fn key(s: &str) -> MonthKey {
    s.parse().unwrap()
}

fn dated(id: &str, y: i32, m: u32, d: u32, ape: f64) -> Payment {
    Payment::new(id, "LIFE-01", ape, ape / 2.0).with_date(NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

fn book_of_payments() -> Vec<Payment> {
    vec![
        dated("a", 2025, 4, 3, 1_000.0).with_advisor_email("ana@example.com"),
        dated("b", 2025, 4, 28, 2_000.0).with_advisor_id(7).with_commission(100.0),
        dated("c", 2025, 6, 1, 500.0).with_advisor_email("ben@example.com"),
        dated("d", 2025, 9, 30, 1_500.0).with_advisor_email("ana@example.com"),
        dated("e", 2024, 12, 31, 9_999.0),
        Payment::new("undated", "LIFE-01", 777.0, 0.0),
    ]
}

// =========================================================================
// Rollup
// =========================================================================

#[test]
fn six_month_window_at_september() {
    let months: Vec<String> = months_back_from(key("2025-09"), 6)
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(
        months,
        vec!["2025-04", "2025-05", "2025-06", "2025-07", "2025-08", "2025-09"]
    );
}

#[test]
fn rollup_sums_mixed_strategies_per_month() {
    let options = RollupOptions::new().within(date_range_at(Period::Last6Months, key("2025-09")));
    let series = rollup_monthly(&book_of_payments(), &options);

    let months: Vec<String> = series.iter().map(|r| r.month.to_string()).collect();
    assert_eq!(months, vec!["2025-04", "2025-06", "2025-09"]);

    let april = &series[0];
    assert_eq!(april.count, 2);
    assert_eq!(april.total_ape, 3_000.0);
    assert_eq!(april.total_receipts, 1_500.0);
    // 3% of 1000 estimated plus 100 attached.
    assert!((april.total_commission - 130.0).abs() < 1e-9);
}

#[test]
fn advisor_filter_uses_resolved_identity() {
    let options = RollupOptions::new()
        .advisor("ana@example.com")
        .advisor("advisor-7");
    let series = rollup_monthly(&book_of_payments(), &options);
    let total: usize = series.iter().map(|r| r.count).sum();
    assert_eq!(total, 3);
}

#[test]
fn malformed_dates_only_exclude_their_record() {
    let raw: Vec<RawPayment> = serde_json::from_value(json!([
        {"id": "ok", "productId": "LIFE-01", "ape": 100, "date": "2025-02-10"},
        {"id": "bad", "productId": "LIFE-01", "ape": 100, "date": "10/02/2025"},
        {"id": "none", "productId": "LIFE-01", "ape": 100}
    ]))
    .unwrap();
    let payments: Vec<Payment> = raw.into_iter().map(Payment::from).collect();
    let series = rollup_monthly(&payments, &RollupOptions::new());
    assert_eq!(series.len(), 1);
    assert_eq!(series[0].count, 1);
}

#[test]
fn gaps_are_zero_filled_in_requested_order() {
    let sparse = rollup_monthly(&book_of_payments(), &RollupOptions::new());
    let months = months_in_range(date_range_at(Period::Last6Months, key("2025-09")));
    let dense = fill_month_gaps(&sparse, &months);

    assert_eq!(dense.len(), 6);
    assert_eq!(dense[1], TimeSeriesData::empty(key("2025-05")));
    assert_eq!(dense[5].count, 1);
}

// =========================================================================
// Templates
// =========================================================================

#[test]
fn saved_template_renders_dense_series() {
    let mut repo = InMemoryTemplates::new();
    let template = ReportTemplate::new("Ana YTD", Period::Ytd).with_advisor("ana@example.com");
    repo.save(template.clone());

    let loaded = repo.get(template.id).unwrap();
    let series = loaded.render_at(&book_of_payments(), key("2025-09"));
    assert_eq!(series.len(), 9);
    assert_eq!(series[3].month, key("2025-04"));
    assert_eq!(series[3].count, 1);
    assert_eq!(series[8].count, 1);
    let total: usize = series.iter().map(|r| r.count).sum();
    assert_eq!(total, 2);
}

// =========================================================================
// CSV export
// =========================================================================

#[test]
fn series_exports_as_csv_for_managers() {
    let options = RollupOptions::new().from_month(key("2025-04")).to_month(key("2025-04"));
    let series = rollup_monthly(&book_of_payments(), &options);
    let body = export_csv_as("MANAGER", &series).unwrap();
    assert_eq!(
        body,
        "month,totalCommission,count,totalApe,totalReceipts\n2025-04,130,2,3000,1500"
    );
}

#[test]
fn csv_export_denied_for_other_roles() {
    let err = export_csv_as("introducer", &[json!({"a": 1})]).unwrap_err();
    assert!(matches!(err, ReportError::ExportDenied { ref role } if role == "introducer"));
}

#[test]
fn csv_quotes_commas() {
    assert_eq!(to_csv(&[json!({"a": 1, "b": "x,y"})]).unwrap(), "a,b\n1,\"x,y\"");
}

// =========================================================================
// Properties
// =========================================================================

fn arb_payment() -> impl Strategy<Value = Payment> {
    (
        prop::option::of((2023i32..2026, 1u32..=12, 1u32..=28)),
        0.0f64..10_000.0,
        prop::option::of(0.0f64..500.0),
        prop::option::of(0u64..5),
    )
        .prop_map(|(date, ape, commission, advisor)| {
            let mut payment = Payment::new("p", "LIFE-01", ape, 0.0);
            if let Some((y, m, d)) = date {
                payment = payment.with_date(NaiveDate::from_ymd_opt(y, m, d).unwrap());
            }
            payment.commission = commission;
            payment.advisor_id = advisor;
            payment
        })
}

proptest! {
    #[test]
    fn bucket_counts_partition_filtered_payments(
        payments in prop::collection::vec(arb_payment(), 0..60),
        from_offset in 0i64..36,
        span in 0i64..36,
    ) {
        let from = key("2023-01").checked_add_months(from_offset).unwrap();
        let to = from.checked_add_months(span).unwrap();
        let options = RollupOptions::new()
            .from_month(from)
            .to_month(to)
            .advisor("advisor-1")
            .advisor("advisor-3");

        let series = rollup_monthly(&payments, &options);
        let expected = payments
            .iter()
            .filter(|p| p.month().is_some_and(|m| from <= m && m <= to))
            .filter(|p| matches!(p.advisor_identity().as_deref(), Some("advisor-1" | "advisor-3")))
            .count();
        prop_assert_eq!(series.iter().map(|r| r.count).sum::<usize>(), expected);
        prop_assert!(series.windows(2).all(|w| w[0].month < w[1].month));
    }

    #[test]
    fn fill_preserves_requested_months(
        payments in prop::collection::vec(arb_payment(), 0..40),
        n in 0usize..30,
    ) {
        let sparse = rollup_monthly(&payments, &RollupOptions::new());
        let months = months_back_from(key("2025-12"), n);
        let dense = fill_month_gaps(&sparse, &months);
        prop_assert_eq!(dense.len(), months.len());
        for (row, month) in dense.iter().zip(&months) {
            prop_assert_eq!(row.month, *month);
        }
    }
}
