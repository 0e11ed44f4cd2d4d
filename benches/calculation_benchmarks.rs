//! Performance benchmarks for the RCTI engine.
//!
//! This benchmark suite verifies that the calculation engine meets performance targets:
//! - Single line amount calculation: < 1μs mean
//! - Weekly invoice pipeline (jobs + breaks + totals): < 100μs mean
//! - Deduction planning over a year of history: < 100μs mean
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use chrono::{Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;
use uuid::Uuid;

use rcti_engine::calculation::{
    AmountOverrides, AppliedCycle, DeductionLedger, calculate_line_amounts,
    calculate_lunch_break_lines, calculate_rcti_totals, generate_invoice_number,
    plan_deduction_applications,
};
use rcti_engine::models::{
    DeductionType, Frequency, GstMode, GstRegime, InvoiceLine, RecurringDeduction,
};

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn exclusive() -> GstRegime {
    GstRegime::Registered(GstMode::Exclusive)
}

/// Creates a priced job line for benchmarking downstream stages.
fn create_job_line(index: usize) -> InvoiceLine {
    let hours = dec("9.5");
    let rate = dec("52.00");
    let amounts = calculate_line_amounts(hours, rate, &exclusive()).unwrap();
    InvoiceLine {
        source_job_id: Some(Uuid::from_u128(index as u128 + 1)),
        truck_type: if index % 2 == 0 { "semi" } else { "van" }.to_string(),
        description: format!("run {:03}", index),
        charged_hours: hours,
        rate_per_hour: rate,
        amount_ex_gst: amounts.amount_ex_gst,
        gst_amount: amounts.gst_amount,
        amount_inc_gst: amounts.amount_inc_gst,
    }
}

/// Creates a weekly ledger with the given number of historical applications.
fn create_ledger(history_len: usize) -> DeductionLedger {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let deduction = RecurringDeduction::new(
        Uuid::new_v4(),
        DeductionType::Deduction,
        dec("100000"),
        Frequency::Weekly,
        Some(dec("150")),
        start,
    )
    .unwrap();

    let history = (0..history_len)
        .map(|i| AppliedCycle {
            week_ending: start + Duration::days(7 * (i as i64 + 1)),
            amount: dec("150"),
            applied_at: Utc::now(),
        })
        .collect();

    DeductionLedger { deduction, history }
}

fn bench_line_amounts(c: &mut Criterion) {
    c.bench_function("line_amounts_exclusive", |b| {
        b.iter(|| {
            calculate_line_amounts(
                black_box(dec("9.5")),
                black_box(dec("52.00")),
                &exclusive(),
            )
            .unwrap()
        })
    });

    c.bench_function("line_amounts_inclusive", |b| {
        b.iter(|| {
            calculate_line_amounts(
                black_box(dec("9.5")),
                black_box(dec("52.00")),
                &GstRegime::Registered(GstMode::Inclusive),
            )
            .unwrap()
        })
    });
}

fn bench_invoice_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("invoice_pipeline");

    for line_count in [7usize, 14, 50] {
        let lines: Vec<InvoiceLine> = (0..line_count).map(create_job_line).collect();

        group.throughput(Throughput::Elements(line_count as u64));
        group.bench_with_input(
            BenchmarkId::new("breaks_and_totals", line_count),
            &lines,
            |b, lines| {
                b.iter(|| {
                    let mut all = lines.clone();
                    let breaks =
                        calculate_lunch_break_lines(&all, dec("0.5"), &exclusive()).unwrap();
                    all.extend(breaks);
                    calculate_rcti_totals(black_box(&all))
                })
            },
        );
    }

    group.finish();
}

fn bench_invoice_numbers(c: &mut Criterion) {
    let week_ending = NaiveDate::from_ymd_opt(2025, 1, 20).unwrap();
    let existing: Vec<String> = (0..100)
        .map(|i| format!("RCTI-20012025-ALANTOMKIN-{}", i))
        .chain(std::iter::once("RCTI-20012025-ALANTOMKIN".to_string()))
        .collect();

    c.bench_function("invoice_number_101_collisions", |b| {
        b.iter(|| {
            generate_invoice_number(black_box(&existing), week_ending, black_box("Alan Tomkins"))
        })
    });
}

fn bench_deduction_planning(c: &mut Criterion) {
    let mut group = c.benchmark_group("deduction_planning");

    for history_len in [0usize, 52, 260] {
        let ledgers = vec![create_ledger(history_len)];
        let week_ending = NaiveDate::from_ymd_opt(2030, 1, 7).unwrap();
        let overrides = AmountOverrides::new();

        group.bench_with_input(
            BenchmarkId::new("history", history_len),
            &ledgers,
            |b, ledgers| {
                b.iter(|| {
                    plan_deduction_applications(black_box(ledgers), week_ending, &overrides)
                        .unwrap()
                })
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_line_amounts,
    bench_invoice_pipeline,
    bench_invoice_numbers,
    bench_deduction_planning
);
criterion_main!(benches);
