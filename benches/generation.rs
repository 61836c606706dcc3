use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use recurrence_core::{
    recurrence::{describe, estimate_duration, generate, Frequency, RecurrenceRule},
    schedule::{materialize_due, upcoming, ScheduledTransaction, TransactionKind},
};

fn build_sample_schedules(count: usize) -> Vec<ScheduledTransaction> {
    let start_date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

    (0..count)
        .map(|idx| {
            let frequency = Frequency::ALL[idx % Frequency::ALL.len()];
            let start = start_date + Duration::days((idx % 365) as i64);
            let rule = RecurrenceRule::new(frequency, 1 + (idx % 3) as u32, start, 24)
                .expect("rule")
                .with_custom_days(Some(10))
                .expect("custom days");
            let kind = if idx % 4 == 0 {
                TransactionKind::Income
            } else {
                TransactionKind::Expense
            };
            let amount = 50.0 + (idx % 100) as f64;
            ScheduledTransaction::new(format!("Schedule {idx}"), amount, kind, rule)
        })
        .collect()
}

fn bench_generation(c: &mut Criterion) {
    let anchor = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
    let monthly = RecurrenceRule::new(Frequency::Monthly, 1, anchor, 365).expect("monthly");
    let daily = RecurrenceRule::new(Frequency::Daily, 1, anchor, 365).expect("daily");

    c.bench_function("generate_monthly_365", |b| {
        b.iter(|| black_box(generate(black_box(&monthly))))
    });

    c.bench_function("generate_daily_365", |b| {
        b.iter(|| black_box(generate(black_box(&daily))))
    });

    c.bench_function("describe_and_estimate", |b| {
        b.iter(|| {
            black_box(describe(&monthly));
            black_box(estimate_duration(&monthly));
        })
    });
}

fn bench_schedules(c: &mut Criterion) {
    let schedules = build_sample_schedules(black_box(1_000));
    let reference = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();

    c.bench_function("upcoming_90_days_1k", |b| {
        b.iter(|| black_box(upcoming(&schedules, reference, 90)))
    });

    c.bench_function("materialize_due_1k", |b| {
        b.iter(|| black_box(materialize_due(&schedules, reference)))
    });
}

criterion_group!(benches, bench_generation, bench_schedules);
criterion_main!(benches);
