use chrono::{DateTime, Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use perfsci::models::{SubscriptionStatus, TrainingLog, User, UserRole};
use perfsci::{AcwrCalculator, InsightEngine, MomentumReport, RecoveryCalculator};
use rust_decimal::Decimal;

/// Benchmarks for the scoring calculators over realistic log volumes

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 30, 12, 0, 0).unwrap()
}

fn create_log_series(count: usize) -> Vec<TrainingLog> {
    (0..count)
        .map(|i| TrainingLog {
            id: format!("log_{}", i),
            athlete_id: "bench_athlete".to_string(),
            date: now() - Duration::hours(i as i64 * 20),
            sport_type: Default::default(),
            training_type: Default::default(),
            duration: Decimal::from(30 + (i % 90) as u32),
            intensity: Decimal::from(1 + (i % 10) as u32),
            sleep_hours: Some(Decimal::new(70 + (i % 20) as i64, 1)),
            resting_heart_rate: Some(Decimal::from(52 + (i % 12) as u32)),
            metrics: Default::default(),
            notes: String::new(),
        })
        .collect()
}

fn bench_calculators(c: &mut Criterion) {
    let mut group = c.benchmark_group("Scoring");
    let acwr = AcwrCalculator::new();
    let recovery = RecoveryCalculator::new();

    for &size in &[14, 100, 1000, 5000] {
        let logs = create_log_series(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("acwr", size), &logs, |b, logs| {
            b.iter(|| acwr.calculate(black_box(logs), now()));
        });
        group.bench_with_input(BenchmarkId::new("recovery", size), &logs, |b, logs| {
            b.iter(|| recovery.calculate(black_box(logs)));
        });
        group.bench_with_input(BenchmarkId::new("momentum", size), &logs, |b, logs| {
            b.iter(|| MomentumReport::from_logs(black_box(logs), now()));
        });
    }

    group.finish();
}

fn bench_report(c: &mut Criterion) {
    let engine = InsightEngine::new();
    let user = User {
        id: "bench_athlete".to_string(),
        name: "Bench".to_string(),
        email: String::new(),
        role: UserRole::Athlete,
        subscription_status: SubscriptionStatus::Pro,
        sport_preference: None,
        joined_at: now() - Duration::days(365),
    };
    let logs = create_log_series(1000);

    c.bench_function("insight_report_1000", |b| {
        b.iter(|| engine.report(&user, black_box(&logs), now()));
    });
}

criterion_group!(benches, bench_calculators, bench_report);
criterion_main!(benches);
