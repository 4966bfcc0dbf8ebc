use approx::assert_relative_eq;
use chrono::NaiveDate;
use forecast_engine::config::MAX_RECURSION_DEPTH;
use forecast_engine::{
    Cadence, EngineConfig, ForecastEngine, ForecastError, Strategy, TimeSeriesPoint,
};
use pretty_assertions::assert_eq;
use rstest::rstest;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::io::Write;
use std::sync::{Arc, Mutex};

fn monthly_history(values: &[Decimal]) -> Vec<TimeSeriesPoint> {
    let start = NaiveDate::from_ymd_opt(2023, 1, 31).unwrap();
    let dates: Vec<NaiveDate> = (0..values.len())
        .map(|i| Cadence::monthly().advance(start, i).unwrap())
        .collect();
    TimeSeriesPoint::series_from_values(&dates, values).unwrap()
}

fn sample_history() -> Vec<TimeSeriesPoint> {
    monthly_history(&[
        dec!(100.00),
        dec!(104.50),
        dec!(101.20),
        dec!(108.75),
        dec!(112.10),
        dec!(110.40),
    ])
}

/// `pow` activations for exponent `e` under exponentiation by squaring
fn power_calls(e: usize) -> u64 {
    match e {
        0 | 1 => 1,
        e if e % 2 == 0 => 1 + power_calls(e / 2),
        e => 1 + power_calls(e - 1),
    }
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(5)]
#[case(12)]
#[case(25)]
fn test_forecast_length_and_dates(#[case] periods: usize) {
    let history = sample_history();
    let last = history.last().unwrap().timestamp();
    let engine = ForecastEngine::default();

    for strategy in Strategy::ALL {
        let run = engine.forecast(strategy, &history, periods).unwrap();
        assert_eq!(run.strategy(), strategy);
        assert_eq!(run.forecasted().len(), periods);

        for (i, point) in run.forecasted().iter().enumerate() {
            assert_eq!(
                point.timestamp(),
                Cadence::monthly().advance(last, i + 1).unwrap()
            );
        }
        assert!(run
            .forecasted()
            .windows(2)
            .all(|w| w[0].timestamp() < w[1].timestamp()));
    }
}

#[test]
fn test_forecast_dates_follow_input_cadence() {
    let dates = [
        NaiveDate::from_ymd_opt(2022, 3, 31).unwrap(),
        NaiveDate::from_ymd_opt(2022, 6, 30).unwrap(),
        NaiveDate::from_ymd_opt(2022, 9, 30).unwrap(),
    ];
    let history =
        TimeSeriesPoint::series_from_values(&dates, &[dec!(10), dec!(11), dec!(12)]).unwrap();

    let run = ForecastEngine::default().forecast_basic(&history, 2).unwrap();
    let forecast_dates: Vec<NaiveDate> = run.forecasted().iter().map(|p| p.timestamp()).collect();
    assert_eq!(
        forecast_dates,
        vec![
            NaiveDate::from_ymd_opt(2022, 12, 30).unwrap(),
            NaiveDate::from_ymd_opt(2023, 3, 30).unwrap(),
        ]
    );
}

#[test]
fn test_configured_cadence_overrides_inference() {
    let config = EngineConfig::default().with_cadence(Cadence::weekly());
    let history = sample_history();
    let last = history.last().unwrap().timestamp();

    let run = ForecastEngine::new(config).forecast_memoized(&history, 3).unwrap();
    assert_eq!(
        run.forecasted()[2].timestamp(),
        last + chrono::Duration::days(21)
    );
}

#[rstest]
#[case(1)]
#[case(3)]
#[case(10)]
#[case(40)]
fn test_basic_and_memoized_agree(#[case] periods: usize) {
    let history = sample_history();
    let engine = ForecastEngine::default();

    let basic = engine.forecast_basic(&history, periods).unwrap();
    let memo = engine.forecast_memoized(&history, periods).unwrap();

    assert_eq!(basic.forecasted(), memo.forecasted());
    assert_eq!(basic.growth_rate(), memo.growth_rate());
}

#[rstest]
#[case(1, 1)]
#[case(3, 6)]
#[case(5, 15)]
#[case(10, 55)]
#[case(25, 325)]
fn test_basic_call_count_is_triangular(#[case] periods: usize, #[case] expected: u64) {
    let run = ForecastEngine::default()
        .forecast_basic(&sample_history(), periods)
        .unwrap();
    assert_eq!(run.call_count(), expected);
}

#[rstest]
#[case(1)]
#[case(3)]
#[case(10)]
#[case(25)]
fn test_memoized_call_count_is_linear(#[case] periods: usize) {
    let engine = ForecastEngine::default();
    let memo = engine.forecast_memoized(&sample_history(), periods).unwrap();
    let basic = engine.forecast_basic(&sample_history(), periods).unwrap();

    assert_eq!(memo.call_count(), 2 * periods as u64 - 1);
    if periods >= 3 {
        assert!(memo.call_count() < basic.call_count());
    }

    let stats = memo.cache_stats().unwrap();
    assert_eq!(stats.hits, periods as u64 - 1);
    assert_eq!(stats.misses, periods as u64);
    assert_eq!(stats.entries, periods);
}

#[rstest]
#[case(1)]
#[case(8)]
#[case(16)]
#[case(25)]
fn test_compound_call_count_is_logarithmic(#[case] periods: usize) {
    let run = ForecastEngine::default()
        .forecast_compound(&sample_history(), periods)
        .unwrap();

    let expected: u64 = (1..=periods).map(|i| 1 + power_calls(i)).sum();
    assert_eq!(run.call_count(), expected);
}

#[test]
fn test_compound_power_of_eight_takes_four_steps() {
    assert_eq!(power_calls(8), 4);

    let seven = ForecastEngine::default()
        .forecast_compound(&sample_history(), 7)
        .unwrap();
    let eight = ForecastEngine::default()
        .forecast_compound(&sample_history(), 8)
        .unwrap();
    // The eighth period adds one outer step and four power steps
    assert_eq!(eight.call_count() - seven.call_count(), 5);
}

#[test]
fn test_compound_values() {
    // Constant 10% growth: CAGR is 0.1 up to f64 rounding
    let history = monthly_history(&[dec!(100), dec!(110), dec!(121)]);
    let run = ForecastEngine::default().forecast_compound(&history, 2).unwrap();

    let rate = run.growth_rate().unwrap().to_f64().unwrap();
    assert_relative_eq!(rate, 0.1, epsilon = 1e-9);

    let values: Vec<f64> = run
        .forecasted_values()
        .iter()
        .map(|v| v.to_f64().unwrap())
        .collect();
    assert_relative_eq!(values[0], 133.1, epsilon = 1e-7);
    assert_relative_eq!(values[1], 146.41, epsilon = 1e-7);
}

#[test]
fn test_basic_values_are_exact() {
    let history = monthly_history(&[dec!(100), dec!(110), dec!(121)]);
    let run = ForecastEngine::default().forecast_basic(&history, 3).unwrap();

    assert_eq!(run.growth_rate(), Some(dec!(0.1)));
    assert_eq!(
        run.forecasted_values(),
        vec![dec!(133.1), dec!(146.41), dec!(161.051)]
    );
    assert!(run.forecasted().iter().all(|p| p.growth_rate() == dec!(0.1)));
}

#[test]
fn test_non_positive_cagr_base_projects_flat() {
    let history = monthly_history(&[dec!(0), dec!(50), dec!(80)]);
    let run = ForecastEngine::default().forecast_compound(&history, 3).unwrap();

    assert_eq!(run.growth_rate(), Some(Decimal::ZERO));
    assert_eq!(run.forecasted_values(), vec![dec!(80); 3]);
}

/// Log sink shared between a test and its subscriber
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_non_positive_cagr_base_logs_warning() {
    let logs = CapturedLogs::default();
    let sink = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || sink.clone())
        .with_max_level(tracing::Level::WARN)
        .with_ansi(false)
        .finish();

    let history = monthly_history(&[dec!(-5), dec!(50), dec!(80)]);
    let run = tracing::subscriber::with_default(subscriber, || {
        ForecastEngine::default().forecast_compound(&history, 2)
    })
    .unwrap();

    assert_eq!(run.forecasted_values(), vec![dec!(80); 2]);
    let output = logs.contents();
    assert!(output.contains("WARN"), "{}", output);
    assert!(output.contains("non-positive CAGR base"), "{}", output);
}

#[test]
fn test_positive_cagr_base_logs_nothing() {
    let logs = CapturedLogs::default();
    let sink = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || sink.clone())
        .with_max_level(tracing::Level::WARN)
        .with_ansi(false)
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        ForecastEngine::default().forecast_compound(&sample_history(), 2)
    })
    .unwrap();

    assert_eq!(logs.contents(), "");
}

#[test]
fn test_zero_periods() {
    let engine = ForecastEngine::default();
    for strategy in Strategy::ALL {
        let run = engine.forecast(strategy, &sample_history(), 0).unwrap();
        assert!(run.forecasted().is_empty());
        assert_eq!(run.call_count(), 0);
        assert_eq!(run.growth_rate(), None);
        assert_eq!(run.historical().len(), 6);
    }
}

#[rstest]
#[case(0)]
#[case(1)]
fn test_insufficient_data(#[case] len: usize) {
    let history: Vec<TimeSeriesPoint> = sample_history().into_iter().take(len).collect();
    let engine = ForecastEngine::default();

    for strategy in Strategy::ALL {
        for periods in [0, 5] {
            let err = engine.forecast(strategy, &history, periods).unwrap_err();
            assert!(
                matches!(err, ForecastError::InsufficientData { required: 2, actual } if actual == len),
                "unexpected error {:?}",
                err
            );
        }
    }
}

#[test]
fn test_depth_limit() {
    let engine = ForecastEngine::new(EngineConfig::new(20).unwrap());
    let history = sample_history();

    assert!(engine.forecast_basic(&history, 20).is_ok());
    assert!(matches!(
        engine.forecast_basic(&history, 21),
        Err(ForecastError::DepthExceeded { limit: 20, .. })
    ));
    // Each memoized period stops at the previous period's cached value
    assert!(engine.forecast_memoized(&history, 500).is_ok());
    // Compound nesting grows with log(periods)
    assert!(engine.forecast_compound(&history, 500).is_ok());
}

#[test]
fn test_unvalidated_depth_is_capped() {
    let config = EngineConfig {
        max_recursion_depth: 10_000_000,
        cadence: None,
    };
    let engine = ForecastEngine::new(config);
    // Flat history keeps the deep runs cheap
    let history = monthly_history(&[dec!(100), dec!(100)]);

    assert!(engine.forecast_basic(&history, MAX_RECURSION_DEPTH).is_ok());
    assert!(matches!(
        engine.forecast_basic(&history, MAX_RECURSION_DEPTH + 1),
        Err(ForecastError::DepthExceeded { limit, .. }) if limit == MAX_RECURSION_DEPTH
    ));
}

#[test]
fn test_repeated_runs_are_identical() {
    let engine = ForecastEngine::default();
    let history = sample_history();

    for strategy in Strategy::ALL {
        let first = engine.forecast(strategy, &history, 12).unwrap();
        let second = engine.forecast(strategy, &history, 12).unwrap();
        assert_eq!(first.forecasted(), second.forecasted());
        assert_eq!(first.call_count(), second.call_count());
        assert_eq!(first.cache_stats(), second.cache_stats());
    }
}

#[test]
fn test_concurrent_runs_do_not_interfere() {
    let engine = ForecastEngine::default();
    let history = sample_history();
    let expected = engine.forecast_memoized(&history, 15).unwrap();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| engine.forecast_memoized(&history, 15).unwrap()))
            .collect();
        for handle in handles {
            let run = handle.join().unwrap();
            assert_eq!(run.call_count(), expected.call_count());
            assert_eq!(run.forecasted(), expected.forecasted());
        }
    });
}

#[test]
fn test_rejects_unordered_history() {
    let mut history = sample_history();
    history.swap(4, 5);
    let err = ForecastEngine::default().forecast_basic(&history, 3).unwrap_err();
    assert!(matches!(err, ForecastError::InvalidSeries(_)));
}
