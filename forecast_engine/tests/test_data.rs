use chrono::{Datelike, NaiveDate};
use forecast_engine::data::{values_of, Cadence, TimeSeriesPoint};
use forecast_engine::generator::SeriesGenerator;
use forecast_engine::ForecastError;
use rstest::rstest;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_series_from_values() {
    let dates = [date(2023, 1, 1), date(2023, 2, 1), date(2023, 3, 1)];
    let values = [dec!(200), dec!(150), dec!(180)];

    let series = TimeSeriesPoint::series_from_values(&dates, &values).unwrap();

    assert_eq!(values_of(&series), values.to_vec());
    assert_eq!(series[1].growth_rate(), dec!(-0.25));
    assert_eq!(series[2].growth_rate(), dec!(0.2));
    assert_eq!(series[2].timestamp(), date(2023, 3, 1));
}

#[test]
fn test_series_from_values_requires_increasing_dates() {
    let dates = [date(2023, 2, 1), date(2023, 1, 1)];
    let result = TimeSeriesPoint::series_from_values(&dates, &[dec!(1), dec!(2)]);
    assert!(matches!(result, Err(ForecastError::InvalidSeries(_))));
}

#[test]
fn test_points_round_trip_through_json() {
    let point = TimeSeriesPoint::new(date(2024, 3, 31), dec!(1234.5678), dec!(0.015));
    let json = serde_json::to_string(&point).unwrap();
    let back: TimeSeriesPoint = serde_json::from_str(&json).unwrap();
    assert_eq!(back, point);
}

#[rstest]
#[case(date(2024, 1, 1), date(2024, 1, 2), Cadence::daily())]
#[case(date(2024, 1, 1), date(2024, 1, 8), Cadence::weekly())]
#[case(date(2024, 1, 31), date(2024, 2, 29), Cadence::monthly())]
#[case(date(2024, 1, 1), date(2024, 4, 1), Cadence::quarterly())]
#[case(date(2020, 2, 29), date(2021, 2, 28), Cadence::yearly())]
fn test_cadence_inference(
    #[case] previous: NaiveDate,
    #[case] current: NaiveDate,
    #[case] expected: Cadence,
) {
    assert_eq!(Cadence::infer(previous, current).unwrap(), expected);
}

#[test]
fn test_cadence_from_short_series() {
    let series = vec![TimeSeriesPoint::new(date(2024, 1, 1), dec!(1), Decimal::ZERO)];
    assert!(matches!(
        Cadence::from_series(&series),
        Err(ForecastError::InsufficientData { required: 2, actual: 1 })
    ));
}

#[test]
fn test_generators_follow_their_cadence() {
    let start = date(2022, 1, 1);
    let mut generator = SeriesGenerator::with_seed(3);

    let revenue = generator.revenue(start, 8, dec!(1000000), 0.08).unwrap();
    assert_eq!(revenue.len(), 8);
    assert_eq!(revenue[1].timestamp(), date(2022, 4, 1));

    let investment = generator.investment(start, 5, dec!(10000), 0.07).unwrap();
    assert_eq!(investment[4].timestamp().year(), 2026);

    let stock = generator.stock_prices(start, 24, dec!(2), 0.5).unwrap();
    assert!(stock.iter().all(|p| p.value() >= Decimal::ONE));
    assert!(stock.iter().all(|p| p.value().scale() <= 2));
}

#[test]
fn test_trending_direction() {
    let start = date(2022, 1, 1);
    let mut generator = SeriesGenerator::with_seed(11);

    // Drift of 20% per period dominates noise of at most 5%
    let rising = generator.trending(start, 6, dec!(1000), 0.2, true).unwrap();
    assert!(rising.windows(2).all(|w| w[1].value() > w[0].value()));

    let falling = generator.trending(start, 6, dec!(1000), 0.2, false).unwrap();
    assert!(falling.windows(2).all(|w| w[1].value() < w[0].value()));
}
