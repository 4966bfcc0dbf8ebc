//! Synthetic series for demonstrations and tests
//!
//! Every generator starts from an explicit date and a seedable RNG, so the
//! same seed always yields the same series. Values are rounded to cents.

use crate::data::{Cadence, TimeSeriesPoint};
use crate::error::{ForecastError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use std::f64::consts::PI;

/// Seeded source of synthetic financial series
#[derive(Debug, Clone)]
pub struct SeriesGenerator {
    rng: StdRng,
}

impl SeriesGenerator {
    /// Deterministic generator
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generator seeded from the operating system
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Monthly random-walk prices; each step moves up to `volatility` either way.
    /// Prices never fall below 1.
    pub fn stock_prices(
        &mut self,
        start: chrono::NaiveDate,
        months: usize,
        initial_price: Decimal,
        volatility: f64,
    ) -> Result<Vec<TimeSeriesPoint>> {
        self.walk(start, Cadence::monthly(), months, initial_price, Some(Decimal::ONE), |rng, _| {
            1.0 + (rng.gen::<f64>() - 0.5) * 2.0 * volatility
        })
    }

    /// Quarterly revenue with a growth trend, sinusoidal seasonality and noise
    pub fn revenue(
        &mut self,
        start: chrono::NaiveDate,
        quarters: usize,
        initial_revenue: Decimal,
        growth_trend: f64,
    ) -> Result<Vec<TimeSeriesPoint>> {
        self.walk(start, Cadence::quarterly(), quarters, initial_revenue, None, |rng, i| {
            let seasonal = 1.0 + 0.1 * (i as f64 * PI / 2.0).sin();
            let noise = 1.0 + (rng.gen::<f64>() - 0.5) * 0.2;
            (1.0 + growth_trend) * seasonal * noise
        })
    }

    /// Yearly portfolio values around an expected annual return
    pub fn investment(
        &mut self,
        start: chrono::NaiveDate,
        years: usize,
        initial_investment: Decimal,
        annual_return: f64,
    ) -> Result<Vec<TimeSeriesPoint>> {
        self.walk(start, Cadence::yearly(), years, initial_investment, None, |rng, _| {
            1.0 + annual_return + (rng.gen::<f64>() - 0.5) * 0.3
        })
    }

    /// Monthly values drifting up or down by `trend_rate` with noise; floor of 1
    pub fn trending(
        &mut self,
        start: chrono::NaiveDate,
        periods: usize,
        initial_value: Decimal,
        trend_rate: f64,
        increasing: bool,
    ) -> Result<Vec<TimeSeriesPoint>> {
        let trend = if increasing { trend_rate } else { -trend_rate };
        self.walk(start, Cadence::monthly(), periods, initial_value, Some(Decimal::ONE), |rng, _| {
            1.0 + trend + (rng.gen::<f64>() - 0.5) * 0.1
        })
    }

    /// Multiply the running value by `step(rng, i)` for every point after the first
    fn walk<F>(
        &mut self,
        start: chrono::NaiveDate,
        cadence: Cadence,
        count: usize,
        initial: Decimal,
        floor: Option<Decimal>,
        mut step: F,
    ) -> Result<Vec<TimeSeriesPoint>>
    where
        F: FnMut(&mut StdRng, usize) -> f64,
    {
        let mut dates = Vec::with_capacity(count);
        let mut values = Vec::with_capacity(count);
        let mut current = initial;

        for i in 0..count {
            if i > 0 {
                let factor = step(&mut self.rng, i);
                let factor = Decimal::from_f64(factor).ok_or_else(|| {
                    ForecastError::ArithmeticOverflow(format!("growth factor {}", factor))
                })?;
                current = current.checked_mul(factor).ok_or_else(|| {
                    ForecastError::ArithmeticOverflow(format!("{} * {}", current, factor))
                })?;
                if let Some(floor) = floor {
                    current = current.max(floor);
                }
            }
            dates.push(cadence.advance(start, i)?);
            values.push(current.round_dp(2));
        }

        TimeSeriesPoint::series_from_values(&dates, &values)
    }
}
