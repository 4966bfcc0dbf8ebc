//! Performance comparison of the recursive strategies
//!
//! The harness runs strategies on identical input and tabulates their cost.
//! Every run goes through the engine's public entry points, so each one has
//! its own counter and cache.

use crate::data::TimeSeriesPoint;
use crate::engine::ForecastEngine;
use crate::error::{ForecastError, Result};
use crate::metrics::{forecast_accuracy, AccuracyReport};
use crate::run::Strategy;
use serde::Serialize;
use std::fmt;
use std::time::{Duration, Instant};
use tracing::info;

/// Period counts used by a complexity sweep when none are given
pub const DEFAULT_SWEEP_PERIODS: [usize; 5] = [5, 10, 15, 20, 25];

/// Cost of one strategy on one input
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyMeasurement {
    pub strategy: Strategy,
    /// Time the engine reports for the forecast
    pub elapsed: Duration,
    /// Time measured around the engine call by the harness
    pub wall_time: Duration,
    pub call_count: u64,
}

/// All three strategies measured on the same input
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyComparison {
    pub periods: usize,
    pub measurements: Vec<StrategyMeasurement>,
}

impl StrategyComparison {
    /// Measurement for one strategy
    pub fn get(&self, strategy: Strategy) -> Option<&StrategyMeasurement> {
        self.measurements.iter().find(|m| m.strategy == strategy)
    }

    /// Strategy that needed the fewest recursive activations
    pub fn fewest_calls(&self) -> Option<Strategy> {
        self.measurements
            .iter()
            .min_by_key(|m| m.call_count)
            .map(|m| m.strategy)
    }
}

/// One row of a complexity sweep
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepRow {
    pub periods: usize,
    pub basic_time: Duration,
    pub basic_calls: u64,
    pub memo_time: Duration,
    pub memo_calls: u64,
}

/// Basic against memoized recursion across increasing period counts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplexitySweep {
    pub rows: Vec<SweepRow>,
}

/// Runs strategy comparisons on a shared engine configuration
#[derive(Debug, Clone, Default)]
pub struct PerformanceHarness {
    engine: ForecastEngine,
}

impl PerformanceHarness {
    pub fn new(engine: ForecastEngine) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &ForecastEngine {
        &self.engine
    }

    /// Run every strategy on the same history and period count
    pub fn compare_strategies(
        &self,
        historical: &[TimeSeriesPoint],
        periods: usize,
    ) -> Result<StrategyComparison> {
        let mut measurements = Vec::with_capacity(Strategy::ALL.len());

        for strategy in Strategy::ALL {
            let started = Instant::now();
            let run = self.engine.forecast(strategy, historical, periods)?;
            let wall_time = started.elapsed();

            info!(
                strategy = %strategy,
                calls = run.call_count(),
                elapsed_ms = run.elapsed_millis(),
                "strategy measured"
            );

            measurements.push(StrategyMeasurement {
                strategy,
                elapsed: run.elapsed(),
                wall_time,
                call_count: run.call_count(),
            });
        }

        Ok(StrategyComparison {
            periods,
            measurements,
        })
    }

    /// Run basic and memoized recursion for each period count.
    ///
    /// `period_list` must be strictly increasing.
    pub fn complexity_sweep(
        &self,
        historical: &[TimeSeriesPoint],
        period_list: &[usize],
    ) -> Result<ComplexitySweep> {
        if period_list.windows(2).any(|w| w[1] <= w[0]) {
            return Err(ForecastError::InvalidParameter(format!(
                "sweep periods must be strictly increasing: {:?}",
                period_list
            )));
        }

        let mut rows = Vec::with_capacity(period_list.len());
        for &periods in period_list {
            let basic = self.engine.forecast_basic(historical, periods)?;
            let memo = self.engine.forecast_memoized(historical, periods)?;

            info!(
                periods,
                basic_calls = basic.call_count(),
                memo_calls = memo.call_count(),
                "sweep step"
            );

            rows.push(SweepRow {
                periods,
                basic_time: basic.elapsed(),
                basic_calls: basic.call_count(),
                memo_time: memo.elapsed(),
                memo_calls: memo.call_count(),
            });
        }

        Ok(ComplexitySweep { rows })
    }

    /// Sweep over [`DEFAULT_SWEEP_PERIODS`]
    pub fn default_sweep(&self, historical: &[TimeSeriesPoint]) -> Result<ComplexitySweep> {
        self.complexity_sweep(historical, &DEFAULT_SWEEP_PERIODS)
    }

    /// Mean absolute and percentage error of a forecast against actuals
    pub fn accuracy(
        &self,
        actual: &[TimeSeriesPoint],
        forecasted: &[TimeSeriesPoint],
    ) -> Result<Option<AccuracyReport>> {
        forecast_accuracy(actual, forecasted)
    }
}

fn millis(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}

impl fmt::Display for StrategyComparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== PERFORMANCE SUMMARY ({} periods) ===", self.periods)?;
        for m in &self.measurements {
            writeln!(
                f,
                "{} - Time: {:.2}ms, Calls: {}",
                m.strategy,
                millis(m.elapsed),
                m.call_count
            )?;
        }
        if let Some(best) = self.fewest_calls() {
            write!(f, "Fewest recursive calls: {}", best)?;
        }
        Ok(())
    }
}

impl fmt::Display for ComplexitySweep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Periods\tBasic Recursion\t\tMemoized Recursion")?;
        writeln!(f, "\tTime(ms)\tCalls\t\tTime(ms)\tCalls")?;
        write!(f, "{}", "-".repeat(65))?;
        for row in &self.rows {
            write!(
                f,
                "\n{}\t{:.2}\t\t{}\t\t{:.2}\t\t{}",
                row.periods,
                millis(row.basic_time),
                row.basic_calls,
                millis(row.memo_time),
                row.memo_calls
            )?;
        }
        Ok(())
    }
}
