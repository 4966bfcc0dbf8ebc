//! Forecast results

use crate::data::TimeSeriesPoint;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// The recursive projection strategies an engine can run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strategy {
    /// Plain recursion on the average growth rate
    Basic,
    /// Recursion on the average growth rate with a call-scoped cache
    Memoized,
    /// CAGR projection with exponentiation by squaring
    CompoundGrowth,
}

impl Strategy {
    /// All strategies, in reporting order
    pub const ALL: [Strategy; 3] = [Strategy::Basic, Strategy::Memoized, Strategy::CompoundGrowth];

    /// Human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Basic => "Basic Recursion",
            Strategy::Memoized => "Memoized Recursion",
            Strategy::CompoundGrowth => "Compound Growth Recursion",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Cache usage during one memoized forecast
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Activations answered from the cache
    pub hits: u64,
    /// Activations that had to compute their value
    pub misses: u64,
    /// Entries held when the forecast finished
    pub entries: usize,
}

/// Outcome of a single forecast invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastRun {
    strategy: Strategy,
    /// Growth rate the projection used; `None` when no period was requested
    growth_rate: Option<Decimal>,
    historical: Vec<TimeSeriesPoint>,
    forecasted: Vec<TimeSeriesPoint>,
    elapsed: Duration,
    call_count: u64,
    cache_stats: Option<CacheStats>,
}

impl ForecastRun {
    pub(crate) fn new(
        strategy: Strategy,
        growth_rate: Option<Decimal>,
        historical: &[TimeSeriesPoint],
        forecasted: Vec<TimeSeriesPoint>,
        elapsed: Duration,
        call_count: u64,
        cache_stats: Option<CacheStats>,
    ) -> Self {
        Self {
            strategy,
            growth_rate,
            historical: historical.to_vec(),
            forecasted,
            elapsed,
            call_count,
            cache_stats,
        }
    }

    /// Get the strategy that produced this run
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Get the growth rate the projection used
    pub fn growth_rate(&self) -> Option<Decimal> {
        self.growth_rate
    }

    /// Get the historical input
    pub fn historical(&self) -> &[TimeSeriesPoint] {
        &self.historical
    }

    /// Get the projected points
    pub fn forecasted(&self) -> &[TimeSeriesPoint] {
        &self.forecasted
    }

    /// Get the projected values, in order
    pub fn forecasted_values(&self) -> Vec<Decimal> {
        crate::data::values_of(&self.forecasted)
    }

    /// Get the wall time spent in the forecast
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Elapsed time in fractional milliseconds
    pub fn elapsed_millis(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }

    /// Get the number of recursive activations performed by this run
    pub fn call_count(&self) -> u64 {
        self.call_count
    }

    /// Get the cache usage, for memoized runs
    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.cache_stats
    }
}

impl fmt::Display for ForecastRun {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== {} ===", self.strategy)?;
        writeln!(f, "Historical Data:")?;
        for point in &self.historical {
            writeln!(f, "  {}", point)?;
        }
        writeln!(f, "Forecasted Data:")?;
        for point in &self.forecasted {
            writeln!(f, "  {}", point)?;
        }
        writeln!(f, "Computation Time: {:.2} ms", self.elapsed_millis())?;
        write!(f, "Recursive Calls Made: {}", self.call_count)?;
        if let Some(stats) = self.cache_stats {
            write!(
                f,
                "\nCache: {} hits, {} misses, {} entries",
                stats.hits, stats.misses, stats.entries
            )?;
        }
        Ok(())
    }
}
