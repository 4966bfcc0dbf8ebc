//! Recursive forecasting engine
//!
//! Three strategies project the last historical value forward:
//! - Basic recursion: `F(v, r, n) = F(v, r, n - 1) * (1 + r)`, recomputed from
//!   scratch for every target period, so `P` periods cost `P(P + 1) / 2` calls
//! - Memoized recursion: the same relation with a call-scoped cache, costing
//!   `2P - 1` calls
//! - Compound growth: `v * (1 + r)^n` with the power computed by
//!   exponentiation by squaring, costing `O(log n)` calls per period
//!
//! The engine holds only configuration. Each forecast builds its own
//! [`RecursionContext`] and, when memoizing, its own [`MemoizationCache`], so
//! one engine can serve any number of independent calls.

mod cache;
mod context;

pub use cache::{CacheKey, MemoizationCache};
pub use context::RecursionContext;

use crate::config::{EngineConfig, MAX_RECURSION_DEPTH};
use crate::data::{values_of, Cadence, TimeSeriesPoint};
use crate::error::{ForecastError, Result};
use crate::run::{CacheStats, ForecastRun, Strategy};
use growth_math::{average_growth_rate, compound_annual_growth_rate, MIN_OBSERVATIONS};
use rust_decimal::Decimal;
use std::time::Instant;
use tracing::{debug, warn};

/// Engine running the recursive projection strategies
#[derive(Debug, Clone, Default)]
pub struct ForecastEngine {
    config: EngineConfig,
}

impl ForecastEngine {
    /// Create an engine with the given configuration
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Get the engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run the named strategy
    pub fn forecast(
        &self,
        strategy: Strategy,
        historical: &[TimeSeriesPoint],
        periods: usize,
    ) -> Result<ForecastRun> {
        match strategy {
            Strategy::Basic => self.forecast_basic(historical, periods),
            Strategy::Memoized => self.forecast_memoized(historical, periods),
            Strategy::CompoundGrowth => self.forecast_compound(historical, periods),
        }
    }

    /// Project with plain recursion on the average growth rate
    pub fn forecast_basic(
        &self,
        historical: &[TimeSeriesPoint],
        periods: usize,
    ) -> Result<ForecastRun> {
        let started = Instant::now();
        let mut ctx = self.context();

        let (rate, forecasted) = self.project(
            historical,
            periods,
            average_growth_rate,
            |base, rate, n| future_value(&mut ctx, base, rate, n),
        )?;

        Ok(Self::finish(Strategy::Basic, rate, historical, forecasted, started, &ctx, None))
    }

    /// Project with memoized recursion on the average growth rate
    pub fn forecast_memoized(
        &self,
        historical: &[TimeSeriesPoint],
        periods: usize,
    ) -> Result<ForecastRun> {
        let started = Instant::now();
        let mut ctx = self.context();
        let mut cache = MemoizationCache::new();

        let (rate, forecasted) = self.project(
            historical,
            periods,
            average_growth_rate,
            |base, rate, n| memoized_future_value(&mut ctx, &mut cache, base, rate, n),
        )?;

        let stats = cache.stats();
        Ok(Self::finish(
            Strategy::Memoized,
            rate,
            historical,
            forecasted,
            started,
            &ctx,
            Some(stats),
        ))
    }

    /// Project with CAGR and exponentiation by squaring
    pub fn forecast_compound(
        &self,
        historical: &[TimeSeriesPoint],
        periods: usize,
    ) -> Result<ForecastRun> {
        let started = Instant::now();
        let mut ctx = self.context();

        let (rate, forecasted) = self.project(
            historical,
            periods,
            |values| {
                if let Some(first) = values.first().filter(|first| **first <= Decimal::ZERO) {
                    warn!(
                        first = %first,
                        "non-positive CAGR base, projecting with zero growth"
                    );
                }
                compound_annual_growth_rate(values)
            },
            |base, rate, n| compound_future_value(&mut ctx, base, rate, n),
        )?;

        Ok(Self::finish(
            Strategy::CompoundGrowth,
            rate,
            historical,
            forecasted,
            started,
            &ctx,
            None,
        ))
    }

    fn context(&self) -> RecursionContext {
        // Fields are public, so a config built by hand may skip validation
        RecursionContext::new(self.config.max_recursion_depth.min(MAX_RECURSION_DEPTH))
    }

    /// Shared driver: validate, estimate the rate, then project each period
    /// `1..=periods` from the last observation.
    fn project<E, F>(
        &self,
        historical: &[TimeSeriesPoint],
        periods: usize,
        estimate: E,
        mut future: F,
    ) -> Result<(Option<Decimal>, Vec<TimeSeriesPoint>)>
    where
        E: Fn(&[Decimal]) -> growth_math::Result<Decimal>,
        F: FnMut(Decimal, Decimal, usize) -> Result<Decimal>,
    {
        let last = match historical {
            [_, .., last] => last,
            _ => {
                return Err(ForecastError::InsufficientData {
                    required: MIN_OBSERVATIONS,
                    actual: historical.len(),
                })
            }
        };

        if periods == 0 {
            return Ok((None, Vec::new()));
        }

        let cadence = match self.config.cadence {
            Some(cadence) => cadence,
            None => Cadence::from_series(historical)?,
        };
        let values = values_of(historical);
        let rate = estimate(values.as_slice())?;

        let mut forecasted = Vec::with_capacity(periods);
        for i in 1..=periods {
            let value = future(last.value(), rate, i)?;
            let timestamp = cadence.advance(last.timestamp(), i)?;
            forecasted.push(TimeSeriesPoint::new(timestamp, value, rate));
        }

        Ok((Some(rate), forecasted))
    }

    fn finish(
        strategy: Strategy,
        rate: Option<Decimal>,
        historical: &[TimeSeriesPoint],
        forecasted: Vec<TimeSeriesPoint>,
        started: Instant,
        ctx: &RecursionContext,
        cache_stats: Option<CacheStats>,
    ) -> ForecastRun {
        let elapsed = started.elapsed();
        debug!(
            strategy = %strategy,
            periods = forecasted.len(),
            calls = ctx.calls(),
            peak_depth = ctx.peak_depth(),
            elapsed_us = elapsed.as_micros() as u64,
            "forecast complete"
        );
        ForecastRun::new(
            strategy,
            rate,
            historical,
            forecasted,
            elapsed,
            ctx.calls(),
            cache_stats,
        )
    }
}

fn growth_factor(rate: Decimal) -> Result<Decimal> {
    Decimal::ONE
        .checked_add(rate)
        .ok_or_else(|| ForecastError::ArithmeticOverflow(format!("1 + {}", rate)))
}

fn multiply(a: Decimal, b: Decimal) -> Result<Decimal> {
    a.checked_mul(b)
        .ok_or_else(|| ForecastError::ArithmeticOverflow(format!("{} * {}", a, b)))
}

/// `F(v, r, n)` by plain recursion, one activation per level
pub(crate) fn future_value(
    ctx: &mut RecursionContext,
    base: Decimal,
    rate: Decimal,
    periods: usize,
) -> Result<Decimal> {
    ctx.enter()?;

    let value = match periods {
        0 => Ok(base),
        1 => growth_factor(rate).and_then(|factor| multiply(base, factor)),
        n => future_value(ctx, base, rate, n - 1)
            .and_then(|previous| multiply(previous, growth_factor(rate)?)),
    };

    ctx.leave();
    value
}

/// `F(v, r, n)` consulting the cache before descending.
///
/// A hit still counts as an activation; it only stops the descent.
pub(crate) fn memoized_future_value(
    ctx: &mut RecursionContext,
    cache: &mut MemoizationCache,
    base: Decimal,
    rate: Decimal,
    periods: usize,
) -> Result<Decimal> {
    ctx.enter()?;

    let key = CacheKey::new(base, rate, periods);
    if let Some(cached) = cache.get(&key) {
        ctx.leave();
        return Ok(cached);
    }

    let value = match periods {
        0 => Ok(base),
        1 => growth_factor(rate).and_then(|factor| multiply(base, factor)),
        n => memoized_future_value(ctx, cache, base, rate, n - 1)
            .and_then(|previous| multiply(previous, growth_factor(rate)?)),
    }
    .map(|computed| cache.insert(key, computed));

    ctx.leave();
    value
}

/// `v * (1 + r)^n`, the outer step of the compound strategy
pub(crate) fn compound_future_value(
    ctx: &mut RecursionContext,
    base: Decimal,
    rate: Decimal,
    periods: usize,
) -> Result<Decimal> {
    ctx.enter()?;

    let value = if periods == 0 {
        Ok(base)
    } else {
        growth_factor(rate)
            .and_then(|factor| power(ctx, factor, periods))
            .and_then(|grown| multiply(base, grown))
    };

    ctx.leave();
    value
}

/// `b^e` by exponentiation by squaring: halve even exponents, peel one
/// factor off odd ones.
pub(crate) fn power(ctx: &mut RecursionContext, base: Decimal, exponent: usize) -> Result<Decimal> {
    ctx.enter()?;

    let value = match exponent {
        0 => Ok(Decimal::ONE),
        1 => Ok(base),
        e if e % 2 == 0 => power(ctx, base, e / 2).and_then(|half| multiply(half, half)),
        e => power(ctx, base, e - 1).and_then(|rest| multiply(base, rest)),
    };

    ctx.leave();
    value
}
