//! Time series data for recursive forecasting

use crate::error::{ForecastError, Result};
use chrono::{Datelike, Days, Months, NaiveDate};
use growth_math::period_growth_rate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A dated observation and its growth relative to the previous observation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    timestamp: NaiveDate,
    value: Decimal,
    growth_rate: Decimal,
}

impl TimeSeriesPoint {
    /// Create a new point
    pub fn new(timestamp: NaiveDate, value: Decimal, growth_rate: Decimal) -> Self {
        Self {
            timestamp,
            value,
            growth_rate,
        }
    }

    /// Build a series from parallel dates and values.
    ///
    /// Each point's growth rate is its change relative to the previous value,
    /// or zero for the first point and for points following a zero value.
    pub fn series_from_values(dates: &[NaiveDate], values: &[Decimal]) -> Result<Vec<Self>> {
        if dates.len() != values.len() {
            return Err(ForecastError::InvalidSeries(format!(
                "{} dates but {} values",
                dates.len(),
                values.len()
            )));
        }

        let mut series: Vec<Self> = Vec::with_capacity(values.len());
        for (&timestamp, &value) in dates.iter().zip(values) {
            let growth_rate = match series.last() {
                Some(previous) => {
                    if timestamp <= previous.timestamp {
                        return Err(ForecastError::InvalidSeries(format!(
                            "timestamp {} does not follow {}",
                            timestamp, previous.timestamp
                        )));
                    }
                    period_growth_rate(previous.value, value)?.unwrap_or(Decimal::ZERO)
                }
                None => Decimal::ZERO,
            };
            series.push(Self::new(timestamp, value, growth_rate));
        }

        Ok(series)
    }

    /// Get the observation date
    pub fn timestamp(&self) -> NaiveDate {
        self.timestamp
    }

    /// Get the observed value
    pub fn value(&self) -> Decimal {
        self.value
    }

    /// Get the growth rate relative to the previous point
    pub fn growth_rate(&self) -> Decimal {
        self.growth_rate
    }
}

impl fmt::Display for TimeSeriesPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Date: {}, Value: ${:.2}, Growth Rate: {:.2}%",
            self.timestamp.format("%Y-%m-%d"),
            self.value,
            self.growth_rate.to_f64().unwrap_or(0.0) * 100.0
        )
    }
}

/// Values of a series, in order
pub fn values_of(series: &[TimeSeriesPoint]) -> Vec<Decimal> {
    series.iter().map(TimeSeriesPoint::value).collect()
}

/// Fixed spacing between consecutive observations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cadence {
    /// A whole number of days
    Days(u32),
    /// A whole number of calendar months; day-of-month clamps to the month end
    Months(u32),
}

impl Cadence {
    pub const fn daily() -> Self {
        Cadence::Days(1)
    }

    pub const fn weekly() -> Self {
        Cadence::Days(7)
    }

    pub const fn monthly() -> Self {
        Cadence::Months(1)
    }

    pub const fn quarterly() -> Self {
        Cadence::Months(3)
    }

    pub const fn yearly() -> Self {
        Cadence::Months(12)
    }

    /// Number of units (days or months) in one step
    pub fn length(&self) -> u32 {
        match self {
            Cadence::Days(n) | Cadence::Months(n) => *n,
        }
    }

    /// The date `steps` cadence units after `from`.
    ///
    /// Always measured from `from` rather than chained, so a month-end anchor
    /// stays on month ends (Jan 31 -> Feb 28 -> Mar 31).
    pub fn advance(&self, from: NaiveDate, steps: usize) -> Result<NaiveDate> {
        let overflow = || {
            ForecastError::ArithmeticOverflow(format!(
                "{} advanced by {} x {:?} is out of range",
                from, steps, self
            ))
        };

        let steps = u32::try_from(steps).map_err(|_| overflow())?;
        let units = self.length().checked_mul(steps).ok_or_else(overflow)?;

        match self {
            Cadence::Days(_) => from.checked_add_days(Days::new(u64::from(units))),
            Cadence::Months(_) => from.checked_add_months(Months::new(units)),
        }
        .ok_or_else(overflow)
    }

    /// Infer the cadence from two consecutive observation dates.
    ///
    /// Whole-month spacing is recognised when the day of month is preserved
    /// or both dates fall on a month end; anything else is measured in days.
    ///
    /// A month-end match does not carry the month-end anchor into
    /// [`Cadence::advance`]: stepping a quarter from Sep 30 lands on Dec 30,
    /// not Dec 31. Clamping only happens when the target month is shorter.
    pub fn infer(previous: NaiveDate, current: NaiveDate) -> Result<Self> {
        if current <= previous {
            return Err(ForecastError::InvalidSeries(format!(
                "timestamp {} does not follow {}",
                current, previous
            )));
        }

        let months = (current.year() - previous.year()) * 12 + current.month() as i32
            - previous.month() as i32;
        if months > 0 {
            let months = months as u32;
            let aligned = previous.checked_add_months(Months::new(months)) == Some(current);
            if aligned || (is_month_end(previous) && is_month_end(current)) {
                return Ok(Cadence::Months(months));
            }
        }

        let days = (current - previous).num_days();
        u32::try_from(days)
            .map(Cadence::Days)
            .map_err(|_| ForecastError::InvalidSeries(format!("{} days between points", days)))
    }

    /// Infer the cadence from the last two points of a series
    pub fn from_series(series: &[TimeSeriesPoint]) -> Result<Self> {
        match series {
            [.., previous, current] => Self::infer(previous.timestamp, current.timestamp),
            _ => Err(ForecastError::InsufficientData {
                required: 2,
                actual: series.len(),
            }),
        }
    }
}

fn is_month_end(date: NaiveDate) -> bool {
    date.succ_opt().map_or(true, |next| next.month() != date.month())
}
