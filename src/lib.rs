//! # Recursive Forecast
//!
//! Umbrella crate for the recursive forecasting workspace.
//!
//! - [`growth_math`]: exact-decimal growth rate estimation
//! - [`forecast_engine`]: recursive projection strategies, the performance
//!   harness and synthetic series
//!
//! ## Example
//!
//! ```
//! use recursive_forecast_workspace::{ForecastEngine, SeriesGenerator, Strategy};
//! use chrono::NaiveDate;
//! use rust_decimal::Decimal;
//!
//! let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
//! let history = SeriesGenerator::with_seed(1)
//!     .stock_prices(start, 12, Decimal::from(100), 0.05)
//!     .unwrap();
//!
//! let run = ForecastEngine::default()
//!     .forecast(Strategy::Basic, &history, 4)
//!     .unwrap();
//! assert_eq!(run.call_count(), 10);
//! ```

pub use forecast_engine::{
    forecast_accuracy, AccuracyReport, CacheStats, Cadence, ComplexitySweep, EngineConfig,
    ForecastEngine, ForecastError, ForecastRun, PerformanceHarness, SeriesGenerator, Strategy,
    StrategyComparison, SweepRow, TimeSeriesPoint,
};
pub use growth_math::{average_growth_rate, compound_annual_growth_rate, MathError};
