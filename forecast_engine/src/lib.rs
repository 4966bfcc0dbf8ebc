//! # Forecast Engine
//!
//! Recursive time series projection with exact decimal arithmetic.
//!
//! ## Features
//!
//! - Dated observations with fixed-cadence forecasting (days or calendar months)
//! - Three recursive projection strategies sharing one call-counting contract:
//!   basic recursion, memoized recursion and compound growth via
//!   exponentiation by squaring
//! - Call-scoped recursion state: every forecast owns its counter, depth guard
//!   and cache, so concurrent forecasts never interfere
//! - A performance harness comparing strategy cost and forecast accuracy
//! - Seeded synthetic series for demonstrations
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use forecast_engine::{ForecastEngine, PerformanceHarness, TimeSeriesPoint};
//! use rust_decimal::Decimal;
//!
//! let dates: Vec<NaiveDate> = (1..=3)
//!     .map(|m| NaiveDate::from_ymd_opt(2024, m, 1).unwrap())
//!     .collect();
//! let values = vec![Decimal::from(100), Decimal::from(110), Decimal::from(121)];
//! let history = TimeSeriesPoint::series_from_values(&dates, &values)?;
//!
//! let engine = ForecastEngine::default();
//! let run = engine.forecast_memoized(&history, 6)?;
//! assert_eq!(run.forecasted().len(), 6);
//!
//! let harness = PerformanceHarness::new(engine);
//! let comparison = harness.compare_strategies(&history, 6)?;
//! println!("{}", comparison);
//! # Ok::<(), forecast_engine::ForecastError>(())
//! ```

pub mod config;
pub mod data;
pub mod engine;
pub mod error;
pub mod generator;
pub mod harness;
pub mod metrics;
pub mod run;

// Re-export commonly used types
pub use crate::config::EngineConfig;
pub use crate::data::{Cadence, TimeSeriesPoint};
pub use crate::engine::ForecastEngine;
pub use crate::error::{ForecastError, Result};
pub use crate::generator::SeriesGenerator;
pub use crate::harness::{ComplexitySweep, PerformanceHarness, StrategyComparison, SweepRow};
pub use crate::metrics::{forecast_accuracy, AccuracyReport};
pub use crate::run::{CacheStats, ForecastRun, Strategy};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
