use chrono::{Local, Months, NaiveDate};
use forecast_engine::{
    EngineConfig, ForecastEngine, ForecastError, PerformanceHarness, SeriesGenerator,
    TimeSeriesPoint,
};
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

fn print_tail(label: &str, series: &[TimeSeriesPoint], count: usize) {
    println!("{}:", label);
    for point in &series[series.len().saturating_sub(count)..] {
        println!("  {}", point);
    }
}

fn start_before(today: NaiveDate, months: u32) -> NaiveDate {
    today.checked_sub_months(Months::new(months)).unwrap_or(today)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "forecast_engine=info".into()),
        )
        .init();

    // Optional seed as the first argument, otherwise random
    let mut generator = match std::env::args().nth(1) {
        Some(seed) => SeriesGenerator::with_seed(seed.parse()?),
        None => SeriesGenerator::from_entropy(),
    };

    let config = match std::env::var("FORECAST_CONFIG") {
        Ok(path) => EngineConfig::from_file(path)?,
        Err(_) => EngineConfig::default(),
    };
    let engine = ForecastEngine::new(config);
    let today = Local::now().date_naive();

    println!("Recursive Financial Forecasting");
    println!("===============================\n");

    let stock = generator.stock_prices(start_before(today, 12), 12, Decimal::from(100), 0.05)?;
    let revenue = generator.revenue(start_before(today, 24), 8, Decimal::from(1_000_000), 0.08)?;
    println!("Generated {} months of stock price data", stock.len());
    println!("Generated {} quarters of revenue data\n", revenue.len());

    println!("--- Basic recursion ---");
    print_tail("Recent history", &stock, 3);
    let basic = engine.forecast_basic(&stock, 6)?;
    print_tail("Forecast", basic.forecasted(), 6);
    println!(
        "Performance: {:.2}ms, {} recursive calls\n",
        basic.elapsed_millis(),
        basic.call_count()
    );

    println!("--- Memoized recursion ---");
    let memo = engine.forecast_memoized(&stock, 6)?;
    print_tail("Forecast", memo.forecasted(), 6);
    println!(
        "Performance: {:.2}ms, {} recursive calls\n",
        memo.elapsed_millis(),
        memo.call_count()
    );

    println!("--- Compound growth recursion ---");
    print_tail("Recent revenue", &revenue, 2);
    let compound = engine.forecast_compound(&revenue, 4)?;
    print_tail("Forecast", compound.forecasted(), 4);
    println!(
        "Performance: {:.2}ms, {} recursive calls\n",
        compound.elapsed_millis(),
        compound.call_count()
    );

    let harness = PerformanceHarness::new(engine.clone());
    println!("--- Complexity analysis ---");
    println!("{}\n", harness.default_sweep(&stock)?);
    println!("{}\n", harness.compare_strategies(&stock, 15)?);

    // Hold out the last quarter of the stock series and score the forecast on it
    println!("--- Accuracy on held-out data ---");
    let split = stock.len() - stock.len() / 4;
    let (train, test) = stock.split_at(split);
    let held_out = engine.forecast_memoized(train, test.len())?;
    match harness.accuracy(test, held_out.forecasted())? {
        Some(report) => println!("{}\n", report),
        None => println!("No accuracy statistics available\n"),
    }

    println!("--- Scenarios ---");
    let portfolio = generator.investment(start_before(today, 60), 5, Decimal::from(50_000), 0.12)?;
    let projected = engine.forecast_compound(&portfolio, 3)?;
    let now = portfolio.last().map(TimeSeriesPoint::value).unwrap_or_default();
    let later = projected
        .forecasted()
        .last()
        .map(TimeSeriesPoint::value)
        .ok_or(ForecastError::InvalidParameter("empty projection".to_string()))?;
    println!("Portfolio value today: ${:.2}", now);
    println!("Projected value in 3 years: ${:.2}", later);
    println!("Total growth: ${:.2}", later - now);

    let declining = generator.trending(start_before(today, 8), 8, Decimal::from(10_000), 0.05, false)?;
    let decline = engine.forecast_memoized(&declining, 4)?;
    if let Some(last) = decline.forecasted().last() {
        println!("Declining market projected in 4 periods: ${:.2}", last.value());
    }

    Ok(())
}
