use analytics::PerformanceReport;
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;
use configuration::Config;
use core_types::{
    CompletenessPolicy, FirstPeriodPolicy, Granularity, PriceTable, StrategyId,
};
use data_loader::{export_period_tables, export_series, load_prices};
use portfolio_backtester::{partition, BacktestOutcome, PortfolioManager};
use std::path::{Path, PathBuf};

/// Used when `--config` is not given and the file exists.
const DEFAULT_CONFIG: &str = "config.toml";

/// The main entry point for the rebalancer application.
fn main() -> Result<()> {
    // Parse command-line arguments
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => configuration::load_config(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None if Path::new(DEFAULT_CONFIG).exists() => configuration::load_config(DEFAULT_CONFIG)
            .with_context(|| format!("failed to load {}", DEFAULT_CONFIG))?,
        None => Config::default(),
    };

    // The guard flushes the log file on drop, so it lives until main returns.
    let _log_guard = configuration::init_tracing(&config.logging)?;

    // Execute the appropriate command
    match cli.command {
        Commands::Backtest(args) => handle_backtest(config, args),
        Commands::Compare(args) => handle_compare(config, args),
        Commands::Export(args) => handle_export(config, args),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Backtests calendar-rebalanced crypto portfolios.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML config file (defaults to ./config.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one strategy and print its performance report.
    Backtest(BacktestArgs),
    /// Run every strategy over the same data and compare them.
    Compare(CompareArgs),
    /// Write one JSON price table per period.
    Export(ExportArgs),
}

/// Overrides shared by every command.
#[derive(Args)]
struct DataArgs {
    /// Folder with one parquet file per asset.
    #[arg(long)]
    data_folder: Option<PathBuf>,

    /// Only load files whose name contains this pattern (e.g. "USDT").
    #[arg(long)]
    pattern: Option<String>,

    /// The rebalancing interval.
    #[arg(long, value_enum)]
    granularity: Option<Granularity>,
}

/// Overrides for how each period is weighted.
#[derive(Args)]
struct RunArgs {
    /// How assets with gaps inside a period are filtered.
    #[arg(long, value_enum)]
    completeness: Option<CompletenessPolicy>,

    /// What look-back strategies do for the first period.
    #[arg(long, value_enum)]
    first_period: Option<FirstPeriodPolicy>,

    /// Weight periods in parallel.
    #[arg(long)]
    parallel: bool,
}

#[derive(Args)]
struct BacktestArgs {
    /// The weighting strategy (defaults to the config value).
    #[arg(long, value_enum)]
    strategy: Option<StrategyId>,

    #[command(flatten)]
    data: DataArgs,

    #[command(flatten)]
    run: RunArgs,

    /// Write the portfolio series with wealth and drawdown curves to this JSON file.
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct CompareArgs {
    #[command(flatten)]
    data: DataArgs,

    #[command(flatten)]
    run: RunArgs,
}

#[derive(Args)]
struct ExportArgs {
    #[command(flatten)]
    data: DataArgs,

    /// Directory that receives one `{period}.json` file per period.
    #[arg(long)]
    out_dir: PathBuf,
}

impl DataArgs {
    fn apply(&self, config: &mut Config) {
        if let Some(folder) = &self.data_folder {
            config.data.folder = folder.clone();
        }
        if let Some(pattern) = &self.pattern {
            config.data.symbol_pattern = pattern.clone();
        }
        if let Some(granularity) = self.granularity {
            config.backtest.granularity = granularity;
        }
    }
}

impl RunArgs {
    fn apply(&self, config: &mut Config) {
        if let Some(completeness) = self.completeness {
            config.backtest.completeness = completeness;
        }
        if let Some(first_period) = self.first_period {
            config.backtest.first_period = first_period;
        }
        if self.parallel {
            config.backtest.parallel = true;
        }
    }
}

// ==============================================================================
// Command Logic
// ==============================================================================

fn handle_backtest(mut config: Config, args: BacktestArgs) -> Result<()> {
    args.data.apply(&mut config);
    args.run.apply(&mut config);
    if let Some(strategy) = args.strategy {
        config.backtest.strategy = strategy;
    }
    config.validate()?;

    let prices = load(&config)?;
    let manager = PortfolioManager::from_config(&config)?;
    let outcome = manager.run(&prices)?;

    print_skipped(&outcome);
    if let (Some(first), Some(last)) = (outcome.series.first_date(), outcome.series.last_date()) {
        println!(
            "{}: {} trading days from {} to {}",
            manager.strategy_id(),
            outcome.series.len(),
            first,
            last
        );
    }
    if let Some(path) = &args.output {
        export_series(path, &outcome.series)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }

    let report = outcome.report()?;
    println!("{}", report_table(&[(outcome.strategy, report)]));
    Ok(())
}

fn handle_compare(mut config: Config, args: CompareArgs) -> Result<()> {
    args.data.apply(&mut config);
    args.run.apply(&mut config);
    config.validate()?;

    let prices = load(&config)?;

    let mut reports = Vec::with_capacity(StrategyId::ALL.len());
    for id in StrategyId::ALL {
        let outcome = PortfolioManager::for_strategy(id, &config)?.run(&prices)?;
        match outcome.report {
            Ok(report) => reports.push((id, report)),
            Err(e) => tracing::warn!(strategy = %id, error = %e, "no report, left out of comparison"),
        }
    }

    let rows: Vec<(StrategyId, &PerformanceReport)> =
        reports.iter().map(|(id, report)| (*id, report)).collect();
    println!("{}", report_table(&rows));
    Ok(())
}

fn handle_export(mut config: Config, args: ExportArgs) -> Result<()> {
    args.data.apply(&mut config);
    config.validate()?;

    let prices = load(&config)?;
    // Price-level view: an asset stays in a period if it traded at all.
    let periods = partition(
        &prices,
        config.backtest.granularity,
        CompletenessPolicy::DropIfAllMissing,
    )?;
    let written = export_period_tables(&args.out_dir, &periods)?;
    println!("Wrote {} period files to {}", written.len(), args.out_dir.display());
    Ok(())
}

fn load(config: &Config) -> Result<PriceTable> {
    load_prices(&config.data.folder, &config.data.symbol_pattern).with_context(|| {
        format!(
            "failed to load prices from {} (pattern '{}')",
            config.data.folder.display(),
            config.data.symbol_pattern
        )
    })
}

fn print_skipped(outcome: &BacktestOutcome) {
    for period in outcome.skipped_periods() {
        println!(
            "Skipped {}: {}",
            period.period,
            period.skipped.as_deref().unwrap_or("unknown reason")
        );
    }
}

fn report_table(rows: &[(StrategyId, &PerformanceReport)]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "Strategy",
        "Cumulative",
        "Ann. Return",
        "Ann. Volatility",
        "Sharpe",
        "Max Drawdown",
        "Calmar",
    ]);

    for (id, report) in rows {
        table.add_row(vec![
            id.to_string(),
            format!("{:.2}%", report.cumulative_return * 100.0),
            format!("{:.2}%", report.annualized_return * 100.0),
            format!("{:.2}%", report.annualized_volatility * 100.0),
            format!("{:.2}", report.sharpe_ratio),
            format!("{:.2}%", report.max_drawdown * 100.0),
            report
                .calmar_ratio
                .map_or_else(|| "n/a".to_string(), |c| format!("{:.2}", c)),
        ]);
    }
    table
}
