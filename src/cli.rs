//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::backtest::{BacktestConfig, run_backtest};
use crate::domain::config_validation::{
    backtest_config_from, validate_backtest_config, validate_symbols,
};
use crate::domain::error::BandtraderError;
use crate::domain::metrics::BacktestReport;
use crate::domain::universe::parse_symbols;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;

#[derive(Parser, Debug)]
#[command(name = "bandtrader", about = "Long/short band strategy backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        /// Price CSV; overrides `data_file` in the config
        #[arg(short, long)]
        data: Option<PathBuf>,
        /// Comma-separated symbols; overrides `symbols` in the config
        #[arg(long)]
        symbols: Option<String>,
        /// Simulate instruments in parallel
        #[arg(long)]
        parallel: bool,
        #[arg(short, long)]
        verbose: bool,
    },
    /// List the symbols present in a price CSV
    ListSymbols {
        #[arg(short, long)]
        data: PathBuf,
    },
    /// Validate a backtest configuration
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            config,
            data,
            symbols,
            parallel,
            verbose,
        } => {
            init_tracing(verbose);
            run_backtest_command(&config, data.as_deref(), symbols.as_deref(), parallel)
        }
        Command::ListSymbols { data } => {
            init_tracing(false);
            run_list_symbols(&data)
        }
        Command::Validate { config } => {
            init_tracing(false);
            run_validate(&config)
        }
    }
}

/// Install the stderr subscriber. `RUST_LOG` wins over `verbose`.
pub fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    // A subscriber may already be installed, e.g. by a test harness.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|err| {
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

fn fail(err: BandtraderError) -> ExitCode {
    eprintln!("error: {err}");
    ExitCode::from(&err)
}

fn run_backtest_command(
    config_path: &Path,
    data_override: Option<&Path>,
    symbols_override: Option<&str>,
    parallel: bool,
) -> ExitCode {
    info!(path = %config_path.display(), "loading config");
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let mut bt_config = match build_backtest_config(&adapter) {
        Ok(c) => c,
        Err(e) => return fail(e),
    };
    bt_config.parallel |= parallel;

    let symbols = match resolve_symbols(symbols_override, &adapter) {
        Ok(s) => s,
        Err(e) => return fail(e),
    };

    let data_path = match resolve_data_file(data_override, &adapter) {
        Ok(p) => p,
        Err(e) => return fail(e),
    };
    info!(path = %data_path.display(), "loading price data");
    let data = CsvAdapter::new(data_path);

    match run_backtest_pipeline(&data, &bt_config, symbols.as_deref()) {
        Ok(report) => {
            print!("{}", format_report(&report));
            ExitCode::SUCCESS
        }
        Err(e) => fail(e),
    }
}

pub fn build_backtest_config(adapter: &dyn ConfigPort) -> Result<BacktestConfig, BandtraderError> {
    validate_backtest_config(adapter)?;
    backtest_config_from(adapter)
}

/// `--symbols` wins over the config's `symbols` key. `None` means every
/// symbol in the data file.
pub fn resolve_symbols(
    symbols_override: Option<&str>,
    config: &dyn ConfigPort,
) -> Result<Option<Vec<String>>, BandtraderError> {
    match symbols_override {
        Some(s) => parse_symbols(s)
            .map(Some)
            .map_err(|e| BandtraderError::ConfigInvalid {
                section: "cli".to_string(),
                key: "symbols".to_string(),
                reason: e.to_string(),
            }),
        None => validate_symbols(config),
    }
}

pub fn resolve_data_file(
    data_override: Option<&Path>,
    config: &dyn ConfigPort,
) -> Result<PathBuf, BandtraderError> {
    if let Some(p) = data_override {
        return Ok(p.to_path_buf());
    }
    match config.get_string("backtest", "data_file") {
        Some(s) if !s.trim().is_empty() => Ok(PathBuf::from(s.trim())),
        _ => Err(BandtraderError::ConfigMissing {
            section: "backtest".to_string(),
            key: "data_file".to_string(),
        }),
    }
}

/// Load histories, simulate, and reduce to a report.
pub fn run_backtest_pipeline(
    data: &dyn DataPort,
    config: &BacktestConfig,
    symbols: Option<&[String]>,
) -> Result<BacktestReport, BandtraderError> {
    let histories = data.load_histories(symbols)?;
    info!(instruments = histories.len(), "price data loaded");

    let result = run_backtest(&histories, config)?;
    let report = BacktestReport::build(&result, config)?;
    info!(
        final_capital = %report.metrics.final_capital,
        days = report.metrics.trading_days,
        "backtest complete"
    );
    Ok(report)
}

fn percent(value: Decimal) -> String {
    format!("{:.2}%", (value * Decimal::ONE_HUNDRED).round_dp(2))
}

pub fn format_report(report: &BacktestReport) -> String {
    let m = &report.metrics;
    let mut out = String::new();

    let _ = writeln!(out, "Initial capital:  {:.2}", m.initial_capital);
    let _ = writeln!(out, "Final capital:    {:.2}", m.final_capital);
    let _ = writeln!(out, "Total return:     {}", percent(m.total_return));
    let _ = writeln!(
        out,
        "Max drawdown:     {}",
        m.max_drawdown.map_or_else(|| "n/a".to_string(), percent)
    );
    let _ = writeln!(
        out,
        "Sharpe ratio:     {}",
        m.sharpe_ratio
            .map_or_else(|| "n/a".to_string(), |s| format!("{:.4}", s.round_dp(4)))
    );
    let _ = writeln!(out, "Trading days:     {}", m.trading_days);

    if !report.instruments.is_empty() {
        let _ = writeln!(out, "\nInstruments:");
        for inst in &report.instruments {
            let _ = writeln!(
                out,
                "  {:<8} trades {:>4}  start {:>14.2}  final {:>14.2}  {} ({} shares)",
                inst.symbol,
                inst.trades,
                inst.starting_capital,
                inst.final_value,
                inst.position,
                inst.shares_held
            );
        }
    }

    if !report.skipped.is_empty() {
        let _ = writeln!(out, "\nSkipped:");
        for skip in &report.skipped {
            let _ = writeln!(out, "  {}: {}", skip.symbol, skip.reason);
        }
    }

    out
}

fn run_list_symbols(data_path: &Path) -> ExitCode {
    let adapter = CsvAdapter::new(data_path.to_path_buf());
    let symbols = match adapter.list_symbols() {
        Ok(s) => s,
        Err(e) => return fail(e),
    };

    if symbols.is_empty() {
        eprintln!("No symbols found in {}", data_path.display());
    } else {
        for symbol in &symbols {
            println!("{}", symbol);
        }
        eprintln!("{} symbols found", symbols.len());
    }
    ExitCode::SUCCESS
}

fn run_validate(config_path: &Path) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let bt_config = match build_backtest_config(&adapter) {
        Ok(c) => c,
        Err(e) => return fail(e),
    };
    let symbols = match validate_symbols(&adapter) {
        Ok(s) => s,
        Err(e) => return fail(e),
    };
    let data_file = adapter
        .get_string("backtest", "data_file")
        .filter(|s| !s.trim().is_empty());

    eprint!(
        "{}",
        describe_config(&bt_config, data_file.as_deref(), symbols.as_deref())
    );
    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}

/// Resolved configuration, one `key: value` line per setting.
pub fn describe_config(
    config: &BacktestConfig,
    data_file: Option<&str>,
    symbols: Option<&[String]>,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "  initial_capital:         {}", config.initial_capital);
    let _ = writeln!(out, "  lookback:                {}", config.lookback);
    let _ = writeln!(
        out,
        "  short_volatility_window: {}",
        config.short_volatility_window
    );
    let _ = writeln!(out, "  gaussian_poles:          {}", config.gaussian_poles);
    let _ = writeln!(out, "  exit_band:               {}", config.exit_band);
    let _ = writeln!(out, "  parallel:                {}", config.parallel);
    let _ = writeln!(
        out,
        "  data_file:               {}",
        data_file.unwrap_or("(none, pass --data)")
    );
    let _ = writeln!(
        out,
        "  symbols:                 {}",
        symbols.map_or_else(|| "(all in data file)".to_string(), |s| s.join(","))
    );
    out
}
