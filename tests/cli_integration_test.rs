//! CLI integration tests for config handling and the backtest command.
//!
//! Tests cover:
//! - Config building and validation from real INI files on disk
//! - Data file and symbol resolution
//! - Full pipeline over a CSV file written to a temp directory
//! - Report formatting and command exit codes

mod common;

use bandtrader::adapters::csv_adapter::CsvAdapter;
use bandtrader::adapters::file_config_adapter::FileConfigAdapter;
use bandtrader::cli::{self, Cli, Command};
use bandtrader::domain::error::BandtraderError;
use common::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn same_code(a: ExitCode, b: ExitCode) -> bool {
    format!("{a:?}") == format!("{b:?}")
}

const VALID_INI: &str = r#"
[backtest]
initial_capital = 200000
lookback = 14
short_volatility_window = 7
gaussian_poles = 2
exit_band = 0.03
parallel = false
data_file = prices.csv
symbols = BHP,CBA
"#;

mod config_loading {
    use super::*;

    #[test]
    fn build_backtest_config_from_file() {
        let file = write_temp_ini(VALID_INI);
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        let config = cli::build_backtest_config(&adapter).unwrap();

        assert_eq!(config.initial_capital, dec!(200000));
        assert_eq!(config.lookback, 14);
        assert_eq!(config.short_volatility_window, 7);
        assert_eq!(config.gaussian_poles, 2);
        assert_eq!(config.exit_band, dec!(0.03));
        assert!(!config.parallel);
    }

    #[test]
    fn build_backtest_config_rejects_invalid_band() {
        let adapter = FileConfigAdapter::from_string("[backtest]\nexit_band = 2\n").unwrap();
        let err = cli::build_backtest_config(&adapter).unwrap_err();
        assert!(matches!(err, BandtraderError::ConfigInvalid { key, .. } if key == "exit_band"));
    }

    #[test]
    fn load_config_missing_file_fails() {
        assert!(cli::load_config(Path::new("/nonexistent/bandtrader.ini")).is_err());
    }
}

mod resolution {
    use super::*;

    #[test]
    fn data_file_from_config() {
        let adapter = FileConfigAdapter::from_string(VALID_INI).unwrap();
        assert_eq!(
            cli::resolve_data_file(None, &adapter).unwrap(),
            PathBuf::from("prices.csv")
        );
    }

    #[test]
    fn data_file_override_wins() {
        let adapter = FileConfigAdapter::from_string(VALID_INI).unwrap();
        assert_eq!(
            cli::resolve_data_file(Some(Path::new("/tmp/other.csv")), &adapter).unwrap(),
            PathBuf::from("/tmp/other.csv")
        );
    }

    #[test]
    fn missing_data_file_is_config_missing() {
        let adapter = FileConfigAdapter::from_string("[backtest]\n").unwrap();
        let err = cli::resolve_data_file(None, &adapter).unwrap_err();
        assert!(matches!(err, BandtraderError::ConfigMissing { key, .. } if key == "data_file"));
    }

    #[test]
    fn symbols_from_config_and_override() {
        let adapter = FileConfigAdapter::from_string(VALID_INI).unwrap();
        assert_eq!(
            cli::resolve_symbols(None, &adapter).unwrap(),
            Some(vec!["BHP".to_string(), "CBA".to_string()])
        );
        assert_eq!(
            cli::resolve_symbols(Some("wbc"), &adapter).unwrap(),
            Some(vec!["WBC".to_string()])
        );
    }

    #[test]
    fn no_symbols_means_everything() {
        let adapter = FileConfigAdapter::from_string("[backtest]\n").unwrap();
        assert_eq!(cli::resolve_symbols(None, &adapter).unwrap(), None);
    }

    #[test]
    fn bad_symbol_override_fails() {
        let adapter = FileConfigAdapter::from_string("[backtest]\n").unwrap();
        assert!(cli::resolve_symbols(Some("BHP,,CBA"), &adapter).is_err());
    }
}

mod pipeline {
    use super::*;

    fn write_prices(dir: &tempfile::TempDir) -> PathBuf {
        let bhp = rising_bars("BHP", 20);
        let cba = choppy_bars("CBA", 30, 90);
        let wbc = rising_bars("WBC", 25);
        let path = dir.path().join("prices.csv");
        std::fs::write(&path, csv_content(&[&bhp, &cba, &wbc])).unwrap();
        path
    }

    #[test]
    fn csv_pipeline_runs_configured_symbols() {
        let dir = tempfile::TempDir::new().unwrap();
        let data = CsvAdapter::new(write_prices(&dir));
        let adapter = FileConfigAdapter::from_string(VALID_INI).unwrap();
        let config = cli::build_backtest_config(&adapter).unwrap();
        let symbols = cli::resolve_symbols(None, &adapter).unwrap();

        let report = cli::run_backtest_pipeline(&data, &config, symbols.as_deref()).unwrap();

        let names: Vec<&str> = report.instruments.iter().map(|i| i.symbol.as_str()).collect();
        assert_eq!(names, vec!["BHP", "CBA"]);
        for inst in &report.instruments {
            assert_eq!(inst.starting_capital, dec!(100000));
        }
        // Longest admitted history is 30 bars.
        assert_eq!(report.metrics.trading_days, 16);
    }

    #[test]
    fn format_report_lists_instruments_and_skips() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("prices.csv");
        let good = rising_bars("BHP", 20);
        let tiny = rising_bars("XYZ", 4);
        std::fs::write(&path, csv_content(&[&good, &tiny])).unwrap();

        let config = bandtrader::domain::backtest::BacktestConfig {
            initial_capital: dec!(10000),
            ..Default::default()
        };
        let report = cli::run_backtest_pipeline(&CsvAdapter::new(path), &config, None).unwrap();
        let text = cli::format_report(&report);

        assert!(text.contains("Initial capital:  10000.00"));
        assert!(text.contains("Final capital:    10348.00"));
        assert!(text.contains("Max drawdown:     0.00%"));
        assert!(text.contains("BHP"));
        assert!(text.contains("Skipped:"));
        assert!(text.contains("XYZ: have 4 bars, need at least 15"));
    }

    #[test]
    fn format_report_shows_na_for_flat_series() {
        let port = MockDataPort::new().with_bars("FLAT", make_bars("FLAT", &[dec!(20); 20]));
        let report =
            cli::run_backtest_pipeline(&port, &Default::default(), None).unwrap();
        assert_eq!(report.metrics.total_return, Decimal::ZERO);
        assert!(cli::format_report(&report).contains("Sharpe ratio:     n/a"));
    }
}

mod commands {
    use super::*;

    #[test]
    fn validate_command_succeeds_on_valid_config() {
        let file = write_temp_ini(VALID_INI);
        let code = cli::run(Cli {
            command: Command::Validate {
                config: file.path().to_path_buf(),
            },
        });
        assert!(same_code(code, ExitCode::SUCCESS));
    }

    #[test]
    fn describe_config_echoes_data_file_and_symbols() {
        let adapter = FileConfigAdapter::from_string(VALID_INI).unwrap();
        let config = cli::build_backtest_config(&adapter).unwrap();
        let symbols = cli::resolve_symbols(None, &adapter).unwrap();

        let text = cli::describe_config(&config, Some("prices.csv"), symbols.as_deref());
        assert!(text.contains("initial_capital:         200000"));
        assert!(text.contains("data_file:               prices.csv"));
        assert!(text.contains("symbols:                 BHP,CBA"));

        let bare = cli::describe_config(&config, None, None);
        assert!(bare.contains("(none, pass --data)"));
        assert!(bare.contains("(all in data file)"));
    }

    #[test]
    fn validate_command_rejects_duplicate_symbols() {
        let file = write_temp_ini("[backtest]\nsymbols = BHP,bhp\n");
        let code = cli::run(Cli {
            command: Command::Validate {
                config: file.path().to_path_buf(),
            },
        });
        assert!(same_code(code, ExitCode::from(2)));
    }

    #[test]
    fn validate_command_reports_config_exit_code() {
        let file = write_temp_ini("[backtest]\nlookback = 1\n");
        let code = cli::run(Cli {
            command: Command::Validate {
                config: file.path().to_path_buf(),
            },
        });
        assert!(same_code(code, ExitCode::from(2)));
    }

    #[test]
    fn backtest_command_runs_with_data_override() {
        let dir = tempfile::TempDir::new().unwrap();
        let data = dir.path().join("prices.csv");
        std::fs::write(&data, csv_content(&[&rising_bars("BHP", 20)])).unwrap();
        let file = write_temp_ini("[backtest]\ninitial_capital = 10000\n");

        let code = cli::run(Cli {
            command: Command::Backtest {
                config: file.path().to_path_buf(),
                data: Some(data),
                symbols: None,
                parallel: true,
                verbose: false,
            },
        });
        assert!(same_code(code, ExitCode::SUCCESS));
    }

    #[test]
    fn backtest_command_missing_data_is_data_exit_code() {
        let file = write_temp_ini("[backtest]\ndata_file = /nonexistent/prices.csv\n");
        let code = cli::run(Cli {
            command: Command::Backtest {
                config: file.path().to_path_buf(),
                data: None,
                symbols: None,
                parallel: false,
                verbose: false,
            },
        });
        assert!(same_code(code, ExitCode::from(3)));
    }

    #[test]
    fn backtest_command_with_no_valid_instruments() {
        let dir = tempfile::TempDir::new().unwrap();
        let data = dir.path().join("prices.csv");
        std::fs::write(&data, csv_content(&[&rising_bars("BHP", 5)])).unwrap();
        let file = write_temp_ini("[backtest]\n");

        let code = cli::run(Cli {
            command: Command::Backtest {
                config: file.path().to_path_buf(),
                data: Some(data),
                symbols: None,
                parallel: false,
                verbose: false,
            },
        });
        assert!(same_code(code, ExitCode::from(5)));
    }

    #[test]
    fn list_symbols_command_succeeds() {
        let dir = tempfile::TempDir::new().unwrap();
        let data = dir.path().join("prices.csv");
        std::fs::write(
            &data,
            csv_content(&[&rising_bars("CBA", 2), &rising_bars("BHP", 2)]),
        )
        .unwrap();

        let code = cli::run(Cli {
            command: Command::ListSymbols { data },
        });
        assert!(same_code(code, ExitCode::SUCCESS));
    }
}
