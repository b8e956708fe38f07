//! Configuration validation.
//!
//! Reads the `[backtest]` section into a [`BacktestConfig`], checking every
//! field before a run starts. Absent keys take the defaults.

use crate::domain::backtest::BacktestConfig;
use crate::domain::error::BandtraderError;
use crate::domain::universe::parse_symbols;
use crate::ports::config_port::ConfigPort;
use rust_decimal::Decimal;

const SECTION: &str = "backtest";

pub const MAX_GAUSSIAN_POLES: i64 = 4;

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), BandtraderError> {
    backtest_config_from(config)?;
    validate_symbols(config)?;
    Ok(())
}

/// Build a validated [`BacktestConfig`] from the `[backtest]` section.
pub fn backtest_config_from(config: &dyn ConfigPort) -> Result<BacktestConfig, BandtraderError> {
    let defaults = BacktestConfig::default();

    let initial_capital = validate_initial_capital(config, defaults.initial_capital)?;
    let lookback = validate_lookback(config, defaults.lookback)?;
    let short_volatility_window =
        validate_short_window(config, defaults.short_volatility_window, lookback)?;
    let gaussian_poles = validate_poles(config, defaults.gaussian_poles)?;
    let exit_band = validate_exit_band(config, defaults.exit_band)?;
    let parallel = match config.get_bool(SECTION, "parallel") {
        None => defaults.parallel,
        Some(parsed) => parsed.map_err(|reason| invalid("parallel", reason))?,
    };

    Ok(BacktestConfig {
        initial_capital,
        lookback,
        short_volatility_window,
        gaussian_poles,
        exit_band,
        parallel,
    })
}

/// Optional symbol filter. `None` when the key is absent or blank.
pub fn validate_symbols(config: &dyn ConfigPort) -> Result<Option<Vec<String>>, BandtraderError> {
    match config.get_string(SECTION, "symbols") {
        Some(s) if !s.trim().is_empty() => parse_symbols(&s)
            .map(Some)
            .map_err(|e| invalid("symbols", e.to_string())),
        _ => Ok(None),
    }
}

fn invalid(key: &str, reason: impl Into<String>) -> BandtraderError {
    BandtraderError::ConfigInvalid {
        section: SECTION.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn decimal_or(
    config: &dyn ConfigPort,
    key: &str,
    default: Decimal,
) -> Result<Decimal, BandtraderError> {
    match config.get_decimal(SECTION, key) {
        None => Ok(default),
        Some(parsed) => parsed.map_err(|reason| invalid(key, reason)),
    }
}

fn int_or(config: &dyn ConfigPort, key: &str, default: usize) -> Result<i64, BandtraderError> {
    match config.get_int(SECTION, key) {
        None => Ok(default as i64),
        Some(parsed) => parsed.map_err(|reason| invalid(key, reason)),
    }
}

fn validate_initial_capital(
    config: &dyn ConfigPort,
    default: Decimal,
) -> Result<Decimal, BandtraderError> {
    let value = decimal_or(config, "initial_capital", default)?;
    if value <= Decimal::ZERO {
        return Err(invalid(
            "initial_capital",
            "initial_capital must be positive",
        ));
    }
    Ok(value)
}

fn validate_lookback(config: &dyn ConfigPort, default: usize) -> Result<usize, BandtraderError> {
    let value = int_or(config, "lookback", default)?;
    if value < 2 {
        return Err(invalid("lookback", "lookback must be at least 2"));
    }
    usize::try_from(value).map_err(|_| invalid("lookback", "lookback is out of range"))
}

fn validate_short_window(
    config: &dyn ConfigPort,
    default: usize,
    lookback: usize,
) -> Result<usize, BandtraderError> {
    let value = int_or(config, "short_volatility_window", default)?;
    if value < 1 || value > lookback as i64 {
        return Err(invalid(
            "short_volatility_window",
            format!("short_volatility_window must be between 1 and lookback ({lookback})"),
        ));
    }
    Ok(value as usize)
}

fn validate_poles(config: &dyn ConfigPort, default: usize) -> Result<usize, BandtraderError> {
    let value = int_or(config, "gaussian_poles", default)?;
    if !(1..=MAX_GAUSSIAN_POLES).contains(&value) {
        return Err(invalid(
            "gaussian_poles",
            format!("gaussian_poles must be between 1 and {MAX_GAUSSIAN_POLES}"),
        ));
    }
    Ok(value as usize)
}

fn validate_exit_band(
    config: &dyn ConfigPort,
    default: Decimal,
) -> Result<Decimal, BandtraderError> {
    let value = decimal_or(config, "exit_band", default)?;
    if value <= Decimal::ZERO || value >= Decimal::ONE {
        return Err(invalid("exit_band", "exit_band must be between 0 and 1"));
    }
    Ok(value)
}
