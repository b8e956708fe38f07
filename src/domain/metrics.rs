//! Performance metrics over the portfolio value series.
//!
//! Degenerate statistics (zero standard deviation, no positive peak) are
//! reported as `None` rather than dividing by zero.
//!
//! Statistics keep Decimal's full 28 significant digits instead of the
//! fixed indicator scale, so tiny but real return spreads survive.

use rust_decimal::{Decimal, MathematicalOps};

use super::backtest::{BacktestConfig, BacktestResult};
use super::error::MetricsError;
use super::strategy::Position;
use super::universe::SkippedInstrument;

pub const TRADING_DAYS_PER_YEAR: u32 = 252;

/// numerator / denominator at full precision, zero when undefined.
fn ratio(numerator: Decimal, denominator: Decimal) -> Decimal {
    numerator.checked_div(denominator).unwrap_or(Decimal::ZERO)
}

/// Square root, zero for non-positive input. Values below one are lifted by
/// powers of 100 first so Newton's iteration runs on a normal magnitude.
fn root(value: Decimal) -> Decimal {
    if value <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let mut scaled = value;
    let mut shift = Decimal::ONE;
    while scaled < Decimal::ONE {
        scaled *= Decimal::ONE_HUNDRED;
        shift *= Decimal::TEN;
    }
    scaled
        .sqrt()
        .and_then(|r| r.checked_div(shift))
        .unwrap_or(Decimal::ZERO)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub initial_capital: Decimal,
    pub final_capital: Decimal,
    pub total_return: Decimal,
    pub trading_days: usize,
    pub mean_daily_return: Decimal,
    pub daily_volatility: Decimal,
    /// Annualized; `None` when daily returns have zero spread.
    pub sharpe_ratio: Option<Decimal>,
    /// Fraction of the running peak; `None` when no peak is positive.
    pub max_drawdown: Option<Decimal>,
}

impl Metrics {
    pub fn compute(values: &[Decimal], initial_capital: Decimal) -> Result<Self, MetricsError> {
        if values.len() < 2 {
            return Err(MetricsError::InsufficientData {
                points: values.len(),
            });
        }

        let final_capital = values[values.len() - 1];
        let returns = daily_returns(values);
        let (mean_daily_return, daily_volatility) = mean_and_stddev(&returns);

        Ok(Metrics {
            initial_capital,
            final_capital,
            total_return: ratio(final_capital - initial_capital, initial_capital),
            trading_days: values.len(),
            mean_daily_return,
            daily_volatility,
            sharpe_ratio: sharpe_ratio(&returns),
            max_drawdown: max_drawdown(values),
        })
    }
}

/// (v[i] - v[i-1]) / v[i-1] for i >= 1; a zero previous value gives 0.
pub fn daily_returns(values: &[Decimal]) -> Vec<Decimal> {
    values
        .windows(2)
        .map(|w| ratio(w[1] - w[0], w[0]))
        .collect()
}

/// Sample mean and population standard deviation.
fn mean_and_stddev(returns: &[Decimal]) -> (Decimal, Decimal) {
    if returns.is_empty() {
        return (Decimal::ZERO, Decimal::ZERO);
    }
    let n = Decimal::from(returns.len());
    let mean = ratio(returns.iter().sum(), n);
    let variance = ratio(
        returns
            .iter()
            .map(|r| {
                let diff = r - mean;
                diff * diff
            })
            .sum(),
        n,
    );
    (mean, root(variance))
}

/// mean / stddev * sqrt(252)
pub fn sharpe_ratio(returns: &[Decimal]) -> Option<Decimal> {
    let (mean, stddev) = mean_and_stddev(returns);
    if stddev.is_zero() {
        return None;
    }
    Some(ratio(mean, stddev) * root(Decimal::from(TRADING_DAYS_PER_YEAR)))
}

/// Largest (peak - value) / peak seen against the running peak.
pub fn max_drawdown(values: &[Decimal]) -> Option<Decimal> {
    let mut peak = values.first().copied()?;
    let mut max_dd: Option<Decimal> = None;

    for &value in values {
        peak = peak.max(value);
        if peak <= Decimal::ZERO {
            continue;
        }
        let dd = ratio(peak - value, peak);
        max_dd = Some(max_dd.map_or(dd, |m| m.max(dd)));
    }

    max_dd
}

/// Closing state of one instrument.
#[derive(Debug, Clone, PartialEq)]
pub struct InstrumentSummary {
    pub symbol: String,
    pub trades: usize,
    pub starting_capital: Decimal,
    pub final_value: Decimal,
    pub position: Position,
    pub shares_held: u64,
}

/// Structured final report. Presentation is left to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct BacktestReport {
    pub metrics: Metrics,
    pub instruments: Vec<InstrumentSummary>,
    pub skipped: Vec<SkippedInstrument>,
}

impl BacktestReport {
    pub fn build(result: &BacktestResult, config: &BacktestConfig) -> Result<Self, MetricsError> {
        let metrics = Metrics::compute(result.portfolio.values(), config.initial_capital)?;
        let instruments = result
            .instruments
            .iter()
            .map(|r| InstrumentSummary {
                symbol: r.symbol.clone(),
                trades: r.trades.len(),
                starting_capital: r.starting_capital,
                final_value: r.final_value(),
                position: r.state.position(),
                shares_held: r.ledger.shares_held(),
            })
            .collect();

        Ok(Self {
            metrics,
            instruments,
            skipped: result.skipped.clone(),
        })
    }
}
