//! Backtest simulator.
//!
//! Each instrument runs on its own [`PositionState`] and [`CapitalLedger`],
//! producing its own value series. The portfolio series is the element-wise
//! sum of those, built after every instrument finishes, so instruments can
//! run in parallel without sharing an accumulator.

use chrono::NaiveDate;
use rayon::prelude::*;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use super::error::BandtraderError;
use super::indicator::{IndicatorParams, IndicatorSeries};
use super::indicator_helpers::div;
use super::ledger::CapitalLedger;
use super::portfolio::PortfolioValueSeries;
use super::price_bar::PriceBar;
use super::strategy::{ExitBand, PositionState, Signal};
use super::universe::{SkippedInstrument, admit_instruments, validate_history};

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub initial_capital: Decimal,
    pub lookback: usize,
    pub short_volatility_window: usize,
    pub gaussian_poles: usize,
    pub exit_band: Decimal,
    pub parallel: bool,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            initial_capital: Decimal::from(1_000_000),
            lookback: 14,
            short_volatility_window: 7,
            gaussian_poles: 2,
            exit_band: Decimal::new(3, 2),
            parallel: false,
        }
    }
}

impl BacktestConfig {
    pub fn indicator_params(&self) -> IndicatorParams {
        IndicatorParams {
            lookback: self.lookback,
            short_window: self.short_volatility_window,
            poles: self.gaussian_poles,
        }
    }
}

/// A state transition and the fill it produced. Quantity can be zero,
/// e.g. a short entry with nothing held.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeRecord {
    pub date: NaiveDate,
    pub signal: Signal,
    pub quantity: u64,
    pub price: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InstrumentResult {
    pub symbol: String,
    pub starting_capital: Decimal,
    pub values: PortfolioValueSeries,
    pub trades: Vec<TradeRecord>,
    pub ledger: CapitalLedger,
    pub state: PositionState,
}

impl InstrumentResult {
    pub fn final_value(&self) -> Decimal {
        self.values.last().unwrap_or(self.starting_capital)
    }
}

#[derive(Debug, Clone)]
pub struct BacktestResult {
    pub portfolio: PortfolioValueSeries,
    pub instruments: Vec<InstrumentResult>,
    pub skipped: Vec<SkippedInstrument>,
}

/// Run one instrument over its full history with `capital` as its slice.
///
/// The value series starts at bar `lookback` and holds one entry per bar
/// after that, so its length is `history.len() - lookback`.
pub fn simulate_instrument(
    symbol: &str,
    history: &[PriceBar],
    capital: Decimal,
    config: &BacktestConfig,
) -> Result<InstrumentResult, BandtraderError> {
    validate_history(symbol, history)?;

    let params = config.indicator_params();
    let band = ExitBand::new(config.exit_band);
    let closes: Vec<Decimal> = history.iter().map(|b| b.close).collect();
    let highs: Vec<Decimal> = history.iter().map(|b| b.high).collect();
    let lows: Vec<Decimal> = history.iter().map(|b| b.low).collect();

    let mut state = PositionState::new();
    let mut ledger = CapitalLedger::new(capital);
    let mut values = PortfolioValueSeries::new();
    let mut trades = Vec::new();

    let series = IndicatorSeries::compute(&highs, &lows, &closes, &params);
    for (i, bar) in history.iter().enumerate().skip(config.lookback) {
        let snapshot = series.snapshot(&closes, i);

        let price = bar.trade_price();
        if let Some(signal) = state.step(bar.close, snapshot.gaussian, snapshot.lsma, &band) {
            let volume = bar.available_volume();
            let quantity = match signal {
                Signal::EnterLong | Signal::ExitShort => ledger.buy(price, volume),
                Signal::EnterShort => ledger.sell(price, volume),
                Signal::ExitLong => ledger.sell_all(price),
            };
            debug!(
                symbol,
                date = %bar.date,
                %signal,
                quantity,
                %price,
                band = %band.width(),
                rsi = %snapshot.rsi,
                adx = %snapshot.adx,
                zscore = %snapshot.zscore,
                volatility = %snapshot.volatility,
                short_volatility = %snapshot.short_volatility,
                tema_rising = snapshot.tema_rising(),
                "trade"
            );
            trades.push(TradeRecord {
                date: bar.date,
                signal,
                quantity,
                price,
            });
        }

        values.push(ledger.market_value(price));
    }

    debug!(
        symbol,
        days = values.len(),
        trades = trades.len(),
        "instrument complete"
    );

    Ok(InstrumentResult {
        symbol: symbol.to_string(),
        starting_capital: capital,
        values,
        trades,
        ledger,
        state,
    })
}

/// Run every admissible instrument and sum their value series.
///
/// Capital is split equally across admitted instruments. Skipped instruments
/// are reported, not fatal, unless none remain.
pub fn run_backtest(
    histories: &BTreeMap<String, Vec<PriceBar>>,
    config: &BacktestConfig,
) -> Result<BacktestResult, BandtraderError> {
    let (admitted, skipped) = admit_instruments(histories, config.lookback);
    for skip in &skipped {
        warn!(symbol = %skip.symbol, reason = %skip.reason, "skipping instrument");
    }
    if admitted.is_empty() {
        return Err(BandtraderError::NoValidInstruments);
    }

    let capital = div(config.initial_capital, Decimal::from(admitted.len()));
    info!(
        instruments = admitted.len(),
        skipped = skipped.len(),
        %capital,
        parallel = config.parallel,
        "running backtest"
    );

    let run = |&(symbol, history): &(&str, &[PriceBar])| {
        simulate_instrument(symbol, history, capital, config)
    };
    let instruments: Vec<InstrumentResult> = if config.parallel {
        admitted.par_iter().map(run).collect::<Result<_, _>>()?
    } else {
        admitted.iter().map(run).collect::<Result<_, _>>()?
    };

    let portfolio = PortfolioValueSeries::sum(instruments.iter().map(|r| &r.values));
    info!(days = portfolio.len(), "backtest complete");

    Ok(BacktestResult {
        portfolio,
        instruments,
        skipped,
    })
}
