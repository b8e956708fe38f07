//! Triple Exponential Moving Average.
//!
//! TEMA = 3*EMA1 - 3*EMA2 + EMA3, where EMA2 is the EMA of EMA1 and EMA3
//! the EMA of EMA2. Each EMA uses k = 2/(n+1) and is seeded with the SMA of
//! its first n inputs, so TEMA needs 3n - 2 closes; fewer gives 0.

use crate::domain::indicator_helpers::{div, mean, round};
use rust_decimal::Decimal;

pub fn tema(prices: &[Decimal], period: usize) -> Decimal {
    tema_series(prices, period)
        .last()
        .copied()
        .unwrap_or(Decimal::ZERO)
}

/// TEMA at every index, each value equal to `tema` over the prefix ending
/// there. Indices inside the warmup hold 0.
pub fn tema_series(prices: &[Decimal], period: usize) -> Vec<Decimal> {
    let mut out = vec![Decimal::ZERO; prices.len()];
    if period == 0 {
        return out;
    }
    let ema1 = ema_series(prices, period);
    let ema2 = ema_series(&ema1, period);
    let ema3 = ema_series(&ema2, period);

    let lag = period - 1;
    for (j, e3) in ema3.iter().enumerate() {
        let i = j + 3 * lag;
        out[i] = Decimal::from(3) * (ema1[i - lag] - ema2[i - 2 * lag]) + e3;
    }
    out
}

/// TEMA as of the bar before the latest one.
pub fn previous_tema(prices: &[Decimal], period: usize) -> Decimal {
    match prices.split_last() {
        Some((_, earlier)) => tema(earlier, period),
        None => Decimal::ZERO,
    }
}

/// EMA values from index n-1 onward; empty when fewer than n inputs.
fn ema_series(values: &[Decimal], period: usize) -> Vec<Decimal> {
    if period == 0 || values.len() < period {
        return Vec::new();
    }
    let k = div(Decimal::TWO, Decimal::from(period + 1));
    let mut ema = mean(&values[..period]);
    let mut out = Vec::with_capacity(values.len() - period + 1);
    out.push(ema);
    for value in &values[period..] {
        ema = round(value * k + ema * (Decimal::ONE - k));
        out.push(ema);
    }
    out
}
