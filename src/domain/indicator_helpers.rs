//! Shared decimal arithmetic for indicator and metrics calculations.
//!
//! Every division and square root rounds to [`DIVISION_SCALE`] places with
//! banker's rounding, so all rolling statistics share one precision context.

use rust_decimal::prelude::*;

pub const DIVISION_SCALE: u32 = 16;

pub fn round(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DIVISION_SCALE, RoundingStrategy::MidpointNearestEven)
}

/// numerator / denominator, or zero when the quotient is undefined.
pub fn div(numerator: Decimal, denominator: Decimal) -> Decimal {
    numerator
        .checked_div(denominator)
        .map(round)
        .unwrap_or(Decimal::ZERO)
}

/// Square root, zero for non-positive input.
pub fn sqrt(value: Decimal) -> Decimal {
    if value <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    value.sqrt().map(round).unwrap_or(Decimal::ZERO)
}

pub fn mean(values: &[Decimal]) -> Decimal {
    if values.is_empty() {
        return Decimal::ZERO;
    }
    div(values.iter().sum(), Decimal::from(values.len()))
}

/// sqrt(sum((x - mean)^2) / n)
pub fn population_stddev(values: &[Decimal]) -> Decimal {
    if values.is_empty() {
        return Decimal::ZERO;
    }
    let mu = mean(values);
    let sum_sq: Decimal = values
        .iter()
        .map(|x| {
            let diff = x - mu;
            diff * diff
        })
        .sum();
    sqrt(div(sum_sq, Decimal::from(values.len())))
}

/// max(high - low, |high - prev_close|, |low - prev_close|)
pub fn true_range(high: Decimal, low: Decimal, prev_close: Decimal) -> Decimal {
    let hl = high - low;
    let hc = (high - prev_close).abs();
    let lc = (low - prev_close).abs();
    hl.max(hc).max(lc)
}

/// The last `period` values, or `None` when fewer are available.
pub fn tail(values: &[Decimal], period: usize) -> Option<&[Decimal]> {
    if period == 0 || values.len() < period {
        None
    } else {
        Some(&values[values.len() - period..])
    }
}
