//! Z-score of the latest close against its rolling window.
//!
//! Z(n) = (C - SMA(n)) / STDDEV(n); 0 when the window is flat or short.

use crate::domain::indicator_helpers::{div, mean, population_stddev, tail};
use rust_decimal::Decimal;

pub fn zscore(prices: &[Decimal], period: usize) -> Decimal {
    let Some(window) = tail(prices, period) else {
        return Decimal::ZERO;
    };
    let stddev = population_stddev(window);
    if stddev.is_zero() {
        return Decimal::ZERO;
    }
    let current = window[window.len() - 1];
    div(current - mean(window), stddev)
}
