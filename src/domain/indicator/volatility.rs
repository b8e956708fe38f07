//! Rolling volatility.
//!
//! Population standard deviation of the last n closes.
//! VOL(n) = sqrt(sum((C[i-j] - SMA(n))^2 for j in 0..n) / n)

use crate::domain::indicator_helpers::{population_stddev, tail};
use rust_decimal::Decimal;

pub fn volatility(prices: &[Decimal], period: usize) -> Decimal {
    match tail(prices, period) {
        Some(window) => population_stddev(window),
        None => Decimal::ZERO,
    }
}
