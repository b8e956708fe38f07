//! RSI (Relative Strength Index).
//!
//! Average gain and average loss over the last n price changes
//! (n + 1 closes), mapped onto 0..=100:
//!
//! RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//!
//! avg_loss == 0 gives 100, or 50 when avg_gain is also 0 (flat window).
//! Fewer than n + 1 closes gives 0.

use crate::domain::indicator_helpers::{div, tail};
use rust_decimal::Decimal;

pub fn rsi(prices: &[Decimal], period: usize) -> Decimal {
    let Some(window) = tail(prices, period.saturating_add(1)) else {
        return Decimal::ZERO;
    };
    if period == 0 {
        return Decimal::ZERO;
    }

    let (gains, losses) = window
        .windows(2)
        .fold((Decimal::ZERO, Decimal::ZERO), |(gains, losses), pair| {
            let change = pair[1] - pair[0];
            if change > Decimal::ZERO {
                (gains + change, losses)
            } else {
                (gains, losses - change)
            }
        });

    let n = Decimal::from(period);
    let avg_gain = div(gains, n);
    let avg_loss = div(losses, n);

    if avg_loss.is_zero() {
        return if avg_gain.is_zero() {
            Decimal::from(50)
        } else {
            Decimal::ONE_HUNDRED
        };
    }

    let rs = div(avg_gain, avg_loss);
    Decimal::ONE_HUNDRED - div(Decimal::ONE_HUNDRED, Decimal::ONE + rs)
}
