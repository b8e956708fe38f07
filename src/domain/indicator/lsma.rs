//! Least Squares Moving Average.
//!
//! Fits y = a + b*x over the last n closes with x = 0..n and returns the
//! fitted value at x = n - 1, the most recent bar.

use crate::domain::indicator_helpers::{div, tail};
use rust_decimal::Decimal;

pub fn lsma(prices: &[Decimal], period: usize) -> Decimal {
    let Some(window) = tail(prices, period) else {
        return Decimal::ZERO;
    };
    if period == 1 {
        return window[0];
    }

    let n = Decimal::from(period);
    let last_x = Decimal::from(period - 1);
    // sum of 0..n and of squares 0..n in closed form
    let sum_x = div(n * last_x, Decimal::TWO);
    let sum_x2 = div(last_x * n * (Decimal::TWO * n - Decimal::ONE), Decimal::from(6));

    let (sum_y, sum_xy) = window.iter().enumerate().fold(
        (Decimal::ZERO, Decimal::ZERO),
        |(sum_y, sum_xy), (x, y)| (sum_y + y, sum_xy + Decimal::from(x) * y),
    );

    let denominator = n * sum_x2 - sum_x * sum_x;
    let slope = div(n * sum_xy - sum_x * sum_y, denominator);
    let intercept = div(sum_y - slope * sum_x, n);
    intercept + slope * last_x
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn lsma_insufficient_data_is_zero() {
        assert_eq!(lsma(&[dec!(1), dec!(2)], 14), Decimal::ZERO);
        assert_eq!(lsma(&[], 1), Decimal::ZERO);
    }

    #[test]
    fn lsma_single_period_is_last_close() {
        assert_eq!(lsma(&[dec!(5), dec!(7)], 1), dec!(7));
    }

    #[test]
    fn lsma_linear_series_tracks_price() {
        let prices: Vec<Decimal> = (0..20).map(|i| Decimal::from(100 + i)).collect();
        assert_eq!(lsma(&prices, 14), dec!(119));
    }

    #[test]
    fn lsma_known_regression() {
        // x: 0..4, y: 2,4,3,5 → slope 0.8, intercept 2.3, fitted at x=3: 4.7
        let prices = [dec!(2), dec!(4), dec!(3), dec!(5)];
        assert_eq!(lsma(&prices, 4), dec!(4.7));
    }

    #[test]
    fn lsma_constant_series() {
        let prices = [dec!(42.5); 14];
        assert_eq!(lsma(&prices, 14), dec!(42.5));
    }

    #[test]
    fn lsma_uses_trailing_window() {
        let prices = [dec!(9999), dec!(2), dec!(4), dec!(3), dec!(5)];
        assert_eq!(lsma(&prices, 4), dec!(4.7));
    }
}
