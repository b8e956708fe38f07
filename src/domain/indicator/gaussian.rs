//! Gaussian filter (Ehlers' recursive multi-pole low-pass filter).
//!
//! beta  = (1 - cos(2*pi / n)) / (2^(1/poles) - 1)
//! alpha = -beta + sqrt(beta^2 + 2*beta)
//!
//! f[i] = alpha^poles * x[i] + sum_{k=1..=poles} (-1)^(k+1) * C(poles, k) * (1 - alpha)^k * f[i-k]
//!
//! Values before the first bar are seeded with the first price, so a flat
//! input produces a flat output. Fewer than n prices gives an empty sequence.

use crate::domain::indicator_helpers::{round, tail};
use rust_decimal::prelude::*;

pub fn gaussian_filter(prices: &[Decimal], period: usize, poles: usize) -> Vec<Decimal> {
    if period < 2 || poles == 0 || tail(prices, period).is_none() {
        return Vec::new();
    }
    let Some(alpha) = gaussian_alpha(period, poles) else {
        return Vec::new();
    };

    let decay = Decimal::ONE - alpha;
    let gain = power(alpha, poles);
    let feedback: Vec<Decimal> = (1..=poles)
        .map(|k| {
            let term = Decimal::from(binomial(poles, k)) * power(decay, k);
            if k % 2 == 1 { term } else { -term }
        })
        .collect();

    let seed = prices[0];
    let mut filtered: Vec<Decimal> = Vec::with_capacity(prices.len());
    for (i, price) in prices.iter().enumerate() {
        let mut value = gain * price;
        for (k, coeff) in feedback.iter().enumerate() {
            let lag = k + 1;
            let prev = if i >= lag { filtered[i - lag] } else { seed };
            value += coeff * prev;
        }
        filtered.push(round(value));
    }
    filtered
}

/// Latest filter value, zero when the filter has no output yet.
pub fn latest_gaussian(prices: &[Decimal], period: usize, poles: usize) -> Decimal {
    gaussian_filter(prices, period, poles)
        .last()
        .copied()
        .unwrap_or(Decimal::ZERO)
}

fn gaussian_alpha(period: usize, poles: usize) -> Option<Decimal> {
    let omega = 2.0 * std::f64::consts::PI / period as f64;
    let beta = (1.0 - omega.cos()) / (2f64.powf(1.0 / poles as f64) - 1.0);
    let alpha = -beta + (beta * beta + 2.0 * beta).sqrt();
    if !alpha.is_finite() || alpha <= 0.0 {
        return None;
    }
    Decimal::from_f64(alpha).map(round)
}

fn power(base: Decimal, exponent: usize) -> Decimal {
    (0..exponent).fold(Decimal::ONE, |acc, _| round(acc * base))
}

fn binomial(n: usize, k: usize) -> u64 {
    (0..k).fold(1u64, |acc, i| acc * (n - i) as u64 / (i + 1) as u64)
}
