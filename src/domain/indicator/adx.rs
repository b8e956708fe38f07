//! ADX (Average Directional Index), Wilder's formulation.
//!
//! +DM = up move when it exceeds the down move and is positive, else 0.
//! -DM = down move when it exceeds the up move and is positive, else 0.
//! TR, +DM and -DM are Wilder-smoothed (seed = sum of the first n values,
//! then S = S - S/n + v). DX = 100 * |+DI - -DI| / (+DI + -DI).
//! ADX seeds with the mean of the first n DX values, then
//! ADX = (ADX * (n - 1) + DX) / n.
//!
//! Warmup: 2n bars. Fewer, or mismatched input lengths, gives 0.

use crate::domain::indicator_helpers::{div, true_range};
use rust_decimal::Decimal;

pub fn adx(highs: &[Decimal], lows: &[Decimal], closes: &[Decimal], period: usize) -> Decimal {
    adx_series(highs, lows, closes, period)
        .last()
        .copied()
        .unwrap_or(Decimal::ZERO)
}

/// ADX at every index, each value equal to `adx` over the prefix ending
/// there. The first value lands at index 2n - 1; earlier indices hold 0.
pub fn adx_series(
    highs: &[Decimal],
    lows: &[Decimal],
    closes: &[Decimal],
    period: usize,
) -> Vec<Decimal> {
    let len = closes.len();
    let mut out = vec![Decimal::ZERO; len];
    if period == 0 || highs.len() != len || lows.len() != len || len < 2 * period {
        return out;
    }

    let mut tr = Vec::with_capacity(len - 1);
    let mut plus_dm = Vec::with_capacity(len - 1);
    let mut minus_dm = Vec::with_capacity(len - 1);
    for i in 1..len {
        tr.push(true_range(highs[i], lows[i], closes[i - 1]));
        let up = highs[i] - highs[i - 1];
        let down = lows[i - 1] - lows[i];
        plus_dm.push(if up > down && up > Decimal::ZERO {
            up
        } else {
            Decimal::ZERO
        });
        minus_dm.push(if down > up && down > Decimal::ZERO {
            down
        } else {
            Decimal::ZERO
        });
    }

    let n = Decimal::from(period);
    let mut tr_s: Decimal = tr[..period].iter().sum();
    let mut plus_s: Decimal = plus_dm[..period].iter().sum();
    let mut minus_s: Decimal = minus_dm[..period].iter().sum();

    let mut dx_values = Vec::with_capacity(tr.len() - period + 1);
    dx_values.push(directional_index(plus_s, minus_s, tr_s));
    for i in period..tr.len() {
        tr_s = tr_s - div(tr_s, n) + tr[i];
        plus_s = plus_s - div(plus_s, n) + plus_dm[i];
        minus_s = minus_s - div(minus_s, n) + minus_dm[i];
        dx_values.push(directional_index(plus_s, minus_s, tr_s));
    }

    let seed: Decimal = dx_values[..period].iter().sum();
    let mut value = div(seed, n);
    let carry = Decimal::from(period - 1);
    let first = 2 * period - 1;
    out[first] = value;
    for (offset, dx) in dx_values[period..].iter().enumerate() {
        value = div(value * carry + dx, n);
        out[first + 1 + offset] = value;
    }
    out
}

fn directional_index(plus_dm: Decimal, minus_dm: Decimal, tr: Decimal) -> Decimal {
    let plus_di = div(Decimal::ONE_HUNDRED * plus_dm, tr);
    let minus_di = div(Decimal::ONE_HUNDRED * minus_dm, tr);
    div(
        Decimal::ONE_HUNDRED * (plus_di - minus_di).abs(),
        plus_di + minus_di,
    )
}
