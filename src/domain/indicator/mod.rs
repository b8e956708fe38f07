//! Technical indicator library.
//!
//! Every indicator is a pure function over an ordered price sequence (oldest
//! first) and a window length. With fewer observations than the window needs,
//! each returns its neutral value (zero, or an empty sequence for the Gaussian
//! filter) instead of failing, since the simulator calls them from the first
//! bar onward.
//!
//! [`IndicatorSnapshot`] bundles the values computed for one simulation step.
//! [`IndicatorSeries`] precomputes the recursive indicators (Gaussian filter,
//! TEMA, ADX) once per history; they are causal, so the value at bar `i` of
//! the full series equals the value over the prefix ending at `i`.

pub mod adx;
pub mod gaussian;
pub mod lsma;
pub mod rsi;
pub mod tema;
pub mod volatility;
pub mod zscore;

use rust_decimal::Decimal;

/// Window lengths shared by every indicator in a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorParams {
    pub lookback: usize,
    pub short_window: usize,
    pub poles: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            lookback: 14,
            short_window: 7,
            poles: 2,
        }
    }
}

/// Indicator values for the window ending at one bar.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSnapshot {
    pub volatility: Decimal,
    pub short_volatility: Decimal,
    pub rsi: Decimal,
    pub lsma: Decimal,
    pub gaussian: Decimal,
    pub adx: Decimal,
    pub zscore: Decimal,
    pub tema: Decimal,
    pub previous_tema: Decimal,
}

impl IndicatorSnapshot {
    /// Compute every indicator over parallel high/low/close windows.
    pub fn compute(
        highs: &[Decimal],
        lows: &[Decimal],
        closes: &[Decimal],
        params: &IndicatorParams,
    ) -> Self {
        let n = params.lookback;
        Self {
            volatility: volatility::volatility(closes, n),
            short_volatility: volatility::volatility(closes, params.short_window),
            rsi: rsi::rsi(closes, n),
            lsma: lsma::lsma(closes, n),
            gaussian: gaussian::latest_gaussian(closes, n, params.poles),
            adx: adx::adx(highs, lows, closes, n),
            zscore: zscore::zscore(closes, n),
            tema: tema::tema(closes, n),
            previous_tema: tema::previous_tema(closes, n),
        }
    }

    /// TEMA slope sign between the previous and current bar.
    pub fn tema_rising(&self) -> bool {
        self.tema > self.previous_tema
    }
}

/// Recursive indicators over a whole history, read back one bar at a time.
#[derive(Debug, Clone)]
pub struct IndicatorSeries {
    params: IndicatorParams,
    gaussian: Vec<Decimal>,
    tema: Vec<Decimal>,
    adx: Vec<Decimal>,
}

impl IndicatorSeries {
    pub fn compute(
        highs: &[Decimal],
        lows: &[Decimal],
        closes: &[Decimal],
        params: &IndicatorParams,
    ) -> Self {
        let n = params.lookback;
        Self {
            params: *params,
            gaussian: gaussian::gaussian_filter(closes, n, params.poles),
            tema: tema::tema_series(closes, n),
            adx: adx::adx_series(highs, lows, closes, n),
        }
    }

    /// Snapshot for the window `closes[..=i]`. `closes` must be the history
    /// the series was computed from.
    pub fn snapshot(&self, closes: &[Decimal], i: usize) -> IndicatorSnapshot {
        let n = self.params.lookback;
        let window = closes.get(..=i).unwrap_or(closes);
        let at = |values: &[Decimal], index: usize| values.get(index).copied().unwrap_or_default();

        // The filter of a prefix shorter than n is empty.
        let gaussian = if i + 1 >= n {
            at(&self.gaussian, i)
        } else {
            Decimal::ZERO
        };
        let previous_tema = match i.checked_sub(1) {
            Some(prev) => at(&self.tema, prev),
            None => Decimal::ZERO,
        };

        IndicatorSnapshot {
            volatility: volatility::volatility(window, n),
            short_volatility: volatility::volatility(window, self.params.short_window),
            rsi: rsi::rsi(window, n),
            lsma: lsma::lsma(window, n),
            gaussian,
            adx: at(&self.adx, i),
            zscore: zscore::zscore(window, n),
            tema: at(&self.tema, i),
            previous_tema,
        }
    }
}
