//! Instrument universe: symbol lists and admission checks.
//!
//! Histories are checked before capital is split. An instrument with a bad
//! bar or too few bars is skipped with a reason; the rest still run.

use crate::domain::error::BandtraderError;
use crate::domain::price_bar::PriceBar;
use std::collections::{BTreeMap, HashSet};
use std::fmt;

#[derive(Debug, Clone, thiserror::Error)]
pub enum UniverseError {
    #[error("empty token in symbol list")]
    EmptyToken,

    #[error("duplicate symbol: {0}")]
    DuplicateSymbol(String),
}

pub fn parse_symbols(input: &str) -> Result<Vec<String>, UniverseError> {
    let mut symbols = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(UniverseError::EmptyToken);
        }
        let symbol = trimmed.to_uppercase();
        if !seen.insert(symbol.clone()) {
            return Err(UniverseError::DuplicateSymbol(symbol));
        }
        symbols.push(symbol);
    }

    Ok(symbols)
}

#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    InvalidPriceData(String),
    InsufficientBars { bars: usize, minimum: usize },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::InvalidPriceData(reason) => write!(f, "{reason}"),
            SkipReason::InsufficientBars { bars, minimum } => {
                write!(f, "have {bars} bars, need at least {minimum}")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedInstrument {
    pub symbol: String,
    pub reason: SkipReason,
}

/// Fail on the first bar that cannot be traded on.
pub fn validate_history(symbol: &str, bars: &[PriceBar]) -> Result<(), BandtraderError> {
    for bar in bars {
        bar.check()
            .map_err(|reason| BandtraderError::InvalidPriceData {
                symbol: symbol.to_string(),
                date: bar.date,
                reason,
            })?;
    }
    Ok(())
}

/// Split histories into those admitted to the run and those skipped.
/// An instrument needs more than `lookback` bars to produce any value.
pub fn admit_instruments<'a>(
    histories: &'a BTreeMap<String, Vec<PriceBar>>,
    lookback: usize,
) -> (Vec<(&'a str, &'a [PriceBar])>, Vec<SkippedInstrument>) {
    let mut admitted = Vec::new();
    let mut skipped = Vec::new();

    for (symbol, bars) in histories {
        let minimum = lookback + 1;
        if bars.len() < minimum {
            skipped.push(SkippedInstrument {
                symbol: symbol.clone(),
                reason: SkipReason::InsufficientBars {
                    bars: bars.len(),
                    minimum,
                },
            });
            continue;
        }
        match validate_history(symbol, bars) {
            Ok(()) => admitted.push((symbol.as_str(), bars.as_slice())),
            Err(e) => skipped.push(SkippedInstrument {
                symbol: symbol.clone(),
                reason: SkipReason::InvalidPriceData(e.to_string()),
            }),
        }
    }

    (admitted, skipped)
}
