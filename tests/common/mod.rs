#![allow(dead_code)]

use bandtrader::domain::error::BandtraderError;
pub use bandtrader::domain::price_bar::PriceBar;
use bandtrader::ports::data_port::DataPort;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

pub struct MockDataPort {
    pub data: BTreeMap<String, Vec<PriceBar>>,
    pub error: Option<String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: BTreeMap::new(),
            error: None,
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<PriceBar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, reason: &str) -> Self {
        self.error = Some(reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn load_histories(
        &self,
        symbols: Option<&[String]>,
    ) -> Result<BTreeMap<String, Vec<PriceBar>>, BandtraderError> {
        if let Some(reason) = &self.error {
            return Err(BandtraderError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self
            .data
            .iter()
            .filter(|(symbol, _)| symbols.is_none_or(|wanted| wanted.contains(*symbol)))
            .map(|(symbol, bars)| (symbol.clone(), bars.clone()))
            .collect())
    }

    fn list_symbols(&self) -> Result<Vec<String>, BandtraderError> {
        Ok(self.data.keys().cloned().collect())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_bar(symbol: &str, day: usize, close: Decimal) -> PriceBar {
    PriceBar {
        symbol: symbol.to_string(),
        date: date(2024, 1, 1) + chrono::Duration::days(day as i64),
        open: close,
        high: close + Decimal::ONE,
        low: close - Decimal::ONE,
        close,
        adj_close: close,
        volume: 1_000_000,
    }
}

pub fn make_bars(symbol: &str, closes: &[Decimal]) -> Vec<PriceBar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| make_bar(symbol, i, close))
        .collect()
}

/// Closes 100, 101, ... one per day.
pub fn rising_bars(symbol: &str, count: usize) -> Vec<PriceBar> {
    (0..count)
        .map(|i| make_bar(symbol, i, Decimal::from(100 + i)))
        .collect()
}

/// A repeating zig-zag that keeps the strategy trading.
pub fn choppy_bars(symbol: &str, count: usize, base: i64) -> Vec<PriceBar> {
    (0..count)
        .map(|i| make_bar(symbol, i, Decimal::from(base + ((i as i64 * 7) % 13))))
        .collect()
}

pub fn csv_content(histories: &[&[PriceBar]]) -> String {
    let mut out = String::from("symbol,date,open,high,low,close,adj_close,volume\n");
    for bars in histories {
        for b in *bars {
            out.push_str(&format!(
                "{},{},{},{},{},{},{},{}\n",
                b.symbol,
                b.date.format("%Y-%m-%d"),
                b.open,
                b.high,
                b.low,
                b.close,
                b.adj_close,
                b.volume
            ));
        }
    }
    out
}
