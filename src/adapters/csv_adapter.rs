//! Consolidated CSV price file adapter.
//!
//! One file holds every instrument, one bar per row:
//! `symbol,date,open,high,low,close,adj_close,volume`. Column order is taken
//! from the header row.

use crate::domain::error::BandtraderError;
use crate::domain::price_bar::PriceBar;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

const COLUMNS: [&str; 8] = [
    "symbol",
    "date",
    "open",
    "high",
    "low",
    "close",
    "adj_close",
    "volume",
];

pub struct CsvAdapter {
    path: PathBuf,
}

impl CsvAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn read_bars(&self) -> Result<Vec<PriceBar>, BandtraderError> {
        let content = fs::read_to_string(&self.path).map_err(|e| BandtraderError::Data {
            reason: format!("failed to read {}: {}", self.path.display(), e),
        })?;

        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());

        let headers = rdr.headers().map_err(|e| BandtraderError::Data {
            reason: format!("CSV header error: {}", e),
        })?;
        let mut index = [0usize; COLUMNS.len()];
        for (slot, name) in index.iter_mut().zip(COLUMNS) {
            *slot = headers
                .iter()
                .position(|h| h.eq_ignore_ascii_case(name))
                .ok_or_else(|| BandtraderError::Data {
                    reason: format!("missing {} column", name),
                })?;
        }
        let [symbol_i, date_i, open_i, high_i, low_i, close_i, adj_i, volume_i] = index;

        let mut bars = Vec::new();
        for (row, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| BandtraderError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;
            // Header is line 1.
            let line = row + 2;
            let field = |i: usize, name: &str| {
                record.get(i).ok_or_else(|| BandtraderError::Data {
                    reason: format!("line {}: missing {} value", line, name),
                })
            };
            let decimal = |i: usize, name: &str| -> Result<Decimal, BandtraderError> {
                let raw = field(i, name)?;
                Decimal::from_str(raw).map_err(|e| BandtraderError::Data {
                    reason: format!("line {}: invalid {} value '{}': {}", line, name, raw, e),
                })
            };

            let symbol = field(symbol_i, "symbol")?.to_uppercase();
            let date_str = field(date_i, "date")?;
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
                BandtraderError::Data {
                    reason: format!("line {}: invalid date '{}': {}", line, date_str, e),
                }
            })?;
            let volume_str = field(volume_i, "volume")?;
            let volume: i64 = volume_str.parse().map_err(|e| BandtraderError::Data {
                reason: format!("line {}: invalid volume value '{}': {}", line, volume_str, e),
            })?;

            bars.push(PriceBar {
                symbol,
                date,
                open: decimal(open_i, "open")?,
                high: decimal(high_i, "high")?,
                low: decimal(low_i, "low")?,
                close: decimal(close_i, "close")?,
                adj_close: decimal(adj_i, "adj_close")?,
                volume,
            });
        }

        Ok(bars)
    }
}

impl DataPort for CsvAdapter {
    fn load_histories(
        &self,
        symbols: Option<&[String]>,
    ) -> Result<BTreeMap<String, Vec<PriceBar>>, BandtraderError> {
        let mut histories: BTreeMap<String, Vec<PriceBar>> = BTreeMap::new();

        for bar in self.read_bars()? {
            if let Some(wanted) = symbols {
                if !wanted.iter().any(|s| s == &bar.symbol) {
                    continue;
                }
            }
            histories.entry(bar.symbol.clone()).or_default().push(bar);
        }

        for bars in histories.values_mut() {
            bars.sort_by_key(|b| b.date);
        }
        Ok(histories)
    }

    fn list_symbols(&self) -> Result<Vec<String>, BandtraderError> {
        let symbols: BTreeSet<String> = self.read_bars()?.into_iter().map(|b| b.symbol).collect();
        Ok(symbols.into_iter().collect())
    }
}
