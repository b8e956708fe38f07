//! Daily price bar representation.

use chrono::NaiveDate;
use rust_decimal::Decimal;

#[derive(Debug, Clone, PartialEq)]
pub struct PriceBar {
    pub symbol: String,
    pub date: NaiveDate,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub adj_close: Decimal,
    pub volume: i64,
}

impl PriceBar {
    /// Price at which fills execute and holdings are marked.
    pub fn trade_price(&self) -> Decimal {
        self.adj_close
    }

    /// Shares the bar can absorb in one fill. Negative volume clamps to zero.
    pub fn available_volume(&self) -> u64 {
        u64::try_from(self.volume).unwrap_or(0)
    }

    /// Reject bars whose prices or volume would corrupt capital arithmetic.
    pub fn check(&self) -> Result<(), String> {
        let prices = [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
            ("adj_close", self.adj_close),
        ];
        for (name, value) in prices {
            if value <= Decimal::ZERO {
                return Err(format!("{name} must be positive, got {value}"));
            }
        }
        if self.volume < 0 {
            return Err(format!("volume must be non-negative, got {}", self.volume));
        }
        Ok(())
    }
}
