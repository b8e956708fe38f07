//! Per-instrument capital and share holdings.

use rust_decimal::prelude::*;

use super::indicator_helpers::div;

/// Cash and whole shares owned by one instrument's slice of capital.
///
/// Shares are unsigned: a short entry sells from existing holdings and can
/// never take the balance below zero. Every fill moves value between cash and
/// shares at the fill price, so `capital + shares * price` is unchanged by it.
#[derive(Debug, Clone, PartialEq)]
pub struct CapitalLedger {
    available_capital: Decimal,
    shares_held: u64,
}

impl CapitalLedger {
    pub fn new(capital: Decimal) -> Self {
        Self {
            available_capital: capital,
            shares_held: 0,
        }
    }

    pub fn available_capital(&self) -> Decimal {
        self.available_capital
    }

    pub fn shares_held(&self) -> u64 {
        self.shares_held
    }

    /// Cash plus holdings marked at `price`.
    pub fn market_value(&self, price: Decimal) -> Decimal {
        self.available_capital + price * Decimal::from(self.shares_held)
    }

    /// Whole shares `available_capital` can pay for at `price`.
    pub fn affordable_shares(&self, price: Decimal) -> u64 {
        if price <= Decimal::ZERO || self.available_capital <= Decimal::ZERO {
            return 0;
        }
        let mut quantity = div(self.available_capital, price)
            .floor()
            .to_u64()
            .unwrap_or(0);
        // the rounded quotient can land one share above what cash covers
        while quantity > 0 && price * Decimal::from(quantity) > self.available_capital {
            quantity -= 1;
        }
        quantity
    }

    /// Buy up to `max_volume` shares with available cash. Returns shares bought.
    pub fn buy(&mut self, price: Decimal, max_volume: u64) -> u64 {
        let quantity = self.affordable_shares(price).min(max_volume);
        if quantity > 0 {
            self.available_capital -= price * Decimal::from(quantity);
            self.shares_held += quantity;
        }
        quantity
    }

    /// Sell up to `max_volume` of the shares held. Returns shares sold.
    pub fn sell(&mut self, price: Decimal, max_volume: u64) -> u64 {
        let quantity = self.shares_held.min(max_volume);
        if quantity > 0 {
            self.available_capital += price * Decimal::from(quantity);
            self.shares_held -= quantity;
        }
        quantity
    }

    /// Liquidate the whole holding. Returns shares sold.
    pub fn sell_all(&mut self, price: Decimal) -> u64 {
        self.sell(price, self.shares_held)
    }
}
