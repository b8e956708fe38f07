//! Day-indexed portfolio value series.
//!
//! Each instrument produces its own series; [`PortfolioValueSeries::sum`]
//! reduces them element-wise. Series may differ in length: the result is as
//! long as the longest input, and shorter series contribute nothing past
//! their end.

use rust_decimal::Decimal;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PortfolioValueSeries {
    values: Vec<Decimal>,
}

impl PortfolioValueSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_values(values: Vec<Decimal>) -> Self {
        Self { values }
    }

    pub fn push(&mut self, value: Decimal) {
        self.values.push(value);
    }

    pub fn values(&self) -> &[Decimal] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn first(&self) -> Option<Decimal> {
        self.values.first().copied()
    }

    pub fn last(&self) -> Option<Decimal> {
        self.values.last().copied()
    }

    /// Add `other` into this series index by index, extending as needed.
    pub fn accumulate(&mut self, other: &PortfolioValueSeries) {
        if other.len() > self.len() {
            self.values.resize(other.len(), Decimal::ZERO);
        }
        for (total, value) in self.values.iter_mut().zip(&other.values) {
            *total += value;
        }
    }

    pub fn sum<'a, I>(series: I) -> Self
    where
        I: IntoIterator<Item = &'a PortfolioValueSeries>,
    {
        series.into_iter().fold(Self::new(), |mut total, s| {
            total.accumulate(s);
            total
        })
    }
}
