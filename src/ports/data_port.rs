//! Price history source port trait.

use crate::domain::error::BandtraderError;
use crate::domain::price_bar::PriceBar;
use std::collections::BTreeMap;

pub trait DataPort {
    /// Chronological history per symbol. `symbols` restricts the result;
    /// `None` loads everything the source holds.
    fn load_histories(
        &self,
        symbols: Option<&[String]>,
    ) -> Result<BTreeMap<String, Vec<PriceBar>>, BandtraderError>;

    fn list_symbols(&self) -> Result<Vec<String>, BandtraderError>;
}
