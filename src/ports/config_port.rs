//! Configuration access port trait.

use rust_decimal::Decimal;
use std::str::FromStr;

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    /// `None` when absent, `Some(Err)` when the value is not an integer.
    fn get_int(&self, section: &str, key: &str) -> Option<Result<i64, String>>;
    fn get_bool(&self, section: &str, key: &str) -> Option<Result<bool, String>>;

    /// Decimal value, parsed from the raw string so no precision is lost.
    /// `None` when the key is absent, `Some(Err)` when it does not parse.
    fn get_decimal(&self, section: &str, key: &str) -> Option<Result<Decimal, String>> {
        self.get_string(section, key).map(|raw| {
            let trimmed = raw.trim();
            Decimal::from_str(trimmed).map_err(|e| format!("'{trimmed}' is not a decimal: {e}"))
        })
    }
}
