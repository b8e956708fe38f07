//! Domain error types.

use chrono::NaiveDate;

/// Failure of the metrics stage. Terminal for the final report.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MetricsError {
    #[error("insufficient data: portfolio series has {points} points, need at least 2")]
    InsufficientData { points: usize },
}

/// Top-level error type for bandtrader.
#[derive(Debug, thiserror::Error)]
pub enum BandtraderError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("invalid price data for {symbol} on {date}: {reason}")]
    InvalidPriceData {
        symbol: String,
        date: NaiveDate,
        reason: String,
    },

    #[error("no valid instruments to backtest")]
    NoValidInstruments,

    #[error(transparent)]
    Metrics(#[from] MetricsError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&BandtraderError> for std::process::ExitCode {
    fn from(err: &BandtraderError) -> Self {
        let code: u8 = match err {
            BandtraderError::Io(_) => 1,
            BandtraderError::ConfigParse { .. }
            | BandtraderError::ConfigMissing { .. }
            | BandtraderError::ConfigInvalid { .. } => 2,
            BandtraderError::Data { .. } => 3,
            BandtraderError::InvalidPriceData { .. } | BandtraderError::NoValidInstruments => 5,
            BandtraderError::Metrics(_) => 6,
        };
        std::process::ExitCode::from(code)
    }
}
