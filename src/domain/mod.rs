//! Core domain types and logic.

pub mod price_bar;
pub mod indicator;
pub mod indicator_helpers;
pub mod strategy;
pub mod ledger;
pub mod portfolio;
pub mod backtest;
pub mod metrics;
pub mod universe;
pub mod config_validation;
pub mod error;
