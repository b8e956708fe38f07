//! Per-instrument position state machine.
//!
//! `Flat` only evaluates entries; `Long` and `Short` only evaluate exits.
//! Entry compares LSMA against the latest Gaussian filter value; the long
//! check runs first, so it wins any tie-break. Exit fires when the close
//! leaves a symmetric band around the entry price, whichever side is held.

use rust_decimal::Decimal;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Position {
    #[default]
    Flat,
    Long,
    Short,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Position::Flat => write!(f, "flat"),
            Position::Long => write!(f, "long"),
            Position::Short => write!(f, "short"),
        }
    }
}

/// A state transition produced by one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    EnterLong,
    EnterShort,
    ExitLong,
    ExitShort,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::EnterLong => write!(f, "long entry"),
            Signal::EnterShort => write!(f, "short entry"),
            Signal::ExitLong => write!(f, "long exit"),
            Signal::ExitShort => write!(f, "short exit"),
        }
    }
}

/// Exit band as fractions of the entry price: [1 - width, 1 + width].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExitBand {
    width: Decimal,
}

impl ExitBand {
    pub fn new(width: Decimal) -> Self {
        Self { width }
    }

    pub fn width(&self) -> Decimal {
        self.width
    }

    /// True when `close` is at or beyond either edge of the band.
    pub fn breached(&self, entry_price: Decimal, close: Decimal) -> bool {
        let upper = entry_price * (Decimal::ONE + self.width);
        let lower = entry_price * (Decimal::ONE - self.width);
        close >= upper || close <= lower
    }
}

impl Default for ExitBand {
    fn default() -> Self {
        Self::new(Decimal::new(3, 2))
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PositionState {
    entry_price: Decimal,
    trailing_price: Decimal,
    position: Position,
}

impl PositionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn entry_price(&self) -> Decimal {
        self.entry_price
    }

    pub fn trailing_price(&self) -> Decimal {
        self.trailing_price
    }

    pub fn is_flat(&self) -> bool {
        self.position == Position::Flat
    }

    /// Entry from `Flat`: LSMA above the filter goes long, filter above LSMA
    /// goes short, equality stays flat. No-op in any other state.
    pub fn evaluate_entry(&mut self, close: Decimal, filter: Decimal, lsma: Decimal) -> Option<Signal> {
        if !self.is_flat() {
            return None;
        }
        if lsma > filter {
            self.enter(Position::Long, close);
            return Some(Signal::EnterLong);
        }
        if filter > lsma {
            self.enter(Position::Short, close);
            return Some(Signal::EnterShort);
        }
        None
    }

    /// Exit from `Long` or `Short` when the close breaches the band.
    /// Entry and trailing prices are kept after the exit.
    pub fn evaluate_exit(&mut self, close: Decimal, band: &ExitBand) -> Option<Signal> {
        let signal = match self.position {
            Position::Flat => return None,
            Position::Long => Signal::ExitLong,
            Position::Short => Signal::ExitShort,
        };
        if band.breached(self.entry_price, close) {
            self.position = Position::Flat;
            Some(signal)
        } else {
            None
        }
    }

    /// One bar: entry when flat, exit otherwise. At most one transition.
    pub fn step(
        &mut self,
        close: Decimal,
        filter: Decimal,
        lsma: Decimal,
        band: &ExitBand,
    ) -> Option<Signal> {
        if self.is_flat() {
            self.evaluate_entry(close, filter, lsma)
        } else {
            self.evaluate_exit(close, band)
        }
    }

    fn enter(&mut self, position: Position, close: Decimal) {
        self.entry_price = close;
        self.trailing_price = close;
        self.position = position;
    }
}
