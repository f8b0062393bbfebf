//! Percentage change detector

use crate::source::Source;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::fmt;

/// Most recent price per (item, source) pair
///
/// Lives for the process lifetime and is never persisted.
#[derive(Debug, Default, Clone)]
pub struct LastSeenState {
    prices: HashMap<(String, Source), Decimal>,
}

impl LastSeenState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, item_id: &str, source: Source) -> Option<Decimal> {
        self.prices.get(&(item_id.to_string(), source)).copied()
    }

    /// Record `price`, returning the previous value
    fn replace(&mut self, item_id: &str, source: Source, price: Decimal) -> Option<Decimal> {
        self.prices.insert((item_id.to_string(), source), price)
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

/// A move that met the threshold
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotableChange {
    pub item_id: String,
    pub source: Source,
    pub previous: Decimal,
    pub current: Decimal,
    /// Signed percentage change, e.g. -2.0 for a 2% drop
    pub pct: Decimal,
}

impl fmt::Display for NotableChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.pct >= Decimal::ZERO { "+" } else { "" };
        write!(
            f,
            "[change] {}:{} {:.2} -> {:.2} ({}{:.2}%)",
            self.item_id, self.source, self.previous, self.current, sign, self.pct
        )
    }
}

/// Outcome of observing one price
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Observation {
    Ordinary,
    Notable(NotableChange),
}

impl Observation {
    pub fn is_notable(&self) -> bool {
        matches!(self, Observation::Notable(_))
    }
}

/// Classifies each observation against the immediately preceding one
pub struct ChangeDetector {
    /// Minimum absolute percentage move, e.g. 0.5 for 0.5%
    threshold_pct: Decimal,
    state: LastSeenState,
}

impl ChangeDetector {
    /// Create a detector with an empty baseline
    pub fn new(threshold_pct: Decimal) -> Self {
        Self::with_state(threshold_pct, LastSeenState::new())
    }

    /// Create a detector that continues from an existing baseline
    pub fn with_state(threshold_pct: Decimal, state: LastSeenState) -> Self {
        Self {
            threshold_pct,
            state,
        }
    }

    pub fn threshold_pct(&self) -> Decimal {
        self.threshold_pct
    }

    pub fn state(&self) -> &LastSeenState {
        &self.state
    }

    pub fn into_state(self) -> LastSeenState {
        self.state
    }

    /// Observe a price for a pair
    ///
    /// The first observation of a pair is always ordinary. The baseline
    /// moves to `price` regardless of the classification.
    pub fn observe(&mut self, item_id: &str, source: Source, price: Decimal) -> Observation {
        let Some(previous) = self.state.replace(item_id, source, price) else {
            return Observation::Ordinary;
        };
        if previous.is_zero() {
            return Observation::Ordinary;
        }

        let Some(pct) = price
            .checked_sub(previous)
            .and_then(|delta| delta.checked_div(previous))
            .and_then(|ratio| ratio.checked_mul(dec!(100)))
        else {
            tracing::warn!(
                item_id,
                source = %source,
                previous = %previous,
                current = %price,
                "Percentage change out of range, treating as ordinary"
            );
            return Observation::Ordinary;
        };

        if pct.abs() >= self.threshold_pct {
            Observation::Notable(NotableChange {
                item_id: item_id.to_string(),
                source,
                previous,
                current: price,
                pct,
            })
        } else {
            Observation::Ordinary
        }
    }
}
