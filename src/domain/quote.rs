//! Quote types: per-instrument bid/ask and the board snapshot used for marking.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::{Decimal, Ticker};

/// A two-sided quote for one instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Instrument ticker (canonical uppercase).
    pub ticker: Ticker,
    /// Best bid.
    pub bid: Decimal,
    /// Best ask.
    pub ask: Decimal,
}

impl Quote {
    /// Create a Quote.
    pub fn new(ticker: Ticker, bid: Decimal, ask: Decimal) -> Self {
        Quote { ticker, bid, ask }
    }

    /// Mid price: (bid + ask) / 2.
    pub fn mid(&self) -> Decimal {
        let two = Decimal::new(rust_decimal::Decimal::TWO);
        (self.bid + self.ask) / two
    }
}

/// Immutable snapshot of the quote feed keyed by canonical ticker.
///
/// Positions are marked against one board so every instrument in a
/// single aggregation pass sees prices from the same instant.
#[derive(Debug, Clone, Default)]
pub struct QuoteBoard {
    quotes: HashMap<Ticker, Quote>,
}

impl QuoteBoard {
    /// Build a board from a list of quotes. Later duplicates win.
    pub fn from_quotes(quotes: Vec<Quote>) -> Self {
        let mut map = HashMap::with_capacity(quotes.len());
        for quote in quotes {
            map.insert(quote.ticker.clone(), quote);
        }
        QuoteBoard { quotes: map }
    }

    /// Look up the full quote for a ticker.
    pub fn get(&self, ticker: &Ticker) -> Option<&Quote> {
        self.quotes.get(ticker)
    }

    /// Mid price for a ticker, if quoted.
    pub fn mid(&self, ticker: &Ticker) -> Option<Decimal> {
        self.quotes.get(ticker).map(Quote::mid)
    }

    /// Number of quoted instruments.
    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    /// Returns true if the board holds no quotes.
    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }
}
