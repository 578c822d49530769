//! Pure computation engines for deterministic position logic.

use crate::domain::{Decimal, Ticker};
use uuid::Uuid;

pub mod aggregator;
pub mod lot_matcher;

pub use aggregator::{aggregate, summarize};
pub use lot_matcher::match_transactions;

/// A slice of an open position attributable to one originating transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LotPortion {
    /// Originating transaction id.
    pub tx_id: Uuid,
    /// Quantity still open from that transaction.
    pub quantity: Decimal,
    /// Acquisition price of the slice.
    pub price: Decimal,
}

/// Result of matching one instrument's ordered transaction stream.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MatchOutcome {
    /// Quantity-weighted mean price of the remaining lots (0 when flat).
    pub average_cost: Decimal,
    /// Remaining open lots, in book order.
    pub open_lots: Vec<LotPortion>,
    /// Human-readable derivation of the average cost. Empty when flat.
    pub formula_trace: String,
    /// Net signed quantity: positive = long, negative = short.
    pub net_remaining: Decimal,
}

/// Audit artifact attached to each position for drill-down display.
#[derive(Debug, Clone, PartialEq)]
pub struct Breakdown {
    pub open_lots: Vec<LotPortion>,
    pub formula_trace: String,
}

/// A marked open position for one instrument.
///
/// `market_price` is None when the quote board has no entry for the
/// ticker; all money figures are zero in that case.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub ticker: Ticker,
    pub net_quantity: Decimal,
    pub average_cost: Decimal,
    pub market_price: Option<Decimal>,
    pub notional_value: Decimal,
    pub mark_to_market_pnl: Decimal,
    pub unrealized_pnl_percent: Decimal,
    /// Ids of the filled transactions that produced this position.
    pub contributing_transactions: Vec<Uuid>,
    pub breakdown: Breakdown,
}

impl Position {
    /// Returns true if a market price was resolved for this position.
    pub fn is_priced(&self) -> bool {
        self.market_price.is_some()
    }
}

/// Portfolio-level figures over one aggregation pass.
///
/// Money figures count only priced positions; `open_positions` counts all.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PortfolioSummary {
    pub total_mtm_pnl: Decimal,
    pub open_positions: usize,
    pub gross_notional: Decimal,
}
