use std::collections::HashMap;

use crate::domain::{
    sort_transactions_chronological, Decimal, InventoryMethod, QuoteBoard, Ticker, Transaction,
    ValidationError,
};

use super::{lot_matcher::match_transactions, Breakdown, PortfolioSummary, Position};

/// Aggregate a transaction snapshot into marked positions.
///
/// Filters to Filled transactions, groups them by canonical ticker in
/// first-encounter order, sorts each group chronologically, runs the lot
/// matcher, and marks the survivors against the quote board. Instruments
/// that net to zero produce no position. Instruments without a quote are
/// emitted unpriced: `market_price` is None and the money figures are
/// zero, with a warning logged.
///
/// # Errors
/// Propagates `ValidationError` from the matcher on malformed input.
pub fn aggregate(
    transactions: &[Transaction],
    method: InventoryMethod,
    quotes: &QuoteBoard,
) -> Result<Vec<Position>, ValidationError> {
    let mut groups: Vec<(Ticker, Vec<Transaction>)> = Vec::new();
    let mut group_index: HashMap<Ticker, usize> = HashMap::new();

    for tx in transactions.iter().filter(|t| t.is_position_affecting()) {
        match group_index.get(&tx.ticker) {
            Some(&i) => groups[i].1.push(tx.clone()),
            None => {
                group_index.insert(tx.ticker.clone(), groups.len());
                groups.push((tx.ticker.clone(), vec![tx.clone()]));
            }
        }
    }

    let mut positions = Vec::with_capacity(groups.len());
    for (ticker, mut group) in groups {
        sort_transactions_chronological(&mut group);
        let outcome = match_transactions(&group, method)?;
        if outcome.net_remaining.is_zero() {
            continue;
        }

        let contributing_transactions = group.iter().map(|t| t.id).collect();
        let market_price = quotes.mid(&ticker);

        let (notional_value, mark_to_market_pnl, unrealized_pnl_percent) = match market_price {
            Some(mid) => {
                let notional = outcome.net_remaining * mid;
                let cost_basis = outcome.net_remaining.abs() * outcome.average_cost;
                let pnl = if outcome.net_remaining.is_positive() {
                    notional - cost_basis
                } else {
                    notional + cost_basis
                };
                let percent = if cost_basis.is_zero() {
                    Decimal::zero()
                } else {
                    pnl / cost_basis * Decimal::hundred()
                };
                (notional, pnl, percent)
            }
            None => {
                tracing::warn!(
                    ticker = %ticker,
                    "no quote for instrument, emitting unpriced position"
                );
                (Decimal::zero(), Decimal::zero(), Decimal::zero())
            }
        };

        positions.push(Position {
            ticker,
            net_quantity: outcome.net_remaining,
            average_cost: outcome.average_cost,
            market_price,
            notional_value,
            mark_to_market_pnl,
            unrealized_pnl_percent,
            contributing_transactions,
            breakdown: Breakdown {
                open_lots: outcome.open_lots,
                formula_trace: outcome.formula_trace,
            },
        });
    }

    Ok(positions)
}

/// Portfolio summary over one aggregation pass.
///
/// Money figures sum only priced positions; the position count includes
/// unpriced ones so they stay visible.
pub fn summarize(positions: &[Position]) -> PortfolioSummary {
    let mut total_mtm_pnl = Decimal::zero();
    let mut gross_notional = Decimal::zero();
    for position in positions.iter().filter(|p| p.is_priced()) {
        total_mtm_pnl = total_mtm_pnl + position.mark_to_market_pnl;
        gross_notional = gross_notional + position.notional_value.abs();
    }
    PortfolioSummary {
        total_mtm_pnl,
        open_positions: positions.len(),
        gross_notional,
    }
}
