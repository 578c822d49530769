use std::collections::VecDeque;

use crate::domain::{Decimal, InventoryMethod, Side, Transaction, ValidationError};

use super::{LotPortion, MatchOutcome};

/// Engine-local scratch record: one open slice of inventory.
#[derive(Debug, Clone)]
struct Lot {
    remaining_qty: Decimal,
    price: Decimal,
    tx_id: uuid::Uuid,
}

/// Match a single instrument's ordered transaction stream against open lots.
///
/// Callers must pass only Filled transactions for one instrument, sorted
/// ascending by (executed_at, seq). A Buy first extinguishes open short
/// lots, then opens a long lot with any residue; Sell is symmetric. FIFO
/// consumes the oldest open lot first, LIFO the newest. WEIGHTED_AVG uses
/// the FIFO closing convention; its distinguishing output is the collapsed
/// quantity-weighted mean over whatever remains open, not a running
/// moving-average.
///
/// # Errors
/// Returns `ValidationError` if any transaction carries a non-positive
/// quantity or price or an empty ticker.
pub fn match_transactions(
    transactions: &[Transaction],
    method: InventoryMethod,
) -> Result<MatchOutcome, ValidationError> {
    let mut long_lots: VecDeque<Lot> = VecDeque::new();
    let mut short_lots: VecDeque<Lot> = VecDeque::new();

    for tx in transactions {
        tx.validate()?;

        let (closing, opening) = match tx.side {
            Side::Buy => (&mut short_lots, &mut long_lots),
            Side::Sell => (&mut long_lots, &mut short_lots),
        };

        let mut remaining = tx.quantity;
        while remaining.is_positive() {
            let Some(lot) = (match method {
                InventoryMethod::Lifo => closing.back_mut(),
                InventoryMethod::Fifo | InventoryMethod::WeightedAvg => closing.front_mut(),
            }) else {
                break;
            };

            let take = if remaining < lot.remaining_qty {
                remaining
            } else {
                lot.remaining_qty
            };
            lot.remaining_qty = lot.remaining_qty - take;
            remaining = remaining - take;

            // Exhausted lots are dropped immediately, never kept at zero.
            if lot.remaining_qty.is_zero() {
                match method {
                    InventoryMethod::Lifo => closing.pop_back(),
                    InventoryMethod::Fifo | InventoryMethod::WeightedAvg => closing.pop_front(),
                };
            }
        }

        if remaining.is_positive() {
            opening.push_back(Lot {
                remaining_qty: remaining,
                price: tx.price,
                tx_id: tx.id,
            });
        }
    }

    Ok(derive_outcome(&long_lots, &short_lots))
}

/// Collapse the surviving lot books into the reported outcome.
fn derive_outcome(long_lots: &VecDeque<Lot>, short_lots: &VecDeque<Lot>) -> MatchOutcome {
    let long_qty = total_quantity(long_lots);
    let short_qty = total_quantity(short_lots);
    let net_remaining = long_qty - short_qty;

    let remaining: Vec<LotPortion> = if net_remaining.is_positive() {
        long_lots.iter().map(to_portion).collect()
    } else if net_remaining.is_negative() {
        short_lots.iter().map(to_portion).collect()
    } else {
        Vec::new()
    };

    let total_qty = remaining
        .iter()
        .fold(Decimal::zero(), |acc, lot| acc + lot.quantity);
    let weighted_sum = remaining
        .iter()
        .fold(Decimal::zero(), |acc, lot| acc + lot.quantity * lot.price);

    let average_cost = if total_qty.is_zero() {
        Decimal::zero()
    } else {
        weighted_sum / total_qty
    };

    let formula_trace = if total_qty.is_zero() {
        String::new()
    } else {
        let terms: Vec<String> = remaining
            .iter()
            .map(|lot| {
                format!(
                    "{} × {}",
                    lot.quantity.to_canonical_string(),
                    lot.price.to_canonical_string()
                )
            })
            .collect();
        format!(
            "{} = {} ÷ {} = {}",
            terms.join(" + "),
            weighted_sum.to_canonical_string(),
            total_qty.to_canonical_string(),
            average_cost.to_canonical_string()
        )
    };

    MatchOutcome {
        average_cost,
        open_lots: remaining,
        formula_trace,
        net_remaining,
    }
}

fn total_quantity(lots: &VecDeque<Lot>) -> Decimal {
    lots.iter()
        .fold(Decimal::zero(), |acc, lot| acc + lot.remaining_qty)
}

fn to_portion(lot: &Lot) -> LotPortion {
    LotPortion {
        tx_id: lot.tx_id,
        quantity: lot.remaining_qty,
        price: lot.price,
    }
}
