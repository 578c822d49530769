//! Transaction record: a single order as it affects inventory.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Decimal, InventoryMethod, OrderStatus, Side, Ticker};

/// A transaction is an order record in chronological order.
///
/// `seq` is the arrival sequence assigned by storage and breaks ties
/// between transactions sharing the same `executed_at` instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique order id.
    pub id: Uuid,
    /// Instrument ticker (canonical uppercase).
    pub ticker: Ticker,
    /// Buy or sell.
    pub side: Side,
    /// Executed quantity. Must be > 0.
    pub quantity: Decimal,
    /// Executed unit price. Must be > 0.
    pub price: Decimal,
    /// Lifecycle status.
    pub status: OrderStatus,
    /// Execution timestamp.
    pub executed_at: DateTime<Utc>,
    /// Arrival sequence, unique per store.
    pub seq: i64,
}

/// Rejection of a transaction that cannot participate in matching.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("transaction {id}: quantity must be positive, got {quantity}")]
    NonPositiveQuantity { id: Uuid, quantity: String },

    #[error("transaction {id}: price must be positive, got {price}")]
    NonPositivePrice { id: Uuid, price: String },

    #[error("transaction {id}: ticker must not be empty")]
    EmptyTicker { id: Uuid },

    #[error("unsupported inventory method: {0}")]
    UnsupportedMethod(String),
}

impl Transaction {
    /// Construct a transaction after validating its fields.
    ///
    /// # Errors
    /// Returns a `ValidationError` if quantity or price is not strictly
    /// positive or the ticker is empty.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: Uuid,
        ticker: Ticker,
        side: Side,
        quantity: Decimal,
        price: Decimal,
        status: OrderStatus,
        executed_at: DateTime<Utc>,
        seq: i64,
    ) -> Result<Self, ValidationError> {
        let tx = Transaction {
            id,
            ticker,
            side,
            quantity,
            price,
            status,
            executed_at,
            seq,
        };
        tx.validate()?;
        Ok(tx)
    }

    /// Check field invariants.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.ticker.is_empty() {
            return Err(ValidationError::EmptyTicker { id: self.id });
        }
        if !self.quantity.is_positive() {
            return Err(ValidationError::NonPositiveQuantity {
                id: self.id,
                quantity: self.quantity.to_canonical_string(),
            });
        }
        if !self.price.is_positive() {
            return Err(ValidationError::NonPositivePrice {
                id: self.id,
                price: self.price.to_canonical_string(),
            });
        }
        Ok(())
    }

    /// Signed quantity: positive for buys, negative for sells.
    pub fn signed_quantity(&self) -> Decimal {
        match self.side {
            Side::Buy => self.quantity,
            Side::Sell => -self.quantity,
        }
    }

    /// Gross value of the transaction (quantity x price).
    pub fn gross_value(&self) -> Decimal {
        self.quantity * self.price
    }

    /// Returns true if this transaction affects positions.
    pub fn is_position_affecting(&self) -> bool {
        self.status == OrderStatus::Filled
    }
}

/// Convenience check used when a method string arrives from the outside.
pub fn parse_method(raw: &str) -> Result<InventoryMethod, ValidationError> {
    raw.parse()
        .map_err(|_| ValidationError::UnsupportedMethod(raw.to_string()))
}
