//! Domain types and determinism layer for the position service.
//!
//! This module provides:
//! - Lossless numeric handling via Decimal wrapper
//! - Domain primitives: Ticker, Side, OrderStatus, InventoryMethod
//! - Transaction records with field validation
//! - Quote/QuoteBoard snapshot types for marking
//! - Stable transaction ordering for deterministic matching

pub mod decimal;
pub mod ordering;
pub mod primitives;
pub mod quote;
pub mod transaction;

pub use decimal::Decimal;
pub use ordering::{sort_transactions_chronological, TransactionOrderingKey};
pub use primitives::{InventoryMethod, OrderStatus, Side, Ticker};
pub use quote::{Quote, QuoteBoard};
pub use transaction::{parse_method, Transaction, ValidationError};
