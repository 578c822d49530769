//! Repository layer for the order store.

use crate::domain::{Decimal, OrderStatus, Side, Ticker, Transaction};
use chrono::DateTime;
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;
use std::str::FromStr;
use tracing::warn;
use uuid::Uuid;

/// Outcome of a conditional order mutation (cancel/amend).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderUpdate {
    /// The order was pending and has been updated.
    Updated,
    /// No order with that id exists.
    NotFound,
    /// The order exists but is no longer pending.
    NotPending,
}

/// Counts of orders by lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusCounts {
    pub pending: i64,
    pub filled: i64,
    pub cancelled: i64,
}

/// Repository for order-store operations.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Repository { pool }
    }

    /// Insert an order idempotently.
    ///
    /// Returns true if a new row was written, false when the id already
    /// existed. The stored `seq` is SQLite's rowid, so arrival order is
    /// assigned by the store, not the caller.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub async fn insert_order(&self, tx: &Transaction) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO orders (id, ticker, side, quantity, price, status, executed_at_ms)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO NOTHING
            "#,
        )
        .bind(tx.id.to_string())
        .bind(tx.ticker.as_str())
        .bind(tx.side.to_string())
        .bind(tx.quantity.to_canonical_string())
        .bind(tx.price.to_canonical_string())
        .bind(tx.status.to_string())
        .bind(tx.executed_at.timestamp_millis())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// List orders, optionally filtered by status and/or ticker, ordered
    /// by (executed_at, arrival sequence).
    ///
    /// Rows that fail to parse are skipped with a warning rather than
    /// failing the whole listing.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn list_orders(
        &self,
        status: Option<OrderStatus>,
        ticker: Option<&Ticker>,
    ) -> Result<Vec<Transaction>, sqlx::Error> {
        let mut sql = String::from(
            "SELECT id, ticker, side, quantity, price, status, executed_at_ms, rowid AS seq \
             FROM orders",
        );
        let mut clauses: Vec<&str> = Vec::new();
        if status.is_some() {
            clauses.push("status = ?");
        }
        if ticker.is_some() {
            clauses.push("ticker = ?");
        }
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY executed_at_ms ASC, rowid ASC");

        let mut query = sqlx::query(&sql);
        if let Some(status) = status {
            query = query.bind(status.to_string());
        }
        if let Some(ticker) = ticker {
            query = query.bind(ticker.as_str().to_string());
        }

        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows.iter().filter_map(row_to_transaction).collect())
    }

    /// Fetch a single order by id.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn get_order(&self, id: &Uuid) -> Result<Option<Transaction>, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT id, ticker, side, quantity, price, status, executed_at_ms, rowid AS seq
            FROM orders
            WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().and_then(row_to_transaction))
    }

    /// Cancel a pending order. Filled and cancelled orders are immutable.
    ///
    /// # Errors
    /// Returns an error if the update fails.
    pub async fn cancel_order(&self, id: &Uuid) -> Result<OrderUpdate, sqlx::Error> {
        let result = sqlx::query("UPDATE orders SET status = ? WHERE id = ? AND status = ?")
            .bind(OrderStatus::Cancelled.to_string())
            .bind(id.to_string())
            .bind(OrderStatus::Pending.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() > 0 {
            return Ok(OrderUpdate::Updated);
        }
        match self.get_order(id).await? {
            None => Ok(OrderUpdate::NotFound),
            Some(_) => Ok(OrderUpdate::NotPending),
        }
    }

    /// Amend a pending order's quantity and price.
    ///
    /// # Errors
    /// Returns an error if the update fails.
    pub async fn amend_order(
        &self,
        id: &Uuid,
        quantity: Decimal,
        price: Decimal,
    ) -> Result<OrderUpdate, sqlx::Error> {
        let result =
            sqlx::query("UPDATE orders SET quantity = ?, price = ? WHERE id = ? AND status = ?")
                .bind(quantity.to_canonical_string())
                .bind(price.to_canonical_string())
                .bind(id.to_string())
                .bind(OrderStatus::Pending.to_string())
                .execute(&self.pool)
                .await?;

        if result.rows_affected() > 0 {
            return Ok(OrderUpdate::Updated);
        }
        match self.get_order(id).await? {
            None => Ok(OrderUpdate::NotFound),
            Some(_) => Ok(OrderUpdate::NotPending),
        }
    }

    /// Count orders grouped by status.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn count_by_status(&self) -> Result<StatusCounts, sqlx::Error> {
        let rows = sqlx::query("SELECT status, COUNT(*) AS n FROM orders GROUP BY status")
            .fetch_all(&self.pool)
            .await?;

        let mut counts = StatusCounts::default();
        for row in &rows {
            let status_str: String = row.get("status");
            let n: i64 = row.get("n");
            match OrderStatus::from_str(&status_str) {
                Ok(OrderStatus::Pending) => counts.pending = n,
                Ok(OrderStatus::Filled) => counts.filled = n,
                Ok(OrderStatus::Cancelled) => counts.cancelled = n,
                Err(e) => warn!(status = %status_str, error = %e, "Unknown status in store"),
            }
        }
        Ok(counts)
    }

    /// Distinct canonical tickers present in the store.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn distinct_tickers(&self) -> Result<Vec<Ticker>, sqlx::Error> {
        let rows = sqlx::query("SELECT DISTINCT ticker FROM orders ORDER BY ticker ASC")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .iter()
            .map(|row| {
                let ticker: String = row.get("ticker");
                Ticker::new(&ticker)
            })
            .collect())
    }
}

fn row_to_transaction(row: &SqliteRow) -> Option<Transaction> {
    let id_str: String = row.get("id");
    let ticker: String = row.get("ticker");
    let side_str: String = row.get("side");
    let quantity_str: String = row.get("quantity");
    let price_str: String = row.get("price");
    let status_str: String = row.get("status");
    let executed_at_ms: i64 = row.get("executed_at_ms");
    let seq: i64 = row.get("seq");

    let id = match Uuid::parse_str(&id_str) {
        Ok(id) => id,
        Err(e) => {
            warn!(id = %id_str, error = %e, "Failed to parse order id, skipping row");
            return None;
        }
    };
    let side = match Side::from_str(&side_str) {
        Ok(side) => side,
        Err(e) => {
            warn!(id = %id_str, error = %e, "Failed to parse order side, skipping row");
            return None;
        }
    };
    let status = match OrderStatus::from_str(&status_str) {
        Ok(status) => status,
        Err(e) => {
            warn!(id = %id_str, error = %e, "Failed to parse order status, skipping row");
            return None;
        }
    };
    let quantity = match Decimal::from_str(&quantity_str) {
        Ok(quantity) => quantity,
        Err(e) => {
            warn!(id = %id_str, error = %e, "Failed to parse order quantity, skipping row");
            return None;
        }
    };
    let price = match Decimal::from_str(&price_str) {
        Ok(price) => price,
        Err(e) => {
            warn!(id = %id_str, error = %e, "Failed to parse order price, skipping row");
            return None;
        }
    };
    let executed_at = match DateTime::from_timestamp_millis(executed_at_ms) {
        Some(ts) => ts,
        None => {
            warn!(id = %id_str, executed_at_ms, "Out-of-range timestamp, skipping row");
            return None;
        }
    };

    Some(Transaction {
        id,
        ticker: Ticker::new(&ticker),
        side,
        quantity,
        price,
        status,
        executed_at,
        seq,
    })
}
