//! Stable transaction ordering for deterministic matching.

use crate::domain::Transaction;
use chrono::{DateTime, Utc};

/// Stable ordering key for transactions.
///
/// Ordering: executed_at -> seq. `seq` is unique per store, so two
/// distinct transactions never compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TransactionOrderingKey {
    /// Execution timestamp (primary sort).
    pub executed_at: DateTime<Utc>,
    /// Arrival sequence (tie-break).
    pub seq: i64,
}

impl TransactionOrderingKey {
    /// Create an ordering key from a Transaction.
    pub fn from_transaction(tx: &Transaction) -> Self {
        TransactionOrderingKey {
            executed_at: tx.executed_at,
            seq: tx.seq,
        }
    }

    /// Returns true if `a` should be processed before `b`.
    pub fn should_come_before(a: &Transaction, b: &Transaction) -> bool {
        Self::from_transaction(a) < Self::from_transaction(b)
    }
}

/// Sort transactions chronologically with arrival-order tie-break.
pub fn sort_transactions_chronological(txs: &mut [Transaction]) {
    txs.sort_by_key(TransactionOrderingKey::from_transaction);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Decimal, OrderStatus, Side, Ticker};
    use chrono::TimeZone;
    use uuid::Uuid;

    fn make_tx(secs: u32, seq: i64) -> Transaction {
        Transaction::new(
            Uuid::new_v4(),
            Ticker::new("GOI2027"),
            Side::Buy,
            Decimal::from_str_canonical("100").unwrap(),
            Decimal::from_str_canonical("99.5").unwrap(),
            OrderStatus::Filled,
            Utc.with_ymd_and_hms(2025, 3, 10, 9, 30, secs).unwrap(),
            seq,
        )
        .unwrap()
    }

    #[test]
    fn test_ordering_by_time() {
        let a = make_tx(0, 5);
        let b = make_tx(1, 1);
        assert!(TransactionOrderingKey::should_come_before(&a, &b));
        assert!(!TransactionOrderingKey::should_come_before(&b, &a));
    }

    #[test]
    fn test_ordering_same_time_by_seq() {
        let a = make_tx(0, 1);
        let b = make_tx(0, 2);
        assert!(TransactionOrderingKey::should_come_before(&a, &b));
        assert!(!TransactionOrderingKey::should_come_before(&b, &a));
    }

    #[test]
    fn test_sort_transactions_chronological() {
        let mut txs = vec![make_tx(5, 3), make_tx(0, 2), make_tx(0, 1)];
        sort_transactions_chronological(&mut txs);
        assert_eq!(txs[0].seq, 1);
        assert_eq!(txs[1].seq, 2);
        assert_eq!(txs[2].seq, 3);
    }

    #[test]
    fn test_ordering_key_determinism() {
        let tx = make_tx(0, 42);
        let k1 = TransactionOrderingKey::from_transaction(&tx);
        let k2 = TransactionOrderingKey::from_transaction(&tx);
        assert_eq!(k1, k2);
    }
}
