use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Money, Transaction, TransactionKind};

/// One completed transaction as it was applied to an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub kind: TransactionKind,
    pub amount: Money,
    pub timestamp: DateTime<Utc>,
}

/// Append-only record of the transactions an account has accepted, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History {
    records: Vec<HistoryRecord>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[HistoryRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn count(&self, kind: TransactionKind) -> usize {
        self.records.iter().filter(|r| r.kind == kind).count()
    }

    // Only `Transaction::register` may call this, after the balance moved.
    pub(crate) fn append(&mut self, transaction: &Transaction, timestamp: DateTime<Utc>) {
        self.records.push(HistoryRecord {
            kind: transaction.kind(),
            amount: transaction.amount(),
            timestamp,
        });
    }
}
