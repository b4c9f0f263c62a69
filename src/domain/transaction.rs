use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::domain::{Account, Money, TransactionError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
}

impl core::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TransactionKind::Deposit => write!(f, "Deposit"),
            TransactionKind::Withdrawal => write!(f, "Withdrawal"),
        }
    }
}

/// An instruction to move a fixed amount in or out of a single account.
///
/// The amount is never checked here; a zero or negative value is refused by
/// the account when the transaction is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transaction {
    kind: TransactionKind,
    amount: Money,
}

impl Transaction {
    pub fn deposit(amount: Money) -> Self {
        Self {
            kind: TransactionKind::Deposit,
            amount,
        }
    }

    pub fn withdrawal(amount: Money) -> Self {
        Self {
            kind: TransactionKind::Withdrawal,
            amount,
        }
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    /// Applies the transaction to `account` and records it in the account's
    /// history when the account accepts it.
    ///
    /// A rejected transaction leaves both balance and history untouched.
    pub fn register(&self, account: &mut Account) -> Result<(), TransactionError> {
        match self.kind {
            TransactionKind::Deposit => account.deposit(self.amount)?,
            TransactionKind::Withdrawal => account.withdraw(self.amount)?,
        }

        account.history_mut().append(self, Utc::now());
        Ok(())
    }
}

impl core::fmt::Display for Transaction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{},amount={}", self.kind, self.amount)
    }
}
