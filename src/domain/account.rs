use serde::{Deserialize, Serialize};

use crate::domain::{ClientId, History, Money, TransactionError, TransactionKind};

/// Every account belongs to the same branch.
pub const AGENCY: &str = "0001";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountNumber(pub u32);

impl AccountNumber {
    pub fn first() -> Self {
        Self(1)
    }

    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl core::fmt::Display for AccountNumber {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Withdrawal rules layered on top of solvency for checking accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckingPolicy {
    pub limit: Money,
    pub max_withdrawals: u32,
}

impl CheckingPolicy {
    pub const DEFAULT_LIMIT: i64 = 500;
    pub const DEFAULT_MAX_WITHDRAWALS: u32 = 3;
}

impl Default for CheckingPolicy {
    fn default() -> Self {
        Self {
            limit: Money::from_units(Self::DEFAULT_LIMIT),
            max_withdrawals: Self::DEFAULT_MAX_WITHDRAWALS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AccountKind {
    Standard,
    Checking(CheckingPolicy),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    number: AccountNumber,
    owner: ClientId,
    kind: AccountKind,
    balance: Money, // never negative
    history: History,
}

impl Account {
    pub fn new(number: AccountNumber, owner: ClientId, kind: AccountKind) -> Self {
        Self {
            number,
            owner,
            kind,
            balance: Money::ZERO,
            history: History::new(),
        }
    }

    pub fn standard(number: AccountNumber, owner: ClientId) -> Self {
        Self::new(number, owner, AccountKind::Standard)
    }

    pub fn checking(number: AccountNumber, owner: ClientId) -> Self {
        Self::new(number, owner, AccountKind::Checking(CheckingPolicy::default()))
    }

    pub fn number(&self) -> AccountNumber {
        self.number
    }

    pub fn agency(&self) -> &'static str {
        AGENCY
    }

    pub fn balance(&self) -> Money {
        self.balance
    }

    pub fn owner(&self) -> ClientId {
        self.owner
    }

    pub fn kind(&self) -> AccountKind {
        self.kind
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Successful withdrawals so far, derived from the history.
    pub fn withdrawal_count(&self) -> usize {
        self.history.count(TransactionKind::Withdrawal)
    }

    pub(crate) fn history_mut(&mut self) -> &mut History {
        &mut self.history
    }

    pub(crate) fn deposit(&mut self, amount: Money) -> Result<(), TransactionError> {
        if !amount.is_positive() {
            return Err(TransactionError::InvalidAmount(amount));
        }

        self.balance = self.balance.checked_add(amount).ok_or(
            TransactionError::BalanceOverflow {
                requested: amount,
                balance: self.balance,
            },
        )?;
        Ok(())
    }

    pub(crate) fn withdraw(&mut self, amount: Money) -> Result<(), TransactionError> {
        match self.kind {
            AccountKind::Standard => self.withdraw_from_balance(amount),
            AccountKind::Checking(policy) => {
                if amount > self.balance {
                    return Err(self.insufficient_funds(amount));
                }
                if amount > policy.limit {
                    return Err(TransactionError::LimitExceeded {
                        requested: amount,
                        limit: policy.limit,
                    });
                }
                if self.withdrawal_count() >= policy.max_withdrawals as usize {
                    return Err(TransactionError::WithdrawalCountExceeded {
                        max: policy.max_withdrawals,
                    });
                }

                self.withdraw_from_balance(amount)
            }
        }
    }

    fn withdraw_from_balance(&mut self, amount: Money) -> Result<(), TransactionError> {
        if !amount.is_positive() {
            return Err(TransactionError::InvalidAmount(amount));
        }
        if amount > self.balance {
            return Err(self.insufficient_funds(amount));
        }

        self.balance = self
            .balance
            .checked_sub(amount)
            .ok_or_else(|| self.insufficient_funds(amount))?;
        Ok(())
    }

    fn insufficient_funds(&self, requested: Money) -> TransactionError {
        TransactionError::InsufficientFunds {
            requested,
            available: self.balance,
        }
    }
}
