use crate::domain::{AccountNumber, Money};

/// Expected, recoverable reasons an account refuses a transaction.
///
/// None of these leave a trace on the account: balance and history are
/// untouched when one is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransactionError {
    #[error("Invalid amount {0}: must be greater than zero")]
    InvalidAmount(Money),

    #[error("Insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds { requested: Money, available: Money },

    #[error("Withdrawal of {requested} exceeds the per-withdrawal limit of {limit}")]
    LimitExceeded { requested: Money, limit: Money },

    #[error("Deposit of {requested} would overflow the balance of {balance}")]
    BalanceOverflow { requested: Money, balance: Money },

    #[error("Maximum number of withdrawals ({max}) already reached")]
    WithdrawalCountExceeded { max: u32 },
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    IO(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Ingestion failed with: {0}")]
    Ingestion(String),

    #[error("Persistence failed with: {0}")]
    Persistence(String),

    #[error("Report failed with: {0}")]
    Report(String),

    #[error("Client with tax id {0} not found")]
    ClientNotFound(String),

    #[error("Client with tax id {0} already exists")]
    DuplicateClient(String),

    #[error("Account {0} not found")]
    AccountNotFound(AccountNumber),

    #[error("Client with tax id {0} has no account")]
    NoAccount(String),

    #[error("Transaction rejected: {0}")]
    Rejected(#[from] TransactionError),
}
