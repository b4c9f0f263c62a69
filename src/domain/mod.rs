pub mod account;
pub mod client;
pub mod command;
pub mod error;
pub mod history;
pub mod money;
pub mod traits;
pub mod transaction;

pub use account::{AGENCY, Account, AccountKind, AccountNumber, CheckingPolicy};
pub use client::{Client, ClientId, ClientKind, Individual, parse_birth_date};
pub use command::Command;
pub use error::{Error, TransactionError};
pub use history::{History, HistoryRecord};
pub use money::Money;
pub use traits::{CommandStream, DeadLetterQueue, Store};
pub use transaction::{Transaction, TransactionKind};
