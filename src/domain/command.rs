use chrono::NaiveDate;

use crate::domain::Money;

/// A request issued against the bank by the front end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    NewClient {
        tax_id: String,
        name: String,
        birth_date: NaiveDate,
        address: String,
    },
    NewAccount {
        tax_id: String,
    },
    Deposit {
        tax_id: String,
        amount: Money,
    },
    Withdraw {
        tax_id: String,
        amount: Money,
    },
    /// History and balance of the client's first account.
    Statement {
        tax_id: String,
    },
    ListClients,
}

impl core::fmt::Display for Command {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Command::NewClient { tax_id, name, .. } => {
                write!(f, "new_client,tax_id={},name={}", tax_id, name)
            }
            Command::NewAccount { tax_id } => write!(f, "new_account,tax_id={}", tax_id),
            Command::Deposit { tax_id, amount } => {
                write!(f, "deposit,tax_id={},amount={}", tax_id, amount)
            }
            Command::Withdraw { tax_id, amount } => {
                write!(f, "withdraw,tax_id={},amount={}", tax_id, amount)
            }
            Command::Statement { tax_id } => write!(f, "statement,tax_id={}", tax_id),
            Command::ListClients => write!(f, "list_clients"),
        }
    }
}
