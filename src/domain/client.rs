use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{Account, AccountNumber, Transaction, TransactionError};

/// Position of a client in the bank's client collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(pub usize);

impl core::fmt::Display for ClientId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identity of a natural person. The tax id is unique across the bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Individual {
    pub name: String,
    pub birth_date: NaiveDate,
    pub tax_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientKind {
    Basic,
    Individual(Individual),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    id: ClientId,
    address: String,
    accounts: Vec<AccountNumber>,
    kind: ClientKind,
}

impl Client {
    pub fn new(id: ClientId, kind: ClientKind, address: impl Into<String>) -> Self {
        Self {
            id,
            address: address.into(),
            accounts: Vec::new(),
            kind,
        }
    }

    pub fn id(&self) -> ClientId {
        self.id
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Owned account numbers in creation order.
    pub fn accounts(&self) -> &[AccountNumber] {
        &self.accounts
    }

    pub fn kind(&self) -> &ClientKind {
        &self.kind
    }

    pub fn individual(&self) -> Option<&Individual> {
        match &self.kind {
            ClientKind::Individual(individual) => Some(individual),
            ClientKind::Basic => None,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.individual().map(|i| i.name.as_str())
    }

    pub fn tax_id(&self) -> Option<&str> {
        self.individual().map(|i| i.tax_id.as_str())
    }

    /// Tax id when known, otherwise the arena id.
    pub fn label(&self) -> String {
        match self.tax_id() {
            Some(tax_id) => tax_id.to_string(),
            None => self.id.to_string(),
        }
    }

    pub fn add_account(&mut self, number: AccountNumber) {
        self.accounts.push(number);
    }

    pub fn perform_transaction(
        &self,
        account: &mut Account,
        transaction: &Transaction,
    ) -> Result<(), TransactionError> {
        transaction.register(account)
    }
}

/// Accepts `dd-mm-yyyy` as well as ISO `yyyy-mm-dd`.
pub fn parse_birth_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%d-%m-%Y")
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .ok()
}
