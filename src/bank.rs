use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::{
    Account, AccountKind, AccountNumber, Client, ClientId, ClientKind, Error, HistoryRecord, Money,
    Transaction,
};

/// Client directory and account allocator.
///
/// Clients and accounts live in flat collections and refer to each other by
/// id: a client's id is its position in `clients`, an account number `n`
/// lives at `accounts[n - 1]`.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BankSnapshot")]
pub struct Bank {
    clients: Vec<Client>,
    accounts: Vec<Account>,
    #[serde(skip)]
    by_tax_id: HashMap<String, ClientId>,
}

#[derive(Deserialize)]
struct BankSnapshot {
    clients: Vec<Client>,
    accounts: Vec<Account>,
}

impl TryFrom<BankSnapshot> for Bank {
    type Error = String;

    fn try_from(snapshot: BankSnapshot) -> Result<Self, Self::Error> {
        let BankSnapshot { clients, accounts } = snapshot;
        let mut by_tax_id = HashMap::new();

        for (idx, client) in clients.iter().enumerate() {
            if client.id() != ClientId(idx) {
                return Err(format!("client {} stored at position {}", client.id(), idx));
            }
            if let Some(tax_id) = client.tax_id() {
                if by_tax_id.insert(tax_id.to_string(), client.id()).is_some() {
                    return Err(format!("duplicate tax id {}", tax_id));
                }
            }
        }

        for (idx, account) in accounts.iter().enumerate() {
            if account.number().0 as usize != idx + 1 {
                return Err(format!(
                    "account {} stored at position {}",
                    account.number(),
                    idx
                ));
            }
            let Some(owner) = clients.get(account.owner().0) else {
                return Err(format!(
                    "account {} owned by unknown client {}",
                    account.number(),
                    account.owner()
                ));
            };
            if !owner.accounts().contains(&account.number()) {
                return Err(format!(
                    "account {} missing from client {}",
                    account.number(),
                    owner.id()
                ));
            }
            if account.balance() < Money::ZERO {
                return Err(format!(
                    "account {} has negative balance {}",
                    account.number(),
                    account.balance()
                ));
            }
            if let AccountKind::Checking(policy) = account.kind() {
                if policy.limit < Money::ZERO {
                    return Err(format!(
                        "account {} has negative withdrawal limit {}",
                        account.number(),
                        policy.limit
                    ));
                }
            }
        }

        for client in &clients {
            for number in client.accounts() {
                let owned = (number.0 as usize)
                    .checked_sub(1)
                    .and_then(|idx| accounts.get(idx))
                    .is_some_and(|account| account.owner() == client.id());
                if !owned {
                    return Err(format!(
                        "client {} lists account {} it does not own",
                        client.id(),
                        number
                    ));
                }
            }
        }

        Ok(Bank {
            clients,
            accounts,
            by_tax_id,
        })
    }
}

/// What a client's statement shows: the primary account's history and balance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub account: AccountNumber,
    pub agency: &'static str,
    pub holder: Option<String>,
    pub records: Vec<HistoryRecord>,
    pub balance: Money,
}

impl Bank {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clients(&self) -> &[Client] {
        &self.clients
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn client(&self, id: ClientId) -> Option<&Client> {
        self.clients.get(id.0)
    }

    pub fn account(&self, number: AccountNumber) -> Option<&Account> {
        let idx = (number.0 as usize).checked_sub(1)?;
        self.accounts.get(idx)
    }

    pub fn find_client(&self, tax_id: &str) -> Option<&Client> {
        self.by_tax_id.get(tax_id).and_then(|id| self.client(*id))
    }

    pub fn next_account_number(&self) -> AccountNumber {
        AccountNumber(self.accounts.len() as u32 + 1)
    }

    pub fn register_client(
        &mut self,
        kind: ClientKind,
        address: impl Into<String>,
    ) -> Result<ClientId, Error> {
        let id = ClientId(self.clients.len());

        if let ClientKind::Individual(individual) = &kind {
            if self.by_tax_id.contains_key(&individual.tax_id) {
                return Err(Error::DuplicateClient(individual.tax_id.clone()));
            }
            self.by_tax_id.insert(individual.tax_id.clone(), id);
        }

        self.clients.push(Client::new(id, kind, address));
        info!(client = %id, "client registered");
        Ok(id)
    }

    /// Opens a checking account with the default policy for the client.
    pub fn open_account(&mut self, tax_id: &str) -> Result<AccountNumber, Error> {
        let id = self.client_id(tax_id)?;
        self.open_account_for(id, Account::checking)
    }

    pub fn open_account_for<F>(&mut self, id: ClientId, build: F) -> Result<AccountNumber, Error>
    where
        F: FnOnce(AccountNumber, ClientId) -> Account,
    {
        let number = self.next_account_number();
        let client = self
            .clients
            .get_mut(id.0)
            .ok_or_else(|| Error::ClientNotFound(id.to_string()))?;

        self.accounts.push(build(number, id));
        client.add_account(number);
        info!(account = %number, client = %id, "account opened");
        Ok(number)
    }

    /// The client's first account, which every operation by tax id targets.
    pub fn primary_account(&self, tax_id: &str) -> Result<&Account, Error> {
        let id = self.client_id(tax_id)?;
        let number = self.primary_account_number(id)?;
        self.account(number).ok_or(Error::AccountNotFound(number))
    }

    pub fn deposit(&mut self, tax_id: &str, amount: Money) -> Result<AccountNumber, Error> {
        let id = self.client_id(tax_id)?;
        self.transact(id, Transaction::deposit(amount))
    }

    pub fn withdraw(&mut self, tax_id: &str, amount: Money) -> Result<AccountNumber, Error> {
        let id = self.client_id(tax_id)?;
        self.transact(id, Transaction::withdrawal(amount))
    }

    /// Has the client perform `transaction` against its primary account.
    pub fn transact(
        &mut self,
        id: ClientId,
        transaction: Transaction,
    ) -> Result<AccountNumber, Error> {
        let number = self.primary_account_number(id)?;
        let Bank {
            clients, accounts, ..
        } = self;

        let client = clients
            .get(id.0)
            .ok_or_else(|| Error::ClientNotFound(id.to_string()))?;
        let account = (number.0 as usize)
            .checked_sub(1)
            .and_then(|idx| accounts.get_mut(idx))
            .ok_or(Error::AccountNotFound(number))?;

        client.perform_transaction(account, &transaction)?;
        info!(account = %number, %transaction, balance = %account.balance(), "transaction registered");
        Ok(number)
    }

    pub fn statement(&self, tax_id: &str) -> Result<Statement, Error> {
        let account = self.primary_account(tax_id)?;
        let holder = self
            .client(account.owner())
            .and_then(|c| c.name())
            .map(str::to_string);

        Ok(Statement {
            account: account.number(),
            agency: account.agency(),
            holder,
            records: account.history().records().to_vec(),
            balance: account.balance(),
        })
    }

    fn client_id(&self, tax_id: &str) -> Result<ClientId, Error> {
        self.by_tax_id
            .get(tax_id)
            .copied()
            .ok_or_else(|| Error::ClientNotFound(tax_id.to_string()))
    }

    fn primary_account_number(&self, id: ClientId) -> Result<AccountNumber, Error> {
        let client = self
            .client(id)
            .ok_or_else(|| Error::ClientNotFound(id.to_string()))?;
        client
            .accounts()
            .first()
            .copied()
            .ok_or_else(|| Error::NoAccount(client.label()))
    }
}
