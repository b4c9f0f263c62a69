use std::io::Write;

use futures::StreamExt;
use serde::Serialize;
use tracing::{info, warn};

use crate::bank::{Bank, Statement};
use crate::domain::{
    ClientKind, Command, Error, Individual, Money, TransactionKind,
    traits::{CommandStream, DeadLetterQueue, Store},
};

/// One line of the account listing written by [`Engine::flush`].
#[derive(Debug, Serialize)]
struct AccountRow<'a> {
    account: u32,
    agency: &'a str,
    holder: &'a str,
    balance: Money,
    transactions: usize,
}

/// One statement line; the closing line carries the balance and no timestamp.
#[derive(Debug, Serialize)]
struct StatementRow {
    account: u32,
    entry: &'static str,
    amount: Money,
    timestamp: String,
}

#[derive(Debug, Serialize)]
struct ClientRow<'a> {
    tax_id: &'a str,
    name: &'a str,
    birth_date: String,
    address: &'a str,
    accounts: String,
}

/// Whether a command changed the bank and needs saving.
enum Outcome {
    Mutated,
    Queried,
}

#[derive(Debug)]
pub struct Engine<I, S, D>
where
    I: CommandStream,
    S: Store,
    D: DeadLetterQueue,
{
    ingestion: I,
    store: S,
    dlq: D,
    bank: Bank,
    reports: Vec<u8>, // rendered query output, written after the listing
}

impl<I, S, D> Engine<I, S, D>
where
    I: CommandStream,
    S: Store,
    D: DeadLetterQueue,
{
    pub fn new(ingestion: I, store: S, dlq: D) -> Result<Self, Error> {
        let bank = store.load()?;
        info!(
            clients = bank.clients().len(),
            accounts = bank.accounts().len(),
            "engine ready"
        );

        Ok(Self {
            ingestion,
            store,
            dlq,
            bank,
            reports: Vec::new(),
        })
    }

    pub fn bank(&self) -> &Bank {
        &self.bank
    }

    /// Applies every command from the stream. Rejected commands go to the
    /// dead letter queue; the bank is saved after each accepted mutation.
    pub async fn process(&mut self) -> Result<(), Error> {
        let mut res = self.ingestion.stream();

        while let Some(cmd) = res.next().await {
            match cmd {
                Ok(cmd) => match self.apply_command(&cmd) {
                    Ok(Outcome::Mutated) => self.store.save(&self.bank)?,
                    Ok(Outcome::Queried) => {}
                    Err(e) => {
                        warn!(command = %cmd, error = %e, "command rejected");
                        self.dlq.report(&e);
                    }
                },
                Err(e) => self.dlq.report(&e),
            }
        }

        Ok(())
    }

    fn apply_command(&mut self, cmd: &Command) -> Result<Outcome, Error> {
        match cmd {
            Command::NewClient {
                tax_id,
                name,
                birth_date,
                address,
            } => {
                let kind = ClientKind::Individual(Individual {
                    name: name.clone(),
                    birth_date: *birth_date,
                    tax_id: tax_id.clone(),
                });
                self.bank.register_client(kind, address.clone())?;
            }
            Command::NewAccount { tax_id } => {
                self.bank.open_account(tax_id)?;
            }
            Command::Deposit { tax_id, amount } => {
                self.bank.deposit(tax_id, *amount)?;
            }
            Command::Withdraw { tax_id, amount } => {
                self.bank.withdraw(tax_id, *amount)?;
            }
            Command::Statement { tax_id } => {
                let statement = self.bank.statement(tax_id)?;
                self.render_statement(&statement)?;
                return Ok(Outcome::Queried);
            }
            Command::ListClients => {
                self.render_clients()?;
                return Ok(Outcome::Queried);
            }
        }

        Ok(Outcome::Mutated)
    }

    fn render_statement(&mut self, statement: &Statement) -> Result<(), Error> {
        self.reports.push(b'\n');
        let mut wtr = csv::Writer::from_writer(&mut self.reports);
        let account = statement.account.0;

        for record in &statement.records {
            let entry = match record.kind {
                TransactionKind::Deposit => "deposit",
                TransactionKind::Withdrawal => "withdrawal",
            };
            wtr.serialize(StatementRow {
                account,
                entry,
                amount: record.amount,
                timestamp: record.timestamp.format("%d-%m-%Y %H:%M:%S").to_string(),
            })
            .map_err(report_error)?;
        }
        wtr.serialize(StatementRow {
            account,
            entry: "balance",
            amount: statement.balance,
            timestamp: String::new(),
        })
        .map_err(report_error)?;

        wtr.flush()?;
        Ok(())
    }

    fn render_clients(&mut self) -> Result<(), Error> {
        self.reports.push(b'\n');
        let mut wtr = csv::Writer::from_writer(&mut self.reports);

        for client in self.bank.clients() {
            let Some(individual) = client.individual() else {
                continue;
            };
            let accounts = client
                .accounts()
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" ");

            wtr.serialize(ClientRow {
                tax_id: &individual.tax_id,
                name: &individual.name,
                birth_date: individual.birth_date.format("%d-%m-%Y").to_string(),
                address: client.address(),
                accounts,
            })
            .map_err(report_error)?;
        }

        wtr.flush()?;
        Ok(())
    }

    /// Writes the account listing as CSV, ordered by account number,
    /// followed by the output of any statement and client-list commands.
    pub fn flush<W: Write>(&self, mut out: W) -> Result<(), Error> {
        let mut wtr = csv::Writer::from_writer(&mut out);

        for account in self.bank.accounts() {
            let holder = self
                .bank
                .client(account.owner())
                .and_then(|c| c.name())
                .unwrap_or("-");

            wtr.serialize(AccountRow {
                account: account.number().0,
                agency: account.agency(),
                holder,
                balance: account.balance(),
                transactions: account.history().len(),
            })
            .map_err(report_error)?;
        }

        wtr.flush()?;
        drop(wtr);

        out.write_all(&self.reports)?;
        out.flush()?;
        Ok(())
    }
}

fn report_error(e: csv::Error) -> Error {
    Error::Report(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dlq::MemoryDLQ;
    use crate::domain::AccountNumber;
    use crate::ingestion::CsvReader;
    use crate::store::MemoryStore;

    const HEADER: &str = "command,tax_id,name,birth_date,address,amount\n";

    fn engine(body: &str, store: MemoryStore) -> Engine<CsvReader<std::io::Cursor<Vec<u8>>>, MemoryStore, MemoryDLQ> {
        let input = format!("{}{}", HEADER, body).into_bytes();
        let reader = CsvReader::new(std::io::Cursor::new(input)).unwrap();
        Engine::new(reader, store, MemoryDLQ::default()).unwrap()
    }

    #[tokio::test]
    async fn checking_account_session() {
        let mut engine = engine(
            "new_client,123,Maria Silva,17-05-1990,Rua A,\n\
             new_account,123,,,,\n\
             deposit,123,,,,1000\n\
             withdraw,123,,,,200\n\
             withdraw,123,,,,200\n\
             withdraw,123,,,,200\n\
             withdraw,123,,,,100\n\
             withdraw,123,,,,600\n\
             deposit,123,,,,-10\n",
            MemoryStore::new(),
        );

        engine.process().await.unwrap();

        let account = engine.bank().account(AccountNumber(1)).unwrap();
        assert_eq!(account.balance(), Money::from_units(400));
        assert_eq!(account.history().len(), 4);

        let reports = engine.dlq.reports();
        assert_eq!(reports.len(), 3);
        assert!(reports[0].contains("Maximum number of withdrawals"));
        assert!(reports[1].contains("Insufficient funds"));
        assert!(reports[2].contains("Invalid amount"));

        let saved = engine.store.snapshot().unwrap();
        assert_eq!(&saved, engine.bank());
    }

    #[tokio::test]
    async fn directory_errors_are_reported_not_fatal() {
        let mut engine = engine(
            "deposit,999,,,,10\n\
             new_client,1,Ana,01-01-1980,Rua,\n\
             new_client,1,Ana Again,01-01-1980,Rua,\n\
             deposit,1,,,,10\n\
             bogus,1,,,,\n\
             new_account,1,,,,\n",
            MemoryStore::new(),
        );

        engine.process().await.unwrap();

        let reports = engine.dlq.reports();
        assert_eq!(reports.len(), 4);
        assert!(reports[0].contains("not found"));
        assert!(reports[1].contains("already exists"));
        assert!(reports[2].contains("has no account"));
        assert!(reports[3].contains("Invalid command"));
        assert_eq!(engine.bank().accounts().len(), 1);
    }

    #[tokio::test]
    async fn resumes_from_stored_bank() {
        let mut first = engine(
            "new_client,1,Ana,01-01-1980,Rua,\nnew_account,1,,,,\n",
            MemoryStore::new(),
        );
        first.process().await.unwrap();
        let saved = first.store.snapshot().unwrap();

        let mut second = engine("new_account,1,,,,\n", MemoryStore::with_bank(saved));
        second.process().await.unwrap();

        let ana = second.bank().find_client("1").unwrap();
        assert_eq!(ana.accounts(), &[AccountNumber(1), AccountNumber(2)]);
    }

    #[tokio::test]
    async fn flush_writes_account_listing() {
        let mut engine = engine(
            "new_client,1,Ana Lima,01-01-1980,Rua,\n\
             new_account,1,,,,\n\
             deposit,1,,,,10.5\n",
            MemoryStore::new(),
        );
        engine.process().await.unwrap();

        let mut out = Vec::new();
        engine.flush(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(
            text,
            "account,agency,holder,balance,transactions\n1,0001,Ana Lima,10.50,1\n"
        );
    }

    #[tokio::test]
    async fn flush_appends_statements_and_client_list() {
        let mut engine = engine(
            "new_client,1,Ana Lima,01-01-1980,\"Rua 1, Centro\",\n\
             new_client,2,Bia Reis,1975-07-30,Rua 2,\n\
             new_account,1,,,,\n\
             new_account,1,,,,\n\
             deposit,1,,,,100\n\
             withdraw,1,,,,40\n\
             statement,1,,,,\n\
             statement,2,,,,\n\
             list_clients,,,,,\n",
            MemoryStore::new(),
        );
        engine.process().await.unwrap();

        let mut out = Vec::new();
        engine.flush(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let sections: Vec<&str> = text.split("\n\n").collect();

        assert_eq!(sections.len(), 3);
        assert!(sections[0].starts_with("account,agency,holder,balance,transactions\n"));

        let statement: Vec<&str> = sections[1].lines().collect();
        assert_eq!(statement[0], "account,entry,amount,timestamp");
        assert!(statement[1].starts_with("1,deposit,100.00,"));
        assert!(statement[2].starts_with("1,withdrawal,40.00,"));
        assert_eq!(statement[3], "1,balance,60.00,");
        assert_eq!(statement.len(), 4);

        assert_eq!(
            sections[2],
            "tax_id,name,birth_date,address,accounts\n\
             1,Ana Lima,01-01-1980,\"Rua 1, Centro\",1 2\n\
             2,Bia Reis,30-07-1975,Rua 2,\n"
        );

        let reports = engine.dlq.reports();
        assert_eq!(reports.len(), 1);
        assert!(reports[0].contains("has no account"));
    }
}
