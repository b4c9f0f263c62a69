use std::io::Read;
use std::pin::Pin;

use futures::stream::{self, Stream};
use serde::Deserialize;

use crate::domain::traits::CommandStream;
use crate::domain::{Command, Error, Money, parse_birth_date};

pub struct CsvReader<R: Read> {
    reader: Option<csv::Reader<R>>,
}

impl<R: Read> CsvReader<R> {
    pub fn new(reader: R) -> Result<Self, Error> {
        let rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        Ok(Self { reader: Some(rdr) })
    }
}

/// Internal shape used only for CSV deserialization.
#[derive(Debug, Deserialize)]
struct CsvRow {
    command: String,
    tax_id: Option<String>,
    name: Option<String>,
    birth_date: Option<String>,
    address: Option<String>,
    amount: Option<Money>,
}

fn required(field: Option<String>, name: &str, command: &str) -> Result<String, Error> {
    match field {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(Error::Ingestion(format!(
            "{} requires a {}",
            command, name
        ))),
    }
}

impl TryFrom<CsvRow> for Command {
    type Error = Error;

    fn try_from(row: CsvRow) -> Result<Self, Self::Error> {
        let command = row.command.trim().to_ascii_lowercase();
        if command == "list_clients" {
            return Ok(Command::ListClients);
        }

        let tax_id = required(row.tax_id, "tax_id", &command)?.trim().to_string();

        let cmd = match (command.as_str(), row.amount) {
            ("new_client", None) => {
                let name = required(row.name, "name", &command)?;
                let raw_date = required(row.birth_date, "birth_date", &command)?;
                let birth_date = parse_birth_date(&raw_date).ok_or_else(|| {
                    Error::Ingestion(format!("Invalid birth date: {}", raw_date))
                })?;
                Command::NewClient {
                    tax_id,
                    name,
                    birth_date,
                    address: row.address.unwrap_or_default(),
                }
            }
            ("new_account", None) => Command::NewAccount { tax_id },
            ("statement", None) => Command::Statement { tax_id },
            ("deposit", Some(amount)) => Command::Deposit { tax_id, amount },
            ("withdraw", Some(amount)) => Command::Withdraw { tax_id, amount },
            (other, _) => {
                return Err(Error::Ingestion(format!(
                    "Invalid command: {}",
                    other
                )));
            }
        };

        Ok(cmd)
    }
}

impl<R: Read + Send + 'static> CommandStream for CsvReader<R> {
    type CmdStream = Pin<Box<dyn Stream<Item = Result<Command, Error>> + Send>>;

    fn stream(&mut self) -> Self::CmdStream {
        let reader = match self.reader.take() {
            Some(r) => r,
            None => {
                // Already consumed.
                return Box::pin(stream::iter(Vec::<Result<Command, Error>>::new()));
            }
        };

        let iter = reader
            .into_deserialize::<CsvRow>()
            .map(|row_res| match row_res {
                Ok(row) => Command::try_from(row),
                Err(e) => Err(Error::Ingestion(format!(
                    "CSV deserialization error: {}",
                    e
                ))),
            });

        Box::pin(stream::iter(iter))
    }
}
