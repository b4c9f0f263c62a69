use std::env;
use std::path::PathBuf;

use crate::domain::Error;

pub const DATA_FILE_ENV: &str = "LEDGER_DATA_FILE";
pub const DEFAULT_DATA_FILE: &str = "ledger.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// CSV file with the commands to apply.
    pub commands: PathBuf,
    /// Where the bank is loaded from and saved to.
    pub data_file: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self, Error> {
        Self::from_args(env::args().skip(1), env::var(DATA_FILE_ENV).ok())
    }

    /// A data file given on the command line wins over the environment.
    pub fn from_args<I>(args: I, env_data_file: Option<String>) -> Result<Self, Error>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();

        let commands = args
            .next()
            .map(PathBuf::from)
            .ok_or_else(|| Error::Config("No command file argument was provided".to_string()))?;
        let data_file = args
            .next()
            .or(env_data_file)
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATA_FILE.to_string());

        if let Some(extra) = args.next() {
            return Err(Error::Config(format!("Unexpected argument: {}", extra)));
        }

        Ok(Self {
            commands,
            data_file: PathBuf::from(data_file),
        })
    }
}
