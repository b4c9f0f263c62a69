use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::debug;

use crate::bank::Bank;
use crate::domain::{Error, Store};

/// Keeps the bank as pretty-printed JSON in a single file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Store for JsonFileStore {
    fn load(&self) -> Result<Bank, Error> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no data file, starting empty");
            return Ok(Bank::new());
        }

        let contents = fs::read_to_string(&self.path)?;
        if contents.trim().is_empty() {
            return Ok(Bank::new());
        }

        let bank: Bank = serde_json::from_str(&contents).map_err(|e| {
            Error::Persistence(format!("{}: {}", self.path.display(), e))
        })?;
        debug!(
            path = %self.path.display(),
            clients = bank.clients().len(),
            accounts = bank.accounts().len(),
            "bank loaded"
        );
        Ok(bank)
    }

    fn save(&self, bank: &Bank) -> Result<(), Error> {
        let json = serde_json::to_string_pretty(bank)
            .map_err(|e| Error::Persistence(e.to_string()))?;

        // Write beside the target, then swap it in.
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;

        debug!(path = %self.path.display(), "bank saved");
        Ok(())
    }
}

/// Holds the last saved snapshot in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    snapshot: Mutex<Option<Bank>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bank(bank: Bank) -> Self {
        Self {
            snapshot: Mutex::new(Some(bank)),
        }
    }

    pub fn snapshot(&self) -> Option<Bank> {
        self.snapshot.lock().ok().and_then(|s| s.clone())
    }
}

impl Store for MemoryStore {
    fn load(&self) -> Result<Bank, Error> {
        Ok(self.snapshot().unwrap_or_default())
    }

    fn save(&self, bank: &Bank) -> Result<(), Error> {
        let mut snapshot = self
            .snapshot
            .lock()
            .map_err(|e| Error::Persistence(e.to_string()))?;
        *snapshot = Some(bank.clone());
        Ok(())
    }
}
