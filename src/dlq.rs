use std::sync::Mutex;

use crate::domain::{DeadLetterQueue, Error};

/// Prints every rejected command to stderr.
#[derive(Default, Debug)]
pub struct StdErrDLQ {}

impl DeadLetterQueue for StdErrDLQ {
    fn report(&self, error: &Error) {
        eprintln!("Rejected: {}", error);
    }
}

/// Collects rejection messages instead of printing them.
#[derive(Default, Debug)]
pub struct MemoryDLQ {
    reports: Mutex<Vec<String>>,
}

impl MemoryDLQ {
    pub fn reports(&self) -> Vec<String> {
        self.reports
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

impl DeadLetterQueue for MemoryDLQ {
    fn report(&self, error: &Error) {
        if let Ok(mut reports) = self.reports.lock() {
            reports.push(error.to_string());
        }
    }
}
