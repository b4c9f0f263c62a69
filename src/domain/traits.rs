use futures::Stream;

use crate::bank::Bank;
use crate::domain::{Command, Error};

pub trait CommandStream {
    type CmdStream: Stream<Item = Result<Command, Error>> + Send + Unpin + 'static;
    fn stream(&mut self) -> Self::CmdStream;
}

pub trait DeadLetterQueue {
    fn report(&self, error: &Error);
}

/// Loads and saves the whole bank at once.
pub trait Store {
    fn load(&self) -> Result<Bank, Error>;
    fn save(&self, bank: &Bank) -> Result<(), Error>;
}
