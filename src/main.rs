use std::fs::File;

use personal_ledger::{
    config::Config, dlq::StdErrDLQ, engine::Engine, ingestion::CsvReader, store::JsonFileStore,
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main] // drives the command stream
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env()?;
    let file = File::open(&config.commands)?;

    let ingestion = CsvReader::new(file)?;
    let store = JsonFileStore::new(&config.data_file);
    let dlq = StdErrDLQ::default();

    let mut engine = Engine::new(ingestion, store, dlq)?;
    engine.process().await?;

    engine.flush(std::io::stdout().lock())?;

    Ok(())
}
