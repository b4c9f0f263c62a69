pub mod bank;
pub mod config;
pub mod dlq;
pub mod domain;
pub mod engine;
pub mod ingestion;
pub mod store;
