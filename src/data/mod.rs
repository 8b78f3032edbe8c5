//! Data module - CSV loading and selection

pub mod loader;
pub mod processor;
pub mod schema;

pub use loader::{CsvLayout, DataLoader, Fetcher, HttpFetcher, LoaderError, Source, SourceKey};
