//! CSV Data Loader Module
//! Reads tables from files, uploaded bytes or URLs, and memoizes them per source.

use crate::data::schema::{schema_of, ColumnDef};
use polars::prelude::*;
use std::collections::HashMap;
use std::fmt;
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};
use xxhash_rust::xxh3::xxh3_64;

/// Marker OpenFlights uses for missing values.
const NULL_MARKER: &str = "\\N";

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Data unavailable from {source_desc}: {reason}")]
    DataUnavailable { source_desc: String, reason: String },
    #[error("Failed to parse CSV from {source_desc}: {error}")]
    Malformed {
        source_desc: String,
        #[source]
        error: PolarsError,
    },
}

/// Where a table comes from.
#[derive(Clone)]
pub enum Source {
    File(PathBuf),
    Upload { name: String, bytes: Arc<[u8]> },
    Url(String),
}

impl Source {
    pub fn upload(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Source::Upload {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Cache key for this source. Uploads are keyed by content digest.
    pub fn key(&self) -> SourceKey {
        match self {
            Source::File(path) => SourceKey::File(path.clone()),
            Source::Upload { name, bytes } => SourceKey::Upload {
                name: name.clone(),
                digest: xxh3_64(bytes),
            },
            Source::Url(url) => SourceKey::Url(url.clone()),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::File(path) => write!(f, "file {}", path.display()),
            Source::Upload { name, bytes } => write!(f, "upload {} ({} bytes)", name, bytes.len()),
            Source::Url(url) => write!(f, "{}", url),
        }
    }
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SourceKey {
    File(PathBuf),
    Upload { name: String, digest: u64 },
    Url(String),
}

/// How the CSV bytes are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsvLayout {
    /// First row is a header; dtypes are inferred.
    Headered,
    /// No header row; names and dtypes are fixed, `\N` reads as null.
    Headerless(&'static [ColumnDef]),
}

impl CsvLayout {
    fn cache_tag(&self) -> String {
        match self {
            CsvLayout::Headered => "headered".to_string(),
            CsvLayout::Headerless(columns) => {
                let names: Vec<&str> = columns.iter().map(|c| c.name).collect();
                names.join(",")
            }
        }
    }
}

/// Retrieves the raw bytes behind a URL.
pub trait Fetcher: Send + Sync {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, LoaderError>;
}

/// Blocking HTTP fetcher.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, LoaderError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LoaderError::DataUnavailable {
                source_desc: "http client".to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, LoaderError> {
        let unavailable = |e: reqwest::Error| LoaderError::DataUnavailable {
            source_desc: url.to_string(),
            reason: e.to_string(),
        };

        let response = self
            .client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(unavailable)?;
        let bytes = response.bytes().map_err(unavailable)?;
        Ok(bytes.to_vec())
    }
}

type CacheKey = (SourceKey, String);

/// Loads tables and keeps each one for the lifetime of the loader.
///
/// Safe to share across threads: lookups take a read lock, and a table is
/// written once, the first time its source is loaded.
pub struct DataLoader {
    fetcher: Box<dyn Fetcher>,
    cache: RwLock<HashMap<CacheKey, Arc<DataFrame>>>,
}

impl DataLoader {
    pub fn new(fetcher: Box<dyn Fetcher>) -> Self {
        Self {
            fetcher,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Loader backed by the blocking HTTP fetcher.
    pub fn with_http(timeout: Duration) -> Result<Self, LoaderError> {
        Ok(Self::new(Box::new(HttpFetcher::new(timeout)?)))
    }

    /// Return the table for `source`, reading it only on the first call.
    pub fn load(&self, source: &Source, layout: CsvLayout) -> Result<Arc<DataFrame>, LoaderError> {
        let key = (source.key(), layout.cache_tag());

        if let Some(df) = self.cached(&key) {
            debug!(%source, "Cache hit");
            return Ok(df);
        }

        let bytes = self.read_bytes(source)?;
        info!(%source, bytes = bytes.len(), "Reading table");

        let df = parse_csv(bytes, layout).map_err(|error| LoaderError::Malformed {
            source_desc: source.to_string(),
            error,
        })?;
        info!(%source, rows = df.height(), columns = df.width(), "Table loaded");

        let mut cache = self.cache.write().unwrap_or_else(|e| e.into_inner());
        // Another thread may have loaded the same source meanwhile; keep the first.
        let df = cache.entry(key).or_insert_with(|| Arc::new(df));
        Ok(Arc::clone(df))
    }

    /// Whether `source` is already loaded with `layout`.
    pub fn is_cached(&self, source: &Source, layout: CsvLayout) -> bool {
        self.cached(&(source.key(), layout.cache_tag())).is_some()
    }

    /// Number of distinct tables held by the cache.
    pub fn cached_tables(&self) -> usize {
        self.cache.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    fn cached(&self, key: &CacheKey) -> Option<Arc<DataFrame>> {
        let cache = self.cache.read().unwrap_or_else(|e| e.into_inner());
        cache.get(key).cloned()
    }

    fn read_bytes(&self, source: &Source) -> Result<Vec<u8>, LoaderError> {
        match source {
            Source::File(path) => std::fs::read(path).map_err(|e| LoaderError::DataUnavailable {
                source_desc: source.to_string(),
                reason: e.to_string(),
            }),
            Source::Upload { bytes, .. } => {
                if bytes.is_empty() {
                    return Err(LoaderError::DataUnavailable {
                        source_desc: source.to_string(),
                        reason: "empty upload".to_string(),
                    });
                }
                Ok(bytes.to_vec())
            }
            Source::Url(url) => self.fetcher.fetch(url),
        }
    }
}

/// Parse CSV bytes without recovering from bad rows.
pub fn parse_csv(bytes: Vec<u8>, layout: CsvLayout) -> PolarsResult<DataFrame> {
    let options = match layout {
        CsvLayout::Headered => CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(10000)),
        CsvLayout::Headerless(columns) => CsvReadOptions::default()
            .with_has_header(false)
            .with_schema(Some(Arc::new(schema_of(columns))))
            .map_parse_options(|opts| {
                opts.with_null_values(Some(NullValues::AllColumnsSingle(NULL_MARKER.into())))
            }),
    };

    options
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()
}
