//! Configuration management for the event functions.

use std::env;

use crate::{Error, Result};

/// Default blob store name, used as the object key prefix.
pub const DEFAULT_STORE_NAME: &str = "gothic-calendar-data";

/// Default key of the events document inside the store.
pub const DEFAULT_EVENTS_KEY: &str = "events";

/// Function configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// S3 bucket backing the blob store
    pub bucket: String,
    /// Logical store name
    pub store_name: String,
    /// Key of the events document
    pub events_key: String,
    /// Persist an empty document when a read finds nothing
    pub seed_empty_document: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let bucket = env::var("BLOB_BUCKET")
            .map_err(|_| Error::Config("BLOB_BUCKET not set".to_string()))?;

        Ok(Self {
            bucket,
            store_name: env::var("BLOB_STORE_NAME")
                .unwrap_or_else(|_| DEFAULT_STORE_NAME.to_string()),
            events_key: env::var("EVENTS_KEY").unwrap_or_else(|_| DEFAULT_EVENTS_KEY.to_string()),
            seed_empty_document: env::var("SEED_EMPTY_DOCUMENT")
                .map(|v| parse_flag(&v))
                .unwrap_or(false),
        })
    }

    /// Full object key of the events document.
    pub fn document_key(&self) -> String {
        format!("{}/{}", self.store_name, self.events_key)
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
