//! Shared library for the Gothic Calendar functions and planner client.
//!
//! This crate provides the event model, the fixed calendar, blob storage and
//! the persistence adapter used by the Lambda functions and the client.

pub mod calendar;
pub mod config;
pub mod error;
pub mod http;
pub mod models;
pub mod persistence;
pub mod store;

pub use calendar::{CalendarDate, TimeOfDay};
pub use config::Config;
pub use error::{Error, Result};
pub use models::{Document, Event, EventStatus};
pub use persistence::{read_document, write_document};
pub use store::{BlobStore, MemoryBlobStore, S3BlobStore};
