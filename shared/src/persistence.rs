//! Read and write the events document through a blob store.
//!
//! Writes replace the whole document. There is no merge and no concurrency
//! check: the last writer wins.

use tracing::info;

use crate::models::Document;
use crate::store::BlobStore;
use crate::Result;

/// Read the stored document.
///
/// A missing document reads as `{ "events": [] }`. With `seed_empty` set, that
/// empty document is also written back so later reads find it.
pub async fn read_document(store: &dyn BlobStore, key: &str, seed_empty: bool) -> Result<Document> {
    match store.get(key).await? {
        Some(bytes) => Document::from_slice(&bytes),
        None => {
            let document = Document::default();
            if seed_empty {
                info!("Seeding empty events document at {}", key);
                store.put(key, document.to_vec()?).await?;
            }
            Ok(document)
        }
    }
}

/// Validate and store the document, replacing any previous one.
pub async fn write_document(store: &dyn BlobStore, key: &str, document: &Document) -> Result<()> {
    document.validate()?;
    store.put(key, document.to_vec()?).await?;
    info!("Stored {} events at {}", document.events.len(), key);
    Ok(())
}
