//! Local JSON backup of the events document.

use std::path::{Path, PathBuf};

use shared::{Document, Result};
use tracing::info;

pub const BACKUP_FILE_NAME: &str = "gothic_calendar_backup.json";

/// Pretty-printed `{ "events": [...] }` with two-space indentation.
pub fn backup_json(document: &Document) -> Result<String> {
    Ok(serde_json::to_string_pretty(document)?)
}

/// Write the backup file into `dir`, replacing an older backup there.
pub async fn write_backup(dir: &Path, document: &Document) -> Result<PathBuf> {
    let path = dir.join(BACKUP_FILE_NAME);
    tokio::fs::write(&path, backup_json(document)?).await?;
    info!("Wrote backup of {} events to {}", document.events.len(), path.display());
    Ok(path)
}
