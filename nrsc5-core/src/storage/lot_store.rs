use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::models::error::RadioError;
use crate::models::records::Lot;
use crate::models::registry::MimeType;

use super::checksum::sha256_hex;

/// Sidecar written next to every stored file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LotMetadata {
    pub port: u16,
    pub lot: u32,
    pub mime: MimeType,
    pub name: Option<String>,
    pub size: usize,
    pub checksum: String,
    pub received_at: String,
}

/// Writes delivered files (album art, logos, data services) into a directory.
///
/// Each file lands at `<dir>/<lot>_<name>` (or `<dir>/<lot>.<ext>` when the
/// broadcast gave no usable name) with a `.metadata.json` sidecar.
#[derive(Debug, Clone)]
pub struct LotStore {
    directory: PathBuf,
}

impl LotStore {
    pub fn new(directory: PathBuf) -> Self {
        Self { directory }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Path a file will be stored at.
    pub fn path_for(&self, lot: &Lot) -> PathBuf {
        let file_name = match lot.name.as_deref().and_then(sanitize_name) {
            Some(name) => format!("{}_{}", lot.lot, name),
            None => format!("{}.{}", lot.lot, lot.mime.file_extension()),
        };
        self.directory.join(file_name)
    }

    /// Write the payload and its sidecar. Returns the payload path.
    pub fn store(&self, lot: &Lot) -> Result<PathBuf, RadioError> {
        fs::create_dir_all(&self.directory)
            .map_err(|e| RadioError::StorageError(format!("failed to create directory: {}", e)))?;

        let path = self.path_for(lot);
        fs::write(&path, &lot.data)
            .map_err(|e| RadioError::StorageError(format!("failed to write file: {}", e)))?;

        let metadata = LotMetadata {
            port: lot.port,
            lot: lot.lot,
            mime: lot.mime,
            name: lot.name.clone(),
            size: lot.data.len(),
            checksum: sha256_hex(&lot.data),
            received_at: chrono::Utc::now().to_rfc3339(),
        };
        write_metadata(&metadata, &path)?;

        log::debug!(
            "stored lot {} ({}, {} bytes) at {}",
            lot.lot,
            lot.mime,
            lot.data.len(),
            path.display()
        );
        Ok(path)
    }
}

/// Write metadata as a JSON sidecar: `{path}.metadata.json` with the extension replaced.
pub fn write_metadata(metadata: &LotMetadata, file_path: &Path) -> Result<(), RadioError> {
    let metadata_path = file_path.with_extension("metadata.json");
    let json = serde_json::to_string_pretty(metadata)
        .map_err(|e| RadioError::StorageError(format!("failed to serialize metadata: {}", e)))?;
    fs::write(&metadata_path, json)
        .map_err(|e| RadioError::StorageError(format!("failed to write metadata: {}", e)))?;
    Ok(())
}

/// Read the JSON sidecar of a stored file.
pub fn read_metadata(file_path: &Path) -> Result<LotMetadata, RadioError> {
    let metadata_path = file_path.with_extension("metadata.json");
    let json = fs::read_to_string(&metadata_path)
        .map_err(|e| RadioError::StorageError(format!("failed to read metadata: {}", e)))?;
    serde_json::from_str(&json)
        .map_err(|e| RadioError::StorageError(format!("failed to parse metadata: {}", e)))
}

/// Reduce a broadcast file name to a safe single path component.
fn sanitize_name(name: &str) -> Option<String> {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') { c } else { '_' })
        .collect();
    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        None
    } else {
        Some(cleaned)
    }
}
