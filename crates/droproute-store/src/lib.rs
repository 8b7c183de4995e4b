//! JSON-file storage for the address list.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use droproute_core::{AddressEntry, AddressStore, StoreError};

/// Stores the whole address list as one pretty-printed JSON array.
///
/// Writes go to a sibling `.tmp` file first and are renamed into place, so a
/// crash mid-write leaves the previous list intact.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_err(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl AddressStore for JsonFileStore {
    fn load(&self) -> Result<Vec<AddressEntry>, StoreError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no stored address list yet");
                return Ok(Vec::new());
            }
            Err(e) => return Err(self.io_err(e)),
        };

        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&raw).map_err(|e| StoreError::Corrupt {
            path: self.path.clone(),
            reason: e.to_string(),
        })
    }

    fn save(&mut self, entries: &[AddressEntry]) -> Result<(), StoreError> {
        let body =
            serde_json::to_vec_pretty(entries).map_err(|e| StoreError::Encode(e.to_string()))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| self.io_err(e))?;
        }

        let tmp = self.tmp_path();
        std::fs::write(&tmp, body).map_err(|e| self.io_err(e))?;
        if let Err(e) = std::fs::rename(&tmp, &self.path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(self.io_err(e));
        }

        tracing::debug!(path = %self.path.display(), entries = entries.len(), "address list saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tmp_path_is_a_sibling() {
        let store = JsonFileStore::new("/var/lib/droproute/addresses.json");
        assert_eq!(store.path(), Path::new("/var/lib/droproute/addresses.json"));
        assert_eq!(
            store.tmp_path(),
            PathBuf::from("/var/lib/droproute/addresses.json.tmp")
        );
    }
}
