//! Advisory lock file guarding read-modify-write cycles on the catalog.

use super::CatalogStoreError;
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Held for as long as the value lives; the lock file is removed on drop.
#[derive(Debug)]
pub struct CatalogLock {
    path: PathBuf,
}

impl CatalogLock {
    /// Lock file path used for a catalog document: `<catalog>.lock`.
    pub fn path_for(catalog_path: &Path) -> PathBuf {
        let mut name = catalog_path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "catalog.json".into());
        name.push(".lock");
        catalog_path.with_file_name(name)
    }

    pub fn acquire(path: PathBuf) -> Result<CatalogLock, CatalogStoreError> {
        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                return Err(CatalogStoreError::Locked(path));
            }
            Err(err) => return Err(CatalogStoreError::Io(err)),
        };
        // Owner pid, for whoever finds a stale lock.
        if let Err(err) = writeln!(file, "{}", std::process::id()) {
            warn!("Failed to record owner pid in catalog lock {:?}: {}", path, err);
        }
        debug!("Acquired catalog lock {:?}", path);
        Ok(CatalogLock { path })
    }
}

impl Drop for CatalogLock {
    fn drop(&mut self) {
        if let Err(err) = std::fs::remove_file(&self.path) {
            warn!("Failed to remove catalog lock {:?}: {}", self.path, err);
        }
    }
}
