//! Catalog stored as a single pretty-printed JSON file.

use super::lock::CatalogLock;
use super::trait_def::CatalogStore;
use super::{ensure_valid, CatalogStoreError};
use crate::catalog::Catalog;
use crate::schema::CatalogSchema;
use anyhow::{Context, Result};
use std::fs::Permissions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

pub struct JsonFileCatalogStore {
    path: PathBuf,
    schema: CatalogSchema,
}

impl JsonFileCatalogStore {
    pub fn new(path: PathBuf, schema: CatalogSchema) -> Self {
        JsonFileCatalogStore { path, schema }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        CatalogLock::path_for(&self.path)
    }

    /// Permissions the rewritten catalog should carry: those of the current
    /// file, or world-readable for a new one. Temp files start out as 0600.
    fn target_permissions(&self) -> Option<Permissions> {
        match std::fs::metadata(&self.path) {
            Ok(metadata) => Some(metadata.permissions()),
            Err(_) => new_file_permissions(),
        }
    }

    /// Writes `bytes` next to the catalog and renames over it, so readers see
    /// either the old or the new document.
    fn write_atomically(&self, bytes: &[u8]) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create catalog directory {:?}", dir))?;

        let mut tmp = NamedTempFile::new_in(&dir)
            .with_context(|| format!("Failed to create temporary file in {:?}", dir))?;
        tmp.write_all(bytes).map_err(CatalogStoreError::Io)?;
        if let Some(permissions) = self.target_permissions() {
            tmp.as_file()
                .set_permissions(permissions)
                .map_err(CatalogStoreError::Io)?;
        }
        tmp.as_file().sync_all().map_err(CatalogStoreError::Io)?;
        tmp.persist(&self.path)
            .map_err(|e| CatalogStoreError::Io(e.error))
            .with_context(|| format!("Failed to replace catalog {:?}", self.path))?;
        Ok(())
    }
}

#[cfg(unix)]
fn new_file_permissions() -> Option<Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn new_file_permissions() -> Option<Permissions> {
    None
}

impl CatalogStore for JsonFileCatalogStore {
    fn load(&self) -> Result<Catalog> {
        if !self.path.exists() {
            info!(
                "No catalog at {:?}, starting from an empty one",
                self.path
            );
            return Ok(Catalog::default());
        }
        let text = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read catalog {:?}", self.path))?;
        let catalog: Catalog = serde_json::from_str(&text)
            .map_err(CatalogStoreError::Json)
            .with_context(|| format!("Failed to parse catalog {:?}", self.path))?;
        debug!(
            "Loaded catalog {:?} with {} releases",
            self.path,
            catalog.releases.len()
        );
        Ok(catalog)
    }

    fn validate(&self, catalog: &Catalog) -> Result<()> {
        ensure_valid(&self.schema, catalog)?;
        Ok(())
    }

    fn save(&self, catalog: &Catalog) -> Result<()> {
        ensure_valid(&self.schema, catalog)?;
        let mut json = serde_json::to_string_pretty(catalog).map_err(CatalogStoreError::Json)?;
        json.push('\n');
        self.write_atomically(json.as_bytes())?;
        debug!("Saved catalog {:?}", self.path);
        Ok(())
    }

    fn update(&self, mutate: &mut dyn FnMut(&mut Catalog) -> Result<()>) -> Result<Catalog> {
        let _lock = CatalogLock::acquire(self.lock_path())?;
        let mut catalog = self.load()?;
        mutate(&mut catalog)?;
        self.save(&catalog)?;
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::test_support::make_release;
    use crate::catalog_store::append_release;
    use tempfile::TempDir;

    fn make_store(dir: &TempDir) -> JsonFileCatalogStore {
        JsonFileCatalogStore::new(dir.path().join("catalog.json"), CatalogSchema::builtin())
    }

    #[test]
    fn test_load_missing_file_returns_default() {
        let dir = TempDir::new().unwrap();
        let catalog = make_store(&dir).load().unwrap();
        assert_eq!(catalog.version, 1);
        assert!(catalog.releases.is_empty());
        assert!(catalog.sets.is_empty());
        assert!(catalog.playlists.is_empty());
    }

    #[test]
    fn test_load_malformed_file_is_error() {
        let dir = TempDir::new().unwrap();
        let store = make_store(&dir);
        std::fs::write(store.path(), "{ not json").unwrap();
        assert!(store.load().is_err());
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let store = make_store(&dir);
        let mut catalog = Catalog::default();
        catalog.releases = vec![make_release("a", "DPI-2024-0001")];
        catalog.sets = vec![serde_json::json!({"name": "opening"})];
        catalog
            .extra
            .insert("curator".to_string(), serde_json::json!("ops"));

        store.save(&catalog).unwrap();
        let first = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(store.load().unwrap(), catalog);

        store.save(&store.load().unwrap()).unwrap();
        let second = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(first, second);
        assert!(first.starts_with("{\n  \"version\": 1,\n  \"updated_at\""));
    }

    #[test]
    fn test_save_refuses_invalid_catalog() {
        let dir = TempDir::new().unwrap();
        let store = make_store(&dir);
        let mut catalog = Catalog::default();
        let mut release = make_release("a", "DPI-2024-0001");
        release.cover_url = "not a url".to_string();
        catalog.releases = vec![release];

        let err = store.save(&catalog).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CatalogStoreError>(),
            Some(CatalogStoreError::SchemaRejected(_))
        ));
        assert!(!store.path().exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_save_keeps_file_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let store = make_store(&dir);
        store.save(&Catalog::default()).unwrap();
        let mode = |path: &Path| std::fs::metadata(path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode(store.path()), 0o644);

        std::fs::set_permissions(store.path(), Permissions::from_mode(0o664)).unwrap();
        store.save(&store.load().unwrap()).unwrap();
        assert_eq!(mode(store.path()), 0o664);
    }

    #[test]
    fn test_update_appends_and_releases_lock() {
        let dir = TempDir::new().unwrap();
        let store = make_store(&dir);

        for (slug, id) in [("a", "DPI-2024-0001"), ("b", "DPI-2024-0002")] {
            store
                .update(&mut |catalog| {
                    append_release(catalog, make_release(slug, id))?;
                    Ok(())
                })
                .unwrap();
        }

        let catalog = store.load().unwrap();
        let slugs: Vec<&str> = catalog.releases.iter().map(|r| r.slug.as_str()).collect();
        assert_eq!(slugs, vec!["b", "a"]);
        assert!(!store.lock_path().exists());
    }

    #[test]
    fn test_update_fails_while_locked_and_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let store = make_store(&dir);
        std::fs::write(store.lock_path(), "4242\n").unwrap();

        let err = store
            .update(&mut |catalog| {
                append_release(catalog, make_release("a", "DPI-2024-0001"))?;
                Ok(())
            })
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CatalogStoreError>(),
            Some(CatalogStoreError::Locked(_))
        ));
        assert!(!store.path().exists());
        // Someone else's lock is left alone.
        assert!(store.lock_path().exists());
    }

    #[test]
    fn test_failed_mutation_keeps_previous_document() {
        let dir = TempDir::new().unwrap();
        let store = make_store(&dir);
        store
            .update(&mut |catalog| {
                append_release(catalog, make_release("a", "DPI-2024-0001"))?;
                Ok(())
            })
            .unwrap();
        let before = std::fs::read_to_string(store.path()).unwrap();

        let result = store.update(&mut |catalog| {
            append_release(catalog, make_release("a", "DPI-2024-0002"))?;
            Ok(())
        });
        assert!(result.is_err());
        assert_eq!(std::fs::read_to_string(store.path()).unwrap(), before);
        assert!(!store.lock_path().exists());
    }
}
