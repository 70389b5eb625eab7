mod json_store;
mod lock;
mod memory_store;
mod trait_def;

pub use json_store::JsonFileCatalogStore;
pub use lock::CatalogLock;
pub use memory_store::MemoryCatalogStore;
pub use trait_def::CatalogStore;

use crate::catalog::{Catalog, ReleaseRecord};
use crate::schema::{CatalogSchema, SchemaError};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogStoreError {
    #[error("Catalog is locked by another publish (lock file {0:?}), remove it if no publish is running")]
    Locked(PathBuf),
    #[error("A release with slug '{0}' already exists in the catalog")]
    DuplicateSlug(String),
    #[error("Refusing to write a catalog that fails validation ({} errors):\n{}", .0.len(), list_errors(.0))]
    SchemaRejected(Vec<SchemaError>),
    #[error("Catalog I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Catalog JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn list_errors(errors: &[SchemaError]) -> String {
    errors
        .iter()
        .map(|e| format!("  {}", e))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Puts `release` at the head of the catalog and refreshes `updated_at`.
///
/// Slugs are unique within the catalog, a clash leaves the catalog untouched.
pub fn append_release(
    catalog: &mut Catalog,
    release: ReleaseRecord,
) -> Result<(), CatalogStoreError> {
    if catalog.find_release(&release.slug).is_some() {
        return Err(CatalogStoreError::DuplicateSlug(release.slug));
    }
    catalog.releases.insert(0, release);
    catalog.touch();
    Ok(())
}

fn ensure_valid(schema: &CatalogSchema, catalog: &Catalog) -> Result<(), CatalogStoreError> {
    let document = serde_json::to_value(catalog)?;
    let report = schema.validate_catalog(&document);
    if report.is_valid() {
        Ok(())
    } else {
        Err(CatalogStoreError::SchemaRejected(report.errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::test_support::make_release;

    #[test]
    fn test_append_puts_release_first_and_keeps_order() {
        let mut catalog = Catalog::default();
        catalog.updated_at = "2000-01-01T00:00:00.000Z".to_string();
        catalog.releases = vec![
            make_release("b", "DPI-2024-0002"),
            make_release("a", "DPI-2024-0001"),
        ];

        let new_release = make_release("c", "DPI-2024-0003");
        append_release(&mut catalog, new_release.clone()).unwrap();

        assert_eq!(catalog.releases[0], new_release);
        let slugs: Vec<&str> = catalog.releases.iter().map(|r| r.slug.as_str()).collect();
        assert_eq!(slugs, vec!["c", "b", "a"]);
        assert_ne!(catalog.updated_at, "2000-01-01T00:00:00.000Z");
    }

    #[test]
    fn test_append_rejects_duplicate_slug() {
        let mut catalog = Catalog::default();
        catalog.releases = vec![make_release("a", "DPI-2024-0001")];
        let before = catalog.clone();

        let err = append_release(&mut catalog, make_release("a", "DPI-2024-0002")).unwrap_err();
        assert!(matches!(err, CatalogStoreError::DuplicateSlug(ref s) if s == "a"));
        assert_eq!(catalog, before);
    }

    #[test]
    fn test_ensure_valid_rejects_bad_release() {
        let mut catalog = Catalog::default();
        let mut release = make_release("a", "DPI-2024-0001");
        release.title = "".to_string();
        catalog.releases = vec![release];

        let err = ensure_valid(&CatalogSchema::builtin(), &catalog).unwrap_err();
        match err {
            CatalogStoreError::SchemaRejected(errors) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].path, "/releases/0/title");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_schema_rejection_lists_every_error() {
        let mut catalog = Catalog::default();
        let mut release = make_release("a", "DPI-2024-0001");
        release.title = "".to_string();
        release.duration = "5 minutes".to_string();
        catalog.releases = vec![release];

        let message = ensure_valid(&CatalogSchema::builtin(), &catalog)
            .unwrap_err()
            .to_string();
        assert!(message.starts_with("Refusing to write a catalog that fails validation (2 errors):"));
        assert!(message.contains("\n  /releases/0/title [minLength]: "));
        assert!(message.contains("\n  /releases/0/duration [pattern]: "));
    }
}
