//! In-memory catalog store.
//!
//! Same contract as the JSON file store, without touching the disk. Used by
//! tests and dry runs.

use super::trait_def::CatalogStore;
use super::ensure_valid;
use crate::catalog::Catalog;
use crate::schema::CatalogSchema;
use anyhow::Result;
use std::sync::Mutex;

pub struct MemoryCatalogStore {
    catalog: Mutex<Option<Catalog>>,
    schema: CatalogSchema,
}

impl MemoryCatalogStore {
    pub fn new() -> Self {
        MemoryCatalogStore {
            catalog: Mutex::new(None),
            schema: CatalogSchema::builtin(),
        }
    }

    pub fn with_catalog(catalog: Catalog) -> Self {
        MemoryCatalogStore {
            catalog: Mutex::new(Some(catalog)),
            schema: CatalogSchema::builtin(),
        }
    }

    /// The stored catalog, `None` until the first save.
    pub fn snapshot(&self) -> Option<Catalog> {
        self.catalog.lock().unwrap().clone()
    }
}

impl Default for MemoryCatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogStore for MemoryCatalogStore {
    fn load(&self) -> Result<Catalog> {
        Ok(self.snapshot().unwrap_or_default())
    }

    fn validate(&self, catalog: &Catalog) -> Result<()> {
        ensure_valid(&self.schema, catalog)?;
        Ok(())
    }

    fn save(&self, catalog: &Catalog) -> Result<()> {
        ensure_valid(&self.schema, catalog)?;
        *self.catalog.lock().unwrap() = Some(catalog.clone());
        Ok(())
    }

    fn update(&self, mutate: &mut dyn FnMut(&mut Catalog) -> Result<()>) -> Result<Catalog> {
        // The guard is held across load, mutate and save.
        let mut guard = self.catalog.lock().unwrap();
        let mut catalog = guard.clone().unwrap_or_default();
        mutate(&mut catalog)?;
        ensure_valid(&self.schema, &catalog)?;
        *guard = Some(catalog.clone());
        Ok(catalog)
    }
}
