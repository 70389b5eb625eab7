//! CatalogStore trait definition.
//!
//! The catalog is a single document, so the store only knows how to read it,
//! write it, and apply a read-modify-write cycle with exclusive access.

use crate::catalog::Catalog;
use anyhow::Result;

pub trait CatalogStore: Send + Sync {
    /// Reads the catalog, or the default empty shape if none exists yet.
    fn load(&self) -> Result<Catalog>;

    /// Checks `catalog` against the schema this store writes with, without
    /// writing anything.
    fn validate(&self, catalog: &Catalog) -> Result<()>;

    /// Writes the whole catalog. Fails without writing if the document does
    /// not pass schema validation.
    fn save(&self, catalog: &Catalog) -> Result<()>;

    /// Loads, applies `mutate` and saves while holding exclusive access.
    /// Nothing is written if `mutate` or validation fails.
    fn update(&self, mutate: &mut dyn FnMut(&mut Catalog) -> Result<()>) -> Result<Catalog>;
}
