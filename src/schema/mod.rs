//! Catalog schema validation.
//!
//! The catalog document is checked structurally against a JSON Schema file
//! and then for cross-record consistency (unique slugs and catalog ids).
//! Every problem is collected, nothing fails fast.

use anyhow::{anyhow, Context, Result};
use jsonschema::Validator;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

/// The schema shipped with the crate, used unless a path is configured.
pub const BUILTIN_SCHEMA: &str = include_str!("../../schema/catalog.schema.json");

/// A single validation problem.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SchemaError {
    /// JSON pointer to the offending value, empty for the document root.
    pub path: String,
    /// The schema keyword (or consistency rule) that failed.
    pub keyword: String,
    pub message: String,
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() { "/" } else { &self.path };
        write!(f, "{} [{}]: {}", path, self.keyword, self.message)
    }
}

impl From<jsonschema::ValidationError<'_>> for SchemaError {
    fn from(error: jsonschema::ValidationError<'_>) -> Self {
        let schema_path = error.schema_path.to_string();
        let keyword = schema_path.rsplit('/').next().unwrap_or_default().to_string();
        SchemaError {
            path: error.instance_path.to_string(),
            keyword,
            message: error.to_string(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub errors: Vec<SchemaError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A compiled catalog schema. Formats (`date`, `date-time`, `uri`, ...) are
/// asserted, not just annotated.
pub struct CatalogSchema {
    validator: Validator,
}

impl CatalogSchema {
    pub fn builtin() -> Self {
        let root = serde_json::from_str(BUILTIN_SCHEMA)
            .expect("Built-in catalog schema is not valid JSON, this should be fixed at build time.");
        Self::from_value(&root)
            .expect("Built-in catalog schema does not compile, this should be fixed at build time.")
    }

    /// Compiles `root`, failing on anything that is not a valid JSON Schema.
    pub fn from_value(root: &Value) -> Result<Self> {
        let validator = jsonschema::options()
            .should_validate_formats(true)
            .build(root)
            .map_err(|e| anyhow!("Invalid catalog schema: {}", e))?;
        Ok(CatalogSchema { validator })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read schema file: {:?}", path))?;
        let root: Value = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse schema file: {:?}", path))?;
        Self::from_value(&root).with_context(|| format!("Failed to compile schema file: {:?}", path))
    }

    /// Loads the schema at `path`, or the built-in one when no path is given.
    pub fn load_or_builtin(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::builtin()),
        }
    }

    /// Structural validation only.
    pub fn validate(&self, document: &Value) -> ValidationReport {
        ValidationReport {
            errors: self
                .validator
                .iter_errors(document)
                .map(SchemaError::from)
                .collect(),
        }
    }

    /// Structural validation plus the cross-record checks.
    pub fn validate_catalog(&self, document: &Value) -> ValidationReport {
        let mut report = self.validate(document);
        report.errors.extend(check_unique_release_fields(document));
        report
    }
}

fn check_unique_release_fields(document: &Value) -> Vec<SchemaError> {
    let mut errors = vec![];
    let Some(releases) = document.get("releases").and_then(Value::as_array) else {
        return errors;
    };

    for field in ["slug", "catalog_id"] {
        let mut first_seen: HashMap<&str, usize> = HashMap::new();
        for (index, release) in releases.iter().enumerate() {
            let Some(value) = release.get(field).and_then(Value::as_str) else {
                continue;
            };
            match first_seen.get(value) {
                Some(first) => errors.push(SchemaError {
                    path: format!("/releases/{}/{}", index, field),
                    keyword: "unique".to_string(),
                    message: format!(
                        "{} '{}' is already used by /releases/{}",
                        field, value, first
                    ),
                }),
                None => {
                    first_seen.insert(value, index);
                }
            }
        }
    }
    errors
}
