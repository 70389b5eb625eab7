use anyhow::{Context, Result};
use clap::Parser;
use deeppi_catalog::cli::{init, load_config, parse_path};
use deeppi_catalog::{CatalogSchema, CliConfig};
use serde_json::Value;
use std::path::PathBuf;

/// Check the catalog against its JSON schema and report every violation.
#[derive(Parser, Debug)]
#[command(name = "catalog-validate")]
struct CliArgs {
    /// Path to a TOML config file.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Path to the catalog JSON file.
    #[clap(long, value_parser = parse_path)]
    pub catalog: Option<PathBuf>,

    /// Schema to validate against instead of the built-in one.
    #[clap(long, value_parser = parse_path)]
    pub schema: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();
    init();

    let cli_config = CliConfig {
        catalog_path: cli_args.catalog,
        schema_path: cli_args.schema,
    };
    let config = load_config(cli_args.config.as_deref(), &cli_config)?;
    let schema = CatalogSchema::load_or_builtin(config.schema_path.as_deref())?;

    let content = std::fs::read_to_string(&config.catalog_path)
        .with_context(|| format!("Failed to read catalog {:?}", config.catalog_path))?;
    let document: Value = serde_json::from_str(&content)
        .with_context(|| format!("Catalog {:?} is not valid JSON", config.catalog_path))?;

    let report = schema.validate_catalog(&document);
    if report.is_valid() {
        let releases = document["releases"].as_array().map_or(0, Vec::len);
        println!(
            "{} is valid ({} releases)",
            config.catalog_path.display(),
            releases
        );
        return Ok(());
    }

    eprintln!(
        "{} is invalid, {} error(s):",
        config.catalog_path.display(),
        report.errors.len()
    );
    for error in &report.errors {
        eprintln!("  {}", error);
    }
    std::process::exit(1);
}
