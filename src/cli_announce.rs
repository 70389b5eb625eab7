use anyhow::{bail, Result};
use clap::Parser;
use deeppi_catalog::announce::announce_release;
use deeppi_catalog::cli::{init, load_config, parse_path};
use deeppi_catalog::{
    format_release, CatalogSchema, CatalogStore, CliConfig, JsonFileCatalogStore,
};
use std::path::PathBuf;
use tracing::info;

/// Announce a catalog release on the Telegram channel.
#[derive(Parser, Debug)]
#[command(name = "catalog-announce")]
struct CliArgs {
    /// Path to a TOML config file.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Path to the catalog JSON file.
    #[clap(long, value_parser = parse_path)]
    pub catalog: Option<PathBuf>,

    /// Release to announce. Defaults to the newest one.
    #[clap(long)]
    pub slug: Option<String>,

    /// Print the message instead of sending it.
    #[clap(long)]
    pub dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();
    init();

    let cli_config = CliConfig {
        catalog_path: cli_args.catalog,
        schema_path: None,
    };
    let config = load_config(cli_args.config.as_deref(), &cli_config)?;

    if !config.catalog_path.exists() {
        bail!("Catalog not found at {:?}", config.catalog_path);
    }
    let schema = CatalogSchema::load_or_builtin(config.schema_path.as_deref())?;
    let store = JsonFileCatalogStore::new(config.catalog_path.clone(), schema);
    let catalog = store.load()?;

    let release = match &cli_args.slug {
        Some(slug) => match catalog.find_release(slug) {
            Some(release) => release,
            None => bail!("No release with slug '{}' in the catalog", slug),
        },
        None => match catalog.latest_release() {
            Some(release) => release,
            None => bail!("The catalog has no releases to announce"),
        },
    };

    if cli_args.dry_run {
        println!("{}", format_release(release, &config.site_url));
        return Ok(());
    }

    let client = config.telegram_client()?;
    if !announce_release(&client, release, &config.site_url).await {
        bail!("Failed to deliver the announcement for '{}'", release.slug);
    }
    info!("Announced {}", release.slug);
    Ok(())
}
