use anyhow::{Context, Result};
use clap::Parser;
use deeppi_catalog::announce::announce_release;
use deeppi_catalog::cli::{init, load_config, parse_path};
use deeppi_catalog::{
    publish_release, CatalogSchema, CliConfig, JsonFileCatalogStore, ReleaseParams,
};
use std::path::PathBuf;
use tracing::{info, warn};

/// Publish a release: upload its audio and cover, then add it to the catalog.
///
/// The release fields are all optional at the parser level so that a missing
/// one is reported as a build error.
#[derive(Parser, Debug)]
#[command(name = "catalog-upload")]
struct CliArgs {
    /// Audio file (.mp3 or .wav).
    #[clap(long)]
    pub audio: Option<String>,

    /// Cover image (.jpg).
    #[clap(long)]
    pub cover: Option<String>,

    #[clap(long)]
    pub title: Option<String>,

    /// Tempo in beats per minute.
    #[clap(long)]
    pub bpm: Option<String>,

    #[clap(long)]
    pub genre: Option<String>,

    /// Defaults to a slug derived from the title.
    #[clap(long)]
    pub slug: Option<String>,

    /// Release date, YYYY-MM-DD. Defaults to today.
    #[clap(long)]
    pub date: Option<String>,

    #[clap(long)]
    pub artist: Option<String>,

    /// Musical key, e.g. "A minor".
    #[clap(long)]
    pub key: Option<String>,

    /// Comma separated list.
    #[clap(long)]
    pub mood: Option<String>,

    /// MM:SS or HH:MM:SS.
    #[clap(long)]
    pub duration: Option<String>,

    /// Comma separated list.
    #[clap(long)]
    pub tags: Option<String>,

    #[clap(long)]
    pub description: Option<String>,

    /// Post the release to the Telegram channel once it is published.
    #[clap(long)]
    pub announce: bool,

    /// Path to a TOML config file.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Path to the catalog JSON file.
    #[clap(long, value_parser = parse_path)]
    pub catalog: Option<PathBuf>,
}

impl CliArgs {
    fn release_params(&self) -> ReleaseParams {
        ReleaseParams {
            audio: self.audio.clone(),
            cover: self.cover.clone(),
            title: self.title.clone(),
            bpm: self.bpm.clone(),
            genre: self.genre.clone(),
            slug: self.slug.clone(),
            date: self.date.clone(),
            artist: self.artist.clone(),
            key: self.key.clone(),
            mood: self.mood.clone(),
            duration: self.duration.clone(),
            tags: self.tags.clone(),
            description: self.description.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();
    init();

    let params = cli_args.release_params();
    let today = chrono::Local::now().date_naive();
    // Reject bad input before any collaborator is set up.
    params.require(today)?;

    let cli_config = CliConfig {
        catalog_path: cli_args.catalog.clone(),
        schema_path: None,
    };
    let config = load_config(cli_args.config.as_deref(), &cli_config)?;

    let schema = CatalogSchema::load_or_builtin(config.schema_path.as_deref())?;
    let store = JsonFileCatalogStore::new(config.catalog_path.clone(), schema);
    let publisher = config.asset_publisher().await?;

    let release = publish_release(&params, publisher.as_ref(), &store, today)
        .await
        .context("Publishing failed")?;
    info!(
        "Published {} to {:?}",
        release.catalog_id,
        store.path()
    );
    println!("{}", config.release_url(&release.slug));

    if cli_args.announce {
        match config.telegram_client() {
            Ok(client) => {
                if !announce_release(&client, &release, &config.site_url).await {
                    warn!("Release was published but the announcement failed");
                }
            }
            Err(err) => warn!("Skipping announcement: {:#}", err),
        }
    }

    Ok(())
}
