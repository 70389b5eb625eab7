//! Plumbing shared by the command line binaries.

use crate::config::{AppConfig, CliConfig, FileConfig};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Resolves `s` against the working directory. A path that does not exist
/// yet is accepted as is.
pub fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

/// Loads `.env` when present and installs the log subscriber. `LOG_LEVEL`
/// takes an `EnvFilter` directive, INFO by default.
pub fn init() {
    let dotenv = dotenvy::dotenv();
    init_logging();
    if let Ok(path) = dotenv {
        info!("Loaded environment from {:?}", path);
    }
}

fn init_logging() {
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init();
}

/// Reads the optional TOML file and resolves the full configuration.
pub fn load_config(config_path: Option<&Path>, cli: &CliConfig) -> Result<AppConfig> {
    let file_config = match config_path {
        Some(path) => {
            info!("Loading config from {:?}", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };
    AppConfig::resolve(cli, file_config)
}
