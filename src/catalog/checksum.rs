use anyhow::{Context, Result};
use md5::{Digest, Md5};
use std::path::Path;

/// Lowercase hex MD5 of the whole file.
pub fn checksum_md5(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read {} for checksum", path.display()))?;
    Ok(hex::encode(Md5::digest(&bytes)))
}
