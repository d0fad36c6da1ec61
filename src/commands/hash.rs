//! `snapsync hash` - build and persist a manifest for one directory

use anyhow::{Context, Result};
use std::path::Path;

use crate::ui;

pub fn run(dir: &Path) -> Result<()> {
    ui::info(&format!("Generating file hashes for {}", dir.display()));

    let set = manifest::build_and_write(dir)
        .with_context(|| format!("Failed to generate hashes for {}", dir.display()))?;
    log::debug!("hashed {} files under {}", set.len(), dir.display());

    ui::success(&format!(
        "File hashes for {} generated and stored in {}",
        dir.display(),
        manifest::MANIFEST_FILE
    ));
    Ok(())
}
