//! `snapsync run` - the interactive backup flow.
//!
//! Selects the most recent dated folder under the source root, gates on
//! destination capacity (with a single eviction attempt), optionally
//! copies, then hashes both trees and compares the manifests.

use anyhow::{Context, Result, bail};
use std::path::Path;

use crate::capacity;
use crate::config::RunConfig;
use crate::copier;
use crate::progress::{ConsoleProgress, ProgressSink};
use crate::prompt::{CopyChoice, DecisionProvider, ManifestChoice, TermPrompts};
use crate::{snapshot, ui};

use super::{evict, verify};

pub fn run(cfg: &RunConfig) -> Result<()> {
    let mut decisions = TermPrompts;
    let mut progress = ConsoleProgress::new();
    execute(cfg, &mut decisions, &mut progress)
}

/// Full orchestration, parameterized over prompts and progress for testing
pub fn execute(
    cfg: &RunConfig,
    decisions: &mut dyn DecisionProvider,
    progress: &mut dyn ProgressSink,
) -> Result<()> {
    let newest = snapshot::most_recent(&cfg.source_root)?.with_context(|| {
        format!("No dated folders found under {}", cfg.source_root.display())
    })?;
    log::info!("selected source folder '{}'", newest.name);

    let source_dir = newest.path.clone();
    let dest_dir = cfg.destination_root.join(&newest.name);

    ensure_capacity(&source_dir, &cfg.destination_root, decisions)?;

    if decisions.ask_copy_or_compare()? == CopyChoice::Copy {
        ui::info(&format!(
            "Copying folder {} to {}",
            source_dir.display(),
            dest_dir.display()
        ));
        let result = copier::copy_tree(&source_dir, &dest_dir, progress)?;
        ui::success(&format!(
            "Copied {} files ({})",
            result.files_copied,
            ui::format_size(result.bytes_copied)
        ));
    }

    if manifest::exists(&source_dir) && manifest::exists(&dest_dir) {
        match decisions.ask_regenerate_or_compare()? {
            ManifestChoice::Regenerate => {
                ui::warn("Re-generating file hashes. This can take a while on large sessions.");
                hash_both(&source_dir, &dest_dir)?;
                compare_and_report(&source_dir, &dest_dir)
            }
            ManifestChoice::CompareExisting => compare_and_report(&source_dir, &dest_dir),
            ManifestChoice::Unrecognized => {
                ui::error("Unrecognized choice; neither re-generating nor comparing.");
                Ok(())
            }
        }
    } else {
        ui::warn("Generating file hashes. This can take a while on large sessions.");
        hash_both(&source_dir, &dest_dir)?;
        compare_and_report(&source_dir, &dest_dir)
    }
}

/// Capacity gate: one eviction attempt, one re-check, then a fatal stop.
/// The fatal path exits non-zero rather than risking an overwrite of a
/// snapshot the operator may still need.
fn ensure_capacity(
    source_dir: &Path,
    dest_root: &Path,
    decisions: &mut dyn DecisionProvider,
) -> Result<()> {
    let report = capacity::check(source_dir, dest_root)?;
    ui::kv("Source size", &ui::format_size(report.source_size_bytes));
    ui::kv("Destination free", &ui::format_size(report.free_space_bytes));
    if report.sufficient {
        return Ok(());
    }

    ui::error("Not enough free space in the destination drive.");
    let outcome = capacity::evict_oldest(dest_root, decisions)?;
    evict::report_outcome(&outcome);

    let report = capacity::check(source_dir, dest_root)?;
    if !report.sufficient {
        bail!("Still not enough free space after deletion. Aborting operation.");
    }
    Ok(())
}

/// Hash source and destination concurrently. The targets are disjoint, so
/// the two workers share nothing; one side failing does not stop the other,
/// and both failures are reported before the first is returned.
fn hash_both(source_dir: &Path, dest_dir: &Path) -> Result<()> {
    let (source_result, dest_result) = rayon::join(
        || manifest::build_and_write(source_dir),
        || manifest::build_and_write(dest_dir),
    );

    if let Err(e) = &source_result {
        ui::error(&format!("Could not write hashes for {}: {e}", source_dir.display()));
    }
    if let Err(e) = &dest_result {
        ui::error(&format!("Could not write hashes for {}: {e}", dest_dir.display()));
    }

    source_result?;
    dest_result?;
    Ok(())
}

fn compare_and_report(source_dir: &Path, dest_dir: &Path) -> Result<()> {
    ui::info("Comparing file hashes.");
    let report = manifest::compare(source_dir, dest_dir)?;
    verify::print_report(&report);
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
