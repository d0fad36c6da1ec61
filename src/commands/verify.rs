//! `snapsync verify` - compare the persisted manifests of two directories

use anyhow::Result;
use std::path::Path;

use crate::ui;

pub fn run(source_dir: &Path, dest_dir: &Path) -> Result<()> {
    ui::info("Comparing file hashes.");
    let report = manifest::compare(source_dir, dest_dir)?;
    print_report(&report);
    Ok(())
}

/// Print missing and modified files the way the operator expects them:
/// missing by name, modified by stored source path and digest.
pub fn print_report(report: &manifest::ComparisonReport) {
    if !report.missing.is_empty() {
        ui::error("The following files are missing in the destination folder:");
        for file_name in &report.missing {
            ui::dim(file_name);
        }
    }

    if report.is_unmodified() {
        ui::success("No files have been modified.");
    } else {
        ui::warn("The following files have been modified:");
        for file in &report.modified {
            let path = file.source_path.as_deref().unwrap_or(&file.file_name);
            println!("  {} - {}", path, file.source_digest);
        }
    }
}
