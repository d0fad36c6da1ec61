//! Capacity checks and snapshot eviction.
//!
//! Policy lives in the orchestrator: one eviction attempt, one re-check,
//! then a fatal stop. This module only measures and deletes.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::prompt::DecisionProvider;
use crate::snapshot;

/// Space situation for one prospective copy
#[derive(Debug, Clone, Copy)]
pub struct CapacityReport {
    pub source_size_bytes: u64,
    pub free_space_bytes: u64,
    pub sufficient: bool,
}

/// Outcome of one eviction attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvictionOutcome {
    Deleted(String),
    NoneFound,
    UserDeclined,
    AlreadyGone(String),
}

/// Total size of all regular files under `dir` (recursive)
pub fn dir_size(dir: &Path) -> Result<u64> {
    let mut total = 0u64;
    for entry in WalkDir::new(dir).follow_links(false) {
        let entry = entry.context("Failed to read directory entry")?;
        if entry.file_type().is_file() {
            total += entry.metadata().context("Failed to read metadata")?.len();
        }
    }
    Ok(total)
}

/// Check whether the filesystem housing `dest_root` can take `source_dir`
pub fn check(source_dir: &Path, dest_root: &Path) -> Result<CapacityReport> {
    let source_size_bytes = dir_size(source_dir)?;
    let free_space_bytes = free_space(dest_root)?;
    Ok(CapacityReport {
        source_size_bytes,
        free_space_bytes,
        sufficient: is_sufficient(source_size_bytes, free_space_bytes),
    })
}

/// Sufficiency rule: the copy fits unless the source is strictly larger
/// than the free space. Equality passes.
fn is_sufficient(source_size_bytes: u64, free_space_bytes: u64) -> bool {
    source_size_bytes <= free_space_bytes
}

/// Free space on the filesystem housing `path`, from block counts
#[cfg(unix)]
pub fn free_space(path: &Path) -> Result<u64> {
    use std::ffi::CString;
    use std::mem::MaybeUninit;

    // Fall back to the parent if the destination root does not exist yet
    let check_path = if path.exists() {
        path.to_path_buf()
    } else {
        path.parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("/"))
    };

    let path_str = check_path.to_string_lossy();
    let c_path = CString::new(path_str.as_ref()).context("Invalid path")?;

    // SAFETY: statvfs is a standard POSIX call
    let available = unsafe {
        let mut stat: MaybeUninit<libc::statvfs> = MaybeUninit::uninit();
        let result = libc::statvfs(c_path.as_ptr(), stat.as_mut_ptr());

        if result != 0 {
            anyhow::bail!("Failed to check free space for {}", check_path.display());
        }

        let stat = stat.assume_init();

        // Cast needed on macOS, not on Linux
        #[allow(clippy::unnecessary_cast)]
        let avail = stat.f_bavail as u64 * stat.f_frsize as u64;
        avail
    };

    Ok(available)
}

#[cfg(not(unix))]
pub fn free_space(_path: &Path) -> Result<u64> {
    anyhow::bail!("Cannot check free space on this platform")
}

/// Delete the oldest dated snapshot under `dest_root`, after confirmation.
///
/// A candidate that vanishes between selection and deletion is reported as
/// [`EvictionOutcome::AlreadyGone`] rather than an error.
pub fn evict_oldest(
    dest_root: &Path,
    decisions: &mut dyn DecisionProvider,
) -> Result<EvictionOutcome> {
    let Some(candidate) = snapshot::oldest(dest_root)? else {
        return Ok(EvictionOutcome::NoneFound);
    };

    if !decisions.confirm_eviction(&candidate.name)? {
        return Ok(EvictionOutcome::UserDeclined);
    }

    match std::fs::remove_dir_all(&candidate.path) {
        Ok(()) => Ok(EvictionOutcome::Deleted(candidate.name)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Ok(EvictionOutcome::AlreadyGone(candidate.name))
        }
        Err(e) => {
            Err(e).with_context(|| format!("Failed to delete {}", candidate.path.display()))
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
