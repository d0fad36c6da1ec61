//! # Manifest
//!
//! Content-hash manifests for backup verification.
//!
//! A manifest is a `hashes.csv` table stored inside a directory, mapping
//! every regular file under that directory to a BLAKE3 digest of its
//! content. Building a manifest overwrites any previous one wholesale;
//! comparison loads the persisted tables of two directories and classifies
//! source entries as missing or modified at the destination.
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! let set = manifest::build_and_write(Path::new("/backups/2024-05-01 Session"))?;
//! println!("hashed {} files", set.len());
//!
//! let report = manifest::compare(
//!     Path::new("/projects/2024-05-01 Session"),
//!     Path::new("/backups/2024-05-01 Session"),
//! )?;
//! if report.is_unmodified() {
//!     println!("no files modified");
//! }
//! # Ok::<(), manifest::Error>(())
//! ```

mod csv;
mod error;
mod types;

pub use error::{Error, Result};
pub use types::{ComparisonReport, ManifestEntry, ManifestSet, ModifiedFile};

use blake3::Hasher;
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use walkdir::WalkDir;

/// Reserved file name for the persisted manifest inside a hashed directory
pub const MANIFEST_FILE: &str = "hashes.csv";

/// Streaming chunk size. Large chunks keep syscall overhead low on
/// multi-gigabyte media files.
const CHUNK_SIZE: usize = 16 * 1024 * 1024;

const HEADER: [&str; 3] = ["Path", "FileName", "Hash"];

/// Build a manifest covering every regular file under `dir`.
///
/// Entries are recorded in traversal order. The reserved manifest file
/// itself is excluded so that rebuilding stays stable.
pub fn build(dir: &Path) -> Result<ManifestSet> {
    if !dir.is_dir() {
        return Err(Error::PathNotFound(dir.to_path_buf()));
    }

    let mut entries = Vec::new();
    for entry in WalkDir::new(dir) {
        let entry = entry.map_err(|e| Error::Io(e.into()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let file_name = entry.file_name().to_string_lossy().to_string();
        if file_name == MANIFEST_FILE {
            continue;
        }
        let digest = hash_file(entry.path()).map_err(|e| Error::HashFailed {
            path: entry.path().to_path_buf(),
            source: e,
        })?;
        entries.push(ManifestEntry {
            path: entry.path().to_string_lossy().to_string(),
            file_name,
            digest,
        });
    }

    Ok(ManifestSet::new(entries))
}

/// Persist `set` as the reserved manifest file inside `dir`.
///
/// The whole table is rendered before the file is touched, so an unwritable
/// target leaves no partial manifest behind. Any previous manifest is
/// replaced; there is no incremental update.
pub fn write(dir: &Path, set: &ManifestSet) -> Result<()> {
    let mut table = String::new();
    table.push_str(&csv::encode_record(&HEADER));
    table.push('\n');
    for entry in set.entries() {
        table.push_str(&csv::encode_record(&[
            entry.path.as_str(),
            entry.file_name.as_str(),
            entry.digest.as_str(),
        ]));
        table.push('\n');
    }

    std::fs::write(dir.join(MANIFEST_FILE), table)?;
    Ok(())
}

/// Build and persist in one step
pub fn build_and_write(dir: &Path) -> Result<ManifestSet> {
    let set = build(dir)?;
    write(dir, &set)?;
    Ok(set)
}

/// Whether `dir` holds a persisted manifest
pub fn exists(dir: &Path) -> bool {
    dir.join(MANIFEST_FILE).is_file()
}

/// Load the persisted manifest from `dir`
pub fn load(dir: &Path) -> Result<ManifestSet> {
    let path = dir.join(MANIFEST_FILE);
    if !path.is_file() {
        return Err(Error::ManifestNotFound(path));
    }

    let text = std::fs::read_to_string(&path)?;
    let mut records = csv::decode(&text).into_iter();

    let header = records.next().unwrap_or_default();
    if header != HEADER {
        return Err(Error::Malformed {
            path,
            reason: format!("expected columns Path,FileName,Hash, found {}", header.join(",")),
        });
    }

    let mut entries = Vec::new();
    for (idx, fields) in records.enumerate() {
        match <[String; 3]>::try_from(fields) {
            Ok([file_path, file_name, digest]) => entries.push(ManifestEntry {
                path: file_path,
                file_name,
                digest,
            }),
            Err(fields) => {
                return Err(Error::Malformed {
                    path,
                    reason: format!("row {}: expected 3 columns, found {}", idx + 2, fields.len()),
                });
            }
        }
    }

    Ok(ManifestSet::new(entries))
}

/// Compare the persisted manifests of two directories.
///
/// Fails with [`Error::ManifestNotFound`] if either side has no manifest.
/// Neither directory is touched.
pub fn compare(source_dir: &Path, dest_dir: &Path) -> Result<ComparisonReport> {
    let source = load(source_dir)?;
    let dest = load(dest_dir)?;
    Ok(compare_sets(&source, &dest))
}

/// Compare two in-memory manifest sets.
///
/// `missing` holds source file names absent from the destination manifest.
/// `modified` holds source files whose destination digest differs; a name
/// with no destination digest at all counts as modified as well, so such a
/// file appears in both lists. Modified entries carry the first source path
/// recorded for that name, in traversal order.
pub fn compare_sets(source: &ManifestSet, dest: &ManifestSet) -> ComparisonReport {
    let source_digests = source.digests_by_name();
    let dest_digests = dest.digests_by_name();

    let mut missing: Vec<String> = source_digests
        .keys()
        .filter(|name| !dest_digests.contains_key(*name))
        .map(ToString::to_string)
        .collect();
    missing.sort_unstable();

    let mut modified = Vec::new();
    let mut seen = HashSet::new();
    for entry in source.entries() {
        if !seen.insert(entry.file_name.as_str()) {
            continue;
        }
        let Some(&digest) = source_digests.get(entry.file_name.as_str()) else {
            continue;
        };
        if dest_digests.get(entry.file_name.as_str()) != Some(&digest) {
            modified.push(ModifiedFile {
                file_name: entry.file_name.clone(),
                source_path: source.source_path(&entry.file_name).map(ToString::to_string),
                source_digest: digest.to_string(),
            });
        }
    }

    ComparisonReport { missing, modified }
}

/// Stream a file through BLAKE3, returning the lowercase hex digest
fn hash_file(path: &Path) -> std::io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Hasher::new();
    let mut buffer = vec![0u8; CHUNK_SIZE];

    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hasher.finalize().to_hex().to_string())
}

// ============================================================================
// Tests
// ============================================================================
