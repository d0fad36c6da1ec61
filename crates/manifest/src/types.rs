//! Data types for the manifest crate

use std::collections::HashMap;

/// One hashed file: where it was found, its base name, and its content digest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// Path to the file as recorded at hash time
    pub path: String,
    /// Base file name, the comparison key
    pub file_name: String,
    /// Lowercase hex BLAKE3 digest of the file content
    pub digest: String,
}

/// An ordered collection of manifest entries for one directory tree
#[derive(Debug, Clone, Default)]
pub struct ManifestSet {
    entries: Vec<ManifestEntry>,
}

impl ManifestSet {
    pub fn new(entries: Vec<ManifestEntry>) -> Self {
        Self { entries }
    }

    /// Entries in traversal order
    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Name-to-digest map used for comparison.
    ///
    /// Keyed by base file name: a later entry with the same name shadows an
    /// earlier one, matching the manifest files already in the field.
    pub fn digests_by_name(&self) -> HashMap<&str, &str> {
        self.entries
            .iter()
            .map(|e| (e.file_name.as_str(), e.digest.as_str()))
            .collect()
    }

    /// First recorded path for a file name, in traversal order
    pub fn source_path(&self, file_name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.file_name == file_name)
            .map(|e| e.path.as_str())
    }
}

/// A file reported as modified between two manifests
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModifiedFile {
    pub file_name: String,
    /// Path recorded in the source manifest, for operator-readable reporting
    pub source_path: Option<String>,
    /// Digest recorded on the source side
    pub source_digest: String,
}

/// Outcome of comparing a source manifest against a destination manifest
#[derive(Debug, Clone, Default)]
pub struct ComparisonReport {
    /// File names present in the source manifest but absent from the destination
    pub missing: Vec<String>,
    /// Files whose destination digest differs or is absent.
    ///
    /// The two lists are computed independently: a file with no destination
    /// digest at all counts as modified too, so it shows up in both.
    pub modified: Vec<ModifiedFile>,
}

impl ComparisonReport {
    /// True when no source file has a differing or absent destination digest
    pub fn is_unmodified(&self) -> bool {
        self.modified.is_empty()
    }
}
