//! Sequential tree copy with byte-level progress.
//!
//! Copying is deliberately single-threaded: one spinning disk at a time,
//! and the progress accounting stays monotonic.

use anyhow::{Context, Result};
use filetime::FileTime;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::progress::ProgressSink;

/// One file scheduled for copying
#[derive(Debug, Clone)]
pub struct FileCopyTask {
    pub source: PathBuf,
    pub dest: PathBuf,
    pub size: u64,
}

/// Summary of a completed tree copy
#[derive(Debug, Clone, Copy, Default)]
pub struct CopyResult {
    pub files_copied: usize,
    pub bytes_copied: u64,
}

/// Enumerate every regular file under `source`, paired with its destination
pub fn collect_tasks(source: &Path, dest: &Path) -> Result<Vec<FileCopyTask>> {
    let mut tasks = Vec::new();
    for entry in WalkDir::new(source).follow_links(false) {
        let entry = entry.context("Failed to read directory entry")?;
        if !entry.file_type().is_file() {
            continue;
        }
        let rel_path = entry.path().strip_prefix(source).unwrap_or(entry.path());
        let metadata = entry.metadata().context("Failed to read metadata")?;
        tasks.push(FileCopyTask {
            source: entry.path().to_path_buf(),
            dest: dest.join(rel_path),
            size: metadata.len(),
        });
    }
    Ok(tasks)
}

/// Copy `source` into `dest`, mirroring structure and preserving metadata.
///
/// All destination directories are created before the first file copy.
/// Existing files are always overwritten. The first failing file aborts
/// the copy; whatever was already written stays in place.
pub fn copy_tree(
    source: &Path,
    dest: &Path,
    progress: &mut dyn ProgressSink,
) -> Result<CopyResult> {
    let tasks = collect_tasks(source, dest)?;
    let bytes_total: u64 = tasks.iter().map(|t| t.size).sum();

    fs::create_dir_all(dest).with_context(|| format!("Failed to create {}", dest.display()))?;
    for task in &tasks {
        if let Some(parent) = task.dest.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }

    progress.on_start(bytes_total);

    let mut result = CopyResult::default();
    for task in &tasks {
        let rel_path = task.source.strip_prefix(source).unwrap_or(&task.source);
        progress.on_file(&rel_path.display().to_string());

        copy_file(task).with_context(|| format!("Failed to copy {}", rel_path.display()))?;

        result.files_copied += 1;
        result.bytes_copied += task.size;
        progress.on_advance(task.size);
    }

    progress.on_finish();
    Ok(result)
}

/// Copy one file, carrying over permission bits and modification time.
/// `fs::copy` brings the permissions; the mtime is restored separately.
fn copy_file(task: &FileCopyTask) -> std::io::Result<()> {
    fs::copy(&task.source, &task.dest)?;
    let metadata = fs::metadata(&task.source)?;
    filetime::set_file_mtime(&task.dest, FileTime::from_last_modification_time(&metadata))?;
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NoProgress;
    use tempfile::TempDir;

    /// Records every sink call for assertions
    #[derive(Default)]
    struct RecordingSink {
        total: u64,
        advances: Vec<u64>,
        files: Vec<String>,
        finished: bool,
    }

    impl ProgressSink for RecordingSink {
        fn on_start(&mut self, bytes_total: u64) {
            self.total = bytes_total;
        }
        fn on_file(&mut self, rel_path: &str) {
            self.files.push(rel_path.to_string());
        }
        fn on_advance(&mut self, bytes: u64) {
            self.advances.push(bytes);
        }
        fn on_finish(&mut self) {
            self.finished = true;
        }
    }

    #[test]
    fn test_collect_tasks_mirrors_relative_paths() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        fs::create_dir_all(src.join("takes")).unwrap();
        fs::write(src.join("a.wav"), "x").unwrap();
        fs::write(src.join("takes").join("b.wav"), "yy").unwrap();

        let tasks = collect_tasks(&src, &tmp.path().join("dst")).unwrap();
        assert_eq!(tasks.len(), 2);
        let total: u64 = tasks.iter().map(|t| t.size).sum();
        assert_eq!(total, 3);
        assert!(tasks
            .iter()
            .any(|t| t.dest == tmp.path().join("dst").join("takes").join("b.wav")));
    }

    #[test]
    fn test_copy_tree_full_scenario() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("2024-05-01 Session");
        let dst = tmp.path().join("backup").join("2024-05-01 Session");
        fs::create_dir_all(src.join("takes")).unwrap();
        fs::write(src.join("a.wav"), "content X").unwrap();
        fs::write(src.join("takes").join("b.wav"), "content Y").unwrap();

        let mut sink = RecordingSink::default();
        let result = copy_tree(&src, &dst, &mut sink).unwrap();

        assert_eq!(result.files_copied, 2);
        assert_eq!(result.bytes_copied, 18);
        assert_eq!(fs::read_to_string(dst.join("a.wav")).unwrap(), "content X");
        assert_eq!(
            fs::read_to_string(dst.join("takes").join("b.wav")).unwrap(),
            "content Y"
        );

        assert_eq!(sink.total, 18);
        assert_eq!(sink.advances.iter().sum::<u64>(), 18);
        assert_eq!(sink.files.len(), 2);
        assert!(sink.finished);
    }

    #[test]
    fn test_copy_tree_overwrites_existing_files() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        let dst = tmp.path().join("dst");
        fs::create_dir_all(&src).unwrap();
        fs::create_dir_all(&dst).unwrap();
        fs::write(src.join("a.wav"), "new content").unwrap();
        fs::write(dst.join("a.wav"), "stale").unwrap();

        copy_tree(&src, &dst, &mut NoProgress).unwrap();
        assert_eq!(fs::read_to_string(dst.join("a.wav")).unwrap(), "new content");
    }

    #[test]
    fn test_copy_preserves_mtime() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        let dst = tmp.path().join("dst");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("a.wav"), "content").unwrap();

        // Backdate the source file
        let mtime = FileTime::from_unix_time(1_704_067_200, 0);
        filetime::set_file_mtime(src.join("a.wav"), mtime).unwrap();

        copy_tree(&src, &dst, &mut NoProgress).unwrap();

        let copied = fs::metadata(dst.join("a.wav")).unwrap();
        assert_eq!(FileTime::from_last_modification_time(&copied), mtime);
    }

    #[test]
    fn test_copy_empty_tree() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        let dst = tmp.path().join("dst");
        fs::create_dir_all(&src).unwrap();

        let result = copy_tree(&src, &dst, &mut NoProgress).unwrap();
        assert_eq!(result.files_copied, 0);
        assert!(dst.is_dir());
    }
}
