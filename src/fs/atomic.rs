//! Atomic, no-clobber file creation for output artifacts.
//!
//! # Implementation Strategy
//!
//! Every artifact is created the same way:
//! 1. Write content to a temporary file in the target directory
//! 2. Sync the file to disk (fsync)
//! 3. Publish it under the final name with `hard_link`, which fails if the
//!    name is already taken, then drop the temporary name
//!
//! Readers therefore see either no file or the complete file, and an
//! existing artifact is never replaced.
//!
//! # Important Notes
//!
//! - On filesystems without hard links, publishing falls back to an
//!   existence check followed by `rename()`. That fallback is only safe for a
//!   single writer, which is the only mode bsrs supports.
//! - On crash, a temporary file may remain (named `.{filename}.{pid}.tmp`)

use crate::error::{BsrsError, Result};
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Outcome of an [`atomic_create`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    /// The file did not exist and now holds the full content.
    Created,
    /// A file with that name already exists; nothing was written.
    AlreadyExists,
}

/// Atomically create a new file holding `content`.
///
/// Parent directories are created as needed. If `path` already exists the
/// existing file is left untouched and [`CreateOutcome::AlreadyExists`] is
/// returned so the caller can pick another name.
///
/// # Returns
///
/// * `Ok(CreateOutcome)` - The file was created, or the name was taken
/// * `Err(BsrsError::OutputWrite)` - On any I/O failure
pub fn atomic_create<P: AsRef<Path>>(path: P, content: &[u8]) -> Result<CreateOutcome> {
    let path = path.as_ref();

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent).map_err(|e| {
            BsrsError::output(
                path,
                format!("failed to create directory '{}': {}", parent.display(), e),
            )
        })?;
    }

    if path.exists() {
        return Ok(CreateOutcome::AlreadyExists);
    }

    let temp_path = generate_temp_path(path)?;
    write_and_sync(&temp_path, path, content)?;

    let outcome = publish(&temp_path, path);
    let _ = fs::remove_file(&temp_path);
    let outcome = outcome?;

    if outcome == CreateOutcome::Created {
        sync_parent(path);
    }
    Ok(outcome)
}

/// Convenience wrapper around [`atomic_create`] for string content.
pub fn atomic_create_file<P: AsRef<Path>>(path: P, content: &str) -> Result<CreateOutcome> {
    atomic_create(path, content.as_bytes())
}

/// Generate a temporary file path in the same directory as the target.
fn generate_temp_path(target: &Path) -> Result<PathBuf> {
    let parent = target.parent().unwrap_or(Path::new("."));
    let filename = target
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| BsrsError::output(target, "invalid file path"))?;

    let temp_name = format!(".{}.{}.tmp", filename, std::process::id());
    Ok(parent.join(temp_name))
}

/// Write content to the temporary file and sync it to disk.
fn write_and_sync(temp: &Path, target: &Path, content: &[u8]) -> Result<()> {
    let mut file = File::create(temp).map_err(|e| {
        BsrsError::output(
            target,
            format!("failed to create temporary file '{}': {}", temp.display(), e),
        )
    })?;

    if let Err(e) = file.write_all(content).and_then(|()| file.sync_all()) {
        let _ = fs::remove_file(temp);
        return Err(BsrsError::output(
            target,
            format!("failed to write temporary file: {}", e),
        ));
    }

    Ok(())
}

/// Publish the temporary file under the target name without replacing.
fn publish(temp: &Path, target: &Path) -> Result<CreateOutcome> {
    match fs::hard_link(temp, target) {
        Ok(()) => Ok(CreateOutcome::Created),
        Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(CreateOutcome::AlreadyExists),
        Err(e) => {
            tracing::debug!(error = %e, "hard link unavailable, falling back to rename");
            if target.exists() {
                return Ok(CreateOutcome::AlreadyExists);
            }
            fs::rename(temp, target).map_err(|e| {
                BsrsError::output(target, format!("failed to move file into place: {}", e))
            })?;
            Ok(CreateOutcome::Created)
        }
    }
}

/// Sync the parent directory so the new entry is persisted.
fn sync_parent(target: &Path) {
    if let Some(parent) = target.parent()
        && let Ok(dir) = File::open(parent)
    {
        let _ = dir.sync_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_atomic_create_new_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("prompt.md");

        let outcome = atomic_create(&file_path, b"hello world").unwrap();

        assert_eq!(outcome, CreateOutcome::Created);
        assert_eq!(fs::read_to_string(&file_path).unwrap(), "hello world");
    }

    #[test]
    fn test_atomic_create_never_replaces_existing() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("prompt.md");
        fs::write(&file_path, "original content").unwrap();

        let outcome = atomic_create(&file_path, b"new content").unwrap();

        assert_eq!(outcome, CreateOutcome::AlreadyExists);
        assert_eq!(fs::read_to_string(&file_path).unwrap(), "original content");
    }

    #[test]
    fn test_atomic_create_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("acme").join("phase_1").join("a.md");

        atomic_create_file(&file_path, "nested content").unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "nested content");
    }

    #[test]
    fn test_atomic_create_leaves_no_temp_files() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("prompt.md");

        atomic_create(&file_path, b"content").unwrap();
        fs::write(temp_dir.path().join("other.md"), "x").unwrap();
        atomic_create(&file_path, b"again").unwrap();

        let leftovers: Vec<_> = fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_generate_temp_path() {
        let target = Path::new("/some/path/file.md");
        let temp = generate_temp_path(target).unwrap();

        assert_eq!(temp.parent().unwrap(), Path::new("/some/path"));
        let name = temp.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with(".file.md."));
        assert!(name.ends_with(".tmp"));
    }

    #[test]
    fn test_atomic_create_unicode_content() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("report.md");
        let content = "# 競合分析\n\n| 企業 | シェア |\n";

        atomic_create_file(&file_path, content).unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), content);
    }

    #[test]
    fn test_atomic_create_empty_content() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("empty.md");

        atomic_create(&file_path, b"").unwrap();

        assert!(fs::read(&file_path).unwrap().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_atomic_create_reports_unwritable_directory() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let locked = temp_dir.path().join("locked");
        fs::create_dir(&locked).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o500)).unwrap();

        let result = atomic_create(locked.join("a.md"), b"x");

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o700)).unwrap();
        // Root ignores directory permissions, so only assert when it was denied.
        if let Err(err) = result {
            assert!(matches!(err, BsrsError::OutputWrite { .. }));
            assert!(!locked.join("a.md").exists());
        }
    }
}
