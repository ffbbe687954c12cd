//! Zip archive installation.
//!
//! [`install_archive`] unpacks a distributable zip into a target directory
//! unless that directory is already populated. Extraction goes through a
//! staging directory next to the target and is renamed into place, so an
//! interrupted run never leaves a half-filled target that a later run would
//! mistake for a finished install.

use crate::error::{Error, Result};
use std::fs::{self, File};
use std::path::Path;

/// What [`install_archive`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveReport {
    /// The target already had content; nothing was extracted.
    AlreadyPresent,
    /// The archive was extracted.
    Extracted {
        /// Number of entries (files and directories) in the archive.
        entries: usize,
    },
}

/// Whether `dir` exists and contains at least one entry.
#[must_use]
pub fn is_populated(dir: &Path) -> bool {
    fs::read_dir(dir)
        .map(|mut entries| entries.next().is_some())
        .unwrap_or(false)
}

/// Extract `zip_path` into `target_dir`, preserving directory structure.
///
/// Skips extraction when `target_dir` is already populated.
pub fn install_archive(zip_path: &Path, target_dir: &Path) -> Result<ArchiveReport> {
    if is_populated(target_dir) {
        log::info!("{} already populated, skipping extraction", target_dir.display());
        return Ok(ArchiveReport::AlreadyPresent);
    }

    let file = File::open(zip_path).map_err(|e| Error::io(zip_path, e))?;
    let mut archive = zip::ZipArchive::new(file).map_err(|e| Error::Archive {
        path: zip_path.to_path_buf(),
        message: e.to_string(),
    })?;
    let entries = archive.len();

    let parent = target_dir
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;

    let staging = tempfile::Builder::new()
        .prefix(".staging-")
        .tempdir_in(parent)
        .map_err(|e| Error::io(parent, e))?;

    archive.extract(staging.path()).map_err(|e| match e {
        zip::result::ZipError::Io(io) => Error::io(staging.path(), io),
        other => Error::Archive {
            path: zip_path.to_path_buf(),
            message: other.to_string(),
        },
    })?;

    // An empty target directory is not "present"; replace it.
    if target_dir.exists() {
        fs::remove_dir(target_dir).map_err(|e| Error::io(target_dir, e))?;
    }
    fs::rename(staging.path(), target_dir).map_err(|e| Error::io(target_dir, e))?;

    log::info!(
        "extracted {entries} entries from {} into {}",
        zip_path.display(),
        target_dir.display()
    );
    Ok(ArchiveReport::Extracted { entries })
}
