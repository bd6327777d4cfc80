//! Snapshot files on disk.
//!
//! One backup run produces one immutable JSON file under the backup
//! directory, named `backup_<YYYYMMDD>_<HHMMSS>.json`. The timestamp is
//! fixed width, so sorting filenames lexically sorts snapshots by capture
//! time. Files are never mutated or deleted once written.

pub mod diff;
pub mod snapshot;

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::error::{BackupError, CompareError};

/// One playlist entry. The `id` is the stable identity across snapshots;
/// the title is whatever the provider reported at capture time and may
/// change between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    pub id: String,
    pub title: String,
}

/// Filename for a snapshot captured at `taken_at`.
pub fn snapshot_filename(taken_at: DateTime<Local>) -> String {
    format!("backup_{}.json", taken_at.format("%Y%m%d_%H%M%S"))
}

/// Write a snapshot file for `videos` into `dir`, named from `taken_at`.
///
/// The content goes to a `.tmp` sibling first and is renamed into place, so
/// a partially written file never sits at the canonical name. Returns the
/// final path.
pub fn write_snapshot(
    dir: &Path,
    videos: &[Video],
    taken_at: DateTime<Local>,
) -> Result<PathBuf, BackupError> {
    let path = dir.join(snapshot_filename(taken_at));
    let body = serde_json::to_vec_pretty(videos).map_err(BackupError::Serialize)?;

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, body).map_err(|source| BackupError::Write {
        path: tmp.clone(),
        source,
    })?;
    fs::rename(&tmp, &path).map_err(|source| BackupError::Write {
        path: path.clone(),
        source,
    })?;

    Ok(path)
}

/// Parse one snapshot file back into its video sequence.
pub fn load_snapshot(path: &Path) -> Result<Vec<Video>, CompareError> {
    let data = fs::read(path).map_err(|source| CompareError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_slice(&data).map_err(|source| CompareError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// List snapshot files directly under `dir`, sorted lexically ascending by
/// file name. Subdirectories and in-progress `.tmp` files are skipped.
pub fn list_snapshot_files(dir: &Path) -> Result<Vec<PathBuf>, CompareError> {
    let read_dir = fs::read_dir(dir).map_err(|source| CompareError::ReadDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in read_dir {
        let entry = entry.map_err(|source| CompareError::ReadDir {
            path: dir.to_path_buf(),
            source,
        })?;

        if !entry.path().is_file() {
            continue;
        }
        if entry.file_name().to_string_lossy().ends_with(".tmp") {
            continue;
        }

        files.push(entry.path());
    }

    // lexical order equals capture order thanks to the fixed-width timestamp
    files.sort_by_key(|p| p.file_name().map(|n| n.to_os_string()));
    Ok(files)
}
