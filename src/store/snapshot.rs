//! Snapshot builder.
//!
//! Captures the full current membership of a playlist through an injected
//! fetch capability and persists it as one dated file. The capability is
//! expected to have done all pagination itself; the builder invokes it once
//! and passes its failure through without retrying.

use std::fs;
use std::path::Path;

use chrono::Local;

use crate::error::BackupError;
use crate::store::{self, Video};

/// Build one snapshot under `dest_dir` from whatever `fetch_all` returns.
///
/// Creates `dest_dir` (including parents) if needed, writes exactly one new
/// snapshot file named from the current local time, and returns the number
/// of videos written. An empty playlist is a valid snapshot with count 0.
pub fn build_snapshot<F, E>(fetch_all: F, dest_dir: &Path) -> Result<usize, BackupError>
where
    F: FnOnce() -> Result<Vec<Video>, E>,
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    fs::create_dir_all(dest_dir).map_err(|source| BackupError::CreateDir {
        path: dest_dir.to_path_buf(),
        source,
    })?;

    let videos = fetch_all().map_err(|e| BackupError::Fetch(e.into()))?;

    store::write_snapshot(dest_dir, &videos, Local::now())?;
    Ok(videos.len())
}
