//! Snapshot comparison engine.
//!
//! Loads the two most recent snapshots from the backup directory and reports
//! videos that disappeared between them:
//! - An id present in the previous snapshot but absent from the latest
//! - An id still present but retitled to the provider's tombstone, meaning
//!   the entry remains in the playlist while the video itself is gone

use std::collections::HashMap;
use std::path::Path;

use crate::error::CompareError;
use crate::store::{self, Video};

/// Title YouTube substitutes for playlist entries whose video was removed
/// or made private. Provider-specific; callers can pass a different string.
pub const DEFAULT_TOMBSTONE_TITLE: &str = "Deleted video";

/// Compare the two most recent snapshots under `snapshot_dir` and return the
/// videos removed between them, in previous-snapshot order.
///
/// Fails if the directory cannot be read, holds fewer than two snapshots, or
/// either snapshot fails to parse. An empty result is a successful "nothing
/// was removed", not an error.
pub fn compare_latest_two(
    snapshot_dir: &Path,
    tombstone_title: &str,
) -> Result<Vec<Video>, CompareError> {
    let files = store::list_snapshot_files(snapshot_dir)?;
    if files.len() < 2 {
        return Err(CompareError::InsufficientSnapshots { found: files.len() });
    }

    let previous_path = &files[files.len() - 2];
    let latest_path = &files[files.len() - 1];

    let previous = store::load_snapshot(previous_path)?;
    let latest = store::load_snapshot(latest_path)?;

    Ok(find_removed(&previous, &latest, tombstone_title))
}

/// Videos from `previous` whose id is missing from `latest` or mapped to the
/// tombstone title there. Output order follows `previous`.
pub fn find_removed(previous: &[Video], latest: &[Video], tombstone_title: &str) -> Vec<Video> {
    let latest_titles: HashMap<&str, &str> = latest
        .iter()
        .map(|v| (v.id.as_str(), v.title.as_str()))
        .collect();

    previous
        .iter()
        .filter(|v| match latest_titles.get(v.id.as_str()) {
            None => true,
            Some(title) => *title == tombstone_title,
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video(id: &str, title: &str) -> Video {
        Video {
            id: id.to_string(),
            title: title.to_string(),
        }
    }

    fn removed(previous: &[Video], latest: &[Video]) -> Vec<Video> {
        find_removed(previous, latest, DEFAULT_TOMBSTONE_TITLE)
    }

    #[test]
    fn missing_id_is_removed() {
        let previous = vec![video("a", "Foo"), video("b", "Bar")];
        let latest = vec![video("a", "Foo")];

        assert_eq!(removed(&previous, &latest), vec![video("b", "Bar")]);
    }

    #[test]
    fn tombstoned_id_is_removed_with_its_old_title() {
        let previous = vec![video("a", "Foo")];
        let latest = vec![video("a", "Deleted video")];

        assert_eq!(removed(&previous, &latest), vec![video("a", "Foo")]);
    }

    #[test]
    fn identical_snapshots_remove_nothing() {
        let videos = vec![video("a", "Foo"), video("b", "Bar")];

        assert!(removed(&videos, &videos).is_empty());
    }

    #[test]
    fn retitled_video_is_not_removed() {
        let previous = vec![video("a", "Foo")];
        let latest = vec![video("a", "Foo (remastered)")];

        assert!(removed(&previous, &latest).is_empty());
    }

    #[test]
    fn output_preserves_previous_order() {
        let previous = vec![
            video("c", "Third"),
            video("a", "First"),
            video("b", "Second"),
        ];
        let latest = vec![video("a", "First")];

        assert_eq!(
            removed(&previous, &latest),
            vec![video("c", "Third"), video("b", "Second")]
        );
    }

    #[test]
    fn tombstone_title_is_configurable() {
        let previous = vec![video("a", "Foo")];
        let latest = vec![video("a", "[gone]")];

        assert!(find_removed(&previous, &latest, DEFAULT_TOMBSTONE_TITLE).is_empty());
        assert_eq!(
            find_removed(&previous, &latest, "[gone]"),
            vec![video("a", "Foo")]
        );
    }

    #[test]
    fn empty_previous_removes_nothing() {
        assert!(removed(&[], &[video("a", "Foo")]).is_empty());
        assert!(removed(&[], &[]).is_empty());
    }

    #[test]
    fn compare_fails_without_two_snapshots() {
        let dir = tempfile::tempdir().unwrap();

        let err = compare_latest_two(dir.path(), DEFAULT_TOMBSTONE_TITLE).unwrap_err();
        assert!(matches!(
            err,
            CompareError::InsufficientSnapshots { found: 0 }
        ));

        std::fs::write(dir.path().join("backup_20240101_120000.json"), b"[]").unwrap();
        let err = compare_latest_two(dir.path(), DEFAULT_TOMBSTONE_TITLE).unwrap_err();
        assert!(matches!(
            err,
            CompareError::InsufficientSnapshots { found: 1 }
        ));
    }

    #[test]
    fn compare_fails_on_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");

        let err = compare_latest_two(&missing, DEFAULT_TOMBSTONE_TITLE).unwrap_err();
        assert!(matches!(err, CompareError::ReadDir { .. }));
    }

    #[test]
    fn compare_picks_the_two_lexically_latest_files() {
        let dir = tempfile::tempdir().unwrap();
        let write = |name: &str, videos: &[Video]| {
            let body = serde_json::to_vec_pretty(videos).unwrap();
            std::fs::write(dir.path().join(name), body).unwrap();
        };

        // oldest snapshot still contains "b"; it must not influence the diff
        write(
            "backup_20240101_120000.json",
            &[video("a", "Foo"), video("b", "Bar")],
        );
        write(
            "backup_20240102_120000.json",
            &[video("a", "Foo"), video("c", "Baz")],
        );
        write("backup_20240103_120000.json", &[video("a", "Foo")]);

        let removed = compare_latest_two(dir.path(), DEFAULT_TOMBSTONE_TITLE).unwrap();
        assert_eq!(removed, vec![video("c", "Baz")]);
    }

    #[test]
    fn compare_fails_on_malformed_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("backup_20240101_120000.json"), b"[]").unwrap();
        std::fs::write(dir.path().join("backup_20240102_120000.json"), b"{oops").unwrap();

        let err = compare_latest_two(dir.path(), DEFAULT_TOMBSTONE_TITLE).unwrap_err();
        match err {
            CompareError::Parse { path, .. } => {
                assert!(path.ends_with("backup_20240102_120000.json"));
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }
}
