//! Result-artifact discovery.
//!
//! The external analyzers' output naming is not perfectly predictable from
//! the caller's side (clock skew, retries, legacy naming), so every lookup
//! has a fuzzy fallback: scan a known directory for names containing a
//! reduced base string and prefer the most recently modified candidate.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Prefixes stripped from a requested artifact name before relaxed matching.
const STRIP_PREFIXES: &[&str] = &["skeleton_", "result_"];

/// Suffixes stripped from the requested stem before relaxed matching.
const STRIP_SUFFIXES: &[&str] = &["_openpose_skeleton_h264", "_result"];

/// Find the analysis result artifact.
///
/// Returns `expected` when it exists; otherwise scans `search_dir` for
/// files whose name contains `fallback_stem` (the stored video name minus
/// its extension) and returns the most recently modified match.
pub fn locate_result(
    expected: &Path,
    search_dir: &Path,
    fallback_stem: &str,
) -> Option<PathBuf> {
    if expected.is_file() {
        return Some(expected.to_path_buf());
    }
    let found = newest_containing(search_dir, fallback_stem)?;
    tracing::info!(
        expected = %expected.display(),
        found = %found.display(),
        "expected result file missing, using fuzzy fallback"
    );
    Some(found)
}

/// Serve-side artifact lookup with relaxed matching.
///
/// Exact name first. If absent, known prefixes/suffixes are stripped from
/// the requested stem and any file containing the reduced string matches,
/// newest wins. This lets a request for `skeleton_foo.mp4` find
/// `foo_openpose_skeleton_h264.mp4` and vice versa.
pub fn relaxed_lookup(dir: &Path, requested: &str) -> Option<PathBuf> {
    let exact = dir.join(requested);
    if exact.is_file() {
        return Some(exact);
    }

    let stem = crate::storage::file_stem(requested);
    let mut reduced = stem;
    for prefix in STRIP_PREFIXES {
        if let Some(rest) = reduced.strip_prefix(prefix) {
            reduced = rest;
        }
    }
    for suffix in STRIP_SUFFIXES {
        if let Some(rest) = reduced.strip_suffix(suffix) {
            reduced = rest;
        }
    }
    if reduced.is_empty() {
        return None;
    }
    newest_containing(dir, reduced)
}

/// Most recently modified regular file in `dir` whose name contains
/// `needle`. The mtime tie-break is best-effort and not race-free under
/// concurrent writers to the directory.
fn newest_containing(dir: &Path, needle: &str) -> Option<PathBuf> {
    let entries = std::fs::read_dir(dir).ok()?;
    let mut best: Option<(SystemTime, PathBuf)> = None;
    for entry in entries.flatten() {
        let name = entry.file_name();
        if !name.to_string_lossy().contains(needle) {
            continue;
        }
        let Ok(meta) = entry.metadata() else { continue };
        if !meta.is_file() {
            continue;
        }
        let modified = meta.modified().unwrap_or(SystemTime::UNIX_EPOCH);
        if best.as_ref().is_none_or(|(t, _)| modified > *t) {
            best = Some((modified, entry.path()));
        }
    }
    best.map(|(_, path)| path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::time::Duration;

    fn touch(dir: &Path, name: &str, age_secs: u64) -> PathBuf {
        let path = dir.join(name);
        let file = File::create(&path).unwrap();
        file.set_modified(SystemTime::now() - Duration::from_secs(age_secs))
            .unwrap();
        path
    }

    #[test]
    fn exact_result_path_wins() {
        let dir = tempfile::tempdir().unwrap();
        let expected = touch(dir.path(), "result_42_swing.mp4.json", 0);
        assert_eq!(
            locate_result(&expected, dir.path(), "42_swing"),
            Some(expected)
        );
    }

    #[test]
    fn fuzzy_fallback_prefers_newest() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "42_swing_old.json", 300);
        let newest = touch(dir.path(), "42_swing_retry.json", 5);
        touch(dir.path(), "unrelated.json", 1);

        let expected = dir.path().join("result_42_swing.mp4.json");
        assert_eq!(
            locate_result(&expected, dir.path(), "42_swing"),
            Some(newest)
        );
    }

    #[test]
    fn no_candidate_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let expected = dir.path().join("result_42_swing.mp4.json");
        assert_eq!(locate_result(&expected, dir.path(), "42_swing"), None);
    }

    #[test]
    fn relaxed_lookup_exact_first() {
        let dir = tempfile::tempdir().unwrap();
        let exact = touch(dir.path(), "skeleton_foo.mp4", 0);
        // A fuzzy candidate also exists but exact match takes priority.
        touch(dir.path(), "foo_openpose_skeleton_h264.mp4", 0);
        assert_eq!(relaxed_lookup(dir.path(), "skeleton_foo.mp4"), Some(exact));
    }

    #[test]
    fn relaxed_lookup_strips_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let derived = touch(dir.path(), "foo_openpose_skeleton_h264.mp4", 0);
        assert_eq!(
            relaxed_lookup(dir.path(), "skeleton_foo.mp4"),
            Some(derived)
        );
    }

    #[test]
    fn relaxed_lookup_strips_suffix() {
        let dir = tempfile::tempdir().unwrap();
        let plain = touch(dir.path(), "skeleton_foo.mp4", 0);
        assert_eq!(
            relaxed_lookup(dir.path(), "foo_openpose_skeleton_h264.mp4"),
            Some(plain)
        );
    }

    #[test]
    fn relaxed_lookup_nothing_matches() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "bar.mp4", 0);
        assert_eq!(relaxed_lookup(dir.path(), "skeleton_foo.mp4"), None);
    }

    #[test]
    fn empty_reduced_stem_never_matches_everything() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "bar.mp4", 0);
        assert_eq!(relaxed_lookup(dir.path(), "skeleton_.mp4"), None);
    }
}
