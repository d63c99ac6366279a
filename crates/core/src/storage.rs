//! Filename and on-disk artifact helpers for the upload directories.

use std::path::{Component, Path, PathBuf};

use crate::error::CoreError;

/// Compute a collision-safe filename inside `dir`.
///
/// Probes `name` first, then `stem_1.ext`, `stem_2.ext`, ... until a free
/// name is found. Deterministic within one request; two concurrent identical
/// uploads can still race for the same suffix (known limitation).
pub fn unique_filename(dir: &Path, name: &str) -> String {
    if !dir.join(name).exists() {
        return name.to_string();
    }
    let (stem, ext) = split_name(name);
    let mut counter = 1;
    loop {
        let candidate = if ext.is_empty() {
            format!("{stem}_{counter}")
        } else {
            format!("{stem}_{counter}.{ext}")
        };
        if !dir.join(&candidate).exists() {
            return candidate;
        }
        counter += 1;
    }
}

/// Split a filename on its last dot. No dot means an empty extension.
pub fn split_name(name: &str) -> (&str, &str) {
    match name.rsplit_once('.') {
        Some((stem, ext)) => (stem, ext),
        None => (name, ""),
    }
}

/// Filename minus its extension.
pub fn file_stem(name: &str) -> &str {
    split_name(name).0
}

/// Resolve a client-supplied filename inside `base`, rejecting anything
/// that would escape it (absolute paths, `..`, drive prefixes).
pub fn resolve_confined(base: &Path, name: &str) -> Result<PathBuf, CoreError> {
    let relative = Path::new(name);
    if relative.is_absolute() {
        return Err(CoreError::Validation(format!(
            "absolute paths are not allowed: {name}"
        )));
    }
    for component in relative.components() {
        match component {
            Component::Normal(_) => {}
            _ => {
                return Err(CoreError::Validation(format!(
                    "invalid path segment in '{name}'"
                )))
            }
        }
    }
    Ok(base.join(relative))
}

/// Best-effort file removal used when tearing down a video's artifacts.
pub fn remove_if_exists(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => tracing::info!(path = %path.display(), "deleted file"),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!(path = %path.display(), "file to delete does not exist");
        }
        Err(err) => {
            tracing::error!(path = %path.display(), error = %err, "failed to delete file");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_upload_keeps_its_name() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(unique_filename(dir.path(), "swing.mp4"), "swing.mp4");
    }

    #[test]
    fn collisions_get_monotonic_suffixes() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("swing.mp4"), b"").unwrap();
        assert_eq!(unique_filename(dir.path(), "swing.mp4"), "swing_1.mp4");

        std::fs::write(dir.path().join("swing_1.mp4"), b"").unwrap();
        assert_eq!(unique_filename(dir.path(), "swing.mp4"), "swing_2.mp4");

        std::fs::write(dir.path().join("swing_2.mp4"), b"").unwrap();
        assert_eq!(unique_filename(dir.path(), "swing.mp4"), "swing_3.mp4");
    }

    #[test]
    fn extensionless_names_get_plain_suffixes() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes"), b"").unwrap();
        assert_eq!(unique_filename(dir.path(), "notes"), "notes_1");
    }

    #[test]
    fn stem_splitting() {
        assert_eq!(split_name("a.mp4"), ("a", "mp4"));
        assert_eq!(split_name("a.b.mp4"), ("a.b", "mp4"));
        assert_eq!(split_name("plain"), ("plain", ""));
        assert_eq!(file_stem("42_swing.mp4"), "42_swing");
    }

    #[test]
    fn confinement_allows_plain_names() {
        let base = Path::new("/srv/videos");
        assert_eq!(
            resolve_confined(base, "swing.mp4").unwrap(),
            Path::new("/srv/videos/swing.mp4")
        );
    }

    #[test]
    fn confinement_rejects_traversal() {
        let base = Path::new("/srv/videos");
        assert!(resolve_confined(base, "../etc/passwd").is_err());
        assert!(resolve_confined(base, "a/../../b").is_err());
        assert!(resolve_confined(base, "/etc/passwd").is_err());
    }
}
