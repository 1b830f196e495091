//! Filesystem helpers
//!
//! A session binds its output files once at startup; [`unique_path`] picks
//! names that never overwrite an earlier run.

use std::path::{Path, PathBuf};

/// Return `base` if nothing exists there, otherwise the first free
/// `name (2).ext`, `name (3).ext`, ... candidate.
///
/// Only checks existence, never creates anything, so calling it twice
/// without creating the file in between returns the same path.
pub fn unique_path(base: &Path) -> PathBuf {
    if !base.exists() {
        return base.to_path_buf();
    }

    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = base.extension().map(|e| e.to_string_lossy().into_owned());
    let parent = base.parent().unwrap_or_else(|| Path::new(""));

    let mut counter = 2u32;
    loop {
        let name = match &extension {
            Some(ext) => format!("{stem} ({counter}).{ext}"),
            None => format!("{stem} ({counter})"),
        };
        let candidate = parent.join(name);
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}
