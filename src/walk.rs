//! Depth-bounded, exclude-filtered directory traversal.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;
use walkdir::WalkDir;

use crate::pattern::CompiledPattern;

/// Walk `root` and collect every entry that survives the exclude set, in
/// depth-first, lexical-per-directory order.
///
/// Depth is counted in directory levels below `root` (the root itself is
/// depth 0). Entries deeper than `max_depth` never appear; a directory at
/// exactly `max_depth` is listed but not descended into. An excluded
/// directory prunes its whole subtree.
///
/// Unreadable entries below the root are logged and skipped so the walk
/// makes best-effort progress; a failure on the root itself aborts.
pub fn walk(
    root: &Path,
    max_depth: usize,
    excludes: &[CompiledPattern],
) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .max_depth(max_depth)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            let excluded = excludes.iter().find(|p| p.matches(entry.path()));
            if let Some(pattern) = excluded {
                debug!("skip: {} (pattern `{}`)", entry.path().display(), pattern.raw());
            }
            excluded.is_none()
        });

    for entry in walker {
        match entry {
            Ok(entry) => files.push(entry.into_path()),
            Err(err) if err.depth() == 0 => {
                return Err(err).with_context(|| format!("cannot walk {}", root.display()));
            }
            Err(err) => debug!("filewalk: {err}"),
        }
    }
    Ok(files)
}
