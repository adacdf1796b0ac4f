//! General utilities.

use std::path::Path;

use chrono::{DateTime, Utc};

/// `now` as `YYYYMMDD-HHMMSS` (UTC), used to label stashes.
pub fn timestamp_label(now: DateTime<Utc>) -> String {
    now.format("%Y%m%d-%H%M%S").to_string()
}

/// Total size in bytes of the regular files under `path`.
///
/// Symlinks are counted by their own size and never followed. Nothing is
/// filtered: ignored files, hidden files and `.git` all count.
pub fn disk_usage(path: &Path) -> u64 {
    ignore::WalkBuilder::new(path)
        .standard_filters(false)
        .follow_links(false)
        .build()
        .filter_map(Result::ok)
        .filter_map(|entry| entry.path().symlink_metadata().ok())
        .filter(|meta| !meta.is_dir())
        .map(|meta| meta.len())
        .sum()
}

/// Human-readable byte count (`1.5 MiB`).
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];

    if bytes < 1024 {
        return format!("{bytes} B");
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}
