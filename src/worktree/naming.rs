//! Branch name ↔ folder name.
//!
//! The folder form is lossy when a branch already contains the separator
//! (`fix-a/b` and `fix/a-b` collide), so the reverse transform is only a
//! fallback for folders whose branch git cannot report.

use chrono::NaiveDate;

/// Folder name for `branch`: every `/` becomes `sep`.
pub fn branch_to_folder(branch: &str, sep: char) -> String {
    branch.replace('/', &sep.to_string())
}

/// Best-effort branch for a folder name: every `sep` becomes `/`.
pub fn folder_to_branch(folder: &str, sep: char) -> String {
    folder.replace(sep, "/")
}

/// Folder name for a detached checkout of `branch` as of `date`.
pub fn time_travel_folder(branch: &str, date: NaiveDate, sep: char) -> String {
    format!(
        "{}{sep}{}",
        branch_to_folder(branch, sep),
        date.format("%Y-%m-%d")
    )
}
