//! Writers for tables and move trees.

pub mod csv;
pub mod json;

use std::fs::{self, File};
use std::path::Path;

/// Create `path`, and its parent directories when missing.
pub(crate) fn create_file(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    File::create(path)
}
