pub mod csv_file;
pub mod json_file;

pub use csv_file::CsvFileSink;
pub use json_file::JsonFileSink;

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::pipeline::PipelineError;

/// Sibling path a sink writes to before renaming over the target.
fn staging_path(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    target.with_file_name(format!(".{name}.partial"))
}

/// Run `write` against a staging file and move it over `target` on success.
///
/// The target is replaced whole or not at all. Two processes committing to
/// the same target still race; there is no locking.
fn commit_file<F>(target: &Path, write: F) -> Result<(), PipelineError>
where
    F: FnOnce(&Path) -> Result<(), PipelineError>,
{
    let staging = staging_path(target);
    if let Err(e) = write(&staging) {
        let _ = fs::remove_file(&staging);
        return Err(e);
    }
    fs::rename(&staging, target).map_err(|e| {
        let _ = fs::remove_file(&staging);
        PipelineError::Export(format!("failed to move output into {}: {e}", target.display()))
    })
}
