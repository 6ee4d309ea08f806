use std::fs::File;
use std::path::Path;

use zip::ZipArchive;

use crate::error::{ArchiveError, Cause};

/// Unpack every entry of the zip at `source` under `destination`.
///
/// Returns the number of entries in the archive.
pub(super) fn extract(source: &Path, destination: &Path) -> Result<usize, ArchiveError> {
    let open_failed = |cause: Cause| ArchiveError::OpenFailed {
        format: "zip",
        path: source.to_path_buf(),
        source: cause,
    };

    let file = File::open(source).map_err(|e| open_failed(e.into()))?;
    let mut archive = ZipArchive::new(file).map_err(|e| open_failed(e.into()))?;
    let entries = archive.len();

    archive
        .extract(destination)
        .map_err(|e| ArchiveError::ExtractFailed {
            path: source.to_path_buf(),
            source: e.into(),
        })?;

    log::debug!("Unpacked {} zip entries from {}", entries, source.display());
    Ok(entries)
}
