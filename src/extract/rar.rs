use std::path::Path;

use unrar::Archive;

use crate::error::ArchiveError;

/// Unpack every entry of the rar at `source` under `destination`, one entry
/// at a time.
///
/// The archive handle is closed when it goes out of scope, on success and on
/// every error path.
pub(super) fn extract(source: &Path, destination: &Path) -> Result<usize, ArchiveError> {
    let extract_failed = |e: unrar::error::UnrarError| ArchiveError::ExtractFailed {
        path: source.to_path_buf(),
        source: e.into(),
    };

    let mut archive =
        Archive::new(source)
            .open_for_processing()
            .map_err(|e| ArchiveError::OpenFailed {
                format: "rar",
                path: source.to_path_buf(),
                source: e.into(),
            })?;

    let mut entries = 0usize;
    while let Some(header) = archive.read_header().map_err(extract_failed)? {
        log::debug!("  extracting: {}", header.entry().filename.display());
        archive = header.extract_with_base(destination).map_err(extract_failed)?;
        entries += 1;
    }

    Ok(entries)
}
