//! Zip archive creation from a directory tree.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use crate::config::{Capabilities, Capability};
use crate::error::ArchiveError;
use crate::outcome::{OperationResult, Outcome};

/// Name used for archives created without an explicit output name,
/// e.g. `archive-2024-03-05-09-07.zip`.
pub fn default_archive_name(now: NaiveDateTime) -> String {
    now.format("archive-%Y-%m-%d-%H-%M.zip").to_string()
}

/// Writes every file below a source directory into a new zip archive.
pub struct ZipBuilder {
    capabilities: Capabilities,
}

impl ZipBuilder {
    pub fn new(capabilities: Capabilities) -> Self {
        Self { capabilities }
    }

    /// Create `output` from the files under `source`.
    ///
    /// Files are stored under their path relative to `source`, with `/`
    /// separators. Directories only appear through the paths of the files
    /// they contain. Symbolic links are not followed: a link to a file is
    /// stored with the target's content, a link to a directory is skipped.
    ///
    /// # Arguments
    ///
    /// * `source` - Directory to archive; must exist
    /// * `output` - Path of the zip file to write, created or truncated
    ///
    /// # Returns
    ///
    /// [`Outcome::Created`] with the number of files stored. The first file
    /// that cannot be added aborts the run with [`ArchiveError::AddFailed`];
    /// the entries written so far stay in the archive.
    pub fn create_zip(&self, source: impl AsRef<Path>, output: impl AsRef<Path>) -> OperationResult {
        // Fail before touching the filesystem when zip support is off
        if !self.capabilities.has(Capability::Zip) {
            return Err(ArchiveError::MissingCapability {
                capability: Capability::Zip,
            });
        }

        // Resolve the source first so a bad path leaves no empty archive
        let source = source.as_ref();
        let root = resolve_source(source)?;

        #[cfg(feature = "zip")]
        {
            let output = output.as_ref();
            let files = write_archive(&root, output)?;
            log::info!(
                "Created {} with {} files from {}",
                output.display(),
                files,
                root.display()
            );
            Ok(Outcome::Created {
                archive: output.to_path_buf(),
                files,
            })
        }

        #[cfg(not(feature = "zip"))]
        {
            let _ = (root, output);
            Err(ArchiveError::MissingCapability {
                capability: Capability::Zip,
            })
        }
    }
}

impl Default for ZipBuilder {
    fn default() -> Self {
        Self::new(Capabilities::detect())
    }
}

fn resolve_source(source: &Path) -> Result<PathBuf, ArchiveError> {
    let not_found = |e: io::Error| ArchiveError::SourceNotFound {
        path: source.to_path_buf(),
        source: e,
    };

    let root = fs::canonicalize(source).map_err(not_found)?;
    if !root.is_dir() {
        return Err(not_found(io::Error::new(
            io::ErrorKind::NotADirectory,
            "source is not a directory",
        )));
    }
    Ok(root)
}

/// Name of `relative` inside the archive.
fn entry_name(relative: &Path) -> String {
    relative
        .iter()
        .map(|part| part.to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(feature = "zip")]
fn write_archive(root: &Path, output: &Path) -> Result<usize, ArchiveError> {
    use std::fs::File;
    use walkdir::WalkDir;
    use zip::write::SimpleFileOptions;
    use zip::{CompressionMethod, ZipWriter};

    let create_failed = |cause: crate::error::Cause| ArchiveError::CreateFailed {
        path: output.to_path_buf(),
        source: cause,
    };

    let file = File::create(output).map_err(|e| create_failed(e.into()))?;
    // The output may live inside the tree being archived.
    let output_path = fs::canonicalize(output).ok();
    let mut writer = ZipWriter::new(file);
    let mut files = 0usize;

    for entry in WalkDir::new(root) {
        let entry = entry.map_err(|e| ArchiveError::AddFailed {
            path: e.path().unwrap_or(root).to_path_buf(),
            source: e.into(),
        })?;
        // Links are not followed; a link to a directory is skipped like one.
        let is_dir = entry.file_type().is_dir() || (entry.path_is_symlink() && entry.path().is_dir());
        if is_dir || Some(entry.path()) == output_path.as_deref() {
            continue;
        }

        let path = entry.path();
        let add_failed = |cause: crate::error::Cause| ArchiveError::AddFailed {
            path: path.to_path_buf(),
            source: cause,
        };

        let name = entry_name(path.strip_prefix(root).unwrap_or(path));

        #[allow(unused_mut)]
        let mut options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let metadata = fs::metadata(path).map_err(|e| add_failed(e.into()))?;
            options = options.unix_permissions(metadata.permissions().mode());
        }

        let mut input = File::open(path).map_err(|e| add_failed(e.into()))?;
        writer
            .start_file(name.as_str(), options)
            .map_err(|e| add_failed(e.into()))?;
        io::copy(&mut input, &mut writer).map_err(|e| add_failed(e.into()))?;

        log::debug!("  adding: {}", name);
        files += 1;
    }

    writer.finish().map_err(|e| create_failed(e.into()))?;
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[test]
    fn default_name_uses_minute_timestamp() {
        let now = NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(9, 7, 42)
            .unwrap();
        assert_eq!(default_archive_name(now), "archive-2024-03-05-09-07.zip");
    }

    #[test]
    fn entry_name_uses_forward_slashes() {
        let relative: PathBuf = ["sub", "deeper", "file.txt"].iter().collect();
        assert_eq!(entry_name(&relative), "sub/deeper/file.txt");
    }

    #[test]
    fn missing_source_leaves_no_output() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("out.zip");

        let err = ZipBuilder::default()
            .create_zip(dir.path().join("nope"), &output)
            .unwrap_err();
        let expected = if cfg!(feature = "zip") {
            ErrorKind::SourceNotFound
        } else {
            ErrorKind::MissingCapability
        };
        assert_eq!(err.kind(), expected);
        assert!(!output.exists());
    }

    #[test]
    fn disabled_zip_is_missing_capability() {
        let dir = TempDir::new().unwrap();
        let builder = ZipBuilder::new(Capabilities::detect().without(Capability::Zip));

        let err = builder
            .create_zip(dir.path(), dir.path().join("out.zip"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingCapability);
    }

    #[cfg(feature = "zip")]
    #[test]
    fn unwritable_output_is_create_failed() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), b"a").unwrap();

        let err = ZipBuilder::default()
            .create_zip(dir.path(), dir.path().join("missing/dir/out.zip"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CreateFailed);
    }

    #[cfg(feature = "zip")]
    #[test]
    fn nested_paths_are_preserved() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("src");
        fs::create_dir_all(src.join("sub/deeper")).unwrap();
        fs::create_dir_all(src.join("empty")).unwrap();
        fs::write(src.join("top.txt"), b"top").unwrap();
        fs::write(src.join("sub/file.txt"), b"file").unwrap();
        fs::write(src.join("sub/deeper/leaf.bin"), [0u8, 1, 2]).unwrap();
        let output = dir.path().join("t.zip");

        let outcome = ZipBuilder::default().create_zip(&src, &output).unwrap();
        assert_eq!(
            outcome,
            Outcome::Created {
                archive: output.clone(),
                files: 3
            }
        );

        let archive = zip::ZipArchive::new(fs::File::open(&output).unwrap()).unwrap();
        let mut names: Vec<_> = archive.file_names().map(str::to_string).collect();
        names.sort();
        assert_eq!(names, vec!["sub/deeper/leaf.bin", "sub/file.txt", "top.txt"]);
    }

    #[cfg(all(feature = "zip", unix))]
    #[test]
    fn linked_directory_is_skipped() {
        use std::os::unix::fs::symlink;

        let dir = TempDir::new().unwrap();
        let src = dir.path().join("src");
        fs::create_dir_all(src.join("real")).unwrap();
        fs::write(src.join("real/inner.txt"), b"inner").unwrap();
        fs::write(src.join("top.txt"), b"top").unwrap();
        symlink(src.join("real"), src.join("link")).unwrap();
        symlink(src.join("top.txt"), src.join("top-link.txt")).unwrap();
        let output = dir.path().join("o.zip");

        let outcome = ZipBuilder::default().create_zip(&src, &output).unwrap();
        assert!(matches!(outcome, Outcome::Created { files: 3, .. }));

        let archive = zip::ZipArchive::new(fs::File::open(&output).unwrap()).unwrap();
        let mut names: Vec<_> = archive.file_names().map(str::to_string).collect();
        names.sort();
        assert_eq!(names, vec!["real/inner.txt", "top-link.txt", "top.txt"]);
    }

    #[cfg(feature = "zip")]
    #[test]
    fn output_inside_source_is_skipped() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), b"a").unwrap();
        let output = dir.path().join("self.zip");

        let outcome = ZipBuilder::default().create_zip(dir.path(), &output).unwrap();
        assert!(matches!(outcome, Outcome::Created { files: 1, .. }));

        let archive = zip::ZipArchive::new(fs::File::open(&output).unwrap()).unwrap();
        assert_eq!(archive.file_names().collect::<Vec<_>>(), vec!["a.txt"]);
    }
}
