//! Archive extraction.
//!
//! [`Unzipper`] owns the result of the last directory scan and only extracts
//! archives that appeared in it. The format is chosen from the file
//! extension and handed to one of the codec backends:
//!
//! - `zipfile`: zip containers, through the `zip` crate
//! - `gzip`: single-file gzip streams, through `flate2`
//! - `rar`: rar containers, through `unrar`
//!
//! Each backend sits behind the cargo feature of the same name. When a
//! backend is compiled out or disabled in [`Capabilities`], extraction fails
//! with [`ArchiveError::MissingCapability`] before anything is written.
//!
//! ## Limitations
//!
//! - Nothing is rolled back when extraction fails half way
//! - A gzip file always yields a single output file; concatenated members
//!   are decoded back to back into it

#[cfg(feature = "gzip")]
mod gzip;
#[cfg(feature = "rar")]
mod rar;
#[cfg(feature = "zip")]
mod zipfile;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::{Capability, Config};
use crate::error::ArchiveError;
use crate::outcome::{OperationResult, Outcome};
use crate::scanner::{self, ArchiveFile};

/// Archive formats the dispatcher knows how to unpack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    Zip,
    Gzip,
    Rar,
}

impl ArchiveFormat {
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension {
            "zip" => Some(ArchiveFormat::Zip),
            "gz" => Some(ArchiveFormat::Gzip),
            "rar" => Some(ArchiveFormat::Rar),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ArchiveFormat::Zip => "zip",
            ArchiveFormat::Gzip => "gz",
            ArchiveFormat::Rar => "rar",
        }
    }

    pub fn capability(&self) -> Capability {
        match self {
            ArchiveFormat::Zip => Capability::Zip,
            ArchiveFormat::Gzip => Capability::Gzip,
            ArchiveFormat::Rar => Capability::Rar,
        }
    }
}

/// Extracts archives found in the configured working directory.
pub struct Unzipper {
    config: Config,
    archives: Vec<ArchiveFile>,
}

impl Unzipper {
    /// Create a dispatcher and scan the working directory.
    pub fn new(config: Config) -> Result<Self, ArchiveError> {
        let archives = scan(&config)?;
        Ok(Self { config, archives })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Archives found by the most recent scan.
    pub fn archives(&self) -> &[ArchiveFile] {
        &self.archives
    }

    pub fn rescan(&mut self) -> Result<(), ArchiveError> {
        self.archives = scan(&self.config)?;
        Ok(())
    }

    /// Extract `archive_name` into `destination`.
    ///
    /// Checks run in this order, and nothing is written until all of them
    /// pass:
    /// 1. `archive_name` must appear in the last scan
    /// 2. its extension must name a known [`ArchiveFormat`]
    /// 3. the codec for that format must be available
    /// 4. the archive must still be a regular file
    ///
    /// # Arguments
    ///
    /// * `archive_name` - File name as listed by [`Unzipper::archives`]
    /// * `destination` - Target directory. Empty means the working
    ///   directory; a relative path is resolved against it. Missing
    ///   directories are created.
    ///
    /// # Returns
    ///
    /// An [`Outcome`] describing what was written, or the first
    /// [`ArchiveError`] hit. Files written before a failure are kept.
    pub fn extract(&self, archive_name: &str, destination: impl AsRef<Path>) -> OperationResult {
        // Only archives from the last scan may be extracted
        let archive = self
            .archives
            .iter()
            .find(|a| a.name == archive_name)
            .ok_or_else(|| ArchiveError::NotFound {
                name: archive_name.to_string(),
            })?;

        // The allow-list may be wider than the formats we can unpack
        let format = ArchiveFormat::from_extension(&archive.extension).ok_or_else(|| {
            ArchiveError::UnsupportedFormat {
                extension: archive.extension.clone(),
            }
        })?;

        let capability = format.capability();
        if !self.config.capabilities.has(capability) {
            return Err(ArchiveError::MissingCapability { capability });
        }

        // A directory named like an archive is listed by the scanner too
        let source = archive.path_in(&self.config.working_dir);
        if !source.is_file() {
            return Err(ArchiveError::OpenFailed {
                format: capability.as_str(),
                path: source,
                source: io::Error::new(io::ErrorKind::InvalidInput, "not a regular file").into(),
            });
        }

        let destination = self.resolve_destination(destination.as_ref());
        create_destination(&destination)?;

        log::info!(
            "Extracting {} ({:?}) to {}",
            source.display(),
            format,
            destination.display()
        );

        match format {
            #[cfg(feature = "zip")]
            ArchiveFormat::Zip => {
                let entries = zipfile::extract(&source, &destination)?;
                Ok(Outcome::Extracted {
                    archive: archive.name.clone(),
                    destination,
                    entries,
                })
            }
            #[cfg(feature = "gzip")]
            ArchiveFormat::Gzip => {
                let output = destination.join(archive.stem());
                let bytes = gzip::extract(&source, &output)?;
                Ok(Outcome::Decompressed {
                    archive: archive.name.clone(),
                    output,
                    bytes,
                })
            }
            #[cfg(feature = "rar")]
            ArchiveFormat::Rar => {
                let entries = rar::extract(&source, &destination)?;
                Ok(Outcome::Extracted {
                    archive: archive.name.clone(),
                    destination,
                    entries,
                })
            }
            #[allow(unreachable_patterns)]
            _ => Err(ArchiveError::MissingCapability { capability }),
        }
    }

    fn resolve_destination(&self, destination: &Path) -> PathBuf {
        if destination.as_os_str().is_empty() {
            self.config.working_dir.clone()
        } else {
            self.config.working_dir.join(destination)
        }
    }
}

fn scan(config: &Config) -> Result<Vec<ArchiveFile>, ArchiveError> {
    scanner::list_archives(&config.working_dir, &config.allowed_extensions).map_err(|source| {
        ArchiveError::ScanFailed {
            path: config.working_dir.clone(),
            source,
        }
    })
}

/// Create `path` and its parents (mode 0755 on unix) unless it is already a
/// directory.
fn create_destination(path: &Path) -> Result<(), ArchiveError> {
    if path.is_dir() {
        return Ok(());
    }

    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o755);
    }

    builder
        .create(path)
        .map_err(|source| ArchiveError::DirectoryCreateFailed {
            path: path.to_path_buf(),
            source,
        })?;
    log::debug!("Created destination directory {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Capabilities;
    use crate::error::ErrorKind;
    use tempfile::TempDir;

    fn unzipper_in(dir: &Path) -> Unzipper {
        Unzipper::new(Config::new(dir)).unwrap()
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(ArchiveFormat::from_extension("zip"), Some(ArchiveFormat::Zip));
        assert_eq!(ArchiveFormat::from_extension("gz"), Some(ArchiveFormat::Gzip));
        assert_eq!(ArchiveFormat::from_extension("rar"), Some(ArchiveFormat::Rar));
        assert_eq!(ArchiveFormat::from_extension("tar"), None);
        assert_eq!(ArchiveFormat::from_extension("ZIP"), None);
    }

    #[test]
    fn unknown_archive_is_not_found() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.zip"), b"").unwrap();
        let unzipper = unzipper_in(dir.path());

        for dest in ["", "out", "/definitely/not/here"] {
            let err = unzipper.extract("missing.zip", dest).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::NotFound);
        }
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn file_added_after_scan_needs_rescan() {
        let dir = TempDir::new().unwrap();
        let mut unzipper = unzipper_in(dir.path());
        fs::write(dir.path().join("late.zip"), b"").unwrap();

        let err = unzipper.extract("late.zip", "").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        unzipper.rescan().unwrap();
        assert_eq!(unzipper.archives().len(), 1);
    }

    #[test]
    fn unsupported_extension_leaves_destination_alone() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("f.xyz"), b"payload").unwrap();
        let config = Config::new(dir.path()).with_extensions(["zip", "gz", "rar", "xyz"]);
        let unzipper = Unzipper::new(config).unwrap();

        let err = unzipper.extract("f.xyz", "dest").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedFormat);
        assert!(err.to_string().contains("xyz"));
        assert!(!dir.path().join("dest").exists());
    }

    #[test]
    fn missing_capability_fails_before_writing() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.zip"), b"").unwrap();
        fs::write(dir.path().join("b.gz"), b"").unwrap();
        fs::write(dir.path().join("c.rar"), b"").unwrap();
        let config = Config::new(dir.path()).with_capabilities(Capabilities::none());
        let unzipper = Unzipper::new(config).unwrap();

        for (name, capability) in [
            ("a.zip", Capability::Zip),
            ("b.gz", Capability::Gzip),
            ("c.rar", Capability::Rar),
        ] {
            match unzipper.extract(name, "dest") {
                Err(ArchiveError::MissingCapability { capability: c }) => {
                    assert_eq!(c, capability)
                }
                other => panic!("unexpected result for {name}: {other:?}"),
            }
        }
        assert!(!dir.path().join("dest").exists());
    }

    #[test]
    fn destination_blocked_by_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.gz"), b"").unwrap();
        fs::write(dir.path().join("blocker"), b"").unwrap();
        let unzipper = unzipper_in(dir.path());

        let err = unzipper.extract("a.gz", "blocker/inner").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DirectoryCreateFailed);
    }

    #[test]
    fn empty_destination_is_working_dir() {
        let dir = TempDir::new().unwrap();
        let unzipper = unzipper_in(dir.path());
        assert_eq!(unzipper.resolve_destination(Path::new("")), dir.path());
        assert_eq!(
            unzipper.resolve_destination(Path::new("out/nested")),
            dir.path().join("out/nested")
        );
    }

    #[test]
    fn directory_named_like_archive_fails_to_open() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("dir.gz")).unwrap();
        let unzipper = unzipper_in(dir.path());
        assert_eq!(unzipper.archives().len(), 1);

        let err = unzipper.extract("dir.gz", "d").unwrap_err();
        let expected = if cfg!(feature = "gzip") {
            ErrorKind::OpenFailed
        } else {
            ErrorKind::MissingCapability
        };
        assert_eq!(err.kind(), expected);
        assert!(!dir.path().join("d").exists());
    }

    #[cfg(feature = "gzip")]
    #[test]
    fn corrupt_gzip_fails_to_extract() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("bad.gz"), b"this is not gzip data").unwrap();
        let unzipper = unzipper_in(dir.path());

        let err = unzipper.extract("bad.gz", "out").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ExtractFailed);
    }

    #[cfg(feature = "zip")]
    #[test]
    fn corrupt_zip_fails_to_open() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("bad.zip"), b"this is not a zip file").unwrap();
        let unzipper = unzipper_in(dir.path());

        let err = unzipper.extract("bad.zip", "out").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OpenFailed);
        assert!(err.to_string().contains("bad.zip"));
    }

    #[cfg(feature = "rar")]
    #[test]
    fn corrupt_rar_fails_to_open() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("bad.rar"), b"this is not a rar file").unwrap();
        let unzipper = unzipper_in(dir.path());

        let err = unzipper.extract("bad.rar", "out").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OpenFailed);
    }
}
