//! Lists candidate archives in a directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A file name found by the scanner, with its extension split off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveFile {
    pub name: String,
    pub extension: String,
}

impl ArchiveFile {
    /// Build from a bare file name. Returns `None` when the name has no
    /// extension (this includes dotfiles such as `.gz`).
    pub fn from_name(name: &str) -> Option<Self> {
        let extension = Path::new(name).extension()?.to_str()?;
        Some(Self {
            name: name.to_string(),
            extension: extension.to_string(),
        })
    }

    /// File name with the final extension removed.
    pub fn stem(&self) -> &str {
        &self.name[..self.name.len() - self.extension.len() - 1]
    }

    pub fn path_in(&self, dir: &Path) -> PathBuf {
        dir.join(&self.name)
    }
}

/// List entries of `dir` whose extension is one of `allowed`.
///
/// Matching is case-sensitive. Names that are not valid UTF-8 are skipped.
/// The result is sorted by name.
pub fn list_archives<S: AsRef<str>>(dir: &Path, allowed: &[S]) -> io::Result<Vec<ArchiveFile>> {
    let mut archives = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            log::warn!("Skipping non UTF-8 file name: {:?}", file_name);
            continue;
        };

        let Some(archive) = ArchiveFile::from_name(name) else {
            continue;
        };
        if allowed.iter().any(|ext| ext.as_ref() == archive.extension) {
            archives.push(archive);
        }
    }

    archives.sort_by(|a, b| a.name.cmp(&b.name));
    log::debug!("Found {} archive(s) in {}", archives.len(), dir.display());
    Ok(archives)
}
