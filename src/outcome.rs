use std::fmt;
use std::path::PathBuf;

use crate::error::ArchiveError;

/// Result of one operation: a success [`Outcome`] or the first error hit.
pub type OperationResult = Result<Outcome, ArchiveError>;

/// What a successful operation did. `Display` gives the status message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A zip or rar container was unpacked.
    Extracted {
        archive: String,
        destination: PathBuf,
        entries: usize,
    },
    /// A gzip stream was decompressed to a single file.
    Decompressed {
        archive: String,
        output: PathBuf,
        bytes: u64,
    },
    /// A new zip archive was written.
    Created { archive: PathBuf, files: usize },
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Extracted {
                archive,
                destination,
                entries,
            } => write!(
                f,
                "Archive '{}' extracted to '{}' ({} entries).",
                archive,
                destination.display(),
                entries
            ),
            Outcome::Decompressed {
                archive,
                output,
                bytes,
            } => write!(
                f,
                "Gzip file '{}' extracted to '{}' ({}).",
                archive,
                output.display(),
                format_size(*bytes)
            ),
            Outcome::Created { archive, files } => write!(
                f,
                "Zip archive '{}' created successfully ({} files).",
                archive.display(),
                files
            ),
        }
    }
}

/// Format a byte size into a human-readable string.
///
/// # Examples
///
/// ```
/// use unzipper::outcome::format_size;
///
/// assert_eq!(format_size(500), "500 bytes");
/// assert_eq!(format_size(1536), "1.50 KB");
/// assert_eq!(format_size(1048576), "1.00 MB");
/// ```
pub fn format_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_source_and_destination() {
        let outcome = Outcome::Extracted {
            archive: "a.zip".to_string(),
            destination: PathBuf::from("out"),
            entries: 3,
        };
        assert_eq!(
            outcome.to_string(),
            "Archive 'a.zip' extracted to 'out' (3 entries)."
        );

        let outcome = Outcome::Decompressed {
            archive: "data.gz".to_string(),
            output: PathBuf::from("out/data"),
            bytes: 2048,
        };
        assert_eq!(
            outcome.to_string(),
            "Gzip file 'data.gz' extracted to 'out/data' (2.00 KB)."
        );
    }

    #[test]
    fn format_size_picks_unit() {
        assert_eq!(format_size(0), "0 bytes");
        assert_eq!(format_size(1023), "1023 bytes");
        assert_eq!(format_size(3 * 1024 * 1024 * 1024), "3.00 GB");
    }
}
