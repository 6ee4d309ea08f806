//! # unzipper
//!
//! Extract zip, gzip and rar archives found in a directory, and build zip
//! archives from a directory tree.
//!
//! The crate has three parts:
//!
//! - [`scanner`]: lists candidate archives in the working directory
//! - [`extract`]: [`Unzipper`] dispatches an archive to the zip, gzip or rar
//!   backend by its extension
//! - [`builder`]: [`ZipBuilder`] walks a directory and writes a zip archive
//!
//! Every operation returns an [`OperationResult`]: either an [`Outcome`]
//! whose `Display` is the status message, or the first [`ArchiveError`] hit.
//!
//! ## Features
//!
//! - `zip`: zip extraction and creation (`zip` crate)
//! - `gzip`: gzip decompression (`flate2`)
//! - `rar`: rar extraction (`unrar`)
//!
//! All are on by default. Operations that need a missing backend fail with
//! [`ArchiveError::MissingCapability`].
//!
//! ## Example
//!
//! ```no_run
//! use unzipper::{Config, Unzipper, ZipBuilder};
//!
//! fn main() -> anyhow::Result<()> {
//!     let unzipper = Unzipper::new(Config::new("uploads"))?;
//!     for archive in unzipper.archives() {
//!         println!("{}", archive.name);
//!     }
//!
//!     let outcome = unzipper.extract("site.zip", "public")?;
//!     println!("{}", outcome);
//!
//!     let outcome = ZipBuilder::default().create_zip("uploads/public", "backup.zip")?;
//!     println!("{}", outcome);
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod outcome;
pub mod scanner;

pub use builder::ZipBuilder;
pub use cli::Cli;
pub use config::{Capabilities, Capability, Config};
pub use error::{ArchiveError, ErrorKind};
pub use extract::{ArchiveFormat, Unzipper};
pub use outcome::{OperationResult, Outcome};
pub use scanner::{ArchiveFile, list_archives};
