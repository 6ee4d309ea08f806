use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{Capabilities, Capability, Config};

#[derive(Parser, Debug)]
#[command(name = "unzipper")]
#[command(version)]
#[command(about = "Extract zip, gzip and rar archives, or zip up a directory", long_about = None)]
#[command(after_help = "Examples:\n  \
  unzipper list                       list archives in the current directory\n  \
  unzipper extract data.zip -d out    extract data.zip into ./out\n  \
  unzipper -C /srv/uploads zip site   zip /srv/uploads/site into /srv/uploads")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Directory scanned for archives
    #[arg(short = 'C', long = "dir", value_name = "DIR", default_value = ".")]
    pub dir: PathBuf,

    /// Quiet mode, only errors are printed
    #[arg(short = 'q', global = true)]
    pub quiet: bool,

    /// More log output (-v info, -vv debug)
    #[arg(short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Treat zip support as unavailable
    #[arg(long, global = true)]
    pub no_zip: bool,

    /// Treat gzip support as unavailable
    #[arg(long, global = true)]
    pub no_gzip: bool,

    /// Treat rar support as unavailable
    #[arg(long, global = true)]
    pub no_rar: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List archives found in the directory
    List,

    /// Extract an archive from the directory
    Extract {
        /// Archive file name, as shown by `list`
        #[arg(value_name = "ARCHIVE")]
        archive: String,

        /// Extraction path (default: the scanned directory)
        #[arg(short = 'd', value_name = "DEST")]
        destination: Option<PathBuf>,
    },

    /// Create a zip archive from a folder
    Zip {
        /// Folder to zip
        #[arg(value_name = "SOURCE", default_value = ".")]
        source: PathBuf,

        /// Output file (default: archive-<YYYY-MM-DD-HH-MM>.zip in the scanned directory)
        #[arg(short = 'o', value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

impl Cli {
    pub fn capabilities(&self) -> Capabilities {
        let mut caps = Capabilities::detect();
        if self.no_zip {
            caps = caps.without(Capability::Zip);
        }
        if self.no_gzip {
            caps = caps.without(Capability::Gzip);
        }
        if self.no_rar {
            caps = caps.without(Capability::Rar);
        }
        caps
    }

    pub fn config(&self) -> Config {
        Config::new(&self.dir).with_capabilities(self.capabilities())
    }

    /// Log level filter for `env_logger`, unless `RUST_LOG` is set.
    pub fn log_level(&self) -> log::LevelFilter {
        match (self.quiet, self.verbose) {
            (true, _) => log::LevelFilter::Error,
            (false, 0) => log::LevelFilter::Warn,
            (false, 1) => log::LevelFilter::Info,
            (false, _) => log::LevelFilter::Debug,
        }
    }
}
