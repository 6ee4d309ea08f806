use std::fmt;
use std::path::PathBuf;

/// Extensions picked up by the scanner unless configured otherwise.
pub const DEFAULT_EXTENSIONS: &[&str] = &["zip", "gz", "rar"];

/// An external codec the operations depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Zip,
    Gzip,
    Rar,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Zip => "zip",
            Capability::Gzip => "gzip",
            Capability::Rar => "rar",
        }
    }

    /// Whether the codec was compiled into this binary.
    pub fn compiled(&self) -> bool {
        match self {
            Capability::Zip => cfg!(feature = "zip"),
            Capability::Gzip => cfg!(feature = "gzip"),
            Capability::Rar => cfg!(feature = "rar"),
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Set of codecs available at runtime.
///
/// A capability can be switched off at runtime, but one whose cargo feature
/// is disabled never reports as available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    zip: bool,
    gzip: bool,
    rar: bool,
}

impl Capabilities {
    /// Everything this binary was compiled with.
    pub fn detect() -> Self {
        Self {
            zip: Capability::Zip.compiled(),
            gzip: Capability::Gzip.compiled(),
            rar: Capability::Rar.compiled(),
        }
    }

    pub fn none() -> Self {
        Self {
            zip: false,
            gzip: false,
            rar: false,
        }
    }

    pub fn without(mut self, capability: Capability) -> Self {
        match capability {
            Capability::Zip => self.zip = false,
            Capability::Gzip => self.gzip = false,
            Capability::Rar => self.rar = false,
        }
        self
    }

    pub fn has(&self, capability: Capability) -> bool {
        let enabled = match capability {
            Capability::Zip => self.zip,
            Capability::Gzip => self.gzip,
            Capability::Rar => self.rar,
        };
        enabled && capability.compiled()
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::detect()
    }
}

/// Settings shared by the scanner, the dispatcher and the builder.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory scanned for archives; relative archive names and
    /// destinations resolve against it.
    pub working_dir: PathBuf,
    pub allowed_extensions: Vec<String>,
    pub capabilities: Capabilities,
}

impl Config {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
            ..Self::default()
        }
    }

    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_extensions = extensions.into_iter().map(Into::into).collect();
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            working_dir: PathBuf::from("."),
            allowed_extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            capabilities: Capabilities::default(),
        }
    }
}
