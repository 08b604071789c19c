//! Error types for mkimg-conf

use std::path::PathBuf;

use crate::ini::ParseError;

/// Result type for mkimg-conf operations
pub type Result<T> = std::result::Result<T, Error>;

/// Broad classification of an [`Error`].
///
/// Callers abort the build on every kind; the kind only decides how the
/// failure is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Site configuration or resolved option is unusable
    Config,
    /// Kickstart file is unusable
    Kickstart,
    /// Unrecoverable input error, reported immediately
    Fatal,
    /// Repository backend failure
    Backend,
    /// Underlying I/O failure
    Io,
}

/// Errors that can occur while resolving the build configuration
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Site configuration path was set but nothing is there
    #[error("Failed to find config file: {path}")]
    SiteConfNotFound { path: PathBuf },

    /// Site configuration exists but is not valid INI
    #[error("Failed to parse config file {path}: {source}")]
    SiteConfParse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    /// Configured arch does not appear in the repositories
    #[error("Invalid arch {arch} for repository. Valid arches: {}", .valid.join(", "))]
    InvalidArch { arch: String, valid: Vec<String> },

    /// No arch configured and the repositories do not imply exactly one
    #[error("Please specify a valid arch, the choice can be: {}", .candidates.join(", "))]
    AmbiguousArch { candidates: Vec<String> },

    /// ARM images cannot be created with SELinux enforcing
    #[error("Can't create arm image if selinux is enabled, please disable it and try again")]
    SelinuxArm { arch: String },

    /// btrfs partitions cannot be created with SELinux enforcing
    #[error(
        "Can't create image using btrfs filesystem if selinux is enabled, please disable it and try again."
    )]
    SelinuxBtrfs,

    /// Unknown section passed to a setter
    #[error("Unknown config section: {section}")]
    UnknownSection { section: String },

    /// Kickstart file does not exist
    #[error("Cannot find ks file: {path}")]
    KickstartNotFound { path: PathBuf },

    /// Kickstart file declares no repositories
    #[error("no valid repos found in ks file {path}")]
    NoRepos { path: PathBuf },

    /// Kickstart reader rejected the file
    #[error("Failed to read ks file {path}: {message}")]
    KickstartRead { path: PathBuf, message: String },

    /// Repository string could not be decoded
    #[error("Malformed repository string '{repostr}': {message}")]
    RepoString { repostr: String, message: String },

    /// Repository backend failed while fetching or resolving metadata
    #[error("Repository backend error: {message}")]
    Backend { message: String },

    /// Standard I/O error
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a backend error with the given message
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::SiteConfNotFound { .. }
            | Self::SiteConfParse { .. }
            | Self::InvalidArch { .. }
            | Self::AmbiguousArch { .. }
            | Self::SelinuxArm { .. }
            | Self::SelinuxBtrfs
            | Self::UnknownSection { .. } => ErrorKind::Config,
            Self::NoRepos { .. } | Self::KickstartRead { .. } | Self::RepoString { .. } => {
                ErrorKind::Kickstart
            }
            Self::KickstartNotFound { .. } => ErrorKind::Fatal,
            Self::Backend { .. } => ErrorKind::Backend,
            Self::Io { .. } => ErrorKind::Io,
        }
    }

    /// Whether this is a configuration error
    pub fn is_config_error(&self) -> bool {
        self.kind() == ErrorKind::Config
    }

    /// Whether this is a kickstart error
    pub fn is_ks_error(&self) -> bool {
        self.kind() == ErrorKind::Kickstart
    }
}
