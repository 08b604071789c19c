//! SELinux safety check
//!
//! ARM images and btrfs partitions cannot be created while SELinux is
//! enforcing. The status comes from a [`MacProbe`]; [`GetenforceProbe`] asks
//! the first `getenforce` binary it can find.

use std::fmt;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use serde::Serialize;

use crate::arch::is_arm;
use crate::kickstart::KickstartDescriptor;
use crate::{Error, Result};

/// Where `getenforce` is looked for, in order
pub const GETENFORCE_PATHS: &[&str] = &[
    "/usr/sbin/getenforce",
    "/usr/bin/getenforce",
    "/sbin/getenforce",
    "/bin/getenforce",
    "/usr/local/sbin/getenforce",
    "/usr/local/bin/getenforce",
];

/// Mandatory access control status of the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MacStatus {
    Enforcing,
    Permissive,
    Disabled,
    /// No probe available or its answer was not understood
    Unknown,
}

impl MacStatus {
    /// Interpret `getenforce` output
    pub fn parse(output: &str) -> Self {
        match output.trim() {
            "Enforcing" => Self::Enforcing,
            "Permissive" => Self::Permissive,
            "Disabled" => Self::Disabled,
            _ => Self::Unknown,
        }
    }

    pub fn is_enforcing(self) -> bool {
        self == Self::Enforcing
    }
}

impl fmt::Display for MacStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enforcing => write!(f, "Enforcing"),
            Self::Permissive => write!(f, "Permissive"),
            Self::Disabled => write!(f, "Disabled"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Reports the host's mandatory access control status
pub trait MacProbe {
    fn status(&self) -> MacStatus;
}

/// Runs the first `getenforce` found
#[derive(Debug, Clone)]
pub struct GetenforceProbe {
    candidates: Vec<PathBuf>,
    search_path: bool,
}

impl Default for GetenforceProbe {
    fn default() -> Self {
        Self {
            candidates: GETENFORCE_PATHS.iter().map(PathBuf::from).collect(),
            search_path: true,
        }
    }
}

impl GetenforceProbe {
    /// Probe the standard locations, then `$PATH`
    pub fn new() -> Self {
        Self::default()
    }

    /// Probe only the given locations
    pub fn with_candidates(candidates: Vec<PathBuf>) -> Self {
        Self {
            candidates,
            search_path: false,
        }
    }

    /// First usable `getenforce` binary
    pub fn locate(&self) -> Option<PathBuf> {
        self.candidates
            .iter()
            .find(|p| p.is_file())
            .cloned()
            .or_else(|| {
                self.search_path
                    .then(|| which::which("getenforce").ok())
                    .flatten()
            })
    }
}

impl MacProbe for GetenforceProbe {
    fn status(&self) -> MacStatus {
        let Some(binary) = self.locate() else {
            tracing::debug!("No getenforce binary found - skipping SELinux check");
            return MacStatus::Unknown;
        };

        match Command::new(&binary)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
        {
            Ok(output) => {
                let status = MacStatus::parse(&String::from_utf8_lossy(&output.stdout));
                tracing::debug!(?binary, %status, "SELinux status");
                status
            }
            Err(e) => {
                tracing::warn!(?binary, error = %e, "Failed to run getenforce");
                MacStatus::Unknown
            }
        }
    }
}

/// Reject ARM targets and btrfs partitions while SELinux is enforcing
pub fn check(status: MacStatus, arch: Option<&str>, ks: &KickstartDescriptor) -> Result<()> {
    if !status.is_enforcing() {
        return Ok(());
    }

    if let Some(arch) = arch.filter(|a| is_arm(a)) {
        return Err(Error::SelinuxArm {
            arch: arch.to_string(),
        });
    }

    if ks.uses_fstype("btrfs") {
        return Err(Error::SelinuxBtrfs);
    }

    Ok(())
}
