//! Kickstart descriptor model and the reader seam
//!
//! Parsing kickstart syntax is not this crate's job; a [`KickstartReader`]
//! turns a file into a [`KickstartDescriptor`] and the resolution code only
//! reads partitions and repositories from it and writes back the expanded
//! package selection.

use std::path::Path;

use serde::Serialize;

use crate::Result;
use crate::repo::RepoRef;

/// A `part` declaration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Partition {
    pub mountpoint: Option<String>,
    pub fstype: Option<String>,
    /// Size in MiB
    pub size: Option<u64>,
    pub label: Option<String>,
}

impl Partition {
    pub fn new(mountpoint: impl Into<String>, fstype: impl Into<String>) -> Self {
        Self {
            mountpoint: Some(mountpoint.into()),
            fstype: Some(fstype.into()),
            ..Self::default()
        }
    }
}

/// The `%packages` selection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PackageSelection {
    pub packages: Vec<String>,
    pub excluded: Vec<String>,
    /// Group names without the leading `@`
    pub groups: Vec<String>,
}

/// Structured kickstart file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KickstartDescriptor {
    pub partitions: Vec<Partition>,
    pub repos: Vec<RepoRef>,
    pub packages: PackageSelection,
}

impl KickstartDescriptor {
    /// Whether any partition uses the given filesystem type
    pub fn uses_fstype(&self, fstype: &str) -> bool {
        self.partitions
            .iter()
            .any(|p| p.fstype.as_deref() == Some(fstype))
    }

    /// Repository strings for the repository backend; repositories without
    /// a base URL or mirror list are not usable and are skipped
    pub fn repostrs(&self) -> Vec<String> {
        self.usable_repos().map(RepoRef::to_repostr).collect()
    }

    /// Repositories with a base URL or mirror list
    pub fn usable_repos(&self) -> impl Iterator<Item = &RepoRef> {
        self.repos
            .iter()
            .filter(|r| r.baseurl().is_some() || r.mirrorlist().is_some())
    }
}

/// Turns a kickstart file into a [`KickstartDescriptor`]
pub trait KickstartReader {
    fn read(&self, path: &Path) -> Result<KickstartDescriptor>;
}
