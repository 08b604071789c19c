//! Repository metadata and the repository backend seam

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::Result;
use crate::arch::ArchCandidates;
use crate::kickstart::KickstartDescriptor;

/// Package providing the package-manager version marker
pub const RPM_PACKAGE: &str = "rpm";

/// One package as listed by a repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageInfo {
    pub name: String,
    pub version: String,
    pub release: String,
    pub arch: String,
}

impl PackageInfo {
    pub fn new(name: &str, version: &str, release: &str, arch: &str) -> Self {
        Self {
            name: name.to_string(),
            version: version.to_string(),
            release: release.to_string(),
            arch: arch.to_string(),
        }
    }
}

/// Group name to member packages
pub type GroupIndex = BTreeMap<String, Vec<String>>;

/// Metadata retrieved for one repository
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoMetadataEntry {
    pub name: String,
    pub baseurl: Option<String>,
    /// Where the backend cached this repository's metadata
    pub cachedir: PathBuf,
    pub packages: Vec<PackageInfo>,
    /// Groups in comps format (used by yum)
    pub comps: Option<GroupIndex>,
    /// Groups in patterns format (used by zypp)
    pub patterns: Option<GroupIndex>,
}

/// Metadata for every repository a kickstart references
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoMetadata {
    pub repos: Vec<RepoMetadataEntry>,
}

impl RepoMetadata {
    /// Version of the first package named `name` across all repositories
    pub fn package_version(&self, name: &str) -> Option<String> {
        self.repos
            .iter()
            .flat_map(|r| &r.packages)
            .find(|p| p.name == name)
            .map(|p| p.version.clone())
    }

    /// Package arches in repository and package order
    pub fn arches(&self) -> impl Iterator<Item = &str> {
        self.repos
            .iter()
            .flat_map(|r| &r.packages)
            .map(|p| p.arch.as_str())
    }
}

/// Package manager the image will be built with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    Yum,
    Zypp,
}

impl PackageManager {
    /// Parse the `pkgmgr` option; anything but `zypp` is treated as yum
    pub fn from_name(name: &str) -> Self {
        if name == "zypp" { Self::Zypp } else { Self::Yum }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Yum => write!(f, "yum"),
            Self::Zypp => write!(f, "zypp"),
        }
    }
}

/// Retrieves repository metadata and answers questions about it.
///
/// Only [`fetch`](RepoBackend::fetch) is required; the rest default to the
/// behaviour the built-in metadata model supports.
pub trait RepoBackend {
    /// Retrieve metadata for `repostrs` (see [`crate::repo::RepoRef`]) into
    /// `cachedir`
    fn fetch(&self, repostrs: &[String], cachedir: &Path) -> Result<RepoMetadata>;

    /// Version of the package manager's own package in the repositories
    fn package_manager_version(&self, metadata: &RepoMetadata) -> Option<String> {
        metadata.package_version(RPM_PACKAGE)
    }

    /// Target and full architecture lists
    fn arch_candidates(&self, metadata: &RepoMetadata) -> ArchCandidates {
        ArchCandidates::from_arches(metadata.arches())
    }

    /// Expand kickstart groups the package manager cannot resolve by itself
    fn resolve_groups(
        &self,
        pkgmgr: PackageManager,
        ks: &mut KickstartDescriptor,
        metadata: &RepoMetadata,
    ) {
        resolve_groups(pkgmgr, ks, metadata);
    }
}

/// Replace groups with their package lists where the repository only offers
/// groups in the other package manager's format.
///
/// A repository that already has groups in the native format is left alone.
/// Groups that no foreign index knows stay in the selection.
pub fn resolve_groups(
    pkgmgr: PackageManager,
    ks: &mut KickstartDescriptor,
    metadata: &RepoMetadata,
) {
    for repo in &metadata.repos {
        let (native, foreign) = match pkgmgr {
            PackageManager::Zypp => (&repo.patterns, &repo.comps),
            PackageManager::Yum => (&repo.comps, &repo.patterns),
        };
        if native.is_some() {
            continue;
        }
        let Some(index) = foreign else {
            continue;
        };

        let selection = &mut ks.packages;
        let mut i = 0;
        while i < selection.groups.len() {
            let Some(members) = index.get(&selection.groups[i]).filter(|m| !m.is_empty()) else {
                i += 1;
                continue;
            };

            let group = selection.groups.remove(i);
            tracing::debug!(%group, repo = %repo.name, %pkgmgr, "Expanding group into packages");
            for pkg in members {
                if !selection.packages.contains(pkg) {
                    selection.packages.push(pkg.clone());
                }
            }
        }
    }
}
