//! Kickstart resolution
//!
//! Reads a kickstart through the configured collaborators and derives the
//! image name, target architecture and repository metadata. Nothing here
//! mutates a [`ConfigManager`](crate::ConfigManager); the result is applied
//! separately once every step has succeeded.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;

use crate::arch::resolve_arch;
use crate::defaults::{self, Section, SectionKind};
use crate::kickstart::{KickstartDescriptor, KickstartReader};
use crate::metadata::{PackageManager, RepoBackend, RepoMetadata};
use crate::proxy::ProxySettings;
use crate::selinux::{self, MacProbe};
use crate::{Error, Result};

/// Collaborators used while resolving a kickstart
#[derive(Clone, Copy)]
pub struct Backends<'a> {
    pub reader: &'a dyn KickstartReader,
    pub repos: &'a dyn RepoBackend,
    pub probe: &'a dyn MacProbe,
}

/// Everything a kickstart contributes to the configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KickstartResolution {
    pub ksconf: PathBuf,
    /// Descriptor with package groups already expanded
    pub ks: KickstartDescriptor,
    pub name: String,
    pub arch: String,
    pub rpmver: Option<String>,
    pub repomd: RepoMetadata,
}

fn text<'a>(section: &'a Section, option: &str) -> Option<&'a str> {
    section
        .get(option)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// Metadata cache directory of a `create` section
pub(crate) fn cachedir(create: &Section) -> String {
    text(create, "cachedir")
        .map(str::to_string)
        .or_else(|| {
            defaults::value(SectionKind::Create, "cachedir")
                .and_then(|v| v.as_str().map(str::to_string))
        })
        .unwrap_or_default()
}

/// Image name derived from the kickstart file name
fn image_name(path: &Path, prefix: Option<&str>) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    match prefix {
        Some(prefix) => format!("{}-{}", prefix, stem),
        None => stem,
    }
}

/// Repository strings handed to the backend. Repositories without their own
/// `proxy` get the configured one when their URL is not bypassed.
fn repostrs(ks: &KickstartDescriptor, proxies: &ProxySettings) -> Vec<String> {
    ks.usable_repos()
        .map(|repo| {
            let url = repo.baseurl().or_else(|| repo.mirrorlist()).unwrap_or_default();
            match proxies.proxy_for(url) {
                Some(proxy) if repo.get("proxy").is_none() => {
                    tracing::debug!(repo = repo.name().unwrap_or_default(), proxy, "Using proxy");
                    repo.clone().with("proxy", proxy).to_repostr()
                }
                _ => repo.to_repostr(),
            }
        })
        .collect()
}

/// Resolve the kickstart at `path` against a `create` section.
///
/// Steps run in order and the first failure is returned:
/// read, name, SELinux check, repository extraction, metadata retrieval,
/// package-manager version, architecture, group expansion.
pub fn resolve_kickstart(
    path: &Path,
    create: &Section,
    proxies: &ProxySettings,
    backends: &Backends<'_>,
) -> Result<KickstartResolution> {
    if !path.is_file() {
        return Err(Error::KickstartNotFound {
            path: path.to_path_buf(),
        });
    }

    tracing::debug!(?path, "Reading kickstart");
    let mut ks = backends.reader.read(path)?;

    let name = image_name(path, text(create, "name_prefix"));
    let configured_arch = text(create, "arch");

    selinux::check(backends.probe.status(), configured_arch, &ks)?;

    let repostrs = repostrs(&ks, proxies);
    if repostrs.is_empty() {
        return Err(Error::NoRepos {
            path: path.to_path_buf(),
        });
    }

    tracing::info!(repos = repostrs.len(), "Retrieving repo metadata:");
    let cachedir = PathBuf::from(cachedir(create));
    let repomd = backends.repos.fetch(&repostrs, &cachedir)?;

    let rpmver = backends.repos.package_manager_version(&repomd);
    if rpmver.is_none() {
        tracing::debug!("No rpm package in repositories");
    }

    let candidates = backends.repos.arch_candidates(&repomd);
    let arch = resolve_arch(configured_arch, &candidates)?;

    let pkgmgr = PackageManager::from_name(text(create, "pkgmgr").unwrap_or_default());
    backends.repos.resolve_groups(pkgmgr, &mut ks, &repomd);

    tracing::debug!(%name, %arch, ?rpmver, "Kickstart resolved");
    Ok(KickstartResolution {
        ksconf: path.to_path_buf(),
        ks,
        name,
        arch,
        rpmver,
        repomd,
    })
}
