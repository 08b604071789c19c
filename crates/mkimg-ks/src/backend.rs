//! Repository backend for local `file://` repositories
//!
//! Packages are discovered from file names of the form
//! `name-version-release.arch.rpm`. Optional `comps.json` and `patterns.json`
//! files at the repository root provide group indexes as
//! `{"group": ["pkg", ...]}`. The package index of every fetched repository
//! is written to `<cachedir>/<repo>/packages.json`.

use std::fs;
use std::path::{Path, PathBuf};

use mkimg_conf::{GroupIndex, PackageInfo, RepoBackend, RepoMetadata, RepoMetadataEntry, RepoRef};
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// File the package index is written to inside a repository's cache directory
pub const INDEX_FILE: &str = "packages.json";

const FILE_SCHEME: &str = "file://";
const COMPS_FILE: &str = "comps.json";
const PATTERNS_FILE: &str = "patterns.json";

/// Parse `name-version-release.arch.rpm`
pub fn parse_rpm_filename(file_name: &str) -> Option<PackageInfo> {
    let stem = file_name.strip_suffix(".rpm")?;
    let (nvr, arch) = stem.rsplit_once('.')?;
    let (nv, release) = nvr.rsplit_once('-')?;
    let (name, version) = nv.rsplit_once('-')?;
    if [name, version, release, arch].iter().any(|s| s.is_empty()) {
        return None;
    }
    Some(PackageInfo::new(name, version, release, arch))
}

fn read_group_index(path: &Path) -> Result<Option<GroupIndex>> {
    if !path.is_file() {
        return Ok(None);
    }
    let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    serde_json::from_str(&content)
        .map(Some)
        .map_err(|source| Error::Json {
            path: path.to_path_buf(),
            source,
        })
}

/// Reads repositories straight from the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalRepoBackend;

impl LocalRepoBackend {
    pub fn new() -> Self {
        Self
    }

    /// Scan one repository and cache its package index
    pub fn fetch_repo(&self, repo: &RepoRef, cachedir: &Path) -> Result<RepoMetadataEntry> {
        let name = repo.name().unwrap_or_default().to_string();
        let baseurl = repo.baseurl().ok_or_else(|| Error::NoBaseurl { repo: name.clone() })?;
        let root = baseurl
            .strip_prefix(FILE_SCHEME)
            .map(PathBuf::from)
            .ok_or_else(|| Error::UnsupportedUrl {
                repo: name.clone(),
                url: baseurl.to_string(),
            })?;

        if !root.is_dir() {
            return Err(Error::RepoNotFound { repo: name, path: root });
        }

        let mut packages = Vec::new();
        for entry in WalkDir::new(&root).sort_by_file_name() {
            let entry = entry.map_err(|source| Error::Walk {
                path: root.clone(),
                source,
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let file_name = entry.file_name().to_string_lossy();
            if !file_name.ends_with(".rpm") {
                continue;
            }
            match parse_rpm_filename(&file_name) {
                Some(package) => packages.push(package),
                None => tracing::debug!(file = %file_name, "Skipping unparsable package file name"),
            }
        }

        let repo_cache = cachedir.join(&name);
        let entry = RepoMetadataEntry {
            name: name.clone(),
            baseurl: Some(baseurl.to_string()),
            cachedir: repo_cache.clone(),
            packages,
            comps: read_group_index(&root.join(COMPS_FILE))?,
            patterns: read_group_index(&root.join(PATTERNS_FILE))?,
        };

        fs::create_dir_all(&repo_cache).map_err(|e| Error::io(&repo_cache, e))?;
        let index_path = repo_cache.join(INDEX_FILE);
        let json = serde_json::to_string_pretty(&entry).map_err(|source| Error::Json {
            path: index_path.clone(),
            source,
        })?;
        fs::write(&index_path, json).map_err(|e| Error::io(&index_path, e))?;

        tracing::info!(repo = %name, packages = entry.packages.len(), "Repository indexed");
        Ok(entry)
    }
}

impl RepoBackend for LocalRepoBackend {
    fn fetch(&self, repostrs: &[String], cachedir: &Path) -> mkimg_conf::Result<RepoMetadata> {
        let mut repos = Vec::with_capacity(repostrs.len());
        for repostr in repostrs {
            let repo = RepoRef::parse(repostr)?;
            repos.push(self.fetch_repo(&repo, cachedir)?);
        }
        Ok(RepoMetadata { repos })
    }
}
