//! In-memory collaborators for kickstart resolution tests.

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use mkimg_conf::{
    Error, KickstartDescriptor, KickstartReader, MacProbe, MacStatus, PackageInfo, RepoBackend,
    RepoMetadata, RepoMetadataEntry, Result,
};

/// Probe that always reports the same status
#[derive(Debug, Clone, Copy)]
pub struct FakeProbe(pub MacStatus);

impl MacProbe for FakeProbe {
    fn status(&self) -> MacStatus {
        self.0
    }
}

/// Reader that returns the same descriptor for any path
#[derive(Debug, Clone, Default)]
pub struct StaticKickstartReader {
    pub descriptor: KickstartDescriptor,
}

impl StaticKickstartReader {
    pub fn new(descriptor: KickstartDescriptor) -> Self {
        Self { descriptor }
    }
}

impl KickstartReader for StaticKickstartReader {
    fn read(&self, _path: &Path) -> Result<KickstartDescriptor> {
        Ok(self.descriptor.clone())
    }
}

/// Backend serving canned metadata and recording every fetch
#[derive(Debug, Default)]
pub struct FakeRepoBackend {
    pub metadata: RepoMetadata,
    /// Fail every fetch with this message
    pub failure: Option<String>,
    fetches: RefCell<Vec<(Vec<String>, PathBuf)>>,
}

impl FakeRepoBackend {
    pub fn new(metadata: RepoMetadata) -> Self {
        Self {
            metadata,
            ..Self::default()
        }
    }

    /// One repository named `repo` holding `(name, version, arch)` packages
    pub fn with_packages(repo: &str, packages: &[(&str, &str, &str)]) -> Self {
        Self::new(RepoMetadata {
            repos: vec![RepoMetadataEntry {
                name: repo.to_string(),
                packages: packages
                    .iter()
                    .map(|(name, version, arch)| PackageInfo::new(name, version, "1", arch))
                    .collect(),
                ..Default::default()
            }],
        })
    }

    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::default()
        }
    }

    /// Repository strings and cache directory of every fetch so far
    pub fn fetches(&self) -> Vec<(Vec<String>, PathBuf)> {
        self.fetches.borrow().clone()
    }
}

impl RepoBackend for FakeRepoBackend {
    fn fetch(&self, repostrs: &[String], cachedir: &Path) -> Result<RepoMetadata> {
        self.fetches
            .borrow_mut()
            .push((repostrs.to_vec(), cachedir.to_path_buf()));
        match &self.failure {
            Some(message) => Err(Error::backend(message.clone())),
            None => Ok(self.metadata.clone()),
        }
    }
}
