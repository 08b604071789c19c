//! Build configuration resolution for mkimg
//!
//! This crate turns three layered sources into the configuration an image
//! build runs with:
//!
//! - **Defaults**: built-in values for every section
//! - **Site configuration**: an INI file overlaid onto the defaults, with
//!   `common` options propagated into every other section and `bootstrap*`
//!   sections decoded into structured repository groups
//! - **Kickstart**: the per-build descriptor, from which the image name,
//!   repository metadata and target architecture are derived
//!
//! # Architecture
//!
//! ```text
//!          SiteConf::load ──► ConfigManager::apply_siteconf
//!                                     │
//!                              (CLI overrides)
//!                                     │
//!   resolve_kickstart(Backends) ──► ConfigManager::apply_kickstart
//!        │          │         │
//!  KickstartReader RepoBackend MacProbe
//! ```
//!
//! Kickstart parsing, metadata retrieval and SELinux probing sit behind the
//! [`KickstartReader`], [`RepoBackend`] and [`MacProbe`] traits.

pub mod arch;
pub mod bootstrap;
pub mod defaults;
pub mod error;
pub mod ini;
pub mod kickstart;
pub mod manager;
pub mod metadata;
pub mod proxy;
pub mod repo;
pub mod resolve;
pub mod selinux;
pub mod siteconf;

pub use arch::{ArchCandidates, resolve_arch};
pub use bootstrap::{BootstrapGroup, BootstrapRepo, Bootstraps};
pub use defaults::{DEFAULT_SITECONF, Section, SectionKind};
pub use error::{Error, ErrorKind, Result};
pub use kickstart::{KickstartDescriptor, KickstartReader, PackageSelection, Partition};
pub use manager::ConfigManager;
pub use metadata::{
    GroupIndex, PackageInfo, PackageManager, RepoBackend, RepoMetadata, RepoMetadataEntry,
};
pub use proxy::ProxySettings;
pub use repo::RepoRef;
pub use resolve::{Backends, KickstartResolution, resolve_kickstart};
pub use selinux::{GetenforceProbe, MacProbe, MacStatus};
pub use siteconf::SiteConf;
