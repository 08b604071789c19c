//! The configuration store
//!
//! A [`ConfigManager`] starts from the built-in defaults and is mutated by two
//! bulk operations: applying a site configuration and applying a resolved
//! kickstart. Each is computed first and applied only on success.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;

use crate::bootstrap::Bootstraps;
use crate::defaults::{self, Section, SectionKind};
use crate::kickstart::KickstartDescriptor;
use crate::metadata::{PackageManager, RepoMetadata};
use crate::proxy::ProxySettings;
use crate::resolve::{self, Backends, KickstartResolution};
use crate::siteconf::SiteConf;
use crate::{Error, Result};

/// Resolved build configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use mkimg_conf::{ConfigManager, SectionKind};
///
/// let mut config = ConfigManager::new();
/// config.set_siteconf(Some(Path::new("/etc/mkimg/mkimg.conf")))?;
/// config.set_option(SectionKind::Create, "arch", "x86_64");
/// println!("{}", config.get_str(SectionKind::Create, "cachedir").unwrap_or_default());
/// # Ok::<(), mkimg_conf::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigManager {
    siteconf: Option<PathBuf>,
    ksconf: Option<PathBuf>,
    sections: BTreeMap<SectionKind, Section>,
    bootstraps: Bootstraps,
    proxies: ProxySettings,
    ks: Option<KickstartDescriptor>,
    repomd: Option<RepoMetadata>,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    /// A store holding only the built-in defaults
    pub fn new() -> Self {
        Self {
            siteconf: None,
            ksconf: None,
            sections: SectionKind::ALL
                .iter()
                .map(|&kind| (kind, defaults::section(kind)))
                .collect(),
            bootstraps: Bootstraps::new(),
            proxies: ProxySettings::new(),
            ks: None,
            repomd: None,
        }
    }

    /// Restore every section to the built-in defaults and forget both inputs
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Load a site configuration and apply it.
    ///
    /// `None` leaves the store untouched.
    pub fn set_siteconf(&mut self, path: Option<&Path>) -> Result<()> {
        let Some(path) = path else {
            return Ok(());
        };
        let site = SiteConf::load(path)?;
        self.apply_siteconf(&site);
        Ok(())
    }

    /// Rebuild the store from the defaults and `site`.
    ///
    /// Any previously applied site configuration or kickstart is discarded,
    /// so applying the same file twice leaves the store unchanged.
    pub fn apply_siteconf(&mut self, site: &SiteConf) {
        self.reset();

        for kind in SectionKind::ALL {
            let Some(items) = site.section(kind) else {
                tracing::debug!(section = %kind, "No site config options");
                continue;
            };
            let section = self.section_mut(kind);
            for (option, value) in items {
                section.insert(option.clone(), Value::String(value.clone()));
            }
            tracing::debug!(section = %kind, options = items.len(), "Applied site config section");
        }

        let common = self.section(SectionKind::Common).clone();
        for kind in SectionKind::ALL.into_iter().filter(|k| k.inherits_common()) {
            let section = self.section_mut(kind);
            for (option, value) in &common {
                if !site.sets(kind, option) {
                    section.insert(option.clone(), value.clone());
                }
            }
        }

        let proxy = self.get_str(SectionKind::Create, "proxy").map(str::to_string);
        let no_proxy = self.get_str(SectionKind::Create, "no_proxy").map(str::to_string);
        self.proxies.set_proxies(proxy.as_deref(), no_proxy.as_deref());

        self.bootstraps = site.bootstraps().clone();
        self.siteconf = Some(site.path().to_path_buf());

        tracing::info!(
            path = %site.path().display(),
            bootstraps = self.bootstraps.len(),
            "Site config applied"
        );
    }

    /// Resolve a kickstart against the current `create` section without
    /// touching the store
    pub fn resolve_kickstart(
        &self,
        path: &Path,
        backends: &Backends<'_>,
    ) -> Result<KickstartResolution> {
        resolve::resolve_kickstart(
            path,
            self.section(SectionKind::Create),
            &self.proxies,
            backends,
        )
    }

    /// Record a successful kickstart resolution
    pub fn apply_kickstart(&mut self, resolution: KickstartResolution) {
        let KickstartResolution {
            ksconf,
            ks,
            name,
            arch,
            rpmver,
            repomd,
        } = resolution;

        let create = self.section_mut(SectionKind::Create);
        create.insert("name".to_string(), Value::String(name));
        create.insert("arch".to_string(), Value::String(arch));
        create.insert("rpmver".to_string(), rpmver.map_or(Value::Null, Value::String));
        create.insert(
            "ksfile".to_string(),
            Value::String(ksconf.display().to_string()),
        );

        self.ks = Some(ks);
        self.repomd = Some(repomd);
        self.ksconf = Some(ksconf);
    }

    /// Resolve a kickstart and apply it; on failure the store is unchanged
    pub fn set_ksconf(&mut self, path: &Path, backends: &Backends<'_>) -> Result<()> {
        let resolution = self.resolve_kickstart(path, backends)?;
        self.apply_kickstart(resolution);
        Ok(())
    }

    pub fn section(&self, kind: SectionKind) -> &Section {
        // Every kind is inserted by `new`
        &self.sections[&kind]
    }

    fn section_mut(&mut self, kind: SectionKind) -> &mut Section {
        self.sections.entry(kind).or_default()
    }

    pub fn get(&self, kind: SectionKind, option: &str) -> Option<&Value> {
        self.section(kind).get(option)
    }

    /// Option value if it is set to a string
    pub fn get_str(&self, kind: SectionKind, option: &str) -> Option<&str> {
        self.get(kind, option).and_then(Value::as_str)
    }

    /// Set a single option, e.g. from a command-line override
    pub fn set_option(&mut self, kind: SectionKind, option: &str, value: impl Into<Value>) {
        let value = value.into();
        tracing::debug!(section = %kind, option, %value, "Option override");
        self.section_mut(kind).insert(option.to_lowercase(), value);
    }

    /// [`set_option`](Self::set_option) with the section given by name
    pub fn set_option_by_name(
        &mut self,
        section: &str,
        option: &str,
        value: impl Into<Value>,
    ) -> Result<()> {
        let kind = SectionKind::parse(section).ok_or_else(|| Error::UnknownSection {
            section: section.to_string(),
        })?;
        self.set_option(kind, option, value);
        Ok(())
    }

    pub fn name(&self) -> Option<&str> {
        self.get_str(SectionKind::Create, "name")
    }

    /// Build architecture; `None` until configured or detected
    pub fn arch(&self) -> Option<&str> {
        self.get_str(SectionKind::Create, "arch")
    }

    pub fn rpmver(&self) -> Option<&str> {
        self.get_str(SectionKind::Create, "rpmver")
    }

    pub fn cachedir(&self) -> PathBuf {
        PathBuf::from(resolve::cachedir(self.section(SectionKind::Create)))
    }

    pub fn pkgmgr(&self) -> PackageManager {
        PackageManager::from_name(self.get_str(SectionKind::Create, "pkgmgr").unwrap_or_default())
    }

    pub fn bootstraps(&self) -> &Bootstraps {
        &self.bootstraps
    }

    pub fn proxies(&self) -> &ProxySettings {
        &self.proxies
    }

    pub fn siteconf(&self) -> Option<&Path> {
        self.siteconf.as_deref()
    }

    pub fn ksconf(&self) -> Option<&Path> {
        self.ksconf.as_deref()
    }

    pub fn kickstart(&self) -> Option<&KickstartDescriptor> {
        self.ks.as_ref()
    }

    pub fn repomd(&self) -> Option<&RepoMetadata> {
        self.repomd.as_ref()
    }

    /// The option sections and bootstrap groups as one JSON object
    pub fn to_json(&self) -> Value {
        let mut root = serde_json::Map::new();
        for (kind, section) in &self.sections {
            root.insert(
                kind.to_string(),
                Value::Object(section.clone().into_iter().collect()),
            );
        }
        let bootstraps: serde_json::Map<String, Value> = self
            .bootstraps
            .iter()
            .map(|(name, group)| {
                let repos: serde_json::Map<String, Value> = group
                    .repos()
                    .iter()
                    .map(|r| (r.key.clone(), Value::String(r.encoded())))
                    .collect();
                (name.clone(), Value::Object(repos))
            })
            .collect();
        root.insert("bootstraps".to_string(), Value::Object(bootstraps));
        Value::Object(root)
    }
}
