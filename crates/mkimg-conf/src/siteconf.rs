//! Site configuration loading
//!
//! Loading is pure: [`SiteConf::load`] reads and decodes the file without
//! touching any configuration state. Applying the result is the job of
//! [`ConfigManager::apply_siteconf`](crate::ConfigManager::apply_siteconf).

use std::fs;
use std::path::{Path, PathBuf};

use crate::bootstrap::{self, Bootstraps};
use crate::defaults::SectionKind;
use crate::ini::{IniDocument, ParseError};
use crate::{Error, Result};

/// A decoded site configuration file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteConf {
    path: PathBuf,
    sections: Vec<(SectionKind, Vec<(String, String)>)>,
    /// Options written in each section itself, without `DEFAULT` fill-ins
    explicit: Vec<(SectionKind, Vec<String>)>,
    bootstraps: Bootstraps,
}

impl SiteConf {
    /// Read and decode a site configuration file.
    ///
    /// A missing file or malformed content is a configuration error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::SiteConfNotFound {
                path: path.to_path_buf(),
            });
        }

        tracing::debug!(?path, "Loading site config");
        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::parse(path, &content)
    }

    /// Decode site configuration text; `path` is kept for reporting only
    pub fn parse(path: impl Into<PathBuf>, content: &str) -> Result<Self> {
        let path = path.into();
        let wrap = |source: ParseError| Error::SiteConfParse {
            path: path.clone(),
            source,
        };

        let doc = IniDocument::parse(content).map_err(wrap)?;

        let mut sections = Vec::new();
        let mut explicit = Vec::new();
        let mut bootstrap_sections = Vec::new();

        for name in doc.sections() {
            let items = doc.items(name).map_err(wrap)?;
            if let Some(kind) = SectionKind::parse(name) {
                sections.push((kind, items));
                explicit.push((kind, doc.own_options(name)));
            } else if bootstrap::is_bootstrap_section(name) {
                bootstrap_sections.push((name.to_string(), items));
            } else {
                tracing::debug!(section = name, "Ignoring unknown site config section");
            }
        }

        let bootstraps = bootstrap::decode_sections(
            bootstrap_sections
                .iter()
                .map(|(name, items)| (name.as_str(), items.as_slice())),
        );

        Ok(Self {
            path,
            sections,
            explicit,
            bootstraps,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Options given for a section, in file order, or `None` if the file has
    /// no such section
    pub fn section(&self, kind: SectionKind) -> Option<&[(String, String)]> {
        self.sections
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, items)| items.as_slice())
    }

    /// Whether the file sets `option` in `kind` itself; a `[DEFAULT]` value
    /// showing through does not count
    pub fn sets(&self, kind: SectionKind, option: &str) -> bool {
        self.explicit
            .iter()
            .find(|(k, _)| *k == kind)
            .is_some_and(|(_, names)| names.iter().any(|n| n == option))
    }

    pub fn bootstraps(&self) -> &Bootstraps {
        &self.bootstraps
    }
}
