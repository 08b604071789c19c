//! Bootstrap repository groups from `[bootstrap*]` site-config sections
//!
//! A bootstrap section describes the repositories used to build an isolated
//! build root. Options are decoded as follows:
//!
//! - `name = <group>` renames the group (default: the section name)
//! - `<repo>_<attr> = <value>` appends `attr:value` to repository `repo`
//! - `<repo> = <url>` with a `file`, `http`, `https` or `ftp` URL appends
//!   `name:<repo>,baseurl:<url>` to repository `repo`
//! - anything else is ignored
//!
//! Decoding only ever appends: repeated options, and sections resolving to the
//! same group, accumulate.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::repo::{RepoRef, encode_fields};

/// Prefix that marks a site-config section as a bootstrap group
pub const SECTION_PREFIX: &str = "bootstrap";

/// URL schemes that turn a bare option into a repository
pub const URL_SCHEMES: &[&str] = &["file", "http", "https", "ftp"];

/// All bootstrap groups, keyed by group name
pub type Bootstraps = BTreeMap<String, BootstrapGroup>;

/// One repository inside a bootstrap group
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BootstrapRepo {
    /// Key the repository was declared under
    pub key: String,
    fields: Vec<(String, String)>,
}

impl BootstrapRepo {
    fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            fields: Vec::new(),
        }
    }

    fn push(&mut self, attr: &str, value: &str) {
        self.fields.push((attr.to_string(), value.to_string()));
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    /// First value recorded for an attribute
    pub fn get(&self, attr: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == attr)
            .map(|(_, v)| v.as_str())
    }

    /// Accumulated fields exactly as decoded, e.g. `baseurl:http://x,priority:1,`
    pub fn encoded(&self) -> String {
        encode_fields(&self.fields)
    }

    /// Repository reference for a backend, named after the key when no
    /// `name` attribute was given
    pub fn to_repo_ref(&self) -> RepoRef {
        if self.get("name").is_some() {
            RepoRef::from_fields(self.fields.clone())
        } else {
            let mut fields = Vec::with_capacity(self.fields.len() + 1);
            fields.push(("name".to_string(), self.key.clone()));
            fields.extend(self.fields.iter().cloned());
            RepoRef::from_fields(fields)
        }
    }
}

/// Repositories of one bootstrap group, in declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BootstrapGroup {
    repos: Vec<BootstrapRepo>,
}

impl BootstrapGroup {
    fn repo_mut(&mut self, key: &str) -> &mut BootstrapRepo {
        let pos = match self.repos.iter().position(|r| r.key == key) {
            Some(pos) => pos,
            None => {
                self.repos.push(BootstrapRepo::new(key));
                self.repos.len() - 1
            }
        };
        &mut self.repos[pos]
    }

    pub fn repos(&self) -> &[BootstrapRepo] {
        &self.repos
    }

    pub fn repo(&self, key: &str) -> Option<&BootstrapRepo> {
        self.repos.iter().find(|r| r.key == key)
    }

    pub fn is_empty(&self) -> bool {
        self.repos.is_empty()
    }

    /// Append another group's repositories and fields onto this one
    pub fn absorb(&mut self, other: BootstrapGroup) {
        for repo in other.repos {
            let target = self.repo_mut(&repo.key);
            target.fields.extend(repo.fields);
        }
    }

    /// Repository strings handed to a repository backend
    pub fn repostrs(&self) -> Vec<String> {
        self.repos
            .iter()
            .map(|r| r.to_repo_ref().to_repostr())
            .collect()
    }
}

/// Whether a site-config section describes a bootstrap group
pub fn is_bootstrap_section(name: &str) -> bool {
    name.starts_with(SECTION_PREFIX)
}

/// Scheme of a value, i.e. the text before its first colon
fn scheme(value: &str) -> &str {
    value.split(':').next().unwrap_or(value)
}

/// Decode one bootstrap section into its group name and repositories
pub fn decode_section(section: &str, options: &[(String, String)]) -> (String, BootstrapGroup) {
    let mut name = section.to_string();
    let mut group = BootstrapGroup::default();

    for (option, value) in options {
        if option == "name" {
            name = value.clone();
            continue;
        }

        if let Some((repo, attr)) = option.split_once('_') {
            group.repo_mut(repo).push(attr, value);
            continue;
        }

        if URL_SCHEMES.contains(&scheme(value)) {
            let repo = group.repo_mut(option);
            repo.push("name", option);
            repo.push("baseurl", value);
            continue;
        }

        tracing::debug!(section, option, "Ignoring unrecognised bootstrap option");
    }

    (name, group)
}

/// Decode bootstrap sections in order, merging sections that resolve to the
/// same group
pub fn decode_sections<'a, I>(sections: I) -> Bootstraps
where
    I: IntoIterator<Item = (&'a str, &'a [(String, String)])>,
{
    let mut bootstraps = Bootstraps::new();
    for (section, options) in sections {
        let (name, group) = decode_section(section, options);
        bootstraps.entry(name).or_default().absorb(group);
    }
    bootstraps
}
