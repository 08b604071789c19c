//! Repository references in the comma-separated `key:value,` form
//!
//! Repository backends receive repositories as strings such as
//! `name:updates,baseurl:http://mirror/updates,priority:1,`. Everything that
//! hands repositories to a backend builds a [`RepoRef`] first and renders it
//! at the boundary with [`RepoRef::to_repostr`].

use std::fmt;

use serde::Serialize;

use crate::{Error, Result};

/// A single repository: an ordered list of `key:value` fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RepoRef {
    fields: Vec<(String, String)>,
}

impl RepoRef {
    /// A repository with only a name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            fields: vec![("name".to_string(), name.into())],
        }
    }

    /// Build from ordered fields
    pub fn from_fields(fields: Vec<(String, String)>) -> Self {
        Self { fields }
    }

    /// Append a field; repeated keys are kept in order
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.push((key.into(), value.into()));
    }

    /// Builder-style [`push`](RepoRef::push)
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(key, value);
        self
    }

    /// First value recorded for `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn name(&self) -> Option<&str> {
        self.get("name")
    }

    pub fn baseurl(&self) -> Option<&str> {
        self.get("baseurl")
    }

    pub fn mirrorlist(&self) -> Option<&str> {
        self.get("mirrorlist")
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    /// Render as `key:value,key:value,`
    pub fn to_repostr(&self) -> String {
        encode_fields(&self.fields)
    }

    /// Decode a `key:value,` string.
    ///
    /// Each comma-separated item is split on its first colon, so URLs keep
    /// their own colons. A repository without a `name` is rejected.
    pub fn parse(repostr: &str) -> Result<Self> {
        let mut fields = Vec::new();
        for item in repostr.split(',') {
            if item.is_empty() {
                continue;
            }
            let Some((key, value)) = item.split_once(':') else {
                return Err(Error::RepoString {
                    repostr: repostr.to_string(),
                    message: format!("item '{}' has no ':'", item),
                });
            };
            fields.push((key.to_string(), value.to_string()));
        }

        let repo = Self { fields };
        if repo.name().is_none_or(str::is_empty) {
            return Err(Error::RepoString {
                repostr: repostr.to_string(),
                message: "missing name".to_string(),
            });
        }
        Ok(repo)
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_repostr())
    }
}

/// Render fields as `key:value,` pairs
pub(crate) fn encode_fields(fields: &[(String, String)]) -> String {
    fields
        .iter()
        .map(|(k, v)| format!("{}:{},", k, v))
        .collect()
}
