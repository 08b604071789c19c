//! Built-in defaults for every configuration section
//!
//! The table is static; [`section`] hands out a fresh, independently owned
//! copy every time so callers can mutate the result freely.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde_json::Value;

/// Site configuration read when the caller does not name one.
pub const DEFAULT_SITECONF: &str = "/etc/mkimg/mkimg.conf";

/// Resolved options of one section, keyed by lower-case option name.
pub type Section = BTreeMap<String, Value>;

/// The option-bearing configuration sections.
///
/// The fifth section, `bootstraps`, holds structured repository groups and is
/// modelled separately by [`crate::bootstrap::Bootstraps`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Common,
    Create,
    Chroot,
    Convert,
}

impl SectionKind {
    /// All option sections, in table order
    pub const ALL: [SectionKind; 4] = [
        SectionKind::Common,
        SectionKind::Create,
        SectionKind::Chroot,
        SectionKind::Convert,
    ];

    /// Section name as written in the site configuration
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Common => "common",
            Self::Create => "create",
            Self::Chroot => "chroot",
            Self::Convert => "convert",
        }
    }

    /// Parse a section name
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "common" => Some(Self::Common),
            "create" => Some(Self::Create),
            "chroot" => Some(Self::Chroot),
            "convert" => Some(Self::Convert),
            _ => None,
        }
    }

    /// Whether `common` options are propagated into this section
    pub fn inherits_common(self) -> bool {
        self != Self::Common
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy)]
enum DefaultValue {
    /// Unset; `arch` in particular means "auto-detect"
    Unset,
    Text(&'static str),
    EmptyList,
}

impl DefaultValue {
    fn to_value(self) -> Value {
        match self {
            DefaultValue::Unset => Value::Null,
            DefaultValue::Text(s) => Value::String(s.to_string()),
            DefaultValue::EmptyList => Value::Array(Vec::new()),
        }
    }
}

const COMMON: &[(&str, DefaultValue)] =
    &[("distro_name", DefaultValue::Text("Default Distribution"))];

const CREATE: &[(&str, DefaultValue)] = &[
    ("tmpdir", DefaultValue::Text("/var/tmp/mkimg")),
    ("cachedir", DefaultValue::Text("/var/tmp/mkimg/cache")),
    ("outdir", DefaultValue::Text("./mkimg-output")),
    ("bootstrapdir", DefaultValue::Text("/var/tmp/mkimg/bootstrap")),
    ("arch", DefaultValue::Unset),
    ("pkgmgr", DefaultValue::Text("yum")),
    ("name", DefaultValue::Text("output")),
    ("ksfile", DefaultValue::Unset),
    ("local_pkgs_path", DefaultValue::Unset),
    ("release", DefaultValue::Unset),
    ("logfile", DefaultValue::Unset),
    ("record_pkgs", DefaultValue::EmptyList),
    ("rpmver", DefaultValue::Unset),
    ("compress_disk_image", DefaultValue::Unset),
    ("name_prefix", DefaultValue::Unset),
    ("proxy", DefaultValue::Unset),
    ("no_proxy", DefaultValue::Unset),
    ("runtime", DefaultValue::Unset),
];

const CHROOT: &[(&str, DefaultValue)] = &[];

const CONVERT: &[(&str, DefaultValue)] = &[];

fn table(kind: SectionKind) -> &'static [(&'static str, DefaultValue)] {
    match kind {
        SectionKind::Common => COMMON,
        SectionKind::Create => CREATE,
        SectionKind::Chroot => CHROOT,
        SectionKind::Convert => CONVERT,
    }
}

/// A fresh copy of a section's defaults
pub fn section(kind: SectionKind) -> Section {
    table(kind)
        .iter()
        .map(|(name, default)| (name.to_string(), default.to_value()))
        .collect()
}

/// Default value of a single option, if the table knows it
pub fn value(kind: SectionKind, option: &str) -> Option<Value> {
    table(kind)
        .iter()
        .find(|(name, _)| *name == option)
        .map(|(_, default)| default.to_value())
}
