//! Target architecture selection
//!
//! Repository metadata lists the architectures packages were built for. The
//! full list is every arch seen (minus `noarch` and `src`); the target list
//! collapses compatible arches so only the most capable member of each family
//! remains. `x86_64` and `i686` packages in one repository yield the target
//! list `[x86_64]`.

use serde::Serialize;

use crate::{Error, Result};

/// Arches every other arch can install; never a build target
const ARCH_INDEPENDENT: &[&str] = &["noarch", "src"];

/// Each arch and the arches whose packages it can install, itself first
const ARCH_POLICIES: &[(&str, &[&str])] = &[
    ("x86_64", &["x86_64", "i686", "i586", "i486", "i386"]),
    ("i686", &["i686", "i586", "i486", "i386"]),
    ("i586", &["i586", "i486", "i386"]),
    ("ia64", &["ia64", "i686", "i586", "i486", "i386"]),
    ("aarch64", &["aarch64"]),
    ("armv7tnhl", &["armv7tnhl", "armv7thl", "armv7nhl", "armv7hl"]),
    ("armv7thl", &["armv7thl", "armv7hl"]),
    ("armv7nhl", &["armv7nhl", "armv7hl"]),
    ("armv7hl", &["armv7hl"]),
    (
        "armv7l",
        &["armv7l", "armv6l", "armv5tejl", "armv5tel", "armv5l", "armv4tl", "armv4l", "armv3l"],
    ),
    (
        "armv6l",
        &["armv6l", "armv5tejl", "armv5tel", "armv5l", "armv4tl", "armv4l", "armv3l"],
    ),
    ("armv5tejl", &["armv5tejl", "armv5tel", "armv5l", "armv4tl", "armv4l", "armv3l"]),
    ("armv5tel", &["armv5tel", "armv5l", "armv4tl", "armv4l", "armv3l"]),
    ("armv5l", &["armv5l", "armv4tl", "armv4l", "armv3l"]),
    ("mipsel", &["mipsel"]),
];

fn policy(arch: &str) -> Option<&'static [&'static str]> {
    ARCH_POLICIES
        .iter()
        .find(|(name, _)| *name == arch)
        .map(|(_, compatible)| *compatible)
}

/// Whether an image built for `arch` can install packages built for `other`
pub fn can_install(arch: &str, other: &str) -> bool {
    policy(arch).is_some_and(|compatible| compatible.contains(&other))
}

/// Whether `arch` names an ARM target
pub fn is_arm(arch: &str) -> bool {
    arch.starts_with("arm")
}

/// Architectures derived from repository metadata
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ArchCandidates {
    /// Most capable arch of each compatible family, in encounter order
    pub target: Vec<String>,
    /// Every distinct arch seen, in encounter order
    pub all: Vec<String>,
}

impl ArchCandidates {
    /// Build candidate lists from package arches in encounter order
    pub fn from_arches<I, S>(arches: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut all: Vec<String> = Vec::new();
        for arch in arches {
            let arch = arch.as_ref();
            if ARCH_INDEPENDENT.contains(&arch) || all.iter().any(|a| a == arch) {
                continue;
            }
            all.push(arch.to_string());
        }

        let mut target: Vec<String> = Vec::new();
        for arch in &all {
            if policy(arch).is_none() {
                continue;
            }

            let mut need_append = true;
            let mut j = 0;
            while j < target.len() {
                if can_install(&target[j], arch) {
                    // Already covered by a more capable arch
                    need_append = false;
                    break;
                }
                if can_install(arch, &target[j]) {
                    if need_append {
                        target[j] = arch.clone();
                        need_append = false;
                    } else {
                        target.remove(j);
                        continue;
                    }
                }
                j += 1;
            }

            if need_append {
                target.push(arch.clone());
            }
        }

        Self { target, all }
    }
}

/// Pick the build architecture.
///
/// A configured arch must appear in the full list. Without one, the target
/// list must hold exactly one arch.
pub fn resolve_arch(configured: Option<&str>, candidates: &ArchCandidates) -> Result<String> {
    match configured {
        Some(arch) => {
            if candidates.all.iter().any(|a| a == arch) {
                Ok(arch.to_string())
            } else {
                Err(Error::InvalidArch {
                    arch: arch.to_string(),
                    valid: candidates.all.clone(),
                })
            }
        }
        None => match candidates.target.as_slice() {
            [only] => {
                tracing::info!(arch = %only, "Use detected arch {}", only);
                Ok(only.clone())
            }
            _ => Err(Error::AmbiguousArch {
                candidates: candidates.all.clone(),
            }),
        },
    }
}
