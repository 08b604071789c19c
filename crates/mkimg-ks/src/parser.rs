//! Line-based kickstart reader
//!
//! Understands the parts of a kickstart that configuration resolution needs:
//!
//! ```text
//! part / --fstype=ext4 --size=2048 --label=rootfs
//! repo --name=base --baseurl=file:///srv/repo/base --priority=1
//! %packages
//! @core
//! bash
//! -vim-minimal
//! %end
//! ```
//!
//! Every other command is ignored, and every other `%` section is skipped up
//! to its `%end`.

use std::fs;
use std::path::Path;

use mkimg_conf::{KickstartDescriptor, KickstartReader, PackageSelection, Partition, RepoRef};

use crate::error::{Error, Result};

/// Options that never take a value
const FLAGS: &[&str] = &[
    "asprimary",
    "encrypted",
    "grow",
    "ignoregroups",
    "install",
    "noformat",
    "noverifyssl",
    "recommended",
    "save",
];

/// Value recorded for an option given without one
const FLAG_VALUE: &str = "1";

/// Split a line into words, honouring single and double quotes.
///
/// An unquoted `#` starting a word comments out the rest of the line.
fn tokenize(line: &str, lineno: usize) -> Result<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            c if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            '#' if !in_word => break,
            '\'' => {
                in_word = true;
                loop {
                    match chars.next() {
                        Some('\'') => break,
                        Some(c) => current.push(c),
                        None => return Err(Error::syntax(lineno, "unterminated single quote")),
                    }
                }
            }
            '"' => {
                in_word = true;
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some(c) => current.push(c),
                            None => return Err(Error::syntax(lineno, "dangling escape")),
                        },
                        Some(c) => current.push(c),
                        None => return Err(Error::syntax(lineno, "unterminated double quote")),
                    }
                }
            }
            c => {
                in_word = true;
                current.push(c);
            }
        }
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

/// Positional arguments and `--option` values of one command
#[derive(Debug, Default)]
struct Args {
    positional: Vec<String>,
    options: Vec<(String, String)>,
}

impl Args {
    fn parse(words: &[String]) -> Self {
        let mut args = Self::default();
        let mut iter = words.iter().peekable();

        while let Some(word) = iter.next() {
            let Some(option) = word.strip_prefix("--") else {
                args.positional.push(word.clone());
                continue;
            };

            if let Some((key, value)) = option.split_once('=') {
                args.options.push((key.to_string(), value.to_string()));
                continue;
            }

            let takes_value = !FLAGS.contains(&option)
                && iter.peek().is_some_and(|next| !next.starts_with("--"));
            let value = if takes_value {
                iter.next().cloned().unwrap_or_default()
            } else {
                FLAG_VALUE.to_string()
            };
            args.options.push((option.to_string(), value));
        }
        args
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.options
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

fn parse_partition(args: &Args, lineno: usize) -> Result<Partition> {
    let size = args
        .get("size")
        .map(|s| {
            s.parse::<u64>()
                .map_err(|_| Error::syntax(lineno, format!("invalid partition size '{}'", s)))
        })
        .transpose()?;

    Ok(Partition {
        mountpoint: args.positional.first().cloned(),
        fstype: args.get("fstype").map(str::to_string),
        size,
        label: args.get("label").map(str::to_string),
    })
}

fn parse_repo(args: &Args, lineno: usize) -> Result<RepoRef> {
    let name = args
        .get("name")
        .filter(|n| !n.is_empty())
        .ok_or_else(|| Error::syntax(lineno, "repo requires --name"))?;

    let mut repo = RepoRef::new(name);
    for (key, value) in &args.options {
        if key != "name" {
            repo.push(key.as_str(), value.as_str());
        }
    }
    Ok(repo)
}

fn parse_package_line(line: &str, packages: &mut PackageSelection) {
    if let Some(group) = line.strip_prefix('@') {
        // `@core --optional`: group options do not change the name
        let Some(group) = group.split_whitespace().next() else {
            return;
        };
        if !packages.groups.iter().any(|g| g == group) {
            packages.groups.push(group.to_string());
        }
    } else if let Some(excluded) = line.strip_prefix('-') {
        packages.excluded.push(excluded.trim().to_string());
    } else if !packages.packages.iter().any(|p| p == line) {
        packages.packages.push(line.to_string());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Commands,
    Packages,
    Skipping,
}

/// Parse kickstart text
pub fn parse(content: &str) -> Result<KickstartDescriptor> {
    let mut ks = KickstartDescriptor::default();
    let mut state = State::Commands;
    let mut section_start = 0;

    for (idx, raw) in content.lines().enumerate() {
        let lineno = idx + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line == "%end" {
            if state == State::Commands {
                return Err(Error::syntax(lineno, "%end without a section"));
            }
            state = State::Commands;
            continue;
        }

        match state {
            State::Packages => parse_package_line(line, &mut ks.packages),
            State::Skipping => {}
            State::Commands => {
                if let Some(section) = line.strip_prefix('%') {
                    section_start = lineno;
                    let name = section.split_whitespace().next().unwrap_or_default();
                    state = if name == "packages" {
                        State::Packages
                    } else {
                        tracing::debug!(section = name, line = lineno, "Skipping kickstart section");
                        State::Skipping
                    };
                    continue;
                }

                let words = tokenize(line, lineno)?;
                let Some((command, rest)) = words.split_first() else {
                    continue;
                };
                let args = Args::parse(rest);
                match command.as_str() {
                    "part" | "partition" => ks.partitions.push(parse_partition(&args, lineno)?),
                    "repo" => ks.repos.push(parse_repo(&args, lineno)?),
                    other => tracing::trace!(command = other, line = lineno, "Ignoring command"),
                }
            }
        }
    }

    if state != State::Commands {
        return Err(Error::syntax(section_start, "section does not end with %end"));
    }
    Ok(ks)
}

/// Reads kickstart files from disk
#[derive(Debug, Clone, Copy, Default)]
pub struct KickstartFile;

impl KickstartFile {
    pub fn new() -> Self {
        Self
    }

    /// Read and parse `path`
    pub fn load(&self, path: &Path) -> Result<KickstartDescriptor> {
        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let ks = parse(&content)?;
        tracing::debug!(
            ?path,
            partitions = ks.partitions.len(),
            repos = ks.repos.len(),
            "Kickstart parsed"
        );
        Ok(ks)
    }
}

impl KickstartReader for KickstartFile {
    fn read(&self, path: &Path) -> mkimg_conf::Result<KickstartDescriptor> {
        self.load(path).map_err(|e| mkimg_conf::Error::KickstartRead {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}
