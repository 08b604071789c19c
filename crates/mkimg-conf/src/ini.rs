//! INI reader for site configuration files
//!
//! Implements the classic `ConfigParser` dialect administrators already write
//! site configs in:
//!
//! - `[section]` headers, `key = value` or `key: value` options
//! - `#` and `;` comment lines, ` ;` trailing comments
//! - indented lines continue the previous value
//! - option names are lower-cased
//! - `[DEFAULT]` options show through in every section
//! - `%(name)s` interpolation with `%%` as an escaped percent
//!
//! Section and option order is preserved as encountered.

/// Name of the section whose options are visible in every other section.
pub const DEFAULT_SECTION: &str = "DEFAULT";

const MAX_INTERPOLATION_DEPTH: usize = 10;

/// Errors raised while reading or interpolating an INI document
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("line {line}: file contains no section headers before '{content}'")]
    MissingSectionHeader { line: usize, content: String },

    #[error("line {line}: cannot parse '{content}'")]
    Malformed { line: usize, content: String },

    #[error("bad value substitution in [{section}] {option}: no option '{reference}'")]
    MissingReference {
        section: String,
        option: String,
        reference: String,
    },

    #[error("value substitution too deep in [{section}] {option}")]
    InterpolationDepth { section: String, option: String },

    #[error("bad interpolation syntax in [{section}] {option}: '{rest}'")]
    InterpolationSyntax {
        section: String,
        option: String,
        rest: String,
    },
}

/// A named group of options, in file order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct RawSection {
    name: String,
    options: Vec<(String, String)>,
}

impl RawSection {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            options: Vec::new(),
        }
    }

    fn get(&self, option: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|(k, _)| k == option)
            .map(|(_, v)| v.as_str())
    }

    fn set(&mut self, option: String, value: String) {
        if let Some(slot) = self.options.iter_mut().find(|(k, _)| *k == option) {
            slot.1 = value;
        } else {
            self.options.push((option, value));
        }
    }

    fn append_line(&mut self, option: &str, line: &str) {
        if let Some(slot) = self.options.iter_mut().find(|(k, _)| k == option) {
            slot.1.push('\n');
            slot.1.push_str(line);
        }
    }
}

/// A parsed INI document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniDocument {
    defaults: RawSection,
    sections: Vec<RawSection>,
}

impl IniDocument {
    /// Parse INI text.
    ///
    /// # Example
    ///
    /// ```
    /// use mkimg_conf::ini::IniDocument;
    ///
    /// let doc = IniDocument::parse("[create]\nTmpDir = /srv/tmp\n").unwrap();
    /// assert_eq!(doc.get("create", "tmpdir").unwrap().as_deref(), Some("/srv/tmp"));
    /// ```
    pub fn parse(content: &str) -> Result<Self, ParseError> {
        let mut doc = IniDocument {
            defaults: RawSection::new(DEFAULT_SECTION),
            sections: Vec::new(),
        };

        // Index into `sections`, or None for DEFAULT
        let mut current: Option<Option<usize>> = None;
        let mut last_option: Option<String> = None;

        for (idx, line) in content.lines().enumerate() {
            let lineno = idx + 1;

            if line.trim().is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            // Continuation of the previous value
            if line.starts_with(char::is_whitespace) {
                if let (Some(section), Some(option)) = (current, last_option.as_deref()) {
                    let value = line.trim();
                    if !value.is_empty() {
                        doc.section_at_mut(section).append_line(option, value);
                    }
                    continue;
                }
            }

            if let Some(name) = section_header(line) {
                current = Some(doc.open_section(name));
                last_option = None;
                continue;
            }

            let Some(section) = current else {
                return Err(ParseError::MissingSectionHeader {
                    line: lineno,
                    content: line.to_string(),
                });
            };

            let Some((option, value)) = option_line(line) else {
                return Err(ParseError::Malformed {
                    line: lineno,
                    content: line.to_string(),
                });
            };

            doc.section_at_mut(section).set(option.clone(), value);
            last_option = Some(option);
        }

        Ok(doc)
    }

    fn open_section(&mut self, name: &str) -> Option<usize> {
        if name == DEFAULT_SECTION {
            return None;
        }
        if let Some(pos) = self.sections.iter().position(|s| s.name == name) {
            return Some(pos);
        }
        self.sections.push(RawSection::new(name));
        Some(self.sections.len() - 1)
    }

    fn section_at_mut(&mut self, section: Option<usize>) -> &mut RawSection {
        match section {
            Some(pos) => &mut self.sections[pos],
            None => &mut self.defaults,
        }
    }

    fn raw_section(&self, name: &str) -> Option<&RawSection> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Section names in file order, excluding `DEFAULT`
    pub fn sections(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|s| s.name.as_str())
    }

    /// Option names written in the section itself, in file order
    pub fn own_options(&self, section: &str) -> Vec<String> {
        self.raw_section(section)
            .map(|raw| raw.options.iter().map(|(k, _)| k.clone()).collect())
            .unwrap_or_default()
    }

    /// Option names visible in a section: its own in file order, then any
    /// `DEFAULT` options it does not override.
    pub fn options(&self, section: &str) -> Vec<String> {
        let Some(raw) = self.raw_section(section) else {
            return Vec::new();
        };
        let mut names = self.own_options(section);
        for (key, _) in &self.defaults.options {
            if raw.get(key).is_none() {
                names.push(key.clone());
            }
        }
        names
    }

    /// Interpolated value of an option, or `None` when the section or option
    /// does not exist.
    pub fn get(&self, section: &str, option: &str) -> Result<Option<String>, ParseError> {
        let Some(raw) = self.raw_section(section) else {
            return Ok(None);
        };
        let option = option.to_lowercase();
        let Some(value) = raw.get(&option).or_else(|| self.defaults.get(&option)) else {
            return Ok(None);
        };
        self.interpolate(raw, &option, value).map(Some)
    }

    /// Interpolated `(option, value)` pairs of a section, in [`options`] order.
    ///
    /// [`options`]: IniDocument::options
    pub fn items(&self, section: &str) -> Result<Vec<(String, String)>, ParseError> {
        let mut items = Vec::new();
        for option in self.options(section) {
            if let Some(value) = self.get(section, &option)? {
                items.push((option, value));
            }
        }
        Ok(items)
    }

    fn lookup<'a>(&'a self, raw: &'a RawSection, key: &str) -> Option<&'a str> {
        raw.get(key).or_else(|| self.defaults.get(key))
    }

    fn interpolate(
        &self,
        raw: &RawSection,
        option: &str,
        value: &str,
    ) -> Result<String, ParseError> {
        let mut out = String::with_capacity(value.len());
        self.interpolate_into(raw, option, value, 1, &mut out)?;
        Ok(out)
    }

    fn interpolate_into(
        &self,
        raw: &RawSection,
        option: &str,
        value: &str,
        depth: usize,
        out: &mut String,
    ) -> Result<(), ParseError> {
        if depth > MAX_INTERPOLATION_DEPTH {
            return Err(ParseError::InterpolationDepth {
                section: raw.name.clone(),
                option: option.to_string(),
            });
        }

        let mut rest = value;
        while let Some(p) = rest.find('%') {
            out.push_str(&rest[..p]);
            rest = &rest[p..];

            if let Some(after) = rest.strip_prefix("%%") {
                out.push('%');
                rest = after;
                continue;
            }

            let syntax_error = || ParseError::InterpolationSyntax {
                section: raw.name.clone(),
                option: option.to_string(),
                rest: rest.to_string(),
            };

            let Some(inner) = rest.strip_prefix("%(") else {
                return Err(syntax_error());
            };
            let Some(close) = inner.find(")s") else {
                return Err(syntax_error());
            };
            let reference = inner[..close].to_lowercase();
            if reference.is_empty() || reference.contains(')') {
                return Err(syntax_error());
            }
            rest = &inner[close + 2..];

            let Some(replacement) = self.lookup(raw, &reference) else {
                return Err(ParseError::MissingReference {
                    section: raw.name.clone(),
                    option: option.to_string(),
                    reference,
                });
            };

            if replacement.contains('%') {
                self.interpolate_into(raw, option, replacement, depth + 1, out)?;
            } else {
                out.push_str(replacement);
            }
        }
        out.push_str(rest);
        Ok(())
    }
}

/// `[name]` at the start of a line, anything after the bracket ignored
fn section_header(line: &str) -> Option<&str> {
    let inner = line.strip_prefix('[')?;
    let end = inner.find(']')?;
    let name = inner[..end].trim();
    (!name.is_empty()).then_some(name)
}

/// `key = value` or `key: value`, whichever delimiter comes first
fn option_line(line: &str) -> Option<(String, String)> {
    let delim = line.find(&[':', '='][..])?;
    let key = line[..delim].trim();
    if key.is_empty() {
        return None;
    }

    let mut value = &line[delim + 1..];
    // Trailing " ;comment"
    if let Some(pos) = value.find(" ;").or_else(|| value.find("\t;")) {
        value = &value[..pos];
    }
    let value = value.trim();
    let value = if value == "\"\"" { "" } else { value };

    Some((key.to_lowercase(), value.to_string()))
}
