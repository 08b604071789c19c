//! Builds the configuration store from command-line arguments

use std::path::{Path, PathBuf};

use mkimg_conf::{Backends, ConfigManager, DEFAULT_SITECONF, GetenforceProbe, SectionKind};
use mkimg_ks::{KickstartFile, LocalRepoBackend};

use crate::cli::Cli;
use crate::error::{CliError, Result};

/// Site configuration to load: an explicit path always, the default only if
/// it exists
fn siteconf_path(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let default = Path::new(DEFAULT_SITECONF);
            if default.exists() {
                Some(default.to_path_buf())
            } else {
                tracing::debug!(path = DEFAULT_SITECONF, "No default site config");
                None
            }
        }
    }
}

/// Split `section.option=value`
fn parse_override(raw: &str) -> Result<(&str, &str, &str)> {
    let invalid = || {
        CliError::user(format!(
            "Invalid override '{}', expected SECTION.OPTION=VALUE",
            raw
        ))
    };
    let (key, value) = raw.split_once('=').ok_or_else(invalid)?;
    let (section, option) = key.trim().split_once('.').ok_or_else(invalid)?;
    if section.is_empty() || option.is_empty() {
        return Err(invalid());
    }
    Ok((section, option, value.trim()))
}

/// Apply the site configuration, command-line overrides and kickstart, in
/// that order
pub fn load_config(cli: &Cli) -> Result<ConfigManager> {
    let mut config = ConfigManager::new();
    config.set_siteconf(siteconf_path(cli.siteconf.as_deref()).as_deref())?;

    for raw in &cli.overrides {
        let (section, option, value) = parse_override(raw)?;
        config.set_option_by_name(section, option, value)?;
    }

    if let Some(arch) = &cli.arch {
        config.set_option(SectionKind::Create, "arch", arch.as_str());
    }

    if let Some(ks) = &cli.ks {
        let reader = KickstartFile::new();
        let repos = LocalRepoBackend::new();
        let probe = GetenforceProbe::new();
        let backends = Backends {
            reader: &reader,
            repos: &repos,
            probe: &probe,
        };
        config.set_ksconf(ks, &backends)?;
    }

    Ok(config)
}
