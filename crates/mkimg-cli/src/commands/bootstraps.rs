//! Bootstraps command implementation

use colored::Colorize;
use mkimg_conf::ConfigManager;

use crate::error::Result;

/// Run the bootstraps command
pub fn run_bootstraps(config: &ConfigManager) -> Result<()> {
    let bootstraps = config.bootstraps();
    if bootstraps.is_empty() {
        println!("{}", "No bootstrap groups configured".dimmed());
        return Ok(());
    }

    for (name, group) in bootstraps {
        println!("{}", name.bold());
        for (repo, repostr) in group.repos().iter().zip(group.repostrs()) {
            println!("  {} {}", format!("{}:", repo.key).cyan(), repostr);
        }
    }
    Ok(())
}
