//! Probe command implementation

use colored::Colorize;
use mkimg_conf::{GetenforceProbe, MacProbe, MacStatus};

use crate::error::Result;

/// Run the probe command
pub fn run_probe() -> Result<()> {
    let probe = GetenforceProbe::new();
    let status = probe.status();
    let shown = match status {
        MacStatus::Enforcing => status.to_string().red().bold(),
        MacStatus::Unknown => status.to_string().dimmed(),
        _ => status.to_string().green(),
    };
    println!("SELinux: {}", shown);
    if let Some(binary) = probe.locate() {
        println!("{}:   {}", "Probe".dimmed(), binary.display());
    }
    Ok(())
}
