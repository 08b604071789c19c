//! Show command implementation

use colored::Colorize;
use mkimg_conf::{ConfigManager, SectionKind};
use serde_json::Value;

use crate::error::Result;

fn render(value: &Value) -> String {
    match value {
        Value::Null => "(unset)".dimmed().to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) if items.is_empty() => "[]".dimmed().to_string(),
        other => other.to_string(),
    }
}

/// Run the show command
pub fn run_show(config: &ConfigManager, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&config.to_json())?);
        return Ok(());
    }

    if let Some(path) = config.siteconf() {
        println!("{}: {}", "Site config".dimmed(), path.display());
    }
    if let Some(path) = config.ksconf() {
        println!("{}:   {}", "Kickstart".dimmed(), path.display());
    }

    for kind in SectionKind::ALL {
        println!();
        println!("{}", format!("[{}]", kind).bold());
        for (option, value) in config.section(kind) {
            println!("  {} = {}", option.cyan(), render(value));
        }
    }

    let proxies = config.proxies();
    if let Some(proxy) = proxies.proxy() {
        println!();
        println!("{}: {}", "Proxy".dimmed(), proxy);
        if !proxies.no_proxy().is_empty() {
            println!("{}: {}", "No proxy".dimmed(), proxies.no_proxy().join(", "));
        }
    }

    Ok(())
}
