//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// mkimg - Resolve image build configuration
#[derive(Parser, Debug)]
#[command(name = "mkimg")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Site configuration file (default: /etc/mkimg/mkimg.conf if present)
    #[arg(short = 'c', long, global = true, env = "MKIMG_SITECONF")]
    pub siteconf: Option<PathBuf>,

    /// Kickstart file to resolve against the site configuration
    #[arg(short, long, global = true)]
    pub ks: Option<PathBuf>,

    /// Build architecture, overriding the site configuration
    #[arg(short = 'A', long, global = true)]
    pub arch: Option<String>,

    /// Override one option, as SECTION.OPTION=VALUE (repeatable)
    #[arg(short = 's', long = "set", global = true, value_name = "SECTION.OPTION=VALUE")]
    pub overrides: Vec<String>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Show the resolved configuration
    Show {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// List bootstrap groups and their repository strings
    Bootstraps,

    /// Print the SELinux status used for safety checks
    Probe,
}
