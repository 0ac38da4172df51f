// CLI module for oddscache
// Author: kelexine (https://github.com/kelexine)

use clap::Parser;
use std::path::PathBuf;

/// oddscache - Quota-aware caching gateway for The Odds API
#[derive(Parser, Debug)]
#[command(name = "oddscache", version, about, long_about = None)]
pub struct Args {
    /// Path to a TOML config file (default: ~/.oddscache/config.toml)
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Override the bind address
    #[arg(long)]
    pub host: Option<String>,

    /// Override the listen port
    #[arg(long, short)]
    pub port: Option<u16>,

    /// Print the effective configuration and exit
    #[arg(long)]
    pub print_config: bool,
}

impl Args {
    /// Apply CLI overrides on top of loaded configuration.
    pub fn apply(&self, config: &mut crate::config::AppConfig) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
    }
}
