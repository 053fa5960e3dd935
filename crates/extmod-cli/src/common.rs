//! Common types and utilities shared across commands

use anyhow::{Context, Result};
use clap::Parser;
use extmod_config::Config;
use extmod_runtime::{load_module, Module};
use extmod_settings::{FileBackend, SettingsStore};
use std::sync::Arc;

/// Global CLI options available to all commands
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOpts {
    #[arg(short, long, global = true, help = "Decrease verbosity")]
    pub quiet: bool,

    #[arg(short, long, global = true, action = clap::ArgAction::Count, help = "Increase verbosity (-v for debug, -vv for trace)")]
    pub verbose: u8,

    #[arg(long, global = true, help = "Only write log messages to the log file")]
    pub no_stdout: bool,
}

impl GlobalOpts {
    /// Get the effective verbosity level
    /// - 0: quiet/warn only
    /// - 1: debug (-v)
    /// - 2: trace (-vv)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}

pub fn load_config() -> Result<Config> {
    let path = Config::path();
    Config::load().with_context(|| format!("Failed to load config from {}", path.display()))
}

/// Settings store backed by the configured settings document
pub fn open_store(config: &Config) -> SettingsStore {
    SettingsStore::new(Arc::new(FileBackend::new(config.get_store_path())))
}

/// Load an installed module against the configured settings store
pub fn open_module(config: &Config, prefix: &str) -> Result<Module> {
    load_module(config, prefix, open_store(config))
        .with_context(|| format!("Failed to load module '{}'", prefix))
}
