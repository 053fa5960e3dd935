use crate::common::load_config;
use crate::logger;
use crate::GlobalOpts;
use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use extmod_config::Config;

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Print the current configuration
    Show,
    /// Set a configuration key (base-url, store-path)
    Set { key: String, value: String },
    /// Print the path of the configuration file
    Path,
}

pub fn handle_config(action: Option<ConfigAction>, opts: &GlobalOpts) -> Result<()> {
    match action.unwrap_or(ConfigAction::Show) {
        ConfigAction::Show => {
            let config = load_config()?;
            println!("{}", "Configuration:".bold().green());
            if config.is_empty() {
                if opts.verbosity_level() > 0 {
                    println!("  {}", "(empty)".yellow());
                }
            } else {
                for (key, value) in config.values_iter() {
                    println!("  {}: {}", key.cyan(), value);
                }
                println!(
                    "  {}: {}",
                    "store".cyan(),
                    config.get_store_path().display()
                );
                for module in &config.modules {
                    println!(
                        "  {}: {} v{} ({})",
                        "module".cyan(),
                        module.prefix,
                        module.version,
                        module.manifest.display()
                    );
                }
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = load_config()?;
            config.set(&key, value.clone())?;
            config
                .save()
                .with_context(|| format!("Failed to save config to {}", Config::path().display()))?;
            logger::success(&format!("Set {} = {}", key, value));
        }
        ConfigAction::Path => {
            let config_path = Config::path();
            logger::debug(&format!("Reading config from: {}", config_path.display()));
            println!("{}", config_path.display());
            if opts.verbosity_level() > 0 {
                if let Some(log_path) = logger::get_log_path() {
                    eprintln!("{}", format!("  Log file: {}", log_path.display()).dimmed());
                }
            }
        }
    }
    Ok(())
}
