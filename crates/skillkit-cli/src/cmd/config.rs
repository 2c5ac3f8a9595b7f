use crate::output::print_json;
use clap::Subcommand;
use colored::Colorize;
use skillkit_core::config::{Config, WarnLevel};
use skillkit_core::paths;
use std::path::Path;

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Print the effective configuration (defaults filled in)
    Show,

    /// Validate the config for common mistakes
    Validate,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(root: &Path, config: &Config, subcmd: ConfigSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ConfigSubcommand::Show => show(root, config, json),
        ConfigSubcommand::Validate => validate(config, json),
    }
}

fn show(root: &Path, config: &Config, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(config);
    }
    let source = paths::config_path(root);
    if source.exists() {
        println!("# {}", paths::display_relative(root, &source));
    } else {
        println!("# defaults (no {} found)", paths::CONFIG_FILE);
    }
    print!("{}", serde_yaml::to_string(config)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

fn validate(config: &Config, json: bool) -> anyhow::Result<()> {
    let warnings = config.validate();

    if json {
        print_json(&serde_json::json!({ "warnings": warnings }))?;
    } else if warnings.is_empty() {
        println!("Config is valid. No warnings.");
    } else {
        for w in &warnings {
            let prefix = match w.level {
                WarnLevel::Warning => "warning".yellow(),
                WarnLevel::Error => "error".red(),
            };
            println!("[{prefix}] {}", w.message);
        }
    }

    if warnings.iter().any(|w| w.level == WarnLevel::Error) {
        anyhow::bail!("config validation found errors");
    }
    Ok(())
}
