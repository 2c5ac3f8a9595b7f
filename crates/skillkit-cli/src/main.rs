mod cmd;
mod output;
mod prompt;
mod root;

use anyhow::Context;
use clap::{Parser, Subcommand};
use cmd::{config::ConfigSubcommand, preset::PresetArgs, release::ReleaseArgs};
use colored::Colorize;
use skillkit_core::config::Config;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "skillkit",
    about = "Release and preset tooling for the skills plugin bundle",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .skillkit/ or .git/)
    #[arg(long, global = true, env = "SKILLKIT_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Bump the plugin and marketplace versions together, commit, and tag
    Release(ReleaseArgs),

    /// Show, detect, or switch the active preset (devnet, testnet, mainnet)
    Preset(PresetArgs),

    /// Inspect .skillkit/config.yaml
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());
    tracing::debug!(root = %root.display(), "resolved project root");

    let result = Config::load(&root)
        .context("failed to load .skillkit/config.yaml")
        .and_then(|config| match cli.command {
            Commands::Release(args) => cmd::release::run(&root, &config, args, cli.json),
            Commands::Preset(args) => cmd::preset::run(&root, &config, args, cli.json),
            Commands::Config { subcommand } => {
                cmd::config::run(&root, &config, subcommand, cli.json)
            }
        });

    if let Err(e) = result {
        eprintln!("{} {e:#}", "error:".red().bold());
        std::process::exit(1);
    }
}
