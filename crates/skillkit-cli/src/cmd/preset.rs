use crate::output::{heading, print_json, print_table, success, warn};
use crate::prompt::Prompter;
use anyhow::Context;
use clap::Args;
use colored::Colorize;
use skillkit_core::config::{Config, SwitchMode};
use skillkit_core::detect::{self, Detection};
use skillkit_core::paths;
use skillkit_core::preset::{self, Preset, PresetAction, PresetState};
use skillkit_core::switch;
use skillkit_core::vcs::Git;
use skillkit_core::SkillkitError;
use std::io::BufRead;
use std::path::Path;

#[derive(Args)]
pub struct PresetArgs {
    /// devnet, testnet, mainnet, or one of: status, detect, list, help
    pub target: Option<String>,

    /// Apply a detected preset without asking
    #[arg(long, short = 'y')]
    pub yes: bool,

    /// Stash uncommitted changes before switching branches (git mode)
    #[arg(long)]
    pub stash: bool,
}

/// Everything a preset invocation reads, loaded once up front.
struct Session<'a> {
    root: &'a Path,
    config: &'a Config,
    state: Option<PresetState>,
    current: Preset,
    json: bool,
}

pub fn run(root: &Path, config: &Config, args: PresetArgs, json: bool) -> anyhow::Result<()> {
    let mut prompter = Prompter::stdin();
    run_with(root, config, args, json, &mut prompter)
}

fn run_with<R: BufRead>(
    root: &Path,
    config: &Config,
    args: PresetArgs,
    json: bool,
    prompter: &mut Prompter<R>,
) -> anyhow::Result<()> {
    let action = PresetAction::parse(args.target.as_deref());
    match &action {
        PresetAction::Help => {
            println!("{}", usage());
            return Ok(());
        }
        PresetAction::Unknown(name) => {
            eprintln!("{}", usage());
            return Err(SkillkitError::UnknownPreset(name.clone()).into());
        }
        _ => {}
    }

    let state = load_state(root, config, action == PresetAction::Status)?;
    let current = preset::effective(state.as_ref(), config.preset.default);
    let session = Session {
        root,
        config,
        state,
        current,
        json,
    };

    match action {
        PresetAction::Usage => {
            println!("{}", usage());
            println!("Current preset: {}", session.current.as_str().cyan().bold());
            Ok(())
        }
        PresetAction::Status => status(&session),
        PresetAction::List => list(&session),
        PresetAction::Detect => detect_and_apply(&session, &args, prompter),
        PresetAction::Apply(target) => apply(&session, target, &args, prompter),
        PresetAction::Help | PresetAction::Unknown(_) => Ok(()),
    }
}

/// Read the state file. A corrupt file is fatal only for `status`; every
/// other mode treats it as absent, and an apply overwrites it.
fn load_state(root: &Path, config: &Config, strict: bool) -> anyhow::Result<Option<PresetState>> {
    let path = config.preset.state_path(root);
    match PresetState::load(&path) {
        Ok(state) => Ok(state),
        Err(e) if strict => {
            Err(anyhow::Error::new(e).context(format!("failed to read {}", path.display())))
        }
        Err(e) => {
            warn(&format!(
                "ignoring unreadable state file {}: {e}",
                paths::display_relative(root, &path)
            ));
            Ok(None)
        }
    }
}

pub fn usage() -> String {
    [
        "Usage: skillkit preset <devnet|testnet|mainnet|status|detect|list|help>",
        "",
        "  devnet | testnet | mainnet   switch to that preset",
        "  status                       show the active preset and state file",
        "  detect                       propose a preset from dependency manifests",
        "  list                         list presets",
        "  help                         show this message",
    ]
    .join("\n")
}

// ---------------------------------------------------------------------------
// status / list
// ---------------------------------------------------------------------------

fn status(s: &Session) -> anyhow::Result<()> {
    let path = s.config.preset.state_path(s.root);
    let shown_path = paths::display_relative(s.root, &path);

    if s.json {
        return print_json(&serde_json::json!({
            "preset": s.current,
            "stateFile": shown_path,
            "state": s.state,
        }));
    }

    println!("Current preset: {}", s.current.as_str().cyan().bold());
    match skillkit_core::io::read_optional(&path)? {
        Some(raw) => {
            println!("State file: {shown_path}");
            print!("{raw}");
            if !raw.ends_with('\n') {
                println!();
            }
        }
        None => println!("No state file; using default preset ({}).", s.config.preset.default),
    }
    Ok(())
}

fn list(s: &Session) -> anyhow::Result<()> {
    if s.json {
        let items: Vec<_> = Preset::all()
            .iter()
            .map(|p| {
                serde_json::json!({
                    "preset": p,
                    "active": *p == s.current,
                    "branch": s.config.preset.branch_for(*p),
                    "note": p.note(),
                })
            })
            .collect();
        return print_json(&items);
    }

    let rows = Preset::all()
        .iter()
        .map(|p| {
            vec![
                (if *p == s.current { "*" } else { "" }).to_string(),
                p.to_string(),
                s.config.preset.branch_for(*p),
                p.note().to_string(),
            ]
        })
        .collect();
    print_table(&["", "PRESET", "BRANCH", "NOTE"], rows);
    Ok(())
}

// ---------------------------------------------------------------------------
// detect
// ---------------------------------------------------------------------------

fn detect_and_apply<R: BufRead>(
    s: &Session,
    args: &PresetArgs,
    prompter: &mut Prompter<R>,
) -> anyhow::Result<()> {
    let detection = detect::detect(s.root, &s.config.preset.detect)
        .context("failed to scan dependency manifests")?;
    let default = s.config.preset.default;

    let (manifest, token, proposed) = match detection {
        Detection::Found {
            manifest,
            token,
            preset,
        } => (manifest, token, preset),
        Detection::NoManifest => {
            warn(&format!(
                "no dependency manifest ({}) found; defaulting to {default}",
                s.config.preset.detect.manifests.join(", ")
            ));
            return Ok(());
        }
        Detection::NoToken { scanned } => {
            warn(&format!(
                "no version tag found in {} manifest(s); defaulting to {default}",
                scanned.len()
            ));
            return Ok(());
        }
        Detection::Unclassified { manifest, token } => {
            warn(&format!(
                "unrecognized version '{token}' in {}; defaulting to {default}",
                paths::display_relative(s.root, &manifest)
            ));
            return Ok(());
        }
    };

    println!(
        "Detected {} from '{}' in {}",
        proposed.as_str().cyan().bold(),
        token,
        paths::display_relative(s.root, &manifest)
    );
    if proposed == s.current && s.state.is_some() {
        println!("Preset {proposed} is already active.");
    }

    if !args.yes && !prompter.confirm(&format!("Switch to {proposed}?"))? {
        println!("No changes made.");
        return Ok(());
    }
    apply(s, proposed, args, prompter)
}

// ---------------------------------------------------------------------------
// apply
// ---------------------------------------------------------------------------

fn apply<R: BufRead>(
    s: &Session,
    target: Preset,
    args: &PresetArgs,
    prompter: &mut Prompter<R>,
) -> anyhow::Result<()> {
    let cfg = &s.config.preset;

    if cfg.mode == SwitchMode::Git {
        let vcs = Git::new(s.root)?;
        let plan = switch::plan_branch_switch(&vcs, cfg, target)?;
        let stash = if plan.dirty {
            args.stash || prompter.confirm("You have uncommitted changes. Stash them?")?
        } else {
            false
        };
        if plan.dirty && !stash {
            println!("Aborted. Commit or stash your changes, then re-run.");
            return Ok(());
        }
        switch::execute_branch_switch(&vcs, &plan, stash)
            .with_context(|| format!("failed to switch to branch '{}'", plan.branch))?;
        if stash && !s.json {
            println!("Stashed local changes (restore with 'git stash pop').");
        }
        if !s.json {
            success(&format!("Checked out {}", plan.branch));
        }
    }

    let state = switch::apply_state(s.root, cfg, target)?;

    if s.json {
        return print_json(&state);
    }
    success(&format!("Preset set to {}", target.as_str().cyan().bold()));
    println!();
    heading(target.note());
    for line in target.guidance() {
        println!("  {line}");
    }
    Ok(())
}
