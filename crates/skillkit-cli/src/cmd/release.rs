use crate::output::{heading, print_json, success};
use crate::prompt::Prompter;
use anyhow::Context;
use clap::Args;
use colored::Colorize;
use skillkit_core::config::Config;
use skillkit_core::paths;
use skillkit_core::release::{self, PushTarget, ReleasePlan};
use skillkit_core::vcs::Git;
use skillkit_core::version::{bump, BumpClass, VersionRecord};
use std::io::BufRead;
use std::path::Path;

#[derive(Args)]
pub struct ReleaseArgs {
    /// Bump class: patch, minor, major, or custom (skips the menu)
    #[arg(long, value_name = "CLASS")]
    pub bump: Option<String>,

    /// Version to use with `--bump custom`
    #[arg(long, value_name = "VERSION")]
    pub custom: Option<String>,

    /// Answer yes to "Continue?"
    #[arg(long, short = 'y')]
    pub yes: bool,

    /// Push the release commit and tag without asking
    #[arg(long, conflicts_with = "no_push")]
    pub push: bool,

    /// Keep the release local without asking
    #[arg(long)]
    pub no_push: bool,
}

pub fn run(root: &Path, config: &Config, args: ReleaseArgs, json: bool) -> anyhow::Result<()> {
    let mut prompter = Prompter::stdin();
    run_with(root, config, args, json, &mut prompter)
}

fn run_with<R: BufRead>(
    root: &Path,
    config: &Config,
    args: ReleaseArgs,
    json: bool,
    prompter: &mut Prompter<R>,
) -> anyhow::Result<()> {
    let mut record =
        VersionRecord::load(root, &config.release).context("failed to read version manifests")?;
    let current = record.synced_version()?;
    if !json {
        println!("Current version: {}", current.bold());
    }

    let class = select_bump(&args, &current, prompter)?;
    let plan = ReleasePlan::new(&record, &class, &config.release)?;

    let vcs = Git::new(root)?;
    release::preflight(&vcs, &plan)?;

    if !json {
        println!();
        heading(&format!("Release {} → {} ({})", plan.current, plan.next, plan.bump));
        for path in record.paths() {
            println!("  update  {}", paths::display_relative(root, path));
        }
        println!("  commit  {}", plan.commit_message);
        println!("  tag     {}", plan.tag);
        println!();
    }

    if !args.yes && !prompter.confirm("Continue?")? {
        println!("Aborted. No files were changed.");
        return Ok(());
    }

    release::execute(&mut record, &plan, &vcs)
        .with_context(|| format!("release v{} failed", plan.next))?;
    if !json {
        success(&format!("Committed and tagged {}", plan.tag));
    }

    let target = PushTarget::resolve(&config.release, &plan, &vcs)?;
    let push = if args.push {
        true
    } else if args.no_push {
        false
    } else {
        prompter.confirm(&format!(
            "Push {} and {} to {}?",
            target.branch, target.tag, target.remote
        ))?
    };

    if push {
        release::publish(&target, &vcs)?;
    }

    if json {
        print_json(&serde_json::json!({
            "plan": plan,
            "pushed": push,
            "target": target,
        }))?;
    } else if push {
        success(&format!(
            "Pushed {} and {} to {}",
            target.branch, target.tag, target.remote
        ));
    } else {
        println!("Not pushed. When you are ready, run:");
        for cmd in target.manual_commands() {
            println!("  {cmd}");
        }
    }

    Ok(())
}

/// Resolve the bump class from flags, falling back to the interactive menu.
fn select_bump<R: BufRead>(
    args: &ReleaseArgs,
    current: &str,
    prompter: &mut Prompter<R>,
) -> anyhow::Result<BumpClass> {
    let choice = match &args.bump {
        Some(b) => b.clone(),
        None => {
            eprintln!("Select version bump:");
            for (n, class) in [(1, BumpClass::Patch), (2, BumpClass::Minor), (3, BumpClass::Major)]
            {
                let preview = bump(current, &class).unwrap_or_else(|_| "?".to_string());
                eprintln!("  {n}) {:<6} → {preview}", class.label());
            }
            eprintln!("  4) custom");
            prompter.ask("Choice [1-4]:")?
        }
    };

    let custom = match (&args.custom, BumpClass::needs_custom(&choice)) {
        (Some(v), _) => Some(v.clone()),
        (None, true) => Some(prompter.ask("Custom version:")?),
        (None, false) => None,
    };

    Ok(BumpClass::from_menu(&choice, custom.as_deref())?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(bump: Option<&str>, custom: Option<&str>) -> ReleaseArgs {
        ReleaseArgs {
            bump: bump.map(str::to_string),
            custom: custom.map(str::to_string),
            yes: false,
            push: false,
            no_push: false,
        }
    }

    #[test]
    fn flag_skips_menu() {
        let mut p = Prompter::new("".as_bytes());
        let class = select_bump(&args(Some("minor"), None), "1.0.0", &mut p).unwrap();
        assert_eq!(class, BumpClass::Minor);
    }

    #[test]
    fn menu_custom_asks_for_version() {
        let mut p = Prompter::new("4\n9.9.9\n".as_bytes());
        let class = select_bump(&args(None, None), "1.0.0", &mut p).unwrap();
        assert_eq!(class, BumpClass::Custom("9.9.9".into()));
    }

    #[test]
    fn invalid_menu_answer_is_an_error() {
        let mut p = Prompter::new("9\n".as_bytes());
        assert!(select_bump(&args(None, None), "1.0.0", &mut p).is_err());
    }
}
