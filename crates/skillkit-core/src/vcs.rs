//! Version-control access.
//!
//! Every flow that touches git goes through the [`Vcs`] trait so release and
//! preset logic can be exercised against a recording fake. [`Git`] is the
//! real implementation: one `git` subprocess per call, run in the project
//! root, stderr captured into the error on failure.

use crate::error::{Result, SkillkitError};
use std::path::{Path, PathBuf};
use std::process::Command;

pub trait Vcs {
    fn is_work_tree(&self) -> bool;
    fn current_branch(&self) -> Result<String>;
    fn has_uncommitted_changes(&self) -> Result<bool>;
    fn tag_exists(&self, tag: &str) -> Result<bool>;
    fn local_branch_exists(&self, branch: &str) -> Result<bool>;
    fn remote_branches(&self, remote: &str) -> Result<Vec<String>>;

    fn add(&self, paths: &[&Path]) -> Result<()>;
    /// Commit only `paths`; anything else already staged stays in the index.
    fn commit(&self, message: &str, paths: &[&Path]) -> Result<()>;
    fn tag_annotated(&self, tag: &str, message: &str) -> Result<()>;
    fn push(&self, remote: &str, refname: &str) -> Result<()>;
    fn stash(&self, message: &str) -> Result<()>;
    fn fetch(&self, remote: &str, branch: &str) -> Result<()>;
    fn checkout(&self, branch: &str) -> Result<()>;
    fn checkout_tracking(&self, branch: &str, remote: &str) -> Result<()>;
}

// ---------------------------------------------------------------------------
// Git
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Git {
    root: PathBuf,
}

impl Git {
    /// Fails with [`SkillkitError::GitNotInstalled`] when no `git` binary is on PATH.
    pub fn new(root: &Path) -> Result<Self> {
        which::which("git").map_err(|_| SkillkitError::GitNotInstalled)?;
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new("git");
        cmd.args(args).current_dir(&self.root);
        cmd
    }

    /// Run git and return trimmed stdout; non-zero exit is an error.
    fn run(&self, args: &[&str]) -> Result<String> {
        tracing::debug!(args = %args.join(" "), "git");
        let output = self.command(args).output()?;
        if !output.status.success() {
            return Err(SkillkitError::GitFailed {
                args: args.join(" "),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Run git with `paths` appended after a `--` separator.
    fn run_with_paths(&self, args: &[&str], paths: &[&Path]) -> Result<()> {
        let paths: Vec<String> = paths.iter().map(|p| p.display().to_string()).collect();
        let mut full: Vec<&str> = args.to_vec();
        full.push("--");
        full.extend(paths.iter().map(String::as_str));
        self.run(&full).map(|_| ())
    }

    /// Run git and report only whether it exited successfully.
    fn succeeds(&self, args: &[&str]) -> Result<bool> {
        tracing::debug!(args = %args.join(" "), "git (status only)");
        let output = self.command(args).output()?;
        Ok(output.status.success())
    }
}

impl Vcs for Git {
    fn is_work_tree(&self) -> bool {
        matches!(
            self.run(&["rev-parse", "--is-inside-work-tree"]).as_deref(),
            Ok("true")
        )
    }

    fn current_branch(&self) -> Result<String> {
        self.run(&["rev-parse", "--abbrev-ref", "HEAD"])
    }

    /// Tracked changes only; untracked files survive a checkout and are not stashed.
    fn has_uncommitted_changes(&self) -> Result<bool> {
        Ok(!self
            .run(&["status", "--porcelain", "--untracked-files=no"])?
            .is_empty())
    }

    fn tag_exists(&self, tag: &str) -> Result<bool> {
        let refname = format!("refs/tags/{tag}");
        self.succeeds(&["rev-parse", "-q", "--verify", &refname])
    }

    fn local_branch_exists(&self, branch: &str) -> Result<bool> {
        let refname = format!("refs/heads/{branch}");
        self.succeeds(&["show-ref", "--verify", "--quiet", &refname])
    }

    fn remote_branches(&self, remote: &str) -> Result<Vec<String>> {
        let out = self.run(&["ls-remote", "--heads", remote])?;
        Ok(parse_ls_remote_heads(&out))
    }

    fn add(&self, paths: &[&Path]) -> Result<()> {
        self.run_with_paths(&["add"], paths)
    }

    fn commit(&self, message: &str, paths: &[&Path]) -> Result<()> {
        self.run_with_paths(&["commit", "-m", message], paths)
    }

    fn tag_annotated(&self, tag: &str, message: &str) -> Result<()> {
        self.run(&["tag", "-a", tag, "-m", message]).map(|_| ())
    }

    fn push(&self, remote: &str, refname: &str) -> Result<()> {
        self.run(&["push", remote, refname]).map(|_| ())
    }

    fn stash(&self, message: &str) -> Result<()> {
        self.run(&["stash", "push", "-m", message]).map(|_| ())
    }

    fn fetch(&self, remote: &str, branch: &str) -> Result<()> {
        self.run(&["fetch", remote, branch]).map(|_| ())
    }

    fn checkout(&self, branch: &str) -> Result<()> {
        self.run(&["checkout", branch]).map(|_| ())
    }

    fn checkout_tracking(&self, branch: &str, remote: &str) -> Result<()> {
        let upstream = format!("{remote}/{branch}");
        self.run(&["checkout", "-b", branch, "--track", &upstream])
            .map(|_| ())
    }
}

/// Branch names from `git ls-remote --heads` output (`<sha>\trefs/heads/<name>`).
pub fn parse_ls_remote_heads(output: &str) -> Vec<String> {
    output
        .lines()
        .filter_map(|line| line.split_whitespace().nth(1))
        .filter_map(|r| r.strip_prefix("refs/heads/"))
        .map(str::to_string)
        .collect()
}
