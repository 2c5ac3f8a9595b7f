//! Fixtures shared by unit tests.

use crate::error::{Result, SkillkitError};
use crate::vcs::Vcs;
use std::cell::RefCell;
use std::path::Path;

pub fn write_manifests(root: &Path, plugin: &str, marketplace: &str) {
    let dir = root.join(".claude-plugin");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(
        dir.join("plugin.json"),
        format!(
            "{{\n  \"name\": \"aztec-skills\",\n  \"version\": \"{plugin}\",\n  \"description\": \"d\"\n}}\n"
        ),
    )
    .unwrap();
    std::fs::write(
        dir.join("marketplace.json"),
        format!(
            "{{\n  \"name\": \"market\",\n  \"plugins\": [\n    {{\n      \"name\": \"aztec-skills\",\n      \"version\": \"{marketplace}\"\n    }}\n  ]\n}}\n"
        ),
    )
    .unwrap();
}

/// In-memory `Vcs` that records every mutating call.
#[derive(Debug, Default)]
pub struct RecordingVcs {
    pub work_tree: bool,
    pub dirty: bool,
    pub branch: String,
    pub tags: Vec<String>,
    pub local_branches: Vec<String>,
    pub remote_branches: Vec<String>,
    pub calls: RefCell<Vec<String>>,
}

impl RecordingVcs {
    pub fn repo() -> Self {
        Self {
            work_tree: true,
            branch: "main".into(),
            local_branches: vec!["main".into()],
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: String) -> Result<()> {
        self.calls.borrow_mut().push(call);
        Ok(())
    }
}

impl Vcs for RecordingVcs {
    fn is_work_tree(&self) -> bool {
        self.work_tree
    }

    fn current_branch(&self) -> Result<String> {
        Ok(self.branch.clone())
    }

    fn has_uncommitted_changes(&self) -> Result<bool> {
        Ok(self.dirty)
    }

    fn tag_exists(&self, tag: &str) -> Result<bool> {
        Ok(self.tags.iter().any(|t| t == tag))
    }

    fn local_branch_exists(&self, branch: &str) -> Result<bool> {
        Ok(self.local_branches.iter().any(|b| b == branch))
    }

    fn remote_branches(&self, remote: &str) -> Result<Vec<String>> {
        if remote != "origin" {
            return Err(SkillkitError::GitFailed {
                args: format!("ls-remote --heads {remote}"),
                stderr: "no such remote".into(),
            });
        }
        Ok(self.remote_branches.clone())
    }

    fn add(&self, paths: &[&Path]) -> Result<()> {
        self.record(format!("add {}", paths.len()))
    }

    fn commit(&self, message: &str, paths: &[&Path]) -> Result<()> {
        self.record(format!("commit {message} ({} paths)", paths.len()))
    }

    fn tag_annotated(&self, tag: &str, _message: &str) -> Result<()> {
        self.record(format!("tag {tag}"))
    }

    fn push(&self, remote: &str, refname: &str) -> Result<()> {
        self.record(format!("push {remote} {refname}"))
    }

    fn stash(&self, _message: &str) -> Result<()> {
        self.record("stash".into())
    }

    fn fetch(&self, remote: &str, branch: &str) -> Result<()> {
        self.record(format!("fetch {remote} {branch}"))
    }

    fn checkout(&self, branch: &str) -> Result<()> {
        self.record(format!("checkout {branch}"))
    }

    fn checkout_tracking(&self, branch: &str, remote: &str) -> Result<()> {
        self.record(format!("checkout-track {remote}/{branch}"))
    }
}
