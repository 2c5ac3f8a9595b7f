use crate::config::ReleaseConfig;
use crate::error::{Result, SkillkitError};
use crate::version::{bump, BumpClass, VersionRecord};
use crate::vcs::Vcs;
use serde::Serialize;

// ---------------------------------------------------------------------------
// ReleasePlan
// ---------------------------------------------------------------------------

/// Everything a release will do, computed before anything is touched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReleasePlan {
    pub current: String,
    pub next: String,
    pub bump: String,
    pub tag: String,
    pub commit_message: String,
    pub tag_message: String,
}

impl ReleasePlan {
    pub fn new(record: &VersionRecord, class: &BumpClass, config: &ReleaseConfig) -> Result<Self> {
        let current = record.synced_version()?;
        let next = bump(&current, class)?;
        Ok(Self {
            tag: config.tag_for(&next),
            commit_message: format!("chore: release v{next}"),
            tag_message: format!("Release v{next}"),
            bump: class.to_string(),
            current,
            next,
        })
    }
}

/// Read-only checks run before the user is asked to continue.
pub fn preflight(vcs: &dyn Vcs, plan: &ReleasePlan) -> Result<()> {
    if !vcs.is_work_tree() {
        return Err(SkillkitError::NotARepository(
            "the release tool must run inside the plugin repository".into(),
        ));
    }
    if vcs.tag_exists(&plan.tag)? {
        return Err(SkillkitError::TagExists(plan.tag.clone()));
    }
    Ok(())
}

/// Rewrite both manifests, commit exactly those two files, and tag the commit.
pub fn execute(record: &mut VersionRecord, plan: &ReleasePlan, vcs: &dyn Vcs) -> Result<()> {
    record.write_version(&plan.next)?;
    let paths = record.paths();
    vcs.add(&paths)?;
    vcs.commit(&plan.commit_message, &paths)?;
    vcs.tag_annotated(&plan.tag, &plan.tag_message)?;
    tracing::info!(version = %plan.next, tag = %plan.tag, "release committed and tagged");
    Ok(())
}

// ---------------------------------------------------------------------------
// Publishing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PushTarget {
    pub remote: String,
    pub branch: String,
    pub tag: String,
}

impl PushTarget {
    pub fn resolve(config: &ReleaseConfig, plan: &ReleasePlan, vcs: &dyn Vcs) -> Result<Self> {
        let branch = match &config.branch {
            Some(b) => b.clone(),
            None => vcs.current_branch()?,
        };
        Ok(Self {
            remote: config.remote.clone(),
            branch,
            tag: plan.tag.clone(),
        })
    }

    /// Commands the user can run later when they decline to push now.
    pub fn manual_commands(&self) -> Vec<String> {
        vec![
            format!("git push {} {}", self.remote, self.branch),
            format!("git push {} {}", self.remote, self.tag),
        ]
    }
}

pub fn publish(target: &PushTarget, vcs: &dyn Vcs) -> Result<()> {
    vcs.push(&target.remote, &target.branch)?;
    vcs.push(&target.remote, &target.tag)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
