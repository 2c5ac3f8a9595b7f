use crate::config::PresetConfig;
use crate::error::{Result, SkillkitError};
use crate::preset::{Preset, PresetState};
use crate::vcs::Vcs;
use serde::Serialize;
use std::path::Path;

/// Write the state file for `preset`. This is the single mutation every
/// successful apply ends with, whatever the switch mode.
pub fn apply_state(root: &Path, config: &PresetConfig, preset: Preset) -> Result<PresetState> {
    let state = PresetState::new(preset);
    let path = config.state_path(root);
    state.save(&path)?;
    tracing::info!(preset = %preset, path = %path.display(), "preset applied");
    Ok(state)
}

// ---------------------------------------------------------------------------
// Git-branch variant
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BranchSwitch {
    pub preset: Preset,
    pub branch: String,
    pub remote: String,
    pub on_remote: bool,
    pub local: bool,
    /// Uncommitted changes present; the caller decides whether to stash.
    pub dirty: bool,
}

/// Resolve where `preset` lives without changing anything.
pub fn plan_branch_switch(
    vcs: &dyn Vcs,
    config: &PresetConfig,
    preset: Preset,
) -> Result<BranchSwitch> {
    if !vcs.is_work_tree() {
        return Err(SkillkitError::NotARepository(
            "git preset mode needs a cloned repository".into(),
        ));
    }
    let branch = config.branch_for(preset);
    // An unreachable remote still leaves local branches usable.
    let remote_branches = vcs.remote_branches(&config.remote).unwrap_or_else(|e| {
        tracing::debug!(remote = %config.remote, error = %e, "remote unavailable; using local branches only");
        Vec::new()
    });
    let on_remote = remote_branches.iter().any(|b| *b == branch);
    let local = vcs.local_branch_exists(&branch)?;
    if !on_remote && !local {
        return Err(SkillkitError::BranchNotFound {
            branch,
            remote: config.remote.clone(),
            available: remote_branches,
        });
    }
    Ok(BranchSwitch {
        preset,
        branch,
        remote: config.remote.clone(),
        on_remote,
        local,
        dirty: vcs.has_uncommitted_changes()?,
    })
}

/// Check out the planned branch. Stashes first when `stash` is set and the
/// tree is dirty.
pub fn execute_branch_switch(vcs: &dyn Vcs, switch: &BranchSwitch, stash: bool) -> Result<()> {
    if switch.dirty && stash {
        vcs.stash(&format!("skillkit: before switching to {}", switch.preset))?;
    }
    if switch.on_remote {
        vcs.fetch(&switch.remote, &switch.branch)?;
    }
    if switch.local {
        vcs.checkout(&switch.branch)
    } else {
        vcs.checkout_tracking(&switch.branch, &switch.remote)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::RecordingVcs;
    use tempfile::TempDir;

    #[test]
    fn apply_state_overwrites() {
        let dir = TempDir::new().unwrap();
        let config = PresetConfig::default();
        apply_state(dir.path(), &config, Preset::Mainnet).unwrap();
        apply_state(dir.path(), &config, Preset::Testnet).unwrap();
        let state = PresetState::load(&config.state_path(dir.path()))
            .unwrap()
            .unwrap();
        assert_eq!(state.selected_preset, Preset::Testnet);
        assert_eq!(state.note, Preset::Testnet.note());
    }

    #[test]
    fn remote_only_branch_is_fetched_and_tracked() {
        let mut vcs = RecordingVcs::repo();
        vcs.remote_branches = vec!["devnet".into(), "testnet".into()];
        let switch =
            plan_branch_switch(&vcs, &PresetConfig::default(), Preset::Testnet).unwrap();
        assert!(switch.on_remote && !switch.local);

        execute_branch_switch(&vcs, &switch, false).unwrap();
        assert_eq!(
            vcs.calls(),
            vec!["fetch origin testnet", "checkout-track origin/testnet"]
        );
    }

    #[test]
    fn local_only_branch_is_checked_out_without_fetch() {
        let mut vcs = RecordingVcs::repo();
        vcs.local_branches.push("mainnet".into());
        vcs.dirty = true;
        let switch =
            plan_branch_switch(&vcs, &PresetConfig::default(), Preset::Mainnet).unwrap();
        assert!(switch.dirty);

        execute_branch_switch(&vcs, &switch, true).unwrap();
        assert_eq!(vcs.calls(), vec!["stash", "checkout mainnet"]);
    }

    #[test]
    fn unreachable_remote_falls_back_to_local_branch() {
        let mut vcs = RecordingVcs::repo();
        vcs.local_branches.push("testnet".into());
        let config = PresetConfig {
            remote: "upstream".into(),
            ..PresetConfig::default()
        };
        let switch = plan_branch_switch(&vcs, &config, Preset::Testnet).unwrap();
        assert!(switch.local && !switch.on_remote);

        execute_branch_switch(&vcs, &switch, false).unwrap();
        assert_eq!(vcs.calls(), vec!["checkout testnet"]);
    }

    #[test]
    fn unreachable_remote_without_local_branch_is_not_found() {
        let vcs = RecordingVcs::repo();
        let config = PresetConfig {
            remote: "upstream".into(),
            ..PresetConfig::default()
        };
        assert!(matches!(
            plan_branch_switch(&vcs, &config, Preset::Mainnet),
            Err(SkillkitError::BranchNotFound { available, .. }) if available.is_empty()
        ));
    }

    #[test]
    fn missing_branch_lists_remote_branches() {
        let mut vcs = RecordingVcs::repo();
        vcs.remote_branches = vec!["main".into(), "devnet".into()];
        let err = plan_branch_switch(&vcs, &PresetConfig::default(), Preset::Mainnet)
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("mainnet") && msg.contains("main, devnet"), "{msg}");
        assert!(vcs.calls().is_empty());
    }

    #[test]
    fn outside_a_repository_is_fatal() {
        let vcs = RecordingVcs::default();
        assert!(matches!(
            plan_branch_switch(&vcs, &PresetConfig::default(), Preset::Devnet),
            Err(SkillkitError::NotARepository(_))
        ));
    }
}
