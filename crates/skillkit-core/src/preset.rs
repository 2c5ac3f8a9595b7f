use crate::error::{Result, SkillkitError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

// ---------------------------------------------------------------------------
// Preset
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    #[default]
    Devnet,
    Testnet,
    Mainnet,
}

impl Preset {
    pub fn all() -> &'static [Preset] {
        &[Preset::Devnet, Preset::Testnet, Preset::Mainnet]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Preset::Devnet => "devnet",
            Preset::Testnet => "testnet",
            Preset::Mainnet => "mainnet",
        }
    }

    /// Static note recorded in the state file alongside the preset.
    pub fn note(self) -> &'static str {
        match self {
            Preset::Devnet => "Development network syntax: latest APIs, may change between releases",
            Preset::Testnet => "Public testnet syntax: stable APIs pinned to the current testnet release",
            Preset::Mainnet => "Mainnet syntax: production APIs only",
        }
    }

    /// Guidance printed after a successful switch.
    pub fn guidance(self) -> &'static [&'static str] {
        match self {
            Preset::Devnet => &[
                "Skills and commands will show devnet syntax.",
                "Expect breaking changes; re-run 'skillkit preset detect' after upgrading dependencies.",
            ],
            Preset::Testnet => &[
                "Skills and commands will show testnet syntax.",
                "Pin your dependency tags to the testnet release line.",
            ],
            Preset::Mainnet => &[
                "Skills and commands will show mainnet syntax.",
                "Experimental devnet-only APIs are hidden from examples.",
            ],
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Preset {
    type Err = SkillkitError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "devnet" => Ok(Preset::Devnet),
            "testnet" => Ok(Preset::Testnet),
            "mainnet" => Ok(Preset::Mainnet),
            _ => Err(SkillkitError::UnknownPreset(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// PresetState (on disk)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresetState {
    #[serde(rename = "selectedPreset", alias = "version", alias = "preset")]
    pub selected_preset: Preset,
    #[serde(rename = "setAt", alias = "timestamp")]
    pub set_at: DateTime<Utc>,
    #[serde(default)]
    pub note: String,
}

impl PresetState {
    pub fn new(preset: Preset) -> Self {
        Self {
            selected_preset: preset,
            set_at: Utc::now(),
            note: preset.note().to_string(),
        }
    }

    /// Load the state file. A missing file is valid and yields `None`.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        match crate::io::read_optional(path)? {
            Some(data) => Ok(Some(serde_json::from_str(&data)?)),
            None => Ok(None),
        }
    }

    /// Full overwrite, never a merge.
    pub fn save(&self, path: &Path) -> Result<()> {
        crate::io::write_json_pretty(path, self)
    }
}

/// The preset in effect: the recorded one, or `default` when nothing is recorded.
pub fn effective(state: Option<&PresetState>, default: Preset) -> Preset {
    state.map(|s| s.selected_preset).unwrap_or(default)
}

// ---------------------------------------------------------------------------
// PresetAction (argument → decision)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresetAction {
    /// No argument: usage plus the current preset.
    Usage,
    Status,
    Detect,
    List,
    Help,
    Apply(Preset),
    Unknown(String),
}

impl PresetAction {
    pub fn parse(arg: Option<&str>) -> Self {
        let Some(arg) = arg.map(str::trim) else {
            return PresetAction::Usage;
        };
        match arg {
            "" => PresetAction::Usage,
            "status" => PresetAction::Status,
            "detect" => PresetAction::Detect,
            "list" => PresetAction::List,
            "help" | "-h" | "--help" => PresetAction::Help,
            other => match other.parse::<Preset>() {
                Ok(p) => PresetAction::Apply(p),
                Err(_) => PresetAction::Unknown(other.to_string()),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn preset_round_trips_through_str() {
        for p in Preset::all() {
            assert_eq!(p.as_str().parse::<Preset>().unwrap(), *p);
        }
        assert!("Devnet".parse::<Preset>().is_err());
    }

    #[test]
    fn parse_modes() {
        assert_eq!(PresetAction::parse(None), PresetAction::Usage);
        assert_eq!(PresetAction::parse(Some("status")), PresetAction::Status);
        assert_eq!(PresetAction::parse(Some("detect")), PresetAction::Detect);
        assert_eq!(PresetAction::parse(Some("list")), PresetAction::List);
        assert_eq!(PresetAction::parse(Some("--help")), PresetAction::Help);
        assert_eq!(PresetAction::parse(Some("-h")), PresetAction::Help);
        assert_eq!(
            PresetAction::parse(Some("mainnet")),
            PresetAction::Apply(Preset::Mainnet)
        );
        assert_eq!(
            PresetAction::parse(Some("staging")),
            PresetAction::Unknown("staging".into())
        );
    }

    #[test]
    fn missing_state_means_default() {
        let dir = TempDir::new().unwrap();
        let state = PresetState::load(&dir.path().join("preset.json")).unwrap();
        assert!(state.is_none());
        assert_eq!(effective(state.as_ref(), Preset::default()), Preset::Devnet);
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".skillkit/preset.json");
        let state = PresetState::new(Preset::Testnet);
        state.save(&path).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"selectedPreset\": \"testnet\""));
        assert!(raw.contains("\"setAt\""));

        let loaded = PresetState::load(&path).unwrap().unwrap();
        assert_eq!(loaded, state);
    }

    #[test]
    fn legacy_field_names_are_accepted() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(
            &path,
            r#"{"version":"mainnet","timestamp":"2025-01-02T03:04:05Z","note":"x"}"#,
        )
        .unwrap();
        let loaded = PresetState::load(&path).unwrap().unwrap();
        assert_eq!(loaded.selected_preset, Preset::Mainnet);
    }

    #[test]
    fn out_of_set_value_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(
            &path,
            r#"{"selectedPreset":"staging","setAt":"2025-01-02T03:04:05Z"}"#,
        )
        .unwrap();
        assert!(PresetState::load(&path).is_err());
    }
}
