use crate::error::Result;
use crate::paths;
use crate::preset::Preset;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// ReleaseConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseConfig {
    #[serde(default = "default_plugin_manifest")]
    pub plugin_manifest: String,
    #[serde(default = "default_marketplace_manifest")]
    pub marketplace_manifest: String,
    #[serde(default = "default_remote")]
    pub remote: String,
    /// Branch to push. `None` pushes the currently checked-out branch.
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default = "default_tag_prefix")]
    pub tag_prefix: String,
}

fn default_plugin_manifest() -> String {
    paths::DEFAULT_PLUGIN_MANIFEST.to_string()
}

fn default_marketplace_manifest() -> String {
    paths::DEFAULT_MARKETPLACE_MANIFEST.to_string()
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_tag_prefix() -> String {
    "v".to_string()
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        Self {
            plugin_manifest: default_plugin_manifest(),
            marketplace_manifest: default_marketplace_manifest(),
            remote: default_remote(),
            branch: None,
            tag_prefix: default_tag_prefix(),
        }
    }
}

impl ReleaseConfig {
    pub fn tag_for(&self, version: &str) -> String {
        format!("{}{}", self.tag_prefix, version)
    }
}

// ---------------------------------------------------------------------------
// SwitchMode
// ---------------------------------------------------------------------------

/// How applying a preset affects the project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwitchMode {
    /// Only the state file is written.
    #[default]
    State,
    /// Check out the preset's branch, then write the state file.
    Git,
}

// ---------------------------------------------------------------------------
// DetectConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleConfig {
    pub pattern: String,
    pub preset: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectConfig {
    #[serde(default = "default_manifests")]
    pub manifests: Vec<String>,
    #[serde(default = "default_max_manifests")]
    pub max_manifests: usize,
    /// Ordered regex rules. Empty means the built-in table.
    #[serde(default)]
    pub rules: Vec<RuleConfig>,
}

fn default_manifests() -> Vec<String> {
    vec!["Nargo.toml".to_string(), "package.json".to_string()]
}

fn default_max_manifests() -> usize {
    10
}

impl Default for DetectConfig {
    fn default() -> Self {
        Self {
            manifests: default_manifests(),
            max_manifests: default_max_manifests(),
            rules: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// PresetConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresetConfig {
    #[serde(default)]
    pub mode: SwitchMode,
    #[serde(default = "default_state_file")]
    pub state_file: String,
    #[serde(default)]
    pub default: Preset,
    #[serde(default = "default_remote")]
    pub remote: String,
    /// Branch per preset for `git` mode. Missing entries use the preset name.
    #[serde(default)]
    pub branches: BTreeMap<Preset, String>,
    #[serde(default)]
    pub detect: DetectConfig,
}

fn default_state_file() -> String {
    paths::DEFAULT_STATE_FILE.to_string()
}

impl Default for PresetConfig {
    fn default() -> Self {
        Self {
            mode: SwitchMode::default(),
            state_file: default_state_file(),
            default: Preset::default(),
            remote: default_remote(),
            branches: BTreeMap::new(),
            detect: DetectConfig::default(),
        }
    }
}

impl PresetConfig {
    pub fn branch_for(&self, preset: Preset) -> String {
        self.branches
            .get(&preset)
            .cloned()
            .unwrap_or_else(|| preset.as_str().to_string())
    }

    pub fn state_path(&self, root: &Path) -> PathBuf {
        paths::resolve(root, &self.state_file)
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub release: ReleaseConfig,
    #[serde(default)]
    pub preset: PresetConfig,
}

impl Config {
    /// Load `.skillkit/config.yaml`. A missing file yields all defaults.
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        match crate::io::read_optional(&path)? {
            Some(data) if !data.trim().is_empty() => {
                let config: Config = serde_yaml::from_str(&data)?;
                tracing::debug!(path = %path.display(), "loaded config");
                Ok(config)
            }
            _ => Ok(Config::default()),
        }
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&paths::config_path(root), data.as_bytes())
    }

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.release.plugin_manifest == self.release.marketplace_manifest {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "release.plugin_manifest and release.marketplace_manifest point at the same file".into(),
            });
        }
        if self.release.remote.trim().is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "release.remote is empty".into(),
            });
        }
        if self.preset.detect.max_manifests == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "preset.detect.max_manifests is 0: detection will never find a manifest"
                    .into(),
            });
        }
        if self.preset.detect.manifests.is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "preset.detect.manifests is empty".into(),
            });
        }
        for rule in &self.preset.detect.rules {
            if rule.preset.parse::<Preset>().is_err() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!("detection rule targets unknown preset '{}'", rule.preset),
                });
            }
            if let Err(e) = regex::Regex::new(&rule.pattern) {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!("detection rule pattern '{}' is invalid: {e}", rule.pattern),
                });
            }
        }
        warnings
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
    fn missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.release.remote, "origin");
        assert_eq!(config.release.tag_for("1.2.3"), "v1.2.3");
        assert_eq!(config.preset.mode, SwitchMode::State);
        assert_eq!(config.preset.default, Preset::Devnet);
        assert_eq!(config.preset.detect.max_manifests, 10);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".skillkit")).unwrap();
        std::fs::write(
            dir.path().join(".skillkit/config.yaml"),
            "preset:\n  mode: git\n  branches:\n    mainnet: release/mainnet\n",
        )
        .unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.preset.mode, SwitchMode::Git);
        assert_eq!(config.preset.branch_for(Preset::Mainnet), "release/mainnet");
        assert_eq!(config.preset.branch_for(Preset::Testnet), "testnet");
        assert_eq!(config.release.plugin_manifest, paths::DEFAULT_PLUGIN_MANIFEST);
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.release.tag_prefix = "release-".into();
        config.save(dir.path()).unwrap();
        let loaded = Config::load(dir.path()).unwrap();
        assert_eq!(loaded.release.tag_for("2.0.0"), "release-2.0.0");
    }

    #[test]
    fn validate_flags_bad_rules() {
        let mut config = Config::default();
        config.preset.detect.rules = vec![
            RuleConfig {
                pattern: "(".into(),
                preset: "devnet".into(),
            },
            RuleConfig {
                pattern: "alpha".into(),
                preset: "staging".into(),
            },
        ];
        config.preset.detect.max_manifests = 0;
        let warnings = config.validate();
        assert_eq!(
            warnings
                .iter()
                .filter(|w| w.level == WarnLevel::Error)
                .count(),
            2
        );
        assert!(warnings.iter().any(|w| w.level == WarnLevel::Warning));
    }
}
