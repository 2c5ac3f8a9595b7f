//! Preset detection from dependency manifests.
//!
//! Detection walks the project for known manifest files, pulls a version or
//! tag token out of each, and classifies the token with an ordered rule
//! table. The first rule that matches decides the preset.

use crate::config::DetectConfig;
use crate::error::{Result, SkillkitError};
use crate::paths::SKIPPED_DIRS;
use crate::preset::Preset;
use crate::version::parse_version;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use walkdir::WalkDir;

/// Scope of the dependency whose version identifies the preset in `package.json`.
pub const SCOPED_PACKAGE_PREFIX: &str = "@aztec/";

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

pub enum Matcher {
    Predicate(fn(&str) -> bool),
    Pattern(Regex),
}

pub struct Rule {
    pub id: String,
    pub matcher: Matcher,
    pub preset: Preset,
}

impl Rule {
    pub fn matches(&self, token: &str) -> bool {
        match &self.matcher {
            Matcher::Predicate(f) => f(token),
            Matcher::Pattern(re) => re.is_match(token),
        }
    }
}

fn mentions_devnet(token: &str) -> bool {
    token.to_ascii_lowercase().contains("devnet")
}

fn mentions_testnet(token: &str) -> bool {
    token.to_ascii_lowercase().contains("testnet")
}

fn mentions_mainnet(token: &str) -> bool {
    token.to_ascii_lowercase().contains("mainnet")
}

fn is_stable_release(token: &str) -> bool {
    parse_version(token).is_ok_and(|v| v.major >= 1 && v.pre.is_empty())
}

/// 0.x releases and pre-releases of any line.
fn is_preview_release(token: &str) -> bool {
    parse_version(token).is_ok_and(|v| v.major == 0 || !v.pre.is_empty())
}

pub fn default_rules() -> Vec<Rule> {
    let rule = |id: &str, f: fn(&str) -> bool, preset| Rule {
        id: id.to_string(),
        matcher: Matcher::Predicate(f),
        preset,
    };
    vec![
        rule("mentions-devnet", mentions_devnet, Preset::Devnet),
        rule("mentions-testnet", mentions_testnet, Preset::Testnet),
        rule("mentions-mainnet", mentions_mainnet, Preset::Mainnet),
        rule("stable-release", is_stable_release, Preset::Mainnet),
        rule("preview-release", is_preview_release, Preset::Testnet),
    ]
}

pub struct Classifier {
    rules: Vec<Rule>,
}

impl Classifier {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Configured regex rules replace the built-in table when present.
    pub fn from_config(config: &DetectConfig) -> Result<Self> {
        if config.rules.is_empty() {
            return Ok(Self::new(default_rules()));
        }
        let rules = config
            .rules
            .iter()
            .map(|r| {
                let re = Regex::new(&r.pattern).map_err(|e| SkillkitError::InvalidRule {
                    pattern: r.pattern.clone(),
                    reason: e.to_string(),
                })?;
                Ok(Rule {
                    id: r.pattern.clone(),
                    matcher: Matcher::Pattern(re),
                    preset: r.preset.parse()?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(rules))
    }

    pub fn classify(&self, token: &str) -> Option<Preset> {
        let rule = self.rules.iter().find(|r| r.matches(token))?;
        tracing::debug!(rule = %rule.id, token = %token, preset = %rule.preset, "classified token");
        Some(rule.preset)
    }
}

// ---------------------------------------------------------------------------
// Manifest scanning
// ---------------------------------------------------------------------------

/// Up to `limit` manifests named in `names`, in sorted walk order.
pub fn find_manifests(root: &Path, names: &[String], limit: usize) -> Vec<PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            !(e.file_type().is_dir()
                && e.depth() > 0
                && SKIPPED_DIRS.iter().any(|d| e.file_name() == *d))
        })
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            let name = e.file_name().to_string_lossy();
            names.iter().any(|n| *n == name)
        })
        .take(limit)
        .map(|e| e.into_path())
        .collect()
}

static NARGO_TAG_RE: OnceLock<Regex> = OnceLock::new();
static VERSION_RE: OnceLock<Regex> = OnceLock::new();

fn nargo_tag_re() -> &'static Regex {
    NARGO_TAG_RE.get_or_init(|| Regex::new(r#"(?m)\btag\s*=\s*"([^"]+)""#).unwrap())
}

fn version_re() -> &'static Regex {
    VERSION_RE
        .get_or_init(|| Regex::new(r#"(?m)^\s*"?version"?\s*[:=]\s*"([^"]+)""#).unwrap())
}

/// Pull the version/tag token out of a manifest's content.
pub fn extract_token(path: &Path, content: &str) -> Option<String> {
    let name = path.file_name()?.to_string_lossy();
    match name.as_ref() {
        "Nargo.toml" => nargo_tag_re()
            .captures(content)
            .map(|c| c[1].to_string()),
        "package.json" => scoped_dependency_version(content),
        _ => version_re().captures(content).map(|c| c[1].to_string()),
    }
}

fn scoped_dependency_version(content: &str) -> Option<String> {
    let doc: serde_json::Value = serde_json::from_str(content).ok()?;
    ["dependencies", "devDependencies", "peerDependencies"]
        .iter()
        .filter_map(|section| doc.get(*section)?.as_object())
        .flat_map(|deps| deps.iter())
        .find(|(name, _)| name.starts_with(SCOPED_PACKAGE_PREFIX))
        .and_then(|(_, v)| v.as_str())
        .map(|v| v.trim_start_matches(['^', '~', '=']).trim().to_string())
        .filter(|v| !v.is_empty())
}

// ---------------------------------------------------------------------------
// Detection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum Detection {
    NoManifest,
    /// Manifests were found but none carried a token.
    NoToken { scanned: Vec<PathBuf> },
    /// A token was found but no rule matched it.
    Unclassified { manifest: PathBuf, token: String },
    Found {
        manifest: PathBuf,
        token: String,
        preset: Preset,
    },
}

impl Detection {
    pub fn preset(&self) -> Option<Preset> {
        match self {
            Detection::Found { preset, .. } => Some(*preset),
            _ => None,
        }
    }
}

pub fn detect(root: &Path, config: &DetectConfig) -> Result<Detection> {
    let classifier = Classifier::from_config(config)?;
    let manifests = find_manifests(root, &config.manifests, config.max_manifests);
    if manifests.is_empty() {
        tracing::debug!(root = %root.display(), "no dependency manifest found");
        return Ok(Detection::NoManifest);
    }

    let mut first_unclassified = None;
    for manifest in &manifests {
        let content = match std::fs::read_to_string(manifest) {
            Ok(c) => c,
            Err(e) => {
                tracing::debug!(manifest = %manifest.display(), error = %e, "skipping unreadable manifest");
                continue;
            }
        };
        let Some(token) = extract_token(manifest, &content) else {
            continue;
        };
        match classifier.classify(&token) {
            Some(preset) => {
                return Ok(Detection::Found {
                    manifest: manifest.clone(),
                    token,
                    preset,
                })
            }
            None => {
                first_unclassified.get_or_insert((manifest.clone(), token));
            }
        }
    }

    Ok(match first_unclassified {
        Some((manifest, token)) => {
            tracing::debug!(manifest = %manifest.display(), token = %token, "unrecognized version token");
            Detection::Unclassified { manifest, token }
        }
        None => {
            tracing::debug!(count = manifests.len(), "no version token in manifests");
            Detection::NoToken { scanned: manifests }
        }
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
