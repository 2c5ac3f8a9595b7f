//! Version records and semver bump arithmetic.
//!
//! The plugin descriptor stores its version at the top level; the marketplace
//! descriptor stores it on the first entry of its `plugins` list. Both must
//! agree before a bump, and both are rewritten together.

use crate::error::{Result, SkillkitError};
use crate::paths;
use semver::Version;
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};

pub const PLUGIN_VERSION_POINTER: &str = "/version";
pub const MARKETPLACE_VERSION_POINTER: &str = "/plugins/0/version";

// ---------------------------------------------------------------------------
// BumpClass
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BumpClass {
    Patch,
    Minor,
    Major,
    Custom(String),
}

impl BumpClass {
    /// Map an interactive menu answer to a bump class. Menu entries are
    /// numbered 1-4; names are accepted too. `custom` is supplied separately
    /// because it needs a second prompt.
    pub fn from_menu(choice: &str, custom: Option<&str>) -> Result<Self> {
        match choice.trim() {
            "1" | "patch" => Ok(BumpClass::Patch),
            "2" | "minor" => Ok(BumpClass::Minor),
            "3" | "major" => Ok(BumpClass::Major),
            "4" | "custom" => match custom.map(str::trim) {
                Some(v) if !v.is_empty() => Ok(BumpClass::Custom(v.to_string())),
                _ => Err(SkillkitError::EmptyCustomVersion),
            },
            other => Err(SkillkitError::InvalidSelection(other.to_string())),
        }
    }

    /// True when selecting `choice` requires asking for a custom version.
    pub fn needs_custom(choice: &str) -> bool {
        matches!(choice.trim(), "4" | "custom")
    }

    pub fn label(&self) -> &str {
        match self {
            BumpClass::Patch => "patch",
            BumpClass::Minor => "minor",
            BumpClass::Major => "major",
            BumpClass::Custom(_) => "custom",
        }
    }
}

impl fmt::Display for BumpClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BumpClass::Custom(v) => write!(f, "custom ({v})"),
            other => f.write_str(other.label()),
        }
    }
}

pub fn parse_version(value: &str) -> Result<Version> {
    let trimmed = value.trim();
    let trimmed = trimmed.strip_prefix('v').unwrap_or(trimmed);
    Version::parse(trimmed).map_err(|e| SkillkitError::InvalidVersion {
        value: value.to_string(),
        reason: e.to_string(),
    })
}

/// Compute the next version. Pre-release and build metadata are dropped on
/// patch/minor/major; custom versions must be valid semver and differ from
/// the current one.
pub fn bump(current: &str, class: &BumpClass) -> Result<String> {
    let cur = parse_version(current)?;
    let next = match class {
        BumpClass::Patch => Version::new(cur.major, cur.minor, cur.patch + 1),
        BumpClass::Minor => Version::new(cur.major, cur.minor + 1, 0),
        BumpClass::Major => Version::new(cur.major + 1, 0, 0),
        BumpClass::Custom(v) => parse_version(v)?,
    };
    let next = next.to_string();
    if next == current.trim() {
        return Err(SkillkitError::VersionUnchanged(next));
    }
    Ok(next)
}

// ---------------------------------------------------------------------------
// VersionRecord
// ---------------------------------------------------------------------------

/// A JSON manifest that carries a version string at `pointer`.
#[derive(Debug, Clone)]
pub struct VersionedManifest {
    pub path: PathBuf,
    pub pointer: &'static str,
    pub document: Value,
}

impl VersionedManifest {
    pub fn load(path: PathBuf, pointer: &'static str) -> Result<Self> {
        let data = crate::io::read_optional(&path)?
            .ok_or_else(|| SkillkitError::ManifestNotFound(path.display().to_string()))?;
        let document: Value = serde_json::from_str(&data)?;
        Ok(Self {
            path,
            pointer,
            document,
        })
    }

    pub fn version(&self) -> Result<&str> {
        self.document
            .pointer(self.pointer)
            .and_then(Value::as_str)
            .ok_or_else(|| SkillkitError::MissingVersionField {
                path: self.path.display().to_string(),
                pointer: self.pointer.to_string(),
            })
    }

    /// Replace the version in place, leaving every other field untouched.
    pub fn set_version(&mut self, version: &str) -> Result<()> {
        let slot = self.document.pointer_mut(self.pointer).ok_or_else(|| {
            SkillkitError::MissingVersionField {
                path: self.path.display().to_string(),
                pointer: self.pointer.to_string(),
            }
        })?;
        *slot = Value::String(version.to_string());
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        crate::io::write_json_pretty(&self.path, &self.document)
    }
}

#[derive(Debug, Clone)]
pub struct VersionRecord {
    pub plugin: VersionedManifest,
    pub marketplace: VersionedManifest,
}

impl VersionRecord {
    pub fn load(root: &Path, release: &crate::config::ReleaseConfig) -> Result<Self> {
        Ok(Self {
            plugin: VersionedManifest::load(
                paths::resolve(root, &release.plugin_manifest),
                PLUGIN_VERSION_POINTER,
            )?,
            marketplace: VersionedManifest::load(
                paths::resolve(root, &release.marketplace_manifest),
                MARKETPLACE_VERSION_POINTER,
            )?,
        })
    }

    /// The shared version, or a mismatch error carrying both values.
    pub fn synced_version(&self) -> Result<String> {
        let plugin = self.plugin.version()?;
        let marketplace = self.marketplace.version()?;
        if plugin != marketplace {
            return Err(SkillkitError::VersionMismatch {
                plugin: plugin.to_string(),
                marketplace: marketplace.to_string(),
            });
        }
        Ok(plugin.to_string())
    }

    /// Rewrite both manifests. Both documents are updated in memory first so a
    /// missing field in either aborts before any file is touched.
    pub fn write_version(&mut self, version: &str) -> Result<()> {
        self.plugin.set_version(version)?;
        self.marketplace.set_version(version)?;
        self.plugin.save()?;
        self.marketplace.save()?;
        Ok(())
    }

    pub fn paths(&self) -> [&Path; 2] {
        [self.plugin.path.as_path(), self.marketplace.path.as_path()]
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
