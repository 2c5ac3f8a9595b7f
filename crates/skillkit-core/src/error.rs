use thiserror::Error;

#[derive(Debug, Error)]
pub enum SkillkitError {
    #[error(
        "version mismatch: plugin manifest has '{plugin}' but marketplace manifest has '{marketplace}'"
    )]
    VersionMismatch { plugin: String, marketplace: String },

    #[error("manifest not found: {0}")]
    ManifestNotFound(String),

    #[error("manifest {path} has no version at '{pointer}'")]
    MissingVersionField { path: String, pointer: String },

    #[error("invalid version '{value}': {reason}")]
    InvalidVersion { value: String, reason: String },

    #[error("new version '{0}' is the same as the current version")]
    VersionUnchanged(String),

    #[error("invalid selection '{0}': expected 1-4 (patch, minor, major, custom)")]
    InvalidSelection(String),

    #[error("custom version must not be empty")]
    EmptyCustomVersion,

    #[error("unknown preset '{0}': expected one of devnet, testnet, mainnet")]
    UnknownPreset(String),

    #[error("tag already exists: {0}")]
    TagExists(String),

    #[error("not a git work tree: {0} (clone the repository first, then re-run)")]
    NotARepository(String),

    #[error("branch '{branch}' not found locally or on '{remote}'; available: {}", available.join(", "))]
    BranchNotFound {
        branch: String,
        remote: String,
        available: Vec<String>,
    },

    #[error("git {args} failed: {stderr}")]
    GitFailed { args: String, stderr: String },

    #[error("git is not installed or not on PATH")]
    GitNotInstalled,

    #[error("invalid detection rule pattern '{pattern}': {reason}")]
    InvalidRule { pattern: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SkillkitError>;
