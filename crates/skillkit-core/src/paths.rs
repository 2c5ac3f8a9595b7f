use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const SKILLKIT_DIR: &str = ".skillkit";
pub const CONFIG_FILE: &str = ".skillkit/config.yaml";
pub const DEFAULT_STATE_FILE: &str = ".skillkit/preset.json";

pub const DEFAULT_PLUGIN_MANIFEST: &str = ".claude-plugin/plugin.json";
pub const DEFAULT_MARKETPLACE_MANIFEST: &str = ".claude-plugin/marketplace.json";

/// Directories never descended into while scanning for dependency manifests.
pub const SKIPPED_DIRS: &[&str] = &[".git", "target", "node_modules"];

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

/// Resolve a configured path relative to the project root. Absolute paths pass through.
pub fn resolve(root: &Path, configured: &str) -> PathBuf {
    let p = Path::new(configured);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        root.join(p)
    }
}

/// Render `path` relative to `root` when possible, for messages and commit lists.
pub fn display_relative(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_helpers() {
        let root = Path::new("/tmp/proj");
        assert_eq!(
            config_path(root),
            PathBuf::from("/tmp/proj/.skillkit/config.yaml")
        );
        assert_eq!(
            resolve(root, DEFAULT_PLUGIN_MANIFEST),
            PathBuf::from("/tmp/proj/.claude-plugin/plugin.json")
        );
        assert_eq!(resolve(root, "/etc/x.json"), PathBuf::from("/etc/x.json"));
    }

    #[test]
    fn display_relative_strips_root() {
        let root = Path::new("/tmp/proj");
        assert_eq!(
            display_relative(root, Path::new("/tmp/proj/.claude-plugin/plugin.json")),
            ".claude-plugin/plugin.json"
        );
        assert_eq!(display_relative(root, Path::new("/other/a")), "/other/a");
    }
}
