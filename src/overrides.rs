//! Per-bundle override lookup and application.
//!
//! A bundle directory may carry override files alongside its
//! declaration, mirroring the relative path of the dotfile they
//! replace. Two variants exist per path: a public override under the
//! plain name (tracked in version control) and a private override
//! with a reserved `.private` suffix (expected to be gitignored);
//! both are treated identically otherwise, with the private layer
//! applied last.
//!
//! Structured formats are merged rather than replaced: the set of
//! mergeable formats is the closed [`MergeFormat`] enumeration, so new
//! formats are added as members rather than inferred at runtime.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use serde_json::Value;

use crate::merge::deep_merge;

/// Reserved file-name suffix marking a private override.
pub const PRIVATE_SUFFIX: &str = ".private";

/// An override artifact found for a bundle and target relative path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Override {
    /// Absolute location inside the bundle directory.
    pub path: PathBuf,
    /// File name, possibly carrying the privacy suffix.
    pub name: String,
}

/// Structured formats that are deep-merged instead of replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeFormat {
    /// JSON documents (`.json`).
    Json,
}

impl MergeFormat {
    /// Look up the merge format implied by a relative path's extension.
    ///
    /// Returns `None` for every format outside the closed set; those
    /// overrides replace the base content wholesale.
    #[must_use]
    pub fn from_relative_path(relative_path: &str) -> Option<Self> {
        match Path::new(relative_path).extension().and_then(|e| e.to_str()) {
            Some("json") => Some(Self::Json),
            _ => None,
        }
    }
}

/// Locates and applies bundle-local override content.
#[derive(Debug)]
pub struct OverrideManager {
    bundles_dir: PathBuf,
}

impl OverrideManager {
    /// Create a manager over the given `bundles/` directory.
    #[must_use]
    pub fn new(bundles_dir: impl Into<PathBuf>) -> Self {
        Self {
            bundles_dir: bundles_dir.into(),
        }
    }

    /// Find the overrides a bundle supplies for one relative path.
    ///
    /// Returns zero, one, or two entries: the public override first,
    /// then the private one. Callers apply them in that order so the
    /// private layer lands on top.
    #[must_use]
    pub fn find_overrides(&self, bundle_name: &str, relative_path: &str) -> Vec<Override> {
        let bundle_dir = self.bundles_dir.join(bundle_name);
        [
            bundle_dir.join(relative_path),
            bundle_dir.join(format!("{relative_path}{PRIVATE_SUFFIX}")),
        ]
        .into_iter()
        .filter(|candidate| candidate.is_file())
        .map(|path| {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            Override { path, name }
        })
        .collect()
    }

    /// Apply one override to `base_content`, returning the final bytes.
    ///
    /// When `relative_path` implies a mergeable structured format and
    /// both sides parse as mappings, the override is deep-merged over
    /// the base. Anything else (other extensions, unparseable content,
    /// non-mapping documents) degrades to full replacement: the
    /// override's bytes win verbatim.
    ///
    /// # Errors
    ///
    /// Fails only when the override file itself cannot be read.
    pub fn apply_override(
        &self,
        base_content: &[u8],
        override_path: &Path,
        relative_path: &str,
    ) -> Result<Vec<u8>> {
        let override_content = std::fs::read(override_path)
            .with_context(|| format!("reading override {}", override_path.display()))?;

        match MergeFormat::from_relative_path(relative_path) {
            Some(MergeFormat::Json) => {
                Ok(merge_json(base_content, &override_content).unwrap_or_else(|| {
                    tracing::warn!(
                        "override {} is not a mergeable JSON object, replacing content",
                        override_path.display()
                    );
                    override_content
                }))
            }
            None => Ok(override_content),
        }
    }
}

/// Deep-merge two JSON documents when both are objects.
///
/// Returns `None` when either side fails to parse as a JSON object,
/// signalling the replacement fallback.
fn merge_json(base: &[u8], override_content: &[u8]) -> Option<Vec<u8>> {
    let base_value: Value = serde_json::from_slice(base).ok()?;
    let override_value: Value = serde_json::from_slice(override_content).ok()?;
    let (Value::Object(base_map), Value::Object(override_map)) = (base_value, override_value)
    else {
        return None;
    };
    let merged = Value::Object(deep_merge(&base_map, &override_map));
    serde_json::to_vec_pretty(&merged).ok()
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn write_override(bundles_dir: &Path, bundle: &str, relative: &str, content: &str) -> PathBuf {
        let path = bundles_dir.join(bundle).join(relative);
        std::fs::create_dir_all(path.parent().expect("override has a parent"))
            .expect("create override parent");
        std::fs::write(&path, content).expect("write override");
        path
    }

    #[test]
    fn finds_public_override() {
        let dir = tempfile::tempdir().unwrap();
        write_override(dir.path(), "server", ".gitconfig", "[user]\nemail = work@example.com");

        let manager = OverrideManager::new(dir.path());
        let overrides = manager.find_overrides("server", ".gitconfig");
        assert_eq!(overrides.len(), 1);
        assert_eq!(overrides[0].name, ".gitconfig");
    }

    #[test]
    fn finds_private_override() {
        let dir = tempfile::tempdir().unwrap();
        write_override(dir.path(), "server", ".gitconfig.private", "[user]\ntoken = secret");

        let manager = OverrideManager::new(dir.path());
        let overrides = manager.find_overrides("server", ".gitconfig");
        assert_eq!(overrides.len(), 1);
        assert_eq!(overrides[0].name, ".gitconfig.private");
    }

    #[test]
    fn finds_both_public_before_private() {
        let dir = tempfile::tempdir().unwrap();
        write_override(dir.path(), "server", ".gitconfig", "[user]\nemail = work@example.com");
        write_override(dir.path(), "server", ".gitconfig.private", "[user]\ntoken = secret");

        let manager = OverrideManager::new(dir.path());
        let overrides = manager.find_overrides("server", ".gitconfig");
        assert_eq!(overrides.len(), 2);
        assert_eq!(overrides[0].name, ".gitconfig");
        assert_eq!(overrides[1].name, ".gitconfig.private");
    }

    #[test]
    fn finds_override_for_nested_relative_path() {
        let dir = tempfile::tempdir().unwrap();
        write_override(dir.path(), "server", ".config/app/settings.json", "{}");

        let manager = OverrideManager::new(dir.path());
        let overrides = manager.find_overrides("server", ".config/app/settings.json");
        assert_eq!(overrides.len(), 1);
        assert_eq!(overrides[0].name, "settings.json");
    }

    #[test]
    fn no_overrides_for_unrelated_bundle() {
        let dir = tempfile::tempdir().unwrap();
        write_override(dir.path(), "server", ".gitconfig", "x");

        let manager = OverrideManager::new(dir.path());
        assert!(manager.find_overrides("laptop", ".gitconfig").is_empty());
    }

    #[test]
    fn non_structured_override_replaces_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_override(dir.path(), "server", ".zshrc", "override content");

        let manager = OverrideManager::new(dir.path());
        let result = manager
            .apply_override(b"original content", &path, ".zshrc")
            .unwrap();
        assert_eq!(result, b"override content");
    }

    #[test]
    fn json_override_is_deep_merged() {
        let dir = tempfile::tempdir().unwrap();
        let base = serde_json::to_vec(&json!({"user": {"name": "John"}, "theme": "dark"})).unwrap();
        let path = write_override(
            dir.path(),
            "server",
            "config.json",
            &json!({"user": {"email": "john@work.com"}}).to_string(),
        );

        let manager = OverrideManager::new(dir.path());
        let result = manager.apply_override(&base, &path, "config.json").unwrap();

        let merged: Value = serde_json::from_slice(&result).unwrap();
        assert_eq!(
            merged,
            json!({"user": {"name": "John", "email": "john@work.com"}, "theme": "dark"})
        );
    }

    #[test]
    fn unparseable_json_override_degrades_to_replacement() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_override(dir.path(), "server", "config.json", "not json at all {");

        let manager = OverrideManager::new(dir.path());
        let result = manager
            .apply_override(br#"{"keep": true}"#, &path, "config.json")
            .unwrap();
        assert_eq!(result, b"not json at all {");
    }

    #[test]
    fn unparseable_json_base_degrades_to_replacement() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_override(dir.path(), "server", "config.json", r#"{"a": 1}"#);

        let manager = OverrideManager::new(dir.path());
        let result = manager
            .apply_override(b"# not json", &path, "config.json")
            .unwrap();
        assert_eq!(result, br#"{"a": 1}"#);
    }

    #[test]
    fn non_object_json_degrades_to_replacement() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_override(dir.path(), "server", "config.json", "[1, 2, 3]");

        let manager = OverrideManager::new(dir.path());
        let result = manager
            .apply_override(br#"{"keep": true}"#, &path, "config.json")
            .unwrap();
        assert_eq!(result, b"[1, 2, 3]");
    }

    #[test]
    fn merge_format_is_a_closed_set() {
        assert_eq!(
            MergeFormat::from_relative_path("settings.json"),
            Some(MergeFormat::Json)
        );
        assert_eq!(MergeFormat::from_relative_path(".zshrc"), None);
        assert_eq!(MergeFormat::from_relative_path("notes.txt"), None);
        assert_eq!(MergeFormat::from_relative_path("config.toml"), None);
    }

    #[test]
    fn private_layer_is_applied_last() {
        let dir = tempfile::tempdir().unwrap();
        let public = write_override(
            dir.path(),
            "server",
            "config.json",
            &json!({"email": "work@example.com", "theme": "dark"}).to_string(),
        );
        let private = write_override(
            dir.path(),
            "server",
            &format!("config.json{PRIVATE_SUFFIX}"),
            &json!({"token": "secret", "theme": "light"}).to_string(),
        );

        let manager = OverrideManager::new(dir.path());
        let base = serde_json::to_vec(&json!({"name": "John"})).unwrap();

        let mut content = base;
        for ov in manager.find_overrides("server", "config.json") {
            content = manager.apply_override(&content, &ov.path, "config.json").unwrap();
        }

        let merged: Value = serde_json::from_slice(&content).unwrap();
        assert_eq!(
            merged,
            json!({
                "name": "John",
                "email": "work@example.com",
                "theme": "light",
                "token": "secret",
            })
        );
        assert!(public.exists());
        assert!(private.exists());
    }
}
