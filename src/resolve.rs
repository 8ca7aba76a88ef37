//! File selection across the two dotfile source roots.
//!
//! The repository carries two trees mirroring the eventual home
//! directory layout: `links/` (the flat root) and `links-in-depth/`
//! (the in-depth root). [`FileResolver`] unifies them into one
//! candidate set — an in-depth entry shadows a flat entry at the same
//! relative path — and selects candidates against a bundle's include
//! and exclude patterns.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::BundleConfig;
use crate::error::BundleError;
use crate::matcher::glob_match;

/// Which source root supplied a resolved file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceType {
    /// The flat `links/` root.
    Links,
    /// The in-depth `links-in-depth/` root (authoritative on collision).
    LinksInDepth,
}

/// One file selected for packaging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFile {
    /// Absolute location in one of the two source roots.
    pub source_path: PathBuf,
    /// Path relative to the dotfiles root; selection key and archive
    /// member name. Always forward-slash separated.
    pub relative_path: String,
    /// Root that supplied this file.
    pub source_type: SourceType,
}

/// Resolves a flattened bundle configuration into a deduplicated,
/// deterministically ordered file list.
#[derive(Debug)]
pub struct FileResolver {
    links_dir: PathBuf,
    links_in_depth_dir: PathBuf,
}

impl FileResolver {
    /// Create a resolver over the two source roots.
    #[must_use]
    pub fn new(links_dir: impl Into<PathBuf>, links_in_depth_dir: impl Into<PathBuf>) -> Self {
        Self {
            links_dir: links_dir.into(),
            links_in_depth_dir: links_in_depth_dir.into(),
        }
    }

    /// Select every candidate file matched by at least one include
    /// pattern and no exclude pattern.
    ///
    /// The result is ordered by relative path ascending and contains
    /// each relative path at most once, so repeated calls against an
    /// unchanged tree return identical lists.
    ///
    /// # Errors
    ///
    /// Returns [`BundleError::SourceUnavailable`] when either source
    /// root cannot be enumerated.
    pub fn resolve_bundle(&self, config: &BundleConfig) -> Result<Vec<ResolvedFile>, BundleError> {
        let mut candidates: BTreeMap<String, (PathBuf, SourceType)> = BTreeMap::new();
        collect_root(&self.links_dir, SourceType::Links, &mut candidates)?;
        // Inserted second: the in-depth root wins on a shared relative path.
        collect_root(
            &self.links_in_depth_dir,
            SourceType::LinksInDepth,
            &mut candidates,
        )?;

        Ok(candidates
            .into_iter()
            .filter(|(relative_path, _)| selected(config, relative_path))
            .map(|(relative_path, (source_path, source_type))| ResolvedFile {
                source_path,
                relative_path,
                source_type,
            })
            .collect())
    }
}

/// Selection test: at least one include pattern matches and no exclude
/// pattern does. `target` is never consulted; platform scoping happens
/// through platform-scoped include patterns.
fn selected(config: &BundleConfig, relative_path: &str) -> bool {
    config
        .files_include
        .iter()
        .any(|pattern| glob_match(pattern, relative_path))
        && !config
            .files_exclude
            .iter()
            .any(|pattern| glob_match(pattern, relative_path))
}

/// Enumerate every file under `root` into the candidate map, keyed by
/// forward-slash relative path.
fn collect_root(
    root: &Path,
    source_type: SourceType,
    candidates: &mut BTreeMap<String, (PathBuf, SourceType)>,
) -> Result<(), BundleError> {
    for entry in WalkDir::new(root).follow_links(false) {
        let entry = entry.map_err(|source| BundleError::SourceUnavailable {
            path: root.to_path_buf(),
            source: source.into(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(root)
            .map_err(|source| BundleError::SourceUnavailable {
                path: root.to_path_buf(),
                source: source.into(),
            })?;
        let relative_path = to_forward_slashes(relative);
        candidates.insert(relative_path, (entry.path().to_path_buf(), source_type));
    }
    Ok(())
}

/// Render a relative path with `/` separators regardless of host
/// conventions.
fn to_forward_slashes(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
