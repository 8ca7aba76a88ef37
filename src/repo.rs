//! Dotfiles repository layout and root discovery.
//!
//! A bundle-enabled dotfiles repository has this shape:
//!
//! ```text
//! <root>/
//! ├── bundles/          one directory per bundle (bundle.toml + overrides)
//! ├── links/            flat dotfile source tree
//! ├── links-in-depth/   in-depth dotfile source tree
//! ├── util/             shared shell helpers copied into every archive
//! └── dist/             default archive output directory
//! ```

use std::path::{Path, PathBuf};

use anyhow::Result;

/// Resolved repository layout paths.
#[derive(Debug, Clone)]
pub struct Repo {
    root: PathBuf,
}

impl Repo {
    /// Wrap an explicit repository root.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve the repository root from CLI arguments or auto-detection.
    ///
    /// Order: `--root` argument, `DOTFILES_ROOT` environment variable,
    /// then the current directory when it contains `bundles/`.
    ///
    /// # Errors
    ///
    /// Returns an error when no candidate looks like a bundle-enabled
    /// dotfiles repository.
    pub fn discover(root_arg: Option<&Path>) -> Result<Self> {
        if let Some(root) = root_arg {
            return Ok(Self::new(root));
        }

        if let Ok(root) = std::env::var("DOTFILES_ROOT") {
            return Ok(Self::new(PathBuf::from(root)));
        }

        let cwd = std::env::current_dir()?;
        if cwd.join("bundles").is_dir() {
            return Ok(Self::new(cwd));
        }

        anyhow::bail!("cannot determine dotfiles root. Use --root or set DOTFILES_ROOT")
    }

    /// The repository root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding bundle declarations and overrides.
    #[must_use]
    pub fn bundles_dir(&self) -> PathBuf {
        self.root.join("bundles")
    }

    /// The flat dotfile source root.
    #[must_use]
    pub fn links_dir(&self) -> PathBuf {
        self.root.join("links")
    }

    /// The in-depth dotfile source root.
    #[must_use]
    pub fn links_in_depth_dir(&self) -> PathBuf {
        self.root.join("links-in-depth")
    }

    /// Directory of shared utility scripts.
    #[must_use]
    pub fn util_dir(&self) -> PathBuf {
        self.root.join("util")
    }

    /// Default archive output path for a bundle.
    #[must_use]
    pub fn default_output(&self, bundle_name: &str) -> PathBuf {
        self.root.join("dist").join(format!("{bundle_name}.tar.gz"))
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn explicit_root_wins() {
        let repo = Repo::discover(Some(Path::new("/tmp/dotfiles"))).unwrap();
        assert_eq!(repo.root(), Path::new("/tmp/dotfiles"));
    }

    #[test]
    fn layout_paths_derive_from_root() {
        let repo = Repo::new("/repo");
        assert_eq!(repo.bundles_dir(), Path::new("/repo/bundles"));
        assert_eq!(repo.links_dir(), Path::new("/repo/links"));
        assert_eq!(repo.links_in_depth_dir(), Path::new("/repo/links-in-depth"));
        assert_eq!(repo.util_dir(), Path::new("/repo/util"));
        assert_eq!(
            repo.default_output("server"),
            Path::new("/repo/dist/server.tar.gz")
        );
    }
}
