//! Bundle inheritance resolution.
//!
//! [`BundleResolver`] turns an on-disk declaration and its `extends`
//! chain into one flattened [`BundleConfig`]. Resolution is a pure
//! recursion over the bundle directory; cycle detection uses an
//! explicit "currently resolving" chain passed down the recursion —
//! there is no shared registry state between calls.

use std::path::PathBuf;

use crate::error::BundleError;

use super::{BundleConfig, BundleDeclaration, BundleSummary, DECLARATION_FILE, parse_declaration};

/// Resolves bundle declarations from a bundle root directory.
#[derive(Debug)]
pub struct BundleResolver {
    bundles_dir: PathBuf,
}

impl BundleResolver {
    /// Create a resolver over the given `bundles/` directory.
    #[must_use]
    pub fn new(bundles_dir: impl Into<PathBuf>) -> Self {
        Self {
            bundles_dir: bundles_dir.into(),
        }
    }

    /// Resolve `name` and its ancestor chain into a flat configuration.
    ///
    /// Composition policy: scalar fields are child-over-parent (only
    /// when the child explicitly sets them), list fields concatenate
    /// parent items first, and `name` is always the resolved bundle's
    /// own identifier.
    ///
    /// # Errors
    ///
    /// - [`BundleError::NotFound`] when no declaration exists for `name`
    /// - [`BundleError::InheritanceCycle`] when the `extends` chain
    ///   revisits a bundle
    /// - [`BundleError::Malformed`] when a descriptor fails to parse
    pub fn resolve(&self, name: &str) -> Result<BundleConfig, BundleError> {
        let mut chain = Vec::new();
        self.resolve_inner(name, &mut chain)
    }

    fn resolve_inner(
        &self,
        name: &str,
        chain: &mut Vec<String>,
    ) -> Result<BundleConfig, BundleError> {
        if chain.iter().any(|seen| seen == name) {
            chain.push(name.to_string());
            return Err(BundleError::InheritanceCycle {
                chain: chain.join(" -> "),
            });
        }
        chain.push(name.to_string());

        let declaration = self.load_declaration(name)?;
        let parent = match declaration.bundle.extends.as_deref() {
            Some(parent_name) => Some(self.resolve_inner(parent_name, chain)?),
            None => None,
        };
        chain.pop();

        Ok(flatten(name, declaration, parent))
    }

    /// Load and parse the declaration for one bundle, without resolving
    /// inheritance.
    ///
    /// # Errors
    ///
    /// Returns [`BundleError::NotFound`] when the descriptor does not
    /// exist and [`BundleError::Malformed`] when it fails to parse.
    pub fn load_declaration(&self, name: &str) -> Result<BundleDeclaration, BundleError> {
        let path = self.declaration_path(name);
        if !path.exists() {
            return Err(BundleError::NotFound(name.to_string()));
        }
        let content = std::fs::read_to_string(&path)
            .map_err(|source| BundleError::Io { path, source })?;
        parse_declaration(&content).map_err(|e| BundleError::Malformed {
            bundle: name.to_string(),
            message: e.to_string(),
        })
    }

    /// Enumerate every bundle declaration under the bundle root as
    /// unresolved summaries, sorted by name.
    ///
    /// Inheritance is not resolved; summaries carry the declared
    /// metadata only.
    ///
    /// # Errors
    ///
    /// Returns [`BundleError::Malformed`] when any discovered descriptor
    /// fails to parse, and [`BundleError::Io`] when the bundle root
    /// cannot be read.
    pub fn list_bundles(&self) -> Result<Vec<BundleSummary>, BundleError> {
        let entries = std::fs::read_dir(&self.bundles_dir).map_err(|source| BundleError::Io {
            path: self.bundles_dir.clone(),
            source,
        })?;

        let mut summaries = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| BundleError::Io {
                path: self.bundles_dir.clone(),
                source,
            })?;
            if !entry.path().join(DECLARATION_FILE).exists() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            let declaration = self.load_declaration(&name)?;
            summaries.push(BundleSummary {
                name,
                description: declaration.bundle.description,
                target: declaration.bundle.target,
                extends: declaration.bundle.extends,
            });
        }

        summaries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(summaries)
    }

    /// Path to the directory holding one bundle's declaration and
    /// override files.
    #[must_use]
    pub fn bundle_dir(&self, name: &str) -> PathBuf {
        self.bundles_dir.join(name)
    }

    fn declaration_path(&self, name: &str) -> PathBuf {
        self.bundle_dir(name).join(DECLARATION_FILE)
    }
}

/// Compose a child declaration over its resolved parent.
///
/// `name` is the identifier of the bundle being resolved; it is never
/// inherited.
fn flatten(name: &str, declaration: BundleDeclaration, parent: Option<BundleConfig>) -> BundleConfig {
    let parent = parent.unwrap_or_else(|| BundleConfig {
        name: String::new(),
        description: None,
        target: None,
        files_include: Vec::new(),
        files_exclude: Vec::new(),
        packages_install: Vec::new(),
        packages_include: true,
    });

    BundleConfig {
        name: name.to_string(),
        description: declaration.bundle.description.or(parent.description),
        target: declaration.bundle.target.or(parent.target),
        files_include: concat(parent.files_include, declaration.files.include),
        files_exclude: concat(parent.files_exclude, declaration.files.exclude),
        packages_install: concat(parent.packages_install, declaration.packages.install),
        packages_include: declaration
            .packages
            .include
            .unwrap_or(parent.packages_include),
    }
}

/// Concatenate parent items first, then child items, preserving each
/// side's internal order. Duplicates are kept.
fn concat(parent: Vec<String>, child: Vec<String>) -> Vec<String> {
    let mut merged = parent;
    merged.extend(child);
    merged
}
