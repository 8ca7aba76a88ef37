//! Bundle declaration parsing and the flattened configuration model.
//!
//! A bundle is declared in `bundles/<name>/bundle.toml`:
//!
//! ```toml
//! [bundle]
//! name = "server"
//! description = "Server configuration"
//! target = "linux"
//! extends = "base"
//!
//! [files]
//! include = [".vimrc"]
//! exclude = [".bin/"]
//!
//! [packages]
//! install = ["tmux"]
//! include = false
//! ```
//!
//! [`BundleDeclaration`] is the raw parsed form of one descriptor;
//! [`BundleConfig`] is the ancestor-resolved flat form produced by
//! [`resolver::BundleResolver::resolve`].

pub mod resolver;

use serde::Deserialize;

/// File name of the per-bundle descriptor.
pub const DECLARATION_FILE: &str = "bundle.toml";

/// Raw parsed form of one bundle's on-disk descriptor, before
/// inheritance resolution.
#[derive(Debug, Clone, Deserialize)]
pub struct BundleDeclaration {
    /// The `[bundle]` section.
    pub bundle: BundleSection,
    /// The `[files]` section; absent means no patterns.
    #[serde(default)]
    pub files: FilesSection,
    /// The `[packages]` section; absent means no packages.
    #[serde(default)]
    pub packages: PackagesSection,
}

/// The `[bundle]` section of a descriptor.
#[derive(Debug, Clone, Deserialize)]
pub struct BundleSection {
    /// Bundle identifier; must match the directory name.
    pub name: String,
    /// Free-text description.
    pub description: Option<String>,
    /// Informational platform tag; not consulted during file selection.
    pub target: Option<String>,
    /// Name of a parent bundle to inherit from.
    pub extends: Option<String>,
}

/// The `[files]` section of a descriptor.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilesSection {
    /// Ordered include patterns.
    #[serde(default)]
    pub include: Vec<String>,
    /// Ordered exclude patterns.
    #[serde(default)]
    pub exclude: Vec<String>,
}

/// The `[packages]` section of a descriptor.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackagesSection {
    /// Ordered package identifiers to install.
    #[serde(default)]
    pub install: Vec<String>,
    /// Whether to generate an install script. `None` means "not
    /// explicitly set", which matters for inheritance: only an explicit
    /// child value overrides the parent.
    pub include: Option<bool>,
}

/// Flattened, ancestor-resolved bundle description.
///
/// Constructed once per [`resolver::BundleResolver::resolve`] call and
/// immutable afterward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleConfig {
    /// Bundle identifier (always the resolved bundle's own name).
    pub name: String,
    /// Description, child-over-parent.
    pub description: Option<String>,
    /// Platform tag, child-over-parent.
    pub target: Option<String>,
    /// Include patterns, parent items first.
    pub files_include: Vec<String>,
    /// Exclude patterns, parent items first.
    pub files_exclude: Vec<String>,
    /// Packages to install, parent items first.
    pub packages_install: Vec<String>,
    /// Whether to generate an install script (default `true`).
    pub packages_include: bool,
}

/// Unresolved bundle summary for catalog listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleSummary {
    /// Bundle identifier.
    pub name: String,
    /// Declared description, if any.
    pub description: Option<String>,
    /// Declared platform tag, if any.
    pub target: Option<String>,
    /// Declared parent bundle, if any.
    pub extends: Option<String>,
}

/// Parse descriptor content into a [`BundleDeclaration`].
///
/// # Errors
///
/// Returns the TOML parser diagnostic when the content does not have
/// the expected shape.
pub fn parse_declaration(content: &str) -> Result<BundleDeclaration, toml::de::Error> {
    toml::from_str(content)
}
