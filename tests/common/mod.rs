// Shared helpers for integration tests.
//
// Provides a temporary-directory-backed dotfiles repository and a fluent
// builder so each integration test can set up an isolated environment
// without repeating filesystem boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::collections::BTreeMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;

/// Create the directory skeleton a bundle-enabled dotfiles repository
/// needs in `root`.
///
/// Creates:
/// - `bundles/`          — bundle declarations and overrides
/// - `links/`            — flat dotfile source tree
/// - `links-in-depth/`   — in-depth dotfile source tree
/// - `util/`             — shared shell helpers, seeded with two scripts
/// - `dist/`             — default archive output directory
pub fn setup_minimal_repo(root: &Path) {
    for dir in &["bundles", "links", "links-in-depth", "util", "dist"] {
        std::fs::create_dir_all(root.join(dir)).expect("create repo dir");
    }

    std::fs::write(
        root.join("util").join("detect_os.sh"),
        "detect_os() { uname -s; }\n",
    )
    .expect("write detect_os.sh");
    std::fs::write(
        root.join("util").join("common.sh"),
        "install_packages() { echo \"$@\"; }\n",
    )
    .expect("write common.sh");
}

/// An isolated test repository backed by a [`tempfile::TempDir`].
///
/// The directory is automatically deleted when dropped (via the underlying
/// [`tempfile::TempDir`]).
pub struct IntegrationTestContext {
    /// Temporary directory containing the test dotfiles repository.
    pub root: tempfile::TempDir,
}

impl IntegrationTestContext {
    /// Create a new context with a minimal but valid repository structure.
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("create temp dir");
        setup_minimal_repo(root.path());
        Self { root }
    }

    /// Path to the repository root.
    pub fn root_path(&self) -> &Path {
        self.root.path()
    }

    /// Default archive output path for a bundle.
    pub fn dist_path(&self, bundle_name: &str) -> PathBuf {
        self.root
            .path()
            .join("dist")
            .join(format!("{bundle_name}.tar.gz"))
    }
}

/// Fluent builder for [`IntegrationTestContext`].
///
/// Allows individual tests to customise the repository before the context
/// is finalised without modifying the shared setup.
pub struct TestContextBuilder {
    ctx: IntegrationTestContext,
}

impl TestContextBuilder {
    /// Begin building a new context backed by a minimal repository.
    pub fn new() -> Self {
        Self {
            ctx: IntegrationTestContext::new(),
        }
    }

    /// Write `bundles/<name>/bundle.toml` with the given declaration.
    pub fn with_bundle(self, name: &str, declaration: &str) -> Self {
        let dir = self.ctx.root.path().join("bundles").join(name);
        std::fs::create_dir_all(&dir).expect("create bundle dir");
        std::fs::write(dir.join("bundle.toml"), declaration).expect("write bundle.toml");
        self
    }

    /// Create a dotfile in the flat `links/` source tree.
    pub fn with_link(self, relative: &str, content: &str) -> Self {
        write_under(&self.ctx.root.path().join("links"), relative, content);
        self
    }

    /// Create a dotfile in the `links-in-depth/` source tree.
    pub fn with_in_depth_link(self, relative: &str, content: &str) -> Self {
        write_under(
            &self.ctx.root.path().join("links-in-depth"),
            relative,
            content,
        );
        self
    }

    /// Create an override file under `bundles/<bundle>/`.
    ///
    /// Pass a `relative` path ending in `.private` for a private override.
    pub fn with_override(self, bundle: &str, relative: &str, content: &str) -> Self {
        write_under(
            &self.ctx.root.path().join("bundles").join(bundle),
            relative,
            content,
        );
        self
    }

    /// Finish building and return the configured context.
    pub fn build(self) -> IntegrationTestContext {
        self.ctx
    }
}

fn write_under(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent dir");
    }
    std::fs::write(&path, content).expect("write file");
}

/// Unpack a built archive into a map of member path to content bytes.
pub fn read_archive(path: &Path) -> BTreeMap<String, Vec<u8>> {
    let file = std::fs::File::open(path).expect("open archive");
    let mut archive = tar::Archive::new(GzDecoder::new(file));
    let mut members = BTreeMap::new();
    for entry in archive.entries().expect("read archive entries") {
        let mut entry = entry.expect("read archive entry");
        let name = entry
            .path()
            .expect("member path")
            .to_string_lossy()
            .into_owned();
        let mut content = Vec::new();
        entry.read_to_end(&mut content).expect("read member");
        members.insert(name, content);
    }
    members
}
