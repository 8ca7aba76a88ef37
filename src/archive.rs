//! Archive assembly: turn resolved files into a gzip-compressed tar.
//!
//! Headers are canonical (mtime 0, uid/gid 0, modes normalized to
//! `0o644`/`0o755`) so that rebuilding an unchanged bundle yields a
//! byte-for-byte identical archive. Member paths always use forward
//! slashes. The archive is assembled in memory and persisted
//! atomically; no partial archive is left behind on failure.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use flate2::Compression;
use flate2::write::GzEncoder;
use tar::Header;
use walkdir::WalkDir;

use crate::config::BundleConfig;
use crate::overrides::OverrideManager;
use crate::resolve::ResolvedFile;

/// Archive member name of the generated install script.
pub const INSTALL_SCRIPT_NAME: &str = "install-packages.sh";

/// Archive member name of the generated README.
pub const README_NAME: &str = "README.md";

/// Archive member directory holding the shared utility scripts.
pub const UTIL_DIR_NAME: &str = "util";

/// Builds the final bundle archive for one resolved configuration.
#[derive(Debug)]
pub struct PackageBuilder<'a> {
    bundle_name: &'a str,
    config: &'a BundleConfig,
    overrides: OverrideManager,
    util_dir: PathBuf,
}

impl<'a> PackageBuilder<'a> {
    /// Create a builder for `bundle_name`.
    ///
    /// `bundles_dir` is consulted for override files; `util_dir` is the
    /// shared utility-script directory copied verbatim into every
    /// archive.
    #[must_use]
    pub fn new(
        bundle_name: &'a str,
        config: &'a BundleConfig,
        bundles_dir: impl Into<PathBuf>,
        util_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            bundle_name,
            config,
            overrides: OverrideManager::new(bundles_dir),
            util_dir: util_dir.into(),
        }
    }

    /// Assemble the archive and write it to `output_path`.
    ///
    /// Member order: selected dotfiles (with overrides applied), then
    /// the generated install script when `packages.include` is set and
    /// the package list is non-empty, then the generated README, then
    /// the utility scripts. The write is atomic: the gzip stream is
    /// persisted to the final path only after it is fully assembled.
    ///
    /// # Errors
    ///
    /// Returns an error when a source or override file cannot be read,
    /// or the archive cannot be written.
    pub fn build(&self, files: &[ResolvedFile], output_path: &Path) -> Result<PathBuf> {
        let mut builder = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::default()));
        let mut total_bytes = 0u64;

        for file in files {
            let content = self.read_with_overrides(file)?;
            total_bytes += content.len() as u64;
            let mode = file_mode(&file.source_path);
            append_member(&mut builder, &file.relative_path, &content, mode)?;
        }

        if self.config.packages_include && !self.config.packages_install.is_empty() {
            let script = install_script(self.bundle_name, &self.config.packages_install);
            append_member(&mut builder, INSTALL_SCRIPT_NAME, script.as_bytes(), 0o755)?;
        }

        let readme = readme(self.config, files.len(), total_bytes);
        append_member(&mut builder, README_NAME, readme.as_bytes(), 0o644)?;

        self.append_util_dir(&mut builder)?;

        let encoder = builder
            .into_inner()
            .context("finalizing archive stream")?;
        let compressed = encoder.finish().context("finalizing gzip stream")?;

        persist(&compressed, output_path)?;
        Ok(output_path.to_path_buf())
    }

    /// Read one resolved file and apply its overrides in order (public
    /// first, then private).
    fn read_with_overrides(&self, file: &ResolvedFile) -> Result<Vec<u8>> {
        let mut content = std::fs::read(&file.source_path)
            .with_context(|| format!("reading source file {}", file.source_path.display()))?;
        for item in self
            .overrides
            .find_overrides(self.bundle_name, &file.relative_path)
        {
            tracing::debug!("applying override {} to {}", item.name, file.relative_path);
            content = self
                .overrides
                .apply_override(&content, &item.path, &file.relative_path)?;
        }
        Ok(content)
    }

    /// Copy every file under the utility directory into the archive
    /// unmodified, under `util/`.
    fn append_util_dir<W: std::io::Write>(&self, builder: &mut tar::Builder<W>) -> Result<()> {
        for entry in WalkDir::new(&self.util_dir).follow_links(false).sort_by_file_name() {
            let entry = entry
                .with_context(|| format!("reading util directory {}", self.util_dir.display()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = entry
                .path()
                .strip_prefix(&self.util_dir)
                .context("util entry outside util directory")?;
            let member = format!("{UTIL_DIR_NAME}/{}", forward_slashes(relative));
            let content = std::fs::read(entry.path())
                .with_context(|| format!("reading util script {}", entry.path().display()))?;
            append_member(builder, &member, &content, 0o755)?;
        }
        Ok(())
    }
}

/// Append one member with a canonical GNU header.
fn append_member<W: std::io::Write>(
    builder: &mut tar::Builder<W>,
    member_path: &str,
    content: &[u8],
    mode: u32,
) -> Result<()> {
    let mut header = Header::new_gnu();
    header
        .set_path(member_path)
        .with_context(|| format!("setting archive path {member_path}"))?;
    header.set_size(content.len() as u64);
    header.set_mtime(0);
    header.set_uid(0);
    header.set_gid(0);
    header.set_mode(mode);
    header.set_cksum();
    builder
        .append(&header, content)
        .with_context(|| format!("appending archive member {member_path}"))?;
    Ok(())
}

/// Normalized mode for a source file: `0o755` when the executable bit
/// is set, `0o644` otherwise.
fn file_mode(path: &Path) -> u32 {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt as _;
        if let Ok(metadata) = std::fs::metadata(path)
            && metadata.permissions().mode() & 0o111 != 0
        {
            return 0o755;
        }
    }
    #[cfg(not(unix))]
    {
        let _ = path;
    }
    0o644
}

/// Write the assembled bytes to `output_path` atomically via a
/// temporary file in the same directory.
fn persist(compressed: &[u8], output_path: &Path) -> Result<()> {
    let parent = output_path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(parent)
        .with_context(|| format!("creating output directory {}", parent.display()))?;
    let mut tmp = tempfile::NamedTempFile::new_in(parent)
        .with_context(|| format!("creating temporary archive in {}", parent.display()))?;
    std::io::Write::write_all(&mut tmp, compressed).context("writing archive bytes")?;
    tmp.persist(output_path)
        .with_context(|| format!("persisting archive to {}", output_path.display()))?;
    Ok(())
}

/// Render a relative path with `/` separators.
fn forward_slashes(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Generate the package install script for the archive.
fn install_script(bundle_name: &str, packages: &[String]) -> String {
    format!(
        "#!/bin/sh\n\
         # Install the packages declared by the '{bundle_name}' bundle.\n\
         set -eu\n\
         \n\
         . ./{UTIL_DIR_NAME}/detect_os.sh\n\
         . ./{UTIL_DIR_NAME}/common.sh\n\
         \n\
         install_packages {}\n",
        packages.join(" ")
    )
}

/// Generate the archive README summarizing bundle metadata.
fn readme(config: &BundleConfig, file_count: usize, total_bytes: u64) -> String {
    let mut out = format!("# Dotfiles bundle: {}\n\n", config.name);
    if let Some(description) = &config.description {
        out.push_str(description);
        out.push_str("\n\n");
    }
    if let Some(target) = &config.target {
        out.push_str(&format!("- Target: {target}\n"));
    }
    out.push_str(&format!(
        "- Files: {file_count} ({})\n",
        format_size(total_bytes)
    ));
    if config.packages_include && !config.packages_install.is_empty() {
        out.push_str(&format!(
            "- Packages: {} (run ./{INSTALL_SCRIPT_NAME})\n",
            config.packages_install.join(", ")
        ));
    }
    out.push_str("\nGenerated by dotfiles-bundle.\n");
    out
}

/// Render a byte count with binary (1024-based) units and one decimal
/// place.
///
/// # Examples
///
/// ```
/// use dotfiles_bundle_cli::archive::format_size;
///
/// assert_eq!(format_size(0), "0.0B");
/// assert_eq!(format_size(1024), "1.0KB");
/// assert_eq!(format_size(1536), "1.5KB");
/// ```
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{size:.1}{}", UNITS[unit])
}
