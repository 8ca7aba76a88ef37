use anyhow::Result;

use crate::archive::{PackageBuilder, format_size};
use crate::cli::{BuildOpts, GlobalOpts};
use crate::config::resolver::BundleResolver;
use crate::logging::Logger;
use crate::repo::Repo;
use crate::resolve::FileResolver;

/// Run the build command.
///
/// Resolves the requested bundle's configuration and file set, then
/// assembles the archive at the requested (or default) output path.
///
/// # Errors
///
/// Returns an error if root discovery, bundle resolution, file
/// resolution, or archive assembly fails.
pub fn run(global: &GlobalOpts, opts: &BuildOpts, log: &Logger) -> Result<()> {
    let repo = Repo::discover(global.root.as_deref())?;

    log.stage(&format!("Resolving bundle '{}'", opts.bundle));
    let resolver = BundleResolver::new(repo.bundles_dir());
    let config = resolver.resolve(&opts.bundle)?;
    if let Some(description) = &config.description {
        log.info(description);
    }
    log.debug(&format!(
        "{} include patterns, {} exclude patterns",
        config.files_include.len(),
        config.files_exclude.len()
    ));

    log.stage("Resolving files");
    let file_resolver = FileResolver::new(repo.links_dir(), repo.links_in_depth_dir());
    let files = file_resolver.resolve_bundle(&config)?;
    log.info(&format!("{} files selected", files.len()));

    log.stage("Building archive");
    let output = opts
        .output
        .clone()
        .unwrap_or_else(|| repo.default_output(&opts.bundle));
    let builder = PackageBuilder::new(&opts.bundle, &config, repo.bundles_dir(), repo.util_dir());
    let written = builder.build(&files, &output)?;

    let archive_size = std::fs::metadata(&written).map_or(0, |m| m.len());
    log.info(&format!(
        "wrote {} ({} files, {})",
        written.display(),
        files.len(),
        format_size(archive_size)
    ));
    Ok(())
}
