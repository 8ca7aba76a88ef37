use anyhow::Result;

use crate::cli::GlobalOpts;
use crate::config::resolver::BundleResolver;
use crate::logging::Logger;
use crate::repo::Repo;

/// Run the list command: print the bundle catalog, sorted by name.
///
/// Listing shows declared metadata only; inheritance is not resolved.
///
/// # Errors
///
/// Returns an error if root discovery fails or any discovered
/// declaration is malformed.
pub fn run(global: &GlobalOpts, log: &Logger) -> Result<()> {
    let repo = Repo::discover(global.root.as_deref())?;
    let bundles = BundleResolver::new(repo.bundles_dir()).list_bundles()?;

    if bundles.is_empty() {
        log.info("no bundles found");
        return Ok(());
    }

    log.stage(&format!("{} bundles", bundles.len()));
    for bundle in bundles {
        let mut line = bundle.name.clone();
        if let Some(target) = &bundle.target {
            line.push_str(&format!(" [{target}]"));
        }
        if let Some(parent) = &bundle.extends {
            line.push_str(&format!(" (extends {parent})"));
        }
        if let Some(description) = &bundle.description {
            line.push_str(&format!(": {description}"));
        }
        log.info(&line);
    }
    Ok(())
}
