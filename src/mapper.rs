//! Turning declared metadata into a [`ModDescriptor`].

use anyhow::{bail, Result};
use mod_metadata::ModDependency;

use crate::descriptor::{ModDescriptor, Side, CODE_KIND};
use crate::extract::ModMetadataSource;
use crate::{ExtractionOptions, VersionMode};

/// Build the descriptor for `source` according to `options`.
///
/// The declared side is parsed first. A mod is never reported as required
/// on a side it does not run on, whatever its author declared.
pub fn map(source: &ModMetadataSource, options: &ExtractionOptions) -> Result<ModDescriptor> {
    let info = &source.info;
    log::info!("parsing mod side: {}", info.side);
    let side: Side = info.side.parse()?;

    let version = resolve_version(source, options.version_mode)?;

    let network_version = info
        .network_version
        .clone()
        .filter(|version| !version.is_empty());

    let dependencies = dedup_dependencies(&source.dependencies);
    log::info!("dependencies found: {}", dependencies.len());

    Ok(ModDescriptor {
        schema: options.schema_url.clone(),
        kind: CODE_KIND.to_owned(),
        name: info.name.clone(),
        mod_id: info.mod_id.clone(),
        side,
        description: info.description.clone(),
        version,
        website: info.website.clone(),
        authors: info.authors.clone(),
        contributors: info.contributors.clone(),
        required_on_client: Some(info.required_on_client && side != Side::Server),
        required_on_server: Some(info.required_on_server && side != Side::Client),
        network_version,
        dependencies,
    })
}

fn resolve_version(source: &ModMetadataSource, mode: VersionMode) -> Result<String> {
    log::info!(
        "resolving version for mod `{}` from {mode}",
        source.info.mod_id
    );
    match mode {
        VersionMode::Static => Ok(source.info.version.clone()),
        VersionMode::FromBinary => match &source.product_version {
            Some(version) => Ok(version.clone()),
            None => bail!(
                "`{}` does not carry a `version` section to take the version from",
                source.path.display()
            ),
        },
    }
}

// The host keys dependencies by identifier, so only one entry per mod fits.
fn dedup_dependencies(deps: &[ModDependency]) -> Vec<ModDependency> {
    let mut out: Vec<ModDependency> = Vec::with_capacity(deps.len());
    for dep in deps {
        if out.iter().any(|d| d.mod_id == dep.mod_id) {
            log::warn!(
                "dependency on `{}` is declared more than once, keeping the first declaration",
                dep.mod_id
            );
            continue;
        }
        out.push(dep.clone());
    }
    out
}
