//! Locating the declarative metadata attached to a mod binary.

use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use mod_metadata::{Introspect, IntrospectError, LoadedModule, Loader, ModDependency, ModInfo};

use crate::Error;

/// Everything a binary declares about itself.
#[derive(Debug, Clone)]
pub struct ModMetadataSource {
    /// Where the binary was loaded from.
    pub path: PathBuf,
    /// The mod-info record.
    pub info: ModInfo,
    /// Dependency records in declaration order.
    pub dependencies: Vec<ModDependency>,
    /// Product version stamped on the binary, if any.
    pub product_version: Option<String>,
}

/// Read the mod-info and dependency records of `module`.
///
/// When the mod-info record refers to a binary that is not loaded yet, that
/// binary is loaded from `{directory of module}/{name}.wasm` and the read is
/// retried. Such binaries stay in `loader` afterwards.
pub fn extract<I: Introspect>(
    introspect: &I,
    loader: &mut Loader,
    module: &LoadedModule,
) -> Result<ModMetadataSource> {
    log::info!("extracting mod-info record from {}", module.path().display());
    let mut attempted = HashSet::new();
    let info = loop {
        match introspect.declared_metadata(loader, module) {
            Ok(info) => break info,
            Err(IntrospectError::Unresolved { name }) => {
                if !attempted.insert(name.clone()) {
                    bail!("referenced binary `{name}` is still unresolved after loading it");
                }
                let path = module.directory().join(format!("{name}.wasm"));
                log::info!("loading missing dependency: {}", path.display());
                loader
                    .load(&path)
                    .with_context(|| format!("failed to load referenced binary `{name}`"))?;
            }
            Err(IntrospectError::Malformed(e)) => return Err(e),
        }
    };

    let Some(info) = info else {
        return Err(Error::MetadataMissing(module.path().to_owned()).into());
    };
    if info.mod_id.is_empty() {
        return Err(Error::MissingModId(module.path().to_owned()).into());
    }
    log::info!("mod-info record found: {}", info.mod_id);

    let dependencies = introspect.declared_dependencies(module)?;
    log::debug!("found {} mod dependencies", dependencies.len());
    let product_version = introspect.product_version(module)?;

    Ok(ModMetadataSource {
        path: module.path().to_owned(),
        info,
        dependencies,
        product_version,
    })
}
