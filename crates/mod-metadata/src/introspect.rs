use anyhow::{bail, Result};

use crate::{LoadedModule, Loader, ModDependency, ModInfo, Version};

/// Reading the declarative metadata attached to a loaded binary.
///
/// [`CustomSections`] is the real implementation. The trait exists so callers
/// can be exercised against hand-written binaries without touching disk.
pub trait Introspect {
    /// The single mod-info record of `module`, if it declares one.
    ///
    /// Fails with [`IntrospectError::Unresolved`] while a binary the record
    /// refers to is missing from `loader`.
    fn declared_metadata(
        &self,
        loader: &Loader,
        module: &LoadedModule,
    ) -> Result<Option<ModInfo>, IntrospectError>;

    /// Every dependency record of `module`, in declaration order.
    fn declared_dependencies(&self, module: &LoadedModule) -> Result<Vec<ModDependency>>;

    /// The product version stamped on `module`, if any.
    fn product_version(&self, module: &LoadedModule) -> Result<Option<String>>;
}

/// Errors produced while reading a mod-info record.
#[derive(Debug, thiserror::Error)]
pub enum IntrospectError {
    /// A binary referenced by the record has not been loaded yet.
    #[error("referenced binary `{name}` is not loaded")]
    Unresolved {
        /// Short name of the missing binary.
        name: String,
    },
    /// The record could not be decoded.
    #[error(transparent)]
    Malformed(#[from] anyhow::Error),
}

/// Reads metadata from the `mod-info`, `mod-dependency` and `version` custom
/// sections of the outermost module or component.
#[derive(Debug, Default, Clone, Copy)]
pub struct CustomSections;

impl Introspect for CustomSections {
    fn declared_metadata(
        &self,
        loader: &Loader,
        module: &LoadedModule,
    ) -> Result<Option<ModInfo>, IntrospectError> {
        let mut sections = module.payload().custom_sections(ModInfo::SECTION_NAME);
        let Some(section) = sections.next() else {
            return Ok(None);
        };
        if sections.next().is_some() {
            return Err(anyhow::anyhow!(
                "`{}` declares more than one `mod-info` section",
                module.path().display()
            )
            .into());
        }
        let info = ModInfo::parse_custom_section(section)?;
        if let Some(api) = &info.api {
            let name = short_name(api);
            if !loader.is_loaded(name) {
                return Err(IntrospectError::Unresolved {
                    name: name.to_owned(),
                });
            }
        }
        Ok(Some(info))
    }

    fn declared_dependencies(&self, module: &LoadedModule) -> Result<Vec<ModDependency>> {
        module
            .payload()
            .custom_sections(ModDependency::SECTION_NAME)
            .map(ModDependency::parse_custom_section)
            .collect()
    }

    fn product_version(&self, module: &LoadedModule) -> Result<Option<String>> {
        let mut sections = module.payload().custom_sections(Version::SECTION_NAME);
        let Some(section) = sections.next() else {
            return Ok(None);
        };
        if sections.next().is_some() {
            bail!(
                "`{}` declares more than one `version` section",
                module.path().display()
            );
        }
        Ok(Some(Version::parse_custom_section(section)?.to_string()))
    }
}

/// The short name in a binary reference such as `mod-api, 1.4.0`.
pub fn short_name(reference: &str) -> &str {
    reference.split(',').next().unwrap_or(reference).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_name_drops_qualifiers() {
        assert_eq!(short_name("mod-api"), "mod-api");
        assert_eq!(short_name("mod-api, 1.4.0"), "mod-api");
        assert_eq!(short_name(" mod-api ,x"), "mod-api");
    }
}
