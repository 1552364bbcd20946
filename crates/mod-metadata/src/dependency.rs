use std::borrow::Cow;

use anyhow::{ensure, Context, Result};
use serde_derive::{Deserialize, Serialize};
use wasm_encoder::CustomSection;

use crate::RawCustomSection;

/// Another mod this mod depends upon.
///
/// Each dependency is declared in its own `mod-dependency` custom section,
/// so a binary carries as many of these sections as it has dependencies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModDependency {
    /// Identifier of the required mod.
    pub mod_id: String,
    /// Version constraint on the required mod. Empty when unconstrained.
    #[serde(default)]
    pub version: String,
}

impl ModDependency {
    /// Name of the custom sections holding dependency records.
    pub const SECTION_NAME: &'static str = "mod-dependency";

    /// Create a new dependency on `mod_id` at `version`.
    pub fn new(mod_id: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            mod_id: mod_id.into(),
            version: version.into(),
        }
    }

    /// Encode this record as a `mod-dependency` custom section.
    pub fn section(&self) -> Result<CustomSection<'static>> {
        Ok(CustomSection {
            name: Cow::Borrowed(Self::SECTION_NAME),
            data: Cow::Owned(serde_json::to_vec(self)?),
        })
    }

    /// Parse a `mod-dependency` custom section from a wasm binary.
    pub fn parse_custom_section(section: &RawCustomSection) -> Result<Self> {
        ensure!(
            section.name == Self::SECTION_NAME,
            "The `mod-dependency` custom section should have a name of 'mod-dependency'"
        );
        serde_json::from_slice(&section.data).with_context(|| {
            format!(
                "malformed `mod-dependency` section at offset {}",
                section.offset
            )
        })
    }
}
