use std::borrow::Cow;

use anyhow::{ensure, Context, Result};
use serde_derive::{Deserialize, Serialize};
use wasm_encoder::CustomSection;

use crate::RawCustomSection;

/// The declarative record that identifies a mod.
///
/// Stored as a JSON object in the `mod-info` custom section. Keys that are
/// missing from the section take the values of [`ModInfo::default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModInfo {
    /// Display name of the mod.
    pub name: String,
    /// Unique identifier of the mod.
    pub mod_id: String,
    /// Human-readable description.
    pub description: String,
    /// Version declared by the author.
    pub version: String,
    /// Side the mod runs on, as declared. Parsed case-insensitively later on.
    pub side: String,
    /// Website of the mod or its documentation.
    pub website: String,
    /// Whether the author declared the mod required on clients.
    pub required_on_client: bool,
    /// Whether the author declared the mod required on servers.
    pub required_on_server: bool,
    /// Version of the network protocol the mod speaks, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_version: Option<String>,
    /// Primary authors, in declaration order.
    pub authors: Vec<String>,
    /// Contributors, in declaration order.
    pub contributors: Vec<String>,
    /// Short name of the API binary that defines this record, if any.
    ///
    /// The record can only be read once a binary of that name is loaded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api: Option<String>,
}

impl Default for ModInfo {
    fn default() -> Self {
        Self {
            name: String::new(),
            mod_id: String::new(),
            description: String::new(),
            version: String::new(),
            side: "Universal".to_owned(),
            website: String::new(),
            required_on_client: true,
            required_on_server: true,
            network_version: None,
            authors: Vec::new(),
            contributors: Vec::new(),
            api: None,
        }
    }
}

impl ModInfo {
    /// Name of the custom section holding the record.
    pub const SECTION_NAME: &'static str = "mod-info";

    /// Encode this record as a `mod-info` custom section.
    pub fn section(&self) -> Result<CustomSection<'static>> {
        Ok(CustomSection {
            name: Cow::Borrowed(Self::SECTION_NAME),
            data: Cow::Owned(serde_json::to_vec(self)?),
        })
    }

    /// Parse a `mod-info` custom section from a wasm binary.
    pub fn parse_custom_section(section: &RawCustomSection) -> Result<Self> {
        ensure!(
            section.name == Self::SECTION_NAME,
            "The `mod-info` custom section should have a name of 'mod-info'"
        );
        Self::from_bytes(&section.data)
            .with_context(|| format!("malformed `mod-info` section at offset {}", section.offset))
    }

    /// Decode a record from the JSON payload of a `mod-info` section.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
