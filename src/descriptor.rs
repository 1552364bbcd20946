//! The `modinfo.json` document consumed by the mod-loading host.

use std::fmt::{self, Display};
use std::str::FromStr;

use mod_metadata::ModDependency;
use serde_derive::{Deserialize, Serialize};

use crate::Error;

/// Value of the `type` key for mods that ship code.
pub const CODE_KIND: &str = "Code";

/// The process a mod runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    /// Only the client process.
    Client,
    /// Only the server process.
    Server,
    /// Both processes.
    Universal,
}

impl FromStr for Side {
    type Err = Error;

    /// Case-insensitive, so `client`, `Client` and `CLIENT` all parse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("client") {
            Ok(Side::Client)
        } else if s.eq_ignore_ascii_case("server") {
            Ok(Side::Server)
        } else if s.eq_ignore_ascii_case("universal") {
            Ok(Side::Universal)
        } else {
            Err(Error::InvalidSide(s.to_owned()))
        }
    }
}

impl Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Side::Client => "Client",
            Side::Server => "Server",
            Side::Universal => "Universal",
        })
    }
}

/// A normalized mod descriptor, serialized as `modinfo.json`.
///
/// Field order is the key order of the emitted JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModDescriptor {
    /// URL of the JSON schema the document follows.
    #[serde(rename = "$schema")]
    pub schema: String,
    /// Always [`CODE_KIND`] for descriptors generated from binaries.
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub mod_id: String,
    pub side: Side,
    pub description: String,
    pub version: String,
    pub website: String,
    pub authors: Vec<String>,
    pub contributors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_on_client: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_on_server: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_version: Option<String>,
    /// Encoded as an object from mod identifier to version constraint.
    #[serde(default, with = "dependencies", skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<ModDependency>,
}

impl ModDescriptor {
    /// Render as indented JSON.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// `{"game": "1.19.0", "survival": "*"}` rather than a list of records.
mod dependencies {
    use indexmap::IndexMap;
    use mod_metadata::ModDependency;
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(deps: &[ModDependency], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(deps.len()))?;
        for dep in deps {
            map.serialize_entry(&dep.mod_id, &dep.version)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<ModDependency>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let map = IndexMap::<String, String>::deserialize(deserializer)?;
        Ok(map
            .into_iter()
            .map(|(mod_id, version)| ModDependency { mod_id, version })
            .collect())
    }
}
