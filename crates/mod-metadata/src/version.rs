use std::borrow::Cow;
use std::fmt::{self, Display};
use std::str::FromStr;

use anyhow::{ensure, Error, Result};
use wasm_encoder::{ComponentSection, CustomSection, Encode, Section};

use crate::RawCustomSection;

/// Product version of the binary itself
///
/// This is the OCI `version` annotation. Release pipelines stamp it onto the
/// binary, so it can legitimately differ from the version a mod declares in
/// its `mod-info` record.
#[derive(Debug, Clone, PartialEq)]
pub struct Version(CustomSection<'static>);

impl Version {
    /// Name of the custom section holding the product version.
    pub const SECTION_NAME: &'static str = "version";

    /// Create a new instance of `Version`.
    pub fn new<S: Into<Cow<'static, str>>>(s: S) -> Self {
        Self(CustomSection {
            name: Self::SECTION_NAME.into(),
            data: match s.into() {
                Cow::Borrowed(s) => Cow::Borrowed(s.as_bytes()),
                Cow::Owned(s) => Cow::Owned(s.into()),
            },
        })
    }

    /// Parse a `version` custom section from a wasm binary.
    pub fn parse_custom_section(section: &RawCustomSection) -> Result<Self> {
        ensure!(
            section.name == Self::SECTION_NAME,
            "The `version` custom section should have a name of 'version'"
        );
        let data = String::from_utf8(section.data.clone())?;
        Ok(Self::new(data))
    }
}

impl FromStr for Version {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s.to_owned()))
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Always utf8: both constructors start from a `str`.
        write!(f, "{}", String::from_utf8_lossy(&self.0.data))
    }
}

impl ComponentSection for Version {
    fn id(&self) -> u8 {
        ComponentSection::id(&self.0)
    }
}

impl Section for Version {
    fn id(&self) -> u8 {
        Section::id(&self.0)
    }
}

impl Encode for Version {
    fn encode(&self, sink: &mut Vec<u8>) {
        self.0.encode(sink);
    }
}
