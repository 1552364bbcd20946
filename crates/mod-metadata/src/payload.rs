use std::ops::Range;

use anyhow::Result;
use wasmparser::{Encoding, Parser, Payload::*};

/// A custom section lifted out of a wasm binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCustomSection {
    /// Name of the custom section.
    pub name: String,
    /// Raw payload of the section.
    pub data: Vec<u8>,
    /// Offset of the payload within the binary.
    pub offset: usize,
}

/// The declarative surface of a Wasm Component or module
///
/// Only the custom sections of the outermost component or module are kept.
/// Sections of nested modules and components describe those children, not
/// the binary as a whole.
#[derive(Debug, Clone)]
pub struct Payload {
    encoding: Encoding,
    custom_sections: Vec<RawCustomSection>,
    range: Range<usize>,
}

impl Payload {
    /// Parse a WebAssembly binary. Supports both core WebAssembly modules, and
    /// WebAssembly components.
    pub fn from_binary(input: &[u8]) -> Result<Self> {
        let mut encoding = None;
        let mut custom_sections = Vec::new();
        let mut depth = 0usize;

        for payload in Parser::new(0).parse_all(input) {
            match payload? {
                Version { encoding: e, .. } => {
                    if encoding.is_none() {
                        encoding = Some(e);
                    }
                }
                ModuleSection { .. } | ComponentSection { .. } => depth += 1,
                End { .. } => {
                    if depth > 0 {
                        depth -= 1;
                        continue;
                    }
                    let Some(encoding) = encoding else { break };
                    return Ok(Self {
                        encoding,
                        custom_sections,
                        range: 0..input.len(),
                    });
                }
                CustomSection(c) if depth == 0 => custom_sections.push(RawCustomSection {
                    name: c.name().to_owned(),
                    data: c.data().to_owned(),
                    offset: c.data_offset(),
                }),
                _ => {}
            }
        }
        Err(anyhow::anyhow!(
            "malformed wasm binary, should have reached end"
        ))
    }

    /// Whether the binary is a component or a core module.
    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Byte range of the binary.
    pub fn range(&self) -> Range<usize> {
        self.range.clone()
    }

    /// All outermost custom sections named `name`, in binary order.
    pub fn custom_sections<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a RawCustomSection> + 'a {
        self.custom_sections.iter().filter(move |c| c.name == name)
    }
}
