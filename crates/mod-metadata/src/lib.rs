//! Read and embed mod metadata carried in WebAssembly binaries
//!
//! A mod binary declares who it is through custom sections on its outermost
//! module or component:
//!
//! * `mod-info`: a single JSON record naming the mod (see [`ModInfo`]).
//! * `mod-dependency`: zero or more JSON records, one per dependency (see
//!   [`ModDependency`]).
//! * `version`: the product version of the binary itself (see [`Version`]).
//!
//! # Examples
//!
//! **Read the mod-info record from a binary**
//!
//! ```no_run
//! # #![allow(unused)]
//! # fn main() -> Result<(), anyhow::Error> {
//! use mod_metadata::{CustomSections, Introspect, Loader};
//! use std::path::Path;
//!
//! let mut loader = Loader::new();
//! let module = loader.load(Path::new("mymod.wasm"))?;
//! let info = CustomSections.declared_metadata(&loader, &module)?;
//! # Ok(()) }
//! ```
//!
//! **Declare metadata in a new module**
//!
//! ```
//! # fn main() -> Result<(), anyhow::Error> {
//! use mod_metadata::{ModDependency, ModInfo, Version};
//!
//! let info = ModInfo {
//!     name: "Waypoints".to_owned(),
//!     mod_id: "waypoints".to_owned(),
//!     ..ModInfo::default()
//! };
//!
//! let mut module = wasm_encoder::Module::new();
//! module.section(&info.section()?);
//! module.section(&ModDependency::new("game", "1.19.0").section()?);
//! module.section(&Version::new("1.0.0"));
//! let wasm = module.finish();
//! # Ok(()) }
//! ```

#![warn(missing_debug_implementations, missing_docs)]

pub use dependency::ModDependency;
pub use introspect::{short_name, CustomSections, Introspect, IntrospectError};
pub use loader::{LoadedModule, Loader};
pub use mod_info::ModInfo;
pub use payload::{Payload, RawCustomSection};
pub use version::Version;

mod dependency;
mod introspect;
mod loader;
mod mod_info;
mod payload;
mod version;
