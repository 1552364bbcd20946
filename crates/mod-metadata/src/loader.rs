use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{Context, Result};

use crate::Payload;

/// A wasm binary that has been read and parsed.
#[derive(Debug)]
pub struct LoadedModule {
    name: String,
    path: PathBuf,
    payload: Payload,
}

impl LoadedModule {
    /// Parse `bytes` as a binary that lives at `path`.
    ///
    /// The module's short name is the file stem of `path`.
    pub fn from_bytes(path: impl Into<PathBuf>, bytes: &[u8]) -> Result<Self> {
        let path = path.into();
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .with_context(|| format!("`{}` does not name a file", path.display()))?
            .to_owned();
        let payload = Payload::from_binary(bytes)
            .with_context(|| format!("failed to parse `{}` as wasm", path.display()))?;
        Ok(Self {
            name,
            path,
            payload,
        })
    }

    /// Read and parse the binary at `path`.
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let bytes = fs::read(&path).with_context(|| format!("failed to read `{}`", path.display()))?;
        Self::from_bytes(path, &bytes)
    }

    /// Short name of the binary, as other binaries refer to it.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Location the binary was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory containing the binary.
    pub fn directory(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }

    /// The parsed declarative surface of the binary.
    pub fn payload(&self) -> &Payload {
        &self.payload
    }
}

/// Every binary loaded into this process, keyed by short name.
///
/// Binaries are never unloaded. Loading a short name that is already present
/// hands back the module that was loaded first.
#[derive(Debug, Default)]
pub struct Loader {
    modules: HashMap<String, Rc<LoadedModule>>,
}

impl Loader {
    /// Create an empty loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the binary at `path`, unless one with the same short name is
    /// already loaded.
    pub fn load(&mut self, path: &Path) -> Result<Rc<LoadedModule>> {
        if let Some(name) = path.file_stem().and_then(|s| s.to_str()) {
            if let Some(module) = self.modules.get(name) {
                log::debug!("`{name}` is already loaded from {}", module.path().display());
                return Ok(module.clone());
            }
        }
        let module = LoadedModule::from_file(path)?;
        log::debug!("loaded `{}` from {}", module.name(), path.display());
        Ok(self.insert(module))
    }

    /// Register an already parsed module.
    pub fn insert(&mut self, module: LoadedModule) -> Rc<LoadedModule> {
        self.modules
            .entry(module.name.clone())
            .or_insert_with(|| Rc::new(module))
            .clone()
    }

    /// Whether a binary with short name `name` is loaded.
    pub fn is_loaded(&self, name: &str) -> bool {
        self.modules.contains_key(name)
    }

    /// Look up a loaded binary by short name.
    pub fn get(&self, name: &str) -> Option<Rc<LoadedModule>> {
        self.modules.get(name).cloned()
    }

    /// Number of loaded binaries.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Whether nothing has been loaded yet.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
