//! Generate `modinfo.json` descriptors from the metadata embedded in mod
//! binaries.
//!
//! A build step points [`generate`] at a freshly compiled mod binary. The
//! binary's declared records are read through the [`mod_metadata`] crate,
//! mapped onto a [`ModDescriptor`] and written next to the binary, or into the
//! requested output directory.

use std::fmt::{self, Display};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use mod_metadata::{CustomSections, Introspect, Loader};

pub use descriptor::{ModDescriptor, Side};
pub use error::Error;
pub use extract::{extract, ModMetadataSource};
pub use mapper::map;

pub mod descriptor;
mod error;
pub mod extract;
pub mod mapper;

/// Name of the file [`generate`] writes.
pub const OUTPUT_FILE_NAME: &str = "modinfo.json";

/// Extension a mod binary must carry.
pub const BINARY_EXTENSION: &str = "wasm";

/// Schema reference embedded under `$schema` unless another one is requested.
///
/// Resolved by the host relative to the descriptor itself.
pub const DEFAULT_SCHEMA_URL: &str = "./modinfo.schema.json";

/// Options shared by every invocation of the tool.
#[derive(clap::Parser, Debug, Clone)]
pub struct GeneralOpts {
    /// Use verbose output (repeat for debug and trace output).
    #[clap(long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,

    /// Configuration over whether terminal colors are used in output.
    #[clap(long = "color", default_value = "auto")]
    pub color: clap::ColorChoice,
}

impl GeneralOpts {
    /// Install the process-wide logger. `RUST_LOG` still takes precedence.
    pub fn init_logger(&self) {
        let default = match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };
        let mut builder =
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default));
        builder.write_style(match self.color {
            clap::ColorChoice::Auto => env_logger::WriteStyle::Auto,
            clap::ColorChoice::Always => env_logger::WriteStyle::Always,
            clap::ColorChoice::Never => env_logger::WriteStyle::Never,
        });
        // Only fails when a logger is already installed, which is fine.
        let _ = builder.try_init();
    }
}

/// Where the `version` of the descriptor comes from.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VersionMode {
    /// The version declared in the mod-info record.
    #[default]
    Static,
    /// The product version stamped on the binary.
    #[value(name = "assembly")]
    FromBinary,
}

impl Display for VersionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            VersionMode::Static => "the mod-info record",
            VersionMode::FromBinary => "the binary",
        })
    }
}

/// What to generate and where.
#[derive(Debug, Clone)]
pub struct ExtractionOptions {
    /// The mod binary to inspect. Relative paths are resolved against the
    /// current directory.
    pub target_path: PathBuf,
    /// Directory to write into. Defaults to the binary's own directory.
    pub output_directory: Option<PathBuf>,
    pub version_mode: VersionMode,
    /// Embedded verbatim under `$schema`.
    pub schema_url: String,
}

impl ExtractionOptions {
    /// Options for `target_path` with every other setting at its default.
    pub fn new(target_path: impl Into<PathBuf>) -> Self {
        Self {
            target_path: target_path.into(),
            output_directory: None,
            version_mode: VersionMode::default(),
            schema_url: DEFAULT_SCHEMA_URL.to_owned(),
        }
    }
}

/// Write the `modinfo.json` for `options.target_path` and return its path.
pub fn generate(options: &ExtractionOptions) -> Result<PathBuf> {
    generate_with(&CustomSections, options)
}

/// Like [`generate`], reading metadata through `introspect`.
///
/// Nothing is written unless extraction and mapping both succeed.
pub fn generate_with<I: Introspect>(introspect: &I, options: &ExtractionOptions) -> Result<PathBuf> {
    log::info!(
        "beginning conversion for target binary: {}",
        options.target_path.display()
    );
    let target = resolve_target(&options.target_path)?;

    let mut loader = Loader::new();
    let module = loader.load(&target)?;
    log::info!("loaded binary from {}", target.display());

    let source = extract(introspect, &mut loader, &module)?;
    let descriptor = map(&source, options)?;
    let json = descriptor
        .to_json_pretty()
        .context("failed to serialize mod descriptor")?;

    let out_dir = match &options.output_directory {
        Some(dir) => dir.clone(),
        None => module.directory().to_owned(),
    };
    fs::create_dir_all(&out_dir)
        .with_context(|| format!("failed to create `{}`", out_dir.display()))?;
    let out = out_dir.join(OUTPUT_FILE_NAME);
    fs::write(&out, json).with_context(|| format!("failed to write `{}`", out.display()))?;

    log::info!(
        "process complete: {OUTPUT_FILE_NAME} has been created at {}",
        out.display()
    );
    Ok(out)
}

fn resolve_target(path: &Path) -> Result<PathBuf> {
    let path = if path.is_relative() {
        std::env::current_dir()
            .context("failed to determine the current directory")?
            .join(path)
    } else {
        path.to_owned()
    };
    if !path.is_file() {
        return Err(Error::FileNotFound(path).into());
    }
    if path.extension().and_then(|e| e.to_str()) != Some(BINARY_EXTENSION) {
        return Err(Error::NotABinary(path).into());
    }
    Ok(path)
}
