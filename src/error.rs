use std::path::PathBuf;

/// Failures that are reported to the user by kind.
///
/// Anything else that goes wrong (I/O while writing, a referenced binary
/// that cannot be loaded, malformed sections) travels as a plain
/// [`anyhow::Error`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The target path does not resolve to an existing file.
    #[error("no file was found at the given location: {}", .0.display())]
    FileNotFound(PathBuf),

    /// The target file does not carry the `.wasm` extension.
    #[error("the selected file is not a `.wasm` file: {}", .0.display())]
    NotABinary(PathBuf),

    /// The binary loaded fine but carries no mod-info record.
    #[error("no mod-info record found in `{}`", .0.display())]
    MetadataMissing(PathBuf),

    /// The mod-info record does not identify the mod.
    #[error("the mod-info record in `{}` does not declare a `modId`", .0.display())]
    MissingModId(PathBuf),

    /// The declared side is not one of the recognized sides.
    #[error("cannot parse '{0}', must be either 'Client', 'Server' or 'Universal'")]
    InvalidSide(String),
}

impl Error {
    /// The name this failure is reported under.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::FileNotFound(_) => "FileNotFound",
            Error::NotABinary(_) => "NotABinary",
            Error::MetadataMissing(_) | Error::MissingModId(_) => "MetadataMissing",
            Error::InvalidSide(_) => "InvalidSide",
        }
    }
}
