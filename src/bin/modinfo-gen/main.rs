use anyhow::Result;
use clap::Parser;
use modinfo_gen::{ExtractionOptions, GeneralOpts, VersionMode};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

/// Generate a `modinfo.json` descriptor from the metadata a mod binary
/// declares in its custom sections.
#[derive(Parser)]
#[clap(name = "modinfo-gen", disable_version_flag = true)]
struct Opts {
    #[clap(flatten)]
    general: GeneralOpts,

    /// The mod binary to inspect. In most build pipelines this is the
    /// `.wasm` file the build just produced.
    #[clap(short = 'a', long = "assembly", value_name = "PATH")]
    assembly: PathBuf,

    /// The output directory. Defaults to the directory of the binary.
    #[clap(short = 'o', long = "outdir", value_name = "DIR")]
    outdir: Option<PathBuf>,

    /// Where the version comes from. `static` takes the version from the
    /// mod-info record, `assembly` uses the product version of the binary
    /// itself.
    #[clap(
        short = 'v',
        long = "version",
        value_name = "static|assembly",
        value_enum,
        default_value_t = VersionMode::Static,
        hide_possible_values = true
    )]
    version: VersionMode,

    /// The JSON schema URL to embed under `$schema`.
    #[clap(long = "schema", value_name = "URL", default_value = modinfo_gen::DEFAULT_SCHEMA_URL)]
    schema: String,
}

impl Opts {
    fn run(self) -> Result<()> {
        self.general.init_logger();
        let options = ExtractionOptions {
            target_path: self.assembly,
            output_directory: self.outdir,
            version_mode: self.version,
            schema_url: self.schema,
        };
        let out = modinfo_gen::generate(&options)?;
        writeln!(io::stdout(), "wrote modinfo.json to {}", out.display())?;
        Ok(())
    }
}

fn main() -> ExitCode {
    let err = match Opts::parse().run() {
        Ok(()) => return ExitCode::SUCCESS,
        Err(e) => e,
    };
    // If an error happened and it's connected to something like `EPIPE` then
    // don't print out an error and instead just silently exit with a failure.
    if let Some(io) = err.downcast_ref::<io::Error>() {
        if io.kind() == io::ErrorKind::BrokenPipe {
            return ExitCode::FAILURE;
        }
    }
    match err.downcast_ref::<modinfo_gen::Error>() {
        Some(e) => eprintln!("{}: {e}", e.kind()),
        None => eprintln!("Error: {err:?}"),
    }
    ExitCode::FAILURE
}

#[test]
fn verify_cli() {
    use clap::CommandFactory;
    Opts::command().debug_assert()
}
