use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, ValueEnum};
use microgen::target::Target;
use tracing_subscriber::EnvFilter;

/// Generate C++ bean sources from a YAML schema.
///
/// Checks the schema for the selected target, enriches it and writes the
/// rendered header and source file into the output directory.
#[derive(Parser)]
#[command(name = "microgen", version, about)]
struct Cli {
    /// What to generate.
    #[arg(value_enum)]
    mode: Mode,

    /// YAML schema describing the bean.
    input: PathBuf,

    /// Output directory for generated sources.
    #[arg(env = "MICROGEN_OUTPUT_DIR")]
    output_dir: PathBuf,

    /// File stem of the generated sources. Defaults to the input file stem.
    #[arg(long)]
    stem: Option<String>,

    /// Print the enriched IR as JSON instead of writing sources.
    #[arg(long)]
    emit_ir: bool,

    /// Suppress non-error output.
    #[arg(long, short)]
    quiet: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    /// Plain value classes.
    Bean,
    /// QObject wrappers around a bean.
    Qtbean,
    /// JSON decoder for a bean.
    Factory,
}

impl From<Mode> for Target {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Bean => Target::Bean,
            Mode::Qtbean => Target::QtBean,
            Mode::Factory => Target::Factory,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.quiet);

    if let Err(e) = run(cli) {
        eprintln!("error: {e}");

        // Print cause chain.
        let mut source = std::error::Error::source(&e);
        while let Some(cause) = source {
            eprintln!("  caused by: {cause}");
            source = std::error::Error::source(cause);
        }

        process::exit(1);
    }
}

/// `RUST_LOG` wins over the verbosity picked by `--quiet`.
fn init_logging(quiet: bool) {
    let default = if quiet { "warn" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn default_stem(input: &Path, bean_name: Option<&str>) -> String {
    input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .or_else(|| bean_name.map(str::to_lowercase))
        .unwrap_or_else(|| "bean".to_string())
}

fn run(cli: Cli) -> microgen::error::Result<()> {
    let target = Target::from(cli.mode);

    tracing::info!(path = %cli.input.display(), "loading schema");
    let document = microgen::schema::load_schema(&cli.input)?;
    let ir = microgen::transform::transform(&document, target)?;

    if cli.emit_ir {
        println!("{}", serde_json::to_string_pretty(&ir)?);
        return Ok(());
    }

    let stem = cli
        .stem
        .unwrap_or_else(|| default_stem(&cli.input, document.name.as_deref()));
    let stats = microgen::codegen::generate(&ir, &stem, &cli.output_dir)?;
    tracing::info!(
        %target,
        files = stats.files_written,
        classes = stats.classes_rendered,
        "done"
    );

    Ok(())
}
