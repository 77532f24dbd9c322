//! gobuilder CLI - functional-options builders for annotated Go structs

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use gobuilder_lib::driver::{self, FileOutcome, RunReport};
use gobuilder_lib::{Conventions, RunOptions};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "gobuilder")]
#[command(
    about = "Generate New<T> constructors and With<Field> options for Go structs marked +builder",
    long_about = None
)]
struct Cli {
    /// Directory scanned recursively for .go files
    #[arg(long, value_name = "DIR")]
    input_dir: PathBuf,

    /// Directory the generated files are written to
    #[arg(long, value_name = "DIR")]
    output_dir: PathBuf,

    /// TOML file overriding the naming conventions
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the generated source to stdout instead of writing files
    #[arg(long)]
    dry_run: bool,

    /// Treat warnings as failures
    #[arg(long)]
    strict: bool,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Initialize tracing subscriber with verbosity-based filtering.
///
/// `RUST_LOG` takes precedence over the `-v` flags when set.
fn init_tracing(verbose: u8) {
    let base_filter = match std::env::var("RUST_LOG") {
        Ok(filter) => filter,
        Err(_) => match verbose {
            0 => "warn".to_string(),
            1 => "warn,gobuilder_lib=info".to_string(),
            2 => "info,gobuilder_lib=debug".to_string(),
            _ => "debug,gobuilder_lib=trace".to_string(),
        },
    };

    let filter = EnvFilter::try_new(&base_filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(verbose >= 2)
                .with_level(true)
                .with_file(verbose >= 3)
                .with_line_number(verbose >= 3)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

fn print_dry_run(report: &RunReport) {
    for outcome in report.generated() {
        if let FileOutcome::Generated {
            output,
            source: Some(source),
            ..
        } = outcome
        {
            println!("// {} -> {}", outcome.input().display(), output.display());
            print!("{source}");
        }
    }
}

fn print_summary(report: &RunReport) {
    eprintln!(
        "gobuilder: {} generated, {} skipped, {} failed, {} warning(s)",
        report.generated().count(),
        report.skipped().count(),
        report.failures().count(),
        report.warning_count()
    );
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let conventions = match &cli.config {
        Some(path) => match Conventions::load(path) {
            Ok(conventions) => conventions,
            Err(err) => {
                tracing::error!("{err}");
                eprintln!("gobuilder: {err}");
                return ExitCode::FAILURE;
            }
        },
        None => Conventions::default(),
    };

    let options = RunOptions {
        conventions,
        dry_run: cli.dry_run,
        ..RunOptions::new(&cli.input_dir, &cli.output_dir)
    };

    let report = match driver::run(&options) {
        Ok(report) => report,
        Err(err) => {
            tracing::error!("{err}");
            eprintln!("gobuilder: {err}");
            return ExitCode::FAILURE;
        }
    };

    if cli.dry_run {
        print_dry_run(&report);
    }
    print_summary(&report);

    if report.has_failures() || (cli.strict && report.warning_count() > 0) {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
