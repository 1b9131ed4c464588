use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use defconf::{read_source, translate_with, write_output, Options, Redefinition};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Translates a def/struct configuration file into JSON.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the source file.
    #[arg(short, long)]
    input: PathBuf,

    /// Path of the JSON file to write. Left untouched if translation fails.
    #[arg(short, long)]
    output: PathBuf,

    /// Let a later definition replace an earlier one with the same name.
    #[arg(long)]
    allow_redefinition: bool,
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("defconf=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let options = Options {
        redefinition: if args.allow_redefinition {
            Redefinition::Overwrite
        }
        else {
            Redefinition::Reject
        },
    };

    let source = match read_source(&args.input) {
        Ok(source) => source,
        Err(err) => {
            eprint!("{}", err.render(""));
            return ExitCode::FAILURE;
        }
    };

    match translate_with(&source, &options).and_then(|json| write_output(&args.output, &json)) {
        Ok(()) => {
            info!(input = %args.input.display(), output = %args.output.display(), "wrote JSON");
            ExitCode::SUCCESS
        },
        Err(err) => {
            eprint!("{}", err.render(&source));
            ExitCode::FAILURE
        }
    }
}
