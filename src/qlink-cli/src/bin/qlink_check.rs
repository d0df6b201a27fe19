//! qlink-check - resolve a schema file and report the result
//!
//! Loads a table and query schema, resolves it against the configured type
//! registry, and prints each query's range and result types. The first
//! resolution error is printed as-is and the process exits non-zero.
//!
//! # Usage
//!
//! ```bash
//! cargo run --package qlink-cli --bin qlink-check -- --help
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser};

use common_config::{ConfigFormat, QlinkConfig};
use common_error::QlinkResult;

use qlink_cli::{check_file, render};

/// qlink-check CLI.
#[derive(Parser, Debug)]
#[command(name = "qlink-check")]
#[command(about = "Resolve a table and query schema and report its queries")]
#[command(version)]
struct Args {
    /// Schema file (json, toml, or yaml)
    schema: PathBuf,

    /// Tool configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Additional type name to register (repeatable)
    #[arg(short = 't', long = "type")]
    types: Vec<String>,

    /// Schema format, overriding the configuration and file extension
    #[arg(short, long)]
    format: Option<ConfigFormat>,

    /// Print the schema as a tree
    #[arg(long)]
    tree: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .try_init();
}

fn run(args: &Args) -> QlinkResult<String> {
    let config = match &args.config {
        Some(path) => QlinkConfig::from_file(path)?,
        None => QlinkConfig::default(),
    };
    let schema = check_file(&args.schema, &config, args.format, &args.types)?;
    Ok(render(&schema, &config.display, args.tree))
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(output) => {
            print!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
