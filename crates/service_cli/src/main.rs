//! `ore` - the command-line entry point that drives a full run-configuration
//! XML through portfolio valuation and XVA post-processing (§6).
//!
//! Invocation is deliberately narrow: `ore <path/to/config.xml>`, or
//! `ore -v`/`ore --version` to print the build version and exit. There is
//! no subcommand surface — every optional stage is instead gated by its own
//! `active` key inside the configuration file.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

mod config;
mod error;
mod pipeline;

pub use error::{CliError, Result};

use config::RunContext;

/// Runs a single scripted-payoff valuation and XVA post-processing pass
/// from a run-configuration XML.
#[derive(Parser)]
#[command(name = "ore", disable_version_flag = true)]
struct Cli {
    /// Path to the run-configuration XML.
    config: Option<PathBuf>,

    /// Print the version and exit.
    #[arg(short = 'v', long = "version")]
    version: bool,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(_) => return report(Err(CliError::Usage)),
    };

    if cli.version {
        println!("ore {}", env!("CARGO_PKG_VERSION"));
        return ExitCode::SUCCESS;
    }

    let Some(config) = cli.config else {
        return report(Err(CliError::Usage));
    };

    report(run(&config))
}

fn run(config_path: &std::path::Path) -> Result<()> {
    let ctx = RunContext::load(config_path)?;
    config::init_logging(&ctx.config.setup);
    pipeline::run(&ctx)
}

/// Prints `Error: <what>` to stderr on failure (§7) and maps the result to
/// the process exit code §6 specifies: `0` on success, `-1` for usage
/// errors, nonzero for any other unrecoverable failure.
fn report(result: Result<()>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            let code = err.exit_code();
            ExitCode::from(code.rem_euclid(256) as u8)
        }
    }
}
