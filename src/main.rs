//! `ret`: a line-oriented grep-like driver for the [`ret`] regex engine.
//!
//! Reads lines from stdin, prints `Found: <substring>` for the first
//! leftmost match of the compiled pattern on each line, and reports
//! compile errors to stderr with a nonzero exit. Replaces the original's
//! `-v`/`DEBUG` boolean with a `tracing` subscriber whose verbosity `-v`
//! raises from `info` to `debug`.

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

/// A small regular-expression line filter.
#[derive(Parser, Debug)]
#[command(name = "ret", about = "Scan stdin lines for the first match of PATTERN")]
struct Cli {
    /// Enable debug tracing (writes to stderr).
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,

    /// Compile only; do not read input or match.
    #[arg(short = 'n', long = "no-match")]
    no_match: bool,

    /// Disable the ε-chain collapsing optimiser.
    #[arg(short = 'o', long = "no-optimize")]
    no_optimize: bool,

    /// The pattern to compile.
    pattern: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let machine = match ret::compile(&cli.pattern, !cli.no_optimize) {
        Ok(machine) => machine,
        Err(err) => {
            eprintln!("ret: {err}");
            return ExitCode::FAILURE;
        }
    };

    if cli.verbose {
        machine.print();
    }

    if cli.no_match {
        return ExitCode::SUCCESS;
    }

    run_line_loop(&machine)
}

fn run_line_loop(machine: &ret::Machine) -> ExitCode {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                eprintln!("ret: error reading input: {err}");
                continue;
            }
        };

        match machine.find(&line) {
            Ok(Some(m)) => {
                let _ = writeln!(out, "Found: {}", &line[m.start()..m.end()]);
            }
            Ok(None) => {}
            Err(err) => {
                eprintln!("ret: {err}");
            }
        }
    }

    ExitCode::SUCCESS
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}
