// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Sparrow command-line interface.
//!
//! This is the main entry point for the `sparrow` command.

use clap::{Parser, Subcommand, ValueEnum};
use miette::Result;
use sparrow_core::source_analysis::{DEFAULT_MAX_NESTING_DEPTH, ParseOptions};

mod commands;
mod diagnostic;

/// Sparrow: a recovering parser front end for Swift source
#[derive(Debug, Parser)]
#[command(name = "sparrow")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Increase log verbosity (-v debug, -vv trace); `RUST_LOG` overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Maximum nesting depth for types and member blocks
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_NESTING_DEPTH)]
    max_depth: usize,

    /// Skip attribute-only `#if` blocks as ordinary groups
    #[arg(long, global = true)]
    no_directive_recovery: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the lexemes of a source file
    Tokens {
        /// Source file to lex
        path: String,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Parse source files and report syntax errors
    Check {
        /// Source file or directory to check
        #[arg(default_value = ".")]
        path: String,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Verify that parsing a file reproduces it byte for byte
    Roundtrip {
        /// Source file to parse
        path: String,
    },
}

/// How command results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl Cli {
    fn parse_options(&self) -> ParseOptions {
        ParseOptions::default()
            .with_max_nesting_depth(self.max_depth)
            .with_attribute_directive_recovery(!self.no_directive_recovery)
    }
}

fn main() -> Result<()> {
    // Install miette's fancy error handler
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    init_logging(cli.verbose);
    let options = cli.parse_options();

    let result = match &cli.command {
        Command::Tokens { path, format } => commands::tokens::run(path, *format),
        Command::Check { path, format } => commands::check::run(path, *format, options),
        Command::Roundtrip { path } => commands::roundtrip::run(path, options),
    };

    // Exit with appropriate code
    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("{e:?}");
            std::process::exit(1);
        }
    }
}

/// Initialize logging to stderr. `RUST_LOG` wins over `-v`.
fn init_logging(verbose: u8) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("sparrow_cli={level},sparrow_core={level}")));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
