// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! `sparrow tokens <file>`: print the lexemes of a file.
//!
//! Text output is one lexeme per line: byte range, kind, text, and a `^`
//! marker for lexemes that begin a line. JSON output is an array of records
//! that also carries the trivia.

use std::fmt::Write as _;

use camino::Utf8Path;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use sparrow_core::source_analysis::{Lexeme, Lexer};
use tracing::debug;

use super::read_source;
use crate::OutputFormat;

/// One lexeme in JSON output.
#[derive(Debug, Serialize)]
struct TokenRecord<'src> {
    kind: &'static str,
    text: &'src str,
    start: u32,
    end: u32,
    at_start_of_line: bool,
    leading_trivia: String,
    trailing_trivia: String,
}

impl<'src> From<&Lexeme<'src>> for TokenRecord<'src> {
    fn from(lexeme: &Lexeme<'src>) -> Self {
        let span = lexeme.span();
        Self {
            kind: lexeme.kind().name(),
            text: lexeme.text(),
            start: span.start(),
            end: span.end(),
            at_start_of_line: lexeme.is_at_start_of_line(),
            leading_trivia: lexeme.leading_trivia().iter().map(|t| t.as_str()).collect(),
            trailing_trivia: lexeme.trailing_trivia().iter().map(|t| t.as_str()).collect(),
        }
    }
}

pub fn run(path: &str, format: OutputFormat) -> Result<()> {
    let source = read_source(Utf8Path::new(path))?;
    let output = render(&source, format)?;
    print!("{output}");
    Ok(())
}

fn render(source: &str, format: OutputFormat) -> Result<String> {
    let lexemes: Vec<_> = Lexer::new(source).collect();
    debug!(count = lexemes.len(), "lexed source");

    match format {
        OutputFormat::Json => {
            let records: Vec<_> = lexemes.iter().map(TokenRecord::from).collect();
            let mut json = serde_json::to_string_pretty(&records).into_diagnostic()?;
            json.push('\n');
            Ok(json)
        }
        OutputFormat::Text => {
            let mut out = String::new();
            for lexeme in &lexemes {
                let span = lexeme.span();
                let marker = if lexeme.is_at_start_of_line() { '^' } else { ' ' };
                let _ = writeln!(
                    out,
                    "{:>6}..{:<6} {marker} {:<22} {:?}",
                    span.start(),
                    span.end(),
                    lexeme.kind().name(),
                    lexeme.text()
                );
            }
            Ok(out)
        }
    }
}
