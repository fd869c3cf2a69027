// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Error diagnostics using miette.
//!
//! Converts sparrow-core parse errors into miette-formatted reports with the
//! offending source line and a label under the error location.

// Suppress unused_assignments for struct fields used by derive macros
#![allow(unused_assignments)]

use miette::{Diagnostic, SourceSpan};
use serde::Serialize;
use sparrow_core::source_analysis::ParseError;

/// A syntax error with rich formatting.
#[derive(Debug, Diagnostic, thiserror::Error)]
#[error("{message}")]
#[diagnostic(code(sparrow::syntax))]
pub struct CheckDiagnostic {
    /// Stable error kind name, e.g. `expected_token`
    pub kind: &'static str,
    /// Human-readable error message
    pub message: String,
    /// Source code for context
    #[source_code]
    pub src: miette::NamedSource<String>,
    /// Location of the error
    #[label("{label}")]
    pub span: SourceSpan,
    /// Label for the error span (interpolated by miette derive macro)
    pub label: String,
}

impl CheckDiagnostic {
    /// Create a diagnostic from a parser error.
    pub fn from_parse_error(error: &ParseError, source_path: &str, source: &str) -> Self {
        let span = error.span();
        Self {
            kind: error.kind.name(),
            message: error.to_string(),
            src: miette::NamedSource::new(source_path, source.to_string()),
            span: (span.start() as usize, span.len() as usize).into(),
            label: "here".to_string(),
        }
    }

    /// The machine-readable form used by `--format json`.
    pub fn record(&self) -> DiagnosticRecord<'_> {
        DiagnosticRecord {
            kind: self.kind,
            message: &self.message,
            start: self.span.offset(),
            end: self.span.offset() + self.span.len(),
        }
    }
}

/// A diagnostic as printed in JSON output.
#[derive(Debug, Serialize)]
pub struct DiagnosticRecord<'a> {
    pub kind: &'static str,
    pub message: &'a str,
    pub start: usize,
    pub end: usize,
}
