// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! `sparrow check <path>`: parse `.swift` files and report syntax errors.
//!
//! Text output renders each error with miette, followed by a one-line
//! summary. JSON output is one object per file. Either way the command fails
//! if any file has errors.

use camino::{Utf8Path, Utf8PathBuf};
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use sparrow_core::source_analysis::{ParseOptions, parse};
use tracing::{debug, info};

use super::{collect_source_files, read_source};
use crate::OutputFormat;
use crate::diagnostic::{CheckDiagnostic, DiagnosticRecord};

/// The result of checking one file.
struct FileReport {
    path: Utf8PathBuf,
    item_count: usize,
    diagnostics: Vec<CheckDiagnostic>,
}

/// One file in JSON output.
#[derive(Debug, Serialize)]
struct FileRecord<'a> {
    path: &'a str,
    items: usize,
    errors: Vec<DiagnosticRecord<'a>>,
}

pub fn run(path: &str, format: OutputFormat, options: ParseOptions) -> Result<()> {
    let files = collect_source_files(Utf8Path::new(path))?;
    if files.is_empty() {
        miette::bail!("No .swift source files found in '{}'", path);
    }

    let mut reports = Vec::with_capacity(files.len());
    for file in files {
        reports.push(check_file(file, options)?);
    }

    let file_count = reports.len();
    let error_count: usize = reports.iter().map(|report| report.diagnostics.len()).sum();
    info!(files = file_count, errors = error_count, "check finished");

    match format {
        OutputFormat::Json => {
            let records: Vec<_> = reports
                .iter()
                .map(|report| FileRecord {
                    path: report.path.as_str(),
                    items: report.item_count,
                    errors: report.diagnostics.iter().map(CheckDiagnostic::record).collect(),
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&records).into_diagnostic()?);
        }
        OutputFormat::Text => {
            for diagnostic in reports.into_iter().flat_map(|report| report.diagnostics) {
                eprintln!("{:?}", miette::Report::new(diagnostic));
            }
            let plural = if file_count == 1 { "" } else { "s" };
            println!("Checked {file_count} file{plural}: {}", summary(error_count));
        }
    }

    if error_count > 0 {
        miette::bail!("{}", summary(error_count));
    }
    Ok(())
}

fn check_file(path: Utf8PathBuf, options: ParseOptions) -> Result<FileReport> {
    let source = read_source(&path)?;
    let (file, errors) = parse(&source, options);
    debug!(path = %path, items = file.items().len(), errors = errors.len(), "parsed file");

    let diagnostics = errors
        .iter()
        .map(|error| CheckDiagnostic::from_parse_error(error, path.as_str(), &source))
        .collect();
    Ok(FileReport {
        item_count: file.items().len(),
        path,
        diagnostics,
    })
}

fn summary(error_count: usize) -> String {
    match error_count {
        0 => "no errors".to_string(),
        1 => "1 error".to_string(),
        n => format!("{n} errors"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_pluralizes() {
        assert_eq!(summary(0), "no errors");
        assert_eq!(summary(1), "1 error");
        assert_eq!(summary(3), "3 errors");
    }

    #[test]
    fn check_file_collects_diagnostics() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = Utf8PathBuf::from_path_buf(dir.path().join("bad.swift")).expect("utf-8");
        std::fs::write(&path, "let x = 1\n) ]\n").expect("write");

        let report = check_file(path, ParseOptions::default()).expect("check");
        assert_eq!(report.item_count, 2);
        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(report.diagnostics[0].kind, "unexpected_tokens");
    }
}
