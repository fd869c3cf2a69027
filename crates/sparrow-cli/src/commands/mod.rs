// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! CLI command implementations.

pub mod check;
pub mod roundtrip;
pub mod tokens;

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use miette::{Context, IntoDiagnostic, Result};

/// Reads a UTF-8 source file.
pub fn read_source(path: &Utf8Path) -> Result<String> {
    fs::read_to_string(path.as_std_path())
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to read '{path}'"))
}

/// Resolves `path` to the `.swift` files it names: the file itself, or every
/// `.swift` file under a directory, in sorted order.
pub fn collect_source_files(path: &Utf8Path) -> Result<Vec<Utf8PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if !path.is_dir() {
        miette::bail!("Path '{}' does not exist", path);
    }
    let mut files = Vec::new();
    collect_swift_files_recursive(path, &mut files)?;
    files.sort();
    Ok(files)
}

/// Recursively collect all `.swift` files from a directory tree.
///
/// Symlinks are skipped to avoid potential infinite recursion from circular links.
fn collect_swift_files_recursive(dir: &Utf8Path, files: &mut Vec<Utf8PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to read directory '{dir}'"))?
    {
        let entry = entry.into_diagnostic()?;
        let file_type = entry.file_type().into_diagnostic()?;
        if file_type.is_symlink() {
            continue;
        }
        let entry_path = Utf8PathBuf::from_path_buf(entry.path())
            .map_err(|_| miette::miette!("Non-UTF-8 path"))?;

        if file_type.is_dir() {
            collect_swift_files_recursive(&entry_path, files)?;
        } else if file_type.is_file() && entry_path.extension() == Some("swift") {
            files.push(entry_path);
        }
    }
    Ok(())
}
