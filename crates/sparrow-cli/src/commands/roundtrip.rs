// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! `sparrow roundtrip <file>`: check that the parser's token log reproduces
//! the file exactly, syntax errors or not.

use camino::Utf8Path;
use miette::Result;
use sparrow_core::source_analysis::{ParseOptions, parse};
use tracing::debug;

use super::read_source;

pub fn run(path: &str, options: ParseOptions) -> Result<()> {
    let source = read_source(Utf8Path::new(path))?;
    let (file, errors) = parse(&source, options);
    let rebuilt = file.text();
    debug!(tokens = file.tokens().len(), errors = errors.len(), "rebuilt source");

    if let Some(offset) = first_difference(&source, &rebuilt) {
        miette::bail!(
            "'{}' does not round-trip: output differs from input at byte {}",
            path,
            offset
        );
    }
    println!(
        "{path}: ok ({} tokens, {} items, {} syntax errors)",
        file.tokens().len(),
        file.items().len(),
        errors.len()
    );
    Ok(())
}

/// The first byte offset where `a` and `b` differ, if any.
fn first_difference(a: &str, b: &str) -> Option<usize> {
    a.bytes()
        .zip(b.bytes())
        .position(|(x, y)| x != y)
        .or_else(|| (a.len() != b.len()).then(|| a.len().min(b.len())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_difference_finds_offsets() {
        assert_eq!(first_difference("abc", "abc"), None);
        assert_eq!(first_difference("abc", "abd"), Some(2));
        assert_eq!(first_difference("abc", "ab"), Some(2));
        assert_eq!(first_difference("", "x"), Some(0));
    }
}
