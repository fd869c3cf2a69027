// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for parser crash safety testing.
//!
//! Feeds arbitrary byte sequences to the parser and asserts that it never
//! panics, always terminates, and always reproduces its input from the token
//! log.
//!
//! # Success Criteria
//!
//! - No panics on any input, including deep nesting and unbalanced brackets
//! - `SourceFile::text()` equals the input
//! - Every error span lies inside the input

#![no_main]

use libfuzzer_sys::fuzz_target;
use sparrow_core::source_analysis::{ParseOptions, parse};

fuzz_target!(|data: &[u8]| {
    // Only test valid UTF-8 (the lexer works on `&str`)
    if let Ok(source) = std::str::from_utf8(data) {
        let (file, errors) = parse(source, ParseOptions::default());
        assert_eq!(file.text(), source, "token log must reproduce the input");

        let len = u32::try_from(source.len()).unwrap_or(u32::MAX);
        for error in &errors {
            assert!(error.span().end() <= len, "{error} is outside the input");
        }
    }
});
