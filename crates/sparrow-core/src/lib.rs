// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Sparrow parser core.
//!
//! This crate contains the front half of a Swift parser:
//! - Lexical analysis with full trivia
//! - Token matching, speculative lookahead and bracket-aware skipping
//! - Precedence-bounded error recovery
//! - A lossless syntax tree for the constructs that need lookahead
//!
//! The parser always produces a tree. Errors are collected, never thrown.

pub mod ast;
pub mod source_analysis;
