// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Error types for the parser.
//!
//! Errors carry source locations ([`Span`]) and integrate with [`miette`].
//! The parser never stops at an error: it records one and recovers, so a
//! parse yields a tree and a list of these.

// Spurious warnings from miette derive macro expansion
#![allow(unused_assignments)]

use ecow::EcoString;
use miette::Diagnostic;
use thiserror::Error;

use super::Span;

/// A syntax error found while parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("{kind}")]
#[diagnostic()]
pub struct ParseError {
    #[source]
    pub kind: ParseErrorKind,
    #[label("here")]
    pub span: Span,
}

impl ParseError {
    #[must_use]
    pub fn new(kind: ParseErrorKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// An expected token was not found; `span` is the empty span where it
    /// belongs.
    #[must_use]
    pub fn expected(expected: impl Into<EcoString>, span: Span) -> Self {
        Self::new(
            ParseErrorKind::ExpectedToken {
                expected: expected.into(),
            },
            span,
        )
    }

    /// Tokens were skipped because nothing could parse them.
    #[must_use]
    pub fn unexpected(text: impl Into<EcoString>, span: Span) -> Self {
        Self::new(ParseErrorKind::UnexpectedTokens { text: text.into() }, span)
    }

    #[must_use]
    pub fn nesting_too_deep(limit: usize, span: Span) -> Self {
        Self::new(ParseErrorKind::NestingTooDeep { limit }, span)
    }

    #[must_use]
    pub fn misplaced_directive(span: Span) -> Self {
        Self::new(ParseErrorKind::MisplacedDirective, span)
    }

    #[must_use]
    pub const fn span(&self) -> Span {
        self.span
    }
}

/// The kind of syntax error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("expected {expected}")]
    ExpectedToken { expected: EcoString },

    #[error("unexpected code '{text}'")]
    UnexpectedTokens { text: EcoString },

    /// Types nested deeper than the configured limit.
    #[error("nesting exceeds the limit of {limit} levels")]
    NestingTooDeep { limit: usize },

    /// `#else`, `#elseif` or `#endif` with no open `#if`.
    #[error("conditional compilation directive without a matching '#if'")]
    MisplacedDirective,
}

impl ParseErrorKind {
    /// A stable snake-case name for tooling output.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ExpectedToken { .. } => "expected_token",
            Self::UnexpectedTokens { .. } => "unexpected_tokens",
            Self::NestingTooDeep { .. } => "nesting_too_deep",
            Self::MisplacedDirective => "misplaced_directive",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_display() {
        let err = ParseError::expected("')'", Span::new(4, 4));
        assert_eq!(err.to_string(), "expected ')'");

        let err = ParseError::unexpected("} }", Span::new(0, 3));
        assert_eq!(err.to_string(), "unexpected code '} }'");

        let err = ParseError::nesting_too_deep(64, Span::new(0, 1));
        assert_eq!(err.to_string(), "nesting exceeds the limit of 64 levels");
    }

    #[test]
    fn parse_error_span() {
        let err = ParseError::misplaced_directive(Span::new(5, 11));
        assert_eq!(err.span().start(), 5);
        assert_eq!(err.span().end(), 11);
        assert_eq!(err.kind.name(), "misplaced_directive");
    }
}
