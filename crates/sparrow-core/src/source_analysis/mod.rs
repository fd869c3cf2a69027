// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Lexing, lookahead and recovery for Swift source code.
//!
//! # Lexical Analysis
//!
//! The [`Lexer`] turns source text into [`Lexeme`]s that borrow from the
//! input and carry their leading and trailing trivia. A [`LexemeCursor`] is a
//! `Copy` position in that stream, so forking it is free.
//!
//! ```
//! use sparrow_core::source_analysis::{RawTokenKind, lex};
//!
//! let tokens = lex("let x = 1");
//! assert_eq!(tokens.len(), 4);
//! assert_eq!(tokens[0].kind(), RawTokenKind::Keyword);
//! ```
//!
//! # Matching and Lookahead
//!
//! A [`TokenSpec`] says what the parser wants to see at the cursor: a raw
//! token kind or a keyword, where on the line it may appear, and how it
//! ranks for recovery ([`TokenPrecedence`]). Closed sets of specs implement
//! [`TokenSpecSet`].
//!
//! Anything that consumes lexemes implements [`TokenConsumer`]. The parser
//! does, and so does [`Lookahead`], a throwaway fork used to decide
//! ambiguous constructs before committing to them.
//!
//! # Error Recovery
//!
//! Skipping is bracket- and directive-aware: [`TokenConsumer::skip_single`]
//! consumes one balanced group. [`TokenConsumer::can_recover_to`] searches
//! ahead for an expected token without crossing anything that ranks at
//! least as high, and reports how many tokens it would have to skip.
//!
//! # Parsing
//!
//! [`parse`] builds a lossless [`SourceFile`](crate::ast::SourceFile) and a
//! list of [`ParseError`]s. It never fails.

mod consumer;
mod error;
mod lexer;
mod lookahead;
mod loop_progress;
mod parser;
mod recovery;
mod span;
mod token;
mod token_spec;
mod token_spec_set;

#[cfg(test)]
mod recovery_property_tests;

pub use consumer::{
    Recovered, RecoveryConsumptionHandle, TokenConsumer, TokenConsumptionHandle,
};
pub use error::{ParseError, ParseErrorKind};
pub use lexer::{LexemeCursor, Lexer, lex, lex_with_eof};
pub use lookahead::Lookahead;
pub use loop_progress::LoopProgressCondition;
pub use parser::{DEFAULT_MAX_NESTING_DEPTH, ParseOptions, parse};
pub use span::Span;
pub use token::{Keyword, Lexeme, Presence, RawTokenKind, Token, Trivia};
pub use token_spec::{KeywordMatch, LinePosition, TokenPrecedence, TokenSpec};
pub use token_spec_set::{
    AccessorObserverKeyword, CanBeStatementStart, CompilationCondition, ContextualDeclKeyword,
    DeclarationKeyword, DeclarationModifier, DeclarationStart, EffectSpecifiers,
    ExpressionModifierKeyword, ExpressionPrefixOperator, ExpressionStart, IfOrSwitch,
    MatchingPatternStart, Operator, OperatorLike, OperatorLikePunctuation, ParameterModifier,
    PrimaryExpressionStart, SwitchCaseStart, TokenSpecSet, TypeAttribute, TypeSpecifier,
};
