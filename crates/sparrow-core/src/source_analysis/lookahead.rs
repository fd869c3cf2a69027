// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Speculative lookahead over a forked cursor.
//!
//! A [`Lookahead`] session owns a copy of a [`LexemeCursor`] and counts the
//! tokens it consumes. Forking costs one lexeme copy; dropping the session
//! discards everything it did. A parent that wants to commit to what a
//! session found replays [`Lookahead::tokens_consumed`] tokens on its own
//! cursor.
//!
//! # Example
//!
//! ```
//! use sparrow_core::source_analysis::{LexemeCursor, Lookahead, TokenConsumer};
//!
//! let lookahead = Lookahead::new(LexemeCursor::new("{ willSet { } }"));
//! assert!(lookahead.is_start_of_get_set_accessor());
//! assert_eq!(lookahead.current_token().text(), "{");
//! ```

use super::{
    AccessorObserverKeyword, Keyword, Lexeme, LexemeCursor, RawTokenKind, TokenConsumer,
    TokenSpec, TokenSpecSet, TypeAttribute,
};
use super::loop_progress::LoopProgressCondition;

/// A speculative parsing session over a private cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lookahead<'src> {
    cursor: LexemeCursor<'src>,
    tokens_consumed: usize,
}

impl<'src> Lookahead<'src> {
    #[must_use]
    pub const fn new(cursor: LexemeCursor<'src>) -> Self {
        Self {
            cursor,
            tokens_consumed: 0,
        }
    }

    /// Tokens consumed since this session was forked.
    #[must_use]
    pub const fn tokens_consumed(&self) -> usize {
        self.tokens_consumed
    }

    /// Decides whether the `{` at the cursor opens an accessor block such as
    /// `{ willSet { } }` rather than a closure.
    ///
    /// Attributes before the accessor keyword are allowed: `{ @objc didSet }`.
    ///
    /// # Panics
    ///
    /// Panics if the current token is not `{`.
    #[must_use]
    pub fn is_start_of_get_set_accessor(&self) -> bool {
        assert!(
            self.at_kind(RawTokenKind::LeftBrace),
            "accessor block check requires the cursor at '{{'"
        );

        let next = self.peek();
        if AccessorObserverKeyword::from_lexeme(&next).is_some() {
            return true;
        }
        if !next.is_at(RawTokenKind::AtSign) {
            return false;
        }

        let mut lookahead = self.lookahead();
        lookahead.consume_any_token(); // {
        while lookahead.consume_if(TokenSpec::of(RawTokenKind::AtSign)).is_some() {
            if lookahead
                .consume_if(TokenSpec::of(RawTokenKind::Identifier))
                .is_none()
            {
                return false;
            }
            if lookahead.at_kind(RawTokenKind::LeftParen) {
                lookahead.skip_single();
            }
        }
        lookahead.at_any_in::<AccessorObserverKeyword>().is_some()
    }
}

impl<'src> TokenConsumer<'src> for Lookahead<'src> {
    type Token = Lexeme<'src>;

    fn current_token(&self) -> Lexeme<'src> {
        self.cursor.current()
    }

    fn peek(&self) -> Lexeme<'src> {
        self.cursor.peek()
    }

    fn consume_any_token(&mut self) -> Lexeme<'src> {
        self.tokens_consumed += 1;
        self.cursor.advance()
    }

    fn consume_any_token_remapping(&mut self, kind: RawTokenKind) -> Lexeme<'src> {
        self.consume_any_token().remapped(kind)
    }

    fn split_and_consume_prefix(&mut self, prefix_len: u32, kind: RawTokenKind) -> Lexeme<'src> {
        self.tokens_consumed += 1;
        self.cursor.split_current(prefix_len, kind)
    }

    fn missing_token(&mut self, spec: TokenSpec) -> Lexeme<'src> {
        let current = self.cursor.current();
        Lexeme::empty_at(spec.consumed_kind(), current.source(), current.text_start())
    }

    fn lookahead(&self) -> Lookahead<'src> {
        Self::new(self.cursor)
    }
}

/// Consumes a dotted attribute name with optional generic arguments:
/// `Foo.Bar<Int>`.
pub(crate) fn consume_attribute_name<'src, C>(consumer: &mut C)
where
    C: TokenConsumer<'src> + ?Sized,
{
    let name_specs = [
        TokenSpec::of(RawTokenKind::Identifier),
        TokenSpec::keyword(Keyword::Rethrows),
    ];
    loop {
        consumer.consume_if_any(&name_specs);
        consumer.consume_generic_arguments();
        if consumer
            .consume_if(TokenSpec::of(RawTokenKind::Period))
            .is_none()
        {
            break;
        }
    }
}

/// Leniently consumes `<...>`, splitting `>>` and `<<` as needed.
///
/// Returns `false` if the cursor is not at `<` or the list is cut short by a
/// token that cannot appear in a type.
pub(crate) fn consume_generic_arguments<'src, C>(consumer: &mut C) -> bool
where
    C: TokenConsumer<'src> + ?Sized,
{
    if !consumer.at_operator_prefix("<") {
        return false;
    }
    consumer.consume_prefix("<", RawTokenKind::LeftAngle);

    let mut depth = 1usize;
    let mut progress = LoopProgressCondition::new();
    while !consumer.at_eof() && progress.evaluate(consumer.current_token()) {
        if consumer.at_operator_prefix("<") {
            consumer.consume_prefix("<", RawTokenKind::LeftAngle);
            depth += 1;
        } else if consumer.at_operator_prefix(">") {
            consumer.consume_prefix(">", RawTokenKind::RightAngle);
            depth -= 1;
            if depth == 0 {
                return true;
            }
        } else {
            match consumer.current_token().kind() {
                RawTokenKind::LeftParen | RawTokenKind::LeftSquare => consumer.skip_single(),
                RawTokenKind::Identifier
                | RawTokenKind::Keyword
                | RawTokenKind::Wildcard
                | RawTokenKind::IntegerLiteral
                | RawTokenKind::Period
                | RawTokenKind::Comma
                | RawTokenKind::Colon
                | RawTokenKind::Arrow
                | RawTokenKind::ExclamationMark
                | RawTokenKind::PostfixQuestionMark => {
                    consumer.consume_any_token();
                }
                _ => return false,
            }
        }
    }
    false
}

/// Consumes the attribute after an `@` in type position.
///
/// Known type attributes are consumed with their argument list, as in
/// `@convention(c)`. Anything else is consumed as a custom attribute name
/// with an optional argument list, which must touch the name: in
/// `@escaping (Int) -> Void` the group is the function type.
pub(crate) fn skip_type_attribute<'src, C>(consumer: &mut C)
where
    C: TokenConsumer<'src> + ?Sized,
{
    if let Some((_, handle)) = consumer.at_any_in::<TypeAttribute>() {
        consumer.eat(handle);
    } else {
        consume_attribute_name(consumer);
    }
    if consumer.at_kind(RawTokenKind::LeftParen) && !consumer.current_token().has_preceding_trivia()
    {
        consumer.skip_single();
    }
}
