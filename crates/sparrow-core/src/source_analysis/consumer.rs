// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! The token consumption interface shared by lookahead and parsing.
//!
//! [`TokenConsumer`] is implemented by both [`Lookahead`], which only moves a
//! copied cursor, and the parser, which records every token it consumes.
//! A handful of primitives are required; everything else (matching,
//! conditional consumption, skipping, recovery) is provided on top of them.
//! Disambiguation routines written against the trait therefore behave
//! identically whether they run speculatively or for real.

use super::lookahead::Lookahead;
use super::recovery::{self, SkipState};
use super::{Lexeme, RawTokenKind, TokenSpec, TokenSpecSet};

/// Proof that the current token matched a spec.
///
/// Produced by [`TokenConsumer::at_any_in`] and consumed by
/// [`TokenConsumer::eat`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenConsumptionHandle {
    spec: TokenSpec,
}

impl TokenConsumptionHandle {
    pub(crate) const fn new(spec: TokenSpec) -> Self {
        Self { spec }
    }

    #[must_use]
    pub const fn spec(&self) -> TokenSpec {
        self.spec
    }
}

/// Proof that a token is reachable after skipping some unexpected tokens.
///
/// Produced by [`TokenConsumer::can_recover_to`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecoveryConsumptionHandle {
    unexpected_tokens: usize,
    handle: TokenConsumptionHandle,
}

impl RecoveryConsumptionHandle {
    pub(crate) const fn new(unexpected_tokens: usize, handle: TokenConsumptionHandle) -> Self {
        Self {
            unexpected_tokens,
            handle,
        }
    }

    /// How many tokens precede the target.
    #[must_use]
    pub const fn unexpected_tokens(&self) -> usize {
        self.unexpected_tokens
    }

    #[must_use]
    pub const fn spec(&self) -> TokenSpec {
        self.handle.spec
    }
}

/// A token reached by recovery, with the tokens skipped to get there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recovered<T> {
    pub unexpected: Vec<T>,
    pub token: T,
}

/// A cursor that can inspect and consume lexemes.
pub trait TokenConsumer<'src> {
    /// What consuming a lexeme produces.
    type Token;

    // ========================================================================
    // Required primitives
    // ========================================================================

    fn current_token(&self) -> Lexeme<'src>;

    /// The lexeme after the current one.
    fn peek(&self) -> Lexeme<'src>;

    /// Consumes the current lexeme as lexed.
    fn consume_any_token(&mut self) -> Self::Token;

    /// Consumes the current lexeme, reinterpreted as `kind`.
    fn consume_any_token_remapping(&mut self, kind: RawTokenKind) -> Self::Token;

    /// Splits `prefix_len` bytes off the current lexeme and consumes them as
    /// `kind`, leaving the remainder current.
    fn split_and_consume_prefix(&mut self, prefix_len: u32, kind: RawTokenKind) -> Self::Token;

    /// Signals that `spec` was expected at the current position and was not
    /// found. Returns a placeholder.
    fn missing_token(&mut self, spec: TokenSpec) -> Self::Token;

    /// Forks an independent lookahead session at the current position.
    fn lookahead(&self) -> Lookahead<'src>;

    // ========================================================================
    // Queries
    // ========================================================================

    fn at(&self, spec: TokenSpec) -> bool {
        spec.matches(&self.current_token())
    }

    fn at_kind(&self, kind: RawTokenKind) -> bool {
        self.current_token().is_at(kind)
    }

    fn at_any(&self, specs: &[TokenSpec]) -> bool {
        let current = self.current_token();
        specs.iter().any(|spec| spec.matches(&current))
    }

    fn at_eof(&self) -> bool {
        self.current_token().is_eof()
    }

    fn at_start_of_line(&self) -> bool {
        self.current_token().is_at_start_of_line()
    }

    /// Classifies the current lexeme against `S`.
    fn at_any_in<S: TokenSpecSet>(&self) -> Option<(S, TokenConsumptionHandle)> {
        S::from_lexeme(&self.current_token())
            .map(|case| (case, TokenConsumptionHandle::new(case.spec())))
    }

    /// Returns `true` if the current lexeme is an operator spelled with
    /// `prefix` first.
    fn at_operator_prefix(&self, prefix: &str) -> bool {
        let current = self.current_token();
        current.kind().is_operator() && current.text().starts_with(prefix)
    }

    // ========================================================================
    // Consumption
    // ========================================================================

    /// Consumes the current lexeme the way `spec` says, without checking it.
    fn consume_with_spec(&mut self, spec: TokenSpec) -> Self::Token {
        match spec.remapping() {
            Some(kind) => self.consume_any_token_remapping(kind),
            None => self.consume_any_token(),
        }
    }

    /// Consumes the token a handle was issued for.
    ///
    /// # Panics
    ///
    /// Panics if the cursor moved since the handle was issued and the current
    /// lexeme no longer matches.
    fn eat(&mut self, handle: TokenConsumptionHandle) -> Self::Token {
        assert!(
            self.at(handle.spec),
            "eat: expected {} but found {:?}",
            handle.spec,
            self.current_token().text()
        );
        self.consume_with_spec(handle.spec)
    }

    fn consume_if(&mut self, spec: TokenSpec) -> Option<Self::Token> {
        if self.at(spec) {
            Some(self.consume_with_spec(spec))
        } else {
            None
        }
    }

    fn consume_if_any(&mut self, specs: &[TokenSpec]) -> Option<Self::Token> {
        let current = self.current_token();
        let spec = specs.iter().copied().find(|spec| spec.matches(&current))?;
        Some(self.consume_with_spec(spec))
    }

    /// Consumes `spec` if present, otherwise reports it missing.
    fn expect(&mut self, spec: TokenSpec) -> Self::Token {
        match self.consume_if(spec) {
            Some(token) => token,
            None => self.missing_token(spec),
        }
    }

    /// Consumes `prefix` from the front of the current lexeme as `kind`.
    ///
    /// # Panics
    ///
    /// Panics if the current lexeme's text does not start with `prefix`.
    fn consume_prefix(&mut self, prefix: &str, kind: RawTokenKind) -> Self::Token {
        let text = self.current_token().text();
        if text == prefix {
            return self.consume_any_token_remapping(kind);
        }
        assert!(
            !prefix.is_empty() && text.starts_with(prefix),
            "consume_prefix: {text:?} does not start with {prefix:?}"
        );
        #[expect(
            clippy::cast_possible_truncation,
            reason = "source files over 4GB are not supported"
        )]
        let prefix_len = prefix.len() as u32;
        self.split_and_consume_prefix(prefix_len, kind)
    }

    // ========================================================================
    // Lookahead and recovery
    // ========================================================================

    /// Runs `body` against a forked session; the fork is dropped afterwards.
    fn with_lookahead<T>(&self, body: impl FnOnce(&mut Lookahead<'src>) -> T) -> T {
        let mut lookahead = self.lookahead();
        body(&mut lookahead)
    }

    /// Checks, without moving, whether `spec` can be reached by skipping
    /// lower-precedence tokens.
    fn can_recover_to(&self, spec: TokenSpec) -> Option<RecoveryConsumptionHandle> {
        let mut lookahead = self.lookahead();
        recovery::can_recover_to(&mut lookahead, spec)
    }

    /// Replays a successful recovery scan on this cursor.
    fn eat_recovering(&mut self, handle: RecoveryConsumptionHandle) -> Recovered<Self::Token> {
        let unexpected = (0..handle.unexpected_tokens)
            .map(|_| self.consume_any_token())
            .collect();
        let token = self.eat(handle.handle);
        Recovered { unexpected, token }
    }

    /// Consumes up to and including `spec` if it is reachable; otherwise
    /// leaves the cursor untouched and returns `None`.
    fn consume_to(&mut self, spec: TokenSpec) -> Option<Recovered<Self::Token>> {
        if let Some(token) = self.consume_if(spec) {
            return Some(Recovered {
                unexpected: Vec::new(),
                token,
            });
        }
        let handle = self.can_recover_to(spec)?;
        Some(self.eat_recovering(handle))
    }

    /// Skips one token, or one balanced bracket or directive group.
    ///
    /// Does nothing at end of file.
    fn skip_single(&mut self) {
        recovery::skip(self, SkipState::SkipSingle);
    }

    /// Skips tokens until `t1`, `t2`, a directive keyword other than `#if`,
    /// or end of file.
    fn skip_until(&mut self, t1: TokenSpec, t2: TokenSpec) {
        recovery::skip(self, SkipState::SkipUntil(t1, t2));
    }

    /// Skips to the first token on the next line, keeping groups balanced.
    fn skip_until_end_of_line(&mut self) {
        recovery::skip_until_end_of_line(self);
    }

    /// Consumes a run of `@Name(...)` attributes. Returns `false` if the
    /// current token is not `@`.
    fn consume_attribute_list(&mut self) -> bool {
        recovery::consume_attribute_list(self)
    }

    /// Consumes an `#if` block whose clauses contain only attributes.
    ///
    /// All or nothing: returns `false` without moving if any clause holds
    /// anything else.
    fn consume_if_config_of_attributes(&mut self) -> bool {
        recovery::consume_if_config_of_attributes(self)
    }

    /// Leniently consumes a `<...>` generic argument list.
    fn consume_generic_arguments(&mut self) -> bool {
        super::lookahead::consume_generic_arguments(self)
    }

    /// Consumes the attribute name after an `@` in type position.
    fn skip_type_attribute(&mut self) {
        super::lookahead::skip_type_attribute(self);
    }
}
