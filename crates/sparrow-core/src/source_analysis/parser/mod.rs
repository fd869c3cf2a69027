// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Recovering parser for a Swift subset.
//!
//! The parser is a [`TokenConsumer`] whose consumed tokens are appended to a
//! token log. Lookahead forks a [`Lookahead`](super::Lookahead) off the
//! parser's cursor, so any disambiguation routine can run speculatively and
//! then be replayed for real.
//!
//! # Design Philosophy
//!
//! - **Error recovery is mandatory** - the parser always produces a tree
//! - **Lossless** - every consumed token, skipped or not, lands in the log
//! - **Precedence-bounded skipping** - recovery never crosses a token that
//!   ranks at least as high as the one it is looking for
//!
//! # Usage
//!
//! ```
//! use sparrow_core::source_analysis::{ParseOptions, parse};
//!
//! let (file, errors) = parse("let x: Array<Int> = []\n", ParseOptions::default());
//! assert!(errors.is_empty());
//! assert_eq!(file.items().len(), 1);
//! ```

use ecow::EcoString;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::{
    CanBeStatementStart, DeclarationKeyword, DeclarationModifier, DeclarationStart,
    ExpressionStart, Lexeme, LexemeCursor, Lookahead, LoopProgressCondition, ParseError,
    RawTokenKind, Span, Token, TokenConsumer, TokenSpec,
};
use crate::ast::{Item, SourceFile, Statement, TokenId, TokenRange, tokens_text};

mod declarations;
mod types;


/// Default limit for nested types and member blocks.
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 64;

/// Parser configuration.
///
/// ```
/// use sparrow_core::source_analysis::ParseOptions;
///
/// let options: ParseOptions = serde_json::from_str(r#"{"max_nesting_depth": 8}"#).unwrap();
/// assert_eq!(options, ParseOptions::default().with_max_nesting_depth(8));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// How deeply types and member blocks may nest before the rest of the
    /// construct is skipped.
    pub max_nesting_depth: usize,
    /// Accept `#if` blocks that contain only attributes as a single item.
    pub recover_attribute_directives: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
            recover_attribute_directives: true,
        }
    }
}

impl ParseOptions {
    #[must_use]
    pub const fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth;
        self
    }

    #[must_use]
    pub const fn with_attribute_directive_recovery(mut self, enabled: bool) -> Self {
        self.recover_attribute_directives = enabled;
        self
    }
}

/// Parses `source` into a [`SourceFile`].
///
/// Always returns a tree; syntax errors are returned alongside it. The
/// tree's token log reproduces `source` exactly.
#[must_use]
pub fn parse(source: &str, options: ParseOptions) -> (SourceFile, Vec<ParseError>) {
    let mut parser = Parser::new(source, options);
    let items = parser.parse_source_file();
    let eof = parser.consume_any_token();
    debug!(
        tokens = parser.tokens.len(),
        items = items.len(),
        errors = parser.errors.len(),
        "parsed source file"
    );
    (SourceFile::new(parser.tokens, items, eof), parser.errors)
}

/// The parser state.
pub(super) struct Parser<'src> {
    cursor: LexemeCursor<'src>,
    /// Every token consumed so far, including placeholders.
    tokens: Vec<Token>,
    errors: Vec<ParseError>,
    options: ParseOptions,
    nesting_depth: usize,
    /// The end-of-file token, once consumed.
    eof: Option<TokenId>,
}

impl<'src> Parser<'src> {
    fn new(source: &'src str, options: ParseOptions) -> Self {
        Self {
            cursor: LexemeCursor::new(source),
            tokens: Vec::new(),
            errors: Vec::new(),
            options,
            nesting_depth: 0,
            eof: None,
        }
    }

    // ========================================================================
    // Token Log
    // ========================================================================

    /// The id the next consumed token will get.
    fn next_id(&self) -> TokenId {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "source files over 4GB are not supported"
        )]
        TokenId::new(self.tokens.len() as u32)
    }

    /// The tokens consumed since `start`.
    fn range_from(&self, start: TokenId) -> TokenRange {
        TokenRange::new(start, self.next_id())
    }

    fn record(&mut self, lexeme: Lexeme<'src>, kind: RawTokenKind) -> TokenId {
        if lexeme.is_eof() {
            if let Some(eof) = self.eof {
                return eof;
            }
        }
        let id = self.next_id();
        self.tokens.push(Token::from_lexeme(&lexeme, kind));
        if lexeme.is_eof() {
            self.eof = Some(id);
        }
        id
    }

    /// Records an expected-token error and a zero-width placeholder.
    fn missing(&mut self, kind: RawTokenKind, expected: impl Into<EcoString>) -> TokenId {
        let offset = self.cursor.current().text_start();
        self.errors
            .push(ParseError::expected(expected, Span::empty_at(offset)));
        let id = self.next_id();
        self.tokens.push(Token::missing(kind, offset));
        id
    }

    fn span_of(&self, range: TokenRange) -> Span {
        let tokens = &self.tokens[range.start.index()..range.end.index()];
        match (tokens.first(), tokens.last()) {
            (Some(first), Some(last)) => first.span().merge(last.span()),
            _ => Span::empty_at(self.cursor.current().text_start()),
        }
    }

    /// Records an error for tokens that were skipped.
    fn report_unexpected(&mut self, range: TokenRange) {
        if range.is_empty() {
            return;
        }
        let tokens = &self.tokens[range.start.index()..range.end.index()];
        let text = tokens_text(tokens);
        let span = self.span_of(range);
        self.errors.push(ParseError::unexpected(text, span));
    }

    // ========================================================================
    // Nesting
    // ========================================================================

    /// Increments the nesting depth. Returns `false`, after reporting an
    /// error, if that exceeds the limit; otherwise pair with
    /// [`Self::leave_nesting`].
    fn enter_nesting(&mut self) -> bool {
        self.nesting_depth += 1;
        if self.nesting_depth > self.options.max_nesting_depth {
            self.nesting_depth -= 1;
            let limit = self.options.max_nesting_depth;
            let span = self.cursor.current().span();
            debug!(limit, offset = span.start(), "nesting limit reached");
            self.errors.push(ParseError::nesting_too_deep(limit, span));
            return false;
        }
        true
    }

    fn leave_nesting(&mut self) {
        debug_assert!(
            self.nesting_depth > 0,
            "leave_nesting called without matching enter_nesting"
        );
        self.nesting_depth = self.nesting_depth.saturating_sub(1);
    }

    // ========================================================================
    // Items
    // ========================================================================

    fn parse_source_file(&mut self) -> Vec<Item> {
        let mut items = self.parse_items(false);
        if !self.at_eof() {
            let start = self.next_id();
            while !self.at_eof() {
                self.consume_any_token();
            }
            let range = self.range_from(start);
            self.report_unexpected(range);
            items.push(Item::Unexpected(range));
        }
        items
    }

    /// Parses items until end of file, or until `}` inside a member block.
    fn parse_items(&mut self, in_member_block: bool) -> Vec<Item> {
        let mut items = Vec::new();
        let mut progress = LoopProgressCondition::new();
        while !self.at_eof()
            && !(in_member_block && self.at_kind(RawTokenKind::RightBrace))
            && progress.evaluate(self.current_token())
        {
            items.push(self.parse_item());
        }
        items
    }

    /// Parses one item. Always consumes at least one token.
    fn parse_item(&mut self) -> Item {
        let start = self.next_id();
        match self.current_token().kind() {
            RawTokenKind::PoundIf => return self.parse_if_config(start),
            RawTokenKind::PoundElse | RawTokenKind::PoundElseif | RawTokenKind::PoundEndif => {
                let directive = self.consume_any_token();
                let span = self.tokens[directive.index()].span();
                self.errors.push(ParseError::misplaced_directive(span));
                return Item::MisplacedDirective(directive);
            }
            _ => {}
        }

        if self.is_start_of_declaration() {
            return self.parse_declaration();
        }

        if let Some((_, handle)) = self.at_any_in::<CanBeStatementStart>() {
            let keyword = self.eat(handle);
            self.skip_line();
            return Item::Statement(Statement {
                keyword: Some(keyword),
                tokens: self.range_from(start),
            });
        }

        if self.at_any_in::<ExpressionStart>().is_some() {
            self.skip_group();
            self.skip_line();
            return Item::Statement(Statement {
                keyword: None,
                tokens: self.range_from(start),
            });
        }

        self.parse_unexpected(start)
    }

    /// `#if` blocks holding only attributes become one item when recovery is
    /// enabled; any other `#if` block is skipped as a group.
    fn parse_if_config(&mut self, start: TokenId) -> Item {
        if self.options.recover_attribute_directives && self.consume_if_config_of_attributes() {
            trace!(start = start.index(), "accepted attribute-only directive block");
            return Item::AttributeDirective(self.range_from(start));
        }
        self.skip_group();
        Item::IfConfig(self.range_from(start))
    }

    /// Skips the rest of the line, stopping early at `}` or a declaration.
    fn parse_unexpected(&mut self, start: TokenId) -> Item {
        self.skip_group();
        let mut progress = LoopProgressCondition::new();
        while !self.at_eof()
            && !self.at_start_of_line()
            && !self.at_kind(RawTokenKind::RightBrace)
            && self.at_any_in::<DeclarationKeyword>().is_none()
            && progress.evaluate(self.current_token())
        {
            self.skip_group();
        }
        let range = self.range_from(start);
        self.report_unexpected(range);
        Item::Unexpected(range)
    }

    /// Decides, on a fork, whether attributes and modifiers at the cursor
    /// lead to a declaration keyword.
    fn is_start_of_declaration(&self) -> bool {
        if !self.at_kind(RawTokenKind::AtSign) && self.at_any_in::<DeclarationStart>().is_none() {
            return false;
        }
        self.with_lookahead(|lookahead| {
            lookahead.consume_attribute_list();
            let mut progress = LoopProgressCondition::new();
            while progress.evaluate(lookahead.current_token()) {
                let Some((_, handle)) = lookahead.at_any_in::<DeclarationModifier>() else {
                    break;
                };
                lookahead.eat(handle);
                if lookahead.at_kind(RawTokenKind::LeftParen) {
                    lookahead.skip_single();
                }
            }
            lookahead.at_any_in::<DeclarationKeyword>().is_some()
        })
    }

    // ========================================================================
    // Checked skipping
    // ========================================================================

    /// Like [`TokenConsumer::skip_single`], except that a group that ends
    /// without its closer gets an expected-token error and a placeholder
    /// closer.
    fn skip_group(&mut self) {
        let closer = match self.current_token().kind() {
            RawTokenKind::LeftParen => RawTokenKind::RightParen,
            RawTokenKind::LeftSquare => RawTokenKind::RightSquare,
            RawTokenKind::LeftBrace => RawTokenKind::RightBrace,
            RawTokenKind::PoundIf => {
                self.skip_directive_group();
                return;
            }
            _ => {
                self.skip_single();
                return;
            }
        };
        self.consume_any_token();
        let closer = TokenSpec::of(closer);
        self.skip_until(closer, TokenSpec::of(RawTokenKind::RightBrace));
        self.expect(closer);
    }

    /// Skips an `#if` block clause by clause and expects its `#endif`.
    fn skip_directive_group(&mut self) {
        let clauses = [
            TokenSpec::of(RawTokenKind::PoundElse),
            TokenSpec::of(RawTokenKind::PoundElseif),
        ];
        self.consume_any_token();
        let mut progress = LoopProgressCondition::new();
        loop {
            self.skip_until(clauses[0], clauses[1]);
            if !self.at_any(&clauses) || !progress.evaluate(self.current_token()) {
                break;
            }
            self.consume_any_token();
        }
        self.expect(TokenSpec::of(RawTokenKind::PoundEndif));
    }

    /// Skips to the first token of the next line, one [`Self::skip_group`]
    /// at a time.
    fn skip_line(&mut self) {
        let mut progress = LoopProgressCondition::new();
        while !self.at_eof()
            && !self.at_start_of_line()
            && progress.evaluate(self.current_token())
        {
            self.skip_group();
        }
    }

    /// The closing `}` of a block, skipping anything before it.
    ///
    /// Tries precedence-bounded recovery first; if that fails, skips
    /// balanced groups up to the next `}` and expects it there.
    fn recover_to_closing_brace(&mut self) -> (TokenRange, TokenId) {
        let right_brace_spec = TokenSpec::of(RawTokenKind::RightBrace);
        let start = self.next_id();
        let right_brace = if let Some(recovered) = self.consume_to(right_brace_spec) {
            recovered.token
        } else {
            self.skip_until(right_brace_spec, right_brace_spec);
            self.expect(right_brace_spec)
        };
        let unexpected = TokenRange::new(start, right_brace);
        self.report_unexpected(unexpected);
        (unexpected, right_brace)
    }
}

impl<'src> TokenConsumer<'src> for Parser<'src> {
    type Token = TokenId;

    fn current_token(&self) -> Lexeme<'src> {
        self.cursor.current()
    }

    fn peek(&self) -> Lexeme<'src> {
        self.cursor.peek()
    }

    fn consume_any_token(&mut self) -> TokenId {
        let lexeme = self.cursor.advance();
        self.record(lexeme, lexeme.kind())
    }

    fn consume_any_token_remapping(&mut self, kind: RawTokenKind) -> TokenId {
        let lexeme = self.cursor.advance();
        self.record(lexeme, kind)
    }

    fn split_and_consume_prefix(&mut self, prefix_len: u32, kind: RawTokenKind) -> TokenId {
        let prefix = self.cursor.split_current(prefix_len, kind);
        self.record(prefix, kind)
    }

    fn missing_token(&mut self, spec: TokenSpec) -> TokenId {
        self.missing(spec.consumed_kind(), spec.to_string())
    }

    fn lookahead(&self) -> Lookahead<'src> {
        Lookahead::new(self.cursor)
    }
}
