// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Lexical analysis for Swift-like source code.
//!
//! The lexer is hand-written and position-addressable: [`Lexer::lex_at`]
//! produces the lexeme starting at any byte offset that a previous lexeme
//! ended at, and always produces the same lexeme for the same offset. That
//! property is what lets [`LexemeCursor`] be a plain `Copy` value.
//!
//! # Design Principles
//!
//! - **Error recovery**: never panic on malformed input; emit
//!   [`RawTokenKind::Unknown`] and keep going
//! - **Trivia preservation**: whitespace and comments are attached to
//!   lexemes so the source can be reconstructed byte for byte
//! - **Operator boundness**: an operator is prefix, postfix or binary
//!   depending on the whitespace around it
//!
//! # Example
//!
//! ```
//! use sparrow_core::source_analysis::{Lexer, RawTokenKind};
//!
//! let kinds: Vec<_> = Lexer::new("x! + y").map(|lexeme| lexeme.kind()).collect();
//! assert_eq!(
//!     kinds,
//!     [
//!         RawTokenKind::Identifier,
//!         RawTokenKind::ExclamationMark,
//!         RawTokenKind::BinaryOperator,
//!         RawTokenKind::Identifier,
//!     ]
//! );
//! ```

use std::iter::Peekable;
use std::str::CharIndices;

use ecow::EcoString;

use super::{Keyword, Lexeme, RawTokenKind, Token, Trivia};

/// Which side of a lexeme trivia is being collected for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TriviaSide {
    /// Everything up to the next token, newlines and block comments included.
    Leading,
    /// Same-line whitespace, ending after a line comment.
    Trailing,
}

/// A lexer over Swift-like source code.
///
/// The lexer implements [`Iterator`], yielding every lexeme except the final
/// end-of-file lexeme. Use [`lex_with_eof`] when trailing trivia at the end
/// of the file matters.
pub struct Lexer<'src> {
    /// The full source text.
    source: &'src str,
    /// Character iterator over `source[base..]`.
    chars: Peekable<CharIndices<'src>>,
    /// Byte offset the character iterator started at.
    base: usize,
    /// Current byte position in `source`.
    position: usize,
    finished: bool,
}

impl std::fmt::Debug for Lexer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lexer")
            .field("position", &self.position)
            .field("remaining", &self.source.get(self.position..).unwrap_or(""))
            .finish()
    }
}

impl<'src> Lexer<'src> {
    /// Creates a new lexer for the given source text.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self::starting_at(source, 0)
    }

    fn starting_at(source: &'src str, offset: usize) -> Self {
        let offset = offset.min(source.len());
        let rest = source.get(offset..).unwrap_or("");
        Self {
            source,
            chars: rest.char_indices().peekable(),
            base: offset,
            position: offset,
            finished: false,
        }
    }

    /// Lexes the single lexeme whose leading trivia starts at `offset`.
    ///
    /// `offset` is expected to be `0` or the [`Lexeme::end`] of a previous
    /// lexeme from the same source. The result depends only on `source` and
    /// `offset`.
    #[must_use]
    pub fn lex_at(source: &'src str, offset: u32) -> Lexeme<'src> {
        Self::starting_at(source, offset as usize).next_lexeme()
    }

    /// Splits `len` bytes of trivia starting at `start` into pieces.
    pub(crate) fn trivia_pieces(source: &'src str, start: u32, len: u32) -> Vec<Trivia> {
        let mut pieces = Vec::new();
        if len == 0 {
            return pieces;
        }
        let bounded = source.get(..(start + len) as usize).unwrap_or(source);
        Self::starting_at(bounded, start as usize)
            .skip_trivia(TriviaSide::Leading, Some(&mut pieces));
        pieces
    }

    // ========================================================================
    // Character Management
    // ========================================================================

    /// Peeks at the next character without consuming it.
    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    /// Peeks `n+1` characters ahead without consuming (n=0 is same as `peek_char`).
    fn peek_char_n(&self, n: usize) -> Option<char> {
        self.chars.clone().nth(n).map(|(_, c)| c)
    }

    /// Consumes the next character and returns it.
    fn advance(&mut self) -> Option<char> {
        let (pos, c) = self.chars.next()?;
        self.position = self.base + pos + c.len_utf8();
        Some(c)
    }

    /// Consumes characters while the predicate is true.
    fn advance_while(&mut self, predicate: impl Fn(char) -> bool) {
        while self.peek_char().is_some_and(&predicate) {
            self.advance();
        }
    }

    /// Returns the current byte position.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "source files over 4GB are not supported"
    )]
    fn current_position(&self) -> u32 {
        self.position as u32
    }

    // ========================================================================
    // Trivia
    // ========================================================================

    /// Skips trivia for one side of a lexeme, optionally collecting pieces.
    ///
    /// Returns `true` if a newline was skipped.
    fn skip_trivia(&mut self, side: TriviaSide, mut pieces: Option<&mut Vec<Trivia>>) -> bool {
        let leading = side == TriviaSide::Leading;
        let mut saw_newline = false;
        loop {
            let start = self.position;
            let make: fn(EcoString) -> Trivia = match self.peek_char() {
                Some(c) if is_horizontal_space(c) || (leading && is_newline(c)) => {
                    self.advance_while(|c| is_horizontal_space(c) || (leading && is_newline(c)));
                    Trivia::Whitespace
                }
                Some('/')
                    if self.peek_char_n(1) == Some('/')
                        && self.peek_char_n(2) == Some('/')
                        && self.peek_char_n(3) != Some('/') =>
                {
                    self.advance_while(|c| !is_newline(c));
                    Trivia::DocComment
                }
                Some('/') if self.peek_char_n(1) == Some('/') => {
                    self.advance_while(|c| !is_newline(c));
                    Trivia::LineComment
                }
                Some('/') if leading && self.peek_char_n(1) == Some('*') => {
                    self.skip_block_comment();
                    Trivia::BlockComment
                }
                _ => break,
            };

            let text = &self.source[start..self.position];
            saw_newline |= text.contains(is_newline);
            let piece = make(EcoString::from(text));
            let ends_trailing = !leading && piece.is_comment();
            if let Some(pieces) = pieces.as_deref_mut() {
                pieces.push(piece);
            }
            if ends_trailing {
                break;
            }
        }
        saw_newline
    }

    /// Skips a block comment: `/* ... */`. Block comments nest.
    fn skip_block_comment(&mut self) {
        self.advance(); // /
        self.advance(); // *
        let mut depth = 1u32;
        while depth > 0 {
            match self.peek_char() {
                None => break, // Unterminated - recover gracefully
                Some('*') if self.peek_char_n(1) == Some('/') => {
                    self.advance();
                    self.advance();
                    depth -= 1;
                }
                Some('/') if self.peek_char_n(1) == Some('*') => {
                    self.advance();
                    self.advance();
                    depth += 1;
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    // ========================================================================
    // Lexemes
    // ========================================================================

    /// Lexes the next lexeme, including its leading and trailing trivia.
    fn next_lexeme(&mut self) -> Lexeme<'src> {
        let leading_start = self.current_position();
        let saw_newline = self.skip_trivia(TriviaSide::Leading, None);
        let text_start = self.current_position();

        let kind = match self.peek_char() {
            None => RawTokenKind::EndOfFile,
            Some(c) => self.lex_kind(c),
        };
        let text_end = self.current_position();

        if kind != RawTokenKind::EndOfFile {
            self.skip_trivia(TriviaSide::Trailing, None);
        }
        let end = self.current_position();

        Lexeme::new(
            kind,
            self.source,
            leading_start,
            text_start - leading_start,
            text_end - text_start,
            end - text_end,
            saw_newline || leading_start == 0,
        )
    }

    /// Lexes a lexeme kind based on its first character.
    fn lex_kind(&mut self, c: char) -> RawTokenKind {
        match c {
            c if is_identifier_start(c) => self.lex_identifier_or_keyword(),
            '0'..='9' => self.lex_number(),
            '"' => self.lex_string(),
            '`' => self.lex_backtick_identifier(),
            '$' => {
                self.advance();
                self.advance_while(is_identifier_continue);
                RawTokenKind::DollarIdentifier
            }
            '#' => self.lex_pound(),
            '.' if self.peek_char_n(1) == Some('.') => self.lex_operator(),
            c if is_operator_char(c) => self.lex_operator(),
            _ => {
                self.advance();
                match c {
                    '(' => RawTokenKind::LeftParen,
                    ')' => RawTokenKind::RightParen,
                    '{' => RawTokenKind::LeftBrace,
                    '}' => RawTokenKind::RightBrace,
                    '[' => RawTokenKind::LeftSquare,
                    ']' => RawTokenKind::RightSquare,
                    '.' => RawTokenKind::Period,
                    ',' => RawTokenKind::Comma,
                    ':' => RawTokenKind::Colon,
                    ';' => RawTokenKind::Semicolon,
                    '@' => RawTokenKind::AtSign,
                    '\\' => RawTokenKind::Backslash,
                    _ => RawTokenKind::Unknown,
                }
            }
        }
    }

    /// Lexes an identifier, a reserved keyword or `_`.
    fn lex_identifier_or_keyword(&mut self) -> RawTokenKind {
        let start = self.position;
        self.advance_while(is_identifier_continue);
        let text = &self.source[start..self.position];
        if text == "_" {
            RawTokenKind::Wildcard
        } else if Keyword::from_text(text).is_some_and(Keyword::is_reserved) {
            RawTokenKind::Keyword
        } else {
            RawTokenKind::Identifier
        }
    }

    /// Lexes an escaped identifier: `` `class` ``.
    fn lex_backtick_identifier(&mut self) -> RawTokenKind {
        self.advance(); // `
        if self.peek_char().is_some_and(is_identifier_start) {
            self.advance_while(is_identifier_continue);
            if self.peek_char() == Some('`') {
                self.advance();
                return RawTokenKind::Identifier;
            }
        }
        RawTokenKind::Unknown
    }

    /// Lexes an integer or floating-point literal.
    fn lex_number(&mut self) -> RawTokenKind {
        let first = self.advance();
        if first == Some('0') && matches!(self.peek_char(), Some('x' | 'o' | 'b')) {
            self.advance();
            self.advance_while(|c| c.is_ascii_hexdigit() || c == '_');
            return RawTokenKind::IntegerLiteral;
        }

        self.advance_while(|c| c.is_ascii_digit() || c == '_');
        let mut kind = RawTokenKind::IntegerLiteral;

        if self.peek_char() == Some('.') && self.peek_char_n(1).is_some_and(|c| c.is_ascii_digit())
        {
            self.advance(); // .
            self.advance_while(|c| c.is_ascii_digit() || c == '_');
            kind = RawTokenKind::FloatLiteral;
        }

        if matches!(self.peek_char(), Some('e' | 'E')) {
            let exponent_digit = match self.peek_char_n(1) {
                Some('+' | '-') => self.peek_char_n(2),
                other => other,
            };
            if exponent_digit.is_some_and(|c| c.is_ascii_digit()) {
                self.advance(); // e
                if matches!(self.peek_char(), Some('+' | '-')) {
                    self.advance();
                }
                self.advance_while(|c| c.is_ascii_digit());
                kind = RawTokenKind::FloatLiteral;
            }
        }
        kind
    }

    /// Lexes a string literal, including any `\( ... )` interpolations.
    ///
    /// Interpolations may contain nested strings; nesting is tracked on an
    /// explicit stack. An unterminated single-line string ends at the newline.
    fn lex_string(&mut self) -> RawTokenKind {
        if self.peek_char_n(1) == Some('"') && self.peek_char_n(2) == Some('"') {
            return self.lex_multiline_string();
        }

        enum Mode {
            Literal,
            Interpolation(u32),
        }

        self.advance(); // "
        let mut modes = vec![Mode::Literal];
        while let Some(mode) = modes.last_mut() {
            let Some(c) = self.peek_char() else { break };
            if is_newline(c) {
                break;
            }
            self.advance();
            match mode {
                Mode::Literal => match c {
                    '"' => {
                        modes.pop();
                    }
                    '\\' if self.peek_char() == Some('(') => {
                        self.advance();
                        modes.push(Mode::Interpolation(1));
                    }
                    '\\' => {
                        self.advance();
                    }
                    _ => {}
                },
                Mode::Interpolation(depth) => match c {
                    '(' => *depth += 1,
                    ')' if *depth == 1 => {
                        modes.pop();
                    }
                    ')' => *depth -= 1,
                    '"' => modes.push(Mode::Literal),
                    _ => {}
                },
            }
        }
        RawTokenKind::StringLiteral
    }

    /// Lexes a multi-line string literal: `"""` ... `"""`.
    fn lex_multiline_string(&mut self) -> RawTokenKind {
        for _ in 0..3 {
            self.advance();
        }
        loop {
            match self.peek_char() {
                None => break,
                Some('\\') => {
                    self.advance();
                    self.advance();
                }
                Some('"') if self.peek_char_n(1) == Some('"') && self.peek_char_n(2) == Some('"') => {
                    for _ in 0..3 {
                        self.advance();
                    }
                    break;
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
        RawTokenKind::StringLiteral
    }

    /// Lexes `#` or one of the conditional-compilation directives.
    fn lex_pound(&mut self) -> RawTokenKind {
        self.advance(); // #
        let rest = &self.source[self.position..];
        let word_len = rest
            .find(|c: char| !is_identifier_continue(c))
            .unwrap_or(rest.len());
        let kind = match &rest[..word_len] {
            "if" => RawTokenKind::PoundIf,
            "elseif" => RawTokenKind::PoundElseif,
            "else" => RawTokenKind::PoundElse,
            "endif" => RawTokenKind::PoundEndif,
            _ => return RawTokenKind::Pound,
        };
        for _ in 0..word_len {
            self.advance();
        }
        kind
    }

    /// Lexes an operator and classifies it by boundness.
    fn lex_operator(&mut self) -> RawTokenKind {
        let start = self.position;
        let dot_operator = self.peek_char() == Some('.');
        self.advance();
        loop {
            match self.peek_char() {
                // A comment start ends the operator.
                Some('/') if matches!(self.peek_char_n(1), Some('/' | '*')) => break,
                Some('.') if dot_operator => {
                    self.advance();
                }
                Some(c) if c != '.' && is_operator_char(c) => {
                    self.advance();
                }
                _ => break,
            }
        }
        let text = &self.source[start..self.position];
        classify_operator(
            text,
            is_left_bound(self.source, start),
            is_right_bound(self.source, self.position),
        )
    }

    /// Decides the kind of the remainder left behind when the prefix of an
    /// operator lexeme is split off. The remainder is always left-bound.
    fn classify_split_remainder(
        source: &str,
        start: usize,
        end: usize,
        original: RawTokenKind,
    ) -> RawTokenKind {
        let text = &source[start..end];
        if text.chars().all(is_operator_char) {
            classify_operator(text, true, is_right_bound(source, end))
        } else {
            original
        }
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Lexeme<'src>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let lexeme = self.next_lexeme();
        if lexeme.is_eof() {
            self.finished = true;
            return None;
        }
        Some(lexeme)
    }
}

/// Classifies operator text by whether it touches the tokens around it.
fn classify_operator(text: &str, left_bound: bool, right_bound: bool) -> RawTokenKind {
    match text {
        "=" => RawTokenKind::Equal,
        "->" => RawTokenKind::Arrow,
        "&" if !left_bound && right_bound => RawTokenKind::PrefixAmpersand,
        "!" if left_bound => RawTokenKind::ExclamationMark,
        "?" if left_bound => RawTokenKind::PostfixQuestionMark,
        "?" => RawTokenKind::InfixQuestionMark,
        _ => match (left_bound, right_bound) {
            (true, false) => RawTokenKind::PostfixOperator,
            (false, true) => RawTokenKind::PrefixOperator,
            _ => RawTokenKind::BinaryOperator,
        },
    }
}

fn is_left_bound(source: &str, start: usize) -> bool {
    let before = &source[..start];
    if before.ends_with("*/") {
        return false;
    }
    before
        .chars()
        .next_back()
        .is_some_and(|c| !(c.is_whitespace() || matches!(c, '(' | '[' | '{' | ',' | ';' | ':')))
}

fn is_right_bound(source: &str, end: usize) -> bool {
    let after = &source[end..];
    if after.starts_with("//") || after.starts_with("/*") {
        return false;
    }
    after
        .chars()
        .next()
        .is_some_and(|c| !(c.is_whitespace() || matches!(c, ')' | ']' | '}' | ',' | ';' | ':')))
}

fn is_identifier_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

fn is_identifier_continue(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

fn is_operator_char(c: char) -> bool {
    matches!(
        c,
        '/' | '=' | '-' | '+' | '!' | '*' | '%' | '<' | '>' | '&' | '|' | '^' | '~' | '?'
    )
}

const fn is_horizontal_space(c: char) -> bool {
    matches!(c, ' ' | '\t')
}

const fn is_newline(c: char) -> bool {
    matches!(c, '\n' | '\r')
}

/// A copyable position in the lexeme stream.
///
/// The cursor holds only the current lexeme; the next one is re-derived from
/// the source on demand. Copying a cursor therefore forks the stream, and
/// advancing one copy never affects another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexemeCursor<'src> {
    current: Lexeme<'src>,
}

impl<'src> LexemeCursor<'src> {
    /// Creates a cursor at the first lexeme of `source`.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self {
            current: Lexer::lex_at(source, 0),
        }
    }

    #[must_use]
    pub const fn current(&self) -> Lexeme<'src> {
        self.current
    }

    /// Returns the lexeme after the current one without moving.
    #[must_use]
    pub fn peek(&self) -> Lexeme<'src> {
        Lexer::lex_at(self.current.source(), self.current.end())
    }

    /// Moves to the next lexeme and returns the one moved past.
    ///
    /// At end of file the cursor stays put and keeps returning the
    /// end-of-file lexeme.
    pub fn advance(&mut self) -> Lexeme<'src> {
        let consumed = self.current;
        if !consumed.is_eof() {
            self.current = self.peek();
        }
        consumed
    }

    /// Splits the first `prefix_len` bytes off the current lexeme.
    ///
    /// The prefix, reinterpreted as `prefix_kind`, keeps the leading trivia
    /// and is returned. The remainder becomes the current lexeme and keeps the
    /// trailing trivia. Nothing is re-lexed.
    pub fn split_current(&mut self, prefix_len: u32, prefix_kind: RawTokenKind) -> Lexeme<'src> {
        let current = self.current;
        let source = current.source();
        let text = current.span();
        debug_assert!(
            prefix_len > 0 && prefix_len < text.len(),
            "split must leave a non-empty prefix and remainder"
        );

        let prefix = Lexeme::new(
            prefix_kind,
            source,
            current.full_span().start(),
            current.leading_trivia_len(),
            prefix_len,
            0,
            current.is_at_start_of_line(),
        );

        let remainder_start = text.start() + prefix_len;
        let remainder_kind = Lexer::classify_split_remainder(
            source,
            remainder_start as usize,
            text.end() as usize,
            current.kind(),
        );
        self.current = Lexeme::new(
            remainder_kind,
            source,
            remainder_start,
            0,
            text.end() - remainder_start,
            current.trailing_trivia_len(),
            false,
        );
        prefix
    }
}

/// Lexes the source into owned tokens, excluding the end-of-file token.
#[must_use]
pub fn lex(source: &str) -> Vec<Token> {
    Lexer::new(source)
        .map(|lexeme| Token::from_lexeme(&lexeme, lexeme.kind()))
        .collect()
}

/// Lexes the source into owned tokens, ending with the end-of-file token.
///
/// The end-of-file token carries any trivia at the end of the source, so the
/// concatenated full text of the result always equals `source`.
#[must_use]
pub fn lex_with_eof(source: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    loop {
        let lexeme = lexer.next_lexeme();
        tokens.push(Token::from_lexeme(&lexeme, lexeme.kind()));
        if lexeme.is_eof() {
            return tokens;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<RawTokenKind> {
        Lexer::new(source).map(|lexeme| lexeme.kind()).collect()
    }

    fn texts(source: &str) -> Vec<&str> {
        Lexer::new(source).map(|lexeme| lexeme.text()).collect()
    }

    #[test]
    fn lex_empty() {
        assert!(kinds("").is_empty());
        let eof = Lexer::lex_at("", 0);
        assert!(eof.is_eof());
        assert!(eof.is_at_start_of_line());
    }

    #[test]
    fn lex_identifiers_and_keywords() {
        use RawTokenKind::{Identifier, Keyword, Wildcard};
        assert_eq!(
            kinds("var willSet _ _const self"),
            [Keyword, Identifier, Wildcard, Identifier, Keyword]
        );
    }

    #[test]
    fn lex_backtick_identifier() {
        assert_eq!(kinds("`class`"), [RawTokenKind::Identifier]);
        assert_eq!(texts("`class`"), ["`class`"]);
        assert_eq!(kinds("`"), [RawTokenKind::Unknown]);
    }

    #[test]
    fn lex_dollar_identifier() {
        assert_eq!(kinds("$0 $foo"), [RawTokenKind::DollarIdentifier; 2]);
    }

    #[test]
    fn lex_numbers() {
        use RawTokenKind::{FloatLiteral, IntegerLiteral};
        assert_eq!(
            kinds("42 1_000 0xFF 3.14 1e10 2.5E-3"),
            [
                IntegerLiteral,
                IntegerLiteral,
                IntegerLiteral,
                FloatLiteral,
                FloatLiteral,
                FloatLiteral
            ]
        );
    }

    #[test]
    fn lex_member_access_on_integer_is_not_float() {
        use RawTokenKind::{Identifier, IntegerLiteral, Period};
        assert_eq!(kinds("1.description"), [IntegerLiteral, Period, Identifier]);
    }

    #[test]
    fn lex_strings_with_interpolation() {
        assert_eq!(
            texts(r#""a \(b("c)")) d" x"#),
            [r#""a \(b("c)")) d""#, "x"]
        );
        assert_eq!(texts(r#""esc \" q" y"#), [r#""esc \" q""#, "y"]);
    }

    #[test]
    fn lex_unterminated_string_stops_at_newline() {
        assert_eq!(texts("\"abc\nx"), ["\"abc", "x"]);
    }

    #[test]
    fn lex_multiline_string() {
        let source = "\"\"\"\nline \"one\"\n\"\"\" z";
        assert_eq!(texts(source), ["\"\"\"\nline \"one\"\n\"\"\"", "z"]);
    }

    #[test]
    fn lex_directives() {
        use RawTokenKind::{Identifier, Pound, PoundElse, PoundElseif, PoundEndif, PoundIf};
        assert_eq!(
            kinds("#if A\n#elseif B\n#else\n#endif\n#line"),
            [PoundIf, Identifier, PoundElseif, Identifier, PoundElse, PoundEndif, Pound, Identifier]
        );
    }

    #[test]
    fn lex_operator_boundness() {
        use RawTokenKind::{BinaryOperator, Identifier, PostfixOperator, PrefixOperator};
        assert_eq!(kinds("a + b"), [Identifier, BinaryOperator, Identifier]);
        assert_eq!(kinds("a+b"), [Identifier, BinaryOperator, Identifier]);
        assert_eq!(kinds("-a"), [PrefixOperator, Identifier]);
        assert_eq!(kinds("a++ "), [Identifier, PostfixOperator]);
    }

    #[test]
    fn lex_special_operator_forms() {
        use RawTokenKind::{
            Arrow, Equal, ExclamationMark, Identifier, InfixQuestionMark, PostfixQuestionMark,
            PrefixAmpersand, PrefixOperator,
        };
        assert_eq!(kinds("x!"), [Identifier, ExclamationMark]);
        assert_eq!(kinds("!x"), [PrefixOperator, Identifier]);
        assert_eq!(kinds("x?"), [Identifier, PostfixQuestionMark]);
        assert_eq!(kinds("x ? y"), [Identifier, InfixQuestionMark, Identifier]);
        assert_eq!(kinds("&x"), [PrefixAmpersand, Identifier]);
        assert_eq!(kinds("x = y"), [Identifier, Equal, Identifier]);
        assert_eq!(kinds("a -> b"), [Identifier, Arrow, Identifier]);
    }

    #[test]
    fn lex_dot_operators() {
        assert_eq!(texts("0..<n a...b"), ["0", "..<", "n", "a", "...", "b"]);
    }

    #[test]
    fn operator_stops_before_comment() {
        assert_eq!(texts("a +// c\nb"), ["a", "+", "b"]);
    }

    #[test]
    fn trailing_trivia_stops_before_newline() {
        let lexemes: Vec<_> = Lexer::new("a // note\nb").collect();
        assert_eq!(lexemes[0].trailing_trivia().len(), 2);
        assert!(lexemes[1].leading_trivia()[0].contains_newline());
        assert!(lexemes[1].is_at_start_of_line());
    }

    #[test]
    fn doc_and_block_comments_are_trivia() {
        let lexemes: Vec<_> = Lexer::new("/// doc\n/* a /* nested */ b */ x").collect();
        assert_eq!(lexemes.len(), 1);
        let trivia = lexemes[0].leading_trivia();
        assert!(matches!(trivia[0], Trivia::DocComment(_)));
        assert!(matches!(trivia[2], Trivia::BlockComment(ref text) if text.ends_with("b */")));
    }

    #[test]
    fn first_lexeme_is_at_start_of_line() {
        let lexemes: Vec<_> = Lexer::new("a b\nc").collect();
        let starts: Vec<_> = lexemes.iter().map(Lexeme::is_at_start_of_line).collect();
        assert_eq!(starts, [true, false, true]);
    }

    #[test]
    fn lex_at_is_referentially_transparent() {
        let source = "let x = foo(1, 2) // done\n";
        let first = Lexer::lex_at(source, 0);
        let second = Lexer::lex_at(source, first.end());
        assert_eq!(Lexer::lex_at(source, first.end()), second);
        let sequential: Vec<_> = Lexer::new(source).take(2).collect();
        assert_eq!(sequential, [first, second]);
    }

    #[test]
    fn unknown_characters_do_not_stop_lexing() {
        assert_eq!(
            kinds("a ¤ b"),
            [RawTokenKind::Identifier, RawTokenKind::Unknown, RawTokenKind::Identifier]
        );
    }

    #[test]
    fn lex_with_eof_reconstructs_source() {
        let source = "  var x: Int = 1 /* c */\n// trailing";
        let mut rebuilt = String::new();
        for token in lex_with_eof(source) {
            token.write_full_text(&mut rebuilt);
        }
        assert_eq!(rebuilt, source);
    }

    #[test]
    fn cursor_copies_are_independent() {
        let mut cursor = LexemeCursor::new("a b c");
        let fork = cursor;
        cursor.advance();
        cursor.advance();
        assert_eq!(cursor.current().text(), "c");
        assert_eq!(fork.current().text(), "a");
    }

    #[test]
    fn cursor_stays_at_eof() {
        let mut cursor = LexemeCursor::new("a");
        cursor.advance();
        assert!(cursor.current().is_eof());
        let eof = cursor.advance();
        assert!(eof.is_eof());
        assert!(cursor.current().is_eof());
    }

    #[test]
    fn split_current_preserves_trivia() {
        let mut cursor = LexemeCursor::new("a<b>> // x\n");
        for _ in 0..3 {
            cursor.advance();
        }
        assert_eq!(cursor.current().text(), ">>");
        assert_eq!(cursor.current().kind(), RawTokenKind::PostfixOperator);

        let prefix = cursor.split_current(1, RawTokenKind::RightAngle);
        assert_eq!(prefix.text(), ">");
        assert_eq!(prefix.kind(), RawTokenKind::RightAngle);
        assert_eq!(prefix.trailing_trivia_len(), 0);

        let remainder = cursor.current();
        assert_eq!(remainder.text(), ">");
        assert_eq!(remainder.kind(), RawTokenKind::PostfixOperator);
        assert_eq!(remainder.leading_trivia_len(), 0);
        assert_eq!(remainder.trailing_trivia_len(), 5);
        assert!(!remainder.is_at_start_of_line());

        assert_eq!(
            format!("{}{}", prefix.full_text(), remainder.full_text()),
            ">> // x"
        );
        cursor.advance();
        assert!(cursor.current().is_eof());
    }

    #[test]
    fn split_remainder_is_reclassified() {
        let mut cursor = LexemeCursor::new("T>?");
        cursor.advance();
        assert_eq!(cursor.current().text(), ">?");
        cursor.split_current(1, RawTokenKind::RightAngle);
        assert_eq!(cursor.current().kind(), RawTokenKind::PostfixQuestionMark);
    }
}
