// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Token types for Swift-like lexical analysis.
//!
//! Two token representations live here:
//!
//! - [`Lexeme`] is the borrowed, `Copy` unit the lexer produces on demand from
//!   a byte offset. It records lengths instead of owning trivia, so cursors
//!   holding one can be copied freely.
//! - [`Token`] is the owned form handed to tooling and stored by the parser,
//!   with [`Trivia`] pieces split out and [`EcoString`] text.
//!
//! # Keywords
//!
//! [`Keyword`] covers both reserved words (lexed as [`RawTokenKind::Keyword`])
//! and contextual words, which the lexer leaves as identifiers. Whether an
//! identifier acts as a keyword is decided by the token spec asking for it,
//! never by the lexer.

use ecow::EcoString;

use super::Span;
use super::lexer::Lexer;

/// The raw kind of a lexeme, as decided by the lexer alone.
///
/// Kinds carry no payload: the text of a lexeme is always a slice of the
/// source. [`RawTokenKind::LeftAngle`] and [`RawTokenKind::RightAngle`] are
/// never lexed; they only appear on tokens remapped during consumption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RawTokenKind {
    EndOfFile,
    Unknown,

    // === Names and literals ===
    Identifier,
    /// `$0`, `$foo`
    DollarIdentifier,
    /// A reserved word; see [`Keyword::is_reserved`].
    Keyword,
    /// `_`
    Wildcard,
    IntegerLiteral,
    FloatLiteral,
    /// A whole string literal, interpolations included.
    StringLiteral,

    // === Brackets ===
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    LeftSquare,
    RightSquare,
    LeftAngle,
    RightAngle,

    // === Punctuation ===
    Period,
    Comma,
    Colon,
    Semicolon,
    Equal,
    Arrow,
    AtSign,
    Pound,
    Backslash,
    /// A postfix `!` bound to the preceding token.
    ExclamationMark,
    /// A `?` preceded by whitespace, as in a ternary.
    InfixQuestionMark,
    /// A `?` bound to the preceding token.
    PostfixQuestionMark,
    /// A prefix `&`, as in `&value`.
    PrefixAmpersand,

    // === Operators ===
    BinaryOperator,
    PrefixOperator,
    PostfixOperator,

    // === Conditional compilation ===
    PoundIf,
    PoundElseif,
    PoundElse,
    PoundEndif,
}

impl RawTokenKind {
    /// Returns the fixed spelling of this kind, if it has exactly one.
    #[must_use]
    pub const fn fixed_text(self) -> Option<&'static str> {
        Some(match self {
            Self::Wildcard => "_",
            Self::LeftParen => "(",
            Self::RightParen => ")",
            Self::LeftBrace => "{",
            Self::RightBrace => "}",
            Self::LeftSquare => "[",
            Self::RightSquare => "]",
            Self::LeftAngle => "<",
            Self::RightAngle => ">",
            Self::Period => ".",
            Self::Comma => ",",
            Self::Colon => ":",
            Self::Semicolon => ";",
            Self::Equal => "=",
            Self::Arrow => "->",
            Self::AtSign => "@",
            Self::Pound => "#",
            Self::Backslash => "\\",
            Self::ExclamationMark => "!",
            Self::InfixQuestionMark | Self::PostfixQuestionMark => "?",
            Self::PrefixAmpersand => "&",
            Self::PoundIf => "#if",
            Self::PoundElseif => "#elseif",
            Self::PoundElse => "#else",
            Self::PoundEndif => "#endif",
            Self::EndOfFile
            | Self::Unknown
            | Self::Identifier
            | Self::DollarIdentifier
            | Self::Keyword
            | Self::IntegerLiteral
            | Self::FloatLiteral
            | Self::StringLiteral
            | Self::BinaryOperator
            | Self::PrefixOperator
            | Self::PostfixOperator => return None,
        })
    }

    /// Returns the closing kind for a bracket-like opener.
    #[must_use]
    pub const fn closing_delimiter(self) -> Option<Self> {
        match self {
            Self::LeftParen => Some(Self::RightParen),
            Self::LeftBrace => Some(Self::RightBrace),
            Self::LeftSquare => Some(Self::RightSquare),
            Self::LeftAngle => Some(Self::RightAngle),
            _ => None,
        }
    }

    /// Returns `true` for the operator kinds whose text is free-form.
    #[must_use]
    pub const fn is_operator(self) -> bool {
        matches!(
            self,
            Self::BinaryOperator | Self::PrefixOperator | Self::PostfixOperator
        )
    }

    /// Returns `true` for the four conditional-compilation directives.
    #[must_use]
    pub const fn is_pound_directive(self) -> bool {
        matches!(
            self,
            Self::PoundIf | Self::PoundElseif | Self::PoundElse | Self::PoundEndif
        )
    }

    /// A stable snake-case name, used by tooling output.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::EndOfFile => "end_of_file",
            Self::Unknown => "unknown",
            Self::Identifier => "identifier",
            Self::DollarIdentifier => "dollar_identifier",
            Self::Keyword => "keyword",
            Self::Wildcard => "wildcard",
            Self::IntegerLiteral => "integer_literal",
            Self::FloatLiteral => "float_literal",
            Self::StringLiteral => "string_literal",
            Self::LeftParen => "left_paren",
            Self::RightParen => "right_paren",
            Self::LeftBrace => "left_brace",
            Self::RightBrace => "right_brace",
            Self::LeftSquare => "left_square",
            Self::RightSquare => "right_square",
            Self::LeftAngle => "left_angle",
            Self::RightAngle => "right_angle",
            Self::Period => "period",
            Self::Comma => "comma",
            Self::Colon => "colon",
            Self::Semicolon => "semicolon",
            Self::Equal => "equal",
            Self::Arrow => "arrow",
            Self::AtSign => "at_sign",
            Self::Pound => "pound",
            Self::Backslash => "backslash",
            Self::ExclamationMark => "exclamation_mark",
            Self::InfixQuestionMark => "infix_question_mark",
            Self::PostfixQuestionMark => "postfix_question_mark",
            Self::PrefixAmpersand => "prefix_ampersand",
            Self::BinaryOperator => "binary_operator",
            Self::PrefixOperator => "prefix_operator",
            Self::PostfixOperator => "postfix_operator",
            Self::PoundIf => "pound_if",
            Self::PoundElseif => "pound_elseif",
            Self::PoundElse => "pound_else",
            Self::PoundEndif => "pound_endif",
        }
    }
}

impl std::fmt::Display for RawTokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.fixed_text() {
            Some(text) => write!(f, "'{text}'"),
            None => match self {
                Self::EndOfFile => write!(f, "end of file"),
                Self::Identifier => write!(f, "identifier"),
                Self::DollarIdentifier => write!(f, "dollar identifier"),
                Self::Keyword => write!(f, "keyword"),
                Self::IntegerLiteral => write!(f, "integer literal"),
                Self::FloatLiteral => write!(f, "floating-point literal"),
                Self::StringLiteral => write!(f, "string literal"),
                Self::BinaryOperator => write!(f, "binary operator"),
                Self::PrefixOperator => write!(f, "prefix operator"),
                Self::PostfixOperator => write!(f, "postfix operator"),
                _ => write!(f, "unknown token"),
            },
        }
    }
}

macro_rules! keywords {
    (
        reserved { $($reserved:ident => $reserved_text:literal,)* }
        contextual { $($contextual:ident => $contextual_text:literal,)* }
    ) => {
        /// A reserved or contextual keyword.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Keyword {
            $($reserved,)*
            $($contextual,)*
        }

        impl Keyword {
            /// Every keyword, reserved words first.
            pub const ALL: &'static [Self] = &[$(Self::$reserved,)* $(Self::$contextual,)*];

            /// Returns the source spelling of the keyword.
            #[must_use]
            pub const fn text(self) -> &'static str {
                match self {
                    $(Self::$reserved => $reserved_text,)*
                    $(Self::$contextual => $contextual_text,)*
                }
            }

            /// Returns `true` if the lexer always treats this word as a keyword.
            #[must_use]
            pub const fn is_reserved(self) -> bool {
                match self {
                    $(Self::$reserved => true,)*
                    $(Self::$contextual => false,)*
                }
            }

            /// Looks up a keyword by its exact spelling.
            #[must_use]
            pub fn from_text(text: &str) -> Option<Self> {
                match text {
                    $($reserved_text => Some(Self::$reserved),)*
                    $($contextual_text => Some(Self::$contextual),)*
                    _ => None,
                }
            }
        }
    };
}

keywords! {
    reserved {
        Any => "Any",
        As => "as",
        Associatedtype => "associatedtype",
        Break => "break",
        Case => "case",
        Catch => "catch",
        Class => "class",
        Continue => "continue",
        Default => "default",
        Defer => "defer",
        Deinit => "deinit",
        Do => "do",
        Else => "else",
        Enum => "enum",
        Extension => "extension",
        Fallthrough => "fallthrough",
        False => "false",
        Fileprivate => "fileprivate",
        For => "for",
        Func => "func",
        Guard => "guard",
        If => "if",
        Import => "import",
        In => "in",
        Init => "init",
        Inout => "inout",
        Internal => "internal",
        Is => "is",
        Let => "let",
        Nil => "nil",
        Operator => "operator",
        Precedencegroup => "precedencegroup",
        Private => "private",
        Protocol => "protocol",
        Public => "public",
        Repeat => "repeat",
        Rethrows => "rethrows",
        Return => "return",
        SelfValue => "self",
        SelfType => "Self",
        Static => "static",
        Struct => "struct",
        Subscript => "subscript",
        Super => "super",
        Switch => "switch",
        Throw => "throw",
        Throws => "throws",
        True => "true",
        Try => "try",
        Typealias => "typealias",
        Var => "var",
        Where => "where",
        While => "while",
    }
    contextual {
        Actor => "actor",
        Async => "async",
        Autoclosure => "autoclosure",
        Await => "await",
        Borrowing => "borrowing",
        CanImport => "canImport",
        Compiler => "compiler",
        Consume => "consume",
        Consuming => "consuming",
        Convenience => "convenience",
        Convention => "convention",
        Copy => "copy",
        DidSet => "didSet",
        Differentiable => "differentiable",
        Discard => "discard",
        Distributed => "distributed",
        Dynamic => "dynamic",
        Escaping => "escaping",
        Final => "final",
        Get => "get",
        Indirect => "indirect",
        Infix => "infix",
        Isolated => "isolated",
        Lazy => "lazy",
        Macro => "macro",
        Mutating => "mutating",
        NoDerivative => "noDerivative",
        Noescape => "noescape",
        Nonisolated => "nonisolated",
        Nonmutating => "nonmutating",
        Open => "open",
        Optional => "optional",
        Override => "override",
        Package => "package",
        Postfix => "postfix",
        Prefix => "prefix",
        Reasync => "reasync",
        Required => "required",
        Sendable => "Sendable",
        Set => "set",
        Swift => "swift",
        Unchecked => "unchecked",
        Unowned => "unowned",
        Weak => "weak",
        WillSet => "willSet",
        Yield => "yield",
        UnderscoreBorrow => "_borrow",
        UnderscoreConst => "_const",
        UnderscoreForget => "_forget",
        UnderscoreLocal => "_local",
        UnderscoreMove => "_move",
        UnderscoreOwned => "__owned",
        UnderscoreShared => "__shared",
    }
}

impl std::fmt::Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "'{}'", self.text())
    }
}

/// Trivia represents non-semantic content like whitespace and comments.
///
/// Preserving trivia lets tools reconstruct the source exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Trivia {
    /// Whitespace (spaces, tabs, newlines)
    Whitespace(EcoString),

    /// A line comment: `// comment text`
    LineComment(EcoString),

    /// A block comment: `/* comment text */`, possibly nested.
    BlockComment(EcoString),

    /// A doc comment: `/// doc text`
    DocComment(EcoString),
}

impl Trivia {
    /// Returns the text content of this trivia.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Whitespace(s)
            | Self::LineComment(s)
            | Self::BlockComment(s)
            | Self::DocComment(s) => s,
        }
    }

    /// Returns `true` if this trivia contains a newline.
    #[must_use]
    pub fn contains_newline(&self) -> bool {
        self.as_str().contains('\n')
    }

    #[must_use]
    pub const fn is_comment(&self) -> bool {
        matches!(
            self,
            Self::LineComment(_) | Self::BlockComment(_) | Self::DocComment(_)
        )
    }
}

/// An immutable lexical unit borrowed from the source.
///
/// A lexeme is fully described by offsets into the source: its leading
/// trivia, its text and its trailing trivia are three adjacent ranges. Lexing
/// is referentially transparent, so re-lexing from [`Lexeme::end`] always
/// yields the same next lexeme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lexeme<'src> {
    kind: RawTokenKind,
    source: &'src str,
    leading_start: u32,
    leading_trivia_len: u32,
    text_len: u32,
    trailing_trivia_len: u32,
    at_start_of_line: bool,
}

impl<'src> Lexeme<'src> {
    pub(crate) const fn new(
        kind: RawTokenKind,
        source: &'src str,
        leading_start: u32,
        leading_trivia_len: u32,
        text_len: u32,
        trailing_trivia_len: u32,
        at_start_of_line: bool,
    ) -> Self {
        Self {
            kind,
            source,
            leading_start,
            leading_trivia_len,
            text_len,
            trailing_trivia_len,
            at_start_of_line,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> RawTokenKind {
        self.kind
    }

    #[must_use]
    pub fn is_at(&self, kind: RawTokenKind) -> bool {
        self.kind == kind
    }

    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self.kind, RawTokenKind::EndOfFile)
    }

    /// Returns `true` if a newline precedes this lexeme, or it is the first
    /// lexeme of the file.
    #[must_use]
    pub const fn is_at_start_of_line(&self) -> bool {
        self.at_start_of_line
    }

    /// Returns `true` if whitespace or a comment separates this lexeme from
    /// the previous one.
    #[must_use]
    pub fn has_preceding_trivia(&self) -> bool {
        let before = &self.source[..self.leading_start as usize];
        self.leading_trivia_len > 0
            || before.ends_with(char::is_whitespace)
            || before.ends_with("*/")
    }

    /// Byte offset where the text starts (after leading trivia).
    #[must_use]
    pub const fn text_start(&self) -> u32 {
        self.leading_start + self.leading_trivia_len
    }

    /// Byte offset just past the trailing trivia; the next lexeme starts here.
    #[must_use]
    pub const fn end(&self) -> u32 {
        self.text_start() + self.text_len + self.trailing_trivia_len
    }

    /// The span of the text, excluding trivia.
    #[must_use]
    pub const fn span(&self) -> Span {
        Span::new(self.text_start(), self.text_start() + self.text_len)
    }

    /// The span including leading and trailing trivia.
    #[must_use]
    pub const fn full_span(&self) -> Span {
        Span::new(self.leading_start, self.end())
    }

    #[must_use]
    pub fn text(&self) -> &'src str {
        &self.source[self.span().as_range()]
    }

    /// The exact source slice covered by this lexeme, trivia included.
    #[must_use]
    pub fn full_text(&self) -> &'src str {
        &self.source[self.full_span().as_range()]
    }

    #[must_use]
    pub const fn leading_trivia_len(&self) -> u32 {
        self.leading_trivia_len
    }

    #[must_use]
    pub const fn trailing_trivia_len(&self) -> u32 {
        self.trailing_trivia_len
    }

    /// Splits the leading trivia into pieces.
    #[must_use]
    pub fn leading_trivia(&self) -> Vec<Trivia> {
        Lexer::trivia_pieces(self.source, self.leading_start, self.leading_trivia_len)
    }

    /// Splits the trailing trivia into pieces.
    #[must_use]
    pub fn trailing_trivia(&self) -> Vec<Trivia> {
        Lexer::trivia_pieces(
            self.source,
            self.span().end(),
            self.trailing_trivia_len,
        )
    }

    pub(crate) const fn source(&self) -> &'src str {
        self.source
    }

    /// The same lexeme reinterpreted as `kind`.
    pub(crate) const fn remapped(self, kind: RawTokenKind) -> Self {
        Self { kind, ..self }
    }

    /// A zero-width lexeme at `offset`, standing in for a missing token.
    pub(crate) const fn empty_at(kind: RawTokenKind, source: &'src str, offset: u32) -> Self {
        Self::new(kind, source, offset, 0, 0, 0, false)
    }
}

/// Whether a token came from the source or was synthesized by recovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Presence {
    Present,
    /// A placeholder for an expected token; its text and trivia are empty.
    Missing,
}

/// An owned token with its source location and surrounding trivia.
///
/// # Examples
///
/// ```
/// use sparrow_core::source_analysis::{RawTokenKind, lex};
///
/// let tokens = lex("let x = 1 // one");
/// assert_eq!(tokens[1].kind(), RawTokenKind::Identifier);
/// assert_eq!(tokens[3].trailing_trivia().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    kind: RawTokenKind,
    text: EcoString,
    span: Span,
    leading_trivia: Vec<Trivia>,
    trailing_trivia: Vec<Trivia>,
    presence: Presence,
}

impl Token {
    /// Converts a lexeme into an owned token, reinterpreted as `kind`.
    #[must_use]
    pub fn from_lexeme(lexeme: &Lexeme<'_>, kind: RawTokenKind) -> Self {
        Self {
            kind,
            text: EcoString::from(lexeme.text()),
            span: lexeme.span(),
            leading_trivia: lexeme.leading_trivia(),
            trailing_trivia: lexeme.trailing_trivia(),
            presence: Presence::Present,
        }
    }

    /// Creates a placeholder token at `offset`.
    #[must_use]
    pub fn missing(kind: RawTokenKind, offset: u32) -> Self {
        Self {
            kind,
            text: EcoString::new(),
            span: Span::empty_at(offset),
            leading_trivia: Vec::new(),
            trailing_trivia: Vec::new(),
            presence: Presence::Missing,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> RawTokenKind {
        self.kind
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the source span of this token (excluding trivia).
    #[must_use]
    pub const fn span(&self) -> Span {
        self.span
    }

    #[must_use]
    pub fn leading_trivia(&self) -> &[Trivia] {
        &self.leading_trivia
    }

    #[must_use]
    pub fn trailing_trivia(&self) -> &[Trivia] {
        &self.trailing_trivia
    }

    #[must_use]
    pub const fn presence(&self) -> Presence {
        self.presence
    }

    #[must_use]
    pub const fn is_missing(&self) -> bool {
        matches!(self.presence, Presence::Missing)
    }

    /// Returns `true` if there's a newline in the leading trivia.
    #[must_use]
    pub fn has_leading_newline(&self) -> bool {
        self.leading_trivia.iter().any(Trivia::contains_newline)
    }

    /// Appends leading trivia, text and trailing trivia to `out`.
    pub fn write_full_text(&self, out: &mut String) {
        for trivia in &self.leading_trivia {
            out.push_str(trivia.as_str());
        }
        out.push_str(&self.text);
        for trivia in &self.trailing_trivia {
            out.push_str(trivia.as_str());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_lookup_round_trips() {
        for keyword in Keyword::ALL {
            assert_eq!(Keyword::from_text(keyword.text()), Some(*keyword));
        }
        assert_eq!(Keyword::from_text("variable"), None);
    }

    #[test]
    fn reserved_and_contextual_keywords() {
        assert!(Keyword::Var.is_reserved());
        assert!(Keyword::SelfType.is_reserved());
        assert!(!Keyword::WillSet.is_reserved());
        assert!(!Keyword::Actor.is_reserved());
    }

    #[test]
    fn closing_delimiters() {
        assert_eq!(
            RawTokenKind::LeftParen.closing_delimiter(),
            Some(RawTokenKind::RightParen)
        );
        assert_eq!(
            RawTokenKind::LeftBrace.closing_delimiter(),
            Some(RawTokenKind::RightBrace)
        );
        assert_eq!(RawTokenKind::PoundIf.closing_delimiter(), None);
    }

    #[test]
    fn display_uses_fixed_text_when_available() {
        assert_eq!(RawTokenKind::RightParen.to_string(), "')'");
        assert_eq!(RawTokenKind::Identifier.to_string(), "identifier");
        assert_eq!(Keyword::WillSet.to_string(), "'willSet'");
    }

    #[test]
    fn lexeme_offsets() {
        let source = "  foo  \nbar";
        let lexeme = Lexeme::new(RawTokenKind::Identifier, source, 0, 2, 3, 2, true);
        assert_eq!(lexeme.text(), "foo");
        assert_eq!(lexeme.text_start(), 2);
        assert_eq!(lexeme.end(), 7);
        assert_eq!(lexeme.full_text(), "  foo  ");
    }

    #[test]
    fn missing_token_has_no_text() {
        let token = Token::missing(RawTokenKind::RightParen, 12);
        assert!(token.is_missing());
        assert_eq!(token.text(), "");
        assert_eq!(token.span(), Span::empty_at(12));
        let mut out = String::new();
        token.write_full_text(&mut out);
        assert!(out.is_empty());
    }
}
