// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Descriptions of expected tokens.
//!
//! A [`TokenSpec`] says which lexemes satisfy an expectation: a raw kind, or a
//! keyword, optionally constrained by line position. The same spec is used to
//! test the current lexeme and to consume it, so what is matched and what is
//! eaten cannot drift apart.
//!
//! # Recovery Precedence
//!
//! Every spec carries a [`TokenPrecedence`]. When the parser skips ahead
//! looking for a token, it stops at any lexeme whose own precedence is at
//! least the precedence of the token it is looking for: a missing `)` never
//! swallows a following `func`.

use super::{Keyword, Lexeme, RawTokenKind};

/// Where a token has to sit relative to the start of its line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LinePosition {
    #[default]
    Any,
    /// The token must be the first one on its line.
    AtStartOfLine,
    /// The token must not be the first one on its line.
    NotAtStartOfLine,
}

/// Recovery precedence categories, lowest first.
///
/// The ordering is a calibrated policy: a skip towards a token of precedence
/// `p` consumes lexemes ranked below `p` and stops at anything ranked `p` or
/// higher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TokenPrecedence {
    /// Unknown characters and end of file.
    UnknownToken,
    /// Identifiers, contextual keywords and literals.
    IdentifierLike,
    /// Keywords that only appear inside expressions: `as`, `try`, `self`.
    ExprKeyword,
    /// Operators and punctuation that glue expressions together.
    WeakPunctuator,
    /// `(`, `[` and `<`, skipped together with their contents.
    WeakBracketed,
    /// `)`, `]` and `>`.
    WeakBracketClose,
    /// `->` and `;`.
    StrongPunctuator,
    /// `{`, skipped together with its contents.
    OpeningBrace,
    /// `}`.
    ClosingBrace,
    /// Keywords that start or continue statements.
    StmtKeyword,
    /// `#else`, `#elseif` and `#endif`.
    ClosingPoundIf,
    /// Keywords that start declarations, and access modifiers.
    DeclKeyword,
    /// `#if`.
    OpeningPoundIf,
}

impl TokenPrecedence {
    /// Returns the precedence of a lexeme as it appears in the source.
    #[must_use]
    pub fn of(lexeme: &Lexeme<'_>) -> Self {
        if lexeme.is_at(RawTokenKind::Keyword) {
            Keyword::from_text(lexeme.text()).map_or(Self::IdentifierLike, Self::of_keyword)
        } else {
            Self::of_kind(lexeme.kind())
        }
    }

    /// Precedence of a non-keyword raw kind.
    #[must_use]
    pub const fn of_kind(kind: RawTokenKind) -> Self {
        use RawTokenKind as K;
        match kind {
            K::EndOfFile | K::Unknown => Self::UnknownToken,
            K::Identifier
            | K::DollarIdentifier
            | K::Keyword
            | K::Wildcard
            | K::IntegerLiteral
            | K::FloatLiteral
            | K::StringLiteral => Self::IdentifierLike,
            K::Period
            | K::Comma
            | K::Colon
            | K::Equal
            | K::AtSign
            | K::Pound
            | K::Backslash
            | K::ExclamationMark
            | K::InfixQuestionMark
            | K::PostfixQuestionMark
            | K::PrefixAmpersand
            | K::BinaryOperator
            | K::PrefixOperator
            | K::PostfixOperator => Self::WeakPunctuator,
            K::LeftParen | K::LeftSquare | K::LeftAngle => Self::WeakBracketed,
            K::RightParen | K::RightSquare | K::RightAngle => Self::WeakBracketClose,
            K::Arrow | K::Semicolon => Self::StrongPunctuator,
            K::LeftBrace => Self::OpeningBrace,
            K::RightBrace => Self::ClosingBrace,
            K::PoundElseif | K::PoundElse | K::PoundEndif => Self::ClosingPoundIf,
            K::PoundIf => Self::OpeningPoundIf,
        }
    }

    /// Precedence of a keyword. Contextual keywords rank as identifiers.
    #[must_use]
    pub const fn of_keyword(keyword: Keyword) -> Self {
        use Keyword as K;
        match keyword {
            K::Any
            | K::As
            | K::False
            | K::Is
            | K::Nil
            | K::Rethrows
            | K::SelfValue
            | K::SelfType
            | K::Super
            | K::Throws
            | K::True
            | K::Try => Self::ExprKeyword,
            K::Break
            | K::Catch
            | K::Continue
            | K::Default
            | K::Defer
            | K::Do
            | K::Else
            | K::Fallthrough
            | K::For
            | K::Guard
            | K::If
            | K::In
            | K::Repeat
            | K::Return
            | K::Switch
            | K::Throw
            | K::Where
            | K::While => Self::StmtKeyword,
            K::Associatedtype
            | K::Case
            | K::Class
            | K::Deinit
            | K::Enum
            | K::Extension
            | K::Fileprivate
            | K::Func
            | K::Import
            | K::Init
            | K::Inout
            | K::Internal
            | K::Let
            | K::Operator
            | K::Precedencegroup
            | K::Private
            | K::Protocol
            | K::Public
            | K::Static
            | K::Struct
            | K::Subscript
            | K::Typealias
            | K::Var => Self::DeclKeyword,
            _ => Self::IdentifierLike,
        }
    }

    /// Whether a skip towards this precedence may continue onto later lines.
    #[must_use]
    pub const fn should_skip_over_newlines(self) -> bool {
        self as u8 >= Self::StmtKeyword as u8
    }
}

/// A lexeme prepared for keyword matching.
///
/// Reserved keywords and identifiers spelled like contextual keywords both
/// expose their [`Keyword`]; only specs that ask for a keyword look at it, so
/// `willSet` stays an ordinary identifier everywhere else. Escaped
/// identifiers such as `` `var` `` never expose a keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordMatch {
    raw_kind: RawTokenKind,
    keyword: Option<Keyword>,
}

impl KeywordMatch {
    #[must_use]
    pub fn prepare(lexeme: &Lexeme<'_>) -> Self {
        let keyword = match lexeme.kind() {
            RawTokenKind::Keyword | RawTokenKind::Identifier => Keyword::from_text(lexeme.text()),
            _ => None,
        };
        Self {
            raw_kind: lexeme.kind(),
            keyword,
        }
    }

    #[must_use]
    pub const fn raw_kind(&self) -> RawTokenKind {
        self.raw_kind
    }

    #[must_use]
    pub const fn keyword(&self) -> Option<Keyword> {
        self.keyword
    }
}

/// A description of an expected token.
///
/// # Examples
///
/// ```
/// use sparrow_core::source_analysis::{Keyword, Lexer, RawTokenKind, TokenSpec};
///
/// let lexeme = Lexer::lex_at("willSet", 0);
/// assert!(TokenSpec::keyword(Keyword::WillSet).matches(&lexeme));
/// assert!(TokenSpec::of(RawTokenKind::Identifier).matches(&lexeme));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenSpec {
    raw_kind: RawTokenKind,
    keyword: Option<Keyword>,
    remapping: Option<RawTokenKind>,
    line_position: LinePosition,
    recovery_precedence: TokenPrecedence,
}

impl TokenSpec {
    /// Matches any lexeme of the given raw kind.
    #[must_use]
    pub const fn of(kind: RawTokenKind) -> Self {
        Self {
            raw_kind: kind,
            keyword: None,
            remapping: None,
            line_position: LinePosition::Any,
            recovery_precedence: TokenPrecedence::of_kind(kind),
        }
    }

    /// Matches a keyword, whether reserved or spelled as an identifier.
    #[must_use]
    pub const fn keyword(keyword: Keyword) -> Self {
        Self {
            raw_kind: if keyword.is_reserved() {
                RawTokenKind::Keyword
            } else {
                RawTokenKind::Identifier
            },
            keyword: Some(keyword),
            remapping: None,
            line_position: LinePosition::Any,
            recovery_precedence: TokenPrecedence::of_keyword(keyword),
        }
    }

    /// Consumes a matching lexeme as `kind` instead of its lexed kind.
    #[must_use]
    pub const fn with_remapping(self, kind: RawTokenKind) -> Self {
        Self {
            remapping: Some(kind),
            ..self
        }
    }

    #[must_use]
    pub const fn with_precedence(self, precedence: TokenPrecedence) -> Self {
        Self {
            recovery_precedence: precedence,
            ..self
        }
    }

    #[must_use]
    pub const fn with_line_position(self, line_position: LinePosition) -> Self {
        Self {
            line_position,
            ..self
        }
    }

    #[must_use]
    pub const fn raw_kind(&self) -> RawTokenKind {
        self.raw_kind
    }

    #[must_use]
    pub const fn expected_keyword(&self) -> Option<Keyword> {
        self.keyword
    }

    #[must_use]
    pub const fn remapping(&self) -> Option<RawTokenKind> {
        self.remapping
    }

    #[must_use]
    pub const fn line_position(&self) -> LinePosition {
        self.line_position
    }

    #[must_use]
    pub const fn recovery_precedence(&self) -> TokenPrecedence {
        self.recovery_precedence
    }

    /// The kind a token consumed with this spec ends up with.
    #[must_use]
    pub fn consumed_kind(&self) -> RawTokenKind {
        self.remapping.unwrap_or(self.raw_kind)
    }

    /// Returns `true` if `lexeme` satisfies this spec.
    #[must_use]
    pub fn matches(&self, lexeme: &Lexeme<'_>) -> bool {
        self.matches_prepared(&KeywordMatch::prepare(lexeme), lexeme)
    }

    /// Like [`TokenSpec::matches`], reusing an already prepared lexeme.
    #[must_use]
    pub fn matches_prepared(&self, prepared: &KeywordMatch, lexeme: &Lexeme<'_>) -> bool {
        let kind_matches = match self.keyword {
            Some(keyword) => prepared.keyword == Some(keyword),
            None => prepared.raw_kind == self.raw_kind,
        };
        kind_matches
            && match self.line_position {
                LinePosition::Any => true,
                LinePosition::AtStartOfLine => lexeme.is_at_start_of_line(),
                LinePosition::NotAtStartOfLine => !lexeme.is_at_start_of_line(),
            }
    }
}

impl std::fmt::Display for TokenSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.keyword {
            Some(keyword) => write!(f, "{keyword}"),
            None => write!(f, "{}", self.raw_kind),
        }
    }
}
