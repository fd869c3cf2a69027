// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Syntax tree for parsed Swift source.
//!
//! The tree does not own text. Every node refers to tokens in the
//! [`SourceFile`]'s token log by [`TokenId`], and the log holds every token the
//! parser consumed, in order, including tokens it skipped during recovery and
//! placeholders for tokens it expected but did not find. Concatenating the
//! full text of the log therefore reproduces the input exactly.
//!
//! Only the parts of the grammar that exercise lookahead and recovery are
//! modelled in detail: variable declarations with their types, initializers
//! and accessor blocks, operator declarations, type member blocks, and
//! attribute-only `#if` blocks. Everything else is kept as a token range.
//!
//! # Example
//!
//! ```
//! use sparrow_core::ast::Item;
//! use sparrow_core::source_analysis::{ParseOptions, parse};
//!
//! let source = "var count: Int = 0 { didSet { } }\n";
//! let (file, errors) = parse(source, ParseOptions::default());
//! assert!(errors.is_empty());
//! assert!(matches!(file.items()[0], Item::Variable(_)));
//! assert_eq!(file.text(), source);
//! ```

use crate::source_analysis::{Span, Token};

/// Index of a token in [`SourceFile::tokens`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenId(u32);

impl TokenId {
    pub(crate) const fn new(index: u32) -> Self {
        Self(index)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A half-open run of consecutive tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenRange {
    pub start: TokenId,
    pub end: TokenId,
}

impl TokenRange {
    #[must_use]
    pub const fn new(start: TokenId, end: TokenId) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub const fn len(self) -> usize {
        self.end.index() - self.start.index()
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.len() == 0
    }
}

/// A parsed source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    tokens: Vec<Token>,
    items: Vec<Item>,
    eof: TokenId,
}

impl SourceFile {
    pub(crate) const fn new(tokens: Vec<Token>, items: Vec<Item>, eof: TokenId) -> Self {
        Self { tokens, items, eof }
    }

    /// Every consumed token, in source order, ending with end of file.
    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    #[must_use]
    pub fn token(&self, id: TokenId) -> &Token {
        &self.tokens[id.index()]
    }

    #[must_use]
    pub fn eof(&self) -> &Token {
        self.token(self.eof)
    }

    /// The tokens in `range`.
    #[must_use]
    pub fn range(&self, range: TokenRange) -> &[Token] {
        &self.tokens[range.start.index()..range.end.index()]
    }

    /// The source span covered by `range`, excluding outer trivia.
    #[must_use]
    pub fn span_of(&self, range: TokenRange) -> Option<Span> {
        let tokens = self.range(range);
        let first = tokens.first()?;
        let last = tokens.last()?;
        Some(first.span().merge(last.span()))
    }

    /// Reconstructs the source from the token log.
    #[must_use]
    pub fn text(&self) -> String {
        let mut out = String::new();
        for token in &self.tokens {
            token.write_full_text(&mut out);
        }
        out
    }

    /// The text of `range`, with trivia between its tokens but not around it.
    #[must_use]
    pub fn range_text(&self, range: TokenRange) -> String {
        tokens_text(self.range(range))
    }
}

/// Joins `tokens` with the trivia between them, leaving off the leading
/// trivia of the first and the trailing trivia of the last.
pub(crate) fn tokens_text(tokens: &[Token]) -> String {
    let mut out = String::new();
    for (index, token) in tokens.iter().enumerate() {
        if index > 0 {
            for trivia in token.leading_trivia() {
                out.push_str(trivia.as_str());
            }
        }
        out.push_str(token.text());
        if index + 1 < tokens.len() {
            for trivia in token.trailing_trivia() {
                out.push_str(trivia.as_str());
            }
        }
    }
    out
}

/// A top-level or member item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    /// An `#if` block holding only attributes.
    AttributeDirective(TokenRange),
    Variable(VariableDecl),
    Operator(OperatorDecl),
    /// A type declaration with a member block: `struct S { ... }`.
    Type(TypeDecl),
    /// Any other declaration, kept as tokens to the end of its line.
    Declaration(Declaration),
    Statement(Statement),
    /// An `#if` block with ordinary contents, skipped as a group.
    IfConfig(TokenRange),
    /// `#else`, `#elseif` or `#endif` with no open `#if`.
    MisplacedDirective(TokenId),
    /// Tokens that could not be parsed as anything.
    Unexpected(TokenRange),
}

/// `@name(arguments)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub at_sign: TokenId,
    /// The name and arguments.
    pub tokens: TokenRange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableDecl {
    pub attributes: Vec<Attribute>,
    pub modifiers: Vec<Modifier>,
    /// `var` or `let`.
    pub binding: TokenId,
    pub pattern: VariablePattern,
    pub type_annotation: Option<TypeAnnotation>,
    pub initializer: Option<Initializer>,
    pub accessors: Option<AccessorBlock>,
}

/// What a `var` or `let` binds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariablePattern {
    /// A name or `_`.
    Name(TokenId),
    /// `(a, b)`, kept as one group.
    Tuple(TokenRange),
}

/// A declaration modifier with its optional detail: `private(set)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modifier {
    pub keyword: TokenId,
    pub detail: Option<TokenRange>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeAnnotation {
    pub colon: TokenId,
    pub ty: TypeSyntax,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSyntax {
    /// `inout`, `borrowing` and the like.
    pub specifier: Option<TokenId>,
    /// Type attributes such as `@escaping`, each as `@` through its arguments.
    pub attributes: Vec<TokenRange>,
    pub base: TypeBase,
    /// Trailing `?` and `!`.
    pub suffixes: Vec<TokenId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeBase {
    /// `Swift.Array<Int>`.
    Path(Vec<TypeComponent>),
    /// `[T]`, `[K: V]` or a tuple, kept as one group.
    Group(TokenRange),
    /// `(A) async throws -> B`.
    Function {
        parameters: TokenRange,
        effects: Vec<TokenId>,
        arrow: TokenId,
        result: Box<TypeSyntax>,
    },
    /// No type where one was required.
    Missing(TokenId),
    /// Nesting went past the configured limit; the rest was skipped.
    TooDeep(TokenRange),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeComponent {
    pub name: TokenId,
    pub generic_arguments: Option<GenericArguments>,
}

/// `<A, B>`. The angles may be split out of longer operator lexemes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericArguments {
    pub left_angle: TokenId,
    pub arguments: Vec<TypeSyntax>,
    pub right_angle: TokenId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Initializer {
    pub equal: TokenId,
    pub value: TokenRange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessorBlock {
    /// `{ willSet { } didSet { } }`.
    Observers {
        left_brace: TokenId,
        accessors: Vec<Accessor>,
        /// Tokens skipped before the closing brace.
        unexpected: TokenRange,
        right_brace: TokenId,
    },
    /// A computed property body: `{ return 1 }`.
    Getter(TokenRange),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accessor {
    pub attributes: Vec<Attribute>,
    pub keyword: TokenId,
    /// `(newValue)`.
    pub parameter: Option<TokenRange>,
    pub body: Option<TokenRange>,
}

/// `prefix operator +++`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorDecl {
    pub attributes: Vec<Attribute>,
    pub modifiers: Vec<Modifier>,
    pub operator_keyword: TokenId,
    pub name: TokenId,
    /// A precedence group clause and anything else on the line.
    pub rest: TokenRange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
    pub attributes: Vec<Attribute>,
    pub modifiers: Vec<Modifier>,
    pub keyword: TokenId,
    /// The name, generic parameters and inheritance clause.
    pub header: TokenRange,
    pub members: MemberBlock,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberBlock {
    pub left_brace: TokenId,
    pub items: Vec<Item>,
    pub right_brace: TokenId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub attributes: Vec<Attribute>,
    pub modifiers: Vec<Modifier>,
    pub keyword: TokenId,
    pub tokens: TokenRange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    /// The introducing keyword, absent for expression statements.
    pub keyword: Option<TokenId>,
    pub tokens: TokenRange,
}
