// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Closed sets of token alternatives for parsing decisions.
//!
//! Each set is a fieldless enum whose variants each carry exactly one
//! [`TokenSpec`]. Sets are declared from a single table with
//! [`token_spec_set!`], which generates the variants, their specs and the
//! classification from the same rows. Union sets such as
//! [`DeclarationStart`] are declared with [`token_spec_union!`] and try their
//! member sets in order.
//!
//! Alternatives within one set never overlap, so classifying a lexeme
//! against a set yields at most one answer. Members of a union may overlap;
//! the earlier member wins.

use super::{Keyword, LinePosition, Lexeme, RawTokenKind, TokenPrecedence, TokenSpec};

/// A closed set of token alternatives.
pub trait TokenSpecSet: Sized + Copy {
    /// Classifies `lexeme`, returning the matching alternative if any.
    fn from_lexeme(lexeme: &Lexeme<'_>) -> Option<Self>;

    /// The spec used both to match and to consume this alternative.
    fn spec(self) -> TokenSpec;

    /// Every alternative, in matching order.
    fn all_cases() -> Vec<Self>;
}

/// Declares a fieldless [`TokenSpecSet`] from `Variant => spec` rows.
macro_rules! token_spec_set {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($(#[$variant_meta:meta])* $variant:ident => $spec:expr,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $($(#[$variant_meta])* $variant,)+
        }

        impl $name {
            /// Every alternative, in matching order.
            pub const CASES: &'static [Self] = &[$(Self::$variant,)+];
        }

        impl $crate::source_analysis::TokenSpecSet for $name {
            fn from_lexeme(lexeme: &$crate::source_analysis::Lexeme<'_>) -> Option<Self> {
                let prepared = $crate::source_analysis::KeywordMatch::prepare(lexeme);
                Self::CASES
                    .iter()
                    .copied()
                    .find(|case| case.spec().matches_prepared(&prepared, lexeme))
            }

            fn spec(self) -> $crate::source_analysis::TokenSpec {
                match self {
                    $(Self::$variant => $spec,)+
                }
            }

            fn all_cases() -> Vec<Self> {
                Self::CASES.to_vec()
            }
        }
    };
}

/// Declares a union [`TokenSpecSet`] that delegates to member sets in order.
macro_rules! token_spec_union {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($variant:ident($member:ty),)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $($variant($member),)+
        }

        impl TokenSpecSet for $name {
            fn from_lexeme(lexeme: &Lexeme<'_>) -> Option<Self> {
                $(
                    if let Some(member) = <$member as TokenSpecSet>::from_lexeme(lexeme) {
                        return Some(Self::$variant(member));
                    }
                )+
                None
            }

            fn spec(self) -> TokenSpec {
                match self {
                    $(Self::$variant(member) => member.spec(),)+
                }
            }

            fn all_cases() -> Vec<Self> {
                let mut cases = Vec::new();
                $(cases.extend(<$member as TokenSpecSet>::all_cases().into_iter().map(Self::$variant));)+
                cases
            }
        }
    };
}

pub(crate) use token_spec_set;

const fn kw(keyword: Keyword) -> TokenSpec {
    TokenSpec::keyword(keyword)
}

const fn kind(raw_kind: RawTokenKind) -> TokenSpec {
    TokenSpec::of(raw_kind)
}

token_spec_set! {
    /// Keywords that can begin a statement.
    pub enum CanBeStatementStart {
        Break => kw(Keyword::Break),
        Continue => kw(Keyword::Continue),
        Defer => kw(Keyword::Defer),
        Discard => kw(Keyword::Discard).with_precedence(TokenPrecedence::StmtKeyword),
        Do => kw(Keyword::Do),
        Fallthrough => kw(Keyword::Fallthrough),
        For => kw(Keyword::For),
        Forget => kw(Keyword::UnderscoreForget).with_precedence(TokenPrecedence::StmtKeyword),
        Guard => kw(Keyword::Guard),
        If => kw(Keyword::If),
        Repeat => kw(Keyword::Repeat),
        Return => kw(Keyword::Return),
        Switch => kw(Keyword::Switch),
        Throw => kw(Keyword::Throw),
        While => kw(Keyword::While),
        Yield => kw(Keyword::Yield),
    }
}

token_spec_set! {
    /// Platform conditions usable in `#if` clauses.
    pub enum CompilationCondition {
        Swift => kw(Keyword::Swift),
        Compiler => kw(Keyword::Compiler),
        CanImport => kw(Keyword::CanImport),
    }
}

token_spec_set! {
    /// Contextual keywords that act as declaration modifiers.
    pub enum ContextualDeclKeyword {
        UnderscoreConst => kw(Keyword::UnderscoreConst),
        UnderscoreLocal => kw(Keyword::UnderscoreLocal),
        Actor => kw(Keyword::Actor),
        Async => kw(Keyword::Async),
        Convenience => kw(Keyword::Convenience),
        Distributed => kw(Keyword::Distributed),
        Dynamic => kw(Keyword::Dynamic),
        Final => kw(Keyword::Final),
        Indirect => kw(Keyword::Indirect),
        Infix => kw(Keyword::Infix),
        Isolated => kw(Keyword::Isolated),
        Lazy => kw(Keyword::Lazy),
        Mutating => kw(Keyword::Mutating),
        Nonisolated => kw(Keyword::Nonisolated),
        Nonmutating => kw(Keyword::Nonmutating),
        Open => kw(Keyword::Open),
        Optional => kw(Keyword::Optional),
        Override => kw(Keyword::Override),
        Package => kw(Keyword::Package),
        Postfix => kw(Keyword::Postfix),
        Prefix => kw(Keyword::Prefix),
        Required => kw(Keyword::Required),
        Unowned => kw(Keyword::Unowned),
        Weak => kw(Keyword::Weak),
    }
}

token_spec_set! {
    /// Keywords that introduce a declaration.
    pub enum DeclarationKeyword {
        Actor => kw(Keyword::Actor).with_precedence(TokenPrecedence::DeclKeyword),
        Associatedtype => kw(Keyword::Associatedtype),
        Case => kw(Keyword::Case),
        Class => kw(Keyword::Class),
        Deinit => kw(Keyword::Deinit),
        Enum => kw(Keyword::Enum),
        Extension => kw(Keyword::Extension),
        Func => kw(Keyword::Func),
        Import => kw(Keyword::Import),
        Init => kw(Keyword::Init),
        Let => kw(Keyword::Let),
        Macro => kw(Keyword::Macro).with_precedence(TokenPrecedence::DeclKeyword),
        Operator => kw(Keyword::Operator),
        Precedencegroup => kw(Keyword::Precedencegroup),
        Protocol => kw(Keyword::Protocol),
        Struct => kw(Keyword::Struct),
        Subscript => kw(Keyword::Subscript),
        Typealias => kw(Keyword::Typealias),
        Var => kw(Keyword::Var),
        Inout => kw(Keyword::Inout).with_precedence(TokenPrecedence::DeclKeyword),
        /// A freestanding macro expansion: `#name(...)`.
        Pound => kind(RawTokenKind::Pound).with_precedence(TokenPrecedence::OpeningPoundIf),
    }
}

token_spec_set! {
    /// Modifiers that may precede a declaration keyword.
    pub enum DeclarationModifier {
        Async => kw(Keyword::Async).with_precedence(TokenPrecedence::DeclKeyword),
        Borrowing => kw(Keyword::Borrowing).with_precedence(TokenPrecedence::DeclKeyword),
        Consuming => kw(Keyword::Consuming).with_precedence(TokenPrecedence::DeclKeyword),
        Convenience => kw(Keyword::Convenience),
        Distributed => kw(Keyword::Distributed),
        Dynamic => kw(Keyword::Dynamic),
        Fileprivate => kw(Keyword::Fileprivate),
        Final => kw(Keyword::Final),
        Indirect => kw(Keyword::Indirect),
        Infix => kw(Keyword::Infix),
        Internal => kw(Keyword::Internal),
        Isolated => kw(Keyword::Isolated).with_precedence(TokenPrecedence::DeclKeyword),
        Lazy => kw(Keyword::Lazy),
        Mutating => kw(Keyword::Mutating),
        Nonisolated => kw(Keyword::Nonisolated),
        Nonmutating => kw(Keyword::Nonmutating),
        Open => kw(Keyword::Open),
        Optional => kw(Keyword::Optional),
        Override => kw(Keyword::Override),
        Package => kw(Keyword::Package),
        Postfix => kw(Keyword::Postfix),
        Prefix => kw(Keyword::Prefix),
        Private => kw(Keyword::Private),
        Public => kw(Keyword::Public),
        Reasync => kw(Keyword::Reasync).with_precedence(TokenPrecedence::DeclKeyword),
        Required => kw(Keyword::Required),
        Rethrows => kw(Keyword::Rethrows).with_precedence(TokenPrecedence::DeclKeyword),
        Static => kw(Keyword::Static),
        Unowned => kw(Keyword::Unowned).with_precedence(TokenPrecedence::DeclKeyword),
        Weak => kw(Keyword::Weak).with_precedence(TokenPrecedence::DeclKeyword),
        UnderscoreConst => kw(Keyword::UnderscoreConst).with_precedence(TokenPrecedence::DeclKeyword),
        UnderscoreLocal => kw(Keyword::UnderscoreLocal),
    }
}

token_spec_union! {
    /// Anything that can begin a declaration: modifiers first.
    pub enum DeclarationStart {
        Modifier(DeclarationModifier),
        Keyword(DeclarationKeyword),
    }
}

token_spec_set! {
    /// The three operator kinds whose spelling is free-form.
    pub enum Operator {
        Binary => kind(RawTokenKind::BinaryOperator),
        Postfix => kind(RawTokenKind::PostfixOperator),
        Prefix => kind(RawTokenKind::PrefixOperator),
    }
}

token_spec_set! {
    /// Punctuation lexed specially that names an operator in an operator
    /// declaration.
    pub enum OperatorLikePunctuation {
        ExclamationMark => kind(RawTokenKind::ExclamationMark)
            .with_remapping(RawTokenKind::PostfixOperator),
        InfixQuestionMark => kind(RawTokenKind::InfixQuestionMark)
            .with_remapping(RawTokenKind::BinaryOperator),
        PostfixQuestionMark => kind(RawTokenKind::PostfixQuestionMark)
            .with_remapping(RawTokenKind::PostfixOperator),
        PrefixAmpersand => kind(RawTokenKind::PrefixAmpersand)
            .with_remapping(RawTokenKind::PrefixOperator),
        Equal => kind(RawTokenKind::Equal).with_remapping(RawTokenKind::BinaryOperator),
        Arrow => kind(RawTokenKind::Arrow).with_remapping(RawTokenKind::BinaryOperator),
    }
}

token_spec_union! {
    /// Any token that can name an operator; punctuation is consumed as an
    /// operator kind.
    pub enum OperatorLike {
        Operator(Operator),
        Punctuation(OperatorLikePunctuation),
    }
}

token_spec_set! {
    /// Keywords that begin a `switch` case.
    pub enum SwitchCaseStart {
        Case => kw(Keyword::Case),
        Default => kw(Keyword::Default),
    }
}

token_spec_set! {
    /// Attributes with special meaning on types: `@escaping`, `@Sendable`.
    pub enum TypeAttribute {
        UnderscoreLocal => kw(Keyword::UnderscoreLocal),
        Async => kw(Keyword::Async),
        Autoclosure => kw(Keyword::Autoclosure),
        Convention => kw(Keyword::Convention),
        Differentiable => kw(Keyword::Differentiable),
        Escaping => kw(Keyword::Escaping),
        NoDerivative => kw(Keyword::NoDerivative),
        Noescape => kw(Keyword::Noescape),
        Sendable => kw(Keyword::Sendable),
        Unchecked => kw(Keyword::Unchecked),
    }
}

token_spec_set! {
    /// Ownership specifiers written before a type.
    pub enum TypeSpecifier {
        Inout => kw(Keyword::Inout),
        Owned => kw(Keyword::UnderscoreOwned),
        Shared => kw(Keyword::UnderscoreShared),
        Borrowing => kw(Keyword::Borrowing),
        Consuming => kw(Keyword::Consuming),
    }
}

token_spec_set! {
    /// Keywords that prefix an expression without being operators.
    pub enum ExpressionModifierKeyword {
        Await => kw(Keyword::Await),
        Move => kw(Keyword::UnderscoreMove),
        Borrow => kw(Keyword::UnderscoreBorrow),
        Try => kw(Keyword::Try),
        Consume => kw(Keyword::Consume),
        Copy => kw(Keyword::Copy),
    }
}

token_spec_set! {
    /// `if` and `switch`, which may be used as expressions.
    pub enum IfOrSwitch {
        If => kw(Keyword::If),
        Switch => kw(Keyword::Switch),
    }
}

token_spec_set! {
    /// Prefix operators at the start of an expression.
    pub enum ExpressionPrefixOperator {
        Backslash => kind(RawTokenKind::Backslash),
        PrefixAmpersand => kind(RawTokenKind::PrefixAmpersand),
        PrefixOperator => kind(RawTokenKind::PrefixOperator),
    }
}

token_spec_set! {
    /// Tokens that begin a pattern in a matching position.
    pub enum MatchingPatternStart {
        Is => kw(Keyword::Is),
        Let => kw(Keyword::Let),
        Var => kw(Keyword::Var),
        Inout => kw(Keyword::Inout),
    }
}

token_spec_set! {
    /// Modifiers that may precede a parameter type.
    pub enum ParameterModifier {
        UnderscoreConst => kw(Keyword::UnderscoreConst),
        Isolated => kw(Keyword::Isolated),
    }
}

token_spec_set! {
    /// Tokens that begin a primary expression.
    pub enum PrimaryExpressionStart {
        Any => kw(Keyword::Any),
        AtSign => kind(RawTokenKind::AtSign),
        CapitalSelf => kw(Keyword::SelfType),
        DollarIdentifier => kind(RawTokenKind::DollarIdentifier),
        False => kw(Keyword::False),
        FloatLiteral => kind(RawTokenKind::FloatLiteral),
        Identifier => kind(RawTokenKind::Identifier),
        Init => kw(Keyword::Init),
        IntegerLiteral => kind(RawTokenKind::IntegerLiteral),
        LeftBrace => kind(RawTokenKind::LeftBrace),
        LeftParen => kind(RawTokenKind::LeftParen),
        LeftSquare => kind(RawTokenKind::LeftSquare),
        Nil => kw(Keyword::Nil),
        Period => kind(RawTokenKind::Period),
        Pound => kind(RawTokenKind::Pound),
        SelfValue => kw(Keyword::SelfValue),
        StringLiteral => kind(RawTokenKind::StringLiteral),
        Super => kw(Keyword::Super),
        True => kw(Keyword::True),
        Wildcard => kind(RawTokenKind::Wildcard),
    }
}

token_spec_union! {
    /// Anything that can begin an expression.
    pub enum ExpressionStart {
        ModifierKeyword(ExpressionModifierKeyword),
        PrefixOperator(ExpressionPrefixOperator),
        Primary(PrimaryExpressionStart),
        IfOrSwitch(IfOrSwitch),
    }
}

token_spec_set! {
    /// Effect keywords in a function signature. `await`, `throw` and `try`
    /// only count when they do not begin a new line.
    pub enum EffectSpecifiers {
        Async => kw(Keyword::Async),
        Await => kw(Keyword::Await).with_line_position(LinePosition::NotAtStartOfLine),
        Reasync => kw(Keyword::Reasync),
        Rethrows => kw(Keyword::Rethrows),
        Throw => kw(Keyword::Throw).with_line_position(LinePosition::NotAtStartOfLine),
        Throws => kw(Keyword::Throws),
        Try => kw(Keyword::Try).with_line_position(LinePosition::NotAtStartOfLine),
    }
}

token_spec_set! {
    /// Keywords that mark a `{` as an accessor block rather than a closure.
    pub enum AccessorObserverKeyword {
        WillSet => kw(Keyword::WillSet),
        DidSet => kw(Keyword::DidSet),
        Init => kw(Keyword::Init),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source_analysis::{Lexer, LexemeCursor};

    /// Two specs overlap if some lexeme could satisfy both.
    fn overlaps(a: TokenSpec, b: TokenSpec) -> bool {
        match (a.expected_keyword(), b.expected_keyword()) {
            (Some(x), Some(y)) => x == y,
            (None, None) => a.raw_kind() == b.raw_kind(),
            (Some(keyword), None) | (None, Some(keyword)) => {
                let plain = if a.expected_keyword().is_none() { a } else { b };
                let keyword_kind = if keyword.is_reserved() {
                    RawTokenKind::Keyword
                } else {
                    RawTokenKind::Identifier
                };
                plain.raw_kind() == keyword_kind
            }
        }
    }

    fn assert_exclusive<S: TokenSpecSet + std::fmt::Debug>() {
        let cases = S::all_cases();
        for (i, a) in cases.iter().enumerate() {
            for b in &cases[i + 1..] {
                assert!(
                    !overlaps(a.spec(), b.spec()),
                    "{a:?} and {b:?} overlap in {}",
                    std::any::type_name::<S>()
                );
            }
        }
    }

    #[test]
    fn all_sets_are_mutually_exclusive() {
        assert_exclusive::<CanBeStatementStart>();
        assert_exclusive::<CompilationCondition>();
        assert_exclusive::<ContextualDeclKeyword>();
        assert_exclusive::<DeclarationKeyword>();
        assert_exclusive::<DeclarationModifier>();
        assert_exclusive::<DeclarationStart>();
        assert_exclusive::<Operator>();
        assert_exclusive::<OperatorLike>();
        assert_exclusive::<SwitchCaseStart>();
        assert_exclusive::<TypeAttribute>();
        assert_exclusive::<TypeSpecifier>();
        assert_exclusive::<ExpressionModifierKeyword>();
        assert_exclusive::<IfOrSwitch>();
        assert_exclusive::<ExpressionPrefixOperator>();
        assert_exclusive::<MatchingPatternStart>();
        assert_exclusive::<ParameterModifier>();
        assert_exclusive::<PrimaryExpressionStart>();
        assert_exclusive::<EffectSpecifiers>();
        assert_exclusive::<AccessorObserverKeyword>();
    }

    /// Every keyword alternative classifies its own spelling back to itself.
    fn assert_keyword_cases_round_trip<S: TokenSpecSet + PartialEq + std::fmt::Debug>() {
        for case in S::all_cases() {
            if let Some(keyword) = case.spec().expected_keyword() {
                let lexeme = Lexer::lex_at(keyword.text(), 0);
                assert_eq!(S::from_lexeme(&lexeme), Some(case), "{}", keyword.text());
            }
        }
    }

    #[test]
    fn keyword_alternatives_classify_their_spelling() {
        assert_keyword_cases_round_trip::<CanBeStatementStart>();
        assert_keyword_cases_round_trip::<DeclarationKeyword>();
        assert_keyword_cases_round_trip::<DeclarationModifier>();
        assert_keyword_cases_round_trip::<TypeAttribute>();
        assert_keyword_cases_round_trip::<PrimaryExpressionStart>();
        assert_keyword_cases_round_trip::<AccessorObserverKeyword>();
    }

    #[test]
    fn classification_miss_is_none() {
        let lexeme = Lexer::lex_at("banana", 0);
        assert_eq!(CanBeStatementStart::from_lexeme(&lexeme), None);
        assert_eq!(DeclarationStart::from_lexeme(&lexeme), None);
    }

    #[test]
    fn union_tries_members_in_order() {
        let lexeme = Lexer::lex_at("private", 0);
        assert_eq!(
            DeclarationStart::from_lexeme(&lexeme),
            Some(DeclarationStart::Modifier(DeclarationModifier::Private))
        );
        let lexeme = Lexer::lex_at("func", 0);
        assert_eq!(
            DeclarationStart::from_lexeme(&lexeme),
            Some(DeclarationStart::Keyword(DeclarationKeyword::Func))
        );
    }

    #[test]
    fn contextual_keyword_stays_identifier_elsewhere() {
        let lexeme = Lexer::lex_at("willSet", 0);
        assert_eq!(
            AccessorObserverKeyword::from_lexeme(&lexeme),
            Some(AccessorObserverKeyword::WillSet)
        );
        assert_eq!(
            PrimaryExpressionStart::from_lexeme(&lexeme),
            Some(PrimaryExpressionStart::Identifier)
        );
    }

    #[test]
    fn operator_like_carries_remapping() {
        let lexeme = Lexer::lex_at("x!", 1);
        assert_eq!(lexeme.kind(), RawTokenKind::ExclamationMark);
        let case = OperatorLike::from_lexeme(&lexeme);
        assert_eq!(
            case,
            Some(OperatorLike::Punctuation(OperatorLikePunctuation::ExclamationMark))
        );
        assert_eq!(
            case.map(|case| case.spec().consumed_kind()),
            Some(RawTokenKind::PostfixOperator)
        );
    }

    #[test]
    fn effect_specifiers_respect_line_position() {
        let mut cursor = LexemeCursor::new("f() try\ntry");
        for _ in 0..3 {
            cursor.advance();
        }
        assert_eq!(
            EffectSpecifiers::from_lexeme(&cursor.current()),
            Some(EffectSpecifiers::Try)
        );
        cursor.advance();
        assert_eq!(EffectSpecifiers::from_lexeme(&cursor.current()), None);
    }

    #[test]
    fn classification_is_deterministic() {
        let lexeme = Lexer::lex_at("static", 0);
        let first = DeclarationStart::from_lexeme(&lexeme);
        for _ in 0..10 {
            assert_eq!(DeclarationStart::from_lexeme(&lexeme), first);
        }
    }

    #[test]
    fn expression_start_union_order() {
        let cases = ExpressionStart::all_cases();
        assert!(matches!(cases.first(), Some(ExpressionStart::ModifierKeyword(_))));
        assert!(matches!(cases.last(), Some(ExpressionStart::IfOrSwitch(_))));
        let lexeme = Lexer::lex_at("await", 0);
        assert_eq!(
            ExpressionStart::from_lexeme(&lexeme),
            Some(ExpressionStart::ModifierKeyword(ExpressionModifierKeyword::Await))
        );
    }
}
