// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Declaration parsing: attributes, modifiers, variables, operators and type
//! member blocks.

use super::Parser;
use crate::ast::{
    Accessor, AccessorBlock, Attribute, Declaration, Initializer, Item, MemberBlock, Modifier,
    OperatorDecl, TokenId, TokenRange, TypeAnnotation, TypeDecl, VariableDecl, VariablePattern,
};
use crate::source_analysis::lookahead::consume_attribute_name;
use crate::source_analysis::{
    AccessorObserverKeyword, DeclarationKeyword, DeclarationModifier, DeclarationStart,
    ExpressionStart, Keyword, LoopProgressCondition, OperatorLike, ParseError, RawTokenKind,
    Span, TokenConsumer, TokenConsumptionHandle, TokenSpec, TokenSpecSet,
};

impl Parser<'_> {
    /// Parses a declaration. The caller has checked, on a fork, that a
    /// declaration keyword follows the attributes and modifiers.
    pub(super) fn parse_declaration(&mut self) -> Item {
        let attributes = self.parse_attributes();
        let modifiers = self.parse_modifiers();

        let Some((keyword, handle)) = self.at_any_in::<DeclarationKeyword>() else {
            let keyword = self.missing(RawTokenKind::Keyword, "declaration");
            let start = self.next_id();
            self.skip_line();
            return Item::Declaration(Declaration {
                attributes,
                modifiers,
                keyword,
                tokens: self.range_from(start),
            });
        };

        match keyword {
            DeclarationKeyword::Var | DeclarationKeyword::Let => {
                Item::Variable(self.parse_variable(attributes, modifiers, handle))
            }
            DeclarationKeyword::Operator => {
                let operator_keyword = self.eat(handle);
                Item::Operator(self.parse_operator(attributes, modifiers, operator_keyword))
            }
            DeclarationKeyword::Struct
            | DeclarationKeyword::Class
            | DeclarationKeyword::Enum
            | DeclarationKeyword::Extension
            | DeclarationKeyword::Protocol
            | DeclarationKeyword::Actor => {
                let keyword = self.eat(handle);
                self.parse_type_decl(attributes, modifiers, keyword)
            }
            _ => {
                let keyword = self.eat(handle);
                let start = self.next_id();
                self.skip_line();
                Item::Declaration(Declaration {
                    attributes,
                    modifiers,
                    keyword,
                    tokens: self.range_from(start),
                })
            }
        }
    }

    fn parse_attributes(&mut self) -> Vec<Attribute> {
        let mut attributes = Vec::new();
        let mut progress = LoopProgressCondition::new();
        while self.at_kind(RawTokenKind::AtSign) && progress.evaluate(self.current_token()) {
            let at_sign = self.consume_any_token();
            let start = self.next_id();
            consume_attribute_name(self);
            if self.at_kind(RawTokenKind::LeftParen) {
                self.skip_group();
            }
            attributes.push(Attribute {
                at_sign,
                tokens: self.range_from(start),
            });
        }
        attributes
    }

    /// Modifiers such as `public`, `private(set)` or `static`. `class` is a
    /// modifier only when another declaration keyword or modifier follows.
    fn parse_modifiers(&mut self) -> Vec<Modifier> {
        let mut modifiers = Vec::new();
        let mut progress = LoopProgressCondition::new();
        while progress.evaluate(self.current_token()) {
            let keyword = if let Some((_, handle)) = self.at_any_in::<DeclarationModifier>() {
                self.eat(handle)
            } else if self.at(TokenSpec::keyword(Keyword::Class))
                && DeclarationStart::from_lexeme(&self.peek()).is_some()
            {
                self.consume_any_token()
            } else {
                break;
            };
            let detail = self.at_kind(RawTokenKind::LeftParen).then(|| {
                let start = self.next_id();
                self.skip_group();
                self.range_from(start)
            });
            modifiers.push(Modifier { keyword, detail });
        }
        modifiers
    }

    // ========================================================================
    // Variables
    // ========================================================================

    fn parse_variable(
        &mut self,
        attributes: Vec<Attribute>,
        modifiers: Vec<Modifier>,
        handle: TokenConsumptionHandle,
    ) -> VariableDecl {
        let binding = self.eat(handle);
        let pattern = self.parse_variable_pattern();

        let type_annotation = self
            .consume_if(TokenSpec::of(RawTokenKind::Colon))
            .map(|colon| TypeAnnotation {
                colon,
                ty: self.parse_type(),
            });

        let initializer = self
            .consume_if(TokenSpec::of(RawTokenKind::Equal))
            .map(|equal| Initializer {
                equal,
                value: self.parse_initializer_value(),
            });

        let accessors = self
            .at_kind(RawTokenKind::LeftBrace)
            .then(|| self.parse_accessor_block());

        VariableDecl {
            attributes,
            modifiers,
            binding,
            pattern,
            type_annotation,
            initializer,
            accessors,
        }
    }

    fn parse_variable_pattern(&mut self) -> VariablePattern {
        let name_specs = [
            TokenSpec::of(RawTokenKind::Identifier),
            TokenSpec::of(RawTokenKind::Wildcard),
        ];
        if let Some(name) = self.consume_if_any(&name_specs) {
            return VariablePattern::Name(name);
        }
        if self.at_kind(RawTokenKind::LeftParen) {
            let start = self.next_id();
            self.skip_group();
            return VariablePattern::Tuple(self.range_from(start));
        }
        VariablePattern::Name(self.missing_token(TokenSpec::of(RawTokenKind::Identifier)))
    }

    /// The tokens of an initializer expression: the rest of the line, except
    /// that a `{` opening an accessor block ends it.
    fn parse_initializer_value(&mut self) -> TokenRange {
        let start = self.next_id();
        if self.at_any_in::<ExpressionStart>().is_none() {
            let offset = self.current_token().text_start();
            self.errors
                .push(ParseError::expected("expression", Span::empty_at(offset)));
            return self.range_from(start);
        }

        self.skip_group();
        let mut progress = LoopProgressCondition::new();
        while !self.at_eof()
            && !self.at_start_of_line()
            && !self.at_kind(RawTokenKind::RightBrace)
            && !(self.at_kind(RawTokenKind::LeftBrace)
                && self.lookahead().is_start_of_get_set_accessor())
            && progress.evaluate(self.current_token())
        {
            self.skip_group();
        }
        self.range_from(start)
    }

    /// `{ willSet { } didSet { } }`, or a computed property body.
    fn parse_accessor_block(&mut self) -> AccessorBlock {
        if !self.lookahead().is_start_of_get_set_accessor() {
            let start = self.next_id();
            self.skip_group();
            return AccessorBlock::Getter(self.range_from(start));
        }

        let left_brace = self.consume_any_token();
        let mut accessors = Vec::new();
        let mut progress = LoopProgressCondition::new();
        while !self.at_eof()
            && !self.at_kind(RawTokenKind::RightBrace)
            && progress.evaluate(self.current_token())
        {
            let is_accessor = self.with_lookahead(|lookahead| {
                lookahead.consume_attribute_list();
                lookahead.at_any_in::<AccessorObserverKeyword>().is_some()
            });
            if !is_accessor {
                break;
            }
            accessors.push(self.parse_accessor());
        }

        let (unexpected, right_brace) = self.recover_to_closing_brace();
        AccessorBlock::Observers {
            left_brace,
            accessors,
            unexpected,
            right_brace,
        }
    }

    fn parse_accessor(&mut self) -> Accessor {
        let attributes = self.parse_attributes();
        let keyword = match self.at_any_in::<AccessorObserverKeyword>() {
            Some((_, handle)) => self.eat(handle),
            None => self.missing(RawTokenKind::Identifier, "accessor"),
        };
        let parameter = self.at_kind(RawTokenKind::LeftParen).then(|| {
            let start = self.next_id();
            self.skip_group();
            self.range_from(start)
        });
        let body = self.at_kind(RawTokenKind::LeftBrace).then(|| {
            let start = self.next_id();
            self.skip_group();
            self.range_from(start)
        });
        Accessor {
            attributes,
            keyword,
            parameter,
            body,
        }
    }

    // ========================================================================
    // Operators
    // ========================================================================

    /// `prefix operator +++` and the like. Punctuation such as `=` or `?`
    /// names an operator here and is recorded as an operator token.
    fn parse_operator(
        &mut self,
        attributes: Vec<Attribute>,
        modifiers: Vec<Modifier>,
        operator_keyword: TokenId,
    ) -> OperatorDecl {
        let name = match self.at_any_in::<OperatorLike>() {
            Some((_, handle)) => self.eat(handle),
            None => self.missing(RawTokenKind::BinaryOperator, "operator name"),
        };
        let start = self.next_id();
        self.skip_line();
        OperatorDecl {
            attributes,
            modifiers,
            operator_keyword,
            name,
            rest: self.range_from(start),
        }
    }

    // ========================================================================
    // Types with members
    // ========================================================================

    fn parse_type_decl(
        &mut self,
        attributes: Vec<Attribute>,
        modifiers: Vec<Modifier>,
        keyword: TokenId,
    ) -> Item {
        let header_start = self.next_id();
        let mut progress = LoopProgressCondition::new();
        while !self.at_eof()
            && !self.at_kind(RawTokenKind::LeftBrace)
            && !self.at_start_of_line()
            && progress.evaluate(self.current_token())
        {
            self.skip_group();
        }
        let header = self.range_from(header_start);

        if !self.at_kind(RawTokenKind::LeftBrace) {
            self.missing_token(TokenSpec::of(RawTokenKind::LeftBrace));
            return Item::Declaration(Declaration {
                attributes,
                modifiers,
                keyword,
                tokens: self.range_from(header_start),
            });
        }

        if !self.enter_nesting() {
            self.skip_group();
            return Item::Declaration(Declaration {
                attributes,
                modifiers,
                keyword,
                tokens: self.range_from(header_start),
            });
        }
        let members = stacker::maybe_grow(32 * 1024, 256 * 1024, || self.parse_member_block());
        self.leave_nesting();

        Item::Type(TypeDecl {
            attributes,
            modifiers,
            keyword,
            header,
            members,
        })
    }

    fn parse_member_block(&mut self) -> MemberBlock {
        let left_brace = self.consume_any_token();
        let items = self.parse_items(true);
        let right_brace = self.expect(TokenSpec::of(RawTokenKind::RightBrace));
        MemberBlock {
            left_brace,
            items,
            right_brace,
        }
    }
}
