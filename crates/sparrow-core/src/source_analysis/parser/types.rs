// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Type syntax.
//!
//! Generic argument lists are only parsed after a successful speculative
//! scan, so `a < b` in an initializer never reaches this code and a closing
//! `>>` is split one angle at a time.

use super::Parser;
use crate::ast::{GenericArguments, TokenRange, TypeBase, TypeComponent, TypeSyntax};
use crate::source_analysis::{
    EffectSpecifiers, Keyword, LoopProgressCondition, RawTokenKind, TokenConsumer, TokenSpec,
    TypeSpecifier,
};

impl Parser<'_> {
    /// Parses a type, bounded by the nesting limit.
    pub(super) fn parse_type(&mut self) -> TypeSyntax {
        if !self.enter_nesting() {
            let skipped = self.skip_too_deep_type();
            return TypeSyntax {
                specifier: None,
                attributes: Vec::new(),
                base: TypeBase::TooDeep(skipped),
                suffixes: Vec::new(),
            };
        }
        let ty = stacker::maybe_grow(32 * 1024, 256 * 1024, || self.parse_type_inner());
        self.leave_nesting();
        ty
    }

    fn parse_type_inner(&mut self) -> TypeSyntax {
        let specifier = self
            .at_any_in::<TypeSpecifier>()
            .map(|(_, handle)| self.eat(handle));

        let mut attributes = Vec::new();
        let mut progress = LoopProgressCondition::new();
        while self.at_kind(RawTokenKind::AtSign) && progress.evaluate(self.current_token()) {
            let start = self.next_id();
            self.consume_any_token();
            self.skip_type_attribute();
            attributes.push(self.range_from(start));
        }

        let base = self.parse_type_base();

        let mut suffixes = Vec::new();
        let suffix_specs = [
            TokenSpec::of(RawTokenKind::PostfixQuestionMark),
            TokenSpec::of(RawTokenKind::ExclamationMark),
        ];
        while let Some(suffix) = self.consume_if_any(&suffix_specs) {
            suffixes.push(suffix);
        }

        TypeSyntax {
            specifier,
            attributes,
            base,
            suffixes,
        }
    }

    fn parse_type_base(&mut self) -> TypeBase {
        match self.current_token().kind() {
            RawTokenKind::LeftParen => self.parse_tuple_or_function_type(),
            RawTokenKind::LeftSquare => {
                let start = self.next_id();
                self.skip_group();
                TypeBase::Group(self.range_from(start))
            }
            RawTokenKind::Identifier => TypeBase::Path(self.parse_type_path()),
            _ if self.at(TokenSpec::keyword(Keyword::SelfType))
                || self.at(TokenSpec::keyword(Keyword::Any)) =>
            {
                TypeBase::Path(self.parse_type_path())
            }
            _ => TypeBase::Missing(self.missing(RawTokenKind::Identifier, "type")),
        }
    }

    /// `(A, B)` or `(A) async throws -> B`.
    fn parse_tuple_or_function_type(&mut self) -> TypeBase {
        let start = self.next_id();
        self.skip_group();
        let parameters = self.range_from(start);

        let is_function = self.with_lookahead(|lookahead| {
            let mut progress = LoopProgressCondition::new();
            while lookahead.at_any_in::<EffectSpecifiers>().is_some()
                && progress.evaluate(lookahead.current_token())
            {
                lookahead.consume_any_token();
                if lookahead.at_kind(RawTokenKind::LeftParen) {
                    lookahead.skip_single();
                }
            }
            lookahead.at_kind(RawTokenKind::Arrow)
        });
        if !is_function {
            return TypeBase::Group(parameters);
        }

        let mut effects = Vec::new();
        let mut progress = LoopProgressCondition::new();
        while progress.evaluate(self.current_token()) {
            let Some((_, handle)) = self.at_any_in::<EffectSpecifiers>() else {
                break;
            };
            effects.push(self.eat(handle));
            // Typed throws: `throws(MyError)`.
            if self.at_kind(RawTokenKind::LeftParen) {
                self.skip_group();
            }
        }
        let arrow = self.expect(TokenSpec::of(RawTokenKind::Arrow));
        let result = Box::new(self.parse_type());
        TypeBase::Function {
            parameters,
            effects,
            arrow,
            result,
        }
    }

    /// `Swift.Dictionary<String, Int>.Index`.
    fn parse_type_path(&mut self) -> Vec<TypeComponent> {
        let mut components = Vec::new();
        let mut progress = LoopProgressCondition::new();
        loop {
            let name = self.consume_any_token();
            let generic_arguments = self
                .at_generic_argument_list()
                .then(|| self.parse_generic_arguments());
            components.push(TypeComponent {
                name,
                generic_arguments,
            });

            if !self.at_kind(RawTokenKind::Period)
                || self.at_start_of_line()
                || !progress.evaluate(self.current_token())
            {
                break;
            }
            self.consume_any_token();
            if !self.at_kind(RawTokenKind::Identifier) {
                let missing = self.missing(RawTokenKind::Identifier, "member type name");
                components.push(TypeComponent {
                    name: missing,
                    generic_arguments: None,
                });
                break;
            }
        }
        components
    }

    fn at_generic_argument_list(&self) -> bool {
        self.at_operator_prefix("<")
            && !self.at_kind(RawTokenKind::PrefixOperator)
            && self.lookahead().consume_generic_arguments()
    }

    fn parse_generic_arguments(&mut self) -> GenericArguments {
        let left_angle = self.consume_prefix("<", RawTokenKind::LeftAngle);
        let mut arguments = Vec::new();
        let mut progress = LoopProgressCondition::new();
        while !self.at_eof()
            && !self.at_operator_prefix(">")
            && progress.evaluate(self.current_token())
        {
            arguments.push(self.parse_type());
            if self.consume_if(TokenSpec::of(RawTokenKind::Comma)).is_none() {
                break;
            }
        }
        let right_angle = if self.at_operator_prefix(">") {
            self.consume_prefix(">", RawTokenKind::RightAngle)
        } else {
            self.missing(RawTokenKind::RightAngle, "'>'")
        };
        GenericArguments {
            left_angle,
            arguments,
            right_angle,
        }
    }

    /// Skips the rest of a type once the nesting limit is hit, stopping
    /// where an enclosing type list or declaration would continue. Angle
    /// brackets opened inside the skipped text are closed inside it.
    fn skip_too_deep_type(&mut self) -> TokenRange {
        let stops = [
            TokenSpec::of(RawTokenKind::Comma),
            TokenSpec::of(RawTokenKind::RightParen),
            TokenSpec::of(RawTokenKind::RightSquare),
            TokenSpec::of(RawTokenKind::Equal),
            TokenSpec::of(RawTokenKind::LeftBrace),
            TokenSpec::of(RawTokenKind::RightBrace),
        ];
        let start = self.next_id();
        let mut open_angles = 0usize;
        let mut progress = LoopProgressCondition::new();
        while !self.at_eof()
            && !(self.next_id() != start && self.at_start_of_line())
            && progress.evaluate(self.current_token())
        {
            if self.at_operator_prefix(">") {
                if open_angles == 0 {
                    break;
                }
                open_angles -= 1;
                self.consume_prefix(">", RawTokenKind::RightAngle);
                continue;
            }
            if open_angles == 0 && self.at_any(&stops) {
                break;
            }
            if self.at_operator_prefix("<") {
                open_angles += 1;
            }
            self.skip_group();
        }
        self.range_from(start)
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{parse_err, parse_ok};
    use crate::ast::{Item, SourceFile, TypeBase, TypeSyntax};
    use crate::source_analysis::{ParseOptions, RawTokenKind, parse};

    fn annotation(file: &SourceFile) -> &TypeSyntax {
        let Item::Variable(decl) = &file.items()[0] else {
            panic!("expected variable, got {:?}", file.items()[0]);
        };
        &decl.type_annotation.as_ref().expect("type annotation").ty
    }

    #[test]
    fn dotted_path_with_generics() {
        let file = parse_ok("var i: Swift.Dictionary<String, Int>.Index\n");
        let TypeBase::Path(components) = &annotation(&file).base else {
            panic!("expected path");
        };
        assert_eq!(components.len(), 3);
        let arguments = components[1].generic_arguments.as_ref().expect("generics");
        assert_eq!(arguments.arguments.len(), 2);
        assert!(components[2].generic_arguments.is_none());
    }

    #[test]
    fn optional_suffixes() {
        let file = parse_ok("var s: String?\nvar t: Int!\n");
        assert_eq!(annotation(&file).suffixes.len(), 1);
    }

    #[test]
    fn function_type_with_effects() {
        let file = parse_ok("let f: @escaping (Int) async throws -> [String]\n");
        let ty = annotation(&file);
        assert_eq!(ty.attributes.len(), 1);
        let TypeBase::Function { effects, result, .. } = &ty.base else {
            panic!("expected function type, got {:?}", ty.base);
        };
        assert_eq!(effects.len(), 2);
        assert!(matches!(result.base, TypeBase::Group(_)));
    }

    #[test]
    fn typed_throws() {
        let file = parse_ok("let f: () throws(E) -> Void\n");
        assert!(matches!(annotation(&file).base, TypeBase::Function { .. }));
    }

    #[test]
    fn tuple_type_is_a_group() {
        let file = parse_ok("var p: (x: Int, y: Int)\n");
        assert!(matches!(annotation(&file).base, TypeBase::Group(_)));
    }

    #[test]
    fn convention_attribute() {
        let file = parse_ok("let f: @convention(c) (Int) -> Int\n");
        let ty = annotation(&file);
        assert_eq!(file.range_text(ty.attributes[0]), "@convention(c)");
    }

    #[test]
    fn specifier_before_type() {
        let file = parse_ok("let f: (inout Int) -> Void\nvar g: borrowing Int\n");
        let Item::Variable(decl) = &file.items()[1] else {
            panic!("expected variable");
        };
        let ty = &decl.type_annotation.as_ref().expect("type").ty;
        assert!(ty.specifier.is_some());
    }

    #[test]
    fn space_before_angle_is_not_generic() {
        let (file, _) = parse("var x: Array <Int>\n", ParseOptions::default());
        let TypeBase::Path(components) = &annotation(&file).base else {
            panic!("expected path");
        };
        assert!(components[0].generic_arguments.is_none());
        assert!(matches!(file.items()[1], Item::Statement(_)));
    }

    #[test]
    fn generic_closer_followed_by_initializer() {
        let file = parse_ok("var s: Set<Int> = []\n");
        let Item::Variable(decl) = &file.items()[0] else {
            panic!("expected variable");
        };
        assert!(decl.initializer.is_some());
        let right = file
            .tokens()
            .iter()
            .find(|token| token.kind() == RawTokenKind::RightAngle)
            .expect("right angle");
        assert_eq!(right.text(), ">");
    }

    #[test]
    fn missing_type() {
        let (file, errors) = parse_err("var x: = 1\n");
        assert!(matches!(annotation(&file).base, TypeBase::Missing(_)));
        assert_eq!(errors[0].to_string(), "expected type");
    }

    #[test]
    fn too_deep_type_skips_to_the_closer() {
        let options = ParseOptions::default().with_max_nesting_depth(1);
        let (file, errors) = parse("var x: A<B<C>, D> = y\n", options);
        let TypeBase::Path(components) = &annotation(&file).base else {
            panic!("expected path");
        };
        let arguments = &components[0].generic_arguments.as_ref().expect("generics").arguments;
        assert_eq!(arguments.len(), 2);
        let TypeBase::TooDeep(skipped) = arguments[0].base else {
            panic!("expected skipped type, got {:?}", arguments[0].base);
        };
        assert_eq!(file.range_text(skipped), "B<C>");
        assert_eq!(errors.len(), 2);
        let Item::Variable(decl) = &file.items()[0] else {
            panic!("expected variable");
        };
        assert!(decl.initializer.is_some());
    }
}
