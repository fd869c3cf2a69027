// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Balanced skipping and precedence-bounded recovery.
//!
//! Skipping runs on an explicit stack of [`SkipState`]s, so deeply nested
//! brackets cost heap, not call stack. Every routine here is generic over
//! [`TokenConsumer`] and behaves the same on a lookahead fork and on the
//! parser.

use tracing::trace;

use super::consumer::{RecoveryConsumptionHandle, TokenConsumptionHandle};
use super::loop_progress::LoopProgressCondition;
use super::lookahead::{Lookahead, consume_attribute_name};
use super::token_spec_set::token_spec_set;
use super::{RawTokenKind, TokenConsumer, TokenPrecedence, TokenSpec};

token_spec_set! {
    /// Tokens that open a group skipped as a unit.
    pub(crate) enum BracketedTokens {
        LeftParen => TokenSpec::of(RawTokenKind::LeftParen),
        LeftBrace => TokenSpec::of(RawTokenKind::LeftBrace),
        LeftSquare => TokenSpec::of(RawTokenKind::LeftSquare),
        PoundIf => TokenSpec::of(RawTokenKind::PoundIf),
        PoundElse => TokenSpec::of(RawTokenKind::PoundElse),
        PoundElseif => TokenSpec::of(RawTokenKind::PoundElseif),
    }
}

impl BracketedTokens {
    /// Where skipping the body of this group stops.
    const fn body_stops(self) -> (TokenSpec, TokenSpec) {
        match self {
            Self::LeftParen => (
                TokenSpec::of(RawTokenKind::RightParen),
                TokenSpec::of(RawTokenKind::RightBrace),
            ),
            Self::LeftBrace => (
                TokenSpec::of(RawTokenKind::RightBrace),
                TokenSpec::of(RawTokenKind::RightBrace),
            ),
            Self::LeftSquare => (
                TokenSpec::of(RawTokenKind::RightSquare),
                TokenSpec::of(RawTokenKind::RightSquare),
            ),
            Self::PoundIf | Self::PoundElse | Self::PoundElseif => (
                TokenSpec::of(RawTokenKind::PoundElse),
                TokenSpec::of(RawTokenKind::PoundElseif),
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SkipState {
    /// Skip one token, or one bracketed group.
    SkipSingle,
    /// Close the group opened by `start` once its body is skipped.
    SkipSinglePost(BracketedTokens),
    /// Skip until either token, a directive other than `#if`, or end of file.
    SkipUntil(TokenSpec, TokenSpec),
}

const DIRECTIVE_STOPS: [TokenSpec; 3] = [
    TokenSpec::of(RawTokenKind::PoundEndif),
    TokenSpec::of(RawTokenKind::PoundElse),
    TokenSpec::of(RawTokenKind::PoundElseif),
];

pub(crate) fn skip<'src, C>(consumer: &mut C, initial: SkipState)
where
    C: TokenConsumer<'src> + ?Sized,
{
    let mut stack = vec![initial];
    while let Some(state) = stack.pop() {
        match state {
            SkipState::SkipSingle => {
                if let Some((start, handle)) = consumer.at_any_in::<BracketedTokens>() {
                    consumer.eat(handle);
                    let (t1, t2) = start.body_stops();
                    stack.push(SkipState::SkipSinglePost(start));
                    stack.push(SkipState::SkipUntil(t1, t2));
                } else if !consumer.at_eof() {
                    consumer.consume_any_token();
                }
            }
            SkipState::SkipSinglePost(start) => match start {
                BracketedTokens::LeftParen => {
                    consumer.consume_if(TokenSpec::of(RawTokenKind::RightParen));
                }
                BracketedTokens::LeftBrace => {
                    consumer.consume_if(TokenSpec::of(RawTokenKind::RightBrace));
                }
                BracketedTokens::LeftSquare => {
                    consumer.consume_if(TokenSpec::of(RawTokenKind::RightSquare));
                }
                BracketedTokens::PoundIf
                | BracketedTokens::PoundElse
                | BracketedTokens::PoundElseif => {
                    if consumer.at_any(&DIRECTIVE_STOPS[1..]) {
                        stack.push(SkipState::SkipSingle);
                    } else {
                        consumer.consume_if(TokenSpec::of(RawTokenKind::PoundEndif));
                    }
                }
            },
            SkipState::SkipUntil(t1, t2) => {
                if !consumer.at_eof()
                    && !consumer.at(t1)
                    && !consumer.at(t2)
                    && !consumer.at_any(&DIRECTIVE_STOPS)
                {
                    stack.push(SkipState::SkipUntil(t1, t2));
                    stack.push(SkipState::SkipSingle);
                }
            }
        }
    }
}

pub(crate) fn skip_until_end_of_line<'src, C>(consumer: &mut C)
where
    C: TokenConsumer<'src> + ?Sized,
{
    let mut progress = LoopProgressCondition::new();
    while !consumer.at_eof()
        && !consumer.at_start_of_line()
        && progress.evaluate(consumer.current_token())
    {
        consumer.skip_single();
    }
}

pub(crate) fn consume_attribute_list<'src, C>(consumer: &mut C) -> bool
where
    C: TokenConsumer<'src> + ?Sized,
{
    if !consumer.at_kind(RawTokenKind::AtSign) {
        return false;
    }

    let argument_stops = [
        TokenSpec::of(RawTokenKind::RightParen),
        TokenSpec::of(RawTokenKind::PoundEndif),
    ];
    while consumer
        .consume_if(TokenSpec::of(RawTokenKind::AtSign))
        .is_some()
    {
        consume_attribute_name(consumer);

        if consumer
            .consume_if(TokenSpec::of(RawTokenKind::LeftParen))
            .is_some()
        {
            let mut progress = LoopProgressCondition::new();
            while !consumer.at_eof()
                && !consumer.at_any(&argument_stops)
                && progress.evaluate(consumer.current_token())
            {
                consumer.skip_single();
            }
            consumer.consume_if(TokenSpec::of(RawTokenKind::RightParen));
        }
    }
    true
}

/// Consumes an `#if` block whose clauses hold only attributes and nested
/// `#if` blocks of the same shape, through its closing `#endif`.
///
/// The block is scanned on a fork first. Unless some clause held an
/// attribute and every `#endif` starts its own line, nothing is consumed.
pub(crate) fn consume_if_config_of_attributes<'src, C>(consumer: &mut C) -> bool
where
    C: TokenConsumer<'src> + ?Sized,
{
    assert!(
        consumer.at_kind(RawTokenKind::PoundIf),
        "attribute directive check requires the cursor at '#if'"
    );

    let mut fork = consumer.lookahead();
    if !scan_if_config_of_attributes(&mut fork) {
        return false;
    }
    // Replayed rather than counted: attribute generics may split `>>`.
    let accepted = scan_if_config_of_attributes(consumer);
    debug_assert!(accepted, "replayed directive scan diverged from lookahead");
    accepted
}

fn scan_if_config_of_attributes<'src, C>(consumer: &mut C) -> bool
where
    C: TokenConsumer<'src> + ?Sized,
{
    let start = consumer.current_token().text_start();
    let mut saw_attribute = false;
    let mut open_blocks = 0usize;
    let mut progress = LoopProgressCondition::new();
    while !consumer.at_eof() && progress.evaluate(consumer.current_token()) {
        match consumer.current_token().kind() {
            RawTokenKind::PoundIf => {
                open_blocks += 1;
                consumer.consume_any_token();
                consumer.skip_until_end_of_line();
            }
            RawTokenKind::PoundElseif | RawTokenKind::PoundElse => {
                consumer.consume_any_token();
                consumer.skip_until_end_of_line();
            }
            RawTokenKind::PoundEndif => {
                if !consumer.at_start_of_line() {
                    break;
                }
                consumer.consume_any_token();
                open_blocks -= 1;
                if open_blocks == 0 {
                    trace!(start, saw_attribute, "attribute directive block closed");
                    return saw_attribute;
                }
            }
            RawTokenKind::AtSign => {
                saw_attribute = true;
                consumer.consume_attribute_list();
            }
            _ => break,
        }
    }
    trace!(start, "not an attribute directive block");
    false
}

/// Scans `lookahead` forward for `spec`, consuming only tokens ranked below
/// it. Brackets opened along the way are skipped together with their
/// contents. `#else`, `#elseif` and `#endif` always stop the scan unless
/// they are the target.
pub(crate) fn can_recover_to(
    lookahead: &mut Lookahead<'_>,
    spec: TokenSpec,
) -> Option<RecoveryConsumptionHandle> {
    let initial = lookahead.tokens_consumed();
    let target = spec.recovery_precedence();
    let skip_over_newlines = target.should_skip_over_newlines();

    let mut progress = LoopProgressCondition::new();
    while !lookahead.at_eof() && progress.evaluate(lookahead.current_token()) {
        let current = lookahead.current_token();
        if !skip_over_newlines && current.is_at_start_of_line() {
            break;
        }
        if lookahead.at(spec) {
            let skipped = lookahead.tokens_consumed() - initial;
            trace!(%spec, skipped, "recovery target reachable");
            return Some(RecoveryConsumptionHandle::new(
                skipped,
                TokenConsumptionHandle::new(spec),
            ));
        }
        if TokenPrecedence::of(&current) >= target || lookahead.at_any(&DIRECTIVE_STOPS) {
            break;
        }

        let Some(closer) = current.kind().closing_delimiter() else {
            lookahead.consume_any_token();
            continue;
        };

        if let Some(group_len) = same_line_group_len(lookahead, current.kind(), closer) {
            for _ in 0..group_len {
                lookahead.consume_any_token();
            }
            continue;
        }

        let closing = TokenSpec::of(closer);
        lookahead.consume_any_token();
        lookahead.skip_until(closing, closing);
        if lookahead.consume_if(closing).is_none() {
            break;
        }
    }
    trace!(%spec, "recovery target not reachable");
    None
}

/// Counts the tokens of a bracketed group at the cursor if it closes on the
/// line it opens, before any closing directive.
fn same_line_group_len(
    lookahead: &Lookahead<'_>,
    opener: RawTokenKind,
    closer: RawTokenKind,
) -> Option<usize> {
    lookahead.with_lookahead(|scan| {
        scan.consume_any_token();
        let mut depth = 1usize;
        let mut progress = LoopProgressCondition::new();
        while !scan.at_eof()
            && !scan.at_start_of_line()
            && !scan.at_any(&DIRECTIVE_STOPS)
            && progress.evaluate(scan.current_token())
        {
            let kind = scan.consume_any_token().kind();
            if kind == opener {
                depth += 1;
            } else if kind == closer {
                depth -= 1;
                if depth == 0 {
                    return Some(scan.tokens_consumed());
                }
            }
        }
        None
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source_analysis::{Keyword, LexemeCursor};

    fn lookahead(source: &str) -> Lookahead<'_> {
        Lookahead::new(LexemeCursor::new(source))
    }

    /// A session positioned after a leading `_`, so the first token under
    /// test is not at the start of its line.
    fn mid_line(source: &str) -> Lookahead<'_> {
        let mut session = lookahead(source);
        session.consume_any_token();
        session
    }

    fn spec(kind: RawTokenKind) -> TokenSpec {
        TokenSpec::of(kind)
    }

    #[test]
    fn skip_single_plain_token() {
        let mut session = lookahead("a b");
        session.skip_single();
        assert_eq!(session.current_token().text(), "b");
    }

    #[test]
    fn skip_single_at_eof_is_a_no_op() {
        let mut session = lookahead("");
        session.skip_single();
        assert!(session.at_eof());
        assert_eq!(session.tokens_consumed(), 0);
    }

    #[test]
    fn skip_single_balanced_group() {
        let mut session = lookahead("( a ( b [ c ] ) d ) e");
        session.skip_single();
        assert_eq!(session.current_token().text(), "e");
        assert_eq!(session.tokens_consumed(), 10);
    }

    #[test]
    fn paren_body_stops_at_closing_brace() {
        let mut session = lookahead("( a } b");
        session.skip_single();
        assert_eq!(session.current_token().text(), "}");
    }

    #[test]
    fn unterminated_group_stops_at_eof() {
        let mut session = lookahead("{ a ( b");
        session.skip_single();
        assert!(session.at_eof());
    }

    #[test]
    fn deep_nesting_terminates() {
        let source = "(".repeat(10_000);
        let mut session = lookahead(&source);
        session.skip_single();
        assert!(session.at_eof());
        assert_eq!(session.tokens_consumed(), 10_000);
    }

    #[test]
    fn directive_group_skips_through_endif() {
        let mut session = lookahead("#if A\nx\n#elseif B\ny\n#else\nz\n#endif\nafter");
        session.skip_single();
        assert_eq!(session.current_token().text(), "after");
    }

    #[test]
    fn nested_directive_groups() {
        let mut session = lookahead("#if A\n#if B\nx\n#endif\n#else\ny\n#endif\nafter");
        session.skip_single();
        assert_eq!(session.current_token().text(), "after");
    }

    #[test]
    fn skip_until_stops_at_directives() {
        let mut session = lookahead("a b #endif c");
        session.skip_until(spec(RawTokenKind::Comma), spec(RawTokenKind::Comma));
        assert_eq!(session.current_token().kind(), RawTokenKind::PoundEndif);
    }

    #[test]
    fn skip_until_end_of_line_keeps_groups_whole() {
        let mut session = lookahead("a (b\nc) d\ne");
        session.consume_any_token();
        session.skip_until_end_of_line();
        assert_eq!(session.current_token().text(), "e");
    }

    #[test]
    fn attribute_list_with_arguments_and_generics() {
        let mut session = lookahead("@available(*, deprecated) @Wrapper<Int>.Inner @objc x");
        assert!(session.consume_attribute_list());
        assert_eq!(session.current_token().text(), "x");
    }

    #[test]
    fn attribute_list_requires_at_sign() {
        let mut session = lookahead("x");
        assert!(!session.consume_attribute_list());
        assert_eq!(session.tokens_consumed(), 0);
    }

    #[test]
    fn attribute_arguments_stop_at_endif() {
        let mut session = lookahead("@foo(a\n#endif");
        assert!(session.consume_attribute_list());
        assert_eq!(session.current_token().kind(), RawTokenKind::PoundEndif);
    }

    #[test]
    fn if_config_of_attributes_accepted() {
        let mut session = lookahead("#if DEBUG\n@inlinable\n#else\n@usableFromInline\n#endif\nfunc f()");
        assert!(session.consume_if_config_of_attributes());
        assert_eq!(session.current_token().text(), "func");
    }

    #[test]
    fn if_config_with_nested_attribute_block() {
        let mut session =
            lookahead("#if A\n#if B\n@objc\n#endif\n#endif\nvar x");
        assert!(session.consume_if_config_of_attributes());
        assert_eq!(session.current_token().text(), "var");
    }

    #[test]
    fn if_config_with_every_clause_kind() {
        let mut session = lookahead("#if X\n@A\n#elseif Y\n@B(1)\n#else\n@C\n#endif\nnext");
        assert!(session.consume_if_config_of_attributes());
        assert_eq!(session.current_token().text(), "next");
    }

    /// Rejection leaves the cursor on the `#if`.
    fn assert_rejected(source: &str) {
        let mut session = lookahead(source);
        assert!(!session.consume_if_config_of_attributes(), "accepted {source:?}");
        assert_eq!(session.tokens_consumed(), 0, "moved on {source:?}");
        assert_eq!(session.current_token().kind(), RawTokenKind::PoundIf);
    }

    #[test]
    fn if_config_with_statement_in_any_clause_consumes_nothing() {
        assert_rejected("#if X\nfoo()\n#elseif Y\n@B(1)\n#else\n@C\n#endif\nnext");
        assert_rejected("#if X\n@A\n#elseif Y\nfoo()\n#else\n@C\n#endif\nnext");
        assert_rejected("#if X\n@A\n#elseif Y\n@B(1)\n#else\nfoo()\n#endif\nnext");
    }

    #[test]
    fn if_config_with_declaration_rejected() {
        assert_rejected("#if DEBUG\n@objc func f()\n#endif");
    }

    #[test]
    fn if_config_without_attributes_rejected() {
        assert_rejected("#if DEBUG\n#endif");
    }

    #[test]
    fn if_config_unterminated_rejected() {
        assert_rejected("#if DEBUG\n@objc");
    }

    #[test]
    fn if_config_endif_on_attribute_line_rejected() {
        assert_rejected("#if DEBUG\n@objc #endif");
    }

    #[test]
    fn rejected_if_config_leaves_cursor_mid_line() {
        let mut session = mid_line("_ #if X\n@A\n#else\nfoo()\n#endif");
        assert!(!session.consume_if_config_of_attributes());
        assert_eq!(session.tokens_consumed(), 1);
    }

    #[test]
    fn recover_over_low_precedence_tokens() {
        let session = mid_line("_ x ( a ( b [ c ] ) d ) ) y");
        let handle = session
            .can_recover_to(spec(RawTokenKind::RightParen))
            .expect("')' is reachable");
        assert_eq!(handle.unexpected_tokens(), 11);
    }

    #[test]
    fn recovery_stops_at_higher_precedence() {
        let session = mid_line("_ a b func f )");
        assert!(session.can_recover_to(spec(RawTokenKind::RightParen)).is_none());
    }

    #[test]
    fn recovery_to_weak_token_stops_at_newline() {
        let session = mid_line("_ a b\n)");
        assert!(session.can_recover_to(spec(RawTokenKind::RightParen)).is_none());
    }

    #[test]
    fn recovery_to_brace_crosses_lines_only_when_allowed() {
        let session = mid_line("_ a\nb }");
        assert!(session.can_recover_to(spec(RawTokenKind::RightBrace)).is_none());
        let session = mid_line("_ a b }");
        assert_eq!(
            session
                .can_recover_to(spec(RawTokenKind::RightBrace))
                .map(|handle| handle.unexpected_tokens()),
            Some(2)
        );
    }

    #[test]
    fn recovery_to_statement_keyword_crosses_lines() {
        let session = mid_line("_ a\nb\nreturn");
        let handle = session
            .can_recover_to(TokenSpec::keyword(Keyword::Return))
            .expect("'return' is reachable");
        assert_eq!(handle.unexpected_tokens(), 2);
    }

    #[test]
    fn recovery_skips_multiline_group() {
        let session = mid_line("_ a (\nb\n) }");
        let handle = session
            .can_recover_to(spec(RawTokenKind::RightBrace))
            .expect("'}' is reachable");
        assert_eq!(handle.unexpected_tokens(), 4);
    }

    #[test]
    fn consume_to_is_all_or_nothing() {
        let mut session = mid_line("_ a b { c");
        assert!(session.consume_to(spec(RawTokenKind::RightBrace)).is_none());
        assert_eq!(session.tokens_consumed(), 1);
        assert_eq!(session.current_token().text(), "a");

        let mut session = mid_line("_ a b } c");
        let recovered = session
            .consume_to(spec(RawTokenKind::RightBrace))
            .expect("'}' is reachable");
        assert_eq!(recovered.unexpected.len(), 2);
        assert_eq!(recovered.token.text(), "}");
        assert_eq!(session.current_token().text(), "c");
    }

    #[test]
    fn recovery_stops_at_closing_directive() {
        let session = mid_line("_ a #endif b var");
        assert!(session.can_recover_to(TokenSpec::keyword(Keyword::Var)).is_none());

        let mut session = mid_line("_ a\n#else\nb\nfunc");
        assert!(session.consume_to(TokenSpec::keyword(Keyword::Func)).is_none());
        assert_eq!(session.tokens_consumed(), 1);
        assert_eq!(session.current_token().text(), "a");
    }

    #[test]
    fn recovery_does_not_cross_directive_inside_group() {
        let session = mid_line("_ a ( #endif ) )");
        assert!(session.can_recover_to(spec(RawTokenKind::RightParen)).is_none());
    }

    #[test]
    fn recovery_can_target_a_closing_directive() {
        let mut session = mid_line("_ a b #endif c");
        let recovered = session
            .consume_to(spec(RawTokenKind::PoundEndif))
            .expect("'#endif' is reachable");
        assert_eq!(recovered.unexpected.len(), 2);
        assert_eq!(session.current_token().text(), "c");
    }

    #[test]
    fn recovery_from_start_of_line_stops_for_weak_targets() {
        let session = lookahead("a )");
        assert!(session.can_recover_to(spec(RawTokenKind::RightParen)).is_none());
    }

    #[test]
    fn consume_to_current_token() {
        let mut session = lookahead(") x");
        let recovered = session
            .consume_to(spec(RawTokenKind::RightParen))
            .expect("')' is current");
        assert!(recovered.unexpected.is_empty());
        assert_eq!(session.current_token().text(), "x");
    }
}
