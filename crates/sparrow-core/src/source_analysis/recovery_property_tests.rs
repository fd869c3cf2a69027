// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Property-based tests for skipping and precedence-bounded recovery.
//!
//! 1. **Skipping terminates** and always moves unless at end of file
//! 2. **Recovery checks do not move** the cursor they run on
//! 3. **Recovery replays exactly**: consuming the reported number of
//!    unexpected tokens lands on the target
//! 4. **Recovery never crosses a stronger token**
//! 5. **Directive scans are deterministic** and all or nothing
//! 6. **Recovery never crosses a closing directive**

use proptest::prelude::*;

use super::{
    LexemeCursor, Lookahead, RawTokenKind, TokenConsumer, TokenPrecedence, TokenSpec,
};

// ============================================================================
// Generators
// ============================================================================

const RECOVERY_FRAGMENTS: &[&str] = &[
    " a",
    " b",
    " 1",
    " +",
    " ,",
    " :",
    " (",
    " )",
    " [",
    " ]",
    " {",
    " }",
    "\n",
    " var",
    " func",
    " return",
    " if",
    " @attr",
    "\n#if X",
    "\n#elseif Y",
    "\n#else",
    "\n#endif",
    " #endif",
];

fn recovery_source() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(RECOVERY_FRAGMENTS), 0..80)
        .prop_map(|fragments| format!("_{}", fragments.concat()))
}

/// Like [`recovery_source`], without bracket groups.
fn flat_source() -> impl Strategy<Value = String> {
    let flat: Vec<&str> = RECOVERY_FRAGMENTS
        .iter()
        .copied()
        .filter(|fragment| !fragment.contains(['(', '[', '{']))
        .collect();
    prop::collection::vec(prop::sample::select(flat), 0..80)
        .prop_map(|fragments| format!("_{}", fragments.concat()))
}

fn recovery_target() -> impl Strategy<Value = TokenSpec> {
    prop::sample::select(vec![
        TokenSpec::of(RawTokenKind::RightParen),
        TokenSpec::of(RawTokenKind::RightSquare),
        TokenSpec::of(RawTokenKind::RightBrace),
        TokenSpec::of(RawTokenKind::Colon),
        TokenSpec::of(RawTokenKind::Comma),
    ])
}

/// A session positioned after the leading `_`, so the first real token is
/// never at the start of a line.
fn mid_line(source: &str) -> Lookahead<'_> {
    let mut lookahead = Lookahead::new(LexemeCursor::new(source));
    lookahead.consume_any_token();
    lookahead
}

/// Default is 512 cases; override via `PROPTEST_CASES` env var for nightly runs.
fn proptest_config() -> ProptestConfig {
    let default = ProptestConfig::default();
    ProptestConfig {
        cases: default.cases.max(512),
        ..default
    }
}

proptest! {
    #![proptest_config(proptest_config())]

    /// Property 1: repeated `skip_single` reaches end of file, one step at a
    /// time, on any input.
    #[test]
    fn skip_single_always_progresses(input in "\\PC{0,300}") {
        let mut lookahead = Lookahead::new(LexemeCursor::new(&input));
        let mut steps = 0;
        while !lookahead.at_eof() {
            let before = lookahead.tokens_consumed();
            lookahead.skip_single();
            prop_assert!(lookahead.tokens_consumed() > before);
            steps += 1;
            prop_assert!(steps <= input.len() + 1);
        }
    }

    /// Property 1b: skipping to the end of a line lands on a line start.
    #[test]
    fn skip_until_end_of_line_stops_at_line_start(input in recovery_source()) {
        let mut lookahead = mid_line(&input);
        lookahead.skip_until_end_of_line();
        prop_assert!(lookahead.at_eof() || lookahead.at_start_of_line());
    }

    /// Property 2: `can_recover_to` leaves the cursor where it was.
    #[test]
    fn recovery_check_does_not_move(input in recovery_source(), target in recovery_target()) {
        let lookahead = mid_line(&input);
        let before = lookahead.clone();
        let _handle = lookahead.can_recover_to(target);
        prop_assert_eq!(lookahead, before);
    }

    /// Property 3: replaying a recovery lands on the target token.
    #[test]
    fn recovery_replays_exactly(input in recovery_source(), target in recovery_target()) {
        let lookahead = mid_line(&input);
        if let Some(handle) = lookahead.can_recover_to(target) {
            let mut replay = lookahead.clone();
            for _ in 0..handle.unexpected_tokens() {
                replay.consume_any_token();
            }
            prop_assert!(replay.at(target), "landed on {:?}", replay.current_token());

            let mut committed = lookahead.clone();
            let recovered = committed.consume_to(target);
            prop_assert!(recovered.is_some());
            prop_assert_eq!(
                committed.tokens_consumed(),
                lookahead.tokens_consumed() + handle.unexpected_tokens() + 1
            );
        }
    }

    /// Property 4: without brackets to skip, recovery only crosses tokens
    /// that rank below the target and stays on the current line.
    #[test]
    fn recovery_respects_precedence(input in flat_source(), target in recovery_target()) {
        let lookahead = mid_line(&input);
        if let Some(handle) = lookahead.can_recover_to(target) {
            let limit = target.recovery_precedence();
            let mut replay = lookahead.clone();
            for _ in 0..handle.unexpected_tokens() {
                let current = replay.current_token();
                prop_assert!(
                    TokenPrecedence::of(&current) < limit,
                    "crossed {:?} looking for {}",
                    current,
                    target
                );
                prop_assert!(!current.is_at_start_of_line());
                replay.consume_any_token();
            }
        }
    }

    /// Property 5: the attribute-only directive scan is a pure function of
    /// the cursor.
    #[test]
    fn directive_scan_is_deterministic(input in recovery_source()) {
        let source = format!("#if X\n{input}");
        let start = Lookahead::new(LexemeCursor::new(&source));
        let mut first = start.clone();
        let mut second = start.clone();
        let accepted = first.consume_if_config_of_attributes();
        prop_assert_eq!(accepted, second.consume_if_config_of_attributes());
        prop_assert_eq!(first, second);
    }

    /// Property 6: a rejected directive scan consumes nothing; an accepted
    /// one ends after an `#endif`.
    #[test]
    fn directive_scan_is_all_or_nothing(input in recovery_source()) {
        let source = format!("#if X\n{input}");
        let mut session = Lookahead::new(LexemeCursor::new(&source));
        if session.consume_if_config_of_attributes() {
            prop_assert!(session.tokens_consumed() > 0);
        } else {
            prop_assert_eq!(session.tokens_consumed(), 0);
            prop_assert_eq!(session.current_token().kind(), RawTokenKind::PoundIf);
        }
    }

    /// Property 7: outside bracket groups, recovery never crosses `#else`,
    /// `#elseif` or `#endif` on the way to another target.
    #[test]
    fn recovery_stops_at_closing_directives(
        input in flat_source(),
        target in recovery_target(),
    ) {
        let lookahead = mid_line(&input);
        if let Some(handle) = lookahead.can_recover_to(target) {
            let mut replay = lookahead.clone();
            for _ in 0..handle.unexpected_tokens() {
                let kind = replay.current_token().kind();
                prop_assert!(
                    !matches!(
                        kind,
                        RawTokenKind::PoundElse | RawTokenKind::PoundElseif | RawTokenKind::PoundEndif
                    ),
                    "crossed {:?} looking for {}",
                    kind,
                    target
                );
                replay.consume_any_token();
            }
        }
    }
}
