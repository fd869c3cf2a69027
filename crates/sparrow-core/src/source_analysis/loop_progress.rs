// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Forward-progress guard for unbounded loops over the token stream.

use super::{Lexeme, RawTokenKind};

/// Remembers the lexeme seen on the previous iteration of a loop.
///
/// Create one before the loop and call [`LoopProgressCondition::evaluate`]
/// with the current lexeme at the top of every iteration. A loop body that
/// fails to consume anything trips a debug assertion and the loop stops.
///
/// ```
/// use sparrow_core::source_analysis::{LexemeCursor, LoopProgressCondition};
///
/// let mut cursor = LexemeCursor::new("a b c");
/// let mut progress = LoopProgressCondition::new();
/// let mut seen = 0;
/// while !cursor.current().is_eof() && progress.evaluate(cursor.current()) {
///     cursor.advance();
///     seen += 1;
/// }
/// assert_eq!(seen, 3);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct LoopProgressCondition {
    previous: Option<(u32, RawTokenKind)>,
}

impl LoopProgressCondition {
    #[must_use]
    pub const fn new() -> Self {
        Self { previous: None }
    }

    /// Returns `true` on the first call, and afterwards only if the cursor
    /// moved past the previous lexeme or the lexeme there was split.
    pub fn evaluate(&mut self, current: Lexeme<'_>) -> bool {
        let identity = (current.text_start(), current.kind());
        let made_progress = match self.previous {
            None => true,
            Some((offset, kind)) => identity.0 > offset || (identity.0 == offset && identity.1 != kind),
        };
        debug_assert!(
            made_progress,
            "loop made no progress at offset {} ({})",
            identity.0, identity.1
        );
        self.previous = Some(identity);
        made_progress
    }
}
