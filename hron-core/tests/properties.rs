//! Property-based tests for the HRON parser.
//!
//! These check invariants that must hold for ANY input, valid or not:
//! the parser never panics, the event stream stays balanced, and scanning
//! is deterministic.

use proptest::prelude::*;

use hron_core::{lines, parse, LineSlice, ParseErrorKind, ParseOptions, Visitor};

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: 200,
        ..ProptestConfig::default()
    }
}

// =============================================================================
// Test Helpers
// =============================================================================

#[derive(Default, Debug, Clone, PartialEq)]
struct Counts {
    document_begin: usize,
    document_end: usize,
    object_begin: usize,
    object_end: usize,
    value_begin: usize,
    value_end: usize,
    errors: usize,
    /// Running nesting depth minimum, to catch an end before its begin.
    min_depth: i64,
    depth: i64,
}

impl Counts {
    fn step(&mut self, delta: i64) {
        self.depth += delta;
        self.min_depth = self.min_depth.min(self.depth);
    }
}

impl<'a> Visitor<'a> for Counts {
    fn document_begin(&mut self) {
        self.document_begin += 1;
    }
    fn document_end(&mut self) {
        self.document_end += 1;
    }
    fn object_begin(&mut self, _: LineSlice<'a>) {
        self.object_begin += 1;
        self.step(1);
    }
    fn object_end(&mut self, _: LineSlice<'a>) {
        self.object_end += 1;
        self.step(-1);
    }
    fn value_begin(&mut self, _: LineSlice<'a>) {
        self.value_begin += 1;
        self.step(1);
    }
    fn value_end(&mut self, _: LineSlice<'a>) {
        self.value_end += 1;
        self.step(-1);
    }
    fn error(&mut self, _: usize, _: LineSlice<'a>, _: ParseErrorKind) {
        self.errors += 1;
    }
}

fn scan(text: &str, options: &ParseOptions) -> Counts {
    let mut counts = Counts::default();
    parse(options, lines(text), &mut counts);
    counts
}

// =============================================================================
// Property: the parser never panics
// =============================================================================

proptest! {
    #![proptest_config(config())]

    #[test]
    fn never_panics_on_arbitrary_text(text in "\\PC{0,500}") {
        let _ = scan(&text, &ParseOptions::default());
    }

    /// Syntax-heavy input exercises the structural paths far more often
    /// than fully arbitrary text does.
    #[test]
    fn never_panics_on_syntax_heavy_text(text in "[@=!#\\t\\n a-z]{0,300}") {
        let _ = scan(&text, &ParseOptions::default());
    }
}

// =============================================================================
// Property: structural balance
// =============================================================================

proptest! {
    #![proptest_config(config())]

    /// Every scan is bracketed by exactly one document_begin/document_end
    /// pair, abort or not.
    #[test]
    fn document_events_always_bracket(text in "[@=!#\\t\\n a-z]{0,300}") {
        let counts = scan(&text, &ParseOptions::default());
        prop_assert_eq!(counts.document_begin, 1);
        prop_assert_eq!(counts.document_end, 1);
    }

    /// On a scan that completes (no abort), begins and ends are balanced
    /// and nesting never goes negative.
    #[test]
    fn completed_scans_are_balanced(text in "[@=\\t\\n a-z]{0,300}") {
        let options = ParseOptions { max_errors: usize::MAX };
        let counts = scan(&text, &options);
        prop_assert_eq!(counts.object_begin, counts.object_end);
        prop_assert_eq!(counts.value_begin, counts.value_end);
        prop_assert!(counts.min_depth >= 0);
        prop_assert_eq!(counts.depth, 0);
    }

    /// Even an aborted scan never closes a scope it did not open.
    #[test]
    fn nesting_never_goes_negative(text in "[@=!#\\t\\n a-z]{0,300}") {
        let counts = scan(&text, &ParseOptions::default());
        prop_assert!(counts.min_depth >= 0);
    }
}

// =============================================================================
// Property: determinism
// =============================================================================

proptest! {
    #![proptest_config(config())]

    #[test]
    fn scanning_is_deterministic(text in "[@=!#\\t\\n a-z]{0,300}") {
        let first = scan(&text, &ParseOptions::default());
        let second = scan(&text, &ParseOptions::default());
        prop_assert_eq!(first, second);
    }
}
