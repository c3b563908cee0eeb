//! The line-by-line indentation state machine.
//!
//! The parser consumes a sequence of [`LineSlice`]s and drives a [`Visitor`]
//! through a deterministic event stream. It validates syntax only: tag names
//! are passed through untrimmed and unresolved.
//!
//! Two states: `ExpectingTag` (a `@`/`=` line is due) and `ExpectingValue`
//! (raw content lines of an open value are due). The context stack holds one
//! pending tag name per open scope, so its depth always equals the expected
//! indentation.

use crate::slice::LineSlice;
use crate::visitor::{ParseErrorKind, Visitor};

/// Caller-supplied parse configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Abort the scan once this many structural errors were reported.
    ///
    /// The default of 1 stops at the first error. Values below 1 are treated
    /// as 1: a structural error always ends the scan eventually.
    pub max_errors: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions { max_errors: 1 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    ExpectingTag,
    ExpectingValue,
}

/// Parse a sequence of lines, driving `visitor`.
///
/// The whole call is bracketed by `document_begin`/`document_end` regardless
/// of outcome. On a completed scan every scope still open at end of input is
/// closed with the matching `value_end`/`object_end` events, as if the input
/// dedented to indentation 0. When the error limit aborts the scan early the
/// unwind is skipped but the closing `document_end` is still emitted.
pub fn parse<'a, I, V>(options: &ParseOptions, lines: I, visitor: &mut V)
where
    I: IntoIterator<Item = LineSlice<'a>>,
    V: Visitor<'a>,
{
    visitor.document_begin();

    let max_errors = options.max_errors.max(1);
    let mut error_count = 0usize;
    let mut state = ParseState::ExpectingTag;
    let mut expected_indent = 0usize;
    let mut line_no = 0usize;
    let mut context: Vec<LineSlice<'a>> = Vec::new();
    let mut accepts_preprocessor = true;
    let mut aborted = false;

    'scan: for line in lines {
        line_no += 1;

        if accepts_preprocessor {
            if line.byte_at(0) == Some(b'!') {
                visitor.preprocessor(line.slice_from(1));
                continue;
            }
            accepts_preprocessor = false;
        }

        let current_indent = line.leading_tabs();

        // A comment can only appear where a tag could, or dedent out of an
        // open value - never as value content at the expected indent.
        let is_comment = match state {
            ParseState::ExpectingTag => line.byte_at(current_indent) == Some(b'#'),
            ParseState::ExpectingValue => {
                current_indent < expected_indent && line.byte_at(current_indent) == Some(b'#')
            }
        };

        let is_whitespace = line.slice_from(current_indent).is_whitespace();

        if is_comment {
            visitor.comment(current_indent, line.slice_from(current_indent + 1));
        } else if is_whitespace && current_indent < expected_indent {
            // A blank line may not dedent out of an open value; it is an
            // empty content line instead.
            match state {
                ParseState::ExpectingValue => visitor.value_line(LineSlice::empty()),
                ParseState::ExpectingTag => visitor.empty(line),
            }
        } else if is_whitespace {
            match state {
                ParseState::ExpectingValue => visitor.value_line(line.slice_from(expected_indent)),
                ParseState::ExpectingTag => visitor.empty(line),
            }
        } else {
            if current_indent < expected_indent {
                unwind(visitor, &mut context, state, current_indent, expected_indent);
                expected_indent = current_indent;
                state = ParseState::ExpectingTag;
            }

            match state {
                ParseState::ExpectingTag => {
                    if current_indent > expected_indent {
                        visitor.error(
                            line_no,
                            line,
                            ParseErrorKind::IndentIncreasedMoreThanExpected,
                        );
                        error_count += 1;
                        if error_count >= max_errors {
                            aborted = true;
                            break 'scan;
                        }
                    } else if current_indent < line.len() {
                        match line.byte_at(current_indent) {
                            Some(b'@') => {
                                let name = line.slice_from(current_indent + 1);
                                expected_indent += 1;
                                context.push(name);
                                visitor.object_begin(name);
                            }
                            Some(b'=') => {
                                let name = line.slice_from(current_indent + 1);
                                state = ParseState::ExpectingValue;
                                expected_indent += 1;
                                context.push(name);
                                visitor.value_begin(name);
                            }
                            _ => {
                                visitor.error(
                                    line_no,
                                    line,
                                    ParseErrorKind::TagIsNotCorrectlyFormatted,
                                );
                                error_count += 1;
                                if error_count >= max_errors {
                                    aborted = true;
                                    break 'scan;
                                }
                            }
                        }
                    } else {
                        // Non-whitespace remainder shorter than its own
                        // indentation cannot happen; report defensively.
                        visitor.error(line_no, line, ParseErrorKind::ProgrammingError);
                        error_count += 1;
                        if error_count >= max_errors {
                            aborted = true;
                            break 'scan;
                        }
                    }
                }
                ParseState::ExpectingValue => {
                    if current_indent > expected_indent {
                        visitor.error(
                            line_no,
                            line,
                            ParseErrorKind::IndentIncreasedMoreThanExpected,
                        );
                        error_count += 1;
                        if error_count >= max_errors {
                            aborted = true;
                            break 'scan;
                        }
                    } else {
                        visitor.value_line(line.slice_from(expected_indent));
                    }
                }
            }
        }
    }

    if !aborted {
        // End of input closes every remaining open scope.
        unwind(visitor, &mut context, state, 0, expected_indent);
    }

    visitor.document_end();
}

/// Close scopes down to `target_indent`.
///
/// In value state the innermost frame is the open value; it gets the single
/// `value_end`, the frames above it are objects.
fn unwind<'a, V: Visitor<'a>>(
    visitor: &mut V,
    context: &mut Vec<LineSlice<'a>>,
    state: ParseState,
    target_indent: usize,
    expected_indent: usize,
) {
    match state {
        ParseState::ExpectingTag => {
            for _ in target_indent..expected_indent {
                if let Some(name) = context.pop() {
                    visitor.object_end(name);
                }
            }
        }
        ParseState::ExpectingValue => {
            if let Some(name) = context.pop() {
                visitor.value_end(name);
            }
            for _ in (target_indent + 1)..expected_indent {
                if let Some(name) = context.pop() {
                    visitor.object_end(name);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Counts events to sanity-check bracketing; the full event-sequence
    /// suite lives in tests/parsing.rs.
    #[derive(Default)]
    struct Counts {
        begin: usize,
        end: usize,
        object_begin: usize,
        object_end: usize,
        value_begin: usize,
        value_end: usize,
        errors: usize,
    }

    impl<'a> Visitor<'a> for Counts {
        fn document_begin(&mut self) {
            self.begin += 1;
        }
        fn document_end(&mut self) {
            self.end += 1;
        }
        fn object_begin(&mut self, _: LineSlice<'a>) {
            self.object_begin += 1;
        }
        fn object_end(&mut self, _: LineSlice<'a>) {
            self.object_end += 1;
        }
        fn value_begin(&mut self, _: LineSlice<'a>) {
            self.value_begin += 1;
        }
        fn value_end(&mut self, _: LineSlice<'a>) {
            self.value_end += 1;
        }
        fn error(&mut self, _: usize, _: LineSlice<'a>, _: ParseErrorKind) {
            self.errors += 1;
        }
    }

    fn scan(text: &str) -> Counts {
        let mut counts = Counts::default();
        parse(&ParseOptions::default(), crate::slice::lines(text), &mut counts);
        counts
    }

    #[test]
    fn test_balanced_events() {
        let counts = scan("@a\n\t@b\n\t\t=v\n\t\t\tx\n@c\n");
        assert_eq!(counts.begin, 1);
        assert_eq!(counts.end, 1);
        assert_eq!(counts.object_begin, 3);
        assert_eq!(counts.object_end, 3);
        assert_eq!(counts.value_begin, 1);
        assert_eq!(counts.value_end, 1);
        assert_eq!(counts.errors, 0);
    }

    #[test]
    fn test_document_end_after_abort() {
        let counts = scan("garbage\n@never\n");
        assert_eq!(counts.errors, 1);
        assert_eq!(counts.end, 1);
        assert_eq!(counts.object_begin, 0);
    }

    #[test]
    fn test_error_limit_honored() {
        let mut counts = Counts::default();
        let options = ParseOptions { max_errors: 3 };
        parse(&options, crate::slice::lines("x\ny\n@ok\nz\n"), &mut counts);
        // Two bad tags, one good object, then the third error aborts.
        assert_eq!(counts.errors, 3);
        assert_eq!(counts.object_begin, 1);
        assert_eq!(counts.end, 1);
    }
}
