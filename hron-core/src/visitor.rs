//! The structural event protocol and error taxonomy.
//!
//! Every consumer of HRON is a [`Visitor`]: the parser drives one visitor per
//! scan, and trees can replay themselves through the same interface (see
//! [`crate::tree::Object::visit`]), which is what makes the writer "just
//! another visitor".

use std::error::Error;
use std::fmt;

use crate::slice::LineSlice;

/// Error kinds, structural and semantic, in one closed set.
///
/// The first three are detected by the parser and abort the scan (subject to
/// [`crate::parser::ParseOptions::max_errors`]). The rest are recorded by the
/// typed binder; they never halt the scan, but a non-empty error list still
/// fails the overall parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseErrorKind {
    /// A line that should be unreachable given the indentation bookkeeping.
    ProgrammingError,
    /// A tag line indented deeper than the currently open scope allows.
    IndentIncreasedMoreThanExpected,
    /// A structural line that starts with neither `@` nor `=`.
    TagIsNotCorrectlyFormatted,
    /// A member name that the target record shape does not declare.
    UnknownMember,
    /// An object where a scalar is required, or a scalar where an object is.
    ShapeMismatch,
    /// A value that the scalar codec could not parse into the target type.
    UnparsableScalar,
    /// The requested root type has no registered shape.
    MissingSchema,
}

impl ParseErrorKind {
    /// True for the parser-detected (structural) kinds.
    pub fn is_structural(self) -> bool {
        matches!(
            self,
            ParseErrorKind::ProgrammingError
                | ParseErrorKind::IndentIncreasedMoreThanExpected
                | ParseErrorKind::TagIsNotCorrectlyFormatted
        )
    }
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ParseErrorKind::ProgrammingError => "programming error",
            ParseErrorKind::IndentIncreasedMoreThanExpected => {
                "indent increased more than expected"
            }
            ParseErrorKind::TagIsNotCorrectlyFormatted => "tag is not correctly formatted",
            ParseErrorKind::UnknownMember => "unknown member",
            ParseErrorKind::ShapeMismatch => "shape mismatch",
            ParseErrorKind::UnparsableScalar => "unparsable scalar",
            ParseErrorKind::MissingSchema => "missing schema",
        };
        f.write_str(s)
    }
}

/// One reported problem: the line number, the raw line, and the kind.
///
/// Binder-side errors carry `line_no == 0` and the offending member name as
/// `line` - the event protocol does not thread line numbers through
/// non-error events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub line_no: usize,
    pub line: String,
    pub kind: ParseErrorKind,
}

impl ParseError {
    pub fn new(line_no: usize, line: impl Into<String>, kind: ParseErrorKind) -> Self {
        ParseError { line_no, line: line.into(), kind }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.line_no == 0 {
            write!(f, "{}: {:?}", self.kind, self.line)
        } else {
            write!(f, "line {}: {} in {:?}", self.line_no, self.kind, self.line)
        }
    }
}

impl Error for ParseError {}

/// Structural event sink.
///
/// One method per event; all bodies default to no-ops so consumers implement
/// only what they care about. Names arrive exactly as written after the
/// sigil - untrimmed and unvalidated. The parser checks syntax only, so a
/// visitor must tolerate names that mean nothing in its own model.
pub trait Visitor<'a> {
    /// Scan started. Always paired with [`Visitor::document_end`].
    fn document_begin(&mut self) {}

    /// Scan finished - emitted even when the error limit aborted the scan.
    fn document_end(&mut self) {}

    /// `!line`, only recognized before the first non-preprocessor line.
    fn preprocessor(&mut self, line: LineSlice<'a>) {
        let _ = line;
    }

    /// A whitespace-only line outside of any open value.
    fn empty(&mut self, line: LineSlice<'a>) {
        let _ = line;
    }

    /// `#text` at `indent` tabs.
    fn comment(&mut self, indent: usize, text: LineSlice<'a>) {
        let _ = (indent, text);
    }

    /// `=name` opened a value scope.
    fn value_begin(&mut self, name: LineSlice<'a>) {
        let _ = name;
    }

    /// One content line of the open value, indentation prefix stripped.
    fn value_line(&mut self, value: LineSlice<'a>) {
        let _ = value;
    }

    /// The value scope closed; `name` matches the opening event.
    fn value_end(&mut self, name: LineSlice<'a>) {
        let _ = name;
    }

    /// `@name` opened an object scope.
    fn object_begin(&mut self, name: LineSlice<'a>) {
        let _ = name;
    }

    /// The object scope closed; `name` matches the opening event.
    fn object_end(&mut self, name: LineSlice<'a>) {
        let _ = name;
    }

    /// A structural problem on `line`; the parser keeps its bracket guarantee.
    fn error(&mut self, line_no: usize, line: LineSlice<'a>, kind: ParseErrorKind) {
        let _ = (line_no, line, kind);
    }
}
