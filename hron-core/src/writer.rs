//! Canonical text output.
//!
//! [`Writer`] is a [`Visitor`] that renders the event stream back into HRON
//! text: one tab per nesting level, `@name`/`=name` tag lines, value payload
//! lines one level deeper. Closing a scope is represented purely by the
//! indentation decrease of whatever comes next - there is no closing token.
//!
//! Because it is a visitor it can be driven either by a tree
//! ([`crate::tree::Object::visit`]) or directly by the parser, which is the
//! symmetry the round-trip tests lean on.

use std::fmt::Write as _;

use crate::slice::LineSlice;
use crate::tree::Object;
use crate::visitor::{ParseErrorKind, Visitor};

/// Render a tree as canonical HRON text.
pub fn write_object(object: &Object) -> String {
    let mut writer = Writer::new();
    object.visit(&mut writer);
    writer.into_text()
}

/// Visitor that accumulates canonical HRON text.
///
/// Lines are newline-separated with no trailing newline, matching the
/// line-per-event model of the parser.
pub struct Writer {
    out: String,
    indent: usize,
    first: bool,
}

impl Writer {
    pub fn new() -> Self {
        Writer { out: String::new(), indent: 0, first: true }
    }

    /// Take the accumulated text.
    pub fn into_text(self) -> String {
        self.out
    }

    /// Borrow the text accumulated so far.
    pub fn text(&self) -> &str {
        &self.out
    }

    fn begin_line(&mut self, indent: usize) {
        if self.first {
            self.first = false;
        } else {
            self.out.push('\n');
        }
        for _ in 0..indent {
            self.out.push('\t');
        }
    }
}

impl Default for Writer {
    fn default() -> Self {
        Writer::new()
    }
}

impl<'a> Visitor<'a> for Writer {
    fn preprocessor(&mut self, line: LineSlice<'a>) {
        self.begin_line(0);
        self.out.push('!');
        self.out.push_str(line.as_str());
    }

    fn empty(&mut self, line: LineSlice<'a>) {
        self.begin_line(0);
        self.out.push_str(line.as_str());
    }

    fn comment(&mut self, indent: usize, text: LineSlice<'a>) {
        self.begin_line(indent);
        self.out.push('#');
        self.out.push_str(text.as_str());
    }

    fn value_begin(&mut self, name: LineSlice<'a>) {
        self.begin_line(self.indent);
        self.out.push('=');
        self.out.push_str(name.as_str());
        self.indent += 1;
    }

    fn value_line(&mut self, value: LineSlice<'a>) {
        self.begin_line(self.indent);
        self.out.push_str(value.as_str());
    }

    fn value_end(&mut self, _name: LineSlice<'a>) {
        self.indent = self.indent.saturating_sub(1);
    }

    fn object_begin(&mut self, name: LineSlice<'a>) {
        self.begin_line(self.indent);
        self.out.push('@');
        self.out.push_str(name.as_str());
        self.indent += 1;
    }

    fn object_end(&mut self, _name: LineSlice<'a>) {
        self.indent = self.indent.saturating_sub(1);
    }

    fn error(&mut self, line_no: usize, _line: LineSlice<'a>, kind: ParseErrorKind) {
        self.begin_line(0);
        let _ = write!(self.out, "# Error at line {}: {}", line_no, kind);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{Entity, Member};

    fn obj(members: Vec<Member>) -> Object {
        Object::new(members)
    }

    #[test]
    fn test_flat_object() {
        let root = obj(vec![Member::new(
            "person",
            Entity::Object(obj(vec![
                Member::new("name", Entity::Value("Alice".into())),
                Member::new("age", Entity::Value("30".into())),
            ])),
        )]);
        assert_eq!(
            write_object(&root),
            "@person\n\t=name\n\t\tAlice\n\t=age\n\t\t30"
        );
    }

    #[test]
    fn test_multiline_value_with_blank() {
        let root = obj(vec![Member::new(
            "bio",
            Entity::Value("Line one\n\nLine three".into()),
        )]);
        assert_eq!(write_object(&root), "=bio\n\tLine one\n\t\n\tLine three");
    }

    #[test]
    fn test_empty_value_emits_no_lines() {
        let root = obj(vec![Member::new("x", Entity::Value(String::new()))]);
        assert_eq!(write_object(&root), "=x");
    }

    #[test]
    fn test_empty_object() {
        let root = obj(vec![Member::new("x", Entity::Object(Object::default()))]);
        assert_eq!(write_object(&root), "@x");
    }
}
