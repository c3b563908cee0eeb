//! Schema-directed hydration of parse events into concrete instances.
//!
//! [`Binder`] is a [`Visitor`] over an explicit frame stack. Each frame holds
//! the shape being hydrated and its in-progress instance; a frame with no
//! shape is a *sink* that absorbs every descendant event, so a structural
//! mismatch in the input can never escalate into a parser-level failure.
//!
//! Where the event stream and the schema disagree - unknown member, object
//! where a scalar belongs, unparsable scalar text - the binder records a
//! semantic error and keeps scanning. Structural and semantic errors end up
//! in one combined list; a non-empty list fails the overall parse, so the
//! caller never receives a partially-bound instance presented as complete.

use crate::parser::{parse, ParseOptions};
use crate::schema::{Instance, Schema, ShapeId, ShapeKind};
use crate::slice::{lines, LineSlice};
use crate::visitor::{ParseError, ParseErrorKind, Visitor};

/// Parse `text` directly into a `T` described by `schema`.
///
/// `T` must be registered as a record, list, or map shape; a scalar root
/// has no members to bind and is rejected with a shape mismatch.
///
/// ```
/// use hron_core::{parse_typed, ParseOptions, Schema};
///
/// #[derive(Default, Debug, PartialEq)]
/// struct Person { name: String, age: u32 }
///
/// let mut schema = Schema::new();
/// let text = schema.text();
/// let age = schema.scalar::<u32>();
/// schema
///     .record::<Person>("Person")
///     .field("name", text, |p: &mut Person, v: String| p.name = v)
///     .field("age", age, |p: &mut Person, v: u32| p.age = v)
///     .finish();
///
/// let person: Person = parse_typed(
///     &schema,
///     "=name\n\tAlice\n=age\n\t30\n",
///     &ParseOptions::default(),
/// ).unwrap();
/// assert_eq!(person, Person { name: "Alice".into(), age: 30 });
/// ```
pub fn parse_typed<T: 'static>(
    schema: &Schema,
    text: &str,
    options: &ParseOptions,
) -> Result<T, Vec<ParseError>> {
    let Some(root) = schema.shape_of::<T>() else {
        return Err(vec![ParseError::new(
            0,
            std::any::type_name::<T>(),
            ParseErrorKind::MissingSchema,
        )]);
    };
    // A scalar has no members to bind; the root must be a frame-forming
    // shape (record, list, or map).
    if matches!(schema.kind(root), ShapeKind::Scalar(_)) {
        return Err(vec![ParseError::new(
            0,
            std::any::type_name::<T>(),
            ParseErrorKind::ShapeMismatch,
        )]);
    }
    let mut binder = Binder::new(schema, root);
    parse(options, lines(text), &mut binder);
    let instance = binder.finish()?;
    match instance.downcast::<T>() {
        Ok(value) => Ok(*value),
        Err(_) => Err(vec![ParseError::new(
            0,
            std::any::type_name::<T>(),
            ParseErrorKind::ProgrammingError,
        )]),
    }
}

/// Where a completed child frame attaches in its parent.
///
/// Resolved once at `object_begin` and replayed at `object_end`, so member
/// names are never resolved twice for one scope.
enum Attach {
    Root,
    Field(usize),
    MapKey(String),
    ListItem,
    Discard,
}

struct Frame {
    /// `None` marks a sink frame.
    shape: Option<ShapeId>,
    value: Option<Instance>,
    attach: Attach,
}

impl Frame {
    fn sink() -> Self {
        Frame { shape: None, value: None, attach: Attach::Discard }
    }
}

/// Visitor that hydrates a schema-described instance from parse events.
pub struct Binder<'s> {
    schema: &'s Schema,
    stack: Vec<Frame>,
    value: String,
    first_line: bool,
    errors: Vec<ParseError>,
}

impl<'s> Binder<'s> {
    /// Seed the frame stack with the root shape.
    pub fn new(schema: &'s Schema, root: ShapeId) -> Self {
        let value = schema.kind(root).create();
        Binder {
            schema,
            stack: vec![Frame { shape: Some(root), value, attach: Attach::Root }],
            value: String::new(),
            first_line: true,
            errors: Vec::new(),
        }
    }

    /// Errors recorded so far, structural and semantic combined.
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// The hydrated root instance, or the combined error list.
    pub fn finish(mut self) -> Result<Instance, Vec<ParseError>> {
        if !self.errors.is_empty() {
            return Err(self.errors);
        }
        match self.stack.pop() {
            Some(Frame { value: Some(instance), .. }) if self.stack.is_empty() => Ok(instance),
            _ => Err(vec![ParseError::new(0, "", ParseErrorKind::ProgrammingError)]),
        }
    }

    fn live(&self) -> bool {
        self.stack.last().map(|f| f.value.is_some()).unwrap_or(false)
    }

    /// Semantic errors carry the member name; the protocol gives the binder
    /// no line numbers outside of error events.
    fn semantic_error(&mut self, name: &str, kind: ParseErrorKind) {
        self.errors.push(ParseError::new(0, name, kind));
    }

    /// Run the scalar codec for `shape` against accumulated value text.
    fn parse_scalar(
        schema: &Schema,
        shape: ShapeId,
        text: &str,
    ) -> Result<Instance, ParseErrorKind> {
        match schema.kind(shape) {
            ShapeKind::Scalar(scalar) => {
                scalar.parse(text).ok_or(ParseErrorKind::UnparsableScalar)
            }
            _ => Err(ParseErrorKind::ShapeMismatch),
        }
    }
}

/// Outcome of resolving a member name at `object_begin`.
enum Resolved {
    Frame(ShapeId, Attach),
    Sink(Option<ParseErrorKind>),
}

impl<'s, 'a> Visitor<'a> for Binder<'s> {
    fn value_begin(&mut self, _name: LineSlice<'a>) {
        if self.live() {
            self.value.clear();
            self.first_line = true;
        }
    }

    fn value_line(&mut self, value: LineSlice<'a>) {
        if self.live() {
            if self.first_line {
                self.first_line = false;
            } else {
                self.value.push('\n');
            }
            self.value.push_str(value.as_str());
        }
    }

    fn value_end(&mut self, name: LineSlice<'a>) {
        let schema = self.schema;
        let text = std::mem::take(&mut self.value);
        let name = name.as_str();

        let Some(frame) = self.stack.last_mut() else {
            return;
        };
        let (Some(shape), Some(target)) = (frame.shape, frame.value.as_deref_mut()) else {
            return;
        };

        let outcome: Result<(), ParseErrorKind> = match schema.kind(shape) {
            ShapeKind::Record(record) => match record.field_index(name) {
                Some(index) => {
                    let field = &record.fields[index];
                    // List-typed fields append one parsed item per =name
                    // occurrence; everything else sets the whole value.
                    let item_shape = match schema.kind(field.shape) {
                        ShapeKind::List(list) => list.item,
                        _ => field.shape,
                    };
                    Self::parse_scalar(schema, item_shape, &text).and_then(|value| {
                        if field.bind(target, value) {
                            Ok(())
                        } else {
                            Err(ParseErrorKind::ShapeMismatch)
                        }
                    })
                }
                None => Err(ParseErrorKind::UnknownMember),
            },
            ShapeKind::Map(map) => {
                if map.contains(target, name) {
                    // First write wins; later duplicates drop silently.
                    Ok(())
                } else {
                    Self::parse_scalar(schema, map.value, &text).and_then(|value| {
                        if map.insert(target, name, value) {
                            Ok(())
                        } else {
                            Err(ParseErrorKind::ShapeMismatch)
                        }
                    })
                }
            }
            ShapeKind::List(list) => {
                Self::parse_scalar(schema, list.item, &text).and_then(|value| {
                    if list.push(target, value) {
                        Ok(())
                    } else {
                        Err(ParseErrorKind::ShapeMismatch)
                    }
                })
            }
            ShapeKind::Scalar(_) => Err(ParseErrorKind::ShapeMismatch),
        };

        if let Err(kind) = outcome {
            self.semantic_error(name, kind);
        }
    }

    fn object_begin(&mut self, name: LineSlice<'a>) {
        let schema = self.schema;
        let name = name.as_str();

        let resolved = match self.stack.last_mut() {
            Some(frame) => match (frame.shape, frame.value.as_deref_mut()) {
                (Some(shape), Some(target)) => match schema.kind(shape) {
                    ShapeKind::Record(record) => match record.field_index(name) {
                        Some(index) => {
                            let field = &record.fields[index];
                            match schema.kind(field.shape) {
                                ShapeKind::Record(_) | ShapeKind::Map(_) => {
                                    Resolved::Frame(field.shape, Attach::Field(index))
                                }
                                ShapeKind::List(list) => match schema.kind(list.item) {
                                    ShapeKind::Scalar(_) => {
                                        Resolved::Sink(Some(ParseErrorKind::ShapeMismatch))
                                    }
                                    _ => Resolved::Frame(list.item, Attach::Field(index)),
                                },
                                ShapeKind::Scalar(_) => {
                                    Resolved::Sink(Some(ParseErrorKind::ShapeMismatch))
                                }
                            }
                        }
                        None => Resolved::Sink(Some(ParseErrorKind::UnknownMember)),
                    },
                    ShapeKind::Map(map) => {
                        if map.contains(target, name) {
                            Resolved::Sink(None)
                        } else {
                            match schema.kind(map.value) {
                                ShapeKind::Scalar(_) => {
                                    Resolved::Sink(Some(ParseErrorKind::ShapeMismatch))
                                }
                                _ => Resolved::Frame(
                                    map.value,
                                    Attach::MapKey(name.to_owned()),
                                ),
                            }
                        }
                    }
                    ShapeKind::List(list) => match schema.kind(list.item) {
                        ShapeKind::Scalar(_) => {
                            Resolved::Sink(Some(ParseErrorKind::ShapeMismatch))
                        }
                        _ => Resolved::Frame(list.item, Attach::ListItem),
                    },
                    ShapeKind::Scalar(_) => {
                        Resolved::Sink(Some(ParseErrorKind::ShapeMismatch))
                    }
                },
                // Inside a sink: absorb the whole subtree silently.
                _ => Resolved::Sink(None),
            },
            None => Resolved::Sink(None),
        };

        match resolved {
            Resolved::Frame(shape, attach) => {
                let value = schema.kind(shape).create();
                self.stack.push(Frame { shape: Some(shape), value, attach });
            }
            Resolved::Sink(error) => {
                if let Some(kind) = error {
                    self.semantic_error(name, kind);
                }
                self.stack.push(Frame::sink());
            }
        }
    }

    fn object_end(&mut self, name: LineSlice<'a>) {
        // The root frame is never popped; the parser only closes scopes it
        // opened, but guard against unbalanced drivers anyway.
        if self.stack.len() < 2 {
            return;
        }
        let Some(frame) = self.stack.pop() else {
            return;
        };
        let Some(instance) = frame.value else {
            return;
        };

        let schema = self.schema;
        let attached = match self.stack.last_mut() {
            Some(top) => match (top.shape, top.value.as_deref_mut()) {
                (Some(top_shape), Some(target)) => {
                    match (&frame.attach, schema.kind(top_shape)) {
                        (Attach::Field(index), ShapeKind::Record(record)) => record
                            .fields
                            .get(*index)
                            .map(|field| field.bind(target, instance))
                            .unwrap_or(false),
                        (Attach::MapKey(key), ShapeKind::Map(map)) => {
                            map.insert(target, key, instance)
                        }
                        (Attach::ListItem, ShapeKind::List(list)) => {
                            list.push(target, instance)
                        }
                        _ => true,
                    }
                }
                _ => true,
            },
            None => true,
        };

        if !attached {
            self.semantic_error(name.as_str(), ParseErrorKind::ShapeMismatch);
        }
    }

    fn error(&mut self, line_no: usize, line: LineSlice<'a>, kind: ParseErrorKind) {
        self.errors.push(ParseError::new(line_no, line.as_str(), kind));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default, Debug, PartialEq)]
    struct Point {
        x: i32,
        y: i32,
    }

    fn point_schema() -> Schema {
        let mut schema = Schema::new();
        let int = schema.scalar::<i32>();
        schema
            .record::<Point>("Point")
            .field("x", int, |p: &mut Point, v: i32| p.x = v)
            .field("y", int, |p: &mut Point, v: i32| p.y = v)
            .finish();
        schema
    }

    #[test]
    fn test_flat_record() {
        let schema = point_schema();
        let point: Point =
            parse_typed(&schema, "=x\n\t3\n=y\n\t4\n", &ParseOptions::default()).unwrap();
        assert_eq!(point, Point { x: 3, y: 4 });
    }

    #[test]
    fn test_unregistered_root() {
        let schema = point_schema();
        let errors = parse_typed::<String>(&schema, "", &ParseOptions::default()).unwrap_err();
        assert_eq!(errors[0].kind, ParseErrorKind::MissingSchema);
    }

    #[test]
    fn test_scalar_root_rejected() {
        let mut schema = Schema::new();
        schema.text();
        let errors =
            parse_typed::<String>(&schema, "=x\n\ty\n", &ParseOptions::default()).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ParseErrorKind::ShapeMismatch);
    }

    #[test]
    fn test_unknown_member_recorded_once() {
        let schema = point_schema();
        let errors = parse_typed::<Point>(
            &schema,
            "=x\n\t1\n=bogus\n\t2\n",
            &ParseOptions::default(),
        )
        .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ParseErrorKind::UnknownMember);
        assert_eq!(errors[0].line, "bogus");
    }
}
