//! Untyped document trees.
//!
//! A successful parse with zero errors yields an [`Object`]: an ordered list
//! of named members, each either a scalar [`Entity::Value`] (possibly
//! multi-line) or a nested [`Entity::Object`]. Member names need not be
//! unique; lookups are multi-valued with first-match convenience.
//!
//! Trees can replay themselves through any [`Visitor`] (see
//! [`Object::visit`]), which is how the writer produces canonical text and
//! how the round-trip law is stated: `parse(write(tree)) == tree`.

use crate::parser::{parse, ParseOptions};
use crate::slice::{lines, LineSlice};
use crate::visitor::{ParseError, ParseErrorKind, Visitor};

/// A document tree node: a scalar payload or a nested object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entity {
    /// A scalar payload. Multi-line payloads join their lines with `\n`;
    /// embedded blank lines are preserved verbatim.
    Value(String),
    /// An ordered collection of named members.
    Object(Object),
}

impl Entity {
    /// The scalar payload, or `""` for objects.
    pub fn value(&self) -> &str {
        match self {
            Entity::Value(v) => v,
            Entity::Object(_) => "",
        }
    }

    /// The nested object, if this is one.
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Entity::Object(o) => Some(o),
            Entity::Value(_) => None,
        }
    }

    /// Replay this entity as events under the member name `name`.
    pub fn apply<'t>(&'t self, name: &'t str, visitor: &mut dyn Visitor<'t>) {
        match self {
            Entity::Value(payload) => {
                visitor.value_begin(LineSlice::new(name));
                if !payload.is_empty() {
                    for line in payload.split('\n') {
                        visitor.value_line(LineSlice::new(line));
                    }
                }
                visitor.value_end(LineSlice::new(name));
            }
            Entity::Object(object) => {
                visitor.object_begin(LineSlice::new(name));
                for member in &object.members {
                    member.entity.apply(&member.name, visitor);
                }
                visitor.object_end(LineSlice::new(name));
            }
        }
    }
}

/// One `(name, entity)` pair of an object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub name: String,
    pub entity: Entity,
}

impl Member {
    /// Names are trimmed at materialization; the parser hands them through
    /// raw, and round-trip fidelity requires them pre-trimmed.
    pub fn new(name: impl AsRef<str>, entity: Entity) -> Self {
        Member { name: name.as_ref().trim().to_owned(), entity }
    }
}

/// An ordered, duplicate-tolerant collection of named members.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Object {
    members: Vec<Member>,
}

impl Object {
    pub fn new(members: Vec<Member>) -> Self {
        Object { members }
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// All entities stored under `name`, in document order.
    ///
    /// The iterator owns its copy of the name, so it may outlive the
    /// caller's borrow.
    pub fn get<'o>(&'o self, name: &str) -> impl Iterator<Item = &'o Entity> + 'o {
        let name = name.to_owned();
        self.members
            .iter()
            .filter(move |m| m.name == name)
            .map(|m| &m.entity)
    }

    /// The first entity stored under `name`.
    pub fn first(&self, name: &str) -> Option<&Entity> {
        self.members
            .iter()
            .find(|m| m.name == name)
            .map(|m| &m.entity)
    }

    /// Replay the members as events, without wrapping the object itself.
    ///
    /// This is the document-root form: driving a fresh
    /// [`crate::writer::Writer`] with it produces canonical text.
    pub fn visit<'t>(&'t self, visitor: &mut dyn Visitor<'t>) {
        for member in &self.members {
            member.entity.apply(&member.name, visitor);
        }
    }
}

/// Parse text into a document tree.
///
/// Returns the root object on a clean parse, or the ordered error list -
/// never a partial tree.
pub fn parse_tree(text: &str, options: &ParseOptions) -> Result<Object, Vec<ParseError>> {
    let mut builder = TreeBuilder::new();
    parse(options, lines(text), &mut builder);
    builder.finish()
}

/// Visitor that assembles an [`Object`] tree from parse events.
///
/// Keeps a stack of open member accumulators seeded with a synthetic root
/// frame; errors are buffered and turn the whole build into a failure.
pub struct TreeBuilder {
    stack: Vec<Frame>,
    value: String,
    first_line: bool,
    errors: Vec<ParseError>,
}

struct Frame {
    name: String,
    members: Vec<Member>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        TreeBuilder {
            stack: vec![Frame { name: String::new(), members: Vec::new() }],
            value: String::new(),
            first_line: true,
            errors: Vec::new(),
        }
    }

    /// The built tree, or the accumulated errors if any were reported.
    pub fn finish(mut self) -> Result<Object, Vec<ParseError>> {
        if !self.errors.is_empty() {
            return Err(self.errors);
        }
        match self.stack.pop() {
            Some(root) if self.stack.is_empty() => Ok(Object::new(root.members)),
            // Unbalanced events can only come from a misbehaving driver.
            _ => Err(vec![ParseError::new(0, "", ParseErrorKind::ProgrammingError)]),
        }
    }

    fn add(&mut self, name: &str, entity: Entity) {
        if let Some(top) = self.stack.last_mut() {
            top.members.push(Member::new(name, entity));
        }
    }
}

impl Default for TreeBuilder {
    fn default() -> Self {
        TreeBuilder::new()
    }
}

impl<'a> Visitor<'a> for TreeBuilder {
    fn value_begin(&mut self, _name: LineSlice<'a>) {
        self.value.clear();
        self.first_line = true;
    }

    fn value_line(&mut self, value: LineSlice<'a>) {
        if self.first_line {
            self.first_line = false;
        } else {
            self.value.push('\n');
        }
        self.value.push_str(value.as_str());
    }

    fn value_end(&mut self, name: LineSlice<'a>) {
        let payload = std::mem::take(&mut self.value);
        self.add(name.as_str(), Entity::Value(payload));
    }

    fn object_begin(&mut self, name: LineSlice<'a>) {
        self.stack.push(Frame {
            name: name.as_str().to_owned(),
            members: Vec::new(),
        });
    }

    fn object_end(&mut self, _name: LineSlice<'a>) {
        if self.stack.len() < 2 {
            return;
        }
        if let Some(frame) = self.stack.pop() {
            let object = Entity::Object(Object::new(frame.members));
            let name = frame.name;
            self.add(&name, object);
        }
    }

    fn error(&mut self, line_no: usize, line: LineSlice<'a>, kind: ParseErrorKind) {
        self.errors.push(ParseError::new(line_no, line.as_str(), kind));
    }
}
