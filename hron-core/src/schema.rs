//! The type schema seam consumed by the typed binder.
//!
//! The binder never discovers anything about target types at runtime: every
//! shape - record field tables, list/map element shapes, scalar codecs - is
//! registered ahead of time in a caller-owned [`Schema`] and resolved once
//! per lookup. Shapes form a closed variant set (record, list, map, scalar);
//! in-progress instances travel as `Box<dyn Any>` and every accessor closure
//! downcasts, reporting a mismatch as `false` instead of panicking.
//!
//! ```
//! use hron_core::schema::Schema;
//!
//! #[derive(Default, PartialEq, Debug)]
//! struct Person { name: String, age: u32 }
//!
//! let mut schema = Schema::new();
//! let text = schema.text();
//! let age = schema.scalar::<u32>();
//! schema
//!     .record::<Person>("Person")
//!     .field("name", text, |p: &mut Person, v: String| p.name = v)
//!     .field("age", age, |p: &mut Person, v: u32| p.age = v)
//!     .finish();
//! assert!(schema.shape_of::<Person>().is_some());
//! ```

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

/// An in-progress instance owned by a binder frame.
pub type Instance = Box<dyn Any>;

/// Handle to a registered shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShapeId(u32);

impl ShapeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// A scalar parse routine plus its string-likeness.
///
/// This is the scalar codec entry: `parse` turns accumulated value text into
/// a boxed instance, or `None` when the text does not parse. String-like
/// scalars carry the identity codec - the raw text binds verbatim.
pub struct ScalarShape {
    pub(crate) string_like: bool,
    parse: Box<dyn Fn(&str) -> Option<Instance>>,
}

impl ScalarShape {
    pub(crate) fn parse(&self, text: &str) -> Option<Instance> {
        (self.parse)(text)
    }
}

/// One entry of a record's field table: the field's shape plus the accessor
/// that binds a value into the owning record.
///
/// For list-typed fields the accessor receives one *item* per call and
/// appends; for all other fields it receives the whole value and sets.
pub struct FieldShape {
    pub(crate) name: String,
    pub(crate) shape: ShapeId,
    bind: Box<dyn Fn(&mut dyn Any, Instance) -> bool>,
}

impl FieldShape {
    pub(crate) fn bind(&self, target: &mut dyn Any, value: Instance) -> bool {
        (self.bind)(target, value)
    }
}

/// A record: named fields in declaration order plus a constructor.
pub struct RecordShape {
    pub(crate) name: String,
    create: Box<dyn Fn() -> Instance>,
    pub(crate) fields: Vec<FieldShape>,
}

impl RecordShape {
    pub(crate) fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }
}

/// A homogeneous list (`Vec<T>` at registration time).
pub struct ListShape {
    pub(crate) item: ShapeId,
    create: Box<dyn Fn() -> Instance>,
    push: Box<dyn Fn(&mut dyn Any, Instance) -> bool>,
}

impl ListShape {
    pub(crate) fn push(&self, target: &mut dyn Any, value: Instance) -> bool {
        (self.push)(target, value)
    }
}

/// A string-keyed map (`HashMap<String, V>` at registration time).
///
/// Keys are always string-like by construction. `insert` refuses a duplicate
/// key by returning `false`: the first write wins.
pub struct MapShape {
    pub(crate) value: ShapeId,
    create: Box<dyn Fn() -> Instance>,
    insert: Box<dyn Fn(&mut dyn Any, &str, Instance) -> bool>,
    contains: Box<dyn Fn(&dyn Any, &str) -> bool>,
}

impl MapShape {
    pub(crate) fn insert(&self, target: &mut dyn Any, key: &str, value: Instance) -> bool {
        (self.insert)(target, key, value)
    }

    pub(crate) fn contains(&self, target: &dyn Any, key: &str) -> bool {
        (self.contains)(target, key)
    }
}

/// The closed shape variant set the binder switches on.
pub enum ShapeKind {
    Scalar(ScalarShape),
    Record(RecordShape),
    List(ListShape),
    Map(MapShape),
}

impl ShapeKind {
    pub(crate) fn create(&self) -> Option<Instance> {
        match self {
            ShapeKind::Record(r) => Some((r.create)()),
            ShapeKind::List(l) => Some((l.create)()),
            ShapeKind::Map(m) => Some((m.create)()),
            // Scalars never become frames; they are parsed in place.
            ShapeKind::Scalar(_) => None,
        }
    }
}

impl fmt::Debug for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeKind::Scalar(s) => f
                .debug_struct("Scalar")
                .field("string_like", &s.string_like)
                .finish(),
            ShapeKind::Record(r) => f
                .debug_struct("Record")
                .field("name", &r.name)
                .field("fields", &r.fields.iter().map(|x| &x.name).collect::<Vec<_>>())
                .finish(),
            ShapeKind::List(l) => f.debug_struct("List").field("item", &l.item).finish(),
            ShapeKind::Map(m) => f.debug_struct("Map").field("value", &m.value).finish(),
        }
    }
}

/// Caller-owned registry of shapes, deduplicated by `TypeId`.
///
/// There is no global cache; the schema is passed into the binder at call
/// time and only read during a parse, so sharing one across threads is safe
/// as long as the caller arranges the sharing.
#[derive(Default)]
pub struct Schema {
    shapes: Vec<ShapeKind>,
    by_type: HashMap<TypeId, ShapeId>,
}

impl Schema {
    pub fn new() -> Self {
        Schema::default()
    }

    /// Shape previously registered for `T`, if any.
    pub fn shape_of<T: 'static>(&self) -> Option<ShapeId> {
        self.by_type.get(&TypeId::of::<T>()).copied()
    }

    pub(crate) fn kind(&self, id: ShapeId) -> &ShapeKind {
        &self.shapes[id.index()]
    }

    fn insert<T: 'static>(&mut self, kind: ShapeKind) -> ShapeId {
        if let Some(existing) = self.shape_of::<T>() {
            return existing;
        }
        let id = ShapeId(self.shapes.len() as u32);
        self.shapes.push(kind);
        self.by_type.insert(TypeId::of::<T>(), id);
        id
    }

    /// Register a scalar parsed through its `FromStr` impl.
    ///
    /// Input is trimmed before parsing, so `=age` payloads may carry
    /// incidental surrounding whitespace.
    pub fn scalar<T: FromStr + 'static>(&mut self) -> ShapeId {
        self.scalar_with::<T>(|text| text.trim().parse::<T>().ok())
    }

    /// Register a scalar with a custom parse routine.
    pub fn scalar_with<T: 'static>(
        &mut self,
        parse: impl Fn(&str) -> Option<T> + 'static,
    ) -> ShapeId {
        self.insert::<T>(ShapeKind::Scalar(ScalarShape {
            string_like: false,
            parse: Box::new(move |text| {
                parse(text).map(|v| Box::new(v) as Instance)
            }),
        }))
    }

    /// Register `String` as the string-like scalar: payloads bind verbatim,
    /// with no codec involved and no trimming.
    pub fn text(&mut self) -> ShapeId {
        self.insert::<String>(ShapeKind::Scalar(ScalarShape {
            string_like: true,
            parse: Box::new(|text| Some(Box::new(text.to_owned()) as Instance)),
        }))
    }

    /// Register `Vec<T>` with the given item shape.
    pub fn list_of<T: 'static>(&mut self, item: ShapeId) -> ShapeId {
        self.insert::<Vec<T>>(ShapeKind::List(ListShape {
            item,
            create: Box::new(|| Box::new(Vec::<T>::new())),
            push: Box::new(|target, value| {
                match (target.downcast_mut::<Vec<T>>(), value.downcast::<T>()) {
                    (Some(list), Ok(value)) => {
                        list.push(*value);
                        true
                    }
                    _ => false,
                }
            }),
        }))
    }

    /// Register `HashMap<String, V>` with the given value shape.
    pub fn map_of<V: 'static>(&mut self, value: ShapeId) -> ShapeId {
        self.insert::<HashMap<String, V>>(ShapeKind::Map(MapShape {
            value,
            create: Box::new(|| Box::new(HashMap::<String, V>::new())),
            insert: Box::new(|target, key, value| {
                let (Some(map), Ok(value)) = (
                    target.downcast_mut::<HashMap<String, V>>(),
                    value.downcast::<V>(),
                ) else {
                    return false;
                };
                if map.contains_key(key) {
                    return false;
                }
                map.insert(key.to_owned(), *value);
                true
            }),
            contains: Box::new(|target, key| {
                target
                    .downcast_ref::<HashMap<String, V>>()
                    .map(|map| map.contains_key(key))
                    .unwrap_or(false)
            }),
        }))
    }

    /// Start a record registration for `R`.
    pub fn record<R: Default + 'static>(&mut self, name: &str) -> RecordBuilder<'_, R> {
        RecordBuilder {
            schema: self,
            name: name.to_owned(),
            fields: Vec::new(),
            _marker: PhantomData,
        }
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("shapes", &self.shapes)
            .finish()
    }
}

/// Builds the field table of one record shape.
pub struct RecordBuilder<'s, R> {
    schema: &'s mut Schema,
    name: String,
    fields: Vec<FieldShape>,
    _marker: PhantomData<fn() -> R>,
}

impl<'s, R: Default + 'static> RecordBuilder<'s, R> {
    /// Declare a field.
    ///
    /// `shape` is the field value's shape. When it is a list shape the
    /// binder calls `set` once per item (append semantics); otherwise `set`
    /// receives the whole value.
    pub fn field<T: 'static>(
        mut self,
        name: &str,
        shape: ShapeId,
        set: impl Fn(&mut R, T) + 'static,
    ) -> Self {
        self.fields.push(FieldShape {
            name: name.to_owned(),
            shape,
            bind: Box::new(move |target, value| {
                match (target.downcast_mut::<R>(), value.downcast::<T>()) {
                    (Some(target), Ok(value)) => {
                        set(target, *value);
                        true
                    }
                    _ => false,
                }
            }),
        });
        self
    }

    /// Finish the registration, producing the record's shape id.
    pub fn finish(self) -> ShapeId {
        let RecordBuilder { schema, name, fields, .. } = self;
        schema.insert::<R>(ShapeKind::Record(RecordShape {
            name,
            create: Box::new(|| Box::new(R::default())),
            fields,
        }))
    }
}
