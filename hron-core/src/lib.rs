//! HRON - hierarchical tab-indented object notation.
//!
//! HRON is a line-oriented text format: `@name` opens a nested object,
//! `=name` opens a scalar value whose content lines follow one tab deeper,
//! and closing a scope is nothing but the indentation decrease of the next
//! structural line. `!` preprocessor lines may lead the document and `#`
//! comment lines may appear wherever a tag could.
//!
//! The crate is layered around one interface, the [`Visitor`] event
//! protocol:
//!
//! - [`slice`] - zero-copy [`LineSlice`] views and the [`lines`] splitter.
//! - [`parser`] - the indentation state machine; [`parse`] drives a visitor
//!   over a line sequence and never allocates for names or content.
//! - [`tree`] / [`writer`] - the untyped layer: [`parse_tree`] builds an
//!   [`Object`] tree, [`write_object`] renders one back to canonical text,
//!   and `parse(write(tree)) == tree` holds for every tree.
//! - [`schema`] / [`binder`] - the typed layer: a caller-owned [`Schema`]
//!   describes target types as a closed set of shapes and [`parse_typed`]
//!   hydrates an instance directly from the event stream.
//!
//! # Example
//!
//! ```
//! use hron_core::{parse_tree, write_object, ParseOptions};
//!
//! let text = "@config\n\t=host\n\t\texample.com\n\t=port\n\t\t8080\n";
//! let root = parse_tree(text, &ParseOptions::default()).unwrap();
//! let config = root.first("config").unwrap().as_object().unwrap();
//! assert_eq!(config.first("host").unwrap().value(), "example.com");
//!
//! let canonical = write_object(&root);
//! let reparsed = parse_tree(&canonical, &ParseOptions::default()).unwrap();
//! assert_eq!(reparsed, root);
//! ```

pub mod binder;
pub mod parser;
pub mod schema;
pub mod slice;
pub mod tree;
pub mod visitor;
pub mod writer;

pub use binder::{parse_typed, Binder};
pub use parser::{parse, ParseOptions};
pub use schema::{Schema, ShapeId};
pub use slice::{lines, LineSlice, Lines};
pub use tree::{parse_tree, Entity, Member, Object, TreeBuilder};
pub use visitor::{ParseError, ParseErrorKind, Visitor};
pub use writer::{write_object, Writer};
