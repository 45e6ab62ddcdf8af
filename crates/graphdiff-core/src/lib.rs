//! Diff engine for graphdiff.
//!
//! Compares two value graphs ("working" and "base") and produces a navigable
//! tree of change records rather than a boolean or a flat list. Collections
//! are matched by element identity instead of position, maps by key, and
//! beans property by property.
//!
//! # Key Types
//!
//! - [`Node`] / [`State`] -- One change record and its classification
//! - [`Comparator`] -- The `compare(path, working, base)` contract between differs
//! - [`CollectionDiffer`] -- Identity-keyed collection comparison
//! - [`MapDiffer`] / [`BeanDiffer`] / [`PrimitiveDiffer`] -- The other specialised differs
//! - [`ObjectDiffer`] -- Shape-dispatching comparator tying them together
//! - [`IdentityExtractor`] / [`DeclaredIdentity`] -- How collection elements are matched
//! - [`DiffConfig`] -- Identity declarations, exclusions, equality-only types
//!
//! # Example
//!
//! ```
//! use graphdiff_core::{CollectionDiffer, State};
//! use graphdiff_types::{Path, Value};
//!
//! let working = vec![Value::from("foo")];
//! let node = CollectionDiffer::default().compare(Some(&working[..]), Some(&[][..]));
//!
//! let child = node.child(&Path::root().collection_item("foo")).unwrap();
//! assert_eq!(child.state(), State::Added);
//! ```

pub mod bean;
pub mod collection;
pub mod comparator;
pub mod config;
pub mod differ;
pub mod error;
pub mod identity;
pub mod map;
pub mod node;
pub mod primitive;

pub use bean::BeanDiffer;
pub use collection::{CollectionDiffer, CollectionDifferBuilder};
pub use comparator::Comparator;
pub use config::DiffConfig;
pub use differ::ObjectDiffer;
pub use error::{DiffError, DiffResult};
pub use identity::{DeclaredIdentity, IdentityExtractor};
pub use map::MapDiffer;
pub use node::{Node, NodeVisitor, State, Visit};
pub use primitive::{compare_primitives, PrimitiveDiffer};
