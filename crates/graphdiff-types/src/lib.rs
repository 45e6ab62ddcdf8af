//! Foundation types for graphdiff.
//!
//! This crate provides the value model that the diff engine compares and the
//! path addressing scheme used to locate a change inside a result tree. Every
//! other graphdiff crate depends on `graphdiff-types`.
//!
//! # Key Types
//!
//! - [`Value`] -- Owned, dynamically shaped value (primitive, collection, map, or bean)
//! - [`Bean`] -- Typed bag of named properties
//! - [`Float`] -- Totally ordered `f64` wrapper so values can be set and map keys
//! - [`Path`] / [`PathElement`] -- Immutable address of a location in a value graph
//! - [`PathBuilder`] -- Incremental path construction

pub mod error;
pub mod path;
pub mod value;

pub use error::TypeError;
pub use path::{Path, PathBuilder, PathElement};
pub use value::{Bean, Float, Value, ValueKind};
