//! Addresses of locations inside a value graph.
//!
//! A [`Path`] is an immutable sequence of [`PathElement`]s starting at the
//! root of the compared value. Appending never mutates the receiver, so a path
//! handed to a node stays valid as a lookup key.
//!
//! # Display form
//!
//! - `/` is the root
//! - `/name` is a bean property
//! - `[key]` is a collection item, addressed by its identity key
//! - `{key}` is a map entry
//!
//! For example `/addresses[home]/street` or `/scores{2024}`.

use std::fmt;
use std::str::FromStr;

use crate::error::TypeError;
use crate::value::Value;

/// A single step in a [`Path`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PathElement {
    /// A named bean property.
    Property(String),
    /// A collection item, addressed by its identity key.
    CollectionItem(Value),
    /// A map entry, addressed by its key.
    MapKey(Value),
}

impl fmt::Display for PathElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Property(name) => write!(f, "/{name}"),
            Self::CollectionItem(key) => write!(f, "[{key}]"),
            Self::MapKey(key) => write!(f, "{{{key}}}"),
        }
    }
}

/// An immutable, ordered address of a location in a value graph.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Path {
    elements: Vec<PathElement>,
}

impl Path {
    /// The empty path, addressing the compared value itself.
    pub fn root() -> Self {
        Self::default()
    }

    /// A new path with `element` appended.
    pub fn append(&self, element: PathElement) -> Self {
        let mut elements = Vec::with_capacity(self.elements.len() + 1);
        elements.extend(self.elements.iter().cloned());
        elements.push(element);
        Self { elements }
    }

    pub fn property(&self, name: impl Into<String>) -> Self {
        self.append(PathElement::Property(name.into()))
    }

    pub fn collection_item(&self, key: impl Into<Value>) -> Self {
        self.append(PathElement::CollectionItem(key.into()))
    }

    pub fn map_key(&self, key: impl Into<Value>) -> Self {
        self.append(PathElement::MapKey(key.into()))
    }

    pub fn is_root(&self) -> bool {
        self.elements.is_empty()
    }

    /// Number of elements; the root has length zero.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn elements(&self) -> &[PathElement] {
        &self.elements
    }

    /// The final element, or `None` for the root.
    pub fn last(&self) -> Option<&PathElement> {
        self.elements.last()
    }

    /// The enclosing path, or `None` for the root.
    pub fn parent(&self) -> Option<Path> {
        let (_, init) = self.elements.split_last()?;
        Some(Self {
            elements: init.to_vec(),
        })
    }

    /// Returns `true` if `prefix` addresses this location or one of its ancestors.
    pub fn starts_with(&self, prefix: &Path) -> bool {
        self.elements.starts_with(&prefix.elements)
    }

    /// Returns `true` if this path is `parent` plus exactly one element.
    pub fn is_child_of(&self, parent: &Path) -> bool {
        self.len() == parent.len() + 1 && self.starts_with(parent)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.elements.is_empty() {
            return f.write_str("/");
        }
        // Items and keys directly under the root still get a leading slash.
        if !matches!(self.elements[0], PathElement::Property(_)) {
            f.write_str("/")?;
        }
        for element in &self.elements {
            write!(f, "{element}")?;
        }
        Ok(())
    }
}

/// Parses the display form back into a path.
///
/// Bracketed keys are read as `null`, booleans, integers, or otherwise text;
/// bean identity keys cannot be written in this form.
impl FromStr for Path {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| TypeError::InvalidPath {
            input: s.to_string(),
            reason: reason.to_string(),
        };

        let rest = s.strip_prefix('/').ok_or_else(|| invalid("must start with '/'"))?;
        let mut elements = Vec::new();
        let mut chars = rest.char_indices().peekable();
        let mut name_start = Some(0);

        while let Some((i, c)) = chars.next() {
            match c {
                '/' | '[' | '{' => {
                    if let Some(start) = name_start.take() {
                        if start < i {
                            elements.push(PathElement::Property(rest[start..i].to_string()));
                        } else if c == '/' || !elements.is_empty() {
                            return Err(invalid("empty property name"));
                        }
                    }
                    if c == '/' {
                        name_start = Some(i + 1);
                        continue;
                    }
                    let close = if c == '[' { ']' } else { '}' };
                    let key_start = i + 1;
                    let key_end = loop {
                        match chars.next() {
                            Some((j, ch)) if ch == close => break j,
                            Some(_) => {}
                            None => return Err(invalid("unterminated key")),
                        }
                    };
                    let key = parse_key(&rest[key_start..key_end]);
                    elements.push(if c == '[' {
                        PathElement::CollectionItem(key)
                    } else {
                        PathElement::MapKey(key)
                    });
                    if let Some(&(_, next)) = chars.peek() {
                        if !matches!(next, '/' | '[' | '{') {
                            return Err(invalid("unexpected text after key"));
                        }
                    }
                }
                ']' | '}' => return Err(invalid("unbalanced bracket")),
                _ => {}
            }
        }

        if let Some(start) = name_start {
            if start < rest.len() {
                elements.push(PathElement::Property(rest[start..].to_string()));
            } else if !rest.is_empty() {
                return Err(invalid("empty property name"));
            }
        }

        Ok(Self { elements })
    }
}

fn parse_key(raw: &str) -> Value {
    match raw {
        "null" => Value::Null,
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => raw
            .parse::<i64>()
            .map(Value::Int)
            .unwrap_or_else(|_| Value::Text(raw.to_string())),
    }
}

/// Incremental construction of a [`Path`].
///
/// ```
/// use graphdiff_types::{Path, PathBuilder};
///
/// let path = PathBuilder::new().with_root().with_collection_item("foo").build();
/// assert_eq!(path, Path::root().collection_item("foo"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct PathBuilder {
    elements: Vec<PathElement>,
}

impl PathBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from the root, discarding anything appended so far.
    pub fn with_root(mut self) -> Self {
        self.elements.clear();
        self
    }

    pub fn with_property(mut self, name: impl Into<String>) -> Self {
        self.elements.push(PathElement::Property(name.into()));
        self
    }

    pub fn with_collection_item(mut self, key: impl Into<Value>) -> Self {
        self.elements.push(PathElement::CollectionItem(key.into()));
        self
    }

    pub fn with_map_key(mut self, key: impl Into<Value>) -> Self {
        self.elements.push(PathElement::MapKey(key.into()));
        self
    }

    pub fn build(self) -> Path {
        Path {
            elements: self.elements,
        }
    }
}
