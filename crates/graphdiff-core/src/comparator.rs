//! The [`Comparator`] trait: the seam between the specialised differs.
//!
//! The collection, map, and bean differs never compare nested values
//! themselves. They hand each matched pair to a comparator, which is normally
//! an [`ObjectDiffer`](crate::ObjectDiffer) dispatching on the values' shape.

use graphdiff_types::{Path, Value};

use crate::node::Node;

/// Compares two optional values at a path and describes their difference.
///
/// Implementations must return a node whose path equals `path`, and must
/// treat `None` (and `Value::Null`) as absence: absent/absent is
/// `Untouched`, present/absent is `Added`, absent/present is `Removed`.
pub trait Comparator: Send + Sync {
    fn compare(&self, path: &Path, working: Option<&Value>, base: Option<&Value>) -> Node;

    /// Returns `true` if nothing at `path` should be compared or reported.
    ///
    /// Differs consult this before attaching a child, so an excluded location
    /// is omitted from the tree entirely.
    fn is_excluded(&self, _path: &Path) -> bool {
        false
    }
}
