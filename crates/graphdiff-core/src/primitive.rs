//! Equality comparison for scalar values and opaque replacements.

use graphdiff_types::{Path, Value};

use crate::comparator::Comparator;
use crate::node::{Node, State};

/// Compare two values by equality alone.
///
/// The resulting node is always a leaf carrying snapshots of both sides. Null
/// counts as absent.
pub fn compare_primitives(path: &Path, working: Option<&Value>, base: Option<&Value>) -> Node {
    let working = working.filter(|v| !v.is_null());
    let base = base.filter(|v| !v.is_null());

    let state = match (working, base) {
        (None, None) => State::Untouched,
        (Some(_), None) => State::Added,
        (None, Some(_)) => State::Removed,
        (Some(w), Some(b)) if w == b => State::Untouched,
        (Some(_), Some(_)) => State::Changed,
    };

    Node::with_state(path.clone(), state).with_values(working.cloned(), base.cloned())
}

/// A [`Comparator`] that compares every value by equality, without
/// descending into collections, maps, or beans.
#[derive(Clone, Copy, Debug, Default)]
pub struct PrimitiveDiffer;

impl Comparator for PrimitiveDiffer {
    fn compare(&self, path: &Path, working: Option<&Value>, base: Option<&Value>) -> Node {
        compare_primitives(path, working, base)
    }
}
