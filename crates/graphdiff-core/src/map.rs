//! Map diff: compare two maps entry by entry.
//!
//! Entries are matched by key. Keys only in working are `Added`, keys only in
//! base are `Removed`, and keys on both sides are handed to the comparator.
//! Children follow the same ordering as collections: removals, additions,
//! then matched entries, each in key order.

use std::collections::BTreeMap;
use std::sync::Arc;

use graphdiff_types::{Path, PathElement, Value};
use tracing::debug;

use crate::comparator::Comparator;
use crate::node::{Node, State};

/// Compares maps, delegating shared entries to a [`Comparator`].
#[derive(Clone)]
pub struct MapDiffer {
    delegate: Arc<dyn Comparator>,
}

impl MapDiffer {
    pub fn new(delegate: Arc<dyn Comparator>) -> Self {
        Self { delegate }
    }

    pub fn compare(
        &self,
        working: Option<&BTreeMap<Value, Value>>,
        base: Option<&BTreeMap<Value, Value>>,
    ) -> Node {
        self.compare_at(&Path::root(), working, base)
    }

    pub fn compare_at(
        &self,
        path: &Path,
        working: Option<&BTreeMap<Value, Value>>,
        base: Option<&BTreeMap<Value, Value>>,
    ) -> Node {
        compare_maps(self.delegate.as_ref(), path, working, base)
    }
}

pub(crate) fn compare_maps(
    delegate: &dyn Comparator,
    path: &Path,
    working: Option<&BTreeMap<Value, Value>>,
    base: Option<&BTreeMap<Value, Value>>,
) -> Node {
    let (working, base) = match (working, base) {
        (None, None) => return Node::new(path.clone()),
        (Some(w), None) => {
            return Node::with_state(path.clone(), State::Added)
                .with_values(Some(Value::Map(w.clone())), None)
        }
        (None, Some(b)) => {
            return Node::with_state(path.clone(), State::Removed)
                .with_values(None, Some(Value::Map(b.clone())))
        }
        (Some(w), Some(b)) => (w, b),
    };

    let mut node = Node::new(path.clone());

    let removed = base.iter().filter(|(key, _)| !working.contains_key(*key));
    for (key, value) in removed {
        let element = PathElement::MapKey(key.clone());
        let entry_path = path.append(element.clone());
        if !delegate.is_excluded(&entry_path) {
            node.attach(
                element,
                Node::with_state(entry_path, State::Removed).with_values(None, Some(value.clone())),
            );
        }
    }

    let added = working.iter().filter(|(key, _)| !base.contains_key(*key));
    for (key, value) in added {
        let element = PathElement::MapKey(key.clone());
        let entry_path = path.append(element.clone());
        if !delegate.is_excluded(&entry_path) {
            node.attach(
                element,
                Node::with_state(entry_path, State::Added).with_values(Some(value.clone()), None),
            );
        }
    }

    for (key, working_value) in working {
        let Some(base_value) = base.get(key) else {
            continue;
        };
        let element = PathElement::MapKey(key.clone());
        let entry_path = path.append(element.clone());
        if !delegate.is_excluded(&entry_path) {
            let child = delegate.compare(&entry_path, Some(working_value), Some(base_value));
            node.attach(element, child);
        }
    }

    node.resolve_from_children();
    debug!(path = %path, entries = node.children().len(), state = %node.state(), "compared maps");
    node
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::PrimitiveDiffer;

    fn differ() -> MapDiffer {
        MapDiffer::new(Arc::new(PrimitiveDiffer))
    }

    fn map(entries: &[(&str, i64)]) -> BTreeMap<Value, Value> {
        entries
            .iter()
            .map(|(k, v)| (Value::from(*k), Value::Int(*v)))
            .collect()
    }

    #[test]
    fn presence_rules() {
        let empty = BTreeMap::new();
        assert_eq!(differ().compare(None, None).state(), State::Untouched);
        assert_eq!(differ().compare(Some(&empty), None).state(), State::Added);
        assert_eq!(differ().compare(None, Some(&empty)).state(), State::Removed);
    }

    #[test]
    fn entry_level_changes() {
        let working = map(&[("keep", 1), ("modify", 2), ("added", 3)]);
        let base = map(&[("keep", 1), ("modify", 1), ("removed", 4)]);

        let node = differ().compare(Some(&working), Some(&base));
        assert_eq!(node.state(), State::Changed);

        let root = Path::root();
        let state_at = |key: &str| node.child(&root.map_key(key)).map(Node::state);
        assert_eq!(state_at("keep"), Some(State::Untouched));
        assert_eq!(state_at("modify"), Some(State::Changed));
        assert_eq!(state_at("added"), Some(State::Added));
        assert_eq!(state_at("removed"), Some(State::Removed));
    }

    #[test]
    fn identical_maps_are_untouched() {
        let working = map(&[("a", 1), ("b", 2)]);
        let node = differ().compare(Some(&working), Some(&working.clone()));
        assert!(!node.has_changes());
        assert_eq!(node.children().len(), 2);
    }

    #[test]
    fn children_ordered_removed_added_matched() {
        let working = map(&[("b", 1), ("c", 1)]);
        let base = map(&[("a", 1), ("c", 2)]);
        let node = differ().compare(Some(&working), Some(&base));
        let paths: Vec<String> = node.children().iter().map(|c| c.path().to_string()).collect();
        assert_eq!(paths, vec!["/{a}", "/{b}", "/{c}"]);
    }
}
