//! Collection diff: compare two collections as sets keyed by identity.
//!
//! Elements carry no positional identity across two independent
//! collections, so each side is indexed by [`IdentityExtractor`] key:
//!
//! - keys only in working become `Added` children,
//! - keys only in base become `Removed` children,
//! - keys on both sides are handed to the [`Comparator`], which decides
//!   whether the element is `Changed` or `Untouched`.
//!
//! Children appear as removals, then additions, then matched elements, each
//! group in key order, so repeated runs over equal inputs produce equal trees.
//! Elements of one collection that share a key collapse onto the first.

use std::collections::BTreeMap;
use std::sync::Arc;

use graphdiff_types::{Path, PathElement, Value};
use tracing::debug;

use crate::comparator::Comparator;
use crate::config::DiffConfig;
use crate::differ::ObjectDiffer;
use crate::error::{DiffError, DiffResult};
use crate::identity::{DeclaredIdentity, IdentityExtractor};
use crate::node::{Node, State};

/// Compares collections, delegating matched elements to a [`Comparator`].
#[derive(Clone)]
pub struct CollectionDiffer {
    delegate: Arc<dyn Comparator>,
    identity: Arc<dyn IdentityExtractor>,
}

impl CollectionDiffer {
    /// A differ that matches elements by their full value.
    pub fn new(delegate: Arc<dyn Comparator>) -> Self {
        Self {
            delegate,
            identity: Arc::new(DeclaredIdentity::new()),
        }
    }

    pub fn builder() -> CollectionDifferBuilder {
        CollectionDifferBuilder::default()
    }

    /// A differ backed by an [`ObjectDiffer`] and identity declarations from
    /// the same configuration.
    pub fn from_config(config: DiffConfig) -> Self {
        let identity: Arc<dyn IdentityExtractor> = Arc::new(DeclaredIdentity::from_config(&config));
        let delegate = ObjectDiffer::with_identity(config, Arc::clone(&identity));
        Self {
            delegate: Arc::new(delegate),
            identity,
        }
    }

    /// Compare two optional collections at the root path.
    ///
    /// `None` means there is no collection at all, which is distinct from an
    /// empty one.
    pub fn compare(&self, working: Option<&[Value]>, base: Option<&[Value]>) -> Node {
        self.compare_at(&Path::root(), working, base)
    }

    /// Compare two optional collections located at `path`.
    pub fn compare_at(&self, path: &Path, working: Option<&[Value]>, base: Option<&[Value]>) -> Node {
        compare_collections(
            self.delegate.as_ref(),
            self.identity.as_ref(),
            path,
            working,
            base,
        )
    }
}

impl Default for CollectionDiffer {
    fn default() -> Self {
        Self::from_config(DiffConfig::default())
    }
}

impl std::fmt::Debug for CollectionDiffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectionDiffer").finish_non_exhaustive()
    }
}

/// Builder for [`CollectionDiffer`].
///
/// The comparator is mandatory; [`build`](Self::build) fails with
/// [`DiffError::MissingComparator`] without one.
#[derive(Default)]
pub struct CollectionDifferBuilder {
    delegate: Option<Arc<dyn Comparator>>,
    identity: Option<Arc<dyn IdentityExtractor>>,
}

impl CollectionDifferBuilder {
    pub fn comparator(mut self, delegate: Arc<dyn Comparator>) -> Self {
        self.delegate = Some(delegate);
        self
    }

    pub fn identity(mut self, identity: Arc<dyn IdentityExtractor>) -> Self {
        self.identity = Some(identity);
        self
    }

    pub fn build(self) -> DiffResult<CollectionDiffer> {
        let delegate = self.delegate.ok_or(DiffError::MissingComparator)?;
        let identity: Arc<dyn IdentityExtractor> = match self.identity {
            Some(identity) => identity,
            None => Arc::new(DeclaredIdentity::new()),
        };
        Ok(CollectionDiffer { delegate, identity })
    }
}

/// The collection algorithm, shared by [`CollectionDiffer`] and the
/// [`ObjectDiffer`] dispatch.
pub(crate) fn compare_collections(
    delegate: &dyn Comparator,
    identity: &dyn IdentityExtractor,
    path: &Path,
    working: Option<&[Value]>,
    base: Option<&[Value]>,
) -> Node {
    let (working, base) = match (working, base) {
        (None, None) => return Node::new(path.clone()),
        (Some(w), None) => {
            return Node::with_state(path.clone(), State::Added)
                .with_values(Some(Value::Collection(w.to_vec())), None)
        }
        (None, Some(b)) => {
            return Node::with_state(path.clone(), State::Removed)
                .with_values(None, Some(Value::Collection(b.to_vec())))
        }
        (Some(w), Some(b)) => (w, b),
    };

    let working_items = index_by_identity(identity, path, working);
    let base_items = index_by_identity(identity, path, base);

    let mut node = Node::new(path.clone());
    let (mut removed, mut added, mut matched) = (0usize, 0usize, 0usize);

    for (key, item) in &base_items {
        if working_items.contains_key(key) {
            continue;
        }
        let element = PathElement::CollectionItem(key.clone());
        let item_path = path.append(element.clone());
        if delegate.is_excluded(&item_path) {
            continue;
        }
        node.attach(
            element,
            Node::with_state(item_path, State::Removed).with_values(None, Some((*item).clone())),
        );
        removed += 1;
    }

    for (key, item) in &working_items {
        if base_items.contains_key(key) {
            continue;
        }
        let element = PathElement::CollectionItem(key.clone());
        let item_path = path.append(element.clone());
        if delegate.is_excluded(&item_path) {
            continue;
        }
        node.attach(
            element,
            Node::with_state(item_path, State::Added).with_values(Some((*item).clone()), None),
        );
        added += 1;
    }

    for (key, working_item) in &working_items {
        let Some(base_item) = base_items.get(key) else {
            continue;
        };
        let element = PathElement::CollectionItem(key.clone());
        let item_path = path.append(element.clone());
        if delegate.is_excluded(&item_path) {
            continue;
        }
        let child = delegate.compare(&item_path, Some(*working_item), Some(*base_item));
        node.attach(element, child);
        matched += 1;
    }

    node.resolve_from_children();
    debug!(
        path = %path,
        removed,
        added,
        matched,
        state = %node.state(),
        "compared collections"
    );
    node
}

/// Index elements by identity key. The first element with a given key wins.
fn index_by_identity<'a>(
    identity: &dyn IdentityExtractor,
    path: &Path,
    items: &'a [Value],
) -> BTreeMap<Value, &'a Value> {
    let mut indexed = BTreeMap::new();
    for item in items {
        let key = identity.identity_key(item);
        if indexed.contains_key(&key) {
            debug!(path = %path, key = %key, "duplicate identity key collapsed");
            continue;
        }
        indexed.insert(key, item);
    }
    indexed
}
