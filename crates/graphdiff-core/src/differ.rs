//! The dispatching comparator.
//!
//! [`ObjectDiffer`] is the default [`Comparator`]: it looks at the shape of
//! the two values and hands them to the collection, map, bean, or primitive
//! differ. The dispatch table is an exhaustive match over [`ValueKind`];
//! values of different kinds are reported as a primitive replacement.

use std::sync::Arc;

use graphdiff_types::{Path, Value, ValueKind};
use tracing::trace;

use crate::bean::compare_beans;
use crate::collection::compare_collections;
use crate::comparator::Comparator;
use crate::config::DiffConfig;
use crate::identity::{DeclaredIdentity, IdentityExtractor};
use crate::map::compare_maps;
use crate::node::Node;
use crate::primitive::compare_primitives;

/// Compares arbitrary values, recursing through collections, maps, and beans.
#[derive(Clone)]
pub struct ObjectDiffer {
    config: Arc<DiffConfig>,
    identity: Arc<dyn IdentityExtractor>,
}

impl ObjectDiffer {
    /// A differ whose collection identity comes from `config.identity`.
    pub fn new(config: DiffConfig) -> Self {
        let identity = Arc::new(DeclaredIdentity::from_config(&config));
        Self {
            config: Arc::new(config),
            identity,
        }
    }

    /// A differ with a custom identity extractor.
    pub fn with_identity(config: DiffConfig, identity: Arc<dyn IdentityExtractor>) -> Self {
        Self {
            config: Arc::new(config),
            identity,
        }
    }

    pub fn config(&self) -> &DiffConfig {
        &self.config
    }

    /// Compare two whole values. `Value::Null` stands for absence.
    pub fn diff(&self, working: &Value, base: &Value) -> Node {
        self.compare(&Path::root(), Some(working), Some(base))
    }

    fn dispatch(&self, path: &Path, working: Option<&Value>, base: Option<&Value>) -> Node {
        let kind = match (working, base) {
            (None, None) => return Node::new(path.clone()),
            (Some(w), Some(b)) if w.kind() != b.kind() => {
                trace!(path = %path, working = %w.kind(), base = %b.kind(), "shape mismatch");
                return compare_primitives(path, working, base);
            }
            (Some(v), _) | (None, Some(v)) => v.kind(),
        };

        match kind {
            ValueKind::Collection => compare_collections(
                self,
                self.identity.as_ref(),
                path,
                working.and_then(Value::as_collection),
                base.and_then(Value::as_collection),
            ),
            ValueKind::Map => compare_maps(
                self,
                path,
                working.and_then(Value::as_map),
                base.and_then(Value::as_map),
            ),
            ValueKind::Bean => {
                let working = working.and_then(Value::as_bean);
                let base = base.and_then(Value::as_bean);
                let equals_only = working
                    .into_iter()
                    .chain(base)
                    .any(|bean| self.config.is_equals_only(bean.type_name()));
                if equals_only {
                    compare_primitives(
                        path,
                        working.cloned().map(Value::Bean).as_ref(),
                        base.cloned().map(Value::Bean).as_ref(),
                    )
                } else {
                    compare_beans(self, path, working, base)
                }
            }
            ValueKind::Null
            | ValueKind::Bool
            | ValueKind::Int
            | ValueKind::Float
            | ValueKind::Text => compare_primitives(path, working, base),
        }
    }
}

impl Default for ObjectDiffer {
    fn default() -> Self {
        Self::new(DiffConfig::default())
    }
}

impl std::fmt::Debug for ObjectDiffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectDiffer")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Comparator for ObjectDiffer {
    fn compare(&self, path: &Path, working: Option<&Value>, base: Option<&Value>) -> Node {
        if self.is_excluded(path) {
            return Node::new(path.clone());
        }
        let working = working.filter(|v| !v.is_null());
        let base = base.filter(|v| !v.is_null());
        self.dispatch(path, working, base)
    }

    fn is_excluded(&self, path: &Path) -> bool {
        self.config.is_excluded(path)
    }
}
