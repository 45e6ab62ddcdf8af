//! Bean diff: compare two beans property by property.

use std::collections::BTreeSet;
use std::sync::Arc;

use graphdiff_types::{Bean, Path, PathElement, Value};
use tracing::{debug, trace};

use crate::comparator::Comparator;
use crate::node::{Node, State};
use crate::primitive::compare_primitives;

/// Compares beans, delegating each property to a [`Comparator`].
#[derive(Clone)]
pub struct BeanDiffer {
    delegate: Arc<dyn Comparator>,
}

impl BeanDiffer {
    pub fn new(delegate: Arc<dyn Comparator>) -> Self {
        Self { delegate }
    }

    pub fn compare(&self, working: Option<&Bean>, base: Option<&Bean>) -> Node {
        self.compare_at(&Path::root(), working, base)
    }

    pub fn compare_at(&self, path: &Path, working: Option<&Bean>, base: Option<&Bean>) -> Node {
        compare_beans(self.delegate.as_ref(), path, working, base)
    }
}

/// Beans of different types are reported as a `Changed` replacement leaf.
/// Otherwise the union of both property sets is walked in name order,
/// skipping properties the delegate excludes.
pub(crate) fn compare_beans(
    delegate: &dyn Comparator,
    path: &Path,
    working: Option<&Bean>,
    base: Option<&Bean>,
) -> Node {
    let (working, base) = match (working, base) {
        (None, None) => return Node::new(path.clone()),
        (Some(w), None) => {
            return Node::with_state(path.clone(), State::Added)
                .with_values(Some(Value::Bean(w.clone())), None)
        }
        (None, Some(b)) => {
            return Node::with_state(path.clone(), State::Removed)
                .with_values(None, Some(Value::Bean(b.clone())))
        }
        (Some(w), Some(b)) => (w, b),
    };

    if working.type_name() != base.type_name() {
        debug!(
            path = %path,
            working = working.type_name(),
            base = base.type_name(),
            "bean type changed; reporting replacement"
        );
        return compare_primitives(
            path,
            Some(&Value::Bean(working.clone())),
            Some(&Value::Bean(base.clone())),
        );
    }

    let names: BTreeSet<&str> = working.property_names().chain(base.property_names()).collect();

    let mut node = Node::new(path.clone());
    for name in names {
        let element = PathElement::Property(name.to_string());
        let property_path = path.append(element.clone());
        if delegate.is_excluded(&property_path) {
            trace!(path = %property_path, "skipping excluded property");
            continue;
        }
        let child = delegate.compare(&property_path, working.get(name), base.get(name));
        node.attach(element, child);
    }
    node.resolve_from_children();
    node
}
