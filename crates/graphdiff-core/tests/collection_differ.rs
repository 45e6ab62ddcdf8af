use std::sync::Arc;

use graphdiff_core::{
    CollectionDiffer, Comparator, DiffConfig, DiffError, Node, ObjectDiffer, PrimitiveDiffer, State,
};
use graphdiff_types::{Bean, Path, PathBuilder, Value};

const EMPTY: &[Value] = &[];

fn texts(items: &[&str]) -> Vec<Value> {
    items.iter().map(|s| Value::from(*s)).collect()
}

fn obj(id: &str, value: &str) -> Value {
    Value::from(Bean::new("ObjectWithHashCodeAndEquals").with("id", id).with("value", value))
}

fn identified_differ() -> CollectionDiffer {
    CollectionDiffer::from_config(
        DiffConfig::default().with_identity("ObjectWithHashCodeAndEquals", ["id"]),
    )
}

#[test]
fn construction_without_comparator_is_rejected() {
    let result = CollectionDiffer::builder().build();
    assert!(matches!(result, Err(DiffError::MissingComparator)));
}

#[test]
fn construction_with_comparator() {
    let delegate: Arc<dyn Comparator> = Arc::new(ObjectDiffer::default());
    assert!(CollectionDiffer::builder().comparator(delegate).build().is_ok());
}

#[test]
fn compare_with_empty_lists() {
    let node = CollectionDiffer::default().compare(Some(EMPTY), Some(EMPTY));
    assert!(!node.has_changes());
    assert!(!node.has_children());
}

#[test]
fn compare_with_added_collection() {
    let node = CollectionDiffer::default().compare(Some(EMPTY), None);
    assert_eq!(node.state(), State::Added);
}

#[test]
fn compare_with_removed_collection() {
    let node = CollectionDiffer::default().compare(None, Some(EMPTY));
    assert_eq!(node.state(), State::Removed);
}

#[test]
fn compare_with_added_item() {
    let working = texts(&["foo"]);
    let node = CollectionDiffer::default().compare(Some(working.as_slice()), Some(EMPTY));

    assert!(node.has_changes());
    let path = PathBuilder::new().with_root().with_collection_item("foo").build();
    assert_eq!(node.child(&path).map(Node::state), Some(State::Added));
}

#[test]
fn compare_with_removed_item() {
    let base = texts(&["foo"]);
    let node = CollectionDiffer::default().compare(Some(EMPTY), Some(base.as_slice()));

    assert!(node.has_changes());
    let path = PathBuilder::new().with_root().with_collection_item("foo").build();
    assert_eq!(node.child(&path).map(Node::state), Some(State::Removed));
}

#[test]
fn compare_with_changed_item() {
    let working = vec![obj("foo", "1")];
    let base = vec![obj("foo", "2")];

    let node = identified_differ().compare(Some(working.as_slice()), Some(base.as_slice()));
    assert!(node.has_changes());

    let path = PathBuilder::new()
        .with_root()
        .with_collection_item(Bean::new("ObjectWithHashCodeAndEquals").with("id", "foo"))
        .build();
    assert_eq!(node.child(&path).map(Node::state), Some(State::Changed));
}

#[test]
fn unstable_identity_falls_back_to_full_value() {
    let without_id = Value::from(Bean::new("ObjectWithHashCodeAndEquals").with("value", "1"));
    let working = vec![without_id.clone()];
    let base = vec![without_id.clone()];

    let node = identified_differ().compare(Some(working.as_slice()), Some(base.as_slice()));
    assert!(!node.has_changes());
    assert!(node.child(&Path::root().collection_item(without_id)).is_some());
}

#[test]
fn element_comparison_goes_through_the_injected_comparator() {
    // Equality-only delegate: matched items are leaves, never introspected.
    let differ = CollectionDiffer::builder()
        .comparator(Arc::new(PrimitiveDiffer))
        .build()
        .unwrap();
    let working = vec![obj("foo", "1")];
    let node = differ.compare(Some(working.as_slice()), Some(working.as_slice()));

    let child = node.child(&Path::root().collection_item(obj("foo", "1"))).unwrap();
    assert_eq!(child.state(), State::Untouched);
    assert!(!child.has_children());
}

#[test]
fn nested_collections_recurse() {
    let working = vec![Value::collection(["a", "b"])];
    let base = vec![Value::collection(["a", "b"])];
    let node = CollectionDiffer::default().compare(Some(working.as_slice()), Some(base.as_slice()));
    assert!(!node.has_changes());

    let inner = Path::root().collection_item(Value::collection(["a", "b"]));
    let inner_node = node.child(&inner).unwrap();
    assert_eq!(inner_node.children().len(), 2);
}

#[test]
fn changes_lists_most_specific_nodes() {
    let working = vec![obj("foo", "1"), obj("new", "x")];
    let base = vec![obj("foo", "2"), obj("old", "y")];
    let node = identified_differ().compare(Some(working.as_slice()), Some(base.as_slice()));

    let listing: Vec<String> = node
        .changes()
        .iter()
        .map(|n| format!("{} {}", n.state(), n.path()))
        .collect();
    assert_eq!(
        listing,
        vec![
            "REMOVED /[ObjectWithHashCodeAndEquals(id=old)]",
            "ADDED /[ObjectWithHashCodeAndEquals(id=new)]",
            "CHANGED /[ObjectWithHashCodeAndEquals(id=foo)]/value",
        ]
    );
}

/// Reports every pair as changed, always at the root path.
struct RootAnchored;

impl Comparator for RootAnchored {
    fn compare(&self, _path: &Path, _working: Option<&Value>, _base: Option<&Value>) -> Node {
        Node::with_state(Path::root(), State::Changed)
    }
}

#[test]
fn misplaced_comparator_result_is_kept_at_the_item_path() {
    let differ = CollectionDiffer::builder()
        .comparator(Arc::new(RootAnchored))
        .build()
        .unwrap();
    let working = texts(&["foo"]);
    let node = differ.compare(Some(working.as_slice()), Some(working.as_slice()));

    assert_eq!(node.children().len(), 1);
    assert!(node.has_changes());
    assert_eq!(node.state(), State::Changed);

    let item = Path::root().collection_item("foo");
    let child = node.child(&item).unwrap();
    assert_eq!(child.path(), &item);
    assert_eq!(child.state(), State::Changed);
}
