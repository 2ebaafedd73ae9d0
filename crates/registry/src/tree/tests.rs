use objreg_invocation::record;
use pretty_assertions::assert_eq;

use super::*;

record! {
	#[derive(Debug, Default)]
	struct Alpha {
		id: String,
	}
}

record! {
	#[derive(Debug, Default)]
	struct Beta {
		id: String,
	}
}

#[test]
fn lookup_does_not_create() {
	let tree = Tree::default();
	assert_eq!(tree.lookup("user/admin"), None);
	assert_eq!(tree.nodes.len(), 1);
}

#[test]
fn lookup_or_create_builds_intermediate_nodes() {
	let mut tree = Tree::default();
	let admin = tree.lookup_or_create("user/admin");
	let user = tree.lookup("user").unwrap();

	assert_eq!(tree.node(admin).parent, Some(user));
	assert_eq!(tree.node(user).parent, Some(NodeId::ROOT));
	assert_eq!(tree.lookup("user/admin"), Some(admin));
	assert_eq!(tree.lookup_or_create("user/admin"), admin);
	assert_eq!(tree.nodes.len(), 3);
}

#[test]
fn empty_segments_are_literal_names() {
	let mut tree = Tree::default();
	let id = tree.lookup_or_create("a//b");
	assert_eq!(tree.path_of(id), "a//b");
	assert!(tree.lookup("a/b").is_none());
	assert!(tree.lookup("a/").is_some());
}

#[test]
fn path_of_root_is_empty() {
	let tree = Tree::default();
	assert_eq!(tree.path_of(NodeId::ROOT), "");
}

#[test]
fn second_record_type_on_a_node_fails() {
	let mut tree = Tree::default();
	let id = tree.lookup_or_create("org");
	tree.set_record(id, RecordType::of::<Alpha>()).unwrap();

	let err = tree.set_record(id, RecordType::of::<Beta>()).unwrap_err();
	assert!(matches!(err, ConfigError::ConflictingType { ref path, .. } if path == "org"));

	let err = tree.set_record(id, RecordType::of::<Alpha>()).unwrap_err();
	assert!(matches!(err, ConfigError::ConflictingType { .. }));
	assert_eq!(tree.node(id).record, Some(RecordType::of::<Alpha>()));
}

#[test]
fn type_index_tracks_registrations() {
	let mut tree = Tree::default();
	let a = tree.lookup_or_create("a");
	let b = tree.lookup_or_create("x/b");
	tree.set_record(a, RecordType::of::<Alpha>()).unwrap();
	tree.set_record(b, RecordType::of::<Beta>()).unwrap();

	assert_eq!(tree.by_type(TypeId::of::<Alpha>()), Some(a));
	assert_eq!(tree.by_type(TypeId::of::<Beta>()), Some(b));
	assert_eq!(tree.by_type(TypeId::of::<String>()), None);
	assert_eq!(tree.typed().collect::<Vec<_>>(), [a, b]);
}
