use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::*;
use crate::{BoxError, Context, InvokeError, record};

record! {
	#[derive(Debug, Default, Clone, PartialEq)]
	struct User {
		id: String,
		email: String,
	}
}

record! {
	#[derive(Debug, Default, Clone, PartialEq)]
	struct Admin {
		id: String,
		level: u8,
	}
}

#[test]
fn register_then_resolve() {
	let registry = Registry::new();
	let node = registry.register::<User>("user").unwrap();

	assert_eq!(registry.resolve("user"), Some(node.clone()));
	assert_eq!(registry.resolve_by_type::<User>(), Some(node.clone()));
	assert_eq!(registry.resolve_type(&RecordType::of::<User>()), Some(node.clone()));
	assert!(node.record_type().unwrap().is::<User>());
	assert_eq!(node.parent(), Some(registry.root()));
}

#[test]
fn nested_paths_create_namespaces() {
	let registry = Registry::new();
	let admin = registry.register::<Admin>("user/admin").unwrap();
	let user = registry.resolve("user").unwrap();

	assert!(user.record_type().is_none());
	assert!(user.new_instance().is_none());
	assert_eq!(user.child("admin"), Some(admin.clone()));
	assert_eq!(user.children(), ["admin"]);
	assert_eq!(admin.to_string(), "user/admin");
	assert_eq!(admin.name(), "admin");

	// A namespace node can still take a type later.
	registry.register::<User>("user").unwrap();
	assert_eq!(registry.resolve_by_type::<User>(), Some(user));
}

#[test]
fn resolve_never_creates() {
	let registry = Registry::new();
	assert!(registry.resolve("missing/deeper").is_none());
	assert!(registry.root().children().is_empty());
	assert!(registry.resolve_by_type::<User>().is_none());
}

#[test]
fn conflicting_registration_fails() {
	let registry = Registry::new();
	registry.register::<User>("user").unwrap();

	let err = registry.register::<Admin>("user").unwrap_err();
	assert!(matches!(err, ConfigError::ConflictingType { ref path, .. } if path == "user"));

	let err = registry.register::<User>("user").unwrap_err();
	assert!(matches!(err, ConfigError::ConflictingType { .. }));

	let err = registry.register_actions::<User>("user", Actions::new()).unwrap_err();
	assert!(matches!(err, ConfigError::ConflictingType { .. }));
	assert!(registry.resolve("user").unwrap().actions().is_none());
}

#[test]
fn method_path_needs_separator() {
	let registry = Registry::new();
	let err = registry.register_method("user.getByEmail", || ()).unwrap_err();
	assert_eq!(err, ConfigError::MissingSeparator("user.getByEmail".into()));
	assert!(registry.resolve("user.getByEmail").is_none());
}

#[test]
fn method_registration_splits_on_first_separator() {
	let registry = Registry::new();
	let method = registry.register_method("a/b:c:d", || ()).unwrap();

	assert_eq!(method.name(), "c:d");
	assert_eq!(method.to_string(), "a/b:c:d");
	assert_eq!(method.object(), registry.resolve("a/b"));
	assert!(registry.resolve_method("a/b:c:d").is_some());
}

#[test]
fn method_registration_replaces_previous_binding() {
	let registry = Registry::new();
	registry.register_method("user:version", || Ok::<_, BoxError>(1u32)).unwrap();
	registry.register_method("user:version", || Ok::<_, BoxError>(2u32)).unwrap();

	let node = registry.resolve("user").unwrap();
	assert_eq!(node.methods(), ["version"]);
	let out = node.call("version", &Context::new(), ()).unwrap().unwrap();
	assert_eq!(out.downcast::<u32>().unwrap(), 2);
}

#[test]
fn calling_an_unknown_method() {
	let registry = Registry::new();
	let node = registry.register::<User>("user").unwrap();
	let err = node.call("nope", &Context::new(), ()).unwrap_err();
	assert!(matches!(err, InvokeError::MissingMethod { ref path, ref method } if path == "user" && method == "nope"));
}

#[test]
fn docs_do_not_alter_dispatch() {
	let registry = Registry::new();
	let node = registry.register::<User>("user").unwrap();
	let method = registry.register_method("user:echo", |s: String| Ok::<_, BoxError>(s)).unwrap();

	node.set_doc("A user").set_field_doc("email", "Primary address").set_field_doc("nickname", "Unused");
	method.set_doc("Echo the input").set_requires_instance(true);

	assert_eq!(node.doc(), "A user");
	assert_eq!(node.field_doc("email"), "Primary address");
	assert_eq!(node.field_doc("id"), "");
	assert_eq!(node.fields(), ["email", "nickname"]);

	let email = node.field("email").unwrap();
	assert_eq!(email.doc, "Primary address");
	assert!(email.ty.is_some_and(|ty| ty.is_string()));
	assert!(node.field("nickname").unwrap().ty.is_none());
	assert!(node.field("id").is_none());

	let method = node.method("echo").unwrap();
	assert_eq!(method.doc(), "Echo the input");
	assert!(method.requires_instance());
	let out = node.call("echo", &Context::new(), "hi").unwrap().unwrap();
	assert_eq!(out.downcast::<String>().unwrap(), "hi");
}

#[test]
fn all_lists_typed_nodes_by_path() {
	let registry = Registry::new();
	registry.register::<Admin>("user/admin").unwrap();
	registry.register::<User>("org/member").unwrap();
	registry.register_method("misc:noop", || ()).unwrap();

	let paths: Vec<_> = registry.all().iter().map(ToString::to_string).collect();
	assert_eq!(paths, ["org/member", "user/admin"]);
}

#[test]
fn clones_share_state() {
	let registry = Registry::new();
	let other = registry.clone();
	other.register::<User>("user").unwrap();
	assert!(registry.resolve("user").is_some());
	assert_ne!(Registry::new().root(), registry.root());
}

fn object_path() -> impl Strategy<Value = String> {
	proptest::collection::vec("[a-zA-Z0-9_]{0,8}", 1..5).prop_map(|segments| segments.join("/"))
}

proptest! {
	#[test]
	fn registered_paths_resolve_to_their_type(path in object_path()) {
		let registry = Registry::new();
		let node = registry.register::<User>(&path).unwrap();

		let resolved = registry.resolve(&path).unwrap();
		prop_assert_eq!(&resolved, &node);
		prop_assert_eq!(registry.resolve_by_type::<User>(), Some(node));
		prop_assert_eq!(resolved.to_string(), path);
		let instance = resolved.new_instance().unwrap();
		prop_assert!(instance.is::<User>());
	}

	#[test]
	fn sibling_paths_stay_distinct(a in object_path(), b in object_path()) {
		prop_assume!(a != b);
		let registry = Registry::new();
		let first = registry.register::<User>(&a).unwrap();
		let second = registry.register::<Admin>(&b).unwrap();

		prop_assert_ne!(&first, &second);
		prop_assert_eq!(registry.resolve_by_type::<User>(), Some(first));
		prop_assert_eq!(registry.resolve_by_type::<Admin>(), Some(second));
	}
}
