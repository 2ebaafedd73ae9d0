use pretty_assertions::assert_eq;

use crate::{Actions, BoxError, Context, InvokeError, Registry, record};

record! {
	#[derive(Debug, Default, Clone, PartialEq)]
	struct Ticket {
		id: String,
		title: String,
	}
}

record! {
	#[derive(Debug, Default, Clone, PartialEq)]
	struct TicketQuery {
		id: String,
	}
}

fn ticket(id: String) -> Ticket {
	Ticket {
		title: format!("ticket {id}"),
		id,
	}
}

#[test]
fn string_parameter_receives_raw_id() {
	let registry = Registry::new();
	let actions = Actions::new().with_fetch(|_: Context, id: String| Ok::<_, BoxError>(ticket(id))).unwrap();
	registry.register_actions::<Ticket>("ticket", actions).unwrap();

	let found: Ticket = registry.fetch_by_id(&Context::new(), "7").unwrap();
	assert_eq!(found, ticket("7".into()));
}

#[test]
fn record_parameter_receives_id_field() {
	let registry = Registry::new();
	let actions = Actions::new()
		.with_fetch(|q: TicketQuery, _: Context| Ok::<_, BoxError>(Box::new(ticket(q.id))))
		.unwrap();
	registry.register_actions::<Ticket>("ticket", actions).unwrap();

	let found = registry.fetch_by_id::<Ticket>(&Context::new(), "9").unwrap();
	assert_eq!(found.id, "9");
}

#[test]
fn unknown_type() {
	let err = Registry::new().fetch_by_id::<Ticket>(&Context::new(), "1").unwrap_err();
	assert!(matches!(err, InvokeError::UnknownType(name) if name.ends_with("Ticket")));
}

#[test]
fn missing_action() {
	let registry = Registry::new();
	registry.register::<Ticket>("ticket").unwrap();
	let err = registry.fetch_by_id::<Ticket>(&Context::new(), "1").unwrap_err();
	assert!(matches!(err, InvokeError::MissingAction { action: "fetch", .. }));

	let registry = Registry::new();
	let actions = Actions::new().with_list(|| Ok::<_, BoxError>(Vec::<Ticket>::new())).unwrap();
	registry.register_actions::<Ticket>("ticket", actions).unwrap();
	let err = registry.fetch_by_id::<Ticket>(&Context::new(), "1").unwrap_err();
	assert!(matches!(err, InvokeError::MissingAction { ref path, .. } if path == "ticket"));
}

#[test]
fn wrong_return_type_names_both_types() {
	let registry = Registry::new();
	let actions = Actions::new().with_fetch(|id: String| Ok::<_, BoxError>(id.len())).unwrap();
	registry.register_actions::<Ticket>("ticket", actions).unwrap();

	let err = registry.fetch_by_id::<Ticket>(&Context::new(), "1").unwrap_err();
	let msg = err.to_string();
	assert!(matches!(err, InvokeError::TypeMismatch { actual: "usize", .. }));
	assert!(msg.contains("Ticket"), "{msg}");
	assert!(msg.contains("usize"), "{msg}");
}

#[test]
fn no_value_is_a_mismatch() {
	let registry = Registry::new();
	let actions = Actions::new().with_fetch(|_: String| ()).unwrap();
	registry.register_actions::<Ticket>("ticket", actions).unwrap();

	let err = registry.fetch_by_id::<Ticket>(&Context::new(), "1").unwrap_err();
	assert!(matches!(err, InvokeError::TypeMismatch { actual: "nothing", .. }));
}

#[test]
fn callable_error_passes_through() {
	let registry = Registry::new();
	let actions = Actions::new()
		.with_fetch(|id: String| Err::<Ticket, BoxError>(format!("no ticket {id}").into()))
		.unwrap();
	registry.register_actions::<Ticket>("ticket", actions).unwrap();

	let err = registry.fetch_by_id::<Ticket>(&Context::new(), "3").unwrap_err();
	assert!(matches!(err, InvokeError::Call(_)));
	assert_eq!(err.to_string(), "no ticket 3");
}

#[test]
fn untyped_by_id_on_resolved_node() {
	let registry = Registry::new();
	let actions = Actions::new().with_fetch(|id: String| Ok::<_, BoxError>(ticket(id))).unwrap();
	let node = registry.register_actions::<Ticket>("ticket", actions).unwrap();

	let out = node.by_id(&Context::new(), "5").unwrap().unwrap();
	assert_eq!(out.downcast_ref::<Ticket>().map(|t| t.id.as_str()), Some("5"));
}
