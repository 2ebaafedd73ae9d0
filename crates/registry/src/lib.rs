//! Hierarchical registry of record types and their callable members.
//!
//! Types are registered under `/`-separated paths, methods under
//! `"<object-path>:<name>"`. Both are resolved later by path or, for types, by
//! record type identity, and invoked through [`objreg_invocation`].
//!
//! # Mental Model
//!
//! - **Registration** happens once at startup. It walks the path, creating
//!   namespace nodes as needed, and fails with [`ConfigError`] on a conflicting type
//!   or a malformed member path. Callers propagate that out of initialization.
//! - **Serving** is read-heavy. [`Registry::resolve`] and
//!   [`Registry::resolve_by_type`] hand out [`Node`] handles; methods are shared
//!   [`Method`]s invoked without holding any lock.
//!
//! # Key Types
//!
//! | Type | Role |
//! |------|------|
//! | [`Registry`] | Cheap-to-clone handle over the tree and its type index. |
//! | [`Node`] | One named point in the hierarchy. |
//! | [`Method`] | A callable registered on a node, plus its metadata. |
//! | [`Actions`] | The four well-known slots: fetch, list, create, clear. |
//! | [`RecordType`] | Per-type token stored in the type index. |
//!
//! # Example
//!
//! ```
//! use objreg_registry::{BoxError, Context, Registry, record};
//!
//! record! {
//! 	#[derive(Debug, Default, Clone)]
//! 	pub struct Person {
//! 		id: String,
//! 		email: String,
//! 	}
//! }
//!
//! fn get_by_email(_ctx: Context, email: String) -> Result<Person, BoxError> {
//! 	Ok(Person { id: "1".into(), email })
//! }
//!
//! let registry = Registry::new();
//! registry.register::<Person>("user").unwrap();
//! registry.register_method("user:getByEmail", get_by_email).unwrap();
//!
//! let node = registry.resolve("user").unwrap();
//! let out = node.call("getByEmail", &Context::new(), "a@b.com").unwrap().unwrap();
//! assert_eq!(out.downcast_ref::<Person>().unwrap().email, "a@b.com");
//! ```

mod actions;
mod fetch;
mod method;
mod node;
mod registry;
mod tree;
mod types;

pub use actions::{ActionKind, Actions};
pub use method::Method;
pub use node::{FieldInfo, Node};
pub use objreg_invocation::*;
pub use objreg_invocation::{error_returns, record, value_returns};
pub use registry::Registry;
pub use types::RecordType;

/// Separates segments of an object path.
pub const PATH_SEPARATOR: char = '/';

/// Separates an object path from a member name.
pub const MEMBER_SEPARATOR: char = ':';

/// Process-wide registry.
///
/// Meant for the outermost boundary of an application. Library code should take a
/// [`Registry`] handle explicitly.
#[cfg(feature = "global")]
pub fn global() -> &'static Registry {
	static GLOBAL: std::sync::OnceLock<Registry> = std::sync::OnceLock::new();
	GLOBAL.get_or_init(Registry::new)
}
