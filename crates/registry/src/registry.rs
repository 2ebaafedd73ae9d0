use std::any::TypeId;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::tree::{NodeId, Tree};
use crate::types::RecordType;
use crate::{Actions, Callable, ConfigError, Handler, MEMBER_SEPARATOR, Method, Node, Record};

/// Handle to one registry. Clones share the same tree.
///
/// All mutation happens under a single write lock; lookups take the shared lock.
#[derive(Clone, Default)]
pub struct Registry {
	tree: Arc<RwLock<Tree>>,
}

impl Registry {
	/// Creates an empty registry holding only the root node.
	pub fn new() -> Self {
		Self::default()
	}

	fn node(&self, id: NodeId) -> Node {
		Node::new(self.tree.clone(), id)
	}

	/// Registers record type `T` at `path`, creating intermediate nodes.
	///
	/// # Errors
	///
	/// [`ConfigError::ConflictingType`] if the node at `path` already carries a record
	/// type, including `T` itself.
	pub fn register<T: Record>(&self, path: &str) -> Result<Node, ConfigError> {
		self.attach(path, RecordType::of::<T>(), None)
	}

	/// Like [`Registry::register`], for an already-built type token.
	pub fn register_type(&self, path: &str, ty: RecordType) -> Result<Node, ConfigError> {
		self.attach(path, ty, None)
	}

	/// Registers `T` at `path` together with its action set.
	pub fn register_actions<T: Record>(&self, path: &str, actions: Actions) -> Result<Node, ConfigError> {
		self.attach(path, RecordType::of::<T>(), Some(actions))
	}

	fn attach(&self, path: &str, ty: RecordType, actions: Option<Actions>) -> Result<Node, ConfigError> {
		let id = {
			let mut tree = self.tree.write();
			let id = tree.lookup_or_create(path);
			tree.set_record(id, ty).inspect_err(|err| warn!(%err, "record type registration rejected"))?;
			if let Some(actions) = actions {
				tree.node_mut(id).actions = Some(actions);
			}
			id
		};
		debug!(path, record = ty.name(), "registered record type");
		Ok(self.node(id))
	}

	/// Registers `f` as a method under `"<object-path>:<name>"`.
	///
	/// The object node is created if missing; it needs no record type. A method
	/// already registered under the same name is replaced.
	///
	/// # Errors
	///
	/// [`ConfigError::MissingSeparator`] if `path` has no `:`, or any error from
	/// analyzing `f`.
	pub fn register_method<F, Args>(&self, path: &str, f: F) -> Result<Arc<Method>, ConfigError>
	where
		F: Handler<Args>,
		Args: 'static,
	{
		let (object, name) = split_member(path)?;
		self.insert_method(object, name, Callable::new(f)?)
	}

	/// Like [`Registry::register_method`], for an already-analyzed callable.
	pub fn register_callable(&self, path: &str, callable: Callable) -> Result<Arc<Method>, ConfigError> {
		let (object, name) = split_member(path)?;
		self.insert_method(object, name, callable)
	}

	fn insert_method(&self, object: &str, name: &str, callable: Callable) -> Result<Arc<Method>, ConfigError> {
		let label = callable.label();
		let (method, replaced) = {
			let mut tree = self.tree.write();
			let id = tree.lookup_or_create(object);
			let method = Arc::new(Method::new(name.to_owned(), tree.path_of(id), id, &self.tree, callable));
			let replaced = tree.node_mut(id).methods.insert(name.to_owned(), method.clone()).is_some();
			(method, replaced)
		};
		if replaced {
			debug!(path = object, method = name, callable = label, "replaced method");
		} else {
			debug!(path = object, method = name, callable = label, "registered method");
		}
		Ok(method)
	}

	/// Looks up the node at `path`. Never creates nodes.
	pub fn resolve(&self, path: &str) -> Option<Node> {
		self.tree.read().lookup(path).map(|id| self.node(id))
	}

	/// Looks up a method by `"<object-path>:<name>"`.
	pub fn resolve_method(&self, path: &str) -> Option<Arc<Method>> {
		let (object, name) = path.split_once(MEMBER_SEPARATOR)?;
		self.resolve(object)?.method(name)
	}

	/// The node `T` was registered on.
	pub fn resolve_by_type<T: 'static>(&self) -> Option<Node> {
		self.by_type_id(TypeId::of::<T>())
	}

	pub fn resolve_type(&self, ty: &RecordType) -> Option<Node> {
		self.by_type_id(ty.id())
	}

	fn by_type_id(&self, id: TypeId) -> Option<Node> {
		self.tree.read().by_type(id).map(|id| self.node(id))
	}

	/// The unnamed top-level node.
	pub fn root(&self) -> Node {
		self.node(NodeId::ROOT)
	}

	/// Every node carrying a record type, ordered by path.
	pub fn all(&self) -> Vec<Node> {
		let mut typed: Vec<_> = {
			let tree = self.tree.read();
			tree.typed().map(|id| (tree.path_of(id), id)).collect()
		};
		typed.sort_unstable_by(|a, b| a.0.cmp(&b.0));
		typed.into_iter().map(|(_, id)| self.node(id)).collect()
	}
}

impl fmt::Debug for Registry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Registry").finish_non_exhaustive()
	}
}

/// Splits `"<object-path>:<name>"` on the first `:`.
fn split_member(path: &str) -> Result<(&str, &str), ConfigError> {
	path.split_once(MEMBER_SEPARATOR).ok_or_else(|| {
		let err = ConfigError::MissingSeparator(path.to_owned());
		warn!(%err, "method registration rejected");
		err
	})
}

#[cfg(test)]
mod tests;
