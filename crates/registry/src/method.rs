use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use crate::node::Node;
use crate::tree::{NodeId, Tree};
use crate::{Callable, Context, Input, InvokeError, MEMBER_SEPARATOR, Output};

/// A callable registered on a node under a member name.
///
/// Shared as `Arc<Method>`, so a resolved method stays callable without touching the
/// registry lock. Doc and instance metadata may be set at any time and never affect
/// dispatch.
pub struct Method {
	name: String,
	object_path: String,
	node: NodeId,
	tree: Weak<RwLock<Tree>>,
	callable: Callable,
	doc: RwLock<String>,
	requires_instance: AtomicBool,
}

impl Method {
	pub(crate) fn new(name: String, object_path: String, node: NodeId, tree: &Arc<RwLock<Tree>>, callable: Callable) -> Self {
		Self {
			name,
			object_path,
			node,
			tree: Arc::downgrade(tree),
			callable,
			doc: RwLock::default(),
			requires_instance: AtomicBool::new(false),
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn callable(&self) -> &Callable {
		&self.callable
	}

	/// The node this method is registered on, while its registry is alive.
	pub fn object(&self) -> Option<Node> {
		self.tree.upgrade().map(|tree| Node::new(tree, self.node))
	}

	pub fn call(&self, ctx: &Context, input: impl Into<Input>) -> Result<Option<Output>, InvokeError> {
		self.callable.call(ctx, input)
	}

	pub fn set_doc(&self, doc: impl Into<String>) -> &Self {
		*self.doc.write() = doc.into();
		self
	}

	pub fn doc(&self) -> String {
		self.doc.read().clone()
	}

	/// Marks whether callers are expected to place an object instance in the
	/// context. Not enforced here.
	pub fn set_requires_instance(&self, requires: bool) -> &Self {
		self.requires_instance.store(requires, Ordering::Relaxed);
		self
	}

	pub fn requires_instance(&self) -> bool {
		self.requires_instance.load(Ordering::Relaxed)
	}
}

impl fmt::Display for Method {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}{MEMBER_SEPARATOR}{}", self.object_path, self.name)
	}
}

impl fmt::Debug for Method {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Method")
			.field("path", &format_args!("{self}"))
			.field("callable", &self.callable.label())
			.field("requires_instance", &self.requires_instance())
			.finish_non_exhaustive()
	}
}
