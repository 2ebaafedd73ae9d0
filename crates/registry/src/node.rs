use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::tree::{NodeData, NodeId, Tree};
use crate::types::RecordType;
use crate::{ActionKind, Actions, Callable, Context, Input, InvokeError, Method, Output, TypeDesc};

/// Documentation attached to one field of a node's record type.
#[derive(Debug, Clone)]
pub struct FieldInfo {
	pub name: String,
	pub doc: String,
	/// Declared type, when the node's record type has a field of this exact name.
	pub ty: Option<TypeDesc>,
}

/// Handle to one named point in the hierarchy.
///
/// Handles are cheap to clone and stay valid for as long as any handle to the same
/// registry exists. Each accessor takes the shared lock briefly and returns owned
/// data.
#[derive(Clone)]
pub struct Node {
	tree: Arc<RwLock<Tree>>,
	id: NodeId,
}

impl Node {
	pub(crate) fn new(tree: Arc<RwLock<Tree>>, id: NodeId) -> Self {
		Self { tree, id }
	}

	fn read<R>(&self, f: impl FnOnce(&NodeData) -> R) -> R {
		let tree = self.tree.read();
		f(tree.node(self.id))
	}

	fn write<R>(&self, f: impl FnOnce(&mut NodeData) -> R) -> R {
		let mut tree = self.tree.write();
		f(tree.node_mut(self.id))
	}

	fn at(&self, id: NodeId) -> Self {
		Self::new(self.tree.clone(), id)
	}

	/// Last path segment. Empty for the root.
	pub fn name(&self) -> String {
		self.read(|node| node.name.clone())
	}

	/// Full `/`-separated path from the root.
	pub fn path(&self) -> String {
		self.tree.read().path_of(self.id)
	}

	pub fn is_root(&self) -> bool {
		self.id == NodeId::ROOT
	}

	/// `None` for namespace-only nodes.
	pub fn record_type(&self) -> Option<RecordType> {
		self.read(|node| node.record)
	}

	/// A fresh zero value of the node's record type.
	pub fn new_instance(&self) -> Option<Output> {
		self.record_type().map(|ty| ty.instantiate())
	}

	pub fn parent(&self) -> Option<Node> {
		self.read(|node| node.parent).map(|id| self.at(id))
	}

	pub fn child(&self, name: &str) -> Option<Node> {
		self.read(|node| node.children.get(name).copied()).map(|id| self.at(id))
	}

	/// Names of direct children, sorted.
	pub fn children(&self) -> Vec<String> {
		let mut names = self.read(|node| node.children.keys().cloned().collect::<Vec<_>>());
		names.sort_unstable();
		names
	}

	pub fn method(&self, name: &str) -> Option<Arc<Method>> {
		self.read(|node| node.methods.get(name).cloned())
	}

	/// Names of registered methods, sorted.
	pub fn methods(&self) -> Vec<String> {
		let mut names = self.read(|node| node.methods.keys().cloned().collect::<Vec<_>>());
		names.sort_unstable();
		names
	}

	pub fn actions(&self) -> Option<Actions> {
		self.read(|node| node.actions.clone())
	}

	pub fn action(&self, kind: ActionKind) -> Option<Callable> {
		self.read(|node| node.actions.as_ref().and_then(|actions| actions.get(kind)).cloned())
	}

	/// Invokes the method `name` with `input`.
	pub fn call(&self, name: &str, ctx: &Context, input: impl Into<Input>) -> Result<Option<Output>, InvokeError> {
		let method = self.method(name).ok_or_else(|| InvokeError::MissingMethod {
			path: self.path(),
			method: name.to_owned(),
		})?;
		method.call(ctx, input)
	}

	pub fn set_doc(&self, doc: impl Into<String>) -> &Self {
		let doc = doc.into();
		self.write(|node| node.doc = doc);
		self
	}

	pub fn doc(&self) -> String {
		self.read(|node| node.doc.clone())
	}

	/// Documents `field`. The name need not be a declared field of the record type.
	pub fn set_field_doc(&self, field: impl Into<String>, doc: impl Into<String>) -> &Self {
		let (field, doc) = (field.into(), doc.into());
		self.write(|node| {
			node.field_docs.insert(field, doc);
		});
		self
	}

	/// Empty when `field` has no documentation.
	pub fn field_doc(&self, field: &str) -> String {
		self.read(|node| node.field_docs.get(field).cloned().unwrap_or_default())
	}

	/// Names of documented fields, sorted.
	pub fn fields(&self) -> Vec<String> {
		let mut names = self.read(|node| node.field_docs.keys().cloned().collect::<Vec<_>>());
		names.sort_unstable();
		names
	}

	pub fn field(&self, name: &str) -> Option<FieldInfo> {
		self.read(|node| {
			let doc = node.field_docs.get(name)?.clone();
			let ty = node.record.and_then(|record| record.field(name)).map(|field| field.type_desc());
			Some(FieldInfo {
				name: name.to_owned(),
				doc,
				ty,
			})
		})
	}
}

impl PartialEq for Node {
	fn eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.tree, &other.tree) && self.id == other.id
	}
}

impl Eq for Node {}

impl fmt::Display for Node {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.path())
	}
}

impl fmt::Debug for Node {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Node").field(&self.path()).finish()
	}
}
