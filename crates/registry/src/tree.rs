//! Arena storage behind a [`crate::Registry`].
//!
//! Nodes live in one `Vec` and refer to each other by [`NodeId`]. Nothing is ever
//! removed, so ids stay valid for the lifetime of the tree.

use std::any::TypeId;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::types::RecordType;
use crate::{Actions, ConfigError, Method, PATH_SEPARATOR};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(usize);

impl NodeId {
	pub(crate) const ROOT: Self = Self(0);

	fn index(self) -> usize {
		self.0
	}
}

#[derive(Debug, Default)]
pub(crate) struct NodeData {
	pub(crate) name: String,
	pub(crate) parent: Option<NodeId>,
	pub(crate) children: FxHashMap<String, NodeId>,
	pub(crate) record: Option<RecordType>,
	pub(crate) methods: FxHashMap<String, Arc<Method>>,
	pub(crate) actions: Option<Actions>,
	pub(crate) doc: String,
	pub(crate) field_docs: FxHashMap<String, String>,
}

#[derive(Debug)]
pub(crate) struct Tree {
	nodes: Vec<NodeData>,
	types: FxHashMap<TypeId, NodeId>,
}

impl Default for Tree {
	fn default() -> Self {
		Self {
			nodes: vec![NodeData::default()],
			types: FxHashMap::default(),
		}
	}
}

impl Tree {
	pub(crate) fn node(&self, id: NodeId) -> &NodeData {
		&self.nodes[id.index()]
	}

	pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut NodeData {
		&mut self.nodes[id.index()]
	}

	/// Follows `path` from the root without creating anything.
	///
	/// Every `/`-separated segment is a literal child name, empty ones included.
	pub(crate) fn lookup(&self, path: &str) -> Option<NodeId> {
		path.split(PATH_SEPARATOR).try_fold(NodeId::ROOT, |at, segment| self.node(at).children.get(segment).copied())
	}

	/// Follows `path` from the root, creating missing nodes along the way.
	pub(crate) fn lookup_or_create(&mut self, path: &str) -> NodeId {
		let mut at = NodeId::ROOT;
		for segment in path.split(PATH_SEPARATOR) {
			at = match self.node(at).children.get(segment) {
				Some(&child) => child,
				None => self.push_child(at, segment),
			};
		}
		at
	}

	fn push_child(&mut self, parent: NodeId, name: &str) -> NodeId {
		let id = NodeId(self.nodes.len());
		self.nodes.push(NodeData {
			name: name.to_owned(),
			parent: Some(parent),
			..NodeData::default()
		});
		self.node_mut(parent).children.insert(name.to_owned(), id);
		id
	}

	/// Full `/`-joined path of `id`. The root's path is empty.
	pub(crate) fn path_of(&self, id: NodeId) -> String {
		let mut segments = Vec::new();
		let mut at = id;
		while let Some(parent) = self.node(at).parent {
			segments.push(self.node(at).name.as_str());
			at = parent;
		}
		segments.reverse();
		segments.join(&PATH_SEPARATOR.to_string())
	}

	/// Attaches `ty` to `id` and indexes it.
	///
	/// A node's record type is set at most once; any second attempt fails, even with
	/// the same type.
	pub(crate) fn set_record(&mut self, id: NodeId, ty: RecordType) -> Result<(), ConfigError> {
		if let Some(existing) = self.node(id).record {
			return Err(ConfigError::ConflictingType {
				path: self.path_of(id),
				existing: existing.name(),
				incoming: ty.name(),
			});
		}
		self.node_mut(id).record = Some(ty);
		self.types.insert(ty.id(), id);
		Ok(())
	}

	pub(crate) fn by_type(&self, id: TypeId) -> Option<NodeId> {
		self.types.get(&id).copied()
	}

	/// Ids of every node carrying a record type.
	pub(crate) fn typed(&self) -> impl Iterator<Item = NodeId> + '_ {
		self.nodes
			.iter()
			.enumerate()
			.filter(|(_, node)| node.record.is_some())
			.map(|(index, _)| NodeId(index))
	}
}

#[cfg(test)]
mod tests;
