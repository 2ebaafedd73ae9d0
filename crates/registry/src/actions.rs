use std::fmt;

use objreg_invocation::{Callable, ConfigError, Handler};

/// One of the four well-known action slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
	/// Identifier to instance. The only slot with a defined calling convention, see
	/// [`crate::Node::by_id`].
	Fetch,
	List,
	Create,
	Clear,
}

impl ActionKind {
	pub const ALL: [Self; 4] = [Self::Fetch, Self::List, Self::Create, Self::Clear];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Fetch => "fetch",
			Self::List => "list",
			Self::Create => "create",
			Self::Clear => "clear",
		}
	}
}

impl fmt::Display for ActionKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Optional callables for the four action slots of a record type.
///
/// ```
/// use objreg_registry::{Actions, BoxError, Context};
///
/// let actions = Actions::new()
/// 	.with_fetch(|_: Context, id: String| Ok::<_, BoxError>(id))
/// 	.unwrap();
/// assert!(actions.fetch().is_some());
/// assert!(actions.list().is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Actions {
	fetch: Option<Callable>,
	list: Option<Callable>,
	create: Option<Callable>,
	clear: Option<Callable>,
}

impl Actions {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_fetch<F: Handler<Args>, Args: 'static>(self, f: F) -> Result<Self, ConfigError> {
		self.with(ActionKind::Fetch, f)
	}

	pub fn with_list<F: Handler<Args>, Args: 'static>(self, f: F) -> Result<Self, ConfigError> {
		self.with(ActionKind::List, f)
	}

	pub fn with_create<F: Handler<Args>, Args: 'static>(self, f: F) -> Result<Self, ConfigError> {
		self.with(ActionKind::Create, f)
	}

	pub fn with_clear<F: Handler<Args>, Args: 'static>(self, f: F) -> Result<Self, ConfigError> {
		self.with(ActionKind::Clear, f)
	}

	/// Analyzes `f` and stores it in `kind`'s slot, replacing any previous callable.
	pub fn with<F: Handler<Args>, Args: 'static>(self, kind: ActionKind, f: F) -> Result<Self, ConfigError> {
		Ok(self.with_callable(kind, Callable::new(f)?))
	}

	pub fn with_callable(mut self, kind: ActionKind, callable: Callable) -> Self {
		*self.slot_mut(kind) = Some(callable);
		self
	}

	pub fn get(&self, kind: ActionKind) -> Option<&Callable> {
		match kind {
			ActionKind::Fetch => self.fetch.as_ref(),
			ActionKind::List => self.list.as_ref(),
			ActionKind::Create => self.create.as_ref(),
			ActionKind::Clear => self.clear.as_ref(),
		}
	}

	pub fn fetch(&self) -> Option<&Callable> {
		self.fetch.as_ref()
	}

	pub fn list(&self) -> Option<&Callable> {
		self.list.as_ref()
	}

	pub fn create(&self) -> Option<&Callable> {
		self.create.as_ref()
	}

	pub fn clear(&self) -> Option<&Callable> {
		self.clear.as_ref()
	}

	/// Kinds whose slot holds a callable.
	pub fn kinds(&self) -> impl Iterator<Item = ActionKind> + '_ {
		ActionKind::ALL.into_iter().filter(|&kind| self.get(kind).is_some())
	}

	fn slot_mut(&mut self, kind: ActionKind) -> &mut Option<Callable> {
		match kind {
			ActionKind::Fetch => &mut self.fetch,
			ActionKind::List => &mut self.list,
			ActionKind::Create => &mut self.create,
			ActionKind::Clear => &mut self.clear,
		}
	}
}

#[cfg(test)]
mod tests {
	use objreg_invocation::{BoxError, Context};

	use super::*;

	#[test]
	fn slots_fill_independently() {
		let actions = Actions::new()
			.with_list(|| Ok::<_, BoxError>(Vec::<String>::new()))
			.unwrap()
			.with_clear(|_: Context| ())
			.unwrap();

		assert!(actions.get(ActionKind::Fetch).is_none());
		assert!(actions.get(ActionKind::Create).is_none());
		assert_eq!(actions.kinds().collect::<Vec<_>>(), [ActionKind::List, ActionKind::Clear]);
	}

	#[test]
	fn rejected_signature_is_a_config_error() {
		let err = Actions::new().with_fetch(|_: Context, _: Context| ()).unwrap_err();
		assert!(matches!(err, ConfigError::DuplicateContext { .. }));
	}

	#[test]
	fn kind_names() {
		let names: Vec<_> = ActionKind::ALL.iter().map(ToString::to_string).collect();
		assert_eq!(names, ["fetch", "list", "create", "clear"]);
	}
}
