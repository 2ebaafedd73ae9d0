//! Fetch-by-identifier on top of the type index.

use std::any::type_name;

use objreg_invocation::{Input, Map, Value};

use crate::{ActionKind, Context, InvokeError, Node, Output, Record, Registry};

/// Key of the single-field record passed to Fetch callables that do not take a bare
/// string.
const ID_FIELD: &str = "Id";

impl Node {
	/// Invokes this node's Fetch action for `id`.
	///
	/// A Fetch callable whose first data parameter is a string receives `id` as-is;
	/// any other receives the record `{"Id": id}`.
	///
	/// Returns `Ok(None)` if the callable produced no value.
	pub fn by_id(&self, ctx: &Context, id: &str) -> Result<Option<Output>, InvokeError> {
		let fetch = self.action(ActionKind::Fetch).ok_or_else(|| InvokeError::MissingAction {
			path: self.path(),
			action: ActionKind::Fetch.as_str(),
		})?;
		let input = if fetch.is_string_arg(0) {
			Input::scalar(id)
		} else {
			let mut record = Map::new();
			record.insert(ID_FIELD.to_owned(), Value::String(id.to_owned()));
			Input::Map(record)
		};
		fetch.call(ctx, input)
	}
}

impl Registry {
	/// Fetches the `T` with identifier `id` through the Fetch action of the node `T`
	/// is registered on.
	///
	/// The Fetch callable may return either `T` or `Box<T>`.
	///
	/// # Errors
	///
	/// - [`InvokeError::UnknownType`] if `T` was never registered.
	/// - [`InvokeError::MissingAction`] if its node has no Fetch action.
	/// - [`InvokeError::TypeMismatch`] if the action returned anything else,
	///   including nothing.
	/// - Binding and callable errors, unchanged.
	pub fn fetch_by_id<T: Record>(&self, ctx: &Context, id: &str) -> Result<T, InvokeError> {
		let node = self.resolve_by_type::<T>().ok_or(InvokeError::UnknownType(type_name::<T>()))?;
		let Some(out) = node.by_id(ctx, id)? else {
			return Err(InvokeError::TypeMismatch {
				expected: type_name::<T>(),
				actual: "nothing",
			});
		};
		let out = match out.downcast::<T>() {
			Ok(value) => return Ok(value),
			Err(out) => out,
		};
		out.downcast::<Box<T>>().map(|boxed| *boxed).map_err(|out| InvokeError::TypeMismatch {
			expected: type_name::<T>(),
			actual: out.type_name(),
		})
	}
}

#[cfg(test)]
mod tests;
