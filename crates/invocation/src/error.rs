use crate::dispatch::BoxError;

/// Drops module paths from a [`std::any::type_name`], generic arguments included:
/// `alloc::boxed::Box<app::Company>` becomes `Box<Company>`.
pub(crate) fn short_type_name(name: &str) -> String {
	let mut out = String::with_capacity(name.len());
	let mut segment_start = 0;
	for (idx, ch) in name.char_indices() {
		if ch.is_alphanumeric() || ch == '_' || ch == ':' {
			continue;
		}
		out.push_str(last_segment(&name[segment_start..idx]));
		out.push(ch);
		segment_start = idx + ch.len_utf8();
	}
	out.push_str(last_segment(&name[segment_start..]));
	out
}

fn last_segment(path: &str) -> &str {
	path.rsplit("::").next().unwrap_or(path)
}

/// Fatal configuration errors.
///
/// Produced while registering types and callables. Registration is expected to run
/// unconditionally during startup, so callers propagate these out of initialization
/// rather than recovering from them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
	/// A record type is already registered under this path.
	#[error("multiple registrations for {path:?}: existing type {}, new type {}", short_type_name(.existing), short_type_name(.incoming))]
	ConflictingType {
		path: String,
		existing: &'static str,
		incoming: &'static str,
	},
	/// A member path was given without the `:` separator.
	#[error("invalid member path {0:?}: expected \"<object-path>:<name>\"")]
	MissingSeparator(String),
	/// The callable declares more than one execution context parameter.
	#[error("callable {callable} takes multiple context arguments (positions {first} and {second})")]
	DuplicateContext {
		callable: &'static str,
		first: usize,
		second: usize,
	},
}

/// Failure to turn dynamic input into typed arguments.
///
/// The callable is never invoked when binding fails.
#[derive(Debug, thiserror::Error)]
pub enum BindError {
	/// No conversion exists between the source kind and the destination type.
	#[error("cannot bind {from} into {}", short_type_name(.to))]
	Incompatible { from: &'static str, to: &'static str },
	/// Numeric narrowing would lose the value.
	#[error("value {value} out of range for {}", short_type_name(.to))]
	OutOfRange { value: String, to: &'static str },
	/// A string could not be parsed as the destination scalar.
	#[error("cannot parse {value:?} as {}", short_type_name(.to))]
	Parse { value: String, to: &'static str },
	/// A record field failed to bind.
	#[error("field {field}: {source}")]
	Field {
		field: String,
		#[source]
		source: Box<BindError>,
	},
	/// A sequence element failed to bind.
	#[error("element {index}: {source}")]
	Element {
		index: usize,
		#[source]
		source: Box<BindError>,
	},
	/// A raw payload is not a well-formed document.
	#[error("malformed payload: {0}")]
	Decode(#[from] serde_json::Error),
	/// The input shape cannot be spread over the callable's data slots.
	#[error("{shape} input cannot fill {slots} data slot(s)")]
	Arity { shape: &'static str, slots: usize },
	/// Raised by [`crate::Scan`] implementations.
	#[error("{0}")]
	Custom(String),
}

impl BindError {
	/// Builds an [`BindError::Incompatible`] naming the value's kind and `T`.
	pub fn incompatible<T: ?Sized>(value: &serde_json::Value) -> Self {
		Self::Incompatible {
			from: crate::kind_of(value),
			to: std::any::type_name::<T>(),
		}
	}

	/// Wraps this error with the record field it occurred in.
	pub fn in_field(self, field: impl Into<String>) -> Self {
		Self::Field {
			field: field.into(),
			source: Box::new(self),
		}
	}

	/// Wraps this error with the sequence index it occurred at.
	pub fn at_index(self, index: usize) -> Self {
		Self::Element {
			index,
			source: Box::new(self),
		}
	}
}

/// Runtime invocation failures, returned to the caller.
#[derive(Debug, thiserror::Error)]
pub enum InvokeError {
	/// No node is registered for the requested record type.
	#[error("unknown object type {}", short_type_name(.0))]
	UnknownType(&'static str),
	/// The node has no action set, or the requested slot is empty.
	#[error("no {action} action registered on {path:?}")]
	MissingAction { path: String, action: &'static str },
	/// The node has no method registered under this name.
	#[error("no method {method:?} registered on {path:?}")]
	MissingMethod { path: String, method: String },
	/// Input could not be bound; the callable was not invoked.
	#[error("argument binding failed: {0}")]
	Bind(#[from] BindError),
	/// A Fetch action returned something other than the expected record type.
	#[error("bad type returned by Fetch: expected {}, got {}", short_type_name(.expected), short_type_name(.actual))]
	TypeMismatch { expected: &'static str, actual: &'static str },
	/// Error returned by the callable itself, unchanged.
	#[error(transparent)]
	Call(BoxError),
}

impl InvokeError {
	/// Returns the callable's own error if this is [`InvokeError::Call`].
	pub fn call_error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
		match self {
			Self::Call(err) => Some(err.as_ref()),
			_ => None,
		}
	}
}
