use bytes::Bytes;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::BindError;

/// Dynamically-shaped call input.
///
/// The binder picks its strategy from the variant; there is no separate mode flag.
#[derive(Debug, Clone, Default)]
pub enum Input {
	/// No input. Data slots take their zero values.
	#[default]
	None,
	/// Keyed mapping, matched by name against a single record slot.
	Map(Map<String, Value>),
	/// Fields of a typed record, in declaration order.
	Record(Vec<(String, Value)>),
	/// Serialized JSON document.
	Raw(Bytes),
	/// A bare value bound to the first data slot.
	Scalar(Value),
}

impl Input {
	/// Captures the fields of any serializable struct as a positional record.
	pub fn record<T: Serialize + ?Sized>(value: &T) -> Result<Self, BindError> {
		match serde_json::to_value(value)? {
			Value::Object(map) => Ok(Self::Record(map.into_iter().collect())),
			other => Err(BindError::Incompatible {
				from: crate::kind_of(&other),
				to: "record",
			}),
		}
	}

	pub fn raw(payload: impl Into<Bytes>) -> Self {
		Self::Raw(payload.into())
	}

	pub fn scalar(value: impl Into<Value>) -> Self {
		Self::Scalar(value.into())
	}

	/// Short label for logs and errors.
	pub fn shape(&self) -> &'static str {
		match self {
			Self::None => "empty",
			Self::Map(_) => "keyed mapping",
			Self::Record(_) => "positional record",
			Self::Raw(_) => "raw payload",
			Self::Scalar(_) => "scalar",
		}
	}
}

impl From<Value> for Input {
	fn from(value: Value) -> Self {
		match value {
			Value::Null => Self::None,
			Value::Object(map) => Self::Map(map),
			other => Self::Scalar(other),
		}
	}
}

impl From<Map<String, Value>> for Input {
	fn from(map: Map<String, Value>) -> Self {
		Self::Map(map)
	}
}

impl From<&str> for Input {
	fn from(s: &str) -> Self {
		Self::Scalar(Value::String(s.to_owned()))
	}
}

impl From<String> for Input {
	fn from(s: String) -> Self {
		Self::Scalar(Value::String(s))
	}
}

impl From<()> for Input {
	fn from((): ()) -> Self {
		Self::None
	}
}
