//! Per-type coercion from dynamic values.
//!
//! Every destination type decides how a [`Value`] becomes an instance of itself, in
//! this order:
//!
//! 1. null: the destination's zero value, except for [`Scan`] types;
//! 2. the value already has the destination's kind: assign;
//! 3. a widening/narrowing rule applies (numeric strings, lossless float↔int,
//!    range-checked integer narrowing, scalars rendered to strings): convert;
//! 4. the destination implements [`Scan`]: hand it the value verbatim;
//! 5. otherwise: [`BindError::Incompatible`] naming both sides.

use std::any::type_name;

use serde_json::{Number, Value};

use crate::signature::{ScalarKind, Shape, TypeDesc};
use crate::BindError;

/// Returns the dynamic kind of `value` as used in binding errors.
pub fn kind_of(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "bool",
		Value::Number(_) => "number",
		Value::String(_) => "string",
		Value::Array(_) => "array",
		Value::Object(_) => "object",
	}
}

/// A destination type the binder can populate from a dynamic value.
///
/// `Default` supplies the zero value used when no input reaches a slot or field.
pub trait Bind: Default + Sized {
	/// Declared type, recorded in signature plans and record schemas.
	fn describe() -> TypeDesc;

	/// Coerces one dynamic value.
	fn bind(value: Value) -> Result<Self, BindError>;

	/// Binds from a positional record's fields.
	///
	/// Records override this to walk the fields in source order; everything else
	/// sees them as an object.
	fn bind_fields(fields: Vec<(String, Value)>) -> Result<Self, BindError> {
		Self::bind(Value::Object(fields.into_iter().collect()))
	}
}

/// Custom decode hook.
///
/// Implementing `Scan` makes a type bindable: the binder starts from `Default` and
/// passes the raw dynamic value to [`Scan::scan`] unchanged.
pub trait Scan: Default {
	fn scan(&mut self, value: &Value) -> Result<(), BindError>;
}

impl<T: Scan> Bind for T {
	fn describe() -> TypeDesc {
		TypeDesc {
			name: type_name::<T>(),
			shape: Shape::Custom,
		}
	}

	fn bind(value: Value) -> Result<Self, BindError> {
		let mut out = T::default();
		out.scan(&value)?;
		Ok(out)
	}
}

impl Bind for Value {
	fn describe() -> TypeDesc {
		TypeDesc {
			name: "serde_json::Value",
			shape: Shape::Dynamic,
		}
	}

	fn bind(value: Value) -> Result<Self, BindError> {
		Ok(value)
	}
}

impl Bind for String {
	fn describe() -> TypeDesc {
		TypeDesc::scalar::<String>(ScalarKind::String)
	}

	fn bind(value: Value) -> Result<Self, BindError> {
		match value {
			Value::Null => Ok(String::new()),
			Value::String(s) => Ok(s),
			Value::Number(n) => Ok(n.to_string()),
			Value::Bool(b) => Ok(b.to_string()),
			other => Err(BindError::incompatible::<String>(&other)),
		}
	}
}

impl Bind for bool {
	fn describe() -> TypeDesc {
		TypeDesc::scalar::<bool>(ScalarKind::Bool)
	}

	fn bind(value: Value) -> Result<Self, BindError> {
		match value {
			Value::Null => Ok(false),
			Value::Bool(b) => Ok(b),
			Value::Number(n) => match n.as_f64() {
				Some(f) => Ok(f != 0.0),
				None => Err(BindError::Parse { value: n.to_string(), to: "bool" }),
			},
			Value::String(s) => match s.trim() {
				"1" => Ok(true),
				"0" => Ok(false),
				t if t.eq_ignore_ascii_case("true") => Ok(true),
				t if t.eq_ignore_ascii_case("false") => Ok(false),
				_ => Err(BindError::Parse { value: s.clone(), to: "bool" }),
			},
			other => Err(BindError::incompatible::<bool>(&other)),
		}
	}
}

fn out_of_range<T>(n: &Number) -> BindError {
	BindError::OutOfRange {
		value: n.to_string(),
		to: type_name::<T>(),
	}
}

macro_rules! bind_integers {
	($($ty:ty => $kind:ident),* $(,)?) => {$(
		impl Bind for $ty {
			fn describe() -> TypeDesc {
				TypeDesc::scalar::<$ty>(ScalarKind::$kind)
			}

			fn bind(value: Value) -> Result<Self, BindError> {
				match value {
					Value::Null => Ok(0),
					Value::Number(n) => {
						if let Some(i) = n.as_i64() {
							return <$ty>::try_from(i).map_err(|_| out_of_range::<$ty>(&n));
						}
						if let Some(u) = n.as_u64() {
							return <$ty>::try_from(u).map_err(|_| out_of_range::<$ty>(&n));
						}
						// No fraction lost. `MAX + 1` is exact in f64; `MAX` rounds up for 64-bit types.
						match n.as_f64() {
							Some(f) if f.fract() == 0.0 && f >= <$ty>::MIN as f64 && f < <$ty>::MAX as f64 + 1.0 => Ok(f as $ty),
							_ => Err(out_of_range::<$ty>(&n)),
						}
					}
					Value::String(s) => s.trim().parse::<$ty>().map_err(|_| BindError::Parse {
						value: s,
						to: type_name::<$ty>(),
					}),
					Value::Bool(b) => Ok(<$ty>::from(b)),
					other => Err(BindError::incompatible::<$ty>(&other)),
				}
			}
		}
	)*};
}

bind_integers! {
	i8 => Int,
	i16 => Int,
	i32 => Int,
	i64 => Int,
	isize => Int,
	u8 => Uint,
	u16 => Uint,
	u32 => Uint,
	u64 => Uint,
	usize => Uint,
}

macro_rules! bind_floats {
	($($ty:ty),* $(,)?) => {$(
		impl Bind for $ty {
			fn describe() -> TypeDesc {
				TypeDesc::scalar::<$ty>(ScalarKind::Float)
			}

			fn bind(value: Value) -> Result<Self, BindError> {
				match value {
					Value::Null => Ok(0.0),
					Value::Number(n) => n.as_f64().map(|f| f as $ty).ok_or_else(|| out_of_range::<$ty>(&n)),
					Value::String(s) => s.trim().parse::<$ty>().map_err(|_| BindError::Parse {
						value: s,
						to: type_name::<$ty>(),
					}),
					other => Err(BindError::incompatible::<$ty>(&other)),
				}
			}
		}
	)*};
}

bind_floats!(f32, f64);

impl<T: Bind> Bind for Option<T> {
	fn describe() -> TypeDesc {
		TypeDesc {
			name: type_name::<Option<T>>(),
			shape: Shape::Optional(T::describe),
		}
	}

	fn bind(value: Value) -> Result<Self, BindError> {
		match value {
			Value::Null => Ok(None),
			value => T::bind(value).map(Some),
		}
	}

	fn bind_fields(fields: Vec<(String, Value)>) -> Result<Self, BindError> {
		T::bind_fields(fields).map(Some)
	}
}

impl<T: Bind> Bind for Vec<T> {
	fn describe() -> TypeDesc {
		TypeDesc {
			name: type_name::<Vec<T>>(),
			shape: Shape::Sequence(T::describe),
		}
	}

	fn bind(value: Value) -> Result<Self, BindError> {
		match value {
			Value::Null => Ok(Vec::new()),
			Value::Array(items) => items
				.into_iter()
				.enumerate()
				.map(|(idx, item)| T::bind(item).map_err(|e| e.at_index(idx)))
				.collect(),
			other => Err(BindError::incompatible::<Vec<T>>(&other)),
		}
	}
}
