use serde_json::Value;

use crate::bind::Bind;
use crate::signature::TypeDesc;
use crate::BindError;

/// Declared field of a [`Record`].
#[derive(Debug, Clone, Copy)]
pub struct FieldDesc {
	pub name: &'static str,
	pub ty: fn() -> TypeDesc,
}

impl FieldDesc {
	pub fn type_desc(&self) -> TypeDesc {
		(self.ty)()
	}
}

/// A destination type with named fields.
///
/// Normally implemented through [`record!`](crate::record!), which also provides the
/// matching [`Bind`] impl.
pub trait Record: Bind + Send + 'static {
	/// Declared fields in declaration order.
	const FIELDS: &'static [FieldDesc];

	/// Binds `value` into the field named `field`.
	///
	/// `field` is one of the names in [`Record::FIELDS`]; any other name is an error.
	fn assign(&mut self, field: &'static str, value: Value) -> Result<(), BindError>;
}

/// Finds the declared field for an input key: exact match first, then ASCII
/// case-insensitive.
fn lookup_field<R: Record>(key: &str) -> Option<&'static FieldDesc> {
	R::FIELDS
		.iter()
		.find(|f| f.name == key)
		.or_else(|| R::FIELDS.iter().find(|f| f.name.eq_ignore_ascii_case(key)))
}

/// Binds a keyed mapping into `R`. Keys without a matching field are ignored.
pub fn bind_record<R: Record>(value: Value) -> Result<R, BindError> {
	match value {
		Value::Null => Ok(R::default()),
		Value::Object(map) => bind_record_fields(map),
		other => Err(BindError::incompatible::<R>(&other)),
	}
}

/// Binds `(name, value)` pairs into `R`, in iteration order.
pub fn bind_record_fields<R: Record>(fields: impl IntoIterator<Item = (String, Value)>) -> Result<R, BindError> {
	let mut out = R::default();
	for (key, value) in fields {
		let Some(field) = lookup_field::<R>(&key) else {
			continue;
		};
		out.assign(field.name, value)?;
	}
	Ok(out)
}

/// Declares a struct and makes it a bindable [`Record`].
///
/// Every field type must implement [`Bind`]; the struct itself must implement
/// `Default`, usually by derive.
///
/// ```
/// objreg_invocation::record! {
/// 	#[derive(Debug, Default, Clone)]
/// 	pub struct Person {
/// 		pub id: String,
/// 		pub name: String,
/// 		pub email: String,
/// 	}
/// }
/// ```
#[macro_export]
macro_rules! record {
	(
		$(#[$meta:meta])*
		$vis:vis struct $name:ident {
			$(
				$(#[$field_meta:meta])*
				$field_vis:vis $field:ident : $ty:ty
			),* $(,)?
		}
	) => {
		$(#[$meta])*
		$vis struct $name {
			$(
				$(#[$field_meta])*
				$field_vis $field: $ty,
			)*
		}

		impl $crate::Record for $name {
			const FIELDS: &'static [$crate::FieldDesc] = &[
				$(
					$crate::FieldDesc {
						name: stringify!($field),
						ty: <$ty as $crate::Bind>::describe,
					},
				)*
			];

			fn assign(&mut self, field: &'static str, value: $crate::Value) -> ::core::result::Result<(), $crate::BindError> {
				$(
					if field == stringify!($field) {
						self.$field = <$ty as $crate::Bind>::bind(value).map_err(|e| e.in_field(field))?;
						return ::core::result::Result::Ok(());
					}
				)*
				let _ = value;
				::core::result::Result::Err($crate::BindError::Custom(::std::format!("{} has no field {}", stringify!($name), field)))
			}
		}

		impl $crate::ReturnSlot for $name {
			fn into_returned(self) -> ::core::option::Option<$crate::Returned> {
				::core::option::Option::Some($crate::Returned::value(self))
			}
		}

		impl $crate::Bind for $name {
			fn describe() -> $crate::TypeDesc {
				$crate::TypeDesc::record::<Self>()
			}

			fn bind(value: $crate::Value) -> ::core::result::Result<Self, $crate::BindError> {
				$crate::bind_record(value)
			}

			fn bind_fields(fields: ::std::vec::Vec<(::std::string::String, $crate::Value)>) -> ::core::result::Result<Self, $crate::BindError> {
				$crate::bind_record_fields(fields)
			}
		}
	};
}
