//! One-time analysis of a callable's parameter list.

use serde_json::Value;

use crate::bind::Bind;
use crate::record::{FieldDesc, Record};
use crate::{BindError, ConfigError, Context};

/// Scalar categories recognized by the binder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
	Bool,
	Int,
	Uint,
	Float,
	String,
}

/// Structural shape of a declared parameter or field type.
#[derive(Debug, Clone, Copy)]
pub enum Shape {
	/// A single scalar value.
	Scalar(ScalarKind),
	/// A record with named fields.
	Record(&'static [FieldDesc]),
	/// `Option<T>`; null binds to `None`.
	Optional(fn() -> TypeDesc),
	/// `Vec<T>`.
	Sequence(fn() -> TypeDesc),
	/// Accepts any dynamic value verbatim.
	Dynamic,
	/// Decoded by a [`crate::Scan`] implementation.
	Custom,
}

/// Declared type of a data slot or record field.
#[derive(Debug, Clone, Copy)]
pub struct TypeDesc {
	pub name: &'static str,
	pub shape: Shape,
}

impl TypeDesc {
	pub fn scalar<T: ?Sized>(kind: ScalarKind) -> Self {
		Self {
			name: std::any::type_name::<T>(),
			shape: Shape::Scalar(kind),
		}
	}

	pub fn record<R: Record>() -> Self {
		Self {
			name: std::any::type_name::<R>(),
			shape: Shape::Record(R::FIELDS),
		}
	}

	pub fn is_string(&self) -> bool {
		matches!(self.shape, Shape::Scalar(ScalarKind::String))
	}

	pub fn is_record(&self) -> bool {
		matches!(self.shape, Shape::Record(_))
	}

	/// Returns the declared fields for record shapes.
	pub fn fields(&self) -> Option<&'static [FieldDesc]> {
		match self.shape {
			Shape::Record(fields) => Some(fields),
			_ => None,
		}
	}
}

/// Classification of one declared parameter.
#[derive(Debug, Clone, Copy)]
pub enum SlotKind {
	Context,
	Data(TypeDesc),
}

/// Binder output for one parameter position.
#[derive(Debug, Clone, Default)]
pub enum SlotValue {
	/// No input reached this slot; the parameter takes its zero value.
	#[default]
	Zero,
	/// A single dynamic value.
	Value(Value),
	/// Named fields from a positional record, in the source's declaration order.
	Fields(Vec<(String, Value)>),
}

/// A type usable as a callable parameter.
///
/// Implemented for [`Context`] and for every [`Bind`] type. A parameter type outside
/// these two families does not satisfy the bound, so unsupported signatures fail to
/// compile rather than at registration.
pub trait Param: Sized {
	fn slot() -> SlotKind;

	fn extract(ctx: &Context, value: SlotValue) -> Result<Self, BindError>;
}

impl Param for Context {
	fn slot() -> SlotKind {
		SlotKind::Context
	}

	fn extract(ctx: &Context, _value: SlotValue) -> Result<Self, BindError> {
		Ok(ctx.clone())
	}
}

impl<T: Bind> Param for T {
	fn slot() -> SlotKind {
		SlotKind::Data(T::describe())
	}

	fn extract(_ctx: &Context, value: SlotValue) -> Result<Self, BindError> {
		match value {
			SlotValue::Zero => Ok(T::default()),
			SlotValue::Value(value) => T::bind(value),
			SlotValue::Fields(fields) => T::bind_fields(fields),
		}
	}
}

/// A data parameter: its position in the full parameter list and its declared type.
#[derive(Debug, Clone, Copy)]
pub struct DataSlot {
	pub position: usize,
	pub ty: TypeDesc,
}

/// Immutable result of analyzing a callable's parameter list.
///
/// The context slot and the data slot positions together cover `0..arity` exactly once.
#[derive(Debug, Clone)]
pub struct SignaturePlan {
	arity: usize,
	context_slot: Option<usize>,
	data_slots: Vec<DataSlot>,
}

impl SignaturePlan {
	/// Classifies `slots` in declaration order.
	///
	/// `callable` only labels the error when two context slots are declared.
	pub fn build(callable: &'static str, slots: impl IntoIterator<Item = SlotKind>) -> Result<Self, ConfigError> {
		let mut context_slot = None;
		let mut data_slots = Vec::new();
		let mut arity = 0;

		for (position, slot) in slots.into_iter().enumerate() {
			arity += 1;
			match slot {
				SlotKind::Context => {
					if let Some(first) = context_slot {
						return Err(ConfigError::DuplicateContext {
							callable,
							first,
							second: position,
						});
					}
					context_slot = Some(position);
				}
				SlotKind::Data(ty) => data_slots.push(DataSlot { position, ty }),
			}
		}

		Ok(Self {
			arity,
			context_slot,
			data_slots,
		})
	}

	pub fn arity(&self) -> usize {
		self.arity
	}

	pub fn context_slot(&self) -> Option<usize> {
		self.context_slot
	}

	pub fn data_slots(&self) -> &[DataSlot] {
		&self.data_slots
	}

	/// True when the `n`th data slot (not parameter position) is declared as a string.
	pub fn is_string_arg(&self, n: usize) -> bool {
		self.data_slots.get(n).is_some_and(|slot| slot.ty.is_string())
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	fn positions(plan: &SignaturePlan) -> Vec<usize> {
		plan.data_slots().iter().map(|s| s.position).collect()
	}

	#[test]
	fn context_and_data_slots_partition_the_arity() {
		let plan = SignaturePlan::build(
			"f",
			[
				<String as Param>::slot(),
				<Context as Param>::slot(),
				<i64 as Param>::slot(),
			],
		)
		.unwrap();

		assert_eq!(plan.arity(), 3);
		assert_eq!(plan.context_slot(), Some(1));
		assert_eq!(positions(&plan), vec![0, 2]);
		assert!(plan.is_string_arg(0));
		assert!(!plan.is_string_arg(1));
		assert!(!plan.is_string_arg(2));
	}

	#[test]
	fn second_context_is_rejected() {
		let err = SignaturePlan::build("f", [SlotKind::Context, <u8 as Param>::slot(), SlotKind::Context]).unwrap_err();
		assert_eq!(
			err,
			ConfigError::DuplicateContext {
				callable: "f",
				first: 0,
				second: 2
			}
		);
	}

	#[test]
	fn empty_parameter_list() {
		let plan = SignaturePlan::build("f", Vec::<SlotKind>::new()).unwrap();
		assert_eq!(plan.arity(), 0);
		assert_eq!(plan.context_slot(), None);
		assert!(plan.data_slots().is_empty());
	}
}
