use std::any::{TypeId, type_name};
use std::fmt;
use std::hash::{Hash, Hasher};

use objreg_invocation::{FieldDesc, Output, Record};

/// Identity and construction data for one record type.
///
/// Built from the static type with [`RecordType::of`], so resolving and fetching by
/// type stay checked at compile time.
#[derive(Clone, Copy)]
pub struct RecordType {
	id: TypeId,
	name: &'static str,
	fields: &'static [FieldDesc],
	new: fn() -> Output,
}

fn zero_value<T: Record>() -> Output {
	Output::new(T::default())
}

impl RecordType {
	pub fn of<T: Record>() -> Self {
		Self {
			id: TypeId::of::<T>(),
			name: type_name::<T>(),
			fields: T::FIELDS,
			new: zero_value::<T>,
		}
	}

	pub fn id(&self) -> TypeId {
		self.id
	}

	pub fn name(&self) -> &'static str {
		self.name
	}

	/// Declared fields, in declaration order.
	pub fn fields(&self) -> &'static [FieldDesc] {
		self.fields
	}

	pub fn field(&self, name: &str) -> Option<&'static FieldDesc> {
		self.fields.iter().find(|f| f.name == name)
	}

	/// A fresh zero-valued instance.
	pub fn instantiate(&self) -> Output {
		(self.new)()
	}

	pub fn is<T: 'static>(&self) -> bool {
		self.id == TypeId::of::<T>()
	}
}

impl PartialEq for RecordType {
	fn eq(&self, other: &Self) -> bool {
		self.id == other.id
	}
}

impl Eq for RecordType {}

impl Hash for RecordType {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.id.hash(state);
	}
}

impl fmt::Debug for RecordType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("RecordType").field(&self.name).finish()
	}
}
