//! Spreads an [`Input`] over a plan's data slots.
//!
//! Only the routing lives here. Turning each routed value into the slot's declared
//! type is the job of [`crate::Bind`], invoked later through [`crate::Param::extract`].

use serde_json::Value;

use crate::signature::{SignaturePlan, SlotValue};
use crate::{BindError, Input};

/// Produces one [`SlotValue`] per parameter position.
///
/// The context slot, and any data slot the input does not reach, hold
/// [`SlotValue::Zero`].
pub(crate) fn route(plan: &SignaturePlan, input: Input) -> Result<Vec<SlotValue>, BindError> {
	let mut args = vec![SlotValue::Zero; plan.arity()];
	let slots = plan.data_slots();
	let Some(first) = slots.first() else {
		return Ok(args);
	};

	match input {
		Input::None | Input::Scalar(Value::Null) => {}
		Input::Map(map) => {
			expect_single(plan, "keyed mapping")?;
			args[first.position] = SlotValue::Value(Value::Object(map));
		}
		Input::Record(fields) => {
			expect_single(plan, "positional record")?;
			args[first.position] = SlotValue::Fields(fields);
		}
		Input::Raw(payload) => {
			let doc: Value = serde_json::from_slice(&payload)?;
			match doc {
				Value::Null => {}
				doc if slots.len() == 1 => args[first.position] = SlotValue::Value(doc),
				Value::Array(items) => {
					if items.len() > slots.len() {
						return Err(BindError::Arity {
							shape: "raw payload",
							slots: slots.len(),
						});
					}
					for (slot, item) in slots.iter().zip(items) {
						args[slot.position] = SlotValue::Value(item);
					}
				}
				other => {
					return Err(BindError::Incompatible {
						from: crate::kind_of(&other),
						to: "argument sequence",
					});
				}
			}
		}
		Input::Scalar(value) => args[first.position] = SlotValue::Value(value),
	}

	Ok(args)
}

fn expect_single(plan: &SignaturePlan, shape: &'static str) -> Result<(), BindError> {
	match plan.data_slots().len() {
		1 => Ok(()),
		slots => Err(BindError::Arity { shape, slots }),
	}
}
