//! Dynamic invocation engine.
//!
//! Turns ordinary Rust functions into [`Callable`]s that can be invoked with
//! input whose shape is only known at runtime.
//!
//! # Mental Model
//!
//! 1. **Analysis:** [`Callable::new`] inspects the function's parameter list once and
//!    produces a [`SignaturePlan`]: which position (if any) takes the execution
//!    [`Context`], and the declared [`TypeDesc`] of every data parameter.
//! 2. **Binding:** each call hands an [`Input`] to the binder, which inspects its variant
//!    (keyed mapping, positional record, raw payload, bare scalar) and fills the data
//!    slots, coercing values through [`Bind`].
//! 3. **Dispatch:** the function runs with the context injected at its slot; the values it
//!    returns are classified into one result ([`Output`]) and an optional error.
//!
//! # Key Types
//!
//! | Type | Role |
//! |------|------|
//! | [`Callable`] | Analyzed, type-erased function plus its cached plan. |
//! | [`SignaturePlan`] | Context slot + ordered data slots, computed once. |
//! | [`Input`] | Runtime-shaped call input. |
//! | [`Bind`] | Per-type coercion from a dynamic [`Value`]. |
//! | [`Scan`] | Custom decode hook for destination types. |
//! | [`Record`] | Named-field destination types, declared with [`record!`]. |
//! | [`Context`] | Cancellation/deadline/ambient-value carrier passed through to callables. |
//!
//! # Failure tiers
//!
//! - [`ConfigError`]: shape problems found while registering (fatal, abort startup).
//! - [`InvokeError`]: everything that can go wrong on a call, returned to the caller.

mod bind;
mod binder;
mod context;
mod dispatch;
mod error;
mod input;
mod record;
mod signature;

pub use bind::{Bind, Scan, kind_of};
pub use context::Context;
pub use dispatch::{BoxError, Callable, Handler, IntoReturns, Outcome, Output, ReturnSlot, Returned, classify};
pub use error::{BindError, ConfigError, InvokeError};
pub use input::Input;
pub use record::{FieldDesc, Record, bind_record, bind_record_fields};
pub use serde_json::{Map, Value};
pub use signature::{DataSlot, Param, ScalarKind, Shape, SignaturePlan, SlotKind, SlotValue, TypeDesc};
