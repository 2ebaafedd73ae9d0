//! Argument assembly, invocation and return classification.

use std::any::{Any, TypeId, type_name};
use std::fmt;
use std::sync::Arc;

use crate::binder;
use crate::signature::{Param, SignaturePlan, SlotKind, SlotValue};
use crate::{BindError, ConfigError, Context, Input, InvokeError};

/// Error type returned by callables.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A type-erased value returned by a callable.
pub struct Output {
	value: Box<dyn Any + Send>,
	type_name: &'static str,
}

impl Output {
	pub fn new<T: Any + Send>(value: T) -> Self {
		Self {
			value: Box::new(value),
			type_name: type_name::<T>(),
		}
	}

	/// Name of the concrete type held.
	pub fn type_name(&self) -> &'static str {
		self.type_name
	}

	pub fn is<T: Any>(&self) -> bool {
		self.value.is::<T>()
	}

	pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
		self.value.downcast_ref::<T>()
	}

	/// Takes the value out as `T`, or returns `self` unchanged on mismatch.
	pub fn downcast<T: Any>(self) -> Result<T, Self> {
		match self.value.downcast::<T>() {
			Ok(value) => Ok(*value),
			Err(value) => Err(Self {
				value,
				type_name: self.type_name,
			}),
		}
	}

	pub fn into_any(self) -> Box<dyn Any + Send> {
		self.value
	}
}

impl fmt::Debug for Output {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Output({})", self.type_name)
	}
}

/// One value returned by a callable, after the error-capability check.
#[derive(Debug)]
pub enum Returned {
	Value(Output),
	/// An error slot. `None` is an empty error slot and clears any earlier error.
	Error(Option<BoxError>),
}

impl Returned {
	pub fn value<T: Any + Send>(value: T) -> Self {
		Self::Value(Output::new(value))
	}

	pub fn error(err: impl Into<BoxError>) -> Self {
		Self::Error(Some(err.into()))
	}
}

/// Result value and error separated from a callable's returned values.
#[derive(Debug, Default)]
pub struct Outcome {
	pub value: Option<Output>,
	pub error: Option<BoxError>,
}

impl Outcome {
	/// An error takes precedence over any value returned alongside it.
	pub fn into_result(self) -> Result<Option<Output>, InvokeError> {
		match self.error {
			Some(err) => Err(InvokeError::Call(err)),
			None => Ok(self.value),
		}
	}
}

/// Folds returned values: the last error slot wins, the last non-error value wins.
pub fn classify(returns: impl IntoIterator<Item = Returned>) -> Outcome {
	let mut outcome = Outcome::default();
	for returned in returns {
		match returned {
			Returned::Value(value) => outcome.value = Some(value),
			Returned::Error(err) => outcome.error = err,
		}
	}
	outcome
}

/// A type allowed as an element of a tuple return.
///
/// Each implementation states whether the type carries the error capability, so an
/// error never ends up as the result value. Implement it for your own types with
/// [`value_returns!`](crate::value_returns!) or
/// [`error_returns!`](crate::error_returns!); [`record!`](crate::record!) types
/// implement it as values.
pub trait ReturnSlot: Send + 'static {
	/// `None` when the element contributes nothing, as `()` does.
	fn into_returned(self) -> Option<Returned>;

	/// Classification of an absent element, i.e. `None::<Self>`.
	///
	/// Values contribute nothing; errors yield an empty error slot.
	fn absent() -> Option<Returned> {
		None
	}
}

impl<T: ReturnSlot> ReturnSlot for Option<T> {
	fn into_returned(self) -> Option<Returned> {
		match self {
			Some(inner) => inner.into_returned(),
			None => T::absent(),
		}
	}

	fn absent() -> Option<Returned> {
		T::absent()
	}
}

impl ReturnSlot for () {
	fn into_returned(self) -> Option<Returned> {
		None
	}
}

impl<T: Any + Send> ReturnSlot for Vec<T> {
	fn into_returned(self) -> Option<Returned> {
		Some(Returned::value(self))
	}
}

impl<T: Any + Send> ReturnSlot for Box<T> {
	fn into_returned(self) -> Option<Returned> {
		Some(Returned::value(self))
	}
}

/// Implements [`ReturnSlot`] for types returned as result values.
#[macro_export]
macro_rules! value_returns {
	($($ty:ty),* $(,)?) => {$(
		impl $crate::ReturnSlot for $ty {
			fn into_returned(self) -> ::core::option::Option<$crate::Returned> {
				::core::option::Option::Some($crate::Returned::value(self))
			}
		}
	)*};
}

/// Implements [`ReturnSlot`] for types carrying the error capability.
#[macro_export]
macro_rules! error_returns {
	($($ty:ty),* $(,)?) => {$(
		impl $crate::ReturnSlot for $ty {
			fn into_returned(self) -> ::core::option::Option<$crate::Returned> {
				::core::option::Option::Some($crate::Returned::error(self))
			}

			fn absent() -> ::core::option::Option<$crate::Returned> {
				::core::option::Option::Some($crate::Returned::Error(::core::option::Option::None))
			}
		}
	)*};
}

value_returns!(
	bool,
	char,
	i8,
	i16,
	i32,
	i64,
	i128,
	isize,
	u8,
	u16,
	u32,
	u64,
	u128,
	usize,
	f32,
	f64,
	String,
	&'static str,
	serde_json::Value,
);

error_returns!(
	BoxError,
	std::io::Error,
	std::fmt::Error,
	std::num::ParseIntError,
	std::num::ParseFloatError,
	std::str::Utf8Error,
	std::string::FromUtf8Error,
	serde_json::Error,
	BindError,
	InvokeError,
);

/// Return types a callable may have.
///
/// `Result<T, E>` is the native convention. `()` returns nothing. Tuples of up to four
/// [`ReturnSlot`] elements are accepted for callables whose value and error positions
/// vary.
pub trait IntoReturns {
	fn into_returns(self) -> Vec<Returned>;
}

impl IntoReturns for () {
	fn into_returns(self) -> Vec<Returned> {
		Vec::new()
	}
}

impl<T, E> IntoReturns for Result<T, E>
where
	T: Any + Send,
	E: Into<BoxError>,
{
	fn into_returns(self) -> Vec<Returned> {
		match self {
			Ok(value) if TypeId::of::<T>() == TypeId::of::<()>() => {
				let _ = value;
				Vec::new()
			}
			Ok(value) => vec![Returned::value(value)],
			Err(err) => vec![Returned::error(err)],
		}
	}
}

macro_rules! impl_tuple_returns {
	($($elem:ident),+) => {
		impl<$($elem: ReturnSlot),+> IntoReturns for ($($elem,)+) {
			#[allow(non_snake_case)]
			fn into_returns(self) -> Vec<Returned> {
				let ($($elem,)+) = self;
				[$($elem.into_returned()),+].into_iter().flatten().collect()
			}
		}
	};
}

impl_tuple_returns!(A);
impl_tuple_returns!(A, B);
impl_tuple_returns!(A, B, C);
impl_tuple_returns!(A, B, C, D);

/// A function invocable through the engine.
///
/// Implemented for every `Fn` of up to eight [`Param`] arguments whose return type
/// implements [`IntoReturns`]. `Args` is the parameter tuple and only serves to keep
/// the impls apart.
pub trait Handler<Args>: Send + Sync + 'static {
	/// Parameter classifications in declaration order.
	fn slots() -> Vec<SlotKind>;

	/// Extracts every parameter from `args`, then calls the function.
	///
	/// Extraction completes before the call, so a binding failure never reaches the
	/// function body.
	fn invoke(&self, ctx: &Context, args: Vec<SlotValue>) -> Result<Vec<Returned>, BindError>;
}

macro_rules! impl_handler {
	($($param:ident),*) => {
		impl<Func, Ret, $($param,)*> Handler<($($param,)*)> for Func
		where
			Func: Fn($($param),*) -> Ret + Send + Sync + 'static,
			Ret: IntoReturns,
			$($param: Param,)*
		{
			fn slots() -> Vec<SlotKind> {
				vec![$(<$param as Param>::slot()),*]
			}

			#[allow(non_snake_case, unused_mut, unused_variables)]
			fn invoke(&self, ctx: &Context, args: Vec<SlotValue>) -> Result<Vec<Returned>, BindError> {
				let mut args = args.into_iter();
				$(
					let $param = <$param as Param>::extract(ctx, args.next().unwrap_or_default())?;
				)*
				Ok((self)($($param),*).into_returns())
			}
		}
	};
}

impl_handler!();
impl_handler!(P1);
impl_handler!(P1, P2);
impl_handler!(P1, P2, P3);
impl_handler!(P1, P2, P3, P4);
impl_handler!(P1, P2, P3, P4, P5);
impl_handler!(P1, P2, P3, P4, P5, P6);
impl_handler!(P1, P2, P3, P4, P5, P6, P7);
impl_handler!(P1, P2, P3, P4, P5, P6, P7, P8);

type Invoker = dyn Fn(&Context, Vec<SlotValue>) -> Result<Vec<Returned>, BindError> + Send + Sync;

/// An analyzed function: its [`SignaturePlan`] plus a type-erased invoker.
///
/// The plan is computed once in [`Callable::new`]; cloning shares it.
#[derive(Clone)]
pub struct Callable {
	plan: Arc<SignaturePlan>,
	label: &'static str,
	invoker: Arc<Invoker>,
}

impl Callable {
	/// Analyzes `handler` and wraps it.
	///
	/// Fails when the function declares more than one [`Context`] parameter.
	pub fn new<F, Args>(handler: F) -> Result<Self, ConfigError>
	where
		F: Handler<Args>,
		Args: 'static,
	{
		let label = type_name::<F>();
		let plan = SignaturePlan::build(label, F::slots()).inspect_err(|err| tracing::warn!(%err, "rejected callable signature"))?;
		Ok(Self {
			plan: Arc::new(plan),
			label,
			invoker: Arc::new(move |ctx: &Context, args: Vec<SlotValue>| handler.invoke(ctx, args)),
		})
	}

	pub fn plan(&self) -> &SignaturePlan {
		&self.plan
	}

	/// Type name of the wrapped function, for diagnostics.
	pub fn label(&self) -> &'static str {
		self.label
	}

	/// See [`SignaturePlan::is_string_arg`].
	pub fn is_string_arg(&self, n: usize) -> bool {
		self.plan.is_string_arg(n)
	}

	/// Binds `input`, invokes, and classifies the returned values.
	///
	/// Returns `Ok(None)` when the function produced no result value and no error.
	pub fn call(&self, ctx: &Context, input: impl Into<Input>) -> Result<Option<Output>, InvokeError> {
		let input = input.into();
		tracing::trace!(callable = self.label, shape = input.shape(), "dispatch");
		let args = binder::route(&self.plan, input)?;
		let returns = (self.invoker)(ctx, args)?;
		classify(returns).into_result()
	}

	/// Like [`Callable::call`], with the raw payload carried by `ctx` as input.
	pub fn call_with_context_input(&self, ctx: &Context) -> Result<Option<Output>, InvokeError> {
		let input = ctx.input().cloned().map_or(Input::None, Input::Raw);
		self.call(ctx, input)
	}
}

impl fmt::Debug for Callable {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Callable").field("label", &self.label).field("plan", &self.plan).finish()
	}
}
