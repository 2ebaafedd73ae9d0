use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::Bytes;
use rustc_hash::FxHashMap;
use tokio_util::sync::CancellationToken;

/// Execution context passed through to callables.
///
/// Carries cancellation, an optional deadline, ambient values keyed by type, and an
/// optional raw input payload. The engine never inspects or acts on any of these; a
/// callable that declares a [`Context`] parameter receives a clone of the caller's.
///
/// Cloning is cheap. `with_*` builders copy on write, so a derived context never
/// affects the one it came from.
#[derive(Clone, Default)]
pub struct Context {
	inner: Arc<Inner>,
}

#[derive(Clone, Default)]
struct Inner {
	cancel: CancellationToken,
	deadline: Option<Instant>,
	values: FxHashMap<TypeId, Arc<dyn Any + Send + Sync>>,
	input: Option<Bytes>,
}

impl Context {
	/// Creates an empty context that is never cancelled.
	pub fn new() -> Self {
		Self::default()
	}

	/// Replaces the cancellation token.
	pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
		Arc::make_mut(&mut self.inner).cancel = token;
		self
	}

	/// Sets an absolute deadline.
	pub fn with_deadline(mut self, deadline: Instant) -> Self {
		Arc::make_mut(&mut self.inner).deadline = Some(deadline);
		self
	}

	/// Sets a deadline `timeout` from now.
	pub fn with_timeout(self, timeout: Duration) -> Self {
		self.with_deadline(Instant::now() + timeout)
	}

	/// Attaches an ambient value, replacing any previous value of the same type.
	pub fn with_value<T: Any + Send + Sync>(mut self, value: T) -> Self {
		Arc::make_mut(&mut self.inner).values.insert(TypeId::of::<T>(), Arc::new(value));
		self
	}

	/// Attaches a raw JSON input payload, consumed by [`crate::Callable::call_with_context_input`].
	pub fn with_input(mut self, payload: impl Into<Bytes>) -> Self {
		Arc::make_mut(&mut self.inner).input = Some(payload.into());
		self
	}

	/// Returns the ambient value of type `T`, if attached.
	pub fn value<T: Any + Send + Sync>(&self) -> Option<&T> {
		self.inner.values.get(&TypeId::of::<T>()).and_then(|v| v.downcast_ref::<T>())
	}

	/// Returns the raw input payload, if attached.
	pub fn input(&self) -> Option<&Bytes> {
		self.inner.input.as_ref()
	}

	pub fn cancellation(&self) -> &CancellationToken {
		&self.inner.cancel
	}

	pub fn deadline(&self) -> Option<Instant> {
		self.inner.deadline
	}

	/// True once the token is cancelled or the deadline has passed.
	pub fn is_done(&self) -> bool {
		self.inner.cancel.is_cancelled() || self.inner.deadline.is_some_and(|d| Instant::now() >= d)
	}

	/// Derives a context whose token is a child of this one.
	///
	/// Cancelling the parent cancels the child, not the other way round.
	pub fn child(&self) -> Self {
		let mut inner = (*self.inner).clone();
		inner.cancel = self.inner.cancel.child_token();
		Self { inner: Arc::new(inner) }
	}
}

impl fmt::Debug for Context {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Context")
			.field("cancelled", &self.inner.cancel.is_cancelled())
			.field("deadline", &self.inner.deadline)
			.field("values", &self.inner.values.len())
			.field("input", &self.inner.input.as_ref().map(Bytes::len))
			.finish()
	}
}
