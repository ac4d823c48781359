//! Single-slot signal handler registry.
//!
//! Assigning a handler to a signal disconnects whatever native slot the
//! previous handler occupied before connecting the new one, so each signal
//! has at most one handler subscription at a time. Value-returning callbacks
//! (confirm, prompt) follow the same one-per-kind rule.

use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::Mutex;
use serde_json::Value;
use webpage_protocol::{CallbackKind, PageEvent, SignalKind};
use webpage_runtime::{NativePage, Result, SlotId};

/// Handler bound to a signal.
pub type Handler = Arc<dyn Fn(&PageEvent) + Send + Sync>;

/// Handler bound to a value-returning callback.
pub type CallbackHandler = Arc<dyn Fn(&[Value]) -> Value + Send + Sync>;

struct Binding {
	slot: SlotId,
	handler: Handler,
}

/// Signal name to currently bound handler, exclusively owned by one page.
pub struct SignalRegistry {
	native: Arc<dyn NativePage>,
	bindings: Mutex<IndexMap<SignalKind, Binding>>,
	callbacks: Mutex<IndexMap<CallbackKind, CallbackHandler>>,
}

impl SignalRegistry {
	pub fn new(native: Arc<dyn NativePage>) -> Self {
		Self {
			native,
			bindings: Mutex::new(IndexMap::new()),
			callbacks: Mutex::new(IndexMap::new()),
		}
	}

	/// Binds `handler` to `signal`, replacing any previous handler.
	///
	/// The previous native slot is disconnected first; a failed disconnect
	/// (slot already gone) is logged and ignored. The registry is not locked
	/// while the engine connects, so a slot the engine invokes during
	/// `connect` may read or rebind handlers.
	pub fn set_handler(&self, signal: SignalKind, handler: Handler) -> Result<()> {
		let previous = self.bindings.lock().shift_remove(&signal);
		if let Some(previous) = previous {
			self.disconnect_quietly(signal, previous.slot);
		}

		let slot = self.native.connect(signal, Arc::clone(&handler))?;
		tracing::debug!(signal = %signal, %slot, "handler bound");

		// A concurrent bind may have landed while unlocked; last one wins.
		let displaced = self.bindings.lock().insert(signal, Binding { slot, handler });
		if let Some(displaced) = displaced {
			self.disconnect_quietly(signal, displaced.slot);
		}
		Ok(())
	}

	/// Returns the handler bound to `signal`, if any.
	pub fn handler(&self, signal: SignalKind) -> Option<Handler> {
		self.bindings
			.lock()
			.get(&signal)
			.map(|b| Arc::clone(&b.handler))
	}

	/// Unbinds the handler for `signal`. Returns `true` if one was bound.
	pub fn clear_handler(&self, signal: SignalKind) -> bool {
		let removed = self.bindings.lock().shift_remove(&signal);
		match removed {
			Some(binding) => {
				self.disconnect_quietly(signal, binding.slot);
				true
			}
			None => false,
		}
	}

	/// Signals that currently have a handler, in binding order.
	pub fn bound_signals(&self) -> Vec<SignalKind> {
		self.bindings.lock().keys().copied().collect()
	}

	/// Installs or removes the callback for `kind`.
	pub fn set_callback_handler(
		&self,
		kind: CallbackKind,
		handler: Option<CallbackHandler>,
	) -> Result<()> {
		let mut callbacks = self.callbacks.lock();
		self.native.set_callback(kind, handler.clone())?;
		match handler {
			Some(h) => {
				callbacks.insert(kind, h);
			}
			None => {
				callbacks.shift_remove(&kind);
			}
		}
		Ok(())
	}

	pub fn callback_handler(&self, kind: CallbackKind) -> Option<CallbackHandler> {
		self.callbacks.lock().get(&kind).cloned()
	}

	/// Unbinds every signal handler and callback.
	pub fn clear_all(&self) {
		let drained: Vec<(SignalKind, Binding)> = self.bindings.lock().drain(..).collect();
		for (signal, binding) in drained {
			self.disconnect_quietly(signal, binding.slot);
		}

		let callbacks: Vec<CallbackKind> = self.callbacks.lock().drain(..).map(|(k, _)| k).collect();
		for kind in callbacks {
			if let Err(e) = self.native.set_callback(kind, None) {
				tracing::debug!(?kind, error = %e, "callback removal ignored");
			}
		}
	}

	fn disconnect_quietly(&self, signal: SignalKind, slot: SlotId) {
		if let Err(e) = self.native.disconnect(signal, slot) {
			tracing::debug!(signal = %signal, %slot, error = %e, "stale handler disconnect ignored");
		}
	}
}

impl std::fmt::Debug for SignalRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SignalRegistry")
			.field("signals", &self.bound_signals())
			.field("callbacks", &self.callbacks.lock().keys().collect::<Vec<_>>())
			.finish()
	}
}
