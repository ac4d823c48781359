//! Typed handler setters and script injection for [`PageHandle`].

use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;
use webpage_protocol::{
	CallbackKind, LoadStatus, PageEvent, ResourceFailure, ResourceRequest, ResourceResponse,
	SignalKind, TraceFrame,
};
use webpage_runtime::{NativeSlot, Result, SlotId};

use super::PageHandle;
use super::navigation::load_finished;
use crate::handlers::CallbackHandler;

impl PageHandle {
	/// Binds `onLoadStarted`.
	pub fn on_load_started<F>(&self, handler: F) -> Result<()>
	where
		F: Fn() + Send + Sync + 'static,
	{
		self.set_handler(SignalKind::LoadStarted, Arc::new(move |_: &PageEvent| handler()))
	}

	/// Binds `onLoadFinished`. Replaces any callback passed to an earlier
	/// [`open`](Self::open).
	pub fn on_load_finished<F>(&self, handler: F) -> Result<()>
	where
		F: Fn(LoadStatus) + Send + Sync + 'static,
	{
		self.set_handler(SignalKind::LoadFinished, Arc::new(load_finished(handler)))
	}

	pub fn on_url_changed<F>(&self, handler: F) -> Result<()>
	where
		F: Fn(&str) + Send + Sync + 'static,
	{
		self.set_handler(
			SignalKind::UrlChanged,
			Arc::new(move |event: &PageEvent| {
				if let PageEvent::UrlChanged { url } = event {
					handler(url);
				}
			}),
		)
	}

	pub fn on_resource_requested<F>(&self, handler: F) -> Result<()>
	where
		F: Fn(&ResourceRequest) + Send + Sync + 'static,
	{
		self.set_handler(
			SignalKind::ResourceRequested,
			Arc::new(move |event: &PageEvent| {
				if let PageEvent::ResourceRequested(request) = event {
					handler(request);
				}
			}),
		)
	}

	pub fn on_resource_received<F>(&self, handler: F) -> Result<()>
	where
		F: Fn(&ResourceResponse) + Send + Sync + 'static,
	{
		self.set_handler(
			SignalKind::ResourceReceived,
			Arc::new(move |event: &PageEvent| {
				if let PageEvent::ResourceReceived(response) = event {
					handler(response);
				}
			}),
		)
	}

	pub fn on_resource_error<F>(&self, handler: F) -> Result<()>
	where
		F: Fn(&ResourceFailure) + Send + Sync + 'static,
	{
		self.set_handler(
			SignalKind::ResourceError,
			Arc::new(move |event: &PageEvent| {
				if let PageEvent::ResourceError(failure) = event {
					handler(failure);
				}
			}),
		)
	}

	/// Binds `onConsoleMessage`. The handler gets the message, line and
	/// source id as reported by the engine.
	pub fn on_console_message<F>(&self, handler: F) -> Result<()>
	where
		F: Fn(&str, Option<u32>, Option<&str>) + Send + Sync + 'static,
	{
		self.set_handler(
			SignalKind::ConsoleMessage,
			Arc::new(move |event: &PageEvent| {
				if let PageEvent::ConsoleMessage {
					message,
					line,
					source_id,
				} = event
				{
					handler(message, *line, source_id.as_deref());
				}
			}),
		)
	}

	pub fn on_alert<F>(&self, handler: F) -> Result<()>
	where
		F: Fn(&str) + Send + Sync + 'static,
	{
		self.set_handler(
			SignalKind::Alert,
			Arc::new(move |event: &PageEvent| {
				if let PageEvent::Alert { message } = event {
					handler(message);
				}
			}),
		)
	}

	/// Binds `onError`, the handler for uncaught script errors.
	pub fn on_error<F>(&self, handler: F) -> Result<()>
	where
		F: Fn(&str, &[TraceFrame]) + Send + Sync + 'static,
	{
		self.set_handler(
			SignalKind::Error,
			Arc::new(move |event: &PageEvent| {
				if let PageEvent::Error { message, trace } = event {
					handler(message, trace);
				}
			}),
		)
	}

	pub fn on_closing<F>(&self, handler: F) -> Result<()>
	where
		F: Fn() + Send + Sync + 'static,
	{
		self.set_handler(SignalKind::Closing, Arc::new(move |_: &PageEvent| handler()))
	}

	pub fn on_initialized<F>(&self, handler: F) -> Result<()>
	where
		F: Fn() + Send + Sync + 'static,
	{
		self.set_handler(SignalKind::Initialized, Arc::new(move |_: &PageEvent| handler()))
	}

	/// Installs or removes a value-returning callback (`onConfirm`,
	/// `onPrompt`, `onFilePicker`, `onCallback`).
	pub fn set_callback_handler(&self, kind: CallbackKind, handler: Option<CallbackHandler>) -> Result<()> {
		self.ensure_open("bind a callback")?;
		self.signals.set_callback_handler(kind, handler)
	}

	/// Answers `confirm(message)` dialogs.
	pub fn on_confirm<F>(&self, handler: F) -> Result<()>
	where
		F: Fn(&str) -> bool + Send + Sync + 'static,
	{
		let callback: CallbackHandler = Arc::new(move |args: &[Value]| Value::Bool(handler(first_str(args))));
		self.set_callback_handler(CallbackKind::Confirm, Some(callback))
	}

	/// Answers `prompt(message, default)` dialogs. `None` cancels the prompt.
	pub fn on_prompt<F>(&self, handler: F) -> Result<()>
	where
		F: Fn(&str, &str) -> Option<String> + Send + Sync + 'static,
	{
		let callback: CallbackHandler = Arc::new(move |args: &[Value]| {
			let default = args.get(1).and_then(Value::as_str).unwrap_or_default();
			handler(first_str(args), default).map_or(Value::Null, Value::String)
		});
		self.set_callback_handler(CallbackKind::Prompt, Some(callback))
	}

	/// Handles `callPhantom(data)` style calls from page scripts.
	pub fn on_callback<F>(&self, handler: F) -> Result<()>
	where
		F: Fn(&[Value]) -> Value + Send + Sync + 'static,
	{
		self.set_callback_handler(CallbackKind::Callback, Some(Arc::new(handler)))
	}

	/// Chooses the file for an `<input type=file>`. `None` picks nothing.
	pub fn on_file_picker<F>(&self, handler: F) -> Result<()>
	where
		F: Fn(&str) -> Option<String> + Send + Sync + 'static,
	{
		let callback: CallbackHandler =
			Arc::new(move |args: &[Value]| handler(first_str(args)).map_or(Value::Null, Value::String));
		self.set_callback_handler(CallbackKind::FilePicker, Some(callback))
	}

	/// Appends a `<script src=url>` element and calls `callback` once the
	/// script has loaded.
	///
	/// Load completion is reported by the injected element raising an alert
	/// whose text is exactly `url`. A temporary alert slot, separate from any
	/// `onAlert` handler, waits for it, fires `callback` once and disconnects
	/// itself. Failures of that disconnect are ignored.
	pub fn include_js<F>(&self, url: &str, callback: F) -> Result<()>
	where
		F: FnOnce() + Send + 'static,
	{
		self.ensure_open("include a script")?;

		let native = Arc::downgrade(&self.native);
		let slot_id: Arc<Mutex<Option<SlotId>>> = Arc::new(Mutex::new(None));
		let pending = Mutex::new(Some(callback));
		let expected = url.to_string();

		let slot: NativeSlot = {
			let slot_id = Arc::clone(&slot_id);
			Arc::new(move |event: &PageEvent| {
				let PageEvent::Alert { message } = event else {
					return;
				};
				if *message != expected {
					return;
				}
				let Some(callback) = pending.lock().take() else {
					return;
				};
				let id = slot_id.lock().take();
				if let (Some(native), Some(id)) = (native.upgrade(), id) {
					if let Err(e) = native.disconnect(SignalKind::Alert, id) {
						tracing::debug!(slot = %id, error = %e, "include_js slot disconnect ignored");
					}
				}
				callback();
			})
		};

		let id = self.native.connect(SignalKind::Alert, slot)?;
		*slot_id.lock() = Some(id);
		tracing::debug!(url, slot = %id, "include_js");
		self.native.append_script_element(url)
	}
}

fn first_str(args: &[Value]) -> &str {
	args.first().and_then(Value::as_str).unwrap_or_default()
}
