use std::time::Duration;

use webpage_protocol::{LoadStatus, NavigationRequest, PageEvent, SignalKind};
use webpage_runtime::Result;

use super::PageHandle;
use crate::events::LoadWaiter;
use crate::handlers::Handler;
use crate::open::{OpenArg, OpenCall};

impl PageHandle {
	/// Starts a navigation with scripting-style arguments.
	///
	/// `args` follows `url` and may be empty, a callback, a method, a method
	/// and data, a method and a callback, or a method, data and callback. A
	/// callback is bound as the `onLoadFinished` handler, replacing any
	/// previous one, before the request is dispatched.
	///
	/// Returns once the request is handed to the engine; the outcome arrives
	/// on the load-finished signal.
	///
	/// # Errors
	///
	/// - [`Error::InvalidUsage`](webpage_runtime::Error::InvalidUsage) for an
	///   unsupported argument shape; nothing is bound or dispatched
	/// - [`Error::TargetClosed`](webpage_runtime::Error::TargetClosed) after
	///   [`close`](Self::close)
	pub fn open(&self, url: &str, args: Vec<OpenArg>) -> Result<()> {
		self.ensure_open("open a url")?;
		let call = OpenCall::parse(url, args)?;

		let previous = match call.on_load_finished {
			Some(callback) => {
				let previous = self.signals.handler(SignalKind::LoadFinished);
				self.signals.set_handler(SignalKind::LoadFinished, callback)?;
				Some(previous)
			}
			None => None,
		};

		let request = NavigationRequest::new(call.url, call.request, self.settings());
		tracing::debug!(
			url = request.url(),
			operation = %request.operation(),
			has_data = request.data().is_some(),
			"open"
		);
		if let Err(e) = self.native.open_url(&request) {
			if let Some(previous) = previous {
				self.restore_load_finished(previous);
			}
			return Err(e);
		}
		Ok(())
	}

	fn restore_load_finished(&self, previous: Option<Handler>) {
		match previous {
			Some(handler) => {
				if let Err(e) = self.signals.set_handler(SignalKind::LoadFinished, handler) {
					tracing::debug!(error = %e, "previous load handler not restored");
				}
			}
			None => {
				self.signals.clear_handler(SignalKind::LoadFinished);
			}
		}
	}

	/// `open(url)`: a plain GET.
	pub fn open_url(&self, url: &str) -> Result<()> {
		self.open(url, Vec::new())
	}

	/// `open(url, callback)`: a GET that reports its status to `callback`.
	pub fn open_with_callback<F>(&self, url: &str, callback: F) -> Result<()>
	where
		F: Fn(LoadStatus) + Send + Sync + 'static,
	{
		self.open(url, vec![OpenArg::callback(load_finished(callback))])
	}

	/// Binds `onLoadFinished` to a waiter for the next load-finished status.
	///
	/// Binding another handler there before the load finishes closes the
	/// waiter.
	pub fn load_waiter(&self, timeout: Duration) -> Result<LoadWaiter> {
		let (handler, waiter) = LoadWaiter::channel(timeout);
		self.set_handler(SignalKind::LoadFinished, handler)?;
		Ok(waiter)
	}

	/// Starts a GET and returns a waiter for its load-finished status.
	pub fn open_waiter(&self, url: &str, timeout: Duration) -> Result<LoadWaiter> {
		let (handler, waiter) = LoadWaiter::channel(timeout);
		self.open(url, vec![OpenArg::Callback(handler)])?;
		Ok(waiter)
	}

	/// Opens `url` and waits up to `timeout` for it to finish loading.
	pub async fn open_and_wait(&self, url: &str, timeout: Duration) -> Result<LoadStatus> {
		self.open_waiter(url, timeout)?.wait().await
	}
}

/// Adapts a status callback to a raw event handler.
pub(super) fn load_finished<F>(callback: F) -> impl Fn(&PageEvent) + Send + Sync + 'static
where
	F: Fn(LoadStatus) + Send + Sync + 'static,
{
	move |event: &PageEvent| {
		if let PageEvent::LoadFinished { status } = event {
			callback(*status);
		}
	}
}
