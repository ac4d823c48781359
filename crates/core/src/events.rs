//! Awaiting lifecycle signals.
//!
//! Navigation never blocks: its outcome arrives later on the load-finished
//! signal. [`LoadWaiter`] turns that one emission into a future.
//!
//! - **With timeout**: call [`wait()`](LoadWaiter::wait)
//! - **Without timeout**: `.await` the waiter directly (implements [`Future`])

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::oneshot;
use webpage_protocol::{LoadStatus, PageEvent};
use webpage_runtime::{Error, Result};

use crate::handlers::Handler;

/// One-shot load-finished waiter.
///
/// # Example
///
/// ```ignore
/// let waiter = page.open_waiter("http://localhost/", Duration::from_secs(10))?;
/// let status = waiter.wait().await?;
/// ```
pub struct LoadWaiter {
	rx: oneshot::Receiver<LoadStatus>,
	timeout: Duration,
}

impl LoadWaiter {
	/// Creates a waiter and the handler that completes it.
	///
	/// The handler forwards the first load-finished status and ignores
	/// anything after it.
	pub(crate) fn channel(timeout: Duration) -> (Handler, Self) {
		let (tx, rx) = oneshot::channel();
		let tx = Mutex::new(Some(tx));

		let handler: Handler = Arc::new(move |event: &PageEvent| {
			let PageEvent::LoadFinished { status } = event else {
				return;
			};
			if let Some(tx) = tx.lock().take() {
				let _ = tx.send(*status);
			}
		});

		(handler, Self { rx, timeout })
	}

	/// Waits for the load to finish with the configured timeout.
	///
	/// # Errors
	///
	/// - [`Error::Timeout`] if no load-finished signal arrives in time
	/// - [`Error::ChannelClosed`] if the handler was dropped (rebound or page closed)
	pub async fn wait(self) -> Result<LoadStatus> {
		tokio::time::timeout(self.timeout, self.rx)
			.await
			.map_err(|_| Error::Timeout("Timeout waiting for load to finish".to_string()))?
			.map_err(|_| Error::ChannelClosed)
	}
}

impl Future for LoadWaiter {
	type Output = Result<LoadStatus>;

	/// Polls the waiter without timeout. For timeout support, use [`wait()`](Self::wait).
	fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
		match Pin::new(&mut self.rx).poll(cx) {
			Poll::Ready(Ok(status)) => Poll::Ready(Ok(status)),
			Poll::Ready(Err(_)) => Poll::Ready(Err(Error::ChannelClosed)),
			Poll::Pending => Poll::Pending,
		}
	}
}

impl std::fmt::Debug for LoadWaiter {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("LoadWaiter")
			.field("timeout", &self.timeout)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn waiter_receives_first_status() {
		let (handler, waiter) = LoadWaiter::channel(Duration::from_secs(1));

		handler(&PageEvent::LoadStarted);
		handler(&PageEvent::load_finished(LoadStatus::Fail));
		handler(&PageEvent::load_finished(LoadStatus::Success));

		assert_eq!(waiter.wait().await.unwrap(), LoadStatus::Fail);
	}

	#[tokio::test]
	async fn waiter_times_out() {
		let (_handler, waiter) = LoadWaiter::channel(Duration::from_millis(10));

		let result = waiter.wait().await;
		assert!(matches!(result, Err(Error::Timeout(_))));
	}

	#[tokio::test]
	async fn dropped_handler_closes_waiter() {
		let (handler, waiter) = LoadWaiter::channel(Duration::from_secs(1));
		drop(handler);

		assert!(matches!(waiter.await, Err(Error::ChannelClosed)));
	}
}
