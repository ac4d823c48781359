//! [`PageHandle`], the scripting-facing wrapper around one native page.

mod cookies;
mod navigation;
mod page_events;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use serde_json::Value;
use webpage_protocol::{PageOptions, PageProperties, PageSettings, SignalKind};
use webpage_runtime::{Error, NativePage, Result};

use crate::cookie::CookieJar;
use crate::handlers::{Handler, SignalRegistry};
use crate::merge::merge_options;

/// A scriptable browser page.
///
/// Owns its signal handler map and cookie jar exclusively. All operations run
/// synchronously on the caller's thread; navigation outcomes arrive later on
/// the load-finished signal.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use webpage::{PageHandle, PageOptions, RecordingPage};
///
/// let page = PageHandle::new(Arc::new(RecordingPage::new()), PageOptions::new())?;
/// page.on_load_finished(|status| println!("loaded: {status}"))?;
/// page.open_url("http://localhost/")?;
/// ```
pub struct PageHandle {
	native: Arc<dyn NativePage>,
	signals: SignalRegistry,
	cookies: Mutex<CookieJar>,
	properties: Mutex<PageProperties>,
	closed: AtomicBool,
}

impl PageHandle {
	/// Wraps `native`, deep-merging `options` over the engine's defaults.
	///
	/// # Errors
	///
	/// [`Error::InvalidArgument`] if an option has the wrong shape.
	pub fn new(native: Arc<dyn NativePage>, options: PageOptions) -> Result<Self> {
		Self::with_options_value(native, &serde_json::to_value(options)?)
	}

	/// Like [`new`](Self::new) with untyped options, as a script would pass
	/// them (`{"settings": {"loadImages": false}, "zoomFactor": 2}`).
	pub fn with_options_value(native: Arc<dyn NativePage>, options: &Value) -> Result<Self> {
		let defaults = PageProperties::with_settings(native.default_settings());
		let properties = merge_options(&defaults, options)?;
		native.apply_properties(&properties)?;

		tracing::debug!(
			user_agent = %properties.settings.user_agent,
			viewport = ?properties.viewport_size,
			"page created"
		);

		Ok(Self {
			signals: SignalRegistry::new(Arc::clone(&native)),
			native,
			cookies: Mutex::new(CookieJar::new()),
			properties: Mutex::new(properties),
			closed: AtomicBool::new(false),
		})
	}

	/// The native page this handle drives.
	pub fn native(&self) -> &Arc<dyn NativePage> {
		&self.native
	}

	/// Current settings (copied into every navigation).
	pub fn settings(&self) -> PageSettings {
		self.properties.lock().settings.clone()
	}

	/// Replaces the settings used by later navigations.
	pub fn set_settings(&self, settings: PageSettings) -> Result<()> {
		let mut properties = self.properties.lock();
		properties.settings = settings;
		self.native.apply_properties(&properties)
	}

	/// Full configurable state.
	pub fn properties(&self) -> PageProperties {
		self.properties.lock().clone()
	}

	/// Current URL of the main frame.
	pub fn url(&self) -> String {
		self.native.url()
	}

	/// Evaluates a script in the page.
	pub fn evaluate(&self, script: &str) -> Result<Value> {
		self.ensure_open("evaluate")?;
		self.native.evaluate(script)
	}

	/// Binds `handler` to `signal`, replacing the previous one.
	pub fn set_handler(&self, signal: SignalKind, handler: Handler) -> Result<()> {
		self.ensure_open("bind a handler")?;
		self.signals.set_handler(signal, handler)
	}

	/// Binds a handler by scripting property name (`"onLoadFinished"`).
	///
	/// # Errors
	///
	/// [`Error::InvalidArgument`] if `property` names no signal.
	pub fn set_handler_by_name(&self, property: &str, handler: Handler) -> Result<()> {
		let signal = SignalKind::from_property_name(property)
			.ok_or_else(|| Error::InvalidArgument(format!("unknown signal property '{property}'")))?;
		self.set_handler(signal, handler)
	}

	/// Returns the handler bound to `signal`, if any.
	pub fn handler(&self, signal: SignalKind) -> Option<Handler> {
		self.signals.handler(signal)
	}

	/// Unbinds the handler for `signal`. Returns `true` if one was bound.
	pub fn clear_handler(&self, signal: SignalKind) -> bool {
		self.signals.clear_handler(signal)
	}

	/// The handler registry.
	pub fn signals(&self) -> &SignalRegistry {
		&self.signals
	}

	/// Unbinds every handler and releases the native page.
	///
	/// Further navigation and handler binding fail with
	/// [`Error::TargetClosed`]. Closing twice is a no-op.
	pub fn close(&self) -> Result<()> {
		if self.closed.swap(true, Ordering::SeqCst) {
			return Ok(());
		}
		self.signals.clear_all();
		self.native.close()
	}

	pub fn is_closed(&self) -> bool {
		self.closed.load(Ordering::SeqCst)
	}

	fn ensure_open(&self, op: &'static str) -> Result<()> {
		if self.is_closed() {
			return Err(Error::TargetClosed(op));
		}
		Ok(())
	}
}

impl std::fmt::Debug for PageHandle {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("PageHandle")
			.field("url", &self.url())
			.field("signals", &self.signals)
			.field("cookies", &self.cookies.lock().len())
			.field("closed", &self.is_closed())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;
	use webpage_runtime::RecordingPage;

	#[test]
	fn test_options_merge_over_engine_defaults() {
		let native = Arc::new(RecordingPage::with_default_settings(PageSettings {
			user_agent: "engine/1".to_string(),
			..PageSettings::default()
		}));
		let options = PageOptions::new()
			.setting("loadImages", false)
			.viewport_size(800, 600);

		let page = PageHandle::new(native.clone(), options).unwrap();
		let settings = page.settings();

		assert!(!settings.load_images);
		assert!(settings.javascript_enabled);
		assert_eq!(settings.user_agent, "engine/1");
		assert_eq!(page.properties().viewport_size.width, 800);
		assert_eq!(native.applied_properties(), Some(page.properties()));
	}

	#[test]
	fn test_untyped_options() {
		let native = Arc::new(RecordingPage::new());
		let page = PageHandle::with_options_value(
			native,
			&json!({ "settings": { "userAgent": "bot" }, "zoomFactor": 2.0 }),
		)
		.unwrap();

		assert_eq!(page.settings().user_agent, "bot");
		assert_eq!(page.properties().zoom_factor, 2.0);
	}

	#[test]
	fn test_bad_option_shape_is_rejected() {
		let native = Arc::new(RecordingPage::new());
		let err = PageHandle::with_options_value(native, &json!({ "zoomFactor": "huge" })).unwrap_err();
		assert!(err.is_usage());
	}

	#[test]
	fn test_unknown_property_name() {
		let page = PageHandle::new(Arc::new(RecordingPage::new()), PageOptions::new()).unwrap();
		let err = page
			.set_handler_by_name("onNothing", Arc::new(|_: &webpage_protocol::PageEvent| {}))
			.unwrap_err();
		assert!(matches!(err, Error::InvalidArgument(_)));
	}
}
