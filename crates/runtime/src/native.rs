//! The engine seam.
//!
//! [`NativePage`] is everything the shim needs from a browser engine. The
//! shim never reaches past it: navigation, signal subscription, value
//! returning callbacks, settings, and script injection.

use std::sync::Arc;

use serde_json::Value;
use webpage_protocol::{
    CallbackKind, NavigationRequest, PageEvent, PageProperties, PageSettings, SignalKind,
};

use crate::error::Result;

/// Handle returned by [`NativePage::connect`], used to disconnect the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(pub u64);

impl std::fmt::Display for SlotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Callback connected to a native signal.
pub type NativeSlot = Arc<dyn Fn(&PageEvent) + Send + Sync>;

/// Value-returning callback (confirm, prompt, file picker, callPhantom).
pub type NativeCallback = Arc<dyn Fn(&[Value]) -> Value + Send + Sync>;

/// A native browser page.
///
/// Implementations must tolerate slots that disconnect themselves while
/// being invoked.
pub trait NativePage: Send + Sync {
    /// Starts a navigation. Completion is reported on
    /// [`SignalKind::LoadFinished`], never by this call.
    fn open_url(&self, request: &NavigationRequest) -> Result<()>;

    /// Subscribes `slot` to `signal`.
    fn connect(&self, signal: SignalKind, slot: NativeSlot) -> Result<SlotId>;

    /// Removes a slot.
    ///
    /// # Errors
    ///
    /// [`Error::NotConnected`](crate::Error::NotConnected) if the slot is not
    /// connected to `signal`.
    fn disconnect(&self, signal: SignalKind, id: SlotId) -> Result<()>;

    /// Installs or removes the single callback for `kind`.
    fn set_callback(&self, kind: CallbackKind, callback: Option<NativeCallback>) -> Result<()>;

    /// Settings a fresh page starts with.
    fn default_settings(&self) -> PageSettings {
        PageSettings::default()
    }

    /// Pushes viewport, headers and zoom to the engine.
    fn apply_properties(&self, properties: &PageProperties) -> Result<()>;

    /// Appends `<script src=url>` to the document body.
    ///
    /// The engine raises an alert carrying `url` once the script has loaded.
    fn append_script_element(&self, url: &str) -> Result<()>;

    /// Evaluates a script in the page and returns its JSON result.
    fn evaluate(&self, script: &str) -> Result<Value>;

    /// Current URL of the main frame.
    fn url(&self) -> String;

    /// Releases the page.
    fn close(&self) -> Result<()>;
}
