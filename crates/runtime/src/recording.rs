//! Deterministic in-process engine.
//!
//! [`RecordingPage`] loads nothing. It records every call the shim makes and
//! lets the caller drive signals by hand, which makes handler rebinding,
//! navigation dispatch and script injection observable without a browser.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use indexmap::IndexMap;
use parking_lot::Mutex;
use serde_json::Value;
use webpage_protocol::{
    CallbackKind, LoadStatus, NavigationRequest, PageEvent, PageProperties, PageSettings,
    SignalKind,
};

use crate::error::{Error, Result};
use crate::native::{NativeCallback, NativePage, NativeSlot, SlotId};

#[derive(Default)]
struct State {
    slots: IndexMap<SignalKind, IndexMap<SlotId, NativeSlot>>,
    callbacks: HashMap<CallbackKind, NativeCallback>,
    navigations: Vec<NavigationRequest>,
    scripts: Vec<String>,
    evaluations: Vec<String>,
    properties: Option<PageProperties>,
    url: String,
    closed: bool,
}

/// Engine double that records calls and emits signals on demand.
pub struct RecordingPage {
    state: Mutex<State>,
    defaults: PageSettings,
    next_slot: AtomicU64,
}

impl Default for RecordingPage {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingPage {
    pub fn new() -> Self {
        Self::with_default_settings(PageSettings::default())
    }

    /// Creates a page whose [`NativePage::default_settings`] returns `defaults`.
    pub fn with_default_settings(defaults: PageSettings) -> Self {
        Self {
            state: Mutex::new(State {
                url: "about:blank".to_string(),
                ..State::default()
            }),
            defaults,
            next_slot: AtomicU64::new(1),
        }
    }

    /// Invokes every slot connected to the event's signal.
    ///
    /// Slots are collected before invocation, so a slot may connect or
    /// disconnect slots (itself included) without deadlocking. Returns the
    /// number of slots invoked.
    pub fn emit(&self, event: PageEvent) -> usize {
        let slots: Vec<NativeSlot> = {
            let mut state = self.state.lock();
            if let PageEvent::UrlChanged { url } = &event {
                state.url = url.clone();
            }
            state
                .slots
                .get(&event.kind())
                .map(|m| m.values().cloned().collect())
                .unwrap_or_default()
        };

        tracing::trace!(signal = %event.kind(), slots = slots.len(), "emit");
        for slot in &slots {
            slot(&event);
        }
        slots.len()
    }

    /// Plays out the last recorded navigation: load started, url changed,
    /// load finished with `status`.
    pub fn complete_navigation(&self, status: LoadStatus) -> Result<()> {
        let url = self
            .last_navigation()
            .map(|n| n.url().to_string())
            .ok_or_else(|| Error::Native("no navigation to complete".to_string()))?;

        self.emit(PageEvent::LoadStarted);
        self.emit(PageEvent::UrlChanged { url });
        self.emit(PageEvent::load_finished(status));
        Ok(())
    }

    /// Calls the installed callback for `kind`, as the engine would for a
    /// `confirm()` or `prompt()`.
    pub fn invoke_callback(&self, kind: CallbackKind, args: &[Value]) -> Option<Value> {
        let callback = self.state.lock().callbacks.get(&kind).cloned();
        callback.map(|cb| cb(args))
    }

    /// Number of slots connected to `signal`.
    pub fn subscription_count(&self, signal: SignalKind) -> usize {
        self.state
            .lock()
            .slots
            .get(&signal)
            .map_or(0, |m| m.len())
    }

    /// Total number of connected slots across all signals.
    pub fn total_subscriptions(&self) -> usize {
        self.state.lock().slots.values().map(|m| m.len()).sum()
    }

    pub fn has_callback(&self, kind: CallbackKind) -> bool {
        self.state.lock().callbacks.contains_key(&kind)
    }

    /// Every navigation dispatched so far, oldest first.
    pub fn navigations(&self) -> Vec<NavigationRequest> {
        self.state.lock().navigations.clone()
    }

    pub fn last_navigation(&self) -> Option<NavigationRequest> {
        self.state.lock().navigations.last().cloned()
    }

    /// Script URLs appended to the document.
    pub fn appended_scripts(&self) -> Vec<String> {
        self.state.lock().scripts.clone()
    }

    /// Scripts passed to [`NativePage::evaluate`].
    pub fn evaluations(&self) -> Vec<String> {
        self.state.lock().evaluations.clone()
    }

    /// Properties last pushed by the shim.
    pub fn applied_properties(&self) -> Option<PageProperties> {
        self.state.lock().properties.clone()
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    fn ensure_open(&self, op: &'static str) -> Result<()> {
        if self.state.lock().closed {
            return Err(Error::TargetClosed(op));
        }
        Ok(())
    }
}

impl NativePage for RecordingPage {
    fn open_url(&self, request: &NavigationRequest) -> Result<()> {
        self.ensure_open("open a url")?;
        tracing::debug!(url = request.url(), operation = %request.operation(), "open_url");
        self.state.lock().navigations.push(request.clone());
        Ok(())
    }

    fn connect(&self, signal: SignalKind, slot: NativeSlot) -> Result<SlotId> {
        let id = SlotId(self.next_slot.fetch_add(1, Ordering::SeqCst));
        self.state
            .lock()
            .slots
            .entry(signal)
            .or_default()
            .insert(id, slot);
        Ok(id)
    }

    fn disconnect(&self, signal: SignalKind, id: SlotId) -> Result<()> {
        self.state
            .lock()
            .slots
            .get_mut(&signal)
            .and_then(|m| m.shift_remove(&id))
            .map(|_| ())
            .ok_or(Error::NotConnected { signal, slot: id })
    }

    fn set_callback(&self, kind: CallbackKind, callback: Option<NativeCallback>) -> Result<()> {
        let mut state = self.state.lock();
        match callback {
            Some(cb) => {
                state.callbacks.insert(kind, cb);
            }
            None => {
                state.callbacks.remove(&kind);
            }
        }
        Ok(())
    }

    fn default_settings(&self) -> PageSettings {
        self.defaults.clone()
    }

    fn apply_properties(&self, properties: &PageProperties) -> Result<()> {
        self.ensure_open("apply properties")?;
        self.state.lock().properties = Some(properties.clone());
        Ok(())
    }

    fn append_script_element(&self, url: &str) -> Result<()> {
        self.ensure_open("append a script")?;
        self.state.lock().scripts.push(url.to_string());
        Ok(())
    }

    fn evaluate(&self, script: &str) -> Result<Value> {
        self.ensure_open("evaluate")?;
        self.state.lock().evaluations.push(script.to_string());
        Ok(Value::Null)
    }

    fn url(&self) -> String {
        self.state.lock().url.clone()
    }

    fn close(&self) -> Result<()> {
        let mut state = self.state.lock();
        state.closed = true;
        state.slots.clear();
        state.callbacks.clear();
        Ok(())
    }
}
