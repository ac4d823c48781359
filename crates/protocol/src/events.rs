//! Signal vocabulary shared by the shim and native engines.
//!
//! A [`SignalKind`] names a native notification channel; a [`PageEvent`] is
//! one notification carried on it. [`CallbackKind`] names the handful of
//! channels whose handler returns a value to the engine (confirm, prompt).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::LoadStatus;

/// Native event-notification channels exposed by a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SignalKind {
    Initialized,
    LoadStarted,
    LoadFinished,
    UrlChanged,
    NavigationRequested,
    RepaintRequested,
    ResourceRequested,
    ResourceReceived,
    ResourceError,
    ResourceTimeout,
    Alert,
    ConsoleMessage,
    Error,
    Closing,
    PageCreated,
}

impl SignalKind {
    /// Every signal, in declaration order.
    pub const ALL: [SignalKind; 15] = [
        SignalKind::Initialized,
        SignalKind::LoadStarted,
        SignalKind::LoadFinished,
        SignalKind::UrlChanged,
        SignalKind::NavigationRequested,
        SignalKind::RepaintRequested,
        SignalKind::ResourceRequested,
        SignalKind::ResourceReceived,
        SignalKind::ResourceError,
        SignalKind::ResourceTimeout,
        SignalKind::Alert,
        SignalKind::ConsoleMessage,
        SignalKind::Error,
        SignalKind::Closing,
        SignalKind::PageCreated,
    ];

    /// Scripting property that binds this signal (`onLoadFinished`).
    pub fn property_name(self) -> &'static str {
        match self {
            SignalKind::Initialized => "onInitialized",
            SignalKind::LoadStarted => "onLoadStarted",
            SignalKind::LoadFinished => "onLoadFinished",
            SignalKind::UrlChanged => "onUrlChanged",
            SignalKind::NavigationRequested => "onNavigationRequested",
            SignalKind::RepaintRequested => "onRepaintRequested",
            SignalKind::ResourceRequested => "onResourceRequested",
            SignalKind::ResourceReceived => "onResourceReceived",
            SignalKind::ResourceError => "onResourceError",
            SignalKind::ResourceTimeout => "onResourceTimeout",
            SignalKind::Alert => "onAlert",
            SignalKind::ConsoleMessage => "onConsoleMessage",
            SignalKind::Error => "onError",
            SignalKind::Closing => "onClosing",
            SignalKind::PageCreated => "onPageCreated",
        }
    }

    /// Name of the signal on the native page object.
    pub fn native_name(self) -> &'static str {
        match self {
            SignalKind::Initialized => "initialized",
            SignalKind::LoadStarted => "loadStarted",
            SignalKind::LoadFinished => "loadFinished",
            SignalKind::UrlChanged => "urlChanged",
            SignalKind::NavigationRequested => "navigationRequested",
            SignalKind::RepaintRequested => "repaintRequested",
            SignalKind::ResourceRequested => "resourceRequested",
            SignalKind::ResourceReceived => "resourceReceived",
            SignalKind::ResourceError => "resourceError",
            SignalKind::ResourceTimeout => "resourceTimeout",
            SignalKind::Alert => "javaScriptAlertSent",
            SignalKind::ConsoleMessage => "javaScriptConsoleMessageSent",
            SignalKind::Error => "javaScriptErrorSent",
            SignalKind::Closing => "closing",
            SignalKind::PageCreated => "rawPageCreated",
        }
    }

    /// Looks up a signal by its scripting property name.
    pub fn from_property_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.property_name() == name)
    }
}

impl std::fmt::Display for SignalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.native_name())
    }
}

/// Channels whose handler returns a value to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CallbackKind {
    /// `window.confirm()`; handler returns a boolean
    Confirm,
    /// `window.prompt()`; handler returns a string
    Prompt,
    /// File chooser; handler returns a path
    FilePicker,
    /// `window.callPhantom()`; handler returns any value
    Callback,
}

impl CallbackKind {
    pub const ALL: [CallbackKind; 4] = [
        CallbackKind::Confirm,
        CallbackKind::Prompt,
        CallbackKind::FilePicker,
        CallbackKind::Callback,
    ];

    /// Scripting property that binds this callback (`onConfirm`).
    pub fn property_name(self) -> &'static str {
        match self {
            CallbackKind::Confirm => "onConfirm",
            CallbackKind::Prompt => "onPrompt",
            CallbackKind::FilePicker => "onFilePicker",
            CallbackKind::Callback => "onCallback",
        }
    }

    pub fn from_property_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.property_name() == name)
    }
}

/// An outgoing resource request.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRequest {
    pub id: u64,
    pub url: String,
    pub method: String,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

/// Stage of a resource response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStage {
    Start,
    End,
}

/// A resource response chunk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceResponse {
    pub id: u64,
    pub url: String,
    pub stage: ResponseStage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

/// A failed or timed-out resource load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceFailure {
    pub id: u64,
    pub url: String,
    pub error_code: i32,
    pub error_string: String,
}

/// One frame of a script error trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceFrame {
    pub file: String,
    pub line: u32,
    #[serde(default)]
    pub function: String,
}

/// Payload of a native signal emission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PageEvent {
    Initialized,
    LoadStarted,
    LoadFinished {
        status: LoadStatus,
    },
    UrlChanged {
        url: String,
    },
    #[serde(rename_all = "camelCase")]
    NavigationRequested {
        url: String,
        navigation_type: String,
        will_navigate: bool,
        main_frame: bool,
    },
    RepaintRequested {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    },
    ResourceRequested(ResourceRequest),
    ResourceReceived(ResourceResponse),
    ResourceError(ResourceFailure),
    ResourceTimeout(ResourceFailure),
    Alert {
        message: String,
    },
    #[serde(rename_all = "camelCase")]
    ConsoleMessage {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        line: Option<u32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        source_id: Option<String>,
    },
    Error {
        message: String,
        #[serde(default)]
        trace: Vec<TraceFrame>,
    },
    Closing,
    PageCreated,
}

impl PageEvent {
    /// The signal this event is emitted on.
    pub fn kind(&self) -> SignalKind {
        match self {
            PageEvent::Initialized => SignalKind::Initialized,
            PageEvent::LoadStarted => SignalKind::LoadStarted,
            PageEvent::LoadFinished { .. } => SignalKind::LoadFinished,
            PageEvent::UrlChanged { .. } => SignalKind::UrlChanged,
            PageEvent::NavigationRequested { .. } => SignalKind::NavigationRequested,
            PageEvent::RepaintRequested { .. } => SignalKind::RepaintRequested,
            PageEvent::ResourceRequested(_) => SignalKind::ResourceRequested,
            PageEvent::ResourceReceived(_) => SignalKind::ResourceReceived,
            PageEvent::ResourceError(_) => SignalKind::ResourceError,
            PageEvent::ResourceTimeout(_) => SignalKind::ResourceTimeout,
            PageEvent::Alert { .. } => SignalKind::Alert,
            PageEvent::ConsoleMessage { .. } => SignalKind::ConsoleMessage,
            PageEvent::Error { .. } => SignalKind::Error,
            PageEvent::Closing => SignalKind::Closing,
            PageEvent::PageCreated => SignalKind::PageCreated,
        }
    }

    /// Convenience constructor for a load-finished event.
    pub fn load_finished(status: LoadStatus) -> Self {
        PageEvent::LoadFinished { status }
    }

    /// Convenience constructor for an alert event.
    pub fn alert(message: impl Into<String>) -> Self {
        PageEvent::Alert {
            message: message.into(),
        }
    }
}
