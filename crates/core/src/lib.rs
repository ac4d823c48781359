//! webpage: a scriptable page-automation handle over a native browser page.
//!
//! [`PageHandle`] wraps an engine implementing
//! [`NativePage`](webpage_runtime::NativePage) and gives scripts a small,
//! property-style surface: one handler per signal, options deep-merged over
//! the engine defaults, an `open()` that accepts several argument shapes, and
//! a cookie jar with browser scoping rules.
//!
//! # Examples
//!
//! ## Opening a page
//!
//! ```ignore
//! use std::sync::Arc;
//! use webpage::{LoadStatus, OpenArg, PageHandle, PageOptions, RecordingPage};
//!
//! let native = Arc::new(RecordingPage::new());
//! let page = PageHandle::new(native.clone(), PageOptions::new().setting("loadImages", false))?;
//!
//! page.open("http://localhost/form", vec![
//!     "post".into(),
//!     "name=value".into(),
//!     OpenArg::callback(|event| println!("{event:?}")),
//! ])?;
//!
//! native.complete_navigation(LoadStatus::Success)?;
//! ```
//!
//! ## Cookies
//!
//! ```ignore
//! use webpage::{Cookie, CookieJar};
//!
//! let mut jar = CookieJar::new();
//! jar.add_cookie(Cookie::new("session", "abc", "localhost").path("/app"));
//!
//! assert_eq!(jar.cookies_for_url("http://localhost/app/x")?.len(), 1);
//! assert!(jar.cookies_for_url("http://localhost/")?.is_empty());
//! ```

pub mod cookie;
pub mod events;
pub mod handlers;
pub mod merge;
pub mod open;
mod page;

pub use cookie::{CookieJar, cookie_matches, domain_matches, path_matches, unix_now};
pub use events::LoadWaiter;
pub use handlers::{CallbackHandler, Handler, SignalRegistry};
pub use merge::{Mergeable, merge_into, merge_options};
pub use open::{OpenArg, OpenCall};
pub use page::PageHandle;
pub use webpage_protocol::{
	CallbackKind, Cookie, CookieJarFile, LoadStatus, NavigationRequest, Operation, PageEvent,
	PageOptions, PageProperties, PageSettings, RequestDescriptor, SignalKind, Viewport,
};
pub use webpage_runtime::{Error, NativePage, RecordingPage, Result, SlotId};

// Re-export the lower layers for callers that implement their own engine.
pub use webpage_protocol;
pub use webpage_runtime;
