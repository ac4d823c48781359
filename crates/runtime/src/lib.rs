//! Native page seam for the page shim.
//!
//! This crate holds the pieces shared by the scripting-facing `webpage`
//! crate and whatever engine actually renders pages:
//!
//! - **Errors**: [`Error`] and the [`Result`] alias used across the workspace
//! - **Engine seam**: the [`NativePage`] trait, the only capabilities the
//!   shim consumes from an engine (navigate, signals, callbacks, settings)
//! - **Recording engine**: [`RecordingPage`], a deterministic in-process
//!   engine that records navigations and lets callers emit signals by hand
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐
//! │   webpage    │  PageHandle, cookie jar, signal registry
//! └──────┬───────┘
//!        │ Arc<dyn NativePage>
//! ┌──────▼───────┐
//! │   runtime    │  This crate
//! └──────┬───────┘
//!        │ implements NativePage
//! ┌──────▼───────┐
//! │    engine    │  RecordingPage, or a real browser binding
//! └──────────────┘
//! ```

pub mod error;
pub mod native;
pub mod recording;

pub use error::{Error, Result};
pub use native::{NativeCallback, NativePage, NativeSlot, SlotId};
pub use recording::RecordingPage;
