//! Data types for the page shim.
//!
//! This crate contains the serde-serializable types exchanged between the
//! scripting-facing `PageHandle` and a native page engine: cookies,
//! navigation requests, page settings, and the signal/event vocabulary.
//!
//! # Design Philosophy
//!
//! Types in this crate are:
//! - **Pure data**: No behavior beyond serialization and small accessors
//! - **Scripting-shaped**: JSON field names follow the scripting API
//!   (`httponly`, `viewportSize`, `onLoadFinished`)
//! - **Stable**: Changes only when the scripting surface changes
//!
//! Matching, merging, and dispatch live in the `webpage` crate.

pub mod cookie;
pub mod events;
pub mod options;
pub mod types;

pub use cookie::*;
pub use events::*;
pub use options::*;
pub use types::*;
