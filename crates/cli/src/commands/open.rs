//! `open` over a recording page.
//!
//! Builds a page from the config file, loads the cookie jar, resolves the
//! `open()` arguments and plays the navigation out to load-finished. Nothing
//! is fetched; the output shows what a real engine would have been asked to
//! do and which cookies it would have sent.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use webpage::{Cookie, LoadStatus, NavigationRequest, OpenArg, PageHandle, RecordingPage};

use super::read_options;
use crate::cli::OpenArgs;
use crate::error::{CliError, Result};

const LOAD_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenOutput {
	pub request: NavigationRequest,
	pub status: LoadStatus,
	pub url: String,
	/// Cookies in scope for the loaded URL
	pub cookies: Vec<Cookie>,
}

pub async fn run(args: OpenArgs) -> Result<OpenOutput> {
	let options = read_options(args.config.as_deref())?;
	let native = Arc::new(RecordingPage::new());
	let page = PageHandle::with_options_value(native.clone(), &options)?;

	if let Some(path) = &args.cookies_file {
		let count = page.load_cookies(path)?;
		tracing::info!(path = %path.display(), count, "loaded cookies");
	}

	let mut open_args = Vec::new();
	if let Some(method) = args.method {
		open_args.push(OpenArg::from(method));
	}
	if let Some(data) = args.data.as_deref() {
		open_args.push(data_arg(data));
	}

	let waiter = page.load_waiter(LOAD_TIMEOUT)?;
	page.open(&args.url, open_args)?;

	let request = native
		.last_navigation()
		.ok_or_else(|| CliError::InvalidInput(format!("no request dispatched for {}", args.url)))?;
	native.complete_navigation(LoadStatus::Success)?;
	let status = waiter.wait().await?;

	let output = OpenOutput {
		request,
		status,
		url: page.url(),
		cookies: page.page_cookies()?,
	};
	page.close()?;
	Ok(output)
}

/// JSON bodies are sent as data, anything else as text.
fn data_arg(data: &str) -> OpenArg {
	serde_json::from_str::<Value>(data)
		.map(OpenArg::from)
		.unwrap_or_else(|_| OpenArg::Text(data.to_string()))
}
