//! Cookie jar file management.

use std::path::{Path, PathBuf};

use serde::Serialize;
use webpage::{Cookie, CookieJar, unix_now};

use crate::cli::{AddCookieArgs, CookiesAction, CookiesArgs};
use crate::error::{CliError, Result};

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum CookiesOutput {
	/// Result of `list`
	Cookies(Vec<Cookie>),
	/// Result of a mutating action
	Updated(JarUpdate),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JarUpdate {
	pub file: PathBuf,
	/// Cookies added, deleted or purged
	pub changed: usize,
	/// Cookies left in the jar
	pub total: usize,
}

pub(super) fn action_name(action: &CookiesAction) -> &'static str {
	match action {
		CookiesAction::List { .. } => "list",
		CookiesAction::Add(_) => "add",
		CookiesAction::Delete { .. } => "delete",
		CookiesAction::Clear => "clear",
		CookiesAction::Purge => "purge",
	}
}

pub fn run(args: CookiesArgs) -> Result<CookiesOutput> {
	let path = args.cookies_file;
	let mut jar = open_jar(&path)?;

	let changed = match args.action {
		CookiesAction::List { url: None } => return Ok(CookiesOutput::Cookies(jar.cookies())),
		CookiesAction::List { url: Some(url) } => {
			return Ok(CookiesOutput::Cookies(jar.cookies_for_url(&url)?));
		}
		CookiesAction::Add(add) => {
			let cookie = build_cookie(add)?;
			tracing::info!(name = %cookie.name, domain = ?cookie.domain, "adding cookie");
			usize::from(jar.add_cookie(cookie))
		}
		CookiesAction::Delete { name } => {
			let before = jar.len();
			jar.delete_cookie(&name);
			before - jar.len()
		}
		CookiesAction::Clear => {
			let before = jar.len();
			jar.clear_cookies();
			before
		}
		CookiesAction::Purge => jar.purge_expired(unix_now()),
	};

	jar.save(&path)?;
	Ok(CookiesOutput::Updated(JarUpdate {
		file: path,
		changed,
		total: jar.len(),
	}))
}

/// Loads the jar at `path`, or an empty one if the file does not exist yet.
fn open_jar(path: &Path) -> Result<CookieJar> {
	if !path.exists() {
		tracing::debug!(path = %path.display(), "cookie jar not found, starting empty");
		return Ok(CookieJar::new());
	}
	Ok(CookieJar::load(path)?)
}

fn build_cookie(args: AddCookieArgs) -> Result<Cookie> {
	if args.name.is_empty() {
		return Err(CliError::InvalidInput("cookie name must not be empty".into()));
	}
	if args.expires.is_some_and(|e| !e.is_finite()) {
		return Err(CliError::InvalidInput("cookie expiry must be a finite number".into()));
	}

	let mut cookie = Cookie::new(args.name, args.value, args.domain);
	if let Some(path) = args.path {
		cookie = cookie.path(path);
	}
	if let Some(expires) = args.expires {
		cookie = cookie.expires(expires);
	}
	if args.secure {
		cookie = cookie.secure(true);
	}
	if args.http_only {
		cookie = cookie.http_only(true);
	}
	Ok(cookie)
}
