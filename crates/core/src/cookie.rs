//! Cookie jar and scope matching.
//!
//! A cookie is visible to a request iff all of the following hold:
//!
//! - **domain**: the request host equals the cookie domain, or ends with
//!   `.` + cookie domain when that domain is registrable. A cookie scoped to
//!   a public suffix (`com`, `co.uk`) only matches that exact host. A leading
//!   `.` on the cookie domain is ignored; IP hosts only match exactly.
//! - **path**: the cookie path is a prefix of the request path ending at a
//!   `/` boundary (RFC 6265 §5.1.4)
//! - **secure**: secure cookies need an `https` request
//! - **expiry**: session cookies always pass, others need `expires > now`
//!
//! Malformed cookies are stored like any other but never match.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use indexmap::IndexMap;
use url::{Host, Url};
use webpage_protocol::{Cookie, CookieJarFile, CookieKey};
use webpage_runtime::{Error, Result};

/// Ordered cookie store keyed by `(name, domain, path)`.
#[derive(Debug, Clone)]
pub struct CookieJar {
	cookies: IndexMap<CookieKey, Cookie>,
	enabled: bool,
}

impl Default for CookieJar {
	fn default() -> Self {
		Self::new()
	}
}

impl CookieJar {
	pub fn new() -> Self {
		Self {
			cookies: IndexMap::new(),
			enabled: true,
		}
	}

	/// Creates a jar holding `cookies`; later duplicates win.
	pub fn with_cookies(cookies: impl IntoIterator<Item = Cookie>) -> Self {
		let mut jar = Self::new();
		jar.extend(cookies);
		jar
	}

	/// Loads a jar from a cookies file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		let file = CookieJarFile::from_file(path)?;
		Ok(Self::with_cookies(file.cookies))
	}

	/// Writes all stored cookies to a cookies file.
	pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
		CookieJarFile::with_cookies(self.cookies()).to_file(path)?;
		Ok(())
	}

	pub fn is_enabled(&self) -> bool {
		self.enabled
	}

	/// Enables or disables the jar. A disabled jar keeps its contents but
	/// matches nothing and refuses new cookies.
	pub fn set_enabled(&mut self, enabled: bool) {
		self.enabled = enabled;
	}

	/// Every stored cookie, in insertion order.
	pub fn cookies(&self) -> Vec<Cookie> {
		self.cookies.values().cloned().collect()
	}

	pub fn len(&self) -> usize {
		self.cookies.len()
	}

	pub fn is_empty(&self) -> bool {
		self.cookies.is_empty()
	}

	/// Replaces the whole jar.
	pub fn set_cookies(&mut self, cookies: impl IntoIterator<Item = Cookie>) {
		self.cookies.clear();
		self.extend(cookies);
	}

	/// Stores `cookie`, replacing one with the same identity.
	///
	/// Returns `false` only when the jar is disabled. Malformed cookies are
	/// accepted and simply never match.
	pub fn add_cookie(&mut self, cookie: Cookie) -> bool {
		if !self.enabled {
			return false;
		}
		if !is_well_formed(&cookie) {
			tracing::debug!(name = %cookie.name, domain = ?cookie.domain, "storing unmatchable cookie");
		}
		self.cookies.insert(cookie.key(), cookie);
		true
	}

	/// Removes every cookie named `name`. Returns `true` if any was removed.
	pub fn delete_cookie(&mut self, name: &str) -> bool {
		let before = self.cookies.len();
		self.cookies.retain(|key, _| key.name != name);
		before != self.cookies.len()
	}

	pub fn clear_cookies(&mut self) {
		self.cookies.clear();
	}

	/// Drops cookies that expired at or before `now` (Unix seconds).
	/// Returns the number removed.
	pub fn purge_expired(&mut self, now: f64) -> usize {
		let before = self.cookies.len();
		self.cookies.retain(|_, c| !is_expired(c, now));
		before - self.cookies.len()
	}

	/// Cookies visible to `url` right now.
	pub fn cookies_for_url(&self, url: &str) -> Result<Vec<Cookie>> {
		self.cookies_for_url_at(url, unix_now())
	}

	/// Cookies visible to `url` at time `now` (Unix seconds).
	pub fn cookies_for_url_at(&self, url: &str, now: f64) -> Result<Vec<Cookie>> {
		let url = Url::parse(url).map_err(|e| Error::InvalidUrl {
			url: url.to_string(),
			reason: e.to_string(),
		})?;

		if !self.enabled {
			return Ok(Vec::new());
		}

		Ok(self
			.cookies
			.values()
			.filter(|c| cookie_matches(c, &url, now))
			.cloned()
			.collect())
	}

	fn extend(&mut self, cookies: impl IntoIterator<Item = Cookie>) {
		for cookie in cookies {
			self.cookies.insert(cookie.key(), cookie);
		}
	}
}

/// Returns true if `cookie` would be sent with a request to `url` at `now`.
pub fn cookie_matches(cookie: &Cookie, url: &Url, now: f64) -> bool {
	if !is_well_formed(cookie) || is_expired(cookie, now) {
		return false;
	}
	if cookie.is_secure() && url.scheme() != "https" {
		return false;
	}

	let Some(host) = url.host() else {
		return false;
	};
	let domain = cookie.domain.as_deref().unwrap_or_default();
	domain_matches(&host, domain) && path_matches(url.path(), cookie.effective_path())
}

/// Host/domain match. `domain` may carry a leading dot.
pub fn domain_matches(host: &Host<&str>, domain: &str) -> bool {
	let domain = domain.trim_start_matches('.').to_ascii_lowercase();
	if domain.is_empty() {
		return false;
	}

	match host {
		Host::Domain(name) => {
			let name = name.to_ascii_lowercase();
			name == domain
				|| (!is_public_suffix(&domain)
					&& name.len() > domain.len()
					&& name.ends_with(&domain)
					&& name.as_bytes()[name.len() - domain.len() - 1] == b'.')
		}
		Host::Ipv4(addr) => addr.to_string() == domain,
		Host::Ipv6(addr) => addr.to_string() == domain.trim_start_matches('[').trim_end_matches(']'),
	}
}

/// True for a domain listed on the Public Suffix List. Unlisted names
/// (`localhost`, intranet hosts) fall under the implicit `*` rule and count
/// as registrable.
fn is_public_suffix(domain: &str) -> bool {
	psl::suffix(domain.as_bytes()).is_some_and(|s| s.is_known() && s.as_bytes() == domain.as_bytes())
}

/// RFC 6265 path match.
pub fn path_matches(request_path: &str, cookie_path: &str) -> bool {
	let request_path = if request_path.is_empty() { "/" } else { request_path };

	if request_path == cookie_path {
		return true;
	}
	request_path.starts_with(cookie_path)
		&& (cookie_path.ends_with('/') || request_path.as_bytes().get(cookie_path.len()) == Some(&b'/'))
}

fn is_expired(cookie: &Cookie, now: f64) -> bool {
	match cookie.expires {
		Some(expires) if expires >= 0.0 => expires <= now,
		_ => false,
	}
}

fn is_well_formed(cookie: &Cookie) -> bool {
	!cookie.name.is_empty()
		&& cookie
			.domain
			.as_deref()
			.is_some_and(|d| !d.trim_start_matches('.').is_empty())
		&& cookie.effective_path().starts_with('/')
		&& cookie.expires.is_none_or(f64::is_finite)
}

/// Current time in Unix seconds, the clock cookie expiry is compared against.
pub fn unix_now() -> f64 {
	SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.map(|d| d.as_secs_f64())
		.unwrap_or_default()
}

#[cfg(test)]
mod tests {
	use super::*;

	const NOW: f64 = 1_700_000_000.0;

	fn names(cookies: &[Cookie]) -> Vec<&str> {
		cookies.iter().map(|c| c.name.as_str()).collect()
	}

	#[test]
	fn test_path_match_boundaries() {
		assert!(path_matches("/bar", "/bar"));
		assert!(path_matches("/bar/baz", "/bar"));
		assert!(path_matches("/bar/baz", "/bar/"));
		assert!(path_matches("/anything", "/"));
		assert!(path_matches("", "/"));
		assert!(!path_matches("/", "/bar"));
		assert!(!path_matches("/barn", "/bar"));
	}

	#[test]
	fn test_domain_match_suffix() {
		let host = Host::Domain("www.example.com");
		assert!(domain_matches(&host, "example.com"));
		assert!(domain_matches(&host, ".example.com"));
		assert!(domain_matches(&host, "WWW.example.com"));
		assert!(!domain_matches(&host, "ample.com"));
		assert!(!domain_matches(&host, "other.com"));
		assert!(!domain_matches(&Host::Domain("example.com"), "www.example.com"));

		assert!(!domain_matches(&Host::Domain("example.com"), "com"));
		assert!(!domain_matches(&Host::Domain("example.com"), ".com"));
		assert!(!domain_matches(&Host::Domain("shop.co.uk"), "co.uk"));
		assert!(domain_matches(&Host::Domain("shop.co.uk"), "shop.co.uk"));
		assert!(domain_matches(&Host::Domain("a.shop.co.uk"), ".shop.co.uk"));
		assert!(domain_matches(&Host::Domain("com"), "com"));
		assert!(domain_matches(&Host::Domain("localhost"), "localhost"));
		assert!(domain_matches(&Host::Domain("api.localhost"), "localhost"));
	}

	#[test]
	fn test_public_suffix_cookies_are_stored_but_never_sent() {
		let jar = CookieJar::with_cookies([
			Cookie::new("tld", "1", "com"),
			Cookie::new("psl", "1", "co.uk"),
		]);

		assert_eq!(jar.len(), 2);
		assert!(jar.cookies_for_url_at("http://example.com/", NOW).unwrap().is_empty());
		assert!(jar.cookies_for_url_at("http://shop.co.uk/", NOW).unwrap().is_empty());
	}

	#[test]
	fn test_ip_hosts_match_exactly() {
		let url = Url::parse("http://127.0.0.1/").unwrap();
		let host = url.host().unwrap();
		assert!(domain_matches(&host, "127.0.0.1"));
		assert!(!domain_matches(&host, "0.0.1"));
	}

	#[test]
	fn test_identity_replaces() {
		let mut jar = CookieJar::new();
		jar.add_cookie(Cookie::new("sid", "1", "localhost"));
		jar.add_cookie(Cookie::new("sid", "2", "localhost").path("/"));
		jar.add_cookie(Cookie::new("sid", "3", "localhost").path("/bar"));

		assert_eq!(jar.len(), 2);
		let values: Vec<_> = jar.cookies().into_iter().map(|c| c.value).collect();
		assert_eq!(values, vec!["2", "3"]);
	}

	#[test]
	fn test_secure_requires_https() {
		let jar = CookieJar::with_cookies([Cookie::new("s", "1", "localhost").secure(true)]);

		assert!(jar.cookies_for_url_at("http://localhost/", NOW).unwrap().is_empty());
		assert_eq!(
			names(&jar.cookies_for_url_at("https://localhost/", NOW).unwrap()),
			vec!["s"]
		);
	}

	#[test]
	fn test_expiry_is_strict() {
		let jar = CookieJar::with_cookies([
			Cookie::new("past", "1", "localhost").expires(NOW - 1.0),
			Cookie::new("exact", "1", "localhost").expires(NOW),
			Cookie::new("future", "1", "localhost").expires(NOW + 1.0),
			Cookie::new("session", "1", "localhost").expires(-1.0),
		]);

		let visible = jar.cookies_for_url_at("http://localhost/", NOW).unwrap();
		assert_eq!(names(&visible), vec!["future", "session"]);
	}

	#[test]
	fn test_malformed_cookies_stored_but_unmatched() {
		let mut jar = CookieJar::new();
		assert!(jar.add_cookie(Cookie::new("", "1", "localhost")));
		assert!(jar.add_cookie(Cookie::new("nodomain", "1", "")));
		assert!(jar.add_cookie(Cookie::new("badpath", "1", "localhost").path("bar")));
		assert!(jar.add_cookie(Cookie::new("nan", "1", "localhost").expires(f64::NAN)));

		assert_eq!(jar.len(), 4);
		assert!(jar.cookies_for_url_at("http://localhost/bar", NOW).unwrap().is_empty());
	}

	#[test]
	fn test_disabled_jar() {
		let mut jar = CookieJar::with_cookies([Cookie::new("a", "1", "localhost")]);
		jar.set_enabled(false);

		assert!(!jar.add_cookie(Cookie::new("b", "1", "localhost")));
		assert!(jar.cookies_for_url_at("http://localhost/", NOW).unwrap().is_empty());
		assert_eq!(jar.len(), 1);

		jar.set_enabled(true);
		assert_eq!(jar.cookies_for_url_at("http://localhost/", NOW).unwrap().len(), 1);
	}

	#[test]
	fn test_delete_and_purge() {
		let mut jar = CookieJar::with_cookies([
			Cookie::new("a", "1", "localhost"),
			Cookie::new("a", "2", "localhost").path("/x"),
			Cookie::new("old", "1", "localhost").expires(NOW - 10.0),
		]);

		assert!(jar.delete_cookie("a"));
		assert!(!jar.delete_cookie("a"));
		assert_eq!(jar.purge_expired(NOW), 1);
		assert!(jar.is_empty());
	}

	#[test]
	fn test_invalid_url_is_an_error() {
		let jar = CookieJar::new();
		let err = jar.cookies_for_url("not a url").unwrap_err();
		assert!(matches!(err, Error::InvalidUrl { .. }));
	}

	#[test]
	fn test_save_and_load() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("jar.json");

		let jar = CookieJar::with_cookies([
			Cookie::new("a", "1", "localhost"),
			Cookie::new("b", "2", ".example.com").secure(true).expires(NOW),
		]);
		jar.save(&path).unwrap();

		let loaded = CookieJar::load(&path).unwrap();
		assert_eq!(loaded.cookies(), jar.cookies());
	}
}
