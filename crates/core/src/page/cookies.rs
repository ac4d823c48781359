use std::path::Path;

use webpage_protocol::Cookie;
use webpage_runtime::Result;

use super::PageHandle;
use crate::cookie::CookieJar;

impl PageHandle {
	/// Every cookie in the page's jar.
	pub fn cookies(&self) -> Vec<Cookie> {
		self.cookies.lock().cookies()
	}

	/// Replaces the page's jar contents.
	pub fn set_cookies(&self, cookies: Vec<Cookie>) {
		self.cookies.lock().set_cookies(cookies);
	}

	/// Stores `cookie`. Returns `false` if cookies are disabled.
	pub fn add_cookie(&self, cookie: Cookie) -> bool {
		self.cookies.lock().add_cookie(cookie)
	}

	/// Deletes every cookie named `name`.
	pub fn delete_cookie(&self, name: &str) -> bool {
		self.cookies.lock().delete_cookie(name)
	}

	pub fn clear_cookies(&self) {
		self.cookies.lock().clear_cookies();
	}

	/// Cookies that a request to `url` would carry.
	pub fn cookies_for_url(&self, url: &str) -> Result<Vec<Cookie>> {
		self.cookies.lock().cookies_for_url(url)
	}

	/// Cookies in scope for the page's current URL.
	pub fn page_cookies(&self) -> Result<Vec<Cookie>> {
		let url = self.url();
		self.cookies_for_url(&url)
	}

	pub fn cookies_enabled(&self) -> bool {
		self.cookies.lock().is_enabled()
	}

	pub fn set_cookies_enabled(&self, enabled: bool) {
		tracing::debug!(enabled, "cookies enabled");
		self.cookies.lock().set_enabled(enabled);
	}

	/// Replaces the jar with the contents of a cookies file.
	///
	/// The enabled flag is kept.
	pub fn load_cookies(&self, path: impl AsRef<Path>) -> Result<usize> {
		let loaded = CookieJar::load(path)?;
		let mut jar = self.cookies.lock();
		jar.set_cookies(loaded.cookies());
		Ok(jar.len())
	}

	/// Writes the jar to a cookies file.
	pub fn save_cookies(&self, path: impl AsRef<Path>) -> Result<()> {
		self.cookies.lock().save(path)
	}
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;

	use webpage_protocol::{LoadStatus, PageOptions};
	use webpage_runtime::RecordingPage;

	use super::*;

	#[test]
	fn test_page_cookies_follow_current_url() {
		let native = Arc::new(RecordingPage::new());
		let page = PageHandle::new(native.clone(), PageOptions::new()).unwrap();
		page.add_cookie(Cookie::new("root", "1", "localhost"));
		page.add_cookie(Cookie::new("bar", "2", "localhost").path("/bar"));

		assert!(page.page_cookies().unwrap().is_empty());

		page.open_url("http://localhost/bar/baz").unwrap();
		native.complete_navigation(LoadStatus::Success).unwrap();

		let names: Vec<_> = page.page_cookies().unwrap().into_iter().map(|c| c.name).collect();
		assert_eq!(names, vec!["root", "bar"]);
	}

	#[test]
	fn test_disabled_jar() {
		let page = PageHandle::new(Arc::new(RecordingPage::new()), PageOptions::new()).unwrap();
		page.set_cookies_enabled(false);

		assert!(!page.add_cookie(Cookie::new("a", "1", "localhost")));
		assert!(page.cookies().is_empty());
		assert!(page.cookies_for_url("http://localhost/").unwrap().is_empty());
	}

	#[test]
	fn test_save_and_load() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("cookies.json");

		let page = PageHandle::new(Arc::new(RecordingPage::new()), PageOptions::new()).unwrap();
		page.add_cookie(Cookie::new("a", "1", "localhost"));
		page.add_cookie(Cookie::new("b", "2", "example.com").secure(true));
		page.save_cookies(&path).unwrap();

		let other = PageHandle::new(Arc::new(RecordingPage::new()), PageOptions::new()).unwrap();
		assert_eq!(other.load_cookies(&path).unwrap(), 2);
		assert_eq!(other.cookies(), page.cookies());
	}
}
