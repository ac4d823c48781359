//! Cookie descriptors and the on-disk cookie jar format.
//!
//! A [`Cookie`] is set once and matched against many requests. Its lifetime is
//! independent of any page: it either expires at an explicit timestamp or lives
//! for the whole session.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// SameSite cookie attribute.
///
/// Controls when cookies are sent with cross-site requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SameSite {
    /// Cookie is sent with same-site and cross-site requests
    #[serde(rename = "None")]
    None,
    /// Cookie is sent with same-site requests and cross-site top-level navigations
    #[default]
    #[serde(rename = "Lax")]
    Lax,
    /// Cookie is only sent with same-site requests
    #[serde(rename = "Strict")]
    Strict,
}

/// A browser cookie.
///
/// Field names follow the scripting API (`httponly`, `expires`). On input the
/// camelCase `httpOnly` is accepted too, and so is the browser-exported shape
/// that carries both an HTTP-date `expires` string and a numeric `expiry`:
/// the numeric value wins and a date string is ignored.
///
/// # Example
///
/// ```ignore
/// use webpage_protocol::Cookie;
///
/// let cookie = Cookie::new("session", "abc123", "localhost").path("/");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "CookieRecord")]
pub struct Cookie {
    /// Cookie name
    pub name: String,

    /// Cookie value
    pub value: String,

    /// Domain for the cookie (a leading `.` is accepted and ignored for matching)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,

    /// Path for the cookie (default: "/")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Unix timestamp in seconds. Absent or negative means session cookie.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires: Option<f64>,

    /// Whether the cookie is hidden from page scripts
    #[serde(rename = "httponly", skip_serializing_if = "Option::is_none")]
    pub http_only: Option<bool>,

    /// Whether the cookie requires HTTPS
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secure: Option<bool>,

    /// SameSite attribute
    #[serde(rename = "samesite", skip_serializing_if = "Option::is_none")]
    pub same_site: Option<SameSite>,
}

/// Wire shape of a cookie as found in jar files and scripts.
#[derive(Deserialize)]
struct CookieRecord {
    name: String,
    value: String,
    #[serde(default)]
    domain: Option<String>,
    #[serde(default)]
    path: Option<String>,
    #[serde(default)]
    expires: Option<Value>,
    #[serde(default)]
    expiry: Option<Value>,
    #[serde(default, rename = "httponly", alias = "httpOnly")]
    http_only: Option<bool>,
    #[serde(default)]
    secure: Option<bool>,
    #[serde(default, rename = "samesite", alias = "sameSite")]
    same_site: Option<SameSite>,
}

impl From<CookieRecord> for Cookie {
    fn from(record: CookieRecord) -> Self {
        let seconds = |v: Option<Value>| v.as_ref().and_then(Value::as_f64);
        Self {
            name: record.name,
            value: record.value,
            domain: record.domain,
            path: record.path,
            expires: seconds(record.expiry).or_else(|| seconds(record.expires)),
            http_only: record.http_only,
            secure: record.secure,
            same_site: record.same_site,
        }
    }
}

impl Cookie {
    /// Creates a new cookie with required fields.
    ///
    /// # Arguments
    ///
    /// * `name` - Cookie name
    /// * `value` - Cookie value
    /// * `domain` - Domain for the cookie (e.g., "localhost" or ".example.com")
    pub fn new(
        name: impl Into<String>,
        value: impl Into<String>,
        domain: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: Some(domain.into()),
            path: None,
            expires: None,
            http_only: None,
            secure: None,
            same_site: None,
        }
    }

    /// Sets the path for the cookie
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Sets the expiration timestamp (Unix seconds). Use -1 for session cookie.
    pub fn expires(mut self, expires: f64) -> Self {
        self.expires = Some(expires);
        self
    }

    /// Sets whether the cookie is HTTP-only
    pub fn http_only(mut self, http_only: bool) -> Self {
        self.http_only = Some(http_only);
        self
    }

    /// Sets whether the cookie requires HTTPS
    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = Some(secure);
        self
    }

    /// Sets the SameSite attribute
    pub fn same_site(mut self, same_site: SameSite) -> Self {
        self.same_site = Some(same_site);
        self
    }

    /// Path used for matching and identity, `/` when unset.
    pub fn effective_path(&self) -> &str {
        self.path.as_deref().unwrap_or("/")
    }

    /// Returns true when the cookie has no expiry and lives for the session.
    pub fn is_session(&self) -> bool {
        self.expires.is_none_or(|e| e < 0.0)
    }

    /// Returns true if the cookie requires a secure transport.
    pub fn is_secure(&self) -> bool {
        self.secure.unwrap_or(false)
    }

    /// Identity of this cookie within a jar.
    pub fn key(&self) -> CookieKey {
        CookieKey {
            name: self.name.clone(),
            domain: self
                .domain
                .as_deref()
                .map(|d| d.to_ascii_lowercase())
                .unwrap_or_default(),
            path: self.effective_path().to_string(),
        }
    }
}

/// Identity of a cookie: `(name, domain, path)`.
///
/// Domain is compared case-insensitively; an unset path is `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CookieKey {
    pub name: String,
    pub domain: String,
    pub path: String,
}

/// Persistent cookie jar contents.
///
/// This is the format read and written by `--cookies-file`.
///
/// # Example
///
/// ```ignore
/// let file = CookieJarFile::from_file("cookies.json")?;
/// page.set_cookies(file.cookies);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CookieJarFile {
    /// All cookies in the jar
    pub cookies: Vec<Cookie>,
}

impl CookieJarFile {
    /// Creates an empty jar file
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a jar file holding the given cookies
    pub fn with_cookies(cookies: Vec<Cookie>) -> Self {
        Self { cookies }
    }

    /// Loads a jar from a JSON file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> std::io::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }

    /// Saves the jar to a JSON file
    pub fn to_file(&self, path: impl AsRef<std::path::Path>) -> std::io::Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }
}
