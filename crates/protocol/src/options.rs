//! Page settings and construction options.
//!
//! [`PageProperties`] is the full configurable state of a page.
//! [`PageOptions`] is its all-optional mirror: unset fields are omitted
//! when serialized, so merging options over defaults leaves them untouched.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Default user agent reported by pages that don't override it.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Unknown; Linux x86_64) AppleWebKit/538.1 (KHTML, like Gecko) Safari/538.1";

/// Per-page settings snapshot.
///
/// A copy is attached to every navigation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageSettings {
    /// Run page scripts
    pub javascript_enabled: bool,

    /// Load inline images
    pub load_images: bool,

    /// Allow `file://` pages to reach remote URLs
    pub local_to_remote_url_access_enabled: bool,

    /// Enforce same-origin policy
    pub web_security_enabled: bool,

    /// Enable the XSS auditor
    #[serde(rename = "XSSAuditingEnabled")]
    pub xss_auditing_enabled: bool,

    /// User-Agent header value
    pub user_agent: String,

    /// HTTP authentication user name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,

    /// HTTP authentication password
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Per-resource timeout in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_timeout: Option<u64>,
}

impl Default for PageSettings {
    fn default() -> Self {
        Self {
            javascript_enabled: true,
            load_images: true,
            local_to_remote_url_access_enabled: false,
            web_security_enabled: true,
            xss_auditing_enabled: false,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            user_name: None,
            password: None,
            resource_timeout: None,
        }
    }
}

/// Viewport dimensions in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 400,
            height: 300,
        }
    }
}

/// Complete configurable state of a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageProperties {
    /// Settings applied to every navigation
    pub settings: PageSettings,

    /// Viewport size
    pub viewport_size: Viewport,

    /// Extra headers sent with every request
    pub custom_headers: BTreeMap<String, String>,

    /// Page zoom factor
    pub zoom_factor: f64,
}

impl Default for PageProperties {
    fn default() -> Self {
        Self::with_settings(PageSettings::default())
    }
}

impl PageProperties {
    /// Default properties around the given settings.
    pub fn with_settings(settings: PageSettings) -> Self {
        Self {
            settings,
            viewport_size: Viewport::default(),
            custom_headers: BTreeMap::new(),
            zoom_factor: 1.0,
        }
    }
}

/// Construction-time overrides for a page.
///
/// Only the fields that are set take part in the merge.
///
/// # Example
///
/// ```ignore
/// let options = PageOptions::new()
///     .setting("loadImages", false)
///     .viewport_size(1024, 768);
/// let page = PageHandle::new(native, options)?;
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageOptions {
    /// Partial settings, keyed by scripting name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<Map<String, Value>>,

    /// Viewport size
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewport_size: Option<Viewport>,

    /// Extra headers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_headers: Option<BTreeMap<String, String>>,

    /// Zoom factor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zoom_factor: Option<f64>,
}

impl PageOptions {
    /// Creates empty options (no overrides).
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides a single setting by its scripting name (e.g. `"userAgent"`).
    pub fn setting(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.settings
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }

    /// Sets the viewport size.
    pub fn viewport_size(mut self, width: u32, height: u32) -> Self {
        self.viewport_size = Some(Viewport { width, height });
        self
    }

    /// Adds an extra request header.
    pub fn custom_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_headers
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), value.into());
        self
    }

    /// Sets the zoom factor.
    pub fn zoom_factor(mut self, zoom: f64) -> Self {
        self.zoom_factor = Some(zoom);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_scripting_names() {
        let json = serde_json::to_value(PageSettings::default()).unwrap();
        assert_eq!(json["javascriptEnabled"], true);
        assert_eq!(json["XSSAuditingEnabled"], false);
        assert!(json.get("userName").is_none());
    }

    #[test]
    fn test_partial_settings_fill_defaults() {
        let settings: PageSettings = serde_json::from_str(r#"{"loadImages":false}"#).unwrap();
        assert!(!settings.load_images);
        assert!(settings.javascript_enabled);
        assert_eq!(settings.user_agent, DEFAULT_USER_AGENT);
    }

    #[test]
    fn test_unset_options_are_omitted() {
        let json = serde_json::to_value(PageOptions::new().zoom_factor(2.0)).unwrap();
        assert_eq!(json, serde_json::json!({ "zoomFactor": 2.0 }));
    }

    #[test]
    fn test_options_builder() {
        let options = PageOptions::new()
            .setting("userAgent", "bot/1.0")
            .setting("loadImages", false)
            .custom_header("X-Test", "1");

        let settings = options.settings.unwrap();
        assert_eq!(settings["userAgent"], "bot/1.0");
        assert_eq!(settings["loadImages"], false);
        assert_eq!(options.custom_headers.unwrap()["X-Test"], "1");
    }
}
