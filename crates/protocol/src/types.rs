//! Navigation request types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::options::PageSettings;

/// HTTP method of a navigation ("operation" in the scripting API).
///
/// Parsed case-insensitively and serialized lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Operation {
    #[default]
    Get,
    Post,
    Put,
    Delete,
    Head,
    /// Any other verb, stored lowercase
    Other(String),
}

impl Operation {
    /// Returns the lowercase wire name.
    pub fn as_str(&self) -> &str {
        match self {
            Operation::Get => "get",
            Operation::Post => "post",
            Operation::Put => "put",
            Operation::Delete => "delete",
            Operation::Head => "head",
            Operation::Other(s) => s,
        }
    }
}

impl From<&str> for Operation {
    fn from(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "get" => Operation::Get,
            "post" => Operation::Post,
            "put" => Operation::Put,
            "delete" => Operation::Delete,
            "head" => Operation::Head,
            other => Operation::Other(other.to_string()),
        }
    }
}

impl From<String> for Operation {
    fn from(s: String) -> Self {
        Operation::from(s.as_str())
    }
}

impl From<Operation> for String {
    fn from(op: Operation) -> Self {
        op.as_str().to_string()
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `{operation, data}` pair handed to the native navigation primitive.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RequestDescriptor {
    /// HTTP method
    pub operation: Operation,

    /// Request body, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// One canonical navigation: `(url, requestDescriptor, settings)`.
///
/// Constructed once per `open()` call and never mutated after dispatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationRequest {
    url: String,
    request: RequestDescriptor,
    settings: PageSettings,
}

impl NavigationRequest {
    /// Creates a request from its parts.
    pub fn new(url: impl Into<String>, request: RequestDescriptor, settings: PageSettings) -> Self {
        Self {
            url: url.into(),
            request,
            settings,
        }
    }

    /// Target URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// HTTP method.
    pub fn operation(&self) -> &Operation {
        &self.request.operation
    }

    /// Request body, if any.
    pub fn data(&self) -> Option<&Value> {
        self.request.data.as_ref()
    }

    /// The `{operation, data}` descriptor.
    pub fn descriptor(&self) -> &RequestDescriptor {
        &self.request
    }

    /// Settings snapshot taken when the request was built.
    pub fn settings(&self) -> &PageSettings {
        &self.settings
    }
}

/// Outcome reported by the load-finished signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadStatus {
    Success,
    Fail,
}

impl LoadStatus {
    pub fn is_success(self) -> bool {
        matches!(self, LoadStatus::Success)
    }
}

impl std::fmt::Display for LoadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadStatus::Success => write!(f, "success"),
            LoadStatus::Fail => write!(f, "fail"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_parse_case_insensitive() {
        assert_eq!(Operation::from("POST"), Operation::Post);
        assert_eq!(Operation::from("Get"), Operation::Get);
        assert_eq!(
            Operation::from("PATCH"),
            Operation::Other("patch".to_string())
        );
    }

    #[test]
    fn test_operation_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Operation::Post).unwrap(), "\"post\"");
        let op: Operation = serde_json::from_str("\"DELETE\"").unwrap();
        assert_eq!(op, Operation::Delete);
    }

    #[test]
    fn test_navigation_request_shape() {
        let request = NavigationRequest::new(
            "http://localhost/echo",
            RequestDescriptor {
                operation: Operation::Post,
                data: Some(Value::String("a=1".into())),
            },
            PageSettings::default(),
        );

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["url"], "http://localhost/echo");
        assert_eq!(json["request"]["operation"], "post");
        assert_eq!(json["request"]["data"], "a=1");
        assert!(json["settings"].is_object());
    }
}
