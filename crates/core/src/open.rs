//! Argument resolution for `open()`.
//!
//! The scripting `open(url, method|callback, data|callback, callback)`
//! accepts one to four positional arguments. [`OpenCall::parse`] resolves
//! them, by count and by variant, into one canonical request:
//!
//! | args | interpretation |
//! |---|---|
//! | 1 | GET, no callback |
//! | 2, callback | GET, `onLoadFinished` = callback |
//! | 2, text | method |
//! | 3, callback last | method, `onLoadFinished` = callback |
//! | 3 | method, data |
//! | 4 | method, data, `onLoadFinished` = callback |

use std::sync::Arc;

use serde_json::Value;
use webpage_protocol::{Operation, PageEvent, RequestDescriptor};
use webpage_runtime::{Error, Result};

use crate::handlers::Handler;

/// One positional argument after the URL.
#[derive(Clone)]
pub enum OpenArg {
	/// A string: a method name or a string body
	Text(String),
	/// Any non-string body
	Data(Value),
	/// A load-finished callback
	Callback(Handler),
}

impl OpenArg {
	/// Wraps a closure as a callback argument.
	pub fn callback<F>(f: F) -> Self
	where
		F: Fn(&PageEvent) + Send + Sync + 'static,
	{
		OpenArg::Callback(Arc::new(f))
	}

	fn type_name(&self) -> &'static str {
		match self {
			OpenArg::Text(_) => "string",
			OpenArg::Data(_) => "data",
			OpenArg::Callback(_) => "function",
		}
	}
}

impl From<&str> for OpenArg {
	fn from(s: &str) -> Self {
		OpenArg::Text(s.to_string())
	}
}

impl From<String> for OpenArg {
	fn from(s: String) -> Self {
		OpenArg::Text(s)
	}
}

impl From<Value> for OpenArg {
	fn from(value: Value) -> Self {
		match value {
			Value::String(s) => OpenArg::Text(s),
			other => OpenArg::Data(other),
		}
	}
}

impl From<Handler> for OpenArg {
	fn from(handler: Handler) -> Self {
		OpenArg::Callback(handler)
	}
}

impl std::fmt::Debug for OpenArg {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			OpenArg::Text(s) => f.debug_tuple("Text").field(s).finish(),
			OpenArg::Data(v) => f.debug_tuple("Data").field(v).finish(),
			OpenArg::Callback(_) => f.write_str("Callback(..)"),
		}
	}
}

/// A resolved `open()` call.
#[derive(Clone)]
pub struct OpenCall {
	pub url: String,
	pub request: RequestDescriptor,
	/// Handler to bind as `onLoadFinished` before dispatch
	pub on_load_finished: Option<Handler>,
}

impl OpenCall {
	/// Resolves `open(url, args...)`.
	///
	/// # Errors
	///
	/// [`Error::InvalidUsage`] for any arity outside 1..=4 or an argument of
	/// the wrong kind in a fixed position.
	pub fn parse(url: impl Into<String>, args: Vec<OpenArg>) -> Result<Self> {
		let url = url.into();
		let arity = args.len() + 1;
		let mut args = args.into_iter();

		let (operation, data, callback) = match (args.next(), args.next(), args.next(), args.next()) {
			(None, ..) => (Operation::Get, None, None),
			(Some(OpenArg::Callback(cb)), None, ..) => (Operation::Get, None, Some(cb)),
			(Some(method), None, ..) => (operation_of(method)?, None, None),
			(Some(method), Some(OpenArg::Callback(cb)), None, _) => {
				(operation_of(method)?, None, Some(cb))
			}
			(Some(method), Some(data), None, _) => (operation_of(method)?, Some(data_of(data)?), None),
			(Some(method), Some(data), Some(OpenArg::Callback(cb)), None) => {
				(operation_of(method)?, Some(data_of(data)?), Some(cb))
			}
			(Some(_), Some(_), Some(other), None) => {
				return Err(Error::InvalidUsage(format!(
					"open() expects a callback as its fourth argument, got {}",
					other.type_name()
				)));
			}
			(Some(_), Some(_), Some(_), Some(_)) => {
				return Err(Error::InvalidUsage(format!(
					"open() takes 1 to 4 arguments, got {}",
					arity
				)));
			}
		};

		Ok(Self {
			url,
			request: RequestDescriptor { operation, data },
			on_load_finished: callback,
		})
	}
}

impl std::fmt::Debug for OpenCall {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("OpenCall")
			.field("url", &self.url)
			.field("request", &self.request)
			.field("on_load_finished", &self.on_load_finished.is_some())
			.finish()
	}
}

fn operation_of(arg: OpenArg) -> Result<Operation> {
	match arg {
		OpenArg::Text(method) => Ok(Operation::from(method)),
		other => Err(Error::InvalidUsage(format!(
			"open() expects a method name as its second argument, got {}",
			other.type_name()
		))),
	}
}

fn data_of(arg: OpenArg) -> Result<Value> {
	match arg {
		OpenArg::Text(s) => Ok(Value::String(s)),
		OpenArg::Data(v) => Ok(v),
		OpenArg::Callback(_) => Err(Error::InvalidUsage(
			"open() expects request data as its third argument, got function".to_string(),
		)),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	fn noop() -> OpenArg {
		OpenArg::callback(|_| {})
	}

	#[test]
	fn test_url_only() {
		let call = OpenCall::parse("http://localhost/", vec![]).unwrap();
		assert_eq!(call.request.operation, Operation::Get);
		assert!(call.request.data.is_none());
		assert!(call.on_load_finished.is_none());
	}

	#[test]
	fn test_url_and_callback() {
		let call = OpenCall::parse("http://localhost/", vec![noop()]).unwrap();
		assert_eq!(call.request.operation, Operation::Get);
		assert!(call.on_load_finished.is_some());
	}

	#[test]
	fn test_url_and_method() {
		let call = OpenCall::parse("http://localhost/", vec!["POST".into()]).unwrap();
		assert_eq!(call.request.operation, Operation::Post);
		assert!(call.on_load_finished.is_none());
	}

	#[test]
	fn test_method_and_callback() {
		let call = OpenCall::parse("http://localhost/", vec!["post".into(), noop()]).unwrap();
		assert_eq!(call.request.operation, Operation::Post);
		assert!(call.request.data.is_none());
		assert!(call.on_load_finished.is_some());
	}

	#[test]
	fn test_method_and_data() {
		let call = OpenCall::parse("http://localhost/", vec!["post".into(), "a=1".into()]).unwrap();
		assert_eq!(call.request.data, Some(json!("a=1")));
		assert!(call.on_load_finished.is_none());

		let call = OpenCall::parse(
			"http://localhost/",
			vec!["put".into(), json!({ "k": [1, 2] }).into()],
		)
		.unwrap();
		assert_eq!(call.request.operation, Operation::Put);
		assert_eq!(call.request.data, Some(json!({ "k": [1, 2] })));
	}

	#[test]
	fn test_method_data_and_callback() {
		let call = OpenCall::parse(
			"http://localhost/",
			vec!["post".into(), "a=1".into(), noop()],
		)
		.unwrap();
		assert_eq!(call.request.operation, Operation::Post);
		assert_eq!(call.request.data, Some(json!("a=1")));
		assert!(call.on_load_finished.is_some());
	}

	#[test]
	fn test_method_text_is_passed_through() {
		let call = OpenCall::parse("http://localhost/", vec!["".into()]).unwrap();
		assert_eq!(call.request.operation, Operation::Other(String::new()));

		let call = OpenCall::parse("http://localhost/", vec!["PATCH".into(), noop()]).unwrap();
		assert_eq!(call.request.operation, Operation::Other("patch".to_string()));
	}

	#[test]
	fn test_too_many_arguments() {
		let err = OpenCall::parse(
			"http://localhost/",
			vec!["post".into(), "a".into(), noop(), noop()],
		)
		.unwrap_err();
		assert!(matches!(err, Error::InvalidUsage(_)));
	}

	#[test]
	fn test_wrong_kinds_are_rejected() {
		// Second argument neither method nor callback.
		assert!(OpenCall::parse("u", vec![json!(1).into()]).is_err());
		// Fourth argument not a callback.
		assert!(OpenCall::parse("u", vec!["get".into(), "d".into(), "x".into()]).is_err());
		// Method slot holding a callback with data after it.
		assert!(OpenCall::parse("u", vec![noop(), "d".into(), noop()]).is_err());
	}
}
