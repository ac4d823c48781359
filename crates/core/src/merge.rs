//! Recursive options merge.
//!
//! Nested plain records are merged key by key; every other value (arrays,
//! strings, numbers, booleans, null) overwrites. Unset fields of typed
//! options never reach the merge because they are omitted on serialization.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use webpage_runtime::{Error, Result};

/// Types that can absorb a partial copy of themselves.
pub trait Mergeable {
	/// Merges `source` into `self`, recursing into nested records.
	fn merge_from(&mut self, source: &Self);
}

impl Mergeable for Value {
	fn merge_from(&mut self, source: &Self) {
		merge_into(self, source);
	}
}

/// Returns true if `value` is a record whose keys should be merged
/// individually rather than replaced as a whole.
pub fn is_plain_record(value: &Value) -> bool {
	value.is_object()
}

/// Merges `source` into `target` and returns `target`.
///
/// - `target` not a record: replaced by `source` wholesale.
/// - `source` not a record: has no keys, `target` is unchanged.
/// - both records: for each key, recurse when both sides are records,
///   otherwise overwrite.
pub fn merge_into<'a>(target: &'a mut Value, source: &Value) -> &'a mut Value {
	if !is_plain_record(target) {
		*target = source.clone();
		return target;
	}

	if let (Value::Object(target_map), Some(source_map)) = (&mut *target, source.as_object()) {
		for (key, value) in source_map {
			match target_map.get_mut(key) {
				Some(existing) if is_plain_record(existing) && is_plain_record(value) => {
					merge_into(existing, value);
				}
				_ => {
					target_map.insert(key.clone(), value.clone());
				}
			}
		}
	}

	target
}

/// Merges the serialized form of `overrides` over `base` and reads the
/// result back as `T`.
///
/// # Errors
///
/// [`Error::InvalidArgument`] if the merged value no longer fits `T`
/// (e.g. a string where a number is expected).
pub fn merge_options<T, O>(base: &T, overrides: &O) -> Result<T>
where
	T: Serialize + DeserializeOwned,
	O: Serialize + ?Sized,
{
	let mut merged = serde_json::to_value(base)?;
	let overrides = serde_json::to_value(overrides)?;
	merge_into(&mut merged, &overrides);
	serde_json::from_value(merged).map_err(|e| Error::InvalidArgument(format!("invalid options: {e}")))
}
