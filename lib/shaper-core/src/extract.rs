//! JSON extraction with optional key paths.
//!
//! A key path is a dot-delimited list of object member names, e.g.
//! `"data.user"`. An empty key path is the same as no key path.

use serde_json::Value;
use tracing::trace;

/// Parse raw bytes as JSON and, if a key path is given, return the nested
/// value at that path.
///
/// Any top-level JSON value is accepted, including fragments such as `42` or
/// `"text"`. A parse failure yields `None`, exactly like a missing key.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use shaper_core::extract;
///
/// let body = br#"{"data":{"user":{"id":1}}}"#;
/// assert_eq!(extract(body, Some("data.user")), Some(json!({"id": 1})));
/// assert_eq!(extract(body, Some("data.team")), None);
/// assert_eq!(extract(b"not json", None), None);
/// ```
#[must_use]
pub fn extract(data: &[u8], key_path: Option<&str>) -> Option<Value> {
    let document = match serde_json::from_slice::<Value>(data) {
        Ok(document) => document,
        Err(error) => {
            trace!(%error, "response body is not JSON");
            return None;
        }
    };

    match key_path.filter(|path| !path.is_empty()) {
        None => Some(document),
        Some(path) => {
            let value = value_at_key_path(&document, path).cloned();
            if value.is_none() {
                trace!(key_path = path, "no JSON value at key path");
            }
            value
        }
    }
}

/// Navigate a dotted key path inside a JSON value.
///
/// Returns `None` if a segment is missing or if an intermediate value is not
/// an object.
#[must_use]
pub fn value_at_key_path<'v>(value: &'v Value, key_path: &str) -> Option<&'v Value> {
    key_path
        .split('.')
        .try_fold(value, |current, segment| current.as_object()?.get(segment))
}

#[cfg(test)]
mod tests {
    use assert2::check;
    use serde_json::json;

    use super::*;

    const USER: &[u8] = br#"{"user":{"id":1,"name":"a","team":{"name":"core"}}}"#;

    #[test]
    fn extract_without_key_path() {
        check!(extract(USER, None) == Some(json!({"user": {"id": 1, "name": "a", "team": {"name": "core"}}})));
    }

    #[test]
    fn empty_key_path_is_no_key_path() {
        check!(extract(USER, Some("")) == extract(USER, None));
    }

    #[test]
    fn extract_nested_value() {
        check!(extract(USER, Some("user")) == Some(json!({"id": 1, "name": "a", "team": {"name": "core"}})));
        check!(extract(USER, Some("user.team")) == Some(json!({"name": "core"})));
        check!(extract(USER, Some("user.team.name")) == Some(json!("core")));
    }

    #[test]
    fn extract_missing_segment() {
        check!(extract(USER, Some("account")).is_none());
        check!(extract(USER, Some("user.address")).is_none());
        check!(extract(USER, Some("user.name.first")).is_none());
    }

    #[test]
    fn arrays_are_not_navigable() {
        let body = br#"{"users":[{"id":1}]}"#;
        check!(extract(body, Some("users.0")).is_none());
        check!(extract(body, Some("users")) == Some(json!([{"id": 1}])));
    }

    #[test]
    fn extract_fragments() {
        check!(extract(b"42", None) == Some(json!(42)));
        check!(extract(br#""text""#, None) == Some(json!("text")));
        check!(extract(b"null", None) == Some(Value::Null));
        check!(extract(b"42", Some("id")).is_none());
    }

    #[test]
    fn extract_null_member() {
        check!(extract(br#"{"user":null}"#, Some("user")) == Some(Value::Null));
    }

    #[test]
    fn malformed_json_is_none() {
        check!(extract(b"{\"user\":", None).is_none());
        check!(extract(b"<html></html>", Some("user")).is_none());
    }
}
