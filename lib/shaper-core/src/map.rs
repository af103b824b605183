//! Mapping capability: how a JSON object becomes a typed value.
//!
//! Target types implement one of two traits:
//!
//! - [`Mappable`] for types that can be populated in place (an `init` step
//!   followed by a `mapping` step, the latter also usable on an existing value),
//! - [`ImmutableMappable`] for construct-only types.
//!
//! Both receive a [`Map`], a read-only view over the JSON object with an
//! optional caller-supplied [`MapContext`].
//!
//! # Example
//!
//! ```
//! use shaper_core::{ImmutableMappable, Map, MapError, Mappable};
//!
//! #[derive(Debug, Default)]
//! struct User {
//!     id: u64,
//!     name: String,
//! }
//!
//! impl Mappable for User {
//!     fn init(map: &Map<'_>) -> Option<Self> {
//!         map.contains("id").then(Self::default)
//!     }
//!
//!     fn mapping(&mut self, map: &Map<'_>) {
//!         map.update("id", &mut self.id);
//!         map.update("name", &mut self.name);
//!     }
//! }
//!
//! #[derive(Debug)]
//! struct Team {
//!     name: String,
//!     lead: String,
//! }
//!
//! impl ImmutableMappable for Team {
//!     fn from_map(map: &Map<'_>) -> Result<Self, MapError> {
//!         Ok(Self {
//!             name: map.value("name")?,
//!             lead: map.value("lead.name")?,
//!         })
//!     }
//! }
//! ```

use std::any::Any;

use derive_more::{Display, Error};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// A JSON object.
pub type JsonObject = serde_json::Map<String, Value>;

// ============================================================================
// Context
// ============================================================================

/// Opaque side-channel value handed to the mapping capability.
///
/// The serializers never look into it. Implemented for every
/// `Debug + Send + Sync + 'static` type; recover the concrete type with
/// [`Map::context`].
pub trait MapContext: Any + std::fmt::Debug + Send + Sync {}

impl<T: Any + std::fmt::Debug + Send + Sync> MapContext for T {}

// ============================================================================
// Map Error
// ============================================================================

/// Error raised by the mapping capability.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum MapError {
    /// No value at the given key.
    #[display("missing key '{_0}'")]
    MissingKey(#[error(not(source))] String),

    /// The value at the given key has the wrong shape.
    #[display("invalid value at '{key}': {message}")]
    InvalidValue {
        /// Key (and nested path) of the invalid value.
        key: String,
        /// Deserialization message.
        message: String,
    },

    /// The JSON is not the expected kind of value.
    #[display("expected {expected}, found {found}")]
    UnexpectedShape {
        /// Expected kind of JSON value.
        expected: &'static str,
        /// Actual kind of JSON value.
        found: &'static str,
    },

    /// Custom error raised by a mapping implementation.
    #[display("{_0}")]
    Custom(#[error(not(source))] String),
}

impl MapError {
    /// Create a custom mapping error.
    #[must_use]
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom(message.into())
    }

    /// The JSON was expected to be an object.
    #[must_use]
    pub fn expected_object(found: Option<&Value>) -> Self {
        Self::UnexpectedShape {
            expected: "an object",
            found: json_kind(found),
        }
    }

    /// The JSON was expected to be an array.
    #[must_use]
    pub fn expected_array(found: Option<&Value>) -> Self {
        Self::UnexpectedShape {
            expected: "an array",
            found: json_kind(found),
        }
    }
}

fn json_kind(value: Option<&Value>) -> &'static str {
    match value {
        None => "nothing",
        Some(Value::Null) => "null",
        Some(Value::Bool(_)) => "a boolean",
        Some(Value::Number(_)) => "a number",
        Some(Value::String(_)) => "a string",
        Some(Value::Array(_)) => "an array",
        Some(Value::Object(_)) => "an object",
    }
}

// ============================================================================
// Map
// ============================================================================

/// Read-only view over a JSON object, passed to mapping implementations.
///
/// Keys may be nested with `.` (e.g. `"owner.login"`); a numeric segment
/// indexes into an array (e.g. `"labels.0.name"`). A literal member whose
/// name contains dots takes precedence over the nested lookup.
#[derive(Debug, Clone, Copy)]
pub struct Map<'a> {
    json: &'a JsonObject,
    context: Option<&'a (dyn MapContext + 'static)>,
}

impl<'a> Map<'a> {
    /// Creates a map over a JSON object.
    #[must_use]
    pub fn new(json: &'a JsonObject, context: Option<&'a (dyn MapContext + 'static)>) -> Self {
        Self { json, context }
    }

    /// The underlying JSON object.
    #[must_use]
    pub const fn json(&self) -> &'a JsonObject {
        self.json
    }

    /// The mapping context, if it is a `C`.
    #[must_use]
    pub fn context<C: MapContext>(&self) -> Option<&'a C> {
        let context: &'a dyn Any = self.context?;
        context.downcast_ref::<C>()
    }

    /// Raw JSON value at a (possibly nested) key.
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<&'a Value> {
        if let Some(value) = self.json.get(key) {
            return Some(value);
        }

        let mut segments = key.split('.');
        let first = self.json.get(segments.next()?)?;
        segments.try_fold(first, |current, segment| match current {
            Value::Object(object) => object.get(segment),
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?),
            _ => None,
        })
    }

    /// Returns `true` if a value exists at the key (`null` included).
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.raw(key).is_some()
    }

    /// Deserialize the value at the key.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::MissingKey`] if there is no value, or
    /// [`MapError::InvalidValue`] with the nested path if it cannot be
    /// deserialized into `V`.
    pub fn value<V: DeserializeOwned>(&self, key: &str) -> Result<V, MapError> {
        let raw = self
            .raw(key)
            .ok_or_else(|| MapError::MissingKey(key.to_owned()))?;

        serde_path_to_error::deserialize(raw).map_err(|error| {
            let path = error.path().to_string();
            let key = match path.as_str() {
                "." => key.to_owned(),
                index if index.starts_with('[') => format!("{key}{index}"),
                nested => format!("{key}.{nested}"),
            };
            MapError::InvalidValue {
                key,
                message: error.inner().to_string(),
            }
        })
    }

    /// Deserialize the value at the key, `None` if missing, `null` or invalid.
    #[must_use]
    pub fn optional<V: DeserializeOwned>(&self, key: &str) -> Option<V> {
        match self.raw(key)? {
            Value::Null => None,
            _ => self.value(key).ok(),
        }
    }

    /// Overwrite `target` with the value at the key, if present and valid.
    ///
    /// Returns `true` if `target` was updated.
    pub fn update<V: DeserializeOwned>(&self, key: &str, target: &mut V) -> bool {
        match self.optional(key) {
            Some(value) => {
                *target = value;
                true
            }
            None => false,
        }
    }
}

// ============================================================================
// Capability Traits
// ============================================================================

/// A type that can be built from, and populated in place by, a JSON object.
pub trait Mappable: Sized {
    /// Creates a fresh value, or `None` if the JSON cannot describe one.
    ///
    /// [`Mappable::mapping`] is called on the returned value afterwards.
    fn init(map: &Map<'_>) -> Option<Self>;

    /// Populates `self` from the JSON object.
    fn mapping(&mut self, map: &Map<'_>);

    /// The value standing for an allowed empty response, if the type has one.
    #[must_use]
    fn empty_response() -> Option<Self> {
        None
    }
}

/// A construct-only type built from a JSON object.
pub trait ImmutableMappable: Sized {
    /// Builds a value from the JSON object.
    ///
    /// # Errors
    ///
    /// Returns a [`MapError`] if the JSON does not describe a valid value.
    fn from_map(map: &Map<'_>) -> Result<Self, MapError>;

    /// The value standing for an allowed empty response, if the type has one.
    #[must_use]
    fn empty_response() -> Option<Self> {
        None
    }
}

/// Empty response sentinel.
///
/// Use it as the target type of requests expected to come back without a body
/// (e.g. `204 No Content` or `HEAD`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Deserialize)]
pub struct Empty;

impl Mappable for Empty {
    fn init(_map: &Map<'_>) -> Option<Self> {
        Some(Self)
    }

    fn mapping(&mut self, _map: &Map<'_>) {}

    fn empty_response() -> Option<Self> {
        Some(Self)
    }
}

impl ImmutableMappable for Empty {
    fn from_map(_map: &Map<'_>) -> Result<Self, MapError> {
        Ok(Self)
    }

    fn empty_response() -> Option<Self> {
        Some(Self)
    }
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};
    use insta::assert_snapshot;
    use serde_json::json;

    use super::*;

    fn object(value: Value) -> JsonObject {
        let_assert!(Value::Object(object) = value);
        object
    }

    #[derive(Debug, PartialEq)]
    struct Tenant(&'static str);

    #[test]
    fn map_value() {
        let json = object(json!({"id": 7, "name": "alice"}));
        let map = Map::new(&json, None);

        check!(map.value::<u64>("id") == Ok(7));
        check!(map.value::<String>("name") == Ok("alice".to_owned()));
    }

    #[test]
    fn map_nested_value() {
        let json = object(json!({
            "owner": {"login": "octocat"},
            "labels": [{"name": "bug"}, {"name": "help"}]
        }));
        let map = Map::new(&json, None);

        check!(map.value::<String>("owner.login") == Ok("octocat".to_owned()));
        check!(map.value::<String>("labels.1.name") == Ok("help".to_owned()));
        check!(map.raw("labels.2.name").is_none());
        check!(map.raw("owner.login.first").is_none());
    }

    #[test]
    fn literal_dotted_key_wins() {
        let json = object(json!({"a.b": 1, "a": {"b": 2}}));
        let map = Map::new(&json, None);

        check!(map.value::<u8>("a.b") == Ok(1));
    }

    #[test]
    fn map_missing_key() {
        let json = object(json!({"id": 7}));
        let map = Map::new(&json, None);

        let err = map.value::<String>("name").expect_err("missing");
        check!(err == MapError::MissingKey("name".to_owned()));
        check!(!map.contains("name"));
    }

    #[test]
    fn map_invalid_value_reports_path() {
        let json = object(json!({"owner": {"ids": [1, "two"]}}));
        let map = Map::new(&json, None);

        let err = map.value::<Vec<u32>>("owner.ids").expect_err("invalid");
        let_assert!(MapError::InvalidValue { key, .. } = err);
        check!(key == "owner.ids[1]");

        let err = map.value::<u32>("owner").expect_err("invalid");
        let_assert!(MapError::InvalidValue { key, .. } = err);
        check!(key == "owner");
    }

    #[test]
    fn map_optional_and_update() {
        let json = object(json!({"id": 7, "nick": null, "age": "old"}));
        let map = Map::new(&json, None);

        check!(map.optional::<u64>("id") == Some(7));
        check!(map.optional::<String>("nick").is_none());
        check!(map.optional::<u8>("age").is_none());
        check!(map.optional::<u8>("missing").is_none());
        check!(map.contains("nick"));

        let mut id = 0_u64;
        check!(map.update("id", &mut id));
        check!(id == 7);

        let mut age = 42_u8;
        check!(!map.update("age", &mut age));
        check!(age == 42);
    }

    #[test]
    fn map_context() {
        let json = object(json!({}));
        let tenant = Tenant("acme");
        let map = Map::new(&json, Some(&tenant));

        check!(map.context::<Tenant>() == Some(&Tenant("acme")));
        check!(map.context::<String>().is_none());
        check!(Map::new(&json, None).context::<Tenant>().is_none());
    }

    #[test]
    fn map_error_display() {
        assert_snapshot!(MapError::MissingKey("id".to_owned()), @"missing key 'id'");
        assert_snapshot!(
            MapError::expected_object(Some(&json!([1]))),
            @"expected an object, found an array"
        );
        assert_snapshot!(MapError::expected_array(None), @"expected an array, found nothing");
        assert_snapshot!(MapError::custom("negative id"), @"negative id");
    }

    #[test]
    fn empty_sentinel() {
        let json = object(json!({"ignored": true}));
        let map = Map::new(&json, None);

        check!(<Empty as Mappable>::empty_response() == Some(Empty));
        check!(<Empty as ImmutableMappable>::empty_response() == Some(Empty));
        check!(<Empty as Mappable>::init(&map) == Some(Empty));
        check!(Empty::from_map(&map) == Ok(Empty));
    }
}
