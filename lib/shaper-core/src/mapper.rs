//! Entry points of the mapping capability.
//!
//! [`Mapper`] turns an extracted JSON value into a [`Mappable`] or
//! [`ImmutableMappable`] value, a sequence of them, or populates an existing
//! value in place.

use serde_json::Value;

use crate::map::{ImmutableMappable, JsonObject, Map, MapContext, MapError, Mappable};

/// Maps JSON values onto typed values, with an optional [`MapContext`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Mapper<'a> {
    context: Option<&'a (dyn MapContext + 'static)>,
}

impl<'a> Mapper<'a> {
    /// Creates a mapper without context.
    #[must_use]
    pub const fn new() -> Self {
        Self { context: None }
    }

    /// Creates a mapper handing `context` to every mapping.
    #[must_use]
    pub const fn with_context(context: Option<&'a (dyn MapContext + 'static)>) -> Self {
        Self { context }
    }

    fn map_object(&self, object: &'a JsonObject) -> Map<'a> {
        Map::new(object, self.context)
    }

    fn build<T: Mappable>(&self, object: &'a JsonObject) -> Option<T> {
        let map = self.map_object(object);
        let mut value = T::init(&map)?;
        value.mapping(&map);
        Some(value)
    }

    /// Builds a `T` from a JSON object.
    ///
    /// Returns `None` if the JSON is absent, not an object, or if
    /// [`Mappable::init`] refuses it.
    #[must_use]
    pub fn map<T: Mappable>(&self, json: Option<&'a Value>) -> Option<T> {
        self.build(json?.as_object()?)
    }

    /// Populates an existing `T` from a JSON object.
    ///
    /// Returns `None`, leaving `target` untouched, if the JSON is absent or
    /// not an object.
    pub fn map_into<'t, T: Mappable>(
        &self,
        json: Option<&'a Value>,
        target: &'t mut T,
    ) -> Option<&'t mut T> {
        let map = self.map_object(json?.as_object()?);
        target.mapping(&map);
        Some(target)
    }

    /// Builds a sequence of `T` from a JSON array of objects.
    ///
    /// Returns `None` if the JSON is absent, not an array, or holds a
    /// non-object element. Elements refused by [`Mappable::init`] are skipped.
    #[must_use]
    pub fn map_array<T: Mappable>(&self, json: Option<&'a Value>) -> Option<Vec<T>> {
        let objects = json?
            .as_array()?
            .iter()
            .map(Value::as_object)
            .collect::<Option<Vec<_>>>()?;

        Some(
            objects
                .into_iter()
                .filter_map(|object| self.build(object))
                .collect(),
        )
    }

    /// Builds an immutable `T` from a JSON object.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::UnexpectedShape`] if the JSON is absent or not an
    /// object, or the error raised by [`ImmutableMappable::from_map`].
    pub fn map_immutable<T: ImmutableMappable>(
        &self,
        json: Option<&'a Value>,
    ) -> Result<T, MapError> {
        let object = json
            .and_then(Value::as_object)
            .ok_or_else(|| MapError::expected_object(json))?;
        T::from_map(&self.map_object(object))
    }

    /// Builds a sequence of immutable `T` from a JSON array of objects.
    ///
    /// # Errors
    ///
    /// Fails on the first element that is not an object or that
    /// [`ImmutableMappable::from_map`] rejects.
    pub fn map_immutable_array<T: ImmutableMappable>(
        &self,
        json: Option<&'a Value>,
    ) -> Result<Vec<T>, MapError> {
        json.and_then(Value::as_array)
            .ok_or_else(|| MapError::expected_array(json))?
            .iter()
            .map(|item| self.map_immutable(Some(item)))
            .collect()
    }
}
