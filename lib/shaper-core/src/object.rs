//! Object serializers: one JSON object to one value.

use std::marker::PhantomData;

use tracing::debug;

use crate::{
    Error, Exchange, ResponseSerializer, Result, SerializerConfig, extract,
    map::{ImmutableMappable, Mappable},
    serializer::{Payload, payload},
};

// ============================================================================
// Mappable
// ============================================================================

/// Serializes a response into a [`Mappable`] value.
///
/// # Example
///
/// ```
/// use http::{Method, StatusCode};
/// use shaper_core::{Exchange, Map, Mappable, ObjectSerializer, ResponseSerializer, SerializerConfig};
///
/// #[derive(Debug, Default)]
/// struct User {
///     id: u64,
/// }
///
/// impl Mappable for User {
///     fn init(_map: &Map<'_>) -> Option<Self> {
///         Some(Self::default())
///     }
///
///     fn mapping(&mut self, map: &Map<'_>) {
///         map.update("id", &mut self.id);
///     }
/// }
///
/// let serializer = ObjectSerializer::<User>::new(SerializerConfig::with_key_path("user"));
/// let method = Method::GET;
/// let exchange = Exchange::completed(&method, StatusCode::OK, br#"{"user":{"id":1}}"#);
///
/// let user = serializer.serialize(exchange).expect("user");
/// assert_eq!(user.id, 1);
/// ```
#[derive(Debug, Clone)]
pub struct ObjectSerializer<T> {
    config: SerializerConfig,
    _target: PhantomData<fn() -> T>,
}

impl<T> ObjectSerializer<T> {
    /// Creates a serializer.
    #[must_use]
    pub const fn new(config: SerializerConfig) -> Self {
        Self {
            config,
            _target: PhantomData,
        }
    }

    /// The serializer configuration.
    #[must_use]
    pub const fn config(&self) -> &SerializerConfig {
        &self.config
    }
}

impl<T> Default for ObjectSerializer<T> {
    fn default() -> Self {
        Self::new(SerializerConfig::default())
    }
}

impl<T: Mappable> ObjectSerializer<T> {
    /// Populates an existing value from the response, instead of creating a
    /// new one.
    ///
    /// On an allowed empty response, `target` is returned untouched if `T`
    /// has an empty value.
    ///
    /// # Errors
    ///
    /// Same as [`ResponseSerializer::serialize`]. `target` is left untouched
    /// on error.
    pub fn serialize_into<'t>(&self, exchange: Exchange<'_>, target: &'t mut T) -> Result<&'t mut T> {
        match payload(&self.config, exchange)? {
            Payload::Empty => match T::empty_response() {
                Some(_) => Ok(target),
                None => Err(Error::invalid_empty_response::<T>()),
            },
            Payload::Data(data) => {
                let json = extract(data, self.config.key_path());
                self.config
                    .mapper()
                    .map_into(json.as_ref(), target)
                    .ok_or_else(|| {
                        debug!(key_path = self.config.key_path(), "mapping into target failed");
                        Error::mapping_failed()
                    })
            }
        }
    }
}

impl<T: Mappable> ResponseSerializer for ObjectSerializer<T> {
    type Output = T;

    fn serialize(&self, exchange: Exchange<'_>) -> Result<T> {
        match payload(&self.config, exchange)? {
            Payload::Empty => T::empty_response().ok_or_else(Error::invalid_empty_response::<T>),
            Payload::Data(data) => {
                let json = extract(data, self.config.key_path());
                self.config.mapper().map(json.as_ref()).ok_or_else(|| {
                    debug!(key_path = self.config.key_path(), "object mapping failed");
                    Error::mapping_failed()
                })
            }
        }
    }
}

// ============================================================================
// Immutable Mappable
// ============================================================================

/// Serializes a response into an [`ImmutableMappable`] value.
#[derive(Debug, Clone)]
pub struct ImmutableObjectSerializer<T> {
    config: SerializerConfig,
    _target: PhantomData<fn() -> T>,
}

impl<T> ImmutableObjectSerializer<T> {
    /// Creates a serializer.
    #[must_use]
    pub const fn new(config: SerializerConfig) -> Self {
        Self {
            config,
            _target: PhantomData,
        }
    }

    /// The serializer configuration.
    #[must_use]
    pub const fn config(&self) -> &SerializerConfig {
        &self.config
    }
}

impl<T> Default for ImmutableObjectSerializer<T> {
    fn default() -> Self {
        Self::new(SerializerConfig::default())
    }
}

impl<T: ImmutableMappable> ResponseSerializer for ImmutableObjectSerializer<T> {
    type Output = T;

    fn serialize(&self, exchange: Exchange<'_>) -> Result<T> {
        match payload(&self.config, exchange)? {
            Payload::Empty => T::empty_response().ok_or_else(Error::invalid_empty_response::<T>),
            Payload::Data(data) => {
                let json = extract(data, self.config.key_path());
                self.config
                    .mapper()
                    .map_immutable(json.as_ref())
                    .map_err(|error| {
                        debug!(%error, key_path = self.config.key_path(), "object mapping failed");
                        Error::mapping_failed()
                    })
            }
        }
    }
}
