//! Array serializers: one JSON array of objects to a sequence of values.
//!
//! An allowed empty response yields an empty sequence.

use std::marker::PhantomData;

use tracing::debug;

use crate::{
    Error, Exchange, ResponseSerializer, Result, SerializerConfig, extract,
    map::{ImmutableMappable, Mappable},
    serializer::{Payload, payload},
};

/// Serializes a response into a sequence of [`Mappable`] values.
///
/// Array elements refused by [`Mappable::init`] are skipped; any element that
/// is not a JSON object fails the whole response.
#[derive(Debug, Clone)]
pub struct ArraySerializer<T> {
    config: SerializerConfig,
    _target: PhantomData<fn() -> T>,
}

impl<T> ArraySerializer<T> {
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

impl<T> Default for ArraySerializer<T> {
    fn default() -> Self {
        Self::new(SerializerConfig::default())
    }
}

impl<T: Mappable> ResponseSerializer for ArraySerializer<T> {
    type Output = Vec<T>;

    fn serialize(&self, exchange: Exchange<'_>) -> Result<Vec<T>> {
        match payload(&self.config, exchange)? {
            Payload::Empty => Ok(Vec::new()),
            Payload::Data(data) => {
                let json = extract(data, self.config.key_path());
                self.config.mapper().map_array(json.as_ref()).ok_or_else(|| {
                    debug!(key_path = self.config.key_path(), "array mapping failed");
                    Error::mapping_failed()
                })
            }
        }
    }
}

/// Serializes a response into a sequence of [`ImmutableMappable`] values.
///
/// The first element rejected by [`ImmutableMappable::from_map`] fails the
/// whole response.
#[derive(Debug, Clone)]
pub struct ImmutableArraySerializer<T> {
    config: SerializerConfig,
    _target: PhantomData<fn() -> T>,
}

impl<T> ImmutableArraySerializer<T> {
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

impl<T> Default for ImmutableArraySerializer<T> {
    fn default() -> Self {
        Self::new(SerializerConfig::default())
    }
}

impl<T: ImmutableMappable> ResponseSerializer for ImmutableArraySerializer<T> {
    type Output = Vec<T>;

    fn serialize(&self, exchange: Exchange<'_>) -> Result<Vec<T>> {
        match payload(&self.config, exchange)? {
            Payload::Empty => Ok(Vec::new()),
            Payload::Data(data) => {
                let json = extract(data, self.config.key_path());
                self.config
                    .mapper()
                    .map_immutable_array(json.as_ref())
                    .map_err(|error| {
                        debug!(%error, key_path = self.config.key_path(), "array mapping failed");
                        Error::mapping_failed()
                    })
            }
        }
    }
}
