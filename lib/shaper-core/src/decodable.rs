//! Serializer for plain `serde` types.
//!
//! Use it when the target type derives [`Deserialize`](serde::Deserialize)
//! and needs no custom mapping logic. Decoding errors carry the path of the
//! failing field.

use std::marker::PhantomData;

use serde::de::{DeserializeOwned, value::UnitDeserializer};
use tracing::debug;

use crate::{
    Error, Exchange, ResponseSerializer, Result, SerializerConfig, extract,
    serializer::{Payload, payload},
};

/// Serializes a response into any [`DeserializeOwned`] type.
///
/// An allowed empty response is decoded from unit, which works for `()`,
/// `Option<_>`, unit structs and [`Empty`](crate::Empty).
///
/// # Example
///
/// ```
/// use http::{Method, StatusCode};
/// use serde::Deserialize;
/// use shaper_core::{DecodableSerializer, Exchange, ResponseSerializer, SerializerConfig};
///
/// #[derive(Debug, Deserialize)]
/// struct Release {
///     tag: String,
/// }
///
/// let serializer = DecodableSerializer::<Release>::new(SerializerConfig::with_key_path("latest"));
/// let method = Method::GET;
/// let exchange = Exchange::completed(&method, StatusCode::OK, br#"{"latest":{"tag":"v1.0.0"}}"#);
///
/// let release = serializer.serialize(exchange).expect("release");
/// assert_eq!(release.tag, "v1.0.0");
/// ```
#[derive(Debug, Clone)]
pub struct DecodableSerializer<T> {
    config: SerializerConfig,
    _target: PhantomData<fn() -> T>,
}

impl<T> DecodableSerializer<T> {
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

impl<T> Default for DecodableSerializer<T> {
    fn default() -> Self {
        Self::new(SerializerConfig::default())
    }
}

impl<T: DeserializeOwned> ResponseSerializer for DecodableSerializer<T> {
    type Output = T;

    fn serialize(&self, exchange: Exchange<'_>) -> Result<T> {
        match payload(&self.config, exchange)? {
            Payload::Empty => empty_value().ok_or_else(Error::invalid_empty_response::<T>),
            Payload::Data(data) => decode(data, self.config.key_path()).map_err(|reason| {
                debug!(%reason, key_path = self.config.key_path(), "decoding failed");
                Error::decoding_failed(reason)
            }),
        }
    }
}

fn empty_value<T: DeserializeOwned>() -> Option<T> {
    T::deserialize(UnitDeserializer::<serde::de::value::Error>::new()).ok()
}

fn decode<T: DeserializeOwned>(data: &[u8], key_path: Option<&str>) -> std::result::Result<T, String> {
    let Some(key_path) = key_path else {
        let mut deserializer = serde_json::Deserializer::from_slice(data);
        let value = serde_path_to_error::deserialize(&mut deserializer).map_err(|error| error.to_string())?;
        deserializer.end().map_err(|error| error.to_string())?;
        return Ok(value);
    };

    let json = extract(data, Some(key_path)).ok_or_else(|| format!("no JSON value at key path '{key_path}'"))?;
    serde_path_to_error::deserialize(json).map_err(|error| {
        let path = error.path().to_string();
        match path.as_str() {
            "." => format!("{key_path}: {}", error.inner()),
            index if index.starts_with('[') => format!("{key_path}{index}: {}", error.inner()),
            nested => format!("{key_path}.{nested}: {}", error.inner()),
        }
    })
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};
    use http::{Method, StatusCode};
    use serde::Deserialize;

    use super::*;
    use crate::{Empty, ErrorCode};

    #[derive(Debug, PartialEq, Deserialize)]
    struct Release {
        tag: String,
        assets: Vec<Asset>,
    }

    #[derive(Debug, PartialEq, Deserialize)]
    struct Asset {
        size: u32,
    }

    #[test]
    fn decode_whole_document() {
        let serializer = DecodableSerializer::<Release>::default();
        let method = Method::GET;
        let exchange = Exchange::completed(&method, StatusCode::OK, br#"{"tag":"v1","assets":[{"size":3}]}"#);

        let_assert!(Ok(release) = serializer.serialize(exchange));
        check!(
            release
                == Release {
                    tag: "v1".to_owned(),
                    assets: vec![Asset { size: 3 }],
                }
        );
    }

    #[test]
    fn decode_at_key_path() {
        let serializer = DecodableSerializer::<Vec<Asset>>::new(SerializerConfig::with_key_path("release.assets"));
        let method = Method::GET;
        let body = br#"{"release":{"tag":"v1","assets":[{"size":3},{"size":5}]}}"#;
        let exchange = Exchange::completed(&method, StatusCode::OK, body);

        let_assert!(Ok(assets) = serializer.serialize(exchange));
        check!(assets == [Asset { size: 3 }, Asset { size: 5 }]);
    }

    #[test]
    fn decoding_error_reports_field_path() {
        let serializer = DecodableSerializer::<Release>::default();
        let method = Method::GET;
        let body = br#"{"tag":"v1","assets":[{"size":3},{"size":"big"}]}"#;
        let exchange = Exchange::completed(&method, StatusCode::OK, body);

        let err = serializer.serialize(exchange).expect_err("invalid size");
        check!(err.code() == Some(ErrorCode::DataSerializationFailed));
        let_assert!(Some(reason) = err.failure_reason());
        check!(reason.starts_with("assets[1].size: invalid type"));
    }

    #[test]
    fn decoding_error_at_key_path_reports_full_path() {
        let serializer = DecodableSerializer::<Release>::new(SerializerConfig::with_key_path("data"));
        let method = Method::GET;
        let exchange = Exchange::completed(&method, StatusCode::OK, br#"{"data":{"tag":1,"assets":[]}}"#);

        let err = serializer.serialize(exchange).expect_err("invalid tag");
        let_assert!(Some(reason) = err.failure_reason());
        check!(reason.starts_with("data.tag: invalid type"));
    }

    #[test]
    fn missing_key_path() {
        let serializer = DecodableSerializer::<Release>::new(SerializerConfig::with_key_path("data"));
        let method = Method::GET;
        let exchange = Exchange::completed(&method, StatusCode::OK, br#"{"tag":"v1"}"#);

        let err = serializer.serialize(exchange).expect_err("no data");
        check!(err.failure_reason() == Some("no JSON value at key path 'data'"));
    }

    #[test]
    fn trailing_characters_are_rejected() {
        let serializer = DecodableSerializer::<u32>::default();
        let method = Method::GET;
        let exchange = Exchange::completed(&method, StatusCode::OK, b"1 2");

        check!(serializer.serialize(exchange).is_err_and(|err| err.is_decoding_failed()));
    }

    #[test]
    fn empty_response_decoded_from_unit() {
        let method = Method::DELETE;

        let exchange = Exchange::completed(&method, StatusCode::NO_CONTENT, b"");
        check!(DecodableSerializer::<Empty>::default().serialize(exchange).ok() == Some(Empty));

        let exchange = Exchange::completed(&method, StatusCode::NO_CONTENT, b"");
        check!(DecodableSerializer::<()>::default().serialize(exchange).is_ok());

        let exchange = Exchange::completed(&method, StatusCode::NO_CONTENT, b"");
        let_assert!(Ok(None) = DecodableSerializer::<Option<Release>>::default().serialize(exchange));
    }

    #[test]
    fn empty_response_without_empty_value() {
        let serializer = DecodableSerializer::<Release>::default();
        let method = Method::DELETE;
        let exchange = Exchange::completed(&method, StatusCode::NO_CONTENT, b"");

        let_assert!(Err(Error::InvalidEmptyResponse { .. }) = serializer.serialize(exchange));
    }

    #[test]
    fn disallowed_empty_response_and_transport_error() {
        let serializer = DecodableSerializer::<Empty>::default();
        let method = Method::GET;
        let exchange = Exchange::completed(&method, StatusCode::OK, b"");
        check!(serializer.serialize(exchange).is_err_and(|err| err.is_no_data()));

        let exchange = Exchange::failed("dns error");
        check!(serializer.serialize(exchange).is_err_and(|err| err.is_transport()));
    }
}
