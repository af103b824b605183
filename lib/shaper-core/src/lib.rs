//! Core response serializers for shaper.
//!
//! This crate turns a completed HTTP exchange into a typed value:
//! - [`Exchange`] - Method, status, raw body and transport error of one call
//! - [`extract`] - JSON parsing with optional dotted key paths
//! - [`EmptyResponsePolicy`] - When an empty body is a normal outcome
//! - [`Mappable`] and [`ImmutableMappable`] - How target types read JSON
//! - [`ObjectSerializer`], [`ArraySerializer`] and their immutable variants
//! - [`DecodableSerializer`] - Plain `serde` targets
//! - [`Error`] and [`Result`] - Error handling, with stable [`ErrorCode`]s
//!
//! It performs no I/O; see the `shaper` crate for the HTTP client layer.

mod array;
mod decodable;
mod error;
mod exchange;
mod extract;
mod map;
mod mapper;
mod object;
mod policy;
pub mod prelude;
mod serializer;

pub use array::{ArraySerializer, ImmutableArraySerializer};
pub use decodable::DecodableSerializer;
pub use error::{
    BoxError, ClassifiedError, Error, ErrorCode, MAPPING_FAILED_REASON, NO_DATA_REASON, Result,
    check_response,
};
pub use exchange::Exchange;
pub use extract::{extract, value_at_key_path};
pub use map::{Empty, ImmutableMappable, JsonObject, Map, MapContext, MapError, Mappable};
pub use mapper::Mapper;
pub use object::{ImmutableObjectSerializer, ObjectSerializer};
pub use policy::{
    DEFAULT_EMPTY_REQUEST_METHODS, DEFAULT_EMPTY_RESPONSE_CODES, EmptyResponsePolicy,
    is_empty_allowed,
};
pub use serializer::{ResponseSerializer, SerializerConfig, SerializerConfigBuilder};

// Re-export http crate types used in exchanges
pub use http::{Method, StatusCode};
