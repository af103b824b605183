//! Typed object and array mapping for HTTP responses.
//!
//! `shaper` runs a response serializer from [`shaper_core`] on every response
//! of a `tower` HTTP service:
//!
//! - [`MappingClient`] - Executes requests and serializes the responses
//! - [`DataResponse`] - Request, raw response and serializer result together
//!
//! # Example
//!
//! ```ignore
//! use shaper::prelude::*;
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
//! let client = MappingClient::http();
//! let request = http::Request::get("http://localhost:8080/users").body(Default::default())?;
//! let users: Vec<User> = client
//!     .response_array(request, SerializerConfig::with_key_path("data"))
//!     .await
//!     .into_result()?;
//! ```

mod client;
pub mod prelude;
mod response;

pub use client::{HyperService, MappingClient};
pub use response::DataResponse;

// Re-export tower for service composition
pub use tower;

// Re-export core types
pub use shaper_core::{
    ArraySerializer, BoxError, ClassifiedError, DecodableSerializer, Empty, EmptyResponsePolicy,
    Error, ErrorCode, Exchange, ImmutableArraySerializer, ImmutableMappable,
    ImmutableObjectSerializer, JsonObject, Map, MapContext, MapError, Mappable, Mapper,
    ObjectSerializer, ResponseSerializer, Result, SerializerConfig, SerializerConfigBuilder,
    check_response, extract, value_at_key_path,
};

// Re-export http types for methods and status codes
pub use shaper_core::{Method, StatusCode};
