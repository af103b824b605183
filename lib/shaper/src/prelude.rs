//! Prelude module for convenient imports.
//!
//! ```ignore
//! use shaper::prelude::*;
//! ```

pub use crate::{
    DataResponse, Empty, Error, ImmutableMappable, Map, MapError, Mappable, MappingClient,
    ResponseSerializer, Result, SerializerConfig,
};
