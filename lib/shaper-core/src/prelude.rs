//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and traits
//! for easy glob importing:
//!
//! ```
//! use shaper_core::prelude::*;
//! ```

pub use crate::{
    ArraySerializer, DecodableSerializer, Empty, Error, Exchange, ImmutableArraySerializer,
    ImmutableMappable, ImmutableObjectSerializer, Map, MapError, Mappable, ObjectSerializer,
    ResponseSerializer, Result, SerializerConfig,
};
