//! Response serializer contract and configuration.
//!
//! A [`ResponseSerializer`] turns one completed [`Exchange`] into a typed
//! value. All serializers share the same control flow:
//!
//! 1. a transport error is returned as-is,
//! 2. an absent or empty body is checked against the [`EmptyResponsePolicy`],
//! 3. a non-empty body is extracted (honouring the key path) and mapped.
//!
//! Steps 1 and 2 live here; step 3 is each serializer's own business.

use std::sync::Arc;

use http::Method;
use tracing::{debug, trace};

use crate::{EmptyResponsePolicy, Error, Exchange, Mapper, Result, map::MapContext};

/// Turns a completed exchange into a typed value.
pub trait ResponseSerializer: Send + Sync {
    /// The produced value.
    type Output;

    /// Serialize one exchange.
    ///
    /// # Errors
    ///
    /// Returns the transport error unchanged if the exchange failed, or a
    /// classified [`Error`] if the body cannot be turned into the output.
    fn serialize(&self, exchange: Exchange<'_>) -> Result<Self::Output>;
}

// ============================================================================
// Configuration
// ============================================================================

/// Configuration shared by every serializer.
#[derive(Debug, Clone, Default)]
pub struct SerializerConfig {
    key_path: Option<String>,
    context: Option<Arc<dyn MapContext>>,
    empty_policy: EmptyResponsePolicy,
}

impl SerializerConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> SerializerConfigBuilder {
        SerializerConfigBuilder::default()
    }

    /// Default configuration scoped to a key path.
    #[must_use]
    pub fn with_key_path(key_path: impl Into<String>) -> Self {
        Self::builder().key_path(key_path).build()
    }

    /// Key path of the mapped value, `None` for the whole document.
    #[must_use]
    pub fn key_path(&self) -> Option<&str> {
        self.key_path.as_deref()
    }

    /// Mapping context.
    #[must_use]
    pub fn context(&self) -> Option<&(dyn MapContext + 'static)> {
        self.context.as_deref()
    }

    /// Empty-response policy.
    #[must_use]
    pub const fn empty_policy(&self) -> &EmptyResponsePolicy {
        &self.empty_policy
    }

    /// A [`Mapper`] carrying this configuration's context.
    #[must_use]
    pub fn mapper(&self) -> Mapper<'_> {
        Mapper::with_context(self.context())
    }
}

/// Builder for [`SerializerConfig`].
#[derive(Debug, Clone, Default)]
pub struct SerializerConfigBuilder {
    key_path: Option<String>,
    context: Option<Arc<dyn MapContext>>,
    empty_response_codes: Option<Vec<u16>>,
    empty_request_methods: Option<Vec<Method>>,
}

impl SerializerConfigBuilder {
    /// Set the key path of the mapped value. An empty path maps the whole
    /// document.
    #[must_use]
    pub fn key_path(mut self, key_path: impl Into<String>) -> Self {
        self.key_path = Some(key_path.into());
        self
    }

    /// Set the mapping context.
    #[must_use]
    pub fn context(mut self, context: impl MapContext) -> Self {
        self.context = Some(Arc::new(context));
        self
    }

    /// Set an already shared mapping context.
    #[must_use]
    pub fn shared_context(mut self, context: Arc<dyn MapContext>) -> Self {
        self.context = Some(context);
        self
    }

    /// Set the status codes for which an empty body is allowed.
    ///
    /// Defaults to `[204, 205]`.
    #[must_use]
    pub fn empty_response_codes(mut self, codes: impl IntoIterator<Item = u16>) -> Self {
        self.empty_response_codes = Some(codes.into_iter().collect());
        self
    }

    /// Set the request methods for which an empty body is allowed.
    ///
    /// Defaults to `[HEAD]`.
    #[must_use]
    pub fn empty_request_methods(mut self, methods: impl IntoIterator<Item = Method>) -> Self {
        self.empty_request_methods = Some(methods.into_iter().collect());
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> SerializerConfig {
        let defaults = EmptyResponsePolicy::default();
        let codes = self
            .empty_response_codes
            .map_or_else(|| defaults.codes().clone(), |codes| codes.into_iter().collect());
        let methods = self
            .empty_request_methods
            .map_or_else(|| defaults.methods().clone(), |methods| methods.into_iter().collect());

        SerializerConfig {
            key_path: self.key_path.filter(|path| !path.is_empty()),
            context: self.context,
            empty_policy: EmptyResponsePolicy::new(codes, methods),
        }
    }
}

// ============================================================================
// Shared Control Flow
// ============================================================================

/// What is left to do once transport errors and empty bodies are handled.
#[derive(Debug)]
pub(crate) enum Payload<'a> {
    /// The body is empty and the policy allows it.
    Empty,
    /// A non-empty body to extract and map.
    Data(&'a [u8]),
}

/// Forward transport errors and apply the empty-response policy.
pub(crate) fn payload<'a>(config: &SerializerConfig, exchange: Exchange<'a>) -> Result<Payload<'a>> {
    let (method, status, data, error) = exchange.into_parts();

    if let Some(error) = error {
        trace!(%error, "forwarding transport error");
        return Err(Error::Transport(error));
    }

    match data {
        Some(data) if !data.is_empty() => Ok(Payload::Data(data)),
        _ if config.empty_policy().allows(method, status) => {
            debug!(?method, ?status, "empty response allowed");
            Ok(Payload::Empty)
        }
        _ => {
            debug!(?method, ?status, "empty response not allowed");
            Err(Error::InputDataNilOrZeroLength)
        }
    }
}
