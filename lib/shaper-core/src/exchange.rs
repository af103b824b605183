//! Completed HTTP exchanges, as handed to a serializer.
//!
//! An [`Exchange`] is built once per completed call and consumed by value by
//! exactly one serializer.
//!
//! # Example
//!
//! ```
//! use shaper_core::Exchange;
//! use http::{Method, StatusCode};
//!
//! let method = Method::GET;
//! let body = br#"{"id":1}"#;
//! let exchange = Exchange::completed(&method, StatusCode::OK, body);
//! assert_eq!(exchange.status(), Some(StatusCode::OK));
//! assert!(!exchange.is_empty_payload());
//! ```

use http::{Method, StatusCode};

use crate::error::BoxError;

/// Outcome of one HTTP call: request method, response status, raw body and
/// transport error, each of them optional.
#[derive(Debug, Default)]
pub struct Exchange<'a> {
    method: Option<&'a Method>,
    status: Option<StatusCode>,
    data: Option<&'a [u8]>,
    error: Option<BoxError>,
}

impl<'a> Exchange<'a> {
    /// Creates an exchange from its raw parts.
    #[must_use]
    pub fn new(
        method: Option<&'a Method>,
        status: Option<StatusCode>,
        data: Option<&'a [u8]>,
        error: Option<BoxError>,
    ) -> Self {
        Self {
            method,
            status,
            data,
            error,
        }
    }

    /// A call that reached the server and got a response back.
    #[must_use]
    pub fn completed(method: &'a Method, status: StatusCode, data: &'a [u8]) -> Self {
        Self::new(Some(method), Some(status), Some(data), None)
    }

    /// A call that failed in the transport layer.
    #[must_use]
    pub fn failed(error: impl Into<BoxError>) -> Self {
        Self::new(None, None, None, Some(error.into()))
    }

    /// Sets the request method.
    #[must_use]
    pub fn with_method(mut self, method: &'a Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Sets the response status.
    #[must_use]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = Some(status);
        self
    }

    /// Request method.
    #[must_use]
    pub const fn method(&self) -> Option<&'a Method> {
        self.method
    }

    /// Response status.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        self.status
    }

    /// Raw response body.
    #[must_use]
    pub const fn data(&self) -> Option<&'a [u8]> {
        self.data
    }

    /// Transport error.
    #[must_use]
    pub fn error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        self.error.as_deref()
    }

    /// Body is absent or has zero length.
    #[must_use]
    pub fn is_empty_payload(&self) -> bool {
        self.data.is_none_or(<[u8]>::is_empty)
    }

    /// Consume into (method, status, data, error).
    #[must_use]
    pub fn into_parts(
        self,
    ) -> (
        Option<&'a Method>,
        Option<StatusCode>,
        Option<&'a [u8]>,
        Option<BoxError>,
    ) {
        (self.method, self.status, self.data, self.error)
    }
}
