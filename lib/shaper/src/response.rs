//! Serialized HTTP responses.
//!
//! [`DataResponse`] keeps the request, the raw response and the serializer
//! result together, so a failed mapping can still be inspected.

use bytes::Bytes;
use http::{HeaderMap, Method, StatusCode, Uri, response::Parts};
use shaper_core::{Error, Result};

/// Outcome of one mapped HTTP call.
#[derive(Debug)]
pub struct DataResponse<T> {
    method: Method,
    uri: Uri,
    parts: Option<Parts>,
    data: Option<Bytes>,
    result: Result<T>,
}

impl<T> DataResponse<T> {
    /// Creates a response.
    ///
    /// `parts` and `data` are absent when the call failed in the transport
    /// layer.
    #[must_use]
    pub fn new(
        method: Method,
        uri: Uri,
        parts: Option<Parts>,
        data: Option<Bytes>,
        result: Result<T>,
    ) -> Self {
        Self {
            method,
            uri,
            parts,
            data,
            result,
        }
    }

    /// Request method.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Request URI.
    #[must_use]
    pub const fn uri(&self) -> &Uri {
        &self.uri
    }

    /// HTTP status code.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        self.parts.as_ref().map(|parts| parts.status)
    }

    /// Response headers.
    #[must_use]
    pub fn headers(&self) -> Option<&HeaderMap> {
        self.parts.as_ref().map(|parts| &parts.headers)
    }

    /// Single header value by name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers()?.get(name)?.to_str().ok()
    }

    /// Raw response body.
    #[must_use]
    pub const fn data(&self) -> Option<&Bytes> {
        self.data.as_ref()
    }

    /// Serializer result.
    #[must_use]
    pub const fn result(&self) -> &Result<T> {
        &self.result
    }

    /// Consume into the serializer result.
    ///
    /// # Errors
    ///
    /// Returns the serializer error.
    pub fn into_result(self) -> Result<T> {
        self.result
    }

    /// The serialized value, if any.
    #[must_use]
    pub fn value(&self) -> Option<&T> {
        self.result.as_ref().ok()
    }

    /// The serializer error, if any.
    #[must_use]
    pub fn error(&self) -> Option<&Error> {
        self.result.as_ref().err()
    }

    /// Serialization succeeded.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// Map the serialized value, keeping everything else.
    #[must_use]
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> DataResponse<U> {
        DataResponse {
            method: self.method,
            uri: self.uri,
            parts: self.parts,
            data: self.data,
            result: self.result.map(f),
        }
    }
}
