//! Error types for shaper.
//!
//! Every serializer reports failures through [`Error`]:
//!
//! - [`Error::Transport`] forwards the HTTP layer's own error untouched,
//! - [`Error::InputDataNilOrZeroLength`] reports a missing body the
//!   empty-response policy does not allow,
//! - [`Error::InvalidEmptyResponse`] reports an allowed empty body the target
//!   type cannot represent,
//! - [`Error::DecodingFailed`] wraps a [`ClassifiedError`] raised when the
//!   mapping capability rejects the extracted JSON.

use derive_more::{Display, From};

use crate::Exchange;

/// Boxed transport error, as produced by the underlying HTTP client.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure reason used when the mapping capability cannot produce a value.
pub const MAPPING_FAILED_REASON: &str = "mapping failed to serialize response.";

/// Failure reason used when the exchange carries no payload at all.
pub const NO_DATA_REASON: &str = "Data could not be serialized. Input data was nil.";

// ============================================================================
// Classified Error
// ============================================================================

/// Stable numeric codes of the domain error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ErrorCode {
    /// The exchange completed without a payload.
    #[display("no data")]
    NoData = 1,
    /// The mapping capability could not produce a value from the JSON.
    #[display("data serialization failed")]
    DataSerializationFailed = 2,
}

impl ErrorCode {
    /// Numeric value of the code.
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }
}

/// A domain error with a stable code and a human-readable reason.
///
/// Meant for diagnostics: match on [`ClassifiedError::code`], not on the reason.
#[derive(Debug, Clone, PartialEq, Eq, Display, derive_more::Error)]
#[display("{reason}")]
pub struct ClassifiedError {
    code: ErrorCode,
    reason: String,
}

impl ClassifiedError {
    /// Create a classified error.
    #[must_use]
    pub fn new(code: ErrorCode, reason: impl Into<String>) -> Self {
        Self {
            code,
            reason: reason.into(),
        }
    }

    /// The exchange completed without a payload.
    #[must_use]
    pub fn no_data() -> Self {
        Self::new(ErrorCode::NoData, NO_DATA_REASON)
    }

    /// The mapping capability rejected the JSON, with a custom reason.
    #[must_use]
    pub fn data_serialization_failed(reason: impl Into<String>) -> Self {
        Self::new(ErrorCode::DataSerializationFailed, reason)
    }

    /// The mapping capability rejected the JSON.
    #[must_use]
    pub fn mapping_failed() -> Self {
        Self::data_serialization_failed(MAPPING_FAILED_REASON)
    }

    /// Error code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    /// Failure reason.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// Check a completed exchange for a missing payload.
///
/// Returns [`ClassifiedError::no_data`] when the transport succeeded but no
/// payload was received. A transport error is not classified here: it is
/// always forwarded as-is by the serializers.
#[must_use]
pub fn check_response(exchange: &Exchange<'_>) -> Option<ClassifiedError> {
    if exchange.error().is_some() || exchange.data().is_some() {
        return None;
    }
    Some(ClassifiedError::no_data())
}

// ============================================================================
// Error Type
// ============================================================================

/// Main error type of the response serializers.
#[derive(Debug, Display, From)]
pub enum Error {
    /// Transport-level error, forwarded unmodified.
    #[display("{_0}")]
    #[from(skip)]
    Transport(BoxError),

    /// The body is absent or empty and the empty-response policy disallows it.
    #[display("response could not be serialized, input data was nil or zero length")]
    #[from(skip)]
    InputDataNilOrZeroLength,

    /// The body is allowed to be empty, but the target type has no empty value.
    #[display(
        "empty response could not be serialized to type: {type_name}. \
         Use Empty as the expected type for such responses"
    )]
    #[from(skip)]
    InvalidEmptyResponse {
        /// Name of the target type.
        type_name: &'static str,
    },

    /// The mapping capability could not produce a value.
    #[display("response could not be decoded: {_0}")]
    #[from]
    DecodingFailed(ClassifiedError),
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Transport(error) => Some(&**error),
            Self::DecodingFailed(error) => Some(error),
            Self::InputDataNilOrZeroLength | Self::InvalidEmptyResponse { .. } => None,
        }
    }
}

/// Result type alias using [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Wrap a transport error.
    #[must_use]
    pub fn transport(error: impl Into<BoxError>) -> Self {
        Self::Transport(error.into())
    }

    /// The target type `T` cannot represent an empty response.
    #[must_use]
    pub fn invalid_empty_response<T>() -> Self {
        Self::InvalidEmptyResponse {
            type_name: std::any::type_name::<T>(),
        }
    }

    /// The mapping capability could not produce a value.
    #[must_use]
    pub fn mapping_failed() -> Self {
        Self::DecodingFailed(ClassifiedError::mapping_failed())
    }

    /// Decoding failed with a custom reason.
    #[must_use]
    pub fn decoding_failed(reason: impl Into<String>) -> Self {
        Self::DecodingFailed(ClassifiedError::data_serialization_failed(reason))
    }

    /// Stable code of the domain error kind, `None` for transport errors and
    /// invalid empty responses.
    #[must_use]
    pub const fn code(&self) -> Option<ErrorCode> {
        match self {
            Self::InputDataNilOrZeroLength => Some(ErrorCode::NoData),
            Self::DecodingFailed(error) => Some(error.code()),
            Self::Transport(_) | Self::InvalidEmptyResponse { .. } => None,
        }
    }

    /// Human-readable failure reason of a domain error.
    #[must_use]
    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            Self::InputDataNilOrZeroLength => Some(NO_DATA_REASON),
            Self::DecodingFailed(error) => Some(error.reason()),
            Self::Transport(_) | Self::InvalidEmptyResponse { .. } => None,
        }
    }

    /// Returns `true` if this is a forwarded transport error.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Returns `true` if the body was missing and not allowed to be.
    #[must_use]
    pub const fn is_no_data(&self) -> bool {
        matches!(self, Self::InputDataNilOrZeroLength)
    }

    /// Returns `true` if the mapping capability rejected the JSON.
    #[must_use]
    pub const fn is_decoding_failed(&self) -> bool {
        matches!(self, Self::DecodingFailed(_))
    }

    /// The forwarded transport error, if any.
    ///
    /// Use `downcast_ref` on it to recover the concrete type.
    #[must_use]
    pub fn transport_error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            Self::Transport(error) => Some(error.as_ref()),
            _ => None,
        }
    }

    /// Consume into the forwarded transport error.
    ///
    /// # Errors
    ///
    /// Returns `self` back if this is not a transport error.
    pub fn into_transport(self) -> std::result::Result<BoxError, Self> {
        match self {
            Self::Transport(error) => Ok(error),
            other => Err(other),
        }
    }
}
