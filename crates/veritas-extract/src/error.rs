//! Extraction error types.
//!
//! Validation failures become a [`ClientError`] (always HTTP 400). Failures to
//! obtain the input at all, such as an unreadable form body, are a
//! [`BodyError`]. Both are wrapped by [`ExtractError`], which is what the
//! strict parse operations return.

use crate::response::{json_response, ErrorEnvelope, ErrorPayload};
use bytes::Bytes;
use http::{Response, StatusCode};
use indexmap::IndexMap;
use std::fmt;
use thiserror::Error;
use veritas_schema::ValidationError;

/// Boxed error used for body transport failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Where the extracted parameters came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtractionSource {
    /// URL query string
    Query,
    /// Submitted form body
    Form,
    /// Route path parameters
    Route,
}

impl ExtractionSource {
    /// Returns the source as a stable string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Form => "form",
            Self::Route => "route",
        }
    }
}

impl fmt::Display for ExtractionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validation failure to be reported to the client as HTTP 400.
///
/// The payload serializes as `{ "errors": { "<field>": ["<message>", ...] } }`.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use veritas_extract::{parse_query, ExtractError};
/// use veritas_schema::{number, object, string};
///
/// let schema = object().field("a", number().coerce()).field("b", string());
/// let err = parse_query::<serde_json::Value>("a=test&b=test", schema).unwrap_err();
///
/// let client = err.as_client().unwrap();
/// assert_eq!(client.status_code(), http::StatusCode::BAD_REQUEST);
/// assert_eq!(
///     serde_json::to_value(client.payload()).unwrap(),
///     json!({ "errors": { "a": ["Expected number, received nan"] } }),
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientError {
    extraction_source: ExtractionSource,
    payload: ErrorPayload,
}

impl ClientError {
    /// Creates a client error from a schema validation failure.
    #[must_use]
    pub fn from_validation(source: ExtractionSource, error: &ValidationError) -> Self {
        Self {
            extraction_source: source,
            payload: ErrorPayload::from(error.flatten()),
        }
    }

    /// Returns where the rejected parameters came from.
    #[must_use]
    pub fn extraction_source(&self) -> ExtractionSource {
        self.extraction_source
    }

    /// Returns the per-field error messages.
    #[must_use]
    pub fn errors(&self) -> &IndexMap<String, Vec<String>> {
        &self.payload.errors
    }

    /// Returns messages that apply to the input as a whole.
    #[must_use]
    pub fn form_errors(&self) -> &[String] {
        &self.payload.form_errors
    }

    /// Returns the response payload.
    #[must_use]
    pub fn payload(&self) -> &ErrorPayload {
        &self.payload
    }

    /// Always `400 Bad Request`.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    /// Returns the error code suitable for error envelopes.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        "VALIDATION_FAILED"
    }

    /// Builds the `400` JSON response for this error.
    #[must_use]
    pub fn to_response(&self) -> Response<Bytes> {
        json_response(self.status_code(), &self.payload)
    }

    /// Consumes the error and builds its `400` JSON response.
    #[must_use]
    pub fn into_response(self) -> Response<Bytes> {
        self.to_response()
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {} parameters", self.extraction_source)?;
        let mut sep = ": ";
        for message in &self.payload.form_errors {
            write!(f, "{sep}{message}")?;
            sep = "; ";
        }
        for (field, messages) in &self.payload.errors {
            write!(f, "{sep}{field}: {}", messages.join(", "))?;
            sep = "; ";
        }
        Ok(())
    }
}

impl std::error::Error for ClientError {}

/// Failure to read or decode a submitted form body.
#[derive(Debug, Error)]
pub enum BodyError {
    /// The transport failed while the body was being read.
    #[error("failed to read request body: {0}")]
    Read(#[source] BoxError),

    /// The body exceeded the configured size limit.
    #[error("payload too large: max {max_size} bytes")]
    PayloadTooLarge {
        /// Configured limit in bytes.
        max_size: usize,
    },

    /// The request is not a form submission.
    #[error(
        "unsupported content type: expected 'application/x-www-form-urlencoded' or \
         'multipart/form-data', got '{actual}'"
    )]
    UnsupportedMediaType {
        /// The Content-Type that was sent, or `none`.
        actual: String,
    },

    /// The body could not be decoded as form data.
    #[error("malformed form body: {0}")]
    Malformed(String),

    /// More form fields than allowed.
    #[error("too many form fields (max {max})")]
    TooManyFields {
        /// Configured maximum.
        max: usize,
    },

    /// A single multipart field exceeded its size limit.
    #[error("form field '{field}' exceeds {max_size} bytes")]
    FieldTooLarge {
        /// Field name.
        field: String,
        /// Configured limit in bytes.
        max_size: usize,
    },
}

impl BodyError {
    /// Returns the appropriate HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Read(_) | Self::Malformed(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge { .. }
            | Self::TooManyFields { .. }
            | Self::FieldTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::UnsupportedMediaType { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        }
    }

    /// Returns the error code suitable for error envelopes.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Read(_) => "BODY_READ_FAILED",
            Self::PayloadTooLarge { .. } => "PAYLOAD_TOO_LARGE",
            Self::UnsupportedMediaType { .. } => "UNSUPPORTED_MEDIA_TYPE",
            Self::Malformed(_) => "MALFORMED_FORM",
            Self::TooManyFields { .. } => "TOO_MANY_FIELDS",
            Self::FieldTooLarge { .. } => "FIELD_TOO_LARGE",
        }
    }

    pub(crate) fn unsupported(actual: Option<&str>) -> Self {
        Self::UnsupportedMediaType {
            actual: actual.unwrap_or("none").to_string(),
        }
    }
}

/// Error returned by the parse operations.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The parameters did not satisfy the schema.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// The form body could not be obtained.
    #[error(transparent)]
    Body(#[from] BodyError),

    /// The validated value does not fit the requested Rust type.
    ///
    /// This means the schema and the target type disagree, which is a
    /// programming error rather than bad input.
    #[error("validated {extraction_source} parameters do not match the target type: {error}")]
    Deserialize {
        /// Where the parameters came from.
        extraction_source: ExtractionSource,
        /// The deserialization failure.
        #[source]
        error: serde_json::Error,
    },
}

impl ExtractError {
    /// Returns the client error if this is a validation failure.
    #[must_use]
    pub fn as_client(&self) -> Option<&ClientError> {
        match self {
            Self::Client(err) => Some(err),
            _ => None,
        }
    }

    /// Returns true for validation failures.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Client(_))
    }

    /// Returns the appropriate HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Client(err) => err.status_code(),
            Self::Body(err) => err.status_code(),
            Self::Deserialize { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the error code suitable for error envelopes.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Client(err) => err.error_code(),
            Self::Body(err) => err.error_code(),
            Self::Deserialize { .. } => "TARGET_TYPE_MISMATCH",
        }
    }

    /// Builds the HTTP response for this error.
    ///
    /// Validation failures carry the field error payload; everything else
    /// uses a `{ "code", "message" }` envelope.
    #[must_use]
    pub fn into_response(self) -> Response<Bytes> {
        match self {
            Self::Client(err) => err.into_response(),
            other => json_response(
                other.status_code(),
                &ErrorEnvelope {
                    code: other.error_code(),
                    message: other.to_string(),
                },
            ),
        }
    }
}
