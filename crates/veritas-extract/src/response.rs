//! Error payloads and their HTTP responses.
//!
//! | Payload | Used for |
//! |---------|----------|
//! | [`ErrorPayload`] | `400` validation failures: `{ "errors": { field: [messages] } }` |
//! | [`ErrorEnvelope`] | Every other failure: `{ "code", "message" }` |

use bytes::Bytes;
use http::{header, HeaderValue, Response, StatusCode};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use veritas_schema::FlattenedErrors;

/// Body of a `400` validation failure.
///
/// `form_errors` holds messages that are not tied to a field (for example
/// unrecognized keys under a strict schema) and is omitted when empty, so
/// the common shape is exactly `{ "errors": { ... } }`.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use veritas_extract::response::ErrorPayload;
///
/// let mut payload = ErrorPayload::default();
/// payload.errors.insert("a".into(), vec!["Required".into()]);
///
/// assert_eq!(
///     serde_json::to_value(&payload).unwrap(),
///     json!({ "errors": { "a": ["Required"] } }),
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    /// Messages per top-level field.
    pub errors: IndexMap<String, Vec<String>>,
    /// Messages for the input as a whole.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub form_errors: Vec<String>,
}

impl From<FlattenedErrors> for ErrorPayload {
    fn from(flat: FlattenedErrors) -> Self {
        Self {
            errors: flat.field_errors,
            form_errors: flat.form_errors,
        }
    }
}

/// Body of a non-validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorEnvelope {
    /// Stable error code, e.g. `PAYLOAD_TOO_LARGE`.
    pub code: &'static str,
    /// Human-readable description.
    pub message: String,
}

/// Builds a JSON response with the given status.
pub(crate) fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<Bytes> {
    // String maps and envelopes always serialize.
    let body = serde_json::to_vec(body).unwrap_or_default();

    let mut response = Response::new(Bytes::from(body));
    *response.status_mut() = status;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    response
}
