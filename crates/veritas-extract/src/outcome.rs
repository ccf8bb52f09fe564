//! Result shaping shared by every parse operation.
//!
//! Each operation builds a [`ParamMap`] from its source and then calls
//! [`validate_params`] (strict) or [`safe_validate_params`] (safe). Both run
//! the schema exactly once; the strict form is the safe form with the
//! failure turned into an error.

use crate::error::{ClientError, ExtractError, ExtractionSource};
use crate::params::ParamMap;
use bytes::Bytes;
use http::Response;
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use tracing::debug;
use veritas_schema::SchemaDescriptor;

/// Outcome of a safe parse.
///
/// Serializes as `{ "success": true, "data": ... }` or
/// `{ "success": false, "errors": { ... } }`.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use veritas_extract::safe_parse_query;
/// use veritas_schema::{number, object, string};
///
/// let schema = object().field("a", number().coerce()).field("b", string());
///
/// let ok = safe_parse_query::<serde_json::Value>("?a=1&b=test", schema.clone()).unwrap();
/// assert_eq!(
///     serde_json::to_value(&ok).unwrap(),
///     json!({ "success": true, "data": { "a": 1, "b": "test" } }),
/// );
///
/// let failed = safe_parse_query::<serde_json::Value>("?a=test&b=test", schema).unwrap();
/// assert!(!failed.is_success());
/// assert_eq!(
///     serde_json::to_value(&failed).unwrap(),
///     json!({ "success": false, "errors": { "a": ["Expected number, received nan"] } }),
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum SafeParse<T> {
    /// The parameters satisfied the schema.
    Success(T),
    /// The parameters were rejected.
    Failure(ClientError),
}

impl<T> SafeParse<T> {
    /// Returns true if validation succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Returns the parsed value on success.
    #[must_use]
    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Success(data) => Some(data),
            Self::Failure(_) => None,
        }
    }

    /// Consumes the outcome, returning the parsed value on success.
    #[must_use]
    pub fn into_data(self) -> Option<T> {
        match self {
            Self::Success(data) => Some(data),
            Self::Failure(_) => None,
        }
    }

    /// Returns the per-field errors on failure.
    #[must_use]
    pub fn errors(&self) -> Option<&IndexMap<String, Vec<String>>> {
        self.error().map(ClientError::errors)
    }

    /// Returns the client error on failure.
    #[must_use]
    pub fn error(&self) -> Option<&ClientError> {
        match self {
            Self::Success(_) => None,
            Self::Failure(err) => Some(err),
        }
    }

    /// Converts into a `Result`.
    pub fn into_result(self) -> Result<T, ClientError> {
        match self {
            Self::Success(data) => Ok(data),
            Self::Failure(err) => Err(err),
        }
    }

    /// Returns the ready-made `400` response on failure.
    #[must_use]
    pub fn failure_response(&self) -> Option<Response<Bytes>> {
        self.error().map(ClientError::to_response)
    }
}

impl<T: Serialize> Serialize for SafeParse<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Success(data) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("success", &true)?;
                map.serialize_entry("data", data)?;
                map.end()
            }
            Self::Failure(err) => {
                let form_errors = err.form_errors();
                let len = if form_errors.is_empty() { 2 } else { 3 };
                let mut map = serializer.serialize_map(Some(len))?;
                map.serialize_entry("success", &false)?;
                map.serialize_entry("errors", err.errors())?;
                if !form_errors.is_empty() {
                    map.serialize_entry("form_errors", form_errors)?;
                }
                map.end()
            }
        }
    }
}

/// Validates normalized parameters, returning validation failures as data.
///
/// The `Err` case is reserved for a validated value that does not fit `T`.
pub fn safe_validate_params<T: DeserializeOwned>(
    source: ExtractionSource,
    params: &ParamMap,
    schema: impl Into<SchemaDescriptor>,
) -> Result<SafeParse<T>, ExtractError> {
    let schema = schema.into().into_schema();

    match schema.safe_parse(&params.to_value()) {
        Ok(value) => {
            debug!(extraction_source = %source, "parameters validated");
            let data = serde_json::from_value(value).map_err(|error| {
                ExtractError::Deserialize {
                    extraction_source: source,
                    error,
                }
            })?;
            Ok(SafeParse::Success(data))
        }
        Err(err) => {
            debug!(
                extraction_source = %source,
                issue_count = err.issues().len(),
                "parameters rejected"
            );
            Ok(SafeParse::Failure(ClientError::from_validation(source, &err)))
        }
    }
}

/// Validates normalized parameters, failing with a client error.
pub fn validate_params<T: DeserializeOwned>(
    source: ExtractionSource,
    params: &ParamMap,
    schema: impl Into<SchemaDescriptor>,
) -> Result<T, ExtractError> {
    Ok(safe_validate_params(source, params, schema)?.into_result()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;
    use serde::Deserialize;
    use serde_json::json;
    use veritas_schema::{number, object, string, ObjectSchema};

    #[derive(Debug, Deserialize, Serialize, PartialEq)]
    struct Pair {
        a: i64,
        b: String,
    }

    fn schema() -> ObjectSchema {
        object().field("a", number().coerce()).field("b", string())
    }

    #[test]
    fn test_validate_typed() {
        let params = ParamMap::from_pairs([("a", "1"), ("b", "test")]);
        let pair: Pair = validate_params(ExtractionSource::Query, &params, schema()).unwrap();
        assert_eq!(
            pair,
            Pair {
                a: 1,
                b: "test".into()
            }
        );
    }

    #[test]
    fn test_validate_failure_is_client_error() {
        let params = ParamMap::from_pairs([("a", "test"), ("b", "test")]);
        let err =
            validate_params::<Pair>(ExtractionSource::Form, &params, schema()).unwrap_err();

        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        let client = err.as_client().unwrap();
        assert_eq!(client.extraction_source(), ExtractionSource::Form);
        assert_eq!(client.errors()["a"], vec!["Expected number, received nan"]);
    }

    #[test]
    fn test_safe_success_shape() {
        let params = ParamMap::from_pairs([("a", "2"), ("b", "x")]);
        let outcome =
            safe_validate_params::<Pair>(ExtractionSource::Query, &params, schema()).unwrap();

        assert!(outcome.is_success());
        assert!(outcome.errors().is_none());
        assert!(outcome.failure_response().is_none());
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({"success": true, "data": {"a": 2, "b": "x"}})
        );
        assert_eq!(outcome.into_data().unwrap().a, 2);
    }

    #[test]
    fn test_safe_failure_shape() {
        let params = ParamMap::from_pairs([("a", "x")]);
        let outcome =
            safe_validate_params::<Pair>(ExtractionSource::Query, &params, schema()).unwrap();

        assert!(!outcome.is_success());
        assert!(outcome.data().is_none());
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({
                "success": false,
                "errors": {"a": ["Expected number, received nan"], "b": ["Required"]}
            })
        );
    }

    #[test]
    fn test_failure_response() {
        let params = ParamMap::from_pairs([("b", "x")]);
        let outcome =
            safe_validate_params::<Pair>(ExtractionSource::Route, &params, schema()).unwrap();

        let response = outcome.failure_response().unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body, json!({"errors": {"a": ["Required"]}}));
    }

    #[test]
    fn test_safe_failure_with_form_errors() {
        let params = ParamMap::from_pairs([("a", "1"), ("b", "x"), ("c", "y")]);
        let outcome = safe_validate_params::<serde_json::Value>(
            ExtractionSource::Query,
            &params,
            schema().strict(),
        )
        .unwrap();

        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({
                "success": false,
                "errors": {},
                "form_errors": ["Unrecognized key(s) in object: 'c'"]
            })
        );
    }

    #[test]
    fn test_strict_and_safe_agree() {
        let params = ParamMap::from_pairs([("a", "5"), ("b", "y")]);
        let strict: serde_json::Value =
            validate_params(ExtractionSource::Query, &params, schema()).unwrap();
        let safe = safe_validate_params::<serde_json::Value>(
            ExtractionSource::Query,
            &params,
            schema(),
        )
        .unwrap();
        assert_eq!(safe.into_result().unwrap(), strict);
    }

    #[test]
    fn test_target_type_mismatch() {
        #[derive(Debug, Deserialize)]
        struct Wrong {
            #[allow(dead_code)]
            a: bool,
        }

        let params = ParamMap::from_pairs([("a", "1"), ("b", "x")]);
        let err = validate_params::<Wrong>(ExtractionSource::Query, &params, schema())
            .unwrap_err();
        assert!(matches!(err, ExtractError::Deserialize { .. }));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
