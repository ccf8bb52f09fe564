//! # Veritas Extract
//!
//! Schema-validated extraction of request parameters.
//!
//! Each operation normalizes its input into a [`ParamMap`], validates it
//! against a schema from [`veritas_schema`], and shapes the outcome:
//!
//! | Operation | Source | Returns |
//! |-----------|--------|---------|
//! | [`parse_query`] | query string, [`Uri`](http::Uri), [`SearchParams`], [`RequestEvent`] | `T` or a `400` [`ClientError`] |
//! | [`safe_parse_query`] | same | [`SafeParse<T>`] |
//! | [`parse_form`] (async) | [`FormData`] or [`RequestEvent`] | `T` or a `400` [`ClientError`] |
//! | [`safe_parse_form`] (async) | same | [`SafeParse<T>`] |
//! | [`parse_route`] | [`RouteParams`], a plain map, [`RequestEvent`] | `T` or a `400` [`ClientError`] |
//! | [`safe_parse_route`] | same | [`SafeParse<T>`] |
//!
//! A key that repeats in a query string or form body becomes a sequence of
//! strings, in source order; a key seen once stays a single string.
//!
//! The schema argument is either a schema (usually an object schema) or a
//! plain mapping of field names to field schemas, which is wrapped in an
//! object schema with exactly those fields.
//!
//! ## Example
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_json::json;
//! use veritas_extract::{parse_query, safe_parse_query};
//! use veritas_schema::{number, string, FieldMap};
//!
//! #[derive(Debug, Deserialize, Serialize, PartialEq)]
//! struct Params {
//!     a: u32,
//!     b: String,
//! }
//!
//! let fields = FieldMap::new()
//!     .field("a", number().coerce())
//!     .field("b", string());
//!
//! let params: Params = parse_query("?a=1&b=test", fields.clone()).unwrap();
//! assert_eq!(params, Params { a: 1, b: "test".into() });
//!
//! let err = parse_query::<Params>("?a=test&b=test", fields.clone()).unwrap_err();
//! assert_eq!(err.status_code(), http::StatusCode::BAD_REQUEST);
//!
//! let outcome = safe_parse_query::<Params>("?a=test&b=test", fields).unwrap();
//! assert_eq!(
//!     serde_json::to_value(&outcome).unwrap(),
//!     json!({ "success": false, "errors": { "a": ["Expected number, received nan"] } }),
//! );
//! ```
//!
//! ## Errors
//!
//! Strict operations return [`ExtractError`]:
//!
//! - [`ExtractError::Client`]: the schema rejected the input (`400`).
//! - [`ExtractError::Body`]: the form body could not be read or decoded
//!   (`400`, `413` or `415`).
//! - [`ExtractError::Deserialize`]: the validated value does not fit `T`
//!   (`500`).
//!
//! Safe operations only return the last two as errors.

#![doc(html_root_url = "https://docs.rs/veritas-extract/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod event;
mod form;
mod loader;
mod multipart;
mod outcome;
mod params;
mod path;
mod query;
pub mod response;
mod route;

pub use config::{
    ConfigError, ExtractConfig, FormConfig, DEFAULT_MAX_BODY_SIZE, DEFAULT_MAX_FIELDS,
    DEFAULT_MAX_FIELD_SIZE,
};
pub use error::{BodyError, BoxError, ClientError, ExtractError, ExtractionSource};
pub use event::{EventBody, RequestEvent, RequestEventBuilder};
pub use form::{parse_form, read_form_data, safe_parse_form, FormData, FormSource};
pub use loader::ConfigLoader;
pub use outcome::{safe_validate_params, validate_params, SafeParse};
pub use params::{ParamMap, ParamValue};
pub use path::{parse_route, safe_parse_route, RouteSource};
pub use query::{parse_query, safe_parse_query, QuerySource, SearchParams};
pub use route::RouteParams;
