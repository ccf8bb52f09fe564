//! Route parameter extraction.
//!
//! Route parameters are single-valued, so no collapsing happens here. A plain
//! map and a [`RequestEvent`] carrying the same parameters parse identically.

use crate::error::{ExtractError, ExtractionSource};
use crate::event::RequestEvent;
use crate::outcome::{safe_validate_params, validate_params, SafeParse};
use crate::params::ParamMap;
use crate::route::RouteParams;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use tracing::debug;
use veritas_schema::SchemaDescriptor;

/// Where route parameters are read from.
#[derive(Debug, Clone, Copy)]
pub enum RouteSource<'a> {
    /// Parameters captured by a router.
    Params(&'a RouteParams),
    /// A plain map; `None` values are treated as absent.
    Map(&'a HashMap<String, Option<String>>),
}

impl RouteSource<'_> {
    /// Normalizes the source into a canonical mapping.
    #[must_use]
    pub fn to_param_map(&self) -> ParamMap {
        match self {
            Self::Params(params) => ParamMap::from_route(params),
            Self::Map(map) => ParamMap::from_optional_map(map),
        }
    }
}

impl<'a> From<&'a RouteParams> for RouteSource<'a> {
    fn from(params: &'a RouteParams) -> Self {
        Self::Params(params)
    }
}

impl<'a> From<&'a HashMap<String, Option<String>>> for RouteSource<'a> {
    fn from(map: &'a HashMap<String, Option<String>>) -> Self {
        Self::Map(map)
    }
}

impl<'a> From<&'a RequestEvent> for RouteSource<'a> {
    fn from(event: &'a RequestEvent) -> Self {
        Self::Params(event.params())
    }
}

fn normalize<'a>(source: impl Into<RouteSource<'a>>) -> ParamMap {
    let params = source.into().to_param_map();
    debug!(
        extraction_source = %ExtractionSource::Route,
        key_count = params.len(),
        "normalized parameters"
    );
    params
}

/// Parses route parameters, failing with a `400` client error.
///
/// # Example
///
/// ```rust
/// use http::Uri;
/// use serde_json::{json, Value};
/// use veritas_extract::{parse_route, RequestEvent};
/// use veritas_schema::{number, object, string};
///
/// let event = RequestEvent::builder()
///     .uri(Uri::from_static("/items/1/test"))
///     .param("a", "1")
///     .param("b", "test")
///     .build();
///
/// let schema = object().field("a", number().coerce()).field("b", string());
/// let value: Value = parse_route(&event, schema).unwrap();
///
/// assert_eq!(value, json!({ "a": 1, "b": "test" }));
/// ```
pub fn parse_route<'a, T: DeserializeOwned>(
    source: impl Into<RouteSource<'a>>,
    schema: impl Into<SchemaDescriptor>,
) -> Result<T, ExtractError> {
    validate_params(ExtractionSource::Route, &normalize(source), schema)
}

/// Parses route parameters, returning validation failures as data.
pub fn safe_parse_route<'a, T: DeserializeOwned>(
    source: impl Into<RouteSource<'a>>,
    schema: impl Into<SchemaDescriptor>,
) -> Result<SafeParse<T>, ExtractError> {
    safe_validate_params(ExtractionSource::Route, &normalize(source), schema)
}
