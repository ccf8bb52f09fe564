//! Query string extraction.
//!
//! [`parse_query`] and [`safe_parse_query`] accept anything that converts
//! into a [`QuerySource`]: a raw query string (with or without the leading
//! `?`), a [`Uri`], an already-parsed [`SearchParams`], or a
//! [`RequestEvent`].

use crate::error::{ExtractError, ExtractionSource};
use crate::event::RequestEvent;
use crate::outcome::{safe_validate_params, validate_params, SafeParse};
use crate::params::ParamMap;
use http::Uri;
use serde::de::DeserializeOwned;
use tracing::debug;
use veritas_schema::SchemaDescriptor;

/// Ordered, multi-valued query parameters.
///
/// # Example
///
/// ```rust
/// use veritas_extract::SearchParams;
///
/// let params = SearchParams::parse("?q=rust+lang&tag=a&tag=b%26c");
///
/// assert_eq!(params.get("q"), Some("rust lang"));
/// assert_eq!(params.get_all("tag"), vec!["a", "b&c"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParams {
    pairs: Vec<(String, String)>,
}

impl SearchParams {
    /// Creates an empty set of parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a query string, percent- and `+`-decoding keys and values.
    ///
    /// A leading `?` is ignored.
    #[must_use]
    pub fn parse(query: &str) -> Self {
        decode_pairs(query)
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    /// Appends a key/value pair.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((key.into(), value.into()));
    }

    /// Returns the first value for a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns every value for a key, in order.
    #[must_use]
    pub fn get_all(&self, key: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// Returns the number of pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns true if there are no pairs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Returns an iterator over the pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SearchParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Where query parameters are read from.
#[derive(Debug, Clone, Copy)]
pub enum QuerySource<'a> {
    /// A raw query string; a leading `?` is ignored.
    Raw(&'a str),
    /// The query component of a URI.
    Uri(&'a Uri),
    /// Already-parsed parameters.
    Params(&'a SearchParams),
}

impl QuerySource<'_> {
    /// Normalizes the source into a canonical mapping.
    #[must_use]
    pub fn to_param_map(&self) -> ParamMap {
        match self {
            Self::Raw(query) => raw_param_map(query),
            Self::Uri(uri) => raw_param_map(uri.query().unwrap_or("")),
            Self::Params(params) => ParamMap::from_pairs(params.iter()),
        }
    }
}

fn decode_pairs(query: &str) -> form_urlencoded::Parse<'_> {
    let query = query.strip_prefix('?').unwrap_or(query);
    form_urlencoded::parse(query.as_bytes())
}

fn raw_param_map(query: &str) -> ParamMap {
    ParamMap::from_pairs(decode_pairs(query))
}

impl<'a> From<&'a str> for QuerySource<'a> {
    fn from(query: &'a str) -> Self {
        Self::Raw(query)
    }
}

impl<'a> From<&'a String> for QuerySource<'a> {
    fn from(query: &'a String) -> Self {
        Self::Raw(query)
    }
}

impl<'a> From<&'a Uri> for QuerySource<'a> {
    fn from(uri: &'a Uri) -> Self {
        Self::Uri(uri)
    }
}

impl<'a> From<&'a SearchParams> for QuerySource<'a> {
    fn from(params: &'a SearchParams) -> Self {
        Self::Params(params)
    }
}

impl<'a> From<&'a RequestEvent> for QuerySource<'a> {
    fn from(event: &'a RequestEvent) -> Self {
        Self::Uri(event.uri())
    }
}

fn normalize<'a>(source: impl Into<QuerySource<'a>>) -> ParamMap {
    let params = source.into().to_param_map();
    debug!(
        extraction_source = %ExtractionSource::Query,
        key_count = params.len(),
        "normalized parameters"
    );
    params
}

/// Parses query parameters, failing with a `400` client error.
///
/// # Example
///
/// ```rust
/// use serde::Deserialize;
/// use veritas_extract::parse_query;
/// use veritas_schema::{number, object, string};
///
/// #[derive(Debug, Deserialize, PartialEq)]
/// struct Params {
///     a: u32,
///     b: String,
/// }
///
/// let schema = object().field("a", number().coerce()).field("b", string());
/// let params: Params = parse_query("?a=1&b=test", schema).unwrap();
///
/// assert_eq!(params, Params { a: 1, b: "test".into() });
/// ```
pub fn parse_query<'a, T: DeserializeOwned>(
    source: impl Into<QuerySource<'a>>,
    schema: impl Into<SchemaDescriptor>,
) -> Result<T, ExtractError> {
    validate_params(ExtractionSource::Query, &normalize(source), schema)
}

/// Parses query parameters, returning validation failures as data.
pub fn safe_parse_query<'a, T: DeserializeOwned>(
    source: impl Into<QuerySource<'a>>,
    schema: impl Into<SchemaDescriptor>,
) -> Result<SafeParse<T>, ExtractError> {
    safe_validate_params(ExtractionSource::Query, &normalize(source), schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use veritas_schema::{array, number, object, string, SchemaExt};

    #[test]
    fn test_search_params_parse() {
        let params = SearchParams::parse("a=1&b=hello%20world&c=x+y");
        assert_eq!(params.len(), 3);
        assert_eq!(params.get("a"), Some("1"));
        assert_eq!(params.get("b"), Some("hello world"));
        assert_eq!(params.get("c"), Some("x y"));
        assert_eq!(params.get("d"), None);
    }

    #[test]
    fn test_search_params_leading_question_mark() {
        assert_eq!(SearchParams::parse("?a=1"), SearchParams::parse("a=1"));
        assert!(SearchParams::parse("?").is_empty());
        assert!(SearchParams::parse("").is_empty());
    }

    #[test]
    fn test_search_params_append() {
        let mut params = SearchParams::new();
        params.append("a", "1");
        params.append("a", "2");
        assert_eq!(params.get_all("a"), vec!["1", "2"]);
        assert_eq!(params.iter().count(), 2);
    }

    #[test]
    fn test_key_without_value() {
        let map = QuerySource::Raw("flag&a=1").to_param_map();
        assert_eq!(map.to_value(), json!({"flag": "", "a": "1"}));
    }

    #[test]
    fn test_sources_normalize_identically() {
        let uri = Uri::from_static("/p?a=1&a=2&b=x");
        let params = SearchParams::parse("a=1&a=2&b=x");
        let expected = json!({"a": ["1", "2"], "b": "x"});

        assert_eq!(QuerySource::from("?a=1&a=2&b=x").to_param_map().to_value(), expected);
        assert_eq!(QuerySource::from(&uri).to_param_map().to_value(), expected);
        assert_eq!(QuerySource::from(&params).to_param_map().to_value(), expected);
    }

    #[test]
    fn test_search_params_and_raw_decode_alike() {
        for query in ["?q=a+b&x=%26&x=2", "flag&=v&k=", "a=%zz&b=%E2%9C%93"] {
            let params = SearchParams::parse(query);
            assert_eq!(
                QuerySource::from(&params).to_param_map(),
                QuerySource::from(query).to_param_map(),
                "query: {query}"
            );
        }
    }

    #[test]
    fn test_uri_without_query() {
        let uri = Uri::from_static("/p");
        assert!(QuerySource::from(&uri).to_param_map().is_empty());
    }

    #[test]
    fn test_parse_query_from_event() {
        let event = RequestEvent::builder()
            .uri(Uri::from_static("/p?a=3&b=z"))
            .build();
        let schema = object().field("a", number().coerce()).field("b", string());

        let value: Value = parse_query(&event, schema).unwrap();
        assert_eq!(value, json!({"a": 3, "b": "z"}));
    }

    #[test]
    fn test_parse_query_repeated_keys_into_array() {
        let schema = object().field("tag", array(string()).accept_single());

        let value: Value = parse_query("tag=a&tag=b", schema.clone()).unwrap();
        assert_eq!(value, json!({"tag": ["a", "b"]}));

        let value: Value = parse_query("tag=a", schema).unwrap();
        assert_eq!(value, json!({"tag": ["a"]}));
    }

    #[test]
    fn test_parse_query_optional_field() {
        let schema = object()
            .field("q", string())
            .field("page", number().coerce().int().optional());

        let value: Value = parse_query("q=x", schema).unwrap();
        assert_eq!(value, json!({"q": "x"}));
    }

    #[test]
    fn test_safe_parse_query_failure() {
        let schema = object().field("a", number().coerce());
        let outcome = safe_parse_query::<Value>("a=", schema).unwrap();

        assert_eq!(
            outcome.errors().unwrap()["a"],
            vec!["Expected number, received nan"]
        );
    }
}
