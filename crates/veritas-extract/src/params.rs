//! The canonical parameter mapping handed to schemas.
//!
//! Query strings and form bodies are multi-valued: a key may repeat. Both are
//! collapsed the same way into a [`ParamMap`]: a key seen once maps to a
//! single string, a key seen more than once maps to every value in source
//! order. Route parameters are single-valued by construction.

use crate::route::RouteParams;
use indexmap::map::Entry;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Value of a single parameter key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// The key appeared once.
    Single(String),
    /// The key repeated; values in source order.
    Multiple(Vec<String>),
}

impl ParamValue {
    /// Returns the value if the key appeared once.
    #[must_use]
    pub fn as_single(&self) -> Option<&str> {
        match self {
            Self::Single(value) => Some(value),
            Self::Multiple(_) => None,
        }
    }

    /// Returns every value, in source order.
    #[must_use]
    pub fn values(&self) -> Vec<&str> {
        match self {
            Self::Single(value) => vec![value.as_str()],
            Self::Multiple(values) => values.iter().map(String::as_str).collect(),
        }
    }

    /// Converts to the JSON shape schemas see.
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Single(value) => Value::String(value.clone()),
            Self::Multiple(values) => {
                Value::Array(values.iter().cloned().map(Value::String).collect())
            }
        }
    }

    fn push(&mut self, value: String) {
        match self {
            Self::Single(first) => {
                let first = std::mem::take(first);
                *self = Self::Multiple(vec![first, value]);
            }
            Self::Multiple(values) => values.push(value),
        }
    }
}

/// Canonical key/value mapping built fresh for every parse.
///
/// # Example
///
/// ```rust
/// use veritas_extract::{ParamMap, ParamValue};
///
/// let params = ParamMap::from_pairs([("tag", "a"), ("page", "2"), ("tag", "b")]);
///
/// assert_eq!(params.get("page"), Some(&ParamValue::Single("2".into())));
/// assert_eq!(
///     params.get("tag"),
///     Some(&ParamValue::Multiple(vec!["a".into(), "b".into()])),
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ParamMap(IndexMap<String, ParamValue>);

impl ParamMap {
    /// Collapses multi-valued pairs, keeping first-seen key order.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut map: IndexMap<String, ParamValue> = IndexMap::new();
        for (key, value) in pairs {
            match map.entry(key.into()) {
                Entry::Vacant(entry) => {
                    entry.insert(ParamValue::Single(value.into()));
                }
                Entry::Occupied(mut entry) => entry.get_mut().push(value.into()),
            }
        }
        Self(map)
    }

    /// Builds the mapping from route parameters.
    ///
    /// Absent values are left out, so the schema sees the key as missing.
    #[must_use]
    pub fn from_route(params: &RouteParams) -> Self {
        let mut map = IndexMap::with_capacity(params.len());
        for (name, value) in params.iter() {
            if let Some(value) = value {
                map.entry(name.to_string())
                    .or_insert_with(|| ParamValue::Single(value.to_string()));
            }
        }
        Self(map)
    }

    /// Builds the mapping from a plain map of optional values.
    #[must_use]
    pub fn from_optional_map(map: &HashMap<String, Option<String>>) -> Self {
        Self(
            map.iter()
                .filter_map(|(name, value)| {
                    value
                        .as_ref()
                        .map(|v| (name.clone(), ParamValue::Single(v.clone())))
                })
                .collect(),
        )
    }

    /// Returns the value for a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    /// Returns the number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true when there are no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over keys and values in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Converts to the JSON object schemas validate.
    #[must_use]
    pub fn to_value(&self) -> Value {
        let map: Map<String, Value> = self
            .0
            .iter()
            .map(|(k, v)| (k.clone(), v.to_value()))
            .collect();
        Value::Object(map)
    }
}
