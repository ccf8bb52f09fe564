//! Route parameter storage.
//!
//! Route parameters are decoded path segments captured by a router. A
//! parameter may be declared by the route but absent from a particular
//! match (an optional segment), so values are `Option<String>`.

use smallvec::SmallVec;
use std::collections::HashMap;

/// Maximum number of parameters stored inline (stack allocated).
const INLINE_PARAMS: usize = 4;

/// Route parameters captured for a request.
///
/// # Example
///
/// ```rust
/// use veritas_extract::RouteParams;
///
/// let mut params = RouteParams::new();
/// params.push("userId", "123");
/// params.push_absent("format");
///
/// assert_eq!(params.get("userId"), Some("123"));
/// assert_eq!(params.get("format"), None);
/// assert!(params.contains("format"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RouteParams {
    inner: SmallVec<[(String, Option<String>); INLINE_PARAMS]>,
}

impl RouteParams {
    /// Creates an empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parameter with a value.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.inner.push((name.into(), Some(value.into())));
    }

    /// Adds a parameter that the route declares but the request omitted.
    pub fn push_absent(&mut self, name: impl Into<String>) {
        self.inner.push((name.into(), None));
    }

    /// Returns the value for a parameter; `None` if missing or absent.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner
            .iter()
            .find(|(n, _)| n == name)
            .and_then(|(_, v)| v.as_deref())
    }

    /// Returns true if the parameter is declared, with or without a value.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.inner.iter().any(|(n, _)| n == name)
    }

    /// Returns true if there are no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns an iterator over the parameters in capture order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.inner.iter().map(|(n, v)| (n.as_str(), v.as_deref()))
    }
}

impl FromIterator<(String, Option<String>)> for RouteParams {
    fn from_iter<I: IntoIterator<Item = (String, Option<String>)>>(iter: I) -> Self {
        Self {
            inner: iter.into_iter().collect(),
        }
    }
}

impl FromIterator<(String, String)> for RouteParams {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        iter.into_iter().map(|(n, v)| (n, Some(v))).collect()
    }
}

impl From<HashMap<String, Option<String>>> for RouteParams {
    fn from(map: HashMap<String, Option<String>>) -> Self {
        map.into_iter().collect()
    }
}

impl From<HashMap<String, String>> for RouteParams {
    fn from(map: HashMap<String, String>) -> Self {
        map.into_iter().collect()
    }
}
