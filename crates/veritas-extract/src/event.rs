//! The request wrapper handed to the extractors.
//!
//! A [`RequestEvent`] is an incoming HTTP request together with the route
//! parameters the router matched for it. Its body is type-erased so that a
//! single wrapper type serves every body implementation.

use crate::config::FormConfig;
use crate::error::BoxError;
use crate::route::RouteParams;
use bytes::Bytes;
use http::request::Parts;
use http::{header, HeaderMap, HeaderValue, Method, Request, Uri};
use http_body::Body;
use http_body_util::combinators::UnsyncBoxBody;
use http_body_util::{BodyExt, Full};
use std::fmt;

/// Type-erased request body.
pub type EventBody = UnsyncBoxBody<Bytes, BoxError>;

/// An HTTP request plus its matched route parameters.
///
/// # Example
///
/// ```rust
/// use http::{Method, Uri};
/// use veritas_extract::RequestEvent;
///
/// let event = RequestEvent::builder()
///     .method(Method::POST)
///     .uri(Uri::from_static("/users/123?verbose=1"))
///     .header("content-type", "application/x-www-form-urlencoded")
///     .param("userId", "123")
///     .body("name=alice")
///     .build();
///
/// assert_eq!(event.path(), "/users/123");
/// assert_eq!(event.query_string(), Some("verbose=1"));
/// assert_eq!(event.params().get("userId"), Some("123"));
/// ```
pub struct RequestEvent {
    parts: Parts,
    body: EventBody,
    params: RouteParams,
    form_config: FormConfig,
}

impl RequestEvent {
    /// Wraps a request and the route parameters matched for it.
    pub fn new<B>(request: Request<B>, params: RouteParams) -> Self
    where
        B: Body<Data = Bytes> + Send + 'static,
        B::Error: Into<BoxError>,
    {
        let (parts, body) = request.into_parts();
        Self {
            parts,
            body: body.map_err(Into::into).boxed_unsync(),
            params,
            form_config: FormConfig::default(),
        }
    }

    /// Wraps a request that matched no route parameters.
    pub fn from_request<B>(request: Request<B>) -> Self
    where
        B: Body<Data = Bytes> + Send + 'static,
        B::Error: Into<BoxError>,
    {
        Self::new(request, RouteParams::new())
    }

    /// Returns a builder for constructing an event.
    #[must_use]
    pub fn builder() -> RequestEventBuilder {
        RequestEventBuilder::new()
    }

    /// Replaces the limits applied when the form body is read.
    #[must_use]
    pub fn with_form_config(mut self, config: FormConfig) -> Self {
        self.form_config = config;
        self
    }

    /// Returns the HTTP method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.parts.method
    }

    /// Returns the request URI.
    #[must_use]
    pub fn uri(&self) -> &Uri {
        &self.parts.uri
    }

    /// Returns the path portion of the URI.
    #[must_use]
    pub fn path(&self) -> &str {
        self.parts.uri.path()
    }

    /// Returns the query string if present.
    #[must_use]
    pub fn query_string(&self) -> Option<&str> {
        self.parts.uri.query()
    }

    /// Returns the request headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.parts.headers
    }

    /// Returns a specific header value as a string.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.parts.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns the Content-Type header value.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.header(header::CONTENT_TYPE.as_str())
    }

    /// Returns the matched route parameters.
    #[must_use]
    pub fn params(&self) -> &RouteParams {
        &self.params
    }

    /// Returns a mutable reference to the route parameters.
    pub fn params_mut(&mut self) -> &mut RouteParams {
        &mut self.params
    }

    /// Returns the limits applied when the form body is read.
    #[must_use]
    pub fn form_config(&self) -> &FormConfig {
        &self.form_config
    }

    /// Consumes the event and returns the unread body.
    #[must_use]
    pub fn into_body(self) -> EventBody {
        self.body
    }

    pub(crate) fn into_parts(self) -> (Parts, EventBody, FormConfig) {
        (self.parts, self.body, self.form_config)
    }
}

impl fmt::Debug for RequestEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestEvent")
            .field("method", &self.parts.method)
            .field("uri", &self.parts.uri)
            .field("headers", &self.parts.headers)
            .field("params", &self.params)
            .field("form_config", &self.form_config)
            .finish_non_exhaustive()
    }
}

/// Builder for constructing a [`RequestEvent`].
#[derive(Debug, Default)]
pub struct RequestEventBuilder {
    method: Option<Method>,
    uri: Option<Uri>,
    headers: HeaderMap,
    body: Bytes,
    params: RouteParams,
    form_config: FormConfig,
}

impl RequestEventBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the HTTP method.
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Sets the URI.
    #[must_use]
    pub fn uri(mut self, uri: Uri) -> Self {
        self.uri = Some(uri);
        self
    }

    /// Adds a single header. Invalid values are ignored.
    #[must_use]
    pub fn header(mut self, name: &'static str, value: &str) -> Self {
        if let Ok(value) = HeaderValue::from_str(value) {
            self.headers.append(name, value);
        }
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Adds a route parameter with a value.
    #[must_use]
    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push(name, value);
        self
    }

    /// Adds a route parameter without a value.
    #[must_use]
    pub fn absent_param(mut self, name: impl Into<String>) -> Self {
        self.params.push_absent(name);
        self
    }

    /// Sets the route parameters.
    #[must_use]
    pub fn params(mut self, params: RouteParams) -> Self {
        self.params = params;
        self
    }

    /// Sets the form body limits.
    #[must_use]
    pub fn form_config(mut self, config: FormConfig) -> Self {
        self.form_config = config;
        self
    }

    /// Builds the event. Defaults to `GET /`.
    #[must_use]
    pub fn build(self) -> RequestEvent {
        let mut request = Request::new(Full::new(self.body));
        *request.method_mut() = self.method.unwrap_or(Method::GET);
        *request.uri_mut() = self.uri.unwrap_or_else(|| Uri::from_static("/"));
        *request.headers_mut() = self.headers;

        RequestEvent::new(request, self.params).with_form_config(self.form_config)
    }
}
