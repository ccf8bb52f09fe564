//! Form field extraction.
//!
//! Form parsing is the only operation that awaits: when handed a
//! [`RequestEvent`], the body is read once, up to the configured size limit,
//! and decoded according to its Content-Type.
//!
//! | Content-Type | Decoding |
//! |--------------|----------|
//! | `application/x-www-form-urlencoded` | percent- and `+`-decoded pairs |
//! | `multipart/form-data` | text fields; file parts are skipped |
//! | anything else, or none | `415 Unsupported Media Type` |

use crate::error::{BodyError, ExtractError, ExtractionSource};
use crate::event::{EventBody, RequestEvent};
use crate::multipart::read_multipart;
use crate::outcome::{safe_validate_params, validate_params, SafeParse};
use crate::params::ParamMap;
use bytes::Bytes;
use http::header;
use http_body_util::{BodyExt, LengthLimitError, Limited};
use mime::Mime;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use veritas_schema::SchemaDescriptor;

/// Ordered, multi-valued form fields.
///
/// # Example
///
/// ```rust
/// use veritas_extract::FormData;
///
/// let data = FormData::from_urlencoded(b"name=Alice+Smith&role=admin&role=dev");
///
/// assert_eq!(data.get("name"), Some("Alice Smith"));
/// assert_eq!(data.get_all("role"), vec!["admin", "dev"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    fields: Vec<(String, String)>,
}

impl FormData {
    /// Creates an empty form.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes an `application/x-www-form-urlencoded` body.
    #[must_use]
    pub fn from_urlencoded(body: &[u8]) -> Self {
        form_urlencoded::parse(body)
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    /// Appends a field.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.push((name.into(), value.into()));
    }

    /// Returns the first value of a field.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns every value of a field, in order.
    #[must_use]
    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if there are no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns an iterator over the fields in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Where form fields are read from.
#[derive(Debug)]
pub enum FormSource {
    /// Already-decoded form fields.
    Data(FormData),
    /// A request whose body is read and decoded.
    Event(RequestEvent),
}

impl FormSource {
    /// Resolves the source to form fields, reading the body if needed.
    pub async fn into_form_data(self) -> Result<FormData, BodyError> {
        match self {
            Self::Data(data) => Ok(data),
            Self::Event(event) => read_form_data(event).await,
        }
    }
}

impl From<FormData> for FormSource {
    fn from(data: FormData) -> Self {
        Self::Data(data)
    }
}

impl From<RequestEvent> for FormSource {
    fn from(event: RequestEvent) -> Self {
        Self::Event(event)
    }
}

enum FormKind {
    UrlEncoded,
    Multipart,
}

fn form_kind(content_type: Option<&str>) -> Result<FormKind, BodyError> {
    let mime: Mime = content_type
        .and_then(|ct| ct.parse().ok())
        .ok_or_else(|| BodyError::unsupported(content_type))?;

    if mime.type_() == mime::APPLICATION && mime.subtype() == mime::WWW_FORM_URLENCODED {
        Ok(FormKind::UrlEncoded)
    } else if mime.type_() == mime::MULTIPART && mime.subtype() == mime::FORM_DATA {
        Ok(FormKind::Multipart)
    } else {
        Err(BodyError::unsupported(content_type))
    }
}

async fn read_body(body: EventBody, max_size: usize) -> Result<Bytes, BodyError> {
    match Limited::new(body, max_size).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(err) if err.downcast_ref::<LengthLimitError>().is_some() => {
            Err(BodyError::PayloadTooLarge { max_size })
        }
        Err(err) => Err(BodyError::Read(err)),
    }
}

/// Reads and decodes the form body of a request.
///
/// The Content-Type is checked before any of the body is read. The body is
/// consumed; a failed read is returned as is.
pub async fn read_form_data(event: RequestEvent) -> Result<FormData, BodyError> {
    let (parts, body, config) = event.into_parts();
    let content_type = parts
        .headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());

    let kind = form_kind(content_type)?;
    let bytes = read_body(body, config.max_body_size).await?;

    let data = match kind {
        FormKind::UrlEncoded => FormData::from_urlencoded(&bytes),
        FormKind::Multipart => {
            read_multipart(content_type.unwrap_or_default(), bytes, &config).await?
        }
    };

    if data.len() > config.max_fields {
        return Err(BodyError::TooManyFields {
            max: config.max_fields,
        });
    }
    Ok(data)
}

async fn normalize(source: FormSource) -> Result<ParamMap, BodyError> {
    let data = source.into_form_data().await.map_err(|err| {
        warn!(
            extraction_source = %ExtractionSource::Form,
            error = %err,
            "failed to read form body"
        );
        err
    })?;

    let params = ParamMap::from_pairs(data.iter());
    debug!(
        extraction_source = %ExtractionSource::Form,
        key_count = params.len(),
        "normalized parameters"
    );
    Ok(params)
}

/// Parses form fields, failing with a `400` client error.
///
/// Body read and decode failures are returned as [`ExtractError::Body`].
///
/// # Example
///
/// ```rust
/// use serde_json::{json, Value};
/// use veritas_extract::{parse_form, RequestEvent};
/// use veritas_schema::{number, object, string};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let event = RequestEvent::builder()
///     .method(http::Method::POST)
///     .header("content-type", "application/x-www-form-urlencoded")
///     .body("a=1&b=test")
///     .build();
///
/// let schema = object().field("a", number().coerce()).field("b", string());
/// let value: Value = parse_form(event, schema).await.unwrap();
///
/// assert_eq!(value, json!({ "a": 1, "b": "test" }));
/// # }
/// ```
pub async fn parse_form<T: DeserializeOwned>(
    source: impl Into<FormSource>,
    schema: impl Into<SchemaDescriptor>,
) -> Result<T, ExtractError> {
    let schema = schema.into();
    let params = normalize(source.into()).await?;
    validate_params(ExtractionSource::Form, &params, schema)
}

/// Parses form fields, returning validation failures as data.
///
/// Body read and decode failures are still returned as errors.
pub async fn safe_parse_form<T: DeserializeOwned>(
    source: impl Into<FormSource>,
    schema: impl Into<SchemaDescriptor>,
) -> Result<SafeParse<T>, ExtractError> {
    let schema = schema.into();
    let params = normalize(source.into()).await?;
    safe_validate_params(ExtractionSource::Form, &params, schema)
}
