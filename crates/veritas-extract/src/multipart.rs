//! `multipart/form-data` decoding.
//!
//! Only text fields are kept; file parts are skipped. Every part counts
//! toward the configured field limit.

use crate::config::FormConfig;
use crate::error::BodyError;
use crate::form::FormData;
use bytes::Bytes;
use std::io;
use tracing::debug;

/// Decodes a buffered multipart body into text fields, in body order.
pub(crate) async fn read_multipart(
    content_type: &str,
    body: Bytes,
    config: &FormConfig,
) -> Result<FormData, BodyError> {
    let boundary = multer::parse_boundary(content_type).map_err(|_| {
        BodyError::Malformed("missing or invalid boundary in multipart Content-Type".into())
    })?;

    let stream = futures_util::stream::once(async move { Ok::<_, io::Error>(body) });
    let mut multipart = multer::Multipart::new(stream, boundary);

    let mut data = FormData::new();
    let mut field_count = 0;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| BodyError::Malformed(format!("multipart parse error: {e}")))?
    {
        field_count += 1;
        if field_count > config.max_fields {
            return Err(BodyError::TooManyFields {
                max: config.max_fields,
            });
        }

        let Some(name) = field.name().map(String::from) else {
            debug!("skipping multipart part without a name");
            continue;
        };

        if let Some(file_name) = field.file_name() {
            debug!(field = %name, file_name = %file_name, "skipping multipart file part");
            continue;
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| BodyError::Malformed(format!("failed to read field '{name}': {e}")))?;

        if bytes.len() > config.max_field_size {
            return Err(BodyError::FieldTooLarge {
                field: name,
                max_size: config.max_field_size,
            });
        }

        let value = String::from_utf8(bytes.to_vec())
            .map_err(|_| BodyError::Malformed(format!("field '{name}' is not valid UTF-8")))?;

        data.append(name, value);
    }

    Ok(data)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const BOUNDARY: &str = "----veritas-boundary";

    /// Builds a multipart body from `(name, filename, data)` parts.
    pub(crate) fn multipart_body(parts: &[(&str, Option<&str>, &[u8])]) -> Vec<u8> {
        let mut body = Vec::new();

        for (name, filename, data) in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());

            if let Some(fname) = filename {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{fname}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n"
                    )
                    .as_bytes(),
                );
            } else {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
            }

            body.extend_from_slice(data);
            body.extend_from_slice(b"\r\n");
        }

        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    pub(crate) fn content_type() -> String {
        format!("multipart/form-data; boundary={BOUNDARY}")
    }

    #[tokio::test]
    async fn test_text_fields_in_order() {
        let body = multipart_body(&[
            ("a", None, b"1"),
            ("b", None, b"test"),
            ("a", None, b"2"),
        ]);

        let data = read_multipart(&content_type(), Bytes::from(body), &FormConfig::default())
            .await
            .unwrap();

        let pairs: Vec<_> = data.iter().collect();
        assert_eq!(pairs, vec![("a", "1"), ("b", "test"), ("a", "2")]);
    }

    #[tokio::test]
    async fn test_file_parts_skipped() {
        let body = multipart_body(&[
            ("name", None, b"alice"),
            ("avatar", Some("me.png"), b"\x89PNG"),
        ]);

        let data = read_multipart(&content_type(), Bytes::from(body), &FormConfig::default())
            .await
            .unwrap();

        assert_eq!(data.len(), 1);
        assert_eq!(data.get("name"), Some("alice"));
        assert_eq!(data.get("avatar"), None);
    }

    #[tokio::test]
    async fn test_too_many_fields() {
        let body = multipart_body(&[("a", None, b"1"), ("b", None, b"2"), ("c", None, b"3")]);
        let config = FormConfig::default().max_fields(2);

        let err = read_multipart(&content_type(), Bytes::from(body), &config)
            .await
            .unwrap_err();
        assert!(matches!(err, BodyError::TooManyFields { max: 2 }));
    }

    #[tokio::test]
    async fn test_field_too_large() {
        let body = multipart_body(&[("bio", None, b"0123456789")]);
        let config = FormConfig::default().max_field_size(4);

        let err = read_multipart(&content_type(), Bytes::from(body), &config)
            .await
            .unwrap_err();
        assert!(matches!(err, BodyError::FieldTooLarge { ref field, max_size: 4 } if field == "bio"));
    }

    #[tokio::test]
    async fn test_missing_boundary() {
        let err = read_multipart("multipart/form-data", Bytes::new(), &FormConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, BodyError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_invalid_utf8() {
        let body = multipart_body(&[("a", None, b"\xff\xfe")]);
        let err = read_multipart(&content_type(), Bytes::from(body), &FormConfig::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not valid UTF-8"));
    }
}
