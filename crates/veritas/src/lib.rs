//! # Veritas
//!
//! **Schema-validated extraction of request parameters.**
//!
//! Veritas turns the loosely-typed parts of an HTTP request (query string,
//! form body, route parameters) into validated values, or into a `400`
//! response listing every problem by field.
//!
//! ## Quick Start
//!
//! ```rust
//! use veritas::prelude::*;
//! use serde::Deserialize;
//!
//! #[derive(Debug, Deserialize)]
//! struct Search {
//!     q: String,
//!     page: u32,
//! }
//!
//! let schema = object()
//!     .field("q", string().min_len(1))
//!     .field("page", number().coerce().int().min(1.0).default_value(1));
//!
//! let search: Search = parse_query("?q=rust", schema.clone()).unwrap();
//! assert_eq!(search.page, 1);
//!
//! match safe_parse_query::<Search>("?q=&page=0", schema).unwrap() {
//!     SafeParse::Success(_) => unreachable!(),
//!     SafeParse::Failure(err) => {
//!         assert_eq!(err.errors()["q"], vec!["String must contain at least 1 character(s)"]);
//!         assert_eq!(err.errors()["page"], vec!["Number must be greater than or equal to 1"]);
//!     }
//! }
//! ```
//!
//! ## Crates
//!
//! ```text
//! veritas
//!   ├── schema     schemas, issues, flattened errors, the schema adapter
//!   ├── extract    normalization, sources, parse operations, errors, config
//!   └── telemetry  logging setup
//! ```

#![doc(html_root_url = "https://docs.rs/veritas/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export schema types
pub use veritas_schema as schema;

// Re-export extraction types
pub use veritas_extract as extract;

// Re-export logging setup
pub use veritas_telemetry as telemetry;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust
/// use veritas::prelude::*;
///
/// let mut params = RouteParams::new();
/// params.push("id", "7");
///
/// let fields = FieldMap::new().field("id", number().coerce().int());
/// let value: Value = parse_route(&params, fields).unwrap();
/// assert_eq!(value["id"], 7);
/// ```
pub mod prelude {
    // Schemas and the schema adapter
    pub use veritas_schema::{
        array, boolean, enumeration, number, object, string, FieldMap, Schema, SchemaDescriptor,
        SchemaExt, UnknownKeys, Value,
    };

    // Parse operations
    pub use veritas_extract::{
        parse_form, parse_query, parse_route, safe_parse_form, safe_parse_query,
        safe_parse_route,
    };

    // Inputs
    pub use veritas_extract::{FormData, RequestEvent, RouteParams, SearchParams};

    // Outcomes and errors
    pub use veritas_extract::{ClientError, ExtractError, SafeParse};

    // Configuration and logging
    pub use veritas_extract::{ConfigLoader, ExtractConfig, FormConfig};
    pub use veritas_telemetry::{init_logging, LogConfig};
}

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use serde_json::json;

    #[test]
    fn test_prelude_query() {
        let schema = object()
            .field("a", number().coerce())
            .field("b", string());
        let value: Value = parse_query("?a=1&b=test", schema).unwrap();
        assert_eq!(value, json!({"a": 1, "b": "test"}));
    }

    #[tokio::test]
    async fn test_prelude_form() {
        let data: FormData = [("flag", "on")].into_iter().collect();
        let fields = FieldMap::new().field("flag", boolean().coerce());

        let value: Value = parse_form(data, fields).await.unwrap();
        assert_eq!(value, json!({"flag": true}));
    }

    #[test]
    fn test_module_reexports() {
        let config = crate::extract::FormConfig::default();
        assert_eq!(config.max_fields, crate::extract::DEFAULT_MAX_FIELDS);
        assert!(crate::telemetry::LogConfig::default().json_format);
        assert!(crate::schema::string().safe_parse(&json!("x")).is_ok());
    }
}
