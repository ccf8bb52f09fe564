//! # Veritas Schema
//!
//! Declarative schemas for validating and coercing untyped request data.
//!
//! Request parameters arrive as strings (or sequences of strings when a key
//! repeats). A schema describes the shape the handler expects, coerces where
//! asked to, and reports every problem it finds with the path of the
//! offending value.
//!
//! ## Schemas
//!
//! | Constructor | Accepts |
//! |-------------|---------|
//! | [`string()`] | Strings, with optional length bounds |
//! | [`number()`] | Numbers; strings too with `.coerce()` |
//! | [`boolean()`] | Booleans; `true`/`false`/`on`/`off`/... with `.coerce()` |
//! | [`enumeration()`] | One of a fixed set of strings |
//! | [`array()`] | Sequences of an item schema |
//! | [`object()`] | Objects with named fields |
//!
//! Any schema can be made `.optional()` or given a `.default_value(..)` via
//! [`SchemaExt`].
//!
//! ## Example
//!
//! ```rust
//! use serde_json::json;
//! use veritas_schema::{number, object, string, Schema};
//!
//! let schema = object()
//!     .field("a", number().coerce())
//!     .field("b", string());
//!
//! assert_eq!(
//!     schema.safe_parse(&json!({ "a": "1", "b": "test" })).unwrap(),
//!     json!({ "a": 1, "b": "test" }),
//! );
//!
//! let err = schema.safe_parse(&json!({ "a": "test", "b": "test" })).unwrap_err();
//! assert_eq!(
//!     err.flatten().field_errors["a"],
//!     vec!["Expected number, received nan"],
//! );
//! ```

#![doc(html_root_url = "https://docs.rs/veritas-schema/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod array;
mod descriptor;
mod issue;
mod modifiers;
mod object;
mod primitives;
mod schema;

pub use array::{array, ArraySchema};
pub use descriptor::{FieldMap, SchemaDescriptor};
pub use issue::{FieldPath, FlattenedErrors, Issue, IssueCode, PathSegment, ValidationError};
pub use modifiers::{DefaultSchema, OptionalSchema};
pub use object::{object, ObjectSchema, UnknownKeys};
pub use primitives::{
    boolean, enumeration, number, string, BooleanSchema, EnumSchema, NumberSchema, StringSchema,
};
pub use schema::{received_type, ParseContext, Schema, SchemaExt};

// Re-export the value type schemas operate on
pub use serde_json::Value;
