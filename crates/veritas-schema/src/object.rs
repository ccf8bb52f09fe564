//! Object schema built from named field schemas.

use crate::issue::IssueCode;
use crate::schema::{ParseContext, Schema};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Creates an empty object schema.
#[must_use]
pub fn object() -> ObjectSchema {
    ObjectSchema::default()
}

/// What an object schema does with keys it does not declare.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnknownKeys {
    /// Drop them from the output.
    #[default]
    Strip,
    /// Copy them to the output unvalidated.
    Passthrough,
    /// Report them as an issue on the object itself.
    Strict,
}

/// Schema for objects with a fixed set of named fields.
///
/// Fields are validated in declaration order, which keeps issue order (and
/// therefore error payloads) deterministic.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use veritas_schema::{number, object, string, Schema};
///
/// let schema = object()
///     .field("a", number().coerce())
///     .field("b", string());
///
/// let value = schema.safe_parse(&json!({ "a": "1", "b": "test" })).unwrap();
/// assert_eq!(value, json!({ "a": 1, "b": "test" }));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ObjectSchema {
    fields: IndexMap<String, Arc<dyn Schema>>,
    unknown_keys: UnknownKeys,
}

impl ObjectSchema {
    /// Creates an object schema from an existing field mapping.
    #[must_use]
    pub fn from_fields(fields: IndexMap<String, Arc<dyn Schema>>) -> Self {
        Self {
            fields,
            unknown_keys: UnknownKeys::default(),
        }
    }

    /// Adds (or replaces) a field.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, schema: impl Schema + 'static) -> Self {
        self.fields.insert(name.into(), Arc::new(schema));
        self
    }

    /// Keeps undeclared keys in the output.
    #[must_use]
    pub fn passthrough(mut self) -> Self {
        self.unknown_keys = UnknownKeys::Passthrough;
        self
    }

    /// Rejects undeclared keys.
    #[must_use]
    pub fn strict(mut self) -> Self {
        self.unknown_keys = UnknownKeys::Strict;
        self
    }

    /// Returns the policy for undeclared keys.
    #[must_use]
    pub fn unknown_keys(&self) -> UnknownKeys {
        self.unknown_keys
    }

    /// Returns the declared field names in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Returns the schema for a field.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Schema>> {
        self.fields.get(name)
    }

    /// Returns the number of declared fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true when no fields are declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Schema for ObjectSchema {
    fn validate(&self, input: Option<&Value>, ctx: &mut ParseContext) -> Option<Value> {
        let input = ctx.require(input)?;
        let Some(map) = input.as_object() else {
            ctx.invalid_type("object", input);
            return None;
        };

        let before = ctx.issue_count();
        let mut output = Map::new();

        for (name, schema) in &self.fields {
            let parsed = ctx.with_segment(name.as_str(), |ctx| schema.validate(map.get(name), ctx));
            if let Some(value) = parsed {
                output.insert(name.clone(), value);
            }
        }

        let unknown = map.keys().filter(|key| !self.fields.contains_key(*key));
        match self.unknown_keys {
            UnknownKeys::Strip => {}
            UnknownKeys::Passthrough => {
                for key in unknown {
                    output.insert(key.clone(), map[key].clone());
                }
            }
            UnknownKeys::Strict => {
                let keys: Vec<String> = unknown.map(|key| format!("'{key}'")).collect();
                if !keys.is_empty() {
                    ctx.add_issue(
                        IssueCode::UnrecognizedKeys,
                        format!("Unrecognized key(s) in object: {}", keys.join(", ")),
                    );
                }
            }
        }

        (ctx.issue_count() == before).then_some(Value::Object(output))
    }
}
