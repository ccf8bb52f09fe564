//! Schema adapter.
//!
//! Callers may hand the extractors either a ready-made schema or a plain
//! mapping of field names to field schemas. [`SchemaDescriptor`] captures
//! both shapes and [`SchemaDescriptor::into_schema`] resolves them, once, to
//! a single schema.

use crate::array::ArraySchema;
use crate::modifiers::{DefaultSchema, OptionalSchema};
use crate::object::ObjectSchema;
use crate::primitives::{BooleanSchema, EnumSchema, NumberSchema, StringSchema};
use crate::schema::Schema;
use indexmap::IndexMap;
use std::sync::Arc;

/// Either a schema instance or a mapping of field schemas.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use veritas_schema::{number, object, string, FieldMap, SchemaDescriptor};
///
/// let from_schema: SchemaDescriptor = object()
///     .field("a", number().coerce())
///     .field("b", string())
///     .into();
///
/// let from_fields: SchemaDescriptor = FieldMap::new()
///     .field("a", number().coerce())
///     .field("b", string())
///     .into();
///
/// let input = json!({ "a": "1", "b": "test" });
/// assert_eq!(
///     from_schema.into_schema().safe_parse(&input).unwrap(),
///     from_fields.into_schema().safe_parse(&input).unwrap(),
/// );
/// ```
#[derive(Debug, Clone)]
pub enum SchemaDescriptor {
    /// A ready-made schema, used as is.
    Schema(Arc<dyn Schema>),
    /// Field schemas to be wrapped in an object schema.
    Fields(FieldMap),
}

impl SchemaDescriptor {
    /// Returns true if this is already a schema instance.
    #[must_use]
    pub fn is_schema(&self) -> bool {
        matches!(self, Self::Schema(_))
    }

    /// Resolves the descriptor to a single schema.
    ///
    /// A field mapping becomes an [`ObjectSchema`] with exactly those fields,
    /// in the order given.
    #[must_use]
    pub fn into_schema(self) -> Arc<dyn Schema> {
        match self {
            Self::Schema(schema) => schema,
            Self::Fields(fields) => Arc::new(ObjectSchema::from_fields(fields.0)),
        }
    }
}

/// Ordered mapping of field names to field schemas.
#[derive(Debug, Clone, Default)]
pub struct FieldMap(IndexMap<String, Arc<dyn Schema>>);

impl FieldMap {
    /// Creates an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a field.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, schema: impl Schema + 'static) -> Self {
        self.0.insert(name.into(), Arc::new(schema));
        self
    }

    /// Inserts an already shared schema.
    pub fn insert(&mut self, name: impl Into<String>, schema: Arc<dyn Schema>) {
        self.0.insert(name.into(), schema);
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true when the mapping is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the field names in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl FromIterator<(String, Arc<dyn Schema>)> for FieldMap {
    fn from_iter<I: IntoIterator<Item = (String, Arc<dyn Schema>)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<IndexMap<String, Arc<dyn Schema>>> for FieldMap {
    fn from(fields: IndexMap<String, Arc<dyn Schema>>) -> Self {
        Self(fields)
    }
}

impl From<FieldMap> for SchemaDescriptor {
    fn from(fields: FieldMap) -> Self {
        Self::Fields(fields)
    }
}

impl From<IndexMap<String, Arc<dyn Schema>>> for SchemaDescriptor {
    fn from(fields: IndexMap<String, Arc<dyn Schema>>) -> Self {
        Self::Fields(fields.into())
    }
}

impl<const N: usize> From<[(&str, Arc<dyn Schema>); N]> for SchemaDescriptor {
    fn from(fields: [(&str, Arc<dyn Schema>); N]) -> Self {
        Self::Fields(
            fields
                .into_iter()
                .map(|(name, schema)| (name.to_string(), schema))
                .collect(),
        )
    }
}

impl From<Vec<(&str, Arc<dyn Schema>)>> for SchemaDescriptor {
    fn from(fields: Vec<(&str, Arc<dyn Schema>)>) -> Self {
        Self::Fields(
            fields
                .into_iter()
                .map(|(name, schema)| (name.to_string(), schema))
                .collect(),
        )
    }
}

impl From<Arc<dyn Schema>> for SchemaDescriptor {
    fn from(schema: Arc<dyn Schema>) -> Self {
        Self::Schema(schema)
    }
}

macro_rules! impl_descriptor_from_schema {
    ($($schema:ty),* $(,)?) => {
        $(
            impl From<$schema> for SchemaDescriptor {
                fn from(schema: $schema) -> Self {
                    Self::Schema(Arc::new(schema))
                }
            }
        )*
    };
}

impl_descriptor_from_schema!(
    ObjectSchema,
    ArraySchema,
    StringSchema,
    NumberSchema,
    BooleanSchema,
    EnumSchema,
    OptionalSchema,
    DefaultSchema,
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{number, object, string, SchemaExt};
    use serde_json::json;

    #[test]
    fn test_schema_instance_is_unchanged() {
        let schema: Arc<dyn Schema> = object().field("a", string()).shared();
        let descriptor = SchemaDescriptor::from(Arc::clone(&schema));

        assert!(descriptor.is_schema());
        assert!(Arc::ptr_eq(&descriptor.into_schema(), &schema));
    }

    #[test]
    fn test_field_mapping_is_wrapped() {
        let descriptor = SchemaDescriptor::from([
            ("a", number().coerce().shared()),
            ("b", string().shared()),
        ]);
        assert!(!descriptor.is_schema());

        let schema = descriptor.into_schema();
        assert_eq!(
            schema.safe_parse(&json!({"a": "1", "b": "test"})).unwrap(),
            json!({"a": 1, "b": "test"})
        );
    }

    #[test]
    fn test_equivalent_descriptors_report_identical_errors() {
        let input = json!({"a": "test", "b": 1});
        let from_schema = SchemaDescriptor::from(
            object().field("a", number().coerce()).field("b", string()),
        )
        .into_schema()
        .safe_parse(&input)
        .unwrap_err();
        let from_fields = SchemaDescriptor::from(
            FieldMap::new()
                .field("a", number().coerce())
                .field("b", string()),
        )
        .into_schema()
        .safe_parse(&input)
        .unwrap_err();

        assert_eq!(from_schema, from_fields);
    }

    #[test]
    fn test_field_map_preserves_order() {
        let mut fields = FieldMap::new().field("z", string()).field("a", string());
        fields.insert("m", number().shared());

        assert_eq!(fields.keys().collect::<Vec<_>>(), vec!["z", "a", "m"]);
        assert_eq!(fields.len(), 3);
        assert!(!fields.is_empty());
    }

    #[test]
    fn test_from_vec() {
        let descriptor = SchemaDescriptor::from(vec![("q", string().shared())]);
        let value = descriptor.into_schema().safe_parse(&json!({"q": "x"})).unwrap();
        assert_eq!(value, json!({"q": "x"}));
    }
}
