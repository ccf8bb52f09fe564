//! Wrappers that change how absent values are treated.

use crate::schema::{ParseContext, Schema};
use serde_json::Value;
use std::sync::Arc;

/// Accepts an absent value; otherwise defers to the inner schema.
#[derive(Debug, Clone)]
pub struct OptionalSchema {
    inner: Arc<dyn Schema>,
}

impl OptionalSchema {
    /// Wraps `inner`.
    pub fn new(inner: impl Schema + 'static) -> Self {
        Self {
            inner: Arc::new(inner),
        }
    }
}

impl Schema for OptionalSchema {
    fn validate(&self, input: Option<&Value>, ctx: &mut ParseContext) -> Option<Value> {
        input.and_then(|value| self.inner.validate(Some(value), ctx))
    }
}

/// Substitutes a default when the value is absent.
///
/// The default is not validated against the inner schema.
#[derive(Debug, Clone)]
pub struct DefaultSchema {
    inner: Arc<dyn Schema>,
    default: Value,
}

impl DefaultSchema {
    /// Wraps `inner` with `default`.
    pub fn new(inner: impl Schema + 'static, default: impl Into<Value>) -> Self {
        Self {
            inner: Arc::new(inner),
            default: default.into(),
        }
    }
}

impl Schema for DefaultSchema {
    fn validate(&self, input: Option<&Value>, ctx: &mut ParseContext) -> Option<Value> {
        match input {
            Some(value) => self.inner.validate(Some(value), ctx),
            None => Some(self.default.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{number, string, ParseContext, Schema, SchemaExt};
    use serde_json::json;

    #[test]
    fn test_optional_absent() {
        let schema = string().optional();
        let mut ctx = ParseContext::new();

        assert_eq!(schema.validate(None, &mut ctx), None);
        assert_eq!(ctx.issue_count(), 0);
    }

    #[test]
    fn test_optional_present_still_validated() {
        let schema = number().coerce().optional();
        assert_eq!(schema.safe_parse(&json!("4")).unwrap(), json!(4));
        assert!(schema.safe_parse(&json!("four")).is_err());
    }

    #[test]
    fn test_default_value() {
        let schema = number().coerce().default_value(20);
        let mut ctx = ParseContext::new();

        assert_eq!(schema.validate(None, &mut ctx), Some(json!(20)));
        assert_eq!(schema.safe_parse(&json!("5")).unwrap(), json!(5));
    }
}
