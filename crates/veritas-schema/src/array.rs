//! Array schema.

use crate::issue::IssueCode;
use crate::schema::{ParseContext, Schema};
use serde_json::Value;
use std::sync::Arc;

/// Creates an array schema whose elements must satisfy `item`.
pub fn array(item: impl Schema + 'static) -> ArraySchema {
    ArraySchema {
        item: Arc::new(item),
        min_len: None,
        max_len: None,
        accept_single: false,
    }
}

/// Schema for sequences of values.
///
/// Request parameters only become sequences when a key repeats, so a field
/// that may appear once or many times should use
/// [`accept_single`](ArraySchema::accept_single).
#[derive(Debug, Clone)]
pub struct ArraySchema {
    item: Arc<dyn Schema>,
    min_len: Option<usize>,
    max_len: Option<usize>,
    accept_single: bool,
}

impl ArraySchema {
    /// Requires at least `len` elements.
    #[must_use]
    pub fn min_len(mut self, len: usize) -> Self {
        self.min_len = Some(len);
        self
    }

    /// Allows at most `len` elements.
    #[must_use]
    pub fn max_len(mut self, len: usize) -> Self {
        self.max_len = Some(len);
        self
    }

    /// Treats a lone scalar as a one-element array.
    #[must_use]
    pub fn accept_single(mut self) -> Self {
        self.accept_single = true;
        self
    }
}

impl Schema for ArraySchema {
    fn validate(&self, input: Option<&Value>, ctx: &mut ParseContext) -> Option<Value> {
        let input = ctx.require(input)?;
        let items: &[Value] = match input {
            Value::Array(items) => items,
            Value::Object(_) => {
                ctx.invalid_type("array", input);
                return None;
            }
            scalar if self.accept_single => std::slice::from_ref(scalar),
            other => {
                ctx.invalid_type("array", other);
                return None;
            }
        };

        let before = ctx.issue_count();
        let parsed: Vec<Option<Value>> = items
            .iter()
            .enumerate()
            .map(|(index, item)| ctx.with_segment(index, |ctx| self.item.validate(Some(item), ctx)))
            .collect();

        if let Some(min) = self.min_len.filter(|min| items.len() < *min) {
            ctx.add_issue(
                IssueCode::TooSmall,
                format!("Array must contain at least {min} element(s)"),
            );
        }
        if let Some(max) = self.max_len.filter(|max| items.len() > *max) {
            ctx.add_issue(
                IssueCode::TooBig,
                format!("Array must contain at most {max} element(s)"),
            );
        }

        if ctx.issue_count() != before {
            return None;
        }
        // Absent elements come only from optional item schemas.
        Some(Value::Array(parsed.into_iter().flatten().collect()))
    }
}
