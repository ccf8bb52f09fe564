//! The core [`Schema`] trait and the context schemas report into.

use crate::issue::{FieldPath, Issue, IssueCode, PathSegment, ValidationError};
use crate::modifiers::{DefaultSchema, OptionalSchema};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// A declarative description of an expected value.
///
/// Schemas validate untyped [`Value`]s and may coerce them (e.g. the string
/// `"1"` into the number `1`). Problems are reported into the
/// [`ParseContext`] rather than returned, so that a single pass collects
/// every issue in the input.
///
/// # Implementing `Schema`
///
/// ```rust
/// use serde_json::Value;
/// use veritas_schema::{IssueCode, ParseContext, Schema};
///
/// #[derive(Debug)]
/// struct Slug;
///
/// impl Schema for Slug {
///     fn validate(&self, input: Option<&Value>, ctx: &mut ParseContext) -> Option<Value> {
///         let input = ctx.require(input)?;
///         match input.as_str() {
///             Some(s) if s.chars().all(|c| c.is_ascii_lowercase() || c == '-') => {
///                 Some(input.clone())
///             }
///             Some(_) => {
///                 ctx.add_issue(IssueCode::Custom, "Invalid slug");
///                 None
///             }
///             None => {
///                 ctx.invalid_type("string", input);
///                 None
///             }
///         }
///     }
/// }
///
/// assert!(Slug.safe_parse(&Value::from("hello-world")).is_ok());
/// assert!(Slug.safe_parse(&Value::from("Hello")).is_err());
/// ```
pub trait Schema: fmt::Debug + Send + Sync {
    /// Validates `input`, returning the parsed value when it is acceptable.
    ///
    /// `None` means the value is absent (e.g. a missing object key). An
    /// implementation that returns `None` for present input must have
    /// recorded at least one issue.
    fn validate(&self, input: Option<&Value>, ctx: &mut ParseContext) -> Option<Value>;

    /// Validates `input` from the root, collecting every issue.
    fn safe_parse(&self, input: &Value) -> Result<Value, ValidationError> {
        let mut ctx = ParseContext::new();
        let value = self.validate(Some(input), &mut ctx);
        if ctx.issue_count() > 0 {
            trace!(issues = ctx.issue_count(), "schema rejected input");
        }
        ctx.finish(value)
    }
}

impl<S: Schema + ?Sized> Schema for Arc<S> {
    fn validate(&self, input: Option<&Value>, ctx: &mut ParseContext) -> Option<Value> {
        (**self).validate(input, ctx)
    }
}

impl<S: Schema + ?Sized> Schema for Box<S> {
    fn validate(&self, input: Option<&Value>, ctx: &mut ParseContext) -> Option<Value> {
        (**self).validate(input, ctx)
    }
}

/// Combinators available on every schema.
pub trait SchemaExt: Schema + Sized + 'static {
    /// Accepts an absent value.
    fn optional(self) -> OptionalSchema {
        OptionalSchema::new(self)
    }

    /// Substitutes `value` when the input is absent.
    fn default_value(self, value: impl Into<Value>) -> DefaultSchema {
        DefaultSchema::new(self, value)
    }

    /// Erases the concrete type for use in field mappings.
    fn shared(self) -> Arc<dyn Schema> {
        Arc::new(self)
    }
}

impl<S: Schema + 'static> SchemaExt for S {}

/// Collects issues while a schema walks its input.
#[derive(Debug, Default)]
pub struct ParseContext {
    path: Vec<PathSegment>,
    issues: Vec<Issue>,
}

impl ParseContext {
    /// Creates a context positioned at the root.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the path of the value currently being validated.
    #[must_use]
    pub fn path(&self) -> &[PathSegment] {
        &self.path
    }

    /// Returns the number of issues recorded so far.
    #[must_use]
    pub fn issue_count(&self) -> usize {
        self.issues.len()
    }

    /// Records an issue at the current path.
    pub fn add_issue(&mut self, code: IssueCode, message: impl Into<String>) {
        self.issues.push(Issue {
            code,
            path: FieldPath::from(self.path.clone()),
            message: message.into(),
        });
    }

    /// Records a type mismatch for `received`.
    pub fn invalid_type(&mut self, expected: &str, received: &Value) {
        self.invalid_type_named(expected, received_type(received));
    }

    /// Records a type mismatch with an explicit received-type name.
    pub fn invalid_type_named(&mut self, expected: &str, received: &str) {
        self.add_issue(
            IssueCode::InvalidType,
            format!("Expected {expected}, received {received}"),
        );
    }

    /// Returns the input if present, otherwise records a `Required` issue.
    pub fn require<'v>(&mut self, input: Option<&'v Value>) -> Option<&'v Value> {
        if input.is_none() {
            self.add_issue(IssueCode::Required, "Required");
        }
        input
    }

    /// Runs `f` with `segment` appended to the current path.
    pub fn with_segment<R>(
        &mut self,
        segment: impl Into<PathSegment>,
        f: impl FnOnce(&mut Self) -> R,
    ) -> R {
        self.path.push(segment.into());
        let result = f(self);
        self.path.pop();
        result
    }

    /// Turns the outcome of a root-level validation into a result.
    ///
    /// An absent root value (an optional schema given nothing) parses to
    /// `null`.
    pub fn finish(self, value: Option<Value>) -> Result<Value, ValidationError> {
        if self.issues.is_empty() {
            Ok(value.unwrap_or(Value::Null))
        } else {
            Err(ValidationError::new(self.issues))
        }
    }
}

/// Returns the name used for a value's type in issue messages.
#[must_use]
pub fn received_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
