//! Validation issues and error flattening.
//!
//! Every problem a schema finds is recorded as an [`Issue`] carrying the
//! path of the offending value. A failed parse returns all of them wrapped in
//! a [`ValidationError`], which can be flattened into the field-keyed message
//! map that HTTP error payloads expose.

use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// One step in the path to a value inside the validated input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum PathSegment {
    /// Object key
    Key(String),
    /// Array index
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => write!(f, "{key}"),
            Self::Index(index) => write!(f, "{index}"),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// Path from the root of the input to a value.
///
/// Displays in dotted form, e.g. `tags.1`. The root path is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct FieldPath(Vec<PathSegment>);

impl FieldPath {
    /// Creates an empty (root) path.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Returns true for the root path.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the first segment, which names the top-level field.
    #[must_use]
    pub fn first(&self) -> Option<&PathSegment> {
        self.0.first()
    }

    /// Returns the segments of the path.
    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }
}

impl From<Vec<PathSegment>> for FieldPath {
    fn from(segments: Vec<PathSegment>) -> Self {
        Self(segments)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

/// Kind of validation issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
    /// A required value is absent
    Required,
    /// The value has the wrong type, or could not be coerced
    InvalidType,
    /// A lower bound (length, magnitude) was violated
    TooSmall,
    /// An upper bound (length, magnitude) was violated
    TooBig,
    /// The value is not one of the allowed options
    InvalidEnumValue,
    /// A strict object received keys it does not declare
    UnrecognizedKeys,
    /// Anything else
    Custom,
}

impl IssueCode {
    /// Returns the code as a stable string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::InvalidType => "invalid_type",
            Self::TooSmall => "too_small",
            Self::TooBig => "too_big",
            Self::InvalidEnumValue => "invalid_enum_value",
            Self::UnrecognizedKeys => "unrecognized_keys",
            Self::Custom => "custom",
        }
    }
}

/// A single validation problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    /// What went wrong.
    pub code: IssueCode,
    /// Where it went wrong.
    pub path: FieldPath,
    /// Human-readable message.
    pub message: String,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_root() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// Error returned when input does not satisfy a schema.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use veritas_schema::{number, object, Schema};
///
/// let schema = object().field("a", number().coerce());
/// let err = schema.safe_parse(&json!({ "a": "test" })).unwrap_err();
///
/// let flat = err.flatten();
/// assert_eq!(flat.field_errors["a"], vec!["Expected number, received nan"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", summarize(.issues))]
pub struct ValidationError {
    issues: Vec<Issue>,
}

fn summarize(issues: &[Issue]) -> String {
    let parts: Vec<String> = issues.iter().map(ToString::to_string).collect();
    format!("validation failed: {}", parts.join("; "))
}

impl ValidationError {
    /// Creates an error from the collected issues.
    #[must_use]
    pub fn new(issues: Vec<Issue>) -> Self {
        Self { issues }
    }

    /// Returns all issues in the order they were found.
    #[must_use]
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    /// Consumes the error and returns its issues.
    #[must_use]
    pub fn into_issues(self) -> Vec<Issue> {
        self.issues
    }

    /// Groups issue messages by top-level field.
    ///
    /// Issues on the root path land in `form_errors`; everything else is
    /// keyed by the first segment of its path, so an error on `tags.1` is
    /// reported under `tags`.
    #[must_use]
    pub fn flatten(&self) -> FlattenedErrors {
        let mut flat = FlattenedErrors::default();
        for issue in &self.issues {
            match issue.path.first() {
                None => flat.form_errors.push(issue.message.clone()),
                Some(segment) => flat
                    .field_errors
                    .entry(segment.to_string())
                    .or_default()
                    .push(issue.message.clone()),
            }
        }
        flat
    }
}

/// Field-keyed view of a [`ValidationError`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FlattenedErrors {
    /// Messages that apply to the input as a whole.
    pub form_errors: Vec<String>,
    /// Messages per top-level field, in the order fields first failed.
    pub field_errors: IndexMap<String, Vec<String>>,
}

impl FlattenedErrors {
    /// Returns true when there are no messages at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.form_errors.is_empty() && self.field_errors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(path: Vec<PathSegment>, message: &str) -> Issue {
        Issue {
            code: IssueCode::Custom,
            path: path.into(),
            message: message.to_string(),
        }
    }

    #[test]
    fn test_path_display() {
        let path = FieldPath::from(vec!["tags".into(), 1.into()]);
        assert_eq!(path.to_string(), "tags.1");
        assert_eq!(FieldPath::root().to_string(), "");
    }

    #[test]
    fn test_flatten_groups_by_first_segment() {
        let err = ValidationError::new(vec![
            issue(vec!["a".into()], "first"),
            issue(vec!["tags".into(), 0.into()], "bad tag"),
            issue(vec!["a".into()], "second"),
        ]);

        let flat = err.flatten();
        assert!(flat.form_errors.is_empty());
        assert_eq!(flat.field_errors["a"], vec!["first", "second"]);
        assert_eq!(flat.field_errors["tags"], vec!["bad tag"]);

        let keys: Vec<_> = flat.field_errors.keys().collect();
        assert_eq!(keys, vec!["a", "tags"]);
    }

    #[test]
    fn test_flatten_root_issues() {
        let err = ValidationError::new(vec![issue(vec![], "Unrecognized key(s) in object: 'x'")]);
        let flat = err.flatten();

        assert_eq!(flat.form_errors, vec!["Unrecognized key(s) in object: 'x'"]);
        assert!(flat.field_errors.is_empty());
        assert!(!flat.is_empty());
    }

    #[test]
    fn test_error_display() {
        let err = ValidationError::new(vec![
            issue(vec!["a".into()], "Required"),
            issue(vec![], "oops"),
        ]);
        assert_eq!(err.to_string(), "validation failed: a: Required; oops");
    }

    #[test]
    fn test_issue_code_as_str() {
        assert_eq!(IssueCode::Required.as_str(), "required");
        assert_eq!(IssueCode::InvalidEnumValue.as_str(), "invalid_enum_value");
    }
}
