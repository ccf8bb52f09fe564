//! Scalar schemas: strings, numbers, booleans and string enums.

use crate::issue::IssueCode;
use crate::schema::{ParseContext, Schema};
use serde_json::{Number, Value};

/// Largest integer magnitude an `f64` represents exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Creates a string schema.
#[must_use]
pub fn string() -> StringSchema {
    StringSchema::default()
}

/// Creates a number schema.
#[must_use]
pub fn number() -> NumberSchema {
    NumberSchema::default()
}

/// Creates a boolean schema.
#[must_use]
pub fn boolean() -> BooleanSchema {
    BooleanSchema::default()
}

/// Creates a schema accepting exactly one of `values`.
#[must_use]
pub fn enumeration<I, S>(values: I) -> EnumSchema
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    EnumSchema {
        values: values.into_iter().map(Into::into).collect(),
    }
}

/// Schema for string values.
#[derive(Debug, Clone, Default)]
pub struct StringSchema {
    min_len: Option<usize>,
    max_len: Option<usize>,
    trim: bool,
}

impl StringSchema {
    /// Requires at least `len` characters.
    #[must_use]
    pub fn min_len(mut self, len: usize) -> Self {
        self.min_len = Some(len);
        self
    }

    /// Allows at most `len` characters.
    #[must_use]
    pub fn max_len(mut self, len: usize) -> Self {
        self.max_len = Some(len);
        self
    }

    /// Rejects the empty string.
    #[must_use]
    pub fn non_empty(self) -> Self {
        self.min_len(1)
    }

    /// Trims surrounding whitespace before the length checks.
    #[must_use]
    pub fn trim(mut self) -> Self {
        self.trim = true;
        self
    }
}

impl Schema for StringSchema {
    fn validate(&self, input: Option<&Value>, ctx: &mut ParseContext) -> Option<Value> {
        let input = ctx.require(input)?;
        let Some(raw) = input.as_str() else {
            ctx.invalid_type("string", input);
            return None;
        };

        let value = if self.trim { raw.trim() } else { raw };
        let len = value.chars().count();
        let before = ctx.issue_count();

        if let Some(min) = self.min_len.filter(|min| len < *min) {
            ctx.add_issue(
                IssueCode::TooSmall,
                format!("String must contain at least {min} character(s)"),
            );
        }
        if let Some(max) = self.max_len.filter(|max| len > *max) {
            ctx.add_issue(
                IssueCode::TooBig,
                format!("String must contain at most {max} character(s)"),
            );
        }

        (ctx.issue_count() == before).then(|| Value::String(value.to_string()))
    }
}

/// Schema for numeric values.
///
/// With [`coerce`](NumberSchema::coerce), strings are parsed as decimal
/// numbers; anything that does not parse is reported as
/// `Expected number, received nan`.
#[derive(Debug, Clone, Default)]
pub struct NumberSchema {
    coerce: bool,
    int: bool,
    positive: bool,
    min: Option<f64>,
    max: Option<f64>,
}

impl NumberSchema {
    /// Converts strings and booleans to numbers before validating.
    #[must_use]
    pub fn coerce(mut self) -> Self {
        self.coerce = true;
        self
    }

    /// Requires an integral value.
    #[must_use]
    pub fn int(mut self) -> Self {
        self.int = true;
        self
    }

    /// Requires a value greater than or equal to `min`.
    #[must_use]
    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    /// Requires a value less than or equal to `max`.
    #[must_use]
    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    /// Requires a value greater than zero.
    #[must_use]
    pub fn positive(mut self) -> Self {
        self.positive = true;
        self
    }

    fn coerce_value(value: &Value) -> Option<f64> {
        match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => parse_decimal(s),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }
}

impl Schema for NumberSchema {
    fn validate(&self, input: Option<&Value>, ctx: &mut ParseContext) -> Option<Value> {
        let input = ctx.require(input)?;

        let number = if self.coerce {
            match Self::coerce_value(input) {
                Some(n) => n,
                None => {
                    ctx.invalid_type_named("number", "nan");
                    return None;
                }
            }
        } else {
            match input.as_f64() {
                Some(n) => n,
                None => {
                    ctx.invalid_type("number", input);
                    return None;
                }
            }
        };

        if self.int && number.fract() != 0.0 {
            ctx.invalid_type_named("integer", "float");
            return None;
        }

        let before = ctx.issue_count();
        if self.positive && number <= 0.0 {
            ctx.add_issue(IssueCode::TooSmall, "Number must be greater than 0");
        }
        if let Some(min) = self.min.filter(|min| number < *min) {
            ctx.add_issue(
                IssueCode::TooSmall,
                format!("Number must be greater than or equal to {min}"),
            );
        }
        if let Some(max) = self.max.filter(|max| number > *max) {
            ctx.add_issue(
                IssueCode::TooBig,
                format!("Number must be less than or equal to {max}"),
            );
        }
        if ctx.issue_count() != before {
            return None;
        }

        if input.is_number() {
            Some(input.clone())
        } else {
            number_value(number)
        }
    }
}

/// Parses a decimal number the way form inputs are written.
///
/// Surrounding whitespace is ignored. Empty strings and non-finite results
/// are rejected.
fn parse_decimal(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Emits integral values as JSON integers so they deserialize into integer
/// fields.
fn number_value(n: f64) -> Option<Value> {
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        Some(Value::from(n as i64))
    } else {
        Number::from_f64(n).map(Value::Number)
    }
}

/// Schema for boolean values.
///
/// With [`coerce`](BooleanSchema::coerce), the strings `true`, `1`, `on`,
/// `yes` and `false`, `0`, `off`, `no` are accepted (case-insensitive).
#[derive(Debug, Clone, Default)]
pub struct BooleanSchema {
    coerce: bool,
}

impl BooleanSchema {
    /// Accepts common textual spellings of booleans.
    #[must_use]
    pub fn coerce(mut self) -> Self {
        self.coerce = true;
        self
    }
}

impl Schema for BooleanSchema {
    fn validate(&self, input: Option<&Value>, ctx: &mut ParseContext) -> Option<Value> {
        let input = ctx.require(input)?;
        let parsed = match input {
            Value::Bool(b) => Some(*b),
            Value::String(s) if self.coerce => parse_bool(s),
            _ => None,
        };

        if parsed.is_none() {
            ctx.invalid_type("boolean", input);
        }
        parsed.map(Value::Bool)
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "on" | "yes" => Some(true),
        "false" | "0" | "off" | "no" => Some(false),
        _ => None,
    }
}

/// Schema accepting one of a fixed set of strings.
#[derive(Debug, Clone)]
pub struct EnumSchema {
    values: Vec<String>,
}

impl EnumSchema {
    /// Returns the allowed values.
    #[must_use]
    pub fn values(&self) -> &[String] {
        &self.values
    }

    fn expected(&self) -> String {
        self.values
            .iter()
            .map(|v| format!("'{v}'"))
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

impl Schema for EnumSchema {
    fn validate(&self, input: Option<&Value>, ctx: &mut ParseContext) -> Option<Value> {
        let input = ctx.require(input)?;
        let Some(raw) = input.as_str() else {
            let expected = self.expected();
            ctx.invalid_type(&expected, input);
            return None;
        };

        if self.values.iter().any(|v| v == raw) {
            Some(input.clone())
        } else {
            ctx.add_issue(
                IssueCode::InvalidEnumValue,
                format!(
                    "Invalid enum value. Expected {}, received '{raw}'",
                    self.expected()
                ),
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn first_message(schema: &dyn Schema, input: &Value) -> String {
        schema.safe_parse(input).unwrap_err().issues()[0]
            .message
            .clone()
    }

    #[test]
    fn test_string_accepts_strings() {
        assert_eq!(string().safe_parse(&json!("test")).unwrap(), json!("test"));
    }

    #[test]
    fn test_string_rejects_other_types() {
        assert_eq!(
            first_message(&string(), &json!(["a", "b"])),
            "Expected string, received array"
        );
        assert_eq!(
            first_message(&string(), &json!(5)),
            "Expected string, received number"
        );
    }

    #[test]
    fn test_string_length_bounds() {
        let schema = string().min_len(2).max_len(4);
        assert!(schema.safe_parse(&json!("abc")).is_ok());
        assert_eq!(
            first_message(&schema, &json!("a")),
            "String must contain at least 2 character(s)"
        );
        assert_eq!(
            first_message(&schema, &json!("abcde")),
            "String must contain at most 4 character(s)"
        );
    }

    #[test]
    fn test_string_trim() {
        let schema = string().trim().non_empty();
        assert_eq!(schema.safe_parse(&json!("  hi ")).unwrap(), json!("hi"));
        assert!(schema.safe_parse(&json!("   ")).is_err());
    }

    #[test]
    fn test_number_coerces_strings() {
        let schema = number().coerce();
        assert_eq!(schema.safe_parse(&json!("1")).unwrap(), json!(1));
        assert_eq!(schema.safe_parse(&json!(" 2.5 ")).unwrap(), json!(2.5));
        assert_eq!(schema.safe_parse(&json!("-3")).unwrap(), json!(-3));
    }

    #[test]
    fn test_number_coercion_failure_is_nan() {
        let schema = number().coerce();
        for input in [json!("test"), json!(""), json!(["1", "2"]), json!("NaN"), json!("inf")] {
            assert_eq!(first_message(&schema, &input), "Expected number, received nan");
        }
    }

    #[test]
    fn test_number_without_coercion() {
        assert_eq!(number().safe_parse(&json!(7)).unwrap(), json!(7));
        assert_eq!(
            first_message(&number(), &json!("7")),
            "Expected number, received string"
        );
    }

    #[test]
    fn test_number_int_and_bounds() {
        let schema = number().coerce().int().min(1.0).max(10.0);
        assert_eq!(schema.safe_parse(&json!("5")).unwrap(), json!(5));
        assert_eq!(
            first_message(&schema, &json!("1.5")),
            "Expected integer, received float"
        );
        assert_eq!(
            first_message(&schema, &json!("0")),
            "Number must be greater than or equal to 1"
        );
        assert_eq!(
            first_message(&schema, &json!("11")),
            "Number must be less than or equal to 10"
        );
    }

    #[test]
    fn test_number_positive() {
        assert!(number().positive().safe_parse(&json!(0)).is_err());
        assert!(number().positive().safe_parse(&json!(3)).is_ok());
        assert!(number().positive().safe_parse(&json!(0.5)).is_ok());
    }

    #[test]
    fn test_boolean_coercion() {
        let schema = boolean().coerce();
        assert_eq!(schema.safe_parse(&json!("true")).unwrap(), json!(true));
        assert_eq!(schema.safe_parse(&json!("OFF")).unwrap(), json!(false));
        assert_eq!(schema.safe_parse(&json!("1")).unwrap(), json!(true));
        assert_eq!(
            first_message(&schema, &json!("maybe")),
            "Expected boolean, received string"
        );
    }

    #[test]
    fn test_boolean_without_coercion() {
        assert_eq!(boolean().safe_parse(&json!(false)).unwrap(), json!(false));
        assert!(boolean().safe_parse(&json!("false")).is_err());
    }

    #[test]
    fn test_enum() {
        let schema = enumeration(["asc", "desc"]);
        assert_eq!(schema.values(), ["asc", "desc"]);
        assert_eq!(schema.safe_parse(&json!("asc")).unwrap(), json!("asc"));
        assert_eq!(
            first_message(&schema, &json!("up")),
            "Invalid enum value. Expected 'asc' | 'desc', received 'up'"
        );
        assert_eq!(
            first_message(&schema, &json!(1)),
            "Expected 'asc' | 'desc', received number"
        );
    }

    #[test]
    fn test_absent_value_is_required() {
        let err = string().validate(None, &mut ParseContext::new());
        assert!(err.is_none());

        let mut ctx = ParseContext::new();
        let _ = number().validate(None, &mut ctx);
        let err = ctx.finish(None).unwrap_err();
        assert_eq!(err.issues()[0].message, "Required");
    }
}
