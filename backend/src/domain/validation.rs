//! Field validation shared by domain constructors.
//!
//! Constructors return [`ValidationError`] so adapters can surface the
//! offending field and a stable code without parsing messages.

use serde_json::json;

use super::Error;

/// Reason a field failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationReason {
    /// The value was absent or blank once trimmed.
    Empty,
    /// The value exceeded the maximum permitted character count.
    TooLong { max: usize },
    /// The value did not have the expected shape.
    Malformed,
    /// A count was negative.
    Negative,
}

impl ValidationReason {
    /// Stable machine-readable code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::TooLong { .. } => "too_long",
            Self::Malformed => "malformed",
            Self::Negative => "negative",
        }
    }
}

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", describe(self.field, self.reason))]
pub struct ValidationError {
    field: &'static str,
    reason: ValidationReason,
}

fn describe(field: &str, reason: ValidationReason) -> String {
    match reason {
        ValidationReason::Empty => format!("{field} must not be empty"),
        ValidationReason::TooLong { max } => format!("{field} must be at most {max} characters"),
        ValidationReason::Malformed => format!("{field} is malformed"),
        ValidationReason::Negative => format!("{field} must not be negative"),
    }
}

impl ValidationError {
    /// Build a failure for `field`.
    #[must_use]
    pub const fn new(field: &'static str, reason: ValidationReason) -> Self {
        Self { field, reason }
    }

    /// Name of the offending field as exposed to API callers.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        self.field
    }

    /// Why the field was rejected.
    #[must_use]
    pub const fn reason(&self) -> ValidationReason {
        self.reason
    }
}

impl From<ValidationError> for Error {
    fn from(value: ValidationError) -> Self {
        Self::invalid_request(value.to_string()).with_details(json!({
            "field": value.field,
            "code": value.reason.code(),
        }))
    }
}

/// Trim `raw` and enforce a non-empty value of at most `max` characters.
pub(crate) fn required_text(
    field: &'static str,
    raw: &str,
    max: usize,
) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new(field, ValidationReason::Empty));
    }
    if trimmed.chars().count() > max {
        return Err(ValidationError::new(field, ValidationReason::TooLong { max }));
    }
    Ok(trimmed.to_owned())
}

/// Like [`required_text`] but maps blank input to `None`.
pub(crate) fn optional_text(
    field: &'static str,
    raw: Option<&str>,
    max: usize,
) -> Result<Option<String>, ValidationError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => required_text(field, value, max).map(Some),
    }
}

/// Convert a signed count from an adapter into an unsigned domain count.
pub(crate) fn non_negative(field: &'static str, raw: i64) -> Result<u32, ValidationError> {
    if raw < 0 {
        return Err(ValidationError::new(field, ValidationReason::Negative));
    }
    u32::try_from(raw).map_err(|_| ValidationError::new(field, ValidationReason::Malformed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case("  Ada ", Ok("Ada".to_owned()))]
    #[case("   ", Err(ValidationReason::Empty))]
    #[case("abcdef", Err(ValidationReason::TooLong { max: 5 }))]
    fn required_text_trims_and_bounds(
        #[case] raw: &str,
        #[case] expected: Result<String, ValidationReason>,
    ) {
        let result = required_text("name", raw, 5).map_err(|err| err.reason());
        assert_eq!(result, expected);
    }

    #[rstest]
    fn optional_text_treats_blank_as_absent() {
        assert_eq!(optional_text("unit", Some("  "), 10), Ok(None));
        assert_eq!(optional_text("unit", None, 10), Ok(None));
    }

    #[rstest]
    #[case(-1, Err(ValidationReason::Negative))]
    #[case(0, Ok(0))]
    #[case(42, Ok(42))]
    #[case(i64::MAX, Err(ValidationReason::Malformed))]
    fn non_negative_rejects_negative_and_overflow(
        #[case] raw: i64,
        #[case] expected: Result<u32, ValidationReason>,
    ) {
        assert_eq!(
            non_negative("quantity", raw).map_err(|err| err.reason()),
            expected
        );
    }

    #[rstest]
    fn converts_into_invalid_request_with_details() {
        let error: Error = ValidationError::new("email", ValidationReason::Malformed).into();
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        assert_eq!(error.message(), "email is malformed");
        let details = error.details().expect("details attached");
        assert_eq!(details["field"], "email");
        assert_eq!(details["code"], "malformed");
    }
}
