//! Form validation and sanitization primitives shared by the catalog
//! modules.
//!
//! Pure transforms: raw optional strings in, trimmed/escaped or typed values
//! out, with one `{field, message}` error per violated rule.

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use stacks_http::views::escape_html;

/// A single field validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Accumulated validation failures for one form submission.
#[derive(Debug, Default, Serialize)]
pub struct FormErrors(Vec<FieldError>);

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }
}

/// Trim and HTML-escape a raw text field. Absent fields sanitize to "".
pub fn sanitize_text(raw: &Option<String>) -> String {
    escape_html(raw.as_deref().unwrap_or("").trim())
}

/// Sanitize a required text field, recording `message` when it is absent or
/// empty after trimming.
pub fn required_text(
    errors: &mut FormErrors,
    field: &'static str,
    raw: &Option<String>,
    message: &str,
) -> String {
    let value = sanitize_text(raw);
    if value.is_empty() {
        errors.push(field, message);
    }
    value
}

/// Sanitize an optional text field, mapping empty to `None`.
pub fn optional_text(raw: &Option<String>) -> Option<String> {
    let value = sanitize_text(raw);
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Parse an optional ISO-8601 date field.
///
/// Absent or empty values are skipped without error and normalize to `None`,
/// so insert-time defaults still apply downstream. Present but unparsable
/// values record "Invalid date".
pub fn optional_date(
    errors: &mut FormErrors,
    field: &'static str,
    raw: &Option<String>,
) -> Option<NaiveDate> {
    let trimmed = raw.as_deref().unwrap_or("").trim();
    if trimmed.is_empty() {
        return None;
    }

    match NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            errors.push(field, "Invalid date");
            None
        }
    }
}

/// Parse a required entity reference, recording `message` when the field is
/// absent, empty, or not a well-formed id.
pub fn required_id(
    errors: &mut FormErrors,
    field: &'static str,
    raw: &Option<String>,
    message: &str,
) -> Option<Uuid> {
    let trimmed = raw.as_deref().unwrap_or("").trim();
    if trimmed.is_empty() {
        errors.push(field, message);
        return None;
    }

    match Uuid::parse_str(trimmed) {
        Ok(id) => Some(id),
        Err(_) => {
            errors.push(field, message);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_text_trims_escapes_and_flags_empty() {
        let mut errors = FormErrors::new();

        let value = required_text(
            &mut errors,
            "imprint",
            &Some("  Foreign & Co.  ".to_string()),
            "Imprint must be specified",
        );
        assert_eq!(value, "Foreign &amp; Co.");
        assert!(errors.is_empty());

        let value = required_text(
            &mut errors,
            "imprint",
            &Some("   ".to_string()),
            "Imprint must be specified",
        );
        assert_eq!(value, "");
        assert_eq!(errors.errors().len(), 1);
        assert_eq!(errors.errors()[0].message, "Imprint must be specified");

        required_text(&mut errors, "imprint", &None, "Imprint must be specified");
        assert_eq!(errors.errors().len(), 2);
    }

    #[test]
    fn optional_date_skips_empty_and_flags_garbage() {
        let mut errors = FormErrors::new();

        assert_eq!(optional_date(&mut errors, "due_back", &None), None);
        assert_eq!(
            optional_date(&mut errors, "due_back", &Some("".to_string())),
            None
        );
        assert!(errors.is_empty());

        let parsed = optional_date(&mut errors, "due_back", &Some("2024-03-01".to_string()));
        assert_eq!(parsed, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert!(errors.is_empty());

        let parsed = optional_date(&mut errors, "due_back", &Some("yesterday".to_string()));
        assert_eq!(parsed, None);
        assert_eq!(errors.errors()[0].message, "Invalid date");
    }

    #[test]
    fn required_id_rejects_missing_and_malformed() {
        let mut errors = FormErrors::new();

        let id = Uuid::now_v7();
        let parsed = required_id(
            &mut errors,
            "book",
            &Some(id.to_string()),
            "Book must be specified",
        );
        assert_eq!(parsed, Some(id));
        assert!(errors.is_empty());

        assert!(required_id(&mut errors, "book", &None, "Book must be specified").is_none());
        assert!(
            required_id(
                &mut errors,
                "book",
                &Some("not-a-uuid".to_string()),
                "Book must be specified"
            )
            .is_none()
        );
        assert_eq!(errors.errors().len(), 2);
    }

    #[test]
    fn optional_text_maps_blank_to_none() {
        assert_eq!(optional_text(&Some("  ".to_string())), None);
        assert_eq!(optional_text(&None), None);
        assert_eq!(
            optional_text(&Some(" 978-0-13-468599-1 ".to_string())),
            Some("978-0-13-468599-1".to_string())
        );
    }
}
