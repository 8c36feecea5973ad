//! Field and object validation shared by the resource payloads.
//!
//! Each payload collects every problem into a `ValidationErrors` map before
//! failing, so a client sees all bad fields at once.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer};

pub const REQUIRED: &str = "This field is required.";
pub const BLANK: &str = "This field may not be blank.";
pub const NULL: &str = "This field may not be null.";

pub const MIN_SCORE: i64 = 1;
pub const MAX_SCORE: i64 = 5;

/// Per-field error messages keyed by wire field name
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: HashMap<String, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-field shortcut
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    /// Record a problem; the first message for a field wins
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.fields.entry(field.to_string()).or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn into_fields(self) -> HashMap<String, String> {
        self.fields
    }

    /// Ok(value) when nothing was recorded
    pub fn finish<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

/// How a payload is being applied to a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// POST: required fields must be present
    Create,
    /// PUT: required fields must be present, omitted optional fields are kept
    Replace,
    /// PATCH: every field falls back to the stored value
    Partial,
}

impl WriteMode {
    pub fn requires_all(&self) -> bool {
        !matches!(self, WriteMode::Partial)
    }
}

/// Keeps an explicit `null` apart from an omitted field.
///
/// Use with `#[serde(default, deserialize_with = "validation::nullable")]`: omitted
/// is `None`, `null` is `Some(None)`.
pub fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Record NULL for an explicit `null`; otherwise the value, if any
pub fn not_null<T>(errors: &mut ValidationErrors, field: &str, value: Option<Option<T>>) -> Option<T> {
    match value {
        Some(None) => {
            errors.add(field, NULL);
            None
        }
        Some(value) => value,
        None => None,
    }
}

/// Resolve a field from the payload or the stored value, recording REQUIRED when
/// a full write omits it. Returns None only when an error was recorded.
pub fn resolve<T>(
    errors: &mut ValidationErrors,
    field: &str,
    incoming: Option<T>,
    stored: Option<T>,
    mode: WriteMode,
) -> Option<T> {
    match (incoming, mode.requires_all()) {
        (Some(value), _) => Some(value),
        (None, true) => {
            errors.add(field, REQUIRED);
            None
        }
        (None, false) => {
            if stored.is_none() {
                errors.add(field, REQUIRED);
            }
            stored
        }
    }
}

/// Trimmed, non-blank, bounded text
pub fn text(errors: &mut ValidationErrors, field: &str, value: Option<String>, max_len: usize) -> Option<String> {
    let value = value?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.add(field, BLANK);
        return None;
    }
    if trimmed.chars().count() > max_len {
        errors.add(field, format!("Ensure this field has no more than {} characters.", max_len));
        return None;
    }
    Some(trimmed.to_string())
}

/// Like `text` but blank is allowed and kept as an empty string
pub fn optional_text(errors: &mut ValidationErrors, field: &str, value: String, max_len: usize) -> String {
    let trimmed = value.trim();
    if trimmed.chars().count() > max_len {
        errors.add(field, format!("Ensure this field has no more than {} characters.", max_len));
    }
    trimmed.to_string()
}

/// Empty or whitespace-only descriptions are stored as absent so they never collide
pub fn normalize_description(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

pub fn score(errors: &mut ValidationErrors, field: &str, value: i64) -> Option<i32> {
    if !(MIN_SCORE..=MAX_SCORE).contains(&value) {
        errors.add(field, "Rating must be between 1 and 5.");
        return None;
    }
    i32::try_from(value).ok()
}

pub fn age(errors: &mut ValidationErrors, field: &str, value: i64) -> Option<i32> {
    match i32::try_from(value) {
        Ok(v) if v >= 0 => Some(v),
        Ok(_) => {
            errors.add(field, "Ensure this value is greater than or equal to 0.");
            None
        }
        Err(_) => {
            errors.add(field, "A valid integer is required.");
            None
        }
    }
}

/// Shape check only: one '@', non-empty local part, dotted domain, no spaces
pub fn email(errors: &mut ValidationErrors, field: &str, value: &str) -> bool {
    let valid = match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !value.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        errors.add(field, "Enter a valid email address.");
    }
    valid
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_bounds_are_inclusive() {
        let mut errors = ValidationErrors::new();
        assert_eq!(score(&mut errors, "score", 1), Some(1));
        assert_eq!(score(&mut errors, "score", 5), Some(5));
        assert!(errors.is_empty());

        assert_eq!(score(&mut errors, "score", 0), None);
        assert_eq!(errors.get("score"), Some("Rating must be between 1 and 5."));

        let mut errors = ValidationErrors::new();
        assert_eq!(score(&mut errors, "score", 6), None);
        assert!(!errors.is_empty());
    }

    #[test]
    fn resolve_respects_write_mode() {
        let mut errors = ValidationErrors::new();
        assert_eq!(resolve(&mut errors, "name", None, Some("old"), WriteMode::Partial), Some("old"));
        assert!(errors.is_empty());

        assert_eq!(resolve(&mut errors, "name", None, Some("old"), WriteMode::Replace), None);
        assert_eq!(errors.get("name"), Some(REQUIRED));

        let mut errors = ValidationErrors::new();
        assert_eq!(resolve::<&str>(&mut errors, "name", Some("new"), None, WriteMode::Create), Some("new"));
        assert!(errors.is_empty());
    }

    #[derive(Debug, Default, Deserialize)]
    struct Named {
        #[serde(default, deserialize_with = "nullable")]
        name: Option<Option<String>>,
    }

    #[test]
    fn null_is_distinct_from_missing() {
        let missing: Named = serde_json::from_value(serde_json::json!({})).unwrap();
        let null: Named = serde_json::from_value(serde_json::json!({"name": null})).unwrap();
        let set: Named = serde_json::from_value(serde_json::json!({"name": "Tom"})).unwrap();
        assert_eq!(missing.name, None);
        assert_eq!(null.name, Some(None));
        assert_eq!(set.name, Some(Some("Tom".to_string())));

        let mut errors = ValidationErrors::new();
        assert_eq!(not_null(&mut errors, "name", missing.name), None);
        assert!(errors.is_empty());
        assert_eq!(not_null(&mut errors, "name", set.name), Some("Tom".to_string()));
        assert!(errors.is_empty());
        assert_eq!(not_null(&mut errors, "name", null.name), None);
        assert_eq!(errors.get("name"), Some(NULL));
    }

    #[test]
    fn text_rejects_blank_and_long_values() {
        let mut errors = ValidationErrors::new();
        assert_eq!(text(&mut errors, "name", Some("  Tom ".into()), 10), Some("Tom".into()));
        assert_eq!(text(&mut errors, "name", Some("   ".into()), 10), None);
        assert_eq!(errors.get("name"), Some(BLANK));
        assert_eq!(text(&mut errors, "color", Some("x".repeat(11)), 10), None);
        assert!(errors.get("color").is_some());
    }

    #[test]
    fn blank_description_becomes_absent() {
        assert_eq!(normalize_description(Some("   ".into())), None);
        assert_eq!(normalize_description(Some(" fluffy ".into())), Some("fluffy".into()));
        assert_eq!(normalize_description(None), None);
    }

    #[test]
    fn email_shape() {
        let mut errors = ValidationErrors::new();
        assert!(email(&mut errors, "email", "cat@example.com"));
        assert!(!email(&mut errors, "email", "cat.example.com"));
        assert!(!email(&mut errors, "email", "cat@localhost"));
        assert!(!email(&mut errors, "email", "c at@example.com"));
    }

    #[test]
    fn negative_age_is_rejected() {
        let mut errors = ValidationErrors::new();
        assert_eq!(age(&mut errors, "age", 3), Some(3));
        assert_eq!(age(&mut errors, "age", -1), None);
        assert!(errors.get("age").is_some());
    }

    #[test]
    fn finish_reports_errors() {
        let errors = ValidationErrors::field("score", "bad");
        assert!(errors.clone().finish(()).is_err());
        assert_eq!(ValidationErrors::new().finish(7), Ok(7));
    }
}
