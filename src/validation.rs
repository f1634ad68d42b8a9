//! Field Validation
//!
//! Synchronous checks run before anything is sent. Rules come from the
//! markup (`required`, `maxlength`, `type=url`, file inputs) plus the
//! configured upload limits.

use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use crate::config::{Messages, UploadRules};
use crate::models::{FieldInput, FieldValue, InputType};

static URL_PATTERN: OnceLock<Regex> = OnceLock::new();

fn url_pattern() -> &'static Regex {
    URL_PATTERN.get_or_init(|| Regex::new(r"^https?://.+").expect("valid URL pattern"))
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {kind}")]
pub struct FieldError {
    pub field: String,
    pub kind: FieldErrorKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldErrorKind {
    #[error("required")]
    Required,
    #[error("longer than {max} characters")]
    TooLong { max: usize },
    #[error("not an http(s) URL")]
    InvalidUrl,
    #[error("no file selected")]
    MissingFile,
    #[error("unsupported file type {mime}")]
    UnsupportedType { mime: String },
    #[error("{size} bytes exceeds the {max} byte limit")]
    TooLarge { size: u64, max: u64 },
    /// Reported by the server for this field
    #[error("{0}")]
    Server(String),
}

impl FieldError {
    pub fn new(field: impl Into<String>, kind: FieldErrorKind) -> Self {
        Self { field: field.into(), kind }
    }

    /// Text shown next to the field
    pub fn message(&self, messages: &Messages) -> String {
        match &self.kind {
            FieldErrorKind::Required => messages.required.clone(),
            FieldErrorKind::TooLong { max } => messages.too_long.replace("{max}", &max.to_string()),
            FieldErrorKind::InvalidUrl => messages.invalid_url.clone(),
            FieldErrorKind::MissingFile => messages.missing_file.clone(),
            FieldErrorKind::UnsupportedType { .. } => messages.unsupported_type.clone(),
            FieldErrorKind::TooLarge { max, .. } => {
                messages.too_large.replace("{max}", &format_file_size(*max))
            }
            FieldErrorKind::Server(message) => message.clone(),
        }
    }
}

/// Check one field; the first failing rule wins
pub fn validate_field(input: &FieldInput, upload: &UploadRules) -> Option<FieldError> {
    let kind = match &input.value {
        FieldValue::Text(raw) => check_text(input, raw.trim()),
        FieldValue::Files(files) => {
            if files.is_empty() {
                input.required.then_some(FieldErrorKind::MissingFile)
            } else {
                files.iter().find_map(|file| {
                    if !upload.allowed_types.iter().any(|t| t == &file.mime) {
                        Some(FieldErrorKind::UnsupportedType { mime: file.mime.clone() })
                    } else if file.size > upload.max_bytes {
                        Some(FieldErrorKind::TooLarge { size: file.size, max: upload.max_bytes })
                    } else {
                        None
                    }
                })
            }
        }
    }?;
    Some(FieldError::new(input.name.clone(), kind))
}

fn check_text(input: &FieldInput, value: &str) -> Option<FieldErrorKind> {
    if input.required && value.is_empty() {
        return Some(FieldErrorKind::Required);
    }
    if let Some(max) = input.max_length {
        if value.chars().count() > max {
            return Some(FieldErrorKind::TooLong { max });
        }
    }
    if input.input_type == InputType::Url && !value.is_empty() && !url_pattern().is_match(value) {
        return Some(FieldErrorKind::InvalidUrl);
    }
    None
}

/// Check every field, collecting all failures in document order
pub fn validate_form(inputs: &[FieldInput], upload: &UploadRules) -> Vec<FieldError> {
    inputs
        .iter()
        .filter_map(|input| validate_field(input, upload))
        .collect()
}

/// Human readable byte count, e.g. `1.5 MB`
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FileMeta;

    fn text(name: &str, value: &str) -> FieldInput {
        FieldInput {
            name: name.to_string(),
            value: FieldValue::Text(value.to_string()),
            required: false,
            max_length: None,
            input_type: InputType::Text,
        }
    }

    fn image(name: &str, mime: &str, size: u64) -> FileMeta {
        FileMeta { name: name.to_string(), size, mime: mime.to_string(), handle: None }
    }

    fn files(name: &str, required: bool, selected: Vec<FileMeta>) -> FieldInput {
        FieldInput {
            name: name.to_string(),
            value: FieldValue::Files(selected),
            required,
            max_length: None,
            input_type: InputType::File,
        }
    }

    #[test]
    fn test_required_is_trimmed() {
        let rules = UploadRules::default();
        let field = FieldInput { required: true, ..text("company", "   ") };
        let err = validate_field(&field, &rules).expect("blank required field");
        assert_eq!(err.kind, FieldErrorKind::Required);
        assert_eq!(err.field, "company");

        let optional = text("description", "  ");
        assert!(validate_field(&optional, &rules).is_none());
    }

    #[test]
    fn test_max_length_counts_chars() {
        let rules = UploadRules::default();
        let field = FieldInput { max_length: Some(3), ..text("name", "가나다") };
        assert!(validate_field(&field, &rules).is_none());

        let field = FieldInput { max_length: Some(3), ..text("name", "가나다라") };
        assert_eq!(
            validate_field(&field, &rules).map(|e| e.kind),
            Some(FieldErrorKind::TooLong { max: 3 })
        );
    }

    #[test]
    fn test_url_format() {
        let rules = UploadRules::default();
        let url = |v: &str| FieldInput { input_type: InputType::Url, ..text("githubUrl", v) };

        assert!(validate_field(&url("https://github.com/me"), &rules).is_none());
        assert!(validate_field(&url(""), &rules).is_none());
        assert_eq!(
            validate_field(&url("github.com/me"), &rules).map(|e| e.kind),
            Some(FieldErrorKind::InvalidUrl)
        );
        assert_eq!(
            validate_field(&url("https://"), &rules).map(|e| e.kind),
            Some(FieldErrorKind::InvalidUrl)
        );
    }

    #[test]
    fn test_file_rules() {
        let rules = UploadRules::default();

        let missing = files("detailImage", true, vec![]);
        assert_eq!(validate_field(&missing, &rules).map(|e| e.kind), Some(FieldErrorKind::MissingFile));
        assert!(validate_field(&files("thumbnail", false, vec![]), &rules).is_none());

        let gif = files("detailImage", true, vec![image("a.gif", "image/gif", 10)]);
        assert_eq!(
            validate_field(&gif, &rules).map(|e| e.kind),
            Some(FieldErrorKind::UnsupportedType { mime: "image/gif".to_string() })
        );

        let huge = files("detailImage", true, vec![image("a.png", "image/png", rules.max_bytes + 1)]);
        assert!(matches!(
            validate_field(&huge, &rules).map(|e| e.kind),
            Some(FieldErrorKind::TooLarge { .. })
        ));

        let ok = files("detailImage", true, vec![image("a.webp", "image/webp", rules.max_bytes)]);
        assert!(validate_field(&ok, &rules).is_none());
    }

    #[test]
    fn test_validate_form_collects_all() {
        let inputs = vec![
            FieldInput { required: true, ..text("company", "") },
            text("description", ""),
            FieldInput { required: true, ..text("period", "") },
        ];
        let errors = validate_form(&inputs, &UploadRules::default());
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["company", "period"]);
    }

    #[test]
    fn test_messages() {
        let messages = Messages::default();
        let err = FieldError::new("name", FieldErrorKind::TooLong { max: 100 });
        assert_eq!(err.message(&messages), "At most 100 characters allowed.");

        let err = FieldError::new("img", FieldErrorKind::TooLarge { size: 20, max: 10 * 1024 * 1024 });
        assert_eq!(err.message(&messages), "Files cannot be larger than 10 MB.");

        let err = FieldError::new("name", FieldErrorKind::Server("Name already taken".into()));
        assert_eq!(err.message(&messages), "Name already taken");
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(512), "512 Bytes");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(10 * 1024 * 1024), "10 MB");
        assert_eq!(format_file_size(1_288_490_189), "1.2 GB");
    }
}
