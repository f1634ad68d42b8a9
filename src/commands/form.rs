//! Form Payloads
//!
//! Serializes form fields as `application/x-www-form-urlencoded`, or hands
//! them to the browser as multipart when files are attached.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::models::{FieldInput, FieldValue, FileMeta};

/// Characters left as-is by the URL-encoded form serializer
const FORM_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'*')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_');

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FormPayload {
    pub fields: Vec<(String, String)>,
    pub files: Vec<(String, FileMeta)>,
}

impl FormPayload {
    pub fn from_inputs(inputs: &[FieldInput]) -> Self {
        let mut payload = Self::default();
        for input in inputs {
            match &input.value {
                FieldValue::Text(value) => payload.fields.push((input.name.clone(), value.clone())),
                FieldValue::Files(files) => payload
                    .files
                    .extend(files.iter().map(|f| (input.name.clone(), f.clone()))),
            }
        }
        payload
    }

    pub fn has_files(&self) -> bool {
        !self.files.is_empty()
    }

    /// File parts that carry a browser handle; the rest are logged and skipped
    pub fn attachable_files(&self) -> Vec<(&str, &FileMeta, &web_sys::File)> {
        self.files
            .iter()
            .filter_map(|(name, file)| match &file.handle {
                Some(handle) => Some((name.as_str(), file, handle)),
                None => {
                    log::warn!("[SYNC] file {} has no browser handle, skipped", file.name);
                    None
                }
            })
            .collect()
    }

    pub fn encode_urlencoded(&self) -> String {
        self.fields
            .iter()
            .map(|(name, value)| format!("{}={}", encode_component(name), encode_component(value)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

fn encode_component(raw: &str) -> String {
    utf8_percent_encode(raw, FORM_ENCODE_SET)
        .to_string()
        .replace("%20", "+")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::InputType;

    fn text(name: &str, value: &str) -> FieldInput {
        FieldInput {
            name: name.to_string(),
            value: FieldValue::Text(value.to_string()),
            required: false,
            max_length: None,
            input_type: InputType::Text,
        }
    }

    #[test]
    fn test_urlencoded_body() {
        let payload = FormPayload::from_inputs(&[
            text("company", "Acme & Sons"),
            text("period", "2020.01 ~ 2023.06"),
            text("description", "백엔드 개발"),
        ]);
        assert_eq!(
            payload.encode_urlencoded(),
            "company=Acme+%26+Sons&period=2020.01+%7E+2023.06&description=%EB%B0%B1%EC%97%94%EB%93%9C+%EA%B0%9C%EB%B0%9C"
        );
        assert!(!payload.has_files());
    }

    #[test]
    fn test_files_split_out() {
        let image = FileMeta {
            name: "shot.png".to_string(),
            size: 2048,
            mime: "image/png".to_string(),
            handle: None,
        };
        let payload = FormPayload::from_inputs(&[
            text("description", "Login screen"),
            FieldInput {
                name: "detailImage".to_string(),
                value: FieldValue::Files(vec![image.clone()]),
                required: true,
                max_length: None,
                input_type: InputType::File,
            },
        ]);
        assert!(payload.has_files());
        assert_eq!(payload.files, vec![("detailImage".to_string(), image)]);
        assert_eq!(payload.encode_urlencoded(), "description=Login+screen");
    }

    #[test]
    fn test_files_without_handle_are_not_attached() {
        let detached = FileMeta {
            name: "shot.png".to_string(),
            size: 2048,
            mime: "image/png".to_string(),
            handle: None,
        };
        let payload = FormPayload {
            fields: vec![("description".to_string(), "Login screen".to_string())],
            files: vec![("detailImage".to_string(), detached)],
        };
        assert!(payload.has_files());
        assert!(payload.attachable_files().is_empty());
    }
}
