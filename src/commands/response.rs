//! Server Responses
//!
//! Status plus raw body. Enhanced routes answer with a JSON envelope
//! `{ success, message, data, errors }`; anything else is treated as opaque.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

use crate::models::EntryKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerResponse {
    pub status: u16,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct ResponseEnvelope {
    pub success: Option<bool>,
    pub message: Option<String>,
    pub data: Option<Value>,
    /// Field name to message, on validation failures
    pub errors: HashMap<String, String>,
}

impl ServerResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn envelope(&self) -> Option<ResponseEnvelope> {
        serde_json::from_str(&self.body).ok()
    }

    /// Identifier of a freshly created entry, at `data.id` or `data.<kind>.id`
    pub fn persisted_id(&self, kind: EntryKind) -> Option<String> {
        let data = self.envelope()?.data?;
        data.get("id")
            .or_else(|| data.get(kind.as_str()).and_then(|entry| entry.get("id")))
            .and_then(id_string)
    }

    /// Server-reported field errors, sorted by field name
    pub fn field_errors(&self) -> Vec<(String, String)> {
        let mut errors: Vec<(String, String)> = self
            .envelope()
            .map(|envelope| envelope.errors.into_iter().collect())
            .unwrap_or_default();
        errors.sort();
        errors
    }

    /// Human readable message from the envelope, if the server sent one
    pub fn server_message(&self) -> Option<String> {
        self.envelope()
            .and_then(|envelope| envelope.message)
            .filter(|message| !message.trim().is_empty())
    }
}

fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, body: &str) -> ServerResponse {
        ServerResponse { status, body: body.to_string() }
    }

    #[test]
    fn test_success_range() {
        assert!(response(200, "").is_success());
        assert!(response(204, "").is_success());
        assert!(!response(302, "").is_success());
        assert!(!response(400, "").is_success());
        assert!(!response(500, "").is_success());
    }

    #[test]
    fn test_persisted_id_locations() {
        let flat = response(200, r#"{"success":true,"data":{"id":41}}"#);
        assert_eq!(flat.persisted_id(EntryKind::Career).as_deref(), Some("41"));

        let nested = response(200, r#"{"success":true,"data":{"career":{"id":"42","company":"Acme"}}}"#);
        assert_eq!(nested.persisted_id(EntryKind::Career).as_deref(), Some("42"));

        let without = response(200, r#"{"success":true,"data":{"career":{"company":"Acme"}}}"#);
        assert_eq!(without.persisted_id(EntryKind::Career), None);

        let html = response(200, "<html>redirected</html>");
        assert_eq!(html.persisted_id(EntryKind::Career), None);
    }

    #[test]
    fn test_failure_details() {
        let bad = response(
            400,
            r#"{"success":false,"message":"Check your input.","errors":{"position":"must not be blank","company":"must not be blank"}}"#,
        );
        assert_eq!(bad.server_message().as_deref(), Some("Check your input."));
        assert_eq!(
            bad.field_errors(),
            vec![
                ("company".to_string(), "must not be blank".to_string()),
                ("position".to_string(), "must not be blank".to_string()),
            ]
        );

        let opaque = response(500, "Internal Server Error");
        assert_eq!(opaque.server_message(), None);
        assert!(opaque.field_errors().is_empty());
    }
}
