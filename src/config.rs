//! Page Configuration
//!
//! Messages, limits and timings. Every field has a default, so the server
//! only needs to embed what it wants to override as `window.adminSyncConfig`.

use serde::{Deserialize, Serialize};
use wasm_bindgen::JsValue;

use crate::error::ConfigError;
use crate::models::EntryKind;

/// Global the server may define with overrides
pub const CONFIG_GLOBAL: &str = "adminSyncConfig";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SyncConfig {
    pub messages: Messages,
    pub upload: UploadRules,
    pub timing: Timing,
    /// sessionStorage key for the scroll offset kept across reloads
    pub scroll_storage_key: String,
    /// Prefix of server routes
    pub admin_base: String,
    /// Reject a second action on a list while one is outstanding
    pub guard_in_flight: bool,
    /// Longest item label quoted in the delete prompt
    pub confirm_label_max: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            messages: Messages::default(),
            upload: UploadRules::default(),
            timing: Timing::default(),
            scroll_storage_key: "adminScrollPosition".to_string(),
            admin_base: "/admin".to_string(),
            guard_in_flight: true,
            confirm_label_max: 50,
        }
    }
}

impl SyncConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_js(value: JsValue) -> Result<Self, ConfigError> {
        Ok(serde_wasm_bindgen::from_value(value)?)
    }

    /// Read overrides from the page global, falling back to defaults
    pub fn load() -> Self {
        let Some(window) = web_sys::window() else {
            return Self::default();
        };
        let value = match js_sys::Reflect::get(&window, &JsValue::from_str(CONFIG_GLOBAL)) {
            Ok(value) if !value.is_undefined() && !value.is_null() => value,
            _ => return Self::default(),
        };
        match Self::from_js(value) {
            Ok(config) => config,
            Err(err) => {
                log::error!("[APP] {}; using defaults", err);
                Self::default()
            }
        }
    }

    /// Delete route for an item the server just created
    pub fn delete_url(&self, kind: EntryKind, id: &str) -> String {
        format!(
            "{}/{}/delete/{}",
            self.admin_base.trim_end_matches('/'),
            kind.delete_segment(),
            id
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Messages {
    pub created: String,
    pub updated: String,
    pub deleted: String,
    pub create_failed: String,
    pub delete_failed: String,
    /// Shown when a list still has an unfinished action
    pub busy: String,
    pub confirm_delete: String,
    pub required: String,
    pub too_long: String,
    pub invalid_url: String,
    pub missing_file: String,
    pub unsupported_type: String,
    pub too_large: String,
    pub loading_label: String,
    pub default_submit_label: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            created: "Entry added.".to_string(),
            updated: "Information updated.".to_string(),
            deleted: "Entry deleted.".to_string(),
            create_failed: "Something went wrong".to_string(),
            delete_failed: "Could not delete the entry.".to_string(),
            busy: "Still saving the previous change, try again in a moment.".to_string(),
            confirm_delete: "Delete this entry?".to_string(),
            required: "This field is required.".to_string(),
            too_long: "At most {max} characters allowed.".to_string(),
            invalid_url: "Enter a valid URL (http:// or https://).".to_string(),
            missing_file: "Choose an image file.".to_string(),
            unsupported_type: "Only JPEG, PNG and WebP images can be uploaded.".to_string(),
            too_large: "Files cannot be larger than {max}.".to_string(),
            loading_label: "Saving...".to_string(),
            default_submit_label: "Save".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UploadRules {
    pub allowed_types: Vec<String>,
    pub max_bytes: u64,
}

impl Default for UploadRules {
    fn default() -> Self {
        Self {
            allowed_types: vec![
                "image/jpeg".to_string(),
                "image/png".to_string(),
                "image/webp".to_string(),
            ],
            max_bytes: 10 * 1024 * 1024,
        }
    }
}

/// Delays, all in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Timing {
    pub scroll_restore_ms: u32,
    pub exit_transition_ms: u32,
    pub enter_delay_ms: u32,
    pub notification_ms: u32,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            scroll_restore_ms: 100,
            exit_transition_ms: 300,
            enter_delay_ms: 50,
            notification_ms: 5000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override_keeps_defaults() {
        let config = SyncConfig::from_json(
            r#"{"guardInFlight": false, "messages": {"created": "Added!"}, "timing": {"notificationMs": 2000}}"#,
        )
        .expect("valid config");

        assert!(!config.guard_in_flight);
        assert_eq!(config.messages.created, "Added!");
        assert_eq!(config.messages.deleted, Messages::default().deleted);
        assert_eq!(config.timing.notification_ms, 2000);
        assert_eq!(config.timing.scroll_restore_ms, 100);
        assert_eq!(config.upload.max_bytes, 10 * 1024 * 1024);
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        assert!(matches!(SyncConfig::from_json("{not json"), Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_delete_url() {
        let config = SyncConfig { admin_base: "/admin/".to_string(), ..SyncConfig::default() };
        assert_eq!(config.delete_url(EntryKind::Career, "12"), "/admin/career/delete/12");
        assert_eq!(config.delete_url(EntryKind::Detail, "3"), "/admin/project/detail/delete/3");
    }
}
