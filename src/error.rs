//! Error Types
//!
//! Everything the sync controller can report back to an event handler.

use thiserror::Error;

use crate::models::ListId;
use crate::validation::FieldError;

/// Failure below HTTP: the request never produced a response
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("browser window unavailable")]
    NoWindow,
    #[error("{0}")]
    Js(String),
}

impl From<wasm_bindgen::JsValue> for TransportError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        TransportError::Js(
            value
                .as_string()
                .unwrap_or_else(|| format!("{:?}", value)),
        )
    }
}

/// A dispatched request that did not succeed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("server returned {status}")]
    Status { status: u16, message: Option<String> },
    #[error("request failed: {0}")]
    Transport(#[from] TransportError),
}

impl RequestError {
    /// Best text to show the user: the server's own message when it sent one
    pub fn detail(&self) -> String {
        match self {
            RequestError::Status { message: Some(message), .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    /// Form carries no usable `data-ajax-form` marker
    #[error("form is not an enhanced form")]
    NotEnhanced,
    #[error("{} field(s) failed validation", .0.len())]
    Validation(Vec<FieldError>),
    #[error(transparent)]
    Request(#[from] RequestError),
    /// Another action on the same list is still in flight
    #[error("an action on {0} is already in flight")]
    Busy(ListId),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config object: {0}")]
    Js(String),
}

impl From<serde_wasm_bindgen::Error> for ConfigError {
    fn from(err: serde_wasm_bindgen::Error) -> Self {
        ConfigError::Js(err.to_string())
    }
}
