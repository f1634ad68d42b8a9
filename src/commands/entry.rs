//! Entry Commands
//!
//! Create and delete requests for list entries.

use super::{FormPayload, Method, ServerRequest, ServerResponse, ServerTransport};
use crate::error::TransportError;

// ========================
// Requests
// ========================

pub fn create_request(action_url: &str, payload: FormPayload) -> ServerRequest {
    ServerRequest {
        method: Method::Post,
        url: action_url.to_string(),
        body: Some(payload),
    }
}

/// The server exposes deletes as GET routes
pub fn delete_request(delete_url: &str) -> ServerRequest {
    ServerRequest {
        method: Method::Get,
        url: delete_url.to_string(),
        body: None,
    }
}

// ========================
// Commands
// ========================

pub async fn create_entry(
    transport: &dyn ServerTransport,
    action_url: &str,
    payload: FormPayload,
) -> Result<ServerResponse, TransportError> {
    transport.send(create_request(action_url, payload)).await
}

pub async fn delete_entry(
    transport: &dyn ServerTransport,
    delete_url: &str,
) -> Result<ServerResponse, TransportError> {
    transport.send(delete_request(delete_url)).await
}
