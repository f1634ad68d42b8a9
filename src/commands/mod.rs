//! Server Command Wrappers
//!
//! HTTP bindings to the admin server, organized by concern.

mod entry;
mod fetch;
mod form;
mod response;

use async_trait::async_trait;

use crate::error::TransportError;

// Re-export all public items
pub use entry::*;
pub use fetch::FetchTransport;
pub use form::FormPayload;
pub use response::ServerResponse;

/// Header marking a request as programmatic rather than a navigation
pub const REQUESTED_WITH_HEADER: &str = "X-Requested-With";
pub const REQUESTED_WITH_VALUE: &str = "XMLHttpRequest";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerRequest {
    pub method: Method,
    pub url: String,
    pub body: Option<FormPayload>,
}

/// Sends one request and resolves once the server answered or the
/// transport failed. Never retries, never times out.
#[async_trait(?Send)]
pub trait ServerTransport {
    async fn send(&self, request: ServerRequest) -> Result<ServerResponse, TransportError>;
}
