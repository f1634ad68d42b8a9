//! Browser Transport
//!
//! `ServerTransport` over `window.fetch`.

use async_trait::async_trait;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{FormData, Headers, Request, RequestInit, Response};

use super::{
    FormPayload, ServerRequest, ServerResponse, ServerTransport, REQUESTED_WITH_HEADER,
    REQUESTED_WITH_VALUE,
};
use crate::error::TransportError;

const URLENCODED: &str = "application/x-www-form-urlencoded;charset=UTF-8";

#[derive(Debug, Clone, Copy, Default)]
pub struct FetchTransport;

#[async_trait(?Send)]
impl ServerTransport for FetchTransport {
    async fn send(&self, request: ServerRequest) -> Result<ServerResponse, TransportError> {
        let window = web_sys::window().ok_or(TransportError::NoWindow)?;

        let headers = Headers::new()?;
        headers.set(REQUESTED_WITH_HEADER, REQUESTED_WITH_VALUE)?;

        let init = RequestInit::new();
        init.set_method(request.method.as_str());
        if let Some(payload) = &request.body {
            if payload.has_files() {
                // Browser sets the multipart boundary itself
                let body = multipart_body(payload)?;
                init.set_body(&body);
            } else {
                headers.set("Content-Type", URLENCODED)?;
                init.set_body(&JsValue::from_str(&payload.encode_urlencoded()));
            }
        }
        init.set_headers(&headers);

        let js_request = Request::new_with_str_and_init(&request.url, &init)?;
        let value = JsFuture::from(window.fetch_with_request(&js_request)).await?;
        let response: Response = value.dyn_into()?;

        let status = response.status();
        // Body is informational; an unreadable one is treated as empty
        let body = match response.text() {
            Ok(promise) => JsFuture::from(promise)
                .await
                .ok()
                .and_then(|text| text.as_string())
                .unwrap_or_default(),
            Err(_) => String::new(),
        };

        log::debug!("[SYNC] {} {} -> {}", request.method.as_str(), request.url, status);
        Ok(ServerResponse { status, body })
    }
}

fn multipart_body(payload: &FormPayload) -> Result<FormData, TransportError> {
    let form = FormData::new()?;
    for (name, value) in &payload.fields {
        form.append_with_str(name, value)?;
    }
    for (name, file, handle) in payload.attachable_files() {
        form.append_with_blob_and_filename(name, handle, &file.name)?;
    }
    Ok(form)
}
