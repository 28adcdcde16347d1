//! Per-request control: request access, parameters, and the pending response.
//!
//! # Responsibilities
//! - Expose the request (method, URI, headers, buffered body)
//! - Hold path parameters; fall back to the URL query string on lookup
//! - Collect status code, headers and body for the response
//! - Sniff a content type for non-empty bodies that lack one
//! - Gzip the body when the client accepts it
//!
//! # Design Decisions
//! - Handlers are synchronous and write into the control; the dispatcher
//!   turns it into a response afterwards
//! - Invalid status codes are ignored, not an error

use std::io::Write;

use axum::{
    body::{Body, Bytes},
    http::{
        header::{self, HeaderMap, HeaderValue},
        request::Parts,
        Method, StatusCode, Uri,
    },
    response::Response,
};
use flate2::{write::GzEncoder, Compression};
use serde::{de::DeserializeOwned, Serialize};

use crate::routing::Params;

/// Request/response wrapper passed to handlers.
#[derive(Debug)]
pub struct Control {
    parts: Parts,
    body: Bytes,
    params: Params,
    code: u16,
    headers: HeaderMap,
    output: Vec<u8>,
}

impl Control {
    pub fn new(parts: Parts, body: Bytes) -> Self {
        Self {
            parts,
            body,
            params: Params::new(),
            code: 0,
            headers: HeaderMap::new(),
            output: Vec::new(),
        }
    }

    pub fn method(&self) -> &Method {
        &self.parts.method
    }

    pub fn uri(&self) -> &Uri {
        &self.parts.uri
    }

    pub fn path(&self) -> &str {
        self.parts.uri.path()
    }

    /// Request headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.parts.headers
    }

    /// Buffered request body.
    pub fn request_body(&self) -> &Bytes {
        &self.body
    }

    /// Deserialize the request body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Set a parameter, replacing any existing value for `key`.
    pub fn param(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.params.set(key, value);
    }

    /// Path parameter `key`, else URL query parameter `key`, else `""`.
    pub fn query(&self, key: &str) -> String {
        if let Some(value) = self.params.get(key) {
            return value.to_string();
        }

        self.parts
            .uri
            .query()
            .and_then(|q| {
                url::form_urlencoded::parse(q.as_bytes())
                    .find(|(k, _)| k == key)
                    .map(|(_, v)| v.into_owned())
            })
            .unwrap_or_default()
    }

    /// Set the response status. Codes outside 100..=599 are ignored.
    pub fn code(&mut self, code: u16) {
        if (100..600).contains(&code) {
            self.code = code;
        }
    }

    /// Status set by [`Control::code`], `0` when unset.
    pub fn get_code(&self) -> u16 {
        self.code
    }

    /// Response headers.
    pub fn header_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    pub fn response_headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Append text to the response body.
    pub fn body(&mut self, data: impl AsRef<[u8]>) {
        self.output.extend_from_slice(data.as_ref());
    }

    /// Write `data` as a JSON response body.
    ///
    /// On serialization failure the response becomes a 500 with the error text.
    pub fn body_json<T: Serialize + ?Sized>(&mut self, data: &T) {
        match serde_json::to_vec(data) {
            Ok(content) => {
                if !self.headers.contains_key(header::CONTENT_TYPE) {
                    self.headers.insert(
                        header::CONTENT_TYPE,
                        HeaderValue::from_static("application/json"),
                    );
                }
                self.output.extend_from_slice(&content);
            }
            Err(e) => {
                self.code = StatusCode::INTERNAL_SERVER_ERROR.as_u16();
                self.output = e.to_string().into_bytes();
            }
        }
    }

    /// Response body written so far, uncompressed.
    pub fn output(&self) -> &[u8] {
        &self.output
    }

    fn accepts_gzip(&self) -> bool {
        self.parts
            .headers
            .get(header::ACCEPT_ENCODING)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.contains("gzip"))
    }

    /// Build the HTTP response. Status defaults to 200.
    pub fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.code).unwrap_or(StatusCode::OK);
        let gzip = !self.output.is_empty() && self.accepts_gzip();
        let mut headers = self.headers;

        if !self.output.is_empty() && !headers.contains_key(header::CONTENT_TYPE) {
            headers.insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static(sniff_content_type(&self.output)),
            );
        }

        let payload = if gzip {
            match compress(&self.output) {
                Ok(compressed) => {
                    headers.append(header::CONTENT_ENCODING, HeaderValue::from_static("gzip"));
                    compressed
                }
                Err(e) => {
                    tracing::warn!(error = %e, "gzip encoding failed, sending identity body");
                    self.output
                }
            }
        } else {
            self.output
        };

        let mut response = Response::new(Body::from(payload));
        *response.status_mut() = status;
        *response.headers_mut() = headers;
        response
    }
}

fn compress(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}

fn sniff_content_type(data: &[u8]) -> &'static str {
    let trimmed = data.trim_ascii_start();
    if trimmed.starts_with(b"<") {
        "text/html; charset=utf-8"
    } else if std::str::from_utf8(data).is_ok() {
        "text/plain; charset=utf-8"
    } else {
        "application/octet-stream"
    }
}
