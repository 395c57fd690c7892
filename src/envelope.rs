// src/envelope.rs
//! Error envelope for the HTTP boundary
//!
//! Every rejected request gets exactly one `{"code", "message"}` body with
//! status 422. A `ResponseSink` is consumed when a response is written, so a
//! rejected request cannot be answered twice.

use std::io::Write;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::BridgeError;

/// Status for requests that were understood but rejected
pub const REJECT_STATUS: u16 = 422;

pub const DEFAULT_ERROR_CODE: &str = "unknown";
pub const DEFAULT_ERROR_MESSAGE: &str = "An unknown error occurred.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub code: String,
    pub message: String,
}

impl ErrorEnvelope {
    pub fn new(code: &str, message: &str) -> Self {
        ErrorEnvelope {
            code: code.to_string(),
            message: message.to_string(),
        }
    }

    pub fn from_error(err: &BridgeError) -> Self {
        match err.code() {
            Some(code) => ErrorEnvelope::new(code, &err.to_string()),
            None => ErrorEnvelope::default(),
        }
    }

    pub fn to_json(&self) -> String {
        // Two string fields cannot fail to serialize
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(
                "{{\"code\":\"{}\",\"message\":\"{}\"}}",
                DEFAULT_ERROR_CODE, DEFAULT_ERROR_MESSAGE
            )
        })
    }
}

impl Default for ErrorEnvelope {
    fn default() -> Self {
        ErrorEnvelope::new(DEFAULT_ERROR_CODE, DEFAULT_ERROR_MESSAGE)
    }
}

/// A complete HTTP response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn json(status: u16, body: impl Into<Vec<u8>>) -> Self {
        HttpResponse {
            status,
            content_type: "application/json",
            body: body.into(),
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut response = Vec::new();
        response.extend_from_slice(
            format!("HTTP/1.1 {} {}\r\n", self.status, reason_phrase(self.status)).as_bytes(),
        );
        response.extend_from_slice(format!("Content-Type: {}\r\n", self.content_type).as_bytes());
        response.extend_from_slice(format!("Content-Length: {}\r\n", self.body.len()).as_bytes());
        response.extend_from_slice(b"Connection: close\r\n\r\n");
        response.extend_from_slice(&self.body);
        response
    }
}

fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        204 => "No Content",
        400 => "Bad Request",
        422 => "Unprocessable Entity",
        500 => "Internal Server Error",
        _ => "",
    }
}

/// Where a response goes; writing it ends the request
pub trait ResponseSink {
    fn end(self, response: HttpResponse);
}

/// Writes raw HTTP/1.1 bytes to any writer
pub struct WriterSink<W: Write>(pub W);

impl<W: Write> ResponseSink for WriterSink<W> {
    fn end(mut self, response: HttpResponse) {
        let bytes = response.to_bytes();
        if let Err(e) = self.0.write_all(&bytes).and_then(|_| self.0.flush()) {
            warn!("Failed to write {} response: {}", response.status, e);
        }
    }
}

/// Keeps the response for an in-process caller
impl ResponseSink for &mut Option<HttpResponse> {
    fn end(self, response: HttpResponse) {
        *self = Some(response);
    }
}

/// The response a rejection would send, without sending it
pub fn error_response(envelope: &ErrorEnvelope) -> HttpResponse {
    HttpResponse::json(REJECT_STATUS, envelope.to_json())
}

/// Reject the request with a specific code and message
pub fn reject_with_error<S: ResponseSink>(sink: S, code: &str, message: &str) {
    debug!("Rejecting request: {}", code);
    sink.end(error_response(&ErrorEnvelope::new(code, message)));
}

/// Reject the request without a specific diagnostic
pub fn reject_with_default_error<S: ResponseSink>(sink: S) {
    debug!("Rejecting request with default error");
    sink.end(error_response(&ErrorEnvelope::default()));
}

/// Reject the request for a propagated error
///
/// Uncategorized errors get the default envelope; their detail only goes to
/// the log.
pub fn reject_with<S: ResponseSink>(sink: S, err: &BridgeError) {
    match err.code() {
        Some(code) => debug!("Rejecting request: {}", code),
        None => warn!("Rejecting request after uncategorized error: {}", err),
    }
    sink.end(error_response(&ErrorEnvelope::from_error(err)));
}
