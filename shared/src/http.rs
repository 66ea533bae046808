//! HTTP helpers for the event functions.

use lambda_http::{Body, Response};
use serde::Serialize;

use crate::models::Document;
use crate::Error;

/// Error body: `{ "error": "..." }`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Acknowledgement body: `{ "message": "..." }`.
#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub message: String,
}

/// Create a JSON response with the given status code and data.
pub fn json_response<T: Serialize>(status: u16, data: &T) -> Result<Response<Body>, lambda_http::Error> {
    let json = serde_json::to_string(data)?;
    Ok(Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(Body::from(json))?)
}

/// Create an error response with the given status code and message.
pub fn error_response(status: u16, message: impl Into<String>) -> Result<Response<Body>, lambda_http::Error> {
    json_response(
        status,
        &ErrorBody {
            error: message.into(),
        },
    )
}

/// Create a `{ "message": ... }` response with status 200.
pub fn message_response(message: impl Into<String>) -> Result<Response<Body>, lambda_http::Error> {
    json_response(
        200,
        &MessageBody {
            message: message.into(),
        },
    )
}

/// Map a library error onto an error response with its status code.
pub fn failure_response(err: &Error) -> Result<Response<Body>, lambda_http::Error> {
    error_response(err.status_code(), err.to_string())
}

/// Body bytes of a request, or `None` if the body is absent or empty.
pub fn body_bytes(body: &Body) -> Option<&[u8]> {
    match body {
        Body::Empty => None,
        other => {
            let bytes: &[u8] = other.as_ref();
            if bytes.iter().all(u8::is_ascii_whitespace) {
                None
            } else {
                Some(bytes)
            }
        }
    }
}

/// Parse a request body as an events document.
pub fn parse_document(bytes: &[u8]) -> crate::Result<Document> {
    Document::from_slice(bytes)
}
