//! Translation of server error payloads into `ClientError`
//!
//! Two shapes reach the client: the repeated `ErrorMessage` list carried by
//! every response, and JSON documents with a discriminated `type` field.

use crate::error::{ClientError, ErrorKind, Result};
use serde_json::Value as JsonValue;
use tracing::warn;
use xgraph_proto::{ErrorMessage, ServerErrors};

/// Longest excerpt of an unparsable payload embedded in an error message
pub const MAX_PAYLOAD_EXCERPT: usize = 1000;

/// Builds a typed error from one wire error message.
pub fn error_from_message(message: &ErrorMessage) -> ClientError {
    let trace = if message.detail.is_empty() {
        None
    } else {
        Some(message.detail.join("\n"))
    };

    ClientError::server(
        ErrorKind::from_wire(message.code),
        message.error_detail_message.clone(),
        trace,
    )
}

/// Passes a response through unless the server attached errors to it.
///
/// The first error classifies the failure.
pub fn check_response<R: ServerErrors>(response: R) -> Result<R> {
    match response.server_errors().first() {
        Some(message) => Err(error_from_message(message)),
        None => Ok(response),
    }
}

/// Parses a JSON payload produced by the server.
///
/// `{"type": "error", ...}` documents become errors, classified by their
/// `errorcode` when present. `{"type": "warning", ...}` documents are logged
/// and returned to the caller unchanged.
pub fn parse_payload(payload: &str) -> Result<JsonValue> {
    let json: JsonValue = serde_json::from_str(payload).map_err(|e| {
        ClientError::InvalidPayload(format!(
            "invalid json string: {}\n==> {}",
            e,
            excerpt(payload)
        ))
    })?;

    let data = json.get("data").map(json_text);
    let trace = json.get("trace").map(json_text);

    match json.get("type").and_then(JsonValue::as_str) {
        Some("error") => match data {
            Some(data) => {
                let kind = json
                    .get("errorcode")
                    .and_then(JsonValue::as_str)
                    .map(ErrorKind::from_code)
                    .unwrap_or(ErrorKind::Generic);
                Err(ClientError::server(kind, data, trace))
            }
            None => Ok(json),
        },
        Some("warning") => {
            if let Some(data) = data {
                warn!(warning = %data, "Server reported a warning");
            }
            Ok(json)
        }
        Some(_) => Ok(json),
        None => match json.get("error") {
            Some(error) => Err(ClientError::server(
                ErrorKind::Generic,
                format!("Error: {}", json_text(error)),
                trace,
            )),
            None => Ok(json),
        },
    }
}

fn excerpt(payload: &str) -> String {
    payload.chars().take(MAX_PAYLOAD_EXCERPT).collect()
}

fn json_text(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}
