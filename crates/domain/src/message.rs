//! Wire messages exchanged over the messaging topics.
//!
//! All payloads are JSON with camelCase keys. Every response carries the
//! `requestId` of the request it answers, copied verbatim.

use serde::{Deserialize, Serialize};

use crate::error::{DecodeError, DeliveryError};

/// An inbound trunk command.
///
/// Only `requestId` is interpreted; any other fields are kept but do not
/// influence what the command does.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandRequest {
    pub request_id: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl CommandRequest {
    /// Decode a raw message payload.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::Syntax`] when the payload is not JSON, or
    /// [`DecodeError::Schema`] when it is JSON but not a request object. In
    /// the latter case a numeric `requestId` is salvaged so the caller can
    /// still answer.
    pub fn decode(payload: &[u8]) -> Result<Self, DecodeError> {
        let document: serde_json::Value =
            serde_json::from_slice(payload).map_err(DecodeError::Syntax)?;
        Self::deserialize(&document).map_err(|source| DecodeError::Schema {
            request_id: salvage_request_id(&document),
            source,
        })
    }
}

// A string id always decodes, so only a number can need salvaging.
fn salvage_request_id(document: &serde_json::Value) -> Option<String> {
    match document.get("requestId")? {
        serde_json::Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

/// Outcome code of a command: `0` on success, `1` on failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "u8")]
pub enum ResponseStatus {
    Success,
    Failure,
}

impl From<ResponseStatus> for u8 {
    fn from(status: ResponseStatus) -> Self {
        match status {
            ResponseStatus::Success => 0,
            ResponseStatus::Failure => 1,
        }
    }
}

/// Status and human-readable message of a handled command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandResult {
    pub status: ResponseStatus,
    pub message: String,
}

/// The single response published for each handled request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResponse {
    pub request_id: String,
    pub result: CommandResult,
}

const FALLBACK_FAILURE_MESSAGE: &str = "unknown error";

impl CommandResponse {
    #[must_use]
    pub fn success(request_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            result: CommandResult {
                status: ResponseStatus::Success,
                message: message.into(),
            },
        }
    }

    /// A failure response. An empty description is replaced so the message
    /// is never blank.
    #[must_use]
    pub fn failure(request_id: impl Into<String>, message: impl Into<String>) -> Self {
        let mut message = message.into();
        if message.is_empty() {
            message = FALLBACK_FAILURE_MESSAGE.to_string();
        }
        Self {
            request_id: request_id.into(),
            result: CommandResult {
                status: ResponseStatus::Failure,
                message,
            },
        }
    }

    /// Serialize to the JSON wire format.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError::Encode`] if serialization fails.
    pub fn to_payload(&self) -> Result<Vec<u8>, DeliveryError> {
        serde_json::to_vec(self).map_err(DeliveryError::Encode)
    }
}

/// Notification mirroring the trunk open/closed signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrunkStateNotification {
    pub is_open: bool,
}

impl TrunkStateNotification {
    /// Serialize to the JSON wire format.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError::Encode`] if serialization fails.
    pub fn to_payload(&self) -> Result<Vec<u8>, DeliveryError> {
        serde_json::to_vec(self).map_err(DeliveryError::Encode)
    }
}
