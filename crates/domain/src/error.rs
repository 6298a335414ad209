//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`DeliveryError`] via `#[from]` (or `into_domain()` for adapters).
//! `Display` strings stay short and never repeat their source; use
//! [`report`] to render the whole chain.

use std::error::Error as StdError;

use crate::signal::SignalPath;

/// Root error type crossing port boundaries.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    /// An inbound payload could not be decoded into a request.
    #[error("invalid request")]
    Decode(#[from] DecodeError),

    /// An outbound message could not be serialized.
    #[error("failed to encode message")]
    Encode(#[source] serde_json::Error),

    /// A signal was missing or carried an unexpected type.
    #[error("signal error")]
    Signal(#[from] SignalError),

    /// A domain invariant was violated.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// A collaborator (signal broker, actuator service, message bus) failed.
    #[error("transport error")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),
}

impl DeliveryError {
    /// Wrap an arbitrary collaborator failure.
    pub fn transport(err: impl StdError + Send + Sync + 'static) -> Self {
        Self::Transport(Box::new(err))
    }
}

/// Why an inbound request payload was rejected.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The payload is not JSON at all; no correlation id can be recovered.
    #[error("payload is not valid JSON")]
    Syntax(#[source] serde_json::Error),

    /// The payload is JSON but does not match the request shape.
    #[error("payload does not match the request schema")]
    Schema {
        /// Correlation id recovered from the raw document, if any.
        request_id: Option<String>,
        #[source]
        source: serde_json::Error,
    },
}

impl DecodeError {
    /// The correlation id salvaged from the payload, if one was recoverable.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        match self {
            Self::Syntax(_) => None,
            Self::Schema { request_id, .. } => request_id.as_deref(),
        }
    }
}

/// Failures reading a typed value out of a signal or signal update.
#[derive(Debug, thiserror::Error)]
pub enum SignalError {
    /// The broker does not know the path, or the update does not carry it.
    #[error("signal {0} not found")]
    NotFound(SignalPath),

    /// The signal exists but holds a different type than requested.
    #[error("signal {path} is not a {expected}")]
    TypeMismatch {
        path: SignalPath,
        expected: &'static str,
    },
}

/// Domain invariant violations.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("signal path must not be empty")]
    EmptySignalPath,

    #[error("signal path {0:?} contains an empty segment")]
    EmptySegment(String),
}

/// Render an error and all of its sources as `outer: inner: innermost`.
#[must_use]
pub fn report(err: &(dyn StdError + 'static)) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("connection refused")]
    struct Refused;

    #[test]
    fn should_display_short_message_without_source() {
        let err = DeliveryError::transport(Refused);
        assert_eq!(err.to_string(), "transport error");
    }

    #[test]
    fn should_report_full_source_chain() {
        let err = DeliveryError::transport(Refused);
        assert_eq!(report(&err), "transport error: connection refused");
    }

    #[test]
    fn should_report_signal_not_found_with_path() {
        let path = SignalPath::new("Vehicle.Body.Trunk.Rear.IsOpen").unwrap();
        let err: DeliveryError = SignalError::NotFound(path).into();
        assert_eq!(
            report(&err),
            "signal error: signal Vehicle.Body.Trunk.Rear.IsOpen not found"
        );
    }

    #[test]
    fn should_expose_salvaged_request_id() {
        let source = serde_json::from_str::<u8>("\"x\"").unwrap_err();
        let err = DecodeError::Schema {
            request_id: Some("abc".to_string()),
            source,
        };
        assert_eq!(err.request_id(), Some("abc"));
    }

    #[test]
    fn should_have_no_request_id_for_syntax_error() {
        let source = serde_json::from_str::<serde_json::Value>("{{bad").unwrap_err();
        let err = DecodeError::Syntax(source);
        assert_eq!(err.request_id(), None);
    }
}
