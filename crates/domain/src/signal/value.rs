//! Typed signal values.

use serde::{Deserialize, Serialize};

/// A single typed value carried by a signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SignalValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl SignalValue {
    /// The boolean payload, if this is a [`Bool`](Self::Bool).
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<bool> for SignalValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_return_bool_for_bool_variant() {
        assert_eq!(SignalValue::Bool(true).as_bool(), Some(true));
        assert_eq!(SignalValue::from(false).as_bool(), Some(false));
    }

    #[test]
    fn should_return_none_for_non_bool_variant() {
        assert_eq!(SignalValue::Int(1).as_bool(), None);
        assert_eq!(SignalValue::String("true".to_string()).as_bool(), None);
    }

    #[test]
    fn should_serialize_bool_variant_as_plain_bool() {
        let json = serde_json::to_string(&SignalValue::Bool(true)).unwrap();
        assert_eq!(json, "true");
    }
}
