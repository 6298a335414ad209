//! Signal update: the payload a signal broker emits when subscribed
//! signals change.

use std::collections::HashMap;

use crate::error::SignalError;
use crate::signal::{SignalPath, SignalValue};

/// A batch of changed signal values, keyed by path.
///
/// Produced by a signal client on change and consumed once by whoever
/// subscribed.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalUpdate {
    pub values: HashMap<SignalPath, SignalValue>,
}

impl SignalUpdate {
    /// An update carrying a single changed value.
    #[must_use]
    pub fn single(path: SignalPath, value: SignalValue) -> Self {
        Self {
            values: HashMap::from([(path, value)]),
        }
    }

    /// Look up the value carried for `path`.
    #[must_use]
    pub fn get(&self, path: &SignalPath) -> Option<&SignalValue> {
        self.values.get(path)
    }

    /// Extract the boolean value carried for `path`.
    ///
    /// # Errors
    ///
    /// Returns [`SignalError::NotFound`] if the update has no entry for
    /// `path`, or [`SignalError::TypeMismatch`] if the entry is not a bool.
    pub fn bool_value(&self, path: &SignalPath) -> Result<bool, SignalError> {
        let value = self
            .get(path)
            .ok_or_else(|| SignalError::NotFound(path.clone()))?;
        value.as_bool().ok_or_else(|| SignalError::TypeMismatch {
            path: path.clone(),
            expected: "bool",
        })
    }
}
