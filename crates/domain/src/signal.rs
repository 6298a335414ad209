//! Signal: an addressable data point in the vehicle signal tree.
//!
//! Signals are addressed by dot-separated hierarchical paths such as
//! `Vehicle.Body.Trunk.Rear.IsOpen`. Paths are resolved once when a component
//! is constructed and never change afterwards.

mod update;
mod value;

pub use update::SignalUpdate;
pub use value::SignalValue;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Hierarchical identifier of one signal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SignalPath(String);

impl SignalPath {
    /// Build a path after checking it is non-empty and has no empty segments.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] when the path is empty or contains `..`,
    /// a leading dot, or a trailing dot.
    pub fn new(path: impl Into<String>) -> Result<Self, ValidationError> {
        let path = path.into();
        if path.is_empty() {
            return Err(ValidationError::EmptySignalPath);
        }
        if path.split('.').any(str::is_empty) {
            return Err(ValidationError::EmptySegment(path));
        }
        Ok(Self(path))
    }

    /// Wrap a path known to satisfy the invariants checked by [`new`](Self::new).
    pub(crate) fn trusted(path: String) -> Self {
        debug_assert!(Self::new(path.clone()).is_ok());
        Self(path)
    }

    /// Borrow the path as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SignalPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for SignalPath {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for SignalPath {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SignalPath> for String {
    fn from(path: SignalPath) -> Self {
        path.0
    }
}
