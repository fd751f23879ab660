use crate::error::GateError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An in-application path usable as a redirect target.
///
/// Only same-origin absolute paths are accepted: the value must start with a
/// single `/` and contain no whitespace or control characters, which keeps
/// configured redirects from leaving the application.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoutePath(String);

impl RoutePath {
    /// Validates `path` as a redirect target.
    ///
    /// # Errors
    /// Returns [`GateError::InvalidRedirectTarget`] if the path is empty,
    /// relative, protocol-relative, or contains whitespace/control characters.
    pub fn parse(path: impl Into<String>) -> Result<Self, GateError> {
        let path = path.into();
        let reason = if path.is_empty() {
            Some("must not be empty")
        } else if !path.starts_with('/') {
            Some("must start with '/'")
        } else if path.starts_with("//") || path.starts_with("/\\") {
            Some("must not be protocol-relative")
        } else if path.chars().any(|c| c.is_whitespace() || c.is_control()) {
            Some("must not contain whitespace or control characters")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(GateError::InvalidRedirectTarget {
                target: path,
                reason,
            }),
            None => Ok(Self(path)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoutePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RoutePath {
    type Err = GateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for RoutePath {
    type Error = GateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<RoutePath> for String {
    fn from(path: RoutePath) -> Self {
        path.0
    }
}

impl AsRef<str> for RoutePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
