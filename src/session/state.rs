use crate::error::SessionError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::warn;

/// The principal behind an authenticated session. Only non-sensitive metadata
/// belongs here; credentials stay with the session provider.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub subject_id: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, Value>,
}

impl Subject {
    pub fn new(subject_id: impl Into<String>) -> Self {
        Self {
            subject_id: subject_id.into(),
            attributes: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }
}

/// Authentication state as reported by a session provider.
///
/// `Unknown` is the initial value while resolution is in flight; the other two
/// variants are terminal until the provider is explicitly invalidated.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    Unknown,
    Authenticated(Subject),
    Unauthenticated,
}

impl SessionState {
    pub fn authenticated(subject_id: impl Into<String>) -> Self {
        Self::Authenticated(Subject::new(subject_id))
    }

    /// Terminal state for the result of a resolution. Errors settle as
    /// unauthenticated so a failed resolution never stays `Unknown`.
    pub fn settle(resolution: Result<Option<Subject>, SessionError>) -> Self {
        match resolution {
            Ok(Some(subject)) => Self::Authenticated(subject),
            Ok(None) => Self::Unauthenticated,
            Err(err) => {
                warn!(error = %err, "session resolution failed");
                Self::Unauthenticated
            }
        }
    }

    pub fn subject(&self) -> Option<&Subject> {
        match self {
            Self::Authenticated(subject) => Some(subject),
            Self::Unknown | Self::Unauthenticated => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    /// True once resolution has settled on either terminal variant.
    pub fn is_resolved(&self) -> bool {
        !matches!(self, Self::Unknown)
    }

    /// Short label for logs; never includes subject attributes.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Authenticated(_) => "authenticated",
            Self::Unauthenticated => "unauthenticated",
        }
    }
}
