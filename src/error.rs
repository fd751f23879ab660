use thiserror::Error;

/// Configuration errors raised while building a gate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GateError {
    #[error("invalid redirect target {target:?}: {reason}")]
    InvalidRedirectTarget { target: String, reason: &'static str },
}

/// Failures reported by session resolution. Any of them settles the session
/// as unauthenticated.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("credential expired")]
    Expired,
    #[error("credential rejected: {0}")]
    Rejected(String),
    #[error("identity provider unreachable: {0}")]
    Transport(String),
}
