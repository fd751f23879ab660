use crate::error::SessionError;
use crate::session::{SessionProvider, SessionState, Subject};
use leptos::{prelude::*, task::spawn_local};
use std::future::Future;

#[derive(Clone, Copy)]
/// Session context shared through Leptos.
pub struct SessionContext {
    pub state: RwSignal<SessionState>,
    pub is_authenticated: Signal<bool>,
}

impl SessionContext {
    /// Builds a context around the provided session signal.
    fn new(state: RwSignal<SessionState>) -> Self {
        let is_authenticated = Signal::derive(move || state.with(SessionState::is_authenticated));
        Self {
            state,
            is_authenticated,
        }
    }

    /// Updates the in-memory session after login.
    pub fn authenticate(&self, subject: Subject) {
        self.state.set(SessionState::Authenticated(subject));
    }

    /// Clears the in-memory session, typically on logout.
    pub fn sign_out(&self) {
        self.state.set(SessionState::Unauthenticated);
    }

    /// Restarts resolution; guards show their loading state until it settles.
    pub fn invalidate(&self) {
        self.state.set(SessionState::Unknown);
    }

    /// Settles the session from a finished resolution.
    pub fn settle(&self, resolution: Result<Option<Subject>, SessionError>) {
        self.state.set(SessionState::settle(resolution));
    }
}

/// Provides an unresolved session context to the current owner and returns it.
pub fn provide_session_context() -> SessionContext {
    let context = SessionContext::new(RwSignal::new(SessionState::Unknown));
    provide_context(context);
    context
}

/// Provides a context that mirrors `provider` and returns it.
///
/// The provider stays the source of truth: its changes are copied into the
/// signal until the current owner is cleaned up. Mutating the returned context
/// directly does not reach the provider.
pub fn provide_session_context_from(provider: &SessionProvider) -> SessionContext {
    let context = SessionContext::new(RwSignal::new(provider.state()));
    let state = context.state;
    let subscription = provider.watch(move |next| state.set(next.clone()));
    let mirror = StoredValue::new_local(Some(subscription));

    on_cleanup(move || {
        if let Some(mut stored) = mirror.try_write_value() {
            stored.take();
        }
    });

    provide_context(context);
    context
}

/// Runs `resolution` on the local executor and settles `context` with it.
pub fn spawn_resolution<F>(context: SessionContext, resolution: F)
where
    F: Future<Output = Result<Option<Subject>, SessionError>> + 'static,
{
    spawn_local(async move {
        context.settle(resolution.await);
    });
}

/// Returns the current session context, or an unauthenticated one when no
/// context was provided.
pub fn use_session() -> SessionContext {
    use_context::<SessionContext>()
        .unwrap_or_else(|| SessionContext::new(RwSignal::new(SessionState::Unauthenticated)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_owner<T>(run: impl FnOnce() -> T) -> T {
        let owner = Owner::new();
        owner.with(run)
    }

    #[test]
    fn missing_context_falls_back_to_unauthenticated() {
        with_owner(|| {
            let session = use_session();
            assert_eq!(session.state.get_untracked(), SessionState::Unauthenticated);
            assert!(!session.is_authenticated.get_untracked());
        });
    }

    #[test]
    fn provided_context_starts_unknown() {
        with_owner(|| {
            provide_session_context();
            let session = use_session();
            assert_eq!(session.state.get_untracked(), SessionState::Unknown);

            session.authenticate(Subject::new("u1"));
            assert!(use_session().is_authenticated.get_untracked());
        });
    }

    #[test]
    fn failed_settle_is_unauthenticated() {
        with_owner(|| {
            let session = provide_session_context();
            session.settle(Err(SessionError::Transport("offline".to_string())));
            assert_eq!(session.state.get_untracked(), SessionState::Unauthenticated);
        });
    }

    #[test]
    fn invalidate_returns_to_unknown() {
        with_owner(|| {
            let session = provide_session_context();
            session.settle(Ok(Some(Subject::new("u1"))));
            assert!(session.is_authenticated.get_untracked());

            session.invalidate();
            assert_eq!(session.state.get_untracked(), SessionState::Unknown);
            assert!(!session.is_authenticated.get_untracked());
        });
    }

    #[test]
    fn mirrored_context_follows_the_provider() {
        let provider = SessionProvider::new();
        provider.authenticate(Subject::new("u1"));

        with_owner(|| {
            let session = provide_session_context_from(&provider);
            assert_eq!(session.state.get_untracked(), SessionState::authenticated("u1"));

            provider.sign_out();
            assert_eq!(session.state.get_untracked(), SessionState::Unauthenticated);
        });
    }

    #[test]
    fn mirror_stops_when_the_owner_is_cleaned_up() {
        let provider = SessionProvider::new();
        let owner = Owner::new();
        owner.with(|| provide_session_context_from(&provider));
        assert_eq!(provider.subscriber_count(), 1);

        owner.cleanup();
        assert_eq!(provider.subscriber_count(), 0);
    }
}
