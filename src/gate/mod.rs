//! Access gate for protected regions.
//!
//! [`decide`] maps a session snapshot to what the region should do. An
//! [`AccessGate`] wraps it for one region, remembering only the last observed
//! state so it can report transitions. The gate is UX only; real access
//! control must still be enforced by whatever serves the protected data.

mod path;
mod region;

pub use path::RoutePath;
pub use region::{ProtectedRegion, RegionView};

use crate::error::GateError;
use crate::session::SessionState;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// What a protected region should do for a given session state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "target", rename_all = "snake_case")]
pub enum GateOutcome {
    ShowLoadingIndicator,
    /// Leave the region with a replacing navigation to the target.
    Redirect(RoutePath),
    RenderProtectedContent,
}

type DenyHook = Arc<dyn Fn(&RoutePath) + Send + Sync>;

/// Immutable per-region configuration.
#[derive(Clone)]
pub struct GateConfig {
    redirect_target: RoutePath,
    on_deny: Option<DenyHook>,
}

impl fmt::Debug for GateConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GateConfig")
            .field("redirect_target", &self.redirect_target)
            .field("on_deny", &self.on_deny.is_some())
            .finish()
    }
}

impl GateConfig {
    pub fn new(redirect_target: RoutePath) -> Self {
        Self {
            redirect_target,
            on_deny: None,
        }
    }

    /// Builds a config from a raw redirect target.
    ///
    /// # Errors
    /// Returns an error if `target` is not a valid in-app path.
    pub fn redirect_to(target: &str) -> Result<Self, GateError> {
        Ok(Self::new(RoutePath::parse(target)?))
    }

    /// Hook invoked every time the gate yields a redirect.
    #[must_use]
    pub fn on_deny(mut self, hook: impl Fn(&RoutePath) + Send + Sync + 'static) -> Self {
        self.on_deny = Some(Arc::new(hook));
        self
    }

    pub fn redirect_target(&self) -> &RoutePath {
        &self.redirect_target
    }

    pub(crate) fn notify_denied(&self, target: &RoutePath) {
        info!(redirect = %target, "access denied, redirecting");
        if let Some(hook) = &self.on_deny {
            hook(target);
        }
    }
}

/// Decides the outcome for `state`. Pure and total over every session state.
pub fn decide(state: &SessionState, config: &GateConfig) -> GateOutcome {
    match state {
        SessionState::Unknown => GateOutcome::ShowLoadingIndicator,
        SessionState::Unauthenticated => GateOutcome::Redirect(config.redirect_target.clone()),
        SessionState::Authenticated(_) => GateOutcome::RenderProtectedContent,
    }
}

/// Emitted when a gate observes a state different from the previous one.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GateTransition {
    /// `None` for the first observation.
    pub from: Option<SessionState>,
    pub to: SessionState,
    pub outcome: GateOutcome,
}

type TransitionHook = Box<dyn FnMut(&GateTransition)>;

/// Gate instance for a single protected region.
pub struct AccessGate {
    config: GateConfig,
    last_observed: Option<SessionState>,
    on_transition: Option<TransitionHook>,
}

impl fmt::Debug for AccessGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessGate")
            .field("config", &self.config)
            .field("last_observed", &self.last_observed)
            .finish_non_exhaustive()
    }
}

impl AccessGate {
    pub fn new(config: GateConfig) -> Self {
        Self {
            config,
            last_observed: None,
            on_transition: None,
        }
    }

    /// Observability hook receiving every [`GateTransition`].
    #[must_use]
    pub fn with_transition_hook(mut self, hook: impl FnMut(&GateTransition) + 'static) -> Self {
        self.on_transition = Some(Box::new(hook));
        self
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    pub fn last_observed(&self) -> Option<&SessionState> {
        self.last_observed.as_ref()
    }

    /// Records `state` and recomputes the outcome. Never reuses an earlier
    /// decision, so a logout or a late resolution is reflected immediately.
    pub fn observe(&mut self, state: &SessionState) -> GateOutcome {
        let outcome = decide(state, &self.config);

        if self.last_observed.as_ref() != Some(state) {
            let from = self.last_observed.replace(state.clone());
            debug!(
                from = from.as_ref().map_or("none", SessionState::label),
                to = state.label(),
                "gate observed session change"
            );
            if let Some(hook) = self.on_transition.as_mut() {
                hook(&GateTransition {
                    from,
                    to: state.clone(),
                    outcome: outcome.clone(),
                });
            }
        }

        if let GateOutcome::Redirect(target) = &outcome {
            self.config.notify_denied(target);
        }

        outcome
    }
}
