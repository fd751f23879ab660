use crate::gate::{AccessGate, GateConfig, GateOutcome};
use crate::navigation::{NavigateOptions, Navigator};
use crate::session::{SessionProvider, SessionState, Subject, Subscription};
use std::cell::{Ref, RefCell};
use std::rc::Rc;
use tracing::trace;

/// Rendering side of a protected region.
pub trait RegionView {
    fn show_loading(&mut self);
    fn render_protected(&mut self, subject: &Subject);
}

struct Driver<N, V> {
    gate: AccessGate,
    navigator: N,
    view: V,
    outcome: GateOutcome,
}

impl<N: Navigator, V: RegionView> Driver<N, V> {
    fn apply(&mut self, state: &SessionState) {
        let outcome = self.gate.observe(state);
        trace!(?outcome, "applying gate outcome");
        match &outcome {
            GateOutcome::ShowLoadingIndicator => self.view.show_loading(),
            GateOutcome::Redirect(target) => {
                // Replace so back-navigation cannot land on the protected route.
                self.navigator.navigate(target, NavigateOptions::REPLACE);
            }
            GateOutcome::RenderProtectedContent => {
                if let Some(subject) = state.subject() {
                    self.view.render_protected(subject);
                }
            }
        }
        self.outcome = outcome;
    }
}

/// A mounted protected region: applies the gate outcome for the provider's
/// current state, then again on every change until dropped.
pub struct ProtectedRegion<N, V> {
    driver: Rc<RefCell<Driver<N, V>>>,
    _subscription: Subscription,
}

impl<N, V> ProtectedRegion<N, V>
where
    N: Navigator + 'static,
    V: RegionView + 'static,
{
    pub fn mount(provider: &SessionProvider, config: GateConfig, navigator: N, view: V) -> Self {
        Self::mount_with_gate(provider, AccessGate::new(config), navigator, view)
    }

    /// Mounts with a pre-built gate, e.g. one carrying a transition hook.
    pub fn mount_with_gate(
        provider: &SessionProvider,
        gate: AccessGate,
        navigator: N,
        view: V,
    ) -> Self {
        let driver = Rc::new(RefCell::new(Driver {
            gate,
            navigator,
            view,
            outcome: GateOutcome::ShowLoadingIndicator,
        }));
        // The view may change the session while rendering; `watch` queues
        // such changes until the region is subscribed.
        let listener = Rc::clone(&driver);
        let subscription = provider.watch(move |state| listener.borrow_mut().apply(state));

        Self {
            driver,
            _subscription: subscription,
        }
    }
}

impl<N, V> ProtectedRegion<N, V> {
    /// Outcome applied for the most recent state.
    pub fn outcome(&self) -> GateOutcome {
        self.driver.borrow().outcome.clone()
    }

    pub fn navigator(&self) -> Ref<'_, N> {
        Ref::map(self.driver.borrow(), |driver| &driver.navigator)
    }

    pub fn view(&self) -> Ref<'_, V> {
        Ref::map(self.driver.borrow(), |driver| &driver.view)
    }
}
