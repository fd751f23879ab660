use crate::gate::{GateConfig, GateOutcome, decide};
use crate::web::state::{use_session, SessionContext};
use leptos::prelude::*;
use leptos_router::{NavigateOptions, hooks::use_navigate};

/// Gate outcome for `session`, recomputed on every session change.
fn gate_outcome(session: SessionContext, config: GateConfig) -> Memo<GateOutcome> {
    Memo::new(move |_| session.state.with(|state| decide(state, &config)))
}

#[component]
pub fn RequireSession(config: GateConfig, children: ChildrenFn) -> impl IntoView {
    let session = use_session();
    let navigate = use_navigate();

    let outcome = gate_outcome(session, config.clone());

    Effect::new(move |_| {
        if let GateOutcome::Redirect(target) = outcome.get() {
            // UX-only guard; real access control must live on the API.
            config.notify_denied(&target);
            navigate(
                target.as_str(),
                NavigateOptions {
                    replace: true,
                    ..Default::default()
                },
            );
        }
    });

    move || match outcome.get() {
        GateOutcome::ShowLoadingIndicator => view! {
            <div
                class="inline-block h-7 w-7 animate-spin rounded-full border-4 border-blue-200 border-t-blue-600"
                role="status"
                aria-live="polite"
                aria-label="Loading"
            ></div>
        }
        .into_any(),
        GateOutcome::Redirect(_) => ().into_any(),
        GateOutcome::RenderProtectedContent => children().into_any(),
    }
}
