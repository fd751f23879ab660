//! Leptos bindings for the access gate. The session lives in a reactive signal
//! shared through context; [`RequireSession`] derives the gate outcome from it
//! and performs the loading render, replacing navigation, or child render.
//! Only non-sensitive subject metadata is kept in memory.

mod guard;
mod state;

pub use guard::RequireSession;
pub use state::{
    provide_session_context, provide_session_context_from, spawn_resolution, use_session,
    SessionContext,
};
