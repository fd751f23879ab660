//! Session state and the provider that owns it. Gates only observe the state;
//! every mutation goes through [`SessionProvider`].

mod provider;
mod state;

pub use provider::{SessionProvider, Subscription};
pub use state::{SessionState, Subject};
