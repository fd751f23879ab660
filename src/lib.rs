//! # session-gate
//!
//! Decides what a protected region of a client application shows while the
//! authentication state evolves: a loading indicator while the session is
//! being resolved, a replacing redirect once it is known to be missing, and
//! the protected content once it is authenticated.
//!
//! ## Pieces
//!
//! - [`session::SessionProvider`] owns the [`session::SessionState`], settles
//!   it from an asynchronous resolution and notifies subscribers synchronously,
//!   in order, on every change. Failed resolutions settle as unauthenticated.
//! - [`gate::decide`] is the pure decision; [`gate::AccessGate`] applies it per
//!   region and reports [`gate::GateTransition`]s.
//! - [`gate::ProtectedRegion`] wires a provider, a gate, a
//!   [`navigation::Navigator`] and a [`gate::RegionView`] together.
//! - With the `web` feature, [`web`] exposes the same gate as a Leptos
//!   component.
//!
//! The gate is a UX concern; the data behind a protected region must still be
//! authorized by whatever serves it.

pub mod cli;
pub mod config;
pub mod error;
pub mod gate;
pub mod navigation;
pub mod session;
#[cfg(feature = "web")]
pub mod web;

pub use error::{GateError, SessionError};
pub use gate::{AccessGate, GateConfig, GateOutcome, GateTransition, decide};
pub use session::{SessionProvider, SessionState, Subject};
