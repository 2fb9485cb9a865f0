//! Session and navigation core for the ClinAgenda clinic platform
//!
//! Three cooperating pieces:
//!
//! - [`session::SessionStore`] - single source of truth for authentication
//!   state, persisted to durable storage
//! - [`guard`] - the navigation guard deciding allow/redirect for every
//!   route transition
//! - [`client::HttpMediator`] - uniform request dispatch with bearer-token
//!   injection, response normalization, and the global 401 reaction
//!
//! The CLI in [`cli`] drives the same stack against the remote API.

pub mod cli;
pub mod client;
pub mod error;
pub mod guard;
pub mod notify;
pub mod session;
