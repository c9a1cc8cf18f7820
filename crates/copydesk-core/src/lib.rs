//! Core library for the copydesk console.
//!
//! Holds everything that is independent of the terminal UI: configuration,
//! the session store, navigation guards, and the REST API client.

pub mod api;
pub mod config;
pub mod guards;
pub mod session;
