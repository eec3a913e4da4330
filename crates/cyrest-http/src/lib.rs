//! HTTP side of the CyREST command client.
//!
//! Sends commands compiled by the `cyrest` crate to a command service, either
//! directly or through a store-and-forward relay when the service is not
//! reachable from this machine, and normalizes what comes back.

pub mod http;

pub use http::*;

// Re-export logging macros for consistent usage across the crate
pub use log::{debug, error, info, trace, warn};
