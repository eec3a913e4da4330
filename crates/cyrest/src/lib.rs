//! Command compiler for CyREST-style command services.
//!
//! Turns a shell-like command string such as
//! `network get attribute network="test" columnList="SUID"` into the URL,
//! query parameters or JSON body the command service expects. No I/O happens
//! here; the `cyrest-http` crate sends what this crate compiles.

pub mod command;
pub mod error;
pub mod telemetry;

pub use command::{
    GetQuery, Parameters, PostQuery, SENTINEL_PARAMETER, command_to_get_query,
    command_to_post_body, command_to_post_query, command_to_post_url,
};
pub use error::CommandError;

// Re-export logging macros for consistent usage across the crate
pub use log::{debug, error, info, trace, warn};

/// Base URL of a CyREST instance running on the local machine.
pub const DEFAULT_BASE_URL: &str = "http://localhost:1234/v1";
