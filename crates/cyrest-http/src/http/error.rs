//! Error taxonomy for talking to a command service
//!
//! Malformed commands, target service errors, relay infrastructure errors and
//! connectivity errors are separate variants so callers can tell "the service
//! rejected the command" apart from "the relay itself is broken".

use super::request::Verb;
use super::response::Payload;
use cyrest::CommandError;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum CyError {
    /// The command string could not be compiled.
    Command(CommandError),
    /// Non-2xx reply from the command service.
    Service {
        verb: Verb,
        url: String,
        status: u16,
        reason: String,
        body: Option<Payload>,
    },
    /// A command reply whose `errors` array was not empty.
    CommandFailed { url: String, message: String },
    /// A 2xx reply that had to be JSON but was not.
    InvalidJson {
        url: String,
        reason: String,
        text: String,
    },
    Relay(RelayError),
    /// The command service could not be contacted at all.
    Unreachable { url: String },
    /// I/O failure below HTTP (connect, timeout, body read).
    Transport { context: String, reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum RelayError {
    Enqueue { status: u16, text: String },
    Dequeue { status: u16, text: String },
    Undecipherable { payload: String },
}

impl fmt::Display for CyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CyError::Command(err) => write!(f, "Malformed command: {err}"),
            CyError::Service {
                verb,
                url,
                status,
                reason,
                body,
            } => {
                write!(f, "{verb} {url} failed with {status} {reason}")?;
                match body {
                    Some(body) => write!(f, ": {body}"),
                    None => Ok(()),
                }
            }
            CyError::CommandFailed { url, message } => {
                write!(f, "Command at {url} failed: {message}")
            }
            CyError::InvalidJson { url, reason, text } => {
                write!(f, "Expected JSON from {url} ({reason}), got: {text}")
            }
            CyError::Relay(err) => write!(f, "Relay error: {err}"),
            CyError::Unreachable { url } => write!(f, "Could not contact url: {url}"),
            CyError::Transport { context, reason } => {
                write!(f, "Transport error in {context}: {reason}")
            }
        }
    }
}

impl fmt::Display for RelayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelayError::Enqueue { status, text } => {
                write!(f, "Error posting to relay ({status}): {text}")
            }
            RelayError::Dequeue { status, text } => {
                write!(f, "Error receiving from relay ({status}): {text}")
            }
            RelayError::Undecipherable { payload } => {
                write!(f, "Undecipherable message received from relay: {payload}")
            }
        }
    }
}

impl std::error::Error for CyError {}
impl std::error::Error for RelayError {}

impl CyError {
    pub fn is_malformed_command(&self) -> bool {
        matches!(self, CyError::Command(err) if err.is_malformed_command())
    }

    pub fn is_service_error(&self) -> bool {
        matches!(
            self,
            CyError::Service { .. } | CyError::CommandFailed { .. } | CyError::InvalidJson { .. }
        )
    }

    pub fn is_relay_error(&self) -> bool {
        matches!(self, CyError::Relay(_))
    }

    pub fn is_connectivity_error(&self) -> bool {
        matches!(self, CyError::Unreachable { .. })
    }

    /// HTTP status reported by the command service, when there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            CyError::Service { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn from_transport_error(e: impl std::fmt::Display, context: &str) -> Self {
        CyError::Transport {
            context: context.to_string(),
            reason: e.to_string(),
        }
    }
}

impl From<CommandError> for CyError {
    fn from(err: CommandError) -> Self {
        CyError::Command(err)
    }
}

impl From<RelayError> for CyError {
    fn from(err: RelayError) -> Self {
        CyError::Relay(err)
    }
}
