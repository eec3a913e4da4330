//! Response capability set shared by direct and relayed requests.
//!
//! The dispatcher only sees `dyn HttpResponse`, so it never needs to know
//! which path a request took.

use super::error::CyError;
use super::relay::RelayReply;
use serde_json::Value;
use std::fmt;

pub trait HttpResponse: Send + Sync + fmt::Debug {
    /// URL of the command service request this answers.
    fn url(&self) -> &str;
    fn status(&self) -> u16;
    fn reason(&self) -> &str;
    fn text(&self) -> &str;

    fn json(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_str(self.text())
    }

    fn is_success(&self) -> bool {
        (200..300).contains(&self.status())
    }

    fn payload(&self) -> Payload {
        try_parse_json(self.text())
    }
}

/// A reply body: JSON when it parses, raw text otherwise.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(Value),
    Text(String),
}

impl Payload {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Payload::Json(value) => Some(value),
            Payload::Text(_) => None,
        }
    }

    pub fn into_json(self) -> Option<Value> {
        match self {
            Payload::Json(value) => Some(value),
            Payload::Text(_) => None,
        }
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Json(value) => write!(f, "{value}"),
            Payload::Text(text) => f.write_str(text),
        }
    }
}

pub fn try_parse_json(text: &str) -> Payload {
    match serde_json::from_str(text) {
        Ok(value) => Payload::Json(value),
        Err(_) => Payload::Text(text.to_string()),
    }
}

// =============================================================================
// DIRECT RESPONSE
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct DirectResponse {
    url: String,
    status: u16,
    reason: String,
    text: String,
}

impl DirectResponse {
    pub fn new(
        url: impl Into<String>,
        status: u16,
        reason: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            status,
            reason: reason.into(),
            text: text.into(),
        }
    }

    /// Drain a `reqwest` response into an owned snapshot.
    pub async fn from_reqwest(url: &str, response: reqwest::Response) -> Result<Self, CyError> {
        let status = response.status();
        let reason = status.canonical_reason().unwrap_or_default().to_string();
        let text = response
            .text()
            .await
            .map_err(|e| CyError::from_transport_error(e, "read response body"))?;
        Ok(Self::new(url, status.as_u16(), reason, text))
    }
}

impl HttpResponse for DirectResponse {
    fn url(&self) -> &str {
        &self.url
    }

    fn status(&self) -> u16 {
        self.status
    }

    fn reason(&self) -> &str {
        &self.reason
    }

    fn text(&self) -> &str {
        &self.text
    }
}

// =============================================================================
// RELAYED RESPONSE
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct RelayedResponse {
    url: String,
    channel: u32,
    status: u16,
    reason: String,
    text: String,
}

impl RelayedResponse {
    pub fn from_reply(url: impl Into<String>, channel: u32, reply: RelayReply) -> Self {
        Self {
            url: url.into(),
            channel,
            status: reply.status,
            reason: reply.reason.unwrap_or_default(),
            text: reply.text.unwrap_or_default(),
        }
    }

    /// Relay channel the reply arrived on.
    pub fn channel(&self) -> u32 {
        self.channel
    }
}

impl HttpResponse for RelayedResponse {
    fn url(&self) -> &str {
        &self.url
    }

    fn status(&self) -> u16 {
        self.status
    }

    fn reason(&self) -> &str {
        &self.reason
    }

    fn text(&self) -> &str {
        &self.text
    }
}
